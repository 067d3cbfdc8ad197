//! Row search — §4.3.
//!
//! For every column in the left descriptor row, finds the column in the
//! corresponding right row with the smallest Hamming distance. Ported from
//! `include/impl/cpu/bicos.hpp`'s inner `match_row` loop: strict `<` only
//! updates the running best (first-seen wins on a tie), and any later
//! column that ties the current best increments a duplicate counter rather
//! than replacing it. This tie-break direction is deliberate (§9 Open
//! Question, resolved): switching to `<=` would make the last-seen column
//! win ties instead of the first, silently changing output on any frame
//! with repeated-cost candidates.

use crate::descriptor::Descriptor;

/// Result of searching one left-row descriptor against an entire right row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMatch {
    pub col: u32,
    pub cost: u32,
    pub duplicates: u32,
}

impl RowMatch {
    #[inline]
    pub fn is_unique(&self) -> bool {
        self.duplicates == 0
    }
}

/// Searches `needle` against every descriptor in `haystack_row`, returning
/// the first column achieving the minimum Hamming distance and how many
/// later columns tied it.
#[inline]
pub fn best_match_in_row<D: Descriptor>(needle: D, haystack_row: &[D]) -> RowMatch {
    let mut best_cost = u32::MAX;
    let mut best_col = 0u32;
    let mut duplicates = 0u32;

    for (col, &candidate) in haystack_row.iter().enumerate() {
        let cost = needle.hamming(candidate);
        if cost < best_cost {
            best_cost = cost;
            best_col = col as u32;
            duplicates = 0;
        } else if cost == best_cost {
            duplicates += 1;
        }
    }

    RowMatch {
        col: best_col,
        cost: best_cost,
        duplicates,
    }
}
