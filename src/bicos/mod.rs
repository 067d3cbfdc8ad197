//! BICOS search stage (§4.3): row-parallel argmin over Hamming distance,
//! with an optional left-right consistency check and duplicate-minimum
//! rejection.

pub mod search;

pub use search::{best_match_in_row, RowMatch};

use rayon::prelude::*;

use crate::config::SearchVariant;
use crate::descriptor::Descriptor;
use crate::stepbuf::StepBuf;
use crate::types::{IntDispMap, INVALID_DISP};

/// Resolves one row's disparities. `col0 - col1` is the reported disparity
/// (positive when the left feature is to the right of its right-image
/// match, matching the reference's column convention, §3).
fn search_row<D: Descriptor>(
    left_row: &[D],
    right_row: &[D],
    variant: SearchVariant,
) -> Vec<i16> {
    let width = left_row.len();
    let mut out = vec![INVALID_DISP; width];

    for col0 in 0..width {
        let fwd = best_match_in_row(left_row[col0], right_row);
        if variant.no_dupes() && !fwd.is_unique() {
            continue;
        }

        match variant {
            SearchVariant::NoConsistency { .. } => {
                out[col0] = col0 as i16 - fwd.col as i16;
            }
            SearchVariant::Consistency { max_lr_diff, .. } => {
                let col1 = fwd.col as usize;
                let bwd = best_match_in_row(right_row[col1], left_row);
                if variant.no_dupes() && !bwd.is_unique() {
                    continue;
                }
                let round_trip = bwd.col;
                let diff = (col0 as i64 - round_trip as i64).unsigned_abs();
                if diff <= max_lr_diff as u64 {
                    // §4.3: midpoint formulation, truncating integer division
                    // (§9: "deliberate... preserve this truncation exactly").
                    let midpoint = (col0 as i64 + round_trip as i64) / 2;
                    out[col0] = (midpoint - col1 as i64) as i16;
                }
            }
        }
    }

    out
}

/// Runs the BICOS search over an entire descriptor grid pair, one row band
/// per rayon task (§5).
pub fn bicos_search<D: Descriptor>(
    left: &StepBuf<D>,
    right: &StepBuf<D>,
    variant: SearchVariant,
) -> IntDispMap {
    let width = left.width();
    let height = left.height();
    let mut out = IntDispMap::filled(width, height, INVALID_DISP);

    out.par_row_bands_mut(1)
        .enumerate()
        .for_each(|(row, row_out)| {
            let disparities = search_row(left.row(row), right.row(row), variant);
            row_out.copy_from_slice(&disparities);
        });

    out
}
