#![no_main]

use bicos::config::SearchVariant;
use bicos::StepBuf;
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

/// Two independently-sized rows of raw `u32` descriptors plus a search
/// variant, run straight through `bicos_search`. There is no dimension
/// relationship required between `left` and `right` beyond both being
/// non-empty single rows, which is exactly the shape a caller can hand
/// the search stage if the descriptor transform ran on two differently
/// sized stacks by mistake.
#[derive(Debug, Arbitrary)]
struct Input {
    left: Vec<u32>,
    right: Vec<u32>,
    consistency: bool,
    max_lr_diff: u16,
    no_dupes: bool,
}

fuzz_target!(|input: Input| {
    if input.left.is_empty() || input.right.is_empty() {
        return;
    }
    if input.left.len() > 256 || input.right.len() > 256 {
        return;
    }

    let left = StepBuf::from_vec(input.left.clone(), input.left.len(), 1);
    let right = StepBuf::from_vec(input.right.clone(), input.right.len(), 1);

    let variant = if input.consistency {
        SearchVariant::Consistency {
            max_lr_diff: input.max_lr_diff,
            no_dupes: input.no_dupes,
        }
    } else {
        SearchVariant::NoConsistency {
            no_dupes: input.no_dupes,
        }
    };

    // left/right widths may legitimately differ here even though
    // match_stereo would never call bicos_search with mismatched stacks;
    // both inputs share height 1 by construction, which is all
    // `bicos_search` itself requires.
    let _ = bicos::bicos::bicos_search(&left, &right, variant);
});
