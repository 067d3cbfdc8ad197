#![no_main]

use bicos::config::TransformMode;
use bicos::InputStack;
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

/// A small, arbitrary-sized single-pixel temporal sequence plus a mode
/// selector, exercised through the full `InputStack` -> `transform_stack`
/// path rather than calling `transform_pixel` directly, so the fuzzer also
/// shakes out any panic reachable only via [`bicos::config::required_bits`]
/// dispatch.
#[derive(Debug, Arbitrary)]
struct Input {
    samples: Vec<u8>,
    full_mode: bool,
}

fuzz_target!(|input: Input| {
    // InputStack requires N >= 2 frames; anything shorter is not a valid
    // stack and match_stereo would reject it before this stage ever runs.
    if input.samples.len() < 2 || input.samples.len() > 64 {
        return;
    }

    let mode = if input.full_mode {
        TransformMode::Full
    } else {
        TransformMode::Limited
    };

    let required = bicos::config::required_bits(input.samples.len(), mode);
    if required > 128 {
        return;
    }

    let frames: Vec<Vec<u8>> = input.samples.iter().map(|&s| vec![s]).collect();
    let stack = match InputStack::new(frames, 1, 1) {
        Ok(s) => s,
        Err(_) => return,
    };

    match bicos::config::descriptor_width(stack.n(), mode).unwrap() {
        bicos::config::DescriptorWidth::W32 => {
            let _: bicos::StepBuf<u32> = bicos::descriptor::transform_stack(&stack, mode);
        }
        bicos::config::DescriptorWidth::W64 => {
            let _: bicos::StepBuf<u64> = bicos::descriptor::transform_stack(&stack, mode);
        }
        bicos::config::DescriptorWidth::W128 => {
            let _: bicos::StepBuf<bicos::descriptor::Desc128> =
                bicos::descriptor::transform_stack(&stack, mode);
        }
    }
});
