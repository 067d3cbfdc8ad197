//! Descriptor transform stage (§4.2): turns an [`InputStack`] into a
//! [`StepBuf`] of fixed-width descriptors, one per pixel.

pub mod bitfield;
pub mod desc;
pub mod schedule;
pub mod transform;

pub use bitfield::Bitfield;
pub use desc::{Desc128, Descriptor};
pub use schedule::Schedule;
pub use transform::{transform_pixel, transform_pixel_with_schedule};

use rayon::prelude::*;

use crate::config::TransformMode;
use crate::stepbuf::StepBuf;
use crate::types::{InputStack, Pixel};

/// Runs the descriptor transform over every pixel of `stack`, row-parallel
/// via rayon (§5: "the transform and search stages are embarrassingly
/// parallel across rows; each row's work is independent of every other").
///
/// `D` must be sized to hold `required_bits(stack.n(), mode)` bits — the
/// caller ([`crate::matcher::match_stereo`]) picks `D` using
/// [`crate::config::descriptor_width`] before calling this.
pub fn transform_stack<P: Pixel, D: Descriptor>(
    stack: &InputStack<P>,
    mode: TransformMode,
) -> StepBuf<D> {
    let n = stack.n();
    let width = stack.width();
    let height = stack.height();
    let required = crate::config::required_bits(n, mode) as usize;

    let mut out: StepBuf<D> = StepBuf::filled(width, height, D::ZERO);

    out.par_row_bands_mut(1)
        .enumerate()
        .for_each(|(row, row_out)| {
            let schedule = Schedule::new(n, mode, required);
            let mut sequence: Vec<P> = vec![stack.pixel(0, row, 0); n];
            for col in 0..width {
                stack.temporal_sequence(row, col, &mut sequence);
                row_out[col] = transform_pixel_with_schedule(&schedule, &sequence);
            }
        });

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_stack(frames: Vec<Vec<u8>>, width: usize, height: usize) -> InputStack<u8> {
        InputStack::new(frames, width, height).unwrap()
    }

    #[test]
    fn transform_stack_matches_per_pixel_transform() {
        let width = 2;
        let height = 1;
        let frames = vec![
            vec![10u8, 20],
            vec![20, 10],
            vec![15, 15],
            vec![5, 25],
        ];
        let stack = make_stack(frames, width, height);
        let grid: StepBuf<u32> = transform_stack(&stack, TransformMode::Limited);

        let mut seq = vec![0u8; stack.n()];
        stack.temporal_sequence(0, 0, &mut seq);
        let expected: u32 = transform_pixel(TransformMode::Limited, &seq);
        assert_eq!(grid.row(0)[0], expected);
    }

    #[test]
    fn output_grid_has_stack_dimensions() {
        let frames = vec![vec![1u8, 2, 3, 4], vec![4, 3, 2, 1]];
        let stack = make_stack(frames, 2, 2);
        let grid: StepBuf<u32> = transform_stack(&stack, TransformMode::Full);
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
    }
}
