//! Descriptor transform — §4.2.
//!
//! Turns one pixel's temporal intensity sequence into a fixed-width
//! descriptor by running it through the [`Schedule`] predicate list and
//! accumulating the result bit-by-bit in a [`Bitfield`].

use super::bitfield::Bitfield;
use super::desc::Descriptor;
use super::schedule::Schedule;
use crate::config::TransformMode;
use crate::types::Pixel;

/// Applies the descriptor transform to one temporal sequence `p` (length
/// `p.len() == n`), producing a descriptor of type `D`.
///
/// Building a [`Schedule`] allocates (it materializes the FULL-only pair
/// list under `TransformMode::Full`), so callers processing many pixels
/// with the same `(n, mode)` should build one `Schedule` and reuse it via
/// [`transform_pixel_with_schedule`] rather than calling this per pixel.
pub fn transform_pixel<P: Pixel, D: Descriptor>(mode: TransformMode, p: &[P]) -> D {
    let required = crate::config::required_bits(p.len(), mode) as usize;
    let schedule = Schedule::new(p.len(), mode, required);
    transform_pixel_with_schedule(&schedule, p)
}

/// Same as [`transform_pixel`] but reuses a precomputed [`Schedule`] —
/// the form used by [`super::transform_row`] across an entire row.
pub fn transform_pixel_with_schedule<P: Pixel, D: Descriptor>(
    schedule: &Schedule,
    p: &[P],
) -> D {
    let sum: u32 = p.iter().map(|x| x.to_u32()).sum();
    let mean = P::from_u32_mean(sum / p.len() as u32);

    let mut bf: Bitfield<D> = Bitfield::new();
    let required = schedule.required_bits();
    for slot in 0..required {
        bf.set(schedule.eval(slot, p, mean));
    }
    debug_assert_eq!(bf.bits_written() as usize, required);
    bf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformMode;

    #[test]
    fn writes_exactly_the_required_bit_count() {
        let p: [u8; 6] = [10, 20, 15, 5, 25, 12];
        let d: u32 = transform_pixel(TransformMode::Limited, &p);
        // LIMITED, n=6 -> 4*6-7=17 bits. Anything above bit 17 must be zero.
        assert_eq!(d & !((1u32 << 17) - 1), 0);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let p: [u16; 4] = [100, 200, 50, 150];
        let a: u32 = transform_pixel(TransformMode::Full, &p);
        let b: u32 = transform_pixel(TransformMode::Full, &p);
        assert_eq!(a, b);
    }

    #[test]
    fn monotonic_descending_sequence_sets_first_bit_zero() {
        // p[0] > p[1], so the first schedule bit (p[0] < p[1]) must be 0.
        let p: [u8; 3] = [200, 100, 50];
        let d: u32 = transform_pixel(TransformMode::Limited, &p);
        assert_eq!(d & 0b1, 0);
    }

    #[test]
    fn full_mode_uses_strictly_more_or_equal_bits_than_limited() {
        let n = 6;
        let full = crate::config::required_bits(n, TransformMode::Full);
        let limited = crate::config::required_bits(n, TransformMode::Limited);
        assert!(full >= limited);
    }
}
