//! Bit-cursor helper — ported from `include/impl/cpu/bitfield.hpp`.
//!
//! The C++ `Bitfield<T>` tracks a running bit index `i` and an accumulator
//! `v`, panicking (in debug builds) if more bits are written than `T` can
//! hold. This is the same contract here: `set` advances the cursor by one
//! bit per call and only ever ORs a bit in when the predicate is true.

use super::desc::Descriptor;

/// Accumulates a fixed-width descriptor one predicate bit at a time, in
/// schedule order (§4.2).
pub struct Bitfield<D: Descriptor> {
    i: u32,
    v: D,
}

impl<D: Descriptor> Bitfield<D> {
    pub fn new() -> Self {
        Bitfield { i: 0, v: D::ZERO }
    }

    /// Appends one bit to the descriptor. Writing past the descriptor's bit
    /// width is an `InternalError`-class bug — the schedule handed to
    /// [`super::transform_pixel_with_schedule`] miscounted. In debug builds
    /// this is caught with `debug_assert!`; release builds normally trust
    /// the schedule and pay no cost for the check, but the
    /// `strict-width-checks` feature upgrades it to a hard `assert!` for
    /// callers who would rather panic than silently drop a bit.
    #[inline]
    pub fn set(&mut self, value: bool) {
        if cfg!(feature = "strict-width-checks") {
            assert!(
                (self.i as usize) < D::BITS,
                "bitfield overflow: wrote bit {} into a {}-bit descriptor",
                self.i,
                D::BITS
            );
        } else {
            debug_assert!(
                (self.i as usize) < D::BITS,
                "bitfield overflow: wrote bit {} into a {}-bit descriptor",
                self.i,
                D::BITS
            );
        }
        if value {
            self.v.set_bit(self.i);
        }
        self.i += 1;
    }

    /// Number of bits written so far. Used by callers to assert the final
    /// count matches `required_bits(n, mode)` exactly.
    #[inline]
    pub fn bits_written(&self) -> u32 {
        self.i
    }

    #[inline]
    pub fn finish(self) -> D {
        self.v
    }
}

impl<D: Descriptor> Default for Bitfield<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::desc::Desc128;

    #[test]
    fn accumulates_bits_in_order() {
        let mut bf: Bitfield<u32> = Bitfield::new();
        bf.set(true); // bit 0
        bf.set(false); // bit 1
        bf.set(true); // bit 2
        assert_eq!(bf.bits_written(), 3);
        assert_eq!(bf.finish(), 0b101);
    }

    #[test]
    fn works_across_128_bit_lanes() {
        let mut bf: Bitfield<Desc128> = Bitfield::new();
        for i in 0..128 {
            bf.set(i == 70);
        }
        let d = bf.finish();
        assert_eq!(d.hamming(Desc128::ZERO), 1);
    }

    #[test]
    #[should_panic(expected = "bitfield overflow")]
    fn overflow_panics_in_debug() {
        let mut bf: Bitfield<u32> = Bitfield::new();
        for _ in 0..33 {
            bf.set(false);
        }
    }
}
