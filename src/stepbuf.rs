//! Owned, row-major 2-D buffer — ported from `include/stepbuf.hpp`.
//!
//! The C++ `StepBuf<T>` wraps a raw `new T[]` allocation plus a manually
//! tracked step (stride) and `cv::Size`. Rust gets the same shape and the
//! same locality guarantees from a single `Vec<T>` with bounds-checked row
//! accessors — no manual `delete[]`, no separate stride field, since the
//! logical row width already matches the allocation's natural layout.

/// A dense `width * height` grid of `T`, stored row-major.
///
/// Exclusively owned by whoever constructs it; handed to the next pipeline
/// stage as `&StepBuf<T>` (read-only) or consumed by value.
#[derive(Clone)]
pub struct StepBuf<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Clone> StepBuf<T> {
    /// Builds a buffer of `width * height` elements, all set to `fill`.
    pub fn filled(width: usize, height: usize, fill: T) -> Self {
        StepBuf {
            data: vec![fill; width * height],
            width,
            height,
        }
    }
}

impl<T> StepBuf<T> {
    /// Builds a buffer from already-flat row-major data. Panics if `data.len()
    /// != width * height` — this is a programmer-error precondition, not a
    /// recoverable `BicosError`, since it only ever fires from within this
    /// crate's own dispatch code.
    pub fn from_vec(data: Vec<T>, width: usize, height: usize) -> Self {
        assert_eq!(data.len(), width * height, "StepBuf size mismatch");
        StepBuf {
            data,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn row(&self, r: usize) -> &[T] {
        let start = r * self.width;
        &self.data[start..start + self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, r: usize) -> &mut [T] {
        let start = r * self.width;
        &mut self.data[start..start + self.width]
    }

    /// Splits the buffer into contiguous per-row-band mutable slices, one
    /// per band, for row-parallel writers. `band_rows` is the number of
    /// logical rows represented by each chunk (the last chunk may be
    /// shorter).
    #[inline]
    pub fn par_row_bands_mut(&mut self, band_rows: usize) -> rayon::slice::ChunksMut<'_, T>
    where
        T: Send,
    {
        use rayon::prelude::*;
        self.data.par_chunks_mut(band_rows * self.width)
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_access_matches_flat_index() {
        let buf = StepBuf::from_vec((0..12).collect(), 4, 3);
        assert_eq!(buf.row(0), &[0, 1, 2, 3]);
        assert_eq!(buf.row(1), &[4, 5, 6, 7]);
        assert_eq!(buf.row(2), &[8, 9, 10, 11]);
    }

    #[test]
    fn filled_has_requested_shape() {
        let buf = StepBuf::filled(5, 2, -1i16);
        assert_eq!(buf.width(), 5);
        assert_eq!(buf.height(), 2);
        assert!(buf.as_slice().iter().all(|&v| v == -1));
    }

    #[test]
    #[should_panic(expected = "StepBuf size mismatch")]
    fn from_vec_rejects_wrong_length() {
        let _ = StepBuf::from_vec(vec![0u8; 5], 2, 3);
    }
}
