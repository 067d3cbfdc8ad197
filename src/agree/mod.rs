//! NXC agreement stage — §4.4.
//!
//! Rescores every surviving BICOS match by normalized cross-correlation of
//! the two cameras' raw temporal sequences (not their bit descriptors),
//! rejecting matches whose correlation falls below a threshold or whose
//! local variance is too low to trust (a uniformly lit patch can correlate
//! perfectly by accident). Optional subpixel refinement runs last.

pub mod subpixel;

use rayon::prelude::*;

use crate::types::{CorrMap, FloatDispMap, InputStack, IntDispMap, Pixel, INVALID_DISP, INVALID_DISP_F};

fn correlation_and_variances(left: &[f32], right: &[f32]) -> (f32, f32, f32) {
    let n = left.len() as f32;
    let lmean = left.iter().sum::<f32>() / n;
    let rmean = right.iter().sum::<f32>() / n;

    let mut cov = 0.0f32;
    let mut lvar = 0.0f32;
    let mut rvar = 0.0f32;
    for k in 0..left.len() {
        let dl = left[k] - lmean;
        let dr = right[k] - rmean;
        cov += dl * dr;
        lvar += dl * dl;
        rvar += dr * dr;
    }

    let denom = (lvar * rvar).sqrt();
    let corr = if denom > 0.0 { cov / denom } else { 0.0 };
    (corr, lvar / n, rvar / n)
}

/// Runs NXC agreement over every valid entry of `disparities`. A disparity
/// survives only if its implied right-image column lies in bounds, its
/// correlation is `>= threshold`, and (when `min_variance` is set) neither
/// sequence is too flat to trust. Rejected and already-invalid pixels read
/// [`INVALID_DISP`] / `0.0` in the returned maps.
pub fn agree<P: Pixel>(
    left: &InputStack<P>,
    right: &InputStack<P>,
    disparities: &IntDispMap,
    threshold: f32,
    min_variance: Option<f32>,
) -> (IntDispMap, CorrMap) {
    let width = left.width();
    let height = left.height();
    let n = left.n();

    let mut out_disp = IntDispMap::filled(width, height, INVALID_DISP);
    let mut out_corr = CorrMap::filled(width, height, 0.0);

    out_disp
        .par_row_bands_mut(1)
        .zip(out_corr.par_row_bands_mut(1))
        .enumerate()
        .for_each(|(row, (disp_row, corr_row))| {
            let mut lseq = vec![0.0f32; n];
            let mut rseq = vec![0.0f32; n];
            let mut lraw: Vec<P> = vec![left.pixel(0, row, 0); n];
            let mut rraw: Vec<P> = vec![right.pixel(0, row, 0); n];

            for col0 in 0..width {
                let d = disparities.row(row)[col0];
                if d == INVALID_DISP {
                    continue;
                }
                let col1 = col0 as i64 - d as i64;
                if col1 < 0 || col1 as usize >= right.width() {
                    continue;
                }
                let col1 = col1 as usize;

                left.temporal_sequence(row, col0, &mut lraw);
                right.temporal_sequence(row, col1, &mut rraw);
                for k in 0..n {
                    lseq[k] = lraw[k].to_f32();
                    rseq[k] = rraw[k].to_f32();
                }

                let (corr, lvar, rvar) = correlation_and_variances(&lseq, &rseq);
                if let Some(min_var) = min_variance {
                    if lvar < min_var || rvar < min_var {
                        continue;
                    }
                }
                if corr < threshold {
                    continue;
                }

                disp_row[col0] = d;
                corr_row[col0] = corr;
            }
        });

    (out_disp, out_corr)
}

/// Runs subpixel agreement (§4.4's `agree_subpixel`) directly on the raw
/// BICOS integer disparities. This is the subpixel counterpart to
/// [`agree`], not a second pass layered on top of it — when
/// `cfg.subpixel_step` is set the two are mutually exclusive
/// (`original_source/src/impl/cpu.cpp:70-76`), since rejecting a pixel on
/// its unrefined δ=0 correlation before refinement ever runs would throw
/// away matches whose refined peak correlation clears `threshold`.
///
/// Variance and threshold rejection (§4.4 rules 1-2) are both applied
/// against the refined peak pair, not the unrefined one; `min_variance`
/// carries the same semantics as in [`agree`]. Pixels already invalid
/// stay `f32::NAN` / `0.0`.
pub fn refine<P: Pixel>(
    left: &InputStack<P>,
    right: &InputStack<P>,
    disparities: &IntDispMap,
    step: f32,
    threshold: f32,
    min_variance: Option<f32>,
) -> (FloatDispMap, CorrMap) {
    let width = left.width();
    let height = left.height();
    let mut out_disp = FloatDispMap::filled(width, height, INVALID_DISP_F);
    let mut out_corr = CorrMap::filled(width, height, 0.0);

    out_disp
        .par_row_bands_mut(1)
        .zip(out_corr.par_row_bands_mut(1))
        .enumerate()
        .for_each(|(row, (disp_row, corr_row))| {
            for col0 in 0..width {
                let d = disparities.row(row)[col0];
                if d == INVALID_DISP {
                    continue;
                }
                let (refined, corr) =
                    subpixel::refine_disparity(left, right, row, col0, d, step, threshold, min_variance);
                disp_row[col0] = refined;
                corr_row[col0] = corr;
            }
        });

    (out_disp, out_corr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stepbuf::StepBuf;

    /// One-row stack where column `c`'s temporal sequence is the constant
    /// `c * 10` across all `n` frames — zero variance, distinct per column.
    fn constant_per_column_stack(n: usize, width: usize) -> InputStack<u8> {
        let frames: Vec<Vec<u8>> = (0..n)
            .map(|_| (0..width).map(|c| (c * 10) as u8).collect())
            .collect();
        InputStack::new(frames, width, 1).unwrap()
    }

    fn zero_disparities(width: usize) -> IntDispMap {
        StepBuf::filled(width, 1, 0i16)
    }

    #[test]
    fn rejects_zero_variance_pixels_under_min_variance() {
        // S5: constant-per-pixel stacks, both views identical, so every
        // integer disparity of 0 would otherwise survive — min_variance
        // must reject all of them.
        let stack = constant_per_column_stack(8, 4);
        let disp = zero_disparities(4);
        let (out_disp, out_corr) = agree(&stack, &stack, &disp, -1.0, Some(1e-3));
        assert!(out_disp.as_slice().iter().all(|&d| d == INVALID_DISP));
        assert!(out_corr.as_slice().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn rejects_anticorrelated_pixels_below_threshold() {
        let n = 6;
        let width = 3;
        let left_frames: Vec<Vec<u8>> = (0..n).map(|k| vec![(k * 10) as u8; width]).collect();
        let right_frames: Vec<Vec<u8>> =
            (0..n).map(|k| vec![((n - 1 - k) * 10) as u8; width]).collect();
        let left = InputStack::new(left_frames, width, 1).unwrap();
        let right = InputStack::new(right_frames, width, 1).unwrap();
        let disp = zero_disparities(width);

        let (out_disp, out_corr) = agree(&left, &right, &disp, 0.0, None);
        assert!(out_disp.as_slice().iter().all(|&d| d == INVALID_DISP));
        assert!(out_corr.as_slice().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn accepts_perfectly_correlated_match_and_records_correlation() {
        let n = 6;
        let width = 3;
        let frames: Vec<Vec<u8>> = (0..n).map(|k| vec![(k * 10) as u8; width]).collect();
        let stack = InputStack::new(frames, width, 1).unwrap();
        let disp = zero_disparities(width);

        let (out_disp, out_corr) = agree(&stack, &stack, &disp, 0.99, None);
        for col in 0..width {
            assert_eq!(out_disp.row(0)[col], 0);
            assert!((out_corr.row(0)[col] - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn invalid_disparity_input_stays_invalid() {
        let stack = constant_per_column_stack(4, 3);
        let mut disp = zero_disparities(3);
        disp.row_mut(0)[1] = INVALID_DISP;

        let (out_disp, out_corr) = agree(&stack, &stack, &disp, -1.0, None);
        assert_eq!(out_disp.row(0)[1], INVALID_DISP);
        assert_eq!(out_corr.row(0)[1], 0.0);
    }

    #[test]
    fn out_of_bounds_implied_column_is_rejected() {
        let n = 4;
        let width = 3;
        let frames: Vec<Vec<u8>> = (0..n).map(|k| vec![(k * 5) as u8; width]).collect();
        let stack = InputStack::new(frames, width, 1).unwrap();
        let mut disp = zero_disparities(width);
        // col0 - d must land outside [0, width) to be rejected.
        disp.row_mut(0)[0] = -10;

        let (out_disp, _) = agree(&stack, &stack, &disp, -1.0, None);
        assert_eq!(out_disp.row(0)[0], INVALID_DISP);
    }
}
