//! Subpixel refinement — §4.4.
//!
//! The integer disparity only ever compares whole columns, so the true
//! correspondence can sit anywhere within one column of it. This scans a
//! grid of offsets `δ ∈ {-1+s, -1+2s, ..., 1-s}` around the integer match,
//! each sampled by linearly interpolating the right stack's temporal
//! sequence between its two neighboring columns, and picks whichever `δ`
//! maximises correlation. A parabola through that peak and its two
//! immediate neighbors on the grid gives the final subpixel vertex.
//!
//! This stage is mutually exclusive with plain integer [`super::agree`]
//! (`original_source/src/impl/cpu.cpp:70-76`: `if (step) agree_subpixel(...)
//! else agree(...)`), not a second pass layered on top of it — variance
//! and threshold rejection both run against the refined peak pair here,
//! never against the unrefined δ=0 pair.
//!
//! Open question (§9), resolved: if the best `δ` falls at either end of
//! the scanned grid (no neighbor on one side) or either neighboring
//! sample would read outside the right image, the three-point fit is
//! undefined — refinement falls back to the unrefined integer disparity.
//! The same `nxcorr_threshold` used by integer agreement is applied to
//! the peak correlation in both cases; a pixel whose best achievable
//! subpixel correlation still falls short is rejected outright rather
//! than kept at its (equally unconvincing) integer disparity.

use crate::types::{InputStack, Pixel};

/// Linearly interpolates the temporal sequence of `stack` at row `row`,
/// fractional column `col`, into `out`. Returns `false` (leaving `out`
/// untouched) if either neighboring integer column is out of bounds.
fn sample_sequence_at<P: Pixel>(stack: &InputStack<P>, row: usize, col: f32, out: &mut [f32]) -> bool {
    if col < 0.0 {
        return false;
    }
    let lo = col.floor() as i64;
    let hi = lo + 1;
    if lo < 0 || hi as usize >= stack.width() {
        return false;
    }
    let frac = col - lo as f32;
    let (lo, hi) = (lo as usize, hi as usize);
    for k in 0..stack.n() {
        let a = stack.pixel(k, row, lo).to_f32();
        let b = stack.pixel(k, row, hi).to_f32();
        out[k] = a + (b - a) * frac;
    }
    true
}

/// Correlation and (normalized) variances of two equal-length sequences,
/// mirroring [`super::correlation_and_variances`] — duplicated here rather
/// than shared because the grid scan needs `lvar` computed once outside
/// the per-`δ` loop while `rvar` varies per sample.
fn correlation_and_variance(left: &[f32], right: &[f32]) -> (f32, f32, f32) {
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

/// The `δ` grid from §4.4: every multiple of `step` strictly inside
/// `(-1, 1)`, in ascending order. `step` is in `(0, 1]` by construction
/// (`Config::validate`), so this always terminates.
fn delta_grid(step: f32) -> Vec<f32> {
    let mut deltas = Vec::new();
    let mut k = 1i32;
    loop {
        let delta = -1.0 + k as f32 * step;
        if delta >= 1.0 - 1e-4 {
            break;
        }
        deltas.push(delta);
        k += 1;
    }
    deltas
}

/// Refines one pixel's integer disparity `d` to subpixel precision,
/// performing the full agreement responsibilities — variance rejection,
/// threshold rejection, correlation reporting — against the refined peak
/// pair (§4.4's "agree_subpixel", not a second pass over `agree`'s output).
///
/// `col0` is the left column, `row` the shared row, `step` the sampling
/// offset (`Config::subpixel_step`, in `(0, 1]`), `threshold` the NXC
/// agreement threshold, `min_variance` the optional per-channel
/// `Σ(x-x̄)²/N` floor (§4.4 rule 1).
///
/// Returns `(disparity, correlation)`. On rejection (low variance, no
/// sample in bounds, or peak correlation below `threshold`) returns
/// `(NAN, 0.0)`, matching [`super::agree`]'s sentinel convention. When the
/// peak lies at the edge of the scanned grid, or a neighboring sample
/// falls outside the image, the parabola fit is undefined and the
/// unrefined integer disparity `d` is reported instead (still subject to
/// the same variance/threshold checks at that peak).
pub fn refine_disparity<P: Pixel>(
    left: &InputStack<P>,
    right: &InputStack<P>,
    row: usize,
    col0: usize,
    d: i16,
    step: f32,
    threshold: f32,
    min_variance: Option<f32>,
) -> (f32, f32) {
    const REJECT: (f32, f32) = (f32::NAN, 0.0);

    let n = left.n();
    let mut lseq = vec![0.0f32; n];
    left.temporal_sequence(row, col0, &mut lseq);
    let lvar = {
        let lmean = lseq.iter().sum::<f32>() / n as f32;
        lseq.iter().map(|&v| (v - lmean) * (v - lmean)).sum::<f32>() / n as f32
    };

    let col1 = col0 as f32 - d as f32;
    let deltas = delta_grid(step);

    let mut rbuf = vec![0.0f32; n];
    let samples: Vec<Option<(f32, f32)>> = deltas
        .iter()
        .map(|&delta| {
            if sample_sequence_at(right, row, col1 + delta, &mut rbuf) {
                Some(correlation_and_variance(&lseq, &rbuf))
            } else {
                None
            }
        })
        .map(|s| s.map(|(corr, _lvar, rvar)| (corr, rvar)))
        .collect();

    let best = samples
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.map(|(corr, rvar)| (i, corr, rvar)))
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

    let Some((best_idx, best_corr, best_rvar)) = best else {
        return REJECT;
    };

    let passes_agreement = |corr: f32, rvar: f32| -> bool {
        if let Some(min_var) = min_variance {
            if lvar < min_var || rvar < min_var {
                return false;
            }
        }
        corr >= threshold
    };

    // Undefined at the grid's edges, or if a neighbor fell off the image.
    let neighbors = if best_idx == 0 || best_idx + 1 == samples.len() {
        None
    } else {
        match (samples[best_idx - 1], samples[best_idx + 1]) {
            (Some(lo), Some(hi)) => Some((lo.0, hi.0)),
            _ => None,
        }
    };

    let Some((c_lo, c_hi)) = neighbors else {
        return if passes_agreement(best_corr, best_rvar) {
            (d as f32, best_corr)
        } else {
            REJECT
        };
    };

    let best_delta = deltas[best_idx];
    let denom = c_lo - 2.0 * best_corr + c_hi;
    if denom.abs() < f32::EPSILON {
        return if passes_agreement(best_corr, best_rvar) {
            (d as f32, best_corr)
        } else {
            REJECT
        };
    }

    if !passes_agreement(best_corr, best_rvar) {
        return REJECT;
    }

    let vertex = 0.5 * (c_lo - c_hi) / denom * step;
    // A parabola fit through noisy samples can suggest moving further than
    // one grid step; that is never plausible between two adjacent samples.
    let vertex = vertex.clamp(-step, step);

    (d as f32 - (best_delta + vertex), best_corr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_stack(n: usize, width: usize) -> InputStack<u8> {
        let mut frames = Vec::with_capacity(n);
        for k in 0..n {
            let row: Vec<u8> = (0..width).map(|c| ((c * 10 + k) % 256) as u8).collect();
            frames.push(row);
        }
        InputStack::new(frames, width, 1).unwrap()
    }

    #[test]
    fn falls_back_to_integer_at_image_border() {
        let left = ramp_stack(4, 8);
        let right = ramp_stack(4, 8);
        // col0=0, d=0 -> col1=0: every negative delta samples off the left
        // edge, so only non-negative deltas are reachable; the grid's
        // lowest reachable sample (delta=0) still has no left neighbor.
        let (refined, _corr) = refine_disparity(&left, &right, 0, 0, 0, 0.5, -1.0, None);
        assert_eq!(refined, 0.0);
    }

    #[test]
    fn exact_match_refines_near_integer() {
        let left = ramp_stack(4, 8);
        let right = ramp_stack(4, 8);
        let (refined, corr) = refine_disparity(&left, &right, 0, 4, 0, 0.5, -1.0, None);
        assert!((refined - 0.0).abs() < 0.5);
        assert!((corr - 1.0).abs() < 1e-3);
    }

    #[test]
    fn recovers_half_pixel_offset_via_resampling() {
        // True disparity is 7.5: right is left resampled at half-integer
        // columns, i.e. right[c] = left[c + 7.5] via linear interpolation.
        let n = 6;
        let width = 32;
        let mut left_frames = Vec::with_capacity(n);
        let mut right_frames = Vec::with_capacity(n);
        for k in 0..n {
            let left_row: Vec<u8> = (0..width)
                .map(|c| (((c * 9 + k * 37) % 251) as u8))
                .collect();
            let mut right_row = vec![0u8; width];
            for c in 0..width {
                let src = c as f32 + 7.5;
                let lo = src.floor() as usize;
                let hi = lo + 1;
                if hi < width {
                    let frac = src - lo as f32;
                    let a = left_row[lo] as f32;
                    let b = left_row[hi] as f32;
                    right_row[c] = (a + (b - a) * frac).round() as u8;
                }
            }
            left_frames.push(left_row);
            right_frames.push(right_row);
        }
        let left = InputStack::new(left_frames, width, 1).unwrap();
        let right = InputStack::new(right_frames, width, 1).unwrap();

        // Integer search would land on d=7 or d=8; either way subpixel
        // refinement should pull the result close to 7.5.
        for &d in &[7i16, 8i16] {
            let col0 = 20usize;
            let (refined, _corr) = refine_disparity(&left, &right, 0, col0, d, 0.25, -1.0, None);
            assert!(
                (refined - 7.5).abs() <= 0.5,
                "d={d} refined to {refined}, expected near 7.5"
            );
        }
    }

    #[test]
    fn rejects_peak_below_threshold() {
        let left = ramp_stack(4, 8);
        let right = ramp_stack(4, 8);
        let (refined, corr) = refine_disparity(&left, &right, 0, 4, 0, 0.5, 2.0, None);
        assert!(refined.is_nan());
        assert_eq!(corr, 0.0);
    }

    #[test]
    fn rejects_low_variance_even_when_correlation_passes() {
        // Constant sequences correlate as 0.0 (by convention) and have
        // zero variance; min_variance must reject them regardless of the
        // (permissive, below-zero) threshold.
        let n = 6;
        let width = 8;
        let frames: Vec<Vec<u8>> = (0..n).map(|_| vec![42u8; width]).collect();
        let left = InputStack::new(frames.clone(), width, 1).unwrap();
        let right = InputStack::new(frames, width, 1).unwrap();
        let (refined, corr) = refine_disparity(&left, &right, 0, 4, 0, 0.5, -1.0, Some(1e-3));
        assert!(refined.is_nan());
        assert_eq!(corr, 0.0);
    }
}
