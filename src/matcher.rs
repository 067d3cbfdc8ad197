//! Top-level entry point — §6 `match_stereo`.
//!
//! Ties the three pipeline stages together and picks the concrete
//! descriptor width at runtime (§4.1, §9: "three monomorphic instantiations
//! rather than one generic bignum path").

use crate::agree;
use crate::bicos::bicos_search;
use crate::config::{Config, DescriptorWidth};
use crate::descriptor::{transform_stack, Desc128, Descriptor};
use crate::error::{BicosError, Result};
use crate::types::{CorrMap, DispMap, InputStack, Pixel};

/// Computes dense stereo disparity between two calibrated, rectified,
/// equal-length image stacks (§1, §6).
///
/// Returns the disparity map (integer, or subpixel-refined float if
/// `cfg.subpixel_step` is set) and, when NXC agreement ran, the
/// correlation at every surviving pixel.
pub fn match_stereo<P: Pixel>(
    left: &InputStack<P>,
    right: &InputStack<P>,
    cfg: &Config,
) -> Result<(DispMap, Option<CorrMap>)> {
    left.ensure_compatible(right)?;
    cfg.validate()?;

    match crate::config::descriptor_width(left.n(), cfg.mode)? {
        DescriptorWidth::W32 => run_pipeline::<P, u32>(left, right, cfg),
        DescriptorWidth::W64 => run_pipeline::<P, u64>(left, right, cfg),
        DescriptorWidth::W128 => run_pipeline::<P, Desc128>(left, right, cfg),
    }
}

fn run_pipeline<P: Pixel, D: Descriptor>(
    left: &InputStack<P>,
    right: &InputStack<P>,
    cfg: &Config,
) -> Result<(DispMap, Option<CorrMap>)> {
    let required = crate::config::required_bits(left.n(), cfg.mode);
    if required as usize > D::BITS {
        // descriptor_width picked D for this (n, mode); if it doesn't
        // actually fit, the dispatch table above and required_bits have
        // drifted out of sync with each other.
        return Err(BicosError::internal(format!(
            "descriptor width {} cannot hold {required} required bits",
            D::BITS
        )));
    }

    let left_desc = transform_stack::<P, D>(left, cfg.mode);
    let right_desc = transform_stack::<P, D>(right, cfg.mode);

    let disparities = bicos_search(&left_desc, &right_desc, cfg.variant);

    // §4.4 / `original_source/src/impl/cpu.cpp:70-76`: subpixel agreement
    // and integer agreement are mutually exclusive passes over the raw
    // BICOS output, not sequential stages — `refine` performs its own
    // variance and threshold rejection against the refined peak pair, so
    // `agree` must never run first and filter on the unrefined δ=0 pair.
    let (disp_map, corr) = match (cfg.nxcorr_threshold, cfg.subpixel_step) {
        (Some(threshold), Some(step)) => {
            let (disp, corr) = agree::refine(left, right, &disparities, step, threshold, cfg.min_variance);
            (DispMap::Float(disp), Some(corr))
        }
        (Some(threshold), None) => {
            let (disp, corr) = agree::agree(left, right, &disparities, threshold, cfg.min_variance);
            (DispMap::Int(disp), Some(corr))
        }
        (None, _) => (DispMap::Int(disparities), None),
    };

    Ok((disp_map, corr))
}
