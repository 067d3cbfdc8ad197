//! Bit-budget selection and the public configuration surface — §4.1, §6.

use crate::error::{BicosError, Result};

/// Descriptor transform schedule. §4.2. `LIMITED` is the cheaper default
/// (fewer bits, skips the FULL-only non-adjacent comparisons).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformMode {
    /// All pairwise comparisons, not just adjacent ones.
    Full,
    /// Pairwise-monotonic + mean-crossing + closing bits only.
    #[default]
    Limited,
}

/// BICOS search variant (§4.3): whether left-right consistency is enforced
/// and whether ambiguous (duplicate-minimum) matches are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchVariant {
    /// Single forward pass. `no_dupes` rejects any pixel whose forward
    /// argmin is not unique.
    NoConsistency { no_dupes: bool },
    /// Forward + reverse pass; a match survives only if the round trip
    /// closes within `max_lr_diff` columns (and, if `no_dupes`, both
    /// directions have a unique argmin).
    Consistency { max_lr_diff: u16, no_dupes: bool },
}

impl SearchVariant {
    #[inline]
    pub fn no_dupes(&self) -> bool {
        match self {
            SearchVariant::NoConsistency { no_dupes } => *no_dupes,
            SearchVariant::Consistency { no_dupes, .. } => *no_dupes,
        }
    }

    #[inline]
    pub fn is_consistency(&self) -> bool {
        matches!(self, SearchVariant::Consistency { .. })
    }
}

/// Full set of options recognised by [`crate::matcher::match_stereo`] (§6).
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: TransformMode,
    pub variant: SearchVariant,
    /// NXC agreement threshold in `[-1, 1]`. `None` disables stage 4 entirely.
    pub nxcorr_threshold: Option<f32>,
    /// Subpixel step in `(0, 1]`. Requires `nxcorr_threshold` to be set.
    pub subpixel_step: Option<f32>,
    /// Minimum per-channel `Σ(x-x̄)² / N` required to keep a pixel.
    pub min_variance: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: TransformMode::default(),
            variant: SearchVariant::NoConsistency { no_dupes: true },
            nxcorr_threshold: None,
            subpixel_step: None,
            min_variance: None,
        }
    }
}

impl Config {
    /// Validates the floating-point ranges in §6 (`nxcorr_threshold` in
    /// `[-1, 1]`, `subpixel_step` in `(0, 1]` and requires
    /// `nxcorr_threshold`, `min_variance >= 0`).
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(t) = self.nxcorr_threshold {
            if !(-1.0..=1.0).contains(&t) {
                return Err(BicosError::invalid_input(format!(
                    "nxcorr_threshold {t} out of range [-1, 1]"
                )));
            }
        }
        if let Some(s) = self.subpixel_step {
            if self.nxcorr_threshold.is_none() {
                return Err(BicosError::invalid_input(
                    "subpixel_step requires nxcorr_threshold to be set",
                ));
            }
            if !(s > 0.0 && s <= 1.0) {
                return Err(BicosError::invalid_input(format!(
                    "subpixel_step {s} out of range (0, 1]"
                )));
            }
        }
        if let Some(v) = self.min_variance {
            if v < 0.0 {
                return Err(BicosError::invalid_input(format!(
                    "min_variance {v} must be >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Descriptor bit width, one of the three monomorphic pipelines (§4.1, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorWidth {
    W32,
    W64,
    W128,
}

/// Required descriptor bit count for a stack of length `n` under `mode`
/// (§4.1). `FULL -> n^2 - 2n + 3`, `LIMITED -> 4n - 7`.
pub fn required_bits(n: usize, mode: TransformMode) -> i64 {
    let n = n as i64;
    match mode {
        TransformMode::Full => n * n - 2 * n + 3,
        TransformMode::Limited => 4 * n - 7,
    }
}

/// Selects the smallest descriptor width in `{32, 64, 128}` that can hold
/// `required_bits(n, mode)` bits, or fails if none can (`InvalidInput`,
/// §4.1: "If required > 128, the call fails").
pub fn descriptor_width(n: usize, mode: TransformMode) -> Result<DescriptorWidth> {
    let required = required_bits(n, mode);
    if required <= 32 {
        Ok(DescriptorWidth::W32)
    } else if required <= 64 {
        Ok(DescriptorWidth::W64)
    } else if required <= 128 {
        Ok(DescriptorWidth::W128)
    } else {
        Err(BicosError::invalid_input(format!(
            "input stacks too large, would require {required} bits"
        )))
    }
}
