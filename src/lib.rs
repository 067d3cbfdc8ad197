//! Binary Correspondence Search: dense stereo disparity from multishot
//! image stacks (§1).
//!
//! The entry point is [`match_stereo`]. Everything else in this crate
//! supports its four stages: bit-budget selection ([`config`]),
//! descriptor transform ([`descriptor`]), BICOS search ([`bicos`]), and
//! NXC agreement ([`agree`]).

pub mod agree;
pub mod bicos;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod matcher;
pub mod stepbuf;
pub mod threadpool;
pub mod types;
pub mod util;

pub use config::{Config, DescriptorWidth, SearchVariant, TransformMode};
pub use error::{BicosError, Result};
pub use matcher::match_stereo;
pub use stepbuf::StepBuf;
pub use types::{
    CorrMap, DispMap, FloatDispMap, InputStack, IntDispMap, Pixel, INVALID_DISP, INVALID_DISP_F,
};
