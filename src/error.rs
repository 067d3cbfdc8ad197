//! Error taxonomy for the correspondence engine.
//!
//! Migrated in spirit from `Lz4Error` (`block/compress.rs`): a small, plain
//! enum rather than a `thiserror`-derived tree, since the library core has
//! exactly two failure kinds and no downstream crate needs to match on more
//! than that (§7: "the taxonomy is deliberately narrow").

use std::fmt;

/// Errors returned at the `match_stereo` call boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BicosError {
    /// A precondition on the caller-supplied stacks or config was violated:
    /// stack length < 2, mismatched size/depth between views, or a bit
    /// budget that exceeds 128 bits for the requested `(n, mode)`.
    InvalidInput(String),
    /// An internal invariant was violated. Should never fire in a release
    /// build; indicates a bug in the descriptor schedule or dispatch logic
    /// rather than anything the caller did.
    InternalError(String),
}

impl fmt::Display for BicosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BicosError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            BicosError::InternalError(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for BicosError {}

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, BicosError>;

impl BicosError {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        BicosError::InvalidInput(msg.into())
    }

    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        BicosError::InternalError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_each_variant() {
        assert_eq!(
            BicosError::invalid_input("bad size").to_string(),
            "invalid input: bad size"
        );
        assert_eq!(
            BicosError::internal("width mismatch").to_string(),
            "internal error: width mismatch"
        );
    }
}
