//! Command-line interface for the `bicos` binary.

pub mod arg_utils;
pub mod args;
pub mod constants;
pub mod help;
pub mod sequence;
