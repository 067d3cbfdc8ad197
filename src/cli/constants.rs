//! CLI constants and the display-level infrastructure.
//!
//! Keeps the same shape as the teacher's `lz4cli.c` port: a crate-level
//! atomic verbosity level plus a small family of `displaylevel!`-style
//! macros, so CLI code prints through one funnel instead of scattering bare
//! `eprintln!` calls.

use std::sync::atomic::{AtomicU32, Ordering};

pub const PROGRAM_NAME: &str = "bicos";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `0` = silent, `1` = errors only, `2` = normal (default), `3` = verbose,
/// `4` = debug.
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Conditionally print to stderr at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_level_round_trips() {
        let prev = display_level();
        set_display_level(3);
        assert_eq!(display_level(), 3);
        set_display_level(prev);
    }
}
