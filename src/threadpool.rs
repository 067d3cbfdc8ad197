//! Worker-count resolution for the row-parallel pipeline stages.
//!
//! The library core ([`crate::descriptor::transform_stack`],
//! [`crate::bicos::bicos_search`], [`crate::agree::agree`]) parallelizes by
//! handing rayon a `StepBuf` row-band iterator and never builds a thread
//! pool itself — everything runs on rayon's global pool, sized once by the
//! CLI at startup (§5: "thread count is a process-wide setting, not a
//! per-call parameter"). This module only resolves the `-j/--jobs` CLI
//! value into a concrete count and installs it as rayon's global pool.

use crate::util::count_cores;

/// Resolves a user-supplied `--jobs` value into a thread count: `None` or
/// `Some(0)` defer to the number of logical cores, matching the teacher's
/// `-T0` "auto-detect" convention.
pub fn resolve_num_threads(requested: Option<usize>) -> usize {
    match requested {
        Some(n) if n > 0 => n,
        _ => count_cores(),
    }
}

/// Installs `num_threads` as rayon's global thread pool size. Must be
/// called at most once per process, before any rayon parallel work runs;
/// a second call (or any parallel call beforehand) returns `Err` because
/// the global pool is already initialized. The CLI treats that as
/// non-fatal — it just means rayon picked its own default in the
/// meantime.
pub fn install_global_pool(num_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_or_none_resolves_to_at_least_one() {
        assert!(resolve_num_threads(None) >= 1);
        assert!(resolve_num_threads(Some(0)) >= 1);
    }

    #[test]
    fn explicit_value_is_passed_through() {
        assert_eq!(resolve_num_threads(Some(4)), 4);
    }
}
