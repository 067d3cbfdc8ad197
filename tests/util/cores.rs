// Integration tests for util/cores.rs — logical CPU core count.

use bicos::util::count_cores;

#[test]
fn count_cores_returns_at_least_one() {
    assert!(count_cores() >= 1, "count_cores() must be >= 1");
}

#[test]
fn count_cores_returns_reasonable_upper_bound() {
    let cores = count_cores();
    assert!(
        cores <= 65536,
        "count_cores() returned suspiciously large value: {cores}"
    );
}

#[test]
fn count_cores_is_deterministic() {
    let first = count_cores();
    let second = count_cores();
    assert_eq!(
        first, second,
        "count_cores() must return the same value on repeated calls"
    );
}

#[test]
fn count_cores_return_type_is_nonzero() {
    let cores = count_cores();
    assert_ne!(cores, 0, "count_cores() must never return 0");
}
