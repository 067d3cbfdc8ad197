//! E2E test suite: the full `match_stereo` pipeline, black-box from two
//! synthetic `InputStack`s through to the returned disparity map.
//!
//! Unlike the per-module unit tests under `src/`, these exercise the
//! public crate API exactly as an external caller would: through
//! `bicos::match_stereo` with a `bicos::Config`, never reaching into a
//! private module.

use bicos::{Config, DispMap, InputStack, SearchVariant, TransformMode};

/// Builds a stereo pair of `n`-frame, `width x height` stacks where every
/// column in `left` has an exact match `shift` columns to its left in
/// `right` (when in bounds).
fn shifted_stacks(
    n: usize,
    width: usize,
    height: usize,
    shift: i64,
) -> (InputStack<u8>, InputStack<u8>) {
    let mut left_frames = Vec::with_capacity(n);
    let mut right_frames = Vec::with_capacity(n);
    for k in 0..n {
        let mut l = vec![0u8; width * height];
        let mut r = vec![0u8; width * height];
        for row in 0..height {
            for col in 0..width {
                let v = (((row * width + col) * 11 + k * 7 + 3) % 251) as u8;
                l[row * width + col] = v;
                let rc = col as i64 - shift;
                if rc >= 0 && (rc as usize) < width {
                    r[row * width + rc as usize] = v;
                }
            }
        }
        left_frames.push(l);
        right_frames.push(r);
    }
    (
        InputStack::new(left_frames, width, height).unwrap(),
        InputStack::new(right_frames, width, height).unwrap(),
    )
}

#[test]
fn recovers_constant_shift_with_limited_mode() {
    let (left, right) = shifted_stacks(6, 24, 6, 3);
    let cfg = Config {
        mode: TransformMode::Limited,
        variant: SearchVariant::NoConsistency { no_dupes: false },
        ..Config::default()
    };

    let (disp, corr) = bicos::match_stereo(&left, &right, &cfg).unwrap();
    assert!(corr.is_none(), "no threshold set, agreement should not run");

    let map = match disp {
        DispMap::Int(m) => m,
        DispMap::Float(_) => panic!("expected an integer disparity map"),
    };

    // Interior columns (far enough from the left border that the shifted
    // source column stays in bounds) should recover the exact shift.
    for col in 4..24 {
        assert_eq!(map.row(0)[col], 3, "column {col} should report disparity 3");
    }
}

#[test]
fn recovers_constant_shift_with_full_mode() {
    let (left, right) = shifted_stacks(5, 20, 4, 2);
    let cfg = Config {
        mode: TransformMode::Full,
        variant: SearchVariant::NoConsistency { no_dupes: false },
        ..Config::default()
    };

    let (disp, _corr) = bicos::match_stereo(&left, &right, &cfg).unwrap();
    let map = match disp {
        DispMap::Int(m) => m,
        DispMap::Float(_) => panic!("expected an integer disparity map"),
    };
    for col in 3..20 {
        assert_eq!(map.row(0)[col], 2);
    }
}

#[test]
fn agreement_rejects_low_correlation_and_subpixel_refines_the_rest() {
    let (left, right) = shifted_stacks(8, 32, 4, 4);
    let cfg = Config {
        mode: TransformMode::Limited,
        variant: SearchVariant::NoConsistency { no_dupes: false },
        nxcorr_threshold: Some(0.9),
        subpixel_step: Some(0.5),
        min_variance: None,
    };

    let (disp, corr) = bicos::match_stereo(&left, &right, &cfg).unwrap();
    let corr = corr.expect("agreement ran, correlation map must be returned");
    assert_eq!(corr.width(), 32);

    let map = match disp {
        DispMap::Float(m) => m,
        DispMap::Int(_) => panic!("subpixel_step was set, expected a float disparity map"),
    };

    // Every interior pixel that survived NXC agreement should refine to
    // something close to the true integer shift (4), not drift wildly.
    for col in 6..32 {
        let d = map.row(0)[col];
        if !d.is_nan() {
            assert!((d - 4.0).abs() <= 1.0, "column {col} refined to {d}, expected near 4.0");
        }
    }
}

#[test]
fn consistency_check_rejects_borders_with_no_round_trip() {
    let (left, right) = shifted_stacks(6, 16, 3, 5);
    let cfg = Config {
        mode: TransformMode::Limited,
        variant: SearchVariant::Consistency {
            max_lr_diff: 0,
            no_dupes: true,
        },
        ..Config::default()
    };

    let (disp, _) = bicos::match_stereo(&left, &right, &cfg).unwrap();
    let map = match disp {
        DispMap::Int(m) => m,
        DispMap::Float(_) => panic!("expected integer disparity map"),
    };
    // Columns 0..5 have no valid right-image source column at all (the
    // shifted column falls out of bounds) so they must stay invalid.
    for col in 0..5 {
        assert_eq!(map.row(0)[col], bicos::INVALID_DISP);
    }
}

#[test]
fn rejects_stacks_with_mismatched_dimensions() {
    let (left, _) = shifted_stacks(6, 16, 4, 0);
    let (_, right) = shifted_stacks(6, 12, 4, 0);
    let cfg = Config::default();
    assert!(bicos::match_stereo(&left, &right, &cfg).is_err());
}

#[test]
fn large_stack_selects_wider_descriptor_without_panicking() {
    // n=18 under LIMITED requires 65 bits (config::required_bits), which
    // crosses into the 128-bit descriptor pipeline.
    let (left, right) = shifted_stacks(18, 20, 3, 1);
    let cfg = Config {
        mode: TransformMode::Limited,
        variant: SearchVariant::NoConsistency { no_dupes: false },
        ..Config::default()
    };
    let (disp, _) = bicos::match_stereo(&left, &right, &cfg).unwrap();
    match disp {
        DispMap::Int(m) => assert_eq!(m.width(), 20),
        DispMap::Float(_) => panic!("expected integer disparity map"),
    }
}

fn int_map(disp: DispMap) -> bicos::IntDispMap {
    match disp {
        DispMap::Int(m) => m,
        DispMap::Float(_) => panic!("expected an integer disparity map"),
    }
}

/// §8 property 1 — determinism: two calls with identical inputs and
/// config produce byte-identical output maps.
#[test]
fn determinism_repeat_calls_agree_exactly() {
    let (left, right) = shifted_stacks(8, 40, 6, 4);
    let cfg = Config {
        mode: TransformMode::Limited,
        variant: SearchVariant::Consistency {
            max_lr_diff: 1,
            no_dupes: false,
        },
        ..Config::default()
    };

    let (disp_a, corr_a) = bicos::match_stereo(&left, &right, &cfg).unwrap();
    let (disp_b, corr_b) = bicos::match_stereo(&left, &right, &cfg).unwrap();

    assert_eq!(int_map(disp_a).as_slice(), int_map(disp_b).as_slice());
    assert_eq!(corr_a.is_none(), corr_b.is_none());
}

/// §8 property 3 — symmetry under swap: calling with `(stack0, stack1)`
/// versus `(stack1, stack0)` under `NoConsistency` yields maps whose
/// valid entries satisfy `d_AB(r, c) = -d_BA(r, c - d_AB(r, c))` wherever
/// both are valid.
#[test]
fn symmetry_under_stack_swap() {
    let (left, right) = shifted_stacks(8, 32, 4, 5);
    let cfg = Config {
        mode: TransformMode::Limited,
        // no_dupes rules out the ambiguous ties this property doesn't
        // apply to; every surviving match here is the unique argmin.
        variant: SearchVariant::NoConsistency { no_dupes: true },
        ..Config::default()
    };

    let ab = int_map(bicos::match_stereo(&left, &right, &cfg).unwrap().0);
    let ba = int_map(bicos::match_stereo(&right, &left, &cfg).unwrap().0);

    let width = ab.width();
    let mut checked = 0;
    for row in 0..ab.height() {
        for c in 0..width {
            let d_ab = ab.row(row)[c];
            if d_ab == bicos::INVALID_DISP {
                continue;
            }
            let c1 = c as i64 - d_ab as i64;
            if c1 < 0 || c1 as usize >= width {
                continue;
            }
            let d_ba = ba.row(row)[c1 as usize];
            if d_ba == bicos::INVALID_DISP {
                continue;
            }
            assert_eq!(
                d_ab, -d_ba,
                "row {row} col {c}: d_AB={d_ab}, d_BA(c-d_AB)={d_ba}"
            );
            checked += 1;
        }
    }
    assert!(checked > 0, "test constructed no comparable pixel pairs");
}

/// §8 property 4 — consistency monotonicity: any pixel valid under
/// `Consistency{max_lr_diff=k}` is also valid under `max_lr_diff=k'` for
/// `k' >= k`, and carries the same disparity.
#[test]
fn consistency_monotonicity_in_max_lr_diff() {
    let (left, right) = shifted_stacks(8, 32, 4, 3);

    let cfg_tight = Config {
        mode: TransformMode::Limited,
        variant: SearchVariant::Consistency {
            max_lr_diff: 0,
            no_dupes: false,
        },
        ..Config::default()
    };
    let cfg_loose = Config {
        variant: SearchVariant::Consistency {
            max_lr_diff: 4,
            no_dupes: false,
        },
        ..cfg_tight.clone()
    };

    let tight = int_map(bicos::match_stereo(&left, &right, &cfg_tight).unwrap().0);
    let loose = int_map(bicos::match_stereo(&left, &right, &cfg_loose).unwrap().0);

    let mut checked = 0;
    for row in 0..tight.height() {
        for col in 0..tight.width() {
            let d_tight = tight.row(row)[col];
            if d_tight == bicos::INVALID_DISP {
                continue;
            }
            assert_eq!(
                loose.row(row)[col],
                d_tight,
                "row {row} col {col}: valid under max_lr_diff=0 must stay valid with the same \
                 disparity under max_lr_diff=4"
            );
            checked += 1;
        }
    }
    assert!(checked > 0, "test constructed no pixel valid under the tight bound");
}

/// §8 property 5 — NXC threshold monotonicity: raising `nxcorr_threshold`
/// can only reduce the set of valid pixels; it never changes a surviving
/// pixel's disparity (without subpixel).
#[test]
fn nxc_threshold_monotonicity() {
    let (left, right) = shifted_stacks(8, 32, 4, 3);

    let cfg_low = Config {
        mode: TransformMode::Limited,
        variant: SearchVariant::NoConsistency { no_dupes: false },
        nxcorr_threshold: Some(-1.0),
        ..Config::default()
    };
    let cfg_high = Config {
        nxcorr_threshold: Some(0.95),
        ..cfg_low.clone()
    };

    let low = int_map(bicos::match_stereo(&left, &right, &cfg_low).unwrap().0);
    let high = int_map(bicos::match_stereo(&left, &right, &cfg_high).unwrap().0);

    let mut high_valid_count = 0;
    for row in 0..low.height() {
        for col in 0..low.width() {
            let d_high = high.row(row)[col];
            if d_high == bicos::INVALID_DISP {
                continue;
            }
            high_valid_count += 1;
            assert_eq!(
                low.row(row)[col],
                d_high,
                "row {row} col {col}: a pixel surviving the stricter threshold must also survive \
                 the looser one with the same disparity"
            );
        }
    }
    assert!(high_valid_count > 0, "test constructed no pixel surviving the strict threshold");

    let low_valid_count = low
        .as_slice()
        .iter()
        .filter(|&&d| d != bicos::INVALID_DISP)
        .count();
    assert!(
        high_valid_count <= low_valid_count,
        "raising the threshold must not increase the valid pixel count"
    );
}

/// S1 — identity stack: both stacks hold uniform ramps `I(r, c, k) = c`,
/// i.e. every pixel is constant across the N-frame stack. Every column's
/// temporal sequence is therefore flat, so every column produces the same
/// all-zero descriptor regardless of its actual intensity — the forward
/// argmin ties across the entire row and `no_dupes` must invalidate every
/// pixel.
#[test]
fn s1_identity_stack_with_no_dupes_invalidates_everything() {
    let n = 4;
    let width = 12;
    let height = 3;
    let frames: Vec<Vec<u8>> = (0..n)
        .map(|_| (0..height).flat_map(|_| (0..width).map(|c| c as u8)).collect())
        .collect();
    let left = InputStack::new(frames.clone(), width, height).unwrap();
    let right = InputStack::new(frames, width, height).unwrap();

    let cfg = Config {
        mode: TransformMode::Limited,
        variant: SearchVariant::NoConsistency { no_dupes: true },
        ..Config::default()
    };

    let disp = int_map(bicos::match_stereo(&left, &right, &cfg).unwrap().0);
    assert!(disp.as_slice().iter().all(|&d| d == bicos::INVALID_DISP));
}

/// S3 — duplicate rejection: `N=2`, column pattern alternating `0, 1, 0,
/// 1, ...`, both stacks identical. Each column's 2-frame sequence is
/// constant across time (same value in both frames), so every column's
/// single descriptor bit is 0 regardless of which alternating value it
/// holds — the whole row ties at Hamming distance 0, and `no_dupes` must
/// invalidate every output.
#[test]
fn s3_duplicate_rejection_invalidates_alternating_pattern() {
    let width = 10;
    let height = 1;
    let row_pattern: Vec<u8> = (0..width).map(|c| (c % 2) as u8).collect();
    let frames = vec![row_pattern.clone(), row_pattern];
    let left = InputStack::new(frames.clone(), width, height).unwrap();
    let right = InputStack::new(frames, width, height).unwrap();

    let cfg = Config {
        mode: TransformMode::Limited,
        variant: SearchVariant::NoConsistency { no_dupes: true },
        ..Config::default()
    };

    let disp = int_map(bicos::match_stereo(&left, &right, &cfg).unwrap().0);
    assert!(disp.as_slice().iter().all(|&d| d == bicos::INVALID_DISP));
}
