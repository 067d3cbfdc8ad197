// e2e/cli_integration.rs — CLI integration tests.
//
// Tests the `bicos` binary as a black-box CLI tool using
// std::process::Command: a synthetic raw-PGM stereo pair goes in, a
// disparity map comes out, and the exit code/usage text behave as the
// argument parser promises.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Locate the `bicos` binary produced by Cargo.
fn bicos_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_bicos") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("bicos");
    p
}

fn write_pgm(path: &Path, width: usize, height: usize, data: &[u8]) {
    let mut f = fs::File::create(path).unwrap();
    write!(f, "P5\n{width} {height}\n255\n").unwrap();
    f.write_all(data).unwrap();
}

/// Builds a folder of `n` numbered frames, each row shifted by `shift`
/// columns relative to `base` so a real disparity exists to recover.
fn make_sequence(dir: &Path, n: usize, width: usize, height: usize, shift: i64) {
    fs::create_dir_all(dir).unwrap();
    for k in 0..n {
        let mut data = vec![0u8; width * height];
        for row in 0..height {
            for col in 0..width {
                let src_col = col as i64 - shift;
                if src_col >= 0 && (src_col as usize) < width {
                    data[row * width + col] =
                        (((row * width + src_col as usize) * 7 + k * 13) % 251) as u8;
                }
            }
        }
        write_pgm(&dir.join(format!("{k:03}.pgm")), width, height, &data);
    }
}

#[test]
fn test_cli_help() {
    let output = Command::new(bicos_bin())
        .arg("--help")
        .output()
        .expect("failed to run bicos --help");

    assert!(output.status.success(), "--help should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.to_lowercase().contains("usage"),
        "--help output should contain 'usage'; got: {stdout}"
    );
}

#[test]
fn test_cli_end_to_end_disparity() {
    let dir = TempDir::new().unwrap();
    let left = dir.path().join("left");
    let right = dir.path().join("right");
    make_sequence(&left, 6, 16, 8, 0);
    make_sequence(&right, 6, 16, 8, 3);

    let outfile = dir.path().join("disp.pgm");
    let status = Command::new(bicos_bin())
        .args([
            left.to_str().unwrap(),
            right.to_str().unwrap(),
            "-o",
            outfile.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run bicos");

    assert!(status.success(), "bicos should exit 0 on a valid sequence pair");
    assert!(outfile.exists(), "disparity output file should exist");

    let written = fs::read(&outfile).unwrap();
    assert!(written.starts_with(b"P5"), "output must be a binary PGM");
}

#[test]
fn test_cli_missing_folder_is_an_error() {
    let dir = TempDir::new().unwrap();
    let status = Command::new(bicos_bin())
        .args([dir.path().join("does_not_exist").to_str().unwrap()])
        .status()
        .expect("failed to run bicos");

    assert!(!status.success(), "a nonexistent folder should exit non-zero");
}

#[test]
fn test_cli_unknown_flag_is_an_error() {
    let status = Command::new(bicos_bin())
        .args(["--bogus-flag"])
        .status()
        .expect("failed to run bicos");

    assert!(!status.success(), "an unrecognized flag should exit non-zero");
}

#[test]
fn test_cli_single_folder_duplicates_for_right() {
    let dir = TempDir::new().unwrap();
    let only = dir.path().join("only");
    make_sequence(&only, 4, 12, 6, 0);

    let outfile = dir.path().join("self_disp.pgm");
    let status = Command::new(bicos_bin())
        .args([only.to_str().unwrap(), "-o", outfile.to_str().unwrap()])
        .status()
        .expect("failed to run bicos");

    assert!(status.success(), "a single folder should match against itself");
    assert!(outfile.exists());
}
