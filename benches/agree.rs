//! Criterion benchmarks for the NXC agreement stage.
//!
//! Run with:
//!   cargo bench --bench agree

use bicos::agree::{agree, refine};
use bicos::types::{IntDispMap, INVALID_DISP};
use bicos::InputStack;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn synthetic_pair(n: usize, width: usize, height: usize, shift: i64) -> (InputStack<u8>, InputStack<u8>) {
    let mut left_frames = Vec::with_capacity(n);
    let mut right_frames = Vec::with_capacity(n);
    for k in 0..n {
        let mut l = vec![0u8; width * height];
        let mut r = vec![0u8; width * height];
        for row in 0..height {
            for col in 0..width {
                let v = (((row * width + col) * 7 + k * 13) % 251) as u8;
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

fn disparity_map(width: usize, height: usize, shift: i16) -> IntDispMap {
    let mut out = IntDispMap::filled(width, height, INVALID_DISP);
    for row in 0..height {
        for col in 0..width {
            if (col as i64) - (shift as i64) >= 0 {
                out.row_mut(row)[col] = shift;
            }
        }
    }
    out
}

fn bench_agree(c: &mut Criterion) {
    let mut group = c.benchmark_group("agree");
    let n = 8;
    let height = 480;

    for &width in &[320usize, 640, 1280] {
        let (left, right) = synthetic_pair(n, width, height, 3);
        let disp = disparity_map(width, height, 3);
        group.throughput(Throughput::Elements((width * height) as u64));

        group.bench_with_input(
            BenchmarkId::new("correlation_rescore", width),
            &(left, right, disp),
            |b, (left, right, disp)| b.iter(|| agree(left, right, disp, 0.5, None)),
        );
    }

    for &width in &[320usize, 640, 1280] {
        let (left, right) = synthetic_pair(n, width, height, 3);
        let disp = disparity_map(width, height, 3);
        group.throughput(Throughput::Elements((width * height) as u64));

        group.bench_with_input(
            BenchmarkId::new("subpixel_refine", width),
            &(left, right, disp),
            |b, (left, right, disp)| b.iter(|| refine(left, right, disp, 0.25, -1.0, None)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_agree);
criterion_main!(benches);
