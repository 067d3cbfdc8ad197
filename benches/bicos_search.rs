//! Criterion benchmarks for the BICOS search stage.
//!
//! Run with:
//!   cargo bench --bench bicos_search

use bicos::bicos::bicos_search;
use bicos::config::SearchVariant;
use bicos::StepBuf;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn synthetic_row_pair(width: usize, height: usize) -> (StepBuf<u64>, StepBuf<u64>) {
    let left: Vec<u64> = (0..width * height)
        .map(|i| (i as u64).wrapping_mul(0x9E3779B97F4A7C15))
        .collect();
    // right is left shifted four columns per row, so every left pixel has
    // an exact (or near-exact) match somewhere in its row.
    let mut right = vec![0u64; width * height];
    for row in 0..height {
        for col in 0..width {
            let src_col = (col + width - 4) % width;
            right[row * width + col] = left[row * width + src_col];
        }
    }
    (
        StepBuf::from_vec(left, width, height),
        StepBuf::from_vec(right, width, height),
    )
}

fn bench_bicos_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("bicos_search");
    let height = 480;

    for &width in &[320usize, 640, 1280] {
        let (left, right) = synthetic_row_pair(width, height);
        group.throughput(Throughput::Elements((width * height) as u64));

        group.bench_with_input(
            BenchmarkId::new("no_consistency", width),
            &(left.clone(), right.clone()),
            |b, (left, right)| {
                let variant = SearchVariant::NoConsistency { no_dupes: true };
                b.iter(|| bicos_search(left, right, variant))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("consistency", width),
            &(left, right),
            |b, (left, right)| {
                let variant = SearchVariant::Consistency {
                    max_lr_diff: 1,
                    no_dupes: true,
                };
                b.iter(|| bicos_search(left, right, variant))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_bicos_search);
criterion_main!(benches);
