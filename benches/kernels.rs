// SPDX-License-Identifier: Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use parx::{
    abs_diff_matrix_u8, blend_matrix_f32, parallel_abs_diff_matrix_u8, parallel_blend_matrix_f32,
    parallel_reduce_mean_std_f32, parallel_reduce_min_f32, reduce_mean_std_f32, reduce_min_f32,
    Matrix,
};

const VECTOR_SIZES: &[usize] = &[4_096, 65_536, 1_048_576, 16_777_216];
const FRAME_SIZES: &[(usize, usize)] = &[(320, 240), (640, 480), (1920, 1080)];

fn pseudo_random_f32(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (i as u32).wrapping_mul(2_654_435_761) as f32)
        .collect()
}

// =============================================================================
// Reduction Benchmarks
// =============================================================================

fn bench_min(c: &mut Criterion) {
    let mut group = c.benchmark_group("Min With Index");

    for &size in VECTOR_SIZES {
        let values = pseudo_random_f32(size);

        group.bench_with_input(BenchmarkId::new("Serial", size), &size, |bencher, _| {
            bencher.iter(|| reduce_min_f32(black_box(&values)));
        });

        group.bench_with_input(BenchmarkId::new("Parallel", size), &size, |bencher, _| {
            bencher.iter(|| parallel_reduce_min_f32(black_box(&values)));
        });
    }

    group.finish();
}

fn bench_mean_std(c: &mut Criterion) {
    let mut group = c.benchmark_group("Mean and Std Dev");

    for &size in VECTOR_SIZES {
        let values = pseudo_random_f32(size);

        group.bench_with_input(BenchmarkId::new("Serial", size), &size, |bencher, _| {
            bencher.iter(|| reduce_mean_std_f32(black_box(&values)));
        });

        group.bench_with_input(BenchmarkId::new("Parallel", size), &size, |bencher, _| {
            bencher.iter(|| parallel_reduce_mean_std_f32(black_box(&values)));
        });
    }

    group.finish();
}

// =============================================================================
// Elementwise Benchmarks
// =============================================================================

fn bench_abs_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("Absolute Difference");

    for &(width, height) in FRAME_SIZES {
        let a = Matrix::from_fn(width, height, |x, y| ((x * 31 + y * 17) % 256) as u8);
        let b = Matrix::from_fn(width, height, |x, y| ((x * 13 + y * 7) % 256) as u8);
        let cells = width * height;

        group.bench_with_input(BenchmarkId::new("Serial", cells), &cells, |bencher, _| {
            bencher.iter(|| abs_diff_matrix_u8(black_box(&a), black_box(&b)));
        });

        group.bench_with_input(
            BenchmarkId::new("Parallel", cells),
            &cells,
            |bencher, _| {
                bencher.iter(|| parallel_abs_diff_matrix_u8(black_box(&a), black_box(&b)));
            },
        );
    }

    group.finish();
}

fn bench_blend(c: &mut Criterion) {
    let mut group = c.benchmark_group("Alpha Blend");

    for &(width, height) in FRAME_SIZES {
        let a = Matrix::from_fn(width, height, |x, y| ((x + y) % 256) as f32);
        let b = Matrix::from_fn(width, height, |x, y| ((x * 3 + y) % 256) as f32);
        let cells = width * height;

        group.bench_with_input(BenchmarkId::new("Serial", cells), &cells, |bencher, _| {
            bencher.iter(|| blend_matrix_f32(black_box(&a), black_box(&b), black_box(0.4)));
        });

        group.bench_with_input(
            BenchmarkId::new("Parallel", cells),
            &cells,
            |bencher, _| {
                bencher.iter(|| parallel_blend_matrix_f32(black_box(&a), black_box(&b), black_box(0.4)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_min, bench_mean_std, bench_abs_diff, bench_blend);
criterion_main!(benches);
