//! Benchmark of the correlation matrix and the correlation filter
//!
//! Run with: cargo bench --bench correlation_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use featsel::pipeline::{select_uncorrelated, CorrelationMatrix};

/// Generate synthetic data where every fourth column is a noisy copy of an earlier one
fn generate_test_dataframe(n_rows: usize, n_features: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(n_features);

    for i in 0..n_features {
        let values: Vec<f64> = if i % 4 == 3 {
            columns[i - 3]
                .iter()
                .map(|v| v + rng.gen::<f64>() * 10.0 - 5.0)
                .collect()
        } else {
            (0..n_rows).map(|_| rng.gen::<f64>() * 100.0).collect()
        };
        columns.push(values);
    }

    let columns: Vec<Column> = columns
        .into_iter()
        .enumerate()
        .map(|(i, values)| Column::new(format!("feature_{}", i).into(), values))
        .collect();

    DataFrame::new(columns).expect("Failed to create DataFrame")
}

/// Matrix construction for varying column counts
fn benchmark_matrix_by_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_matrix_by_columns");
    group.sample_size(30);

    let n_rows = 1_000;
    for n_cols in [10, 30, 100, 200] {
        let df = generate_test_dataframe(n_rows, n_cols, 42);

        group.throughput(Throughput::Elements(((n_cols * (n_cols - 1)) / 2) as u64));
        group.bench_with_input(BenchmarkId::new("from_frame", n_cols), &df, |b, df| {
            b.iter(|| {
                let _ = CorrelationMatrix::from_frame(black_box(df));
            });
        });
    }

    group.finish();
}

/// Matrix construction for varying row counts
fn benchmark_matrix_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_matrix_by_rows");
    group.sample_size(20);

    let n_cols = 30;
    for n_rows in [500, 5_000, 50_000] {
        let df = generate_test_dataframe(n_rows, n_cols, 42);

        group.throughput(Throughput::Elements(n_rows as u64));
        group.bench_with_input(BenchmarkId::new("from_frame", n_rows), &df, |b, df| {
            b.iter(|| {
                let _ = CorrelationMatrix::from_frame(black_box(df));
            });
        });
    }

    group.finish();
}

/// The mask scan on its own, matrix precomputed
fn benchmark_mask_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_mask_scan");

    for n_cols in [30, 200] {
        let df = generate_test_dataframe(1_000, n_cols, 42);
        let matrix = CorrelationMatrix::from_frame(&df).expect("Failed to build matrix");

        group.bench_with_input(
            BenchmarkId::new("select_uncorrelated", n_cols),
            &matrix,
            |b, matrix| {
                b.iter(|| select_uncorrelated(black_box(matrix), black_box(0.9)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_matrix_by_columns,
    benchmark_matrix_by_rows,
    benchmark_mask_scan
);
criterion_main!(benches);
