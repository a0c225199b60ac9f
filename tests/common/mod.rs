//! Shared test utilities and fixture generators

#![allow(dead_code)]

use faer::Mat;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Small labelled table shaped like a diagnostic dataset
///
/// This DataFrame includes:
/// - `id`: Identifier column (first column, dropped by default)
/// - `diagnosis`: Text label, "B" or "M"
/// - `radius`, `texture`: Numeric features
/// - `perimeter`: Nearly a multiple of `radius`
/// - `empty`: Every cell missing
pub fn create_labelled_dataframe() -> DataFrame {
    df! {
        "id" => [101i64, 102, 103, 104, 105, 106, 107, 108, 109, 110],
        "diagnosis" => ["M", "B", "M", "B", "B", "M", "B", "M", "B", "B"],
        "radius" => [17.9f64, 11.4, 20.5, 12.1, 10.9, 19.7, 13.0, 21.2, 11.8, 12.6],
        "texture" => [10.4f64, 14.2, 21.3, 18.0, 12.9, 20.1, 15.5, 17.7, 16.8, 13.4],
        "perimeter" => [122.9f64, 73.1, 136.0, 78.5, 70.6, 130.0, 84.2, 141.3, 76.3, 81.4],
        "empty" => [None::<f64>, None, None, None, None, None, None, None, None, None],
    }
    .unwrap()
}

/// Create a DataFrame with known correlation patterns
pub fn create_correlation_test_dataframe() -> DataFrame {
    df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "b" => [2.0f64, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0], // b = 2*a
        "c" => [10.0f64, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0], // Negatively correlated with a
        "d" => [5.0f64, 1.0, 8.0, 2.0, 9.0, 3.0, 7.0, 4.0, 6.0, 0.0], // Unrelated
    }
    .unwrap()
}

/// Synthetic diagnostic table with 30 features
///
/// Features 0..10 are independent noisy copies of the label. Features 10..30
/// are rescaled copies of those with a little noise, so each one correlates
/// almost perfectly with an earlier column. The table also carries an `id`
/// column first, the `diagnosis` label second, and an all-empty column last.
pub fn create_synthetic_diagnostic_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let labels: Vec<usize> = (0..rows).map(|i| i % 2).collect();
    let base: Vec<Vec<f64>> = (0..10)
        .map(|_| {
            labels
                .iter()
                .map(|&l| l as f64 + rng.gen_range(-1.0..1.0))
                .collect()
        })
        .collect();

    let mut columns: Vec<Column> = Vec::with_capacity(33);
    columns.push(Column::new(
        "id".into(),
        (0..rows as i64).map(|i| 840_000 + i).collect::<Vec<i64>>(),
    ));
    columns.push(Column::new(
        "diagnosis".into(),
        labels
            .iter()
            .map(|&l| if l == 1 { "M" } else { "B" })
            .collect::<Vec<&str>>(),
    ));

    for (k, values) in base.iter().enumerate() {
        columns.push(Column::new(format!("feature_{}", k).into(), values.clone()));
    }
    for k in 10..30 {
        let source = &base[k % 10];
        let scale = 1.0 + k as f64 / 10.0;
        let values: Vec<f64> = source
            .iter()
            .map(|v| scale * v + rng.gen_range(-0.01..0.01))
            .collect();
        columns.push(Column::new(format!("feature_{}", k).into(), values));
    }

    columns.push(Column::new(
        "unnamed_32".into(),
        vec![None::<f64>; rows],
    ));

    DataFrame::new(columns).unwrap()
}

/// Two well separated point clouds; rows alternate between class 0 and 1
pub fn create_separable_data(rows: usize) -> (Mat<f64>, Vec<usize>) {
    let labels: Vec<usize> = (0..rows).map(|i| i % 2).collect();
    let x = Mat::from_fn(rows, 2, |i, j| {
        let offset = if labels[i] == 1 { 5.0 } else { 0.0 };
        let jitter = ((i / 2) % 5) as f64 * 0.2;
        offset + jitter + j as f64 * 0.1
    });
    (x, labels)
}

/// Build a matrix from row slices
pub fn matrix_from_rows(rows: &[&[f64]]) -> Mat<f64> {
    let ncols = rows.first().map_or(0, |r| r.len());
    Mat::from_fn(rows.len(), ncols, |i, j| rows[i][j])
}

/// Build a matrix from column vectors
pub fn matrix_from_columns(columns: &[Vec<f64>]) -> Mat<f64> {
    let nrows = columns.first().map_or(0, |c| c.len());
    Mat::from_fn(nrows, columns.len(), |i, j| columns[j][i])
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}
