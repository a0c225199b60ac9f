//! Seeded train/test partitioning

use faer::Mat;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices for each partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_rows` with a seeded RNG and cut off the test partition.
///
/// The test partition holds `ceil(test_fraction * n_rows)` rows, capped at
/// `n_rows`; the rest are training rows. The same seed always gives the same
/// split.
pub fn train_test_split(n_rows: usize, test_fraction: f64, seed: u64) -> TrainTestSplit {
    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((test_fraction * n_rows as f64).ceil().max(0.0) as usize).min(n_rows);
    let train = indices.split_off(n_test);

    TrainTestSplit {
        train,
        test: indices,
    }
}

/// Copy of `mat` restricted to the given rows, in the given order
pub fn select_rows(mat: &Mat<f64>, rows: &[usize]) -> Mat<f64> {
    Mat::from_fn(rows.len(), mat.ncols(), |i, j| mat[(rows[i], j)])
}

/// Values at the given positions
pub fn select_values<T: Copy>(values: &[T], rows: &[usize]) -> Vec<T> {
    rows.iter().map(|&i| values[i]).collect()
}
