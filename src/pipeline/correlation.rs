//! Correlation-based feature reduction

use anyhow::Result;
use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;

use super::error::SelectionError;
use super::loader::{column_names, column_values};
use super::selection::SelectionMask;

/// Represents a correlated pair of features
#[derive(Debug, Clone)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Pearson correlation matrix over named feature columns
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    values: Mat<f64>,
}

impl CorrelationMatrix {
    /// Compute the matrix for every column of a numeric frame.
    ///
    /// Algorithm:
    /// 1. Standardize each column: z = (x - mean) / (std * sqrt(n))
    /// 2. R = Zᵀ·Z
    ///
    /// Constant columns get `NaN` against every other column; the diagonal is
    /// always exactly 1.
    pub fn from_frame(df: &DataFrame) -> Result<Self, SelectionError> {
        let names = column_names(df);
        let n_rows = df.height();
        let n_cols = names.len();

        let columns = df
            .get_columns()
            .iter()
            .map(column_values)
            .collect::<Result<Vec<_>, _>>()?;

        let standardized: Vec<Option<Vec<f64>>> = columns
            .par_iter()
            .map(|values| standardize(values))
            .collect();

        let mut z = Mat::<f64>::zeros(n_rows, n_cols);
        for (j, col) in standardized.iter().enumerate() {
            if let Some(col) = col {
                for (i, &v) in col.iter().enumerate() {
                    z[(i, j)] = v;
                }
            }
        }

        let mut values = z.transpose() * &z;

        for (j, col) in standardized.iter().enumerate() {
            if col.is_none() {
                for k in 0..n_cols {
                    values[(j, k)] = f64::NAN;
                    values[(k, j)] = f64::NAN;
                }
            }
        }
        for i in 0..n_cols {
            values[(i, i)] = 1.0;
        }

        Ok(Self { names, values })
    }

    /// Wrap a precomputed square matrix
    pub fn from_values(names: Vec<String>, values: Mat<f64>) -> Result<Self, SelectionError> {
        if values.nrows() != names.len() || values.ncols() != names.len() {
            return Err(SelectionError::LengthMismatch {
                what: "correlation matrix",
                expected: names.len(),
                actual: values.nrows().max(values.ncols()),
            });
        }
        Ok(Self { names, values })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    /// Upper-triangle pairs with correlation at or above `threshold`, in scan order
    pub fn correlated_pairs(&self, threshold: f64) -> Vec<CorrelatedPair> {
        let n = self.len();
        let mut pairs = Vec::new();

        for i in 0..n {
            for j in (i + 1)..n {
                let corr = self.get(i, j);
                if corr >= threshold {
                    pairs.push(CorrelatedPair {
                        feature1: self.names[i].clone(),
                        feature2: self.names[j].clone(),
                        correlation: corr,
                    });
                }
            }
        }

        pairs
    }
}

/// Center and scale a column so that dot products give Pearson correlation.
/// Returns None for constant columns.
fn standardize(values: &[f64]) -> Option<Vec<f64>> {
    let n = values.len();
    if n == 0 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let sum_sq_dev: f64 = values.iter().map(|x| (x - mean) * (x - mean)).sum();
    if sum_sq_dev == 0.0 {
        return None;
    }

    let norm = sum_sq_dev.sqrt();
    Some(values.iter().map(|x| (x - mean) / norm).collect())
}

/// Decide which columns survive the correlation threshold.
///
/// Scans the upper triangle in index order. For each pair (i, j) with i < j
/// and `corr(i, j) >= threshold`, column j is dropped if it is still
/// retained. Column i is tested whether or not it was itself dropped earlier,
/// so with A~B and B~C both B and C go even when A and C are uncorrelated.
pub fn select_uncorrelated(matrix: &CorrelationMatrix, threshold: f64) -> SelectionMask {
    let n = matrix.len();
    let mut mask = SelectionMask::all(matrix.names().to_vec());

    for i in 0..n {
        for j in (i + 1)..n {
            if matrix.get(i, j) >= threshold && mask.is_retained(j) {
                mask.drop_feature(j);
            }
        }
    }

    mask
}

/// Result of running the correlation filter over a feature table
#[derive(Debug, Clone)]
pub struct CorrelationOutcome {
    pub matrix: CorrelationMatrix,
    pub mask: SelectionMask,
    /// Features that survived, original relative order
    pub table: DataFrame,
    pub pairs: Vec<CorrelatedPair>,
    pub threshold: f64,
}

impl CorrelationOutcome {
    /// The pair that removed a dropped feature: the first one, in scan order,
    /// naming it as the higher-indexed column
    pub fn dropped_by(&self, feature: &str) -> Option<&CorrelatedPair> {
        self.pairs.iter().find(|p| p.feature2 == feature)
    }
}

/// Compute correlations over `features` and drop one column of each pair at
/// or above `threshold`, keeping the lower-indexed column.
pub fn filter_correlated(features: &DataFrame, threshold: f64) -> Result<CorrelationOutcome> {
    let matrix = CorrelationMatrix::from_frame(features)?;
    let mask = select_uncorrelated(&matrix, threshold);
    let pairs = matrix.correlated_pairs(threshold);
    let table = mask.apply(features)?;

    Ok(CorrelationOutcome {
        matrix,
        mask,
        table,
        pairs,
        threshold,
    })
}
