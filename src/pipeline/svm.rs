//! Binary soft-margin support vector machine trained with simplified SMO
//!
//! Labels are class codes 0 and 1, mapped internally to -1 and +1. The full
//! training kernel matrix is computed up front (in parallel), which is fine
//! for the few-hundred-row tables this tool is aimed at.

use std::fmt;
use std::str::FromStr;

use faer::Mat;
use rayon::prelude::*;
use serde::Serialize;

use super::error::SelectionError;

/// Alphas below this are treated as zero when collecting support vectors
const SUPPORT_EPSILON: f64 = 1e-8;

/// Minimum alpha movement that counts as progress
const MIN_ALPHA_STEP: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelType {
    Linear,
    Polynomial { degree: u32 },
    Rbf,
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelType::Linear => write!(f, "linear"),
            KernelType::Polynomial { degree } => write!(f, "poly(degree={})", degree),
            KernelType::Rbf => write!(f, "rbf"),
        }
    }
}

/// Kernel coefficient for the RBF and polynomial kernels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gamma {
    /// `1 / (n_features * Var(X))`
    Scale,
    /// `1 / n_features`
    Auto,
    Value(f64),
}

impl FromStr for Gamma {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scale" => Ok(Gamma::Scale),
            "auto" => Ok(Gamma::Auto),
            other => {
                let value: f64 = other
                    .parse()
                    .map_err(|_| format!("'{}' is not 'scale', 'auto' or a number", s))?;
                if value > 0.0 && value.is_finite() {
                    Ok(Gamma::Value(value))
                } else {
                    Err(format!("gamma must be a positive number, got {}", value))
                }
            }
        }
    }
}

impl fmt::Display for Gamma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gamma::Scale => write!(f, "scale"),
            Gamma::Auto => write!(f, "auto"),
            Gamma::Value(v) => write!(f, "{}", v),
        }
    }
}

/// Training settings
#[derive(Debug, Clone)]
pub struct SvmConfig {
    pub kernel: KernelType,
    pub gamma: Gamma,
    /// Soft-margin penalty C
    pub regularization: f64,
    /// KKT violation tolerance
    pub tolerance: f64,
    /// Stop after this many consecutive sweeps without an update
    pub max_passes: usize,
    /// Hard cap on sweeps over the training set
    pub max_epochs: usize,
}

impl Default for SvmConfig {
    fn default() -> Self {
        Self {
            kernel: KernelType::Rbf,
            gamma: Gamma::Scale,
            regularization: 1.0,
            tolerance: 1e-3,
            max_passes: 5,
            max_epochs: 500,
        }
    }
}

/// A fitted classifier
#[derive(Debug, Clone)]
pub struct SupportVectorMachine {
    kernel: KernelType,
    gamma: f64,
    bias: f64,
    support_vectors: Vec<Vec<f64>>,
    /// alpha_i * y_i per support vector
    dual_coefs: Vec<f64>,
    n_features: usize,
    epochs: usize,
}

impl SupportVectorMachine {
    /// Train on the rows of `x` with class codes `labels` (0 or 1)
    pub fn fit(x: &Mat<f64>, labels: &[usize], config: &SvmConfig) -> Result<Self, SelectionError> {
        let n = x.nrows();
        let n_features = x.ncols();

        if labels.len() != n {
            return Err(SelectionError::LengthMismatch {
                what: "labels",
                expected: n,
                actual: labels.len(),
            });
        }
        if n == 0 {
            return Err(SelectionError::EmptyPartition("train"));
        }
        if n_features == 0 {
            return Err(SelectionError::NoFeatures);
        }
        if let Some(&code) = labels.iter().find(|&&c| c > 1) {
            return Err(SelectionError::UnknownClass { code, classes: 2 });
        }
        if labels.iter().all(|&c| c == labels[0]) {
            return Err(SelectionError::SingleClassTraining(labels[0]));
        }

        let rows = matrix_rows(x);
        let gamma = resolve_gamma(config.gamma, x);
        let kernel = config.kernel;
        let y: Vec<f64> = labels
            .iter()
            .map(|&c| if c == 1 { 1.0 } else { -1.0 })
            .collect();

        let k: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                (0..n)
                    .map(|j| kernel_value(kernel, gamma, &rows[i], &rows[j]))
                    .collect()
            })
            .collect();

        let c = config.regularization;
        let tol = config.tolerance;
        let mut alphas = vec![0.0; n];
        let mut bias = 0.0;
        let mut idle = 0;
        let mut epoch = 0;

        while idle < config.max_passes && epoch < config.max_epochs {
            let mut changed = 0;

            for i in 0..n {
                let e_i = training_decision(&k, &y, &alphas, bias, i) - y[i];

                let violates = (y[i] * e_i < -tol && alphas[i] < c)
                    || (y[i] * e_i > tol && alphas[i] > 0.0);
                if !violates {
                    continue;
                }

                // Partner rotates each epoch; never equal to i since n >= 2.
                let j = (i + 1 + epoch % (n - 1)) % n;
                let e_j = training_decision(&k, &y, &alphas, bias, j) - y[j];

                let (alpha_i_old, alpha_j_old) = (alphas[i], alphas[j]);

                let (low, high) = if labels[i] != labels[j] {
                    (
                        f64::max(0.0, alpha_j_old - alpha_i_old),
                        f64::min(c, c + alpha_j_old - alpha_i_old),
                    )
                } else {
                    (
                        f64::max(0.0, alpha_i_old + alpha_j_old - c),
                        f64::min(c, alpha_i_old + alpha_j_old),
                    )
                };
                if low >= high {
                    continue;
                }

                let eta = 2.0 * k[i][j] - k[i][i] - k[j][j];
                if eta >= 0.0 {
                    continue;
                }

                let alpha_j = (alpha_j_old - y[j] * (e_i - e_j) / eta).clamp(low, high);
                if (alpha_j - alpha_j_old).abs() < MIN_ALPHA_STEP {
                    continue;
                }
                let alpha_i = alpha_i_old + y[i] * y[j] * (alpha_j_old - alpha_j);

                alphas[i] = alpha_i;
                alphas[j] = alpha_j;

                let delta_i = y[i] * (alpha_i - alpha_i_old);
                let delta_j = y[j] * (alpha_j - alpha_j_old);
                let b1 = bias - e_i - delta_i * k[i][i] - delta_j * k[i][j];
                let b2 = bias - e_j - delta_i * k[i][j] - delta_j * k[j][j];

                bias = if 0.0 < alpha_i && alpha_i < c {
                    b1
                } else if 0.0 < alpha_j && alpha_j < c {
                    b2
                } else {
                    (b1 + b2) / 2.0
                };

                changed += 1;
            }

            epoch += 1;
            idle = if changed == 0 { idle + 1 } else { 0 };
        }

        let mut support_vectors = Vec::new();
        let mut dual_coefs = Vec::new();
        for (i, &alpha) in alphas.iter().enumerate() {
            if alpha > SUPPORT_EPSILON {
                support_vectors.push(rows[i].clone());
                dual_coefs.push(alpha * y[i]);
            }
        }

        Ok(Self {
            kernel,
            gamma,
            bias,
            support_vectors,
            dual_coefs,
            n_features,
            epochs: epoch,
        })
    }

    /// Signed distance-like score; non-negative means class 1
    pub fn decision_function(&self, sample: &[f64]) -> f64 {
        self.support_vectors
            .iter()
            .zip(&self.dual_coefs)
            .map(|(sv, coef)| coef * kernel_value(self.kernel, self.gamma, sv, sample))
            .sum::<f64>()
            + self.bias
    }

    /// Class code for every row of `x`
    pub fn predict(&self, x: &Mat<f64>) -> Result<Vec<usize>, SelectionError> {
        if x.ncols() != self.n_features {
            return Err(SelectionError::LengthMismatch {
                what: "feature columns",
                expected: self.n_features,
                actual: x.ncols(),
            });
        }

        Ok(matrix_rows(x)
            .par_iter()
            .map(|row| usize::from(self.decision_function(row) >= 0.0))
            .collect())
    }

    pub fn n_support(&self) -> usize {
        self.support_vectors.len()
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }
}

fn training_decision(k: &[Vec<f64>], y: &[f64], alphas: &[f64], bias: f64, i: usize) -> f64 {
    alphas
        .iter()
        .zip(y)
        .zip(k)
        .filter(|((a, _), _)| **a != 0.0)
        .map(|((&a, &yk), row)| a * yk * row[i])
        .sum::<f64>()
        + bias
}

fn kernel_value(kernel: KernelType, gamma: f64, a: &[f64], b: &[f64]) -> f64 {
    match kernel {
        KernelType::Linear => dot(a, b),
        KernelType::Polynomial { degree } => (gamma * dot(a, b)).powi(degree as i32),
        KernelType::Rbf => {
            let dist_sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
            (-gamma * dist_sq).exp()
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn resolve_gamma(gamma: Gamma, x: &Mat<f64>) -> f64 {
    let n_features = x.ncols() as f64;
    match gamma {
        Gamma::Value(v) => v,
        Gamma::Auto => 1.0 / n_features,
        Gamma::Scale => {
            let count = (x.nrows() * x.ncols()) as f64;
            let mut sum = 0.0;
            for j in 0..x.ncols() {
                for i in 0..x.nrows() {
                    sum += x[(i, j)];
                }
            }
            let mean = sum / count;
            let mut sq = 0.0;
            for j in 0..x.ncols() {
                for i in 0..x.nrows() {
                    let d = x[(i, j)] - mean;
                    sq += d * d;
                }
            }
            let var = sq / count;
            if var > 0.0 {
                1.0 / (n_features * var)
            } else {
                1.0
            }
        }
    }
}

fn matrix_rows(x: &Mat<f64>) -> Vec<Vec<f64>> {
    (0..x.nrows())
        .map(|i| (0..x.ncols()).map(|j| x[(i, j)]).collect())
        .collect()
}
