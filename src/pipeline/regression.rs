//! Ordinary least squares with per-coefficient t-tests

use faer::prelude::SolverCore;
use faer::Mat;
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::error::SelectionError;

/// Anything that can score each column of a design matrix with a p-value.
///
/// Implementors return one p-value per column of `x`, in column order.
pub trait SignificanceTest {
    fn p_values(&self, x: &Mat<f64>, y: &[f64]) -> Result<Vec<f64>, SelectionError>;
}

/// Result of a least-squares fit
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub coefficients: Vec<f64>,
    pub std_errors: Vec<f64>,
    pub t_values: Vec<f64>,
    /// Two-tailed, H0: coefficient is zero
    pub p_values: Vec<f64>,
    pub residual_sum_of_squares: f64,
    pub degrees_of_freedom: usize,
}

/// OLS regression of `y` on the columns of `x`. No intercept is added;
/// callers that want one supply a column of ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct OlsTTest;

impl OlsTTest {
    pub fn fit(&self, x: &Mat<f64>, y: &[f64]) -> Result<OlsFit, SelectionError> {
        let n = x.nrows();
        let p = x.ncols();

        if y.len() != n {
            return Err(SelectionError::LengthMismatch {
                what: "response",
                expected: n,
                actual: y.len(),
            });
        }
        if p == 0 {
            return Err(SelectionError::NoFeatures);
        }
        if n <= p {
            return Err(SelectionError::InsufficientDegreesOfFreedom {
                rows: n,
                columns: p,
            });
        }

        let xtx = x.transpose() * x;
        let xtx_inv = xtx.partial_piv_lu().inverse();

        let singular = (0..p).any(|i| (0..p).any(|j| !xtx_inv[(i, j)].is_finite()));
        if singular {
            return Err(SelectionError::SingularDesign);
        }

        let y_col = Mat::<f64>::from_fn(n, 1, |i, _| y[i]);
        let xty = x.transpose() * &y_col;
        let beta = &xtx_inv * &xty;
        let fitted = x * &beta;

        let rss: f64 = (0..n)
            .map(|i| {
                let r = y[i] - fitted[(i, 0)];
                r * r
            })
            .sum();

        let dof = n - p;
        let sigma2 = rss / dof as f64;

        let dist = StudentsT::new(0.0, 1.0, dof as f64)
            .map_err(|e| SelectionError::Distribution(e.to_string()))?;

        let mut coefficients = Vec::with_capacity(p);
        let mut std_errors = Vec::with_capacity(p);
        let mut t_values = Vec::with_capacity(p);
        let mut p_values = Vec::with_capacity(p);

        for j in 0..p {
            let coef = beta[(j, 0)];
            let se = (sigma2 * xtx_inv[(j, j)]).sqrt();
            let t = coef / se;
            let p_value = if t.is_nan() {
                1.0
            } else if t.is_infinite() {
                0.0
            } else {
                2.0 * (1.0 - dist.cdf(t.abs()))
            };

            coefficients.push(coef);
            std_errors.push(se);
            t_values.push(t);
            p_values.push(p_value.clamp(0.0, 1.0));
        }

        Ok(OlsFit {
            coefficients,
            std_errors,
            t_values,
            p_values,
            residual_sum_of_squares: rss,
            degrees_of_freedom: dof,
        })
    }
}

impl SignificanceTest for OlsTTest {
    fn p_values(&self, x: &Mat<f64>, y: &[f64]) -> Result<Vec<f64>, SelectionError> {
        Ok(self.fit(x, y)?.p_values)
    }
}
