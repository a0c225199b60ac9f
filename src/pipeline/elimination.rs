//! Backward elimination by regression p-value

use faer::Mat;

use super::error::SelectionError;
use super::regression::SignificanceTest;

/// One removal made by the eliminator
#[derive(Debug, Clone)]
pub struct EliminationStep {
    pub feature: String,
    pub p_value: f64,
}

/// Result of backward elimination
#[derive(Debug, Clone)]
pub struct Elimination {
    /// Remaining columns of the input matrix
    pub matrix: Mat<f64>,
    /// Names parallel to `matrix` columns
    pub names: Vec<String>,
    /// Removals in the order they happened
    pub removed: Vec<EliminationStep>,
    /// p-values from the last fit, parallel to `names`. Empty if no fit ran.
    pub p_values: Vec<f64>,
    /// True when the last fit had every p-value at or below the significance level
    pub converged: bool,
}

/// Repeatedly fit `y` on the columns of `x` and drop the least significant
/// column until every p-value is at or below `alpha`.
///
/// At most one column is removed per fit: the first one whose p-value equals
/// the maximum. The last remaining column is never removed, and an empty
/// matrix is returned unchanged.
pub fn backward_eliminate<T>(
    x: &Mat<f64>,
    y: &[f64],
    names: &[String],
    alpha: f64,
    test: &T,
) -> Result<Elimination, SelectionError>
where
    T: SignificanceTest + ?Sized,
{
    if names.len() != x.ncols() {
        return Err(SelectionError::LengthMismatch {
            what: "feature names",
            expected: x.ncols(),
            actual: names.len(),
        });
    }
    if y.len() != x.nrows() {
        return Err(SelectionError::LengthMismatch {
            what: "response",
            expected: x.nrows(),
            actual: y.len(),
        });
    }

    let mut matrix = x.clone();
    let mut names = names.to_vec();
    let mut removed = Vec::new();
    let mut p_values = Vec::new();
    let mut converged = x.ncols() == 0;

    for _ in 0..x.ncols() {
        p_values = test.p_values(&matrix, y)?;

        let max_p = p_values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max_p <= alpha {
            converged = true;
            break;
        }
        if matrix.ncols() == 1 {
            break;
        }

        // Ties keep all but the first; they are revisited on the next fit.
        #[allow(clippy::float_cmp)]
        let Some(worst) = p_values.iter().position(|&p| p == max_p) else {
            break;
        };

        removed.push(EliminationStep {
            feature: names.remove(worst),
            p_value: max_p,
        });
        matrix = remove_column(&matrix, worst);
        p_values.clear();
    }

    Ok(Elimination {
        matrix,
        names,
        removed,
        p_values,
        converged,
    })
}

/// Copy of `mat` without column `index`
pub fn remove_column(mat: &Mat<f64>, index: usize) -> Mat<f64> {
    Mat::from_fn(mat.nrows(), mat.ncols() - 1, |i, j| {
        if j < index {
            mat[(i, j)]
        } else {
            mat[(i, j + 1)]
        }
    })
}
