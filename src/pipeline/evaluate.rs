//! Train/evaluate cycle and confusion-matrix accuracy

use faer::Mat;
use serde::Serialize;

use super::error::SelectionError;
use super::split::{select_rows, select_values, train_test_split};
use super::svm::{SupportVectorMachine, SvmConfig};

/// Counts of (true class, predicted class) pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Tally predictions against the truth. Both slices hold class codes below `n_classes`.
    pub fn from_predictions(
        n_classes: usize,
        truth: &[usize],
        predicted: &[usize],
    ) -> Result<Self, SelectionError> {
        if truth.len() != predicted.len() {
            return Err(SelectionError::LengthMismatch {
                what: "predictions",
                expected: truth.len(),
                actual: predicted.len(),
            });
        }

        let mut counts = vec![vec![0; n_classes]; n_classes];
        for (&t, &p) in truth.iter().zip(predicted) {
            let code = t.max(p);
            if code >= n_classes {
                return Err(SelectionError::UnknownClass {
                    code,
                    classes: n_classes,
                });
            }
            counts[t][p] += 1;
        }

        Ok(Self { counts })
    }

    pub fn n_classes(&self) -> usize {
        self.counts.len()
    }

    /// Rows with true class `actual` predicted as `predicted`
    pub fn get(&self, actual: usize, predicted: usize) -> usize {
        self.counts[actual][predicted]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Correct predictions (diagonal sum)
    pub fn correct(&self) -> usize {
        (0..self.counts.len()).map(|i| self.counts[i][i]).sum()
    }

    /// Diagonal sum divided by the number of rows
    pub fn accuracy(&self) -> Result<f64, SelectionError> {
        let total = self.total();
        if total == 0 {
            return Err(SelectionError::EmptyPartition("test"));
        }
        Ok(self.correct() as f64 / total as f64)
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.counts
    }
}

/// Settings for one train/evaluate cycle
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Share of rows held out for testing
    pub test_fraction: f64,
    /// Seed for the split only
    pub seed: u64,
    pub svm: SvmConfig,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            svm: SvmConfig::default(),
        }
    }
}

/// Outcome of one train/evaluate cycle
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub features: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub support_vectors: usize,
}

/// Split rows, fit the classifier on the training part, and score it on the rest.
pub fn train_and_evaluate(
    x: &Mat<f64>,
    labels: &[usize],
    n_classes: usize,
    config: &EvaluationConfig,
) -> Result<Evaluation, SelectionError> {
    if n_classes != 2 {
        return Err(SelectionError::NotBinary(n_classes));
    }
    if labels.len() != x.nrows() {
        return Err(SelectionError::LengthMismatch {
            what: "labels",
            expected: x.nrows(),
            actual: labels.len(),
        });
    }

    let split = train_test_split(x.nrows(), config.test_fraction, config.seed);
    if split.test.is_empty() {
        return Err(SelectionError::EmptyPartition("test"));
    }

    let x_train = select_rows(x, &split.train);
    let y_train = select_values(labels, &split.train);
    let x_test = select_rows(x, &split.test);
    let y_test = select_values(labels, &split.test);

    let model = SupportVectorMachine::fit(&x_train, &y_train, &config.svm)?;
    let predicted = model.predict(&x_test)?;

    let confusion = ConfusionMatrix::from_predictions(n_classes, &y_test, &predicted)?;
    let accuracy = confusion.accuracy()?;

    Ok(Evaluation {
        accuracy,
        confusion,
        features: x.ncols(),
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        support_vectors: model.n_support(),
    })
}
