//! Error types for the numeric selection and evaluation stages

use thiserror::Error;

/// Errors raised by feature preparation, regression, and classification.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// A feature column could not be interpreted as numbers.
    #[error("Column '{column}' is not numeric (found {dtype})")]
    NonNumericColumn { column: String, dtype: String },

    /// A feature column contains null cells after loading.
    #[error("Column '{column}' contains {count} missing value(s)")]
    MissingValues { column: String, count: usize },

    /// Two inputs that must be row-aligned disagree in length.
    #[error("Length mismatch: {what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Not enough rows to leave any residual degrees of freedom.
    #[error("Cannot fit {columns} coefficient(s) on {rows} row(s): no residual degrees of freedom")]
    InsufficientDegreesOfFreedom { rows: usize, columns: usize },

    /// `XᵀX` could not be inverted.
    #[error("Design matrix is singular; coefficient standard errors are undefined")]
    SingularDesign,

    /// The Student's t distribution could not be constructed.
    #[error("Failed to build Student's t distribution: {0}")]
    Distribution(String),

    /// The classifier only supports two classes.
    #[error("Expected exactly 2 label classes, found {0}")]
    NotBinary(usize),

    /// Training data contains a single class only.
    #[error("Training partition contains only class {0}; both classes are required")]
    SingleClassTraining(usize),

    /// A label code is outside the known class range.
    #[error("Label code {code} is out of range for {classes} class(es)")]
    UnknownClass { code: usize, classes: usize },

    /// The train or test partition is empty.
    #[error("The {0} partition is empty")]
    EmptyPartition(&'static str),

    /// The classifier has no features to work with.
    #[error("Feature matrix has no columns")]
    NoFeatures,
}
