//! Command-line argument definitions using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::pipeline::{
    DatasetLayout, EvaluationConfig, Gamma, KernelType, SvmConfig, TargetMapping,
};

/// featsel - Select features by correlation and p-value, then compare SVM accuracy
#[derive(Parser, Debug)]
#[command(name = "featsel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Target (label) column name.
    /// Defaults to the first column after the identifier.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Identifier column, dropped before analysis. Defaults to the first column.
    #[arg(long)]
    pub id_column: Option<String>,

    /// Value in target column that represents EVENT (maps to 1).
    /// Requires --non-event-value. Without a mapping, classes are coded in lexical order.
    #[arg(long, requires = "non_event_value")]
    pub event_value: Option<String>,

    /// Value in target column that represents NON-EVENT (maps to 0).
    /// Requires --event-value.
    #[arg(long, requires = "event_value")]
    pub non_event_value: Option<String>,

    /// Columns to drop before processing (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Correlation threshold - of each pair correlated at or above this value,
    /// the later column is dropped
    #[arg(long, default_value = "0.9")]
    pub correlation_threshold: f64,

    /// Significance level - backward elimination stops once every p-value is at or below it
    #[arg(long, visible_alias = "alpha", default_value = "0.05")]
    pub significance_level: f64,

    /// Share of rows held out to measure accuracy (0.0 to 1.0, exclusive)
    #[arg(long, default_value = "0.2", value_parser = validate_test_fraction)]
    pub test_fraction: f64,

    /// Seed for the train/test split
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// SVM kernel
    #[arg(long, value_enum, default_value = "rbf")]
    pub kernel: KernelArg,

    /// Degree of the polynomial kernel
    #[arg(long, default_value = "3")]
    pub degree: u32,

    /// Kernel coefficient: "scale", "auto", or a positive number
    #[arg(long, default_value = "scale", value_parser = parse_gamma)]
    pub gamma: Gamma,

    /// SVM soft-margin penalty C
    #[arg(short = 'c', long, default_value = "1.0", value_parser = validate_positive)]
    pub regularization: f64,

    /// SVM KKT violation tolerance
    #[arg(long, default_value = "0.001", value_parser = validate_positive)]
    pub tolerance: f64,

    /// Maximum number of SMO sweeps over the training set
    #[arg(long, default_value = "500")]
    pub max_epochs: usize,

    /// Write the selected features plus the target to this file (CSV or Parquet)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a JSON report of every feature decision and both evaluations
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KernelArg {
    Rbf,
    Linear,
    Poly,
}

impl Cli {
    /// Column roles for the dataset preparation step
    pub fn layout(&self) -> DatasetLayout {
        let mapping = match (&self.event_value, &self.non_event_value) {
            (Some(event), Some(non_event)) => {
                Some(TargetMapping::new(event.clone(), non_event.clone()))
            }
            _ => None,
        };

        DatasetLayout {
            id_column: self.id_column.clone(),
            target: self.target.clone(),
            mapping,
            drop_columns: self.drop_columns.clone(),
        }
    }

    pub fn kernel_type(&self) -> KernelType {
        match self.kernel {
            KernelArg::Rbf => KernelType::Rbf,
            KernelArg::Linear => KernelType::Linear,
            KernelArg::Poly => KernelType::Polynomial {
                degree: self.degree,
            },
        }
    }

    /// Classifier and split settings shared by both evaluation runs
    pub fn evaluation_config(&self) -> EvaluationConfig {
        EvaluationConfig {
            test_fraction: self.test_fraction,
            seed: self.seed,
            svm: SvmConfig {
                kernel: self.kernel_type(),
                gamma: self.gamma,
                regularization: self.regularization,
                tolerance: self.tolerance,
                max_epochs: self.max_epochs,
                ..SvmConfig::default()
            },
        }
    }
}

fn parse_gamma(s: &str) -> Result<Gamma, String> {
    s.parse()
}

/// Validator for test_fraction parameter
fn validate_test_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value <= 0.0 || value >= 1.0 {
        Err(format!(
            "test_fraction must be between 0.0 and 1.0 (exclusive), got {}",
            value
        ))
    } else {
        Ok(value)
    }
}

fn validate_positive(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 {
        Ok(value)
    } else {
        Err(format!("value must be positive, got {}", value))
    }
}
