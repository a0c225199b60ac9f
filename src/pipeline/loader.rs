//! Dataset loader for CSV and Parquet files

use std::path::Path;

use anyhow::{Context, Result};
use faer::Mat;
use polars::prelude::*;

use super::error::SelectionError;
use super::target::{EncodedLabels, LabelEncoder, TargetMapping};

/// Which columns play which role in the raw table
#[derive(Debug, Clone, Default)]
pub struct DatasetLayout {
    /// Identifier column to drop. Defaults to the first column.
    pub id_column: Option<String>,
    /// Label column. Defaults to the first usable column after the identifier.
    pub target: Option<String>,
    /// Explicit event / non-event mapping for the label
    pub mapping: Option<TargetMapping>,
    /// Extra columns removed before any analysis
    pub drop_columns: Vec<String>,
}

/// Numeric feature table plus encoded labels, ready for selection
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature columns, all Float64, in file order
    pub features: DataFrame,
    pub labels: EncodedLabels,
    pub target: String,
    pub id_column: Option<String>,
    /// Columns dropped because every cell was empty
    pub empty_columns: Vec<String>,
}

impl Dataset {
    pub fn feature_names(&self) -> Vec<String> {
        column_names(&self.features)
    }

    pub fn n_features(&self) -> usize {
        self.features.width()
    }

    pub fn n_rows(&self) -> usize {
        self.features.height()
    }
}

/// Load a dataset from a file (CSV or Parquet based on extension)
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    // 0 means full table scan
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    lf.collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))
}

/// Split a raw table into numeric features and encoded labels.
///
/// Drops the identifier column, columns with no values at all, and any
/// user-listed columns. Every remaining feature must be numeric and complete.
pub fn prepare_dataset(df: &DataFrame, layout: &DatasetLayout) -> Result<Dataset> {
    let names = column_names(df);
    if names.is_empty() {
        anyhow::bail!("Dataset has no columns");
    }

    for requested in &layout.drop_columns {
        if !names.contains(requested) {
            anyhow::bail!("Column '{}' listed in --drop-columns not found", requested);
        }
    }

    let id_column = match &layout.id_column {
        Some(id) if !names.contains(id) => {
            anyhow::bail!("Identifier column '{}' not found in dataset", id)
        }
        Some(id) => Some(id.clone()),
        None => names.first().cloned(),
    };

    let height = df.height();
    let empty_columns: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|col| height > 0 && col.null_count() == height)
        .map(|col| col.name().to_string())
        .collect();

    let is_excluded = |name: &String| {
        Some(name) == id_column.as_ref()
            || empty_columns.contains(name)
            || layout.drop_columns.contains(name)
    };

    let target = match &layout.target {
        Some(t) if !names.contains(t) => anyhow::bail!(
            "Target column '{}' not found in dataset. Available columns: {:?}",
            t,
            names
        ),
        Some(t) if Some(t) == id_column.as_ref() => {
            anyhow::bail!("Target column '{}' is also the identifier column", t)
        }
        Some(t) => t.clone(),
        None => names
            .iter()
            .find(|n| !is_excluded(*n))
            .cloned()
            .context("No column left to use as the target")?,
    };

    let target_col = df.column(&target)?;
    let encoder = match &layout.mapping {
        Some(mapping) => LabelEncoder::from_mapping(mapping),
        None => LabelEncoder::fit(target_col)?,
    };
    let labels = encoder.encode(target_col)?;

    let mut columns = Vec::new();
    for name in names.iter().filter(|n| !is_excluded(*n) && **n != target) {
        columns.push(to_float_column(df.column(name)?)?);
    }

    if columns.is_empty() {
        anyhow::bail!("No feature columns remain after removing identifier, target, and empty columns");
    }

    let features = DataFrame::new(columns)?;

    Ok(Dataset {
        features,
        labels,
        target,
        id_column,
        empty_columns,
    })
}

/// Cast a feature column to Float64, rejecting text and missing cells
fn to_float_column(column: &Column) -> Result<Column, SelectionError> {
    let name = column.name().to_string();

    if !column.dtype().is_primitive_numeric() {
        return Err(SelectionError::NonNumericColumn {
            column: name,
            dtype: column.dtype().to_string(),
        });
    }

    let nulls = column.null_count();
    if nulls > 0 {
        return Err(SelectionError::MissingValues {
            column: name,
            count: nulls,
        });
    }

    column
        .cast(&DataType::Float64)
        .map_err(|_| SelectionError::NonNumericColumn {
            column: name,
            dtype: column.dtype().to_string(),
        })
}

/// Column names of a frame, in order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Values of a numeric column. Nulls are an error.
pub fn column_values(column: &Column) -> Result<Vec<f64>, SelectionError> {
    let name = column.name().to_string();
    let non_numeric = || SelectionError::NonNumericColumn {
        column: name.clone(),
        dtype: column.dtype().to_string(),
    };

    if !column.dtype().is_primitive_numeric() {
        return Err(non_numeric());
    }

    let cast = column.cast(&DataType::Float64).map_err(|_| non_numeric())?;
    let ca = cast.f64().map_err(|_| non_numeric())?;

    let nulls = ca.null_count();
    if nulls > 0 {
        return Err(SelectionError::MissingValues {
            column: name,
            count: nulls,
        });
    }

    Ok(ca.into_no_null_iter().collect())
}

/// Copy all columns of a numeric frame into a dense `rows x columns` matrix
pub fn frame_to_matrix(df: &DataFrame) -> Result<Mat<f64>, SelectionError> {
    let columns = df.get_columns();
    let mut mat = Mat::<f64>::zeros(df.height(), columns.len());

    for (j, column) in columns.iter().enumerate() {
        for (i, value) in column_values(column)?.into_iter().enumerate() {
            mat[(i, j)] = value;
        }
    }

    Ok(mat)
}

/// Features plus the decoded label column, for writing out
pub fn with_labels(features: &DataFrame, labels: &EncodedLabels, target: &str) -> Result<DataFrame> {
    if labels.len() != features.height() {
        return Err(SelectionError::LengthMismatch {
            what: "labels",
            expected: features.height(),
            actual: labels.len(),
        }
        .into());
    }

    let mut out = features.clone();
    out.with_column(Column::new(target.into(), labels.decoded()))?;
    Ok(out)
}

/// Save dataset to file (CSV or Parquet based on extension)
pub fn save_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}
