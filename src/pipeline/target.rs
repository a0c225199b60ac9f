//! Target column encoding
//!
//! The classifier and the regression step both need the label column as
//! integer class codes. Classes are either discovered from the data (sorted
//! lexically, so `{"B", "M"}` becomes `B = 0`, `M = 1`) or given explicitly
//! as an event / non-event mapping.

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Mapping configuration for converting target column values to binary 0/1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetMapping {
    /// Value that maps to 1 (event)
    pub event_value: String,
    /// Value that maps to 0 (non-event)
    pub non_event_value: String,
}

impl TargetMapping {
    /// Create a new target mapping
    pub fn new(event_value: String, non_event_value: String) -> Self {
        Self {
            event_value,
            non_event_value,
        }
    }
}

/// Label column encoded as class codes `0..k`
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedLabels {
    /// One code per row
    pub codes: Vec<usize>,
    /// Class names, indexed by code
    pub classes: Vec<String>,
}

impl EncodedLabels {
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Codes as floats, the regression response
    pub fn as_response(&self) -> Vec<f64> {
        self.codes.iter().map(|&c| c as f64).collect()
    }

    /// Decoded class name for every row
    pub fn decoded(&self) -> Vec<&str> {
        self.codes
            .iter()
            .map(|&c| self.classes[c].as_str())
            .collect()
    }

    /// Row count per class, indexed by code
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.classes.len()];
        for &code in &self.codes {
            counts[code] += 1;
        }
        counts
    }
}

/// Lookup table from label text to class code
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn the classes present in a column, in lexical order
    pub fn fit(column: &Column) -> Result<Self> {
        let values = column_to_string_vec(column)?;

        let mut classes: Vec<String> = values.into_iter().flatten().collect();
        classes.sort();
        classes.dedup();

        if classes.is_empty() {
            anyhow::bail!(
                "Target column '{}' has no valid (non-null) values",
                column.name()
            );
        }

        Ok(Self { classes })
    }

    /// Build an encoder from an explicit mapping: non-event is 0, event is 1
    pub fn from_mapping(mapping: &TargetMapping) -> Self {
        Self {
            classes: vec![
                mapping.non_event_value.clone(),
                mapping.event_value.clone(),
            ],
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Code for a single label, if known
    pub fn code_of(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    /// Encode every row of a column. Nulls and unseen labels are errors.
    pub fn encode(&self, column: &Column) -> Result<EncodedLabels> {
        let values = column_to_string_vec(column)?;

        let codes = values
            .iter()
            .enumerate()
            .map(|(row, value)| match value {
                Some(label) => self.code_of(label).with_context(|| {
                    format!(
                        "Row {}: label '{}' in column '{}' is not one of {:?}",
                        row,
                        label,
                        column.name(),
                        self.classes
                    )
                }),
                None => Err(anyhow::anyhow!(
                    "Row {}: target column '{}' is null",
                    row,
                    column.name()
                )),
            })
            .collect::<Result<Vec<usize>>>()?;

        Ok(EncodedLabels {
            codes,
            classes: self.classes.clone(),
        })
    }
}

/// Convert a column to a Vec of Option<String> for comparison
fn column_to_string_vec(col: &Column) -> Result<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}
