//! Feature selection mask

use anyhow::Result;
use polars::prelude::*;

/// One keep/drop flag per original feature column
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionMask {
    names: Vec<String>,
    keep: Vec<bool>,
}

impl SelectionMask {
    /// Mask that retains every column
    pub fn all(names: Vec<String>) -> Self {
        let keep = vec![true; names.len()];
        Self { names, keep }
    }

    pub fn len(&self) -> usize {
        self.keep.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keep.is_empty()
    }

    pub fn is_retained(&self, index: usize) -> bool {
        self.keep[index]
    }

    /// Mark a column as dropped. Returns false if it already was.
    pub fn drop_feature(&mut self, index: usize) -> bool {
        std::mem::replace(&mut self.keep[index], false)
    }

    pub fn flags(&self) -> &[bool] {
        &self.keep
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn retained_count(&self) -> usize {
        self.keep.iter().filter(|&&k| k).count()
    }

    /// Retained column names, in original order
    pub fn retained_names(&self) -> Vec<String> {
        self.names
            .iter()
            .zip(&self.keep)
            .filter(|(_, &k)| k)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Dropped column names, in original order
    pub fn dropped_names(&self) -> Vec<String> {
        self.names
            .iter()
            .zip(&self.keep)
            .filter(|(_, &k)| !k)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Select the retained columns from a table
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let retained = self.retained_names();
        let selected = df.select(retained.iter().map(|s| s.as_str()))?;
        Ok(selected)
    }
}
