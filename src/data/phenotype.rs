//! Phenotype table: per-sample categorical attributes

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{DgeError, Result};

/// Sample phenotype table.
/// Rows are samples (matching expression matrix columns by id), columns
/// are categorical attributes such as tissue, disease state or batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhenotypeTable {
    /// Sample identifiers
    sample_ids: Vec<String>,
    /// Categorical attributes (column name -> value per sample)
    columns: HashMap<String, Vec<String>>,
}

impl PhenotypeTable {
    /// Create a new phenotype table
    pub fn new(sample_ids: Vec<String>) -> Self {
        {
            let mut seen = std::collections::HashSet::new();
            for id in &sample_ids {
                if !seen.insert(id) {
                    log::warn!("Duplicate sample id '{}' in phenotype table", id);
                }
            }
        }
        Self {
            sample_ids,
            columns: HashMap::new(),
        }
    }

    /// Add a categorical column
    pub fn add_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.sample_ids.len() {
            return Err(DgeError::DimensionMismatch {
                expected: format!("{} values", self.sample_ids.len()),
                got: format!("{} values", values.len()),
            });
        }
        self.columns.insert(name.to_string(), values);
        Ok(())
    }

    /// Check if a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Get values for a specific column
    pub fn column(&self, name: &str) -> Result<&[String]> {
        self.columns
            .get(name)
            .map(|v| v.as_slice())
            .ok_or_else(|| DgeError::UnknownColumn {
                column: name.to_string(),
            })
    }

    /// Get all column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|s| s.as_str()).collect()
    }

    /// Distinct values of a column, in order of first appearance.
    /// This is the group iteration order for partitioning.
    pub fn distinct_values(&self, column: &str) -> Result<Vec<String>> {
        let values = self.column(column)?;
        let mut seen = std::collections::HashSet::new();
        let mut distinct = Vec::new();
        for v in values {
            if seen.insert(v.as_str()) {
                distinct.push(v.clone());
            }
        }
        Ok(distinct)
    }

    /// Sample ids whose column value equals `value`
    pub fn samples_with_value(&self, column: &str, value: &str) -> Result<Vec<&str>> {
        let values = self.column(column)?;
        Ok(self
            .sample_ids
            .iter()
            .zip(values.iter())
            .filter(|(_, v)| v.as_str() == value)
            .map(|(id, _)| id.as_str())
            .collect())
    }

    /// Get the value of a column for a specific sample
    pub fn value(&self, column: &str, sample_idx: usize) -> Result<&str> {
        self.column(column)?
            .get(sample_idx)
            .map(|s| s.as_str())
            .ok_or_else(|| DgeError::InvalidInput {
                reason: format!("sample index {} out of range", sample_idx),
            })
    }

    /// Get sample IDs
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Get number of samples
    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }
}
