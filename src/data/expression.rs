//! Expression matrix representation for preprocessed gene expression data

use std::collections::{HashMap, HashSet};

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{DgeError, Result};

/// Deduplicate names by appending _1, _2, etc. to duplicates
/// (matches the auto-rename behavior of upstream table ingest)
fn deduplicate_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for name in &names {
        *seen.entry(name.clone()).or_insert(0) += 1;
    }
    let has_dups = seen.values().any(|&c| c > 1);
    if !has_dups {
        return names;
    }
    seen.clear();
    let mut result = Vec::with_capacity(names.len());
    for name in names {
        let count = seen.entry(name.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            result.push(name);
        } else {
            let new_name = format!("{}_{}", name, *count - 1);
            log::warn!("Duplicate gene id '{}' renamed to '{}'", name, new_name);
            result.push(new_name);
        }
    }
    result
}

/// A preprocessed expression matrix.
/// Rows are genes, columns are samples. Values are expression intensities
/// as produced upstream; they may be log-scaled and therefore negative.
/// This type never re-transforms them.
#[derive(Debug, Clone)]
pub struct ExpressionMatrix {
    /// Expression values (genes x samples)
    values: Array2<f64>,
    /// Gene identifiers (e.g. symbols)
    gene_ids: Vec<String>,
    /// Sample identifiers
    sample_ids: Vec<String>,
}

impl ExpressionMatrix {
    /// Create a new expression matrix from raw data
    pub fn new(
        values: Array2<f64>,
        gene_ids: Vec<String>,
        sample_ids: Vec<String>,
    ) -> Result<Self> {
        let (n_genes, n_samples) = values.dim();

        if gene_ids.len() != n_genes {
            return Err(DgeError::DimensionMismatch {
                expected: format!("{} gene ids", n_genes),
                got: format!("{} gene ids", gene_ids.len()),
            });
        }

        if sample_ids.len() != n_samples {
            return Err(DgeError::DimensionMismatch {
                expected: format!("{} sample ids", n_samples),
                got: format!("{} sample ids", sample_ids.len()),
            });
        }

        // Intensities may be negative (log scale) but must be finite
        if values.iter().any(|&x| x.is_nan() || x.is_infinite()) {
            return Err(DgeError::InvalidMatrix {
                reason: "Expression values must be finite".to_string(),
            });
        }

        {
            let mut seen = HashSet::new();
            for id in &sample_ids {
                if !seen.insert(id) {
                    return Err(DgeError::InvalidMatrix {
                        reason: format!("Duplicate sample id '{}'", id),
                    });
                }
            }
        }

        let gene_ids = deduplicate_names(gene_ids);

        Ok(Self {
            values,
            gene_ids,
            sample_ids,
        })
    }

    /// Get the number of genes
    pub fn n_genes(&self) -> usize {
        self.values.nrows()
    }

    /// Get the number of samples
    pub fn n_samples(&self) -> usize {
        self.values.ncols()
    }

    /// Get the expression values as a view
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Get gene IDs
    pub fn gene_ids(&self) -> &[String] {
        &self.gene_ids
    }

    /// Get sample IDs
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Get expression values for a specific gene
    pub fn gene_row(&self, gene_idx: usize) -> ArrayView1<'_, f64> {
        self.values.row(gene_idx)
    }

    /// Get gene index by ID
    pub fn gene_index(&self, gene_id: &str) -> Option<usize> {
        self.gene_ids.iter().position(|id| id == gene_id)
    }

    /// Get sample index by ID
    pub fn sample_index(&self, sample_id: &str) -> Option<usize> {
        self.sample_ids.iter().position(|id| id == sample_id)
    }

    /// Calculate mean expression per gene across samples
    pub fn gene_means(&self) -> Vec<f64> {
        let n = self.n_samples() as f64;
        self.values
            .axis_iter(Axis(0))
            .map(|row| row.sum() / n)
            .collect()
    }

    /// Subset to specific samples
    pub fn subset_samples(&self, sample_indices: &[usize]) -> Result<Self> {
        let new_values = self.values.select(Axis(1), sample_indices);
        let new_sample_ids: Vec<String> = sample_indices
            .iter()
            .map(|&i| self.sample_ids[i].clone())
            .collect();

        Self::new(new_values, self.gene_ids.clone(), new_sample_ids)
    }

    /// Subset to specific genes
    pub fn subset_genes(&self, gene_indices: &[usize]) -> Result<Self> {
        let new_values = self.values.select(Axis(0), gene_indices);
        let new_gene_ids: Vec<String> = gene_indices
            .iter()
            .map(|&i| self.gene_ids[i].clone())
            .collect();

        Self::new(new_values, new_gene_ids, self.sample_ids.clone())
    }

    /// Keep only genes whose id appears in the given list, preserving
    /// matrix row order. Gene-list entries absent from the matrix are
    /// ignored (the caller may compare counts to report them).
    pub fn retain_genes(&self, gene_list: &[String]) -> Result<Self> {
        let wanted: HashSet<&str> = gene_list.iter().map(|s| s.as_str()).collect();
        let keep: Vec<usize> = self
            .gene_ids
            .iter()
            .enumerate()
            .filter(|(_, id)| wanted.contains(id.as_str()))
            .map(|(i, _)| i)
            .collect();

        if keep.is_empty() {
            return Err(DgeError::EmptyData {
                reason: "No genes from the list were found in the matrix".to_string(),
            });
        }

        self.subset_genes(&keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn matrix_3x3() -> ExpressionMatrix {
        ExpressionMatrix::new(
            array![[1.0, 2.0, 3.0], [-0.5, 0.5, 1.5], [4.0, 4.0, 4.0]],
            vec!["g1".to_string(), "g2".to_string(), "g3".to_string()],
            vec!["s1".to_string(), "s2".to_string(), "s3".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_matrix_creation() {
        let m = matrix_3x3();
        assert_eq!(m.n_genes(), 3);
        assert_eq!(m.n_samples(), 3);
        assert_eq!(m.gene_index("g2"), Some(1));
        assert_eq!(m.sample_index("s3"), Some(2));
    }

    #[test]
    fn test_negative_values_allowed() {
        // Log-scale intensities can be negative
        let m = matrix_3x3();
        assert_eq!(m.values()[[1, 0]], -0.5);
    }

    #[test]
    fn test_nan_rejected() {
        let result = ExpressionMatrix::new(
            array![[1.0, f64::NAN]],
            vec!["g1".to_string()],
            vec!["s1".to_string(), "s2".to_string()],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_dimension_mismatch() {
        let result = ExpressionMatrix::new(
            array![[1.0, 2.0]],
            vec!["g1".to_string(), "g2".to_string()],
            vec!["s1".to_string(), "s2".to_string()],
        );
        assert!(matches!(result, Err(DgeError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_subset_samples() {
        let m = matrix_3x3();
        let sub = m.subset_samples(&[0, 2]).unwrap();
        assert_eq!(sub.n_samples(), 2);
        assert_eq!(sub.sample_ids(), &["s1".to_string(), "s3".to_string()]);
        assert_eq!(sub.values()[[0, 1]], 3.0);
    }

    #[test]
    fn test_retain_genes_preserves_matrix_order() {
        let m = matrix_3x3();
        // List order differs from matrix order; matrix order wins
        let filtered = m
            .retain_genes(&["g3".to_string(), "g1".to_string()])
            .unwrap();
        assert_eq!(filtered.gene_ids(), &["g1".to_string(), "g3".to_string()]);
    }

    #[test]
    fn test_retain_genes_none_found() {
        let m = matrix_3x3();
        let result = m.retain_genes(&["missing".to_string()]);
        assert!(matches!(result, Err(DgeError::EmptyData { .. })));
    }

    #[test]
    fn test_duplicate_gene_ids_renamed() {
        let m = ExpressionMatrix::new(
            array![[1.0], [2.0]],
            vec!["g1".to_string(), "g1".to_string()],
            vec!["s1".to_string()],
        )
        .unwrap();
        assert_eq!(m.gene_ids(), &["g1".to_string(), "g1_1".to_string()]);
    }

    #[test]
    fn test_gene_means() {
        let m = matrix_3x3();
        let means = m.gene_means();
        assert_eq!(means[0], 2.0);
        assert_eq!(means[2], 4.0);
    }
}
