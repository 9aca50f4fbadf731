//! Differential expression results table

use serde::{Deserialize, Serialize};

/// Which two groups were compared
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contrast {
    /// Control (baseline) group name
    pub control: String,
    /// Case group name
    pub case: String,
}

/// Results of a two-group differential expression comparison.
/// Column-oriented: one entry per gene across all vectors, in the
/// engine's output order (the control group's gene order). Row order
/// carries no meaning; rank explicitly via `sorted_by_pvalue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeResults {
    /// Gene identifiers
    pub gene_ids: Vec<String>,
    /// Case mean minus control mean. A log2 fold change only when the
    /// input intensities are log-scaled upstream; stored as computed.
    pub fold_changes: Vec<f64>,
    /// Two-sided Welch's t-test p-values (no multiple-testing
    /// correction applied; NaN for degenerate genes)
    pub p_values: Vec<f64>,
    /// -log10(p), the volcano plot y axis
    pub neg_log10_pvalues: Vec<f64>,
    /// The compared groups
    pub contrast: Contrast,
    /// Genes outside the control/case gene intersection, excluded from
    /// the table
    pub dropped_genes: usize,
}

/// Ascending comparison that sends NaN last, keeping ties stable
pub(crate) fn cmp_pvalues_nan_last(a: f64, b: f64) -> std::cmp::Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal),
    }
}

impl DeResults {
    /// Get number of genes in the table
    pub fn n_genes(&self) -> usize {
        self.gene_ids.len()
    }

    /// New table holding the given rows, in the given order
    pub fn subset(&self, indices: &[usize]) -> DeResults {
        DeResults {
            gene_ids: indices.iter().map(|&i| self.gene_ids[i].clone()).collect(),
            fold_changes: indices.iter().map(|&i| self.fold_changes[i]).collect(),
            p_values: indices.iter().map(|&i| self.p_values[i]).collect(),
            neg_log10_pvalues: indices
                .iter()
                .map(|&i| self.neg_log10_pvalues[i])
                .collect(),
            contrast: self.contrast.clone(),
            dropped_genes: self.dropped_genes,
        }
    }

    /// Ranked copy: ascending by p-value, NaN last, ties stable
    pub fn sorted_by_pvalue(&self) -> DeResults {
        let mut indices: Vec<usize> = (0..self.n_genes()).collect();
        indices.sort_by(|&a, &b| cmp_pvalues_nan_last(self.p_values[a], self.p_values[b]));
        self.subset(&indices)
    }

    /// Gene ids passing both thresholds (|fc| inclusive, p strict)
    pub fn significant_genes(&self, fc_threshold: f64, p_threshold: f64) -> Vec<&str> {
        self.gene_ids
            .iter()
            .zip(self.fold_changes.iter().zip(self.p_values.iter()))
            .filter(|(_, (&fc, &p))| fc.abs() >= fc_threshold && p < p_threshold)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Significant genes with positive fold change
    pub fn upregulated_genes(&self, fc_threshold: f64, p_threshold: f64) -> Vec<&str> {
        self.gene_ids
            .iter()
            .zip(self.fold_changes.iter().zip(self.p_values.iter()))
            .filter(|(_, (&fc, &p))| fc >= fc_threshold && p < p_threshold)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Significant genes with negative fold change
    pub fn downregulated_genes(&self, fc_threshold: f64, p_threshold: f64) -> Vec<&str> {
        self.gene_ids
            .iter()
            .zip(self.fold_changes.iter().zip(self.p_values.iter()))
            .filter(|(_, (&fc, &p))| fc <= -fc_threshold && p < p_threshold)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Summary statistics at the given thresholds
    pub fn summary(&self, fc_threshold: f64, p_threshold: f64) -> ResultsSummary {
        ResultsSummary {
            total_genes: self.n_genes(),
            genes_tested: self.p_values.iter().filter(|p| p.is_finite()).count(),
            significant: self.significant_genes(fc_threshold, p_threshold).len(),
            upregulated: self.upregulated_genes(fc_threshold, p_threshold).len(),
            downregulated: self.downregulated_genes(fc_threshold, p_threshold).len(),
            dropped_genes: self.dropped_genes,
            fc_threshold,
            p_threshold,
        }
    }
}

/// Summary of a differential expression comparison
#[derive(Debug, Clone)]
pub struct ResultsSummary {
    pub total_genes: usize,
    pub genes_tested: usize,
    pub significant: usize,
    pub upregulated: usize,
    pub downregulated: usize,
    pub dropped_genes: usize,
    pub fc_threshold: f64,
    pub p_threshold: f64,
}

impl std::fmt::Display for ResultsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Differential Expression Summary")?;
        writeln!(f, "===============================")?;
        writeln!(f, "Genes compared: {}", self.total_genes)?;
        writeln!(f, "Genes tested (finite p): {}", self.genes_tested)?;
        if self.dropped_genes > 0 {
            writeln!(f, "Genes dropped (set mismatch): {}", self.dropped_genes)?;
        }
        writeln!(
            f,
            "Significant (|FC| >= {} & p < {}): {}",
            self.fc_threshold, self.p_threshold, self.significant
        )?;
        writeln!(f, "  Up-regulated: {}", self.upregulated)?;
        writeln!(f, "  Down-regulated: {}", self.downregulated)?;
        Ok(())
    }
}
