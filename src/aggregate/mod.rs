//! Per-group mean expression profiles

use ndarray::Array2;

use crate::error::{DgeError, Result};
use crate::grouping::Group;

/// Per-gene arithmetic mean across a group's sample columns.
/// A single-sample group is valid (the mean is that sample's value);
/// a zero-sample group is rejected before any statistics run.
pub fn group_means(group: &Group) -> Result<Vec<f64>> {
    if group.n_samples() == 0 {
        return Err(DgeError::EmptyGroup {
            group: group.name().to_string(),
        });
    }
    Ok(group.data().gene_means())
}

/// Mean expression per group and gene (groups x genes).
/// A derived view: always recomputable from the Group set alone.
#[derive(Debug, Clone)]
pub struct GroupSummary {
    group_names: Vec<String>,
    gene_ids: Vec<String>,
    /// means[[group, gene]]
    means: Array2<f64>,
}

impl GroupSummary {
    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }

    pub fn gene_ids(&self) -> &[String] {
        &self.gene_ids
    }

    pub fn n_groups(&self) -> usize {
        self.group_names.len()
    }

    pub fn n_genes(&self) -> usize {
        self.gene_ids.len()
    }

    /// Mean expression of one gene in one group
    pub fn mean(&self, group_idx: usize, gene_idx: usize) -> f64 {
        self.means[[group_idx, gene_idx]]
    }

    /// Restrict the summary to the given gene ids (e.g. the selected
    /// top genes feeding a heatmap). Gene order follows the summary's
    /// own order; ids absent from the summary are ignored.
    pub fn subset_genes(&self, gene_ids: &[String]) -> Result<GroupSummary> {
        let wanted: std::collections::HashSet<&str> =
            gene_ids.iter().map(|s| s.as_str()).collect();
        let keep: Vec<usize> = self
            .gene_ids
            .iter()
            .enumerate()
            .filter(|(_, id)| wanted.contains(id.as_str()))
            .map(|(i, _)| i)
            .collect();

        if keep.is_empty() {
            return Err(DgeError::EmptyData {
                reason: "No requested genes present in the summary".to_string(),
            });
        }

        Ok(GroupSummary {
            group_names: self.group_names.clone(),
            gene_ids: keep.iter().map(|&i| self.gene_ids[i].clone()).collect(),
            means: self.means.select(ndarray::Axis(1), &keep),
        })
    }
}

/// Build the cross-group mean table. All groups must come from the same
/// partition and therefore share the first group's gene set.
pub fn mean_summary(groups: &[&Group]) -> Result<GroupSummary> {
    let first = groups.first().ok_or_else(|| DgeError::EmptyData {
        reason: "No groups to summarize".to_string(),
    })?;

    let gene_ids = first.gene_ids().to_vec();
    let n_genes = gene_ids.len();

    let mut means = Array2::zeros((groups.len(), n_genes));
    let mut group_names = Vec::with_capacity(groups.len());

    for (gi, group) in groups.iter().enumerate() {
        if group.gene_ids() != gene_ids.as_slice() {
            return Err(DgeError::InvalidInput {
                reason: format!(
                    "Group '{}' does not share the gene index of group '{}'",
                    group.name(),
                    first.name()
                ),
            });
        }
        let gm = group_means(group)?;
        for (idx, m) in gm.into_iter().enumerate() {
            means[[gi, idx]] = m;
        }
        group_names.push(group.name().to_string());
    }

    Ok(GroupSummary {
        group_names,
        gene_ids,
        means,
    })
}
