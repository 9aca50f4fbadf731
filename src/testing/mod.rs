//! Per-gene differential expression statistics

mod welch;

pub use welch::{welch_t_test, WelchTest};

use std::collections::HashMap;

use rayon::prelude::*;

use crate::aggregate;
use crate::error::{DgeError, Result};
use crate::grouping::Group;
use crate::io::{Contrast, DeResults};

/// Compute per-gene differential expression statistics between two
/// groups: fold change (case mean minus control mean) and a two-sided
/// Welch's t-test p-value over the per-sample values.
///
/// The control group defines the gene universe: output rows follow the
/// control's gene order, restricted to genes also present in the case
/// group. Genes outside the intersection on either side are dropped,
/// counted on `DeResults::dropped_genes` and logged as a warning; a
/// mismatched gene set is never an error.
///
/// The fold change is a plain mean difference of the input values. It
/// is a log2 fold change only when the inputs are log-scaled upstream,
/// which this function does not check or enforce.
///
/// Zero variance in both groups yields a NaN p-value (not an error);
/// NaN p-values fail every `p < threshold` comparison downstream and so
/// are never selected as significant.
///
/// Pure and re-entrant: no state survives between calls, and identical
/// inputs reproduce bit-identical output. Each gene's test is
/// independent, so the loop runs as an order-preserving parallel map.
pub fn compute_de_stats(control: &Group, case: &Group) -> Result<DeResults> {
    for group in [control, case] {
        if group.n_samples() == 0 {
            return Err(DgeError::EmptyGroup {
                group: group.name().to_string(),
            });
        }
    }

    let case_index: HashMap<&str, usize> = case
        .gene_ids()
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    // Intersection in control's gene order
    let shared: Vec<(usize, usize)> = control
        .gene_ids()
        .iter()
        .enumerate()
        .filter_map(|(ci, id)| case_index.get(id.as_str()).map(|&qi| (ci, qi)))
        .collect();

    let control_only = control.n_genes() - shared.len();
    let case_only = case.n_genes() - shared.len();
    let dropped_genes = control_only + case_only;
    if dropped_genes > 0 {
        log::warn!(
            "Gene sets differ between '{}' and '{}': dropped {} genes outside the intersection \
             ({} control-only, {} case-only)",
            control.name(),
            case.name(),
            dropped_genes,
            control_only,
            case_only
        );
    }

    let control_values = control.data().values();
    let case_values = case.data().values();

    let stats: Vec<(f64, f64)> = shared
        .par_iter()
        .map(|&(ci, qi)| {
            let control_row = control_values.row(ci);
            let case_row = case_values.row(qi);

            let fold_change = case_row.mean().unwrap_or(f64::NAN)
                - control_row.mean().unwrap_or(f64::NAN);
            let p_value = welch_t_test(case_row, control_row).p_value;
            (fold_change, p_value)
        })
        .collect();

    let gene_ids: Vec<String> = shared
        .iter()
        .map(|&(ci, _)| control.gene_ids()[ci].clone())
        .collect();
    let fold_changes: Vec<f64> = stats.iter().map(|&(fc, _)| fc).collect();
    let p_values: Vec<f64> = stats.iter().map(|&(_, p)| p).collect();
    let neg_log10_pvalues: Vec<f64> = p_values.iter().map(|&p| -p.log10()).collect();

    Ok(DeResults {
        gene_ids,
        fold_changes,
        p_values,
        neg_log10_pvalues,
        contrast: Contrast {
            control: control.name().to_string(),
            case: case.name().to_string(),
        },
        dropped_genes,
    })
}

/// Validate the two groups and run the comparison. Thin facade kept so
/// callers check group means and emptiness in one place.
pub fn run_comparison(control: &Group, case: &Group) -> Result<DeResults> {
    // group_means re-checks emptiness; keeps EmptyGroup surfacing
    // before any statistical test is attempted
    aggregate::group_means(control)?;
    aggregate::group_means(case)?;
    compute_de_stats(control, case)
}
