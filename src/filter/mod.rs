//! Significance classification and top-N selection

use crate::io::results::cmp_pvalues_nan_last;
use crate::io::DeResults;

/// Significance rule applied to a single gene.
///
/// Inclusive on the fold-change magnitude, strict on the p-value; the
/// two operators differ deliberately and match the thresholds the
/// defaults were tuned against. A NaN p-value fails the comparison and
/// is therefore never significant.
pub fn is_significant(fold_change: f64, p_value: f64, fc_threshold: f64, p_threshold: f64) -> bool {
    fold_change.abs() >= fc_threshold && p_value < p_threshold
}

/// Per-gene significance flags, aligned with the results table order.
/// Used for coloring the volcano plot.
pub fn significance_flags(results: &DeResults, fc_threshold: f64, p_threshold: f64) -> Vec<bool> {
    results
        .fold_changes
        .iter()
        .zip(results.p_values.iter())
        .map(|(&fc, &p)| is_significant(fc, p, fc_threshold, p_threshold))
        .collect()
}

/// Select the `top_n` most significant genes: filter by the
/// significance rule, rank ascending by p-value (stable on ties),
/// truncate. Returns fewer than `top_n` rows when fewer qualify and an
/// empty table for `top_n = 0`; the input is left untouched.
pub fn select_top(
    results: &DeResults,
    fc_threshold: f64,
    p_threshold: f64,
    top_n: usize,
) -> DeResults {
    let mut indices: Vec<usize> = (0..results.n_genes())
        .filter(|&i| {
            is_significant(
                results.fold_changes[i],
                results.p_values[i],
                fc_threshold,
                p_threshold,
            )
        })
        .collect();

    indices.sort_by(|&a, &b| cmp_pvalues_nan_last(results.p_values[a], results.p_values[b]));
    indices.truncate(top_n);

    results.subset(&indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Contrast;

    fn results(rows: &[(&str, f64, f64)]) -> DeResults {
        DeResults {
            gene_ids: rows.iter().map(|(id, _, _)| id.to_string()).collect(),
            fold_changes: rows.iter().map(|&(_, fc, _)| fc).collect(),
            p_values: rows.iter().map(|&(_, _, p)| p).collect(),
            neg_log10_pvalues: rows.iter().map(|&(_, _, p)| -p.log10()).collect(),
            contrast: Contrast {
                control: "A".to_string(),
                case: "B".to_string(),
            },
            dropped_genes: 0,
        }
    }

    #[test]
    fn test_select_ranks_by_pvalue() {
        let r = results(&[
            ("G1", 2.0, 0.03),
            ("G2", -1.5, 0.001),
            ("G3", 3.0, 0.01),
        ]);
        let selected = select_top(&r, 1.0, 0.05, 10);
        assert_eq!(selected.gene_ids, vec!["G2", "G3", "G1"]);
    }

    #[test]
    fn test_select_respects_top_n() {
        let r = results(&[
            ("G1", 2.0, 0.03),
            ("G2", -1.5, 0.001),
            ("G3", 3.0, 0.01),
        ]);
        let selected = select_top(&r, 1.0, 0.05, 2);
        assert_eq!(selected.n_genes(), 2);
        assert_eq!(selected.gene_ids, vec!["G2", "G3"]);
    }

    #[test]
    fn test_select_top_zero_is_empty() {
        let r = results(&[("G1", 5.0, 0.0001)]);
        let selected = select_top(&r, 1.0, 0.05, 0);
        assert_eq!(selected.n_genes(), 0);
    }

    #[test]
    fn test_select_every_row_passes_thresholds() {
        let r = results(&[
            ("G1", 0.5, 0.001),   // |fc| below threshold
            ("G2", 2.0, 0.2),     // p above threshold
            ("G3", 1.0, 0.01),    // |fc| exactly at threshold: included
            ("G4", -2.0, 0.05),   // p exactly at threshold: excluded
            ("G5", 4.0, f64::NAN),
        ]);
        let selected = select_top(&r, 1.0, 0.05, 10);
        assert_eq!(selected.gene_ids, vec!["G3"]);
        for i in 0..selected.n_genes() {
            assert!(selected.fold_changes[i].abs() >= 1.0);
            assert!(selected.p_values[i] < 0.05);
        }
    }

    #[test]
    fn test_select_nothing_qualifies() {
        let r = results(&[("G1", 2.0, 0.5), ("G2", 3.0, f64::NAN)]);
        let selected = select_top(&r, 1.0, 1e-10, 10);
        assert_eq!(selected.n_genes(), 0);
    }

    #[test]
    fn test_select_stable_on_ties() {
        let r = results(&[
            ("G1", 2.0, 0.01),
            ("G2", 2.0, 0.01),
            ("G3", 2.0, 0.01),
        ]);
        let selected = select_top(&r, 1.0, 0.05, 10);
        // Ties keep input order
        assert_eq!(selected.gene_ids, vec!["G1", "G2", "G3"]);
    }

    #[test]
    fn test_input_not_mutated() {
        let r = results(&[("G1", 2.0, 0.03), ("G2", 3.0, 0.001)]);
        let before = r.gene_ids.clone();
        let _ = select_top(&r, 1.0, 0.05, 1);
        assert_eq!(r.gene_ids, before);
    }

    #[test]
    fn test_significance_flags() {
        let r = results(&[("G1", 2.0, 0.01), ("G2", 0.2, 0.01), ("G3", 2.0, 0.9)]);
        assert_eq!(
            significance_flags(&r, 1.0, 0.05),
            vec![true, false, false]
        );
    }
}
