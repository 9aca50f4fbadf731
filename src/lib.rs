//! geo_dge: two-group differential gene expression analysis
//!
//! Takes a preprocessed expression matrix (genes x samples) and a sample
//! phenotype table, partitions samples into groups by a phenotype
//! column, and compares two groups gene-by-gene: fold change as the
//! difference of group means and a two-sided Welch's t-test p-value.
//! Downstream helpers rank and threshold the results (volcano plot and
//! heatmap inputs).
//!
//! # Example
//!
//! ```ignore
//! use geo_dge::prelude::*;
//!
//! let matrix = read_expression_matrix("expr.csv")?;
//! let phenotypes = read_phenotype_table("phenotypes.csv")?;
//!
//! let grouped = partition(&matrix, &phenotypes, "disease")?;
//! let control = grouped.group("normal").unwrap();
//! let case = grouped.group("tumor").unwrap();
//!
//! let results = run_comparison(control, case)?;
//! let top = select_top(&results, 1.0, 0.05, 10);
//! ```

pub mod aggregate;
pub mod cli;
pub mod data;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod io;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::aggregate::{group_means, mean_summary, GroupSummary};
    pub use crate::data::{ExpressionMatrix, PhenotypeTable};
    pub use crate::error::{DgeError, Result};
    pub use crate::filter::{is_significant, select_top, significance_flags};
    pub use crate::grouping::{partition, Group, GroupedExpression};
    pub use crate::io::{
        read_expression_matrix, read_gene_list, read_phenotype_table, write_group_summary,
        write_results, write_results_json, Contrast, DeResults, ResultsSummary,
    };
    pub use crate::testing::{compute_de_stats, run_comparison, welch_t_test, WelchTest};
}
