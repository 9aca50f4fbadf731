//! Input/Output for differential expression analysis

pub(crate) mod csv;
pub(crate) mod results;

pub use self::csv::{
    read_expression_matrix, read_gene_list, read_phenotype_table, write_group_summary,
    write_results, write_results_json,
};
pub use results::{Contrast, DeResults, ResultsSummary};
