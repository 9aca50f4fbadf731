//! Data structures for differential expression analysis

mod expression;
mod phenotype;

pub use expression::ExpressionMatrix;
pub use phenotype::PhenotypeTable;
