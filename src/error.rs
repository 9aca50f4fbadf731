//! Error types for geo_dge

use thiserror::Error;

/// Main error type for differential expression operations
#[derive(Error, Debug)]
pub enum DgeError {
    #[error("Group '{group}' has no samples")]
    EmptyGroup { group: String },

    #[error("Phenotype column '{column}' not found")]
    UnknownColumn { column: String },

    #[error("Invalid expression matrix: {reason}")]
    InvalidMatrix { reason: String },

    #[error("Invalid phenotype table: {reason}")]
    InvalidPhenotypes { reason: String },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    #[error("Empty data: {reason}")]
    EmptyData { reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for differential expression operations
pub type Result<T> = std::result::Result<T, DgeError>;
