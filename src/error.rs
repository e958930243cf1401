//! Error types for component_inventory

use thiserror::Error;

/// Unified error type for store, search and report operations
#[derive(Debug, Error)]
pub enum InventoryError {
    /// SQLite operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// File I/O error (export target, database directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV serialization failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// PDF rendering or saving failed
    #[error("PDF error: {0}")]
    Pdf(String),
    /// Operation attempted on a store that is not open
    #[error("Store is not open")]
    StoreClosed,
    /// Search criterion label not recognised
    #[error("Unknown search criterion: {0}")]
    UnknownCriterion(String),
    /// Report format label not recognised
    #[error("Unknown report format: {0}")]
    UnknownFormat(String),
    /// Date text not in yyyy-MM-dd form
    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
}

/// Result alias for component_inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;
