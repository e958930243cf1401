//! Store configuration

use crate::models::LOW_STOCK_THRESHOLD;
use std::path::PathBuf;

/// Database file used when no path is given, relative to the working directory
pub const DEFAULT_DB_FILE: &str = "inventory.db";

/// Settings needed to open the inventory and evaluate alerts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub db_path: PathBuf,
    /// Items with a quantity at or below this value are low on stock
    pub low_stock_threshold: i64,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            low_stock_threshold: LOW_STOCK_THRESHOLD,
        }
    }
}
