//! Component Inventory - local parts tracking
//!
//! Keeps inventory items in a SQLite database, offers keyword and
//! field-scoped search, low-stock alerts, and CSV/PDF reports.

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod report;
pub mod service;

pub use config::StoreConfig;
pub use database::ItemStore;
pub use error::{InventoryError, Result};
pub use models::{
    Criterion, ExportRow, InventoryItem, ItemPatch, WriteOutcome, LOW_STOCK_THRESHOLD,
};
pub use report::{ReportExporter, ReportFormat};
pub use service::InventoryService;
