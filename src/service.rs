//! Inventory service: the entry point used by the presentation layer.
//!
//! Owns the [`ItemStore`] for its whole lifetime (opened on construction,
//! closed on drop) and keeps no cache; every call goes back to storage.
//! Failures are logged here and turned into sentinel values, so callers
//! always receive a well-formed result.

use crate::config::StoreConfig;
use crate::database::ItemStore;
use crate::error::Result;
use crate::models::{Criterion, InventoryItem, ItemPatch, WriteOutcome};

pub struct InventoryService {
    store: ItemStore,
    low_stock_threshold: i64,
}

impl InventoryService {
    /// Creates the service and opens the store described by `config`.
    ///
    /// An open failure does not prevent construction; check
    /// [`InventoryService::is_ready`] before relying on the results.
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_store(ItemStore::new(config.db_path.clone()), config.low_stock_threshold)
    }

    /// Wraps an existing store, opening it if needed.
    pub fn with_store(mut store: ItemStore, low_stock_threshold: i64) -> Self {
        if !store.open() {
            log::warn!(
                "Inventory store {} is unavailable; operations will return empty results",
                store.path().display()
            );
        }
        Self {
            store,
            low_stock_threshold,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.store.is_open()
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.low_stock_threshold
    }

    /// Shared access to the store for bulk readers such as report exports.
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// Persists a new item. Returns `false` if the write failed.
    pub fn add_item(&self, item: &InventoryItem) -> bool {
        match self.store.insert(item) {
            Ok(id) => {
                log::info!("Added component '{}' (id {})", item.name, id);
                true
            }
            Err(e) => {
                log::error!("Failed to add component '{}': {}", item.name, e);
                false
            }
        }
    }

    /// Every stored item; empty if the query failed.
    pub fn list_all(&self) -> Vec<InventoryItem> {
        self.store.get_all().unwrap_or_else(|e| {
            log::error!("Failed to list components: {}", e);
            Vec::new()
        })
    }

    /// Single item by identifier; `None` if absent or the query failed.
    pub fn get_item(&self, id: i64) -> Option<InventoryItem> {
        self.store.get(id).unwrap_or_else(|e| {
            log::error!("Failed to load component {}: {}", id, e);
            None
        })
    }

    /// Keyword search across name, category and location.
    pub fn search(&self, keyword: &str) -> Vec<InventoryItem> {
        self.store.search(keyword).unwrap_or_else(|e| {
            log::error!("Search for '{}' failed: {}", keyword, e);
            Vec::new()
        })
    }

    /// Items whose `criterion` field matches `keyword`.
    ///
    /// Scans the full listing in memory; see [`Criterion::matches`] for the
    /// comparison used per field.
    pub fn find_by(&self, keyword: &str, criterion: Criterion) -> Vec<InventoryItem> {
        let results: Vec<InventoryItem> = self
            .list_all()
            .into_iter()
            .filter(|item| criterion.matches(item, keyword))
            .collect();
        log::debug!(
            "find_by {}='{}' matched {} item(s)",
            criterion,
            keyword,
            results.len()
        );
        results
    }

    /// Like [`InventoryService::find_by`], with the criterion given as a label.
    ///
    /// Unknown labels are rejected instead of silently matching nothing.
    pub fn find_by_label(&self, keyword: &str, criterion: &str) -> Result<Vec<InventoryItem>> {
        let criterion: Criterion = criterion.parse()?;
        Ok(self.find_by(keyword, criterion))
    }

    pub fn update_item(&self, id: i64, item: &InventoryItem) -> WriteOutcome {
        match self.store.update(id, item) {
            Ok(WriteOutcome::NotFound) => {
                log::warn!("Update skipped: no component with id {}", id);
                WriteOutcome::NotFound
            }
            Ok(outcome) => {
                log::info!("Updated component {}", id);
                outcome
            }
            Err(e) => {
                log::error!("Failed to update component {}: {}", id, e);
                WriteOutcome::Failed
            }
        }
    }

    /// Applies `patch` to the stored item, leaving omitted fields as they are.
    pub fn patch_item(&self, id: i64, patch: &ItemPatch) -> WriteOutcome {
        let current = match self.store.get(id) {
            Ok(Some(item)) => item,
            Ok(None) => {
                log::warn!("Update skipped: no component with id {}", id);
                return WriteOutcome::NotFound;
            }
            Err(e) => {
                log::error!("Failed to load component {}: {}", id, e);
                return WriteOutcome::Failed;
            }
        };
        self.update_item(id, &patch.apply(&current))
    }

    pub fn remove_item(&self, id: i64) -> WriteOutcome {
        match self.store.delete(id) {
            Ok(WriteOutcome::NotFound) => {
                log::warn!("Delete skipped: no component with id {}", id);
                WriteOutcome::NotFound
            }
            Ok(outcome) => {
                log::info!("Removed component {}", id);
                outcome
            }
            Err(e) => {
                log::error!("Failed to remove component {}: {}", id, e);
                WriteOutcome::Failed
            }
        }
    }

    /// Items at or below the configured low-stock threshold.
    pub fn low_stock_items(&self) -> Vec<InventoryItem> {
        self.list_all()
            .into_iter()
            .filter(|item| item.is_low_stock(self.low_stock_threshold))
            .collect()
    }
}

impl Drop for InventoryService {
    fn drop(&mut self) {
        self.store.close();
    }
}
