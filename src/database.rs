//! SQLite persistence for inventory items.
//!
//! A single `components` table holds every item. All statements are
//! parameterized; the store assigns identifiers through `AUTOINCREMENT`, so
//! an id is never handed out twice for the lifetime of the database file.

use crate::error::{InventoryError, Result};
use crate::models::{parse_date, ExportRow, InventoryItem, WriteOutcome, DATE_FORMAT};
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};

/// Path value that selects a private in-memory database
pub const MEMORY_PATH: &str = ":memory:";

const SELECT_ITEMS: &str =
    "SELECT id, name, category, quantity, location, acquired_on FROM components";

/// Creates the `components` table if it does not already exist.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS components (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT,
            category    TEXT,
            quantity    INTEGER,
            location    TEXT,
            acquired_on TEXT
        );",
    )?;
    log::debug!("Inventory schema initialized");
    Ok(())
}

/// Owner of the inventory database handle.
///
/// The handle is opened explicitly with [`ItemStore::open`] and released with
/// [`ItemStore::close`]; every other operation on a closed store fails with
/// [`InventoryError::StoreClosed`].
pub struct ItemStore {
    path: PathBuf,
    conn: Option<Connection>,
}

impl ItemStore {
    /// Creates an unopened store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
        }
    }

    /// Creates an unopened store backed by a private in-memory database.
    pub fn in_memory() -> Self {
        Self::new(MEMORY_PATH)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Opens (or creates) the database and ensures the schema exists.
    ///
    /// Failures are logged and reported as `false`; callers must check the
    /// return value before relying on the store. Opening an already open
    /// store is a no-op.
    pub fn open(&mut self) -> bool {
        if self.conn.is_some() {
            return true;
        }
        match self.connect() {
            Ok(conn) => {
                log::info!("Opened inventory database: {}", self.path.display());
                self.conn = Some(conn);
                true
            }
            Err(e) => {
                log::error!(
                    "Failed to open inventory database {}: {}",
                    self.path.display(),
                    e
                );
                false
            }
        }
    }

    fn connect(&self) -> Result<Connection> {
        let conn = if self.path == Path::new(MEMORY_PATH) {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                    log::info!("Created directory: {}", parent.display());
                }
            }
            Connection::open(&self.path)?
        };
        init_schema(&conn)?;
        Ok(conn)
    }

    /// Releases the database handle. Safe to call on a closed store.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            match conn.close() {
                Ok(()) => log::debug!("Closed inventory database: {}", self.path.display()),
                Err((_, e)) => log::warn!(
                    "Error while closing inventory database {}: {}",
                    self.path.display(),
                    e
                ),
            }
        }
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(InventoryError::StoreClosed)
    }

    /// Appends a new row and returns the identifier the store assigned.
    ///
    /// Any `id` already set on `item` is ignored.
    pub fn insert(&self, item: &InventoryItem) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO components (name, category, quantity, location, acquired_on)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &item.name,
                &item.category,
                item.quantity,
                &item.location,
                date_text(item),
            ],
        )?;
        let id = conn.last_insert_rowid();
        log::debug!("Inserted component {} as id {}", item.name, id);
        Ok(id)
    }

    /// Returns every stored item in storage order.
    pub fn get_all(&self) -> Result<Vec<InventoryItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(SELECT_ITEMS)?;
        let items = stmt
            .query_map([], item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    /// Looks up a single item by identifier.
    pub fn get(&self, id: i64) -> Result<Option<InventoryItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SELECT_ITEMS} WHERE id = ?1"))?;
        let mut rows = stmt.query_map(params![id], item_from_row)?;
        let item = rows.next().transpose()?;
        Ok(item)
    }

    /// Returns items whose name, category or location contains `keyword`.
    ///
    /// Matching uses SQLite `LIKE`, which ignores ASCII case. Wildcard
    /// characters in the keyword are matched literally; an empty keyword
    /// matches every row.
    pub fn search(&self, keyword: &str) -> Result<Vec<InventoryItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_ITEMS}
             WHERE name LIKE ?1 ESCAPE '\\'
                OR category LIKE ?1 ESCAPE '\\'
                OR location LIKE ?1 ESCAPE '\\'"
        ))?;
        let pattern = like_pattern(keyword);
        let items = stmt
            .query_map(params![pattern], item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    /// Overwrites every field of row `id` with the fields of `item`.
    ///
    /// `item.id` is ignored. Returns [`WriteOutcome::NotFound`] when no row
    /// has that identifier.
    pub fn update(&self, id: i64, item: &InventoryItem) -> Result<WriteOutcome> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE components
             SET name = ?1, category = ?2, quantity = ?3, location = ?4, acquired_on = ?5
             WHERE id = ?6",
            params![
                &item.name,
                &item.category,
                item.quantity,
                &item.location,
                date_text(item),
                id,
            ],
        )?;
        Ok(outcome(changed))
    }

    /// Removes row `id`. Returns [`WriteOutcome::NotFound`] when absent.
    pub fn delete(&self, id: i64) -> Result<WriteOutcome> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM components WHERE id = ?1", params![id])?;
        Ok(outcome(changed))
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM components", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Streams every row (all columns except `id`) to `visit` in storage order.
    ///
    /// This is the bulk read behind report exports. The visitor may abort the
    /// scan by returning an error, which is passed through. Returns the number
    /// of rows visited.
    pub fn for_each_export_row<F>(&self, mut visit: F) -> Result<usize>
    where
        F: FnMut(ExportRow) -> Result<()>,
    {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT name, category, quantity, location, acquired_on FROM components")?;
        let mut rows = stmt.query([])?;

        let mut visited = 0;
        while let Some(row) = rows.next()? {
            let export_row = ExportRow {
                name: text_column(row, 0)?,
                category: text_column(row, 1)?,
                quantity: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                location: text_column(row, 3)?,
                acquired_on: text_column(row, 4)?,
            };
            visit(export_row)?;
            visited += 1;
        }
        Ok(visited)
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }
}

fn outcome(changed: usize) -> WriteOutcome {
    if changed == 0 {
        WriteOutcome::NotFound
    } else {
        WriteOutcome::Applied
    }
}

fn date_text(item: &InventoryItem) -> Option<String> {
    item.acquired_on.map(|d| d.format(DATE_FORMAT).to_string())
}

fn text_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<InventoryItem> {
    let acquired_on: Option<String> = row.get(5)?;
    Ok(InventoryItem {
        id: Some(row.get(0)?),
        name: text_column(row, 1)?,
        category: text_column(row, 2)?,
        quantity: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
        location: text_column(row, 4)?,
        acquired_on: acquired_on.as_deref().and_then(parse_date),
    })
}

/// Wraps `keyword` in `%...%`, escaping LIKE wildcards with `\`.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
