//! Larder Storage Layer
//!
//! Implements the `ItemStore` and `PreferenceStore` traits on SQLite.
//!
//! # Architecture
//!
//! - `grocery_items` holds the tracked items, with the last computed
//!   `days_left` persisted alongside the expiry date
//! - `preferences` is a flat key/value table of integers (booleans are
//!   stored as 0/1) holding user settings, the cumulative expired counter
//!   and the scheduler state
//!
//! Items and preferences use separate connections so the expiry engine can
//! hold both mutably at once.
//!
//! # Examples
//!
//! ```no_run
//! use larder_store::{SqlitePreferences, SqliteStore};
//!
//! let store = SqliteStore::new("larder.db").unwrap();
//! let prefs = SqlitePreferences::new("larder.db").unwrap();
//! ```

#![warn(missing_docs)]

mod preferences;

pub use preferences::SqlitePreferences;

use larder_domain::traits::ItemStore;
use larder_domain::{GroceryItem, ItemId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Item not found
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// How long a writer waits on another process's lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a connection and make sure the schema exists
pub(crate) fn open_connection<P: AsRef<Path>>(path: P) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch(include_str!("schema.sql"))?;
    Ok(conn)
}

const ITEM_COLUMNS: &str = "id, name, category, quantity, expiry, days_left, urgent";

/// SQLite-based implementation of ItemStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance, or share one behind a mutex.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Ok(Self {
            conn: open_connection(path)?,
        })
    }

    fn row_to_item(row: &Row<'_>) -> rusqlite::Result<GroceryItem> {
        Ok(GroceryItem {
            id: ItemId::from_value(row.get(0)?),
            name: row.get(1)?,
            category: row.get(2)?,
            quantity: row.get(3)?,
            expiry: row.get(4)?,
            days_left: row.get(5)?,
            urgent: row.get(6)?,
        })
    }

    fn query_items(
        &self,
        filter: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<GroceryItem>, StoreError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM grocery_items {filter} ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(params, Self::row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }
}

/// Escape LIKE wildcards so user input matches literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl ItemStore for SqliteStore {
    type Error = StoreError;

    fn list_all(&self) -> Result<Vec<GroceryItem>, Self::Error> {
        self.query_items("", &[])
    }

    fn get_item(&self, id: ItemId) -> Result<Option<GroceryItem>, Self::Error> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM grocery_items WHERE id = ?1");
        let item = self
            .conn
            .query_row(&sql, params![id.value()], Self::row_to_item)
            .optional()?;
        Ok(item)
    }

    fn insert(&mut self, item: GroceryItem) -> Result<ItemId, Self::Error> {
        if item.name.trim().is_empty() {
            return Err(StoreError::InvalidData("item name is empty".to_string()));
        }

        self.conn.execute(
            "INSERT INTO grocery_items (name, category, quantity, expiry, days_left, urgent)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &item.name,
                &item.category,
                &item.quantity,
                &item.expiry,
                item.days_left,
                item.urgent,
            ],
        )?;

        let id = ItemId::from_value(self.conn.last_insert_rowid());
        tracing::debug!(item_id = %id, name = %item.name, "inserted item");
        Ok(id)
    }

    fn update(&mut self, item: &GroceryItem) -> Result<bool, Self::Error> {
        let changed = self.conn.execute(
            "UPDATE grocery_items
             SET name = ?1, category = ?2, quantity = ?3, expiry = ?4, days_left = ?5, urgent = ?6
             WHERE id = ?7",
            params![
                &item.name,
                &item.category,
                &item.quantity,
                &item.expiry,
                item.days_left,
                item.urgent,
                item.id.value(),
            ],
        )?;
        Ok(changed > 0)
    }

    fn set_days_left(&mut self, id: ItemId, days_left: i64) -> Result<bool, Self::Error> {
        let changed = self.conn.execute(
            "UPDATE grocery_items SET days_left = ?1 WHERE id = ?2",
            params![days_left, id.value()],
        )?;
        Ok(changed > 0)
    }

    fn delete_by_id(&mut self, id: ItemId) -> Result<bool, Self::Error> {
        let changed = self
            .conn
            .execute("DELETE FROM grocery_items WHERE id = ?1", params![id.value()])?;
        tracing::debug!(item_id = %id, deleted = changed > 0, "delete by id");
        Ok(changed > 0)
    }

    fn delete_by_ids(&mut self, ids: &[ItemId]) -> Result<usize, Self::Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        let mut deleted = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM grocery_items WHERE id = ?1")?;
            for id in ids {
                deleted += stmt.execute(params![id.value()])?;
            }
        }
        tx.commit()?;

        tracing::debug!(requested = ids.len(), deleted, "bulk delete");
        Ok(deleted)
    }

    fn list_by_category(&self, category: &str) -> Result<Vec<GroceryItem>, Self::Error> {
        self.query_items(
            "WHERE TRIM(category) = TRIM(?1) COLLATE NOCASE",
            &[&category as &dyn rusqlite::ToSql],
        )
    }

    fn search(&self, query: &str) -> Result<Vec<GroceryItem>, Self::Error> {
        let pattern = like_pattern(query.trim());
        self.query_items(
            "WHERE name LIKE ?1 ESCAPE '\\' OR category LIKE ?1 ESCAPE '\\'",
            &[&pattern as &dyn rusqlite::ToSql],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("milk"), "%milk%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn test_insert_assigns_ids() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let a = store.insert(GroceryItem::new("Milk", "Dairy", "1 l", "2024-06-20")).unwrap();
        let b = store.insert(GroceryItem::new("Eggs", "Dairy", "12", "2024-06-22")).unwrap();

        assert!(a.is_saved());
        assert!(b > a);
        assert_eq!(store.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_insert_rejects_blank_name() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let result = store.insert(GroceryItem::new("  ", "Dairy", "1", "2024-06-20"));
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let mut ghost = GroceryItem::new("Ghost", "Other", "1", "2024-06-20");
        ghost.id = ItemId::from_value(999);
        assert!(!store.update(&ghost).unwrap());
        assert!(!store.set_days_left(ghost.id, 3).unwrap());
    }

    #[test]
    fn test_set_days_left_touches_only_derived_column() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let id = store
            .insert(GroceryItem::new("Milk", "Dairy", "1 l", "2024-06-20").with_urgent(true))
            .unwrap();

        assert!(store.set_days_left(id, 5).unwrap());

        let item = store.get_item(id).unwrap().unwrap();
        assert_eq!(item.days_left, 5);
        assert!(item.urgent);
        assert_eq!(item.expiry, "2024-06-20");
        assert_eq!(item.name, "Milk");
    }
}
