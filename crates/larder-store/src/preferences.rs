//! SQLite-backed preference store

use crate::{open_connection, StoreError};
use larder_domain::traits::PreferenceStore;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Key/value preferences persisted in the `preferences` table
pub struct SqlitePreferences {
    conn: Connection,
}

impl SqlitePreferences {
    /// Open (or create) the preference table at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Ok(Self {
            conn: open_connection(path)?,
        })
    }

    fn read(&self, key: &str) -> Result<Option<i64>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Every stored key with its raw value, sorted by key
    pub fn entries(&self) -> Result<Vec<(String, i64)>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM preferences ORDER BY key")?;
        let entries = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

impl PreferenceStore for SqlitePreferences {
    type Error = StoreError;

    fn get_bool(&self, key: &str, default: bool) -> Result<bool, Self::Error> {
        Ok(self.read(key)?.map(|v| v != 0).unwrap_or(default))
    }

    fn get_int(&self, key: &str, default: i64) -> Result<i64, Self::Error> {
        Ok(self.read(key)?.unwrap_or(default))
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), Self::Error> {
        self.write(key, i64::from(value))
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), Self::Error> {
        self.write(key, value)
    }

    fn add_int(&mut self, key: &str, delta: i64) -> Result<i64, Self::Error> {
        let value = self.conn.query_row(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = value + excluded.value
             RETURNING value",
            params![key, delta],
            |row| row.get(0),
        )?;
        Ok(value)
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        self.conn
            .execute("DELETE FROM preferences WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, Self::Error> {
        Ok(self.read(key)?.is_some())
    }
}
