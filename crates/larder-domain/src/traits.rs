//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the expiry engine and its
//! collaborators. Infrastructure implementations live in other crates.

use crate::{GroceryItem, ItemId};
use chrono::{NaiveDate, NaiveDateTime};

/// Trait for storing and retrieving grocery items
///
/// Implemented by the infrastructure layer (larder-store). Single-statement
/// insert/update/delete are expected to be atomic.
pub trait ItemStore {
    /// Error type for store operations
    type Error;

    /// Every item, in insertion order
    fn list_all(&self) -> Result<Vec<GroceryItem>, Self::Error>;

    /// Get an item by id
    fn get_item(&self, id: ItemId) -> Result<Option<GroceryItem>, Self::Error>;

    /// Insert a new item; the store assigns and returns its id
    fn insert(&mut self, item: GroceryItem) -> Result<ItemId, Self::Error>;

    /// Overwrite an existing item; returns false if the id is unknown
    ///
    /// For user edits only. Background passes use [`Self::set_days_left`].
    fn update(&mut self, item: &GroceryItem) -> Result<bool, Self::Error>;

    /// Write only the derived `days_left` column, leaving user-owned
    /// fields untouched; returns false if the id is unknown
    fn set_days_left(&mut self, id: ItemId, days_left: i64) -> Result<bool, Self::Error>;

    /// Delete one item; returns false if it was already gone
    fn delete_by_id(&mut self, id: ItemId) -> Result<bool, Self::Error>;

    /// Delete several items; returns how many rows were actually removed
    fn delete_by_ids(&mut self, ids: &[ItemId]) -> Result<usize, Self::Error>;

    /// Items whose category matches, ignoring case
    fn list_by_category(&self, category: &str) -> Result<Vec<GroceryItem>, Self::Error>;

    /// Items whose name or category contains `query`, ignoring case
    fn search(&self, query: &str) -> Result<Vec<GroceryItem>, Self::Error>;
}

/// Trait for the user-preference key/value store
pub trait PreferenceStore {
    /// Error type for preference operations
    type Error;

    /// Read a boolean, falling back to `default` when unset
    fn get_bool(&self, key: &str, default: bool) -> Result<bool, Self::Error>;

    /// Read an integer, falling back to `default` when unset
    fn get_int(&self, key: &str, default: i64) -> Result<i64, Self::Error>;

    /// Write a boolean
    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), Self::Error>;

    /// Write an integer
    fn set_int(&mut self, key: &str, value: i64) -> Result<(), Self::Error>;

    /// Atomically add `delta` to an integer (unset counts as 0) and return
    /// the new value
    fn add_int(&mut self, key: &str, delta: i64) -> Result<i64, Self::Error>;

    /// Remove a key so the next read returns its default
    fn remove(&mut self, key: &str) -> Result<(), Self::Error>;

    /// Whether a key has been written
    fn contains(&self, key: &str) -> Result<bool, Self::Error>;
}

/// Result of handing a message to the notification sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The user was shown the message
    Delivered,
    /// The platform refused (permission revoked, channel disabled)
    PermissionDenied,
    /// Anything else went wrong
    Failed(String),
}

/// Trait for presenting a notification to the user
pub trait NotificationSink {
    /// Render and deliver one message
    fn deliver(&self, title: &str, body: &str) -> DeliveryOutcome;
}

/// Source of "now" in local wall-clock time
pub trait Clock {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;

    /// Current local calendar day
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// [`Clock`] backed by the system's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

impl<N: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<N> {
    fn deliver(&self, title: &str, body: &str) -> DeliveryOutcome {
        (**self).deliver(title, body)
    }
}
