//! Grocery item module - the unit tracked by Larder

use crate::category::Category;
use crate::expiry::{days_left, parse_expiry, ExpiryError};
use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Store-assigned identifier for an item
///
/// Stable for the item's lifetime. Items that have not been inserted yet
/// carry [`ItemId::UNSAVED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(i64);

impl ItemId {
    /// Placeholder for items the store has not seen yet
    pub const UNSAVED: ItemId = ItemId(0);

    /// Wrap a raw store id
    pub fn from_value(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Whether the store has assigned this id
    pub fn is_saved(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(ItemId)
            .map_err(|e| format!("Invalid item id '{}': {}", s, e))
    }
}

/// Validation failures for user-entered items
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// Name is blank
    #[error("Name is required")]
    EmptyName,

    /// Quantity is blank
    #[error("Quantity is required")]
    EmptyQuantity,

    /// Expiry date is blank or not a calendar date
    #[error(transparent)]
    InvalidExpiry(#[from] ExpiryError),
}

/// A tracked grocery item
///
/// `days_left` is derived from `expiry` and the current day. The value held
/// here may be stale until the item passes through a recompute; readers
/// must tolerate negative values for items the maintenance job has not
/// removed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroceryItem {
    /// Store-assigned identifier
    pub id: ItemId,

    /// Display name
    pub name: String,

    /// Category name, compared case-insensitively
    pub category: String,

    /// Free-form quantity ("2 kg", "a dozen")
    pub quantity: String,

    /// Expiry date as stored (`YYYY-MM-DD`)
    pub expiry: String,

    /// Signed days until expiry, as of the last recompute
    pub days_left: i64,

    /// User-owned urgency flag
    pub urgent: bool,
}

impl GroceryItem {
    /// Create an unsaved item with no derived state yet
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: impl Into<String>,
        expiry: impl Into<String>,
    ) -> Self {
        Self {
            id: ItemId::UNSAVED,
            name: name.into(),
            category: category.into(),
            quantity: quantity.into(),
            expiry: expiry.into(),
            days_left: 0,
            urgent: false,
        }
    }

    /// Builder-style urgency setter
    pub fn with_urgent(mut self, urgent: bool) -> Self {
        self.urgent = urgent;
        self
    }

    /// Check required fields and the expiry format
    ///
    /// # Examples
    ///
    /// ```
    /// use larder_domain::{GroceryItem, ItemError};
    ///
    /// let item = GroceryItem::new("Milk", "Dairy", "1 l", "2024-05-01");
    /// assert!(item.validate().is_ok());
    ///
    /// let item = GroceryItem::new("  ", "Dairy", "1 l", "2024-05-01");
    /// assert_eq!(item.validate(), Err(ItemError::EmptyName));
    /// ```
    pub fn validate(&self) -> Result<(), ItemError> {
        if self.name.trim().is_empty() {
            return Err(ItemError::EmptyName);
        }
        if self.quantity.trim().is_empty() {
            return Err(ItemError::EmptyQuantity);
        }
        parse_expiry(&self.expiry)?;
        Ok(())
    }

    /// Parsed expiry date
    pub fn expiry_date(&self) -> Result<NaiveDate, ExpiryError> {
        parse_expiry(&self.expiry)
    }

    /// Copy of this item with `days_left` recomputed against `today`
    ///
    /// `urgent` is carried over untouched.
    pub fn refreshed(&self, today: NaiveDate) -> Result<GroceryItem, ExpiryError> {
        let expiry = self.expiry_date()?;
        Ok(GroceryItem {
            days_left: days_left(expiry, today),
            ..self.clone()
        })
    }

    /// Past its expiry date (as of the last recompute)
    pub fn is_expired(&self) -> bool {
        self.days_left < 0
    }

    /// Expires today or within the next `days` days
    pub fn is_expiring_within(&self, days: i64) -> bool {
        (0..=days).contains(&self.days_left)
    }

    /// The vocabulary category this item belongs to, if any
    pub fn category_kind(&self) -> Option<Category> {
        Category::parse(&self.category)
    }

    /// Flip the urgency flag (the star toggle)
    pub fn toggle_urgent(&mut self) {
        self.urgent = !self.urgent;
    }

    /// Apply a user edit, keeping anything the edit leaves unset
    ///
    /// `days_left` is not recomputed here; pass the result through a
    /// recompute before saving.
    pub fn apply_edit(&self, edit: &ItemEdit) -> GroceryItem {
        GroceryItem {
            id: self.id,
            name: edit.name.clone().unwrap_or_else(|| self.name.clone()),
            category: edit.category.clone().unwrap_or_else(|| self.category.clone()),
            quantity: edit.quantity.clone().unwrap_or_else(|| self.quantity.clone()),
            expiry: edit.expiry.clone().unwrap_or_else(|| self.expiry.clone()),
            days_left: self.days_left,
            urgent: edit.urgent.unwrap_or(self.urgent),
        }
    }
}

/// A partial update to an item; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemEdit {
    /// New name
    pub name: Option<String>,
    /// New category
    pub category: Option<String>,
    /// New quantity
    pub quantity: Option<String>,
    /// New expiry date
    pub expiry: Option<String>,
    /// Explicit urgency change
    pub urgent: Option<bool>,
}

impl ItemEdit {
    /// True when the edit changes nothing
    pub fn is_empty(&self) -> bool {
        self == &ItemEdit::default()
    }
}
