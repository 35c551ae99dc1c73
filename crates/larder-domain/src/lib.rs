//! Larder Domain Layer
//!
//! This crate contains the domain model for Larder, a personal grocery
//! tracker whose interesting part is the expiry lifecycle: deriving each
//! item's remaining shelf life, classifying urgency, and ordering items for
//! display.
//!
//! ## Key Concepts
//!
//! - **GroceryItem**: A perishable item with a calendar expiry date
//! - **days_left**: Signed distance in local days from today to the expiry date
//! - **urgent**: A user-owned flag, set at creation or by explicit toggle
//! - **Category**: A fixed vocabulary matched case-insensitively
//! - **SortMode**: Stable orderings consumed by list views
//!
//! ## Architecture
//!
//! - Pure business logic only, no I/O and no logging
//! - Trait definitions for every external collaborator (item store,
//!   preference store, notification sink, clock)
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod expiry;
pub mod item;
pub mod sort;
pub mod traits;

// Re-exports for convenience
pub use category::Category;
pub use expiry::{
    days_between, days_left, days_left_from_str, is_urgent_at_creation, parse_expiry, ExpiryError,
    EXPIRY_DATE_FORMAT, URGENT_THRESHOLD_DAYS,
};
pub use item::{GroceryItem, ItemEdit, ItemError, ItemId};
pub use sort::{sort_items, SortMode};
