//! Larder Janitor
//!
//! The expiry lifecycle engine: keeps every item's shelf-life state current,
//! purges expired items, counts them, and sends one daily "expiring soon"
//! notification.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Recompute**: deriving `days_left` from the stored expiry date and today
//! - **Maintenance**: deleting expired items when auto-delete is enabled
//! - **Counting**: adding confirmed deletions to a durable cumulative counter
//! - **Notification**: composing one message about items inside the warning window
//! - **Scheduling**: firing all of the above once a day at a fixed local hour
//!
//! # Tick Lifecycle
//!
//! | Step | Component | Failure handling |
//! |------|-----------|------------------|
//! | Read settings | [`ExpirySettings`] | tick fails, retried |
//! | Recompute + purge | [`Janitor`] | list failure fails the tick; per-item failures are logged |
//! | Counter | [`ExpiredCounter`] | logged, never incremented past confirmed deletions |
//! | Notify | [`notify_expiring`] | logged; never rolls back maintenance |
//!
//! # Usage
//!
//! ## One-time Tick
//!
//! ```no_run
//! use larder_domain::traits::{DeliveryOutcome, NotificationSink, SystemClock};
//! use larder_janitor::{ExpiryLifecycle, JanitorConfig};
//! use larder_store::{SqlitePreferences, SqliteStore};
//!
//! struct Quiet;
//!
//! impl NotificationSink for Quiet {
//!     fn deliver(&self, _title: &str, _body: &str) -> DeliveryOutcome {
//!         DeliveryOutcome::Delivered
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("larder.db")?;
//! let prefs = SqlitePreferences::new("larder.db")?;
//! let mut engine = ExpiryLifecycle::new(store, prefs, Quiet, SystemClock, JanitorConfig::default());
//!
//! let report = engine.on_expiry_maintenance_tick()?;
//! println!("Deleted: {}", report.maintenance.deleted_count);
//! println!("\n{}", engine.janitor().metrics().summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Scheduler
//!
//! See [`ExpiryScheduler`]. It persists the next firing through the
//! preference store, so [`ExpiryScheduler::resume`] in a fresh process picks
//! up the same cadence and runs one catch-up tick if a firing was missed.
//!
//! ## Configuration Presets
//!
//! ```
//! use larder_janitor::JanitorConfig;
//!
//! // Default: noon, two retries 30s apart
//! let config = JanitorConfig::default();
//!
//! // Eager: five retries 5s apart
//! let config = JanitorConfig::eager();
//! ```
//!
//! # Configuration
//!
//! The Janitor can be configured via TOML:
//!
//! ```toml
//! [janitor]
//! fire_hour = 12
//! flex_window_minutes = 15
//! max_retries = 2
//! retry_backoff_secs = 30
//! urgent_threshold_days = 3
//! dry_run = false
//! ```
//!
//! User toggles (notifications, auto-delete, warning window) live in the
//! preference store instead; see [`settings::keys`].

#![warn(missing_docs)]

mod error;
mod config;
mod metrics;
mod janitor;
mod lifecycle;
mod notify;
mod recompute;
mod report;
mod schedule;
pub mod settings;
mod worker;

pub use error::JanitorError;
pub use config::JanitorConfig;
pub use metrics::JanitorMetrics;
pub use janitor::{Janitor, MaintenanceResult};
pub use lifecycle::{ExpiryLifecycle, TickReport};
pub use notify::{
    compose_message, digest, notify_expiring, select_expiring_soon, Notification, NotifyOutcome,
};
pub use recompute::{apply_edit, prepare_new_item, recompute_item_state};
pub use report::{CategorySummary, InventoryReport};
pub use schedule::{delay_until, is_drifted, next_fire_after};
pub use settings::{ExpiredCounter, ExpirySettings, NotificationMark, SchedulerState};
pub use worker::{ExpiryScheduler, SchedulerStatus, JOB_NAME};
