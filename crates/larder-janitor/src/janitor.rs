//! Maintenance pass: recompute, purge expired items, bump the counter

use crate::recompute::recompute_item_state;
use crate::settings::{ExpiredCounter, ExpirySettings};
use crate::{JanitorConfig, JanitorError, JanitorMetrics};
use chrono::NaiveDate;
use larder_domain::traits::{ItemStore, PreferenceStore};
use larder_domain::{GroceryItem, ItemId};
use std::fmt::Display;

/// Outcome of one maintenance pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenanceResult {
    /// Ids the store confirmed as deleted
    pub deleted_ids: Vec<ItemId>,
    /// `deleted_ids.len()`, the amount added to the cumulative counter
    pub deleted_count: usize,
    /// Every item still in the store, with fresh `days_left`
    pub remaining_items: Vec<GroceryItem>,
    /// Expired items left in place (auto-delete off, or dry run)
    pub expired_retained: usize,
    /// Expired items whose deletion the store rejected
    pub failed_ids: Vec<ItemId>,
    /// Items whose stored `days_left` was rewritten
    pub refreshed: usize,
    /// Counter value after this pass, if it was touched
    pub counter_total: Option<u64>,
}

/// Janitor service for the expiry maintenance pass
///
/// Responsible for:
/// - Recomputing `days_left` for every stored item
/// - Deleting expired items when auto-delete is enabled
/// - Adding confirmed deletions to the cumulative counter
/// - Collecting metrics on the above
///
/// # Examples
///
/// ```no_run
/// use larder_janitor::{ExpirySettings, Janitor};
/// use larder_store::{SqlitePreferences, SqliteStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqliteStore::new("larder.db")?;
/// let mut prefs = SqlitePreferences::new("larder.db")?;
/// let mut janitor = Janitor::default_config();
///
/// let settings = ExpirySettings::load(&prefs)?;
/// let today = chrono::Local::now().date_naive();
/// let result = janitor.run_maintenance(&mut store, &mut prefs, &settings, today)?;
/// println!("deleted {}", result.deleted_count);
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: JanitorConfig,
    metrics: JanitorMetrics,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        Self {
            config,
            metrics: JanitorMetrics::new(),
        }
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    pub(crate) fn metrics_mut(&mut self) -> &mut JanitorMetrics {
        &mut self.metrics
    }

    /// Run one maintenance pass against `today`
    ///
    /// 1. Reads every item and recomputes `days_left`, writing back stale values
    /// 2. Partitions into expired (`days_left < 0`) and live items
    /// 3. If auto-delete is on, deletes each expired item by id
    /// 4. Adds the number of confirmed deletions to the cumulative counter
    ///
    /// Only the initial read is fatal to the pass. Individual delete or
    /// write-back failures are logged and left for the next pass.
    pub fn run_maintenance<S, P>(
        &mut self,
        store: &mut S,
        prefs: &mut P,
        settings: &ExpirySettings,
        today: NaiveDate,
    ) -> Result<MaintenanceResult, JanitorError>
    where
        S: ItemStore,
        S::Error: Display,
        P: PreferenceStore,
        P::Error: Display,
    {
        let items = store.list_all().map_err(JanitorError::store)?;
        let mut result = MaintenanceResult::default();

        let mut expired = Vec::new();
        for item in items {
            let fresh = self.refresh(store, &item, today, &mut result);
            if fresh.is_expired() {
                expired.push(fresh);
            } else {
                result.remaining_items.push(fresh);
            }
        }

        if expired.is_empty() {
            return Ok(result);
        }

        if !settings.auto_delete_enabled {
            tracing::debug!("{} expired items retained (auto-delete off)", expired.len());
            result.expired_retained = expired.len();
            result.remaining_items.extend(expired);
            return Ok(result);
        }

        if self.config.dry_run {
            tracing::info!("DRY RUN: Would delete {} expired items", expired.len());
            result.expired_retained = expired.len();
            result.remaining_items.extend(expired);
            return Ok(result);
        }

        for item in expired {
            match store.delete_by_id(item.id) {
                Ok(true) => {
                    self.metrics.record_deletion(&item.category, 1);
                    result.deleted_ids.push(item.id);
                }
                Ok(false) => {
                    tracing::debug!(item_id = %item.id, "Expired item already gone");
                }
                Err(e) => {
                    tracing::error!(item_id = %item.id, "Failed to delete expired item: {}", e);
                    self.metrics.record_delete_failure();
                    result.failed_ids.push(item.id);
                    result.remaining_items.push(item);
                }
            }
        }
        result.deleted_count = result.deleted_ids.len();

        if result.deleted_count > 0 {
            match ExpiredCounter::add(prefs, result.deleted_count) {
                Ok(total) => {
                    tracing::info!(
                        "Deleted {} expired items (cumulative {})",
                        result.deleted_count,
                        total
                    );
                    result.counter_total = Some(total);
                }
                Err(e) => {
                    tracing::error!(
                        "Deleted {} expired items but could not update counter: {}",
                        result.deleted_count,
                        e
                    );
                }
            }
        }

        if !result.failed_ids.is_empty() {
            tracing::warn!(
                "{} expired items could not be deleted, retrying next tick",
                result.failed_ids.len()
            );
        }

        Ok(result)
    }

    /// Recompute one item and persist its new `days_left` if it changed
    fn refresh<S>(
        &mut self,
        store: &mut S,
        item: &GroceryItem,
        today: NaiveDate,
        result: &mut MaintenanceResult,
    ) -> GroceryItem
    where
        S: ItemStore,
        S::Error: Display,
    {
        if item.expiry_date().is_err() {
            self.metrics.record_parse_failure();
        }
        let fresh = recompute_item_state(item, today);
        if fresh.days_left == item.days_left || self.config.dry_run {
            return fresh;
        }

        match store.set_days_left(item.id, fresh.days_left) {
            Ok(true) => {
                self.metrics.record_refresh();
                result.refreshed += 1;
            }
            Ok(false) => {
                tracing::debug!(item_id = %item.id, "Item vanished before write-back");
            }
            Err(e) => {
                tracing::warn!(item_id = %item.id, "Failed to persist days_left: {}", e);
            }
        }
        fresh
    }
}
