//! The expiry lifecycle engine: tick entry point plus the interactive paths

use crate::janitor::MaintenanceResult;
use crate::notify::{notify_expiring, NotifyOutcome};
use crate::recompute::{self, recompute_item_state};
use crate::report::InventoryReport;
use crate::settings::{ExpiredCounter, ExpirySettings};
use crate::{Janitor, JanitorConfig, JanitorError};
use chrono::NaiveDate;
use larder_domain::traits::{Clock, ItemStore, NotificationSink, PreferenceStore};
use larder_domain::{sort_items, GroceryItem, ItemEdit, ItemId, SortMode};
use std::fmt::Display;
use std::time::Instant;

/// Everything one tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Local day the tick ran against
    pub today: NaiveDate,
    /// Maintenance outcome
    pub maintenance: MaintenanceResult,
    /// Notification outcome
    pub notification: NotifyOutcome,
}

/// Owns the collaborators and runs maintenance followed by notification
///
/// # Examples
///
/// ```no_run
/// use larder_domain::traits::{DeliveryOutcome, NotificationSink, SystemClock};
/// use larder_janitor::{ExpiryLifecycle, JanitorConfig};
/// use larder_store::{SqlitePreferences, SqliteStore};
///
/// struct Stdout;
///
/// impl NotificationSink for Stdout {
///     fn deliver(&self, title: &str, body: &str) -> DeliveryOutcome {
///         println!("{}: {}", title, body);
///         DeliveryOutcome::Delivered
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = SqliteStore::new("larder.db")?;
/// let prefs = SqlitePreferences::new("larder.db")?;
/// let mut engine = ExpiryLifecycle::new(store, prefs, Stdout, SystemClock, JanitorConfig::default());
///
/// let report = engine.on_expiry_maintenance_tick()?;
/// println!("deleted {}", report.maintenance.deleted_count);
/// # Ok(())
/// # }
/// ```
pub struct ExpiryLifecycle<S, P, N, C> {
    store: S,
    prefs: P,
    sink: N,
    clock: C,
    janitor: Janitor,
}

impl<S, P, N, C> ExpiryLifecycle<S, P, N, C>
where
    S: ItemStore,
    S::Error: Display,
    P: PreferenceStore,
    P::Error: Display,
    N: NotificationSink,
    C: Clock,
{
    /// Assemble the engine
    pub fn new(store: S, prefs: P, sink: N, clock: C, config: JanitorConfig) -> Self {
        Self {
            store,
            prefs,
            sink,
            clock,
            janitor: Janitor::new(config),
        }
    }

    /// One firing of the daily job
    ///
    /// Runs maintenance, then notification, against the clock's current
    /// day. A failed maintenance read is returned as an error; notification
    /// problems only show up in [`TickReport::notification`].
    pub fn on_expiry_maintenance_tick(&mut self) -> Result<TickReport, JanitorError> {
        let start = Instant::now();
        let today = self.clock.today();
        let settings = ExpirySettings::load(&self.prefs)?;

        let maintenance =
            self.janitor
                .run_maintenance(&mut self.store, &mut self.prefs, &settings, today)?;

        let notification = notify_expiring(
            &self.sink,
            &mut self.prefs,
            &maintenance.remaining_items,
            &settings,
            today,
            self.janitor.metrics_mut(),
        )
        .unwrap_or_else(|e| {
            tracing::warn!("Notification step failed: {}", e);
            NotifyOutcome::Failed(e.to_string())
        });

        let elapsed = start.elapsed().as_millis() as u64;
        self.janitor.metrics_mut().record_tick(elapsed);

        tracing::info!(
            day = %today,
            deleted = maintenance.deleted_count,
            remaining = maintenance.remaining_items.len(),
            refreshed = maintenance.refreshed,
            notification = notification.as_str(),
            "Expiry maintenance tick completed"
        );

        Ok(TickReport {
            today,
            maintenance,
            notification,
        })
    }

    /// Current derived state of one item, for display
    pub fn recompute_item_state(&self, item: &GroceryItem) -> GroceryItem {
        recompute_item_state(item, self.clock.today())
    }

    /// Every item with fresh `days_left`, sorted
    ///
    /// `active_only` drops expired items.
    pub fn list_items(
        &self,
        mode: SortMode,
        active_only: bool,
    ) -> Result<Vec<GroceryItem>, JanitorError> {
        let items = self.store.list_all().map_err(JanitorError::store)?;
        Ok(self.present(items, mode, active_only))
    }

    /// Items in one category, sorted
    pub fn list_category(
        &self,
        category: &str,
        mode: SortMode,
    ) -> Result<Vec<GroceryItem>, JanitorError> {
        let items = self
            .store
            .list_by_category(category)
            .map_err(JanitorError::store)?;
        Ok(self.present(items, mode, false))
    }

    /// Items whose name or category contains `query`
    pub fn search(&self, query: &str, mode: SortMode) -> Result<Vec<GroceryItem>, JanitorError> {
        let items = self.store.search(query).map_err(JanitorError::store)?;
        Ok(self.present(items, mode, false))
    }

    /// Fetch one item with fresh state
    pub fn get_item(&self, id: ItemId) -> Result<GroceryItem, JanitorError> {
        self.store
            .get_item(id)
            .map_err(JanitorError::store)?
            .map(|item| self.recompute_item_state(&item))
            .ok_or(JanitorError::NotFound(id))
    }

    fn present(&self, items: Vec<GroceryItem>, mode: SortMode, active_only: bool) -> Vec<GroceryItem> {
        let today = self.clock.today();
        let fresh: Vec<GroceryItem> = items
            .iter()
            .map(|item| recompute_item_state(item, today))
            .filter(|item| !active_only || !item.is_expired())
            .collect();
        sort_items(&fresh, mode)
    }

    /// Validate, derive state for, and insert a new item
    pub fn add_item(&mut self, item: GroceryItem) -> Result<GroceryItem, JanitorError> {
        item.validate()?;
        let threshold = self.janitor.config().urgent_threshold_days;
        let mut item = recompute::prepare_new_item(item, self.clock.today(), threshold);
        item.id = self.store.insert(item.clone()).map_err(JanitorError::store)?;
        tracing::debug!(item_id = %item.id, name = %item.name, "Item added");
        Ok(item)
    }

    /// Edit-and-save
    pub fn edit_item(&mut self, id: ItemId, edit: &ItemEdit) -> Result<GroceryItem, JanitorError> {
        let existing = self.get_item(id)?;
        let edited = recompute::apply_edit(&existing, edit, self.clock.today());
        edited.validate()?;
        self.save(&edited)?;
        Ok(edited)
    }

    /// Star toggle
    pub fn toggle_urgent(&mut self, id: ItemId) -> Result<GroceryItem, JanitorError> {
        let mut item = self.get_item(id)?;
        item.toggle_urgent();
        self.save(&item)?;
        Ok(item)
    }

    fn save(&mut self, item: &GroceryItem) -> Result<(), JanitorError> {
        if self.store.update(item).map_err(JanitorError::store)? {
            Ok(())
        } else {
            Err(JanitorError::NotFound(item.id))
        }
    }

    /// User-initiated removal; does not touch the cumulative counter
    pub fn remove_items(&mut self, ids: &[ItemId]) -> Result<usize, JanitorError> {
        self.store.delete_by_ids(ids).map_err(JanitorError::store)
    }

    /// Statistics over the whole inventory
    pub fn report(&self) -> Result<InventoryReport, JanitorError> {
        let settings = ExpirySettings::load(&self.prefs)?;
        let cumulative = ExpiredCounter::get(&self.prefs)?;
        let items = self.list_items(SortMode::default(), false)?;
        Ok(InventoryReport::build(&items, cumulative, settings.warning_days))
    }

    /// Zero the cumulative expired counter
    pub fn reset_counter(&mut self) -> Result<(), JanitorError> {
        ExpiredCounter::reset(&mut self.prefs)?;
        tracing::info!("Cumulative expired counter reset");
        Ok(())
    }
}

impl<S, P, N, C> ExpiryLifecycle<S, P, N, C> {
    /// Item store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable item store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Preference store
    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    /// Mutable preference store
    pub fn prefs_mut(&mut self) -> &mut P {
        &mut self.prefs
    }

    /// Clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Notification sink
    pub fn sink(&self) -> &N {
        &self.sink
    }

    /// Maintenance policy and its metrics
    pub fn janitor(&self) -> &Janitor {
        &self.janitor
    }

    /// Active configuration
    pub fn config(&self) -> &JanitorConfig {
        self.janitor.config()
    }
}
