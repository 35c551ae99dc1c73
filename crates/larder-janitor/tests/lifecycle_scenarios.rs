//! End-to-end expiry scenarios against a real SQLite database

use chrono::{NaiveDate, NaiveDateTime};
use larder_domain::traits::{Clock, DeliveryOutcome, ItemStore, NotificationSink, PreferenceStore};
use larder_domain::{GroceryItem, ItemId, SortMode};
use larder_janitor::settings::keys;
use larder_janitor::{
    ExpiredCounter, ExpiryLifecycle, ExpirySettings, Janitor, JanitorConfig, NotifyOutcome,
};
use larder_store::{SqlitePreferences, SqliteStore, StoreError};
use std::cell::RefCell;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Clone, Copy)]
struct FixedClock(NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Default)]
struct Inbox {
    messages: Mutex<Vec<(String, String)>>,
}

impl Inbox {
    fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl NotificationSink for Inbox {
    fn deliver(&self, title: &str, body: &str) -> DeliveryOutcome {
        self.messages
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        DeliveryOutcome::Delivered
    }
}

type Engine = ExpiryLifecycle<SqliteStore, SqlitePreferences, Arc<Inbox>, FixedClock>;

fn noon(day: u32) -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
    )
}

fn open(path: &Path, clock: FixedClock, inbox: &Arc<Inbox>) -> Engine {
    ExpiryLifecycle::new(
        SqliteStore::new(path).unwrap(),
        SqlitePreferences::new(path).unwrap(),
        Arc::clone(inbox),
        clock,
        JanitorConfig::default(),
    )
}

#[test]
fn test_expired_item_removed_and_counted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("larder.db");
    let inbox = Arc::new(Inbox::default());
    let mut engine = open(&path, noon(15), &inbox);

    engine
        .add_item(GroceryItem::new("Yogurt", "Dairy", "4", "2024-06-13"))
        .unwrap();
    engine.prefs_mut().set_bool(keys::AUTO_DELETE_EXPIRED, true).unwrap();

    let report = engine.on_expiry_maintenance_tick().unwrap();
    assert_eq!(report.maintenance.deleted_count, 1);
    assert!(engine.store().list_all().unwrap().is_empty());
    assert_eq!(ExpiredCounter::get(engine.prefs()).unwrap(), 1);
}

#[test]
fn test_warning_window_message() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("larder.db");
    let inbox = Arc::new(Inbox::default());
    let mut engine = open(&path, noon(15), &inbox);

    for (name, expiry) in [
        ("Milk", "2024-06-15"),
        ("Bread", "2024-06-16"),
        ("Rice", "2024-06-20"),
    ] {
        engine
            .add_item(GroceryItem::new(name, "Other", "1", expiry))
            .unwrap();
    }

    let report = engine.on_expiry_maintenance_tick().unwrap();
    assert_eq!(report.notification, NotifyOutcome::Delivered { count: 2 });
    assert_eq!(
        inbox.messages(),
        vec![(
            "2 items expiring soon!".to_string(),
            "Milk (today), Bread (tomorrow)".to_string()
        )]
    );
}

#[test]
fn test_user_urgent_flag_survives_tick() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("larder.db");
    let inbox = Arc::new(Inbox::default());
    let mut engine = open(&path, noon(15), &inbox);

    let rice = engine
        .add_item(GroceryItem::new("Rice", "Grains", "1 kg", "2024-06-25"))
        .unwrap();
    assert_eq!(rice.days_left, 10);
    assert!(!rice.urgent);
    engine.toggle_urgent(rice.id).unwrap();

    engine.on_expiry_maintenance_tick().unwrap();

    let stored = engine.store().get_item(rice.id).unwrap().unwrap();
    assert!(stored.urgent);
    assert_eq!(stored.days_left, 10);
}

#[test]
fn test_refiring_same_day_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("larder.db");
    let inbox = Arc::new(Inbox::default());

    {
        let mut engine = open(&path, noon(15), &inbox);
        engine.prefs_mut().set_bool(keys::AUTO_DELETE_EXPIRED, true).unwrap();
        engine
            .add_item(GroceryItem::new("Ham", "Meat", "100 g", "2024-06-12"))
            .unwrap();
        engine
            .add_item(GroceryItem::new("Milk", "Dairy", "1 l", "2024-06-16"))
            .unwrap();
        engine.on_expiry_maintenance_tick().unwrap();
    }

    // a restarted process firing again later the same day
    let mut engine = open(&path, noon(15), &inbox);
    let second = engine.on_expiry_maintenance_tick().unwrap();

    assert_eq!(second.maintenance.deleted_count, 0);
    assert_eq!(second.notification, NotifyOutcome::Suppressed);
    assert_eq!(inbox.messages().len(), 1);
    assert_eq!(ExpiredCounter::get(engine.prefs()).unwrap(), 1);
}

#[test]
fn test_next_day_recomputes_and_notifies_again() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("larder.db");
    let inbox = Arc::new(Inbox::default());

    {
        let mut engine = open(&path, noon(15), &inbox);
        engine
            .add_item(GroceryItem::new("Milk", "Dairy", "1 l", "2024-06-16"))
            .unwrap();
        engine.on_expiry_maintenance_tick().unwrap();
    }

    let mut engine = open(&path, noon(16), &inbox);
    engine.on_expiry_maintenance_tick().unwrap();

    let messages = inbox.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].1, "Milk expires tomorrow!");
    assert_eq!(messages[1].1, "Milk expires today!");

    let listed = engine.list_items(SortMode::ExpiryEarliest, true).unwrap();
    assert_eq!(listed[0].days_left, 0);
}

#[test]
fn test_expired_items_kept_without_auto_delete() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("larder.db");
    let inbox = Arc::new(Inbox::default());
    let mut engine = open(&path, noon(15), &inbox);

    engine
        .add_item(GroceryItem::new("Ham", "Meat", "100 g", "2024-06-12"))
        .unwrap();
    engine
        .add_item(GroceryItem::new("Rice", "Grains", "1 kg", "2024-07-12"))
        .unwrap();

    let report = engine.on_expiry_maintenance_tick().unwrap();
    assert_eq!(report.maintenance.expired_retained, 1);
    assert_eq!(engine.list_items(SortMode::default(), false).unwrap().len(), 2);
    assert_eq!(engine.list_items(SortMode::default(), true).unwrap().len(), 1);

    let stats = engine.report().unwrap();
    assert_eq!(stats.current_expired, 1);
    assert_eq!(stats.total_expired, 1);
}

/// Store whose reads are followed by a user edit from another connection,
/// the way `larder edit` in a second process would land mid-pass
struct EditedDuringPass {
    inner: SqliteStore,
    other: RefCell<SqliteStore>,
    edited: RefCell<bool>,
}

impl ItemStore for EditedDuringPass {
    type Error = StoreError;

    fn list_all(&self) -> Result<Vec<GroceryItem>, Self::Error> {
        let items = self.inner.list_all()?;
        if !self.edited.replace(true) {
            let mut other = self.other.borrow_mut();
            for item in &items {
                let mut edited = item.clone();
                edited.urgent = true;
                edited.expiry = "2024-06-25".to_string();
                other.update(&edited)?;
            }
        }
        Ok(items)
    }

    fn get_item(&self, id: ItemId) -> Result<Option<GroceryItem>, Self::Error> {
        self.inner.get_item(id)
    }

    fn insert(&mut self, item: GroceryItem) -> Result<ItemId, Self::Error> {
        self.inner.insert(item)
    }

    fn update(&mut self, item: &GroceryItem) -> Result<bool, Self::Error> {
        self.inner.update(item)
    }

    fn set_days_left(&mut self, id: ItemId, days_left: i64) -> Result<bool, Self::Error> {
        self.inner.set_days_left(id, days_left)
    }

    fn delete_by_id(&mut self, id: ItemId) -> Result<bool, Self::Error> {
        self.inner.delete_by_id(id)
    }

    fn delete_by_ids(&mut self, ids: &[ItemId]) -> Result<usize, Self::Error> {
        self.inner.delete_by_ids(ids)
    }

    fn list_by_category(&self, category: &str) -> Result<Vec<GroceryItem>, Self::Error> {
        self.inner.list_by_category(category)
    }

    fn search(&self, query: &str) -> Result<Vec<GroceryItem>, Self::Error> {
        self.inner.search(query)
    }
}

#[test]
fn test_write_back_keeps_concurrent_user_edit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("larder.db");

    let mut inner = SqliteStore::new(&path).unwrap();
    let id = inner
        .insert(GroceryItem::new("Milk", "Dairy", "1 l", "2024-06-20"))
        .unwrap();
    let mut store = EditedDuringPass {
        inner,
        other: RefCell::new(SqliteStore::new(&path).unwrap()),
        edited: RefCell::new(false),
    };
    let mut prefs = SqlitePreferences::new(&path).unwrap();
    let mut janitor = Janitor::default_config();

    let result = janitor
        .run_maintenance(
            &mut store,
            &mut prefs,
            &ExpirySettings::default(),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        )
        .unwrap();
    assert_eq!(result.refreshed, 1);

    let row = SqliteStore::new(&path).unwrap().get_item(id).unwrap().unwrap();
    assert!(row.urgent, "star from the other process kept");
    assert_eq!(row.expiry, "2024-06-25", "edited expiry kept");
    assert_eq!(row.days_left, 5);
}

/// Preferences where another maintenance run bumps the counter between
/// this connection's read and its write
struct RacingCounter {
    inner: SqlitePreferences,
    other: RefCell<SqlitePreferences>,
}

impl RacingCounter {
    fn interleave(&self, key: &str) -> Result<(), StoreError> {
        if key == keys::TOTAL_EXPIRED_ITEMS {
            self.other.borrow_mut().add_int(key, 1)?;
        }
        Ok(())
    }
}

impl PreferenceStore for RacingCounter {
    type Error = StoreError;

    fn get_bool(&self, key: &str, default: bool) -> Result<bool, Self::Error> {
        self.inner.get_bool(key, default)
    }

    fn get_int(&self, key: &str, default: i64) -> Result<i64, Self::Error> {
        let value = self.inner.get_int(key, default)?;
        self.interleave(key)?;
        Ok(value)
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), Self::Error> {
        self.inner.set_bool(key, value)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), Self::Error> {
        self.inner.set_int(key, value)
    }

    fn add_int(&mut self, key: &str, delta: i64) -> Result<i64, Self::Error> {
        self.interleave(key)?;
        self.inner.add_int(key, delta)
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        self.inner.remove(key)
    }

    fn contains(&self, key: &str) -> Result<bool, Self::Error> {
        self.inner.contains(key)
    }
}

#[test]
fn test_counter_keeps_concurrent_increment() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("larder.db");
    let mut prefs = RacingCounter {
        inner: SqlitePreferences::new(&path).unwrap(),
        other: RefCell::new(SqlitePreferences::new(&path).unwrap()),
    };

    let total = ExpiredCounter::add(&mut prefs, 2).unwrap();

    assert_eq!(total, 3);
    let fresh = SqlitePreferences::new(&path).unwrap();
    assert_eq!(ExpiredCounter::get(&fresh).unwrap(), 3);
}
