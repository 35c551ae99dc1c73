//! Persisted engine state, read and written through the preference store
//!
//! Nothing here is cached in process: every accessor goes back to the
//! [`PreferenceStore`], so a restarted process resumes from whatever was
//! last written.

use crate::JanitorError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use larder_domain::traits::PreferenceStore;
use std::fmt::Display;

/// Preference keys used by the engine
pub mod keys {
    /// Daily expiry notification toggle
    pub const NOTIFICATIONS_ENABLED: &str = "notifications_enabled";
    /// Delete expired items during maintenance
    pub const AUTO_DELETE_EXPIRED: &str = "auto_delete_expired";
    /// Warning window in days
    pub const EXPIRY_WARNING_DAYS: &str = "expiry_warning_days";
    /// Local hour the daily job fires at
    pub const NOTIFICATION_HOUR: &str = "notification_hour";
    /// Cumulative count of auto-deleted items
    pub const TOTAL_EXPIRED_ITEMS: &str = "total_expired_items";
    /// Next firing, local wall-clock seconds
    pub const SCHEDULER_NEXT_FIRE: &str = "scheduler_next_fire";
    /// Day of the last delivered notification
    pub const LAST_NOTIFIED_DAY: &str = "last_notified_day";
    /// Digest of the items in the last delivered notification
    pub const LAST_NOTIFIED_DIGEST: &str = "last_notified_digest";
}

/// Default warning window
pub const DEFAULT_WARNING_DAYS: i64 = 3;
/// Smallest accepted warning window
pub const MIN_WARNING_DAYS: i64 = 1;
/// Largest accepted warning window
pub const MAX_WARNING_DAYS: i64 = 7;

/// User toggles consulted on every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirySettings {
    /// Send the daily "expiring soon" notification
    pub notifications_enabled: bool,
    /// Delete expired items during maintenance
    pub auto_delete_enabled: bool,
    /// Items with `0 <= days_left <= warning_days` count as expiring soon
    pub warning_days: i64,
}

impl Default for ExpirySettings {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            auto_delete_enabled: false,
            warning_days: DEFAULT_WARNING_DAYS,
        }
    }
}

impl ExpirySettings {
    /// Read current settings, clamping the warning window into range
    pub fn load<P>(prefs: &P) -> Result<Self, JanitorError>
    where
        P: PreferenceStore,
        P::Error: Display,
    {
        let defaults = Self::default();
        let warning_days = prefs
            .get_int(keys::EXPIRY_WARNING_DAYS, defaults.warning_days)
            .map_err(JanitorError::prefs)?;

        Ok(Self {
            notifications_enabled: prefs
                .get_bool(keys::NOTIFICATIONS_ENABLED, defaults.notifications_enabled)
                .map_err(JanitorError::prefs)?,
            auto_delete_enabled: prefs
                .get_bool(keys::AUTO_DELETE_EXPIRED, defaults.auto_delete_enabled)
                .map_err(JanitorError::prefs)?,
            warning_days: warning_days.clamp(MIN_WARNING_DAYS, MAX_WARNING_DAYS),
        })
    }

    /// Persist all three toggles
    pub fn save<P>(&self, prefs: &mut P) -> Result<(), JanitorError>
    where
        P: PreferenceStore,
        P::Error: Display,
    {
        Self::validate_warning_days(self.warning_days)?;
        prefs
            .set_bool(keys::NOTIFICATIONS_ENABLED, self.notifications_enabled)
            .map_err(JanitorError::prefs)?;
        prefs
            .set_bool(keys::AUTO_DELETE_EXPIRED, self.auto_delete_enabled)
            .map_err(JanitorError::prefs)?;
        prefs
            .set_int(keys::EXPIRY_WARNING_DAYS, self.warning_days)
            .map_err(JanitorError::prefs)?;
        Ok(())
    }

    /// Reject a warning window outside 1..=7
    pub fn validate_warning_days(days: i64) -> Result<(), JanitorError> {
        if (MIN_WARNING_DAYS..=MAX_WARNING_DAYS).contains(&days) {
            Ok(())
        } else {
            Err(JanitorError::Config(format!(
                "warning days must be {}-{}, got {}",
                MIN_WARNING_DAYS, MAX_WARNING_DAYS, days
            )))
        }
    }
}

/// Durable count of items removed by maintenance
///
/// Only [`crate::Janitor`] increments it, and only by the number of
/// deletions the store confirmed. Increments go through
/// [`PreferenceStore::add_int`] so concurrent passes never lose one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpiredCounter;

impl ExpiredCounter {
    /// Current total (0 if never written)
    pub fn get<P>(prefs: &P) -> Result<u64, JanitorError>
    where
        P: PreferenceStore,
        P::Error: Display,
    {
        let raw = prefs
            .get_int(keys::TOTAL_EXPIRED_ITEMS, 0)
            .map_err(JanitorError::prefs)?;
        Ok(raw.max(0) as u64)
    }

    /// Add `count` confirmed deletions; returns the new total
    pub fn add<P>(prefs: &mut P, count: usize) -> Result<u64, JanitorError>
    where
        P: PreferenceStore,
        P::Error: Display,
    {
        let delta = i64::try_from(count).unwrap_or(i64::MAX);
        let total = prefs
            .add_int(keys::TOTAL_EXPIRED_ITEMS, delta)
            .map_err(JanitorError::prefs)?;
        Ok(total.max(0) as u64)
    }

    /// User-triggered reset back to zero
    pub fn reset<P>(prefs: &mut P) -> Result<(), JanitorError>
    where
        P: PreferenceStore,
        P::Error: Display,
    {
        prefs
            .set_int(keys::TOTAL_EXPIRED_ITEMS, 0)
            .map_err(JanitorError::prefs)
    }
}

/// Configured firing hour and the pending trigger, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerState {
    /// Local hour, 0-23
    pub fire_hour: u32,
    /// Next local wall-clock firing; `None` when unscheduled
    pub next_fire: Option<NaiveDateTime>,
}

impl SchedulerState {
    /// Read persisted state, using `default_hour` if no hour was ever saved
    pub fn load<P>(prefs: &P, default_hour: u32) -> Result<Self, JanitorError>
    where
        P: PreferenceStore,
        P::Error: Display,
    {
        let hour = prefs
            .get_int(keys::NOTIFICATION_HOUR, i64::from(default_hour))
            .map_err(JanitorError::prefs)?;
        let fire_hour = u32::try_from(hour)
            .ok()
            .filter(|h| *h <= 23)
            .unwrap_or(default_hour);

        let next_fire = if prefs
            .contains(keys::SCHEDULER_NEXT_FIRE)
            .map_err(JanitorError::prefs)?
        {
            let secs = prefs
                .get_int(keys::SCHEDULER_NEXT_FIRE, 0)
                .map_err(JanitorError::prefs)?;
            DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
        } else {
            None
        };

        Ok(Self { fire_hour, next_fire })
    }

    /// Persist hour and trigger
    pub fn save<P>(&self, prefs: &mut P) -> Result<(), JanitorError>
    where
        P: PreferenceStore,
        P::Error: Display,
    {
        prefs
            .set_int(keys::NOTIFICATION_HOUR, i64::from(self.fire_hour))
            .map_err(JanitorError::prefs)?;
        match self.next_fire {
            Some(at) => prefs
                .set_int(keys::SCHEDULER_NEXT_FIRE, at.and_utc().timestamp())
                .map_err(JanitorError::prefs),
            None => prefs
                .remove(keys::SCHEDULER_NEXT_FIRE)
                .map_err(JanitorError::prefs),
        }
    }
}

/// Record of the last notification actually shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationMark {
    /// Local day it was delivered
    pub day: NaiveDate,
    /// Digest of the notified items
    pub digest: i64,
}

impl NotificationMark {
    /// Last delivered mark, if any
    pub fn load<P>(prefs: &P) -> Result<Option<Self>, JanitorError>
    where
        P: PreferenceStore,
        P::Error: Display,
    {
        if !prefs
            .contains(keys::LAST_NOTIFIED_DAY)
            .map_err(JanitorError::prefs)?
        {
            return Ok(None);
        }
        let day = prefs
            .get_int(keys::LAST_NOTIFIED_DAY, 0)
            .map_err(JanitorError::prefs)?;
        let digest = prefs
            .get_int(keys::LAST_NOTIFIED_DIGEST, 0)
            .map_err(JanitorError::prefs)?;

        Ok(i32::try_from(day)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(|day| Self { day, digest }))
    }

    /// Persist this mark
    pub fn save<P>(&self, prefs: &mut P) -> Result<(), JanitorError>
    where
        P: PreferenceStore,
        P::Error: Display,
    {
        use chrono::Datelike;

        prefs
            .set_int(keys::LAST_NOTIFIED_DAY, i64::from(self.day.num_days_from_ce()))
            .map_err(JanitorError::prefs)?;
        prefs
            .set_int(keys::LAST_NOTIFIED_DIGEST, self.digest)
            .map_err(JanitorError::prefs)
    }
}
