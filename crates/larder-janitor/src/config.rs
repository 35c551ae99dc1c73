//! Configuration for Janitor operations
//!
//! Defines the daily firing hour, retry policy and urgency threshold.

use crate::JanitorError;
use larder_domain::URGENT_THRESHOLD_DAYS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the expiry Janitor
///
/// # Examples
///
/// ```
/// use larder_janitor::JanitorConfig;
///
/// // Default configuration: fire at noon, two retries 30s apart
/// let config = JanitorConfig::default();
/// assert_eq!(config.fire_hour, 12);
///
/// // Eager: more retries, shorter backoff
/// let config = JanitorConfig::eager();
/// assert_eq!(config.max_retries, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Local hour (0-23) at which the daily job fires
    /// Default: 12 (noon)
    #[serde(default = "default_fire_hour")]
    pub fire_hour: u32,

    /// How late a firing may be before it is logged as drift (minutes)
    /// Default: 15
    #[serde(default = "default_flex_window")]
    pub flex_window_minutes: u64,

    /// Extra attempts when a firing hits a transient store failure
    /// Default: 2
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Pause between those attempts (seconds)
    /// Default: 30
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_secs: u64,

    /// New items expiring within this many days start out urgent
    /// Default: 3
    #[serde(default = "default_urgent_threshold")]
    pub urgent_threshold_days: i64,

    /// Dry-run mode: log what would be deleted without deleting
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,
}

fn default_fire_hour() -> u32 {
    12
}

fn default_flex_window() -> u64 {
    15
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff() -> u64 {
    30
}

fn default_urgent_threshold() -> i64 {
    URGENT_THRESHOLD_DAYS
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            fire_hour: default_fire_hour(),
            flex_window_minutes: default_flex_window(),
            max_retries: default_max_retries(),
            retry_backoff_secs: default_retry_backoff(),
            urgent_threshold_days: default_urgent_threshold(),
            dry_run: false,
        }
    }
}

impl JanitorConfig {
    /// Retry harder on flaky storage (e.g. a database on removable media)
    ///
    /// - Retries: 5
    /// - Backoff: 5 seconds
    pub fn eager() -> Self {
        Self {
            max_retries: 5,
            retry_backoff_secs: 5,
            ..Self::default()
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, JanitorError> {
        let config: JanitorConfig =
            toml::from_str(s).map_err(|e| JanitorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, JanitorError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            JanitorError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reject values the scheduler cannot honour
    pub fn validate(&self) -> Result<(), JanitorError> {
        if self.fire_hour > 23 {
            return Err(JanitorError::Config(format!(
                "fire_hour must be 0-23, got {}",
                self.fire_hour
            )));
        }
        if self.urgent_threshold_days < 0 {
            return Err(JanitorError::Config(format!(
                "urgent_threshold_days must not be negative, got {}",
                self.urgent_threshold_days
            )));
        }
        Ok(())
    }

    /// Pause between retry attempts
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_secs)
    }

    /// Tolerated lateness of a firing
    pub fn flex_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.flex_window_minutes as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JanitorConfig::default();
        assert_eq!(config.fire_hour, 12);
        assert_eq!(config.flex_window_minutes, 15);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.retry_backoff_secs, 30);
        assert_eq!(config.urgent_threshold_days, 3);
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_eager_config() {
        let config = JanitorConfig::eager();
        assert!(config.max_retries > JanitorConfig::default().max_retries);
        assert!(config.retry_backoff() < JanitorConfig::default().retry_backoff());
        assert_eq!(config.fire_hour, 12);
    }

    #[test]
    fn test_duration_conversions() {
        let config = JanitorConfig::default();
        assert_eq!(config.retry_backoff(), Duration::from_secs(30));
        assert_eq!(config.flex_window(), chrono::Duration::minutes(15));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = JanitorConfig::from_toml_str("fire_hour = 8\ndry_run = true\n").unwrap();
        assert_eq!(config.fire_hour, 8);
        assert!(config.dry_run);
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_invalid_hour_rejected() {
        let result = JanitorConfig::from_toml_str("fire_hour = 24\n");
        assert!(matches!(result, Err(JanitorError::Config(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = JanitorConfig::eager();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized = JanitorConfig::from_toml_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
