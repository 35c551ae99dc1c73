//! Error types for Janitor operations

use larder_domain::ItemError;
use thiserror::Error;

/// Errors that can occur during Janitor operations
///
/// None of these are fatal to the host process; the scheduler logs them and
/// tries again on the next firing.
#[derive(Error, Debug)]
pub enum JanitorError {
    /// Item store error
    #[error("Storage error: {0}")]
    Store(String),

    /// Preference store error
    #[error("Preference error: {0}")]
    Preferences(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// User-supplied item failed validation
    #[error("Invalid item: {0}")]
    InvalidItem(#[from] ItemError),

    /// Item id not present in the store
    #[error("Item not found: {0}")]
    NotFound(larder_domain::ItemId),
}

impl JanitorError {
    /// Failures worth retrying within the same firing
    pub fn is_transient(&self) -> bool {
        matches!(self, JanitorError::Store(_) | JanitorError::Preferences(_))
    }

    pub(crate) fn store<E: std::fmt::Display>(e: E) -> Self {
        JanitorError::Store(e.to_string())
    }

    pub(crate) fn prefs<E: std::fmt::Display>(e: E) -> Self {
        JanitorError::Preferences(e.to_string())
    }
}
