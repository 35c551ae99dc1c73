//! Expiry arithmetic
//!
//! `days_left` is a pure function of an expiry date and the current local
//! day. Both sides are reduced to whole calendar days before subtracting,
//! so time-of-day skew within a day never changes the answer.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Items expiring within this many days are flagged urgent when created
pub const URGENT_THRESHOLD_DAYS: i64 = 3;

/// Storage format for expiry dates
pub const EXPIRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from expiry date handling
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpiryError {
    /// The stored expiry string is not a calendar date
    #[error("Invalid expiry date '{input}': {reason}")]
    InvalidDate {
        /// The string that failed to parse
        input: String,
        /// Parser message
        reason: String,
    },
}

/// Parse a stored expiry string (`YYYY-MM-DD`)
///
/// # Examples
///
/// ```
/// use larder_domain::parse_expiry;
///
/// let date = parse_expiry("2024-03-01").unwrap();
/// assert_eq!(date.to_string(), "2024-03-01");
/// assert!(parse_expiry("next tuesday").is_err());
/// ```
pub fn parse_expiry(input: &str) -> Result<NaiveDate, ExpiryError> {
    NaiveDate::parse_from_str(input.trim(), EXPIRY_DATE_FORMAT).map_err(|e| {
        ExpiryError::InvalidDate {
            input: input.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Days from `today` until `expiry`
///
/// Negative when the date has passed, zero when it expires today.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use larder_domain::days_left;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let expiry = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// assert_eq!(days_left(expiry, today), 3);
/// assert_eq!(days_left(today, expiry), -3);
/// ```
pub fn days_left(expiry: NaiveDate, today: NaiveDate) -> i64 {
    expiry.signed_duration_since(today).num_days()
}

/// Same as [`days_left`] but for wall-clock instants, truncated to local midnight
pub fn days_between(expiry: NaiveDateTime, now: NaiveDateTime) -> i64 {
    days_left(expiry.date(), now.date())
}

/// Parse `expiry` and compute its distance from `today`
pub fn days_left_from_str(expiry: &str, today: NaiveDate) -> Result<i64, ExpiryError> {
    parse_expiry(expiry).map(|date| days_left(date, today))
}

/// Urgency assigned to a newly created item
///
/// Only applied at creation time; existing items keep whatever the user set.
pub fn is_urgent_at_creation(days_left: i64, threshold: i64) -> bool {
    (0..=threshold).contains(&days_left)
}
