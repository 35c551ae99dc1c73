//! Notification policy: pick expiring items, compose one message, deliver it

use crate::settings::{ExpirySettings, NotificationMark};
use crate::{JanitorError, JanitorMetrics};
use chrono::NaiveDate;
use larder_domain::traits::{DeliveryOutcome, NotificationSink, PreferenceStore};
use larder_domain::GroceryItem;
use std::fmt::Display;

/// A composed message, ready for the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short headline
    pub title: String,
    /// Message body
    pub body: String,
}

/// What the notification step did on a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Notifications are turned off
    Disabled,
    /// Nothing is expiring soon
    Skipped,
    /// Same items were already announced today
    Suppressed,
    /// The sink showed the message
    Delivered {
        /// Items in the message
        count: usize,
    },
    /// The sink refused for lack of permission
    Denied,
    /// The sink failed
    Failed(String),
}

impl NotifyOutcome {
    /// Short label for logs and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyOutcome::Disabled => "disabled",
            NotifyOutcome::Skipped => "skipped",
            NotifyOutcome::Suppressed => "suppressed",
            NotifyOutcome::Delivered { .. } => "delivered",
            NotifyOutcome::Denied => "denied",
            NotifyOutcome::Failed(_) => "failed",
        }
    }
}

/// Items with `0 <= days_left <= warning_days`, soonest first
///
/// Ties keep their input order.
pub fn select_expiring_soon(items: &[GroceryItem], warning_days: i64) -> Vec<GroceryItem> {
    let mut soon: Vec<GroceryItem> = items
        .iter()
        .filter(|item| item.is_expiring_within(warning_days))
        .cloned()
        .collect();
    soon.sort_by_key(|item| item.days_left);
    soon
}

/// Build the title and body for `items`; `None` when there is nothing to say
///
/// # Examples
///
/// ```
/// use larder_domain::GroceryItem;
/// use larder_janitor::compose_message;
///
/// let mut milk = GroceryItem::new("Milk", "Dairy", "1 l", "2024-06-16");
/// milk.days_left = 1;
///
/// let message = compose_message(&[milk]).unwrap();
/// assert_eq!(message.title, "1 item expiring soon!");
/// assert_eq!(message.body, "Milk expires tomorrow!");
///
/// assert!(compose_message(&[]).is_none());
/// ```
pub fn compose_message(items: &[GroceryItem]) -> Option<Notification> {
    let title = match items.len() {
        0 => return None,
        1 => "1 item expiring soon!".to_string(),
        n => format!("{} items expiring soon!", n),
    };

    let body = match items {
        [item] => match item.days_left {
            0 => format!("{} expires today!", item.name),
            1 => format!("{} expires tomorrow!", item.name),
            n => format!("{} expires in {} days!", item.name, n),
        },
        _ if items.len() <= 3 => items
            .iter()
            .map(|item| match item.days_left {
                0 => format!("{} (today)", item.name),
                1 => format!("{} (tomorrow)", item.name),
                n => format!("{} ({} days)", item.name, n),
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => {
            let first: Vec<&str> = items.iter().take(3).map(|i| i.name.as_str()).collect();
            format!(
                "{} and {} more items are expiring soon!",
                first.join(", "),
                items.len() - 3
            )
        }
    };

    Some(Notification { title, body })
}

/// Order-independent fingerprint of the `(id, days_left)` set
pub fn digest(items: &[GroceryItem]) -> i64 {
    let mut pairs: Vec<(i64, i64)> = items.iter().map(|i| (i.id.value(), i.days_left)).collect();
    pairs.sort_unstable();

    // FNV-1a over the little-endian bytes
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for (id, days) in pairs {
        for byte in id.to_le_bytes().into_iter().chain(days.to_le_bytes()) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
    }
    hash as i64
}

/// Run the notification step for one tick
///
/// Delivery problems are logged and reported in the outcome, never
/// returned as errors. Only a failure to read the dedup mark is an error.
pub fn notify_expiring<N, P>(
    sink: &N,
    prefs: &mut P,
    remaining: &[GroceryItem],
    settings: &ExpirySettings,
    today: NaiveDate,
    metrics: &mut JanitorMetrics,
) -> Result<NotifyOutcome, JanitorError>
where
    N: NotificationSink,
    P: PreferenceStore,
    P::Error: Display,
{
    if !settings.notifications_enabled {
        return Ok(NotifyOutcome::Disabled);
    }

    let soon = select_expiring_soon(remaining, settings.warning_days);
    let Some(message) = compose_message(&soon) else {
        tracing::debug!("Nothing expiring within {} days", settings.warning_days);
        return Ok(NotifyOutcome::Skipped);
    };

    let mark = NotificationMark {
        day: today,
        digest: digest(&soon),
    };
    if NotificationMark::load(prefs)? == Some(mark) {
        tracing::debug!("Already notified about these {} items today", soon.len());
        metrics.notifications_suppressed += 1;
        return Ok(NotifyOutcome::Suppressed);
    }

    match sink.deliver(&message.title, &message.body) {
        DeliveryOutcome::Delivered => {
            metrics.notifications_delivered += 1;
            if let Err(e) = mark.save(prefs) {
                tracing::warn!("Notification shown but not recorded: {}", e);
            }
            Ok(NotifyOutcome::Delivered { count: soon.len() })
        }
        DeliveryOutcome::PermissionDenied => {
            tracing::warn!("Notification permission denied, skipping");
            metrics.notifications_denied += 1;
            Ok(NotifyOutcome::Denied)
        }
        DeliveryOutcome::Failed(reason) => {
            tracing::warn!("Notification delivery failed: {}", reason);
            metrics.notifications_failed += 1;
            Ok(NotifyOutcome::Failed(reason))
        }
    }
}
