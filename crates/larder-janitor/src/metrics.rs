//! Metrics collection for Janitor operations

use larder_domain::Category;
use std::collections::HashMap;

/// Metrics collected across maintenance ticks
///
/// Tracks items deleted per category, recompute activity and notification
/// outcomes. Lives in process memory only; the durable deletion count is
/// [`crate::ExpiredCounter`].
#[derive(Debug, Clone, Default)]
pub struct JanitorMetrics {
    /// Items deleted per category (unknown categories count as Other)
    pub deleted: HashMap<Category, usize>,

    /// Items whose stored `days_left` was stale and got rewritten
    pub refreshed: usize,

    /// Items whose expiry could not be parsed
    pub parse_failures: usize,

    /// Deletions the store rejected
    pub delete_failures: usize,

    /// Notifications the sink confirmed
    pub notifications_delivered: usize,

    /// Notifications refused for lack of permission
    pub notifications_denied: usize,

    /// Notifications that failed for any other reason
    pub notifications_failed: usize,

    /// Notifications skipped as same-day duplicates
    pub notifications_suppressed: usize,

    /// Total ticks completed
    pub tick_count: usize,

    /// Total runtime in milliseconds
    pub total_runtime_ms: u64,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record deletions for a stored category string
    pub fn record_deletion(&mut self, category: &str, count: usize) {
        let kind = Category::parse(category).unwrap_or(Category::Other);
        *self.deleted.entry(kind).or_insert(0) += count;
    }

    /// Record a stale `days_left` rewrite
    pub fn record_refresh(&mut self) {
        self.refreshed += 1;
    }

    /// Record an unparseable expiry
    pub fn record_parse_failure(&mut self) {
        self.parse_failures += 1;
    }

    /// Record a rejected deletion
    pub fn record_delete_failure(&mut self) {
        self.delete_failures += 1;
    }

    /// Record a tick completion
    pub fn record_tick(&mut self, runtime_ms: u64) {
        self.tick_count += 1;
        self.total_runtime_ms += runtime_ms;
    }

    /// Get total items deleted across all categories
    pub fn total_deleted(&self) -> usize {
        self.deleted.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "=======================".to_string(),
            format!("Ticks: {}", self.tick_count),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            format!("Items refreshed: {}", self.refreshed),
            format!("Parse failures: {}", self.parse_failures),
            String::new(),
        ];

        if !self.deleted.is_empty() {
            lines.push("Deletions by category:".to_string());
            for category in Category::ALL {
                if let Some(count) = self.deleted.get(&category) {
                    lines.push(format!("  {}: {}", category, count));
                }
            }
            lines.push(format!("  Total: {}", self.total_deleted()));
            lines.push(String::new());
        }
        if self.delete_failures > 0 {
            lines.push(format!("Delete failures: {}", self.delete_failures));
        }

        lines.push(format!(
            "Notifications: {} delivered, {} denied, {} failed, {} suppressed",
            self.notifications_delivered,
            self.notifications_denied,
            self.notifications_failed,
            self.notifications_suppressed
        ));

        lines.join("\n")
    }
}
