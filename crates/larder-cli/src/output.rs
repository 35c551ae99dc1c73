//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use larder_domain::{Category, GroceryItem};
use larder_janitor::{ExpirySettings, InventoryReport, SchedulerState, TickReport};
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format items output.
    pub fn format_items(&self, items: &[GroceryItem]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_items_json(items),
            OutputFormat::Table => Ok(self.format_items_table(items)),
            OutputFormat::Quiet => Ok(self.format_items_quiet(items)),
        }
    }

    /// Format a single item.
    pub fn format_item(&self, item: &GroceryItem) -> Result<String> {
        self.format_items(std::slice::from_ref(item))
    }

    fn format_items_json(&self, items: &[GroceryItem]) -> Result<String> {
        let json_items: Vec<serde_json::Value> = items
            .iter()
            .map(|i| {
                json!({
                    "id": i.id.value(),
                    "name": i.name,
                    "category": i.category,
                    "quantity": i.quantity,
                    "expiry": i.expiry,
                    "days_left": i.days_left,
                    "urgent": i.urgent,
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_items)?)
    }

    fn format_items_table(&self, items: &[GroceryItem]) -> String {
        if items.is_empty() {
            return self.colorize("No items found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "", "Name", "Category", "Quantity", "Expiry", "Status"]);

        for item in items {
            let star = if item.urgent { "★" } else { "" };
            builder.push_record([
                item.id.to_string(),
                star.to_string(),
                item.name.clone(),
                item.category.clone(),
                item.quantity.clone(),
                item.expiry.clone(),
                self.status_cell(item.days_left),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn format_items_quiet(&self, items: &[GroceryItem]) -> String {
        let ids: Vec<String> = items.iter().map(|i| i.id.to_string()).collect();
        ids.join("\n")
    }

    fn status_cell(&self, days_left: i64) -> String {
        let label = expiry_label(days_left);
        match days_left {
            d if d < 0 => self.colorize(&label, "red"),
            0..=2 => self.colorize(&label, "yellow"),
            _ => self.colorize(&label, "green"),
        }
    }

    /// Format inventory statistics.
    pub fn format_report(&self, report: &InventoryReport) -> Result<String> {
        if self.format == OutputFormat::Json {
            let categories: Vec<serde_json::Value> = report
                .categories
                .iter()
                .map(|c| {
                    json!({
                        "category": c.category.as_str(),
                        "item_count": c.item_count,
                        "needs_attention": c.needs_attention,
                    })
                })
                .collect();
            return Ok(serde_json::to_string_pretty(&json!({
                "total_items": report.total_items,
                "expiring_soon": report.expiring_soon,
                "current_expired": report.current_expired,
                "cumulative_expired": report.cumulative_expired,
                "total_expired": report.total_expired,
                "categories": categories,
            }))?);
        }

        let mut lines = vec![
            format!("Total items:    {}", report.total_items),
            format!("Expiring soon:  {}", report.expiring_soon),
            format!(
                "Expired:        {} ({} in store, {} auto-deleted)",
                report.total_expired, report.current_expired, report.cumulative_expired
            ),
        ];

        if !report.categories.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Category", "Items", "Needs attention"]);
            for summary in &report.categories {
                let attention = if summary.needs_attention > 0 {
                    self.colorize(&summary.needs_attention.to_string(), "yellow")
                } else {
                    summary.needs_attention.to_string()
                };
                builder.push_record([
                    summary.category.to_string(),
                    summary.item_count.to_string(),
                    attention,
                ]);
            }
            let mut table = builder.build();
            table.with(Style::rounded());
            lines.push(String::new());
            lines.push(table.to_string());
        }

        Ok(lines.join("\n"))
    }

    /// Format expiry settings and scheduler state.
    pub fn format_settings(
        &self,
        settings: &ExpirySettings,
        schedule: &SchedulerState,
        counter: u64,
    ) -> Result<String> {
        let next_fire = schedule
            .next_fire
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string());

        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(&json!({
                "notifications_enabled": settings.notifications_enabled,
                "auto_delete_expired": settings.auto_delete_enabled,
                "expiry_warning_days": settings.warning_days,
                "notification_hour": schedule.fire_hour,
                "next_fire": next_fire,
                "total_expired_items": counter,
            }))?);
        }

        let on_off = |b: bool| if b { "on" } else { "off" };
        Ok([
            format!("Notifications:      {}", on_off(settings.notifications_enabled)),
            format!("Auto-delete:        {}", on_off(settings.auto_delete_enabled)),
            format!("Warning window:     {} days", settings.warning_days),
            format!("Notification hour:  {:02}:00", schedule.fire_hour),
            format!(
                "Next run:           {}",
                next_fire.unwrap_or_else(|| "not scheduled".to_string())
            ),
            format!("Auto-deleted so far: {}", counter),
        ]
        .join("\n"))
    }

    /// Format the outcome of one tick.
    pub fn format_tick(&self, report: &TickReport) -> Result<String> {
        let m = &report.maintenance;
        if self.format == OutputFormat::Json {
            let deleted: Vec<i64> = m.deleted_ids.iter().map(|id| id.value()).collect();
            let failed: Vec<i64> = m.failed_ids.iter().map(|id| id.value()).collect();
            return Ok(serde_json::to_string_pretty(&json!({
                "day": report.today.to_string(),
                "deleted": deleted,
                "failed": failed,
                "refreshed": m.refreshed,
                "expired_retained": m.expired_retained,
                "remaining": m.remaining_items.len(),
                "notification": report.notification.as_str(),
            }))?);
        }

        let mut lines = vec![self.success(&format!(
            "Maintenance for {}: {} deleted, {} refreshed, {} remaining",
            report.today,
            m.deleted_count,
            m.refreshed,
            m.remaining_items.len()
        ))];
        if m.expired_retained > 0 {
            lines.push(self.info(&format!("{} expired item(s) kept", m.expired_retained)));
        }
        if !m.failed_ids.is_empty() {
            lines.push(self.warning(&format!(
                "{} item(s) could not be deleted",
                m.failed_ids.len()
            )));
        }
        lines.push(self.info(&format!("Notification: {}", report.notification.as_str())));
        Ok(lines.join("\n"))
    }

    /// Format the category vocabulary.
    pub fn format_categories(&self) -> Result<String> {
        let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&names)?),
            _ => Ok(names.join("\n")),
        }
    }

    /// Format a notification for the terminal.
    pub fn notification(&self, title: &str, body: &str) -> String {
        format!("{}\n  {}", self.colorize(&format!("🔔 {}", title), "magenta"), body)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format bulk operation result.
    pub fn bulk_result(&self, operation: &str, count: usize) -> String {
        self.success(&format!("{} {} item(s)", operation, count))
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Human label for a `days_left` value.
pub fn expiry_label(days_left: i64) -> String {
    match days_left {
        d if d < 0 => "Expired".to_string(),
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        d => format!("{} days", d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_domain::ItemId;
    use larder_janitor::CategorySummary;

    fn milk() -> GroceryItem {
        let mut item = GroceryItem::new("Milk", "Dairy", "1 l", "2024-06-16").with_urgent(true);
        item.id = ItemId::from_value(7);
        item.days_left = 1;
        item
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_item(&milk()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["id"], 7);
        assert_eq!(parsed[0]["name"], "Milk");
        assert_eq!(parsed[0]["days_left"], 1);
        assert_eq!(parsed[0]["urgent"], true);
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_items(&[milk()]).unwrap();
        assert!(output.contains("Milk"));
        assert!(output.contains("Tomorrow"));
        assert!(output.contains("★"));
    }

    #[test]
    fn test_empty_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.format_items(&[]).unwrap(), "No items found.");
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(formatter.format_items(&[milk()]).unwrap(), "7");
    }

    #[test]
    fn test_expiry_labels() {
        assert_eq!(expiry_label(-3), "Expired");
        assert_eq!(expiry_label(0), "Today");
        assert_eq!(expiry_label(1), "Tomorrow");
        assert_eq!(expiry_label(6), "6 days");
    }

    #[test]
    fn test_report_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let report = InventoryReport {
            total_items: 3,
            expiring_soon: 1,
            current_expired: 1,
            cumulative_expired: 4,
            total_expired: 5,
            categories: vec![CategorySummary {
                category: Category::FrozenFoods,
                item_count: 3,
                needs_attention: 2,
            }],
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&formatter.format_report(&report).unwrap()).unwrap();
        assert_eq!(parsed["total_expired"], 5);
        assert_eq!(parsed["categories"][0]["category"], "Frozen Foods");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("Done"), "✓ Done");
        assert_eq!(formatter.error("Boom"), "✗ Boom");
    }
}
