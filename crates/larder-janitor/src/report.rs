//! Inventory statistics for reporting collaborators

use larder_domain::{Category, GroceryItem};

/// Per-category slice of the inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    /// The category
    pub category: Category,
    /// Items stored under it
    pub item_count: usize,
    /// Items with `days_left <= 2` or flagged urgent
    pub needs_attention: usize,
}

/// Snapshot of the inventory plus the cumulative expired count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryReport {
    /// Items in the store
    pub total_items: usize,
    /// Items inside the warning window
    pub expiring_soon: usize,
    /// Expired items still in the store
    pub current_expired: usize,
    /// Items removed by maintenance so far
    pub cumulative_expired: u64,
    /// `cumulative_expired + current_expired`
    pub total_expired: u64,
    /// Non-empty categories, in vocabulary order
    pub categories: Vec<CategorySummary>,
}

impl InventoryReport {
    /// Build a report from items whose `days_left` is current
    pub fn build(items: &[GroceryItem], cumulative_expired: u64, warning_days: i64) -> Self {
        let expiring_soon = items
            .iter()
            .filter(|i| i.is_expiring_within(warning_days))
            .count();
        let current_expired = items.iter().filter(|i| i.is_expired()).count();

        let categories = Category::ALL
            .iter()
            .filter_map(|category| {
                let members: Vec<&GroceryItem> = items
                    .iter()
                    .filter(|i| i.category_kind().unwrap_or(Category::Other) == *category)
                    .collect();
                if members.is_empty() {
                    return None;
                }
                Some(CategorySummary {
                    category: *category,
                    item_count: members.len(),
                    needs_attention: members
                        .iter()
                        .filter(|i| i.days_left <= 2 || i.urgent)
                        .count(),
                })
            })
            .collect();

        Self {
            total_items: items.len(),
            expiring_soon,
            current_expired,
            cumulative_expired,
            total_expired: cumulative_expired + current_expired as u64,
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, category: &str, days_left: i64, urgent: bool) -> GroceryItem {
        let mut item = GroceryItem::new(name, category, "1", "2024-06-15").with_urgent(urgent);
        item.days_left = days_left;
        item
    }

    #[test]
    fn test_empty_inventory() {
        let report = InventoryReport::build(&[], 4, 3);
        assert_eq!(report.total_items, 0);
        assert_eq!(report.total_expired, 4);
        assert!(report.categories.is_empty());
    }

    #[test]
    fn test_counts() {
        let items = vec![
            item("Milk", "Dairy", 1, false),
            item("Cheese", "dairy", 20, true),
            item("Ham", "Meat", -2, false),
            item("Apples", "Fruits", 3, false),
            item("Rice", "Grains", 40, false),
        ];
        let report = InventoryReport::build(&items, 5, 3);

        assert_eq!(report.total_items, 5);
        assert_eq!(report.expiring_soon, 2);
        assert_eq!(report.current_expired, 1);
        assert_eq!(report.cumulative_expired, 5);
        assert_eq!(report.total_expired, 6);
    }

    #[test]
    fn test_category_breakdown() {
        let items = vec![
            item("Milk", "Dairy", 1, false),
            item("Cheese", "DAIRY", 20, true),
            item("Yogurt", "Dairy", 9, false),
            item("Apples", "Fruits", 5, false),
            item("Leftovers", "Fridge", 0, false),
        ];
        let report = InventoryReport::build(&items, 0, 3);

        let order: Vec<Category> = report.categories.iter().map(|c| c.category).collect();
        assert_eq!(order, vec![Category::Fruits, Category::Dairy, Category::Other]);

        let dairy = &report.categories[1];
        assert_eq!(dairy.item_count, 3);
        assert_eq!(dairy.needs_attention, 2);
        assert_eq!(report.categories[0].needs_attention, 0);
        assert_eq!(report.categories[2].needs_attention, 1);
    }
}
