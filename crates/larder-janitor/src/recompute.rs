//! Derived-state recompute for single items
//!
//! These are the fail-open wrappers around [`GroceryItem::refreshed`]: an
//! unparseable expiry never aborts a read or a maintenance pass, it just
//! yields `days_left = 0` and a warning.

use chrono::NaiveDate;
use larder_domain::{is_urgent_at_creation, GroceryItem, ItemEdit};

/// Recompute `days_left` against `today`, leaving `urgent` untouched
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use larder_domain::GroceryItem;
/// use larder_janitor::recompute_item_state;
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
/// let item = GroceryItem::new("Milk", "Dairy", "1 l", "2024-06-17").with_urgent(true);
///
/// let item = recompute_item_state(&item, today);
/// assert_eq!(item.days_left, 2);
/// assert!(item.urgent);
/// ```
pub fn recompute_item_state(item: &GroceryItem, today: NaiveDate) -> GroceryItem {
    match item.refreshed(today) {
        Ok(fresh) => fresh,
        Err(e) => {
            tracing::warn!(
                item_id = %item.id,
                expiry = %item.expiry,
                "Unparseable expiry, treating as expiring today: {}",
                e
            );
            GroceryItem {
                days_left: 0,
                ..item.clone()
            }
        }
    }
}

/// Derive state for an item that has never been saved
///
/// Computes `days_left` and marks the item urgent when it expires within
/// `threshold` days. An urgent flag the caller already set is kept unless
/// the expiry cannot be parsed, in which case the item is not urgent.
pub fn prepare_new_item(item: GroceryItem, today: NaiveDate, threshold: i64) -> GroceryItem {
    let parsed = item.refreshed(today);
    match parsed {
        Ok(fresh) => {
            let urgent = fresh.urgent || is_urgent_at_creation(fresh.days_left, threshold);
            GroceryItem { urgent, ..fresh }
        }
        Err(e) => {
            tracing::warn!(expiry = %item.expiry, "Unparseable expiry on new item: {}", e);
            GroceryItem {
                days_left: 0,
                urgent: false,
                ..item
            }
        }
    }
}

/// Edit-and-save: apply `edit` to `existing` and recompute `days_left`
///
/// `urgent` only changes if the edit sets it.
pub fn apply_edit(existing: &GroceryItem, edit: &ItemEdit, today: NaiveDate) -> GroceryItem {
    recompute_item_state(&existing.apply_edit(edit), today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_recompute_replaces_stale_days_left() {
        let mut item = GroceryItem::new("Bread", "Bakery", "1", "2024-06-14");
        item.days_left = 4;
        let item = recompute_item_state(&item, today());
        assert_eq!(item.days_left, -1);
        assert!(item.is_expired());
    }

    #[test]
    fn test_recompute_never_touches_urgent() {
        let item = GroceryItem::new("Rice", "Grains", "1 kg", "2024-06-25").with_urgent(true);
        let item = recompute_item_state(&item, today());
        assert_eq!(item.days_left, 10);
        assert!(item.urgent);

        let item = GroceryItem::new("Yogurt", "Dairy", "4", "2024-06-16");
        assert!(!recompute_item_state(&item, today()).urgent);
    }

    #[test]
    fn test_recompute_fails_open() {
        let mut item = GroceryItem::new("Mystery", "Other", "1", "someday").with_urgent(true);
        item.days_left = -9;
        let item = recompute_item_state(&item, today());
        assert_eq!(item.days_left, 0);
        assert!(item.urgent, "existing flag is preserved");
    }

    #[test]
    fn test_prepare_new_item_sets_urgency_from_threshold() {
        let soon = GroceryItem::new("Milk", "Dairy", "1 l", "2024-06-18");
        let later = GroceryItem::new("Cheese", "Dairy", "200 g", "2024-06-19");
        let expired = GroceryItem::new("Ham", "Meat", "100 g", "2024-06-14");

        assert!(prepare_new_item(soon, today(), 3).urgent);
        assert!(!prepare_new_item(later, today(), 3).urgent);
        assert!(!prepare_new_item(expired, today(), 3).urgent);
    }

    #[test]
    fn test_prepare_new_item_keeps_explicit_urgent() {
        let item = GroceryItem::new("Rice", "Grains", "1 kg", "2024-07-30").with_urgent(true);
        let item = prepare_new_item(item, today(), 3);
        assert!(item.urgent);
        assert_eq!(item.days_left, 45);
    }

    #[test]
    fn test_prepare_new_item_unparseable() {
        let item = GroceryItem::new("Mystery", "Other", "1", "15/06/2024");
        let item = prepare_new_item(item, today(), 3);
        assert_eq!(item.days_left, 0);
        assert!(!item.urgent);
    }

    #[test]
    fn test_prepare_new_item_unparseable_drops_requested_urgent() {
        let item = GroceryItem::new("Mystery", "Other", "1", "soon").with_urgent(true);
        let item = prepare_new_item(item, today(), 3);
        assert_eq!(item.days_left, 0);
        assert!(!item.urgent);
    }

    #[test]
    fn test_apply_edit_recomputes_and_preserves_urgent() {
        let mut existing = GroceryItem::new("Milk", "Dairy", "1 l", "2024-06-16").with_urgent(true);
        existing.days_left = 1;

        let edit = ItemEdit {
            expiry: Some("2024-06-30".to_string()),
            ..Default::default()
        };
        let edited = apply_edit(&existing, &edit, today());
        assert_eq!(edited.days_left, 15);
        assert!(edited.urgent);

        let edit = ItemEdit {
            urgent: Some(false),
            ..Default::default()
        };
        assert!(!apply_edit(&existing, &edit, today()).urgent);
    }
}
