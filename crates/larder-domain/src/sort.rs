//! Sort pipeline for list views
//!
//! Every mode is a stable sort: items that compare equal keep their input
//! order. The input slice is never modified.

use crate::item::GroceryItem;
use std::cmp::{Ordering, Reverse};

/// Orderings offered to list views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// Soonest expiry first
    #[default]
    ExpiryEarliest,
    /// Latest expiry first
    ExpiryLatest,
    /// Name, A to Z (case-insensitive)
    NameAToZ,
    /// Name, Z to A (case-insensitive)
    NameZToA,
    /// Category, A to Z (case-insensitive)
    CategoryAToZ,
    /// Category, Z to A (case-insensitive)
    CategoryZToA,
    /// Urgent items first, then soonest expiry
    UrgentFirst,
}

impl SortMode {
    /// Every mode, in menu order
    pub const ALL: [SortMode; 7] = [
        SortMode::ExpiryEarliest,
        SortMode::ExpiryLatest,
        SortMode::NameAToZ,
        SortMode::NameZToA,
        SortMode::CategoryAToZ,
        SortMode::CategoryZToA,
        SortMode::UrgentFirst,
    ];

    /// Machine name, as accepted by [`SortMode::parse`]
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::ExpiryEarliest => "expiry-earliest",
            SortMode::ExpiryLatest => "expiry-latest",
            SortMode::NameAToZ => "name-a-z",
            SortMode::NameZToA => "name-z-a",
            SortMode::CategoryAToZ => "category-a-z",
            SortMode::CategoryZToA => "category-z-a",
            SortMode::UrgentFirst => "urgent-first",
        }
    }

    /// Parse a machine name (case-insensitive, `_` accepted for `-`)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|m| m.as_str() == normalized)
    }

    fn compare(&self, a: &GroceryItem, b: &GroceryItem) -> Ordering {
        match self {
            SortMode::ExpiryEarliest => a.days_left.cmp(&b.days_left),
            SortMode::ExpiryLatest => b.days_left.cmp(&a.days_left),
            SortMode::NameAToZ => fold(&a.name).cmp(&fold(&b.name)),
            SortMode::NameZToA => fold(&b.name).cmp(&fold(&a.name)),
            SortMode::CategoryAToZ => fold(&a.category).cmp(&fold(&b.category)),
            SortMode::CategoryZToA => fold(&b.category).cmp(&fold(&a.category)),
            SortMode::UrgentFirst => (Reverse(a.urgent), a.days_left)
                .cmp(&(Reverse(b.urgent), b.days_left)),
        }
    }
}

impl std::str::FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown sort mode: {}", s))
    }
}

fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// Return `items` ordered by `mode`
///
/// # Examples
///
/// ```
/// use larder_domain::{sort_items, GroceryItem, SortMode};
///
/// let pear = GroceryItem::new("pear", "Fruits", "1", "2024-01-09");
/// let apple = GroceryItem::new("Apple", "Fruits", "1", "2024-01-03");
/// let sorted = sort_items(&[pear, apple], SortMode::NameAToZ);
/// assert_eq!(sorted[0].name, "Apple");
/// ```
pub fn sort_items(items: &[GroceryItem], mode: SortMode) -> Vec<GroceryItem> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| mode.compare(a, b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, category: &str, days_left: i64, urgent: bool) -> GroceryItem {
        let mut item = GroceryItem::new(name, category, "1", "2024-01-01").with_urgent(urgent);
        item.days_left = days_left;
        item
    }

    fn names(items: &[GroceryItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        for mode in SortMode::ALL {
            assert!(sort_items(&[], mode).is_empty());
        }
    }

    #[test]
    fn test_expiry_modes() {
        let items = vec![item("a", "x", 5, false), item("b", "x", -1, false), item("c", "x", 2, false)];
        assert_eq!(names(&sort_items(&items, SortMode::ExpiryEarliest)), ["b", "c", "a"]);
        assert_eq!(names(&sort_items(&items, SortMode::ExpiryLatest)), ["a", "c", "b"]);
    }

    #[test]
    fn test_name_modes_ignore_case() {
        let items = vec![item("banana", "x", 0, false), item("Apple", "x", 0, false), item("cherry", "x", 0, false)];
        assert_eq!(names(&sort_items(&items, SortMode::NameAToZ)), ["Apple", "banana", "cherry"]);
        assert_eq!(names(&sort_items(&items, SortMode::NameZToA)), ["cherry", "banana", "Apple"]);
    }

    #[test]
    fn test_category_modes_are_stable() {
        let items = vec![
            item("milk", "dairy", 0, false),
            item("bread", "Bakery", 0, false),
            item("cheese", "Dairy", 0, false),
        ];
        assert_eq!(names(&sort_items(&items, SortMode::CategoryAToZ)), ["bread", "milk", "cheese"]);
        // Ties keep input order in descending mode too
        assert_eq!(names(&sort_items(&items, SortMode::CategoryZToA)), ["milk", "cheese", "bread"]);
    }

    #[test]
    fn test_urgent_first_then_expiry() {
        let items = vec![
            item("late", "x", 9, false),
            item("starred-late", "x", 7, true),
            item("soon", "x", 1, false),
            item("starred-soon", "x", 2, true),
        ];
        assert_eq!(
            names(&sort_items(&items, SortMode::UrgentFirst)),
            ["starred-soon", "starred-late", "soon", "late"]
        );
    }

    #[test]
    fn test_input_untouched() {
        let items = vec![item("b", "x", 2, false), item("a", "x", 1, false)];
        let before = items.clone();
        let _ = sort_items(&items, SortMode::NameAToZ);
        assert_eq!(items, before);
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!(SortMode::parse("urgent_first"), Some(SortMode::UrgentFirst));
        assert_eq!(SortMode::parse("NAME-A-Z"), Some(SortMode::NameAToZ));
        assert_eq!(SortMode::parse("random"), None);
        for mode in SortMode::ALL {
            assert_eq!(mode.as_str().parse::<SortMode>(), Ok(mode));
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_item() -> impl Strategy<Value = GroceryItem> {
        ("[a-dA-D]{1,3}", "[a-cA-C]{1,2}", -5i64..10, any::<bool>()).prop_map(
            |(name, category, days_left, urgent)| {
                let mut item = GroceryItem::new(name, category, "1", "2024-01-01").with_urgent(urgent);
                item.days_left = days_left;
                item
            },
        )
    }

    fn arb_mode() -> impl Strategy<Value = SortMode> {
        prop::sample::select(SortMode::ALL.to_vec())
    }

    proptest! {
        /// Property: sorting an already sorted list changes nothing
        #[test]
        fn test_sort_idempotent(items in prop::collection::vec(arb_item(), 0..20), mode in arb_mode()) {
            let once = sort_items(&items, mode);
            let twice = sort_items(&once, mode);
            prop_assert_eq!(once, twice);
        }

        /// Property: equal keys keep their original relative order
        #[test]
        fn test_sort_stable(items in prop::collection::vec(arb_item(), 0..20), mode in arb_mode()) {
            // Tag each item with its input position via the id
            let tagged: Vec<GroceryItem> = items
                .into_iter()
                .enumerate()
                .map(|(i, mut item)| { item.id = crate::ItemId::from_value(i as i64 + 1); item })
                .collect();
            let sorted = sort_items(&tagged, mode);
            for pair in sorted.windows(2) {
                if mode.compare(&pair[0], &pair[1]) == Ordering::Equal {
                    prop_assert!(pair[0].id < pair[1].id);
                }
            }
        }

        /// Property: output is a permutation of input
        #[test]
        fn test_sort_preserves_length(items in prop::collection::vec(arb_item(), 0..20), mode in arb_mode()) {
            prop_assert_eq!(sort_items(&items, mode).len(), items.len());
        }
    }
}
