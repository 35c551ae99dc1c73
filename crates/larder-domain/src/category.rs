//! Category module - the fixed grocery category vocabulary

use std::fmt;

/// Grocery category
///
/// Stored categories are free-form strings, but every comparison against
/// this vocabulary is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Fresh fruit
    Fruits,
    /// Fresh vegetables
    Vegetables,
    /// Milk, cheese, yoghurt
    Dairy,
    /// Meat and fish
    Meat,
    /// Rice, pasta, cereals
    Grains,
    /// Bread and pastries
    Bakery,
    /// Drinks
    Beverages,
    /// Snacks and sweets
    Snacks,
    /// Anything kept in the freezer
    FrozenFoods,
    /// Tins and jars
    CannedGoods,
    /// Sauces, spices, dressings
    Condiments,
    /// Everything else
    Other,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 12] = [
        Category::Fruits,
        Category::Vegetables,
        Category::Dairy,
        Category::Meat,
        Category::Grains,
        Category::Bakery,
        Category::Beverages,
        Category::Snacks,
        Category::FrozenFoods,
        Category::CannedGoods,
        Category::Condiments,
        Category::Other,
    ];

    /// Get the category's display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fruits => "Fruits",
            Category::Vegetables => "Vegetables",
            Category::Dairy => "Dairy",
            Category::Meat => "Meat",
            Category::Grains => "Grains",
            Category::Bakery => "Bakery",
            Category::Beverages => "Beverages",
            Category::Snacks => "Snacks",
            Category::FrozenFoods => "Frozen Foods",
            Category::CannedGoods => "Canned Goods",
            Category::Condiments => "Condiments",
            Category::Other => "Other",
        }
    }

    /// Parse a category name, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
    }

    /// Check whether a stored category string names this category
    pub fn matches(&self, stored: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(stored.trim())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown category: {}", s))
    }
}
