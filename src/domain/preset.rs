use serde::Serialize;

use crate::domain::Category;

/// Deck option values handed to the study application for one category.
///
/// Only the values are produced here; how the application schedules cards
/// with them is its own business.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckPreset {
    /// The category this preset applies to.
    pub category: Category,
    /// Target deck name.
    pub deck: String,
    /// New cards introduced per day.
    pub new_per_day: u32,
    /// Maximum reviews per day.
    pub reviews_per_day: u32,
    /// Desired probability of recall at review time.
    pub desired_retention: f32,
    /// Upper bound on the review interval, in days.
    pub maximum_interval_days: u32,
}

impl DeckPreset {
    /// Builds the preset for a category.
    ///
    /// When `split_by_category` is set, each category gets its own sub-deck
    /// (`<deck>::<label>`); otherwise all presets target `deck`.
    #[must_use]
    pub fn for_category(category: Category, deck: &str, split_by_category: bool) -> Self {
        let (new_per_day, reviews_per_day, desired_retention, maximum_interval_days) =
            match category {
                Category::Easy => (30, 300, 0.85, 365),
                Category::Medium => (20, 200, 0.90, 180),
                Category::Difficult => (10, 150, 0.95, 90),
            };

        Self {
            category,
            deck: deck_name(deck, category, split_by_category),
            new_per_day,
            reviews_per_day,
            desired_retention,
            maximum_interval_days,
        }
    }

    /// Presets for every category, easiest first.
    #[must_use]
    pub fn all(deck: &str, split_by_category: bool) -> Vec<Self> {
        Category::ALL
            .into_iter()
            .map(|category| Self::for_category(category, deck, split_by_category))
            .collect()
    }
}

/// The deck a record of the given category is filed under.
#[must_use]
pub fn deck_name(deck: &str, category: Category, split_by_category: bool) -> String {
    if split_by_category {
        format!("{deck}::{}", category.label())
    } else {
        deck.to_string()
    }
}
