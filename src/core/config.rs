//! Deck configuration.
//!
//! The few knobs the deck model has live here rather than being hardcoded:
//! which type-line word marks a card as land, and how the "date added"
//! column of a saved deck is formatted.

use serde::{Deserialize, Serialize};

/// Type-line word that classifies a card as land.
pub const DEFAULT_LAND_TYPE: &str = "land";

/// chrono format for the "date added" column: "Month D, YYYY".
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

/// Configuration for a deck.
///
/// ## Example
///
/// ```
/// use rust_deck::core::DeckConfig;
///
/// let config = DeckConfig::default().with_land_type("Land");
/// assert_eq!(config.land_type, "Land");
/// assert_eq!(config.date_format, "%B %-d, %Y");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Cards whose type line contains this word count toward `Deck::land`.
    pub land_type: String,

    /// Format of the date column in saved decks. Saved files are only
    /// interchangeable between decks that agree on this.
    pub date_format: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            land_type: DEFAULT_LAND_TYPE.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl DeckConfig {
    /// Set the land type word (builder pattern).
    #[must_use]
    pub fn with_land_type(mut self, land_type: impl Into<String>) -> Self {
        self.land_type = land_type.into();
        self
    }

    /// Set the saved date format (builder pattern).
    #[must_use]
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }
}
