//! Card definitions - immutable card data as the deck sees it.
//!
//! The deck never parses card data itself. Cards arrive from an external
//! inventory already built; the deck only needs a stable id to key its
//! entries on, a name to display, and the type line to decide which copies
//! count toward the land total.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Unique identifier for a card.
///
/// This is the UID written to the first column of a saved deck, so it must
/// be stable across runs of the inventory loader.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub String);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Static card data.
///
/// Equality, hashing and ordering look at `id` only: two printings with
/// the same id are the same multiset key no matter what else differs.
///
/// ## Example
///
/// ```
/// use rust_deck::cards::{Card, CardId};
///
/// let forest = Card::new("f1", "Forest", "Basic Land — Forest");
/// let bolt = Card::new("b1", "Lightning Bolt", "Instant").with_mana_value(1);
///
/// assert!(forest.type_contains("land"));
/// assert!(!bolt.type_contains("land"));
/// assert_eq!(bolt.id, CardId::new("b1"));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier for this card.
    pub id: CardId,

    /// Display name.
    pub name: String,

    /// Full type line, e.g. "Legendary Creature — Elf Druid".
    pub type_line: String,

    /// Converted mana cost.
    #[serde(default)]
    pub mana_value: u32,
}

impl Card {
    /// Create a new card.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        type_line: impl Into<String>,
    ) -> Self {
        Self {
            id: CardId::new(id),
            name: name.into(),
            type_line: type_line.into(),
            mana_value: 0,
        }
    }

    /// Set the mana value (builder pattern).
    #[must_use]
    pub fn with_mana_value(mut self, mana_value: u32) -> Self {
        self.mana_value = mana_value;
        self
    }

    /// Name folded for searching and sorting.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Check whether a word appears in the type line, ignoring case.
    ///
    /// Matching is word-wise, so "land" matches "Basic Land — Forest" but
    /// not "Landfall Creature".
    #[must_use]
    pub fn type_contains(&self, word: &str) -> bool {
        self.type_line
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .any(|part| part.eq_ignore_ascii_case(word))
    }

    /// Compare two cards by normalized name, then by id.
    #[must_use]
    pub fn compare_name(&self, other: &Card) -> Ordering {
        self.normalized_name()
            .cmp(&other.normalized_name())
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Fold a card name for comparison: lower case, with ligatures and common
/// accents replaced by plain ASCII.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        match c {
            'æ' => normalized.push_str("ae"),
            'á' | 'à' | 'â' | 'ä' => normalized.push('a'),
            'é' | 'è' | 'ê' | 'ë' => normalized.push('e'),
            'í' | 'ì' | 'î' | 'ï' => normalized.push('i'),
            'ó' | 'ò' | 'ô' | 'ö' => normalized.push('o'),
            'ú' | 'ù' | 'û' | 'ü' => normalized.push('u'),
            _ => normalized.push(c),
        }
    }
    normalized
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.id.hash(hasher);
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}
