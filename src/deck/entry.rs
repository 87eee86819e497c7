//! Deck entries - per-card bookkeeping.
//!
//! An `Entry` exists exactly while its card has at least one copy in the
//! deck. It also caches the names of the categories that currently admit
//! its card, so "which categories is this card in" needs no filter
//! evaluation; the deck keeps the cache in step with every category edit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::Card;

/// A card in a deck, with its copy count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    card: Card,
    count: usize,
    date_added: NaiveDate,
    /// Names of admitting categories, in the order they started admitting.
    categories: SmallVec<[String; 4]>,
}

impl Entry {
    pub(crate) fn new(card: Card, count: usize, date_added: NaiveDate) -> Self {
        Self {
            card,
            count,
            date_added,
            categories: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn card(&self) -> &Card {
        &self.card
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Date the card was first added. Later additions keep the original date.
    #[must_use]
    pub fn date_added(&self) -> NaiveDate {
        self.date_added
    }

    /// Names of the categories that admit this card.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn in_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    pub(crate) fn into_card(self) -> Card {
        self.card
    }

    /// Add copies, returning the new count.
    pub(crate) fn add(&mut self, n: usize) -> usize {
        self.count += n;
        self.count
    }

    /// Remove copies, stopping at zero. Returns the new count.
    pub(crate) fn remove(&mut self, n: usize) -> usize {
        self.count = self.count.saturating_sub(n);
        self.count
    }

    pub(crate) fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    pub(crate) fn join(&mut self, category: &str) {
        if !self.in_category(category) {
            self.categories.push(category.to_string());
        }
    }

    pub(crate) fn leave(&mut self, category: &str) {
        self.categories.retain(|c| c != category);
    }

    pub(crate) fn rename_category(&mut self, old: &str, new: &str) {
        for name in self.categories.iter_mut() {
            if name == old {
                *name = new.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> Entry {
        let date = NaiveDate::from_ymd_opt(2016, 4, 9).unwrap();
        Entry::new(Card::new("f", "Forest", "Basic Land — Forest"), 2, date)
    }

    #[test]
    fn test_counts() {
        let mut entry = entry();
        assert_eq!(entry.add(3), 5);
        assert_eq!(entry.remove(2), 3);
        assert_eq!(entry.remove(10), 0);
    }

    #[test]
    fn test_membership_cache() {
        let mut entry = entry();
        entry.join("Lands");
        entry.join("Mana");
        entry.join("Lands");
        assert_eq!(entry.categories(), ["Lands", "Mana"]);

        entry.rename_category("Lands", "Basics");
        assert!(entry.in_category("Basics"));
        assert!(!entry.in_category("Lands"));

        entry.leave("Mana");
        assert_eq!(entry.categories(), ["Basics"]);
    }

    #[test]
    fn test_entry_serialization() {
        let mut entry = entry();
        entry.join("Lands");

        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: Entry = serde_json::from_str(&json).unwrap();

        assert_eq!(entry, deserialized);
        assert_eq!(deserialized.count(), 2);
        assert_eq!(deserialized.categories(), ["Lands"]);
    }
}
