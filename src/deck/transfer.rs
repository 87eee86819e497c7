//! Transfer payloads for moving cards between decks or out to text.
//!
//! A `TransferData` captures a selection of deck entries at one moment and
//! can render it three ways: card-to-count pairs for another deck, a plain
//! card list for an inventory, or one line of text per entry.

use rustc_hash::FxHashMap;

use crate::cards::{Card, CardId};
use crate::collection::CardList;
use crate::error::{DeckError, Result};

use super::deck::Deck;

/// The renderings a transfer supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransferFlavor {
    /// Card to copy count.
    Entries,
    /// Cards only, sorted by name.
    Cards,
    /// `"<count>x <name>"` lines.
    Text,
}

impl TransferFlavor {
    pub const ALL: [TransferFlavor; 3] = [Self::Entries, Self::Cards, Self::Text];
}

/// A transfer rendered in one flavor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferPayload {
    Entries(FxHashMap<Card, usize>),
    Cards(Vec<Card>),
    Text(String),
}

/// A snapshot of selected deck entries.
///
/// ## Example
///
/// ```
/// use rust_deck::cards::Card;
/// use rust_deck::deck::{Deck, TransferData, TransferFlavor, TransferPayload};
///
/// let bolt = Card::new("b1", "Lightning Bolt", "Instant");
/// let mut deck = Deck::new();
/// deck.add_copies(&bolt, 4);
///
/// let data = TransferData::new(&deck, [&bolt.id]).unwrap();
/// assert_eq!(
///     data.payload(TransferFlavor::Text),
///     TransferPayload::Text("4x Lightning Bolt".to_string())
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferData {
    /// In selection order.
    entries: Vec<(Card, usize)>,
}

impl TransferData {
    /// Capture the entries of the selected cards.
    ///
    /// Fails with `CardNotFound` if a selected card is not in the deck.
    /// Repeated selections are captured once.
    pub fn new<'a>(deck: &Deck, ids: impl IntoIterator<Item = &'a CardId>) -> Result<Self> {
        let mut entries: Vec<(Card, usize)> = Vec::new();
        for id in ids {
            let entry = deck.entry(id).ok_or_else(|| DeckError::CardNotFound(id.clone()))?;
            if entries.iter().all(|(card, _)| card.id != *id) {
                entries.push((entry.card().clone(), entry.count()));
            }
        }
        Ok(Self { entries })
    }

    /// Capture every entry of a deck.
    #[must_use]
    pub fn from_deck(deck: &Deck) -> Self {
        let entries = (0..deck.size())
            .filter_map(|index| deck.entry_at(index))
            .map(|entry| (entry.card().clone(), entry.count()))
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn flavors() -> &'static [TransferFlavor] {
        &TransferFlavor::ALL
    }

    #[must_use]
    pub fn supports(flavor: TransferFlavor) -> bool {
        TransferFlavor::ALL.contains(&flavor)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Card to copy count.
    #[must_use]
    pub fn entries(&self) -> FxHashMap<Card, usize> {
        self.entries.iter().cloned().collect()
    }

    /// The cards, sorted by name.
    #[must_use]
    pub fn cards(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = self.entries.iter().map(|(card, _)| card.clone()).collect();
        cards.sort_by(Card::compare_name);
        cards
    }

    /// One `"<count>x <name>"` line per entry, in selection order.
    #[must_use]
    pub fn text(&self) -> String {
        self.entries
            .iter()
            .map(|(card, count)| format!("{count}x {}", card.name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[must_use]
    pub fn payload(&self, flavor: TransferFlavor) -> TransferPayload {
        match flavor {
            TransferFlavor::Entries => TransferPayload::Entries(self.entries()),
            TransferFlavor::Cards => TransferPayload::Cards(self.cards()),
            TransferFlavor::Text => TransferPayload::Text(self.text()),
        }
    }
}

impl Deck {
    /// Add every entry of a transfer, copy counts included.
    pub fn add_transfer(&mut self, data: &TransferData) -> bool {
        let mut changed = false;
        for (card, count) in &data.entries {
            changed |= self.add_copies(card, *count as i64);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> (Deck, Card, Card) {
        let zealot = Card::new("z", "Zealot", "Creature");
        let aether = Card::new("a", "Æther Vial", "Artifact");
        let mut deck = Deck::new();
        deck.add_copies(&zealot, 2);
        deck.add_copies(&aether, 1);
        (deck, zealot, aether)
    }

    #[test]
    fn test_missing_card_fails() {
        let (deck, _, _) = deck();
        let err = TransferData::new(&deck, [&CardId::new("nope")]).unwrap_err();
        assert!(matches!(err, DeckError::CardNotFound(_)));
    }

    #[test]
    fn test_flavors() {
        let (deck, zealot, aether) = deck();
        let data = TransferData::new(&deck, [&zealot.id, &aether.id, &zealot.id]).unwrap();
        assert_eq!(data.len(), 2);

        assert_eq!(data.entries()[&zealot], 2);
        assert_eq!(data.cards(), vec![aether.clone(), zealot.clone()]);
        assert_eq!(data.text(), "2x Zealot\n1x Æther Vial");
        assert!(TransferData::flavors().iter().all(|&f| TransferData::supports(f)));
    }

    #[test]
    fn test_add_transfer_copies_counts() {
        let (deck, zealot, _) = deck();
        let data = TransferData::from_deck(&deck);

        let mut other = Deck::new();
        other.add_copies(&zealot, 1);
        assert!(other.add_transfer(&data));
        assert_eq!(other.total(), 4);
        assert_eq!(other.entry(&zealot.id).map(|e| e.count()), Some(3));
    }
}
