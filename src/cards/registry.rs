//! Card registry for id lookup.
//!
//! The `CardRegistry` is the deck's view of the card inventory. A saved
//! deck only records card ids, so loading one needs a way back from id to
//! card; the inventory loader fills a registry and hands it to
//! `Deck::load`.

use rustc_hash::FxHashMap;

use super::definition::{normalize_name, Card, CardId};

/// Registry of known cards.
///
/// ## Example
///
/// ```
/// use rust_deck::cards::{Card, CardId, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.register(Card::new("b1", "Lightning Bolt", "Instant"));
///
/// let found = registry.get(&CardId::new("b1")).unwrap();
/// assert_eq!(found.name, "Lightning Bolt");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, Card>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: Card) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {} already registered", card.id);
        }
        self.cards.insert(card.id.clone(), card);
    }

    /// Get a card by ID.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all cards, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &Card>
    where
        F: Fn(&Card) -> bool,
    {
        self.cards.values().filter(move |c| predicate(c))
    }

    /// Find every printing whose normalized name equals `name` once it is
    /// normalized the same way.
    pub fn find_by_name<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Card> {
        let wanted = normalize_name(name);
        self.cards
            .values()
            .filter(move |c| c.normalized_name() == wanted)
    }
}

impl FromIterator<Card> for CardRegistry {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut registry = Self::new();
        for card in iter {
            registry.register(card);
        }
        registry
    }
}
