//! `CardList` and `CardListMut` traits.

use crate::cards::{Card, CardId};
use crate::deck::Entry;
use crate::error::Result;

/// Read side of the multiset contract.
pub trait CardList {
    /// Number of distinct entries.
    fn size(&self) -> usize;

    /// Number of copies across all entries.
    fn total(&self) -> usize;

    /// Card at `index`, in iteration order.
    fn get(&self, index: usize) -> Option<&Card>;

    /// Entry for a card, if the list holds it.
    fn entry(&self, id: &CardId) -> Option<&Entry>;

    /// Position of a card in iteration order.
    fn index_of(&self, id: &CardId) -> Option<usize>;

    /// Cards in iteration order.
    fn iter(&self) -> impl Iterator<Item = &Card> + '_;

    /// Entry at `index`, in iteration order.
    fn entry_at(&self, index: usize) -> Option<&Entry> {
        let id = &self.get(index)?.id;
        self.entry(id)
    }

    fn contains(&self, id: &CardId) -> bool {
        self.index_of(id).is_some()
    }

    fn contains_all<'a>(&self, ids: impl IntoIterator<Item = &'a CardId>) -> bool {
        ids.into_iter().all(|id| self.contains(id))
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// The cards as a plain vector, one element per entry.
    fn to_vec(&self) -> Vec<Card> {
        self.iter().cloned().collect()
    }
}

/// Write side of the multiset contract.
///
/// Counts are signed so the clamping rules below are expressible:
///
/// - `add_copies` with `n < 1` does nothing and returns `false`.
/// - `remove_copies` clamps `n` to the current count and returns how many
///   copies actually went; `n < 1` removes nothing.
/// - `set` clamps negative `n` to 0, which removes the entry.
///
/// `Err` is reserved for contract violations, such as asking a category to
/// hold a card it cannot admit. Redundant calls return `Ok(false)` or
/// `Ok(0)`.
pub trait CardListMut: CardList {
    /// Add one copy, but only if the card is absent.
    fn add(&mut self, card: &Card) -> Result<bool>;

    /// Add `n` copies, creating the entry if needed.
    fn add_copies(&mut self, card: &Card, n: i64) -> Result<bool>;

    /// Remove up to `n` copies, returning how many were removed.
    fn remove_copies(&mut self, card: &Card, n: i64) -> Result<usize>;

    /// Remove a card's entry whatever its count.
    fn remove(&mut self, id: &CardId) -> Result<bool>;

    /// Set a card's count.
    fn set(&mut self, card: &Card, n: i64) -> Result<bool>;

    /// Set the count of the card at `index`. Out of range is a no-op.
    fn set_at(&mut self, index: usize, n: i64) -> Result<bool> {
        match self.get(index).cloned() {
            Some(card) => self.set(&card, n),
            None => Ok(false),
        }
    }

    /// Add one copy of each absent card. Returns whether any was added.
    fn add_all<'a>(&mut self, cards: impl IntoIterator<Item = &'a Card>) -> Result<bool> {
        let mut changed = false;
        for card in cards {
            changed |= self.add(card)?;
        }
        Ok(changed)
    }

    /// Remove the entries for the given cards. Returns whether any was removed.
    fn remove_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a CardId>) -> Result<bool> {
        let mut changed = false;
        for id in ids {
            changed |= self.remove(id)?;
        }
        Ok(changed)
    }
}
