//! Deck change events.
//!
//! Every deck mutation that changes anything is reported to the deck's
//! listeners as one `DeckEvent`, dispatched before the mutator returns.
//! An event is a diff: only the kinds of change that happened are present.
//!
//! ## Event Data
//!
//! - card count deltas, in the order the changes were made
//! - the category that was added, or the categories that were removed
//! - the spec diff of an edited category, with the name it had before
//! - the old ranks of categories whose rank moved
//!
//! Reading a kind of change that is absent is an error
//! ([`DeckError::Unchanged`]), so callers check the matching `bool` first.

use rustc_hash::FxHashMap;

use crate::cards::Card;
use crate::category::SpecEvent;
use crate::error::{DeckError, Result};

/// A change to a deck.
///
/// ## Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use rust_deck::cards::Card;
/// use rust_deck::deck::Deck;
///
/// let mut deck = Deck::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// deck.add_listener(move |event| {
///     if let Ok(added) = event.cards_added() {
///         sink.borrow_mut().extend(added);
///     }
/// });
///
/// let bolt = Card::new("b1", "Lightning Bolt", "Instant");
/// deck.add_copies(&bolt, 4);
///
/// assert_eq!(seen.borrow().as_slice(), &[(bolt, 4)]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DeckEvent {
    cards: Option<Vec<(Card, i64)>>,
    changed_category: Option<(String, SpecEvent)>,
    added_category: Option<String>,
    removed_categories: Option<Vec<String>>,
    old_ranks: Option<FxHashMap<String, usize>>,
}

impl DeckEvent {
    /// Record card count deltas (builder pattern).
    #[must_use]
    pub(crate) fn with_cards(mut self, changes: Vec<(Card, i64)>) -> Self {
        self.cards = Some(changes);
        self
    }

    /// Record an edited category under the name it had before the edit.
    #[must_use]
    pub(crate) fn with_changed_category(mut self, name: impl Into<String>, change: SpecEvent) -> Self {
        self.changed_category = Some((name.into(), change));
        self
    }

    #[must_use]
    pub(crate) fn with_added_category(mut self, name: impl Into<String>) -> Self {
        self.added_category = Some(name.into());
        self
    }

    #[must_use]
    pub(crate) fn with_removed_categories(mut self, names: Vec<String>) -> Self {
        self.removed_categories = Some(names);
        self
    }

    #[must_use]
    pub(crate) fn with_old_ranks(mut self, ranks: FxHashMap<String, usize>) -> Self {
        self.old_ranks = Some(ranks);
        self
    }

    /// Whether any card count changed.
    #[must_use]
    pub fn cards_changed(&self) -> bool {
        self.cards.is_some()
    }

    /// Signed count deltas, in the order they happened.
    pub fn card_changes(&self) -> Result<&[(Card, i64)]> {
        self.cards
            .as_deref()
            .ok_or(DeckError::Unchanged("deck cards"))
    }

    /// Cards whose count went up, with the number of copies added.
    ///
    /// Errors if no count went up, even when some went down.
    pub fn cards_added(&self) -> Result<Vec<(Card, usize)>> {
        let added: Vec<(Card, usize)> = self
            .card_changes()?
            .iter()
            .filter(|(_, delta)| *delta > 0)
            .map(|(card, delta)| (card.clone(), delta.unsigned_abs() as usize))
            .collect();
        if added.is_empty() {
            return Err(DeckError::Unchanged("added cards"));
        }
        Ok(added)
    }

    /// Cards whose count went down, with the number of copies removed as a
    /// positive amount.
    ///
    /// Errors if no count went down, even when some went up.
    pub fn cards_removed(&self) -> Result<Vec<(Card, usize)>> {
        let removed: Vec<(Card, usize)> = self
            .card_changes()?
            .iter()
            .filter(|(_, delta)| *delta < 0)
            .map(|(card, delta)| (card.clone(), delta.unsigned_abs() as usize))
            .collect();
        if removed.is_empty() {
            return Err(DeckError::Unchanged("removed cards"));
        }
        Ok(removed)
    }

    #[must_use]
    pub fn category_added(&self) -> bool {
        self.added_category.is_some()
    }

    pub fn added_name(&self) -> Result<&str> {
        self.added_category
            .as_deref()
            .ok_or(DeckError::Unchanged("added category"))
    }

    #[must_use]
    pub fn categories_removed(&self) -> bool {
        self.removed_categories.is_some()
    }

    pub fn removed_names(&self) -> Result<&[String]> {
        self.removed_categories
            .as_deref()
            .ok_or(DeckError::Unchanged("removed categories"))
    }

    #[must_use]
    pub fn category_changed(&self) -> bool {
        self.changed_category.is_some()
    }

    /// Name of the edited category before the edit.
    pub fn category_name(&self) -> Result<&str> {
        self.changed_category
            .as_ref()
            .map(|(name, _)| name.as_str())
            .ok_or(DeckError::Unchanged("category"))
    }

    pub fn category_changes(&self) -> Result<&SpecEvent> {
        self.changed_category
            .as_ref()
            .map(|(_, change)| change)
            .ok_or(DeckError::Unchanged("category"))
    }

    #[must_use]
    pub fn ranks_changed(&self) -> bool {
        self.old_ranks.is_some()
    }

    /// Ranks before the change, keyed by category name.
    pub fn old_ranks(&self) -> Result<&FxHashMap<String, usize>> {
        self.old_ranks
            .as_ref()
            .ok_or(DeckError::Unchanged("category ranks"))
    }

    /// Whether the event carries no change at all.
    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        !self.cards_changed()
            && !self.category_changed()
            && !self.category_added()
            && !self.categories_removed()
            && !self.ranks_changed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bolt() -> Card {
        Card::new("b", "Lightning Bolt", "Instant")
    }

    fn forest() -> Card {
        Card::new("f", "Forest", "Basic Land — Forest")
    }

    #[test]
    fn test_empty_event() {
        let event = DeckEvent::default();
        assert!(event.is_empty());
        assert!(matches!(event.card_changes(), Err(DeckError::Unchanged(_))));
        assert!(matches!(event.added_name(), Err(DeckError::Unchanged(_))));
        assert!(matches!(event.old_ranks(), Err(DeckError::Unchanged(_))));
    }

    #[test]
    fn test_added_and_removed_split() {
        let event = DeckEvent::default().with_cards(vec![(bolt(), 3), (forest(), -2)]);

        assert!(event.cards_changed());
        assert_eq!(event.cards_added().unwrap(), vec![(bolt(), 3)]);
        assert_eq!(event.cards_removed().unwrap(), vec![(forest(), 2)]);
    }

    #[test]
    fn test_removal_only_has_no_additions() {
        let event = DeckEvent::default().with_cards(vec![(forest(), -1)]);

        assert!(event.cards_changed());
        assert!(matches!(event.cards_added(), Err(DeckError::Unchanged(_))));
        assert_eq!(event.cards_removed().unwrap(), vec![(forest(), 1)]);
    }

    #[test]
    fn test_category_parts() {
        let mut ranks = FxHashMap::default();
        ranks.insert("Ramp".to_string(), 2);
        let event = DeckEvent::default()
            .with_removed_categories(vec!["Lands".to_string()])
            .with_old_ranks(ranks);

        assert!(event.categories_removed());
        assert_eq!(event.removed_names().unwrap(), ["Lands".to_string()]);
        assert_eq!(event.old_ranks().unwrap()["Ramp"], 2);
        assert!(!event.category_added());
        assert!(!event.category_changed());
    }
}
