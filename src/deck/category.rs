//! Category views over a deck.
//!
//! A category is a spec plus the deck cards it currently admits. The deck
//! owns each spec and subscribes to it, so edits made through
//! [`Deck::edit_category`](super::Deck::edit_category) are seen by the deck
//! before the edit returns and the cached filtrate never goes stale.
//!
//! ## Key Types
//!
//! - [`CategoryView`]: Read-only multiset over the admitted cards
//! - [`CategoryMut`]: Mutable view; every mutation is checked against the
//!   spec and forwarded to the deck

use std::cell::RefCell;
use std::rc::Rc;

use crate::cards::{Card, CardId};
use crate::category::{CategorySpec, SpecEvent};
use crate::collection::{CardList, CardListMut};
use crate::core::ListenerId;
use crate::error::{DeckError, Result};

use super::deck::Deck;
use super::entry::Entry;

/// A spec held by a deck, with its cached membership.
#[derive(Debug)]
pub(super) struct Category {
    pub(super) spec: CategorySpec,
    /// Admitted card ids, in deck order.
    pub(super) filtrate: Vec<CardId>,
    pub(super) rank: usize,
    subscription: ListenerId,
    inbox: Rc<RefCell<Vec<SpecEvent>>>,
}

impl Category {
    /// Take ownership of a spec and start listening to it.
    pub(super) fn attach(spec: CategorySpec, rank: usize) -> Self {
        let inbox = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&inbox);
        let subscription = spec.add_listener(move |event| sink.borrow_mut().push(event.clone()));
        Self {
            spec,
            filtrate: Vec::new(),
            rank,
            subscription,
            inbox,
        }
    }

    /// Stop listening and hand the spec back.
    pub(super) fn detach(self) -> CategorySpec {
        self.spec.remove_listener(self.subscription);
        self.spec
    }

    /// Spec events received since the last call.
    pub(super) fn take_pending(&self) -> Vec<SpecEvent> {
        std::mem::take(&mut *self.inbox.borrow_mut())
    }

    pub(super) fn name(&self) -> &str {
        self.spec.name()
    }

    pub(super) fn includes(&self, card: &Card) -> bool {
        self.spec.includes(card)
    }

    /// Re-evaluate every deck entry against the spec, updating both the
    /// filtrate and the entries' category caches.
    pub(super) fn refresh(&mut self, entries: &mut [Entry]) {
        self.filtrate.clear();
        for entry in entries.iter_mut() {
            if self.spec.includes(entry.card()) {
                self.filtrate.push(entry.card().id.clone());
                entry.join(self.spec.name());
            } else {
                entry.leave(self.spec.name());
            }
        }
    }
}

// Shared by both view types. Results borrow from the deck, not the view.

fn entry_of<'a>(deck: &'a Deck, category: &Category, id: &CardId) -> Option<&'a Entry> {
    deck.entry(id).filter(|entry| entry.in_category(category.name()))
}

fn card_at<'a>(deck: &'a Deck, category: &Category, index: usize) -> Option<&'a Card> {
    let id = category.filtrate.get(index)?;
    deck.entry(id).map(Entry::card)
}

fn total_of(deck: &Deck, category: &Category) -> usize {
    category
        .filtrate
        .iter()
        .filter_map(|id| deck.entry(id))
        .map(Entry::count)
        .sum()
}

fn cards_of<'a>(deck: &'a Deck, category: &'a Category) -> impl Iterator<Item = &'a Card> + 'a {
    category
        .filtrate
        .iter()
        .filter_map(move |id| deck.entry(id).map(Entry::card))
}

/// Read-only view of one category of a deck.
///
/// Iteration follows deck order. Counts are the deck's counts.
#[derive(Clone, Copy, Debug)]
pub struct CategoryView<'a> {
    deck: &'a Deck,
    category: &'a Category,
}

impl<'a> CategoryView<'a> {
    pub(super) fn new(deck: &'a Deck, position: usize) -> Self {
        Self {
            deck,
            category: &deck.categories[position],
        }
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        self.category.name()
    }

    #[must_use]
    pub fn spec(&self) -> &'a CategorySpec {
        &self.category.spec
    }

    /// Display position among the deck's categories.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.category.rank
    }

    /// Whether the spec would admit `card`, whether or not it is in the deck.
    #[must_use]
    pub fn includes(&self, card: &Card) -> bool {
        self.category.includes(card)
    }
}

impl CardList for CategoryView<'_> {
    fn size(&self) -> usize {
        self.category.filtrate.len()
    }

    fn total(&self) -> usize {
        total_of(self.deck, self.category)
    }

    fn get(&self, index: usize) -> Option<&Card> {
        card_at(self.deck, self.category, index)
    }

    fn entry(&self, id: &CardId) -> Option<&Entry> {
        entry_of(self.deck, self.category, id)
    }

    fn index_of(&self, id: &CardId) -> Option<usize> {
        self.category.filtrate.iter().position(|c| c == id)
    }

    fn contains(&self, id: &CardId) -> bool {
        entry_of(self.deck, self.category, id).is_some()
    }

    fn iter(&self) -> impl Iterator<Item = &Card> + '_ {
        cards_of(self.deck, self.category)
    }
}

/// Mutable view of one category of a deck.
///
/// Mutations go to the deck, so deck listeners see them as ordinary card
/// changes. A card the spec does not admit is refused with
/// [`DeckError::NotAdmitted`] and the deck is left untouched.
///
/// ## Example
///
/// ```
/// use rust_deck::cards::Card;
/// use rust_deck::category::{CategorySpec, Filter};
/// use rust_deck::collection::{CardList, CardListMut};
/// use rust_deck::deck::Deck;
///
/// let mut deck = Deck::new();
/// deck.add_category(CategorySpec::new("Lands", Filter::type_contains("land")));
///
/// let forest = Card::new("f1", "Forest", "Basic Land — Forest");
/// let bolt = Card::new("b1", "Lightning Bolt", "Instant");
///
/// let mut lands = deck.category_mut("Lands").unwrap();
/// assert!(lands.add_copies(&forest, 3).unwrap());
/// assert!(lands.add(&bolt).is_err());
///
/// assert_eq!(deck.total(), 3);
/// assert_eq!(deck.land(), 3);
/// ```
#[derive(Debug)]
pub struct CategoryMut<'a> {
    deck: &'a mut Deck,
    position: usize,
}

impl<'a> CategoryMut<'a> {
    pub(super) fn new(deck: &'a mut Deck, position: usize) -> Self {
        Self { deck, position }
    }

    fn category(&self) -> &Category {
        &self.deck.categories[self.position]
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.category().name()
    }

    #[must_use]
    pub fn spec(&self) -> &CategorySpec {
        &self.category().spec
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.category().rank
    }

    #[must_use]
    pub fn includes(&self, card: &Card) -> bool {
        self.category().includes(card)
    }

    /// Read-only view of the same category.
    #[must_use]
    pub fn as_view(&self) -> CategoryView<'_> {
        CategoryView::new(self.deck, self.position)
    }

    fn admit(&self, card: &Card) -> Result<()> {
        if self.includes(card) {
            Ok(())
        } else {
            Err(DeckError::NotAdmitted {
                category: self.name().to_string(),
                card: card.id.clone(),
            })
        }
    }
}

impl CardList for CategoryMut<'_> {
    fn size(&self) -> usize {
        self.category().filtrate.len()
    }

    fn total(&self) -> usize {
        total_of(self.deck, self.category())
    }

    fn get(&self, index: usize) -> Option<&Card> {
        card_at(self.deck, self.category(), index)
    }

    fn entry(&self, id: &CardId) -> Option<&Entry> {
        entry_of(self.deck, self.category(), id)
    }

    fn index_of(&self, id: &CardId) -> Option<usize> {
        self.category().filtrate.iter().position(|c| c == id)
    }

    fn contains(&self, id: &CardId) -> bool {
        entry_of(self.deck, self.category(), id).is_some()
    }

    fn iter(&self) -> impl Iterator<Item = &Card> + '_ {
        cards_of(self.deck, self.category())
    }
}

impl CardListMut for CategoryMut<'_> {
    fn add(&mut self, card: &Card) -> Result<bool> {
        self.admit(card)?;
        Ok(self.deck.add(card))
    }

    fn add_copies(&mut self, card: &Card, n: i64) -> Result<bool> {
        self.admit(card)?;
        Ok(self.deck.add_copies(card, n))
    }

    fn remove_copies(&mut self, card: &Card, n: i64) -> Result<usize> {
        self.admit(card)?;
        Ok(self.deck.remove_copies(card, n))
    }

    /// Removing a card the deck does not hold is a no-op, even if the spec
    /// would refuse it.
    fn remove(&mut self, id: &CardId) -> Result<bool> {
        let Some(card) = self.deck.entry(id).map(|e| e.card().clone()) else {
            return Ok(false);
        };
        self.admit(&card)?;
        Ok(self.deck.remove(id))
    }

    fn set(&mut self, card: &Card, n: i64) -> Result<bool> {
        self.admit(card)?;
        Ok(self.deck.set(card, n))
    }
}
