//! The deck: an ordered multiset of cards with named categories.
//!
//! ## Invariants
//!
//! - Every entry has a count of at least 1; a card whose count reaches 0
//!   leaves the deck, its categories, and their override sets.
//! - `total` equals the sum of entry counts and `land` the sum over land
//!   cards, at every point a listener can observe.
//! - Category ranks are exactly `0..num_categories()`.
//! - Each category's filtrate is the deck's cards its spec admits, in deck
//!   order, and each entry's category cache agrees.
//!
//! Listeners run synchronously, after the deck is consistent and before
//! the mutator returns. A listener cannot mutate the deck it observes; it
//! receives the event only.

use chrono::{Local, NaiveDate};
use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::cards::{Card, CardId};
use crate::category::{CategorySpec, SpecEvent};
use crate::collection::{CardList, CardListMut};
use crate::core::{DeckConfig, ListenerId, Listeners, WeakListeners};
use crate::error::{DeckError, Result};

use super::category::{Category, CategoryMut, CategoryView};
use super::entry::Entry;
use super::event::DeckEvent;

/// A deck of cards.
///
/// ## Example
///
/// ```
/// use rust_deck::cards::Card;
/// use rust_deck::category::{CategorySpec, Filter};
/// use rust_deck::collection::CardList;
/// use rust_deck::deck::Deck;
///
/// let forest = Card::new("f1", "Forest", "Basic Land — Forest");
/// let bolt = Card::new("b1", "Lightning Bolt", "Instant");
///
/// let mut deck = Deck::new();
/// deck.add_copies(&forest, 17);
/// deck.add_copies(&bolt, 4);
/// assert_eq!((deck.size(), deck.total(), deck.land()), (2, 21, 17));
///
/// deck.add_category(CategorySpec::new("Spells", Filter::type_contains("instant")));
/// assert_eq!(deck.total_of("Spells"), 4);
/// ```
#[derive(Debug)]
pub struct Deck {
    pub(super) config: DeckConfig,
    pub(super) master_list: Vec<Entry>,
    /// Card id to position in `master_list`.
    positions: FxHashMap<CardId, usize>,
    /// In insertion order; renaming moves a category to the end.
    pub(super) categories: Vec<Category>,
    pub(super) index: FxHashMap<String, usize>,
    pub(super) total: usize,
    pub(super) land: usize,
    listeners: Listeners<DeckEvent>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// Create an empty deck with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DeckConfig::default())
    }

    /// Create an empty deck.
    #[must_use]
    pub fn with_config(config: DeckConfig) -> Self {
        Self {
            config,
            master_list: Vec::new(),
            positions: FxHashMap::default(),
            categories: Vec::new(),
            index: FxHashMap::default(),
            total: 0,
            land: 0,
            listeners: Listeners::new(),
        }
    }

    /// Create a deck holding one copy of each card.
    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut deck = Self::new();
        deck.add_all(cards);
        deck
    }

    #[must_use]
    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    // === Listeners ===

    /// Subscribe to changes of this deck.
    pub fn add_listener(&self, callback: impl Fn(&DeckEvent) + 'static) -> ListenerId {
        self.listeners.add(callback)
    }

    /// Unsubscribe. Returns `false` if the listener was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Non-owning handle to the listener registry.
    ///
    /// A listener that captures this handle can register or remove
    /// listeners while it runs; the change applies from the next event.
    /// The handle does not keep the registry alive past the deck.
    #[must_use]
    pub fn listeners(&self) -> WeakListeners<DeckEvent> {
        self.listeners.downgrade()
    }

    fn notify(&self, event: DeckEvent) {
        if !event.is_empty() {
            self.listeners.dispatch(&event);
        }
    }

    // === Card counts ===

    /// Copies of land cards.
    #[must_use]
    pub fn land(&self) -> usize {
        self.land
    }

    /// Copies of non-land cards.
    #[must_use]
    pub fn nonland(&self) -> usize {
        self.total - self.land
    }

    fn is_land(&self, card: &Card) -> bool {
        card.type_contains(&self.config.land_type)
    }

    fn position(&self, id: &CardId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    fn count_in(&mut self, card: &Card, copies: usize) {
        self.total += copies;
        if self.is_land(card) {
            self.land += copies;
        }
    }

    fn count_out(&mut self, card: &Card, copies: usize) {
        self.total -= copies;
        if self.is_land(card) {
            self.land -= copies;
        }
    }

    // === Multiset mutation ===

    /// Add one copy of a card that is not yet in the deck.
    ///
    /// Returns `false`, and does nothing, if the card is already present.
    pub fn add(&mut self, card: &Card) -> bool {
        !self.contains(&card.id) && self.add_copies(card, 1)
    }

    /// Add `n` copies dated today. Returns `false` if `n < 1`.
    pub fn add_copies(&mut self, card: &Card, n: i64) -> bool {
        self.add_dated(card, n, Local::now().date_naive())
    }

    /// Add `n` copies, recording `date` if this creates the entry.
    ///
    /// An existing entry keeps its original date.
    pub fn add_dated(&mut self, card: &Card, n: i64, date: NaiveDate) -> bool {
        if n < 1 {
            return false;
        }
        let Ok(copies) = usize::try_from(n) else {
            return false;
        };
        // Counts follow the stored card, not the caller's copy of it.
        let card = match self.position(&card.id) {
            Some(position) => {
                self.master_list[position].add(copies);
                self.master_list[position].card().clone()
            }
            None => {
                let mut entry = Entry::new(card.clone(), copies, date);
                for category in &mut self.categories {
                    if category.includes(card) {
                        category.filtrate.push(card.id.clone());
                        entry.join(category.name());
                    }
                }
                self.positions.insert(card.id.clone(), self.master_list.len());
                self.master_list.push(entry);
                card.clone()
            }
        };
        self.count_in(&card, copies);

        debug!("event=cards_added module=deck card={} copies={}", card.id, copies);
        self.notify(DeckEvent::default().with_cards(vec![(card, n)]));
        true
    }

    /// Add one copy of each absent card. Returns whether any was added.
    pub fn add_all<'a>(&mut self, cards: impl IntoIterator<Item = &'a Card>) -> bool {
        let mut changed = false;
        for card in cards {
            changed |= self.add(card);
        }
        changed
    }

    /// Add every entry of `other`, copy counts included.
    pub fn add_deck(&mut self, other: &Deck) -> bool {
        let mut changed = false;
        for entry in &other.master_list {
            changed |= self.add_copies(entry.card(), entry.count() as i64);
        }
        changed
    }

    /// Increase a card's count by one.
    pub fn increase(&mut self, card: &Card) -> bool {
        self.add_copies(card, 1)
    }

    /// Increase the count of each card by `n`.
    pub fn increase_all<'a>(&mut self, cards: impl IntoIterator<Item = &'a Card>, n: i64) -> bool {
        let mut changed = false;
        for card in cards {
            changed |= self.add_copies(card, n);
        }
        changed
    }

    /// Decrease a card's count by one. Returns the number removed (0 or 1).
    pub fn decrease(&mut self, card: &Card) -> usize {
        self.remove_copies(card, 1)
    }

    /// Remove up to `n` copies, returning how many were removed.
    pub fn remove_copies(&mut self, card: &Card, n: i64) -> usize {
        if n < 1 {
            return 0;
        }
        let Some(position) = self.position(&card.id) else {
            return 0;
        };
        let requested = usize::try_from(n).unwrap_or(usize::MAX);
        let removed = requested.min(self.master_list[position].count());
        let card = self.master_list[position].card().clone();
        if self.master_list[position].remove(removed) == 0 {
            self.purge(position);
        }
        self.count_out(&card, removed);

        debug!("event=cards_removed module=deck card={} copies={}", card.id, removed);
        self.notify(DeckEvent::default().with_cards(vec![(card, -(removed as i64))]));
        removed
    }

    /// Remove a card's entry whatever its count.
    pub fn remove(&mut self, id: &CardId) -> bool {
        match self.entry(id).map(|e| e.card().clone()) {
            Some(card) => self.remove_copies(&card, i64::MAX) > 0,
            None => false,
        }
    }

    /// Remove the entries for the given cards. Returns whether any was removed.
    pub fn remove_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a CardId>) -> bool {
        let mut changed = false;
        for id in ids {
            changed |= self.remove(id);
        }
        changed
    }

    /// Set a card's count. Negative counts are treated as 0, which removes
    /// the entry. Returns `false` if the count was already `n`.
    pub fn set(&mut self, card: &Card, n: i64) -> bool {
        let n = n.max(0);
        let Some(position) = self.position(&card.id) else {
            return self.add_copies(card, n);
        };
        let target = usize::try_from(n).unwrap_or(usize::MAX);
        let current = self.master_list[position].count();
        if target == current {
            return false;
        }
        let card = self.master_list[position].card().clone();
        if target > current {
            self.count_in(&card, target - current);
        } else {
            self.count_out(&card, current - target);
        }
        if target == 0 {
            self.purge(position);
        } else {
            self.master_list[position].set_count(target);
        }

        let delta = n - current as i64;
        debug!("event=cards_set module=deck card={} count={}", card.id, target);
        self.notify(DeckEvent::default().with_cards(vec![(card, delta)]));
        true
    }

    /// Set the count of the card at `index`. Out of range is a no-op.
    pub fn set_at(&mut self, index: usize, n: i64) -> bool {
        match self.get(index).cloned() {
            Some(card) => self.set(&card, n),
            None => false,
        }
    }

    /// Drop an entry whose count reached 0, along with every trace of it in
    /// the categories. Override sets forget the card silently.
    fn purge(&mut self, position: usize) {
        let entry = self.master_list.remove(position);
        let id = &entry.card().id;
        self.positions.remove(id);
        for (shifted, later) in self.master_list.iter().enumerate().skip(position) {
            self.positions.insert(later.card().id.clone(), shifted);
        }
        for category in &mut self.categories {
            category.filtrate.retain(|c| c != id);
            category.spec.forget(id);
        }
    }

    /// Remove every card and every category.
    ///
    /// One event reports all card removals and all removed category names.
    pub fn clear(&mut self) {
        let removed: Vec<(Card, i64)> = self
            .master_list
            .drain(..)
            .map(|entry| {
                let count = entry.count() as i64;
                (entry.into_card(), -count)
            })
            .collect();
        let names: Vec<String> = self
            .categories
            .drain(..)
            .map(|category| category.detach().name().to_string())
            .collect();
        self.positions.clear();
        self.index.clear();
        self.total = 0;
        self.land = 0;

        let mut event = DeckEvent::default();
        if !removed.is_empty() {
            event = event.with_cards(removed);
        }
        if !names.is_empty() {
            event = event.with_removed_categories(names);
        }
        debug!("event=deck_cleared module=deck");
        self.notify(event);
    }

    // === Categories ===

    fn category_position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn reindex(&mut self) {
        self.index = self
            .categories
            .iter()
            .enumerate()
            .map(|(position, category)| (category.name().to_string(), position))
            .collect();
    }

    #[must_use]
    pub fn num_categories(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn contains_category(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Specs in the order the categories were added (or last renamed).
    pub fn categories(&self) -> impl Iterator<Item = &CategorySpec> + '_ {
        self.categories.iter().map(|c| &c.spec)
    }

    /// Specs ordered by rank.
    #[must_use]
    pub fn categories_by_rank(&self) -> Vec<&CategorySpec> {
        let mut ranked: Vec<&Category> = self.categories.iter().collect();
        ranked.sort_by_key(|c| c.rank);
        ranked.into_iter().map(|c| &c.spec).collect()
    }

    #[must_use]
    pub fn category_rank(&self, name: &str) -> Option<usize> {
        self.category_position(name).map(|p| self.categories[p].rank)
    }

    pub fn category_spec(&self, name: &str) -> Result<&CategorySpec> {
        self.category_position(name)
            .map(|p| &self.categories[p].spec)
            .ok_or_else(|| DeckError::UnknownCategory(name.to_string()))
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<CategoryView<'_>> {
        let position = self.category_position(name)?;
        Some(CategoryView::new(self, position))
    }

    #[must_use]
    pub fn category_mut(&mut self, name: &str) -> Option<CategoryMut<'_>> {
        let position = self.category_position(name)?;
        Some(CategoryMut::new(self, position))
    }

    /// Number of distinct cards in a category; 0 if there is no such category.
    #[must_use]
    pub fn size_of(&self, name: &str) -> usize {
        self.category(name).map_or(0, |c| c.size())
    }

    /// Number of copies in a category; 0 if there is no such category.
    #[must_use]
    pub fn total_of(&self, name: &str) -> usize {
        self.category(name).map_or(0, |c| c.total())
    }

    /// Whether a category currently holds a card.
    #[must_use]
    pub fn category_contains(&self, name: &str, id: &CardId) -> bool {
        self.category(name).is_some_and(|c| c.contains(id))
    }

    /// Add a category at the bottom rank and return a view of it.
    ///
    /// If a category with the same name already exists, `spec` is dropped
    /// and the existing category is returned unchanged.
    pub fn add_category(&mut self, spec: CategorySpec) -> CategoryView<'_> {
        if let Some(position) = self.category_position(spec.name()) {
            return CategoryView::new(self, position);
        }
        let name = spec.name().to_string();
        let mut category = Category::attach(spec, self.categories.len());
        category.refresh(&mut self.master_list);
        self.categories.push(category);
        let position = self.categories.len() - 1;
        self.index.insert(name.clone(), position);

        debug!("event=category_added module=deck category={} rank={}", name, position);
        self.notify(DeckEvent::default().with_added_category(name));
        CategoryView::new(self, position)
    }

    /// Remove a category, handing its spec back.
    ///
    /// Lower categories move up one rank to close the gap.
    pub fn remove_category(&mut self, name: &str) -> Option<CategorySpec> {
        let position = self.category_position(name)?;
        let category = self.categories.remove(position);
        self.reindex();
        for entry in &mut self.master_list {
            entry.leave(name);
        }
        let mut old_ranks = FxHashMap::default();
        for other in &mut self.categories {
            if other.rank > category.rank {
                old_ranks.insert(other.name().to_string(), other.rank);
                other.rank -= 1;
            }
        }
        let spec = category.detach();

        debug!("event=category_removed module=deck category={}", name);
        let mut event = DeckEvent::default().with_removed_categories(vec![name.to_string()]);
        if !old_ranks.is_empty() {
            event = event.with_old_ranks(old_ranks);
        }
        self.notify(event);
        Some(spec)
    }

    /// Swap a category's rank with whichever category holds `target`.
    ///
    /// Returns `false` if there is no such category, `target` is out of
    /// range, or the category already has that rank.
    pub fn swap_category_ranks(&mut self, name: &str, target: usize) -> bool {
        let Some(position) = self.category_position(name) else {
            return false;
        };
        let rank = self.categories[position].rank;
        if target >= self.categories.len() || target == rank {
            return false;
        }
        let Some(other) = self.categories.iter().position(|c| c.rank == target) else {
            return false;
        };
        let mut old_ranks = FxHashMap::default();
        old_ranks.insert(name.to_string(), rank);
        old_ranks.insert(self.categories[other].name().to_string(), target);
        self.categories[other].rank = rank;
        self.categories[position].rank = target;

        debug!("event=ranks_swapped module=deck category={} from={} to={}", name, rank, target);
        self.notify(DeckEvent::default().with_old_ranks(old_ranks));
        true
    }

    /// Whitelist a deck card in a category.
    ///
    /// Returns `false` if the card is not in the deck, the category does
    /// not exist, or the card was already whitelisted and not blacklisted.
    pub fn include(&mut self, name: &str, card: &Card) -> bool {
        if !self.contains(&card.id) {
            return false;
        }
        self.edit_category(name, |spec| spec.include(&card.id))
            .unwrap_or(false)
    }

    /// Blacklist a deck card in a category.
    ///
    /// Returns `false` if the card is not in the deck, the category does
    /// not exist, or the card was already blacklisted and not whitelisted.
    pub fn exclude(&mut self, name: &str, card: &Card) -> bool {
        if !self.contains(&card.id) {
            return false;
        }
        self.edit_category(name, |spec| spec.exclude(&card.id))
            .unwrap_or(false)
    }

    /// Edit a category's spec in place.
    ///
    /// Each spec change made by `edit` reaches the deck's listeners as one
    /// category-changed event, labelled with the category name before that
    /// change, after the filtrate and entry caches have been updated.
    ///
    /// Renaming onto the name of another category is rolled back: the other
    /// changes still apply and `DuplicateCategory` is returned.
    ///
    /// ## Example
    ///
    /// ```
    /// use rust_deck::category::{CategorySpec, Filter};
    /// use rust_deck::deck::Deck;
    ///
    /// let mut deck = Deck::new();
    /// deck.add_category(CategorySpec::new("Lands", Filter::type_contains("land")));
    ///
    /// deck.edit_category("Lands", |spec| spec.set_name("Mana")).unwrap();
    /// assert!(deck.contains_category("Mana"));
    /// assert!(!deck.contains_category("Lands"));
    /// ```
    pub fn edit_category<R>(&mut self, name: &str, edit: impl FnOnce(&mut CategorySpec) -> R) -> Result<R> {
        let mut position = self
            .category_position(name)
            .ok_or_else(|| DeckError::UnknownCategory(name.to_string()))?;
        let result = edit(&mut self.categories[position].spec);

        let pending = self.categories[position].take_pending();
        let final_name = self.categories[position].name().to_string();
        let mut rejected = None;
        if final_name != name {
            if self.index.contains_key(&final_name) {
                warn!(
                    "event=rename_rejected module=deck category={} target={}",
                    name, final_name
                );
                self.categories[position].spec.set_name(name);
                self.categories[position].take_pending();
                rejected = Some(final_name);
            } else {
                position = self.rename(position, name, &final_name);
            }
        }

        if pending.iter().any(SpecEvent::membership_changed) {
            let category = &mut self.categories[position];
            category.refresh(&mut self.master_list);
        }

        for change in pending {
            let (label, change) = if rejected.is_some() {
                (name.to_string(), change.without_rename(name))
            } else {
                let label = change.old_name().unwrap_or(change.spec_name()).to_string();
                (label, change)
            };
            if change.is_empty() {
                continue;
            }
            debug!("event=category_changed module=deck category={}", label);
            self.notify(DeckEvent::default().with_changed_category(label, change));
        }

        match rejected {
            Some(target) => Err(DeckError::DuplicateCategory(target)),
            None => Ok(result),
        }
    }

    /// Re-key a renamed category. It moves to the end of insertion order.
    fn rename(&mut self, position: usize, old: &str, new: &str) -> usize {
        let category = self.categories.remove(position);
        self.categories.push(category);
        self.reindex();
        for entry in &mut self.master_list {
            entry.rename_category(old, new);
        }
        self.categories.len() - 1
    }
}

impl CardList for Deck {
    fn size(&self) -> usize {
        self.master_list.len()
    }

    fn total(&self) -> usize {
        self.total
    }

    fn get(&self, index: usize) -> Option<&Card> {
        self.master_list.get(index).map(Entry::card)
    }

    fn entry(&self, id: &CardId) -> Option<&Entry> {
        self.position(id).map(|position| &self.master_list[position])
    }

    fn entry_at(&self, index: usize) -> Option<&Entry> {
        self.master_list.get(index)
    }

    fn index_of(&self, id: &CardId) -> Option<usize> {
        self.position(id)
    }

    fn iter(&self) -> impl Iterator<Item = &Card> + '_ {
        self.master_list.iter().map(Entry::card)
    }
}

impl CardListMut for Deck {
    fn add(&mut self, card: &Card) -> Result<bool> {
        Ok(Deck::add(self, card))
    }

    fn add_copies(&mut self, card: &Card, n: i64) -> Result<bool> {
        Ok(Deck::add_copies(self, card, n))
    }

    fn remove_copies(&mut self, card: &Card, n: i64) -> Result<usize> {
        Ok(Deck::remove_copies(self, card, n))
    }

    fn remove(&mut self, id: &CardId) -> Result<bool> {
        Ok(Deck::remove(self, id))
    }

    fn set(&mut self, card: &Card, n: i64) -> Result<bool> {
        Ok(Deck::set(self, card, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Filter;

    fn forest() -> Card {
        Card::new("f", "Forest", "Basic Land — Forest")
    }

    fn index_is_consistent(deck: &Deck) -> bool {
        deck.index.len() == deck.categories.len()
            && deck
                .categories
                .iter()
                .enumerate()
                .all(|(position, c)| deck.index.get(c.name()) == Some(&position))
    }

    #[test]
    fn test_index_after_rename_and_remove() {
        let mut deck = Deck::new();
        for name in ["A", "B", "C"] {
            deck.add_category(CategorySpec::new(name, Filter::all()));
        }

        deck.edit_category("A", |spec| spec.set_name("Z")).unwrap();
        assert!(index_is_consistent(&deck));
        assert_eq!(deck.categories[2].name(), "Z");

        deck.remove_category("B");
        assert!(index_is_consistent(&deck));
        assert_eq!(deck.category_rank("Z"), Some(0));
        assert_eq!(deck.category_rank("C"), Some(1));
    }

    #[test]
    fn test_purge_drops_filtrate_and_overrides() {
        let mut deck = Deck::new();
        deck.add_copies(&forest(), 2);
        deck.add_category(CategorySpec::new("Lands", Filter::none()));
        deck.include("Lands", &forest());
        assert_eq!(deck.categories[0].filtrate, [forest().id]);

        deck.set(&forest(), 0);
        assert!(deck.categories[0].filtrate.is_empty());
        assert!(deck.categories[0].spec.whitelist().is_empty());
        assert!(deck.master_list.is_empty());
    }

    fn positions_are_consistent(deck: &Deck) -> bool {
        deck.positions.len() == deck.master_list.len()
            && deck
                .master_list
                .iter()
                .enumerate()
                .all(|(position, e)| deck.positions.get(&e.card().id) == Some(&position))
    }

    #[test]
    fn test_positions_after_purge() {
        let mut deck = Deck::new();
        for id in ["a", "b", "c", "d"] {
            deck.add_copies(&Card::new(id, id, "Instant"), 2);
        }

        deck.remove(&CardId::new("b"));
        assert!(positions_are_consistent(&deck));
        assert_eq!(deck.index_of(&CardId::new("d")), Some(2));

        deck.set(&Card::new("a", "a", "Instant"), 0);
        assert!(positions_are_consistent(&deck));
        assert_eq!(deck.entry(&CardId::new("c")).map(Entry::count), Some(2));
        assert!(deck.entry(&CardId::new("a")).is_none());

        deck.clear();
        assert!(deck.positions.is_empty());
    }

    #[test]
    fn test_land_count_follows_stored_card() {
        let stored = Card::new("x", "Dryad Arbor", "Land Creature — Forest Dryad");
        let retyped = Card::new("x", "Dryad Arbor", "Creature — Forest Dryad");
        let mut deck = Deck::new();
        deck.add_copies(&stored, 1);
        deck.add_copies(&retyped, 2);

        assert_eq!((deck.total, deck.land), (3, 3));

        assert_eq!(deck.remove_copies(&stored, 3), 3);
        assert_eq!((deck.total, deck.land), (0, 0));
    }

    #[test]
    fn test_pending_events_are_drained() {
        let mut deck = Deck::new();
        deck.add_category(CategorySpec::new("Lands", Filter::none()));
        deck.edit_category("Lands", |spec| spec.set_filter(Filter::all()))
            .unwrap();
        assert!(deck.categories[0].take_pending().is_empty());
    }

    #[test]
    fn test_clear_detaches_specs() {
        let mut deck = Deck::new();
        deck.add_copies(&forest(), 1);
        deck.add_category(CategorySpec::new("Lands", Filter::all()));

        deck.clear();
        assert!(deck.index.is_empty());
        assert_eq!((deck.total, deck.land), (0, 0));
    }
}
