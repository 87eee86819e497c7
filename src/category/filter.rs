//! Category filters - the selection predicate of a category.
//!
//! A `Filter` pairs a predicate over cards with the text it was built from.
//! The text is what gets saved; turning text back into a predicate is the
//! job of whoever owns the filter language, so loading takes a parser
//! callback instead of living here.

use std::fmt;
use std::sync::Arc;

use crate::cards::{normalize_name, Card};

type Predicate = Arc<dyn Fn(&Card) -> bool + Send + Sync>;

/// Selection predicate with its textual form.
///
/// Two filters with the same text compare equal; the text is the filter's
/// identity as far as saving and change detection are concerned.
///
/// ## Example
///
/// ```
/// use rust_deck::cards::Card;
/// use rust_deck::category::Filter;
///
/// let cheap_spells = Filter::mana_value_at_most(2).and(Filter::type_contains("land").negate());
///
/// let bolt = Card::new("b1", "Lightning Bolt", "Instant").with_mana_value(1);
/// let forest = Card::new("f1", "Forest", "Basic Land — Forest");
///
/// assert!(cheap_spells.matches(&bolt));
/// assert!(!cheap_spells.matches(&forest));
/// assert_eq!(cheap_spells.repr(), "(mv<=2 & !type:land)");
/// ```
#[derive(Clone)]
pub struct Filter {
    repr: String,
    predicate: Predicate,
}

impl Filter {
    /// Create a filter from its text and the predicate that text means.
    pub fn new(
        repr: impl Into<String>,
        predicate: impl Fn(&Card) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            repr: repr.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Filter that admits every card.
    #[must_use]
    pub fn all() -> Self {
        Self::new("*", |_| true)
    }

    /// Filter that admits nothing; membership comes from the whitelist only.
    #[must_use]
    pub fn none() -> Self {
        Self::new("-", |_| false)
    }

    /// Cards whose type line contains `word`.
    #[must_use]
    pub fn type_contains(word: &str) -> Self {
        let word = word.to_string();
        Self::new(format!("type:{word}"), move |card| card.type_contains(&word))
    }

    /// Cards whose normalized name contains `text` (normalized the same way).
    #[must_use]
    pub fn name_contains(text: &str) -> Self {
        let needle = normalize_name(text);
        Self::new(format!("name:{text}"), move |card| {
            card.normalized_name().contains(&needle)
        })
    }

    /// Cards with mana value at most `max`.
    #[must_use]
    pub fn mana_value_at_most(max: u32) -> Self {
        Self::new(format!("mv<={max}"), move |card| card.mana_value <= max)
    }

    /// Cards matching both filters.
    #[must_use]
    pub fn and(self, other: Filter) -> Self {
        let repr = format!("({} & {})", self.repr, other.repr);
        Self::new(repr, move |card| self.matches(card) && other.matches(card))
    }

    /// Cards matching either filter.
    #[must_use]
    pub fn or(self, other: Filter) -> Self {
        let repr = format!("({} | {})", self.repr, other.repr);
        Self::new(repr, move |card| self.matches(card) || other.matches(card))
    }

    /// Cards not matching this filter.
    #[must_use]
    pub fn negate(self) -> Self {
        let repr = format!("!{}", self.repr);
        Self::new(repr, move |card| !self.matches(card))
    }

    /// Test a card against the predicate.
    #[must_use]
    pub fn matches(&self, card: &Card) -> bool {
        (self.predicate)(card)
    }

    /// The filter's textual form.
    #[must_use]
    pub fn repr(&self) -> &str {
        &self.repr
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.repr == other.repr
    }
}

impl Eq for Filter {}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Filter").field(&self.repr).finish()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest() -> Card {
        Card::new("f", "Forest", "Basic Land — Forest")
    }

    fn elves() -> Card {
        Card::new("e", "Llanowar Elves", "Creature — Elf Druid").with_mana_value(1)
    }

    #[test]
    fn test_all_and_none() {
        assert!(Filter::all().matches(&forest()));
        assert!(!Filter::none().matches(&forest()));
    }

    #[test]
    fn test_type_contains() {
        let lands = Filter::type_contains("land");
        assert!(lands.matches(&forest()));
        assert!(!lands.matches(&elves()));
        assert_eq!(lands.repr(), "type:land");
    }

    #[test]
    fn test_name_contains() {
        let filter = Filter::name_contains("ELVES");
        assert!(filter.matches(&elves()));
        assert!(!filter.matches(&forest()));
    }

    #[test]
    fn test_combinators() {
        let filter = Filter::type_contains("land").or(Filter::mana_value_at_most(1));
        assert!(filter.matches(&forest()));
        assert!(filter.matches(&elves()));
        assert_eq!(filter.repr(), "(type:land | mv<=1)");

        let filter = Filter::type_contains("creature").negate();
        assert!(filter.matches(&forest()));
        assert!(!filter.matches(&elves()));
    }

    #[test]
    fn test_equality_is_by_text() {
        assert_eq!(Filter::type_contains("land"), Filter::new("type:land", |_| false));
        assert_ne!(Filter::all(), Filter::none());
    }
}
