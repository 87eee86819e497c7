//! Property-based tests for deck invariants.
//!
//! Random sequences of deck operations must preserve:
//!  - Aggregates: total = Σ counts, land = Σ counts of land cards
//!  - View consistency: each filtrate is exactly the admitted deck cards,
//!    in deck order, and every entry's category cache agrees
//!  - Rank density: ranks are exactly 0..n
//!  - Swap involution: swapping there and back restores all ranks

use std::collections::BTreeSet;

use proptest::prelude::*;
use rust_deck::cards::Card;
use rust_deck::category::{CategorySpec, Filter};
use rust_deck::collection::CardList;
use rust_deck::deck::Deck;

fn pool() -> Vec<Card> {
    vec![
        Card::new("forest", "Forest", "Basic Land — Forest"),
        Card::new("dryad", "Dryad Arbor", "Land Creature — Forest Dryad").with_mana_value(0),
        Card::new("elves", "Llanowar Elves", "Creature — Elf Druid").with_mana_value(1),
        Card::new("bolt", "Lightning Bolt", "Instant").with_mana_value(1),
        Card::new("titan", "Primeval Titan", "Creature — Giant").with_mana_value(6),
        Card::new("map", "Expedition Map", "Artifact").with_mana_value(1),
    ]
}

fn specs() -> Vec<CategorySpec> {
    vec![
        CategorySpec::new("Lands", Filter::type_contains("land")),
        CategorySpec::new("Creatures", Filter::type_contains("creature")),
        CategorySpec::new("Cheap", Filter::mana_value_at_most(1)),
        CategorySpec::new("Nothing", Filter::none()),
    ]
}

#[derive(Clone, Debug)]
enum Op {
    Add(usize, i64),
    AddOne(usize),
    Remove(usize, i64),
    RemoveEntry(usize),
    Set(usize, i64),
    Include(usize, usize),
    Exclude(usize, usize),
    AddCategory(usize),
    RemoveCategory(usize),
    Swap(usize, usize),
}

/// Generate strategies for prop-testing

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..6, -2i64..6).prop_map(|(c, n)| Op::Add(c, n)),
        (0usize..6).prop_map(Op::AddOne),
        (0usize..6, -2i64..8).prop_map(|(c, n)| Op::Remove(c, n)),
        (0usize..6).prop_map(Op::RemoveEntry),
        (0usize..6, -3i64..6).prop_map(|(c, n)| Op::Set(c, n)),
        (0usize..4, 0usize..6).prop_map(|(k, c)| Op::Include(k, c)),
        (0usize..4, 0usize..6).prop_map(|(k, c)| Op::Exclude(k, c)),
        (0usize..4).prop_map(Op::AddCategory),
        (0usize..4).prop_map(Op::RemoveCategory),
        (0usize..4, 0usize..5).prop_map(|(k, t)| Op::Swap(k, t)),
    ]
}

fn apply(deck: &mut Deck, op: &Op) {
    let cards = pool();
    let specs = specs();
    match *op {
        Op::Add(c, n) => {
            deck.add_copies(&cards[c], n);
        }
        Op::AddOne(c) => {
            deck.add(&cards[c]);
        }
        Op::Remove(c, n) => {
            deck.remove_copies(&cards[c], n);
        }
        Op::RemoveEntry(c) => {
            deck.remove(&cards[c].id);
        }
        Op::Set(c, n) => {
            deck.set(&cards[c], n);
        }
        Op::Include(k, c) => {
            deck.include(specs[k].name(), &cards[c]);
        }
        Op::Exclude(k, c) => {
            deck.exclude(specs[k].name(), &cards[c]);
        }
        Op::AddCategory(k) => {
            deck.add_category(specs[k].clone());
        }
        Op::RemoveCategory(k) => {
            deck.remove_category(specs[k].name());
        }
        Op::Swap(k, target) => {
            deck.swap_category_ranks(specs[k].name(), target);
        }
    }
}

fn check_invariants(deck: &Deck) -> Result<(), TestCaseError> {
    let entries: Vec<_> = (0..deck.size()).filter_map(|i| deck.entry_at(i)).collect();
    prop_assert_eq!(entries.len(), deck.size());
    prop_assert!(entries.iter().all(|e| e.count() >= 1));
    for (position, e) in entries.iter().enumerate() {
        prop_assert_eq!(deck.index_of(&e.card().id), Some(position));
    }

    let total: usize = entries.iter().map(|e| e.count()).sum();
    let land: usize = entries
        .iter()
        .filter(|e| e.card().type_contains("land"))
        .map(|e| e.count())
        .sum();
    prop_assert_eq!(deck.total(), total);
    prop_assert_eq!(deck.land(), land);

    for spec in deck.categories() {
        let view = deck.category(spec.name()).unwrap();
        let expected: Vec<&Card> = deck.iter().filter(|c| spec.includes(c)).collect();
        let actual: Vec<&Card> = view.iter().collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(view.total(), view.iter().map(|c| deck.entry(&c.id).unwrap().count()).sum::<usize>());
    }

    for entry in &entries {
        let cached: BTreeSet<&str> = entry.categories().iter().map(String::as_str).collect();
        let admitting: BTreeSet<&str> = deck
            .categories()
            .filter(|spec| spec.includes(entry.card()))
            .map(CategorySpec::name)
            .collect();
        prop_assert_eq!(cached, admitting);
    }

    let mut ranks: Vec<usize> = deck
        .categories()
        .filter_map(|spec| deck.category_rank(spec.name()))
        .collect();
    ranks.sort_unstable();
    prop_assert_eq!(ranks, (0..deck.num_categories()).collect::<Vec<_>>());
    Ok(())
}

proptest! {
    #[test]
    fn prop_invariants_hold(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut deck = Deck::new();
        for op in &ops {
            apply(&mut deck, op);
            check_invariants(&deck)?;
        }
    }

    #[test]
    fn prop_add_present_is_noop(ops in prop::collection::vec(op_strategy(), 0..30), c in 0usize..6) {
        let mut deck = Deck::new();
        for op in &ops {
            apply(&mut deck, op);
        }
        let card = &pool()[c];
        let before = deck.entry(&card.id).map(|e| e.count());
        let added = deck.add(card);
        if let Some(count) = before {
            prop_assert!(!added);
            prop_assert_eq!(deck.entry(&card.id).map(|e| e.count()), Some(count));
        } else {
            prop_assert!(added);
        }
    }

    #[test]
    fn prop_swap_is_involution(order in Just((0usize..4).collect::<Vec<_>>()).prop_shuffle(), a in 0usize..4, b in 0usize..4) {
        let specs = specs();
        let mut deck = Deck::new();
        for &k in &order {
            deck.add_category(specs[k].clone());
        }
        let name_a = specs[a].name();
        let name_b = specs[b].name();
        let before: Vec<Option<usize>> = specs.iter().map(|s| deck.category_rank(s.name())).collect();

        let rank_a = deck.category_rank(name_a).unwrap();
        let rank_b = deck.category_rank(name_b).unwrap();
        deck.swap_category_ranks(name_a, rank_b);
        deck.swap_category_ranks(name_a, rank_a);

        let after: Vec<Option<usize>> = specs.iter().map(|s| deck.category_rank(s.name())).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_remove_category_keeps_relative_order(k in 0usize..4) {
        let specs = specs();
        let mut deck = Deck::new();
        for spec in &specs {
            deck.add_category(spec.clone());
        }
        deck.swap_category_ranks("Nothing", 0);
        let before: Vec<String> = deck.categories_by_rank().iter().map(|s| s.name().to_string()).collect();

        deck.remove_category(specs[k].name());

        let after: Vec<String> = deck.categories_by_rank().iter().map(|s| s.name().to_string()).collect();
        let expected: Vec<String> = before.into_iter().filter(|n| n != specs[k].name()).collect();
        prop_assert_eq!(after, expected);
    }
}
