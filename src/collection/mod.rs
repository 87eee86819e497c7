//! The multiset contract shared by decks and category views.
//!
//! A card list holds at most one entry per card, and each entry carries a
//! copy count. `size` counts entries; `total` counts copies. Iteration is
//! in insertion order.
//!
//! ## Key Types
//!
//! - [`CardList`]: Read access
//! - [`CardListMut`]: Mutation, with `Result` returns so that views which
//!   can refuse a card (categories) share the signature with views that
//!   never do (the deck)

mod list;

pub use list::{CardList, CardListMut};
