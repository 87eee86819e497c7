//! # rust-deck
//!
//! The data model behind a collectible card game deck editor: a deck as an
//! ordered multiset of cards, named categories that select cards from it
//! by rule, and change events that let views stay in step.
//!
//! ## Design Principles
//!
//! 1. **One Contract**: Decks and category views share the same multiset
//!    traits. A category is a live, filtered view of its deck, never a copy.
//!
//! 2. **Events Are Diffs**: Every change reaches listeners as one event
//!    describing exactly what changed, after the deck is consistent again.
//!
//! 3. **Caller Owns the Catalogue**: Cards and filters come from outside.
//!    The deck keys on card ids and never interprets card text beyond the
//!    configured land type.
//!
//! ## Architecture
//!
//! - **Deck-Owned Specs**: A deck takes ownership of each category spec and
//!   subscribes to it; spec edits go through `Deck::edit_category`, which
//!   updates caches before notifying deck listeners.
//!
//! - **Snapshot Dispatch**: Listener registries are persistent maps via
//!   `im-rs`, so a dispatch iterates a snapshot and listeners may register
//!   or remove listeners while it runs.
//!
//! ## Modules
//!
//! - `core`: Configuration and the listener registry
//! - `cards`: Card data and the id registry used when loading
//! - `category`: Category specs, filters and spec events
//! - `collection`: The `CardList` / `CardListMut` multiset traits
//! - `deck`: Decks, entries, category views, events, persistence, transfer
//! - `error`: `DeckError`

pub mod cards;
pub mod category;
pub mod collection;
pub mod core;
pub mod deck;
pub mod error;

// Re-export commonly used types
pub use crate::core::{DeckConfig, ListenerId, Listeners, WeakListeners};

pub use crate::cards::{Card, CardId, CardRegistry};

pub use crate::category::{CategorySpec, Filter, SpecEvent};

pub use crate::collection::{CardList, CardListMut};

pub use crate::deck::{
    CategoryMut, CategoryView, Deck, DeckEvent, Entry,
    TransferData, TransferFlavor, TransferPayload,
};

pub use crate::error::{DeckError, Result};
