//! Decks, their categories, and their change events.
//!
//! ## Key Types
//!
//! - [`Deck`]: Ordered multiset of cards with named, ranked categories
//! - [`Entry`]: A card in a deck with its count and date added
//! - [`CategoryView`] / [`CategoryMut`]: Multiset views of one category
//! - [`DeckEvent`]: Diff delivered to deck listeners after each change
//! - [`TransferData`]: Snapshot of selected entries for copy and paste
//!
//! Saving and loading live in `persist`, as methods on `Deck`.

mod category;
#[allow(clippy::module_inception)]
mod deck;
mod entry;
mod event;
mod persist;
mod transfer;

pub use category::{CategoryMut, CategoryView};
pub use deck::Deck;
pub use entry::Entry;
pub use event::DeckEvent;
pub use transfer::{TransferData, TransferFlavor, TransferPayload};
