//! Card collaborator: card data and id lookup.
//!
//! ## Key Types
//!
//! - `CardId`: Stable UID, the multiset key of a deck
//! - `Card`: Immutable card data (name, type line, mana value)
//! - `CardRegistry`: Id lookup used when loading a saved deck
//!
//! Parsing cards out of a bulk inventory file happens elsewhere; this
//! module only fixes the shape the deck relies on.

pub mod definition;
pub mod registry;

pub use definition::{normalize_name, Card, CardId};
pub use registry::CardRegistry;
