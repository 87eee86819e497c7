//! Shared building blocks: configuration and the listener registry.

pub mod config;
pub mod listener;

pub use config::{DeckConfig, DEFAULT_DATE_FORMAT, DEFAULT_LAND_TYPE};
pub use listener::{ListenerId, Listeners, WeakListeners};
