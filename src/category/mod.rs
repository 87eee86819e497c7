//! Category specification collaborator.
//!
//! A category is a named, rule-defined subset of a deck. This module holds
//! the rule half: what a category admits and how edits to that rule are
//! announced. The live view of which deck cards currently pass lives in
//! `deck`, which subscribes to the announcements.
//!
//! ## Key Types
//!
//! - [`Filter`]: Predicate over cards plus its saved text
//! - [`CategorySpec`]: Name, filter, whitelist and blacklist
//! - [`SpecEvent`]: Diff describing one edit of a spec

mod filter;
mod spec;

pub use filter::Filter;
pub use spec::{CategorySpec, SpecEvent};
