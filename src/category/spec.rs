//! Category specifications and their change events.
//!
//! A `CategorySpec` says which cards belong to a category: a filter plus
//! two override sets. The whitelist forces cards in, the blacklist forces
//! them out, and the blacklist wins:
//!
//! ```text
//! includes(card) = (filter(card) || whitelist ∋ card) && blacklist ∌ card
//! ```
//!
//! Every edit notifies the spec's listeners with a `SpecEvent` before the
//! editing method returns. A deck holding the spec subscribes to these to
//! keep its cached view of the category current.

use std::fmt;

use im::OrdSet;

use super::filter::Filter;
use crate::cards::{Card, CardId};
use crate::core::{ListenerId, Listeners};
use crate::error::{DeckError, Result};

/// Description of one edit to a `CategorySpec`.
///
/// Only the parts that changed are present. Reading a part that did not
/// change is an error rather than an empty value, so "did the whitelist
/// change" must be asked before "what was the old whitelist".
#[derive(Clone, Debug)]
pub struct SpecEvent {
    spec_name: String,
    name: Option<(String, String)>,
    filter: Option<(Filter, Filter)>,
    whitelist: Option<(OrdSet<CardId>, OrdSet<CardId>)>,
    blacklist: Option<(OrdSet<CardId>, OrdSet<CardId>)>,
}

impl SpecEvent {
    fn new(spec_name: impl Into<String>) -> Self {
        Self {
            spec_name: spec_name.into(),
            name: None,
            filter: None,
            whitelist: None,
            blacklist: None,
        }
    }

    /// Name of the spec after the edit.
    #[must_use]
    pub fn spec_name(&self) -> &str {
        &self.spec_name
    }

    /// Whether the edit renamed the spec.
    #[must_use]
    pub fn name_changed(&self) -> bool {
        self.name.is_some()
    }

    /// Name before the edit.
    pub fn old_name(&self) -> Result<&str> {
        self.name
            .as_ref()
            .map(|(old, _)| old.as_str())
            .ok_or(DeckError::Unchanged("category name"))
    }

    /// Name after the edit.
    pub fn new_name(&self) -> Result<&str> {
        self.name
            .as_ref()
            .map(|(_, new)| new.as_str())
            .ok_or(DeckError::Unchanged("category name"))
    }

    /// Whether the edit replaced the filter.
    #[must_use]
    pub fn filter_changed(&self) -> bool {
        self.filter.is_some()
    }

    pub fn old_filter(&self) -> Result<&Filter> {
        self.filter
            .as_ref()
            .map(|(old, _)| old)
            .ok_or(DeckError::Unchanged("category filter"))
    }

    pub fn new_filter(&self) -> Result<&Filter> {
        self.filter
            .as_ref()
            .map(|(_, new)| new)
            .ok_or(DeckError::Unchanged("category filter"))
    }

    /// Whether the edit touched the whitelist.
    #[must_use]
    pub fn whitelist_changed(&self) -> bool {
        self.whitelist.is_some()
    }

    pub fn old_whitelist(&self) -> Result<&OrdSet<CardId>> {
        self.whitelist
            .as_ref()
            .map(|(old, _)| old)
            .ok_or(DeckError::Unchanged("category whitelist"))
    }

    pub fn new_whitelist(&self) -> Result<&OrdSet<CardId>> {
        self.whitelist
            .as_ref()
            .map(|(_, new)| new)
            .ok_or(DeckError::Unchanged("category whitelist"))
    }

    /// Whether the edit touched the blacklist.
    #[must_use]
    pub fn blacklist_changed(&self) -> bool {
        self.blacklist.is_some()
    }

    pub fn old_blacklist(&self) -> Result<&OrdSet<CardId>> {
        self.blacklist
            .as_ref()
            .map(|(old, _)| old)
            .ok_or(DeckError::Unchanged("category blacklist"))
    }

    pub fn new_blacklist(&self) -> Result<&OrdSet<CardId>> {
        self.blacklist
            .as_ref()
            .map(|(_, new)| new)
            .ok_or(DeckError::Unchanged("category blacklist"))
    }

    /// Whether membership of some card may differ after this edit.
    #[must_use]
    pub fn membership_changed(&self) -> bool {
        self.filter_changed() || self.whitelist_changed() || self.blacklist_changed()
    }

    /// Whether nothing at all changed.
    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        !self.name_changed() && !self.membership_changed()
    }

    /// The same event with its rename dropped, as seen after a rejected
    /// rename rolled the spec back to `restored`.
    pub(crate) fn without_rename(mut self, restored: &str) -> Self {
        self.name = None;
        self.spec_name = restored.to_string();
        self
    }
}

/// Specification of a category: name, filter and override sets.
///
/// Cloning a spec copies its contents but not its listeners.
///
/// ## Example
///
/// ```
/// use rust_deck::cards::Card;
/// use rust_deck::category::{CategorySpec, Filter};
///
/// let forest = Card::new("f1", "Forest", "Basic Land — Forest");
/// let vial = Card::new("v1", "Aether Vial", "Artifact");
///
/// let mut spec = CategorySpec::new("Lands", Filter::type_contains("land"));
/// assert!(spec.includes(&forest));
/// assert!(!spec.includes(&vial));
///
/// spec.include(&vial.id);
/// spec.exclude(&forest.id);
/// assert!(spec.includes(&vial));
/// assert!(!spec.includes(&forest));
/// ```
#[derive(Debug)]
pub struct CategorySpec {
    name: String,
    filter: Filter,
    whitelist: OrdSet<CardId>,
    blacklist: OrdSet<CardId>,
    listeners: Listeners<SpecEvent>,
}

impl CategorySpec {
    /// Create a spec with empty override sets.
    pub fn new(name: impl Into<String>, filter: Filter) -> Self {
        Self {
            name: name.into(),
            filter,
            whitelist: OrdSet::new(),
            blacklist: OrdSet::new(),
            listeners: Listeners::new(),
        }
    }

    /// Set the whitelist (builder pattern, does not notify).
    #[must_use]
    pub fn with_whitelist(mut self, ids: impl IntoIterator<Item = CardId>) -> Self {
        self.whitelist = ids.into_iter().collect();
        self
    }

    /// Set the blacklist (builder pattern, does not notify).
    #[must_use]
    pub fn with_blacklist(mut self, ids: impl IntoIterator<Item = CardId>) -> Self {
        self.blacklist = ids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    #[must_use]
    pub fn whitelist(&self) -> &OrdSet<CardId> {
        &self.whitelist
    }

    #[must_use]
    pub fn blacklist(&self) -> &OrdSet<CardId> {
        &self.blacklist
    }

    /// Listener registry for edits to this spec.
    ///
    /// Callbacks that need the registry capture [`Listeners::downgrade`],
    /// not a clone.
    #[must_use]
    pub fn listeners(&self) -> &Listeners<SpecEvent> {
        &self.listeners
    }

    /// Subscribe to edits of this spec.
    pub fn add_listener(&self, callback: impl Fn(&SpecEvent) + 'static) -> ListenerId {
        self.listeners.add(callback)
    }

    /// Unsubscribe from edits of this spec.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Admission test: filter or whitelist, unless blacklisted.
    #[must_use]
    pub fn includes(&self, card: &Card) -> bool {
        (self.filter.matches(card) || self.whitelist.contains(&card.id))
            && !self.blacklist.contains(&card.id)
    }

    /// Rename the spec. Returns `false` if the name is unchanged.
    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name == self.name {
            return false;
        }
        let old = std::mem::replace(&mut self.name, name);
        let mut event = SpecEvent::new(self.name.clone());
        event.name = Some((old, self.name.clone()));
        self.notify(event)
    }

    /// Replace the filter. Returns `false` if the new filter has the same
    /// text as the current one.
    pub fn set_filter(&mut self, filter: Filter) -> bool {
        if filter == self.filter {
            return false;
        }
        let old = std::mem::replace(&mut self.filter, filter);
        let mut event = SpecEvent::new(self.name.clone());
        event.filter = Some((old, self.filter.clone()));
        self.notify(event)
    }

    /// Force a card into the category: whitelist it and lift any blacklisting.
    ///
    /// Returns `true` if either override set changed.
    pub fn include(&mut self, id: &CardId) -> bool {
        let mut event = SpecEvent::new(self.name.clone());
        if !self.whitelist.contains(id) {
            let old = self.whitelist.clone();
            self.whitelist.insert(id.clone());
            event.whitelist = Some((old, self.whitelist.clone()));
        }
        if self.blacklist.contains(id) {
            let old = self.blacklist.clone();
            self.blacklist.remove(id);
            event.blacklist = Some((old, self.blacklist.clone()));
        }
        self.notify(event)
    }

    /// Force a card out of the category: blacklist it and drop any
    /// whitelisting.
    ///
    /// Returns `true` if either override set changed.
    pub fn exclude(&mut self, id: &CardId) -> bool {
        let mut event = SpecEvent::new(self.name.clone());
        if !self.blacklist.contains(id) {
            let old = self.blacklist.clone();
            self.blacklist.insert(id.clone());
            event.blacklist = Some((old, self.blacklist.clone()));
        }
        if self.whitelist.contains(id) {
            let old = self.whitelist.clone();
            self.whitelist.remove(id);
            event.whitelist = Some((old, self.whitelist.clone()));
        }
        self.notify(event)
    }

    fn notify(&self, event: SpecEvent) -> bool {
        if event.is_empty() {
            return false;
        }
        self.listeners.dispatch(&event);
        true
    }

    /// Drop a card from both override sets without notifying.
    ///
    /// Used when the card leaves the deck entirely; the overrides no longer
    /// mean anything and the card removal is reported by the deck itself.
    pub(crate) fn forget(&mut self, id: &CardId) -> bool {
        let whitelisted = self.whitelist.remove(id).is_some();
        let blacklisted = self.blacklist.remove(id).is_some();
        whitelisted || blacklisted
    }

    /// Parse the one-line form produced by `Display`, handing the filter
    /// text to `parse_filter`.
    pub fn from_line<F>(line: &str, parse_filter: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Result<Filter>,
    {
        let fields: Vec<&str> = line.split('\t').collect();
        let &[name, filter, whitelist, blacklist] = fields.as_slice() else {
            return Err(DeckError::InvalidSpec(format!(
                "expected 4 tab-separated fields, found {}",
                fields.len()
            )));
        };
        let name = unescape_field(name)?;
        if name.is_empty() {
            return Err(DeckError::InvalidSpec("empty category name".to_string()));
        }
        let filter = parse_filter(&unescape_field(filter)?)?;
        Ok(Self::new(name, filter)
            .with_whitelist(parse_ids(whitelist))
            .with_blacklist(parse_ids(blacklist)))
    }
}

/// Backslash-escape the characters that delimit fields and lines.
fn escape_field(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn unescape_field(field: &str) -> Result<String> {
    let mut text = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => text.push('\\'),
            Some('t') => text.push('\t'),
            Some('n') => text.push('\n'),
            Some('r') => text.push('\r'),
            other => {
                return Err(DeckError::InvalidSpec(format!(
                    "bad escape {other:?} in {field:?}"
                )))
            }
        }
    }
    Ok(text)
}

fn parse_ids(field: &str) -> impl Iterator<Item = CardId> + '_ {
    field
        .split(',')
        .filter(|id| !id.is_empty())
        .map(CardId::new)
}

fn join_ids(ids: &OrdSet<CardId>) -> String {
    ids.iter().map(CardId::as_str).collect::<Vec<_>>().join(",")
}

impl Clone for CategorySpec {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            filter: self.filter.clone(),
            whitelist: self.whitelist.clone(),
            blacklist: self.blacklist.clone(),
            listeners: Listeners::new(),
        }
    }
}

/// One-line textual form: `name \t filter \t whitelist \t blacklist`, with
/// ids comma-separated in sorted order. Tabs, line breaks and backslashes
/// in the name and filter text are backslash-escaped.
impl fmt::Display for CategorySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            escape_field(&self.name),
            escape_field(self.filter.repr()),
            join_ids(&self.whitelist),
            join_ids(&self.blacklist)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn forest() -> Card {
        Card::new("f", "Forest", "Basic Land — Forest")
    }

    fn record(spec: &CategorySpec) -> Rc<RefCell<Vec<SpecEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        spec.add_listener(move |e| sink.borrow_mut().push(e.clone()));
        events
    }

    #[test]
    fn test_blacklist_wins_over_whitelist() {
        let spec = CategorySpec::new("Lands", Filter::none())
            .with_whitelist([CardId::new("f")])
            .with_blacklist([CardId::new("f")]);
        assert!(!spec.includes(&forest()));
    }

    #[test]
    fn test_rename_notifies() {
        let mut spec = CategorySpec::new("Lands", Filter::type_contains("land"));
        let events = record(&spec);

        assert!(spec.set_name("Mana"));
        assert!(!spec.set_name("Mana"));

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].old_name().unwrap(), "Lands");
        assert_eq!(events[0].new_name().unwrap(), "Mana");
        assert_eq!(events[0].spec_name(), "Mana");
        assert!(!events[0].membership_changed());
    }

    #[test]
    fn test_unchanged_parts_are_errors() {
        let mut spec = CategorySpec::new("Lands", Filter::type_contains("land"));
        let events = record(&spec);

        spec.set_filter(Filter::all());

        let events = events.borrow();
        let event = &events[0];
        assert_eq!(event.old_filter().unwrap().repr(), "type:land");
        assert_eq!(event.new_filter().unwrap().repr(), "*");
        assert!(matches!(event.old_name(), Err(DeckError::Unchanged(_))));
        assert!(matches!(event.old_whitelist(), Err(DeckError::Unchanged(_))));
        assert!(matches!(event.new_blacklist(), Err(DeckError::Unchanged(_))));
    }

    #[test]
    fn test_same_filter_text_is_no_change() {
        let mut spec = CategorySpec::new("Lands", Filter::type_contains("land"));
        let events = record(&spec);

        assert!(!spec.set_filter(Filter::type_contains("land")));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_include_lifts_blacklist() {
        let id = CardId::new("f");
        let mut spec = CategorySpec::new("Lands", Filter::none()).with_blacklist([id.clone()]);
        let events = record(&spec);

        assert!(spec.include(&id));
        assert!(spec.whitelist().contains(&id));
        assert!(spec.blacklist().is_empty());

        let events = events.borrow();
        let event = &events[0];
        assert!(event.old_whitelist().unwrap().is_empty());
        assert!(event.old_blacklist().unwrap().contains(&id));
        assert!(event.new_blacklist().unwrap().is_empty());
    }

    #[test]
    fn test_redundant_override_is_no_change() {
        let id = CardId::new("f");
        let mut spec = CategorySpec::new("Lands", Filter::none());
        let events = record(&spec);

        assert!(spec.exclude(&id));
        assert!(!spec.exclude(&id));
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_forget_is_silent() {
        let id = CardId::new("f");
        let mut spec = CategorySpec::new("Lands", Filter::none()).with_whitelist([id.clone()]);
        let events = record(&spec);

        assert!(spec.forget(&id));
        assert!(!spec.forget(&id));
        assert!(spec.whitelist().is_empty());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_clone_drops_listeners() {
        let spec = CategorySpec::new("Lands", Filter::none());
        spec.add_listener(|_| {});

        let copy = spec.clone();
        assert_eq!(spec.listeners().len(), 1);
        assert!(copy.listeners().is_empty());
    }

    #[test]
    fn test_line_form() {
        let spec = CategorySpec::new("Ramp", Filter::type_contains("land"))
            .with_whitelist([CardId::new("b"), CardId::new("a")])
            .with_blacklist([CardId::new("c")]);
        let line = spec.to_string();
        assert_eq!(line, "Ramp\ttype:land\ta,b\tc");

        let parsed = CategorySpec::from_line(&line, |text| {
            assert_eq!(text, "type:land");
            Ok(Filter::type_contains("land"))
        })
        .unwrap();
        assert_eq!(parsed.name(), "Ramp");
        assert_eq!(parsed.whitelist().len(), 2);
        assert!(parsed.blacklist().contains(&CardId::new("c")));
    }

    #[test]
    fn test_line_form_rejects_bad_field_count() {
        let result = CategorySpec::from_line("Ramp\ttype:land", |_| Ok(Filter::all()));
        assert!(matches!(result, Err(DeckError::InvalidSpec(_))));
    }

    #[test]
    fn test_line_form_escapes_delimiters() {
        let spec = CategorySpec::new("Early\tGame\\2\nDrops", Filter::new("name:a\tb", |_| true));
        let line = spec.to_string();
        assert_eq!(line, "Early\\tGame\\\\2\\nDrops\tname:a\\tb\t\t");
        assert!(!line.contains('\n'));

        let parsed = CategorySpec::from_line(&line, |text| {
            assert_eq!(text, "name:a\tb");
            Ok(Filter::all())
        })
        .unwrap();
        assert_eq!(parsed.name(), "Early\tGame\\2\nDrops");
    }

    #[test]
    fn test_line_form_rejects_bad_escape() {
        let result = CategorySpec::from_line("Ramp\\x\t*\t\t", |_| Ok(Filter::all()));
        assert!(matches!(result, Err(DeckError::InvalidSpec(_))));
    }
}
