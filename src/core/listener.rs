//! Synchronous listener registry.
//!
//! Decks and category specs both notify observers the same way: every
//! registered callback runs on the mutator's call stack before the mutator
//! returns, in unspecified order.
//!
//! `Listeners` is a shared handle. Cloning it yields another handle to the
//! same registry. A callback that registers or removes listeners while a
//! dispatch is running captures a `WeakListeners` from
//! [`Listeners::downgrade`] instead: a strong handle inside a callback would
//! keep its own registry alive. Dispatch iterates over a snapshot taken
//! before the first callback runs; changes made mid-dispatch apply from the
//! next dispatch on.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use im::OrdMap;
use serde::{Deserialize, Serialize};

/// Handle identifying a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

impl ListenerId {
    /// Create a new listener ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

type Callback<E> = Rc<dyn Fn(&E)>;

struct Registry<E> {
    // Persistent map: cloning for a dispatch snapshot is O(1).
    callbacks: OrdMap<ListenerId, Callback<E>>,
    next_id: u32,
}

/// Registry of change callbacks for events of type `E`.
///
/// ## Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use rust_deck::core::Listeners;
///
/// let listeners: Listeners<u32> = Listeners::new();
/// let seen = Rc::new(Cell::new(0));
///
/// let sink = Rc::clone(&seen);
/// let id = listeners.add(move |n: &u32| sink.set(sink.get() + n));
///
/// listeners.dispatch(&5);
/// assert_eq!(seen.get(), 5);
///
/// assert!(listeners.remove(id));
/// listeners.dispatch(&5);
/// assert_eq!(seen.get(), 5);
/// ```
pub struct Listeners<E> {
    inner: Rc<RefCell<Registry<E>>>,
}

impl<E> Listeners<E> {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                callbacks: OrdMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Register a callback, returns its ID.
    pub fn add(&self, callback: impl Fn(&E) + 'static) -> ListenerId {
        let mut registry = self.inner.borrow_mut();
        let id = ListenerId::new(registry.next_id);
        registry.next_id += 1;
        registry.callbacks.insert(id, Rc::new(callback));
        id
    }

    /// Unregister a callback.
    ///
    /// Returns `false` if no listener with that ID was registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().callbacks.remove(&id).is_some()
    }

    /// Check if a listener is registered.
    #[must_use]
    pub fn contains(&self, id: ListenerId) -> bool {
        self.inner.borrow().callbacks.contains_key(&id)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }

    /// Check if no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().callbacks.is_empty()
    }

    /// Handle that does not keep the registry alive, for use inside callbacks.
    #[must_use]
    pub fn downgrade(&self) -> WeakListeners<E> {
        WeakListeners {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Invoke every listener registered when the call starts.
    pub fn dispatch(&self, event: &E) {
        let snapshot = self.inner.borrow().callbacks.clone();
        for callback in snapshot.values() {
            callback(event);
        }
    }
}

/// Non-owning handle to a listener registry.
///
/// Every operation is a no-op once the registry has been dropped.
pub struct WeakListeners<E> {
    inner: Weak<RefCell<Registry<E>>>,
}

impl<E> WeakListeners<E> {
    /// Register a callback. Returns `None` if the registry is gone.
    pub fn add(&self, callback: impl Fn(&E) + 'static) -> Option<ListenerId> {
        let inner = self.inner.upgrade()?;
        Some(Listeners { inner }.add(callback))
    }

    /// Unregister a callback.
    pub fn remove(&self, id: ListenerId) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| Listeners { inner }.remove(id))
    }

    /// Number of registered listeners, 0 if the registry is gone.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .upgrade()
            .map_or(0, |inner| inner.borrow().callbacks.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the registry still exists.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl<E> Clone for WeakListeners<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<E> fmt::Debug for WeakListeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakListeners")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl<E> Clone for Listeners<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish()
    }
}
