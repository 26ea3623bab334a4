//! Persistent heterogeneous annotation store
//!
//! An [`Annotations`] value is an ordered list of `(key, value)` entries where
//! keys are marker types implementing [`Key`]. Keys may repeat: lookups see the
//! most recently added value first, and [`Annotations::remove_all`] hides every
//! earlier value of one key behind a tombstone. Every mutator consumes the store
//! and returns the new one, so stores are shared freely between domains.

use smallvec::SmallVec;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Marker type naming one annotation
///
/// ```
/// use faultline_core::{Annotations, Key};
///
/// struct Retries;
/// impl Key for Retries {
///     type Value = u32;
/// }
///
/// let store = Annotations::new().add::<Retries>(1).add::<Retries>(3);
/// assert_eq!(store.get::<Retries>(), Some(&3));
/// ```
pub trait Key: 'static {
    /// Type of the values stored under this key
    type Value: Send + Sync + 'static;
}

#[derive(Clone)]
enum Slot {
    Value(Arc<dyn Any + Send + Sync>),
    Tombstone,
}

#[derive(Clone)]
struct Entry {
    key: TypeId,
    name: &'static str,
    slot: Slot,
}

impl Entry {
    fn of<K: Key>(slot: Slot) -> Self {
        Self {
            key: TypeId::of::<K>(),
            name: type_name::<K>(),
            slot,
        }
    }
}

/// Ordered, persistent key-value store keyed by types
#[derive(Clone, Default)]
pub struct Annotations {
    // Oldest entry first; lookups walk the list backwards.
    entries: SmallVec<[Entry; 4]>,
}

impl Annotations {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value for `K`, shadowing earlier values of the same key
    pub fn add<K: Key>(mut self, value: K::Value) -> Self {
        self.entries.push(Entry::of::<K>(Slot::Value(Arc::new(value))));
        self
    }

    /// Hide every value of `K` added so far
    ///
    /// Values added afterwards are visible again.
    pub fn remove_all<K: Key>(mut self) -> Self {
        self.entries.push(Entry::of::<K>(Slot::Tombstone));
        self
    }

    /// Whether a live value exists for `K`
    pub fn has<K: Key>(&self) -> bool {
        self.get::<K>().is_some()
    }

    /// Latest live value for `K`
    pub fn get<K: Key>(&self) -> Option<&K::Value> {
        self.get_all::<K>().next()
    }

    /// Latest live value for `K`, or `default` if there is none
    pub fn get_or<K: Key>(&self, default: K::Value) -> K::Value
    where
        K::Value: Clone,
    {
        self.get::<K>().cloned().unwrap_or(default)
    }

    /// All live values for `K`, most recently added first
    pub fn get_all<K: Key>(&self) -> GetAll<'_, K> {
        GetAll {
            entries: self.entries.iter().rev(),
            done: false,
            _key: PhantomData,
        }
    }

    /// Merge stores as if every entry of each store had been added, in order,
    /// after all entries of the stores before it
    pub fn merge<I>(stores: I) -> Self
    where
        I: IntoIterator<Item = Annotations>,
    {
        let mut merged = Annotations::new();
        for store in stores {
            if merged.entries.is_empty() {
                merged = store;
            } else {
                merged.entries.extend(store.entries);
            }
        }
        merged
    }

    /// Number of entries, tombstones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was ever added
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Annotations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for entry in self.entries.iter().rev() {
            match entry.slot {
                Slot::Value(_) => list.entry(&format_args!("{}", entry.name)),
                Slot::Tombstone => list.entry(&format_args!("!{}", entry.name)),
            };
        }
        list.finish()
    }
}

/// Iterator over the live values of one key, newest first
///
/// Stops at the first tombstone for the key.
pub struct GetAll<'a, K> {
    entries: std::iter::Rev<std::slice::Iter<'a, Entry>>,
    done: bool,
    _key: PhantomData<fn() -> K>,
}

impl<'a, K: Key> Iterator for GetAll<'a, K> {
    type Item = &'a K::Value;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for entry in self.entries.by_ref() {
            if entry.key != TypeId::of::<K>() {
                continue;
            }
            match &entry.slot {
                Slot::Tombstone => break,
                Slot::Value(value) => {
                    if let Some(value) = value.downcast_ref::<K::Value>() {
                        return Some(value);
                    }
                }
            }
        }
        self.done = true;
        None
    }
}

/// Read-only view over a builder's own store followed by its policy's store
///
/// Each store is scanned on its own: a tombstone in the first store hides only
/// the first store's values.
#[derive(Clone, Copy)]
pub struct Lookup<'a> {
    own: &'a Annotations,
    inherited: Option<&'a Annotations>,
}

impl<'a> Lookup<'a> {
    /// View over a single store
    pub fn single(store: &'a Annotations) -> Self {
        Self {
            own: store,
            inherited: None,
        }
    }

    /// View over `own`, falling back to `inherited`
    pub fn layered(own: &'a Annotations, inherited: &'a Annotations) -> Self {
        Self {
            own,
            inherited: Some(inherited),
        }
    }

    /// Whether any store has a live value for `K`
    pub fn has<K: Key>(&self) -> bool {
        self.own.has::<K>() || self.inherited.is_some_and(|s| s.has::<K>())
    }

    /// Latest live value for `K` from the first store that has one
    pub fn get<K: Key>(&self) -> Option<&'a K::Value> {
        self.get_all::<K>().next()
    }

    /// Like [`Lookup::get`], cloning the value or returning `default`
    pub fn get_or<K: Key>(&self, default: K::Value) -> K::Value
    where
        K::Value: Clone,
    {
        self.get::<K>().cloned().unwrap_or(default)
    }

    /// Live values of `K` from every store, each store newest first
    pub fn get_all<K: Key>(&self) -> impl Iterator<Item = &'a K::Value> + 'a {
        self.own
            .get_all::<K>()
            .chain(self.inherited.into_iter().flat_map(|s| s.get_all::<K>()))
    }
}
