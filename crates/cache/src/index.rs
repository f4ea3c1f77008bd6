//! Index shapes shared by the table loaders.
//!
//! Point maps are plain `HashMap`s filled through [`insert_unique`], ordered
//! multi-maps are [`MultiMap`]s and bidirectional maps are [`BiMap`]s. Both
//! the point maps and the bidirectional maps refuse a repeated key instead of
//! letting the last row win: a repeat means the snapshot is corrupt.

use crate::error::{ErrorKind, Result};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt::Debug;
use std::hash::Hash;

/// Insert into a point map, failing if `key` is already present.
pub(crate) fn insert_unique<K, V>(map: &mut HashMap<K, V>, index: &'static str, key: K, value: V) -> Result<()>
where
    K: Eq + Hash + Debug,
{
    match map.entry(key) {
        Entry::Occupied(entry) => exn::bail!(ErrorKind::DuplicateKey { index, key: format!("{:?}", entry.key()) }),
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(())
        },
    }
}

/// One-to-many map whose value lists keep the order values were pushed in.
///
/// Loaders push rows in the order declared by their query, and for some
/// indexes (update lineage above all) that order carries meaning. Nothing in
/// here ever sorts.
#[derive(Debug, Clone)]
pub struct MultiMap<K, V> {
    inner: HashMap<K, Vec<V>>,
}

impl<K, V> Default for MultiMap<K, V> {
    fn default() -> Self {
        Self { inner: HashMap::new() }
    }
}

impl<K: Eq + Hash, V> MultiMap<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self { inner: HashMap::with_capacity(capacity) }
    }

    pub(crate) fn push(&mut self, key: K, value: V) {
        self.inner.entry(key).or_default().push(value);
    }

    /// Values recorded for `key`, in insertion order. Empty if the key is unknown.
    pub fn get<Q>(&self, key: &Q) -> &[V]
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.inner.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for MultiMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        for (key, value) in iter {
            map.push(key, value);
        }
        map
    }
}

/// Bijection between ids and the values they name.
///
/// Both directions are materialized. Inserting either a known key or a known
/// value fails with [`ErrorKind::DuplicateKey`], so a lookup in one
/// direction followed by a lookup in the other always returns where it
/// started.
#[derive(Debug, Clone)]
pub struct BiMap<K, V> {
    forward: HashMap<K, V>,
    reverse: HashMap<V, K>,
}

impl<K, V> Default for BiMap<K, V> {
    fn default() -> Self {
        Self { forward: HashMap::new(), reverse: HashMap::new() }
    }
}

impl<K, V> BiMap<K, V>
where
    K: Copy + Eq + Hash + Debug,
    V: Clone + Eq + Hash + Debug,
{
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self { forward: HashMap::with_capacity(capacity), reverse: HashMap::with_capacity(capacity) }
    }

    pub(crate) fn insert(&mut self, index: &'static str, key: K, value: V) -> Result<()> {
        if self.forward.contains_key(&key) {
            exn::bail!(ErrorKind::DuplicateKey { index, key: format!("{key:?}") });
        }
        if self.reverse.contains_key(&value) {
            exn::bail!(ErrorKind::DuplicateKey { index, key: format!("{value:?}") });
        }
        self.reverse.insert(value.clone(), key);
        self.forward.insert(key, value);
        Ok(())
    }

    /// Value named by `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.forward.get(key)
    }

    /// Key naming `value`.
    pub fn key_of<Q>(&self, value: &Q) -> Option<K>
    where
        V: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.reverse.get(value).copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.forward.iter()
    }
}
