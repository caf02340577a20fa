//! Persistent (immutable) hash map.
//!
//! This module provides [`PersistentHashMap`], a map facade over the
//! [`Trie`] engine.
//!
//! # Overview
//!
//! - O(log32 N) get, insert and remove (effectively O(1) for practical sizes)
//! - O(1) len and `is_empty`
//! - bulk construction through [`FromIterator`]
//!
//! All operations return new maps without modifying the original. Inserting
//! a value equal to the one already stored, or removing an absent key,
//! returns a map that shares the original's root.
//!
//! # Examples
//!
//! ```rust
//! use perseus::persistent::PersistentHashMap;
//!
//! let map = PersistentHashMap::new()
//!     .insert("one".to_string(), 1)
//!     .insert("two".to_string(), 2);
//!
//! let updated = map.insert("one".to_string(), 100);
//! assert_eq!(map.get("one"), Some(&1));       // Original unchanged
//! assert_eq!(updated.get("one"), Some(&100)); // New version
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use super::trie::{Trie, TrieIterator};

/// A persistent (immutable) hash map.
///
/// # Time Complexity
///
/// | Operation      | Complexity    |
/// |----------------|---------------|
/// | `new`          | O(1)          |
/// | `get`          | O(log32 N)    |
/// | `insert`       | O(log32 N)    |
/// | `remove`       | O(log32 N)    |
/// | `merge`        | O(m log32 N)  |
/// | `len`          | O(1)          |
/// | `from_iter`    | O(n log32 n)  |
#[derive(Clone)]
pub struct PersistentHashMap<K, V> {
    trie: Trie<K, V>,
}

impl<K, V> PersistentHashMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::PersistentHashMap;
    ///
    /// let map: PersistentHashMap<String, i32> = PersistentHashMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { trie: Trie::new() }
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    /// Returns `true` if the map has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Returns `true` when both maps share the same root.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.trie.ptr_eq(&other.trie)
    }

    /// Returns an iterator over key-value pairs, in trie order.
    #[must_use]
    pub fn iter(&self) -> PersistentHashMapIterator<'_, K, V> {
        PersistentHashMapIterator {
            inner: self.trie.iter(),
        }
    }

    /// Returns an iterator over keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new().insert("a", 1).insert("b", 2);
    /// let mut keys: Vec<_> = map.keys().copied().collect();
    /// keys.sort_unstable();
    /// assert_eq!(keys, vec!["a", "b"]);
    /// ```
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new().insert("a", 1).insert("b", 2);
    /// let sum: i32 = map.values().sum();
    /// assert_eq!(sum, 3);
    /// ```
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

impl<K: Hash + Eq, V> PersistentHashMap<K, V> {
    /// Returns a reference to the value for `key`.
    #[inline]
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.trie.get(key)
    }

    /// Returns the stored key and its value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new().insert("key".to_string(), 1);
    /// let (key, value) = map.get_key_value("key").unwrap();
    /// assert_eq!((key.as_str(), *value), ("key", 1));
    /// ```
    #[inline]
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.trie.get_key_value(key)
    }

    /// Returns `true` if the map contains `key`.
    #[inline]
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.trie.contains_key(key)
    }
}

impl<K: Clone + Hash + Eq, V: Clone + PartialEq> PersistentHashMap<K, V> {
    /// Creates a map with a single entry.
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert(key, value)
    }

    /// Inserts a key-value pair, returning the new map.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        Self {
            trie: self.trie.put(key, value),
        }
    }

    /// Removes `key`, returning the new map.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        Self {
            trie: self.trie.delete(key),
        }
    }

    /// Applies `function` to the value for `key`.
    ///
    /// Returns `None` if `key` is absent. The stored key is reused.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new().insert("count".to_string(), 10);
    /// let updated = map.update("count", |value| value + 1);
    /// assert_eq!(updated.unwrap().get("count"), Some(&11));
    /// assert!(map.update("missing", |value| value + 1).is_none());
    /// ```
    #[must_use]
    pub fn update<Q, F>(&self, key: &Q, function: F) -> Option<Self>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> V,
    {
        let (stored_key, value) = self.get_key_value(key)?;
        Some(self.insert(stored_key.clone(), function(value)))
    }

    /// Inserts, updates or removes the entry for `key` depending on what
    /// `updater` returns for the current value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new().insert("count".to_string(), 10);
    ///
    /// let updated = map.update_with("count", |value| value.map(|value| value + 1));
    /// assert_eq!(updated.get("count"), Some(&11));
    ///
    /// let inserted = map.update_with("new", |value| value.copied().or(Some(100)));
    /// assert_eq!(inserted.get("new"), Some(&100));
    ///
    /// let removed = map.update_with("count", |_| None);
    /// assert_eq!(removed.get("count"), None);
    /// ```
    #[must_use]
    pub fn update_with<Q, F>(&self, key: &Q, updater: F) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
        F: FnOnce(Option<&V>) -> Option<V>,
    {
        let current = self.get_key_value(key);
        match (current, updater(current.map(|(_, value)| value))) {
            (Some((stored_key, _)), Some(value)) => self.insert(stored_key.clone(), value),
            (Some(_), None) => self.remove(key),
            (None, Some(value)) => self.insert(key.to_owned(), value),
            (None, None) => self.clone(),
        }
    }

    /// Merges two maps; values from `other` win on key conflicts.
    ///
    /// The larger map is used as the base so that only the smaller one is
    /// re-inserted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::PersistentHashMap;
    ///
    /// let left = PersistentHashMap::new().insert("a", 1).insert("b", 2);
    /// let right = PersistentHashMap::new().insert("b", 20).insert("c", 3);
    ///
    /// let merged = left.merge(&right);
    /// assert_eq!(merged.get("a"), Some(&1));
    /// assert_eq!(merged.get("b"), Some(&20));
    /// assert_eq!(merged.get("c"), Some(&3));
    /// ```
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        if self.len() >= other.len() {
            let pairs = other.iter().map(|(key, value)| (key.clone(), value.clone()));
            Self {
                trie: self.trie.clone().bulk_put(pairs),
            }
        } else {
            let pairs = self
                .iter()
                .filter(|(key, _)| !other.contains_key(*key))
                .map(|(key, value)| (key.clone(), value.clone()));
            Self {
                trie: other.trie.clone().bulk_put(pairs),
            }
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over key-value pairs of a [`PersistentHashMap`].
pub struct PersistentHashMapIterator<'a, K, V> {
    inner: TrieIterator<'a, K, V>,
}

impl<'a, K, V> Iterator for PersistentHashMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for PersistentHashMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for PersistentHashMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Hash + Eq, V: Clone + PartialEq> FromIterator<(K, V)> for PersistentHashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            trie: iter.into_iter().collect(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentHashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = PersistentHashMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for PersistentHashMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.trie == other.trie
    }
}

impl<K: Hash + Eq, V: Eq> Eq for PersistentHashMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentHashMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

static_assertions::assert_impl_all!(PersistentHashMap<String, i32>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K: serde::Serialize, V: serde::Serialize> serde::Serialize for PersistentHashMap<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentHashMapVisitor<K, V> {
    marker: std::marker::PhantomData<(K, V)>,
}

#[cfg(feature = "serde")]
impl<K, V> PersistentHashMapVisitor<K, V> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for PersistentHashMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de> + Clone + PartialEq,
{
    type Value = PersistentHashMap<K, V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        const MAX_PREALLOCATE: usize = 4096;
        let capacity = access.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
        let mut entries = Vec::with_capacity(capacity);
        while let Some(entry) = access.next_entry()? {
            entries.push(entry);
        }
        Ok(entries.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for PersistentHashMap<K, V>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de> + Clone + PartialEq,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentHashMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
