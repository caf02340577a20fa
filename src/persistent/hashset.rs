//! Persistent (immutable) hash set.
//!
//! This module provides [`PersistentHashSet`], a set facade over the
//! [`Trie`] engine with unit values.
//!
//! # Overview
//!
//! - O(log32 N) contains, insert and remove
//! - O(1) len and `is_empty`
//! - union, intersection, difference and symmetric difference
//!
//! Inserting an element that is already present returns the same set, and
//! so does removing an absent one.
//!
//! # Examples
//!
//! ```rust
//! use perseus::persistent::PersistentHashSet;
//!
//! let set_a: PersistentHashSet<i32> = [1, 2, 3].into_iter().collect();
//! let set_b: PersistentHashSet<i32> = [2, 3, 4].into_iter().collect();
//!
//! assert_eq!(set_a.union(&set_b).len(), 4);
//! assert_eq!(set_a.intersection(&set_b).len(), 2);
//! assert_eq!(set_a.difference(&set_b).len(), 1);
//! assert_eq!(set_a.symmetric_difference(&set_b).len(), 2);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use super::trie::{Trie, TrieIterator};

/// A persistent (immutable) hash set.
///
/// # Examples
///
/// ```rust
/// use perseus::persistent::PersistentHashSet;
///
/// let set = PersistentHashSet::new().insert(1).insert(2);
/// let same = set.insert(1);
/// assert!(same.ptr_eq(&set));
/// ```
#[derive(Clone)]
pub struct PersistentHashSet<T> {
    trie: Trie<T, ()>,
}

impl<T> PersistentHashSet<T> {
    /// Creates a new empty set.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { trie: Trie::new() }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    /// Returns `true` if the set has no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Returns `true` when both sets share the same root.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.trie.ptr_eq(&other.trie)
    }

    /// Returns an iterator over the elements, in trie order.
    #[must_use]
    pub fn iter(&self) -> PersistentHashSetIterator<'_, T> {
        PersistentHashSetIterator {
            inner: self.trie.iter(),
        }
    }
}

impl<T: Hash + Eq> PersistentHashSet<T> {
    /// Returns `true` if the set contains `element`.
    #[inline]
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.trie.contains_key(element)
    }

    /// Returns `true` if every element of `self` is in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|element| other.contains(element))
    }

    /// Returns `true` if every element of `other` is in `self`.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Returns `true` if the sets have no element in common.
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        !smaller.iter().any(|element| larger.contains(element))
    }
}

impl<T: Clone + Hash + Eq> PersistentHashSet<T> {
    /// Creates a set with a single element.
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().insert(element)
    }

    /// Adds `element`, returning the new set. Adding a present element
    /// returns the original set.
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        Self {
            trie: self.trie.put(element, ()),
        }
    }

    /// Removes `element`, returning the new set.
    #[must_use]
    pub fn remove<Q>(&self, element: &Q) -> Self
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        Self {
            trie: self.trie.delete(element),
        }
    }

    /// Returns the elements in either set.
    ///
    /// The larger set is the base; only the smaller one is inserted.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        Self {
            trie: larger
                .trie
                .clone()
                .bulk_put(smaller.iter().map(|element| (element.clone(), ()))),
        }
    }

    /// Returns the elements in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        smaller
            .iter()
            .filter(|element| larger.contains(*element))
            .cloned()
            .collect()
    }

    /// Returns the elements of `self` that are not in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::PersistentHashSet;
    ///
    /// let set_a: PersistentHashSet<i32> = [1, 2, 3].into_iter().collect();
    /// let set_b: PersistentHashSet<i32> = [2, 3, 4].into_iter().collect();
    /// let difference = set_a.difference(&set_b);
    /// assert!(difference.contains(&1));
    /// assert_eq!(difference.len(), 1);
    /// ```
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        if other.len() < self.len() / 2 {
            return other
                .iter()
                .fold(self.clone(), |result, element| result.remove(element));
        }
        self.iter()
            .filter(|element| !other.contains(*element))
            .cloned()
            .collect()
    }

    /// Returns the elements in exactly one of the sets.
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        self.difference(other).union(&other.difference(self))
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over elements of a [`PersistentHashSet`].
pub struct PersistentHashSetIterator<'a, T> {
    inner: TrieIterator<'a, T, ()>,
}

impl<'a, T> Iterator for PersistentHashSetIterator<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, _)| element)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for PersistentHashSetIterator<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentHashSet<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Hash + Eq> FromIterator<T> for PersistentHashSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            trie: iter.into_iter().map(|element| (element, ())).collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a PersistentHashSet<T> {
    type Item = &'a T;
    type IntoIter = PersistentHashSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Hash + Eq> PartialEq for PersistentHashSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.trie == other.trie
    }
}

impl<T: Hash + Eq> Eq for PersistentHashSet<T> {}

impl<T: fmt::Debug> fmt::Debug for PersistentHashSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentHashSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(PersistentHashSet<String>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PersistentHashSet<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentHashSetVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<T> PersistentHashSetVisitor<T> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for PersistentHashSetVisitor<T>
where
    T: serde::Deserialize<'de> + Clone + Hash + Eq,
{
    type Value = PersistentHashSet<T>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        const MAX_PREALLOCATE: usize = 4096;
        let capacity = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
        let mut elements = Vec::with_capacity(capacity);
        while let Some(element) = seq.next_element()? {
            elements.push(element);
        }
        Ok(elements.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for PersistentHashSet<T>
where
    T: serde::Deserialize<'de> + Clone + Hash + Eq,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentHashSetVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
