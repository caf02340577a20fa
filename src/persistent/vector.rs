//! Persistent (immutable) vector.
//!
//! This module provides [`PersistentVector`], an indexed-sequence facade over
//! the [`VectorTrie`] engine.
//!
//! # Overview
//!
//! - O(log32 N) random access, update, `push_back` and `pop_back`
//! - O(N) `push_front`, `insert` and `remove` (the suffix is rebuilt)
//! - O(1) len and `is_empty`
//!
//! Truncating operations (`take`, `slice` from the start) share every node
//! left of the cut with the original.
//!
//! # Examples
//!
//! ```rust
//! use perseus::persistent::PersistentVector;
//!
//! let vector = PersistentVector::new()
//!     .push_back(1)
//!     .push_back(2)
//!     .push_back(3);
//! assert_eq!(vector.get(1), Some(&2));
//!
//! let extended = vector.push_back(4);
//! assert_eq!(vector.len(), 3);   // Original unchanged
//! assert_eq!(extended.len(), 4); // New vector
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use super::error::IndexOutOfRange;
use super::vector_trie::{VectorTrie, VectorTrieIterator};

/// A persistent (immutable) vector.
///
/// # Time Complexity
///
/// | Operation     | Complexity   |
/// |---------------|--------------|
/// | `new`         | O(1)         |
/// | `get`         | O(log32 N)   |
/// | `update`      | O(log32 N)   |
/// | `push_back`   | O(log32 N)   |
/// | `pop_back`    | O(log32 N)   |
/// | `push_front`  | O(N)         |
/// | `insert`      | O(N - index) |
/// | `remove`      | O(N - index) |
/// | `take`        | O(log32 N)   |
/// | `append`      | O(M)         |
#[derive(Clone)]
pub struct PersistentVector<T> {
    trie: VectorTrie<T>,
}

impl<T> PersistentVector<T> {
    /// Creates a new empty vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = PersistentVector::new();
    /// assert!(vector.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            trie: VectorTrie::new(),
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.trie.len()
    }

    /// Returns `true` if the vector has no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Returns `true` when both vectors share the same root.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.trie.ptr_eq(&other.trie)
    }

    /// Returns the element at `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.trie.get(index)
    }

    /// Returns the element at a possibly negative `index`; `-1` is the last
    /// element.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index < -len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// assert_eq!(vector.get_signed(-1), Ok(Some(&3)));
    /// assert!(vector.get_signed(-4).is_err());
    /// ```
    #[inline]
    pub fn get_signed(&self, index: isize) -> Result<Option<&T>, IndexOutOfRange> {
        self.trie.at(index)
    }

    /// Returns the first element.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.trie.first()
    }

    /// Returns the last element.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.trie.last()
    }

    /// Returns an iterator over the elements.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> VectorTrieIterator<'_, T> {
        self.trie.iter()
    }
}

impl<T: Clone> PersistentVector<T> {
    /// Creates a vector containing a single element.
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().push_back(element)
    }

    /// Appends an element at the end.
    #[must_use]
    pub fn push_back(&self, element: T) -> Self {
        Self {
            trie: self.trie.append(element),
        }
    }

    /// Removes the last element.
    ///
    /// Returns `None` if the vector is empty, otherwise the remaining vector
    /// and the removed element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// let (remaining, element) = vector.pop_back().unwrap();
    /// assert_eq!(element, 5);
    /// assert_eq!(remaining.len(), 4);
    /// ```
    #[must_use]
    pub fn pop_back(&self) -> Option<(Self, T)> {
        let element = self.last()?.clone();
        Some((
            Self {
                trie: self.trie.pop(),
            },
            element,
        ))
    }

    /// Prepends an element. Every existing element is moved one slot up.
    #[must_use]
    pub fn push_front(&self, element: T) -> Self {
        let rest = self.trie.flatten_range(0..self.len());
        Self {
            trie: VectorTrie::new().extend_back(std::iter::once(element).chain(rest)),
        }
    }

    /// Replaces the element at `index`, returning `None` if out of bounds.
    #[must_use]
    pub fn update(&self, index: usize, element: T) -> Option<Self> {
        self.trie
            .update(index, element)
            .map(|trie| Self { trie })
    }

    /// Inserts `element` before `index`; `index == len()` appends.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index > len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = vec![1, 3].into_iter().collect();
    /// let inserted = vector.insert(1, 2).unwrap();
    /// assert_eq!(inserted.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// assert!(vector.insert(3, 0).is_err());
    /// ```
    pub fn insert(&self, index: usize, element: T) -> Result<Self, IndexOutOfRange> {
        let shifted = self.trie.flatten_range(index..self.len());
        self.trie
            .replace_suffix(index, std::iter::once(element).chain(shifted))
            .map(|trie| Self { trie })
    }

    /// Removes the element at `index`, returning `None` if out of bounds.
    #[must_use]
    pub fn remove(&self, index: usize) -> Option<Self> {
        if index >= self.len() {
            return None;
        }
        let index = isize::try_from(index).ok()?;
        self.trie.delete_at(index).ok().map(|trie| Self { trie })
    }

    /// Returns the elements in `range`, clamped to the vector's bounds.
    ///
    /// A range starting at 0 shares the kept prefix with `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..10).collect();
    /// let sliced = vector.slice(2..5);
    /// assert_eq!(sliced.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    /// assert!(vector.slice(8..20).len() == 2);
    /// ```
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        if range.start == 0 {
            return self.take(range.end);
        }
        self.trie.flatten_range(range).into_iter().collect()
    }

    /// Keeps the first `count` elements.
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        Self {
            trie: self.trie.truncate(count),
        }
    }

    /// Skips the first `count` elements.
    #[must_use]
    pub fn drop_first(&self, count: usize) -> Self {
        if count == 0 {
            return self.clone();
        }
        self.slice(count..self.len())
    }

    /// Concatenates `other` after this vector.
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        Self {
            trie: self.trie.clone().extend_back(other.iter().cloned()),
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentVector<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for PersistentVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            trie: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a PersistentVector<T> {
    type Item = &'a T;
    type IntoIter = VectorTrieIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for PersistentVector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.trie == other.trie
    }
}

impl<T: Eq> Eq for PersistentVector<T> {}

impl<T: Hash> Hash for PersistentVector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.trie.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentVector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentVector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

static_assertions::assert_impl_all!(PersistentVector<String>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PersistentVector<T> {
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
struct PersistentVectorVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<T> PersistentVectorVisitor<T> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for PersistentVectorVisitor<T>
where
    T: serde::Deserialize<'de>,
{
    type Value = PersistentVector<T>;

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
impl<'de, T> serde::Deserialize<'de> for PersistentVector<T>
where
    T: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentVectorVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
