//! Persistent (immutable) double-ended queue.
//!
//! This module provides [`PersistentDeque`], a deque built from two
//! [`LazyList`]s: one holding the front in order, one holding the back in
//! reverse.
//!
//! # Overview
//!
//! - O(1) `push_front` and `push_back`
//! - O(1) `len`, `is_empty` and `reverse`
//! - O(1) `pop_front` and `pop_back` while the popped side is non-empty,
//!   O(n) worst case when one side is exhausted
//!
//! When one side runs out, popping from it reverses the whole other side.
//! Alternating pops on a deque whose elements all sit on one side therefore
//! cost O(n) each, and so does popping the same exhausted version
//! repeatedly. The reversal is a lazy list: it is built in O(1) and forced
//! on first access.
//!
//! # Examples
//!
//! ```rust
//! use perseus::persistent::PersistentDeque;
//!
//! let deque = PersistentDeque::new()
//!     .push_back(1)
//!     .push_back(2)
//!     .push_back(3);
//!
//! assert_eq!(deque.front(), Some(&1));
//! assert_eq!(deque.back(), Some(&3));
//!
//! let extended = deque.push_back(4);
//! assert_eq!(deque.len(), 3);    // Original unchanged
//! assert_eq!(extended.len(), 4); // New deque
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use super::lazy_list::{LazyList, LazyListIterator};

/// A persistent (immutable) double-ended queue.
pub struct PersistentDeque<T> {
    /// Front elements, first element at the head.
    front: LazyList<T>,
    /// Back elements, last element at the head.
    rear: LazyList<T>,
    length: usize,
}

impl<T> Clone for PersistentDeque<T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            rear: self.rear.clone(),
            length: self.length,
        }
    }
}

impl<T> PersistentDeque<T> {
    /// Creates a new empty deque.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            front: LazyList::new(),
            rear: LazyList::new(),
            length: 0,
        }
    }

    /// Creates a deque containing a single element.
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().push_back(element)
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the deque has no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the first element.
    ///
    /// If the front side is empty this walks the back side.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.front.head().or_else(|| self.rear.last())
    }

    /// Returns the last element.
    ///
    /// If the back side is empty this walks the front side.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.rear.head().or_else(|| self.front.last())
    }

    /// Adds an element at the front.
    #[must_use]
    pub fn push_front(&self, element: T) -> Self {
        Self {
            front: self.front.cons(element),
            rear: self.rear.clone(),
            length: self.length + 1,
        }
    }

    /// Adds an element at the back.
    #[must_use]
    pub fn push_back(&self, element: T) -> Self {
        Self {
            front: self.front.clone(),
            rear: self.rear.cons(element),
            length: self.length + 1,
        }
    }

    /// Returns the deque in reverse order. O(1): the two sides swap.
    #[must_use]
    pub fn reverse(&self) -> Self {
        Self {
            front: self.rear.clone(),
            rear: self.front.clone(),
            length: self.length,
        }
    }

    /// Returns an iterator from front to back.
    ///
    /// The back side is buffered when the iterator is created.
    #[must_use]
    pub fn iter(&self) -> PersistentDequeIterator<'_, T> {
        let rear: Vec<&T> = self.rear.iter().collect();
        PersistentDequeIterator {
            front: self.front.iter(),
            rear: rear.into_iter().rev(),
            remaining: self.length,
        }
    }
}

impl<T: Clone + Send + Sync + 'static> PersistentDeque<T> {
    /// Removes the first element.
    ///
    /// Returns `None` if the deque is empty, otherwise the remaining deque
    /// and the removed element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::PersistentDeque;
    ///
    /// let deque: PersistentDeque<i32> = (1..=3).collect();
    /// let (rest, first) = deque.push_front(0).pop_front().unwrap();
    /// assert_eq!(first, 0);
    /// assert_eq!(rest, deque);
    /// ```
    #[must_use]
    pub fn pop_front(&self) -> Option<(Self, T)> {
        if let Some((head, tail)) = self.front.uncons() {
            return Some((
                Self {
                    front: tail,
                    rear: self.rear.clone(),
                    length: self.length - 1,
                },
                head.clone(),
            ));
        }
        let reversed = self.rear.reverse();
        let (head, tail) = reversed.uncons()?;
        Some((
            Self {
                front: tail,
                rear: LazyList::new(),
                length: self.length - 1,
            },
            head.clone(),
        ))
    }

    /// Removes the last element.
    ///
    /// Returns `None` if the deque is empty, otherwise the remaining deque
    /// and the removed element.
    #[must_use]
    pub fn pop_back(&self) -> Option<(Self, T)> {
        let (rest, element) = self.reverse().pop_front()?;
        Some((rest.reverse(), element))
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to elements of a [`PersistentDeque`].
pub struct PersistentDequeIterator<'a, T> {
    front: LazyListIterator<'a, T>,
    rear: std::iter::Rev<std::vec::IntoIter<&'a T>>,
    remaining: usize,
}

impl<'a, T> Iterator for PersistentDequeIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.front.next().or_else(|| self.rear.next())?;
        self.remaining -= 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PersistentDequeIterator<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentDeque<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for PersistentDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let front: LazyList<T> = iter.into_iter().collect();
        let length = front.len();
        Self {
            front,
            rear: LazyList::new(),
            length,
        }
    }
}

impl<'a, T> IntoIterator for &'a PersistentDeque<T> {
    type Item = &'a T;
    type IntoIter = PersistentDequeIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for PersistentDeque<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for PersistentDeque<T> {}

impl<T: Hash> Hash for PersistentDeque<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentDeque<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

static_assertions::assert_impl_all!(PersistentDeque<String>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_push_front_then_pop_front_restores() {
        let deque: PersistentDeque<i32> = (1..=3).collect();
        let (rest, first) = deque.push_front(0).pop_front().unwrap();
        assert_eq!(first, 0);
        assert_eq!(rest, deque);
    }

    #[rstest]
    fn test_pop_front_reverses_back_side() {
        let deque = PersistentDeque::new().push_back(1).push_back(2).push_back(3);
        let (rest, first) = deque.pop_front().unwrap();
        assert_eq!(first, 1);
        assert_eq!(rest.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(rest.len(), 2);
    }

    #[rstest]
    fn test_pop_back_reverses_front_side() {
        let deque: PersistentDeque<i32> = (1..=3).collect();
        let (rest, last) = deque.pop_back().unwrap();
        assert_eq!(last, 3);
        assert_eq!(rest.back(), Some(&2));
    }

    #[rstest]
    fn test_pop_empty() {
        let deque: PersistentDeque<i32> = PersistentDeque::new();
        assert!(deque.pop_front().is_none());
        assert!(deque.pop_back().is_none());
    }

    #[rstest]
    fn test_front_and_back_across_sides() {
        let deque = PersistentDeque::new().push_back(2).push_front(1).push_back(3);
        assert_eq!(deque.front(), Some(&1));
        assert_eq!(deque.back(), Some(&3));
        assert_eq!(PersistentDeque::singleton(9).front(), Some(&9));
        assert_eq!(PersistentDeque::singleton(9).back(), Some(&9));
    }

    #[rstest]
    fn test_reverse() {
        let deque = PersistentDeque::new().push_front(2).push_front(1).push_back(3);
        let reversed = deque.reverse();
        assert_eq!(reversed.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(reversed.reverse(), deque);
    }

    #[rstest]
    fn test_drain_alternating_ends() {
        let mut deque: PersistentDeque<i32> = (0..10).collect();
        let mut drained = Vec::new();
        let mut take_front = true;
        while !deque.is_empty() {
            let (rest, element) = if take_front {
                deque.pop_front().unwrap()
            } else {
                deque.pop_back().unwrap()
            };
            drained.push(element);
            deque = rest;
            take_front = !take_front;
        }
        assert_eq!(drained, vec![0, 9, 1, 8, 2, 7, 3, 6, 4, 5]);
    }

    #[rstest]
    fn test_debug() {
        let deque = PersistentDeque::new().push_back(1).push_front(0);
        assert_eq!(format!("{deque:?}"), "[0, 1]");
    }
}
