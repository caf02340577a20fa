//! Persistent lazy cons list.
//!
//! This module provides [`LazyList`], a singly-linked list whose cells may be
//! deferred: a cell is computed the first time someone looks at it, and the
//! result is memoized in a [`Suspension`] for every later reader.
//!
//! # Overview
//!
//! A list is one of three shapes:
//!
//! - empty
//! - a realized cell holding a head and a tail list
//! - a deferred cell holding a suspension that produces a list
//!
//! Every operation handles all three and forces no more cells than it needs.
//! Because cells are produced on demand, lists can be infinite; consuming
//! one fully (`len`, `to_vec`, `Display`, ...) then never returns, so bound
//! it first with [`LazyList::take`] or [`LazyList::take_while`].
//!
//! Transformations such as [`LazyList::map`] and [`LazyList::filter`] are
//! lazy: they return immediately and do their work cell by cell as the
//! result is consumed. Closures given to them must be pure and
//! `Send + Sync + 'static`, since a cell may be forced from any thread and,
//! under a race, more than once.
//!
//! # Examples
//!
//! ```rust
//! use perseus::persistent::LazyList;
//!
//! let evens = LazyList::iterate(0_u64, |n| n + 1).filter(|n| n % 2 == 0);
//! assert_eq!(evens.take(4).to_vec(), vec![0, 2, 4, 6]);
//!
//! let list: LazyList<i32> = (1..=3).collect();
//! assert_eq!(list.cons(0).to_string(), "[0, 1, 2, 3]");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Add;

use super::ReferenceCounter;
use crate::control::Suspension;

/// Internal cell structure for the lazy list.
enum Cell<T> {
    /// A head with its tail.
    Cons(T, LazyList<T>),
    /// A whole list, produced on first access.
    Deferred(Suspension<LazyList<T>>),
}

/// A persistent (immutable) lazy cons list.
///
/// # Time Complexity
///
/// | Operation       | Complexity                      |
/// |-----------------|---------------------------------|
/// | `new`           | O(1), no allocation             |
/// | `cons`          | O(1)                            |
/// | `head` / `tail` | O(1) plus forcing the first cell|
/// | `get`           | O(n)                            |
/// | `len`           | O(n), forces the whole list     |
/// | transformations | O(1) to build, work on demand   |
///
/// # Examples
///
/// ```rust
/// use perseus::persistent::LazyList;
///
/// let list = LazyList::new().cons(3).cons(2).cons(1);
/// assert_eq!(list.head(), Some(&1));
/// assert_eq!(list.tail().head(), Some(&2));
/// assert_eq!(list.len(), 3);
/// ```
pub struct LazyList<T> {
    node: Option<ReferenceCounter<Cell<T>>>,
}

impl<T> Clone for LazyList<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
        }
    }
}

impl<T> LazyList<T> {
    /// Creates the empty list. No allocation takes place.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { node: None }
    }

    fn from_parts(head: T, tail: Self) -> Self {
        Self {
            node: Some(ReferenceCounter::new(Cell::Cons(head, tail))),
        }
    }

    /// Returns a new list with `element` in front of this one.
    ///
    /// Nothing is forced; the new cell shares `self` as its tail.
    #[inline]
    #[must_use]
    pub fn cons(&self, element: T) -> Self {
        Self::from_parts(element, self.clone())
    }

    /// Forces up to the first realized cell and returns its parts.
    fn realized(&self) -> Option<(&T, &Self)> {
        let mut current = self;
        loop {
            match current.node.as_deref()? {
                Cell::Cons(head, tail) => return Some((head, tail)),
                Cell::Deferred(suspension) => current = suspension.force(),
            }
        }
    }

    /// Returns the first element, forcing the first cell if needed.
    #[inline]
    #[must_use]
    pub fn head(&self) -> Option<&T> {
        self.realized().map(|(head, _)| head)
    }

    /// Returns the list without its first element. The tail of the empty
    /// list is the empty list.
    ///
    /// Only the first cell is forced; the tail itself stays deferred.
    #[must_use]
    pub fn tail(&self) -> Self {
        self.realized()
            .map_or_else(Self::new, |(_, tail)| tail.clone())
    }

    /// Splits the list into its head and tail.
    #[must_use]
    pub fn uncons(&self) -> Option<(&T, Self)> {
        self.realized().map(|(head, tail)| (head, tail.clone()))
    }

    /// Returns `true` if the list has no elements. Forces the first cell.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.realized().is_none()
    }

    /// Returns `true` when both lists start at the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.node, &other.node) {
            (None, None) => true,
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Returns an iterator over the elements, forcing cells as it goes.
    #[must_use]
    pub const fn iter(&self) -> LazyListIterator<'_, T> {
        LazyListIterator { current: self }
    }

    /// Counts the elements. Forces the whole list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns the element at `index`, forcing the cells before it.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.iter().nth(index)
    }

    /// Returns the last element. Forces the whole list.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.iter().last()
    }

    /// Folds the elements from the front.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::LazyList;
    ///
    /// let list = LazyList::interval(1, 100);
    /// assert_eq!(list.fold(0_i32, |sum, n| sum + n), 5050);
    /// ```
    pub fn fold<B, F>(&self, initial: B, function: F) -> B
    where
        F: FnMut(B, &T) -> B,
    {
        self.iter().fold(initial, function)
    }

    /// Calls `function` on each element in order.
    pub fn each<F>(&self, function: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(function);
    }
}

impl<T: Clone> LazyList<T> {
    /// Collects the elements into a `Vec`. Forces the whole list.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Send + Sync + 'static> LazyList<T> {
    /// Creates a list whose first cell is produced by `thunk` on first
    /// access.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::LazyList;
    ///
    /// let list = LazyList::defer(|| LazyList::new().cons(1));
    /// assert_eq!(list.head(), Some(&1));
    /// ```
    pub fn defer<F>(thunk: F) -> Self
    where
        F: Fn() -> Self + Send + Sync + 'static,
    {
        Self {
            node: Some(ReferenceCounter::new(Cell::Deferred(Suspension::new(
                thunk,
            )))),
        }
    }

    /// Creates an unbounded list whose elements come from calling
    /// `generator` once per forced cell. No call happens at construction.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::LazyList;
    /// use std::sync::atomic::{AtomicU32, Ordering};
    /// use std::sync::Arc;
    ///
    /// let counter = Arc::new(AtomicU32::new(0));
    /// let source = Arc::clone(&counter);
    /// let list = LazyList::stream(move || source.fetch_add(1, Ordering::SeqCst));
    /// assert_eq!(counter.load(Ordering::SeqCst), 0);
    /// assert_eq!(list.take(3).to_vec(), vec![0, 1, 2]);
    /// assert_eq!(counter.load(Ordering::SeqCst), 3);
    /// ```
    pub fn stream<F>(generator: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::stream_shared(ReferenceCounter::new(generator))
    }

    fn stream_shared<F>(generator: ReferenceCounter<F>) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::defer(move || {
            Self::from_parts(
                generator(),
                Self::stream_shared(ReferenceCounter::clone(&generator)),
            )
        })
    }

    /// Lazily applies `function` to each element.
    pub fn map<U, F>(&self, function: F) -> LazyList<U>
    where
        U: Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        Self::map_shared(self.clone(), ReferenceCounter::new(function))
    }

    fn map_shared<U, F>(source: Self, function: ReferenceCounter<F>) -> LazyList<U>
    where
        U: Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        LazyList::defer(move || match source.uncons() {
            None => LazyList::new(),
            Some((head, tail)) => LazyList::from_parts(
                function(head),
                Self::map_shared(tail, ReferenceCounter::clone(&function)),
            ),
        })
    }
}

impl<T> LazyList<T>
where
    T: Copy + PartialOrd + Add<Output = T> + From<u8> + Send + Sync + 'static,
{
    /// Creates the lazy arithmetic sequence `from, from + 1, ..., to`
    /// (inclusive). Elements are produced only as the list is forced, and
    /// `to` may be the largest value of the type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::LazyList;
    ///
    /// assert_eq!(LazyList::interval(3, 6).to_vec(), vec![3, 4, 5, 6]);
    /// assert!(LazyList::interval(6, 3).is_empty());
    /// assert_eq!(LazyList::interval(254_u8, 255).to_vec(), vec![254, 255]);
    /// ```
    pub fn interval(from: T, to: T) -> Self {
        Self::defer(move || {
            if from > to {
                Self::new()
            } else if from == to {
                Self::from_parts(from, Self::new())
            } else {
                Self::from_parts(from, Self::interval(from + T::from(1), to))
            }
        })
    }
}

impl<T: Clone + Send + Sync + 'static> LazyList<T> {
    /// Creates the unbounded list `seed, f(seed), f(f(seed)), ...`.
    ///
    /// Each element is computed from the previous one when its cell is
    /// forced, and memoized from then on.
    pub fn iterate<F>(seed: T, function: F) -> Self
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        Self::iterate_shared(seed, ReferenceCounter::new(function))
    }

    fn iterate_shared<F>(seed: T, function: ReferenceCounter<F>) -> Self
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        let previous = seed.clone();
        let tail = Self::defer(move || {
            Self::iterate_shared(function(&previous), ReferenceCounter::clone(&function))
        });
        Self::from_parts(seed, tail)
    }

    /// Creates the unbounded list `element, element, ...`.
    pub fn repeat(element: T) -> Self {
        Self::defer(move || Self::from_parts(element.clone(), Self::repeat(element.clone())))
    }

    /// Creates a list of `count` copies of `element`.
    pub fn replicate(count: usize, element: T) -> Self {
        Self::repeat(element).take(count)
    }

    /// Lazily keeps the elements matching `predicate`.
    ///
    /// Forcing a cell of the result forces the source up to the next match,
    /// so filtering an infinite list without further matches never returns.
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::filter_shared(self.clone(), ReferenceCounter::new(predicate))
    }

    fn filter_shared<P>(source: Self, predicate: ReferenceCounter<P>) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::defer(move || {
            let mut current = source.clone();
            loop {
                let Some((head, tail)) = current.uncons() else {
                    return Self::new();
                };
                if predicate(head) {
                    return Self::from_parts(
                        head.clone(),
                        Self::filter_shared(tail, ReferenceCounter::clone(&predicate)),
                    );
                }
                current = tail;
            }
        })
    }

    /// Lazily drops the elements matching `predicate`.
    pub fn reject<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter(move |element| !predicate(element))
    }

    /// Lazily keeps at most the first `count` elements.
    ///
    /// `take(0)` forces nothing, not even the first cell.
    pub fn take(&self, count: usize) -> Self {
        if count == 0 {
            return Self::new();
        }
        let source = self.clone();
        Self::defer(move || match source.uncons() {
            None => Self::new(),
            Some((head, tail)) => Self::from_parts(head.clone(), tail.take(count - 1)),
        })
    }

    /// Lazily skips the first `count` elements. The rest of the list is
    /// shared, not copied.
    pub fn drop_first(&self, count: usize) -> Self {
        if count == 0 {
            return self.clone();
        }
        let source = self.clone();
        Self::defer(move || {
            let mut current = source.clone();
            for _ in 0..count {
                if current.is_empty() {
                    return Self::new();
                }
                current = current.tail();
            }
            current
        })
    }

    /// Lazily keeps elements while `predicate` holds.
    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::take_while_shared(self.clone(), ReferenceCounter::new(predicate))
    }

    fn take_while_shared<P>(source: Self, predicate: ReferenceCounter<P>) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::defer(move || match source.uncons() {
            Some((head, tail)) if predicate(head) => Self::from_parts(
                head.clone(),
                Self::take_while_shared(tail, ReferenceCounter::clone(&predicate)),
            ),
            _ => Self::new(),
        })
    }

    /// Lazily skips elements while `predicate` holds.
    pub fn drop_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        Self::defer(move || {
            let mut current = source.clone();
            while current.head().is_some_and(|head| predicate(head)) {
                current = current.tail();
            }
            current
        })
    }

    /// Lazily concatenates `other` after this list.
    pub fn append(&self, other: &Self) -> Self {
        let source = self.clone();
        let other = other.clone();
        Self::defer(move || match source.uncons() {
            None => other.clone(),
            Some((head, tail)) => Self::from_parts(head.clone(), tail.append(&other)),
        })
    }

    /// Lazily maps each element to a list and concatenates the results.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::LazyList;
    ///
    /// let list = LazyList::interval(1, 3).flat_map(|&n| LazyList::replicate(n, n));
    /// assert_eq!(list.to_vec(), vec![1, 2, 2, 3, 3, 3]);
    /// ```
    pub fn flat_map<U, F>(&self, function: F) -> LazyList<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> LazyList<U> + Send + Sync + 'static,
    {
        self.map(function).flatten()
    }

    /// Lazily pairs up elements of both lists, stopping at the shorter one.
    pub fn zip<U>(&self, other: &LazyList<U>) -> LazyList<(T, U)>
    where
        U: Clone + Send + Sync + 'static,
    {
        let left = self.clone();
        let right = other.clone();
        LazyList::defer(move || match (left.uncons(), right.uncons()) {
            (Some((left_head, left_tail)), Some((right_head, right_tail))) => LazyList::from_parts(
                (left_head.clone(), right_head.clone()),
                left_tail.zip(&right_tail),
            ),
            _ => LazyList::new(),
        })
    }

    /// Lazily repeats this list forever. Cycling the empty list yields the
    /// empty list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::LazyList;
    ///
    /// let list: LazyList<char> = "ab".chars().collect();
    /// assert_eq!(list.cycle().take(5).to_vec(), vec!['a', 'b', 'a', 'b', 'a']);
    /// ```
    pub fn cycle(&self) -> Self {
        let source = self.clone();
        Self::defer(move || {
            if source.is_empty() {
                Self::new()
            } else {
                source.append(&source.cycle())
            }
        })
    }

    /// Reverses the list.
    ///
    /// Building the result is O(1); forcing its first cell forces the whole
    /// source.
    pub fn reverse(&self) -> Self {
        let source = self.clone();
        Self::defer(move || {
            source.fold(Self::new(), |reversed, element| {
                Self::from_parts(element.clone(), reversed)
            })
        })
    }
}

impl<T: Clone + Send + Sync + 'static> LazyList<LazyList<T>> {
    /// Lazily concatenates a list of lists. Empty inner lists are skipped.
    pub fn flatten(&self) -> LazyList<T> {
        let outer = self.clone();
        LazyList::defer(move || {
            let mut outer = outer.clone();
            loop {
                let Some((inner, rest)) = outer.uncons() else {
                    return LazyList::new();
                };
                if let Some((head, tail)) = inner.uncons() {
                    return LazyList::from_parts(head.clone(), rest.cons(tail).flatten());
                }
                outer = rest;
            }
        })
    }
}

// =============================================================================
// Drop Implementation
// =============================================================================

impl<T> Drop for LazyList<T> {
    /// Unlinks uniquely owned cells one at a time so that dropping a long
    /// list does not recurse once per cell.
    fn drop(&mut self) {
        let mut next = self.node.take();
        while let Some(node) = next {
            next = match ReferenceCounter::try_unwrap(node) {
                Ok(Cell::Cons(_, mut tail)) => tail.node.take(),
                Ok(Cell::Deferred(suspension)) => suspension
                    .into_inner()
                    .and_then(|mut list| list.node.take()),
                Err(_) => None,
            };
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to elements of a [`LazyList`].
///
/// Each call to `next` forces at most one more cell.
pub struct LazyListIterator<'a, T> {
    current: &'a LazyList<T>,
}

impl<'a, T> Iterator for LazyListIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current;
        let (head, tail) = current.realized()?;
        self.current = tail;
        Some(head)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for LazyList<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for LazyList<T> {
    /// Builds a fully realized list.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let elements: Vec<T> = iter.into_iter().collect();
        elements
            .into_iter()
            .rev()
            .fold(Self::new(), |list, element| Self::from_parts(element, list))
    }
}

impl<'a, T> IntoIterator for &'a LazyList<T> {
    type Item = &'a T;
    type IntoIter = LazyListIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for LazyList<T> {
    /// Compares element by element, forcing both lists as far as they agree.
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LazyList<T> {}

impl<T: Hash> Hash for LazyList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut count = 0_usize;
        for element in self {
            element.hash(state);
            count += 1;
        }
        count.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyList<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for LazyList<T> {
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

static_assertions::assert_impl_all!(LazyList<i32>: Send, Sync);
static_assertions::assert_impl_all!(LazyList<String>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
