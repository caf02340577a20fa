//! Persistent bit-partitioned vector trie.
//!
//! This module provides [`VectorTrie`], the indexed-sequence engine
//! underneath [`PersistentVector`](super::PersistentVector).
//!
//! # Overview
//!
//! A `VectorTrie` is a 32-way trie over element indices. An index is split
//! into 5-bit slices, most significant first; each slice selects a child on
//! the way down, and the last one selects the element inside a leaf.
//!
//! - O(log32 N) `get`, `update`, `set` (effectively O(1))
//! - O(log32 N) `append` and `pop`, touching only the rightmost spine
//! - O(N - i) `insert` and `delete_at` at index `i` (the suffix is rebuilt)
//! - O(1) `len` and `is_empty`
//!
//! # Internal Structure
//!
//! A vector is `(root, size, level)`. `level` is the smallest value with
//! `32^(level + 1) >= size`; the root sits `level` internal layers above the
//! leaves. The tree is packed to the left: every node off the rightmost spine
//! is full. The empty vector has no root at all.
//!
//! Updates clone the vector and then edit it through
//! [`Arc::make_mut`](std::sync::Arc::make_mut): nodes shared with another
//! vector are copied before they are touched, nodes owned only by the new
//! vector are edited in place. This gives path copying for single updates
//! and in-place filling during bulk builds from the same code.
//!
//! # Examples
//!
//! ```rust
//! use perseus::persistent::VectorTrie;
//!
//! let vector: VectorTrie<u32> = (0..33).collect();
//! assert_eq!(vector.level(), 1);
//! assert_eq!(vector.pop().level(), 0);
//!
//! let spliced = vector.insert(1, [100, 101]).unwrap();
//! assert_eq!(spliced.flatten_range(0..4), vec![0, 100, 101, 1]);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use arrayvec::ArrayVec;

use super::ReferenceCounter;
use super::error::IndexOutOfRange;

// =============================================================================
// Constants
// =============================================================================

/// Branching factor (2^5 = 32)
const BRANCHING_FACTOR: usize = 32;

/// Bits per level in the trie
const BITS_PER_LEVEL: usize = 5;

/// Bit mask for extracting index within a node
const MASK: usize = BRANCHING_FACTOR - 1;

/// Number of elements a trie of the given level can hold.
#[inline]
const fn capacity(level: usize) -> usize {
    match 1usize.checked_shl(((level + 1) * BITS_PER_LEVEL) as u32) {
        Some(capacity) => capacity,
        None => usize::MAX,
    }
}

/// Smallest level whose capacity covers `size`.
const fn level_for(size: usize) -> usize {
    let mut level = 0;
    while capacity(level) < size {
        level += 1;
    }
    level
}

// =============================================================================
// Node Definition
// =============================================================================

type Leaf<T> = ArrayVec<T, BRANCHING_FACTOR>;
type Children<T> = ArrayVec<ReferenceCounter<VectorNode<T>>, BRANCHING_FACTOR>;

/// Internal node structure for the vector trie.
#[derive(Clone)]
enum VectorNode<T> {
    Leaf(Leaf<T>),
    Internal(Children<T>),
}

impl<T> VectorNode<T> {
    /// Wraps `leaf` in `height` single-child internal nodes.
    fn new_path(height: usize, leaf: ReferenceCounter<Self>) -> ReferenceCounter<Self> {
        let mut node = leaf;
        for _ in 0..height {
            let mut children = Children::new();
            children.push(node);
            node = ReferenceCounter::new(Self::Internal(children));
        }
        node
    }
}

// =============================================================================
// VectorTrie Definition
// =============================================================================

/// A persistent (immutable) bit-partitioned vector trie.
///
/// # Time Complexity
///
/// | Operation        | Complexity          |
/// |------------------|---------------------|
/// | `new`            | O(1), no allocation |
/// | `get` / `at`     | O(log32 N)          |
/// | `update` / `set` | O(log32 N)          |
/// | `append` / `pop` | O(log32 N)          |
/// | `insert`         | O(N - index)        |
/// | `delete_at`      | O(N - index)        |
/// | `flatten_range`  | O(log32 N + range)  |
///
/// # Examples
///
/// ```rust
/// use perseus::persistent::VectorTrie;
///
/// let vector: VectorTrie<String> = (0..1000).map(|n| n.to_string()).collect();
/// let updated = vector.update(500, "x".to_string()).unwrap();
/// assert_eq!(updated.get(500).map(String::as_str), Some("x"));
/// assert_eq!(updated.get(499).map(String::as_str), Some("499"));
/// assert_eq!(vector.get(500).map(String::as_str), Some("500"));
/// ```
pub struct VectorTrie<T> {
    root: Option<ReferenceCounter<VectorNode<T>>>,
    size: usize,
    level: usize,
}

impl<T> Clone for VectorTrie<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            size: self.size,
            level: self.level,
        }
    }
}

impl<T> VectorTrie<T> {
    /// Creates the empty vector. No allocation takes place.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            size: 0,
            level: 0,
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the vector holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of internal layers above the leaves.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Returns `true` when both vectors share the same root node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Converts a possibly negative index into an absolute one.
    ///
    /// Negative indices count from the end (`-1` is the last element).
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index < -len()`.
    pub fn resolve(&self, index: isize) -> Result<usize, IndexOutOfRange> {
        usize::try_from(index).or_else(|_| {
            self.size
                .checked_sub(index.unsigned_abs())
                .ok_or(IndexOutOfRange {
                    index,
                    size: self.size,
                })
        })
    }

    /// Returns the element at `index`, or `None` if `index >= len()`.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.size {
            return None;
        }
        self.leaf_for(index).get(index & MASK)
    }

    /// Returns the element at a possibly negative `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index < -len()`. A non-negative index
    /// past the end is not an error; it yields `Ok(None)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::VectorTrie;
    ///
    /// let vector: VectorTrie<char> = "abc".chars().collect();
    /// assert_eq!(vector.at(-1), Ok(Some(&'c')));
    /// assert_eq!(vector.at(3), Ok(None));
    /// assert!(vector.at(-4).is_err());
    /// ```
    pub fn at(&self, index: isize) -> Result<Option<&T>, IndexOutOfRange> {
        self.resolve(index).map(|index| self.get(index))
    }

    /// Returns the first element.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the last element.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.size.checked_sub(1).and_then(|index| self.get(index))
    }

    /// Returns an iterator over the elements.
    #[must_use]
    pub fn iter(&self) -> VectorTrieIterator<'_, T> {
        VectorTrieIterator {
            trie: self,
            front: 0,
            back: self.size,
            front_leaf: &[],
            back_leaf: &[],
        }
    }

    /// Returns the leaf holding `index`. Requires `index < len()`.
    fn leaf_for(&self, index: usize) -> &[T] {
        let Some(root) = &self.root else {
            unreachable!("vector trie corrupted: non-empty vector without a root")
        };

        let mut node = root;
        let mut shift = self.level * BITS_PER_LEVEL;
        loop {
            match node.as_ref() {
                VectorNode::Leaf(elements) => {
                    debug_assert_eq!(shift, 0, "vector trie corrupted: leaf above level 0");
                    return elements;
                }
                VectorNode::Internal(children) => {
                    assert!(shift > 0, "vector trie corrupted: internal node at level 0");
                    node = &children[(index >> shift) & MASK];
                    shift -= BITS_PER_LEVEL;
                }
            }
        }
    }
}

impl<T: Clone> VectorTrie<T> {
    /// Replaces the element at `index`, returning `None` if
    /// `index >= len()`.
    ///
    /// Only the nodes on the path to the element are copied.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    #[must_use]
    pub fn update(&self, index: usize, element: T) -> Option<Self> {
        if index >= self.size {
            return None;
        }
        let mut result = self.clone();
        *result.element_mut(index) = element;
        Some(result)
    }

    /// Appends an element at the end.
    ///
    /// When the trie is full for its level (`32^(level + 1)` elements), a new
    /// root is created above the old one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::VectorTrie;
    ///
    /// let full: VectorTrie<i32> = (0..32).collect();
    /// assert_eq!(full.level(), 0);
    /// let grown = full.append(32);
    /// assert_eq!(grown.level(), 1);
    /// assert_eq!(grown.get(32), Some(&32));
    /// ```
    #[must_use]
    pub fn append(&self, element: T) -> Self {
        self.clone().extend_back(std::iter::once(element))
    }

    /// Removes the last element. Popping the empty vector yields the empty
    /// vector.
    ///
    /// When the remaining elements fit into one level less, the root is
    /// replaced by its only child.
    #[must_use]
    pub fn pop(&self) -> Self {
        match self.size {
            0 => return self.clone(),
            1 => return Self::new(),
            _ => {}
        }

        let mut result = self.clone();
        if let Some(root) = result.root.as_mut() {
            if self.size & MASK == 1 {
                Self::remove_rightmost_leaf(root);
            } else {
                Self::rightmost_leaf_mut(root).pop();
            }
        }
        result.size -= 1;
        result.shrink_levels();
        result
    }

    /// Flattens the elements in `range` (half-open, clamped to `len()`).
    ///
    /// Only the nodes straddling the range bounds are visited piecewise;
    /// subtrees that lie entirely inside the range are copied wholesale.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::VectorTrie;
    ///
    /// let vector: VectorTrie<usize> = (0..5000).collect();
    /// assert_eq!(vector.flatten_range(1020..1030), (1020..1030).collect::<Vec<_>>());
    /// assert!(vector.flatten_range(10..5).is_empty());
    /// ```
    #[must_use]
    pub fn flatten_range(&self, range: Range<usize>) -> Vec<T> {
        let from = range.start;
        let to = range.end.min(self.size);
        let mut output = Vec::with_capacity(to.saturating_sub(from));

        if let Some(root) = &self.root
            && from < to
        {
            Self::flatten_node_range(root, self.level * BITS_PER_LEVEL, 0, from, to, &mut output);
        }
        output
    }

    fn flatten_node_range(
        node: &VectorNode<T>,
        shift: usize,
        offset: usize,
        from: usize,
        to: usize,
        output: &mut Vec<T>,
    ) {
        match node {
            VectorNode::Leaf(elements) => {
                let low = from.saturating_sub(offset);
                let high = (to - offset).min(elements.len());
                output.extend_from_slice(&elements[low..high]);
            }
            VectorNode::Internal(children) => {
                let span = 1usize << shift;
                let first = from.saturating_sub(offset) >> shift;
                for (slot, child) in children.iter().enumerate().skip(first) {
                    let child_start = offset + slot * span;
                    if child_start >= to {
                        break;
                    }
                    if from <= child_start && child_start + span <= to {
                        Self::flatten_whole(child, output);
                    } else {
                        Self::flatten_node_range(
                            child,
                            shift - BITS_PER_LEVEL,
                            child_start,
                            from,
                            to,
                            output,
                        );
                    }
                }
            }
        }
    }

    fn flatten_whole(node: &VectorNode<T>, output: &mut Vec<T>) {
        match node {
            VectorNode::Leaf(elements) => output.extend_from_slice(elements),
            VectorNode::Internal(children) => {
                for child in children {
                    Self::flatten_whole(child, output);
                }
            }
        }
    }

    /// Keeps the first `from` elements and appends `suffix` after them.
    ///
    /// The kept prefix shares every node with `self` except those on the
    /// boundary path at index `from - 1`. The suffix is cut into 32-element
    /// leaves that are grafted onto the rightmost spine, adding a level each
    /// time the size crosses a power of 32.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `from > len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::VectorTrie;
    ///
    /// let vector: VectorTrie<i32> = (0..10).collect();
    /// let replaced = vector.replace_suffix(8, [80, 90, 100]).unwrap();
    /// assert_eq!(replaced.flatten_range(6..11), vec![6, 7, 80, 90, 100]);
    /// assert!(vector.replace_suffix(11, []).is_err());
    /// ```
    pub fn replace_suffix<I>(&self, from: usize, suffix: I) -> Result<Self, IndexOutOfRange>
    where
        I: IntoIterator<Item = T>,
    {
        if from > self.size {
            return Err(IndexOutOfRange {
                index: isize::try_from(from).unwrap_or(isize::MAX),
                size: self.size,
            });
        }
        Ok(self.truncate(from).extend_back(suffix))
    }

    /// Inserts `items` before the element at a possibly negative `index`.
    ///
    /// An `index` past the end pads the gap with `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index < -len()`.
    pub fn insert<I>(&self, index: isize, items: I) -> Result<Self, IndexOutOfRange>
    where
        I: IntoIterator<Item = T>,
        T: Default,
    {
        let index = self.resolve(index)?;
        if index >= self.size {
            let padding = std::iter::repeat_with(T::default).take(index - self.size);
            return self.replace_suffix(self.size, padding.chain(items));
        }

        let mut suffix: Vec<T> = items.into_iter().collect();
        suffix.extend(self.flatten_range(index..self.size));
        self.replace_suffix(index, suffix)
    }

    /// Removes the element at a possibly negative `index`, shifting the
    /// following elements down. A non-negative `index` past the end leaves
    /// the vector unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index < -len()`.
    pub fn delete_at(&self, index: isize) -> Result<Self, IndexOutOfRange> {
        let index = self.resolve(index)?;
        if index >= self.size {
            return Ok(self.clone());
        }
        let suffix = self.flatten_range(index + 1..self.size);
        self.replace_suffix(index, suffix)
    }

    /// Sets the element at a possibly negative `index`.
    ///
    /// Setting past the end grows the vector, padding the gap with
    /// `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index < -len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::VectorTrie;
    ///
    /// let vector: VectorTrie<i32> = (1..=3).collect();
    /// let grown = vector.set(5, 9).unwrap();
    /// assert_eq!(grown.flatten_range(0..6), vec![1, 2, 3, 0, 0, 9]);
    /// assert_eq!(vector.set(-1, 0).unwrap().last(), Some(&0));
    /// ```
    pub fn set(&self, index: isize, element: T) -> Result<Self, IndexOutOfRange>
    where
        T: Default,
    {
        let index = self.resolve(index)?;
        if index < self.size {
            let mut result = self.clone();
            *result.element_mut(index) = element;
            return Ok(result);
        }
        let padding = std::iter::repeat_with(T::default).take(index - self.size);
        self.replace_suffix(self.size, padding.chain(std::iter::once(element)))
    }

    /// Keeps the first `length` elements, sharing everything left of the
    /// cut.
    pub(crate) fn truncate(&self, length: usize) -> Self {
        if length >= self.size {
            return self.clone();
        }
        let Some(root) = &self.root else {
            return Self::new();
        };
        if length == 0 {
            return Self::new();
        }

        let level = level_for(length);
        let mut node = root;
        for _ in level..self.level {
            match node.as_ref() {
                VectorNode::Internal(children) => node = &children[0],
                VectorNode::Leaf(_) => {
                    unreachable!("vector trie corrupted: leaf above level 0")
                }
            }
        }

        Self {
            root: Some(Self::truncate_node(node, level * BITS_PER_LEVEL, length - 1)),
            size: length,
            level,
        }
    }

    /// Keeps the elements up to and including `last` below `node`.
    fn truncate_node(
        node: &ReferenceCounter<VectorNode<T>>,
        shift: usize,
        last: usize,
    ) -> ReferenceCounter<VectorNode<T>> {
        let slot = (last >> shift) & MASK;
        match node.as_ref() {
            VectorNode::Leaf(elements) => {
                if slot + 1 == elements.len() {
                    node.clone()
                } else {
                    ReferenceCounter::new(VectorNode::Leaf(
                        elements[..=slot].iter().cloned().collect(),
                    ))
                }
            }
            VectorNode::Internal(children) => {
                let child = Self::truncate_node(&children[slot], shift - BITS_PER_LEVEL, last);
                if slot + 1 == children.len() && ReferenceCounter::ptr_eq(&child, &children[slot])
                {
                    return node.clone();
                }
                let mut kept: Children<T> = children[..slot].iter().cloned().collect();
                kept.push(child);
                ReferenceCounter::new(VectorNode::Internal(kept))
            }
        }
    }

    /// Appends every item, consuming the vector.
    ///
    /// The partially filled rightmost leaf is topped up first; the rest is
    /// cut into full leaves that are grafted one by one onto the rightmost
    /// spine. Nodes shared with other vectors are copied on first touch,
    /// nodes created here are filled in place.
    pub(crate) fn extend_back<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut items = items.into_iter().fuse();

        if let Some(root) = self.root.as_mut() {
            let room = BRANCHING_FACTOR - (self.size & MASK);
            if room < BRANCHING_FACTOR {
                let top_up: Leaf<T> = items.by_ref().take(room).collect();
                if !top_up.is_empty() {
                    self.size += top_up.len();
                    Self::rightmost_leaf_mut(root).extend(top_up);
                }
            }
        }

        loop {
            let chunk: Leaf<T> = items.by_ref().take(BRANCHING_FACTOR).collect();
            if chunk.is_empty() {
                break;
            }
            let count = chunk.len();
            self.push_leaf(ReferenceCounter::new(VectorNode::Leaf(chunk)), count);
        }
        self
    }

    /// Grafts a leaf after the last (full) leaf. Requires `size % 32 == 0`.
    fn push_leaf(&mut self, leaf: ReferenceCounter<VectorNode<T>>, count: usize) {
        debug_assert_eq!(self.size & MASK, 0);

        match self.root.take() {
            None => {
                self.root = Some(leaf);
                self.level = 0;
            }
            Some(root) if self.size == capacity(self.level) => {
                let mut children = Children::new();
                children.push(root);
                children.push(VectorNode::new_path(self.level, leaf));
                self.root = Some(ReferenceCounter::new(VectorNode::Internal(children)));
                self.level += 1;
                log::trace!(
                    "vector trie grew to level {} at size {}",
                    self.level,
                    self.size + count
                );
            }
            Some(mut root) => {
                Self::push_leaf_into(&mut root, self.level * BITS_PER_LEVEL, self.size, leaf);
                self.root = Some(root);
            }
        }
        self.size += count;
    }

    fn push_leaf_into(
        node: &mut ReferenceCounter<VectorNode<T>>,
        shift: usize,
        size: usize,
        leaf: ReferenceCounter<VectorNode<T>>,
    ) {
        match ReferenceCounter::make_mut(node) {
            VectorNode::Internal(children) => {
                let slot = (size >> shift) & MASK;
                if slot < children.len() {
                    Self::push_leaf_into(&mut children[slot], shift - BITS_PER_LEVEL, size, leaf);
                } else {
                    children.push(VectorNode::new_path(shift / BITS_PER_LEVEL - 1, leaf));
                }
            }
            VectorNode::Leaf(_) => unreachable!("vector trie corrupted: leaf above level 0"),
        }
    }

    /// Mutable access to the rightmost leaf, copying shared nodes on the way.
    fn rightmost_leaf_mut(node: &mut ReferenceCounter<VectorNode<T>>) -> &mut Leaf<T> {
        match ReferenceCounter::make_mut(node) {
            VectorNode::Leaf(elements) => elements,
            VectorNode::Internal(children) => match children.last_mut() {
                Some(last) => Self::rightmost_leaf_mut(last),
                None => unreachable!("vector trie corrupted: internal node without children"),
            },
        }
    }

    /// Drops the rightmost leaf. Returns `true` if `node` became empty.
    fn remove_rightmost_leaf(node: &mut ReferenceCounter<VectorNode<T>>) -> bool {
        if matches!(node.as_ref(), VectorNode::Leaf(_)) {
            return true;
        }
        match ReferenceCounter::make_mut(node) {
            VectorNode::Internal(children) => {
                let emptied = match children.last_mut() {
                    Some(last) => Self::remove_rightmost_leaf(last),
                    None => unreachable!("vector trie corrupted: internal node without children"),
                };
                if emptied {
                    children.pop();
                }
                children.is_empty()
            }
            VectorNode::Leaf(_) => true,
        }
    }

    /// Removes root levels the current size no longer needs.
    fn shrink_levels(&mut self) {
        while self.level > 0 && self.size <= capacity(self.level - 1) {
            let next = match self.root.as_deref() {
                Some(VectorNode::Internal(children)) => children.first().cloned(),
                _ => None,
            };
            let Some(next) = next else {
                unreachable!("vector trie corrupted: missing child while shrinking")
            };
            self.root = Some(next);
            self.level -= 1;
            log::trace!(
                "vector trie shrank to level {} at size {}",
                self.level,
                self.size
            );
        }
    }

    /// Mutable access to the element at `index < len()`.
    fn element_mut(&mut self, index: usize) -> &mut T {
        let shift = self.level * BITS_PER_LEVEL;
        match self.root.as_mut() {
            Some(root) => Self::element_mut_in(root, shift, index),
            None => unreachable!("vector trie corrupted: non-empty vector without a root"),
        }
    }

    fn element_mut_in(
        node: &mut ReferenceCounter<VectorNode<T>>,
        shift: usize,
        index: usize,
    ) -> &mut T {
        match ReferenceCounter::make_mut(node) {
            VectorNode::Leaf(elements) => &mut elements[index & MASK],
            VectorNode::Internal(children) => Self::element_mut_in(
                &mut children[(index >> shift) & MASK],
                shift - BITS_PER_LEVEL,
                index,
            ),
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// A double-ended iterator over references to elements of a [`VectorTrie`].
///
/// Each end caches the leaf it is reading, so a full pass costs one descent
/// per leaf rather than one per element.
pub struct VectorTrieIterator<'a, T> {
    trie: &'a VectorTrie<T>,
    front: usize,
    back: usize,
    front_leaf: &'a [T],
    back_leaf: &'a [T],
}

impl<'a, T> Iterator for VectorTrieIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        if self.front_leaf.is_empty() {
            self.front_leaf = &self.trie.leaf_for(self.front)[self.front & MASK..];
        }
        let (element, rest) = self.front_leaf.split_first()?;
        self.front_leaf = rest;
        self.front += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for VectorTrieIterator<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        if self.back_leaf.is_empty() {
            let last = self.back - 1;
            self.back_leaf = &self.trie.leaf_for(last)[..=last & MASK];
        }
        let (element, rest) = self.back_leaf.split_last()?;
        self.back_leaf = rest;
        self.back -= 1;
        Some(element)
    }
}

impl<T> ExactSizeIterator for VectorTrieIterator<'_, T> {
    fn len(&self) -> usize {
        self.back - self.front
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for VectorTrie<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for VectorTrie<T> {
    /// Builds the trie bottom-up: elements are cut into leaves, leaves are
    /// grouped into internal nodes, and grouping repeats until one root
    /// remains.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut elements = iter.into_iter().fuse();
        let mut size = 0;
        let mut nodes: Vec<ReferenceCounter<VectorNode<T>>> = Vec::new();

        loop {
            let chunk: Leaf<T> = elements.by_ref().take(BRANCHING_FACTOR).collect();
            if chunk.is_empty() {
                break;
            }
            size += chunk.len();
            nodes.push(ReferenceCounter::new(VectorNode::Leaf(chunk)));
        }

        let mut level = 0;
        while nodes.len() > 1 {
            let mut parents = Vec::with_capacity(nodes.len().div_ceil(BRANCHING_FACTOR));
            let mut remaining = nodes.into_iter();
            loop {
                let children: Children<T> = remaining.by_ref().take(BRANCHING_FACTOR).collect();
                if children.is_empty() {
                    break;
                }
                parents.push(ReferenceCounter::new(VectorNode::Internal(children)));
            }
            nodes = parents;
            level += 1;
        }
        log::trace!("vector trie built with {size} elements at level {level}");

        Self {
            root: nodes.pop(),
            size,
            level,
        }
    }
}

impl<'a, T> IntoIterator for &'a VectorTrie<T> {
    type Item = &'a T;
    type IntoIter = VectorTrieIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for VectorTrie<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && (self.ptr_eq(other) || self.iter().eq(other.iter()))
    }
}

impl<T: Eq> Eq for VectorTrie<T> {}

impl<T: Hash> Hash for VectorTrie<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for VectorTrie<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

static_assertions::assert_impl_all!(VectorTrie<String>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
