//! Persistent hash array mapped trie (HAMT).
//!
//! This module provides [`Trie`], the associative engine underneath
//! [`PersistentHashMap`](super::PersistentHashMap) and
//! [`PersistentHashSet`](super::PersistentHashSet).
//!
//! # Overview
//!
//! Keys are hashed to 32 bits. Each branch consumes the next 5-bit slice of
//! the hash (32-way branching), so a lookup touches at most 7 branches.
//!
//! - O(log32 N) `get`, `put`, `delete` (effectively O(1))
//! - O(log32 N) `at` by traversal position
//! - O(1) `len` and `is_empty`
//!
//! Updates copy only the branches on the path from the root to the changed
//! entry; all sibling subtrees are shared with the original trie.
//!
//! # Internal Structure
//!
//! - `Empty`: the empty trie; allocation-free, so every empty trie is the
//!   same value
//! - `Leaf`: one entry, carrying its full hash
//! - `Collision`: entries whose keys differ but whose hashes are equal
//! - `Branch`: a 32-bit occupancy bitmap plus exactly `popcount(bitmap)`
//!   children, none of them `Empty`, and the number of entries below it
//!
//! # Examples
//!
//! ```rust
//! use perseus::persistent::Trie;
//!
//! let trie = Trie::new().put("one", 1).put("two", 2);
//! assert_eq!(trie.get("one"), Some(&1));
//!
//! let removed = trie.delete("one");
//! assert_eq!(removed.get("one"), None);
//! assert_eq!(trie.get("one"), Some(&1)); // Original unchanged
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

use super::ReferenceCounter;

// =============================================================================
// Constants
// =============================================================================

/// Bits of the hash consumed per branch level.
const BITS_PER_LEVEL: u32 = 5;

/// Bit mask for extracting a slot within a branch.
const MASK: u32 = (1 << BITS_PER_LEVEL) - 1;

/// Number of branch levels a 32-bit hash can feed (`ceil(32 / 5)`).
const MAX_DEPTH: u32 = 7;

/// Collision buckets stay unbounded; past this size a warning is logged.
pub(crate) const COLLISION_WARNING_THRESHOLD: usize = 8;

// =============================================================================
// Hash computation
// =============================================================================

#[cfg(feature = "fxhash")]
type KeyHasher = rustc_hash::FxHasher;

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
type KeyHasher = ahash::AHasher;

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
type KeyHasher = std::collections::hash_map::DefaultHasher;

/// Computes the 32-bit trie hash of a key.
#[allow(clippy::cast_possible_truncation)]
fn compute_hash<Q: Hash + ?Sized>(key: &Q) -> u32 {
    let mut hasher = KeyHasher::default();
    key.hash(&mut hasher);
    let wide = hasher.finish();
    (wide ^ (wide >> 32)) as u32
}

/// Extracts the branch slot at a given depth from a hash.
#[inline]
const fn hash_index(hash: u32, depth: u32) -> u32 {
    debug_assert!(depth < MAX_DEPTH);
    (hash >> (depth * BITS_PER_LEVEL)) & MASK
}

// =============================================================================
// Node Definition
// =============================================================================

/// A single key-value entry.
#[derive(Clone)]
struct Leaf<K, V> {
    hash: u32,
    key: K,
    value: V,
}

/// Entries with distinct keys and one shared hash.
#[derive(Clone)]
struct CollisionBucket<K, V> {
    hash: u32,
    entries: SmallVec<[(K, V); 2]>,
}

/// Bitmap-compressed interior node.
#[derive(Clone)]
struct Branch<K, V> {
    bitmap: u32,
    /// Number of entries in this subtree.
    size: usize,
    children: Vec<TrieNode<K, V>>,
}

impl<K, V> Branch<K, V> {
    /// Position in `children` of the slot selected by `bit`.
    #[inline]
    const fn position(&self, bit: u32) -> usize {
        (self.bitmap & (bit - 1)).count_ones() as usize
    }
}

/// Internal node structure for the HAMT.
enum TrieNode<K, V> {
    Empty,
    Leaf(ReferenceCounter<Leaf<K, V>>),
    Collision(ReferenceCounter<CollisionBucket<K, V>>),
    Branch(ReferenceCounter<Branch<K, V>>),
}

impl<K, V> Clone for TrieNode<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Leaf(leaf) => Self::Leaf(leaf.clone()),
            Self::Collision(bucket) => Self::Collision(bucket.clone()),
            Self::Branch(branch) => Self::Branch(branch.clone()),
        }
    }
}

impl<K, V> TrieNode<K, V> {
    fn leaf(hash: u32, key: K, value: V) -> Self {
        Self::Leaf(ReferenceCounter::new(Leaf { hash, key, value }))
    }

    fn size(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Leaf(_) => 1,
            Self::Collision(bucket) => bucket.entries.len(),
            Self::Branch(branch) => branch.size,
        }
    }

    /// Hash shared by every entry of a leaf or collision bucket.
    fn entry_hash(&self) -> Option<u32> {
        match self {
            Self::Leaf(leaf) => Some(leaf.hash),
            Self::Collision(bucket) => Some(bucket.hash),
            Self::Empty | Self::Branch(_) => None,
        }
    }

    /// Identity comparison: `true` when both nodes are the same allocation.
    fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Leaf(left), Self::Leaf(right)) => ReferenceCounter::ptr_eq(left, right),
            (Self::Collision(left), Self::Collision(right)) => {
                ReferenceCounter::ptr_eq(left, right)
            }
            (Self::Branch(left), Self::Branch(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Combines two nodes whose hashes differ into the smallest subtree
    /// holding both, starting at `depth`.
    fn merge(first: Self, first_hash: u32, second: Self, second_hash: u32, depth: u32) -> Self {
        debug_assert_ne!(first_hash, second_hash);
        let first_index = hash_index(first_hash, depth);
        let second_index = hash_index(second_hash, depth);
        let size = first.size() + second.size();

        let (bitmap, children) = if first_index == second_index {
            let subtree = Self::merge(first, first_hash, second, second_hash, depth + 1);
            (1u32 << first_index, vec![subtree])
        } else if first_index < second_index {
            (
                (1u32 << first_index) | (1u32 << second_index),
                vec![first, second],
            )
        } else {
            (
                (1u32 << first_index) | (1u32 << second_index),
                vec![second, first],
            )
        };

        Self::Branch(ReferenceCounter::new(Branch {
            bitmap,
            size,
            children,
        }))
    }
}

impl<K: Clone, V: Clone> TrieNode<K, V> {
    /// Adds a new entry next to an existing leaf or collision bucket whose
    /// key differs from `key`.
    fn join(existing: Self, hash: u32, key: K, value: V, depth: u32) -> Self {
        let Some(existing_hash) = existing.entry_hash() else {
            unreachable!("trie corrupted: join called on a branch or empty node")
        };

        if existing_hash != hash {
            return Self::merge(existing, existing_hash, Self::leaf(hash, key, value), hash, depth);
        }

        let mut entries: SmallVec<[(K, V); 2]> = SmallVec::new();
        match &existing {
            Self::Leaf(leaf) => entries.push((leaf.key.clone(), leaf.value.clone())),
            Self::Collision(bucket) => entries.extend(bucket.entries.iter().cloned()),
            Self::Empty | Self::Branch(_) => {}
        }
        entries.push((key, value));
        warn_if_bucket_large(hash, entries.len());

        Self::Collision(ReferenceCounter::new(CollisionBucket { hash, entries }))
    }
}

fn warn_if_bucket_large(hash: u32, length: usize) {
    if length > COLLISION_WARNING_THRESHOLD {
        log::warn!(
            "hash trie collision bucket for hash {hash:#010x} holds {length} entries; \
             lookups in it are linear"
        );
    }
}

// =============================================================================
// Trie Definition
// =============================================================================

/// A persistent (immutable) hash array mapped trie.
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `new`          | O(1)       |
/// | `get`          | O(log32 N) |
/// | `put`          | O(log32 N) |
/// | `delete`       | O(log32 N) |
/// | `at`           | O(log32 N) |
/// | `len`          | O(1)       |
/// | `bulk_put`     | O(M log32 N) with in-place node reuse |
///
/// # Examples
///
/// ```rust
/// use perseus::persistent::Trie;
///
/// let trie: Trie<String, i32> = [("a".to_string(), 1), ("b".to_string(), 2)]
///     .into_iter()
///     .collect();
/// assert_eq!(trie.len(), 2);
/// assert_eq!(trie.get("b"), Some(&2));
/// ```
pub struct Trie<K, V> {
    root: TrieNode<K, V>,
}

impl<K, V> Clone for Trie<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<K, V> Trie<K, V> {
    /// Creates the empty trie. No allocation takes place.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: TrieNode::Empty,
        }
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.size()
    }

    /// Returns `true` if the trie holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.root, TrieNode::Empty)
    }

    /// Returns `true` when both tries share the same root node.
    ///
    /// Operations that leave a trie unchanged (re-putting an equal value,
    /// deleting an absent key) return a trie for which this holds.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.root.ptr_eq(&other.root)
    }

    /// Returns the entry at position `ordinal` of the traversal order used
    /// by [`iter`](Self::iter), or `None` if `ordinal >= len()`.
    ///
    /// # Panics
    ///
    /// Panics if the trie's cached subtree sizes are inconsistent, which
    /// indicates corruption.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::Trie;
    ///
    /// let trie: Trie<i32, i32> = (0..100).map(|key| (key, key)).collect();
    /// let by_iteration: Vec<_> = trie.iter().collect();
    /// assert_eq!(trie.at(37), Some(by_iteration[37]));
    /// assert_eq!(trie.at(100), None);
    /// ```
    #[must_use]
    pub fn at(&self, ordinal: usize) -> Option<(&K, &V)> {
        if ordinal >= self.len() {
            return None;
        }

        let mut node = &self.root;
        let mut remaining = ordinal;

        loop {
            match node {
                TrieNode::Empty => {
                    unreachable!("trie corrupted: empty node inside a non-empty subtree")
                }
                TrieNode::Leaf(leaf) => {
                    assert_eq!(remaining, 0, "trie corrupted: leaf size mismatch");
                    return Some((&leaf.key, &leaf.value));
                }
                TrieNode::Collision(bucket) => {
                    let (key, value) = &bucket.entries[remaining];
                    return Some((key, value));
                }
                TrieNode::Branch(branch) => {
                    let mut next = None;
                    for child in &branch.children {
                        let child_size = child.size();
                        if remaining < child_size {
                            next = Some(child);
                            break;
                        }
                        remaining -= child_size;
                    }
                    match next {
                        Some(child) => node = child,
                        None => unreachable!("trie corrupted: branch size exceeds its children"),
                    }
                }
            }
        }
    }

    /// Returns an iterator over entries in ascending slot order.
    ///
    /// The order is deterministic for a given trie but unrelated to key
    /// ordering.
    #[must_use]
    pub fn iter(&self) -> TrieIterator<'_, K, V> {
        TrieIterator::new(&self.root, false)
    }

    /// Returns an iterator over entries in exactly the reverse of
    /// [`iter`](Self::iter)'s order.
    #[must_use]
    pub fn reverse_iter(&self) -> TrieIterator<'_, K, V> {
        TrieIterator::new(&self.root, true)
    }

    /// Calls `visitor` on every entry in traversal order.
    pub fn each<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self.iter() {
            visitor(key, value);
        }
    }

    /// Calls `visitor` on every entry in reverse traversal order.
    pub fn reverse_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self.reverse_iter() {
            visitor(key, value);
        }
    }
}

impl<K: Hash + Eq, V> Trie<K, V> {
    /// Returns a reference to the value stored for `key`.
    ///
    /// The key may be any borrowed form of the trie's key type, but `Hash`
    /// and `Eq` on the borrowed form must match those for the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::Trie;
    ///
    /// let trie = Trie::new().put("hello".to_string(), 42);
    /// assert_eq!(trie.get("hello"), Some(&42));
    /// assert_eq!(trie.get("world"), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the stored key and value for `key`.
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = compute_hash(key);
        let mut node = &self.root;
        let mut depth = 0;

        loop {
            match node {
                TrieNode::Empty => return None,
                TrieNode::Leaf(leaf) => {
                    return (leaf.hash == hash && leaf.key.borrow() == key)
                        .then_some((&leaf.key, &leaf.value));
                }
                TrieNode::Collision(bucket) => {
                    if bucket.hash != hash {
                        return None;
                    }
                    return bucket
                        .entries
                        .iter()
                        .find(|(entry_key, _)| entry_key.borrow() == key)
                        .map(|(entry_key, value)| (entry_key, value));
                }
                TrieNode::Branch(branch) => {
                    let bit = 1u32 << hash_index(hash, depth);
                    if branch.bitmap & bit == 0 {
                        return None;
                    }
                    node = &branch.children[branch.position(bit)];
                    depth += 1;
                }
            }
        }
    }

    /// Returns `true` if the trie holds an entry for `key`.
    #[inline]
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).is_some()
    }
}

impl<K: Clone + Hash + Eq, V: Clone> Trie<K, V> {
    /// Removes `key`, returning the new trie.
    ///
    /// A branch left holding a single leaf or collision bucket is replaced by
    /// that child. If `key` is absent, the returned trie shares the original
    /// root ([`ptr_eq`](Self::ptr_eq) holds).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::Trie;
    ///
    /// let trie = Trie::new().put("a", 1).put("b", 2);
    /// let removed = trie.delete("a");
    /// assert_eq!(removed.len(), 1);
    /// assert_eq!(trie.len(), 2);
    ///
    /// let unchanged = trie.delete("zzz");
    /// assert!(unchanged.ptr_eq(&trie));
    /// ```
    #[must_use]
    pub fn delete<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = compute_hash(key);
        Self::delete_from_node(&self.root, key, hash, 0)
            .map_or_else(|| self.clone(), |root| Self { root })
    }

    /// Recursive helper for delete. `None` means the key was not found.
    fn delete_from_node<Q>(
        node: &TrieNode<K, V>,
        key: &Q,
        hash: u32,
        depth: u32,
    ) -> Option<TrieNode<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match node {
            TrieNode::Empty => None,
            TrieNode::Leaf(leaf) => {
                (leaf.hash == hash && leaf.key.borrow() == key).then_some(TrieNode::Empty)
            }
            TrieNode::Collision(bucket) => {
                if bucket.hash != hash {
                    return None;
                }
                let found = bucket
                    .entries
                    .iter()
                    .position(|(entry_key, _)| entry_key.borrow() == key)?;
                Some(Self::remove_from_bucket(bucket, found))
            }
            TrieNode::Branch(branch) => {
                let bit = 1u32 << hash_index(hash, depth);
                if branch.bitmap & bit == 0 {
                    return None;
                }
                let position = branch.position(bit);
                let new_child =
                    Self::delete_from_node(&branch.children[position], key, hash, depth + 1)?;
                Some(Self::rebuild_branch(branch, bit, position, new_child))
            }
        }
    }

    fn remove_from_bucket(bucket: &CollisionBucket<K, V>, found: usize) -> TrieNode<K, V> {
        let mut entries = bucket.entries.clone();
        entries.remove(found);

        if entries.len() == 1 {
            let (key, value) = entries.remove(0);
            TrieNode::leaf(bucket.hash, key, value)
        } else {
            TrieNode::Collision(ReferenceCounter::new(CollisionBucket {
                hash: bucket.hash,
                entries,
            }))
        }
    }

    /// Rebuilds `branch` after the child at `position` shrank to `new_child`,
    /// collapsing the branch into its last remaining entry node if possible.
    fn rebuild_branch(
        branch: &Branch<K, V>,
        bit: u32,
        position: usize,
        new_child: TrieNode<K, V>,
    ) -> TrieNode<K, V> {
        let mut bitmap = branch.bitmap;
        let mut children = branch.children.clone();

        if matches!(new_child, TrieNode::Empty) {
            bitmap &= !bit;
            children.remove(position);
        } else {
            children[position] = new_child;
        }

        match children.len() {
            0 => TrieNode::Empty,
            1 if children[0].entry_hash().is_some() => children.remove(0),
            _ => TrieNode::Branch(ReferenceCounter::new(Branch {
                bitmap,
                size: branch.size - 1,
                children,
            })),
        }
    }
}

impl<K: Clone + Hash + Eq, V: Clone + PartialEq> Trie<K, V> {
    /// Associates `value` with `key`, returning the new trie.
    ///
    /// Only the branches on the path to the entry are copied. If `key`
    /// already maps to an equal value the original trie is returned
    /// unchanged ([`ptr_eq`](Self::ptr_eq) holds).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::Trie;
    ///
    /// let empty = Trie::new();
    /// let trie = empty.put("a", 1);
    /// assert_eq!(trie.get("a"), Some(&1));
    /// assert!(!empty.contains_key("a"));
    ///
    /// assert!(trie.put("a", 1).ptr_eq(&trie));
    /// ```
    #[must_use]
    pub fn put(&self, key: K, value: V) -> Self {
        let hash = compute_hash(&key);
        Self::put_into_node(&self.root, key, value, hash, 0)
            .map_or_else(|| self.clone(), |root| Self { root })
    }

    /// Recursive helper for put. `None` means the trie already holds an equal
    /// entry.
    fn put_into_node(
        node: &TrieNode<K, V>,
        key: K,
        value: V,
        hash: u32,
        depth: u32,
    ) -> Option<TrieNode<K, V>> {
        match node {
            TrieNode::Empty => Some(TrieNode::leaf(hash, key, value)),
            TrieNode::Leaf(leaf) if leaf.hash == hash && leaf.key == key => {
                (leaf.value != value).then(|| TrieNode::leaf(hash, key, value))
            }
            TrieNode::Collision(bucket) if bucket.hash == hash => {
                Self::put_into_bucket(bucket, key, value)
            }
            TrieNode::Leaf(_) | TrieNode::Collision(_) => {
                Some(TrieNode::join(node.clone(), hash, key, value, depth))
            }
            TrieNode::Branch(branch) => {
                let bit = 1u32 << hash_index(hash, depth);
                let position = branch.position(bit);

                if branch.bitmap & bit == 0 {
                    let mut children = Vec::with_capacity(branch.children.len() + 1);
                    children.extend_from_slice(&branch.children[..position]);
                    children.push(TrieNode::leaf(hash, key, value));
                    children.extend_from_slice(&branch.children[position..]);
                    return Some(TrieNode::Branch(ReferenceCounter::new(Branch {
                        bitmap: branch.bitmap | bit,
                        size: branch.size + 1,
                        children,
                    })));
                }

                let old_child = &branch.children[position];
                let new_child = Self::put_into_node(old_child, key, value, hash, depth + 1)?;
                let size = branch.size - old_child.size() + new_child.size();
                let mut children = branch.children.clone();
                children[position] = new_child;
                Some(TrieNode::Branch(ReferenceCounter::new(Branch {
                    bitmap: branch.bitmap,
                    size,
                    children,
                })))
            }
        }
    }

    fn put_into_bucket(
        bucket: &CollisionBucket<K, V>,
        key: K,
        value: V,
    ) -> Option<TrieNode<K, V>> {
        let mut entries = bucket.entries.clone();
        match entries.iter_mut().find(|(entry_key, _)| *entry_key == key) {
            Some((_, existing)) if *existing == value => return None,
            Some((_, existing)) => *existing = value,
            None => {
                entries.push((key, value));
                warn_if_bucket_large(bucket.hash, entries.len());
            }
        }
        Some(TrieNode::Collision(ReferenceCounter::new(CollisionBucket {
            hash: bucket.hash,
            entries,
        })))
    }

    /// Inserts many pairs, consuming the trie.
    ///
    /// Nodes owned solely by this trie are updated in place; nodes still
    /// shared with other tries are copied first, so no other trie ever sees
    /// a change. Later pairs win over earlier ones with the same key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perseus::persistent::Trie;
    ///
    /// let base = Trie::new().put(0, "zero");
    /// let bulk = base.clone().bulk_put((1..100).map(|key| (key, "many")));
    /// assert_eq!(bulk.len(), 100);
    /// assert_eq!(base.len(), 1);
    /// ```
    #[must_use]
    pub fn bulk_put<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut inserted = 0usize;
        for (key, value) in pairs {
            let hash = compute_hash(&key);
            if Self::put_in_place(&mut self.root, key, value, hash, 0) {
                inserted += 1;
            }
        }
        log::trace!(
            "hash trie bulk build added {inserted} entries (now {})",
            self.len()
        );
        self
    }

    /// In-place helper for `bulk_put`. Returns `true` if a new entry was added.
    fn put_in_place(node: &mut TrieNode<K, V>, key: K, value: V, hash: u32, depth: u32) -> bool {
        match node {
            TrieNode::Empty => {
                *node = TrieNode::leaf(hash, key, value);
                return true;
            }
            TrieNode::Leaf(leaf) if leaf.hash == hash && leaf.key == key => {
                if leaf.value != value {
                    ReferenceCounter::make_mut(leaf).value = value;
                }
                return false;
            }
            TrieNode::Collision(bucket) if bucket.hash == hash => {
                let bucket = ReferenceCounter::make_mut(bucket);
                if let Some((_, existing)) = bucket
                    .entries
                    .iter_mut()
                    .find(|(entry_key, _)| *entry_key == key)
                {
                    *existing = value;
                    return false;
                }
                bucket.entries.push((key, value));
                warn_if_bucket_large(bucket.hash, bucket.entries.len());
                return true;
            }
            TrieNode::Branch(branch) => {
                let branch = ReferenceCounter::make_mut(branch);
                let bit = 1u32 << hash_index(hash, depth);
                let position = branch.position(bit);

                let added = if branch.bitmap & bit == 0 {
                    branch.bitmap |= bit;
                    branch
                        .children
                        .insert(position, TrieNode::leaf(hash, key, value));
                    true
                } else {
                    Self::put_in_place(&mut branch.children[position], key, value, hash, depth + 1)
                };
                if added {
                    branch.size += 1;
                }
                return added;
            }
            TrieNode::Leaf(_) | TrieNode::Collision(_) => {}
        }

        let existing = std::mem::replace(node, TrieNode::Empty);
        *node = TrieNode::join(existing, hash, key, value, depth);
        true
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over the entries of a [`Trie`].
///
/// Walks the trie with an explicit stack, so deep or wide tries never grow
/// the call stack.
pub struct TrieIterator<'a, K, V> {
    stack: Vec<&'a TrieNode<K, V>>,
    bucket: std::slice::Iter<'a, (K, V)>,
    reverse: bool,
    remaining: usize,
}

impl<'a, K, V> TrieIterator<'a, K, V> {
    fn new(root: &'a TrieNode<K, V>, reverse: bool) -> Self {
        let mut stack = Vec::with_capacity(MAX_DEPTH as usize * 4);
        stack.push(root);
        Self {
            stack,
            bucket: std::slice::Iter::default(),
            reverse,
            remaining: root.size(),
        }
    }
}

impl<'a, K, V> Iterator for TrieIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pending = if self.reverse {
                self.bucket.next_back()
            } else {
                self.bucket.next()
            };
            if let Some((key, value)) = pending {
                self.remaining -= 1;
                return Some((key, value));
            }

            match self.stack.pop()? {
                TrieNode::Empty => {}
                TrieNode::Leaf(leaf) => {
                    self.remaining -= 1;
                    return Some((&leaf.key, &leaf.value));
                }
                TrieNode::Collision(bucket) => self.bucket = bucket.entries.iter(),
                TrieNode::Branch(branch) => {
                    if self.reverse {
                        self.stack.extend(branch.children.iter());
                    } else {
                        self.stack.extend(branch.children.iter().rev());
                    }
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for TrieIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for Trie<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Hash + Eq, V: Clone + PartialEq> FromIterator<(K, V)> for Trie<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new().bulk_put(iter)
    }
}

impl<'a, K, V> IntoIterator for &'a Trie<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = TrieIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for Trie<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Hash + Eq, V: Eq> Eq for Trie<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Trie<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

static_assertions::assert_impl_all!(Trie<String, i32>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
