//! Persistent (immutable) data structures.
//!
//! Three engines do the structural work:
//!
//! - [`Trie`]: hash array mapped trie (HAMT) for associative data
//! - [`VectorTrie`]: 32-way bit-partitioned trie for indexed sequences
//! - [`LazyList`]: cons list with memoized deferred tails
//!
//! and four facades wrap them with collection-shaped APIs:
//!
//! - [`PersistentHashMap`] and [`PersistentHashSet`] over [`Trie`]
//! - [`PersistentVector`] over [`VectorTrie`]
//! - [`PersistentDeque`] over a pair of [`LazyList`]s
//!
//! # Structural Sharing
//!
//! Updates copy only the nodes on the path to the change; everything else is
//! shared by reference with the original value, which stays valid and
//! unchanged.
//!
//! # Examples
//!
//! ## `Trie`
//!
//! ```rust
//! use perseus::persistent::Trie;
//!
//! let empty: Trie<&str, i32> = Trie::new();
//! let trie = empty.put("a", 1);
//! assert_eq!(trie.get("a"), Some(&1));
//! assert!(!empty.contains_key("a")); // Original unchanged
//! ```
//!
//! ## `VectorTrie`
//!
//! ```rust
//! use perseus::persistent::VectorTrie;
//!
//! let vector: VectorTrie<i32> = (0..1000).collect();
//! let updated = vector.update(500, -1).unwrap();
//! assert_eq!(updated.get(500), Some(&-1));
//! assert_eq!(vector.get(500), Some(&500)); // Original unchanged
//! ```
//!
//! ## `LazyList`
//!
//! ```rust
//! use perseus::persistent::LazyList;
//!
//! let naturals = LazyList::iterate(0_u64, |n| n + 1);
//! let squares = naturals.map(|n| n * n).take(5);
//! assert_eq!(squares.to_vec(), vec![0, 1, 4, 9, 16]);
//! ```
//!
//! ## `PersistentDeque`
//!
//! ```rust
//! use perseus::persistent::PersistentDeque;
//!
//! let deque: PersistentDeque<i32> = (1..=3).collect();
//! let (rest, front) = deque.push_front(0).pop_front().unwrap();
//! assert_eq!(front, 0);
//! assert_eq!(rest, deque);
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type shared by every engine.
///
/// Always `std::sync::Arc`: published values must be readable from any
/// thread, and lazy lists hand their memo cells across threads.
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

mod deque;
mod error;
mod hashmap;
mod hashset;
mod lazy_list;
mod trie;
mod vector;
mod vector_trie;

pub use deque::PersistentDeque;
pub use deque::PersistentDequeIterator;
pub use error::IndexOutOfRange;
pub use hashmap::PersistentHashMap;
pub use hashmap::PersistentHashMapIterator;
pub use hashset::PersistentHashSet;
pub use hashset::PersistentHashSetIterator;
pub use lazy_list::LazyList;
pub use lazy_list::LazyListIterator;
pub use trie::Trie;
pub use trie::TrieIterator;
pub use vector::PersistentVector;
pub use vector_trie::VectorTrie;
pub use vector_trie::VectorTrieIterator;

// =============================================================================
// Tests
// =============================================================================
