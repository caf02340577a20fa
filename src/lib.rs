//! # perseus
//!
//! Persistent (immutable) collections built on three structural-sharing
//! engines:
//!
//! - **Hash trie** ([`persistent::Trie`]): a HAMT keyed by 5-bit slices of a
//!   32-bit hash, with collision buckets.
//! - **Vector trie** ([`persistent::VectorTrie`]): a 32-way bit-partitioned
//!   trie for dense indexed sequences.
//! - **Lazy list** ([`persistent::LazyList`]): a cons list whose tails may be
//!   deferred and are memoized once forced, so infinite sequences are fine.
//!
//! On top of the engines sit thin facades: [`persistent::PersistentHashMap`],
//! [`persistent::PersistentHashSet`], [`persistent::PersistentVector`] and
//! [`persistent::PersistentDeque`].
//!
//! Every update returns a new value; the original is never modified. All
//! types are `Send + Sync` when their elements are, so published values can
//! be read from any number of threads without locking.
//!
//! ## Feature Flags
//!
//! - `control`: the memo cell ([`control::Suspension`]) used by lazy lists
//! - `persistent`: the engines and facades
//! - `serde`: `Serialize`/`Deserialize` for the facades
//! - `fxhash` / `ahash`: alternative hashers for the hash trie
//! - `full`: everything above except the hasher choice
//!
//! ## Example
//!
//! ```rust
//! use perseus::prelude::*;
//!
//! let map = PersistentHashMap::new().insert("a", 1);
//! assert_eq!(map.get("a"), Some(&1));
//!
//! let primes = LazyList::interval(2_u64, u64::MAX)
//!     .filter(|&n| (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0))
//!     .take(4);
//! assert_eq!(primes.to_vec(), vec![2, 3, 5, 7]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use perseus::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "control")]
    pub use crate::control::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;
}

#[cfg(feature = "control")]
pub mod control;

#[cfg(feature = "persistent")]
pub mod persistent;
