#![cfg(feature = "persistent")]
//! Property-based tests for the hash trie engine.
//!
//! Every trie is checked against a `std::collections::HashMap` model built
//! from the same operations.

use perseus::persistent::Trie;
use proptest::prelude::*;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

// =============================================================================
// Strategy for generating test data
// =============================================================================

/// A key whose hash only depends on `key % 4`, forcing collision buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CrowdedKey(u16);

impl Hash for CrowdedKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0 % 4).hash(state);
    }
}

#[derive(Debug, Clone)]
enum Operation {
    Put(u16, i32),
    Delete(u16),
}

fn arbitrary_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (0..300_u16, any::<i32>()).prop_map(|(key, value)| Operation::Put(key, value)),
        1 => (0..300_u16).prop_map(Operation::Delete),
    ]
}

fn arbitrary_operations() -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(arbitrary_operation(), 0..200)
}

fn apply<K, F>(operations: &[Operation], make_key: F) -> (Trie<K, i32>, HashMap<K, i32>)
where
    K: Clone + Hash + Eq,
    F: Fn(u16) -> K,
{
    let mut trie = Trie::new();
    let mut model = HashMap::new();
    for operation in operations {
        match *operation {
            Operation::Put(key, value) => {
                trie = trie.put(make_key(key), value);
                model.insert(make_key(key), value);
            }
            Operation::Delete(key) => {
                trie = trie.delete(&make_key(key));
                model.remove(&make_key(key));
            }
        }
    }
    (trie, model)
}

// =============================================================================
// Model Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_matches_hash_map_model(operations in arbitrary_operations()) {
        let (trie, model) = apply(&operations, |key| key);

        prop_assert_eq!(trie.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(trie.get(key), Some(value));
        }
        prop_assert_eq!(trie.iter().count(), model.len());
    }

    #[test]
    fn prop_matches_model_under_collisions(operations in arbitrary_operations()) {
        let (trie, model) = apply(&operations, CrowdedKey);

        prop_assert_eq!(trie.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(trie.get(key), Some(value));
        }
        for key in (0..300).map(CrowdedKey) {
            prop_assert_eq!(trie.contains_key(&key), model.contains_key(&key));
        }
    }

    #[test]
    fn prop_bulk_put_equals_sequential_put(operations in arbitrary_operations()) {
        let pairs: Vec<(u16, i32)> = operations
            .iter()
            .filter_map(|operation| match *operation {
                Operation::Put(key, value) => Some((key, value)),
                Operation::Delete(_) => None,
            })
            .collect();

        let sequential = pairs
            .iter()
            .fold(Trie::new(), |trie, &(key, value)| trie.put(key, value));
        let bulk: Trie<u16, i32> = pairs.into_iter().collect();

        prop_assert_eq!(bulk, sequential);
    }
}

// =============================================================================
// Persistence Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_put_leaves_original_untouched(
        operations in arbitrary_operations(),
        key in 0..300_u16,
        value in any::<i32>()
    ) {
        let (trie, model) = apply(&operations, |key| key);
        let updated = trie.put(key, value);

        prop_assert_eq!(updated.get(&key), Some(&value));
        prop_assert_eq!(trie.get(&key), model.get(&key));
        prop_assert_eq!(trie.len(), model.len());
    }

    #[test]
    fn prop_put_existing_is_identity(operations in arbitrary_operations()) {
        let (trie, model) = apply(&operations, |key| key);
        for (key, value) in model {
            prop_assert!(trie.put(key, value).ptr_eq(&trie));
        }
    }

    #[test]
    fn prop_delete_then_put_round_trips(operations in arbitrary_operations()) {
        let (trie, model) = apply(&operations, CrowdedKey);
        for (key, value) in model {
            let restored = trie.delete(&key).put(key.clone(), value);
            prop_assert_eq!(&restored, &trie);
        }
    }

    #[test]
    fn prop_delete_absent_is_identity(operations in arbitrary_operations()) {
        let (trie, _) = apply(&operations, |key| key);
        prop_assert!(trie.delete(&1000_u16).ptr_eq(&trie));
    }
}

// =============================================================================
// Traversal Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_reverse_iter_mirrors_iter(operations in arbitrary_operations()) {
        let (trie, _) = apply(&operations, CrowdedKey);
        let forward: Vec<_> = trie.iter().collect();
        let mut backward: Vec<_> = trie.reverse_iter().collect();
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn prop_at_agrees_with_iteration(operations in arbitrary_operations()) {
        let (trie, _) = apply(&operations, |key| key);
        for (ordinal, entry) in trie.iter().enumerate() {
            prop_assert_eq!(trie.at(ordinal), Some(entry));
        }
        prop_assert_eq!(trie.at(trie.len()), None);
    }
}
