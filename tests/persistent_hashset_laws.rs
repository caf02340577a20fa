#![cfg(feature = "persistent")]
//! Property-based tests for PersistentHashSet.
//!
//! The set algebra is checked against `std::collections::HashSet`.

use perseus::persistent::PersistentHashSet;
use proptest::prelude::*;
use std::collections::HashSet;

// =============================================================================
// Strategy for generating test data
// =============================================================================

fn arbitrary_elements() -> impl Strategy<Value = Vec<u16>> {
    prop::collection::vec(0..500_u16, 0..120)
}

fn to_model(set: &PersistentHashSet<u16>) -> HashSet<u16> {
    set.iter().copied().collect()
}

// =============================================================================
// Membership Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_contains_after_insert(elements in arbitrary_elements(), element in 0..500_u16) {
        let set: PersistentHashSet<u16> = elements.into_iter().collect();
        prop_assert!(set.insert(element).contains(&element));
    }

    #[test]
    fn prop_not_contains_after_remove(elements in arbitrary_elements(), element in 0..500_u16) {
        let set: PersistentHashSet<u16> = elements.into_iter().collect();
        prop_assert!(!set.remove(&element).contains(&element));
    }

    #[test]
    fn prop_insert_is_idempotent(elements in arbitrary_elements(), element in 0..500_u16) {
        let set: PersistentHashSet<u16> = elements.into_iter().collect();
        let once = set.insert(element);
        let twice = once.insert(element);

        prop_assert!(twice.ptr_eq(&once));
        prop_assert_eq!(twice.len(), once.len());
    }

    #[test]
    fn prop_length_matches_model(elements in arbitrary_elements()) {
        let model: HashSet<u16> = elements.iter().copied().collect();
        let set: PersistentHashSet<u16> = elements.into_iter().collect();
        prop_assert_eq!(set.len(), model.len());
        prop_assert_eq!(to_model(&set), model);
    }
}

// =============================================================================
// Set Algebra Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_union_matches_model(left in arbitrary_elements(), right in arbitrary_elements()) {
        let first: PersistentHashSet<u16> = left.iter().copied().collect();
        let second: PersistentHashSet<u16> = right.iter().copied().collect();
        let expected: HashSet<u16> = left.into_iter().chain(right).collect();

        prop_assert_eq!(to_model(&first.union(&second)), expected);
    }

    #[test]
    fn prop_intersection_matches_model(left in arbitrary_elements(), right in arbitrary_elements()) {
        let first: PersistentHashSet<u16> = left.iter().copied().collect();
        let second: PersistentHashSet<u16> = right.iter().copied().collect();
        let expected: HashSet<u16> = to_model(&first)
            .intersection(&to_model(&second))
            .copied()
            .collect();

        prop_assert_eq!(to_model(&first.intersection(&second)), expected);
    }

    #[test]
    fn prop_difference_matches_model(left in arbitrary_elements(), right in arbitrary_elements()) {
        let first: PersistentHashSet<u16> = left.iter().copied().collect();
        let second: PersistentHashSet<u16> = right.iter().copied().collect();
        let expected: HashSet<u16> = to_model(&first)
            .difference(&to_model(&second))
            .copied()
            .collect();

        prop_assert_eq!(to_model(&first.difference(&second)), expected);
    }

    #[test]
    fn prop_symmetric_difference_matches_model(
        left in arbitrary_elements(),
        right in arbitrary_elements()
    ) {
        let first: PersistentHashSet<u16> = left.iter().copied().collect();
        let second: PersistentHashSet<u16> = right.iter().copied().collect();
        let expected: HashSet<u16> = to_model(&first)
            .symmetric_difference(&to_model(&second))
            .copied()
            .collect();

        prop_assert_eq!(to_model(&first.symmetric_difference(&second)), expected);
    }

    #[test]
    fn prop_union_is_commutative(left in arbitrary_elements(), right in arbitrary_elements()) {
        let first: PersistentHashSet<u16> = left.into_iter().collect();
        let second: PersistentHashSet<u16> = right.into_iter().collect();
        prop_assert_eq!(first.union(&second), second.union(&first));
    }

    #[test]
    fn prop_subset_of_union(left in arbitrary_elements(), right in arbitrary_elements()) {
        let first: PersistentHashSet<u16> = left.into_iter().collect();
        let second: PersistentHashSet<u16> = right.into_iter().collect();
        let union = first.union(&second);

        prop_assert!(first.is_subset(&union));
        prop_assert!(union.is_superset(&second));
        prop_assert!(first.difference(&second).is_disjoint(&second));
    }
}
