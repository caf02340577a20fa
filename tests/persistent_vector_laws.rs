#![cfg(feature = "persistent")]
//! Property-based tests for PersistentVector laws.
//!
//! This module verifies the algebraic laws and invariants of PersistentVector
//! using proptest.

use perseus::persistent::PersistentVector;
use proptest::prelude::*;

fn arbitrary_elements() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(any::<i32>(), 0..300)
}

fn to_vec(vector: &PersistentVector<i32>) -> Vec<i32> {
    vector.iter().copied().collect()
}

// =============================================================================
// Basic Laws
// =============================================================================

proptest! {
    /// Get-Update Law: an updated element is returned by get.
    #[test]
    fn prop_get_update_law(
        elements in prop::collection::vec(any::<i32>(), 1..300),
        position in any::<prop::sample::Index>(),
        value in any::<i32>()
    ) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let index = position.index(vector.len());
        let updated = vector.update(index, value).unwrap();

        prop_assert_eq!(updated.get(index), Some(&value));
    }

    /// Get-Update-Other Law: update leaves every other index alone.
    #[test]
    fn prop_get_update_other_law(
        elements in prop::collection::vec(any::<i32>(), 1..300),
        position in any::<prop::sample::Index>()
    ) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let index = position.index(vector.len());
        let updated = vector.update(index, 99999).unwrap();

        for other in (0..vector.len()).filter(|&other| other != index) {
            prop_assert_eq!(updated.get(other), vector.get(other));
        }
    }

    /// Push-Pop Law: pop_back undoes push_back.
    #[test]
    fn prop_push_pop_law(elements in arbitrary_elements(), value in any::<i32>()) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let (rest, popped) = vector.push_back(value).pop_back().unwrap();

        prop_assert_eq!(popped, value);
        prop_assert_eq!(rest, vector);
    }

    /// Length Law: push_back grows the length by one.
    #[test]
    fn prop_push_back_length_law(elements in arbitrary_elements(), value in any::<i32>()) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        prop_assert_eq!(vector.push_back(value).len(), vector.len() + 1);
    }
}

// =============================================================================
// Edit Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_insert_then_remove_round_trips(
        elements in arbitrary_elements(),
        position in any::<prop::sample::Index>(),
        value in any::<i32>()
    ) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let index = position.index(vector.len() + 1);
        let inserted = vector.insert(index, value).unwrap();

        prop_assert_eq!(inserted.get(index), Some(&value));
        prop_assert_eq!(inserted.remove(index).unwrap(), vector);
    }

    #[test]
    fn prop_insert_past_end_fails(elements in arbitrary_elements(), extra in 1..10_usize) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        prop_assert!(vector.insert(vector.len() + extra, 0).is_err());
    }

    #[test]
    fn prop_push_front_prepends(elements in arbitrary_elements(), value in any::<i32>()) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let mut expected = vec![value];
        expected.extend(elements);

        prop_assert_eq!(to_vec(&vector.push_front(value)), expected);
    }
}

// =============================================================================
// Slice Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_take_and_drop_first_split(elements in arbitrary_elements(), count in 0..400_usize) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let rejoined = vector.take(count).append(&vector.drop_first(count));
        prop_assert_eq!(rejoined, vector);
    }

    #[test]
    fn prop_slice_matches_vec_slice(
        elements in arbitrary_elements(),
        first in any::<prop::sample::Index>(),
        second in any::<prop::sample::Index>()
    ) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let a = first.index(elements.len() + 1);
        let b = second.index(elements.len() + 1);
        let (start, end) = if a <= b { (a, b) } else { (b, a) };

        prop_assert_eq!(to_vec(&vector.slice(start..end)), elements[start..end].to_vec());
    }

    #[test]
    fn prop_append_concatenates(left in arbitrary_elements(), right in arbitrary_elements()) {
        let first: PersistentVector<i32> = left.iter().copied().collect();
        let second: PersistentVector<i32> = right.iter().copied().collect();
        let expected: Vec<i32> = left.into_iter().chain(right).collect();

        prop_assert_eq!(to_vec(&first.append(&second)), expected);
    }
}
