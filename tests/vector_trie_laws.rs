#![cfg(feature = "persistent")]
//! Property-based tests for the vector trie engine.
//!
//! Each edit is mirrored on a `Vec` and the results compared element by
//! element, together with the level invariant.

use perseus::persistent::VectorTrie;
use proptest::prelude::*;

// =============================================================================
// Strategy for generating test data
// =============================================================================

fn arbitrary_elements() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(any::<i32>(), 0..3000)
}

fn expected_level(size: usize) -> usize {
    let mut level = 0;
    let mut capacity = 32;
    while capacity < size {
        capacity *= 32;
        level += 1;
    }
    level
}

fn assert_matches(trie: &VectorTrie<i32>, model: &[i32]) -> Result<(), TestCaseError> {
    prop_assert_eq!(trie.len(), model.len());
    prop_assert_eq!(trie.level(), expected_level(model.len()));
    prop_assert!(trie.iter().eq(model.iter()));
    Ok(())
}

// =============================================================================
// Construction Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_collect_matches_vec(elements in arbitrary_elements()) {
        let trie: VectorTrie<i32> = elements.iter().copied().collect();
        assert_matches(&trie, &elements)?;
    }

    #[test]
    fn prop_append_matches_collect(elements in arbitrary_elements()) {
        let appended = elements
            .iter()
            .fold(VectorTrie::new(), |trie, &element| trie.append(element));
        let collected: VectorTrie<i32> = elements.iter().copied().collect();
        prop_assert_eq!(appended, collected);
    }

    #[test]
    fn prop_get_matches_index(elements in arbitrary_elements()) {
        let trie: VectorTrie<i32> = elements.iter().copied().collect();
        for (index, element) in elements.iter().enumerate() {
            prop_assert_eq!(trie.get(index), Some(element));
        }
        prop_assert_eq!(trie.get(elements.len()), None);
    }
}

// =============================================================================
// Edit Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_pop_matches_vec_pop(elements in arbitrary_elements(), pops in 0..100_usize) {
        let mut trie: VectorTrie<i32> = elements.iter().copied().collect();
        let mut model = elements;
        for _ in 0..pops {
            trie = trie.pop();
            model.pop();
        }
        assert_matches(&trie, &model)?;
    }

    #[test]
    fn prop_update_leaves_original_untouched(
        elements in prop::collection::vec(any::<i32>(), 1..3000),
        position in any::<prop::sample::Index>(),
        value in any::<i32>()
    ) {
        let trie: VectorTrie<i32> = elements.iter().copied().collect();
        let index = position.index(elements.len());
        let updated = trie.update(index, value).unwrap();

        let mut model = elements.clone();
        model[index] = value;
        assert_matches(&updated, &model)?;
        assert_matches(&trie, &elements)?;
    }

    #[test]
    fn prop_insert_matches_splice(
        elements in arbitrary_elements(),
        position in any::<prop::sample::Index>(),
        items in prop::collection::vec(any::<i32>(), 0..80)
    ) {
        let trie: VectorTrie<i32> = elements.iter().copied().collect();
        let index = position.index(elements.len() + 1);
        let inserted = trie
            .insert(isize::try_from(index).unwrap(), items.iter().copied())
            .unwrap();

        let mut model = elements;
        model.splice(index..index, items);
        assert_matches(&inserted, &model)?;
    }

    #[test]
    fn prop_delete_at_matches_remove(
        elements in prop::collection::vec(any::<i32>(), 1..3000),
        position in any::<prop::sample::Index>()
    ) {
        let trie: VectorTrie<i32> = elements.iter().copied().collect();
        let index = position.index(elements.len());
        let deleted = trie.delete_at(isize::try_from(index).unwrap()).unwrap();

        let mut model = elements;
        model.remove(index);
        assert_matches(&deleted, &model)?;
    }

    #[test]
    fn prop_replace_suffix_matches_truncate_extend(
        elements in arbitrary_elements(),
        position in any::<prop::sample::Index>(),
        suffix in prop::collection::vec(any::<i32>(), 0..1200)
    ) {
        let trie: VectorTrie<i32> = elements.iter().copied().collect();
        let from = position.index(elements.len() + 1);
        let replaced = trie.replace_suffix(from, suffix.iter().copied()).unwrap();

        let mut model = elements;
        model.truncate(from);
        model.extend(suffix);
        assert_matches(&replaced, &model)?;
    }

    #[test]
    fn prop_flatten_range_matches_slice(
        elements in arbitrary_elements(),
        first in any::<prop::sample::Index>(),
        second in any::<prop::sample::Index>()
    ) {
        let trie: VectorTrie<i32> = elements.iter().copied().collect();
        let a = first.index(elements.len() + 1);
        let b = second.index(elements.len() + 1);
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        prop_assert_eq!(trie.flatten_range(start..end), elements[start..end].to_vec());
    }
}

// =============================================================================
// Iterator Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_reverse_iteration_matches_vec(elements in arbitrary_elements()) {
        let trie: VectorTrie<i32> = elements.iter().copied().collect();
        prop_assert!(trie.iter().rev().eq(elements.iter().rev()));
    }

    #[test]
    fn prop_mixed_ends_meet_in_middle(elements in arbitrary_elements(), front_steps in 0..3000_usize) {
        let trie: VectorTrie<i32> = elements.iter().copied().collect();
        let mut iterator = trie.iter();
        let mut seen = Vec::new();
        for _ in 0..front_steps.min(elements.len()) {
            seen.push(*iterator.next().unwrap());
        }
        let mut tail: Vec<i32> = iterator.rev().copied().collect();
        tail.reverse();
        seen.extend(tail);
        prop_assert_eq!(seen, elements);
    }
}
