#![cfg(feature = "persistent")]
//! Property-based tests for PersistentDeque against a `VecDeque` model.

use perseus::persistent::PersistentDeque;
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Operation {
    PushFront(i32),
    PushBack(i32),
    PopFront,
    PopBack,
    Reverse,
}

fn arbitrary_operations() -> impl Strategy<Value = Vec<Operation>> {
    let operation = prop_oneof![
        any::<i32>().prop_map(Operation::PushFront),
        any::<i32>().prop_map(Operation::PushBack),
        Just(Operation::PopFront),
        Just(Operation::PopBack),
        Just(Operation::Reverse),
    ];
    prop::collection::vec(operation, 0..150)
}

proptest! {
    #[test]
    fn prop_matches_vec_deque_model(operations in arbitrary_operations()) {
        let mut deque = PersistentDeque::new();
        let mut model = VecDeque::new();

        for operation in operations {
            match operation {
                Operation::PushFront(value) => {
                    deque = deque.push_front(value);
                    model.push_front(value);
                }
                Operation::PushBack(value) => {
                    deque = deque.push_back(value);
                    model.push_back(value);
                }
                Operation::PopFront => match deque.pop_front() {
                    Some((rest, value)) => {
                        prop_assert_eq!(Some(value), model.pop_front());
                        deque = rest;
                    }
                    None => prop_assert!(model.is_empty()),
                },
                Operation::PopBack => match deque.pop_back() {
                    Some((rest, value)) => {
                        prop_assert_eq!(Some(value), model.pop_back());
                        deque = rest;
                    }
                    None => prop_assert!(model.is_empty()),
                },
                Operation::Reverse => {
                    deque = deque.reverse();
                    model = model.into_iter().rev().collect();
                }
            }

            prop_assert_eq!(deque.len(), model.len());
            prop_assert_eq!(deque.front(), model.front());
            prop_assert_eq!(deque.back(), model.back());
        }

        prop_assert!(deque.iter().eq(model.iter()));
    }

    #[test]
    fn prop_pop_leaves_original_untouched(elements in prop::collection::vec(any::<i32>(), 1..60)) {
        let deque: PersistentDeque<i32> = elements.iter().copied().collect();
        let _ = deque.pop_front();
        let _ = deque.pop_back();

        prop_assert_eq!(deque.len(), elements.len());
        prop_assert!(deque.iter().eq(elements.iter()));
    }
}
