#![cfg(feature = "persistent")]
//! Unit tests for `LazyList` forcing behaviour.

use perseus::persistent::LazyList;
use rstest::rstest;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn counted_naturals(counter: &Arc<AtomicUsize>) -> LazyList<usize> {
    let source = Arc::clone(counter);
    LazyList::stream(move || source.fetch_add(1, Ordering::SeqCst))
}

#[rstest]
fn lazy_list_construction_forces_nothing() {
    let counter = Arc::new(AtomicUsize::new(0));
    let list = counted_naturals(&counter)
        .map(|n| n * 2)
        .filter(|n| n % 3 == 0)
        .take(5);

    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert_eq!(list.to_vec(), vec![0, 6, 12, 18, 24]);
}

#[rstest]
fn lazy_list_forced_cells_are_shared_between_copies() {
    let counter = Arc::new(AtomicUsize::new(0));
    let list = counted_naturals(&counter);
    let copy = list.clone();

    assert_eq!(list.get(4), Some(&4));
    assert_eq!(counter.load(Ordering::SeqCst), 5);

    assert_eq!(copy.take(5).to_vec(), vec![0, 1, 2, 3, 4]);
    assert_eq!(counter.load(Ordering::SeqCst), 5);
}

#[rstest]
fn lazy_list_tail_forces_only_first_cell() {
    let counter = Arc::new(AtomicUsize::new(0));
    let list = counted_naturals(&counter);
    let rest = list.tail();

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(rest.head(), Some(&1));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[rstest]
fn lazy_list_uncons_of_empty_is_none() {
    let list: LazyList<i32> = LazyList::new();
    assert!(list.uncons().is_none());
    assert!(list.tail().is_empty());
    assert_eq!(list.head(), None);
}

#[rstest]
fn lazy_list_cons_shares_tail() {
    let base: LazyList<i32> = (1..=3).collect();
    let extended = base.cons(0);
    assert!(extended.tail().ptr_eq(&base));
}

#[rstest]
fn lazy_list_infinite_filter_take() {
    let evens = LazyList::iterate(0_u64, |n| n + 1).filter(|n| n % 2 == 0);
    assert_eq!(evens.take(4).to_vec(), vec![0, 2, 4, 6]);
}

#[rstest]
fn lazy_list_sparse_filter_does_not_overflow_stack() {
    let sparse = LazyList::interval(1_u64, 1_000_000).filter(|n| n % 250_000 == 0);
    assert_eq!(sparse.to_vec(), vec![250_000, 500_000, 750_000, 1_000_000]);
}

#[rstest]
fn lazy_list_flatten_skips_empty_inner_lists() {
    let nested: LazyList<LazyList<i32>> = vec![
        LazyList::new(),
        (1..=2).collect(),
        LazyList::new(),
        (3..=3).collect(),
    ]
    .into_iter()
    .collect();
    assert_eq!(nested.flatten().to_vec(), vec![1, 2, 3]);
}

#[rstest]
#[case(0, "[]")]
#[case(1, "[1]")]
#[case(3, "[1, 2, 3]")]
fn lazy_list_display(#[case] count: i32, #[case] expected: &str) {
    let list = LazyList::interval(1, count);
    assert_eq!(list.to_string(), expected);
}

#[rstest]
fn lazy_list_long_forced_chain_drops_cleanly() {
    let list = LazyList::repeat(7_u8).take(500_000);
    assert_eq!(list.len(), 500_000);
    drop(list);
}
