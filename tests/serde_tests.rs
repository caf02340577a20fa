#![cfg(feature = "serde")]

//! Integration tests for serde support in perseus.
//!
//! These tests verify that the persistent collections serialize to the
//! natural JSON shapes and deserialize back.

use perseus::persistent::{PersistentHashMap, PersistentHashSet, PersistentVector};
use rstest::rstest;

// =============================================================================
// PersistentVector Integration Tests
// =============================================================================

#[rstest]
fn test_vector_json_roundtrip() {
    let vector: PersistentVector<i32> = (1..=100).collect();
    let json = serde_json::to_string(&vector).unwrap();
    let restored: PersistentVector<i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(vector, restored);
}

#[rstest]
fn test_vector_serializes_as_array() {
    let vector: PersistentVector<i32> = (1..=3).collect();
    assert_eq!(serde_json::to_string(&vector).unwrap(), "[1,2,3]");
}

#[rstest]
fn test_vector_nested_structures() {
    let inner1: PersistentVector<i32> = (1..=3).collect();
    let inner2: PersistentVector<i32> = (4..=6).collect();
    let outer: PersistentVector<PersistentVector<i32>> = vec![inner1, inner2].into_iter().collect();

    let json = serde_json::to_string(&outer).unwrap();
    assert_eq!(json, "[[1,2,3],[4,5,6]]");
    let restored: PersistentVector<PersistentVector<i32>> = serde_json::from_str(&json).unwrap();
    assert_eq!(outer, restored);
}

#[rstest]
fn test_vector_rejects_wrong_shape() {
    let result: Result<PersistentVector<i32>, _> = serde_json::from_str("{\"a\":1}");
    assert!(result.is_err());
}

// =============================================================================
// PersistentHashMap Integration Tests
// =============================================================================

#[rstest]
fn test_hashmap_json_roundtrip() {
    let map: PersistentHashMap<String, i32> = (0..50).map(|n| (format!("key{n}"), n)).collect();
    let json = serde_json::to_string(&map).unwrap();
    let restored: PersistentHashMap<String, i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(map, restored);
}

#[rstest]
fn test_hashmap_from_json_object() {
    let map: PersistentHashMap<String, i32> =
        serde_json::from_str(r#"{"one":1,"two":2,"three":3}"#).unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get("two"), Some(&2));
}

#[rstest]
fn test_hashmap_empty() {
    let map: PersistentHashMap<String, i32> = PersistentHashMap::new();
    assert_eq!(serde_json::to_string(&map).unwrap(), "{}");
}

// =============================================================================
// PersistentHashSet Integration Tests
// =============================================================================

#[rstest]
fn test_hashset_json_roundtrip() {
    let set: PersistentHashSet<i32> = (0..64).collect();
    let json = serde_json::to_string(&set).unwrap();
    let restored: PersistentHashSet<i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(set, restored);
}

#[rstest]
fn test_hashset_deduplicates_on_deserialize() {
    let set: PersistentHashSet<i32> = serde_json::from_str("[1,2,2,3,3,3]").unwrap();
    assert_eq!(set.len(), 3);
}
