//! Serialization tests for LlrbTree.

#![cfg(feature = "serde")]

use llrb::tree::LlrbTree;
use rstest::rstest;

#[rstest]
fn test_tree_serializes_as_sorted_sequence() {
    let tree: LlrbTree<i32> = [3, 1, 2].into_iter().collect();
    let json = serde_json::to_string(&tree).unwrap();
    assert_eq!(json, "[1,2,3]");
}

#[rstest]
fn test_tree_json_roundtrip_keeps_duplicates() {
    let tree: LlrbTree<i32> = [5, 1, 5, 3, 1].into_iter().collect();
    let json = serde_json::to_string(&tree).unwrap();
    let restored: LlrbTree<i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, tree);
    assert_eq!(restored.len(), 5);
    assert_eq!(restored.validate(), Ok(()));
}

#[rstest]
fn test_tree_deserializes_unsorted_input() {
    let restored: LlrbTree<String> = serde_json::from_str(r#"["b", "c", "a"]"#).unwrap();
    let items: Vec<&str> = restored.iter().map(String::as_str).collect();
    assert_eq!(items, vec!["a", "b", "c"]);
}

#[rstest]
fn test_empty_tree_roundtrip() {
    let tree: LlrbTree<i32> = LlrbTree::new();
    let json = serde_json::to_string(&tree).unwrap();
    assert_eq!(json, "[]");
    let restored: LlrbTree<i32> = serde_json::from_str(&json).unwrap();
    assert!(restored.is_empty());
}

#[rstest]
fn test_deserialize_rejects_non_sequence() {
    let result: Result<LlrbTree<i32>, _> = serde_json::from_str("{}");
    assert!(result.is_err());
}
