//! Tests for RbTree
//!
//! Tests verify:
//! - Lifecycle (create, clear, destroy)
//! - Argument validation
//! - Add / get / remove semantics
//! - Duplicate insert is a no-op, add_or_replace overwrites
//! - Lookups never copy past the stored value
//! - Budget exhaustion leaves the tree unchanged

use std::cmp::Ordering;

use rbstore::{Color, Lexicographic, RbError, RbTree, ShapeNode, TreeConfig};

// =============================================================================
// Helper Functions
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn tree_with(entries: &[(&[u8], &[u8])]) -> RbTree {
    let mut tree = RbTree::new();
    for (key, value) in entries {
        tree.add(key, value).unwrap();
    }
    tree
}

/// In-order keys of a shape snapshot
fn keys_of(shape: &Option<ShapeNode>) -> Vec<Vec<u8>> {
    fn walk(node: &ShapeNode, out: &mut Vec<Vec<u8>>) {
        if let Some(left) = &node.left {
            walk(left, out);
        }
        out.push(node.key.clone());
        if let Some(right) = &node.right {
            walk(right, out);
        }
    }
    let mut out = Vec::new();
    if let Some(root) = shape {
        walk(root, &mut out);
    }
    out
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_new_tree_is_empty() {
    let tree = RbTree::new();

    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.memory_usage(), 0);
    assert!(tree.shape().is_none());
}

#[test]
fn test_create_without_comparator_fails() {
    let result = RbTree::<Lexicographic>::create(None);

    assert!(matches!(result, Err(RbError::InvalidArgument(_))));
}

#[test]
fn test_create_with_closure_comparator() {
    let mut tree = RbTree::create(Some(|a: &[u8], b: &[u8]| b.cmp(a))).unwrap();

    tree.add(b"a", b"1").unwrap();
    tree.add(b"b", b"2").unwrap();
    tree.add(b"c", b"3").unwrap();

    // Reverse order: "c" sorts first
    assert_eq!(
        keys_of(&tree.shape()),
        vec![b"c".to_vec(), b"b".to_vec(), b"a".to_vec()]
    );
    assert!(tree.check_invariants().is_ok());
}

#[test]
fn test_destroy_empty_tree() {
    let tree = RbTree::new();

    assert_eq!(tree.destroy(), 0);
}

#[test]
fn test_destroy_releases_every_entry() {
    init_tracing();
    let mut tree = RbTree::new();
    for i in 0..100u32 {
        tree.add(&i.to_be_bytes(), b"value").unwrap();
    }

    assert_eq!(tree.destroy(), 100);
}

#[test]
fn test_clear_leaves_tree_usable() {
    let mut tree = tree_with(&[(b"key1", b"value1"), (b"key2", b"value2")]);
    assert_eq!(tree.len(), 2);

    tree.clear();

    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.memory_usage(), 0);
    assert_eq!(tree.get_vec(b"key1"), Err(RbError::NotFound));

    tree.add(b"key3", b"value3").unwrap();
    assert_eq!(tree.get_vec(b"key3").unwrap(), b"value3");
    assert!(tree.check_invariants().is_ok());
}

// =============================================================================
// Argument Validation Tests
// =============================================================================

#[test]
fn test_add_rejects_empty_key_or_value() {
    let mut tree = RbTree::new();

    assert!(matches!(tree.add(b"", b"value"), Err(RbError::InvalidArgument(_))));
    assert!(matches!(tree.add(b"key", b""), Err(RbError::InvalidArgument(_))));
    assert!(tree.is_empty());
}

#[test]
fn test_get_rejects_empty_key_or_buffer() {
    let tree = tree_with(&[(b"key", b"value")]);
    let mut empty: [u8; 0] = [];
    let mut buf = [0u8; 8];

    assert!(matches!(tree.get(b"key", &mut empty), Err(RbError::InvalidArgument(_))));
    assert!(matches!(tree.get(b"", &mut buf), Err(RbError::InvalidArgument(_))));
}

#[test]
fn test_remove_rejects_empty_key() {
    let mut tree = tree_with(&[(b"key", b"value")]);

    assert!(matches!(tree.remove(b""), Err(RbError::InvalidArgument(_))));
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_invalid_argument_checked_before_lookup() {
    // An empty buffer on a missing key still reports the argument error
    let tree = RbTree::new();
    let mut empty: [u8; 0] = [];

    assert!(matches!(tree.get(b"missing", &mut empty), Err(RbError::InvalidArgument(_))));
}

// =============================================================================
// Add / Get Tests
// =============================================================================

#[test]
fn test_add_and_get() {
    let mut tree = RbTree::new();
    tree.add(b"hello", b"world").unwrap();

    let mut buf = [0u8; 16];
    let copied = tree.get(b"hello", &mut buf).unwrap();

    assert_eq!(copied, 5);
    assert_eq!(&buf[..copied], b"world");
}

#[test]
fn test_get_nonexistent_key() {
    let tree = tree_with(&[(b"key", b"value")]);
    let mut buf = [0u8; 8];

    assert_eq!(tree.get(b"other", &mut buf), Err(RbError::NotFound));
    assert_eq!(buf, [0u8; 8]);
}

#[test]
fn test_get_truncates_to_buffer_capacity() {
    let tree = tree_with(&[(b"key", b"0123456789")]);
    let mut buf = [0u8; 4];

    let copied = tree.get(b"key", &mut buf).unwrap();

    assert_eq!(copied, 4);
    assert_eq!(&buf, b"0123");
}

#[test]
fn test_get_never_copies_past_stored_value() {
    let tree = tree_with(&[(b"key", b"abcd")]);
    let mut buf = [0xAAu8; 100];

    let copied = tree.get(b"key", &mut buf).unwrap();

    assert_eq!(copied, 4);
    assert_eq!(&buf[..4], b"abcd");
    assert!(buf[4..].iter().all(|&b| b == 0xAA));
}

#[test]
fn test_get_vec_and_value_len() {
    let tree = tree_with(&[(b"key", b"value")]);

    assert_eq!(tree.get_vec(b"key").unwrap(), b"value".to_vec());
    assert_eq!(tree.value_len(b"key").unwrap(), 5);
    assert_eq!(tree.value_len(b"nope"), Err(RbError::NotFound));
}

#[test]
fn test_contains_key() {
    let tree = tree_with(&[(b"key", b"value")]);

    assert!(tree.contains_key(b"key"));
    assert!(!tree.contains_key(b"other"));
    assert!(!tree.contains_key(b""));
}

#[test]
fn test_add_copies_caller_buffers() {
    let mut tree = RbTree::new();
    let mut key = b"key".to_vec();
    let mut value = b"value".to_vec();

    tree.add(&key, &value).unwrap();
    key[0] = b'X';
    value[0] = b'X';

    assert_eq!(tree.get_vec(b"key").unwrap(), b"value");
    assert!(!tree.contains_key(b"Xey"));
}

#[test]
fn test_lookup_result_is_a_copy() {
    let tree = tree_with(&[(b"key", b"value")]);

    let mut copy = tree.get_vec(b"key").unwrap();
    copy[0] = b'V';

    assert_eq!(tree.get_vec(b"key").unwrap(), b"value");
}

#[test]
fn test_memory_usage_tracks_payload() {
    let mut tree = tree_with(&[(b"key1", b"value1"), (b"key2", b"v2")]);
    assert_eq!(tree.memory_usage(), (4 + 6) + (4 + 2));

    tree.remove(b"key1").unwrap();
    assert_eq!(tree.memory_usage(), 4 + 2);
}

// =============================================================================
// Duplicate Insert Tests
// =============================================================================

#[test]
fn test_duplicate_add_keeps_first_value() {
    let mut tree = RbTree::new();

    tree.add(b"key", b"first").unwrap();
    // Succeeds, but is not an update
    tree.add(b"key", b"second").unwrap();

    assert_eq!(tree.len(), 1);
    assert_eq!(tree.get_vec(b"key").unwrap(), b"first");
    assert_eq!(tree.memory_usage(), 3 + 5);
}

#[test]
fn test_add_or_replace_overwrites() {
    let mut tree = RbTree::new();

    assert_eq!(tree.add_or_replace(b"key", b"first").unwrap(), None);
    assert_eq!(
        tree.add_or_replace(b"key", b"second").unwrap(),
        Some(b"first".to_vec())
    );

    assert_eq!(tree.len(), 1);
    assert_eq!(tree.get_vec(b"key").unwrap(), b"second");
    assert_eq!(tree.memory_usage(), 3 + 6);
    assert!(tree.check_invariants().is_ok());
}

#[test]
fn test_add_or_replace_validates_arguments() {
    let mut tree = RbTree::new();

    assert!(matches!(tree.add_or_replace(b"", b"v"), Err(RbError::InvalidArgument(_))));
    assert!(matches!(tree.add_or_replace(b"k", b""), Err(RbError::InvalidArgument(_))));
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_remove_then_lookups_report_not_found() {
    let mut tree = tree_with(&[(b"a", b"1"), (b"b", b"2"), (b"c", b"3")]);

    tree.remove(b"b").unwrap();

    assert_eq!(tree.get_vec(b"b"), Err(RbError::NotFound));
    assert_eq!(tree.remove(b"b"), Err(RbError::NotFound));
    assert_eq!(tree.len(), 2);
    assert!(tree.check_invariants().is_ok());
}

#[test]
fn test_remove_missing_key_leaves_tree_unchanged() {
    let mut tree = RbTree::new();
    for i in 0..50u8 {
        tree.add(&[i, i], &[i]).unwrap();
    }
    let before = tree.shape();

    assert_eq!(tree.remove(b"missing"), Err(RbError::NotFound));

    assert_eq!(tree.shape(), before);
    assert_eq!(keys_of(&tree.shape()), keys_of(&before));
    assert_eq!(tree.len(), 50);
}

#[test]
fn test_remove_last_entry_empties_tree() {
    let mut tree = tree_with(&[(b"only", b"entry")]);

    tree.remove(b"only").unwrap();

    assert!(tree.is_empty());
    assert_eq!(tree.memory_usage(), 0);
    assert!(tree.shape().is_none());
}

#[test]
fn test_add_after_remove() {
    let mut tree = tree_with(&[(b"key", b"value1")]);

    tree.remove(b"key").unwrap();
    tree.add(b"key", b"value2").unwrap();

    assert_eq!(tree.get_vec(b"key").unwrap(), b"value2");
}

// =============================================================================
// Structural Scenario Tests
// =============================================================================

#[test]
fn test_ascending_three_keys_rotate_to_balanced_root() {
    let mut tree = RbTree::new();
    tree.add(&[10], b"ten").unwrap();
    tree.add(&[20], b"twenty").unwrap();
    tree.add(&[30], b"thirty").unwrap();

    let root = tree.shape().unwrap();
    assert_eq!(root.key, vec![20]);
    assert_eq!(root.color, Color::Black);
    let left = root.left.as_ref().unwrap();
    let right = root.right.as_ref().unwrap();
    assert_eq!((left.key.clone(), left.color), (vec![10], Color::Red));
    assert_eq!((right.key.clone(), right.color), (vec![30], Color::Red));

    assert_eq!(tree.get_vec(&[20]).unwrap(), b"twenty");

    tree.remove(&[10]).unwrap();

    let root = tree.shape().unwrap();
    assert_eq!(root.key, vec![20]);
    assert_eq!(root.color, Color::Black);
    assert!(root.left.is_none());
    let right = root.right.as_ref().unwrap();
    assert_eq!(right.key, vec![30]);
    // Removing a red leaf needs no fix-up; a lone child of the root stays red
    assert_eq!(right.color, Color::Red);
    let report = tree.check_invariants().unwrap();
    assert_eq!(report.entries, 2);
    assert_eq!(report.black_height, 1);
}

#[test]
fn test_custom_comparator_defines_equality() {
    // Case-insensitive keys: "KEY" and "key" are the same entry
    let mut tree = RbTree::create(Some(|a: &[u8], b: &[u8]| {
        a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase())
    }))
    .unwrap();

    tree.add(b"KEY", b"upper").unwrap();
    tree.add(b"key", b"lower").unwrap();

    assert_eq!(tree.len(), 1);
    assert_eq!(tree.get_vec(b"Key").unwrap(), b"upper");
}

#[test]
fn test_numeric_comparator() {
    let by_u32 = |a: &[u8], b: &[u8]| -> Ordering {
        let a = u32::from_le_bytes(a.try_into().unwrap());
        let b = u32::from_le_bytes(b.try_into().unwrap());
        a.cmp(&b)
    };
    let mut tree = RbTree::create(Some(by_u32)).unwrap();

    for n in [300u32, 2, 70_000, 1] {
        tree.add(&n.to_le_bytes(), b"v").unwrap();
    }

    let order: Vec<u32> = keys_of(&tree.shape())
        .into_iter()
        .map(|k| u32::from_le_bytes(k.try_into().unwrap()))
        .collect();
    assert_eq!(order, vec![1, 2, 300, 70_000]);
}

// =============================================================================
// Budget Tests
// =============================================================================

#[test]
fn test_entry_budget_rejects_insert_and_leaves_tree_unchanged() {
    init_tracing();
    let config = TreeConfig::builder().max_entries(2).build();
    let mut tree = RbTree::with_config(Some(Lexicographic), config).unwrap();
    tree.add(b"a", b"1").unwrap();
    tree.add(b"b", b"2").unwrap();
    let before = tree.shape();

    let result = tree.add(b"c", b"3");

    assert!(matches!(result, Err(RbError::OutOfMemory(_))));
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.shape(), before);
    assert!(tree.check_invariants().is_ok());
}

#[test]
fn test_duplicate_add_at_budget_still_succeeds() {
    let config = TreeConfig::builder().max_entries(1).build();
    let mut tree = RbTree::with_config(Some(Lexicographic), config).unwrap();
    tree.add(b"a", b"1").unwrap();

    assert_eq!(tree.add(b"a", b"2"), Ok(()));
}

#[test]
fn test_memory_budget_rejects_insert() {
    let config = TreeConfig::builder().max_memory_bytes(10).build();
    let mut tree = RbTree::with_config(Some(Lexicographic), config).unwrap();

    tree.add(b"key", b"value").unwrap(); // 8 bytes
    let result = tree.add(b"k2", b"v2"); // would be 12

    assert!(matches!(result, Err(RbError::OutOfMemory(_))));
    assert_eq!(tree.memory_usage(), 8);
    assert!(!tree.contains_key(b"k2"));
}

#[test]
fn test_memory_budget_frees_up_after_remove() {
    let config = TreeConfig::builder().max_memory_bytes(10).build();
    let mut tree = RbTree::with_config(Some(Lexicographic), config).unwrap();
    tree.add(b"key", b"value").unwrap();
    assert!(tree.add(b"k2", b"v2").is_err());

    tree.remove(b"key").unwrap();

    assert_eq!(tree.add(b"k2", b"v2"), Ok(()));
}

#[test]
fn test_replace_over_memory_budget_keeps_old_value() {
    let config = TreeConfig::builder().max_memory_bytes(10).build();
    let mut tree = RbTree::with_config(Some(Lexicographic), config).unwrap();
    tree.add(b"key", b"value").unwrap();

    let result = tree.add_or_replace(b"key", b"much too long");

    assert!(matches!(result, Err(RbError::OutOfMemory(_))));
    assert_eq!(tree.get_vec(b"key").unwrap(), b"value");
    assert_eq!(tree.memory_usage(), 8);
}

#[test]
fn test_initial_capacity_is_only_a_hint() {
    let config = TreeConfig::builder().initial_capacity(4).build();
    let mut tree = RbTree::with_config(Some(Lexicographic), config).unwrap();

    for i in 0..32u8 {
        tree.add(&[i], &[i]).unwrap();
    }

    assert_eq!(tree.len(), 32);
    assert_eq!(tree.config().initial_capacity, 4);
}

#[test]
fn test_error_messages() {
    assert_eq!(RbError::NotFound.to_string(), "Key not found");
    assert_eq!(
        RbError::InvalidArgument("key must not be empty").to_string(),
        "Invalid argument: key must not be empty"
    );
}
