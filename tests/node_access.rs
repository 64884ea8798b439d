//! Node Access Tests
//!
//! Covers navigation, assignment, deletion and queries through nodes that
//! share one in-memory document:
//! - assigned values read back through any node
//! - deleting a child keeps its siblings
//! - membership matches the child name listing
//! - arithmetic updates the shared document

mod common;

use leafdb::{ErrorCode, Node, Value};

// =============================================================================
// Navigation
// =============================================================================

/// Nested values are reachable by chained navigation.
#[test]
fn test_end_to_end_navigation() {
    common::init_tracing();
    let root = Node::from_value(common::sample_document());

    assert_eq!(root.get("a").unwrap().value().unwrap(), Value::Int(1));
    let b = root.get("b").unwrap();
    assert_eq!(b.get("c").unwrap().value().unwrap(), Value::Int(2));

    b.set("c", 5).unwrap();
    assert_eq!(root.get("b").unwrap().get("c").unwrap(), Value::Int(5));
}

/// Navigating several names yields one node per name.
#[test]
fn test_get_many_returns_one_node_per_name() {
    let root = Node::from_value(common::sample_document());
    let nodes = root.get_many(&["a", "b"]).unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].path(), ["a".to_string()]);
    assert_eq!(nodes[1].get("c").unwrap(), Value::Int(2));

    let err = root.get_many(&["a", "missing"]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NameNotFound);
}

/// Absent keys and leaves produce distinct errors.
#[test]
fn test_missing_key_differs_from_leaf() {
    let root = Node::from_value(common::sample_document());
    let missing = root.get("zz").unwrap_err();
    let through_leaf = root.get("a").unwrap().get("zz").unwrap_err();

    assert_eq!(missing.code(), ErrorCode::NameNotFound);
    assert_eq!(through_leaf.code(), ErrorCode::NotANode);
}

// =============================================================================
// Assignment
// =============================================================================

/// Every assigned value reads back unchanged.
#[test]
fn test_assign_then_dereference() {
    let root = Node::new();
    let values = vec![
        Value::Null,
        Value::Bool(true),
        Value::Int(-4),
        Value::Float(2.5),
        Value::from("text"),
        Value::bytes(vec![0u8, 255]),
        Value::from(vec![1, 2, 3]),
        common::sample_document(),
    ];
    for (i, value) in values.into_iter().enumerate() {
        let name = format!("k{}", i);
        root.set(&name, value.clone()).unwrap();
        assert_eq!(root.get(&name).unwrap().value().unwrap(), value);
    }
}

/// Writes through one node are visible through another at the same path.
#[test]
fn test_shared_state_visibility() {
    let root = Node::from_value(common::sample_document());
    let first = root.get("b").unwrap();
    let second = root.get("b").unwrap();

    first.set("new", "x").unwrap();
    assert!(second.has("new").unwrap());
    assert_eq!(first, second);

    second.get("c").unwrap().add_assign(10).unwrap();
    assert_eq!(first.get("c").unwrap(), Value::Int(12));
}

// =============================================================================
// Deletion
// =============================================================================

/// Deleting the root leaves an empty document.
#[test]
fn test_delete_root() {
    let root = Node::from_value(common::sample_document());
    root.delete().unwrap();
    assert_eq!(root.value().unwrap(), Value::empty());
    assert!(root.names().unwrap().is_empty());
}

/// Deleting one child preserves the others and their order.
#[test]
fn test_delete_child_preserves_siblings() {
    let root = Node::from_value(serde_json::json!({"x": 1, "y": 2, "z": 3}));
    root.get("y").unwrap().delete().unwrap();
    assert_eq!(root.names().unwrap(), vec!["x", "z"]);
    assert_eq!(root.get("z").unwrap(), Value::Int(3));
}

// =============================================================================
// Membership and Queries
// =============================================================================

/// `has` agrees with the child listing.
#[test]
fn test_has_matches_names() {
    let root = Node::from_value(common::sample_document());
    let names = root.names().unwrap();
    for candidate in ["a", "b", "c", "zz"] {
        assert_eq!(
            root.has(candidate).unwrap(),
            names.iter().any(|n| n == candidate)
        );
    }
}

/// Query results can be chained with further navigation.
#[test]
fn test_queries_on_records() {
    let root = Node::from_value(serde_json::json!({
        "users": {
            "u1": {"role": "admin", "active": true},
            "u2": {"role": "guest", "active": true},
            "u3": {"role": "admin", "active": false, "banned": true}
        }
    }));
    let users = root.get("users").unwrap();

    let admins = users
        .where_eq(&[("role", Value::from("admin")), ("active", Value::Bool(true))])
        .unwrap();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].display_name(), "u1");

    let flagged = users.containing(&["banned"]).unwrap();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].get("role").unwrap(), Value::from("admin"));
}

/// Iteration is one level deep and yields values, not nodes.
#[test]
fn test_iteration_yields_name_value_pairs() {
    let root = Node::from_value(common::sample_document());
    let mut seen = Vec::new();
    for (name, value) in &root {
        seen.push((name, value));
    }
    assert_eq!(seen[0], ("a".to_string(), Value::Int(1)));
    assert_eq!(seen[1].0, "b");
    assert!(seen[1].1.is_container());
}

// =============================================================================
// Arithmetic
// =============================================================================

/// `z += 1` on a fresh document yields 2.
#[test]
fn test_increment_on_empty_document() {
    let root = Node::new();
    root.set("z", 1).unwrap();
    assert_eq!(root.get("z").unwrap().add_assign(1).unwrap(), Value::Int(2));
    assert_eq!(root.get("z").unwrap(), Value::Int(2));
}

/// Mixed int and float arithmetic produces floats.
#[test]
fn test_numeric_promotion() {
    let root = Node::from_value(serde_json::json!({"n": 3}));
    let n = root.get("n").unwrap();
    assert_eq!(n.mul_assign(0.5).unwrap(), Value::Float(1.5));
    assert_eq!(n.floor_div_assign(1).unwrap(), Value::Float(1.0));
}
