//! Tests for TreeBuilder

mod common;

use common::{abdc, build, children_ids, idx, item, Item};
use lcrs::domain::TreeError;
use lcrs::util::testing;
use rstest::rstest;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[test]
fn given_depth_first_list_when_building_then_children_match_parents() {
    // Arrange
    let records = abdc();

    // Act
    let tree = build(records).unwrap();

    // Assert
    assert_eq!(tree.len(), 4);
    assert_eq!(children_ids(&tree, "A"), vec!["B", "C"]);
    assert_eq!(children_ids(&tree, "B"), vec!["D"]);
    assert!(children_ids(&tree, "C").is_empty());
    assert!(children_ids(&tree, "D").is_empty());
    tree.check_invariants().unwrap();
}

#[test]
fn given_depth_first_list_when_building_then_binary_links_encode_children() {
    let tree = build(abdc()).unwrap();
    let (a, b, c, d) = (idx(&tree, "A"), idx(&tree, "B"), idx(&tree, "C"), idx(&tree, "D"));

    let root = tree.get_node(a).unwrap();
    assert_eq!(tree.root(), Some(a));
    assert_eq!(root.parent(), None);
    assert_eq!(root.left(), Some(b));
    assert_eq!(root.right(), None);

    let b_node = tree.get_node(b).unwrap();
    assert_eq!(b_node.left(), Some(d));
    assert_eq!(b_node.right(), Some(c));
    assert_eq!(tree.get_node(c).unwrap().parent(), Some(b));
    assert_eq!(tree.get_node(d).unwrap().parent(), Some(b));
}

#[test]
fn given_empty_list_when_building_then_tree_is_empty() {
    let tree = build(Vec::new()).unwrap();

    assert!(tree.root().is_none());
    assert!(tree.is_empty());
}

#[test]
fn given_no_root_record_when_building_then_root_not_found() {
    let records = vec![item("B", Some("A")), item("C", Some("A"))];

    let result = build(records);

    assert!(matches!(result, Err(TreeError::RootNotFound)));
}

#[test]
fn given_unknown_parent_when_building_then_attaches_under_root() {
    let records = vec![
        item("A", None),
        item("B", Some("A")),
        item("X", Some("nowhere")),
        item("C", Some("A")),
    ];

    let tree = build(records).unwrap();

    assert_eq!(children_ids(&tree, "A"), vec!["B", "X", "C"]);
    tree.check_invariants().unwrap();
}

#[test]
fn given_child_listed_after_uncle_when_building_then_falls_back_to_root() {
    // Not depth-first: D's parent B has already been popped when D arrives.
    let records = vec![
        item("A", None),
        item("B", Some("A")),
        item("C", Some("A")),
        item("D", Some("B")),
    ];

    let tree = build(records).unwrap();

    assert_eq!(children_ids(&tree, "A"), vec!["B", "C", "D"]);
    assert!(children_ids(&tree, "B").is_empty());
}

#[test]
fn given_three_children_when_building_then_children_list_and_chain_disagree() {
    let records = vec![
        item("A", None),
        item("B", Some("A")),
        item("C", Some("A")),
        item("E", Some("A")),
        item("F", Some("A")),
    ];

    let tree = build(records).unwrap();
    let a = idx(&tree, "A");

    let chain: Vec<&str> = tree
        .encoded_children(a)
        .map(|(_, node)| node.record().id)
        .collect();
    assert_eq!(children_ids(&tree, "A"), vec!["B", "C", "E", "F"]);
    assert_eq!(chain, vec!["B", "F", "E", "C"]);
    tree.check_invariants().unwrap();
}

#[rstest]
#[case::root_only(vec![item("A", None)], 1, 1)]
#[case::chain(vec![item("A", None), item("B", Some("A")), item("C", Some("B"))], 3, 1)]
#[case::fan(vec![item("A", None), item("B", Some("A")), item("C", Some("A")), item("D", Some("A"))], 2, 3)]
fn given_shapes_when_building_then_depth_and_leaves_match(
    #[case] records: Vec<Item>,
    #[case] depth: usize,
    #[case] leaves: usize,
) {
    let tree = build(records).unwrap();

    assert_eq!(tree.depth(), depth);
    assert_eq!(tree.leaf_nodes().len(), leaves);
    tree.check_invariants().unwrap();
}

#[test]
fn given_second_root_candidate_when_building_then_first_wins() {
    let records = vec![item("A", None), item("B", Some("A")), item("Z", None)];

    let tree = build(records).unwrap();

    // Z matches the root condition too but is not the root; nothing claims it as a child
    assert_eq!(tree.record(tree.root().unwrap()).unwrap().id, "A");
    assert_eq!(children_ids(&tree, "A"), vec!["B", "Z"]);
}

#[test]
fn given_built_tree_when_into_records_then_all_records_returned() {
    let records = vec![item("B", Some("A")), item("A", None), item("C", Some("A"))];

    let tree = build(records).unwrap();
    let ids: Vec<&str> = tree.into_records().into_iter().map(|r| r.id).collect();

    assert_eq!(ids, vec!["A", "B", "C"]);
}
