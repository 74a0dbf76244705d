//! Tests for full and incremental aggregation

mod common;

use common::{abdc, build, idx, is_parent_of, is_root, item, valued, Item};
use lcrs::domain::{count_leaves, Record, TreeArena};
use lcrs::util::testing;
use rstest::{fixture, rstest};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn leaf_counts(tree: &TreeArena<Item>) -> Vec<(&'static str, usize)> {
    let mut counts: Vec<(&str, usize)> = tree
        .iter()
        .map(|(_, node)| {
            let record = node.record();
            (record.id, record.leaf_count())
        })
        .collect();
    counts.sort();
    counts
}

fn sum_values(record: &mut Item, children: &[&Item]) {
    record.value = children.iter().map(|child| child.value).sum();
}

/// A
/// ├── B = 0
/// │   ├── D = 4
/// │   └── G = 2
/// ├── C = 1
/// └── E = 8
#[fixture]
fn budget() -> TreeArena<Item> {
    let mut tree = build(vec![
        item("A", None),
        item("B", Some("A")),
        valued("D", Some("B"), 4),
        valued("G", Some("B"), 2),
        valued("C", Some("A"), 1),
        valued("E", Some("A"), 8),
    ])
    .unwrap();
    tree.compute(|_| {}, sum_values).unwrap();
    tree
}

#[test]
fn given_tree_when_computing_then_branches_sum_child_leaf_counts() {
    // Arrange
    let mut tree = build(abdc()).unwrap();

    // Act
    tree.compute(|_| {}, |_, _| {}).unwrap();

    // Assert
    assert_eq!(
        leaf_counts(&tree),
        vec![("A", 2), ("B", 1), ("C", 1), ("D", 1)]
    );
    let d = idx(&tree, "D");
    let b = idx(&tree, "B");
    assert!(tree.record(d).unwrap().is_leaf());
    assert!(!tree.record(b).unwrap().is_leaf());
}

#[test]
fn given_tree_when_computing_then_callbacks_follow_business_structure() {
    let mut tree = build(abdc()).unwrap();
    let mut leaves = Vec::new();
    let mut branches = Vec::new();

    tree.compute(
        |record| leaves.push(record.id),
        |record, children| {
            branches.push((record.id, children.iter().map(|c| c.id).collect::<Vec<_>>()))
        },
    )
    .unwrap();

    // Binary post-order: D, C, B, A
    assert_eq!(leaves, vec!["D", "C"]);
    assert_eq!(
        branches,
        vec![("B", vec!["D"]), ("A", vec!["B", "C"])]
    );
}

#[rstest]
fn given_computed_tree_when_computing_again_then_counts_unchanged(mut budget: TreeArena<Item>) {
    let first = leaf_counts(&budget);

    budget.compute(|_| {}, sum_values).unwrap();

    assert_eq!(leaf_counts(&budget), first);
    assert_eq!(budget.record(idx(&budget, "A")).unwrap().value, 15);
}

#[test]
fn given_empty_tree_when_computing_then_no_callbacks() {
    let mut tree = build(Vec::new()).unwrap();
    let (mut leaf_calls, mut branch_calls) = (0, 0);

    tree.compute(|_| leaf_calls += 1, |_, _| branch_calls += 1)
        .unwrap();

    assert_eq!((leaf_calls, branch_calls), (0, 0));
}

#[test]
fn given_lone_root_when_counting_leaves_then_zero() {
    let tree = count_leaves(vec![item("A", None)], is_root, is_parent_of).unwrap();

    let root = tree.root().unwrap();
    assert_eq!(tree.leaf_count(root), Some(0));
}

#[test]
fn given_tree_when_counting_leaves_then_root_counts_all_leaves() {
    let tree = count_leaves(abdc(), is_root, is_parent_of).unwrap();

    assert_eq!(tree.leaf_count(tree.root().unwrap()), Some(2));
}

#[test]
fn given_empty_list_when_counting_leaves_then_empty_tree() {
    let tree = count_leaves(Vec::<Item>::new(), is_root, is_parent_of).unwrap();

    assert!(tree.root().is_none());
}

#[test]
fn given_stale_counts_when_computing_ancestors_then_matches_full_pass() {
    // Arrange
    let mut tree = build(abdc()).unwrap();
    tree.compute(|_| {}, |_, _| {}).unwrap();
    let expected = leaf_counts(&tree);
    let (b, d) = (idx(&tree, "B"), idx(&tree, "D"));
    tree.record_mut(d).unwrap().set_leaf_count(99);
    tree.record_mut(b).unwrap().set_leaf_count(0);

    // Act
    tree.compute_ancestors(d, |_| {}, |_, _| {}).unwrap();

    // Assert
    assert_eq!(leaf_counts(&tree), expected);
}

#[rstest]
fn given_leaf_value_change_when_computing_ancestors_then_business_ancestors_refresh(
    mut budget: TreeArena<Item>,
) {
    let g = idx(&budget, "G");
    budget.record_mut(g).unwrap().value = 10;

    budget.compute_ancestors(g, |_| {}, sum_values).unwrap();

    assert_eq!(budget.record(idx(&budget, "B")).unwrap().value, 14);
    assert_eq!(budget.record(idx(&budget, "A")).unwrap().value, 23);
}

#[rstest]
fn given_spliced_sibling_when_computing_ancestors_then_preceding_siblings_skipped(
    mut budget: TreeArena<Item>,
) {
    // A's encoded chain is B -> E -> C, so C's binary parents are E, then B, then A.
    let c = idx(&budget, "C");
    let e = idx(&budget, "E");
    assert_eq!(budget.get_node(c).unwrap().parent(), Some(e));
    let mut recomputed = Vec::new();

    budget
        .compute_ancestors(c, |_| {}, |record, _| recomputed.push(record.id))
        .unwrap();

    // E and B sit on the chain but are entered through right links
    assert_eq!(recomputed, vec!["A"]);
}

#[rstest]
fn given_deep_leaf_when_computing_ancestors_then_each_business_ancestor_once(
    mut budget: TreeArena<Item>,
) {
    let d = idx(&budget, "D");
    let mut leaves = Vec::new();
    let mut branches = Vec::new();

    budget
        .compute_ancestors(
            d,
            |record| leaves.push(record.id),
            |record, _| branches.push(record.id),
        )
        .unwrap();

    assert_eq!(leaves, vec!["D"]);
    assert_eq!(branches, vec!["B", "A"]);
}

#[rstest]
fn given_branch_when_computing_ancestors_then_branch_itself_recomputed(
    mut budget: TreeArena<Item>,
) {
    let b = idx(&budget, "B");
    budget.record_mut(b).unwrap().value = -100;

    budget.compute_ancestors(b, |_| {}, sum_values).unwrap();

    assert_eq!(budget.record(b).unwrap().value, 6);
    assert_eq!(budget.record(idx(&budget, "A")).unwrap().value, 15);
}
