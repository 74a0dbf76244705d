//! Shared test records and tree fixtures.
#![allow(dead_code)]

use generational_arena::Index;
use lcrs::domain::{Record, TreeArena, TreeBuilder, TreeResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: &'static str,
    pub parent: Option<&'static str>,
    pub tag: Option<&'static str>,
    pub value: i64,
    pub leaves: usize,
    pub leaf: bool,
}

impl Record for Item {
    fn leaf_count(&self) -> usize {
        self.leaves
    }

    fn set_leaf_count(&mut self, count: usize) {
        self.leaves = count;
    }

    fn is_leaf(&self) -> bool {
        self.leaf
    }

    fn set_leaf(&mut self, is_leaf: bool) {
        self.leaf = is_leaf;
    }
}

pub fn item(id: &'static str, parent: Option<&'static str>) -> Item {
    Item {
        id,
        parent,
        tag: None,
        value: 0,
        leaves: 0,
        leaf: false,
    }
}

pub fn tagged(id: &'static str, parent: Option<&'static str>, tag: &'static str) -> Item {
    Item {
        tag: Some(tag),
        ..item(id, parent)
    }
}

pub fn valued(id: &'static str, parent: Option<&'static str>, value: i64) -> Item {
    Item {
        value,
        ..item(id, parent)
    }
}

pub fn is_root(record: &Item) -> bool {
    record.parent.is_none()
}

pub fn is_parent_of(child: &Item, parent: &Item) -> bool {
    child.parent == Some(parent.id)
}

pub fn build(records: Vec<Item>) -> TreeResult<TreeArena<Item>> {
    TreeBuilder::new(is_root, is_parent_of).build(records)
}

/// A
/// ├── B
/// │   └── D
/// └── C
pub fn abdc() -> Vec<Item> {
    vec![
        item("A", None),
        item("B", Some("A")),
        item("D", Some("B")),
        item("C", Some("A")),
    ]
}

/// Index of the record with `id`; panics when absent.
pub fn idx(tree: &TreeArena<Item>, id: &str) -> Index {
    let root = tree.root().expect("tree has a root");
    tree.find_node(root, |record| record.id == id)
        .unwrap_or_else(|| panic!("{id} not in tree"))
}

pub fn ids(tree: &TreeArena<Item>, indices: impl IntoIterator<Item = Index>) -> Vec<&'static str> {
    indices
        .into_iter()
        .map(|i| tree.record(i).expect("index in tree").id)
        .collect()
}

pub fn children_ids(tree: &TreeArena<Item>, id: &str) -> Vec<&'static str> {
    let node = tree.get_node(idx(tree, id)).expect("node in tree");
    ids(tree, node.children().iter().copied())
}
