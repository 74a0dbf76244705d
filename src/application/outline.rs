//! Outline records: a concrete `Record` loaded from TOML.
//!
//! An outline file lists records in depth-first order. A record without a
//! `parent` is the root; every other record names its parent by id.

use std::fmt;
use std::fs;
use std::path::Path;

use generational_arena::Index;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{count_leaves, Record, TreeArena};

/// One line of an outline: an id, its parent's id and an amount to roll up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(skip)]
    leaf_count: usize,
    #[serde(skip)]
    is_leaf: bool,
}

impl OutlineRecord {
    pub fn new(id: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            id: id.into(),
            parent: parent.map(str::to_string),
            label: None,
            amount: 0.0,
            leaf_count: 0,
            is_leaf: false,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label if present, id otherwise.
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_child_of(&self, parent: &OutlineRecord) -> bool {
        self.parent.as_deref() == Some(parent.id.as_str())
    }
}

impl Record for OutlineRecord {
    fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    fn set_leaf_count(&mut self, count: usize) {
        self.leaf_count = count;
    }

    fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    fn set_leaf(&mut self, is_leaf: bool) {
        self.is_leaf = is_leaf;
    }
}

impl fmt::Display for OutlineRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub type OutlineTree = TreeArena<OutlineRecord>;

#[derive(Debug, Deserialize)]
struct OutlineFile {
    #[serde(default)]
    records: Vec<OutlineRecord>,
}

/// Parse outline TOML. `path` is only used for error messages.
#[instrument(level = "debug", skip(content))]
pub fn parse_outline(content: &str, path: &Path) -> ApplicationResult<Vec<OutlineRecord>> {
    let invalid = |message: String| ApplicationError::InvalidOutline {
        path: path.to_path_buf(),
        message,
    };

    let file: OutlineFile = toml::from_str(content).map_err(|e| invalid(e.to_string()))?;

    let duplicates: Vec<&str> = file
        .records
        .iter()
        .map(|record| record.id.as_str())
        .duplicates()
        .collect();
    if !duplicates.is_empty() {
        return Err(invalid(format!("duplicate ids: {}", duplicates.join(", "))));
    }

    debug!(count = file.records.len(), "parsed outline");
    Ok(file.records)
}

#[instrument(level = "debug")]
pub fn load_outline(path: &Path) -> ApplicationResult<Vec<OutlineRecord>> {
    let content = fs::read_to_string(path).with_path_context("read outline", path)?;
    parse_outline(&content, path)
}

/// Build the outline tree with leaf counts populated and links verified.
#[instrument(level = "debug", skip(records))]
pub fn build_outline(records: Vec<OutlineRecord>) -> ApplicationResult<OutlineTree> {
    let tree = count_leaves(records, OutlineRecord::is_root, OutlineRecord::is_child_of)?;
    tree.check_invariants()?;
    Ok(tree)
}

fn sum_children(record: &mut OutlineRecord, children: &[&OutlineRecord]) {
    record.amount = children.iter().map(|child| child.amount).sum();
}

/// Replace every branch amount with the sum of its children's amounts.
#[instrument(level = "debug", skip(tree))]
pub fn rollup_amounts(tree: &mut OutlineTree) -> ApplicationResult<()> {
    tree.compute(|_| {}, sum_children)?;
    Ok(())
}

/// Locate the record with `id`, searching from the root.
#[instrument(level = "debug", skip(tree))]
pub fn find_record(tree: &OutlineTree, id: &str, right_first: bool) -> ApplicationResult<Index> {
    let not_found = || ApplicationError::RecordNotFound(id.to_string());
    let root = tree.root().ok_or_else(not_found)?;
    let found = if right_first {
        tree.find_node_right_first(root, |record| record.id == id)
    } else {
        tree.find_node(root, |record| record.id == id)
    };
    found.ok_or_else(not_found)
}

/// Set the amount of leaf `id` and refresh its ancestors' sums.
///
/// Expects amounts to be rolled up already; only the ancestor chain is
/// recomputed.
#[instrument(level = "debug", skip(tree))]
pub fn update_amount(
    tree: &mut OutlineTree,
    id: &str,
    amount: f64,
    right_first: bool,
) -> ApplicationResult<Index> {
    let idx = find_record(tree, id, right_first)?;
    if tree
        .get_node(idx)
        .is_some_and(|node| !node.is_business_leaf())
    {
        return Err(ApplicationError::NotALeaf(id.to_string()));
    }
    if let Some(record) = tree.record_mut(idx) {
        record.amount = amount;
    }

    tree.compute_ancestors(idx, |_| {}, sum_children)?;
    Ok(idx)
}

/// Names from the root down to `idx`.
pub fn ancestry(tree: &OutlineTree, idx: Index) -> Vec<String> {
    let mut names: Vec<String> = std::iter::successors(Some(idx), |&current| {
        tree.business_parent(current)
    })
    .filter_map(|current| tree.record(current).map(|record| record.name().to_string()))
    .collect();
    names.reverse();
    names
}

fn outline_label(settings: &Settings) -> impl Fn(&OutlineRecord) -> String + '_ {
    move |record: &OutlineRecord| {
        let mut label = record.name().to_string();
        if settings.show_leaf_counts {
            label.push_str(&format!(" [{}]", record.leaf_count()));
        }
        if settings.show_amounts {
            label.push_str(&format!(" = {:.*}", settings.precision, record.amount));
        }
        label
    }
}

/// Render the tree with the annotations enabled in `settings`.
pub fn render_outline(tree: &OutlineTree, settings: &Settings) -> Tree<String> {
    tree.to_tree_with(outline_label(settings))
}

/// Render the subtree below `idx`.
pub fn render_subtree(tree: &OutlineTree, idx: Index, settings: &Settings) -> Tree<String> {
    tree.subtree_with(idx, outline_label(settings))
}

/// Names of the business leaves, in outline order.
pub fn leaf_names(tree: &OutlineTree) -> Vec<String> {
    tree.leaf_nodes()
        .into_iter()
        .filter_map(|idx| tree.record(idx).map(|record| record.name().to_string()))
        .collect()
}
