//! Terminal rendering of the business tree.

use std::fmt;

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::TreeArena;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<R: fmt::Display> TreeNodeConvert for TreeArena<R> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        self.to_tree_with(|record| record.to_string())
    }
}

impl<R> TreeArena<R> {
    /// Render the business tree, labelling each node with `label`.
    ///
    /// Children appear in `children` order. An empty tree renders as a single
    /// "Empty tree" line.
    pub fn to_tree_with<F>(&self, label: F) -> Tree<String>
    where
        F: Fn(&R) -> String,
    {
        match self.root() {
            Some(root_idx) => self.subtree_with(root_idx, label),
            None => Tree::new("Empty tree".to_string()),
        }
    }

    /// Render the business subtree below (and including) `idx`.
    pub fn subtree_with<F>(&self, idx: Index, label: F) -> Tree<String>
    where
        F: Fn(&R) -> String,
    {
        fn build_tree<R, F>(arena: &TreeArena<R>, node_idx: Index, label: &F) -> Tree<String>
        where
            F: Fn(&R) -> String,
        {
            let Some(node) = arena.get_node(node_idx) else {
                return Tree::new(format!("<missing {node_idx:?}>"));
            };
            let leaves = node
                .children()
                .iter()
                .map(|&child| build_tree(arena, child, label));
            Tree::new(label(&*node.record())).with_leaves(leaves)
        }

        build_tree(self, idx, &label)
    }
}
