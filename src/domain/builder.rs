//! Tree builder: rebuilds a hierarchy from a depth-first ordered record list.

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::TreeArena;
use crate::domain::error::{TreeError, TreeResult};

/// Constructs left-child/right-sibling trees from flat record lists.
///
/// `is_root` picks the root record. `is_parent_of(child, parent)` tells
/// whether `parent` is the direct business parent of `child`. Records must
/// arrive in depth-first order: every record's parent is expected among the
/// most recently attached ancestors.
pub struct TreeBuilder<F, P> {
    is_root: F,
    is_parent_of: P,
}

impl<F, P> TreeBuilder<F, P> {
    pub fn new(is_root: F, is_parent_of: P) -> Self {
        Self {
            is_root,
            is_parent_of,
        }
    }

    /// Build the tree. Empty input yields an empty tree.
    ///
    /// A record whose parent is not on the ancestor stack is attached under
    /// the root rather than rejected.
    #[instrument(level = "debug", skip_all)]
    pub fn build<R, I>(&self, records: I) -> TreeResult<TreeArena<R>>
    where
        I: IntoIterator<Item = R>,
        F: Fn(&R) -> bool,
        P: Fn(&R, &R) -> bool,
    {
        let mut records: Vec<R> = records.into_iter().collect();
        let mut tree = TreeArena::new();
        if records.is_empty() {
            debug!("no records, returning empty tree");
            return Ok(tree);
        }

        let root_pos = records
            .iter()
            .position(|record| (self.is_root)(record))
            .ok_or(TreeError::RootNotFound)?;
        let root = tree.insert_root(records.remove(root_pos));
        debug!(root_pos, count = records.len() + 1, "building tree");

        let mut stack: Vec<Index> = vec![root];
        for record in records {
            let parent_idx = self.resolve_parent(&tree, &mut stack, root, &record)?;
            let node_idx = tree.attach_child(record, parent_idx)?;
            trace!(?node_idx, ?parent_idx, "attached");
            stack.push(node_idx);
        }

        Ok(tree)
    }

    /// Pops the ancestor stack until the top is the parent of `record`.
    ///
    /// When the stack runs dry the root is pushed back and returned.
    fn resolve_parent<R>(
        &self,
        tree: &TreeArena<R>,
        stack: &mut Vec<Index>,
        root: Index,
        record: &R,
    ) -> TreeResult<Index>
    where
        P: Fn(&R, &R) -> bool,
    {
        while let Some(&candidate) = stack.last() {
            if (self.is_parent_of)(record, &*tree.node(candidate)?.record()) {
                return Ok(candidate);
            }
            stack.pop();
        }

        debug!("parent not found on ancestor stack, attaching under root");
        stack.push(root);
        Ok(root)
    }
}
