//! Bottom-up aggregation over the binary encoding.
//!
//! Leaf or branch is decided by the business `children` list, never by the
//! binary links: a node with a `right` sibling but no children is a leaf.

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{TreeArena, TreeNode};
use crate::domain::builder::TreeBuilder;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::record::Record;

impl<R: Record> TreeArena<R> {
    /// Full pass: recompute every node in binary post-order.
    ///
    /// Leaves get a leaf count of 1 and their leaf flag set before `on_leaf`
    /// runs. Branches get the sum of their children's leaf counts before
    /// `on_branch` runs with the children's records in `children` order.
    /// Post-order over the encoding visits every business child before its
    /// parent, so branch callbacks always see final child values.
    #[instrument(level = "debug", skip_all)]
    pub fn compute<L, B>(&mut self, mut on_leaf: L, mut on_branch: B) -> TreeResult<()>
    where
        L: FnMut(&mut R),
        B: FnMut(&mut R, &[&R]),
    {
        let mut visited = 0usize;
        for (_, node) in self.iter_postorder() {
            self.recompute_node(node, &mut on_leaf, &mut on_branch)?;
            visited += 1;
        }
        debug!(visited, "full aggregation pass");
        Ok(())
    }

    /// Incremental pass: recompute `idx`, then propagate up the binary parents.
    ///
    /// A parent is recomputed (as a branch) only when the node below it sits
    /// in its primary child slot, i.e. is its `left` link. Parents reached
    /// through a `right` link are preceding siblings and are skipped. Every
    /// business ancestor is entered through its primary slot, so all of them
    /// are refreshed, bottom-up; nothing else on the chain is.
    #[instrument(level = "debug", skip(self, on_leaf, on_branch))]
    pub fn compute_ancestors<L, B>(
        &mut self,
        idx: Index,
        mut on_leaf: L,
        mut on_branch: B,
    ) -> TreeResult<()>
    where
        L: FnMut(&mut R),
        B: FnMut(&mut R, &[&R]),
    {
        self.recompute_node(self.node(idx)?, &mut on_leaf, &mut on_branch)?;

        let mut current = idx;
        while let Some(parent_idx) = self.node(current)?.parent() {
            let parent = self.node(parent_idx)?;
            if parent.left() == Some(current) {
                trace!(?parent_idx, "recomputing ancestor");
                self.recompute_branch(parent, &mut on_branch)?;
            }
            current = parent_idx;
        }
        Ok(())
    }

    fn recompute_node<L, B>(
        &self,
        node: &TreeNode<R>,
        on_leaf: &mut L,
        on_branch: &mut B,
    ) -> TreeResult<()>
    where
        L: FnMut(&mut R),
        B: FnMut(&mut R, &[&R]),
    {
        if !node.is_business_leaf() {
            return self.recompute_branch(node, on_branch);
        }

        let mut record = borrow_record_mut(node)?;
        record.set_leaf_count(1);
        record.set_leaf(true);
        on_leaf(&mut *record);
        Ok(())
    }

    fn recompute_branch<B>(&self, node: &TreeNode<R>, on_branch: &mut B) -> TreeResult<()>
    where
        B: FnMut(&mut R, &[&R]),
    {
        let children = node
            .children()
            .iter()
            .map(|&child| {
                self.node(child)?.record_cell().try_borrow().map_err(|_| {
                    TreeError::InvariantViolation(format!("child {child:?} is being written"))
                })
            })
            .collect::<TreeResult<Vec<_>>>()?;
        let views: Vec<&R> = children.iter().map(|child| &**child).collect();

        let mut record = borrow_record_mut(node)?;
        record.set_leaf_count(views.iter().map(|child| child.leaf_count()).sum());
        record.set_leaf(false);
        on_branch(&mut *record, &views);
        Ok(())
    }
}

fn borrow_record_mut<R>(node: &TreeNode<R>) -> TreeResult<std::cell::RefMut<'_, R>> {
    node.record_cell()
        .try_borrow_mut()
        .map_err(|_| TreeError::InvariantViolation("record is already borrowed".to_string()))
}

/// Build the tree and populate leaf counts, without callbacks.
///
/// A root without business children ends up with a leaf count of 0, not 1.
/// Empty input yields an empty tree.
#[instrument(level = "debug", skip_all)]
pub fn count_leaves<R, I, F, P>(records: I, is_root: F, is_parent_of: P) -> TreeResult<TreeArena<R>>
where
    R: Record,
    I: IntoIterator<Item = R>,
    F: Fn(&R) -> bool,
    P: Fn(&R, &R) -> bool,
{
    let mut tree = TreeBuilder::new(is_root, is_parent_of).build(records)?;
    let Some(root) = tree.root() else {
        return Ok(tree);
    };

    tree.compute(|_| {}, |_, _| {})?;

    if tree.node(root)?.is_business_leaf() {
        if let Some(record) = tree.record_mut(root) {
            record.set_leaf_count(0);
        }
    }
    Ok(tree)
}
