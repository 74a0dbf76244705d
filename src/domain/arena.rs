use std::cell::{Ref, RefCell};
use std::collections::HashSet;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::record::Record;

/// Tree node in the arena-based left-child/right-sibling encoding.
#[derive(Debug)]
pub struct TreeNode<R> {
    /// Business record, behind a `RefCell` so a branch can be written while its
    /// children are read.
    record: RefCell<R>,
    /// Structural parent in the binary encoding, None for the root
    parent: Option<Index>,
    /// First encoded child
    left: Option<Index>,
    /// Next encoded sibling
    right: Option<Index>,
    /// Business-level children, in attachment order
    children: Vec<Index>,
}

impl<R> TreeNode<R> {
    fn new(record: R) -> Self {
        Self {
            record: RefCell::new(record),
            parent: None,
            left: None,
            right: None,
            children: Vec::new(),
        }
    }

    pub fn record(&self) -> Ref<'_, R> {
        self.record.borrow()
    }

    pub(crate) fn record_cell(&self) -> &RefCell<R> {
        &self.record
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn left(&self) -> Option<Index> {
        self.left
    }

    pub fn right(&self) -> Option<Index> {
        self.right
    }

    pub fn children(&self) -> &[Index] {
        &self.children
    }

    /// True when the node has no business children.
    pub fn is_business_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based tree holding every node of one reconstructed hierarchy.
///
/// All links (`parent`, `left`, `right`, `children`) are arena indices. The
/// arena is the single owner; nodes are never removed individually.
#[derive(Debug)]
pub struct TreeArena<R> {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode<R>>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl<R> Default for TreeArena<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> TreeArena<R> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self, record))]
    pub(crate) fn insert_root(&mut self, record: R) -> Index {
        let idx = self.arena.insert(TreeNode::new(record));
        self.root = Some(idx);
        idx
    }

    /// Attach `record` as a business child of `parent_idx`.
    ///
    /// The first child takes the `left` slot, the second hangs off the first
    /// child's `right`, and every later child is spliced in directly after the
    /// first child, ahead of the earlier siblings. The business `children`
    /// list is always appended to, so the two orders diverge from the third
    /// child on.
    pub(crate) fn attach_child(&mut self, record: R, parent_idx: Index) -> TreeResult<Index> {
        let first = self.node(parent_idx)?.left;
        let node_idx = self.arena.insert(TreeNode::new(record));

        match first {
            None => {
                self.node_mut(parent_idx)?.left = Some(node_idx);
                self.node_mut(node_idx)?.parent = Some(parent_idx);
            }
            Some(first_idx) => match self.node(first_idx)?.right {
                None => {
                    self.node_mut(first_idx)?.right = Some(node_idx);
                    self.node_mut(node_idx)?.parent = Some(first_idx);
                }
                Some(second_idx) => {
                    self.node_mut(second_idx)?.parent = Some(node_idx);
                    let node = self.node_mut(node_idx)?;
                    node.right = Some(second_idx);
                    node.parent = Some(first_idx);
                    self.node_mut(first_idx)?.right = Some(node_idx);
                }
            },
        }

        self.node_mut(parent_idx)?.children.push(node_idx);
        Ok(node_idx)
    }

    pub(crate) fn node(&self, idx: Index) -> TreeResult<&TreeNode<R>> {
        self.arena.get(idx).ok_or(TreeError::NodeNotFound(idx))
    }

    fn node_mut(&mut self, idx: Index) -> TreeResult<&mut TreeNode<R>> {
        self.arena.get_mut(idx).ok_or(TreeError::NodeNotFound(idx))
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode<R>> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Shared view of the record stored at `idx`.
    pub fn record(&self, idx: Index) -> Option<Ref<'_, R>> {
        self.arena.get(idx).map(TreeNode::record)
    }

    /// Exclusive access to the record stored at `idx`.
    pub fn record_mut(&mut self, idx: Index) -> Option<&mut R> {
        self.arena.get_mut(idx).map(|node| node.record.get_mut())
    }

    /// Records of the business children of `idx`, in `children` order.
    pub fn children_records(&self, idx: Index) -> TreeResult<Vec<Ref<'_, R>>> {
        self.node(idx)?
            .children
            .iter()
            .map(|&child| {
                let node = self.node(child)?;
                node.record.try_borrow().map_err(|_| {
                    TreeError::InvariantViolation(format!("record of {child:?} is mutably borrowed"))
                })
            })
            .collect()
    }

    /// Walks binary parents until the node is entered through a `left` link.
    pub fn business_parent(&self, idx: Index) -> Option<Index> {
        let mut current = idx;
        while let Some(parent_idx) = self.arena.get(current)?.parent {
            if self.arena.get(parent_idx)?.left == Some(current) {
                return Some(parent_idx);
            }
            current = parent_idx;
        }
        None
    }

    /// Iterates the encoded sibling chain below `idx`: `left`, then `right` links.
    pub fn encoded_children(&self, idx: Index) -> EncodedChildren<'_, R> {
        EncodedChildren {
            arena: self,
            next: self.arena.get(idx).and_then(TreeNode::left),
        }
    }

    /// Pre-order over the business structure, root first.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_, R> {
        TreeIterator::new(self)
    }

    /// Post-order over the binary encoding: left subtree, right subtree, node.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_, R> {
        PostOrderIterator::new(self)
    }

    /// Generic post-order hook; visits every node once, mutates nothing.
    #[instrument(level = "debug", skip(self, visit))]
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(Index, &TreeNode<R>),
    {
        for (idx, node) in self.iter_postorder() {
            visit(idx, node);
        }
    }

    /// Number of levels in the business tree, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();

        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.arena.get(idx) {
                stack.extend(node.children.iter().map(|&child| (child, depth + 1)));
            }
        }

        max_depth
    }

    /// Business leaves in pre-order. A lone root counts as a leaf here.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.is_business_leaf())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Consumes the tree and returns its records: root first, then the rest
    /// in input order.
    pub fn into_records(self) -> Vec<R> {
        self.arena
            .into_iter()
            .map(|node| node.record.into_inner())
            .collect()
    }

    /// Verifies that the three link systems agree.
    #[instrument(level = "debug", skip(self))]
    pub fn check_invariants(&self) -> TreeResult<()> {
        let violation = |msg: String| Err(TreeError::InvariantViolation(msg));

        let Some(root) = self.root else {
            return if self.arena.is_empty() {
                Ok(())
            } else {
                violation(format!("{} nodes but no root", self.arena.len()))
            };
        };

        let parentless: Vec<Index> = self
            .arena
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(idx, _)| idx)
            .collect();
        if parentless != [root] {
            return violation(format!("expected only the root to be parentless, got {parentless:?}"));
        }

        let mut seen = HashSet::new();
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            if !seen.insert(idx) {
                return violation(format!("{idx:?} reached twice"));
            }
            let node = self.node(idx)?;
            for link in [node.left, node.right].into_iter().flatten() {
                if self.node(link)?.parent != Some(idx) {
                    return violation(format!("{link:?} does not point back to {idx:?}"));
                }
                stack.push(link);
            }

            if node.left.is_some() == node.children.is_empty() {
                return violation(format!("{idx:?}: left link and children list disagree"));
            }
            let chain: HashSet<Index> = self.encoded_children(idx).map(|(c, _)| c).collect();
            let listed: HashSet<Index> = node.children.iter().copied().collect();
            if chain != listed || listed.len() != node.children.len() {
                return violation(format!("{idx:?}: encoded chain and children list differ"));
            }
        }

        if seen.len() != self.arena.len() {
            return violation(format!(
                "{} of {} nodes reachable from root",
                seen.len(),
                self.arena.len()
            ));
        }
        Ok(())
    }
}

impl<R: Record> TreeArena<R> {
    /// Leaf count stored on the record at `idx`.
    pub fn leaf_count(&self, idx: Index) -> Option<usize> {
        self.record(idx).map(|record| record.leaf_count())
    }
}

pub struct EncodedChildren<'a, R> {
    arena: &'a TreeArena<R>,
    next: Option<Index>,
}

impl<'a, R> Iterator for EncodedChildren<'a, R> {
    type Item = (Index, &'a TreeNode<R>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let node = self.arena.get_node(idx)?;
        self.next = node.right;
        Some((idx, node))
    }
}

pub struct TreeIterator<'a, R> {
    arena: &'a TreeArena<R>,
    stack: Vec<Index>,
}

impl<'a, R> TreeIterator<'a, R> {
    fn new(arena: &'a TreeArena<R>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a, R> Iterator for TreeIterator<'a, R> {
    type Item = (Index, &'a TreeNode<R>);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.arena.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev().copied());
        Some((current_idx, node))
    }
}

pub struct PostOrderIterator<'a, R> {
    arena: &'a TreeArena<R>,
    stack: Vec<(Index, bool)>,
}

impl<'a, R> PostOrderIterator<'a, R> {
    fn new(arena: &'a TreeArena<R>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a, R> Iterator for PostOrderIterator<'a, R> {
    type Item = (Index, &'a TreeNode<R>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                if let Some(right) = node.right {
                    self.stack.push((right, false));
                }
                if let Some(left) = node.left {
                    self.stack.push((left, false));
                }
            }
        }
        None
    }
}
