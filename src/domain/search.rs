//! Predicate search over the binary encoding.

use generational_arena::Index;
use tracing::{instrument, trace};

use crate::domain::arena::{TreeArena, TreeNode};

type Link<R> = fn(&TreeNode<R>) -> Option<Index>;

impl<R> TreeArena<R> {
    /// First node reachable from `start` whose record satisfies `predicate`.
    ///
    /// Each node is tested when first reached; the `left` link is then
    /// followed before any pending `right` link. Stops at the first match.
    #[instrument(level = "debug", skip(self, predicate))]
    pub fn find_node<P>(&self, start: Index, mut predicate: P) -> Option<Index>
    where
        P: FnMut(&R) -> bool,
    {
        self.find_directed(start, &mut predicate, TreeNode::left, TreeNode::right)
    }

    /// Mirror of [`TreeArena::find_node`]: `right` links before `left`.
    ///
    /// Later siblings sit before earlier ones on the right chain once a node
    /// has three or more children, so this prefers shallow, recently attached
    /// nodes over descending into earlier siblings' subtrees.
    #[instrument(level = "debug", skip(self, predicate))]
    pub fn find_node_right_first<P>(&self, start: Index, mut predicate: P) -> Option<Index>
    where
        P: FnMut(&R) -> bool,
    {
        self.find_directed(start, &mut predicate, TreeNode::right, TreeNode::left)
    }

    fn find_directed<P>(
        &self,
        start: Index,
        predicate: &mut P,
        first: Link<R>,
        second: Link<R>,
    ) -> Option<Index>
    where
        P: FnMut(&R) -> bool,
    {
        let mut stack: Vec<Index> = Vec::new();
        let mut current = Some(start);

        loop {
            match current {
                Some(idx) => {
                    let node = self.get_node(idx)?;
                    if predicate(&*node.record()) {
                        trace!(?idx, "match");
                        return Some(idx);
                    }
                    stack.push(idx);
                    current = first(node);
                }
                None => {
                    let idx = stack.pop()?;
                    current = self.get_node(idx).and_then(second);
                }
            }
        }
    }
}
