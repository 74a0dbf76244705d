//! Record capability required by the aggregator.

/// A business record carried by a tree node.
///
/// The tree never constructs records. It only reads and writes the two
/// derived fields below; everything else is opaque and visible solely to the
/// caller's predicates and callbacks.
pub trait Record {
    /// Number of business leaves below (and including) this record.
    fn leaf_count(&self) -> usize;

    fn set_leaf_count(&mut self, count: usize);

    /// Whether the last aggregation pass saw this record without business children.
    fn is_leaf(&self) -> bool;

    fn set_leaf(&mut self, is_leaf: bool);
}
