//! Rebuild general trees from depth-first record lists.
//!
//! Records arrive as a flat list; two caller predicates say which record is
//! the root and whether one record is the parent of another. The tree is
//! stored as a left-child/right-sibling encoding in an arena, with a separate
//! business `children` list per node used for bottom-up aggregation.
//!
//! ```
//! use lcrs::domain::{count_leaves, Record};
//!
//! struct Item { id: u32, parent: Option<u32>, leaves: usize, leaf: bool }
//!
//! impl Record for Item {
//!     fn leaf_count(&self) -> usize { self.leaves }
//!     fn set_leaf_count(&mut self, count: usize) { self.leaves = count; }
//!     fn is_leaf(&self) -> bool { self.leaf }
//!     fn set_leaf(&mut self, is_leaf: bool) { self.leaf = is_leaf; }
//! }
//!
//! let item = |id, parent| Item { id, parent, leaves: 0, leaf: false };
//! let records = vec![item(1, None), item(2, Some(1)), item(4, Some(2)), item(3, Some(1))];
//!
//! let tree = count_leaves(
//!     records,
//!     |r: &Item| r.parent.is_none(),
//!     |child: &Item, parent: &Item| child.parent == Some(parent.id),
//! )
//! .unwrap();
//!
//! let root = tree.root().unwrap();
//! assert_eq!(tree.leaf_count(root), Some(2));
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
