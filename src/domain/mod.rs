//! Domain layer: tree reconstruction, aggregation and search
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod aggregate;
pub mod arena;
pub mod builder;
pub mod error;
pub mod record;
pub mod render;
pub mod search;

pub use aggregate::count_leaves;
pub use arena::{TreeArena, TreeNode};
pub use builder::TreeBuilder;
pub use error::{TreeError, TreeResult};
pub use record::Record;
pub use render::TreeNodeConvert;
