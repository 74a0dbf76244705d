//! Domain-level errors (no external dependencies)

use generational_arena::Index;
use thiserror::Error;

/// Errors raised while building or walking a tree.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("no record satisfies the root condition")]
    RootNotFound,

    #[error("node not found in tree: {0:?}")]
    NodeNotFound(Index),

    #[error("tree invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
