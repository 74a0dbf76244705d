//! Application layer: outline records and the services built on the tree
//!
//! This layer orchestrates domain logic and owns file access.

pub mod error;
pub mod error_ext;
pub mod outline;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use outline::{OutlineRecord, OutlineTree};
