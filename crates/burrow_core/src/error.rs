//! # Core Error Types
//!
//! Only configuration problems are errors. Unreachable targets, empty
//! frontiers and hits on empty cells are ordinary `Option`/`bool` results.

use thiserror::Error;

/// Errors raised while assembling or configuring the world.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BurrowError {
    /// A required collaborator was never supplied to a builder.
    #[error("missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The material catalog is inconsistent.
    #[error("invalid material catalog: {0}")]
    InvalidCatalog(String),

    /// A terrain source produced a chunk outside the expected tier order.
    #[error("tier {got} generated out of order, expected tier {expected}")]
    TierOutOfOrder {
        /// The tier the world expected next.
        expected: u32,
        /// The tier that was requested.
        got: u32,
    },
}

/// Result type for world assembly.
pub type BurrowResult<T> = Result<T, BurrowError>;
