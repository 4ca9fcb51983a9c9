//! Error types for tree generation and export.

use thiserror::Error;

/// Errors that can occur while generating, rendering or exporting a tree.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Configuration rejected before any work was done.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A shaping function returned output inconsistent with its own
    /// child count (only raised in strict mode).
    #[error(
        "shaping contract violated at depth {depth}: {expected} children requested but {actual} orientation offsets returned"
    )]
    ShapeContractViolation {
        depth: usize,
        expected: usize,
        actual: usize,
    },

    /// Branching did not terminate within the configured depth.
    #[error("branch recursion exceeded {limit} levels; thickness is not shrinking below the minimum")]
    RecursionLimit { limit: usize },

    /// The silhouette cannot be rasterized.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Rasterization was asked to fill an empty silhouette.
    #[error("silhouette is empty")]
    EmptySilhouette,

    /// A substitution rule could not be built.
    #[error("invalid substitution pattern {pattern:?}: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },

    /// Export failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
