//! Error types for rbstore
//!
//! Provides a unified error type for all tree operations, plus the
//! diagnostic error reported by the invariant checker.

use thiserror::Error;

/// Result type alias using RbError
pub type Result<T> = std::result::Result<T, RbError>;

/// Unified error type for tree operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RbError {
    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    /// A required argument was missing or empty. Always raised before any
    /// mutation, so the tree is untouched.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    NotFound,

    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    /// Allocation failed or a configured budget is exhausted. The tree is left
    /// exactly as it was before the call.
    #[error("Out of memory: {0}")]
    OutOfMemory(String),
}

/// A broken red-black or bookkeeping rule found by
/// [`RbTree::check_invariants`](crate::RbTree::check_invariants)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("root is red")]
    RedRoot,

    #[error("root has a parent link")]
    RootHasParent,

    #[error("red node {key:?} has a red child")]
    RedRedEdge { key: Vec<u8> },

    #[error("black-height mismatch under {key:?}: left {left}, right {right}")]
    BlackHeightMismatch { key: Vec<u8>, left: usize, right: usize },

    #[error("keys out of order: {left:?} is not less than {right:?}")]
    OutOfOrder { left: Vec<u8>, right: Vec<u8> },

    #[error("child of {key:?} does not link back to it")]
    BrokenParentLink { key: Vec<u8> },

    #[error("accounting mismatch: tracked {tracked} {what}, found {found}")]
    Accounting {
        what: &'static str,
        tracked: usize,
        found: usize,
    },
}
