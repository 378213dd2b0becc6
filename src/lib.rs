//! # rbstore
//!
//! An in-memory ordered map from opaque byte keys to opaque byte values,
//! kept balanced as a red-black tree:
//! - O(log n) insertion, lookup and removal
//! - Caller-supplied key order, fixed per tree
//! - Keys and values copied in and out; no references escape
//! - Configurable entry and memory budgets
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         RbTree                               │
//! │        (argument validation, comparator search, budget)      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Balancing Engine                           │
//! │     (rotations, insertion fix-up, deletion fix-up)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Node Store                              │
//! │          (slab arena, owned key/value buffers)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rbstore::RbTree;
//!
//! let mut tree = RbTree::new();
//! tree.add(b"hello", b"world").unwrap();
//!
//! let mut buf = [0u8; 16];
//! let n = tree.get(b"hello", &mut buf).unwrap();
//! assert_eq!(&buf[..n], b"world");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod comparator;
pub mod config;
pub mod diagnostics;
pub mod error;

mod engine;
mod store;
mod tree;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use comparator::{KeyComparator, Lexicographic};
pub use config::{TreeConfig, TreeConfigBuilder};
pub use diagnostics::{InvariantReport, ShapeNode};
pub use error::{InvariantViolation, RbError, Result};
pub use store::Color;
pub use tree::RbTree;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of rbstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
