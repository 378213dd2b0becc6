//! Configuration for rbstore
//!
//! Centralized tree configuration with sensible defaults.

use crate::error::{RbError, Result};

/// Configuration for a single tree instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    // -------------------------------------------------------------------------
    // Arena Configuration
    // -------------------------------------------------------------------------
    /// Number of node slots reserved up front.
    /// Growth past this is still allowed, it just allocates.
    pub initial_capacity: usize,

    // -------------------------------------------------------------------------
    // Budget Configuration
    // -------------------------------------------------------------------------
    /// Max number of live entries (None = unbounded).
    /// Inserting past it fails with `OutOfMemory`.
    pub max_entries: Option<usize>,

    /// Max total key + value bytes held by the tree (None = unbounded)
    pub max_memory_bytes: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            max_entries: None,
            max_memory_bytes: None,
        }
    }
}

impl TreeConfig {
    /// Create a new config builder
    pub fn builder() -> TreeConfigBuilder {
        TreeConfigBuilder::default()
    }

    /// Fail with `OutOfMemory` if a tree holding `entries` entries and
    /// `memory` payload bytes would be over budget
    pub(crate) fn check_budget(&self, entries: usize, memory: usize) -> Result<()> {
        if let Some(max) = self.max_entries {
            if entries > max {
                return Err(RbError::OutOfMemory(format!("entry limit of {} reached", max)));
            }
        }

        if let Some(max) = self.max_memory_bytes {
            if memory > max {
                return Err(RbError::OutOfMemory(format!(
                    "memory budget of {} bytes exceeded ({} needed)",
                    max, memory
                )));
            }
        }

        Ok(())
    }
}

/// Builder for TreeConfig
#[derive(Default)]
pub struct TreeConfigBuilder {
    config: TreeConfig,
}

impl TreeConfigBuilder {
    /// Set the number of node slots to reserve up front
    pub fn initial_capacity(mut self, slots: usize) -> Self {
        self.config.initial_capacity = slots;
        self
    }

    /// Cap the number of live entries
    pub fn max_entries(mut self, count: usize) -> Self {
        self.config.max_entries = Some(count);
        self
    }

    /// Cap the total payload (key + value bytes)
    pub fn max_memory_bytes(mut self, bytes: usize) -> Self {
        self.config.max_memory_bytes = Some(bytes);
        self
    }

    pub fn build(self) -> TreeConfig {
        self.config
    }
}
