//! Tree Module
//!
//! The public container that validates arguments and drives the engine.
//!
//! ## Responsibilities
//! - Own the comparator, configuration and node arena
//! - Comparator-driven search for lookups and insertion points
//! - Enforce the configured resource budget before allocating
//! - Release every node on clear, destroy and drop

use std::cmp::Ordering;
use std::fmt;

use crate::comparator::{KeyComparator, Lexicographic};
use crate::config::TreeConfig;
use crate::diagnostics::{self, InvariantReport, ShapeNode};
use crate::engine::RawTree;
use crate::error::{InvariantViolation, RbError, Result};
use crate::store::{Direction, NodeId};

/// Outcome of a comparator-driven descent
enum Search {
    /// A node with an equal key
    Found(NodeId),

    /// No equal key; a new node would hang off `parent` on side `dir`
    Vacant {
        parent: Option<NodeId>,
        dir: Direction,
    },
}

/// Ordered map from byte keys to byte values, kept balanced as a red-black
/// tree
///
/// ## Ownership
/// Keys and values are copied in on insertion and copied out on lookup; no
/// reference into the tree ever escapes an operation.
///
/// ## Concurrency
/// Mutation takes `&mut self`. Sharing one tree between threads needs a
/// lock provided by the caller.
pub struct RbTree<C: KeyComparator = Lexicographic> {
    /// Tree configuration
    config: TreeConfig,

    /// Fixed key order for the tree's lifetime
    comparator: C,

    /// Root link and node arena
    raw: RawTree,
}

impl RbTree<Lexicographic> {
    /// Create an empty tree with byte-wise key order and default config
    pub fn new() -> Self {
        Self {
            config: TreeConfig::default(),
            comparator: Lexicographic,
            raw: RawTree::new(),
        }
    }
}

impl Default for RbTree<Lexicographic> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: KeyComparator> RbTree<C> {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create an empty tree ordered by `comparator`
    ///
    /// Fails with `InvalidArgument` when no comparator is given.
    pub fn create(comparator: Option<C>) -> Result<Self> {
        Self::with_config(comparator, TreeConfig::default())
    }

    /// Create an empty tree with an explicit configuration
    pub fn with_config(comparator: Option<C>, config: TreeConfig) -> Result<Self> {
        let comparator = comparator.ok_or(RbError::InvalidArgument("comparator is required"))?;
        let raw = RawTree::with_capacity(config.initial_capacity)?;

        tracing::debug!(
            "Created tree (capacity={}, max_entries={:?}, max_memory_bytes={:?})",
            config.initial_capacity,
            config.max_entries,
            config.max_memory_bytes
        );

        Ok(Self {
            config,
            comparator,
            raw,
        })
    }

    /// Release every entry and the tree itself. Returns how many entries
    /// were released.
    pub fn destroy(mut self) -> usize {
        let released = self.raw.release_all();
        tracing::debug!("Destroyed tree, released {} entries", released);
        released
    }

    /// Release every entry; the tree stays usable
    pub fn clear(&mut self) {
        let released = self.raw.release_all();
        tracing::debug!("Cleared tree, released {} entries", released);
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Insert a copy of `key` → `value` if `key` is not present
    ///
    /// Steps:
    /// 1. Validate arguments (non-empty key and value)
    /// 2. Search for an equal key; if found, succeed without touching it
    /// 3. Check the configured budget
    /// 4. Allocate the node (copies key and value)
    /// 5. Link it as a red leaf and rebalance
    ///
    /// A duplicate key is not an update: the first value stays. Use
    /// [`add_or_replace`](Self::add_or_replace) to overwrite.
    pub fn add(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        validate_key(key)?;
        validate_value(value)?;

        match self.search(key) {
            Search::Found(_) => {
                tracing::trace!("add: key of {} bytes already present, kept first value", key.len());
                Ok(())
            }
            Search::Vacant { parent, dir } => self.insert_new(key, value, parent, dir),
        }
    }

    /// Insert `key` → `value`, overwriting any existing value
    ///
    /// Returns the previous value when the key was already present.
    pub fn add_or_replace(&mut self, key: &[u8], value: &[u8]) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        validate_value(value)?;

        match self.search(key) {
            Search::Found(id) => {
                let old_len = self.raw.nodes[id].value.len();
                let memory_after = self.memory_usage() - old_len + value.len();
                self.config
                    .check_budget(self.len(), memory_after)
                    .map_err(log_oom)?;

                let old = self.raw.nodes.replace_value(id, value).map_err(log_oom)?;
                tracing::trace!("add_or_replace: replaced {} byte value", old.len());
                Ok(Some(old.into_vec()))
            }
            Search::Vacant { parent, dir } => {
                self.insert_new(key, value, parent, dir)?;
                Ok(None)
            }
        }
    }

    /// Copy the value stored under `key` into `out`
    ///
    /// Copies `min(out.len(), stored length)` bytes and returns that count;
    /// bytes of `out` past the count are left untouched.
    pub fn get(&self, key: &[u8], out: &mut [u8]) -> Result<usize> {
        validate_key(key)?;
        if out.is_empty() {
            return Err(RbError::InvalidArgument("output buffer has zero capacity"));
        }

        let id = self.find(key).ok_or(RbError::NotFound)?;
        let stored = &self.raw.nodes[id].value;
        let copied = stored.len().min(out.len());
        out[..copied].copy_from_slice(&stored[..copied]);
        Ok(copied)
    }

    /// Owned copy of the full value stored under `key`
    pub fn get_vec(&self, key: &[u8]) -> Result<Vec<u8>> {
        validate_key(key)?;
        let id = self.find(key).ok_or(RbError::NotFound)?;
        Ok(self.raw.nodes[id].value.to_vec())
    }

    /// Length of the value stored under `key`
    pub fn value_len(&self, key: &[u8]) -> Result<usize> {
        validate_key(key)?;
        let id = self.find(key).ok_or(RbError::NotFound)?;
        Ok(self.raw.nodes[id].value.len())
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        !key.is_empty() && self.find(key).is_some()
    }

    /// Delete the entry for `key` and release its buffers
    pub fn remove(&mut self, key: &[u8]) -> Result<()> {
        validate_key(key)?;
        let id = self.find(key).ok_or(RbError::NotFound)?;

        let removed = self.raw.delete(id);
        tracing::trace!(
            "remove: released {} key bytes, {} value bytes",
            removed.key.len(),
            removed.value.len()
        );
        Ok(())
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn search(&self, key: &[u8]) -> Search {
        let mut parent = None;
        let mut dir = Direction::Left;
        let mut cursor = self.raw.root;

        while let Some(id) = cursor {
            dir = match self.comparator.compare(key, &self.raw.nodes[id].key) {
                Ordering::Equal => return Search::Found(id),
                Ordering::Less => Direction::Left,
                Ordering::Greater => Direction::Right,
            };
            parent = Some(id);
            cursor = self.raw.child(id, dir);
        }

        Search::Vacant { parent, dir }
    }

    fn find(&self, key: &[u8]) -> Option<NodeId> {
        match self.search(key) {
            Search::Found(id) => Some(id),
            Search::Vacant { .. } => None,
        }
    }

    /// Budget check, allocation, link and rebalance. Nothing is mutated
    /// unless allocation succeeds.
    fn insert_new(
        &mut self,
        key: &[u8],
        value: &[u8],
        parent: Option<NodeId>,
        dir: Direction,
    ) -> Result<()> {
        let memory_after = self
            .memory_usage()
            .saturating_add(key.len())
            .saturating_add(value.len());
        self.config
            .check_budget(self.len() + 1, memory_after)
            .map_err(log_oom)?;

        let id = self.raw.nodes.alloc(key, value).map_err(log_oom)?;
        self.raw.insert_leaf(id, parent, dir);

        tracing::trace!(
            "add: inserted {} key bytes, {} value bytes ({} entries)",
            key.len(),
            value.len(),
            self.len()
        );
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of entries
    pub fn len(&self) -> usize {
        self.raw.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.root.is_none()
    }

    /// Total key + value bytes held
    pub fn memory_usage(&self) -> usize {
        self.raw.nodes.payload_bytes()
    }

    /// Get the configuration
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Verify the red-black rules, key order, parent links and accounting
    pub fn check_invariants(&self) -> std::result::Result<InvariantReport, InvariantViolation> {
        diagnostics::check(&self.raw, &self.comparator)
    }

    /// Owned snapshot of the tree's structure (None when empty)
    pub fn shape(&self) -> Option<ShapeNode> {
        diagnostics::shape(&self.raw)
    }
}

impl<C: KeyComparator> Drop for RbTree<C> {
    fn drop(&mut self) {
        self.raw.release_all();
    }
}

impl<C: KeyComparator> fmt::Debug for RbTree<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RbTree")
            .field("len", &self.len())
            .field("memory_usage", &self.memory_usage())
            .field("config", &self.config)
            .finish()
    }
}

fn validate_key(key: &[u8]) -> Result<()> {
    if key.is_empty() {
        return Err(RbError::InvalidArgument("key must not be empty"));
    }
    Ok(())
}

fn validate_value(value: &[u8]) -> Result<()> {
    if value.is_empty() {
        return Err(RbError::InvalidArgument("value must not be empty"));
    }
    Ok(())
}

fn log_oom(error: RbError) -> RbError {
    tracing::warn!("Insert rejected: {}", error);
    error
}
