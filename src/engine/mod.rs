//! Balancing Engine Module
//!
//! Structural core of the tree: everything that moves links or colors.
//!
//! ## Responsibilities
//! - Rotation primitives (the only structural move the fix-ups use)
//! - Insertion fix-up after linking a new red leaf
//! - Deletion with successor splicing, then deletion fix-up
//! - Subtree transplant and minimum lookup
//! - Release of every node on teardown
//!
//! ## Design
//! Both fix-ups are written as small state machines: a `classify` step maps
//! the neighbourhood of the current position onto a closed case enum and the
//! loop applies exactly one case per iteration. The engine never compares
//! keys; ordering decisions belong to the facade.

mod delete;
mod insert;
mod rotate;

use crate::error::Result;
use crate::store::{Color, Direction, NodeId, NodeStore};

/// Root link plus the node arena it points into
pub(crate) struct RawTree {
    pub(crate) nodes: NodeStore,
    pub(crate) root: Option<NodeId>,
}

impl RawTree {
    pub(crate) fn new() -> Self {
        Self {
            nodes: NodeStore::new(),
            root: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            nodes: NodeStore::with_capacity(capacity)?,
            root: None,
        })
    }

    // =========================================================================
    // Color Helpers (absent = black)
    // =========================================================================

    #[inline]
    pub(crate) fn is_red(&self, id: Option<NodeId>) -> bool {
        matches!(id, Some(id) if self.nodes[id].color == Color::Red)
    }

    #[inline]
    pub(crate) fn is_black(&self, id: Option<NodeId>) -> bool {
        !self.is_red(id)
    }

    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        self.nodes[id].color = color;
    }

    // =========================================================================
    // Link Helpers
    // =========================================================================

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    #[inline]
    pub(crate) fn child(&self, id: NodeId, dir: Direction) -> Option<NodeId> {
        self.nodes[id].child(dir)
    }

    /// Which side of `parent` the position `child` occupies.
    ///
    /// `child` may be absent (a double-black leaf position); that works as
    /// long as the other side of `parent` is occupied.
    #[inline]
    fn side_of(&self, parent: NodeId, child: Option<NodeId>) -> Direction {
        if self.nodes[parent].left == child {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    /// Replace the subtree rooted at `old` with `new` in `old`'s parent (or at
    /// the root). `old`'s own links are left as they were.
    pub(crate) fn transplant(&mut self, old: NodeId, new: Option<NodeId>) {
        let parent = self.nodes[old].parent;
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(parent, Some(old));
                self.nodes[parent].set_child(side, new);
            }
        }

        if let Some(new) = new {
            self.nodes[new].parent = parent;
        }
    }

    /// Leftmost node of the subtree rooted at `id`
    pub(crate) fn minimum(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Release every node, walking down from the root. Returns how many
    /// nodes were released.
    ///
    /// Only child links are followed; a node is released as soon as its
    /// children have been queued.
    pub(crate) fn release_all(&mut self) -> usize {
        let mut pending: Vec<NodeId> = self.root.take().into_iter().collect();
        let mut released = 0usize;

        while let Some(id) = pending.pop() {
            let node = self.nodes.release(id);
            pending.extend(node.left);
            pending.extend(node.right);
            released += 1;
        }

        self.nodes.reset();
        released
    }
}
