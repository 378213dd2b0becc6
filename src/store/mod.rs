//! Node Store Module
//!
//! Owns every entry of a tree.
//!
//! ## Responsibilities
//! - Deep-copy key and value bytes into node-owned buffers
//! - Hand out stable `NodeId` handles for the engine's links
//! - Release nodes individually and recycle their slots
//! - Track entry count and payload bytes
//!
//! ## Data Structure Choice
//! Nodes live in a slab-style arena (`Vec` of slots) and refer to each other
//! by index, so the parent/child cycle needs no shared ownership. Parent links
//! are plain indices used only to walk upward during fix-up; ownership is the
//! arena's alone.

mod arena;

pub(crate) use arena::NodeStore;

/// Handle to a node slot inside a [`NodeStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Node color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Which child of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub(crate) fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// A single tree entry
#[derive(Debug)]
pub(crate) struct Node {
    /// Owned copy of the key
    pub key: Box<[u8]>,

    /// Owned copy of the value; its length is the stored length
    pub value: Box<[u8]>,

    pub color: Color,

    /// Non-owning back link (None for the root)
    pub parent: Option<NodeId>,

    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl Node {
    /// Fresh red leaf
    fn leaf(key: Box<[u8]>, value: Box<[u8]>) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn child(&self, dir: Direction) -> Option<NodeId> {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Direction, child: Option<NodeId>) {
        match dir {
            Direction::Left => self.left = child,
            Direction::Right => self.right = child,
        }
    }

    /// Key plus value bytes
    #[inline]
    pub(crate) fn payload_len(&self) -> usize {
        self.key.len() + self.value.len()
    }
}
