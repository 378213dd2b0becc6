//! NodeStore implementation
//!
//! Slab arena with an intrusive free list threaded through vacant slots.

use std::ops::{Index, IndexMut};

use crate::error::{RbError, Result};

use super::{Node, NodeId};

enum Slot {
    Occupied(Node),
    Vacant { next_free: Option<NodeId> },
}

/// Arena holding every node of one tree
pub(crate) struct NodeStore {
    slots: Vec<Slot>,

    /// Head of the vacant-slot chain
    free_head: Option<NodeId>,

    /// Live node count
    len: usize,

    /// Sum of key + value lengths over live nodes
    payload_bytes: usize,
}

impl NodeStore {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
            payload_bytes: 0,
        }
    }

    /// Create an empty store with `capacity` slots reserved
    pub(crate) fn with_capacity(capacity: usize) -> Result<Self> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity).map_err(|e| {
            RbError::OutOfMemory(format!("reserving {} node slots: {}", capacity, e))
        })?;

        Ok(Self {
            slots,
            free_head: None,
            len: 0,
            payload_bytes: 0,
        })
    }

    /// Allocate a red, unlinked node holding copies of `key` and `value`
    ///
    /// Every fallible step runs before the store is touched, so on error the
    /// store is exactly as it was.
    pub(crate) fn alloc(&mut self, key: &[u8], value: &[u8]) -> Result<NodeId> {
        let key = copy_bytes(key, "key")?;
        let value = copy_bytes(value, "value")?;

        if self.free_head.is_none() {
            self.slots.try_reserve(1).map_err(|e| {
                RbError::OutOfMemory(format!("growing node arena past {}: {}", self.slots.len(), e))
            })?;
        }

        let node = Node::leaf(key, value);
        self.len += 1;
        self.payload_bytes += node.payload_len();

        let id = match self.free_head {
            Some(id) => {
                let next_free = match self.slots[id.0] {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => unreachable!("free list points at live node {}", id.0),
                };
                self.free_head = next_free;
                self.slots[id.0] = Slot::Occupied(node);
                id
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                NodeId(self.slots.len() - 1)
            }
        };

        Ok(id)
    }

    /// Release a node and hand back its contents. The slot is recycled.
    ///
    /// Links of other nodes are not touched; unlinking is the caller's job.
    pub(crate) fn release(&mut self, id: NodeId) -> Node {
        let slot = std::mem::replace(
            &mut self.slots[id.0],
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        let node = match slot {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("double release of node {}", id.0),
        };

        self.free_head = Some(id);
        self.len -= 1;
        self.payload_bytes -= node.payload_len();
        node
    }

    /// Swap in a copy of `value`, returning the old buffer
    pub(crate) fn replace_value(&mut self, id: NodeId, value: &[u8]) -> Result<Box<[u8]>> {
        let value = copy_bytes(value, "value")?;
        let new_len = value.len();

        let old = std::mem::replace(&mut self[id].value, value);
        self.payload_bytes = self.payload_bytes - old.len() + new_len;
        Ok(old)
    }

    /// Drop the slot vector once every node has been released
    pub(crate) fn reset(&mut self) {
        debug_assert_eq!(self.len, 0, "reset with live nodes");
        self.slots.clear();
        self.free_head = None;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn payload_bytes(&self) -> usize {
        self.payload_bytes
    }

    /// Total slots, live or vacant
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl Index<NodeId> for NodeStore {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        match &self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("access to released node {}", id.0),
        }
    }
}

impl IndexMut<NodeId> for NodeStore {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match &mut self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("access to released node {}", id.0),
        }
    }
}

/// Owned copy of `bytes`, reporting allocation failure instead of aborting
fn copy_bytes(bytes: &[u8], what: &str) -> Result<Box<[u8]>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes.len()).map_err(|e| {
        RbError::OutOfMemory(format!("{} buffer of {} bytes: {}", what, bytes.len(), e))
    })?;
    buf.extend_from_slice(bytes);
    Ok(buf.into_boxed_slice())
}
