//! Diagnostics
//!
//! Read-only checks over a tree's structure: a full red-black invariant
//! verification and an owned snapshot of the shape for debugging and tests.

use std::cmp::Ordering;

use crate::comparator::KeyComparator;
use crate::engine::RawTree;
use crate::error::InvariantViolation;
use crate::store::{Color, NodeId};

/// Summary returned by a successful invariant check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvariantReport {
    /// Reachable nodes
    pub entries: usize,

    /// Black nodes on every root-to-leaf path (0 for an empty tree)
    pub black_height: usize,

    /// Longest root-to-leaf path in nodes (0 for an empty tree)
    pub height: usize,
}

/// Owned snapshot of one node and its subtrees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeNode {
    pub key: Vec<u8>,
    pub color: Color,
    pub left: Option<Box<ShapeNode>>,
    pub right: Option<Box<ShapeNode>>,
}

struct Checker<'a, C> {
    raw: &'a RawTree,
    comparator: &'a C,
    /// Last key seen in order
    previous: Option<&'a [u8]>,
    entries: usize,
    payload_bytes: usize,
}

/// Per-subtree result: (black-height counting absent leaves as 0, height)
type Heights = (usize, usize);

impl<'a, C: KeyComparator> Checker<'a, C> {
    fn visit(
        &mut self,
        id: Option<NodeId>,
        parent: Option<NodeId>,
    ) -> Result<Heights, InvariantViolation> {
        let Some(id) = id else { return Ok((0, 0)) };
        let raw = self.raw;
        let node = &raw.nodes[id];

        if node.parent != parent {
            let key = parent.map_or_else(Vec::new, |p| raw.nodes[p].key.to_vec());
            return Err(InvariantViolation::BrokenParentLink { key });
        }
        if node.color == Color::Red && (raw.is_red(node.left) || raw.is_red(node.right)) {
            return Err(InvariantViolation::RedRedEdge {
                key: node.key.to_vec(),
            });
        }

        let (left_black, left_height) = self.visit(node.left, Some(id))?;

        if let Some(previous) = self.previous {
            if self.comparator.compare(previous, &node.key) != Ordering::Less {
                return Err(InvariantViolation::OutOfOrder {
                    left: previous.to_vec(),
                    right: node.key.to_vec(),
                });
            }
        }
        self.previous = Some(&node.key[..]);
        self.entries += 1;
        self.payload_bytes += node.payload_len();

        let (right_black, right_height) = self.visit(node.right, Some(id))?;

        if left_black != right_black {
            return Err(InvariantViolation::BlackHeightMismatch {
                key: node.key.to_vec(),
                left: left_black,
                right: right_black,
            });
        }

        let own = usize::from(node.color == Color::Black);
        Ok((left_black + own, left_height.max(right_height) + 1))
    }
}

/// Verify ordering, coloring, black-height, parent links and accounting
pub(crate) fn check<C: KeyComparator>(
    raw: &RawTree,
    comparator: &C,
) -> Result<InvariantReport, InvariantViolation> {
    if let Some(root) = raw.root {
        if raw.nodes[root].color == Color::Red {
            return Err(InvariantViolation::RedRoot);
        }
        if raw.nodes[root].parent.is_some() {
            return Err(InvariantViolation::RootHasParent);
        }
    }

    let mut checker = Checker {
        raw,
        comparator,
        previous: None,
        entries: 0,
        payload_bytes: 0,
    };
    let (black_height, height) = checker.visit(raw.root, None)?;

    if checker.entries != raw.nodes.len() {
        return Err(InvariantViolation::Accounting {
            what: "entries",
            tracked: raw.nodes.len(),
            found: checker.entries,
        });
    }
    if checker.payload_bytes != raw.nodes.payload_bytes() {
        return Err(InvariantViolation::Accounting {
            what: "payload bytes",
            tracked: raw.nodes.payload_bytes(),
            found: checker.payload_bytes,
        });
    }

    Ok(InvariantReport {
        entries: checker.entries,
        black_height,
        height,
    })
}

/// Owned copy of the tree's structure
pub(crate) fn shape(raw: &RawTree) -> Option<ShapeNode> {
    fn copy(raw: &RawTree, id: Option<NodeId>) -> Option<Box<ShapeNode>> {
        let id = id?;
        let node = &raw.nodes[id];
        Some(Box::new(ShapeNode {
            key: node.key.to_vec(),
            color: node.color,
            left: copy(raw, node.left),
            right: copy(raw, node.right),
        }))
    }

    copy(raw, raw.root).map(|root| *root)
}
