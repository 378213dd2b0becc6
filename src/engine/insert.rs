//! Insertion and insertion fix-up
//!
//! A new node always enters as a red leaf, which can only break the
//! "no red child of a red node" rule. The fix-up walks upward while the
//! current node's parent is red.

use crate::store::{Color, Direction, NodeId};

use super::RawTree;

/// Neighbourhood of the current node during insertion fix-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InsertCase {
    /// Parent is black or absent: nothing left to repair
    Done,

    /// Parent and uncle are both red: push the red up to the grandparent
    RedUncle {
        parent: NodeId,
        uncle: NodeId,
        grandparent: NodeId,
    },

    /// Uncle black, current is the inner grandchild (zig-zag).
    /// `side` is the parent's side under the grandparent.
    InnerChild { parent: NodeId, side: Direction },

    /// Uncle black, current is the outer grandchild (zig-zig)
    OuterChild {
        parent: NodeId,
        grandparent: NodeId,
        side: Direction,
    },
}

impl RawTree {
    /// Link the unattached red node `id` under `parent` on side `dir` and
    /// restore the red-black rules. With no parent, `id` becomes the root.
    pub(crate) fn insert_leaf(&mut self, id: NodeId, parent: Option<NodeId>, dir: Direction) {
        match parent {
            None => {
                self.root = Some(id);
                self.set_color(id, Color::Black);
            }
            Some(parent) => {
                self.nodes[parent].set_child(dir, Some(id));
                self.nodes[id].parent = Some(parent);
                self.insert_fixup(id);
            }
        }
    }

    fn classify_insert(&self, current: NodeId) -> InsertCase {
        let Some(parent) = self.parent(current) else {
            return InsertCase::Done;
        };
        if self.is_black(Some(parent)) {
            return InsertCase::Done;
        }
        // A red root has no grandparent to rotate around; the final recolor
        // of the root is the whole repair.
        let Some(grandparent) = self.parent(parent) else {
            return InsertCase::Done;
        };

        let side = self.side_of(grandparent, Some(parent));
        match self.child(grandparent, side.opposite()) {
            Some(uncle) if self.is_red(Some(uncle)) => InsertCase::RedUncle {
                parent,
                uncle,
                grandparent,
            },
            _ if self.child(parent, side.opposite()) == Some(current) => {
                InsertCase::InnerChild { parent, side }
            }
            _ => InsertCase::OuterChild {
                parent,
                grandparent,
                side,
            },
        }
    }

    pub(crate) fn insert_fixup(&mut self, node: NodeId) {
        let mut current = node;

        loop {
            match self.classify_insert(current) {
                InsertCase::Done => break,
                InsertCase::RedUncle {
                    parent,
                    uncle,
                    grandparent,
                } => {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    current = grandparent;
                }
                InsertCase::InnerChild { parent, side } => {
                    // Straighten the zig-zag; the old parent is now the outer
                    // grandchild and the next round classifies it as such.
                    self.rotate(parent, side);
                    current = parent;
                }
                InsertCase::OuterChild {
                    parent,
                    grandparent,
                    side,
                } => {
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate(grandparent, side.opposite());
                }
            }
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }
}
