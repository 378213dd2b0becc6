//! Deletion and deletion fix-up
//!
//! Removing a black node leaves one path short of a black node. The fix-up
//! treats the spliced-in position as carrying an extra black ("double
//! black") and pushes that extra black up or absorbs it with rotations.

use crate::store::{Color, Direction, Node, NodeId};

use super::RawTree;

/// Neighbourhood of a double-black position during deletion fix-up.
/// `side` is the double-black's side under its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteCase {
    /// Sibling is red: rotate it above the parent so the new sibling is black
    RedSibling { sibling: NodeId, side: Direction },

    /// Black sibling with two black (or absent) children: push the extra
    /// black up to the parent
    BlackNephews { sibling: NodeId },

    /// Black sibling, far child black, near child red: rotate the near child
    /// up so the far child becomes red
    NearNephewRed {
        sibling: NodeId,
        near: NodeId,
        side: Direction,
    },

    /// Black sibling with a red far child: one rotation at the parent
    /// absorbs the extra black and ends the walk
    FarNephewRed {
        sibling: NodeId,
        far: NodeId,
        side: Direction,
    },
}

impl RawTree {
    /// Unlink `target`, release it from the store and rebalance.
    /// Returns the released node (key and value buffers included).
    pub(crate) fn delete(&mut self, target: NodeId) -> Node {
        let left = self.nodes[target].left;
        let right = self.nodes[target].right;

        let mut removed_color = self.nodes[target].color;
        let fix_node: Option<NodeId>;
        let fix_parent: Option<NodeId>;

        match (left, right) {
            (None, _) => {
                fix_node = right;
                fix_parent = self.parent(target);
                self.transplant(target, right);
            }
            (Some(_), None) => {
                fix_node = left;
                fix_parent = self.parent(target);
                self.transplant(target, left);
            }
            (Some(left), Some(right)) => {
                let successor = self.minimum(right);
                removed_color = self.nodes[successor].color;
                fix_node = self.nodes[successor].right;

                if self.parent(successor) == Some(target) {
                    fix_parent = Some(successor);
                } else {
                    fix_parent = self.parent(successor);
                    self.transplant(successor, fix_node);
                    self.nodes[successor].right = Some(right);
                    self.nodes[right].parent = Some(successor);
                }

                self.transplant(target, Some(successor));
                self.nodes[successor].left = Some(left);
                self.nodes[left].parent = Some(successor);
                self.nodes[successor].color = self.nodes[target].color;
            }
        }

        let removed = self.nodes.release(target);

        if removed_color == Color::Black {
            self.delete_fixup(fix_node, fix_parent);
        }

        removed
    }

    fn classify_delete(&self, current: Option<NodeId>, parent: NodeId) -> DeleteCase {
        let side = self.side_of(parent, current);
        let sibling = self.sibling(parent, side);

        if self.is_red(Some(sibling)) {
            return DeleteCase::RedSibling { sibling, side };
        }

        let near = self.child(sibling, side);
        let far = self.child(sibling, side.opposite());
        match (near, far) {
            (_, Some(far)) if self.is_red(Some(far)) => DeleteCase::FarNephewRed { sibling, far, side },
            (Some(near), _) if self.is_red(Some(near)) => {
                DeleteCase::NearNephewRed { sibling, near, side }
            }
            _ => DeleteCase::BlackNephews { sibling },
        }
    }

    /// Sibling of the double-black position on `side` of `parent`.
    ///
    /// The double-black side has black-height at least one below `parent`
    /// once the extra black is counted, so before the removal the other side
    /// held at least one black node and cannot be empty.
    fn sibling(&self, parent: NodeId, side: Direction) -> NodeId {
        match self.child(parent, side.opposite()) {
            Some(sibling) => sibling,
            None => unreachable!(
                "double-black under node {} has no sibling",
                parent.index()
            ),
        }
    }

    pub(crate) fn delete_fixup(&mut self, node: Option<NodeId>, parent: Option<NodeId>) {
        let mut current = node;
        let mut parent = parent;

        while current != self.root && self.is_black(current) {
            // Not the root, so the position has a parent
            let Some(at) = parent else { break };

            match self.classify_delete(current, at) {
                DeleteCase::RedSibling { sibling, side } => {
                    self.set_color(sibling, Color::Black);
                    self.set_color(at, Color::Red);
                    self.rotate(at, side);
                }
                DeleteCase::BlackNephews { sibling } => {
                    self.set_color(sibling, Color::Red);
                    current = Some(at);
                    parent = self.parent(at);
                }
                DeleteCase::NearNephewRed {
                    sibling,
                    near,
                    side,
                } => {
                    self.set_color(near, Color::Black);
                    self.set_color(sibling, Color::Red);
                    self.rotate(sibling, side.opposite());
                }
                DeleteCase::FarNephewRed { sibling, far, side } => {
                    let parent_color = self.nodes[at].color;
                    self.set_color(sibling, parent_color);
                    self.set_color(at, Color::Black);
                    self.set_color(far, Color::Black);
                    self.rotate(at, side);
                    current = self.root;
                    parent = None;
                }
            }
        }

        if let Some(id) = current {
            self.set_color(id, Color::Black);
        }
    }
}
