//! Rotation primitives
//!
//! ```text
//!   rotate(x, Left)               rotate(y, Right)
//!
//!      x                 y              y                 x
//!     / \               / \            / \               / \
//!    a   y     ==>     x   c          x   c     ==>     a   y
//!       / \           / \            / \                   / \
//!      b   c         a   b          a   b                 b   c
//! ```
//!
//! Exactly four nodes get new links: the pivot, the child that rises, the
//! subtree that changes sides (`b`), and the pivot's former parent (or the
//! root link).

use crate::store::{Direction, NodeId};

use super::RawTree;

impl RawTree {
    /// Move `pivot` down on side `dir`; its child on the opposite side
    /// takes its place. That child must exist.
    pub(crate) fn rotate(&mut self, pivot: NodeId, dir: Direction) {
        let riser = match self.nodes[pivot].child(dir.opposite()) {
            Some(riser) => riser,
            None => unreachable!("rotation of node {} without a child to raise", pivot.index()),
        };

        // b changes sides: riser's inner child becomes pivot's outer child
        let moved = self.nodes[riser].child(dir);
        self.nodes[pivot].set_child(dir.opposite(), moved);
        if let Some(moved) = moved {
            self.nodes[moved].parent = Some(pivot);
        }

        // riser takes pivot's place under the former parent
        self.transplant(pivot, Some(riser));

        self.nodes[riser].set_child(dir, Some(pivot));
        self.nodes[pivot].parent = Some(riser);
    }
}
