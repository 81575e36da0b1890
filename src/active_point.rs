use std::fmt;

use crate::node::{NodeId, ROOT};

/// The growing point used while the tree is being built.
///
/// `distance == 0` means the cursor sits exactly on `node`. A positive
/// distance means it sits on the edge leading into `node`, that many
/// characters below `node`'s parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ActivePoint {
    node: NodeId,
    distance: usize,
}

impl Default for ActivePoint {
    fn default() -> Self {
        Self::new(ROOT)
    }
}

impl ActivePoint {
    pub(crate) const fn new(node: NodeId) -> Self {
        Self { node, distance: 0 }
    }

    pub(crate) fn node(&self) -> NodeId {
        self.node
    }

    pub(crate) fn distance(&self) -> usize {
        self.distance
    }

    pub(crate) fn on_node(&self) -> bool {
        self.distance == 0
    }

    pub(crate) fn move_to(&mut self, node: NodeId) {
        self.node = node;
        self.distance = 0;
    }

    pub(crate) fn move_onto_edge(&mut self, node: NodeId, distance: usize) {
        self.node = node;
        self.distance = distance;
    }

    pub(crate) fn move_to_point(&mut self, other: &ActivePoint) {
        *self = *other;
    }

    /// Advance one character along the current edge.
    pub(crate) fn step(&mut self) {
        self.distance += 1;
    }
}

impl fmt::Display for ActivePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.on_node() {
            write!(f, "#{}", self.node)
        } else {
            write!(f, "-> #{} (+{})", self.node, self.distance)
        }
    }
}
