use std::collections::HashMap;
use std::fmt;

use crate::error::Result;
use crate::tree::SuffixTree;

/// Index of a node in the tree's arena. Ids are handed out in creation order.
pub type NodeId = usize;

/// The root always occupies the first arena slot.
pub(crate) const ROOT: NodeId = 0;

/// Edge end marker for leaves: the edge runs to the tree's current logical length.
pub(crate) const OPEN: usize = usize::MAX;

/// An arena record. Every node other than the root is the lower endpoint of
/// the edge labelled `text[from..=to]`; leaves keep `to == OPEN` so they grow
/// along with the logical length during construction.
/// `children` is keyed by the first character of each child's edge, which
/// keeps sibling edges distinct by construction.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) from: usize,
    pub(crate) to: usize,
    pub(crate) children: HashMap<char, NodeId>,
}

impl Node {
    pub(crate) fn root() -> Self {
        Self {
            parent: None,
            from: 0,
            to: 0,
            children: HashMap::new(),
        }
    }

    pub(crate) fn new(parent: NodeId, from: usize, to: usize) -> Self {
        Self {
            parent: Some(parent),
            from,
            to,
            children: HashMap::new(),
        }
    }

    pub(crate) fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub(crate) fn is_leaf(&self) -> bool {
        !self.is_root() && self.children.is_empty()
    }

    /// Inclusive end index, resolving `OPEN` against the logical length.
    pub(crate) fn effective_end(&self, logical_len: usize) -> usize {
        if self.to == OPEN {
            logical_len - 1
        } else {
            self.to
        }
    }

    pub(crate) fn edge_len(&self, logical_len: usize) -> usize {
        if self.is_root() {
            return 0;
        }
        self.effective_end(logical_len) + 1 - self.from
    }
}

/// A read-only handle on a node of a finished [`SuffixTree`].
///
/// Returned by [`SuffixTree::locate`] and [`SuffixTree::root`]. It exposes the
/// edge leading into the node plus navigation to the parent and children,
/// which is enough to enumerate matches below a located position.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a SuffixTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a SuffixTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn node(&self) -> &'a Node {
        self.tree.get_node(self.id)
    }

    /// Arena id of this node. Stable for the lifetime of the tree.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn is_root(&self) -> bool {
        self.node().is_root()
    }

    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// First character of the incoming edge, `None` for the root.
    pub fn first_char(&self) -> Option<char> {
        self.tree.first_char(self.id)
    }

    /// Length of the incoming edge; zero for the root.
    pub fn edge_len(&self) -> usize {
        self.tree.edge_len(self.id)
    }

    /// The incoming edge label. Leaf labels end with the sentinel.
    pub fn edge_label(&self) -> String {
        self.tree.edge_chars(self.id).iter().collect()
    }

    /// The first `len` characters of the incoming edge label.
    pub fn edge_prefix(&self, len: usize) -> Result<String> {
        Ok(self.tree.edge_prefix(self.id, len)?.iter().collect())
    }

    /// Character at `offset` along the incoming edge.
    pub fn char_at(&self, offset: usize) -> Result<char> {
        self.tree.char_at(self.id, offset)
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| NodeRef::new(self.tree, id))
    }

    /// The child whose edge starts with `c`.
    pub fn child(&self, c: char) -> Option<NodeRef<'a>> {
        self.tree
            .transition(self.id, c)
            .map(|id| NodeRef::new(self.tree, id))
    }

    /// Children keyed by the first character of their edge, in no particular order.
    pub fn children(&self) -> impl Iterator<Item = (char, NodeRef<'a>)> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |(&c, &id)| (c, NodeRef::new(tree, id)))
    }

    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    /// Number of characters on the path from the root down to this node.
    pub fn depth(&self) -> usize {
        self.tree.depth(self.id)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("from", &node.from)
            .field("to", &node.to)
            .field("children", &node.children.len())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "<root>");
        }
        let node = self.node();
        let end = node.effective_end(self.tree.logical_len());
        write!(
            f,
            "#{} [{}..{}] {}",
            self.id,
            node.from,
            end,
            self.edge_label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_edges_follow_the_logical_length() {
        let leaf = Node::new(ROOT, 2, OPEN);
        assert_eq!(leaf.edge_len(3), 1);
        assert_eq!(leaf.edge_len(7), 5);
        assert!(leaf.is_leaf());

        let inner = Node::new(ROOT, 1, 3);
        assert_eq!(inner.edge_len(100), 3);
        assert_eq!(inner.effective_end(100), 3);
    }

    #[test]
    fn root_has_no_edge() {
        let root = Node::root();
        assert!(root.is_root());
        assert!(!root.is_leaf());
        assert_eq!(root.edge_len(10), 0);
    }
}
