use std::fmt;

use log::debug;

use crate::active_point::ActivePoint;
use crate::builder::Builder;
use crate::error::{Error, Result};
use crate::node::{Node, NodeId, NodeRef, ROOT};

/// Terminator appended to every input unless it already ends with it.
pub const DEFAULT_SENTINEL: char = '\u{FF}';

/// A suffix tree over a single string, built with Ukkonen's algorithm.
///
/// Construction is a one-off batch operation; the finished tree is immutable
/// and every query takes `&self`, so a built tree can be shared freely between
/// reader threads.
///
/// # Examples
///
/// ```
/// use suffix_tree::SuffixTree;
/// let tree = SuffixTree::build("bbabbaab").unwrap();
/// assert!(tree.contains("abbaa"));
/// assert!(!tree.contains("aba"));
/// assert_eq!(tree.find_all("ab"), vec![2, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct SuffixTree {
    /// Input characters followed by the sentinel.
    text: Vec<char>,
    node_storage: Vec<Node>,
    /// Characters grown so far; resolves the end of open leaf edges.
    logical_len: usize,
    sentinel: char,
}

impl SuffixTree {
    /// Build a tree over `text`, terminated with [`DEFAULT_SENTINEL`].
    pub fn build(text: &str) -> Result<Self> {
        Self::build_with_sentinel(text, DEFAULT_SENTINEL)
    }

    /// Build a tree over `text`, terminated with `sentinel`.
    ///
    /// The sentinel is appended unless `text` already ends with it. It must
    /// not occur anywhere else in `text`.
    pub fn build_with_sentinel(text: &str, sentinel: char) -> Result<Self> {
        let mut chars: Vec<char> = text.chars().collect();
        Self::validate_text(&chars, sentinel)?;
        if chars.last() != Some(&sentinel) {
            chars.push(sentinel);
        }

        let mut tree = Self {
            text: chars,
            node_storage: vec![Node::root()],
            logical_len: 0,
            sentinel,
        };
        Builder::new(&mut tree).run()?;
        debug!(
            "built suffix tree over {} characters with {} nodes",
            tree.text.len(),
            tree.node_storage.len()
        );
        Ok(tree)
    }

    fn validate_text(chars: &[char], sentinel: char) -> Result<()> {
        let body = match chars.split_last() {
            Some((&last, body)) if last == sentinel => body,
            _ => chars,
        };
        match body.iter().position(|&ch| ch == sentinel) {
            Some(position) => Err(Error::SentinelInInput { sentinel, position }),
            None => Ok(()),
        }
    }

    /// The indexed text, without the sentinel.
    pub fn text(&self) -> String {
        self.text[..self.len()].iter().collect()
    }

    /// Number of characters in the indexed text, without the sentinel.
    pub fn len(&self) -> usize {
        self.text.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sentinel(&self) -> char {
        self.sentinel
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.node_storage.len()
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, ROOT)
    }

    /// Handle for the node with arena id `id`, if it exists.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id < self.node_storage.len()).then(|| NodeRef::new(self, id))
    }

    /// Returns whether `query` occurs in the indexed text.
    /// The empty query is always contained.
    #[must_use]
    pub fn contains(&self, query: &str) -> bool {
        self.locate(query).is_some()
    }

    /// Returns the node on which `query` ends, or whose incoming edge it ends
    /// inside of. `None` if `query` does not occur.
    ///
    /// Queries containing the sentinel never match.
    #[must_use]
    pub fn locate(&self, query: &str) -> Option<NodeRef<'_>> {
        let chars: Vec<char> = query.chars().collect();
        if chars.contains(&self.sentinel) {
            return None;
        }
        self.locate_chars(&chars).map(|id| NodeRef::new(self, id))
    }

    /// Checks whether `query` is a suffix of the indexed text.
    #[must_use]
    pub fn is_suffix(&self, query: &str) -> bool {
        let mut chars: Vec<char> = query.chars().collect();
        if chars.contains(&self.sentinel) {
            return false;
        }
        chars.push(self.sentinel);
        self.locate_chars(&chars).is_some()
    }

    /// Number of (possibly overlapping) occurrences of `query`.
    #[must_use]
    pub fn count_occurrences(&self, query: &str) -> usize {
        let Some(found) = self.locate(query) else {
            return 0;
        };
        let mut count = 0;
        let mut stack = vec![found.id()];
        while let Some(id) = stack.pop() {
            let node = self.get_node(id);
            if node.is_leaf() {
                count += 1;
            } else {
                stack.extend(node.children.values().copied());
            }
        }
        count
    }

    /// Sorted starting offsets (in characters) of every occurrence of `query`.
    ///
    /// Each leaf below the located position spells one suffix; its start is
    /// the text length minus the leaf's depth.
    #[must_use]
    pub fn find_all(&self, query: &str) -> Vec<usize> {
        let Some(found) = self.locate(query) else {
            return Vec::new();
        };
        let total = self.text.len();
        let mut positions = Vec::new();
        let mut stack = vec![(found.id(), found.depth())];
        while let Some((id, depth)) = stack.pop() {
            let node = self.get_node(id);
            if node.is_leaf() {
                positions.push(total - depth);
                continue;
            }
            for &child in node.children.values() {
                stack.push((child, depth + self.edge_len(child)));
            }
        }
        positions.sort_unstable();
        positions
    }

    /// Print the tree shape to stdout, one edge label per line.
    pub fn pretty_print(&self) {
        print!("{self}");
    }

    fn locate_chars(&self, query: &[char]) -> Option<NodeId> {
        let mut node = ROOT;
        let mut index = 0;
        while index < query.len() {
            node = self.transition(node, query[index])?;
            let edge = self.edge_chars(node);
            let end = edge.len().min(query.len() - index);
            if edge[..end] != query[index..index + end] {
                return None;
            }
            index += end;
        }
        Some(node)
    }

    fn print_recursive(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: NodeId,
        space_count: usize,
    ) -> fmt::Result {
        let mut children: Vec<(char, NodeId)> = self
            .get_node(node)
            .children
            .iter()
            .map(|(&c, &id)| (c, id))
            .collect();
        children.sort_unstable();
        for (_, target_node) in children {
            let label: String = self.edge_chars(target_node).iter().collect();
            writeln!(f, "{:width$}{}", "", label, width = space_count)?;
            self.print_recursive(f, target_node, space_count + 4)?;
        }
        Ok(())
    }

    // Node/edge model over the arena.

    pub(crate) fn get_node(&self, node_id: NodeId) -> &Node {
        &self.node_storage[node_id]
    }

    pub(crate) fn get_node_mut(&mut self, node_id: NodeId) -> &mut Node {
        &mut self.node_storage[node_id]
    }

    /// Full text including the sentinel.
    pub(crate) fn chars(&self) -> &[char] {
        &self.text
    }

    pub(crate) fn logical_len(&self) -> usize {
        self.logical_len
    }

    /// Extend every open leaf edge by one character.
    pub(crate) fn grow(&mut self) {
        self.logical_len += 1;
    }

    pub(crate) fn create_node(&mut self, parent: NodeId, from: usize, to: usize) -> NodeId {
        self.node_storage.push(Node::new(parent, from, to));
        self.node_storage.len() - 1
    }

    pub(crate) fn transition(&self, node: NodeId, ch: char) -> Option<NodeId> {
        self.get_node(node).children.get(&ch).copied()
    }

    pub(crate) fn set_transition(&mut self, node: NodeId, ch: char, target_node: NodeId) {
        self.get_node_mut(node).children.insert(ch, target_node);
    }

    pub(crate) fn first_char(&self, node: NodeId) -> Option<char> {
        let node = self.get_node(node);
        (!node.is_root()).then(|| self.text[node.from])
    }

    pub(crate) fn edge_len(&self, node: NodeId) -> usize {
        self.get_node(node).edge_len(self.logical_len)
    }

    pub(crate) fn edge_chars(&self, node: NodeId) -> &[char] {
        let from = self.get_node(node).from;
        &self.text[from..from + self.edge_len(node)]
    }

    pub(crate) fn char_at(&self, node: NodeId, offset: usize) -> Result<char> {
        let len = self.edge_len(node);
        if offset >= len {
            return Err(Error::OffsetOutOfRange { node, offset, len });
        }
        Ok(self.text[self.get_node(node).from + offset])
    }

    pub(crate) fn edge_prefix(&self, node: NodeId, len: usize) -> Result<&[char]> {
        let edge = self.edge_chars(node);
        if len > edge.len() {
            return Err(Error::OffsetOutOfRange {
                node,
                offset: len,
                len: edge.len(),
            });
        }
        Ok(&edge[..len])
    }

    pub(crate) fn depth(&self, node: NodeId) -> usize {
        let mut depth = 0;
        let mut current = Some(node);
        while let Some(id) = current {
            depth += self.edge_len(id);
            current = self.get_node(id).parent;
        }
        depth
    }

    /// Insert a branch node `offset` characters down the edge into `child`.
    /// The child keeps the rest of the edge and hangs below the new branch.
    pub(crate) fn split_edge(&mut self, parent: NodeId, child: NodeId, offset: usize) -> NodeId {
        let from = self.get_node(child).from;
        let branch = self.create_node(parent, from, from + offset - 1);
        self.set_transition(parent, self.text[from], branch);

        let moved = self.get_node_mut(child);
        moved.from += offset;
        moved.parent = Some(branch);
        self.set_transition(branch, self.text[from + offset], child);
        branch
    }

    /// Walk down from `start` along `text[from..to]` and return where it ends.
    ///
    /// Whole edges are skipped by length without comparing characters, so the
    /// substring must already be spelled somewhere below `start`.
    pub(crate) fn descend_by_length(
        &self,
        start: NodeId,
        from: usize,
        to: usize,
    ) -> Result<ActivePoint> {
        let mut node = start;
        let mut index = from;
        while index < to {
            let ch = self.text[index];
            let child = self
                .transition(node, ch)
                .ok_or(Error::MissingEdge { node, ch })?;
            let edge_len = self.edge_len(child);
            let remaining = to - index;
            if remaining < edge_len {
                let mut point = ActivePoint::new(node);
                point.move_onto_edge(child, remaining);
                return Ok(point);
            }
            node = child;
            index += edge_len;
        }
        Ok(ActivePoint::new(node))
    }
}

impl fmt::Display for SuffixTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print_recursive(f, ROOT, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::OPEN;

    fn tree_of(text: &str) -> SuffixTree {
        SuffixTree::build_with_sentinel(text, '$').unwrap()
    }

    #[test]
    fn sentinel_is_appended_once() {
        let tree = tree_of("abc");
        assert_eq!(tree.chars(), &['a', 'b', 'c', '$']);
        assert_eq!(tree.text(), "abc");
        assert_eq!(tree.len(), 3);

        let terminated = tree_of("abc$");
        assert_eq!(terminated.chars(), &['a', 'b', 'c', '$']);
        assert_eq!(terminated.logical_len(), 4);
    }

    #[test]
    fn sentinel_inside_text_is_rejected() {
        assert_eq!(
            SuffixTree::build_with_sentinel("ab$c", '$').unwrap_err(),
            Error::SentinelInInput { sentinel: '$', position: 2 }
        );
        assert_eq!(
            SuffixTree::build_with_sentinel("a$$", '$').unwrap_err(),
            Error::SentinelInInput { sentinel: '$', position: 1 }
        );
    }

    #[test]
    fn char_at_respects_edge_length() {
        let tree = tree_of("xyz");
        let leaf = tree.transition(ROOT, 'y').unwrap();
        assert_eq!(tree.edge_len(leaf), 3);
        assert_eq!(tree.char_at(leaf, 0).unwrap(), 'y');
        assert_eq!(tree.char_at(leaf, 2).unwrap(), '$');
        assert_eq!(
            tree.char_at(leaf, 3),
            Err(Error::OffsetOutOfRange { node: leaf, offset: 3, len: 3 })
        );
        assert_eq!(tree.edge_prefix(leaf, 2).unwrap(), &['y', 'z']);
        assert!(tree.edge_prefix(leaf, 4).is_err());
        assert_eq!(tree.first_char(ROOT), None);
    }

    #[test]
    fn split_edge_moves_the_child_below_the_branch() {
        let mut tree = tree_of("");
        tree.text = vec!['a', 'b', 'c', '$'];
        tree.logical_len = 4;
        let leaf = tree.create_node(ROOT, 0, OPEN);
        tree.set_transition(ROOT, 'a', leaf);

        let branch = tree.split_edge(ROOT, leaf, 2);
        assert_eq!(tree.transition(ROOT, 'a'), Some(branch));
        assert_eq!(tree.transition(branch, 'c'), Some(leaf));
        assert_eq!(tree.edge_chars(branch), &['a', 'b']);
        assert_eq!(tree.edge_chars(leaf), &['c', '$']);
        assert_eq!(tree.get_node(leaf).parent, Some(branch));
        assert_eq!(tree.depth(leaf), 4);
    }

    #[test]
    fn descend_skips_whole_edges() {
        let tree = tree_of("abcabx");
        // "ab" is a branch node; "abc" ends one character into its 'c' child.
        let ab = tree.transition(ROOT, 'a').unwrap();
        assert_eq!(tree.edge_chars(ab), &['a', 'b']);

        let on_node = tree.descend_by_length(ROOT, 3, 5).unwrap();
        assert_eq!(on_node, ActivePoint::new(ab));

        let mid_edge = tree.descend_by_length(ROOT, 0, 3).unwrap();
        let c_leaf = tree.transition(ab, 'c').unwrap();
        assert_eq!((mid_edge.node(), mid_edge.distance()), (c_leaf, 1));

        let empty = tree.descend_by_length(ab, 4, 4).unwrap();
        assert_eq!(empty, ActivePoint::new(ab));
    }

    #[test]
    fn descend_reports_missing_edges() {
        let tree = tree_of("aab");
        // No suffix continues "a" with the sentinel.
        let a = tree.transition(ROOT, 'a').unwrap();
        assert_eq!(
            tree.descend_by_length(a, 3, 4),
            Err(Error::MissingEdge { node: a, ch: '$' })
        );
    }

    #[test]
    fn display_lists_edges_in_order() {
        let tree = tree_of("aa");
        assert_eq!(tree.to_string(), "$\na\n    $\n    a$\n");
    }
}
