//! Ukkonen's construction, driven by a single growing point.
//!
//! Phase `k` extends every suffix of `text[..k]` by `text[k]`. Leaves grow for
//! free through their open edge end, so only the suffixes starting at `i` and
//! later need explicit work; `i` never moves backwards, which bounds the total
//! number of extensions by the text length. A phase stops as soon as the next
//! character is already present below the growing point.

use log::trace;

use crate::active_point::ActivePoint;
use crate::error::{Error, Result};
use crate::node::{NodeId, OPEN, ROOT};
use crate::suffix_link::SuffixLinks;
use crate::tree::SuffixTree;

pub(crate) struct Builder<'t> {
    tree: &'t mut SuffixTree,
    point: ActivePoint,
    links: SuffixLinks,
}

impl<'t> Builder<'t> {
    pub(crate) fn new(tree: &'t mut SuffixTree) -> Self {
        Self {
            tree,
            point: ActivePoint::new(ROOT),
            links: SuffixLinks::new(),
        }
    }

    /// Run every phase over the tree's sentinel-terminated text.
    pub(crate) fn run(mut self) -> Result<()> {
        let n = self.tree.chars().len();
        if n == 0 {
            return Ok(());
        }

        let first = self.tree.chars()[0];
        let leaf = self.tree.create_node(ROOT, 0, OPEN);
        self.tree.set_transition(ROOT, first, leaf);
        self.tree.grow();

        // Smallest suffix start not yet known to be in the tree.
        let mut i = 1;
        for k in 1..n {
            self.tree.grow();
            let c = self.tree.chars()[k];
            trace!("phase {k}: extending with {c:?} from {}", self.point);

            // Branch created by the previous extension, waiting for its link.
            let mut pending: Option<NodeId> = None;
            while i <= k {
                let before = self.point.node();

                if self.traverse_to_child(c)? {
                    // Rule 3: the rest of the phase is implicit.
                    if let Some(start) = pending.take() {
                        self.add_link(start, before)?;
                    }
                    break;
                }

                // Rule 2: hang a new leaf at the growing point.
                let branch_existed = self.add_branch(k)?;
                let branch = self.point.node();
                if let Some(start) = pending.take() {
                    self.add_link(start, branch)?;
                }

                let next_suffix_len = if branch_existed {
                    self.move_to_link(branch)?;
                    0
                } else {
                    pending = Some(branch);
                    let edge_len = self.tree.edge_len(branch);
                    match self.tree.get_node(branch).parent {
                        None | Some(ROOT) => {
                            self.point.move_to(ROOT);
                            edge_len - 1
                        }
                        Some(parent) => {
                            self.move_to_link(parent)?;
                            edge_len
                        }
                    }
                };

                if next_suffix_len > 0 {
                    let start = self.point.node();
                    let landing = self
                        .tree
                        .descend_by_length(start, k - next_suffix_len, k)?;
                    self.point.move_to_point(&landing);
                    trace!("  next suffix {} starts at {}", i + 1, self.point);
                }
                i += 1;
            }
        }

        if self.point != ActivePoint::new(ROOT) {
            return Err(Error::ActivePointNotAtRoot {
                node: self.point.node(),
                distance: self.point.distance(),
            });
        }
        trace!("construction used {} suffix links", self.links.len());
        Ok(())
    }

    /// Node the growing point hangs from: itself when on a node, otherwise
    /// the parent of the edge it sits on.
    fn last_node(&self) -> NodeId {
        if self.point.on_node() {
            self.point.node()
        } else {
            self.tree.get_node(self.point.node()).parent.unwrap_or(ROOT)
        }
    }

    fn next_char(&self) -> Result<char> {
        if self.point.on_node() {
            return Err(Error::AmbiguousNextChar {
                node: self.point.node(),
            });
        }
        self.tree.char_at(self.point.node(), self.point.distance())
    }

    /// Step the growing point over `c` if the tree already continues with it.
    fn traverse_to_child(&mut self, c: char) -> Result<bool> {
        if self.point.on_node() {
            let Some(child) = self.tree.transition(self.point.node(), c) else {
                return Ok(false);
            };
            if self.tree.edge_len(child) == 1 {
                self.point.move_to(child);
            } else {
                self.point.move_onto_edge(child, 1);
            }
            return Ok(true);
        }

        if self.next_char()? != c {
            return Ok(false);
        }
        let node = self.point.node();
        if self.point.distance() + 1 == self.tree.edge_len(node) {
            self.point.move_to(node);
        } else {
            self.point.step();
        }
        Ok(true)
    }

    /// Add a leaf for `text[k]` at the growing point, splitting the current
    /// edge first when the point is not on a node. Leaves the point on the
    /// leaf's parent and reports whether that parent already existed.
    fn add_branch(&mut self, k: usize) -> Result<bool> {
        let mut parent = self.last_node();
        let branch_existed = self.point.on_node();
        if !branch_existed {
            parent = self
                .tree
                .split_edge(parent, self.point.node(), self.point.distance());
        }

        let leaf = self.tree.create_node(parent, k, OPEN);
        let c = self.tree.char_at(leaf, 0)?;
        self.tree.set_transition(parent, c, leaf);
        trace!(
            "  leaf #{leaf} under {} #{parent}",
            if branch_existed { "existing" } else { "new branch" }
        );

        self.point.move_to(parent);
        Ok(branch_existed)
    }

    fn move_to_link(&mut self, node: NodeId) -> Result<()> {
        match self.links.get(node) {
            Some(target) => {
                self.point.move_to(target);
                Ok(())
            }
            None if node == ROOT => {
                self.point.move_to(ROOT);
                Ok(())
            }
            None => Err(Error::MissingSuffixLink { node }),
        }
    }

    fn add_link(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        trace!("  suffix link #{from} -> #{to}");
        self.links.insert(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(text: &str) -> SuffixTree {
        SuffixTree::build_with_sentinel(text, '$').unwrap()
    }

    /// Every internal node except the root branches at least twice.
    fn assert_branching(tree: &SuffixTree) {
        for id in 1..tree.node_count() {
            let node = tree.get_node(id);
            assert!(
                node.children.is_empty() || node.children.len() >= 2,
                "node #{id} has a single child"
            );
            for (&c, &child) in &node.children {
                assert_eq!(tree.first_char(child), Some(c));
                assert_eq!(tree.get_node(child).parent, Some(id));
            }
        }
    }

    #[test]
    fn single_sentinel_is_one_leaf() {
        let tree = build("");
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.transition(ROOT, '$'), Some(1));
        assert_eq!(tree.logical_len(), 1);
    }

    #[test]
    fn repeated_character_builds_a_chain() {
        let tree = build("aa");
        // root, branch "a" holding "a$" and "$", and a "$" leaf on the root
        assert_eq!(tree.node_count(), 5);
        let a = tree.transition(ROOT, 'a').unwrap();
        assert_eq!(tree.edge_chars(a), &['a']);
        assert_eq!(tree.get_node(a).children.len(), 2);
        assert_branching(&tree);
    }

    #[test]
    fn leaves_end_at_the_full_text() {
        let tree = build("mississippi");
        assert_eq!(tree.logical_len(), 12);
        let leaves = (0..tree.node_count())
            .filter(|&id| tree.get_node(id).is_leaf())
            .count();
        assert_eq!(leaves, 12);
        assert_eq!(tree.node_count(), 19);
        assert_branching(&tree);
    }

    #[test]
    fn growing_point_reports_ambiguous_next_char_on_nodes() {
        let mut tree = build("ab");
        let builder = Builder::new(&mut tree);
        assert_eq!(
            builder.next_char(),
            Err(Error::AmbiguousNextChar { node: ROOT })
        );
    }

    #[test]
    fn missing_link_on_internal_node_is_an_error() {
        let mut tree = build("abab");
        let ab = tree.transition(ROOT, 'a').unwrap();
        let mut builder = Builder::new(&mut tree);
        assert_eq!(
            builder.move_to_link(ab),
            Err(Error::MissingSuffixLink { node: ab })
        );
        builder.move_to_link(ROOT).unwrap();
        assert_eq!(builder.point, ActivePoint::new(ROOT));
    }

    #[test]
    fn traverse_walks_along_edges() {
        let mut tree = build("abcab");
        let mut builder = Builder::new(&mut tree);
        assert!(builder.traverse_to_child('a').unwrap());
        let ab = builder.point.node();
        assert_eq!(builder.point.distance(), 1);
        assert!(builder.traverse_to_child('b').unwrap());
        // "ab" is a branch of length two, so the point lands on it.
        assert_eq!(builder.point, ActivePoint::new(ab));
        assert!(!builder.traverse_to_child('x').unwrap());
        assert!(builder.traverse_to_child('c').unwrap());
        assert_eq!(builder.point.distance(), 1);
        assert_eq!(builder.last_node(), ab);
    }
}
