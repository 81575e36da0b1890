use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::node::NodeId;

/// Suffix links from internal nodes, recorded during construction only.
///
/// A link from `v` points at the node spelling `v`'s path minus its first
/// character. The root never carries one.
#[derive(Debug, Default)]
pub(crate) struct SuffixLinks {
    links: HashMap<NodeId, NodeId>,
}

impl SuffixLinks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        match self.links.entry(from) {
            Entry::Occupied(_) => Err(Error::DuplicateSuffixLink { node: from }),
            Entry::Vacant(slot) => {
                slot.insert(to);
                Ok(())
            }
        }
    }

    pub(crate) fn get(&self, node: NodeId) -> Option<NodeId> {
        self.links.get(&node).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.links.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_are_recorded_once() {
        let mut links = SuffixLinks::new();
        links.insert(3, 1).unwrap();
        assert_eq!(links.get(3), Some(1));
        assert_eq!(links.get(1), None);
        assert_eq!(
            links.insert(3, 2),
            Err(Error::DuplicateSuffixLink { node: 3 })
        );
        assert_eq!(links.get(3), Some(1));
        assert_eq!(links.len(), 1);
    }
}
