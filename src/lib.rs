//! A suffix tree implementation using Ukkonen's algorithm.
//!
//! The tree is built once over a string terminated by a unique sentinel and
//! is read-only afterwards. Building takes time linear in the text length;
//! substring queries take time linear in the query length.
//!
//! Nodes live in an arena and refer to each other by index, with every edge
//! stored as a range into the shared text. Suffix links and the growing point
//! exist only while the tree is being built.
//!
//! ```
//! use suffix_tree::SuffixTree;
//! let tree = SuffixTree::build("bbabbaabbbabbaab").unwrap();
//! assert!(tree.contains("bbabbaabbbabbaab"));
//! assert!(!tree.contains("babbab"));
//! assert!(tree.is_suffix("baab"));
//! ```
mod active_point;
mod builder;
pub mod error;
mod node;
mod suffix_link;
mod tree;

pub use error::{Error, Result};
pub use node::{NodeId, NodeRef};
pub use tree::{SuffixTree, DEFAULT_SENTINEL};
