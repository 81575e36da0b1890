//! Error types for suffix tree construction and edge access.

use thiserror::Error;

use crate::node::NodeId;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while building a tree or reading its edges.
///
/// Every variant other than [`Error::SentinelInInput`] points at a broken
/// algorithm invariant or a caller reading past an edge; none of them are
/// retryable. Query misses are never errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The reserved terminator appears inside the caller's text.
    #[error("sentinel {sentinel:?} occurs in the input at position {position}")]
    SentinelInInput { sentinel: char, position: usize },

    /// A non-root internal node was asked for a suffix link it never received.
    #[error("internal node #{node} has no suffix link")]
    MissingSuffixLink { node: NodeId },

    /// A suffix link was recorded twice for the same node.
    #[error("suffix link for node #{node} was already recorded")]
    DuplicateSuffixLink { node: NodeId },

    /// Skip/count descent found no child for a character that must be present.
    #[error("no edge starting with {ch:?} below node #{node}")]
    MissingEdge { node: NodeId, ch: char },

    /// The cursor did not come back to the root after the last phase.
    #[error("active point ended at node #{node} (distance {distance}) instead of the root")]
    ActivePointNotAtRoot { node: NodeId, distance: usize },

    /// The next edge character was requested while the cursor sits on a node.
    #[error("next character is ambiguous while resting on node #{node}")]
    AmbiguousNextChar { node: NodeId },

    /// An edge was read beyond its current length.
    #[error("offset {offset} is out of range for the edge of node #{node} (length {len})")]
    OffsetOutOfRange { node: NodeId, offset: usize, len: usize },
}

impl Error {
    /// Whether this error reports a construction invariant violation, as
    /// opposed to a bad input or an out-of-range edge read.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Error::MissingSuffixLink { .. }
                | Error::DuplicateSuffixLink { .. }
                | Error::MissingEdge { .. }
                | Error::ActivePointNotAtRoot { .. }
                | Error::AmbiguousNextChar { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_node() {
        let err = Error::OffsetOutOfRange { node: 4, offset: 3, len: 2 };
        assert_eq!(
            err.to_string(),
            "offset 3 is out of range for the edge of node #4 (length 2)"
        );
        assert!(!err.is_invariant_violation());
        assert!(Error::MissingSuffixLink { node: 7 }.is_invariant_violation());
    }
}
