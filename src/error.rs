//! Error types for elastic-trie.
//!
//! Lookup misses and rejected duplicates are ordinary return values, not errors.

use thiserror::Error;

use crate::link::{NodeId, Side};

/// Errors raised by node storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("arena is full: at most {capacity} nodes can be allocated")]
    ArenaFull { capacity: usize },
}

/// Structural problems found by [`EbRoot::verify`](crate::EbRoot::verify).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("link to unallocated slot {0}")]
    Dangling(NodeId),

    #[error("node {node} is reached as a leaf but its leaf back-link does not point to {parent:?}/{side:?}")]
    LeafBackLink {
        node: NodeId,
        parent: Option<NodeId>,
        side: Side,
    },

    #[error("node {node} is reached as a branch but its branch back-link does not point to {parent:?}/{side:?}")]
    NodeBackLink {
        node: NodeId,
        parent: Option<NodeId>,
        side: Side,
    },

    #[error("branch {0} does not hold its own leaf in its subtree")]
    LeafOutsideBranch(NodeId),

    #[error("branch {node} has a null child on the {side:?} side")]
    MissingChild { node: NodeId, side: Side },

    #[error("branch {child} (bit {child_bit}) is not below its parent {parent} (bit {parent_bit})")]
    BitOrder {
        parent: NodeId,
        parent_bit: i32,
        child: NodeId,
        child_bit: i32,
    },

    #[error("leaf {leaf} disagrees with branch {branch} above bit {bit}")]
    Misplaced { leaf: NodeId, branch: NodeId, bit: i32 },

    #[error("leaf {leaf} sits on side {side:?} of branch {branch} but has the other value at bit {bit}")]
    WrongSide {
        leaf: NodeId,
        branch: NodeId,
        bit: i32,
        side: Side,
    },

    #[error("duplicate subtree {node} holds keys that differ")]
    DupMismatch { node: NodeId },

    #[error("duplicate subtree {node} in a tree that only accepts unique keys")]
    DupInUniqueTree { node: NodeId },

    #[error("node {0} is reached more than once")]
    Cycle(NodeId),
}

/// Result type alias for structural checks.
pub type VerifyResult<T> = std::result::Result<T, VerifyError>;
