//! Tree root, descent helpers and duplicate subtrees.
//!
//! Duplicates of one key live in a subtree of nodes with negative `bit`
//! (`-1` at the bottom, one less per level up). Entries are kept in insertion
//! order from left to right, so the leftmost leaf is the oldest.

use crate::link::{Link, NodeId, Role, Side, Target};
use crate::node::{Arena, Node};
use crate::tracing_helpers::trace_log;

/// Entry point of one tree built over an [`Arena`].
///
/// The root holds a single link. Whether the tree accepts several entries with
/// equal keys is decided when the root is created and never changes.
///
/// Not `Clone`: the nodes point back at the root slot they hang from, so a
/// second root over the same nodes would go stale on the first insert.
///
/// ```compile_fail
/// let root = elastic_trie::EbRoot::new();
/// let copy = root.clone();
/// ```
#[derive(Debug)]
pub struct EbRoot {
    pub(crate) top: Link<Role>,
    unique_keys: bool,
}

impl EbRoot {
    /// An empty tree that keeps every inserted entry, including equal keys.
    pub const fn new() -> Self {
        Self {
            top: Link::NULL,
            unique_keys: false,
        }
    }

    /// An empty tree that rejects a key equal to one already present.
    pub const fn unique() -> Self {
        Self {
            top: Link::NULL,
            unique_keys: true,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.top.is_null()
    }

    #[inline]
    pub fn unique_keys(&self) -> bool {
        self.unique_keys
    }

    /// Leftmost node of the tree.
    pub fn first<T>(&self, arena: &Arena<T>) -> Option<NodeId> {
        if self.is_empty() {
            return None;
        }
        Some(walk_down(&arena.nodes, self.top, Side::Left))
    }

    /// Next entry with the same key, in insertion order.
    pub fn next_dup<T>(&self, arena: &Arena<T>, id: NodeId) -> Option<NodeId> {
        next_dup(&arena.nodes, id)
    }

    /// Previous entry with the same key, in insertion order.
    pub fn prev_dup<T>(&self, arena: &Arena<T>, id: NodeId) -> Option<NodeId> {
        prev_dup(&arena.nodes, id)
    }

    /// Attach `new` as the only leaf of an empty tree.
    pub(crate) fn attach_first(&mut self, nodes: &mut [Node], new: NodeId) -> NodeId {
        debug_assert!(self.is_empty());
        self.top = Link::leaf(new);
        let n = &mut nodes[new.index()];
        n.leaf_p = Link::to_root();
        n.node_p = Link::NULL;
        new
    }
}

impl Default for EbRoot {
    fn default() -> Self {
        Self::new()
    }
}

/// Follow `side` links from `link` until a leaf is reached.
#[inline]
pub(crate) fn walk_down(nodes: &[Node], mut link: Link<Role>, side: Side) -> NodeId {
    while !link.is_leaf() {
        link = nodes[link.node().index()].child(side);
    }
    link.node()
}

/// Point the slot described by an attachment link at `link`.
#[inline]
pub(crate) fn set_child(
    root: &mut EbRoot,
    nodes: &mut [Node],
    at: Link<Side>,
    link: Link<Role>,
) {
    match at.target() {
        Target::Root => root.top = link,
        Target::Node(parent) => nodes[parent.index()].set_child(at.tag(), link),
    }
}

/// Add `new` after every entry of the subtree `sub`, whose keys all equal the
/// key of `new`. `sub` is either a duplicate subtree head or, when the key is
/// seen for the second time, handled by the caller directly.
pub(crate) fn insert_dup(
    root: &mut EbRoot,
    nodes: &mut [Node],
    sub: NodeId,
    new: NodeId,
) -> NodeId {
    let mut sub = sub;
    let mut head = sub;

    // Find the deepest hole on the right spine.
    while !nodes[head.index()].child(Side::Right).is_leaf() {
        let last = head;
        head = nodes[head.index()].child(Side::Right).node();
        if nodes[head.index()].bit > nodes[last.index()].bit + 1 {
            sub = head;
        }
    }

    if nodes[head.index()].bit < -1 {
        // The leaf hanging right of `head` gets a new parent one level below.
        let leaf = nodes[head.index()].child(Side::Right).node();
        nodes[head.index()].set_child(Side::Right, Link::branch(new));

        let leaf_p = nodes[leaf.index()].leaf_p;
        nodes[leaf.index()].leaf_p = Link::to_node(new, Side::Left);

        let n = &mut nodes[new.index()];
        n.bit = -1;
        n.node_p = leaf_p;
        n.leaf_p = Link::to_node(new, Side::Right);
        n.branches = [Link::leaf(leaf), Link::leaf(new)];
        trace_log!(new = new.0, below = head.0, "dup filled hole");
    } else {
        // No hole: stack `new` above `sub`, one level lower.
        let sub_p = nodes[sub.index()].node_p;
        set_child(root, nodes, sub_p, Link::branch(new));
        nodes[sub.index()].node_p = Link::to_node(new, Side::Left);

        let bit = nodes[sub.index()].bit - 1;
        let n = &mut nodes[new.index()];
        n.bit = bit;
        n.node_p = sub_p;
        n.leaf_p = Link::to_node(new, Side::Right);
        n.branches = [Link::branch(sub), Link::leaf(new)];
        trace_log!(new = new.0, above = sub.0, bit, "dup stacked");
    }
    new
}

/// Climb from a leaf while staying inside a duplicate subtree, then step over
/// to the sibling side and walk down.
fn step_dup(nodes: &[Node], id: NodeId, from: Side) -> Option<NodeId> {
    let towards = match from {
        Side::Left => Side::Right,
        Side::Right => Side::Left,
    };
    let mut at = nodes[id.index()].leaf_p;
    if at.is_null() {
        return None;
    }
    loop {
        let parent = match at.target() {
            Target::Root => return None,
            Target::Node(parent) => parent,
        };
        if !nodes[parent.index()].is_dup() {
            return None;
        }
        if at.tag() == from {
            let link = nodes[parent.index()].child(towards);
            return Some(walk_down(nodes, link, from));
        }
        at = nodes[parent.index()].node_p;
    }
}

pub(crate) fn next_dup(nodes: &[Node], id: NodeId) -> Option<NodeId> {
    step_dup(nodes, id, Side::Left)
}

pub(crate) fn prev_dup(nodes: &[Node], id: NodeId) -> Option<NodeId> {
    step_dup(nodes, id, Side::Right)
}
