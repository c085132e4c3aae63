//! Trie nodes and the caller-owned storage they live in.

use std::ffi::{CStr, CString};
use std::rc::Rc;
use std::sync::Arc;

use crate::error::Error;
use crate::link::{Link, NodeId, Role, Side};

/// Access to the key bytes of a record, which the tree reads but never copies.
///
/// Once a record is resident in a tree, the bytes returned here must not change:
/// the trie's ordering depends on them and a mutation is not detected.
pub trait IndirectKey {
    fn key_bytes(&self) -> &[u8];
}

impl IndirectKey for [u8] {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl<const N: usize> IndirectKey for [u8; N] {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl IndirectKey for Vec<u8> {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl IndirectKey for str {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl IndirectKey for String {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl IndirectKey for CStr {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self.to_bytes_with_nul()
    }
}

impl IndirectKey for CString {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes_with_nul()
    }
}

impl<K: IndirectKey + ?Sized> IndirectKey for &K {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        (**self).key_bytes()
    }
}

impl<K: IndirectKey + ?Sized> IndirectKey for Box<K> {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        (**self).key_bytes()
    }
}

impl<K: IndirectKey + ?Sized> IndirectKey for Rc<K> {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        (**self).key_bytes()
    }
}

impl<K: IndirectKey + ?Sized> IndirectKey for Arc<K> {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        (**self).key_bytes()
    }
}

/// The link part of a record.
///
/// A resident node is always reachable as a leaf through `leaf_p`. Once it
/// also serves as a branch, `node_p` says where that branch is attached and
/// `bit`/`branches` describe the decision it makes.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Node {
    /// Discriminating bit, or a negative level inside a duplicate subtree.
    pub(crate) bit: i32,
    pub(crate) branches: [Link<Role>; 2],
    pub(crate) node_p: Link<Side>,
    pub(crate) leaf_p: Link<Side>,
}

impl Node {
    pub(crate) const DETACHED: Node = Node {
        bit: 0,
        branches: [Link::NULL; 2],
        node_p: Link::NULL,
        leaf_p: Link::NULL,
    };

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Link<Role> {
        self.branches[side.idx()]
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, link: Link<Role>) {
        self.branches[side.idx()] = link;
    }

    #[inline]
    pub(crate) fn is_dup(&self) -> bool {
        self.bit < 0
    }
}

/// Dense storage for caller records and their trie links.
///
/// The arena belongs to the caller: the caller allocates records here and the
/// trees built over it only rewire links. Slots are never moved or freed while
/// the arena lives, so a [`NodeId`] stays valid.
///
/// Links and records are kept in parallel vectors so that key bytes can be
/// borrowed while links are rewritten.
#[derive(Clone, Debug)]
pub struct Arena<T> {
    pub(crate) nodes: Vec<Node>,
    pub(crate) items: Vec<T>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            items: Vec::with_capacity(capacity),
        }
    }

    /// Store a record and return its id. The node starts detached from any tree.
    ///
    /// # Panics
    /// Panics if the arena already holds the maximum number of nodes.
    pub fn alloc(&mut self, item: T) -> NodeId {
        match self.try_alloc(item) {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_alloc(&mut self, item: T) -> Result<NodeId, Error> {
        let idx = self.nodes.len();
        if idx > NodeId::MAX as usize {
            return Err(Error::ArenaFull {
                capacity: NodeId::MAX as usize + 1,
            });
        }
        self.nodes.push(Node::DETACHED);
        self.items.push(item);
        Ok(NodeId(idx as u32))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &T {
        &self.items[id.index()]
    }

    /// Mutable access to a record. Changing the key of a resident record
    /// corrupts the ordering of the tree holding it.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.items[id.index()]
    }

    /// Whether the node is currently linked into some tree.
    #[inline]
    pub fn is_resident(&self, id: NodeId) -> bool {
        !self.nodes[id.index()].leaf_p.is_null()
    }

    /// Ids of all allocated slots, in allocation order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    #[cfg(test)]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl<T: IndirectKey> Arena<T> {
    /// Key bytes of a record.
    #[inline]
    pub fn key(&self, id: NodeId) -> &[u8] {
        self.items[id.index()].key_bytes()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
