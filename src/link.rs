//! Tagged links.
//!
//! A link is one `u32` word holding a slot index and a one-bit tag:
//!
//! - Bits 31..1: slot index (a node in the arena, or the tree root)
//! - Bit 0: tag, interpreted by the tag namespace `T`
//! - Special: `u32::MAX` = NULL
//!
//! Child links use [`Role`] (`Branch` / `Leaf`), attachment links use [`Side`]
//! (`Left` / `Right`). The namespace is a type parameter so the two can never
//! be mixed up. Which tag a link carries, not anything stored in the node,
//! decides how the referenced node must be read.

use std::fmt;
use std::marker::PhantomData;

/// Index of a node slot in an [`Arena`](crate::Arena).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Largest slot index usable by a node. The next index is reserved for the root.
    pub(crate) const MAX: u32 = (u32::MAX >> 1) - 2;

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A one-bit tag namespace.
pub trait Tag: Copy + Eq + fmt::Debug {
    fn from_bit(bit: u32) -> Self;
    fn bit(self) -> u32;
}

/// How the memory behind a child link must be interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Role {
    /// Content-independent decision point: read `bit` and `branches`.
    Branch,
    /// Bag of key + value: read the key.
    Leaf,
}

impl Tag for Role {
    #[inline]
    fn from_bit(bit: u32) -> Self {
        if bit == 0 {
            Role::Branch
        } else {
            Role::Leaf
        }
    }

    #[inline]
    fn bit(self) -> u32 {
        match self {
            Role::Branch => 0,
            Role::Leaf => 1,
        }
    }
}

/// Which branch slot of its parent a node occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) fn from_index(idx: usize) -> Self {
        if idx == 0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    #[inline]
    pub(crate) fn idx(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

impl Tag for Side {
    #[inline]
    fn from_bit(bit: u32) -> Self {
        Side::from_index(bit as usize)
    }

    #[inline]
    fn bit(self) -> u32 {
        self.idx() as u32
    }
}

/// What an attachment link points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Target {
    Root,
    Node(NodeId),
}

/// Slot index that attachment links use to designate the tree root.
const ROOT_SLOT: u32 = NodeId::MAX + 1;

pub(crate) struct Link<T: Tag> {
    raw: u32,
    _tag: PhantomData<T>,
}

// Manual impls: derives would put bounds on `T` that a `PhantomData` does not need.
impl<T: Tag> Clone for Link<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Tag> Copy for Link<T> {}

impl<T: Tag> PartialEq for Link<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: Tag> Eq for Link<T> {}

impl<T: Tag> Link<T> {
    pub(crate) const NULL: Self = Self::from_raw(u32::MAX);

    #[inline]
    const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _tag: PhantomData,
        }
    }

    #[inline]
    fn encode(slot: u32, tag: T) -> Self {
        debug_assert!(slot <= ROOT_SLOT);
        Self::from_raw((slot << 1) | tag.bit())
    }

    #[inline]
    pub(crate) fn new(node: NodeId, tag: T) -> Self {
        debug_assert!(node.0 <= NodeId::MAX);
        Self::encode(node.0, tag)
    }

    #[inline]
    pub(crate) fn is_null(self) -> bool {
        self.raw == u32::MAX
    }

    #[inline]
    pub(crate) fn tag(self) -> T {
        debug_assert!(!self.is_null());
        T::from_bit(self.raw & 1)
    }

    #[inline]
    fn slot(self) -> u32 {
        debug_assert!(!self.is_null());
        self.raw >> 1
    }
}

impl Link<Role> {
    #[inline]
    pub(crate) fn leaf(node: NodeId) -> Self {
        Self::new(node, Role::Leaf)
    }

    #[inline]
    pub(crate) fn branch(node: NodeId) -> Self {
        Self::new(node, Role::Branch)
    }

    #[inline]
    pub(crate) fn is_leaf(self) -> bool {
        self.tag() == Role::Leaf
    }

    /// The node behind a child link. Child links never target the root.
    #[inline]
    pub(crate) fn node(self) -> NodeId {
        debug_assert!(self.slot() <= NodeId::MAX);
        NodeId(self.slot())
    }
}

impl Link<Side> {
    #[inline]
    pub(crate) fn to_root() -> Self {
        Self::encode(ROOT_SLOT, Side::Left)
    }

    #[inline]
    pub(crate) fn to_node(parent: NodeId, side: Side) -> Self {
        Self::new(parent, side)
    }

    #[inline]
    pub(crate) fn target(self) -> Target {
        match self.slot() {
            ROOT_SLOT => Target::Root,
            slot => Target::Node(NodeId(slot)),
        }
    }
}

impl<T: Tag> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("NULL");
        }
        match self.slot() {
            ROOT_SLOT => write!(f, "root/{:?}", self.tag()),
            slot => write!(f, "#{slot}/{:?}", self.tag()),
        }
    }
}
