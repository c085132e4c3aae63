//! Lookup and insertion for keys referenced indirectly by each record.
//!
//! Descent never re-compares a prefix already known to be equal: `pos` (in
//! lookup) and `bit` (in insert) track how much of the key has been certified
//! so far. Below a branch on bit `b`, every key shares bits `0..b`.

use std::cmp::Ordering;

use crate::bits::{bit_at, byte_at, cmp_bits, equal_bits, len_bits, range_equal};
use crate::link::{Link, NodeId, Side};
use crate::node::{Arena, IndirectKey};
use crate::tracing_helpers::trace_log;
use crate::tree::{insert_dup, set_child, walk_down, EbRoot};

impl EbRoot {
    /// Find the leftmost node whose key starts with the first `len` bytes of `key`.
    ///
    /// All keys in the tree must be at least `len` bytes long or agree on the
    /// bytes they have. With `len == 0` the leftmost node of the tree is returned.
    pub fn lookup<T: IndirectKey>(&self, arena: &Arena<T>, key: &[u8], len: usize) -> Option<NodeId> {
        let mut link = self.top;
        if link.is_null() {
            return None;
        }
        if len == 0 {
            return Some(walk_down(&arena.nodes, link, Side::Left));
        }

        let nodes = &arena.nodes;
        let mut pos = 0usize;
        loop {
            let id = link.node();
            let stored = arena.key(id);
            if link.is_leaf() {
                return range_equal(stored, key, pos, len).then_some(id);
            }

            let node = &nodes[id.index()];
            if node.is_dup() {
                // Every entry below matches the oldest one: either it is ours or nothing is.
                let oldest = walk_down(nodes, link, Side::Left);
                return range_equal(arena.key(oldest), key, pos, len).then_some(oldest);
            }

            // Bytes before the discriminating byte must match entirely.
            let bit = node.bit as u32;
            let byte = (bit >> 3) as usize;
            while pos < byte {
                if byte_at(stored, pos) != byte_at(key, pos) {
                    return None;
                }
                pos += 1;
                if pos == len {
                    return Some(walk_down(nodes, node.child(Side::Left), Side::Left));
                }
            }

            // Within the last byte, only the discriminating bit may differ.
            let shift = 7 - (bit & 7);
            let side = byte_at(key, pos) >> shift;
            if ((byte_at(stored, pos) >> shift) ^ side) > 1 {
                return None;
            }
            link = node.child(Side::from_index((side & 1) as usize));
        }
    }

    /// Insert `new`, whose key spans `len` bytes, and return the node now
    /// representing that key.
    ///
    /// The result is `new` unless the tree only accepts unique keys and an
    /// equal key is already present, in which case the resident node is
    /// returned and the tree is left untouched. Keys equal over `len` bytes are
    /// otherwise kept as duplicates, after every earlier entry with that key.
    ///
    /// Only the first `len` bytes of the new key take part: a key that is a
    /// prefix of resident keys is a duplicate of the leftmost of them, however
    /// the tree happens to be shaped.
    ///
    /// # Panics
    /// Panics if `len` is 256 MiB or more, whose bit positions would not fit a node.
    pub fn insert<T: IndirectKey>(&mut self, arena: &mut Arena<T>, new: NodeId, len: usize) -> NodeId {
        debug_assert!(!arena.is_resident(new), "node {new} is already resident");
        let len_bits = len_bits(len);
        let Arena { nodes, items } = arena;

        if self.is_empty() {
            trace_log!(new = new.0, "insert into empty tree");
            return self.attach_first(nodes, new);
        }

        let full = items[new.index()].key_bytes();
        let new_key = &full[..full.len().min(len)];

        // `at` is the slot `link` hangs from; `new` will replace it there.
        let mut at = Link::<Side>::to_root();
        let mut link = self.top;
        let mut bit = 0u32;

        loop {
            let old = link.node();
            let old_key = items[old.index()].key_bytes();

            if link.is_leaf() {
                bit = equal_bits(new_key, old_key, bit, len_bits);
                let diff = if bit < len_bits {
                    cmp_bits(new_key, old_key, bit)
                } else {
                    Ordering::Equal
                };

                if diff == Ordering::Equal && self.unique_keys() {
                    trace_log!(new = new.0, resident = old.0, "duplicate rejected");
                    return old;
                }

                let old_leaf_p = nodes[old.index()].leaf_p;
                nodes[new.index()].node_p = old_leaf_p;
                if diff == Ordering::Less {
                    nodes[old.index()].leaf_p = Link::to_node(new, Side::Right);
                    let n = &mut nodes[new.index()];
                    n.leaf_p = Link::to_node(new, Side::Left);
                    n.branches = [Link::leaf(new), Link::leaf(old)];
                } else {
                    nodes[old.index()].leaf_p = Link::to_node(new, Side::Left);
                    let n = &mut nodes[new.index()];
                    n.leaf_p = Link::to_node(new, Side::Right);
                    n.branches = [Link::leaf(old), Link::leaf(new)];

                    if diff == Ordering::Equal {
                        n.bit = -1;
                        set_child(self, nodes, at, Link::branch(new));
                        trace_log!(new = new.0, first = old.0, "dup subtree created");
                        return new;
                    }
                }
                break;
            }

            let old_bit = nodes[old.index()].bit;
            let (splice, old_key) = if old_bit < 0 {
                // Head of a duplicate subtree: compare till the end, against
                // the oldest entry since later ones may be shorter.
                let oldest = walk_down(&nodes[..], link, Side::Left);
                let oldest_key = items[oldest.index()].key_bytes();
                bit = equal_bits(new_key, oldest_key, bit, len_bits);
                (true, oldest_key)
            } else {
                // Bits past our length never split: a key ending above this
                // branch keeps descending and is classified at the bottom.
                let limit = (old_bit as u32).min(len_bits);
                if bit < limit {
                    bit = equal_bits(new_key, old_key, bit, limit);
                }
                (bit < limit, old_key)
            };

            if splice {
                let diff = if bit < len_bits {
                    cmp_bits(new_key, old_key, bit)
                } else {
                    Ordering::Equal
                };

                if diff == Ordering::Equal {
                    debug_assert!(!self.unique_keys(), "duplicate subtree in a unique tree");
                    trace_log!(new = new.0, head = old.0, "dup appended");
                    return insert_dup(self, nodes, old, new);
                }

                let old_node_p = nodes[old.index()].node_p;
                nodes[new.index()].node_p = old_node_p;
                if diff == Ordering::Less {
                    nodes[old.index()].node_p = Link::to_node(new, Side::Right);
                    let n = &mut nodes[new.index()];
                    n.leaf_p = Link::to_node(new, Side::Left);
                    n.branches = [Link::leaf(new), Link::branch(old)];
                } else {
                    nodes[old.index()].node_p = Link::to_node(new, Side::Left);
                    let n = &mut nodes[new.index()];
                    n.leaf_p = Link::to_node(new, Side::Right);
                    n.branches = [Link::branch(old), Link::leaf(new)];
                }
                break;
            }

            // All bits up to `old_bit` are common: walk down.
            let side = Side::from_index(bit_at(new_key, old_bit as u32));
            at = Link::to_node(old, side);
            link = nodes[old.index()].child(side);
        }

        // `new` now sits between the slot `at` and the node it used to hold.
        trace_log!(new = new.0, bit, "branch spliced");
        nodes[new.index()].bit = bit as i32;
        set_child(self, nodes, at, Link::branch(new));
        new
    }
}
