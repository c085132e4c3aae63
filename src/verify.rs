//! Structural checks over a resident tree.
//!
//! The walk uses an explicit stack and compares full key slices, so it assumes
//! every key was inserted with its whole slice as the compared range (or, for
//! string trees, that each key carries its terminator at its end).

use crate::bits::{bit_at, equal_bits, range_equal};
use crate::error::{VerifyError, VerifyResult};
use crate::link::{Link, NodeId, Role, Side, Target};
use crate::node::{Arena, IndirectKey, Node};
use crate::tracing_helpers::debug_log;
use crate::tree::{walk_down, EbRoot};

#[derive(Clone, Copy)]
struct Visit {
    link: Link<Role>,
    at: Link<Side>,
    depth: usize,
}

/// A duplicate may be shorter than the oldest entry of its subtree, but must
/// agree with it over its own length.
fn matches_oldest(key: &[u8], oldest: &[u8]) -> bool {
    range_equal(key, oldest, 0, key.len())
}

fn parent_of(at: Link<Side>) -> (Option<NodeId>, Side) {
    match at.target() {
        Target::Root => (None, at.tag()),
        Target::Node(p) => (Some(p), at.tag()),
    }
}

/// A branch must be reachable through its own leaf: climbing from the leaf
/// back-link has to pass through the branch before the root.
fn owns_its_leaf(nodes: &[Node], id: NodeId) -> VerifyResult<bool> {
    let mut up = nodes[id.index()].leaf_p;
    for _ in 0..=nodes.len() {
        if up.is_null() {
            return Ok(false);
        }
        match up.target() {
            Target::Root => return Ok(false),
            Target::Node(p) if p == id => return Ok(true),
            Target::Node(p) => {
                if p.index() >= nodes.len() {
                    return Err(VerifyError::Dangling(p));
                }
                up = nodes[p.index()].node_p;
            }
        }
    }
    Err(VerifyError::Cycle(id))
}

impl EbRoot {
    /// Check every structural invariant of the tree and return the number of
    /// resident entries.
    pub fn verify<T: IndirectKey>(&self, arena: &Arena<T>) -> VerifyResult<usize> {
        if self.is_empty() {
            return Ok(0);
        }

        let nodes = &arena.nodes;
        let mut seen_leaf = vec![false; nodes.len()];
        let mut seen_branch = vec![false; nodes.len()];
        // Branches above the visited node, with the side taken below each.
        let mut path: Vec<(NodeId, Side)> = Vec::new();
        let mut stack = vec![Visit {
            link: self.top,
            at: Link::to_root(),
            depth: 0,
        }];
        let mut leaves = 0usize;

        while let Some(Visit { link, at, depth }) = stack.pop() {
            let id = link.node();
            if id.index() >= nodes.len() {
                return Err(VerifyError::Dangling(id));
            }
            let (parent, side) = parent_of(at);
            path.truncate(depth.saturating_sub(1));
            if let Some(p) = parent {
                path.push((p, side));
            }
            let node = &nodes[id.index()];

            if link.is_leaf() {
                if node.leaf_p != at {
                    return Err(VerifyError::LeafBackLink { node: id, parent, side });
                }
                if std::mem::replace(&mut seen_leaf[id.index()], true) {
                    return Err(VerifyError::Cycle(id));
                }
                // Inside a duplicate subtree, placement is decided by its oldest entry.
                let mut key = arena.key(id);
                if let Some(&(head, _)) = path.iter().find(|(n, _)| nodes[n.index()].is_dup()) {
                    let oldest = arena.key(walk_down(nodes, Link::branch(head), Side::Left));
                    if !matches_oldest(key, oldest) {
                        return Err(VerifyError::DupMismatch { node: head });
                    }
                    key = oldest;
                }
                for &(branch, side) in &path {
                    let bit = nodes[branch.index()].bit;
                    if bit < 0 {
                        continue;
                    }
                    let branch_key = arena.key(branch);
                    let b = bit as u32;
                    if equal_bits(key, branch_key, 0, b) < b {
                        return Err(VerifyError::Misplaced { leaf: id, branch, bit });
                    }
                    if bit_at(key, b) != side.idx() {
                        return Err(VerifyError::WrongSide { leaf: id, branch, bit, side });
                    }
                }
                leaves += 1;
                continue;
            }

            if node.node_p != at {
                return Err(VerifyError::NodeBackLink { node: id, parent, side });
            }
            if std::mem::replace(&mut seen_branch[id.index()], true) {
                return Err(VerifyError::Cycle(id));
            }
            if node.is_dup() && self.unique_keys() {
                return Err(VerifyError::DupInUniqueTree { node: id });
            }
            if let Some(p) = parent {
                let parent_bit = nodes[p.index()].bit;
                let ordered = if node.bit < 0 {
                    parent_bit >= 0 || node.bit > parent_bit
                } else {
                    parent_bit >= 0 && node.bit > parent_bit
                };
                if !ordered {
                    return Err(VerifyError::BitOrder {
                        parent: p,
                        parent_bit,
                        child: id,
                        child_bit: node.bit,
                    });
                }
            }
            if !owns_its_leaf(nodes, id)? {
                return Err(VerifyError::LeafOutsideBranch(id));
            }

            for side in [Side::Right, Side::Left] {
                let child = node.child(side);
                if child.is_null() {
                    return Err(VerifyError::MissingChild { node: id, side });
                }
                stack.push(Visit {
                    link: child,
                    at: Link::to_node(id, side),
                    depth: depth + 1,
                });
            }
        }

        debug_log!(leaves, "tree verified");
        Ok(leaves)
    }
}
