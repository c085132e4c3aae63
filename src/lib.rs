//! # elastic-trie
//!
//! An allocation-free elastic binary trie over byte-string keys.
//!
//! Records live in a caller-owned [`Arena`]; a tree is an [`EbRoot`] that links
//! records together without ever allocating, copying keys or moving records.
//! Each record doubles as a leaf (its key) and, once it has been spliced in, as
//! the branch point for the first bit where it differed from its neighbour.
//! Keys are read indirectly through [`IndirectKey`] and must stay unchanged
//! while resident.
//!
//! Two key flavours share the same descent:
//!
//! - indirect keys with an explicit byte length: [`EbRoot::insert`], [`EbRoot::lookup`]
//! - zero-terminated strings: [`EbRoot::insert_str`], [`EbRoot::lookup_str`],
//!   [`EbRoot::lookup_str_len`]
//!
//! Several entries may share a key; they are returned oldest first and walked
//! with [`EbRoot::next_dup`] / [`EbRoot::prev_dup`]. A tree created with
//! [`EbRoot::unique`] instead hands back the resident entry.
//!
//! ## Example
//!
//! ```rust
//! use elastic_trie::{Arena, EbRoot};
//!
//! let mut arena: Arena<Vec<u8>> = Arena::new();
//! let mut root = EbRoot::new();
//!
//! let hello = arena.alloc(b"hello".to_vec());
//! let help = arena.alloc(b"help".to_vec());
//! assert_eq!(root.insert(&mut arena, hello, 5), hello);
//! assert_eq!(root.insert(&mut arena, help, 4), help);
//!
//! assert_eq!(root.lookup(&arena, b"hello", 5), Some(hello));
//! assert_eq!(root.lookup(&arena, b"hel", 3), Some(hello));
//! assert_eq!(root.lookup(&arena, b"helm", 4), None);
//! ```
//!
//! ## Concurrency
//!
//! No operation synchronizes. Lookups take `&self` and `&Arena`, inserts take
//! `&mut` on both, so the borrow checker already keeps writers exclusive; wrap
//! root and arena in a lock to share them across threads.

#![forbid(unsafe_code)]

mod bits;
mod error;
mod indirect;
mod link;
mod node;
mod string;
mod tracing_helpers;
mod tree;
mod verify;

pub use error::{Error, VerifyError, VerifyResult};
pub use link::{NodeId, Side};
pub use node::{Arena, IndirectKey};
pub use tree::EbRoot;

#[cfg(test)]
mod proptests;
