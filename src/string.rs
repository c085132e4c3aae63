//! Zero-terminated string keys.
//!
//! A string key ends at its first `0` byte, or at the end of its slice. The
//! terminator takes part in every comparison, so no key is a prefix of
//! another and `"ab"` sorts before `"abc"`. Descent and branching are the ones
//! used for indirect keys, bounded by the terminator instead of a length.

use crate::bits::{byte_at, terminated_len};
use crate::link::NodeId;
use crate::node::{Arena, IndirectKey};
use crate::tree::EbRoot;

impl EbRoot {
    /// Find the first node whose string key equals `key`.
    ///
    /// Only meaningful on trees whose keys were all inserted with
    /// [`insert_str`](Self::insert_str).
    pub fn lookup_str<T: IndirectKey>(&self, arena: &Arena<T>, key: impl AsRef<[u8]>) -> Option<NodeId> {
        let key = key.as_ref();
        let len = terminated_len(key);
        self.lookup(arena, &key[..len], len + 1)
    }

    /// Find the first node whose string key is exactly the first `len` bytes
    /// of `key`.
    ///
    /// This is a prefix lookup over `len` bytes that additionally requires the
    /// matched key to end right there. `key` must not hold a `0` byte among its
    /// first `len` bytes.
    pub fn lookup_str_len<T: IndirectKey>(
        &self,
        arena: &Arena<T>,
        key: impl AsRef<[u8]>,
        len: usize,
    ) -> Option<NodeId> {
        let id = self.lookup(arena, key.as_ref(), len)?;
        (byte_at(arena.key(id), len) == 0).then_some(id)
    }

    /// Insert `new` keyed by its zero-terminated string and return the node now
    /// representing that string, as [`insert`](Self::insert) does.
    pub fn insert_str<T: IndirectKey>(&mut self, arena: &mut Arena<T>, new: NodeId) -> NodeId {
        let len = terminated_len(arena.key(new));
        self.insert(arena, new, len + 1)
    }
}
