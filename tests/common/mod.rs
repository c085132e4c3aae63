//! Shared test setup.
//!
//! ```rust,ignore
//! mod common;
//!
//! #[test]
//! fn my_test() {
//!     common::init_tracing();
//! }
//! ```
//!
//! `RUST_LOG` selects what is printed, e.g. `RUST_LOG=elastic_trie=trace`.
//! Events are only emitted when the crate is built with `--features tracing`.

#![allow(dead_code)]

use std::sync::Once;

use elastic_trie::{Arena, EbRoot, IndirectKey, NodeId};

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a test-friendly subscriber once per test binary.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Insert every key with its full length and return the resident ids.
pub fn build_indirect<K: IndirectKey + Clone>(keys: &[K], unique: bool) -> (EbRoot, Arena<K>, Vec<NodeId>) {
    let mut arena = Arena::with_capacity(keys.len());
    let mut root = if unique { EbRoot::unique() } else { EbRoot::new() };
    let ids = keys
        .iter()
        .map(|k| {
            let len = k.key_bytes().len();
            let id = arena.alloc(k.clone());
            root.insert(&mut arena, id, len)
        })
        .collect();
    (root, arena, ids)
}
