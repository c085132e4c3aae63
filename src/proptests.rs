use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Fixed-width keys over a tiny alphabet, so ties and shared prefixes are common.
fn fixed_key() -> impl Strategy<Value = Vec<u8>> + Clone {
    prop::collection::vec(prop::sample::select(vec![0x00u8, 0x01, 0x7f, 0x80, 0xfe, 0xff]), 4)
}

/// String keys never contain the terminator.
fn str_key() -> impl Strategy<Value = Vec<u8>> + Clone {
    prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'c', 0x7f, 0xff]), 0..=6)
}

#[derive(Clone, Debug, Arbitrary)]
enum FixedOp {
    #[proptest(weight = 4)]
    Insert(#[proptest(strategy = "fixed_key()")] Vec<u8>),
    #[proptest(weight = 2)]
    Lookup(#[proptest(strategy = "fixed_key()")] Vec<u8>),
    #[proptest(weight = 2)]
    Prefix(
        #[proptest(strategy = "fixed_key()")] Vec<u8>,
        #[proptest(strategy = "0usize..=4")] usize,
    ),
}

#[derive(Clone, Debug, Arbitrary)]
enum StrOp {
    #[proptest(weight = 4)]
    Insert(#[proptest(strategy = "str_key()")] Vec<u8>),
    #[proptest(weight = 2)]
    Lookup(#[proptest(strategy = "str_key()")] Vec<u8>),
    #[proptest(weight = 2)]
    LookupLen(
        #[proptest(strategy = "str_key()")] Vec<u8>,
        #[proptest(strategy = "0usize..=6")] usize,
    ),
}

type Model = BTreeMap<Vec<u8>, Vec<NodeId>>;

/// First entry (oldest) of the smallest key starting with `prefix`.
fn model_prefix(m: &Model, prefix: &[u8]) -> Option<NodeId> {
    m.range(prefix.to_vec()..)
        .next()
        .filter(|(k, _)| k.starts_with(prefix))
        .map(|(_, ids)| ids[0])
}

fn dup_chain<T>(root: &EbRoot, arena: &Arena<T>, first: NodeId) -> Vec<NodeId> {
    let mut out = vec![first];
    while let Some(next) = root.next_dup(arena, *out.last().unwrap()) {
        out.push(next);
    }
    out
}

fn check_model<T: IndirectKey>(root: &EbRoot, arena: &Arena<T>, m: &Model, str_keys: bool) {
    let total: usize = m.values().map(Vec::len).sum();
    assert_eq!(root.verify(arena), Ok(total));
    assert_eq!(root.first(arena), m.values().next().map(|ids| ids[0]));

    for (key, ids) in m {
        let first = if str_keys {
            root.lookup_str(arena, key)
        } else {
            root.lookup(arena, key, key.len())
        };
        assert_eq!(first, Some(ids[0]));
        assert_eq!(&dup_chain(root, arena, ids[0]), ids);
        assert_eq!(root.prev_dup(arena, ids[0]), None);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_fixed_width_matches_model(ops in prop::collection::vec(any::<FixedOp>(), 0..=300), unique in any::<bool>()) {
        let mut arena: Arena<Vec<u8>> = Arena::new();
        let mut root = if unique { EbRoot::unique() } else { EbRoot::new() };
        let mut m: Model = BTreeMap::new();

        for op in ops {
            match op {
                FixedOp::Insert(key) => {
                    let id = arena.alloc(key.clone());
                    let got = root.insert(&mut arena, id, key.len());
                    let ids = m.entry(key).or_default();
                    if unique && !ids.is_empty() {
                        prop_assert_eq!(got, ids[0]);
                        prop_assert!(!arena.is_resident(id));
                    } else {
                        prop_assert_eq!(got, id);
                        ids.push(id);
                    }
                }
                FixedOp::Lookup(key) => {
                    let want = m.get(&key).map(|ids| ids[0]);
                    prop_assert_eq!(root.lookup(&arena, &key, key.len()), want);
                }
                FixedOp::Prefix(key, len) => {
                    let want = if len == 0 {
                        m.values().next().map(|ids| ids[0])
                    } else {
                        model_prefix(&m, &key[..len])
                    };
                    prop_assert_eq!(root.lookup(&arena, &key, len), want);
                }
            }
        }

        check_model(&root, &arena, &m, false);
    }

    #[test]
    fn prop_strings_match_model(ops in prop::collection::vec(any::<StrOp>(), 0..=300), unique in any::<bool>()) {
        let mut arena: Arena<Vec<u8>> = Arena::new();
        let mut root = if unique { EbRoot::unique() } else { EbRoot::new() };
        let mut m: Model = BTreeMap::new();

        for op in ops {
            match op {
                StrOp::Insert(key) => {
                    let id = arena.alloc(key.clone());
                    let got = root.insert_str(&mut arena, id);
                    let ids = m.entry(key).or_default();
                    if unique && !ids.is_empty() {
                        prop_assert_eq!(got, ids[0]);
                    } else {
                        prop_assert_eq!(got, id);
                        ids.push(id);
                    }
                }
                StrOp::Lookup(key) => {
                    let want = m.get(&key).map(|ids| ids[0]);
                    prop_assert_eq!(root.lookup_str(&arena, &key), want);
                }
                StrOp::LookupLen(key, len) => {
                    let len = len.min(key.len());
                    let want = m.get(&key[..len]).map(|ids| ids[0]);
                    prop_assert_eq!(root.lookup_str_len(&arena, &key, len), want);
                }
            }
        }

        check_model(&root, &arena, &m, true);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_fixed_width() {
    let keys: Vec<[u8; 2]> = vec![[0x01, 0x02], [0x01, 0x03], [0x01, 0x02], [0x00, 0xff], [0x80, 0x00], [0x01, 0x02], [0x00, 0xff]];

    for unique in [false, true] {
        for_each_permutation(&keys, |perm| {
            let mut arena: Arena<[u8; 2]> = Arena::new();
            let mut root = if unique { EbRoot::unique() } else { EbRoot::new() };
            let mut m: Model = BTreeMap::new();

            for k in perm {
                let id = arena.alloc(k);
                let got = root.insert(&mut arena, id, 2);
                let ids = m.entry(k.to_vec()).or_default();
                if unique && !ids.is_empty() {
                    assert_eq!(got, ids[0]);
                } else {
                    assert_eq!(got, id);
                    ids.push(id);
                }
            }

            check_model(&root, &arena, &m, false);
            assert_eq!(root.lookup(&arena, &[0x01], 1), Some(m[&vec![0x01, 0x02]][0]));
            assert_eq!(root.lookup(&arena, &[0x02], 1), None);
        });
    }
}

#[test]
fn exhaustive_insert_order_strings() {
    let keys: Vec<&'static str> = vec!["a", "b", "a", "ab", "ba", "", "abc"];

    for unique in [false, true] {
        for_each_permutation(&keys, |perm| {
            let mut arena: Arena<&'static str> = Arena::new();
            let mut root = if unique { EbRoot::unique() } else { EbRoot::new() };
            let mut m: Model = BTreeMap::new();

            for k in perm {
                let id = arena.alloc(k);
                let got = root.insert_str(&mut arena, id);
                let ids = m.entry(k.as_bytes().to_vec()).or_default();
                if unique && !ids.is_empty() {
                    assert_eq!(got, ids[0]);
                } else {
                    assert_eq!(got, id);
                    ids.push(id);
                }
            }

            check_model(&root, &arena, &m, true);
            assert_eq!(root.lookup_str_len(&arena, "abcd", 2), Some(m[&b"ab".to_vec()][0]));
            assert_eq!(root.lookup_str_len(&arena, "abcd", 4), None);
            assert_eq!(root.lookup_str_len(&arena, "b", 1), Some(m[&b"b".to_vec()][0]));
        });
    }
}
