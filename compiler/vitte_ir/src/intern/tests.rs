use super::*;
use crate::arena::ArenaConfig;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct TestId(u32);

impl InternIndex for TestId {
    fn from_raw(raw: u32) -> Self {
        TestId(raw)
    }

    fn raw(self) -> u32 {
        self.0
    }
}

#[test]
fn test_fnv1a_reference_values() {
    assert_eq!(hash_bytes(b""), 0xcbf2_9ce4_8422_2325);
    assert_eq!(hash_bytes(b"a"), 0xaf63_dc4c_8601_ec8c);
    assert_eq!(hash_bytes(b"foobar"), 0x8594_4171_f739_67e8);
}

#[test]
fn test_intern_deduplicates() {
    let mut arena = Arena::new();
    let mut table = InternTable::<TestId>::new();
    let a = table.intern(&mut arena, b"foo").unwrap();
    let b = table.intern(&mut arena, b"foo").unwrap();
    let c = table.intern(&mut arena, b"bar").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(table.len(), 2);
    assert_eq!(a, TestId(1));
}

#[test]
fn test_resolve_and_get() {
    let mut arena = Arena::new();
    let mut table = InternTable::<TestId>::new();
    let id = table.intern(&mut arena, b"hello").unwrap();
    assert_eq!(table.resolve(&arena, id), Some(&b"hello"[..]));
    assert_eq!(table.get(&arena, b"hello"), Some(id));
    assert_eq!(table.get(&arena, b"nope"), None);
    assert_eq!(table.resolve(&arena, TestId(0)), None);
    assert_eq!(table.resolve(&arena, TestId(99)), None);
}

#[test]
fn test_empty_and_prefix_strings_are_distinct() {
    let mut arena = Arena::new();
    let mut table = InternTable::<TestId>::new();
    let empty = table.intern(&mut arena, b"").unwrap();
    let ab = table.intern(&mut arena, b"ab").unwrap();
    let a = table.intern(&mut arena, b"a").unwrap();
    assert_ne!(empty, a);
    assert_ne!(ab, a);
    assert_eq!(table.resolve(&arena, empty), Some(&b""[..]));
}

#[test]
fn test_grows_past_load_factor() {
    let mut arena = Arena::new();
    let mut table = InternTable::<TestId>::new();
    assert_eq!(table.capacity(), INITIAL_CAPACITY);

    let ids: Vec<TestId> = (0..44)
        .map(|i| table.intern(&mut arena, format!("name{i}").as_bytes()).unwrap())
        .collect();
    assert_eq!(table.capacity(), 64);

    table.intern(&mut arena, b"one more").unwrap();
    assert_eq!(table.capacity(), 128);

    // Every earlier handle still resolves to the same text after the rehash.
    for (i, id) in ids.iter().enumerate() {
        let expected = format!("name{i}");
        assert_eq!(table.resolve(&arena, *id), Some(expected.as_bytes()));
        assert_eq!(table.get(&arena, expected.as_bytes()), Some(*id));
    }
}

#[test]
fn test_arena_exhaustion_is_reported() {
    let mut arena = Arena::with_config(ArenaConfig::with_block_size(8).max_bytes(8));
    let mut table = InternTable::<TestId>::new();
    table.intern(&mut arena, b"abcd").unwrap();
    let err = table.intern(&mut arena, b"efghijkl").unwrap_err();
    assert!(matches!(err, InternError::Arena(ArenaError::OutOfMemory { .. })));
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(&arena, b"efghijkl"), None);
}

#[test]
fn test_clear() {
    let mut arena = Arena::new();
    let mut table = InternTable::<TestId>::new();
    table.intern(&mut arena, b"x").unwrap();
    table.clear();
    assert!(table.is_empty());
    assert_eq!(table.get(&arena, b"x"), None);
}

proptest! {
    #[test]
    fn interning_is_stable(words in proptest::collection::vec("[a-z]{0,6}", 1..200)) {
        let mut arena = Arena::with_config(ArenaConfig::with_block_size(128));
        let mut table = InternTable::<TestId>::new();
        let mut seen = std::collections::HashMap::new();
        for word in &words {
            let id = table.intern(&mut arena, word.as_bytes()).unwrap();
            let first = *seen.entry(word.clone()).or_insert(id);
            prop_assert_eq!(first, id);
            prop_assert_eq!(table.len(), seen.len());
        }
        for (word, id) in &seen {
            prop_assert_eq!(table.resolve(&arena, *id), Some(word.as_bytes()));
        }
    }
}
