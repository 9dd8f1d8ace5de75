use keyed_collections::{Collection, CollectionKind, DefaultObjectMap, FnCodec, KeyCodec};
use std::cell::{Cell, RefCell};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Key {
    id: u32,
}

type Codec = FnCodec<String, fn(&Key) -> String, fn(&String) -> Key>;
type KeyMap = DefaultObjectMap<Key, i32, fn(&Key) -> i32, Codec>;

fn encode(key: &Key) -> String {
    format!("id:{}", key.id)
}

fn decode(prim: &String) -> Key {
    let id = prim
        .strip_prefix("id:")
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(|| panic!("not an encoded key: {prim}"));
    Key { id }
}

fn zero(_: &Key) -> i32 {
    0
}

fn create_map() -> KeyMap {
    DefaultObjectMap::new(
        zero as fn(&Key) -> i32,
        encode as fn(&Key) -> String,
        decode as fn(&String) -> Key,
    )
}

fn k(id: u32) -> Key {
    Key { id }
}

#[test]
fn get_returns_default_for_new_key() {
    let mut m = create_map();
    assert_eq!(*m.get(&k(1)), 0);
    assert_eq!(m.len(), 1);
}

#[test]
fn get_returns_set_value() {
    let mut m = create_map();
    m.insert(&k(1), 42);
    assert_eq!(*m.get(&k(1)), 42);
}

#[test]
fn has_reflects_set_keys_only() {
    let mut m = create_map();
    assert!(!m.contains_key(&k(1)));
    m.insert(&k(1), 42);
    assert!(m.contains_key(&k(1)));
}

#[test]
fn delete_removes_existing_key() {
    let mut m = create_map();
    m.insert(&k(1), 42);
    assert!(m.remove(&k(1)).is_some());
    assert!(!m.contains_key(&k(1)));
    assert!(m.remove(&k(1)).is_none());
}

#[test]
fn clear_removes_all() {
    let mut m = create_map();
    m.insert(&k(1), 42);
    m.insert(&k(2), 24);
    m.clear();
    assert_eq!(m.len(), 0);
    assert!(!m.contains_key(&k(1)));
    assert!(!m.contains_key(&k(2)));
}

#[test]
fn size_reflects_entries() {
    let mut m = create_map();
    assert_eq!(m.len(), 0);
    m.insert(&k(1), 42);
    assert_eq!(m.len(), 1);
    m.insert(&k(2), 24);
    assert_eq!(m.len(), 2);
    m.remove(&k(1));
    assert_eq!(m.len(), 1);
}

#[test]
fn for_each_iterates_in_order() {
    let mut m = create_map();
    m.insert(&k(1), 42);
    m.insert(&k(2), 24);
    let mut results = Vec::new();
    m.for_each(|v, key, _| results.push((*v, key)));
    assert_eq!(results, [(42, k(1)), (24, k(2))]);
}

#[test]
fn entries_keys_and_values_iterate_in_order() {
    let mut m = create_map();
    m.insert(&k(1), 42);
    m.insert(&k(2), 24);

    let entries: Vec<(Key, i32)> = m.iter().map(|(key, v)| (key, *v)).collect();
    assert_eq!(entries, [(k(1), 42), (k(2), 24)]);
    let keys: Vec<Key> = m.keys().collect();
    assert_eq!(keys, [k(1), k(2)]);
    let values: Vec<i32> = m.values().copied().collect();
    assert_eq!(values, [42, 24]);
}

#[test]
fn into_iterator_works() {
    let mut m = create_map();
    m.insert(&k(1), 42);
    m.insert(&k(2), 24);
    let mut results = Vec::new();
    for (key, v) in &m {
        results.push((key, *v));
    }
    assert_eq!(results, [(k(1), 42), (k(2), 24)]);
}

#[test]
fn kind_is_map() {
    let m = create_map();
    assert_eq!(m.kind(), CollectionKind::Map);
    assert_eq!(m.kind().to_string(), "Map");
}

#[test]
fn map_transforms_value() {
    let mut m = create_map();
    m.insert(&k(1), 42);
    m.map(&k(1), |v| v * 2);
    assert_eq!(*m.get(&k(1)), 84);
}

#[test]
fn map_on_unset_key_starts_from_default() {
    let mut m = create_map();
    m.map(&k(5), |v| v + 1);
    m.map(&k(5), |v| v + 1);
    assert_eq!(m.peek(&k(5)), Some(&2));
}

#[test]
fn factory_receives_the_decoded_key() {
    let seen = RefCell::new(Vec::new());
    let encodes = Cell::new(0);
    let mut m = DefaultObjectMap::new(
        |key: &Key| {
            seen.borrow_mut().push(key.clone());
            key.id * 100
        },
        |key: &Key| {
            encodes.set(encodes.get() + 1);
            key.id
        },
        |&id: &u32| Key { id },
    );

    assert_eq!(*m.get(&k(3)), 300);
    assert_eq!(*m.get(&k(3)), 300);
    assert_eq!(*seen.borrow(), [k(3)]);
    assert_eq!(encodes.get(), 2);
}

#[test]
fn peek_and_iteration_never_call_the_factory() {
    let calls = Cell::new(0);
    let mut m = DefaultObjectMap::new(
        |_: &Key| {
            calls.set(calls.get() + 1);
            1u8
        },
        encode,
        decode,
    );

    assert_eq!(m.peek(&k(1)), None);
    assert!(!m.contains_key(&k(1)));
    assert_eq!(m.remove(&k(1)), None);
    m.for_each(|_, _, _| {});
    assert_eq!(m.iter().count(), 0);
    assert_eq!(calls.get(), 0);
}

#[test]
fn sentinel_factory_recomputes_per_key() {
    let calls = Cell::new(0);
    let mut m = DefaultObjectMap::with_sentinel(
        |key: &Key| {
            calls.set(calls.get() + 1);
            (key.id % 2 == 0).then_some(key.id)
        },
        Option::is_none,
        FnCodec::new(encode, decode),
    );

    assert_eq!(*m.get(&k(1)), None);
    assert_eq!(*m.get(&k(1)), None);
    assert_eq!(*m.get(&k(2)), Some(2));
    assert_eq!(*m.get(&k(2)), Some(2));
    assert_eq!(calls.get(), 3);
    assert_eq!(m.len(), 2);
}

#[test]
fn codec_is_reachable_for_callers() {
    let m = create_map();
    assert_eq!(m.codec().encode(&k(4)), "id:4");
    let back: Key = m.codec().decode(&"id:9".to_string());
    assert_eq!(back, k(9));
    assert!(m.as_primitive_map().is_empty());
}

#[cfg(feature = "json")]
mod json {
    use keyed_collections::{DefaultObjectMap, JsonCodec};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Cell {
        row: u16,
        col: u16,
    }

    #[test]
    fn counts_structured_keys() {
        let mut hits = DefaultObjectMap::with_codec(|_: &Cell| 0u32, JsonCodec::<Cell>::new());
        for (row, col) in [(0, 1), (2, 3), (0, 1), (0, 1)] {
            hits.map(&Cell { row, col }, |n: &u32| n + 1);
        }
        let counts: Vec<(Cell, u32)> = hits.into_iter().collect();
        assert_eq!(
            counts,
            [(Cell { row: 0, col: 1 }, 3), (Cell { row: 2, col: 3 }, 1)]
        );
    }
}
