//! OrderedMap: insertion-ordered hash map that backs every collection in the crate.
//!
//! Entries live in a `SlotMap` and are threaded into a doubly linked list in
//! insertion order. A `HashTable` of slot keys provides O(1) average lookup;
//! every entry caches its hash so the index never calls `K: Hash` again after
//! insertion.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::mem;
use hashbrown::hash_table::Entry as TableEntry;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;
use thiserror::Error;

/// Crate-internal stable reference to a live entry.
///
/// Valid until the entry is removed or the map is cleared.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct Slot(DefaultKey);

#[derive(Clone, Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

type Slots<K, V> = SlotMap<DefaultKey, Entry<K, V>>;

/// Ends of the insertion-order list.
#[derive(Copy, Clone, Debug, Default)]
struct Order {
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl Order {
    fn push_back<K, V>(&mut self, slots: &mut Slots<K, V>, slot: DefaultKey) {
        let prev = self.tail;
        if let Some(e) = slots.get_mut(slot) {
            e.prev = prev;
            e.next = None;
        }
        match prev {
            Some(p) => slots[p].next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
    }

    // Called after the entry itself has left `slots`.
    fn unlink<K, V>(
        &mut self,
        slots: &mut Slots<K, V>,
        prev: Option<DefaultKey>,
        next: Option<DefaultKey>,
    ) {
        match prev {
            Some(p) => slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => slots[n].prev = prev,
            None => self.tail = prev,
        }
    }
}

/// Returned by `try_insert` when the key is already present.
#[derive(Copy, Clone, Debug, Error, Eq, PartialEq)]
pub enum InsertError {
    /// An entry with an equal key exists; the map was left unchanged.
    #[error("an entry with this key already exists")]
    DuplicateKey,
}

/// Hash map that iterates in insertion order.
///
/// Updating the value of an existing key keeps its position; removing a key
/// and inserting it again appends it at the end.
#[derive(Clone)]
pub struct OrderedMap<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<DefaultKey>,
    slots: Slots<K, V>, // storage; linked in insertion order
    order: Order,
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, V, S> Default for OrderedMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> OrderedMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::new(),
            slots: SlotMap::with_key(),
            order: Order::default(),
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.order = Order::default();
    }

    /// Oldest entry still present.
    pub fn first(&self) -> Option<(&K, &V)> {
        let e = &self.slots[self.order.head?];
        Some((&e.key, &e.value))
    }

    /// Most recently appended entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        let e = &self.slots[self.order.tail?];
        Some((&e.key, &e.value))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            next: self.order.head,
            remaining: self.slots.len(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { it: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { it: self.iter() }
    }

    /// Visits every entry in insertion order with mutable access to the value.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V),
    {
        let mut cursor = self.order.head;
        while let Some(slot) = cursor {
            let e = &mut self.slots[slot];
            f(&e.key, &mut e.value);
            cursor = e.next;
        }
    }

    pub(crate) fn slot_key(&self, slot: Slot) -> &K {
        &self.slots[slot.0].key
    }

    pub(crate) fn slot_value(&self, slot: Slot) -> &V {
        &self.slots[slot.0].value
    }

    pub(crate) fn slot_value_mut(&mut self, slot: Slot) -> &mut V {
        &mut self.slots[slot.0].value
    }
}

impl<K, V, S> OrderedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub(crate) fn find<Q>(&self, q: &Q) -> Option<Slot>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.index
            .find(hash, |&k| {
                self.slots
                    .get(k)
                    .map(|e| e.key.borrow() == q)
                    .unwrap_or(false)
            })
            .map(|&k| Slot(k))
    }

    /// Appends an entry whose key the caller has just checked to be absent.
    pub(crate) fn insert_new(&mut self, key: K, value: V) -> Slot {
        debug_assert!(self.find(&key).is_none(), "insert_new on a present key");
        let hash = self.make_hash(&key);
        let slot = self.slots.insert(Entry {
            key,
            value,
            hash,
            prev: None,
            next: None,
        });
        let slots = &self.slots;
        self.index
            .insert_unique(hash, slot, |&k| slots.get(k).map(|e| e.hash).unwrap_or(0));
        self.order.push_back(&mut self.slots, slot);
        Slot(slot)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).map(|s| self.slot_value(s))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.find(q)?;
        Some(self.slot_value_mut(slot))
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).map(|s| (self.slot_key(s), self.slot_value(s)))
    }

    /// Inserts or updates. A new key is appended at the end of the order; an
    /// existing key keeps its position and the previous value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.find(&key) {
            Some(slot) => Some(mem::replace(self.slot_value_mut(slot), value)),
            None => {
                self.insert_new(key, value);
                None
            }
        }
    }

    /// Inserts only if the key is absent; otherwise leaves the map unchanged.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<&mut V, InsertError> {
        let hash = self.make_hash(&key);
        match self.index.entry(
            hash,
            |&kk| self.slots.get(kk).map(|e| e.key == key).unwrap_or(false),
            |&kk| self.slots.get(kk).map(|e| e.hash).unwrap_or(0),
        ) {
            TableEntry::Occupied(_) => Err(InsertError::DuplicateKey),
            TableEntry::Vacant(v) => {
                let slot = self.slots.insert(Entry {
                    key,
                    value,
                    hash,
                    prev: None,
                    next: None,
                });
                let _ = v.insert(slot);
                self.order.push_back(&mut self.slots, slot);
                Ok(&mut self.slots[slot].value)
            }
        }
    }

    /// Returns the value for `key`, inserting `default(&key)` first if absent.
    /// `default` runs only when the key is absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce(&K) -> V,
    {
        let slot = match self.find(&key) {
            Some(slot) => slot,
            None => {
                let value = default(&key);
                self.insert_new(key, value)
            }
        };
        self.slot_value_mut(slot)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    /// Unlinks the entry in O(1); the relative order of the rest is unchanged.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let slots = &self.slots;
        let found = self
            .index
            .find_entry(hash, |&k| {
                slots
                    .get(k)
                    .map(|e| e.key.borrow() == q)
                    .unwrap_or(false)
            })
            .ok()?;
        let (slot, _) = found.remove();
        let entry = self
            .slots
            .remove(slot)
            .expect("indexed slot must hold a live entry");
        self.order.unlink(&mut self.slots, entry.prev, entry.next);
        Some((entry.key, entry.value))
    }
}

impl<K, V, S> fmt::Debug for OrderedMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for OrderedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for OrderedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a OrderedMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for OrderedMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            next: self.order.head,
            slots: self.slots,
        }
    }
}

/// Iterator over entries in insertion order.
pub struct Iter<'a, K, V> {
    slots: &'a Slots<K, V>,
    next: Option<DefaultKey>,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots,
            next: self.next,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let e = self.slots.get(self.next.take()?)?;
        self.next = e.next;
        self.remaining -= 1;
        Some((&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over keys in insertion order.
pub struct Keys<'a, K, V> {
    it: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over values in insertion order.
pub struct Values<'a, K, V> {
    it: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

/// Owning iterator in insertion order.
pub struct IntoIter<K, V> {
    slots: Slots<K, V>,
    next: Option<DefaultKey>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let e = self.slots.remove(self.next.take()?)?;
        self.next = e.next;
        Some((e.key, e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.slots.len(), Some(self.slots.len()))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}
