//! DefaultPrimitiveMap: an insertion-ordered map that materializes and caches
//! a computed default the first time an unset key is read.

use crate::factory::{DefaultFactory, WithSentinel};
use crate::ordered_map::{InsertError, IntoIter, Iter, Keys, OrderedMap, Slot, Values};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use log::trace;
use std::collections::hash_map::RandomState;

/// Map whose `get` never reports absence.
///
/// Reading a key that was never set calls the factory with that key, stores
/// the result (appending it to the iteration order like an explicit insert)
/// and returns it. Later reads are served from the map. `contains_key`,
/// `peek`, `remove` and iteration never materialize anything; only `get`,
/// `get_mut` and `map` do, which is why they take `&mut self`.
///
/// Presence is decided by the map, not by the value: storing `0`, `""` or
/// `false` is an ordinary value and is returned as is. The one exception is a
/// factory built with a sentinel (see [`with_sentinel`](Self::with_sentinel)):
/// a stored value matching the sentinel is recomputed on every `get`.
///
/// ```
/// use keyed_collections::DefaultPrimitiveMap;
///
/// let mut lengths = DefaultPrimitiveMap::new(|k: &String| k.len());
/// assert_eq!(*lengths.get("abc"), 3);
/// lengths.insert("abc".to_string(), 99);
/// assert_eq!(*lengths.get("abc"), 99);
/// ```
#[derive(Clone)]
pub struct DefaultPrimitiveMap<K, V, F, S = RandomState> {
    map: OrderedMap<K, V, S>,
    factory: F,
}

impl<K, V, F> DefaultPrimitiveMap<K, V, F>
where
    K: Eq + Hash,
    F: FnMut(&K) -> V,
{
    /// Every value `factory` returns is cached, `None` included.
    ///
    /// # Caveat
    ///
    /// A factory that returns "no value" runs once per key here, and later
    /// reads return the cached `None`. Use [`optional`](Self::optional) (or
    /// [`with_sentinel`](Self::with_sentinel)) to have such a default computed
    /// again on every `get`.
    pub fn new(factory: F) -> Self {
        Self::with_hasher(factory, RandomState::new())
    }
}

impl<K, V, G, P> DefaultPrimitiveMap<K, V, WithSentinel<G, P>>
where
    K: Eq + Hash,
    G: FnMut(&K) -> V,
    P: Fn(&V) -> bool,
{
    /// Values for which `is_sentinel` holds are treated as never computed:
    /// `get` calls `factory` again and overwrites them in place.
    pub fn with_sentinel(factory: G, is_sentinel: P) -> Self {
        Self::with_hasher(WithSentinel::new(factory, is_sentinel), RandomState::new())
    }
}

impl<K, T, G> DefaultPrimitiveMap<K, Option<T>, WithSentinel<G, fn(&Option<T>) -> bool>>
where
    K: Eq + Hash,
    G: FnMut(&K) -> Option<T>,
{
    /// Optional values with `None` as the absence sentinel.
    pub fn optional(factory: G) -> Self {
        Self::with_sentinel(factory, Option::<T>::is_none as fn(&Option<T>) -> bool)
    }
}

impl<K, V, F, S> DefaultPrimitiveMap<K, V, F, S> {
    pub fn with_hasher(factory: F, hasher: S) -> Self {
        Self::from_parts(OrderedMap::with_hasher(hasher), factory)
    }

    /// Wraps an already populated map; its entries count as explicitly set.
    pub fn from_parts(map: OrderedMap<K, V, S>, factory: F) -> Self {
        Self { map, factory }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn as_map(&self) -> &OrderedMap<K, V, S> {
        &self.map
    }

    pub fn into_inner(self) -> OrderedMap<K, V, S> {
        self.map
    }

    pub fn into_parts(self) -> (OrderedMap<K, V, S>, F) {
        (self.map, self.factory)
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut OrderedMap<K, V, S>, &F) {
        (&mut self.map, &self.factory)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.map.iter()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        self.map.keys()
    }

    pub fn values(&self) -> Values<'_, K, V> {
        self.map.values()
    }

    pub fn for_each_mut<T>(&mut self, f: T)
    where
        T: FnMut(&K, &mut V),
    {
        self.map.for_each_mut(f)
    }
}

impl<K, V, F, S> DefaultPrimitiveMap<K, V, F, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Reads without materializing a default.
    pub fn peek<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(q)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(q)
    }

    /// Stores `value` verbatim without consulting the factory.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    pub fn try_insert(&mut self, key: K, value: V) -> Result<&mut V, InsertError> {
        self.map.try_insert(key, value)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(q)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove_entry(q)
    }
}

impl<K, V, F, S> DefaultPrimitiveMap<K, V, F, S>
where
    K: Eq + Hash,
    S: BuildHasher,
    F: DefaultFactory<K, V>,
{
    fn materialize<Q>(&mut self, q: &Q) -> Slot
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        match self.map.find(q) {
            Some(slot) if !self.factory.is_sentinel(self.map.slot_value(slot)) => slot,
            Some(slot) => {
                trace!("stored value is the absence sentinel, recomputing default");
                let value = self.factory.make_default(self.map.slot_key(slot));
                *self.map.slot_value_mut(slot) = value;
                slot
            }
            None => {
                let key = q.to_owned();
                let value = self.factory.make_default(&key);
                trace!("materialized default at position {}", self.map.len());
                self.map.insert_new(key, value)
            }
        }
    }

    /// Returns the stored value, computing and caching the default first if
    /// the key is unset.
    pub fn get<Q>(&mut self, q: &Q) -> &V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        let slot = self.materialize(q);
        self.map.slot_value(slot)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> &mut V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        let slot = self.materialize(q);
        self.map.slot_value_mut(slot)
    }

    /// `insert(key, transform(get(key)))` as a single step on one entry.
    pub fn map<Q, T>(&mut self, q: &Q, transform: T)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
        T: FnOnce(&V) -> V,
    {
        let slot = self.materialize(q);
        let next = transform(self.map.slot_value(slot));
        *self.map.slot_value_mut(slot) = next;
    }
}

impl<K, V, F, S> fmt::Debug for DefaultPrimitiveMap<K, V, F, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.map.iter()).finish()
    }
}

impl<K, V, F, S> Extend<(K, V)> for DefaultPrimitiveMap<K, V, F, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.map.extend(iter)
    }
}

impl<'a, K, V, F, S> IntoIterator for &'a DefaultPrimitiveMap<K, V, F, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl<K, V, F, S> IntoIterator for DefaultPrimitiveMap<K, V, F, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Invariant: a missing key is computed once, cached, and then served
    /// from the map; an explicit insert wins over the factory.
    #[test]
    fn default_is_computed_once_and_cached() {
        let calls = Cell::new(0);
        let mut m = DefaultPrimitiveMap::new(|k: &String| {
            calls.set(calls.get() + 1);
            k.len()
        });

        assert_eq!(*m.get("abc"), 3);
        assert_eq!(calls.get(), 1);
        assert_eq!(*m.get("abc"), 3);
        assert_eq!(calls.get(), 1);

        m.insert("abc".to_string(), 99);
        assert_eq!(*m.get("abc"), 99);
        assert_eq!(calls.get(), 1);
    }

    /// Invariant: only `get`/`get_mut`/`map` materialize; lookups, removal
    /// and iteration leave unset keys unset.
    #[test]
    fn non_reading_operations_do_not_materialize() {
        let calls = Cell::new(0);
        let mut m = DefaultPrimitiveMap::new(|_: &u32| {
            calls.set(calls.get() + 1);
            7
        });
        assert!(!m.contains_key(&1));
        assert_eq!(m.peek(&1), None);
        assert_eq!(m.remove(&1), None);
        assert_eq!(m.iter().count(), 0);
        assert_eq!(calls.get(), 0);
        assert!(m.is_empty());
    }

    /// Invariant: a materialized default is an ordinary entry: it counts in
    /// `len`, answers `contains_key`, and sits at its materialization point in
    /// the iteration order.
    #[test]
    fn materialized_default_joins_iteration_order() {
        let mut m = DefaultPrimitiveMap::new(|k: &u32| k * 100);
        m.insert(1, 1);
        let _ = m.get(&2);
        m.insert(3, 3);
        assert_eq!(m.len(), 3);
        assert!(m.contains_key(&2));
        let pairs: Vec<_> = m.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, [(1, 1), (2, 200), (3, 3)]);
    }

    /// Invariant: `map` on a missing key materializes the default first and
    /// stores the transformed value.
    #[test]
    fn map_on_missing_key_transforms_default() {
        let calls = Cell::new(0);
        let mut m = DefaultPrimitiveMap::new(|k: &String| {
            calls.set(calls.get() + 1);
            k.len()
        });
        m.map("abcd", |v| v * 2);
        assert_eq!(*m.get("abcd"), 8);
        assert_eq!(calls.get(), 1);
        assert_eq!(m.len(), 1);
    }

    /// Invariant: `get_mut` hands out the cached slot.
    #[test]
    fn get_mut_updates_cached_value() {
        let mut m: DefaultPrimitiveMap<&str, Vec<u8>, _> = DefaultPrimitiveMap::new(|_: &&str| Vec::new());
        m.get_mut(&"bytes").push(1);
        m.get_mut(&"bytes").push(2);
        assert_eq!(m.peek(&"bytes"), Some(&vec![1, 2]));
    }

    /// Invariant: with a sentinel predicate, a sentinel result is not served
    /// from the cache, so the factory runs on every `get`.
    #[test]
    fn sentinel_result_is_recomputed_each_read() {
        let calls = Cell::new(0);
        let mut m = DefaultPrimitiveMap::optional(|_: &String| {
            calls.set(calls.get() + 1);
            None::<u32>
        });
        assert_eq!(*m.get("u"), None);
        assert_eq!(*m.get("u"), None);
        assert_eq!(calls.get(), 2);
        // the slot is kept, at its original position
        assert_eq!(m.len(), 1);

        m.map("u", |v| v.or(Some(1)));
        assert_eq!(*m.get("u"), Some(1));
        assert_eq!(calls.get(), 3);
    }

    /// Invariant: `Debug` renders the stored entries only.
    #[test]
    fn debug_shows_entries() {
        let mut m = DefaultPrimitiveMap::new(|_: &char| 0u8);
        let _ = m.get(&'x');
        assert_eq!(format!("{:?}", m), "{'x': 0}");
    }
}
