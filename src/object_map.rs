//! ObjectMap: a map keyed by structured values, stored under their codec
//! encoding.
//!
//! `K` needs neither `Hash` nor `Eq`; all hashing and comparison happens on
//! `C::Primitive`. Keys handed back by iteration are rebuilt with
//! `C::decode`, so they are equal to the inserted keys but are new values.

use crate::codec::{FnCodec, KeyCodec};
use crate::ordered_map::{self, InsertError, OrderedMap};
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use std::collections::hash_map::RandomState;

/// Insertion-ordered map from structured keys to values.
///
/// ```
/// use keyed_collections::ObjectMap;
///
/// #[derive(Debug, PartialEq)]
/// struct Id { id: u32 }
///
/// let mut m = ObjectMap::new(|k: &Id| k.id, |&id: &u32| Id { id });
/// m.insert(&Id { id: 1 }, "one");
/// m.insert(&Id { id: 2 }, "two");
/// let entries: Vec<_> = m.iter().collect();
/// assert_eq!(entries, [(Id { id: 1 }, &"one"), (Id { id: 2 }, &"two")]);
/// assert_eq!(m.remove(&Id { id: 1 }), Some("one"));
/// assert!(!m.contains_key(&Id { id: 1 }));
/// assert_eq!(m.len(), 1);
/// ```
pub struct ObjectMap<K, V, C, S = RandomState>
where
    C: KeyCodec<K>,
{
    map: OrderedMap<C::Primitive, V, S>,
    codec: C,
}

impl<K, V, P, E, D> ObjectMap<K, V, FnCodec<P, E, D>>
where
    P: Eq + Hash,
    E: Fn(&K) -> P,
    D: Fn(&P) -> K,
{
    /// Builds a map from an `encode`/`decode` pair.
    pub fn new(encode: E, decode: D) -> Self {
        Self::with_codec(FnCodec::new(encode, decode))
    }
}

impl<K, V, C> ObjectMap<K, V, C>
where
    C: KeyCodec<K>,
{
    pub fn with_codec(codec: C) -> Self {
        Self::with_codec_and_hasher(codec, RandomState::new())
    }
}

impl<K, V, C, S> ObjectMap<K, V, C, S>
where
    C: KeyCodec<K>,
{
    pub fn with_codec_and_hasher(codec: C, hasher: S) -> Self {
        Self {
            map: OrderedMap::with_hasher(hasher),
            codec,
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// The backing map, keyed by encoded keys.
    pub fn as_primitive_map(&self) -> &OrderedMap<C::Primitive, V, S> {
        &self.map
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

    /// Entries in insertion order, keys decoded.
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter::new(self.map.iter(), &self.codec)
    }

    /// Keys in insertion order, decoded.
    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> ordered_map::Values<'_, C::Primitive, V> {
        self.map.values()
    }

    /// Calls `visitor(value, key, self)` for every entry in insertion order.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&V, K, &Self),
    {
        for (k, v) in self.iter() {
            visitor(v, k, self);
        }
    }

    /// Visits every entry with mutable access to the value.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(K, &mut V),
    {
        let codec = &self.codec;
        self.map.for_each_mut(|p, v| f(codec.decode(p), v));
    }
}

impl<K, V, C, S> ObjectMap<K, V, C, S>
where
    C: KeyCodec<K>,
    S: BuildHasher,
{
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(&self.codec.encode(key))
    }

    /// The stored value, or `None` if the key was never set. A stored value
    /// is returned whatever it is.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(&self.codec.encode(key))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let p = self.codec.encode(key);
        self.map.get_mut(&p)
    }

    /// Stores `value` under `encode(key)`; an existing entry keeps its place.
    pub fn insert(&mut self, key: &K, value: V) -> Option<V> {
        let p = self.codec.encode(key);
        self.map.insert(p, value)
    }

    pub fn try_insert(&mut self, key: &K, value: V) -> Result<&mut V, InsertError> {
        let p = self.codec.encode(key);
        self.map.try_insert(p, value)
    }

    /// Removes the entry; `Some` exactly when one existed.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let p = self.codec.encode(key);
        self.map.remove(&p)
    }
}

impl<K, V, C, S> Clone for ObjectMap<K, V, C, S>
where
    C: KeyCodec<K> + Clone,
    C::Primitive: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            codec: self.codec.clone(),
        }
    }
}

impl<K, V, C, S> Default for ObjectMap<K, V, C, S>
where
    C: KeyCodec<K> + Default,
    S: Default,
{
    fn default() -> Self {
        Self::with_codec_and_hasher(C::default(), S::default())
    }
}

impl<K, V, C, S> fmt::Debug for ObjectMap<K, V, C, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: KeyCodec<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, S> Extend<(K, V)> for ObjectMap<K, V, C, S>
where
    C: KeyCodec<K>,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(&k, v);
        }
    }
}

impl<'a, K, V, C, S> IntoIterator for &'a ObjectMap<K, V, C, S>
where
    C: KeyCodec<K>,
{
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C, S> IntoIterator for ObjectMap<K, V, C, S>
where
    C: KeyCodec<K>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.map.into_iter(), self.codec)
    }
}

/// Entries of an [`ObjectMap`] in insertion order, keys decoded.
pub struct Iter<'a, K, V, C>
where
    C: KeyCodec<K>,
{
    it: ordered_map::Iter<'a, C::Primitive, V>,
    codec: &'a C,
}

impl<'a, K, V, C> Iter<'a, K, V, C>
where
    C: KeyCodec<K>,
{
    pub(crate) fn new(it: ordered_map::Iter<'a, C::Primitive, V>, codec: &'a C) -> Self {
        Self { it, codec }
    }
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C>
where
    C: KeyCodec<K>,
{
    type Item = (K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(p, v)| (self.codec.decode(p), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V, C: KeyCodec<K>> ExactSizeIterator for Iter<'_, K, V, C> {}
impl<K, V, C: KeyCodec<K>> FusedIterator for Iter<'_, K, V, C> {}

/// Keys of an [`ObjectMap`] in insertion order, decoded.
pub struct Keys<'a, K, V, C>
where
    C: KeyCodec<K>,
{
    it: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Keys<'a, K, V, C>
where
    C: KeyCodec<K>,
{
    pub(crate) fn new(it: Iter<'a, K, V, C>) -> Self {
        Self { it }
    }
}

impl<K, V, C> Iterator for Keys<'_, K, V, C>
where
    C: KeyCodec<K>,
{
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        self.it.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V, C: KeyCodec<K>> ExactSizeIterator for Keys<'_, K, V, C> {}
impl<K, V, C: KeyCodec<K>> FusedIterator for Keys<'_, K, V, C> {}

/// Owning iterator over an [`ObjectMap`].
pub struct IntoIter<K, V, C>
where
    C: KeyCodec<K>,
{
    it: ordered_map::IntoIter<C::Primitive, V>,
    codec: C,
}

impl<K, V, C> IntoIter<K, V, C>
where
    C: KeyCodec<K>,
{
    pub(crate) fn new(it: ordered_map::IntoIter<C::Primitive, V>, codec: C) -> Self {
        Self { it, codec }
    }
}

impl<K, V, C> Iterator for IntoIter<K, V, C>
where
    C: KeyCodec<K>,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let (p, v) = self.it.next()?;
        Some((self.codec.decode(&p), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V, C: KeyCodec<K>> ExactSizeIterator for IntoIter<K, V, C> {}
impl<K, V, C: KeyCodec<K>> FusedIterator for IntoIter<K, V, C> {}
