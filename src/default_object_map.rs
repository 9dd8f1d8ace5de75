//! DefaultObjectMap: structured keys through a codec, with lazily cached
//! defaults.
//!
//! Layered as a [`DefaultPrimitiveMap`] keyed by `C::Primitive` whose factory
//! is [`Decoded`]: the primitive is decoded before the user factory runs, so
//! the factory always sees a structured key.

use crate::codec::{FnCodec, KeyCodec};
use crate::default_map::DefaultPrimitiveMap;
use crate::factory::{DefaultFactory, WithSentinel};
use crate::object_map::{IntoIter, Iter, Keys};
use crate::ordered_map::{self, InsertError, OrderedMap};
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use std::collections::hash_map::RandomState;

/// Adapts a factory over structured keys into one over encoded keys.
pub struct Decoded<K, C, F> {
    codec: C,
    factory: F,
    _key: PhantomData<fn(&K) -> K>,
}

impl<K, C, F> Decoded<K, C, F> {
    fn new(codec: C, factory: F) -> Self {
        Self {
            codec,
            factory,
            _key: PhantomData,
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<K, C: Clone, F: Clone> Clone for Decoded<K, C, F> {
    fn clone(&self) -> Self {
        Self::new(self.codec.clone(), self.factory.clone())
    }
}

impl<K, V, C, F> DefaultFactory<C::Primitive, V> for Decoded<K, C, F>
where
    C: KeyCodec<K>,
    F: DefaultFactory<K, V>,
{
    #[inline]
    fn make_default(&mut self, primitive: &C::Primitive) -> V {
        let key = self.codec.decode(primitive);
        self.factory.make_default(&key)
    }

    #[inline]
    fn is_sentinel(&self, value: &V) -> bool {
        self.factory.is_sentinel(value)
    }
}

/// Insertion-ordered map from structured keys to values whose `get` computes,
/// caches and returns a default for keys never set.
///
/// Everything except `get`, `get_mut` and `map` behaves exactly like
/// [`ObjectMap`](crate::ObjectMap).
///
/// ```
/// use keyed_collections::DefaultObjectMap;
///
/// let mut hits = DefaultObjectMap::new(
///     |_: &(u8, u8)| 0u32,
///     |&(x, y): &(u8, u8)| u16::from(x) << 8 | u16::from(y),
///     |&p: &u16| ((p >> 8) as u8, p as u8),
/// );
/// hits.map(&(1, 2), |n| n + 1);
/// hits.map(&(1, 2), |n| n + 1);
/// assert_eq!(*hits.get(&(1, 2)), 2);
/// assert_eq!(hits.keys().collect::<Vec<_>>(), [(1, 2)]);
/// ```
pub struct DefaultObjectMap<K, V, F, C, S = RandomState>
where
    C: KeyCodec<K>,
{
    inner: DefaultPrimitiveMap<C::Primitive, V, Decoded<K, C, F>, S>,
}

impl<K, V, F, P, E, D> DefaultObjectMap<K, V, F, FnCodec<P, E, D>>
where
    F: FnMut(&K) -> V,
    P: Eq + Hash,
    E: Fn(&K) -> P,
    D: Fn(&P) -> K,
{
    /// Builds a map from a default factory and an `encode`/`decode` pair.
    pub fn new(factory: F, encode: E, decode: D) -> Self {
        Self::with_codec(factory, FnCodec::new(encode, decode))
    }
}

impl<K, V, F, C> DefaultObjectMap<K, V, F, C>
where
    C: KeyCodec<K>,
{
    pub fn with_codec(factory: F, codec: C) -> Self {
        Self::with_codec_and_hasher(factory, codec, RandomState::new())
    }
}

impl<K, V, G, Pr, C> DefaultObjectMap<K, V, WithSentinel<G, Pr>, C>
where
    C: KeyCodec<K>,
    G: FnMut(&K) -> V,
    Pr: Fn(&V) -> bool,
{
    /// Stored values matching `is_sentinel` are recomputed by every `get`.
    pub fn with_sentinel(factory: G, is_sentinel: Pr, codec: C) -> Self {
        Self::with_codec(WithSentinel::new(factory, is_sentinel), codec)
    }
}

impl<K, V, F, C, S> DefaultObjectMap<K, V, F, C, S>
where
    C: KeyCodec<K>,
{
    pub fn with_codec_and_hasher(factory: F, codec: C, hasher: S) -> Self {
        Self {
            inner: DefaultPrimitiveMap::with_hasher(Decoded::new(codec, factory), hasher),
        }
    }

    pub fn codec(&self) -> &C {
        self.inner.factory().codec()
    }

    pub fn factory(&self) -> &F {
        self.inner.factory().factory()
    }

    /// The backing map, keyed by encoded keys.
    pub fn as_primitive_map(&self) -> &OrderedMap<C::Primitive, V, S> {
        self.inner.as_map()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Entries in insertion order, keys decoded.
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter::new(self.inner.iter(), self.codec())
    }

    /// Keys in insertion order, decoded.
    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> ordered_map::Values<'_, C::Primitive, V> {
        self.inner.values()
    }

    /// Calls `visitor(value, key, self)` for every entry in insertion order.
    pub fn for_each<T>(&self, mut visitor: T)
    where
        T: FnMut(&V, K, &Self),
    {
        for (k, v) in self.iter() {
            visitor(v, k, self);
        }
    }

    /// Visits every entry with mutable access to the value. Never
    /// materializes a default.
    pub fn for_each_mut<T>(&mut self, mut f: T)
    where
        T: FnMut(K, &mut V),
    {
        let (map, decoded) = self.inner.parts_mut();
        let codec = decoded.codec();
        map.for_each_mut(|p, v| f(codec.decode(p), v));
    }
}

impl<K, V, F, C, S> DefaultObjectMap<K, V, F, C, S>
where
    C: KeyCodec<K>,
    S: BuildHasher,
{
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(&self.codec().encode(key))
    }

    /// Reads without materializing a default.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.inner.peek(&self.codec().encode(key))
    }

    pub fn insert(&mut self, key: &K, value: V) -> Option<V> {
        let p = self.codec().encode(key);
        self.inner.insert(p, value)
    }

    pub fn try_insert(&mut self, key: &K, value: V) -> Result<&mut V, InsertError> {
        let p = self.codec().encode(key);
        self.inner.try_insert(p, value)
    }

    /// Removes the entry; `Some` exactly when one existed.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let p = self.codec().encode(key);
        self.inner.remove(&p)
    }
}

impl<K, V, F, C, S> DefaultObjectMap<K, V, F, C, S>
where
    C: KeyCodec<K>,
    C::Primitive: Clone,
    S: BuildHasher,
    F: DefaultFactory<K, V>,
{
    /// Returns the stored value, computing and caching
    /// `factory(&decode(&encode(key)))` first if the key is unset.
    pub fn get(&mut self, key: &K) -> &V {
        let p = self.codec().encode(key);
        self.inner.get(&p)
    }

    pub fn get_mut(&mut self, key: &K) -> &mut V {
        let p = self.codec().encode(key);
        self.inner.get_mut(&p)
    }

    /// `insert(key, transform(get(key)))` as a single step on one entry.
    pub fn map<T>(&mut self, key: &K, transform: T)
    where
        T: FnOnce(&V) -> V,
    {
        let p = self.codec().encode(key);
        self.inner.map(&p, transform)
    }
}

impl<K, V, F, C, S> Clone for DefaultObjectMap<K, V, F, C, S>
where
    C: KeyCodec<K> + Clone,
    C::Primitive: Clone,
    F: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V, F, C, S> fmt::Debug for DefaultObjectMap<K, V, F, C, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: KeyCodec<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, F, C, S> Extend<(K, V)> for DefaultObjectMap<K, V, F, C, S>
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

impl<'a, K, V, F, C, S> IntoIterator for &'a DefaultObjectMap<K, V, F, C, S>
where
    C: KeyCodec<K>,
{
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, F, C, S> IntoIterator for DefaultObjectMap<K, V, F, C, S>
where
    C: KeyCodec<K>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        let (map, decoded) = self.inner.into_parts();
        IntoIter::new(map.into_iter(), decoded.codec)
    }
}
