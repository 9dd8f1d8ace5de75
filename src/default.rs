//! DefaultMap: the surface shared by maps whose reads never report absence.

use crate::codec::KeyCodec;
use crate::default_map::DefaultPrimitiveMap;
use crate::default_object_map::DefaultObjectMap;
use crate::factory::DefaultFactory;
use crate::kind::Collection;
use core::hash::{BuildHasher, Hash};

/// A map whose `get` always yields a value, materializing and caching a
/// default for keys never set.
///
/// Implemented by [`DefaultPrimitiveMap`] and [`DefaultObjectMap`], so code
/// can be written once over either.
///
/// ```
/// use keyed_collections::{DefaultMap, DefaultPrimitiveMap};
///
/// fn tally<K, M: DefaultMap<K, u32>>(m: &mut M, keys: &[K]) {
///     for k in keys {
///         m.map(k, |n| n + 1);
///     }
/// }
///
/// let mut words = DefaultPrimitiveMap::new(|_: &&str| 0u32);
/// tally(&mut words, &["a", "b", "a"]);
/// assert_eq!(*words.get(&"a"), 2);
/// ```
pub trait DefaultMap<K, V>: Collection {
    /// The stored value, computing and caching the default first if `key` is
    /// unset.
    fn get(&mut self, key: &K) -> &V;

    fn get_mut(&mut self, key: &K) -> &mut V;

    /// Replaces the value under `key` with `transform` of its current value,
    /// starting from the default when unset.
    fn map<T>(&mut self, key: &K, transform: T)
    where
        T: FnOnce(&V) -> V;

    /// Reads without materializing anything.
    fn peek(&self, key: &K) -> Option<&V>;
}

impl<K, V, F, S> DefaultMap<K, V> for DefaultPrimitiveMap<K, V, F, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
    F: DefaultFactory<K, V>,
{
    #[inline]
    fn get(&mut self, key: &K) -> &V {
        DefaultPrimitiveMap::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: &K) -> &mut V {
        DefaultPrimitiveMap::get_mut(self, key)
    }

    #[inline]
    fn map<T>(&mut self, key: &K, transform: T)
    where
        T: FnOnce(&V) -> V,
    {
        DefaultPrimitiveMap::map(self, key, transform)
    }

    #[inline]
    fn peek(&self, key: &K) -> Option<&V> {
        DefaultPrimitiveMap::peek(self, key)
    }
}

impl<K, V, F, C, S> DefaultMap<K, V> for DefaultObjectMap<K, V, F, C, S>
where
    C: KeyCodec<K>,
    C::Primitive: Clone,
    S: BuildHasher,
    F: DefaultFactory<K, V>,
{
    #[inline]
    fn get(&mut self, key: &K) -> &V {
        DefaultObjectMap::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: &K) -> &mut V {
        DefaultObjectMap::get_mut(self, key)
    }

    #[inline]
    fn map<T>(&mut self, key: &K, transform: T)
    where
        T: FnOnce(&V) -> V,
    {
        DefaultObjectMap::map(self, key, transform)
    }

    #[inline]
    fn peek(&self, key: &K) -> Option<&V> {
        DefaultObjectMap::peek(self, key)
    }
}
