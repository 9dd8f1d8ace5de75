//! Default factories for the lazily materializing maps.
//!
//! Any `FnMut(&K) -> V` closure is a factory. `WithSentinel` pairs a factory
//! with a predicate naming values that count as "not computed": a key whose
//! stored value matches is recomputed on every read instead of being served
//! from the cache.

/// Computes the value a default map stores for a key read before it was set.
pub trait DefaultFactory<K: ?Sized, V> {
    /// Produces the default for `key`.
    fn make_default(&mut self, key: &K) -> V;

    /// Whether `value` stands for "no value computed". Values for which this
    /// returns `true` are never served from the cache by `get`.
    #[inline]
    fn is_sentinel(&self, _value: &V) -> bool {
        false
    }
}

impl<K, V, F> DefaultFactory<K, V> for F
where
    K: ?Sized,
    F: FnMut(&K) -> V,
{
    #[inline]
    fn make_default(&mut self, key: &K) -> V {
        self(key)
    }
}

/// A factory together with its absence sentinel.
///
/// Caveat: a factory that returns the sentinel is invoked again on every
/// read of that key, since its result cannot be told apart from a value that
/// was never computed.
#[derive(Clone, Debug)]
pub struct WithSentinel<F, P> {
    factory: F,
    is_sentinel: P,
}

impl<F, P> WithSentinel<F, P> {
    pub fn new(factory: F, is_sentinel: P) -> Self {
        Self {
            factory,
            is_sentinel,
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<K, V, F, P> DefaultFactory<K, V> for WithSentinel<F, P>
where
    K: ?Sized,
    F: FnMut(&K) -> V,
    P: Fn(&V) -> bool,
{
    #[inline]
    fn make_default(&mut self, key: &K) -> V {
        (self.factory)(key)
    }

    #[inline]
    fn is_sentinel(&self, value: &V) -> bool {
        (self.is_sentinel)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_never_report_sentinels() {
        let mut f = |k: &str| k.len();
        assert_eq!(DefaultFactory::<str, usize>::make_default(&mut f, "abcd"), 4);
        assert!(!DefaultFactory::<str, usize>::is_sentinel(&f, &0));
    }

    #[test]
    fn sentinel_predicate_is_consulted() {
        let mut f = WithSentinel::new(|_: &u8| None::<u8>, |v: &Option<u8>| v.is_none());
        assert_eq!(DefaultFactory::<u8, Option<u8>>::make_default(&mut f, &1), None);
        assert!(DefaultFactory::<u8, Option<u8>>::is_sentinel(&f, &None));
        assert!(!DefaultFactory::<u8, Option<u8>>::is_sentinel(&f, &Some(0)));
    }
}
