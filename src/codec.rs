//! Key codecs: the bijection between structured keys and the primitive keys
//! the backing map actually hashes.
//!
//! A codec must satisfy `decode(&encode(k)) == k` for every key handed to a
//! collection, and must be injective over those keys. Neither property is
//! checked; two keys that encode alike share one entry.

use core::fmt;
use core::hash::Hash;
use core::marker::PhantomData;

/// Encodes structured keys of type `K` into a hashable primitive and back.
pub trait KeyCodec<K> {
    /// The key type the backing map is keyed by.
    type Primitive: Eq + Hash;

    fn encode(&self, key: &K) -> Self::Primitive;

    fn decode(&self, primitive: &Self::Primitive) -> K;
}

/// Codec built from an encode/decode closure pair.
pub struct FnCodec<P, E, D> {
    encode: E,
    decode: D,
    _primitive: PhantomData<fn() -> P>,
}

impl<P, E, D> FnCodec<P, E, D> {
    pub fn new(encode: E, decode: D) -> Self {
        Self {
            encode,
            decode,
            _primitive: PhantomData,
        }
    }
}

impl<P, E: Clone, D: Clone> Clone for FnCodec<P, E, D> {
    fn clone(&self) -> Self {
        Self::new(self.encode.clone(), self.decode.clone())
    }
}

impl<P, E, D> fmt::Debug for FnCodec<P, E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCodec").finish_non_exhaustive()
    }
}

impl<K, P, E, D> KeyCodec<K> for FnCodec<P, E, D>
where
    P: Eq + Hash,
    E: Fn(&K) -> P,
    D: Fn(&P) -> K,
{
    type Primitive = P;

    #[inline]
    fn encode(&self, key: &K) -> P {
        (self.encode)(key)
    }

    #[inline]
    fn decode(&self, primitive: &P) -> K {
        (self.decode)(primitive)
    }
}

#[cfg(feature = "json")]
pub use json::JsonCodec;

#[cfg(feature = "json")]
mod json {
    use super::KeyCodec;
    use core::fmt;
    use core::marker::PhantomData;
    use serde::de::DeserializeOwned;
    use serde::Serialize;

    /// Encodes keys as their compact JSON text.
    ///
    /// Field order follows the `Serialize` impl, so keys of one type encode
    /// deterministically and equal keys share an entry. Keys whose encoding
    /// contains maps with unordered iteration (such as `HashMap`) do not.
    ///
    /// # Panics
    ///
    /// `encode` panics if the key cannot be serialized (e.g. a map with
    /// non-string keys), and `decode` panics if the text does not
    /// deserialize back into `K`. Both are codec precondition violations.
    pub struct JsonCodec<K> {
        _key: PhantomData<fn(&K) -> K>,
    }

    impl<K> JsonCodec<K> {
        pub const fn new() -> Self {
            Self { _key: PhantomData }
        }
    }

    impl<K> Default for JsonCodec<K> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<K> Clone for JsonCodec<K> {
        fn clone(&self) -> Self {
            Self::new()
        }
    }

    impl<K> Copy for JsonCodec<K> {}

    impl<K> fmt::Debug for JsonCodec<K> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("JsonCodec")
        }
    }

    impl<K> KeyCodec<K> for JsonCodec<K>
    where
        K: Serialize + DeserializeOwned,
    {
        type Primitive = String;

        fn encode(&self, key: &K) -> String {
            match serde_json::to_string(key) {
                Ok(text) => text,
                Err(e) => panic!("key is not representable as JSON: {e}"),
            }
        }

        fn decode(&self, primitive: &String) -> K {
            match serde_json::from_str(primitive) {
                Ok(key) => key,
                Err(e) => panic!("encoded key {primitive:?} does not decode: {e}"),
            }
        }
    }
}
