//! keyed-collections: insertion-ordered maps that accept structured keys
//! through a key codec and can lazily materialize defaults for unset keys.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: let values that are awkward or impossible to hash directly act as
//!   map keys, and let reads of unset keys produce a cached default, while
//!   every collection still behaves like an ordinary insertion-ordered map.
//! - Layers:
//!   - OrderedMap<K, V, S>: structural map. Entries live in a `SlotMap`,
//!     linked in insertion order, indexed by a `hashbrown::HashTable`.
//!   - DefaultPrimitiveMap<K, V, F, S>: wraps OrderedMap; `get` on an unset
//!     key runs the factory, stores the result and returns it.
//!   - ObjectMap<K, V, C, S>: wraps OrderedMap<C::Primitive, V, S>; every key
//!     goes through `C::encode` on the way in and `C::decode` on the way out.
//!   - DefaultObjectMap<K, V, F, C, S>: DefaultPrimitiveMap keyed by
//!     `C::Primitive` whose factory decodes the primitive before calling the
//!     user factory.
//!   - DefaultMap<K, V>: trait over both default maps (`get`, `get_mut`,
//!     `map`, `peek`), with `Collection` as supertrait.
//!
//! Constraints
//! - Single-threaded, synchronous; all mutation goes through `&mut self`.
//! - Iteration order is first-insertion order for every view. Updating an
//!   existing key keeps its place; remove + insert moves it to the end.
//! - O(1) average lookup, insert and remove; removal never shifts entries.
//! - Presence is the map's business, never the value's: `0`, `""`, `false`
//!   and `None` are ordinary stored values.
//!
//! Codec contract
//! - `decode(&encode(k)) == k` for every key used, and `encode` injective
//!   over those keys. Not checked: colliding encodings share one entry and
//!   a non-inverse decode hands back different keys from iteration.
//! - Codec and factory panics propagate to the caller untouched.
//!
//! Sentinel caveat
//! - A factory may declare an absence sentinel (`with_sentinel`,
//!   `DefaultPrimitiveMap::optional`). A stored value equal to the sentinel
//!   is treated as never computed, so a factory that returns the sentinel
//!   runs again on every `get`. Without a sentinel, a computed value is
//!   always cached.
//!
//! Hasher and rehashing invariants
//! - Each entry stores a precomputed `u64` hash and indexing always uses the
//!   stored hash; `K: Hash` is never invoked after insertion.
//!
//! Notes and non-goals
//! - No persistence or serialization of the collections themselves;
//!   `JsonCodec` (feature `json`) only uses JSON text as a primitive key.
//! - Keys are immutable post-insert; there is no `key_mut`.

mod codec;
mod default;
mod default_map;
mod default_object_map;
mod factory;
mod kind;
mod object_map;
pub mod ordered_map;
mod ordered_map_proptest;

// Public surface
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use codec::{FnCodec, KeyCodec};
pub use default::DefaultMap;
pub use default_map::DefaultPrimitiveMap;
pub use default_object_map::{Decoded, DefaultObjectMap};
pub use factory::{DefaultFactory, WithSentinel};
pub use kind::{Collection, CollectionKind};
pub use object_map::{IntoIter as ObjectIntoIter, Iter as ObjectIter, Keys as ObjectKeys, ObjectMap};
pub use ordered_map::{InsertError, OrderedMap};
