//! Collection kind tags for generic code that branches on what a collection is.
//!
//! Every map in this crate reports [`CollectionKind::Map`], the same tag
//! `std`'s maps report, so code written against [`Collection`] treats them
//! exactly like native maps.

use crate::codec::KeyCodec;
use crate::default_map::DefaultPrimitiveMap;
use crate::default_object_map::DefaultObjectMap;
use crate::object_map::ObjectMap;
use crate::ordered_map::OrderedMap;
use core::fmt;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CollectionKind {
    /// Keyed entries.
    Map,
    /// Members without values.
    Set,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CollectionKind::Map => "Map",
            CollectionKind::Set => "Set",
        })
    }
}

/// A collection that can report its kind and size.
pub trait Collection {
    fn kind(&self) -> CollectionKind;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! map_kind {
    ($([$($gen:tt)*] $ty:ty, [$($bound:tt)*];)*) => {$(
        impl<$($gen)*> Collection for $ty where $($bound)* {
            #[inline]
            fn kind(&self) -> CollectionKind {
                CollectionKind::Map
            }

            #[inline]
            fn len(&self) -> usize {
                <$ty>::len(self)
            }
        }
    )*};
}

map_kind! {
    [K, V, S] OrderedMap<K, V, S>, [];
    [K, V, F, S] DefaultPrimitiveMap<K, V, F, S>, [];
    [K, V, C, S] ObjectMap<K, V, C, S>, [C: KeyCodec<K>];
    [K, V, F, C, S] DefaultObjectMap<K, V, F, C, S>, [C: KeyCodec<K>];
    [K, V, S] HashMap<K, V, S>, [];
    [K, V] BTreeMap<K, V>, [];
}

impl<T, S> Collection for HashSet<T, S> {
    fn kind(&self) -> CollectionKind {
        CollectionKind::Set
    }

    fn len(&self) -> usize {
        HashSet::len(self)
    }
}

impl<T> Collection for BTreeSet<T> {
    fn kind(&self) -> CollectionKind {
        CollectionKind::Set
    }

    fn len(&self) -> usize {
        BTreeSet::len(self)
    }
}
