//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use std::fmt::Debug;

/// Models a type that can act as a key for the arena map types.
///
/// Keys are just indices with a type wrapped around them, the type exists
/// to prevent keys handed out by one arena being used on a different arena
/// that happens to hold the same element type.
///
/// This should not usually be implemented directly, prefer the
/// [`dense_arena_key`](crate::dense_arena_key) macro that provides the
/// implementation for you.
pub trait ArenaKey: Copy + Eq + Debug {
    /// Creates a new key that refers to the slot at `index`.
    ///
    /// Panics if `index` is not representable in the key's storage type.
    fn new(index: usize) -> Self;

    /// Converts the key back into the index it refers to.
    fn index(self) -> usize;
}

/// Creates a type-safe key for an [`ArenaMap`](crate::arena::ArenaMap) and
/// the associated secondary structures.
///
/// The generated key stores a `u32` internally, with the maximum value of
/// `u32` reserved so that the key also implements
/// [`Packable`](crate::utility::Packable) and can be put inside a
/// [`PackedOption`](crate::utility::PackedOption) at no extra cost.
///
/// ```
/// # use peridot::dense_arena_key;
/// # use peridot::arena::ArenaMap;
/// dense_arena_key! {
///     /// Doc comments work here.
///     pub struct Entity;
/// }
///
/// type EntityMap<V> = ArenaMap<Entity, V>;
/// ```
#[macro_export(local_inner_macros)]
macro_rules! dense_arena_key {
    ( $(#[$outer:meta])* $vis:vis struct $name:ident; $($rest:tt)* ) => {
        $(#[$outer])*
        #[repr(transparent)]
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "enable-serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(u32);

        impl $crate::arena::ArenaKey for $name {
            #[inline]
            fn new(index: usize) -> Self {
                use std::convert::TryInto;

                let raw: u32 = index
                    .try_into()
                    .expect("index is not representable with key type");

                // the maximum value is the `Packable` sentinel
                std::debug_assert!(raw != u32::MAX);

                Self(raw)
            }

            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl $crate::utility::Packable for $name {
            #[inline]
            fn reserved() -> Self {
                Self(u32::MAX)
            }

            #[inline]
            fn is_reserved(&self) -> bool {
                self.0 == u32::MAX
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
                std::write!(f, "{}({})", std::stringify!($name), self.0)
            }
        }

        dense_arena_key!($($rest)*);
    };

    () => {}
}

#[cfg(test)]
mod tests {
    use crate::arena::*;
    use crate::dense_arena_key;
    use crate::utility::Packable;
    use static_assertions::assert_eq_size;

    #[test]
    fn dense_arena_key_is_u32() {
        dense_arena_key! { struct Key; }

        assert_eq_size!(Key, u32);
    }

    #[test]
    fn reserved_key_works() {
        dense_arena_key! { struct K; }

        let mut map = ArenaMap::<K, i32>::default();

        let k1 = map.insert(15);
        let k2 = map.insert(32);
        let k3 = K::reserved();

        assert!(k3.is_reserved());
        assert!(!k2.is_reserved());
        assert!(!k1.is_reserved());
    }

    #[test]
    fn can_use_dense_arena_key_in_map() {
        dense_arena_key! { struct Key; }

        let mut map = ArenaMap::new();
        let k1: Key = map.insert(1);
        let k2: Key = map.insert(2);
        let k3: Key = map.insert(3);

        assert_eq!(map[k1], 1);
        assert_eq!(map[k2], 2);
        assert_eq!(map[k3], 3);
    }
}
