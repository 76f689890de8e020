//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::arena::ArenaKey;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// An insert-only arena that hands out typed keys.
///
/// Values are stored contiguously, a key is just the index of the value
/// it was returned for. There is no deletion, so keys stay valid for the
/// life of the map and lookups are a single bounds-checked index.
///
/// ```
/// # use peridot::dense_arena_key;
/// # use peridot::arena::ArenaMap;
/// dense_arena_key! { struct Name; }
///
/// let mut map: ArenaMap<Name, &str> = ArenaMap::new();
/// let a = map.insert("a");
/// let b = map.insert("b");
///
/// assert_eq!(map[a], "a");
/// assert_eq!(map[b], "b");
/// ```
pub struct ArenaMap<K: ArenaKey, V> {
    values: Vec<V>,
    _marker: PhantomData<fn() -> K>,
}

impl<K: ArenaKey, V> ArenaMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            values: Vec::default(),
            _marker: PhantomData,
        }
    }

    /// Creates an empty map with space reserved for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            _marker: PhantomData,
        }
    }

    /// Inserts a value and returns the key that now refers to it.
    pub fn insert(&mut self, value: V) -> K {
        let key = K::new(self.values.len());

        self.values.push(value);

        key
    }

    /// Returns the key that the *next* call to [`Self::insert`] will return.
    pub fn next_key(&self) -> K {
        K::new(self.values.len())
    }

    /// Checks whether `key` refers to a value in this map.
    pub fn contains(&self, key: K) -> bool {
        key.index() < self.values.len()
    }

    /// Gets the value that `key` refers to, if it is in bounds.
    pub fn get(&self, key: K) -> Option<&V> {
        self.values.get(key.index())
    }

    /// Gets the value that `key` refers to mutably, if it is in bounds.
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.values.get_mut(key.index())
    }

    /// Returns the number of values in the map.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks whether the map has no values in it.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over every key in the map, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = K> + DoubleEndedIterator + ExactSizeIterator {
        (0..self.values.len()).map(K::new)
    }

    /// Returns an iterator over every value in the map, in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> + DoubleEndedIterator + ExactSizeIterator {
        self.values.iter()
    }

    /// Returns an iterator over every `(key, value)` pair in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + DoubleEndedIterator + ExactSizeIterator {
        self.values.iter().enumerate().map(|(i, v)| (K::new(i), v))
    }
}

impl<K: ArenaKey, V> Default for ArenaMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ArenaKey, V> Index<K> for ArenaMap<K, V> {
    type Output = V;

    fn index(&self, key: K) -> &Self::Output {
        &self.values[key.index()]
    }
}

impl<K: ArenaKey, V> IndexMut<K> for ArenaMap<K, V> {
    fn index_mut(&mut self, key: K) -> &mut Self::Output {
        &mut self.values[key.index()]
    }
}

impl<K: ArenaKey, V: Clone> Clone for ArenaMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            _marker: PhantomData,
        }
    }
}

impl<K: ArenaKey, V: PartialEq> PartialEq for ArenaMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<K: ArenaKey, V: Eq> Eq for ArenaMap<K, V> {}

impl<K: ArenaKey, V: Debug> Debug for ArenaMap<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ArenaMap ")?;

        f.debug_map().entries(self.iter()).finish()
    }
}
