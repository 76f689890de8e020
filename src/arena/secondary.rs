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

/// A sparse side-table for keys handed out by some primary
/// [`ArenaMap`](crate::arena::ArenaMap).
///
/// This is how extra data gets associated with entities without bloating
/// the primary arena: the analysis that needs a `Block -> T` mapping keeps
/// one of these and leaves the arena alone. Unlike the primary map, keys
/// can be absent, and entries can be inserted in any order.
pub struct SecondaryMap<K: ArenaKey, V> {
    slots: Vec<Option<V>>,
    len: usize,
    _marker: PhantomData<fn() -> K>,
}

impl<K: ArenaKey, V> SecondaryMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            slots: Vec::default(),
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Checks whether `key` has an associated value in this map.
    pub fn contains(&self, key: K) -> bool {
        self.slots
            .get(key.index())
            .map_or(false, |slot| slot.is_some())
    }

    /// Inserts a value for `key`, returning the previous value if
    /// one was present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = key.index();

        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }

        let old = self.slots[index].replace(value);

        if old.is_none() {
            self.len += 1;
        }

        old
    }

    /// Gets the value associated with `key`, if there is one.
    pub fn get(&self, key: K) -> Option<&V> {
        self.slots.get(key.index()).and_then(|slot| slot.as_ref())
    }

    /// Gets the value associated with `key` mutably, if there is one.
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.slots
            .get_mut(key.index())
            .and_then(|slot| slot.as_mut())
    }

    /// Removes and returns the value associated with `key`, if there is one.
    pub fn take(&mut self, key: K) -> Option<V> {
        let old = self.slots.get_mut(key.index()).and_then(|slot| slot.take());

        if old.is_some() {
            self.len -= 1;
        }

        old
    }

    /// Returns the number of keys that have associated values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether no key has an associated value.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns an iterator over every key with an associated value,
    /// in key order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Returns an iterator over every associated value, in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    /// Returns an iterator over every `(key, value)` pair, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (K::new(i), v)))
    }
}

impl<K: ArenaKey, V> Default for SecondaryMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ArenaKey, V> Index<K> for SecondaryMap<K, V> {
    type Output = V;

    fn index(&self, key: K) -> &Self::Output {
        self.get(key).expect("key has no value in this map")
    }
}

impl<K: ArenaKey, V> IndexMut<K> for SecondaryMap<K, V> {
    fn index_mut(&mut self, key: K) -> &mut Self::Output {
        self.get_mut(key).expect("key has no value in this map")
    }
}

impl<K: ArenaKey, V: Clone> Clone for SecondaryMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            len: self.len,
            _marker: PhantomData,
        }
    }
}

impl<K: ArenaKey, V: PartialEq> PartialEq for SecondaryMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }

        self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: ArenaKey, V: Eq> Eq for SecondaryMap<K, V> {}

impl<K: ArenaKey, V: Debug> Debug for SecondaryMap<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SecondaryMap ")?;

        f.debug_map().entries(self.iter()).finish()
    }
}
