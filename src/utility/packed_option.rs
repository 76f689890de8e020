//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use std::fmt;
use std::fmt::{Debug, Formatter};

/// Helper trait for a type that can be packed into a [`PackedOption`].
///
/// These types need some value they never take on in normal use, that
/// value is reserved to distinguish between `None` and `Some`. Every key
/// generated by [`dense_arena_key`](crate::dense_arena_key) reserves the
/// maximum `u32` and implements this automatically.
pub trait Packable: Copy {
    /// Returns the reserved (null-like) value of the type.
    fn reserved() -> Self;

    /// Checks whether `self` is the reserved value.
    fn is_reserved(&self) -> bool;
}

/// An [`Option`]-like type for arena keys that doesn't pay for a
/// separate flag: the key's reserved value *is* the `None` state.
///
/// ```
/// # use peridot::dense_arena_key;
/// # use peridot::utility::PackedOption;
/// dense_arena_key! { struct Key; }
///
/// let none = PackedOption::<Key>::none();
///
/// assert!(none.is_none());
/// assert_eq!(none.expand(), None);
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "enable-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackedOption<T: Packable>(T);

impl<T: Packable> PackedOption<T> {
    /// Creates a `None` instance of `PackedOption`.
    #[inline]
    pub fn none() -> Self {
        Self(T::reserved())
    }

    /// Creates a `Some` instance of `PackedOption`.
    ///
    /// Panics in debug mode if `value` is the reserved value.
    #[inline]
    pub fn some(value: T) -> Self {
        debug_assert!(!value.is_reserved());

        Self(value)
    }

    /// Returns `true` if the packed option is a `None` value.
    #[inline]
    pub fn is_none(&self) -> bool {
        self.0.is_reserved()
    }

    /// Returns `true` if the packed option is a `Some` value.
    #[inline]
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Expands the packed option into a normal [`Option`] that can
    /// be pattern-matched on as expected.
    #[inline]
    pub fn expand(self) -> Option<T> {
        if self.is_none() {
            None
        } else {
            Some(self.0)
        }
    }

    /// Unwraps the contained value, panicking if the option is `None`.
    #[inline]
    pub fn unwrap(self) -> T {
        self.expand().expect("unwrapped a `none` PackedOption")
    }
}

impl<T: Packable> From<Option<T>> for PackedOption<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => Self::some(inner),
            None => Self::none(),
        }
    }
}

impl<T: Packable> From<T> for PackedOption<T> {
    fn from(value: T) -> Self {
        Self::some(value)
    }
}

impl<T: Packable> Default for PackedOption<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T: Packable + Debug> Debug for PackedOption<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.expand() {
            Some(inner) => write!(f, "Some({inner:?})"),
            None => write!(f, "None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense_arena_key;
    use crate::arena::ArenaKey;
    use static_assertions::assert_eq_size;

    dense_arena_key! { struct Key; }

    #[test]
    fn packed_option_is_key_sized() {
        assert_eq_size!(PackedOption<Key>, Key);
    }

    #[test]
    fn round_trips_through_option() {
        let key = Key::new(42);
        let packed = PackedOption::from(Some(key));

        assert!(packed.is_some());
        assert_eq!(packed.expand(), Some(key));
        assert_eq!(PackedOption::<Key>::from(None).expand(), None);
    }
}
