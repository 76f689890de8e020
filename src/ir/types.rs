//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::arena::ArenaMap;
use crate::dense_arena_key;
use ahash::AHashMap;
use smallvec::SmallVec;

dense_arena_key! {
    /// References the data of one compound (aggregate) type inside of
    /// a [`TypePool`].
    ///
    /// Compound types are interned, two structurally identical aggregates
    /// created through the same pool get the same key. This is what makes
    /// [`Type`] a tiny `Copy` value even when it names an aggregate.
    pub struct CompoundTy;
}

#[derive(Clone, Hash, Eq, PartialEq)]
enum CompoundTypeData {
    Array(Type, u32),
    Struct(SmallVec<[Type; 2]>),
}

/// Owns the data for all of the compound types in a module.
///
/// Scalar types carry their entire representation inline in [`Type`],
/// but arrays and structures need somewhere to put their element types.
/// That data lives here, deduplicated on creation so that key equality
/// is structural equality.
#[derive(Clone, Default)]
pub struct TypePool {
    data: ArenaMap<CompoundTy, CompoundTypeData>,
    dedup: AHashMap<CompoundTypeData, CompoundTy>,
}

impl TypePool {
    /// Creates an empty pool that is ready for use in a module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates (or re-uses) the array type `[element; length]`.
    pub fn array(&mut self, element: Type, length: u32) -> Type {
        Type::Array(self.intern(CompoundTypeData::Array(element, length)))
    }

    /// Creates (or re-uses) the structure type `{ members... }`.
    pub fn struct_of(&mut self, members: &[Type]) -> Type {
        Type::Struct(self.intern(CompoundTypeData::Struct(SmallVec::from_slice(members))))
    }

    /// Resolves an array key into its `(element, length)` pair.
    pub fn array_of(&self, key: CompoundTy) -> (Type, u32) {
        match &self.data[key] {
            CompoundTypeData::Array(element, length) => (*element, *length),
            _ => panic!("compound key did not refer to an array type"),
        }
    }

    /// Resolves a structure key into its member list.
    pub fn members_of(&self, key: CompoundTy) -> &[Type] {
        match &self.data[key] {
            CompoundTypeData::Struct(members) => members,
            _ => panic!("compound key did not refer to a struct type"),
        }
    }

    fn intern(&mut self, ty: CompoundTypeData) -> CompoundTy {
        match self.dedup.get(&ty) {
            Some(key) => *key,
            None => {
                let key = self.data.insert(ty.clone());

                self.dedup.insert(ty, key);

                key
            }
        }
    }
}

/// The format of a floating-point type.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloatFormat {
    /// An IEEE-754 `binary32`, i.e. `f32`
    Single,
    /// An IEEE-754 `binary64`, i.e. `f64`
    Double,
}

/// The type of a single value in the IR.
///
/// Types come in two classes. The *first-class* types (`bool`, integers,
/// floats and `ptr`) are directly usable as instruction operands; the
/// aggregate types (arrays and structures) are not, they only exist to be
/// picked apart with `extract` or built up with `insert`. The reachable
/// value analysis only ever puts first-class values into its sets.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    /// The `bool` type, produced by comparisons and branch conditions
    Bool,
    /// An integer of the given bit-width, one of `i8`/`i16`/`i32`/`i64`
    Int(u32),
    /// A floating-point type of the given format
    Float(FloatFormat),
    /// An untyped pointer
    Ptr,
    /// An array type, the element/length data lives in the [`TypePool`]
    Array(CompoundTy),
    /// A structure type, the member data lives in the [`TypePool`]
    Struct(CompoundTy),
}

impl Type {
    /// Shorthand for [`Type::Bool`].
    pub fn bool() -> Self {
        Type::Bool
    }

    /// Shorthand for [`Type::Ptr`].
    pub fn ptr() -> Self {
        Type::Ptr
    }

    /// Creates an integer type of a given bit-width.
    ///
    /// Panics if `width` is not one of 8, 16, 32 or 64.
    pub fn int(width: u32) -> Self {
        assert!(
            matches!(width, 8 | 16 | 32 | 64),
            "invalid integer bit-width"
        );

        Type::Int(width)
    }

    /// Shorthand for [`Type::int`] with a width of 8.
    pub fn i8() -> Self {
        Type::Int(8)
    }

    /// Shorthand for [`Type::int`] with a width of 16.
    pub fn i16() -> Self {
        Type::Int(16)
    }

    /// Shorthand for [`Type::int`] with a width of 32.
    pub fn i32() -> Self {
        Type::Int(32)
    }

    /// Shorthand for [`Type::int`] with a width of 64.
    pub fn i64() -> Self {
        Type::Int(64)
    }

    /// Shorthand for an `f32` type.
    pub fn f32() -> Self {
        Type::Float(FloatFormat::Single)
    }

    /// Shorthand for an `f64` type.
    pub fn f64() -> Self {
        Type::Float(FloatFormat::Double)
    }

    /// Checks if the type is `bool`.
    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    /// Checks if the type is an integer of any width.
    pub fn is_int(&self) -> bool {
        matches!(self, Type::Int(_))
    }

    /// Checks if the type is a float of any format.
    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float(_))
    }

    /// Checks if the type is `ptr`.
    pub fn is_ptr(&self) -> bool {
        matches!(self, Type::Ptr)
    }

    /// Checks if the type is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    /// Checks if the type is a structure.
    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct(_))
    }

    /// Checks if the type is first-class, i.e. whether a value of this
    /// type can be used directly as an operand.
    ///
    /// Scalars and pointers are first-class, aggregates are not.
    pub fn is_first_class(&self) -> bool {
        !matches!(self, Type::Array(_) | Type::Struct(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_eq_size;

    #[test]
    fn type_is_small() {
        assert_eq_size!(Type, u64);
    }

    #[test]
    fn scalars_are_first_class() {
        assert!(Type::bool().is_first_class());
        assert!(Type::i32().is_first_class());
        assert!(Type::f64().is_first_class());
        assert!(Type::ptr().is_first_class());
    }

    #[test]
    fn aggregates_are_not_first_class() {
        let mut pool = TypePool::new();

        let arr = pool.array(Type::i32(), 16);
        let st = pool.struct_of(&[Type::i64(), Type::ptr()]);

        assert!(!arr.is_first_class());
        assert!(!st.is_first_class());
    }

    #[test]
    fn compound_types_are_interned() {
        let mut pool = TypePool::new();

        let a = pool.array(Type::i8(), 4);
        let b = pool.array(Type::i8(), 4);
        let c = pool.array(Type::i8(), 8);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
