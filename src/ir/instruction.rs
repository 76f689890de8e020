//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ir::{Block, Type, Value};
use crate::utility::PackedOption;

/// A binary arithmetic operation, both operands and the result share `ty`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "enable-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArithInst {
    /// The type of the operands and of the result
    pub ty: Type,
    /// The left-hand operand
    pub lhs: Value,
    /// The right-hand operand
    pub rhs: Value,
}

/// The data making up a single instruction.
///
/// Everything here is plain data, operands are [`Value`] keys and branch
/// targets are [`Block`] keys. Instructions that yield a value have a
/// result registered for them in the data-flow graph, the rest (stores
/// and terminators) do not.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "enable-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstData {
    /// Integer addition
    IAdd(ArithInst),
    /// Integer subtraction
    ISub(ArithInst),
    /// Integer multiplication
    IMul(ArithInst),
    /// An integer constant
    IConst {
        /// The type of the constant
        ty: Type,
        /// The value, zero-extended into a `u64`
        value: u64,
    },
    /// A boolean constant
    BConst {
        /// The value of the constant
        value: bool,
    },
    /// An undefined value of any type, including aggregates
    Undef {
        /// The type of the undefined value
        ty: Type,
    },
    /// Produces a new aggregate with one element replaced
    Insert {
        /// The type of the aggregate
        ty: Type,
        /// The aggregate being updated
        agg: Value,
        /// The element being inserted
        elem: Value,
        /// The index being written to
        index: u32,
    },
    /// Extracts one element out of an aggregate
    Extract {
        /// The type of the extracted element
        ty: Type,
        /// The aggregate being read from
        agg: Value,
        /// The index being read
        index: u32,
    },
    /// Loads a value through a pointer
    Load {
        /// The type of the loaded value
        ty: Type,
        /// The pointer being loaded through
        ptr: Value,
    },
    /// Stores a value through a pointer
    Store {
        /// The value being stored
        value: Value,
        /// The pointer being stored through
        ptr: Value,
    },
    /// An unconditional branch
    Br {
        /// The block being branched to
        target: Block,
    },
    /// A conditional branch
    CondBr {
        /// The `bool` being branched on
        cond: Value,
        /// The `[if_true, if_false]` pair of targets
        targets: [Block; 2],
    },
    /// Returns from the function, with or without a value
    Ret {
        /// The value being returned, if there is one
        value: PackedOption<Value>,
    },
    /// Marks a point in the program that can never be reached
    Unreachable,
}

impl InstData {
    /// Returns the type of the value this instruction yields, or `None`
    /// if the instruction does not yield one.
    pub fn result_ty(&self) -> Option<Type> {
        match self {
            InstData::IAdd(arith) | InstData::ISub(arith) | InstData::IMul(arith) => {
                Some(arith.ty)
            }
            InstData::IConst { ty, .. }
            | InstData::Undef { ty }
            | InstData::Insert { ty, .. }
            | InstData::Extract { ty, .. }
            | InstData::Load { ty, .. } => Some(*ty),
            InstData::BConst { .. } => Some(Type::bool()),
            InstData::Store { .. }
            | InstData::Br { .. }
            | InstData::CondBr { .. }
            | InstData::Ret { .. }
            | InstData::Unreachable => None,
        }
    }

    /// If the instruction is a terminator, returns the blocks it can
    /// transfer control to. Non-terminators return `None`, while `ret`
    /// and `unreachable` return `Some` of an empty slice.
    pub fn targets(&self) -> Option<&[Block]> {
        match self {
            InstData::Br { target } => Some(std::slice::from_ref(target)),
            InstData::CondBr { targets, .. } => Some(targets),
            InstData::Ret { .. } | InstData::Unreachable => Some(&[]),
            _ => None,
        }
    }

    /// Checks whether the instruction ends a basic block.
    pub fn is_terminator(&self) -> bool {
        self.targets().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaKey;
    use static_assertions::const_assert;

    const_assert!(std::mem::size_of::<InstData>() <= 32);

    #[test]
    fn terminators_report_targets() {
        let b0 = Block::new(0);
        let b1 = Block::new(1);

        let br = InstData::Br { target: b0 };
        let cond = InstData::CondBr {
            cond: Value::new(0),
            targets: [b0, b1],
        };
        let ret = InstData::Ret {
            value: PackedOption::none(),
        };

        assert_eq!(br.targets(), Some(&[b0][..]));
        assert_eq!(cond.targets(), Some(&[b0, b1][..]));
        assert_eq!(ret.targets(), Some(&[][..]));
        assert!(br.is_terminator() && cond.is_terminator() && ret.is_terminator());
        assert!(InstData::Unreachable.is_terminator());
    }

    #[test]
    fn non_terminators_have_no_targets() {
        let add = InstData::IAdd(ArithInst {
            ty: Type::i32(),
            lhs: Value::new(0),
            rhs: Value::new(1),
        });

        assert_eq!(add.targets(), None);
        assert!(!add.is_terminator());
    }

    #[test]
    fn result_types() {
        let add = InstData::IAdd(ArithInst {
            ty: Type::i64(),
            lhs: Value::new(0),
            rhs: Value::new(1),
        });
        let store = InstData::Store {
            value: Value::new(0),
            ptr: Value::new(1),
        };

        assert_eq!(add.result_ty(), Some(Type::i64()));
        assert_eq!(InstData::BConst { value: true }.result_ty(), Some(Type::bool()));
        assert_eq!(store.result_ty(), None);
    }
}
