//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::arena::{ArenaMap, SecondaryMap};
use crate::dense_arena_key;
use crate::ir::{Global, InstData, Type};

dense_arena_key! {
    /// A reference to a single instruction in a function.
    pub struct Inst;

    /// A reference to a single SSA value in a function.
    ///
    /// A value is the result of an instruction, a function parameter,
    /// or the address of a module-level global. Which one it is can be
    /// recovered through [`DataFlowGraph::value_def`].
    pub struct Value;
}

/// Records where a [`Value`] comes from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "enable-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueDef {
    /// The value is the result of an instruction
    Inst(Inst),
    /// The value is the function parameter at the given index
    Arg(u32),
    /// The value is the address of a module-level global
    Global(Global),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(serde::Serialize, serde::Deserialize))]
struct ValueData {
    ty: Type,
    def: ValueDef,
}

/// Owns the instructions and values of a single function.
///
/// The layout of blocks and the placement of instructions into blocks
/// live in [`Function`](crate::ir::Function), this graph only knows what
/// each instruction *is* and which value (if any) it defines.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DataFlowGraph {
    insts: ArenaMap<Inst, InstData>,
    results: SecondaryMap<Inst, Value>,
    values: ArenaMap<Value, ValueData>,
}

impl DataFlowGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts an instruction into the graph and creates its result
    /// value when the instruction yields one.
    pub(crate) fn insert_inst(&mut self, data: InstData) -> Inst {
        let result_ty = data.result_ty();
        let inst = self.insts.insert(data);

        if let Some(ty) = result_ty {
            let value = self.values.insert(ValueData {
                ty,
                def: ValueDef::Inst(inst),
            });

            self.results.insert(inst, value);
        }

        inst
    }

    pub(crate) fn insert_arg(&mut self, ty: Type, index: u32) -> Value {
        self.values.insert(ValueData {
            ty,
            def: ValueDef::Arg(index),
        })
    }

    pub(crate) fn insert_global(&mut self, global: Global) -> Value {
        self.values.insert(ValueData {
            ty: Type::ptr(),
            def: ValueDef::Global(global),
        })
    }

    /// Returns the data of a given instruction.
    pub fn inst_data(&self, inst: Inst) -> &InstData {
        &self.insts[inst]
    }

    /// Returns the result of an instruction, if the instruction
    /// defines one.
    pub fn inst_to_result(&self, inst: Inst) -> Option<Value> {
        self.results.get(inst).copied()
    }

    /// Returns the type of a given value.
    pub fn ty(&self, value: Value) -> Type {
        self.values[value].ty
    }

    /// Returns where a given value was defined.
    pub fn value_def(&self, value: Value) -> ValueDef {
        self.values[value].def
    }

    /// Returns the number of values the function defines.
    pub fn num_values(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ArithInst;

    #[test]
    fn results_only_for_value_producers() {
        let mut dfg = DataFlowGraph::new();

        let lhs = dfg.insert_arg(Type::i32(), 0);
        let rhs = dfg.insert_arg(Type::i32(), 1);
        let add = dfg.insert_inst(InstData::IAdd(ArithInst {
            ty: Type::i32(),
            lhs,
            rhs,
        }));
        let ret = dfg.insert_inst(InstData::Ret {
            value: dfg.inst_to_result(add).into(),
        });

        assert!(dfg.inst_to_result(add).is_some());
        assert!(dfg.inst_to_result(ret).is_none());
    }

    #[test]
    fn value_defs_are_tracked() {
        let mut dfg = DataFlowGraph::new();

        let arg = dfg.insert_arg(Type::ptr(), 0);
        let load = dfg.insert_inst(InstData::Load {
            ty: Type::i64(),
            ptr: arg,
        });
        let result = dfg.inst_to_result(load).unwrap();

        assert_eq!(dfg.value_def(arg), ValueDef::Arg(0));
        assert_eq!(dfg.value_def(result), ValueDef::Inst(load));
        assert_eq!(dfg.ty(result), Type::i64());
    }
}
