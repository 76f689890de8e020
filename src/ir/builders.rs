//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ir::{
    ArithInst, BasicBlock, Block, Func, Inst, InstData, Module, Type, Value,
};
use crate::utility::PackedOption;

/// Fills in the body of a function that was defined through
/// [`Module::define_fn`].
///
/// Creating the builder imports the function's parameters and the
/// module's globals as values, after that blocks are created and
/// instructions appended one at a time. Instructions go into the
/// current block, which is the most recently created one unless
/// [`switch_to`](FunctionBuilder::switch_to) was called.
///
/// ```
/// # use peridot::ir::*;
/// let mut module = Module::new("example");
/// let sig = SigBuilder::new().param(Type::i32()).ret(Some(Type::i32())).build();
/// let func = module.define_fn("double", sig);
/// let mut b = FunctionBuilder::new(&mut module, func);
///
/// let x = b.args()[0];
///
/// b.create_block("entry");
///
/// let doubled = b.iadd(Type::i32(), x, x);
///
/// b.ret(Some(doubled));
/// ```
pub struct FunctionBuilder<'m> {
    module: &'m mut Module,
    func: Func,
    current: Option<Block>,
}

impl<'m> FunctionBuilder<'m> {
    /// Creates a builder for `func`, importing its parameters and every
    /// global currently declared in `module`.
    ///
    /// Globals with aggregate storage are not imported, only globals
    /// whose storage is first-class participate in a function.
    pub fn new(module: &'m mut Module, func: Func) -> Self {
        let globals: Vec<_> = module
            .globals()
            .filter(|&global| module.global(global).ty().is_first_class())
            .collect();
        let f = module.function_mut(func);
        let params: Vec<Type> = f.signature().params().to_vec();

        for (i, ty) in params.into_iter().enumerate() {
            let value = f.dfg_mut().insert_arg(ty, i as u32);

            f.push_arg(value);
        }

        for global in globals {
            let value = f.dfg_mut().insert_global(global);

            f.push_global(value);
        }

        Self {
            module,
            func,
            current: None,
        }
    }

    /// Returns the values of the function's parameters.
    pub fn args(&self) -> &[Value] {
        self.module.function(self.func).args()
    }

    /// Returns the values of the globals visible to the function.
    pub fn globals(&self) -> &[Value] {
        self.module.function(self.func).global_values()
    }

    /// Creates a new block and makes it the current block. The first
    /// block created becomes the function's entry block.
    pub fn create_block(&mut self, name: &str) -> Block {
        let block = self
            .module
            .function_mut(self.func)
            .append_block(BasicBlock::new(name.to_owned()));

        self.current = Some(block);

        block
    }

    /// Makes `block` the current block, so that subsequent
    /// instructions are appended to it.
    pub fn switch_to(&mut self, block: Block) {
        self.current = Some(block);
    }

    /// Appends an `iadd` to the current block.
    pub fn iadd(&mut self, ty: Type, lhs: Value, rhs: Value) -> Value {
        self.append_with_result(InstData::IAdd(ArithInst { ty, lhs, rhs }))
    }

    /// Appends an `isub` to the current block.
    pub fn isub(&mut self, ty: Type, lhs: Value, rhs: Value) -> Value {
        self.append_with_result(InstData::ISub(ArithInst { ty, lhs, rhs }))
    }

    /// Appends an `imul` to the current block.
    pub fn imul(&mut self, ty: Type, lhs: Value, rhs: Value) -> Value {
        self.append_with_result(InstData::IMul(ArithInst { ty, lhs, rhs }))
    }

    /// Appends an `iconst` to the current block.
    pub fn iconst(&mut self, ty: Type, value: u64) -> Value {
        self.append_with_result(InstData::IConst { ty, value })
    }

    /// Appends a `bconst` to the current block.
    pub fn bconst(&mut self, value: bool) -> Value {
        self.append_with_result(InstData::BConst { value })
    }

    /// Appends an `undef` of any type to the current block.
    pub fn undef(&mut self, ty: Type) -> Value {
        self.append_with_result(InstData::Undef { ty })
    }

    /// Appends an `insert` to the current block, yielding a new
    /// aggregate with `elem` at `index`.
    pub fn insert_value(&mut self, ty: Type, agg: Value, elem: Value, index: u32) -> Value {
        self.append_with_result(InstData::Insert {
            ty,
            agg,
            elem,
            index,
        })
    }

    /// Appends an `extract` to the current block, reading the element
    /// of `agg` at `index`.
    pub fn extract_value(&mut self, ty: Type, agg: Value, index: u32) -> Value {
        self.append_with_result(InstData::Extract { ty, agg, index })
    }

    /// Appends a `load` to the current block.
    pub fn load(&mut self, ty: Type, ptr: Value) -> Value {
        self.append_with_result(InstData::Load { ty, ptr })
    }

    /// Appends a `store` to the current block.
    pub fn store(&mut self, value: Value, ptr: Value) -> Inst {
        self.append(InstData::Store { value, ptr })
    }

    /// Appends an unconditional branch to the current block.
    pub fn br(&mut self, target: Block) -> Inst {
        self.append(InstData::Br { target })
    }

    /// Appends a conditional branch to the current block.
    pub fn condbr(&mut self, cond: Value, if_true: Block, if_false: Block) -> Inst {
        self.append(InstData::CondBr {
            cond,
            targets: [if_true, if_false],
        })
    }

    /// Appends a `ret` to the current block.
    pub fn ret(&mut self, value: Option<Value>) -> Inst {
        self.append(InstData::Ret {
            value: PackedOption::from(value),
        })
    }

    /// Appends an `unreachable` to the current block.
    pub fn unreachable(&mut self) -> Inst {
        self.append(InstData::Unreachable)
    }

    fn append(&mut self, data: InstData) -> Inst {
        let block = self
            .current
            .expect("cannot append an instruction before creating a block");
        let f = self.module.function_mut(self.func);

        debug_assert!(
            f.block(block)
                .last_inst()
                .map_or(true, |last| !f.dfg().inst_data(last).is_terminator()),
            "cannot append past a block's terminator"
        );

        let inst = f.dfg_mut().insert_inst(data);

        f.block_mut(block).append(inst);

        inst
    }

    fn append_with_result(&mut self, data: InstData) -> Value {
        let inst = self.append(data);

        self.module
            .function(self.func)
            .dfg()
            .inst_to_result(inst)
            .expect("instruction should have yielded a result")
    }
}
