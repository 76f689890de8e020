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
use crate::ir::{BasicBlock, Block, DataFlowGraph, Type, Value};
use crate::utility::PackedOption;
use smallvec::SmallVec;

dense_arena_key! {
    /// A reference to a single function in a module.
    pub struct Func;
}

/// The signature of a function, its parameter types and return type.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signature {
    params: SmallVec<[Type; 4]>,
    ret: Option<Type>,
}

impl Signature {
    /// Returns the parameter types, in declaration order.
    pub fn params(&self) -> &[Type] {
        &self.params
    }

    /// Returns the return type, `None` meaning `void`.
    pub fn return_ty(&self) -> Option<Type> {
        self.ret
    }
}

/// A builder for [`Signature`]s.
///
/// ```
/// # use peridot::ir::*;
/// let sig = SigBuilder::new()
///     .param(Type::i32())
///     .param(Type::ptr())
///     .ret(Some(Type::i32()))
///     .build();
///
/// assert_eq!(sig.params(), &[Type::i32(), Type::ptr()]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SigBuilder {
    sig: Signature,
}

impl SigBuilder {
    /// Creates a builder for a signature with no parameters that
    /// returns `void`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one parameter to the signature.
    pub fn param(mut self, ty: Type) -> Self {
        self.sig.params.push(ty);

        self
    }

    /// Sets the return type of the signature.
    pub fn ret(mut self, ty: Option<Type>) -> Self {
        self.sig.ret = ty;

        self
    }

    /// Finishes building and yields the signature.
    pub fn build(self) -> Signature {
        self.sig
    }
}

/// A single function, its signature, blocks and data-flow graph.
///
/// Blocks are stored in insertion order, with the entry block (when one
/// exists) being the first block created. A function fresh out of
/// [`Module::define_fn`](crate::ir::Module::define_fn) has no blocks at
/// all, those are added through a
/// [`FunctionBuilder`](crate::ir::FunctionBuilder).
#[derive(Clone, Debug)]
pub struct Function {
    func: Func,
    name: String,
    sig: Signature,
    dfg: DataFlowGraph,
    blocks: ArenaMap<Block, BasicBlock>,
    layout: Vec<Block>,
    entry: PackedOption<Block>,
    args: SmallVec<[Value; 4]>,
    globals: SmallVec<[Value; 4]>,
}

impl Function {
    pub(crate) fn new(func: Func, name: String, sig: Signature) -> Self {
        Self {
            func,
            name,
            sig,
            dfg: DataFlowGraph::new(),
            blocks: ArenaMap::default(),
            layout: Vec::default(),
            entry: PackedOption::none(),
            args: SmallVec::default(),
            globals: SmallVec::default(),
        }
    }

    pub(crate) fn dfg_mut(&mut self) -> &mut DataFlowGraph {
        &mut self.dfg
    }

    pub(crate) fn append_block(&mut self, block: BasicBlock) -> Block {
        let key = self.blocks.insert(block);

        if self.entry.is_none() {
            self.entry = key.into();
        }

        self.layout.push(key);

        key
    }

    pub(crate) fn block_mut(&mut self, block: Block) -> &mut BasicBlock {
        &mut self.blocks[block]
    }

    pub(crate) fn push_arg(&mut self, value: Value) {
        self.args.push(value);
    }

    pub(crate) fn push_global(&mut self, value: Value) {
        self.globals.push(value);
    }

    /// Returns the key that refers to this function in its module.
    pub fn func(&self) -> Func {
        self.func
    }

    /// Returns the name of the function.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the signature of the function.
    pub fn signature(&self) -> &Signature {
        &self.sig
    }

    /// Returns the data-flow graph of the function.
    pub fn dfg(&self) -> &DataFlowGraph {
        &self.dfg
    }

    /// Returns the contents of a given block.
    pub fn block(&self, block: Block) -> &BasicBlock {
        &self.blocks[block]
    }

    /// Returns the blocks of the function in insertion order.
    pub fn blocks(&self) -> &[Block] {
        &self.layout
    }

    /// Returns the entry block, if the function has any blocks at all.
    pub fn entry_block(&self) -> Option<Block> {
        self.entry.expand()
    }

    /// Returns the values modeling the function's parameters,
    /// in declaration order.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Returns the values modeling the addresses of the module's
    /// globals, as seen from inside this function.
    pub fn global_values(&self) -> &[Value] {
        &self.globals
    }
}
