//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::dense_arena_key;
use crate::ir::Inst;

dense_arena_key! {
    /// A reference to a single basic block in a function.
    pub struct Block;
}

/// The contents of one basic block.
///
/// A block is a label and an ordered list of the instructions inside of
/// it. A well-formed block ends with exactly one terminator as its last
/// instruction and contains no terminators anywhere else.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicBlock {
    name: String,
    insts: Vec<Inst>,
}

impl BasicBlock {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            insts: Vec::default(),
        }
    }

    pub(crate) fn append(&mut self, inst: Inst) {
        self.insts.push(inst);
    }

    /// Returns the label of the block, e.g. `entry` or `bb7`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the instructions of the block, in program order.
    pub fn insts(&self) -> &[Inst] {
        &self.insts
    }

    /// Returns the last instruction of the block, if it has any.
    ///
    /// For a well-formed block this is the block's terminator.
    pub fn last_inst(&self) -> Option<Inst> {
        self.insts.last().copied()
    }
}
