//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The in-memory IR that analyses operate over.
//!
//! A [`Module`] owns globals and functions, a [`Function`] owns basic
//! blocks and a [`DataFlowGraph`] of instructions and values. All of it
//! is arena-keyed: blocks, instructions, values, globals and functions
//! are small `Copy` keys resolved against their owner.
//!
//! Functions are built with [`FunctionBuilder`], which also takes care
//! of importing parameters and module globals as values.

mod block;
mod builders;
mod data_flow;
mod function;
mod instruction;
mod module;
mod types;

pub use block::*;
pub use builders::*;
pub use data_flow::*;
pub use function::*;
pub use instruction::*;
pub use module::*;
pub use types::*;
