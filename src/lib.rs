//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

#![deny(
    unreachable_pub,
    missing_docs,
    missing_abi,
    rust_2018_idioms,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links
)]

//! # Peridot
//!
//! A small analysis library for an SSA IR. The centerpiece is the
//! reachable-value analysis: for every basic block of a function, the
//! set of values that are guaranteed to have been computed by the time
//! control enters that block, found by propagating definitions down the
//! dominator tree.
//!
//! ```
//! # use peridot::ir::*;
//! let mut module = Module::new("demo");
//!
//! module.declare_global("counter", Type::i64());
//!
//! let sig = SigBuilder::new().param(Type::i32()).build();
//! let func = module.define_fn("demo", sig);
//! let mut b = FunctionBuilder::new(&mut module, func);
//!
//! let x = b.args()[0];
//!
//! b.create_block("entry");
//!
//! let doubled = b.iadd(Type::i32(), x, x);
//!
//! b.ret(None);
//!
//! let registry = peridot::default_registry();
//!
//! peridot::run_reports(&module, &["liveness".to_owned()], &registry);
//! ```

pub mod analysis;
pub mod arena;
pub mod ir;
pub mod pass;
pub mod utility;

use crate::analysis::{
    ControlFlowGraphAnalysis, DominatorTreeAnalysis, DominatorTreeWriterPass,
    ReachableValuesAnalysis, ReachableValuesWriterPass,
};
use crate::pass::{FunctionAnalysisManager, PassRegistry};

/// Builds the registry of report passes every tool gets by default.
///
/// - `liveness` prints the reachable-value report to `stderr`
/// - `domtree` prints the dominator tree to `stdout`
pub fn default_registry() -> PassRegistry {
    let mut registry = PassRegistry::new();

    registry.register("liveness", || Box::new(ReachableValuesWriterPass::stderr()));
    registry.register("domtree", || Box::new(DominatorTreeWriterPass::stdout()));

    registry
}

/// A helper function that handles "run these report passes specified by
/// the user" in a way that multiple tools can use.
///
/// Each named pass is looked up in `registry` and run over every
/// function in the module, with the analyses shared through one lazy
/// manager. An unknown pass name panics.
pub fn run_reports(module: &ir::Module, passes: &[String], registry: &PassRegistry) {
    let mut am = FunctionAnalysisManager::new();

    am.add_pass(ControlFlowGraphAnalysis);
    am.add_pass(DominatorTreeAnalysis);
    am.add_pass(ReachableValuesAnalysis);

    for name in passes {
        let mut pass = registry.create(name);

        for func in module.functions() {
            pass.run(module, func, &am);
        }
    }
}
