//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::analysis::{self, DominatorTreeAnalysis, ReachableValuesAnalysis};
use crate::ir::{Block, Func, Module};
use crate::pass::{FunctionAnalysisManager, FunctionReportPass};
use crate::utility;
use std::io;
use std::io::Write;

/// Wrapper pass that prints out the [`ReachableValues`] report of
/// every function it is run over.
///
/// [`ReachableValues`]: crate::analysis::ReachableValues
pub struct ReachableValuesWriterPass {
    out: Box<dyn io::Write>,
}

impl ReachableValuesWriterPass {
    /// Shorthand for a writer that prints to [`std::io::stdout`].
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Shorthand for a writer that prints to [`std::io::stderr`].
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }

    /// Creates an instance of the pass with a given writer.
    ///
    /// This writer will be where the report is printed out when the
    /// pass is run over the IR.
    pub fn with_writer<T: io::Write + 'static>(writer: T) -> Self {
        Self {
            out: Box::new(writer),
        }
    }
}

impl FunctionReportPass for ReachableValuesWriterPass {
    fn run(&mut self, module: &Module, func: Func, am: &FunctionAnalysisManager) {
        let func = module.function(func);
        let riv = am.get::<ReachableValuesAnalysis>(func);
        let result = analysis::stringify_reachable_values(module, func, &riv);

        self.out
            .write_all(result.as_bytes())
            .expect("should have been able to write");
    }
}

/// Wrapper pass that prints out a textual representation of a [`DominatorTree`].
///
/// [`DominatorTree`]: crate::analysis::DominatorTree
pub struct DominatorTreeWriterPass {
    out: Box<dyn io::Write>,
}

impl DominatorTreeWriterPass {
    /// Shorthand for a writer that prints to [`std::io::stdout`].
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Shorthand for a writer that prints to [`std::io::stderr`].
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }

    /// Creates an instance of the pass with a given writer.
    pub fn with_writer<T: io::Write + 'static>(writer: T) -> Self {
        Self {
            out: Box::new(writer),
        }
    }
}

impl FunctionReportPass for DominatorTreeWriterPass {
    fn run(&mut self, module: &Module, func: Func, am: &FunctionAnalysisManager) {
        let func = module.function(func);

        // a function with no blocks has no tree to print
        if func.entry_block().is_none() {
            return;
        }

        let domtree = am.get::<DominatorTreeAnalysis>(func);
        let print = |bb: Block| func.block(bb).name().to_owned();
        let result = utility::stringify_tree(&*domtree, print);

        writeln!(self.out, "{result}").expect("should have been able to write");
    }
}
