//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ir::{Func, Module};
use crate::pass::FunctionAnalysisManager;
use ahash::AHashMap;

/// A pass that reports the result of some analysis for one function.
///
/// Report passes never mutate the IR, they request results from the
/// analysis manager and render them somewhere (usually a stream).
pub trait FunctionReportPass {
    /// Runs the report over `func`, requesting whatever analyses it
    /// needs through `am`.
    fn run(&mut self, module: &Module, func: Func, am: &FunctionAnalysisManager);
}

type ReportFactory = Box<dyn Fn() -> Box<dyn FunctionReportPass>>;

/// Maps user-visible pass names to the passes they stand for.
///
/// Drivers look passes up by name, asking for a name that was never
/// registered is a programming error and panics.
pub struct PassRegistry {
    factories: AHashMap<&'static str, ReportFactory>,
}

impl PassRegistry {
    /// Creates a registry with no passes in it.
    pub fn new() -> Self {
        Self {
            factories: AHashMap::default(),
        }
    }

    /// Registers a report pass under `name`, replacing any previous
    /// pass registered under the same name.
    pub fn register<F>(&mut self, name: &'static str, factory: F)
    where
        F: Fn() -> Box<dyn FunctionReportPass> + 'static,
    {
        self.factories.insert(name, Box::new(factory));
    }

    /// Checks whether a pass is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Creates a fresh instance of the pass registered under `name`.
    ///
    /// Panics if no pass was registered under that name.
    pub fn create(&self, name: &str) -> Box<dyn FunctionReportPass> {
        match self.factories.get(name) {
            Some(factory) => factory(),
            None => panic!("unknown pass name '{name}'"),
        }
    }
}

impl Default for PassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NopReport;

    impl FunctionReportPass for NopReport {
        fn run(&mut self, _: &Module, _: Func, _: &FunctionAnalysisManager) {}
    }

    #[test]
    fn lookup_by_name() {
        let mut registry = PassRegistry::new();

        registry.register("nop", || Box::new(NopReport));

        assert!(registry.contains("nop"));
        assert!(!registry.contains("other"));

        let _ = registry.create("nop");
    }

    #[test]
    #[should_panic(expected = "unknown pass name")]
    fn unknown_name_panics() {
        std::panic::set_hook(Box::new(|_| {}));

        let registry = PassRegistry::new();
        let _ = registry.create("missing");
    }
}
