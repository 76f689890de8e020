//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ir::{Func, Function};
use ahash::AHashMap;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

/// An analysis that runs over a single function.
///
/// Analyses are pure, running one twice on the same input must produce
/// the same result. They are registered with a
/// [`FunctionAnalysisManager`] and requested lazily, a registered
/// analysis that nothing asks for is never run.
pub trait FunctionAnalysisPass: Any {
    /// The result type of a given analysis.
    type Result: Any;

    /// Performs the analysis and returns a computed result. Other
    /// analyses this one depends on are requested through `am`.
    fn run(&mut self, func: &Function, am: &FunctionAnalysisManager) -> Self::Result;
}

trait ErasedAnalysisPass {
    fn run_erased(&mut self, func: &Function, am: &FunctionAnalysisManager) -> Rc<dyn Any>;
}

struct AnalysisWrapper<T> {
    inner: T,
}

impl<T: FunctionAnalysisPass> ErasedAnalysisPass for AnalysisWrapper<T> {
    fn run_erased(&mut self, func: &Function, am: &FunctionAnalysisManager) -> Rc<dyn Any> {
        Rc::new(self.inner.run(func, am))
    }
}

/// A lazy analysis manager for the functions of one module.
///
/// Analysis passes are registered through [`Self::add_pass`] and later
/// requested through [`Self::get`]. The first `get` for a given
/// `(function, analysis)` pair computes and caches the result, every
/// `get` after that is a cache hit. Nothing is ever run eagerly.
///
/// Results are cached per [`Func`] key, so one manager serves every
/// function in a module.
pub struct FunctionAnalysisManager {
    passes: RefCell<AHashMap<TypeId, Box<dyn ErasedAnalysisPass>>>,
    results: RefCell<AHashMap<(Func, TypeId), Rc<dyn Any>>>,
}

impl FunctionAnalysisManager {
    /// Creates a manager with no analyses registered, they need to be
    /// added with [`Self::add_pass`] before they can be requested.
    pub fn new() -> Self {
        Self {
            passes: RefCell::new(AHashMap::default()),
            results: RefCell::new(AHashMap::default()),
        }
    }

    /// Registers a function analysis pass. The pass is not run until
    /// the first time it is requested through [`Self::get`].
    ///
    /// You cannot use `T` with [`Self::get`] without having called
    /// this with the same `T` first, or else you'll get a panic.
    pub fn add_pass<T: FunctionAnalysisPass>(&mut self, pass: T) {
        self.passes
            .get_mut()
            .insert(TypeId::of::<T>(), Box::new(AnalysisWrapper { inner: pass }));
    }

    /// Lazily gets the result of an analysis for `func`, computing and
    /// caching it if this is the first request.
    pub fn get<T: FunctionAnalysisPass>(&self, func: &Function) -> Rc<T::Result> {
        let id = TypeId::of::<T>();
        let key = (func.func(), id);

        if let Some(result) = self.results.borrow().get(&key) {
            return Rc::clone(result)
                .downcast::<T::Result>()
                .ok()
                .expect("cached analysis result had the wrong type");
        }

        // the pass is taken out of the table while it runs, analyses
        // request their dependencies through `self` and that re-enters
        // this method
        let mut pass = self
            .passes
            .borrow_mut()
            .remove(&id)
            .expect("trying to get analysis that hasn't been registered");

        let result = pass.run_erased(func, self);

        self.passes.borrow_mut().insert(id, pass);
        self.results.borrow_mut().insert(key, Rc::clone(&result));

        result
            .downcast::<T::Result>()
            .ok()
            .expect("analysis produced a result of the wrong type")
    }
}

impl Default for FunctionAnalysisManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Module, SigBuilder};
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingAnalysis {
        runs: Rc<Cell<usize>>,
    }

    impl FunctionAnalysisPass for CountingAnalysis {
        type Result = usize;

        fn run(&mut self, _: &Function, _: &FunctionAnalysisManager) -> Self::Result {
            self.runs.set(self.runs.get() + 1);

            self.runs.get()
        }
    }

    struct DependentAnalysis;

    impl FunctionAnalysisPass for DependentAnalysis {
        type Result = usize;

        fn run(&mut self, func: &Function, am: &FunctionAnalysisManager) -> Self::Result {
            *am.get::<CountingAnalysis>(func) + 100
        }
    }

    #[test]
    fn results_are_cached_per_function() {
        let mut m = Module::new("test");
        let f1 = m.define_fn("one", SigBuilder::new().build());
        let f2 = m.define_fn("two", SigBuilder::new().build());

        let runs = Rc::new(Cell::new(0));
        let mut am = FunctionAnalysisManager::new();

        am.add_pass(CountingAnalysis {
            runs: Rc::clone(&runs),
        });

        let first = *am.get::<CountingAnalysis>(m.function(f1));
        let again = *am.get::<CountingAnalysis>(m.function(f1));
        let other = *am.get::<CountingAnalysis>(m.function(f2));

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn analyses_can_request_dependencies() {
        let mut m = Module::new("test");
        let f = m.define_fn("one", SigBuilder::new().build());

        let runs = Rc::new(Cell::new(0));
        let mut am = FunctionAnalysisManager::new();

        am.add_pass(CountingAnalysis {
            runs: Rc::clone(&runs),
        });
        am.add_pass(DependentAnalysis);

        assert_eq!(*am.get::<DependentAnalysis>(m.function(f)), 101);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    #[should_panic(expected = "hasn't been registered")]
    fn unregistered_analysis_panics() {
        std::panic::set_hook(Box::new(|_| {}));

        let mut m = Module::new("test");
        let f = m.define_fn("one", SigBuilder::new().build());
        let am = FunctionAnalysisManager::new();

        let _ = am.get::<DependentAnalysis>(m.function(f));
    }
}
