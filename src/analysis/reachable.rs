//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::analysis::{DominatorTree, DominatorTreeAnalysis};
use crate::arena::SecondaryMap;
use crate::ir::{Block, Function, Value};
use crate::pass::{FunctionAnalysisManager, FunctionAnalysisPass};
use ahash::AHashSet;

/// The set of first-class values defined in each block of a function.
///
/// A value is "defined in" the block whose instruction produced it.
/// Aggregate-typed results are skipped entirely, they cannot be used
/// as operands so nothing downstream ever asks about them.
pub struct DefinedValues {
    sets: SecondaryMap<Block, AHashSet<Value>>,
}

impl DefinedValues {
    /// Collects the per-block definition sets of a function.
    ///
    /// Every block in the function's layout gets a set, including
    /// blocks that are unreachable from the entry.
    pub fn compute(func: &Function) -> Self {
        let mut sets = SecondaryMap::default();

        for &block in func.blocks() {
            let mut defs = AHashSet::default();

            for &inst in func.block(block).insts() {
                if let Some(value) = func.dfg().inst_to_result(inst) {
                    if func.dfg().ty(value).is_first_class() {
                        defs.insert(value);
                    }
                }
            }

            sets.insert(block, defs);
        }

        Self { sets }
    }

    /// Returns the values defined in a given block.
    pub fn in_block(&self, block: Block) -> &AHashSet<Value> {
        &self.sets[block]
    }
}

/// Builds the seed set for a function's entry block.
///
/// Values that exist before the function body executes, its parameters
/// and the addresses of module globals, are treated as if the entry
/// block defined them. Anything not first-class is skipped, and globals
/// whose storage is an aggregate were never imported into the function
/// in the first place, so neither ends up in the seed.
pub fn entry_seed(func: &Function) -> AHashSet<Value> {
    func.args()
        .iter()
        .chain(func.global_values())
        .copied()
        .filter(|value| func.dfg().ty(*value).is_first_class())
        .collect()
}

/// The reachable-value sets of a function, one per reachable block.
///
/// A value is *reachable in* a block if it is guaranteed to have been
/// computed by the time control enters that block, regardless of the
/// path taken. This uses domination as the guarantee: everything
/// defined in a strict dominator of `bb` is reachable in `bb`, plus
/// the entry's seed. Note that this over-approximates what the block
/// actually uses, it answers "what *could* this block use", not "what
/// does it use".
///
/// Blocks that are unreachable from the entry have no set at all,
/// asking about them yields `None`.
pub struct ReachableValues {
    order: Vec<Block>,
    sets: SecondaryMap<Block, AHashSet<Value>>,
}

impl ReachableValues {
    /// Directly computes the reachable values for every reachable block
    /// of a function.
    ///
    /// `domtree` must have been computed for this exact function, its
    /// root has to be the function's entry block.
    pub fn compute(func: &Function, domtree: &DominatorTree) -> Self {
        let mut result = Self {
            order: Vec::default(),
            sets: SecondaryMap::default(),
        };

        let entry = match func.entry_block() {
            Some(entry) => entry,
            None => return result,
        };

        assert_eq!(
            domtree.root(),
            entry,
            "dominator tree is not rooted at the function's entry block"
        );

        let defs = DefinedValues::compute(func);

        result.propagate(entry, entry_seed(func), &defs, domtree);

        result
    }

    // Walks the dominator tree from `root` downward. Each block's set is
    // the set of its parent plus everything the parent defines, and since
    // the tree gives every block exactly one parent, every block is
    // visited exactly once. No fixed point is needed.
    fn propagate(
        &mut self,
        root: Block,
        seed: AHashSet<Value>,
        defs: &DefinedValues,
        domtree: &DominatorTree,
    ) {
        let mut worklist = vec![(root, seed)];

        while let Some((block, reachable)) = worklist.pop() {
            for child in domtree.children(block) {
                // the child's set has to be its own copy, sibling subtrees
                // must not see each other's definitions
                let mut inherited = reachable.clone();

                inherited.extend(defs.in_block(block).iter().copied());

                worklist.push((child, inherited));
            }

            self.order.push(block);
            self.sets.insert(block, reachable);
        }
    }

    /// Returns the values reachable in `block`, or `None` if the block
    /// is unreachable from the entry.
    pub fn in_block(&self, block: Block) -> Option<&AHashSet<Value>> {
        self.sets.get(block)
    }

    /// Checks whether `value` is reachable in `block`. Unreachable
    /// blocks contain nothing.
    pub fn contains(&self, block: Block, value: Value) -> bool {
        self.in_block(block).map_or(false, |set| set.contains(&value))
    }

    /// Returns every `(block, set)` pair, in the order the blocks were
    /// visited during propagation. The entry block always comes first.
    pub fn iter(&self) -> impl Iterator<Item = (Block, &AHashSet<Value>)> {
        self.order.iter().map(move |&block| (block, &self.sets[block]))
    }

    /// Returns the number of blocks that have a reachable set.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Checks if no block has a reachable set, i.e. whether the
    /// function had no blocks.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Wrapper analysis that generates [`ReachableValues`].
pub struct ReachableValuesAnalysis;

impl FunctionAnalysisPass for ReachableValuesAnalysis {
    type Result = ReachableValues;

    fn run(&mut self, func: &Function, am: &FunctionAnalysisManager) -> Self::Result {
        let domtree = am.get::<DominatorTreeAnalysis>(func);

        ReachableValues::compute(func, &domtree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ControlFlowGraph;
    use crate::ir::*;

    fn analyze(module: &Module, func: Func) -> ReachableValues {
        let f = module.function(func);
        let cfg = ControlFlowGraph::compute(f);
        let domtree = DominatorTree::compute(f, &cfg);

        ReachableValues::compute(f, &domtree)
    }

    #[test]
    fn seed_contains_args_and_globals() {
        let mut m = Module::new("test");

        m.declare_global("g", Type::i32());

        let sig = SigBuilder::new()
            .param(Type::i32())
            .param(Type::ptr())
            .build();
        let f = m.define_fn("test", sig);
        let mut b = FunctionBuilder::new(&mut m, f);

        let args: Vec<Value> = b.args().to_vec();
        let globals: Vec<Value> = b.globals().to_vec();
        let entry = b.create_block("entry");

        b.ret(None);

        let riv = analyze(&m, f);
        let set = riv.in_block(entry).unwrap();

        assert_eq!(set.len(), 3);
        assert!(args.iter().all(|v| set.contains(v)));
        assert!(globals.iter().all(|v| set.contains(v)));
    }

    #[test]
    fn aggregate_params_are_not_seeded() {
        let mut m = Module::new("test");
        let pair = m.type_pool_mut().struct_of(&[Type::i32(), Type::i32()]);
        let sig = SigBuilder::new().param(pair).param(Type::i64()).build();
        let f = m.define_fn("test", sig);
        let mut b = FunctionBuilder::new(&mut m, f);

        let agg = b.args()[0];
        let scalar = b.args()[1];
        let entry = b.create_block("entry");

        b.ret(None);

        let riv = analyze(&m, f);

        assert!(!riv.contains(entry, agg));
        assert!(riv.contains(entry, scalar));
    }

    #[test]
    fn aggregate_storage_globals_are_not_seeded() {
        let mut m = Module::new("test");
        let pair = m.type_pool_mut().struct_of(&[Type::i64(), Type::i64()]);

        m.declare_global("agg", pair);
        m.declare_global("counter", Type::i32());

        let f = m.define_fn("test", SigBuilder::new().build());
        let mut b = FunctionBuilder::new(&mut m, f);

        let globals: Vec<Value> = b.globals().to_vec();
        let entry = b.create_block("entry");

        b.ret(None);

        let riv = analyze(&m, f);
        let set = riv.in_block(entry).unwrap();

        // only the scalar-storage global makes it into the seed
        assert_eq!(globals.len(), 1);
        assert_eq!(set.len(), 1);
        assert!(set.contains(&globals[0]));
    }

    #[test]
    fn linear_chain_accumulates() {
        let mut m = Module::new("test");
        let sig = SigBuilder::new().param(Type::i32()).build();
        let f = m.define_fn("test", sig);
        let mut b = FunctionBuilder::new(&mut m, f);

        //
        // entry defines %1, middle defines %2, exit defines nothing.
        // exit should see the argument, %1 and %2.
        //
        let x = b.args()[0];
        let entry = b.create_block("entry");
        let middle = b.create_block("middle");
        let exit = b.create_block("exit");

        b.switch_to(entry);
        let v1 = b.iadd(Type::i32(), x, x);
        b.br(middle);

        b.switch_to(middle);
        let v2 = b.imul(Type::i32(), v1, x);
        b.br(exit);

        b.switch_to(exit);
        b.ret(None);

        let riv = analyze(&m, f);

        assert!(riv.contains(entry, x));
        assert!(!riv.contains(entry, v1));

        assert!(riv.contains(middle, v1));
        assert!(!riv.contains(middle, v2));

        assert!(riv.contains(exit, x));
        assert!(riv.contains(exit, v1));
        assert!(riv.contains(exit, v2));
    }

    #[test]
    fn diamond_excludes_sibling_defs() {
        let mut m = Module::new("test");
        let sig = SigBuilder::new().param(Type::bool()).build();
        let f = m.define_fn("test", sig);
        let mut b = FunctionBuilder::new(&mut m, f);

        let cond = b.args()[0];
        let entry = b.create_block("entry");
        let left = b.create_block("left");
        let right = b.create_block("right");
        let merge = b.create_block("merge");

        b.switch_to(entry);
        let shared = b.iconst(Type::i32(), 1);
        b.condbr(cond, left, right);

        b.switch_to(left);
        let only_left = b.iconst(Type::i32(), 2);
        b.br(merge);

        b.switch_to(right);
        let only_right = b.iconst(Type::i32(), 3);
        b.br(merge);

        b.switch_to(merge);
        b.ret(None);

        let riv = analyze(&m, f);

        // entry's def reaches everything below it
        assert!(riv.contains(left, shared));
        assert!(riv.contains(right, shared));
        assert!(riv.contains(merge, shared));

        // a branch's defs never cross to the sibling or the join point,
        // neither side dominates the merge
        assert!(!riv.contains(right, only_left));
        assert!(!riv.contains(left, only_right));
        assert!(!riv.contains(merge, only_left));
        assert!(!riv.contains(merge, only_right));
    }

    #[test]
    fn loop_body_sees_header_defs() {
        let mut m = Module::new("test");
        let sig = SigBuilder::new().param(Type::bool()).build();
        let f = m.define_fn("test", sig);
        let mut b = FunctionBuilder::new(&mut m, f);

        let cond = b.args()[0];
        let entry = b.create_block("entry");
        let head = b.create_block("head");
        let body = b.create_block("body");
        let exit = b.create_block("exit");

        b.switch_to(entry);
        b.br(head);

        b.switch_to(head);
        let header_def = b.iconst(Type::i64(), 10);
        b.condbr(cond, body, exit);

        b.switch_to(body);
        let body_def = b.iconst(Type::i64(), 20);
        b.br(head);

        b.switch_to(exit);
        b.ret(None);

        let riv = analyze(&m, f);

        assert!(riv.contains(body, header_def));
        assert!(riv.contains(exit, header_def));

        // the body branches back to the header but does not dominate it
        assert!(!riv.contains(head, body_def));
        assert!(!riv.contains(exit, body_def));
    }

    #[test]
    fn unreachable_blocks_have_no_sets() {
        let mut m = Module::new("test");
        let f = m.define_fn("test", SigBuilder::new().build());
        let mut b = FunctionBuilder::new(&mut m, f);

        let entry = b.create_block("entry");
        let dead = b.create_block("dead");

        b.switch_to(entry);
        b.ret(None);

        b.switch_to(dead);
        b.br(entry);

        let riv = analyze(&m, f);

        assert!(riv.in_block(entry).is_some());
        assert!(riv.in_block(dead).is_none());
        assert_eq!(riv.len(), 1);
    }

    #[test]
    fn aggregate_results_are_filtered() {
        let mut m = Module::new("test");
        let pair = m.type_pool_mut().struct_of(&[Type::i32(), Type::i32()]);
        let f = m.define_fn("test", SigBuilder::new().build());
        let mut b = FunctionBuilder::new(&mut m, f);

        let entry = b.create_block("entry");
        let next = b.create_block("next");

        b.switch_to(entry);
        let agg = b.undef(pair);
        let elem = b.extract_value(Type::i32(), agg, 0);
        b.br(next);

        b.switch_to(next);
        b.ret(None);

        let riv = analyze(&m, f);

        // the scalar pulled out of the aggregate propagates, the
        // aggregate itself does not
        assert!(riv.contains(next, elem));
        assert!(!riv.contains(next, agg));
    }

    #[test]
    fn stores_and_branches_define_nothing() {
        let mut m = Module::new("test");
        let sig = SigBuilder::new().param(Type::ptr()).build();
        let f = m.define_fn("test", sig);
        let mut b = FunctionBuilder::new(&mut m, f);

        let ptr = b.args()[0];
        let entry = b.create_block("entry");
        let next = b.create_block("next");

        b.switch_to(entry);
        let loaded = b.load(Type::i32(), ptr);
        b.store(loaded, ptr);
        b.br(next);

        b.switch_to(next);
        b.ret(None);

        let riv = analyze(&m, f);
        let next_set = riv.in_block(next).unwrap();

        // only the argument and the load's result, stores and branches
        // contribute nothing
        assert_eq!(next_set.len(), 2);
        assert!(next_set.contains(&ptr));
        assert!(next_set.contains(&loaded));
    }

    #[test]
    fn empty_function_yields_empty_result() {
        let mut m = Module::new("test");
        let f = m.define_fn("test", SigBuilder::new().param(Type::i32()).build());

        FunctionBuilder::new(&mut m, f);

        let riv = analyze(&m, f);

        assert!(riv.is_empty());
        assert_eq!(riv.iter().count(), 0);
    }

    #[test]
    fn entry_is_first_in_iteration_order() {
        let mut m = Module::new("test");
        let f = m.define_fn("test", SigBuilder::new().build());
        let mut b = FunctionBuilder::new(&mut m, f);

        let entry = b.create_block("entry");
        let next = b.create_block("next");

        b.switch_to(entry);
        b.br(next);

        b.switch_to(next);
        b.ret(None);

        let riv = analyze(&m, f);
        let blocks: Vec<Block> = riv.iter().map(|(block, _)| block).collect();

        assert_eq!(blocks[0], entry);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn recomputing_is_deterministic() {
        let mut m = Module::new("test");
        let sig = SigBuilder::new().param(Type::bool()).build();
        let f = m.define_fn("test", sig);
        let mut b = FunctionBuilder::new(&mut m, f);

        let cond = b.args()[0];
        let entry = b.create_block("entry");
        let left = b.create_block("left");
        let right = b.create_block("right");

        b.switch_to(entry);
        b.condbr(cond, left, right);

        b.switch_to(left);
        b.ret(None);

        b.switch_to(right);
        b.ret(None);

        let first = analyze(&m, f);
        let second = analyze(&m, f);

        for (block, set) in first.iter() {
            assert_eq!(second.in_block(block), Some(set));
        }
    }

    #[test]
    fn sets_grow_monotonically_down_the_tree() {
        let mut m = Module::new("test");
        let sig = SigBuilder::new().param(Type::bool()).build();
        let f = m.define_fn("test", sig);
        let mut b = FunctionBuilder::new(&mut m, f);

        let cond = b.args()[0];
        let entry = b.create_block("entry");
        let head = b.create_block("head");
        let body = b.create_block("body");
        let exit = b.create_block("exit");

        b.switch_to(entry);
        b.iconst(Type::i32(), 1);
        b.br(head);

        b.switch_to(head);
        b.iconst(Type::i32(), 2);
        b.condbr(cond, body, exit);

        b.switch_to(body);
        b.br(head);

        b.switch_to(exit);
        b.ret(None);

        let func = m.function(f);
        let cfg = ControlFlowGraph::compute(func);
        let domtree = DominatorTree::compute(func, &cfg);
        let riv = ReachableValues::compute(func, &domtree);

        // every block's set contains its dominator-tree parent's set
        for (block, set) in riv.iter() {
            if let Some(parent) = domtree.idom(block) {
                let parent_set = riv.in_block(parent).unwrap();

                assert!(parent_set.iter().all(|value| set.contains(value)));
                assert!(set.len() >= parent_set.len());
            }
        }
    }
}
