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
use crate::ir::{Block, Function};
use crate::pass::{FunctionAnalysisManager, FunctionAnalysisPass};
use ahash::{AHashMap, AHashSet};
use smallvec::SmallVec;
use std::collections::hash_map::Entry;

dense_arena_key! {
    struct CFGNode;
}

struct CFGNodeData {
    predecessors: AHashSet<Block>,
    successors: AHashSet<Block>,
}

struct CFGComputer<'f> {
    nodes: ArenaMap<CFGNode, CFGNodeData>,
    lookup: AHashMap<Block, CFGNode>,
    func: &'f Function,
}

impl<'f> CFGComputer<'f> {
    fn new(func: &'f Function) -> Self {
        Self {
            nodes: ArenaMap::default(),
            lookup: AHashMap::default(),
            func,
        }
    }

    fn compute(mut self) -> (ArenaMap<CFGNode, CFGNodeData>, AHashMap<Block, CFGNode>) {
        for block in self.func.blocks() {
            self.compute_block(*block);
        }

        (self.nodes, self.lookup)
    }

    fn compute_block(&mut self, block: Block) {
        {
            // make sure that any block we compute at least gets
            // an empty node, even if we don't do anything else
            let _ = self.node_of(block);
        }

        let last = match self.func.block(block).last_inst() {
            Some(inst) => inst,
            _ => return,
        };

        let successors: SmallVec<[Block; 8]> =
            match self.func.dfg().inst_data(last).targets() {
                Some([]) => return, // early exit to avoid screwing with vectors unnecessarily
                Some(targets) => SmallVec::from_slice(targets),
                None => panic!("invalid block, did not have a terminator"),
            };

        for successor in successors {
            self.add_edge(block, successor);
        }
    }

    fn add_edge(&mut self, from: Block, to: Block) {
        self.node_of(from).successors.insert(to);
        self.node_of(to).predecessors.insert(from);
    }

    fn node_of(&mut self, block: Block) -> &mut CFGNodeData {
        match self.lookup.entry(block) {
            Entry::Occupied(slot) => &mut self.nodes[*slot.get()],
            Entry::Vacant(slot) => {
                let node = self.nodes.insert(CFGNodeData {
                    predecessors: AHashSet::default(),
                    successors: AHashSet::default(),
                });

                slot.insert(node);

                &mut self.nodes[node]
            }
        }
    }
}

/// Models successor/predecessor information about the control-flow graph of
/// a given function.
pub struct ControlFlowGraph {
    nodes: ArenaMap<CFGNode, CFGNodeData>,
    lookup: AHashMap<Block, CFGNode>,
}

impl ControlFlowGraph {
    /// Directly computes flowgraph information for a given function.
    ///
    /// This should not be used directly in normal passes, this should be
    /// requested from the [`FunctionAnalysisManager`]
    /// through [`ControlFlowGraphAnalysis`].
    pub fn compute(func: &Function) -> Self {
        let computer = CFGComputer::new(func);
        let (nodes, lookup) = computer.compute();

        Self { nodes, lookup }
    }

    /// Returns an iterator over the predecessors for a given block.
    pub fn predecessors(&self, block: Block) -> impl Iterator<Item = Block> + '_ {
        let node = self.data_of(block);

        node.predecessors.iter().copied()
    }

    /// Returns an iterator over the successors for a given block.
    pub fn successors(&self, block: Block) -> impl Iterator<Item = Block> + '_ {
        let node = self.data_of(block);

        node.successors.iter().copied()
    }

    /// Checks if a given block `pred` is a predecessor of `block`
    pub fn is_pred_of(&self, block: Block, pred: Block) -> bool {
        let node = self.data_of(block);

        node.predecessors.contains(&pred)
    }

    /// Checks if a given block `succ` is a successor of `block`
    pub fn is_succ_of(&self, block: Block, succ: Block) -> bool {
        let node = self.data_of(block);

        node.successors.contains(&succ)
    }

    fn data_of(&self, block: Block) -> &CFGNodeData {
        let idx = self.lookup[&block];

        &self.nodes[idx]
    }
}

/// An analysis pass that wraps up a [`ControlFlowGraph`] into
/// something that can actually be requested from an analysis manager.
pub struct ControlFlowGraphAnalysis;

impl FunctionAnalysisPass for ControlFlowGraphAnalysis {
    type Result = ControlFlowGraph;

    fn run(&mut self, func: &Function, _: &FunctionAnalysisManager) -> Self::Result {
        ControlFlowGraph::compute(func)
    }
}
