//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::analysis::{ControlFlowGraph, ControlFlowGraphAnalysis};
use crate::arena::SecondaryMap;
use crate::ir::{Block, Function};
use crate::pass::{FunctionAnalysisManager, FunctionAnalysisPass};
use crate::utility::{IntoTree, Packable};
use ahash::AHashSet;
use smallvec::SmallVec;

/// Models the dominator tree for a given control-flow graph. This analysis
/// also gives a postorder for the reachable blocks in the CFG (as this is
/// required for calculating dominators, and is useful information for
/// other passes to have as well).
///
/// # Implementation
/// The algorithm used is described in "A Simple, Fast Dominance Algorithm"
/// by Cooper et. al.
///
/// This implementation stores a tree inside of an arena side-table instead
/// of a direct tree with separately allocated nodes, but the rough
/// "dominator tree" structure still exists.
pub struct DominatorTree {
    // maps B -> idom(B) for given block B. "tree" structure comes from going farther
    // up the tree, e.g. tree[idom(b)].
    tree: SecondaryMap<Block, Block>,
    // A valid postorder of the reachable blocks in the control-flow graph.
    postorder: Vec<Block>,
}

impl DominatorTree {
    /// Computes dominance information for a function.
    pub fn compute(func: &Function, cfg: &ControlFlowGraph) -> Self {
        let po = compute_postorder(func);
        let idoms = if po.is_empty() {
            SecondaryMap::default()
        } else {
            compute_idoms(&po, cfg)
        };

        Self {
            tree: idoms,
            postorder: po,
        }
    }

    /// Gets the immediate dominator of `block`, if one exists. The only
    /// reachable block in a given flowgraph that does not have an immediate
    /// dominator is the entry block.
    pub fn idom(&self, block: Block) -> Option<Block> {
        let idom = self.tree[block];

        if idom.is_reserved() {
            None
        } else {
            Some(idom)
        }
    }

    /// Returns the blocks whose immediate dominator is `block`, i.e. the
    /// children of `block` in the dominator tree, in key order.
    pub fn children(&self, block: Block) -> SmallVec<[Block; 12]> {
        // we optimize for the child -> idom direction, so this has to scan.
        // fine for the tree-walks that actually need it
        self.tree
            .iter()
            .filter(|(_, idom)| **idom == block)
            .map(|(child, _)| child)
            .collect()
    }

    /// Checks if `possible_dominator` dominates `block`. Both blocks must actually be in
    /// the given flowgraph.
    ///
    /// This follows the dominance property directly, it returns true if `block` and
    /// `possible_dominator` are the same block. [`Self::strictly_dominates`] does not.
    pub fn dominates(&self, block: Block, possible_dominator: Block) -> bool {
        (block == possible_dominator) || self.strictly_dominates(block, possible_dominator)
    }

    /// Checks if `possible_dominator` strictly dominates `block`. Both blocks must
    /// actually be in the given flowgraph.
    ///
    /// This follows the strict dominance property directly, it returns false if
    /// `block` and `possible_dominator` are the same block.
    pub fn strictly_dominates(&self, block: Block, possible_dominator: Block) -> bool {
        let mut curr = block;

        while let Some(block) = self.idom(curr) {
            if block == possible_dominator {
                return true;
            }

            curr = block;
        }

        false
    }

    /// Returns the root (entry) node of the CFG.
    pub fn root(&self) -> Block {
        self.postorder
            .last()
            .copied()
            .expect("should have a root node")
    }

    /// Returns the list of reachable blocks in a valid post-ordering
    /// for the CFG.
    pub fn postorder(&self) -> &[Block] {
        &self.postorder
    }

    /// Returns an iterator over the reachable blocks in reverse postorder.
    pub fn reverse_postorder(&self) -> impl Iterator<Item = Block> + '_ {
        self.postorder().iter().copied().rev()
    }

    /// Checks if a block is reachable from the entry node
    pub fn is_reachable(&self, block: Block) -> bool {
        self.tree.contains(block)
    }
}

impl IntoTree<'_> for DominatorTree {
    type Node = Block;

    fn root(&self) -> Self::Node {
        self.root()
    }

    fn children(&self, node: Self::Node) -> SmallVec<[Self::Node; 12]> {
        let mut result = self.children(node);

        result.sort();

        result
    }
}

/// Wrapper analysis that generates a [`DominatorTree`].
pub struct DominatorTreeAnalysis;

impl FunctionAnalysisPass for DominatorTreeAnalysis {
    type Result = DominatorTree;

    fn run(&mut self, func: &Function, am: &FunctionAnalysisManager) -> Self::Result {
        let cfg = am.get::<ControlFlowGraphAnalysis>(func);

        DominatorTree::compute(func, &cfg)
    }
}

/// Directly computes a valid post-ordering of the reachable blocks in
/// `func`'s control-flow graph.
///
/// This should not be used directly in most cases, you probably want to
/// get this information through [`DominatorTree`] or [`DominatorTreeAnalysis`].
pub fn compute_postorder(func: &Function) -> Vec<Block> {
    let mut po = Vec::new();
    let mut seen = AHashSet::default();

    // if there are no blocks, the postorder is empty anyway
    if let Some(entry) = func.entry_block() {
        compute_po_recursive(&mut po, &mut seen, func, entry);
    }

    po
}

fn compute_po_recursive(
    order: &mut Vec<Block>,
    seen: &mut AHashSet<Block>,
    func: &Function,
    curr: Block,
) {
    // we need to mark it as seen **before** going to any targets, just in case
    // there's any recursive blocks or recursive chains of blocks
    seen.insert(curr);

    let targets: SmallVec<[Block; 4]> = match func.block(curr).last_inst() {
        Some(inst) => func
            .dfg()
            .inst_data(inst)
            .targets()
            .map_or(SmallVec::default(), SmallVec::from_slice),
        None => SmallVec::default(),
    };

    for target in targets {
        // can't use .filter here since that would borrow `seen`
        if !seen.contains(&target) {
            compute_po_recursive(order, seen, func, target);
        }
    }

    order.push(curr);
}

fn intersect(
    po_numbers: &SecondaryMap<Block, usize>,
    idoms: &SecondaryMap<Block, Block>,
    bb1: Block,
    bb2: Block,
) -> Block {
    let mut f1 = bb1;
    let mut f2 = bb2;

    while f1 != f2 {
        let f2v = po_numbers[f2];

        while po_numbers[f1] < f2v {
            f1 = idoms[f1];
        }

        let f1v = po_numbers[f1];

        while po_numbers[f2] < f1v {
            f2 = idoms[f2];
        }
    }

    f1
}

//
// this implements the dominator algorithm described in "A Simple, Fast Dominance Algorithm"
// by Cooper et. al. See the paper: http://www.hipersoft.rice.edu/grads/publications/dom14.pdf.
//
fn compute_idoms(po: &[Block], cfg: &ControlFlowGraph) -> SecondaryMap<Block, Block> {
    debug_assert!(!po.is_empty());

    // map block -> postorder number.
    // this is just mapping block -> index of block in `po`
    let po_numbers = {
        let mut map = SecondaryMap::default();

        for (i, bb) in po.iter().copied().enumerate() {
            map.insert(bb, i);
        }

        map
    };

    let root = po.last().copied().expect("postorder cannot be empty here");
    let mut idoms = SecondaryMap::default();
    let mut changed = true;

    // for the purposes of the algorithm, the entry node is its own idom
    idoms.insert(root, root);

    while changed {
        changed = false;

        // root has no predecessors, so we need to make sure we skip the root node.
        for block in po.iter().rev().copied().skip(1) {
            debug_assert_ne!(block, root);

            let idom = {
                // start by getting every processed predecessor. there will always be at least one
                // when we're iterating in reverse postorder, since the root node was processed at
                // the beginning of the algorithm
                let preds: SmallVec<[Block; 16]> = cfg
                    .predecessors(block)
                    .filter(|p| idoms.contains(*p))
                    .collect();

                // our initial idom is the first in this set of processed preds.
                // order is irrelevant but we have to have one
                let mut iter = preds.into_iter();
                let mut idom = iter.next().expect(
                    "every block should have at least one processed predecessor when in reverse postorder",
                );

                // for the rest of our processed preds, perform the "intersect" with `idom`
                for pred in iter {
                    idom = intersect(&po_numbers, &idoms, pred, idom);
                }

                idom
            };

            if idoms.insert(block, idom) != Some(idom) {
                changed = true;
            }
        }
    }

    // remove the root -> root idom relationship, mark a
    // sentinel we can look for instead.
    idoms.insert(root, Block::reserved());

    idoms
}
