//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The analyses themselves.
//!
//! The chain goes control-flow graph, then dominator tree, then the
//! reachable-value sets that are propagated down that tree. Each one
//! has a plain `compute` entry point and a wrapper analysis for use
//! with the [`FunctionAnalysisManager`](crate::pass::FunctionAnalysisManager).

mod dominators;
mod flowgraph;
mod printers;
mod reachable;
mod writer;

pub use dominators::*;
pub use flowgraph::*;
pub use printers::*;
pub use reachable::*;
pub use writer::*;
