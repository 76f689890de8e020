//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! A simple typed arena module.
//!
//! Every entity in the IR (blocks, values, instructions, functions,
//! globals) is referred to by a dense integer key scoped to the arena it
//! was created by, instead of by pointer or reference. Analyses build
//! side-tables and sets over those keys, which avoids both the aliasing
//! hazards and the overhead of reference-based containers.
//!
//! Very similar to `id_arena` and other simple typed arena crates, just
//! trimmed down to what this project actually needs.
//!
//! ```
//! # use peridot::dense_arena_key;
//! # use peridot::arena::*;
//! dense_arena_key! {
//!     pub struct Node;
//! }
//!
//! enum AstNode {
//!     Immediate(u64),
//!     Add(Node, Node),
//! }
//!
//! let mut arena = ArenaMap::new();
//!
//! let e1: Node = arena.insert(AstNode::Immediate(16));
//! let e2 = arena.insert(AstNode::Immediate(3));
//! let e3 = arena.insert(AstNode::Add(e1, e2));
//! ```

mod key;
mod map;
mod secondary;

pub use key::ArenaKey;
pub use map::ArenaMap;
pub use secondary::SecondaryMap;
