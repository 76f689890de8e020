//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The pass infrastructure, a lazy [`FunctionAnalysisManager`] that
//! analyses are requested through, and the [`PassRegistry`] that maps
//! user-visible names to report passes.

mod analysis;
mod registry;

pub use analysis::*;
pub use registry::*;
