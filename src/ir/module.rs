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
use crate::ir::{Func, Function, Signature, Type, TypePool};

dense_arena_key! {
    /// A reference to a single module-level global.
    pub struct Global;
}

/// A module-level global variable.
///
/// Functions see globals as `ptr`-typed values, the type recorded here
/// is the type of the pointed-to storage.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalData {
    name: String,
    ty: Type,
}

impl GlobalData {
    /// Returns the name of the global, e.g. `counter`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type of the global's storage.
    pub fn ty(&self) -> Type {
        self.ty
    }
}

/// A single translation unit, a set of globals and functions that share
/// one [`TypePool`].
pub struct Module {
    name: String,
    types: TypePool,
    globals: ArenaMap<Global, GlobalData>,
    functions: ArenaMap<Func, Function>,
}

impl Module {
    /// Creates an empty module with a given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            types: TypePool::new(),
            globals: ArenaMap::default(),
            functions: ArenaMap::default(),
        }
    }

    /// Returns the name of the module.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type pool of the module.
    pub fn type_pool(&self) -> &TypePool {
        &self.types
    }

    /// Returns the type pool of the module, mutably. Intended for
    /// creating the aggregate types a function needs before defining it.
    pub fn type_pool_mut(&mut self) -> &mut TypePool {
        &mut self.types
    }

    /// Declares a module-level global.
    ///
    /// Note that functions defined *before* the global will not see it,
    /// builders snapshot the global list when they are created.
    pub fn declare_global(&mut self, name: &str, ty: Type) -> Global {
        self.globals.insert(GlobalData {
            name: name.to_owned(),
            ty,
        })
    }

    /// Defines an empty function with a given name and signature. Its
    /// body is filled in through a
    /// [`FunctionBuilder`](crate::ir::FunctionBuilder).
    pub fn define_fn(&mut self, name: &str, sig: Signature) -> Func {
        let func = self.functions.next_key();

        self.functions.insert(Function::new(func, name.to_owned(), sig))
    }

    /// Returns the data of a given global.
    pub fn global(&self, global: Global) -> &GlobalData {
        &self.globals[global]
    }

    /// Returns the keys of every global in the module, in declaration
    /// order.
    pub fn globals(&self) -> impl Iterator<Item = Global> + '_ {
        self.globals.keys()
    }

    /// Returns a given function.
    pub fn function(&self, func: Func) -> &Function {
        &self.functions[func]
    }

    pub(crate) fn function_mut(&mut self, func: Func) -> &mut Function {
        &mut self.functions[func]
    }

    /// Returns the keys of every function in the module, in definition
    /// order.
    pub fn functions(&self) -> impl Iterator<Item = Func> + '_ {
        self.functions.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn globals_are_in_declaration_order() {
        let mut module = Module::new("test");

        let a = module.declare_global("a", Type::i32());
        let b = module.declare_global("b", Type::i64());

        let all: Vec<Global> = module.globals().collect();

        assert_eq!(all, vec![a, b]);
        assert_eq!(module.global(a).name(), "a");
        assert_eq!(module.global(b).ty(), Type::i64());
    }
}
