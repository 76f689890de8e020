//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::analysis::ReachableValues;
use crate::arena::ArenaKey;
use crate::ir::{FloatFormat, Function, Inst, InstData, Module, Type, Value, ValueDef};
use smallvec::SmallVec;

const RULE: &str = "=================================================";
const SEPARATOR: &str = "-------------------------------------------------";

/// Produces the textual form of a type, e.g. `i32` or `[f64; 8]`.
pub fn stringify_ty(module: &Module, ty: Type) -> String {
    match ty {
        Type::Bool => "bool".to_owned(),
        Type::Int(width) => format!("i{width}"),
        Type::Float(FloatFormat::Single) => "f32".to_owned(),
        Type::Float(FloatFormat::Double) => "f64".to_owned(),
        Type::Ptr => "ptr".to_owned(),
        Type::Array(key) => {
            let (element, length) = module.type_pool().array_of(key);

            format!("[{}; {length}]", stringify_ty(module, element))
        }
        Type::Struct(key) => {
            let members: Vec<String> = module
                .type_pool()
                .members_of(key)
                .iter()
                .map(|member| stringify_ty(module, *member))
                .collect();

            format!("{{ {} }}", members.join(", "))
        }
    }
}

/// Produces the textual form of a value, the way the analysis reports
/// refer to it.
///
/// Arguments print as `<ty> %N`, globals print as `ptr @name`, and
/// instruction results print as the full defining instruction, e.g.
/// `%4 = iadd i32 %0, %1`.
pub fn stringify_value(module: &Module, func: &Function, value: Value) -> String {
    let ty = func.dfg().ty(value);

    match func.dfg().value_def(value) {
        ValueDef::Arg(_) => format!("{} %{}", stringify_ty(module, ty), value.index()),
        ValueDef::Global(global) => format!("ptr @{}", module.global(global).name()),
        ValueDef::Inst(inst) => {
            format!("%{} = {}", value.index(), stringify_inst(module, func, inst))
        }
    }
}

fn operand(value: Value) -> String {
    format!("%{}", value.index())
}

fn stringify_inst(module: &Module, func: &Function, inst: Inst) -> String {
    match *func.dfg().inst_data(inst) {
        InstData::IAdd(arith) => format!(
            "iadd {} {}, {}",
            stringify_ty(module, arith.ty),
            operand(arith.lhs),
            operand(arith.rhs)
        ),
        InstData::ISub(arith) => format!(
            "isub {} {}, {}",
            stringify_ty(module, arith.ty),
            operand(arith.lhs),
            operand(arith.rhs)
        ),
        InstData::IMul(arith) => format!(
            "imul {} {}, {}",
            stringify_ty(module, arith.ty),
            operand(arith.lhs),
            operand(arith.rhs)
        ),
        InstData::IConst { ty, value } => {
            format!("iconst {} {value}", stringify_ty(module, ty))
        }
        InstData::BConst { value } => format!("bconst bool {value}"),
        InstData::Undef { ty } => format!("undef {}", stringify_ty(module, ty)),
        InstData::Insert {
            ty,
            agg,
            elem,
            index,
        } => format!(
            "insert {} {}, {}, {index}",
            stringify_ty(module, ty),
            operand(agg),
            operand(elem)
        ),
        InstData::Extract { ty, agg, index } => format!(
            "extract {} {}, {index}",
            stringify_ty(module, ty),
            operand(agg)
        ),
        InstData::Load { ty, ptr } => format!(
            "load {}, ptr {}",
            stringify_ty(module, ty),
            operand(ptr)
        ),
        _ => panic!("instruction does not define a value"),
    }
}

/// Renders the reachable-value sets of one function as a report.
///
/// The blocks appear in the order the analysis visited them (entry
/// first), and within a block the values are sorted by key so the
/// output is stable across runs.
pub fn stringify_reachable_values(
    module: &Module,
    func: &Function,
    riv: &ReachableValues,
) -> String {
    let mut out = String::default();

    out += &format!("{RULE}\nReachable Value analysis results\n{RULE}\n");

    for (block, set) in riv.iter() {
        let mut values: SmallVec<[Value; 8]> = set.iter().copied().collect();

        values.sort();

        out += &format!("[[BasicBlock {}]]\n", func.block(block).name());

        for value in values {
            out += &format!("==>{}\n", stringify_value(module, func, value));
        }

        out += SEPARATOR;
        out.push('\n');
    }

    out.push('\n');
    out.push('\n');

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ControlFlowGraph, DominatorTree};
    use crate::ir::*;

    #[test]
    fn types_stringify() {
        let mut m = Module::new("test");
        let arr = m.type_pool_mut().array(Type::i32(), 4);
        let pair = m.type_pool_mut().struct_of(&[Type::f64(), Type::ptr()]);
        let nested = m.type_pool_mut().struct_of(&[arr, Type::bool()]);

        assert_eq!(stringify_ty(&m, Type::bool()), "bool");
        assert_eq!(stringify_ty(&m, Type::i16()), "i16");
        assert_eq!(stringify_ty(&m, Type::f32()), "f32");
        assert_eq!(stringify_ty(&m, Type::ptr()), "ptr");
        assert_eq!(stringify_ty(&m, arr), "[i32; 4]");
        assert_eq!(stringify_ty(&m, pair), "{ f64, ptr }");
        assert_eq!(stringify_ty(&m, nested), "{ [i32; 4], bool }");
    }

    fn report_for(module: &Module, func: Func) -> String {
        let f = module.function(func);
        let cfg = ControlFlowGraph::compute(f);
        let domtree = DominatorTree::compute(f, &cfg);
        let riv = ReachableValues::compute(f, &domtree);

        stringify_reachable_values(module, f, &riv)
    }

    #[test]
    fn report_matches_exact_format() {
        let mut m = Module::new("test");

        m.declare_global("counter", Type::i32());

        let sig = SigBuilder::new().param(Type::i32()).build();
        let f = m.define_fn("test", sig);
        let mut b = FunctionBuilder::new(&mut m, f);

        // values are numbered in creation order: %0 is the argument,
        // %1 is @counter's address, %2 is the iadd
        let x = b.args()[0];
        let entry = b.create_block("entry");
        let next = b.create_block("next");

        b.switch_to(entry);

        let sum = b.iadd(Type::i32(), x, x);

        b.br(next);
        b.switch_to(next);
        b.ret(None);

        let _ = sum;

        let expected = "\
=================================================
Reachable Value analysis results
=================================================
[[BasicBlock entry]]
==>i32 %0
==>ptr @counter
-------------------------------------------------
[[BasicBlock next]]
==>i32 %0
==>ptr @counter
==>%2 = iadd i32 %0, %0
-------------------------------------------------


";

        assert_eq!(report_for(&m, f), expected);
    }

    #[test]
    fn empty_function_report_is_just_the_header() {
        let mut m = Module::new("test");
        let f = m.define_fn("test", SigBuilder::new().build());

        FunctionBuilder::new(&mut m, f);

        let expected = "\
=================================================
Reachable Value analysis results
=================================================


";

        assert_eq!(report_for(&m, f), expected);
    }

    #[test]
    fn values_are_sorted_within_a_block() {
        let mut m = Module::new("test");
        let sig = SigBuilder::new().param(Type::i64()).build();
        let f = m.define_fn("test", sig);
        let mut b = FunctionBuilder::new(&mut m, f);

        let x = b.args()[0];
        let entry = b.create_block("entry");
        let exit = b.create_block("exit");

        b.switch_to(entry);

        let a = b.iadd(Type::i64(), x, x);
        let c = b.imul(Type::i64(), a, x);

        b.br(exit);
        b.switch_to(exit);
        b.ret(None);

        let _ = c;

        let report = report_for(&m, f);
        let exit_section = report.split("[[BasicBlock exit]]").nth(1).unwrap();
        let lines: Vec<&str> = exit_section
            .lines()
            .filter(|line| line.starts_with("==>"))
            .collect();

        assert_eq!(
            lines,
            [
                "==>i64 %0",
                "==>%1 = iadd i64 %0, %0",
                "==>%2 = imul i64 %1, %0"
            ]
        );
    }
}
