//! Round-trip type soundness: a well-typed expression leaves exactly the
//! slots its CompileResult declares, with the values arithmetic says.

use compiler::compile;
use proptest::prelude::*;
use values::{ScriptValue, ValueKind};
use vm::stdlib::base_library;
use vm::{Program, Script, ScriptInstance, ScriptState};

fn program() -> Program {
    let mut prog = Program::new();
    prog.add_library(base_library());
    prog
}

fn run(source: &str) -> (values::CompileResult, Vec<ScriptValue>) {
    let prog = program();
    let mut script = Script::new();
    let (handle, res) = compile(&mut script, &prog, source, None).expect(source);
    let inst = ScriptInstance::detached(&script).unwrap();
    let mut stack = [ScriptValue::zero(); 64];
    let mut state = ScriptState::new(&mut stack);
    script.execute(handle, &prog, &mut state, &inst);
    let sp = state.sp();
    (res, stack[..sp].to_vec())
}

proptest! {
    #[test]
    fn int_arithmetic_matches_rust(a in -1000i32..1000, b in -1000i32..1000, op in prop::sample::select(vec!["+", "-", "*"])) {
        let (res, slots) = run(&format!("({op} {a} {b})"));
        prop_assert_eq!(&res.out_types, &vec![ValueKind::Int]);
        prop_assert_eq!(slots.len(), res.width());
        let expected = match op {
            "+" => a + b,
            "-" => a - b,
            _ => a * b,
        };
        prop_assert_eq!(slots[0].as_int(), expected);
    }

    #[test]
    fn comparisons_yield_bool(a in -1000i32..1000, b in -1000i32..1000, op in prop::sample::select(vec!["<", ">", "<=", ">=", "==", "!="])) {
        let (res, slots) = run(&format!("({op} {a} {b})"));
        prop_assert_eq!(&res.out_types, &vec![ValueKind::Bool]);
        prop_assert_eq!(slots.len(), 1);
        let expected = match op {
            "<" => a < b,
            ">" => a > b,
            "<=" => a <= b,
            ">=" => a >= b,
            "==" => a == b,
            _ => a != b,
        };
        prop_assert_eq!(slots[0].as_bool(), expected);
    }

    #[test]
    fn mixed_operands_promote_to_float(a in -1000i32..1000, tenths in -1000i32..1000) {
        let b = tenths as f32 / 10.0;
        let (res, slots) = run(&format!("(+ {a} {b:?})"));
        prop_assert_eq!(&res.out_types, &vec![ValueKind::Float]);
        prop_assert_eq!(slots.len(), 1);
        prop_assert_eq!(slots[0].as_float(), a as f32 + b);
    }

    #[test]
    fn nesting_keeps_arity_one(a in 1i32..100, b in 1i32..100, c in 1i32..100) {
        let (res, slots) = run(&format!("(+ (* {a} {b}) (- {c} {a}))"));
        prop_assert_eq!(res.width(), 1);
        prop_assert_eq!(slots.len(), 1);
        prop_assert_eq!(slots[0].as_int(), a * b + (c - a));
    }
}
