use compiler::compile;
use vm::stdlib::base_library;
use vm::{Program, Script};

fn program() -> Program {
    let mut prog = Program::new();
    prog.add_library(base_library());
    prog
}

fn compile_err(source: &str) -> compiler::CompileError {
    let mut script = Script::new();
    compile(&mut script, &program(), source, None).unwrap_err()
}

#[test]
fn unmatched_paren() {
    let err = compile_err("(+ 1 2");
    assert!(err.message.contains("expected )"), "{}", err.message);
}

#[test]
fn stray_closing_paren() {
    let err = compile_err("1 )");
    assert!(err.message.contains("unexpected )"));
}

#[test]
fn unknown_identifier_names_symbol_and_line() {
    let err = compile_err("1\nbogus");
    assert!(err.message.contains("bogus"), "{}", err.message);
    assert_eq!(err.line, 2);
}

#[test]
fn math_op_rejects_names() {
    let err = compile_err("(+ \"a\" 1)");
    assert!(err.message.contains("numeric"), "{}", err.message);
}

#[test]
fn ternary_requires_bool_condition() {
    let err = compile_err("(? 1 2 3)");
    assert!(err.message.contains("bool condition"), "{}", err.message);
}

#[test]
fn ternary_branch_types_must_match() {
    let err = compile_err("(? true (+ 1 2) (+ 3.0 4.0))");
    assert!(err.message.contains("same type"), "{}", err.message);
}

#[test]
fn let_type_hint_must_match() {
    assert!(compile_err("(let x : f 5)").message.contains("type hint"));

    let mut script = Script::new();
    assert!(compile(&mut script, &program(), "(let x : f 5.0)", None).is_ok());
    assert!(compile(&mut script, &program(), "(let y : int 5)", None).is_ok());
}

#[test]
fn assignment_requires_declared_local_of_same_type() {
    assert!(compile_err("(= x 5)").message.contains("no local variable"));
    assert!(compile_err("(let x 5 (= x 6.0))")
        .message
        .contains("does not match"));

    let mut script = Script::new();
    assert!(compile(&mut script, &program(), "(let x 5 (= x 6))", None).is_ok());
}

#[test]
fn let_rejects_empty_value() {
    let err = compile_err("(let x (let y 1))");
    assert!(err.message.contains("empty"), "{}", err.message);
}

#[test]
fn native_arity_is_checked() {
    assert!(compile_err("(min 1.0)").message.contains("too few"));
    let err = compile_err("(abs \"name\")");
    assert!(err.message.contains("wrong argument type"), "{}", err.message);
}

#[test]
fn unknown_function_fails() {
    let err = compile_err("(frobnicate 1)");
    assert!(err.message.contains("frobnicate"), "{}", err.message);
}

#[test]
fn failed_compile_rolls_back_bytecode() {
    let mut script = Script::new();
    let prog = program();
    compile(&mut script, &prog, "(+ 1 2)", None).unwrap();
    let len = script.instructions.len();
    let functions = script.num_functions();

    assert!(compile(&mut script, &prog, "(+ 1 bogus)", None).is_err());
    assert_eq!(script.instructions.len(), len);
    assert_eq!(script.num_functions(), functions);
}
