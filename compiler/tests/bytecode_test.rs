use compiler::compile;
use values::ValueKind;
use vm::stdlib::base_library;
use vm::{OpCode, Program, Script};

fn program() -> Program {
    let mut prog = Program::new();
    prog.add_library(base_library());
    prog
}

fn opcodes(code: &[u8]) -> Vec<OpCode> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < code.len() {
        let op = OpCode::from_u8(code[i]).expect("valid stream");
        out.push(op);
        i += 1 + 4 * op.operand_words();
    }
    out
}

#[test]
fn int_add_uses_integer_variant() {
    let mut script = Script::new();
    let (_, res) = compile(&mut script, &program(), "(+ 1 2)", None).unwrap();
    assert_eq!(res.out_types, vec![ValueKind::Int]);
    assert_eq!(
        opcodes(&script.instructions),
        vec![OpCode::PushConstI, OpCode::PushConstI, OpCode::AddI]
    );
}

#[test]
fn mixed_add_casts_the_int_operand() {
    let mut script = Script::new();
    let (_, res) = compile(&mut script, &program(), "(+ 1 2.0)", None).unwrap();
    assert_eq!(res.out_types, vec![ValueKind::Float]);
    assert_eq!(
        opcodes(&script.instructions),
        vec![
            OpCode::PushConstI,
            OpCode::PushConstF,
            OpCode::CastUnderF,
            OpCode::AddF
        ]
    );
}

#[test]
fn or_emits_short_circuit_jump() {
    let mut script = Script::new();
    compile(&mut script, &program(), "(or true false)", None).unwrap();
    assert_eq!(
        opcodes(&script.instructions),
        vec![
            OpCode::PushConstI,
            OpCode::JumpIfNonZeroElsePop,
            OpCode::PushConstI
        ]
    );
}

#[test]
fn ternary_emits_patched_jumps() {
    let mut script = Script::new();
    compile(&mut script, &program(), "(? true 1 2)", None).unwrap();
    assert_eq!(
        opcodes(&script.instructions),
        vec![
            OpCode::PushConstI,
            OpCode::PopJumpIfZero,
            OpCode::PushConstI,
            OpCode::Jump,
            OpCode::PushConstI
        ]
    );
    // The conditional jump lands at the start of the else body.
    let target = u32::from_le_bytes(script.instructions[6..10].try_into().unwrap());
    assert_eq!(target as usize, script.instructions.len() - 5);
    // The unconditional jump lands past the else body.
    let end = u32::from_le_bytes(script.instructions[16..20].try_into().unwrap());
    assert_eq!(end as usize, script.instructions.len());
}

#[test]
fn quoted_strings_hash_to_names() {
    let mut script = Script::new();
    let (_, res) = compile(&mut script, &program(), "\"attack\"", None).unwrap();
    assert_eq!(res.out_types, vec![ValueKind::Name]);
    assert_eq!(opcodes(&script.instructions), vec![OpCode::PushConst64]);

    let mut forced = Script::new();
    let (_, res) = compile(&mut forced, &program(), "n\"attack\"", None).unwrap();
    assert_eq!(res.out_types, vec![ValueKind::Name]);
    assert_eq!(forced.instructions, script.instructions);
}

#[test]
fn constants_compile_to_push_const() {
    let mut script = Script::new();
    let (_, res) = compile(&mut script, &program(), "PI", None).unwrap();
    assert_eq!(res.out_types, vec![ValueKind::Float]);
    assert_eq!(opcodes(&script.instructions), vec![OpCode::PushConstF]);
    let bits = u32::from_le_bytes(script.instructions[1..5].try_into().unwrap());
    assert_eq!(f32::from_bits(bits), std::f32::consts::PI);
}

#[test]
fn locals_round_trip_through_slots() {
    let mut script = Script::new();
    let (_, res) = compile(&mut script, &program(), "(let x 5) x", None).unwrap();
    assert_eq!(res.out_types, vec![ValueKind::Int]);
    assert_eq!(
        opcodes(&script.instructions),
        vec![OpCode::PushConstI, OpCode::PushSlot]
    );
}

#[test]
fn recompiling_appends_functions() {
    let mut script = Script::new();
    let prog = program();
    let (first, _) = compile(&mut script, &prog, "1", None).unwrap();
    let (second, _) = compile(&mut script, &prog, "2", None).unwrap();
    assert_ne!(first, second);
    assert_eq!(script.num_functions(), 2);
    assert_eq!(script.function(second).offset, script.function(first).len);

    script.reset();
    assert_eq!(script.num_functions(), 0);
}

#[test]
fn self_emits_nothing() {
    let mut lib = vm::Library::new();
    lib.push_struct_def("character", "f,f,f");
    let mut prog = Program::new();
    prog.add_library(lib);

    let mut script = Script::new();
    let (_, res) = compile(&mut script, &prog, "self", Some("character")).unwrap();
    assert!(script.instructions.is_empty());
    assert_eq!(res.out_types, vec![ValueKind::Custom]);
    assert_eq!(res.custom_types, vec![0]);
}
