//! The bytecode executor.
//!
//! Walks one compiled function's byte-range, decoding a one-byte opcode per
//! step and mutating the operand stack in place. Jump operands are absolute
//! byte offsets into the script's instruction buffer. An unknown opcode
//! byte means the instruction stream is corrupt, which is unrecoverable by
//! design, so the loop panics rather than returning an error.

use byteorder::{ByteOrder, LittleEndian};
use values::ScriptValue;

use crate::instance::ScriptInstance;
use crate::opcode::OpCode;
use crate::program::Program;
use crate::script::{FunctionHandle, Script, VariableHandle};
use crate::state::ScriptState;

#[inline]
fn read_u32(code: &[u8], at: usize) -> u32 {
    LittleEndian::read_u32(&code[at..at + 4])
}

pub fn execute(
    script: &Script,
    handle: FunctionHandle,
    prog: &Program,
    state: &mut ScriptState,
    inst: &ScriptInstance,
) {
    let range = script.function(handle);
    let code = &script.instructions[..];
    let end = range.offset + range.len;
    let mut pc = range.offset;

    macro_rules! binop_f {
        ($op:tt) => {{
            let b = state.pop_float();
            let a = state.pop_float();
            state.push_float(a $op b);
        }};
    }
    macro_rules! binop_i {
        ($f:ident) => {{
            let b = state.pop_int();
            let a = state.pop_int();
            state.push_int(a.$f(b));
        }};
    }
    macro_rules! cmp_f {
        ($op:tt) => {{
            let b = state.pop_float();
            let a = state.pop_float();
            state.push_bool(a $op b);
        }};
    }
    macro_rules! cmp_i {
        ($op:tt) => {{
            let b = state.pop_int();
            let a = state.pop_int();
            state.push_bool(a $op b);
        }};
    }

    while pc < end {
        let byte = code[pc];
        let op = match OpCode::from_u8(byte) {
            Some(op) => op,
            None => panic!("invalid opcode {byte:#04x} at byte {pc}"),
        };
        pc += 1;

        match op {
            OpCode::AddF => binop_f!(+),
            OpCode::AddI => binop_i!(wrapping_add),
            OpCode::SubF => binop_f!(-),
            OpCode::SubI => binop_i!(wrapping_sub),
            OpCode::MulF => binop_f!(*),
            OpCode::MulI => binop_i!(wrapping_mul),
            OpCode::DivF => binop_f!(/),
            OpCode::DivI => {
                let b = state.pop_int();
                let a = state.pop_int();
                // Zero divisor yields zero; runtime faults are reserved for
                // corrupt instruction streams.
                state.push_int(if b == 0 { 0 } else { a.wrapping_div(b) });
            }

            OpCode::LtF => cmp_f!(<),
            OpCode::LtI => cmp_i!(<),
            OpCode::LeF => cmp_f!(<=),
            OpCode::LeI => cmp_i!(<=),
            OpCode::GtF => cmp_f!(>),
            OpCode::GtI => cmp_i!(>),
            OpCode::GeF => cmp_f!(>=),
            OpCode::GeI => cmp_i!(>=),
            OpCode::EqF => cmp_f!(==),
            OpCode::EqI => cmp_i!(==),
            OpCode::NeF => cmp_f!(!=),
            OpCode::NeI => cmp_i!(!=),

            OpCode::Not => {
                let v = state.pop_value();
                state.push_bool(v.as_u32() == 0);
            }

            OpCode::PushConstF => {
                let bits = read_u32(code, pc);
                pc += 4;
                state.push_float(f32::from_bits(bits));
            }
            OpCode::PushConstI => {
                let word = read_u32(code, pc);
                pc += 4;
                state.push_int(word as i32);
            }
            OpCode::PushConst64 => {
                let low = read_u32(code, pc) as u64;
                let high = read_u32(code, pc + 4) as u64;
                pc += 8;
                state.push_value(ScriptValue::from_u64(low | (high << 32)));
            }

            OpCode::PushVarF => {
                let idx = read_u32(code, pc) as u16;
                pc += 4;
                let var = script.variable(VariableHandle(idx));
                state.push_float(inst.read_float(var));
            }
            OpCode::PushVarI => {
                let idx = read_u32(code, pc) as u16;
                pc += 4;
                let var = script.variable(VariableHandle(idx));
                state.push_int(inst.read_int(var));
            }

            OpCode::PushSlot => {
                let dat = read_u32(code, pc);
                pc += 4;
                let ofs = (dat & 0xffff) as usize;
                let width = (dat >> 16) as usize;
                let sp = state.sp();
                let slots = state.slots();
                slots.copy_within(ofs..ofs + width, sp);
                state.set_sp(sp + width);
            }
            OpCode::StoreSlot => {
                let dat = read_u32(code, pc);
                pc += 4;
                let ofs = (dat & 0xffff) as usize;
                let width = (dat >> 16) as usize;
                let sp = state.sp();
                let slots = state.slots();
                slots.copy_within(sp - width..sp, ofs);
                state.set_sp(sp - width);
            }

            OpCode::CastTopF => {
                let mut v = state.pop_value();
                v.set_float(v.as_int() as f32);
                state.push_value(v);
            }
            OpCode::CastTopI => {
                let mut v = state.pop_value();
                v.set_int(v.as_float() as i32);
                state.push_value(v);
            }
            OpCode::CastUnderF => {
                let top = state.pop_value();
                let mut v = state.pop_value();
                v.set_float(v.as_int() as f32);
                state.push_value(v);
                state.push_value(top);
            }
            OpCode::CastUnderI => {
                let top = state.pop_value();
                let mut v = state.pop_value();
                v.set_int(v.as_float() as i32);
                state.push_value(v);
                state.push_value(top);
            }

            OpCode::Jump => {
                pc = read_u32(code, pc) as usize;
            }
            OpCode::PopJumpIfZero => {
                let target = read_u32(code, pc) as usize;
                let cond = state.pop_value();
                if cond.as_u32() == 0 {
                    pc = target;
                } else {
                    pc += 4;
                }
            }
            OpCode::JumpIfNonZeroElsePop => {
                let target = read_u32(code, pc) as usize;
                if state.peek(0).as_u32() != 0 {
                    pc = target;
                } else {
                    state.pop_value();
                    pc += 4;
                }
            }
            OpCode::JumpIfZeroElsePop => {
                let target = read_u32(code, pc) as usize;
                if state.peek(0).as_u32() == 0 {
                    pc = target;
                } else {
                    state.pop_value();
                    pc += 4;
                }
            }

            OpCode::CallNative => {
                let idx = read_u32(code, pc) as u16;
                pc += 4;
                let func = prog.native(idx);
                func(state);
            }
        }
    }
}
