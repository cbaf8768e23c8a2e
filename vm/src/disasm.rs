//! Instruction listing for debugging compiled scripts.

use std::fmt::Write;

use byteorder::{ByteOrder, LittleEndian};

use crate::opcode::OpCode;

/// Renders a byte range of instructions as one line per instruction:
/// byte offset, opcode name, and each 4-byte operand in hex.
pub fn disassemble(code: &[u8]) -> String {
    let mut out = String::new();
    let mut count = 0usize;
    let mut i = 0;
    while i < code.len() {
        match OpCode::from_u8(code[i]) {
            Some(op) => i += 1 + 4 * op.operand_words(),
            None => break,
        }
        count += 1;
    }
    let _ = writeln!(out, "Instructions {count} (bytes {})", code.len());

    let mut i = 0;
    while i < code.len() {
        let Some(op) = OpCode::from_u8(code[i]) else {
            let _ = writeln!(out, "{:#04x} <bad opcode {:#04x}>", i, code[i]);
            break;
        };
        let _ = write!(out, "{:#04x} {:<26}", i, op.name());
        for word in 0..op.operand_words() {
            let operand = LittleEndian::read_u32(&code[i + 1 + 4 * word..]);
            let _ = write!(out, "{operand:#010x} ");
        }
        let _ = writeln!(out);
        i += 1 + 4 * op.operand_words();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{ByteOrder, LittleEndian};

    #[test]
    fn lists_opcodes_with_operands() {
        let mut code = vec![OpCode::PushConstI.as_u8()];
        let mut word = [0u8; 4];
        LittleEndian::write_u32(&mut word, 7);
        code.extend_from_slice(&word);
        code.push(OpCode::PushConstI.as_u8());
        code.extend_from_slice(&word);
        code.push(OpCode::AddI.as_u8());

        let listing = disassemble(&code);
        assert!(listing.starts_with("Instructions 3 (bytes 11)"));
        assert!(listing.contains("PUSH_CONST_I"));
        assert!(listing.contains("ADD_I"));
        assert!(listing.contains("0x00000007"));
    }

    #[test]
    fn flags_bad_opcode() {
        let listing = disassemble(&[200]);
        assert!(listing.contains("<bad opcode"));
    }
}
