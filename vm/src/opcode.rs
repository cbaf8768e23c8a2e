//! OpCode definitions for the GraphScript VM
//!
//! Instructions are a flat byte sequence: a one-byte opcode followed by
//! zero, one, or two 4-byte little-endian operand words. Every arithmetic
//! and comparison opcode comes in a float flavor and an integer flavor at
//! the next discriminant, so the compiler selects the typed variant with a
//! single `+ 1` and the executor never re-dispatches on value type.

use std::fmt;

/// Virtual machine instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    // ===== Arithmetic (pop two, push one) =====
    AddF = 0,
    AddI = 1,
    SubF = 2,
    SubI = 3,
    MulF = 4,
    MulI = 5,
    DivF = 6,
    DivI = 7,

    // ===== Comparison (pop two, push bool) =====
    LtF = 8,
    LtI = 9,
    LeF = 10,
    LeI = 11,
    GtF = 12,
    GtI = 13,
    GeF = 14,
    GeI = 15,
    EqF = 16,
    EqI = 17,
    NeF = 18,
    NeI = 19,

    /// Logical negate of the top word
    Not = 20,

    // ===== Pushes =====
    /// Push 4-byte float operand
    PushConstF = 21,
    /// Push 4-byte integer operand
    PushConstI = 22,
    /// Push 8-byte operand (low word, high word); used for name hashes
    PushConst64 = 23,
    /// Push float script variable; operand = variable index
    PushVarF = 24,
    /// Push int/bool script variable; operand = variable index
    PushVarI = 25,
    /// Copy local slots to the top; operand = offset | (width << 16)
    PushSlot = 26,
    /// Pop the top `width` slots into locals; operand = offset | (width << 16)
    StoreSlot = 27,

    // ===== In-place numeric casts =====
    /// Reinterpret the top slot int -> float
    CastTopF = 28,
    /// Reinterpret the top slot float -> int
    CastTopI = 29,
    /// Reinterpret the slot under the top int -> float
    CastUnderF = 30,
    /// Reinterpret the slot under the top float -> int
    CastUnderI = 31,

    // ===== Flow control (operands are absolute byte offsets) =====
    Jump = 32,
    /// Pop the condition; jump when it is zero
    PopJumpIfZero = 33,
    /// `or` short-circuit: keep a non-zero top and jump, else pop
    JumpIfNonZeroElsePop = 34,
    /// `and` short-circuit: keep a zero top and jump, else pop
    JumpIfZeroElsePop = 35,

    /// Invoke a native function; operand = global function index
    CallNative = 36,
}

impl OpCode {
    /// Get opcode from byte value
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(OpCode::AddF),
            1 => Some(OpCode::AddI),
            2 => Some(OpCode::SubF),
            3 => Some(OpCode::SubI),
            4 => Some(OpCode::MulF),
            5 => Some(OpCode::MulI),
            6 => Some(OpCode::DivF),
            7 => Some(OpCode::DivI),
            8 => Some(OpCode::LtF),
            9 => Some(OpCode::LtI),
            10 => Some(OpCode::LeF),
            11 => Some(OpCode::LeI),
            12 => Some(OpCode::GtF),
            13 => Some(OpCode::GtI),
            14 => Some(OpCode::GeF),
            15 => Some(OpCode::GeI),
            16 => Some(OpCode::EqF),
            17 => Some(OpCode::EqI),
            18 => Some(OpCode::NeF),
            19 => Some(OpCode::NeI),
            20 => Some(OpCode::Not),
            21 => Some(OpCode::PushConstF),
            22 => Some(OpCode::PushConstI),
            23 => Some(OpCode::PushConst64),
            24 => Some(OpCode::PushVarF),
            25 => Some(OpCode::PushVarI),
            26 => Some(OpCode::PushSlot),
            27 => Some(OpCode::StoreSlot),
            28 => Some(OpCode::CastTopF),
            29 => Some(OpCode::CastTopI),
            30 => Some(OpCode::CastUnderF),
            31 => Some(OpCode::CastUnderI),
            32 => Some(OpCode::Jump),
            33 => Some(OpCode::PopJumpIfZero),
            34 => Some(OpCode::JumpIfNonZeroElsePop),
            35 => Some(OpCode::JumpIfZeroElsePop),
            36 => Some(OpCode::CallNative),
            _ => None,
        }
    }

    /// Convert opcode to byte value
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The integer flavor of a float arithmetic/comparison opcode.
    ///
    /// Only valid for the float variants (`AddF` through `NeF`); the layout
    /// guarantees it is the next discriminant.
    #[inline]
    pub fn integer_variant(self) -> u8 {
        debug_assert!(self.as_u8() <= OpCode::NeF.as_u8() && self.as_u8() % 2 == 0);
        self.as_u8() + 1
    }

    /// Number of 4-byte operand words following the opcode byte
    pub fn operand_words(self) -> usize {
        match self {
            OpCode::PushConstF
            | OpCode::PushConstI
            | OpCode::PushVarF
            | OpCode::PushVarI
            | OpCode::PushSlot
            | OpCode::StoreSlot
            | OpCode::Jump
            | OpCode::PopJumpIfZero
            | OpCode::JumpIfNonZeroElsePop
            | OpCode::JumpIfZeroElsePop
            | OpCode::CallNative => 1,
            OpCode::PushConst64 => 2,
            _ => 0,
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            OpCode::AddF => "ADD_F",
            OpCode::AddI => "ADD_I",
            OpCode::SubF => "SUB_F",
            OpCode::SubI => "SUB_I",
            OpCode::MulF => "MUL_F",
            OpCode::MulI => "MUL_I",
            OpCode::DivF => "DIV_F",
            OpCode::DivI => "DIV_I",
            OpCode::LtF => "LT_F",
            OpCode::LtI => "LT_I",
            OpCode::LeF => "LE_F",
            OpCode::LeI => "LE_I",
            OpCode::GtF => "GT_F",
            OpCode::GtI => "GT_I",
            OpCode::GeF => "GE_F",
            OpCode::GeI => "GE_I",
            OpCode::EqF => "EQ_F",
            OpCode::EqI => "EQ_I",
            OpCode::NeF => "NE_F",
            OpCode::NeI => "NE_I",
            OpCode::Not => "NOT",
            OpCode::PushConstF => "PUSH_CONST_F",
            OpCode::PushConstI => "PUSH_CONST_I",
            OpCode::PushConst64 => "PUSH_CONST_64",
            OpCode::PushVarF => "PUSH_VAR_F",
            OpCode::PushVarI => "PUSH_VAR_I",
            OpCode::PushSlot => "PUSH_SLOT",
            OpCode::StoreSlot => "STORE_SLOT",
            OpCode::CastTopF => "CAST_TOP_F",
            OpCode::CastTopI => "CAST_TOP_I",
            OpCode::CastUnderF => "CAST_UNDER_F",
            OpCode::CastUnderI => "CAST_UNDER_I",
            OpCode::Jump => "JUMP",
            OpCode::PopJumpIfZero => "POP_JUMP_IF_ZERO",
            OpCode::JumpIfNonZeroElsePop => "JUMP_IF_NONZERO_ELSE_POP",
            OpCode::JumpIfZeroElsePop => "JUMP_IF_ZERO_ELSE_POP",
            OpCode::CallNative => "CALL_NATIVE",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
