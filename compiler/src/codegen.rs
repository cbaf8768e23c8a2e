//! Recursive-descent compiler for the prefix expression language.
//!
//! Syntax is fully parenthesized prefix notation: every operation is
//! `( op arg1 arg2 ... )` and a bare token is a zero-arity leaf. The
//! compiler walks the token sequence with an index cursor, type-checking as
//! it goes and appending bytecode to the script's instruction buffer. Jumps
//! are emitted as 4-byte stubs and backpatched once the jumped-over region
//! is known.

use byteorder::{ByteOrder, LittleEndian};
use parser::{classify_number, is_bool_literal, is_quoted, tokenize, NumberKind, Token};
use values::{name_hash, CompileResult, ValueKind};
use vm::{FunctionHandle, FunctionRange, LibraryDef, OpCode, Program, Script};

use crate::error::CompileError;
use crate::types::parse_type_string;

/// Binary operators in table order; index >= COMPARISON_START yields bool.
const BINARY_OPS: [(&str, OpCode); 10] = [
    ("+", OpCode::AddF),
    ("-", OpCode::SubF),
    ("*", OpCode::MulF),
    ("/", OpCode::DivF),
    ("<", OpCode::LtF),
    (">", OpCode::GtF),
    ("<=", OpCode::LeF),
    (">=", OpCode::GeF),
    ("==", OpCode::EqF),
    ("!=", OpCode::NeF),
];
const COMPARISON_START: usize = 4;

struct LocalVariable {
    name: String,
    offset: u16,
    ty: CompileResult,
}

struct Compiler<'a> {
    script: &'a mut Script,
    program: &'a Program,
    tokens: Vec<Token>,
    cursor: usize,
    locals: Vec<LocalVariable>,
    next_slot: u16,
    self_type: Option<&'a str>,
    line: u32,
}

/// Compiles one source body into `script`, appending a new function.
///
/// The returned `CompileResult` is that of the final top-level form. On
/// error the partially emitted bytecode is rolled back and no function is
/// published.
pub fn compile(
    script: &mut Script,
    program: &Program,
    source: &str,
    self_type: Option<&str>,
) -> Result<(FunctionHandle, CompileResult), CompileError> {
    let offset = script.instructions.len();
    let body = {
        let mut c = Compiler {
            script: &mut *script,
            program,
            tokens: tokenize(source),
            cursor: 0,
            locals: Vec::new(),
            next_slot: 0,
            self_type,
            line: 1,
        };
        c.compile_body()
    };
    match body {
        Ok(res) => {
            let len = script.instructions.len() - offset;
            let handle = script.publish_function(FunctionRange { offset, len });
            Ok((handle, res))
        }
        Err(err) => {
            script.instructions.truncate(offset);
            Err(err)
        }
    }
}

impl<'a> Compiler<'a> {
    fn compile_body(&mut self) -> Result<CompileResult, CompileError> {
        let mut res = CompileResult::new();
        while self.cursor < self.tokens.len() {
            if self.tokens[self.cursor].text == ")" {
                return Err(CompileError::new(
                    "unexpected )",
                    self.tokens[self.cursor].line,
                ));
            }
            res = self.compile_form()?;
        }
        Ok(res)
    }

    // ----- token cursor -----

    fn next_token(&mut self) -> Result<(String, u32), CompileError> {
        match self.tokens.get(self.cursor) {
            Some(tok) => {
                self.cursor += 1;
                self.line = tok.line;
                Ok((tok.text.clone(), tok.line))
            }
            None => Err(CompileError::new("unexpected end of input", self.line)),
        }
    }

    fn peek_is(&self, s: &str) -> bool {
        self.tokens.get(self.cursor).is_some_and(|t| t.text == s)
    }

    fn at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    // ----- emission -----

    fn emit_op(&mut self, op: OpCode) {
        self.script.instructions.push(op.as_u8());
    }

    fn emit_byte(&mut self, byte: u8) {
        self.script.instructions.push(byte);
    }

    fn emit_u32(&mut self, word: u32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, word);
        self.script.instructions.extend_from_slice(&buf);
    }

    /// Emits `op` plus a 4-byte stub; returns the stub's location.
    fn emit_jump(&mut self, op: OpCode) -> usize {
        self.emit_op(op);
        let at = self.script.instructions.len();
        self.emit_u32(0);
        at
    }

    /// Points the stub at `at` to the current end of the buffer.
    fn patch_jump(&mut self, at: usize) {
        let target = self.script.instructions.len() as u32;
        LittleEndian::write_u32(&mut self.script.instructions[at..at + 4], target);
    }

    // ----- locals -----

    fn find_local(&self, name: &str) -> Option<&LocalVariable> {
        // End-to-start, so the most recent declaration shadows.
        self.locals.iter().rev().find(|l| l.name == name)
    }

    fn slot_operand(offset: u16, width: usize) -> u32 {
        offset as u32 | ((width as u32) << 16)
    }

    // ----- forms -----

    fn compile_form(&mut self) -> Result<CompileResult, CompileError> {
        let (token, line) = self.next_token()?;

        if token == "(" {
            let out = self.compile_operation()?;
            let (closer, line) = self.next_token().map_err(|_| {
                CompileError::new("expected )", self.line)
            })?;
            if closer != ")" {
                return Err(CompileError::new("expected )", line));
            }
            return Ok(out);
        }
        if token == ")" {
            // Let the enclosing operation consume it.
            self.cursor -= 1;
            return Ok(CompileResult::of(ValueKind::Empty));
        }
        self.compile_leaf(&token, line)
    }

    fn compile_operation(&mut self) -> Result<CompileResult, CompileError> {
        let (head, line) = self.next_token()?;
        match head.as_str() {
            "not" => {
                let arg = self.compile_form()?;
                if !arg.is_single_logical() {
                    return Err(CompileError::new("not requires bool/int type", line));
                }
                self.emit_op(OpCode::Not);
                Ok(CompileResult::of(ValueKind::Bool))
            }
            "or" => self.compile_short_circuit(OpCode::JumpIfNonZeroElsePop, "or", line),
            "and" => self.compile_short_circuit(OpCode::JumpIfZeroElsePop, "and", line),
            "?" => self.compile_ternary(line),
            "=" => self.compile_assignment(line),
            "let" => self.compile_let(line),
            _ => {
                if let Some(op_index) = BINARY_OPS.iter().position(|(name, _)| *name == head) {
                    self.compile_binary_op(op_index, line)
                } else {
                    self.compile_native_call(&head, line)
                }
            }
        }
    }

    fn compile_short_circuit(
        &mut self,
        op: OpCode,
        name: &str,
        line: u32,
    ) -> Result<CompileResult, CompileError> {
        let first = self.compile_form()?;
        if !first.is_single_logical() {
            return Err(CompileError::new(
                format!("{name} requires bool/int type (arg1)"),
                line,
            ));
        }
        let skip = self.emit_jump(op);
        let second = self.compile_form()?;
        if !second.is_single_logical() {
            return Err(CompileError::new(
                format!("{name} requires bool/int type (arg2)"),
                line,
            ));
        }
        self.patch_jump(skip);
        Ok(CompileResult::of(ValueKind::Bool))
    }

    fn compile_ternary(&mut self, line: u32) -> Result<CompileResult, CompileError> {
        let cond = self.compile_form()?;
        if !cond.is_single_bool() {
            return Err(CompileError::new("? requires a bool condition", line));
        }
        let to_else = self.emit_jump(OpCode::PopJumpIfZero);

        let then_res = self.compile_form()?;
        let to_end = self.emit_jump(OpCode::Jump);

        self.patch_jump(to_else);
        let else_res = self.compile_form()?;
        if then_res != else_res {
            return Err(CompileError::new(
                "? requires both branches to produce the same type(s)",
                line,
            ));
        }
        self.patch_jump(to_end);
        Ok(then_res)
    }

    fn compile_assignment(&mut self, line: u32) -> Result<CompileResult, CompileError> {
        let (name, line) = self
            .next_token()
            .map_err(|_| CompileError::new("missing local variable name after =", line))?;
        let (offset, ty) = match self.find_local(&name) {
            Some(local) => (local.offset, local.ty.clone()),
            None => {
                return Err(CompileError::new(
                    format!("no local variable named `{name}`"),
                    line,
                ))
            }
        };

        let value = self.compile_form()?;
        if value != ty {
            return Err(CompileError::new(
                format!("local `{name}` type does not match assignment"),
                line,
            ));
        }

        self.emit_op(OpCode::StoreSlot);
        self.emit_u32(Self::slot_operand(offset, ty.width()));
        Ok(CompileResult::of(ValueKind::Empty))
    }

    fn compile_let(&mut self, line: u32) -> Result<CompileResult, CompileError> {
        let (name, line) = self
            .next_token()
            .map_err(|_| CompileError::new("missing statement after let", line))?;

        let mut type_hint = None;
        if self.peek_is(":") {
            self.next_token()?;
            type_hint = Some(self.parse_type_from_tokens()?);
        }

        let value = self.compile_form()?;
        if let Some(hint) = type_hint {
            if value != hint {
                return Err(CompileError::new(
                    format!("type hint for `{name}` mismatches assignment"),
                    line,
                ));
            }
        }
        if value.is_empty_result() {
            return Err(CompileError::new(
                "cannot assign empty to a local variable",
                line,
            ));
        }

        let width = value.width();
        self.locals.push(LocalVariable {
            name,
            offset: self.next_slot,
            ty: value,
        });
        self.next_slot += width as u16;

        // Body statements may follow the binding inside the same form.
        while !self.at_end() && !self.peek_is(")") {
            self.compile_form()?;
        }
        Ok(CompileResult::of(ValueKind::Empty))
    }

    /// A type hint is either a single token (`f`, `int`, a struct name) or a
    /// bracketed list `[ t1 , t2 ]`.
    fn parse_type_from_tokens(&mut self) -> Result<CompileResult, CompileError> {
        let (first, line) = self.next_token()?;
        if first != "[" {
            return parse_type_string(&first, line, self.program);
        }
        let mut spec = String::new();
        loop {
            let (tok, _) = self
                .next_token()
                .map_err(|_| CompileError::new("unterminated [ type list", line))?;
            if tok == "]" {
                break;
            }
            spec.push_str(&tok);
        }
        parse_type_string(&spec, line, self.program)
    }

    fn compile_binary_op(
        &mut self,
        op_index: usize,
        line: u32,
    ) -> Result<CompileResult, CompileError> {
        let first = self.compile_form()?;
        if !first.is_single_numeric() {
            return Err(CompileError::new("math op requires numeric type", line));
        }
        let second = self.compile_form()?;
        if !second.is_single_numeric() {
            return Err(CompileError::new("math op requires numeric type", line));
        }

        let is_float = first.is_single_float() || second.is_single_float();
        if is_float && !first.is_single_float() {
            self.emit_op(OpCode::CastUnderF);
        }
        if is_float && !second.is_single_float() {
            self.emit_op(OpCode::CastTopF);
        }

        let op = BINARY_OPS[op_index].1;
        if is_float {
            self.emit_op(op);
        } else {
            self.emit_byte(op.integer_variant());
        }

        Ok(if op_index >= COMPARISON_START {
            CompileResult::of(ValueKind::Bool)
        } else if is_float {
            CompileResult::of(ValueKind::Float)
        } else {
            CompileResult::of(ValueKind::Int)
        })
    }

    fn compile_native_call(&mut self, name: &str, line: u32) -> Result<CompileResult, CompileError> {
        let found = self
            .program
            .find_def(name)
            .ok_or_else(|| CompileError::new(format!("native function not defined: {name}"), line))?;
        let (ins, outs, full_index) = match found.def {
            LibraryDef::Function { ins, outs, .. } => (ins.as_str(), outs.as_str(), found.full_index),
            _ => {
                return Err(CompileError::new(
                    format!("`{name}` is not callable"),
                    line,
                ))
            }
        };

        let formals = parse_type_string(ins, line, self.program)?;
        let argc = formals.out_types.len();
        let mut custom_idx = 0usize;
        let mut i = 0usize;
        while i < argc {
            if formals.out_types[i] == ValueKind::Empty {
                i += 1;
                continue;
            }
            if self.at_end() || self.peek_is(")") {
                return Err(CompileError::new(
                    format!("too few arguments for `{name}`"),
                    line,
                ));
            }

            let arg = self.compile_form()?;
            let count = arg.out_types.len();
            if i + count > argc {
                return Err(CompileError::new(
                    format!("too many arguments for `{name}`"),
                    line,
                ));
            }

            let mut arg_custom = 0usize;
            for j in 0..count {
                let expected = formals.out_types[i + j];
                let got = arg.out_types[j];
                if expected == got {
                    if expected == ValueKind::Custom {
                        let want = formals.custom_types[custom_idx];
                        custom_idx += 1;
                        let have = arg.custom_types[arg_custom];
                        arg_custom += 1;
                        if want != have {
                            return Err(CompileError::new(
                                format!("wrong struct type in argument to `{name}`"),
                                line,
                            ));
                        }
                    }
                    continue;
                }
                // One actual filling one formal may bridge a numeric gap.
                if count == 1 && expected.is_numeric() && got.is_numeric() {
                    if (expected == ValueKind::Float) != (got == ValueKind::Float) {
                        if got == ValueKind::Float {
                            self.emit_op(OpCode::CastTopI);
                        } else {
                            self.emit_op(OpCode::CastTopF);
                        }
                    }
                    continue;
                }
                return Err(CompileError::new(
                    format!("wrong argument type for `{name}`"),
                    line,
                ));
            }
            i += count;
        }

        self.emit_op(OpCode::CallNative);
        self.emit_u32(full_index as u32);

        parse_type_string(outs, line, self.program)
    }

    // ----- leaves -----

    fn compile_leaf(&mut self, token: &str, line: u32) -> Result<CompileResult, CompileError> {
        if token.is_empty() {
            return Err(CompileError::new("empty token", line));
        }

        // Quoted strings hash to names; an `n` prefix forces it explicitly.
        let quoted = if is_quoted(token) {
            Some(&token[1..token.len() - 1])
        } else if let Some(rest) = token.strip_prefix('n') {
            is_quoted(rest).then(|| &rest[1..rest.len() - 1])
        } else {
            None
        };
        if let Some(text) = quoted {
            let hash = name_hash(text);
            self.emit_op(OpCode::PushConst64);
            self.emit_u32(hash as u32);
            self.emit_u32((hash >> 32) as u32);
            return Ok(CompileResult::of(ValueKind::Name));
        }

        if is_bool_literal(token) {
            self.emit_op(OpCode::PushConstI);
            self.emit_u32(u32::from(token.eq_ignore_ascii_case("true")));
            return Ok(CompileResult::of(ValueKind::Bool));
        }

        match classify_number(token) {
            Some(NumberKind::Float) => {
                let digits = token.strip_suffix('f').unwrap_or(token);
                let value: f32 = digits.parse().map_err(|_| {
                    CompileError::new(format!("bad float literal: {token}"), line)
                })?;
                self.emit_op(OpCode::PushConstF);
                self.emit_u32(value.to_bits());
                return Ok(CompileResult::of(ValueKind::Float));
            }
            Some(NumberKind::Int) => {
                let value: i32 = token.parse().map_err(|_| {
                    CompileError::new(format!("integer literal out of range: {token}"), line)
                })?;
                self.emit_op(OpCode::PushConstI);
                self.emit_u32(value as u32);
                return Ok(CompileResult::of(ValueKind::Int));
            }
            None => {}
        }

        if token == "self" {
            let Some(self_type) = self.self_type else {
                return Err(CompileError::new("no self type in this context", line));
            };
            let found = self.program.find_def(self_type).ok_or_else(|| {
                CompileError::new(format!("cannot find self type: {self_type}"), line)
            })?;
            if !matches!(found.def, LibraryDef::Struct { .. }) {
                return Err(CompileError::new(
                    format!("self type is not a struct: {self_type}"),
                    line,
                ));
            }
            // No emission: `self` only types the expression.
            let mut res = CompileResult::new();
            res.push_custom(found.full_index);
            return Ok(res);
        }

        if let Some(local) = self.find_local(token) {
            let operand = Self::slot_operand(local.offset, local.ty.width());
            let ty = local.ty.clone();
            self.emit_op(OpCode::PushSlot);
            self.emit_u32(operand);
            return Ok(ty);
        }

        if let Some((handle, var)) = self.script.find_variable(token) {
            let kind = var.kind;
            if !kind.is_numeric() {
                return Err(CompileError::new(
                    format!("script variable `{token}` is not bool/int/float"),
                    line,
                ));
            }
            let op = if kind == ValueKind::Float {
                OpCode::PushVarF
            } else {
                OpCode::PushVarI
            };
            let index = handle.index();
            self.emit_op(op);
            self.emit_u32(index as u32);
            return Ok(CompileResult::of(kind));
        }

        if let Some(found) = self.program.find_def(token) {
            if let LibraryDef::Constant { kind, value, .. } = found.def {
                if !kind.is_numeric() {
                    return Err(CompileError::new(
                        format!("constant `{token}` is not bool/int/float"),
                        line,
                    ));
                }
                let (op, word) = if *kind == ValueKind::Float {
                    (OpCode::PushConstF, value.as_u32())
                } else {
                    (OpCode::PushConstI, value.as_u32())
                };
                self.emit_op(op);
                self.emit_u32(word);
                return Ok(CompileResult::of(*kind));
            }
        }

        Err(CompileError::new(
            format!("unknown identifier `{token}`"),
            line,
        ))
    }
}
