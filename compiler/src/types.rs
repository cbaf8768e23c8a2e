//! Type-string parsing shared by native function signatures, struct
//! layouts, and `let` type hints.
//!
//! A type string is a comma-separated list of codes: the single characters
//! `f i n b e p`, the words `float int name bool empty ptr`, or a struct
//! name registered in the program. An empty segment reads as `empty`.

use values::{CompileResult, ValueKind};
use vm::{LibraryDef, Program};

use crate::error::CompileError;

/// Appends one parsed type code to `res`.
pub fn add_type(spec: &str, line: u32, res: &mut CompileResult, prog: &Program) -> Result<(), CompileError> {
    match spec {
        "" | "e" | "empty" => {
            res.push_kind(ValueKind::Empty);
            return Ok(());
        }
        "f" | "float" => {
            res.push_kind(ValueKind::Float);
            return Ok(());
        }
        "i" | "int" => {
            res.push_kind(ValueKind::Int);
            return Ok(());
        }
        "n" | "name" => {
            res.push_kind(ValueKind::Name);
            return Ok(());
        }
        "b" | "bool" => {
            res.push_kind(ValueKind::Bool);
            return Ok(());
        }
        "p" | "ptr" => {
            res.push_kind(ValueKind::Pointer);
            return Ok(());
        }
        _ => {}
    }

    let found = prog
        .find_def(spec)
        .ok_or_else(|| CompileError::new(format!("cannot find type: {spec}"), line))?;
    match found.def {
        LibraryDef::Struct { .. } => {
            res.push_custom(found.full_index);
            Ok(())
        }
        _ => Err(CompileError::new(
            format!("type name is not defined as a struct: {spec}"),
            line,
        )),
    }
}

/// Parses a full comma-separated type string.
pub fn parse_type_string(s: &str, line: u32, prog: &Program) -> Result<CompileResult, CompileError> {
    let mut res = CompileResult::new();
    for segment in s.split(',') {
        if segment.contains(' ') {
            return Err(CompileError::new(
                format!("type string cannot contain spaces: {segment}"),
                line,
            ));
        }
        add_type(segment, line, &mut res, prog)?;
    }
    Ok(res)
}
