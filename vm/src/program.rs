//! The registry of importable native definitions.
//!
//! A `Library` is a named bundle of native function signatures, constants,
//! and struct layouts. A `Program` is an explicit, host-constructed
//! aggregation of libraries: their function and struct index spaces are
//! concatenated in import order, and lookups search the most recently
//! imported library first so later imports shadow earlier names.

use std::collections::HashMap;

use values::{name_hash, ScriptValue, ValueKind};

use crate::native::NativeFn;

/// One registered definition inside a `Library`.
///
/// Function in/out signatures and struct layouts are stored as the
/// comma-separated type strings the host registered them with; the compiler
/// parses them against the importing `Program` so struct names resolve.
pub enum LibraryDef {
    Function {
        name: String,
        /// Comma-separated output type string, e.g. `"f"` or `"f,f"`
        outs: String,
        /// Comma-separated input type string, `""` for no arguments
        ins: String,
        func: NativeFn,
        /// Index within this library's function space
        index: u16,
    },
    Constant {
        name: String,
        kind: ValueKind,
        value: ScriptValue,
    },
    Struct {
        name: String,
        /// Comma-separated field layout string
        fields: String,
        /// Index within this library's struct space
        index: u16,
    },
}

impl LibraryDef {
    pub fn name(&self) -> &str {
        match self {
            LibraryDef::Function { name, .. } => name,
            LibraryDef::Constant { name, .. } => name,
            LibraryDef::Struct { name, .. } => name,
        }
    }
}

/// An owned table of native definitions, read-only once imported.
#[derive(Default)]
pub struct Library {
    defs: Vec<LibraryDef>,
    name_to_idx: HashMap<u64, usize>,
    num_funcs: u16,
    num_structs: u16,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_function_def(&mut self, name: &str, outs: &str, ins: &str, func: NativeFn) {
        let index = self.num_funcs;
        self.num_funcs += 1;
        self.insert(LibraryDef::Function {
            name: name.to_string(),
            outs: outs.to_string(),
            ins: ins.to_string(),
            func,
            index,
        });
    }

    pub fn push_constant_def(&mut self, name: &str, kind: ValueKind, value: ScriptValue) {
        self.insert(LibraryDef::Constant {
            name: name.to_string(),
            kind,
            value,
        });
    }

    pub fn push_struct_def(&mut self, name: &str, fields: &str) {
        let index = self.num_structs;
        self.num_structs += 1;
        self.insert(LibraryDef::Struct {
            name: name.to_string(),
            fields: fields.to_string(),
            index,
        });
    }

    fn insert(&mut self, def: LibraryDef) {
        // Last definition wins within one library too.
        self.name_to_idx.insert(name_hash(def.name()), self.defs.len());
        self.defs.push(def);
    }

    pub fn find_def(&self, hash: u64) -> Option<&LibraryDef> {
        self.name_to_idx.get(&hash).map(|&i| &self.defs[i])
    }

    pub fn defs(&self) -> &[LibraryDef] {
        &self.defs
    }

    pub fn num_funcs(&self) -> u16 {
        self.num_funcs
    }

    pub fn num_structs(&self) -> u16 {
        self.num_structs
    }
}

struct Import {
    lib: Library,
    func_start: u16,
    struct_start: u16,
}

/// A definition resolved through the program, with its index flattened into
/// the program-wide function or struct space.
pub struct FindDef<'a> {
    pub def: &'a LibraryDef,
    pub full_index: u16,
}

/// Explicitly constructed, explicitly passed registry of imported libraries
/// plus the flat native-function table the executor indexes at call time.
#[derive(Default)]
pub struct Program {
    imports: Vec<Import>,
    func_ptrs: Vec<NativeFn>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Imports a library, appending its function and struct index spaces
    /// after everything already imported.
    pub fn add_library(&mut self, lib: Library) {
        let (func_start, struct_start) = match self.imports.last() {
            Some(prev) => (
                prev.func_start + prev.lib.num_funcs(),
                prev.struct_start + prev.lib.num_structs(),
            ),
            None => (0, 0),
        };
        for def in lib.defs() {
            if let LibraryDef::Function { func, .. } = def {
                self.func_ptrs.push(*func);
            }
        }
        self.imports.push(Import {
            lib,
            func_start,
            struct_start,
        });
    }

    /// Resolves a name against the imports, most recent first.
    pub fn find_def(&self, name: &str) -> Option<FindDef<'_>> {
        self.find_def_hash(name_hash(name))
    }

    pub fn find_def_hash(&self, hash: u64) -> Option<FindDef<'_>> {
        for imp in self.imports.iter().rev() {
            if let Some(def) = imp.lib.find_def(hash) {
                let full_index = match def {
                    LibraryDef::Function { index, .. } => imp.func_start + index,
                    LibraryDef::Struct { index, .. } => imp.struct_start + index,
                    LibraryDef::Constant { .. } => 0,
                };
                return Some(FindDef { def, full_index });
            }
        }
        None
    }

    /// Native function by program-wide index, as embedded in CALL_NATIVE.
    pub fn native(&self, full_index: u16) -> NativeFn {
        self.func_ptrs[full_index as usize]
    }

    pub fn num_funcs(&self) -> u16 {
        self.func_ptrs.len() as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ScriptState;

    fn nop(_: &mut ScriptState) {}

    fn other(s: &mut ScriptState) {
        s.push_int(1);
    }

    #[test]
    fn function_index_spaces_concatenate() {
        let mut a = Library::new();
        a.push_function_def("first", "f", "f", nop);
        a.push_function_def("second", "i", "i", nop);
        let mut b = Library::new();
        b.push_function_def("third", "b", "b", nop);

        let mut prog = Program::new();
        prog.add_library(a);
        prog.add_library(b);

        assert_eq!(prog.num_funcs(), 3);
        assert_eq!(prog.find_def("second").unwrap().full_index, 1);
        assert_eq!(prog.find_def("third").unwrap().full_index, 2);
    }

    #[test]
    fn later_import_shadows_earlier() {
        let mut a = Library::new();
        a.push_function_def("f", "f", "f", nop);
        let mut b = Library::new();
        b.push_function_def("f", "i", "i", other);

        let mut prog = Program::new();
        prog.add_library(a);
        prog.add_library(b);

        let found = prog.find_def("f").unwrap();
        assert_eq!(found.full_index, 1);
        match found.def {
            LibraryDef::Function { outs, .. } => assert_eq!(outs, "i"),
            _ => panic!("expected function def"),
        }
    }

    #[test]
    fn constants_and_structs_resolve() {
        let mut lib = Library::new();
        lib.push_constant_def("GRAVITY", ValueKind::Float, ScriptValue::from_float(-9.8));
        lib.push_struct_def("vec2", "f,f");

        let mut prog = Program::new();
        prog.add_library(lib);

        assert!(matches!(
            prog.find_def("GRAVITY").unwrap().def,
            LibraryDef::Constant { .. }
        ));
        let s = prog.find_def("vec2").unwrap();
        assert!(matches!(s.def, LibraryDef::Struct { .. }));
        assert_eq!(s.full_index, 0);
        assert!(prog.find_def("vec3").is_none());
    }
}
