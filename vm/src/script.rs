//! Compiled scripts: the instruction buffer, the function table, the
//! declared variables, and linkage to one native class.

use serde::{Deserialize, Serialize};
use tracing::warn;
use values::ValueKind;

use crate::instance::ScriptInstance;
use crate::machine;
use crate::native::{NativeClassDef, NativeField};
use crate::program::Program;
use crate::state::ScriptState;

/// A `{offset, len}` byte-range into a script's instruction buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRange {
    pub offset: usize,
    pub len: usize,
}

/// Index of a compiled function within its script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FunctionHandle(pub(crate) u16);

impl FunctionHandle {
    pub fn index(self) -> u16 {
        self.0
    }
}

/// Index of a declared variable within its script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariableHandle(pub(crate) u16);

impl VariableHandle {
    pub fn index(self) -> u16 {
        self.0
    }
}

/// A variable declared on a script: either backed by a field on the linked
/// native class, or stored in each instance's local value array.
pub struct ScriptVariable {
    pub name: String,
    pub kind: ValueKind,
    pub is_native: bool,
    /// Slot into the instance value array; unused for native variables
    pub slot: u16,
    /// Filled in by `link_to_native_class`
    pub binding: Option<&'static NativeField>,
}

/// One compiled unit: an instruction buffer shared by all of its compiled
/// functions, plus the variable declarations instances bind against.
#[derive(Default)]
pub struct Script {
    /// Emitted bytecode; the compiler appends here
    pub instructions: Vec<u8>,
    functions: Vec<FunctionRange>,
    variables: Vec<ScriptVariable>,
    native_class: Option<&'static NativeClassDef>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all compiled functions and bytecode; variable declarations
    /// and native linkage survive so instances stay valid across recompiles.
    pub fn reset(&mut self) {
        self.instructions.clear();
        self.functions.clear();
    }

    /// Declares a variable. Non-native variables are assigned the next slot
    /// in the instance value array.
    pub fn add_variable(&mut self, name: &str, kind: ValueKind, is_native: bool) -> VariableHandle {
        let slot = self
            .variables
            .iter()
            .filter(|v| !v.is_native)
            .count() as u16;
        self.variables.push(ScriptVariable {
            name: name.to_string(),
            kind,
            is_native,
            slot: if is_native { 0 } else { slot },
            binding: None,
        });
        VariableHandle(self.variables.len() as u16 - 1)
    }

    pub fn find_variable(&self, name: &str) -> Option<(VariableHandle, &ScriptVariable)> {
        self.variables
            .iter()
            .position(|v| v.name == name)
            .map(|i| (VariableHandle(i as u16), &self.variables[i]))
    }

    pub fn variables(&self) -> &[ScriptVariable] {
        &self.variables
    }

    pub fn variable(&self, handle: VariableHandle) -> &ScriptVariable {
        &self.variables[handle.0 as usize]
    }

    /// Number of value slots an instance of this script owns.
    pub fn num_instance_values(&self) -> usize {
        self.variables.iter().filter(|v| !v.is_native).count()
    }

    /// Publishes a compiled byte-range as a callable function. The compiler
    /// calls this only after a compile fully succeeds, so a partially
    /// emitted body is never reachable.
    pub fn publish_function(&mut self, range: FunctionRange) -> FunctionHandle {
        debug_assert!(range.offset + range.len <= self.instructions.len());
        self.functions.push(range);
        FunctionHandle(self.functions.len() as u16 - 1)
    }

    pub fn function(&self, handle: FunctionHandle) -> FunctionRange {
        self.functions[handle.0 as usize]
    }

    pub fn num_functions(&self) -> usize {
        self.functions.len()
    }

    pub fn native_class(&self) -> Option<&'static NativeClassDef> {
        self.native_class
    }

    /// Resolves every native variable against the class's reflected fields,
    /// most-derived first. Misses and rebinds are logged, never fatal; use
    /// `check_is_valid` to detect a degraded script.
    pub fn link_to_native_class(&mut self, class: &'static NativeClassDef) {
        self.native_class = Some(class);
        for var in self.variables.iter_mut().filter(|v| v.is_native) {
            if var.binding.is_some() {
                warn!(variable = %var.name, class = class.name, "native variable already bound, rebinding");
            }
            var.binding = class.field_by_name(&var.name);
            if var.binding.is_none() {
                warn!(variable = %var.name, class = class.name, "no native field matches script variable");
            }
        }
    }

    /// False when any native variable is unbound. Callers treat a false
    /// result as a degraded script, not an error.
    pub fn check_is_valid(&self) -> bool {
        self.variables
            .iter()
            .filter(|v| v.is_native)
            .all(|v| v.binding.is_some())
    }

    /// Runs one compiled function against the given operand stack and
    /// instance. Panics on a malformed instruction stream; a script
    /// compiled by this crate's compiler never triggers that.
    pub fn execute(
        &self,
        handle: FunctionHandle,
        prog: &Program,
        state: &mut ScriptState,
        inst: &ScriptInstance,
    ) {
        machine::execute(self, handle, prog, state, inst);
    }
}
