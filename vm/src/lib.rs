pub mod disasm;
pub mod error;
pub mod instance;
pub mod machine;
pub mod native;
pub mod opcode;
pub mod program;
pub mod script;
pub mod state;
pub mod stdlib;

pub use error::InstanceError;
pub use instance::ScriptInstance;
pub use native::{NativeClassDef, NativeField, NativeFieldKind, NativeFn};
pub use opcode::OpCode;
pub use program::{FindDef, Library, LibraryDef, Program};
pub use script::{FunctionHandle, FunctionRange, Script, ScriptVariable, VariableHandle};
pub use state::ScriptState;
