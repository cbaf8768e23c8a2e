pub mod kinds;
pub mod name;
pub mod value;

#[cfg(test)]
mod value_tests;

pub use kinds::{CompileResult, ValueKind};
pub use name::{name_hash, Name};
pub use value::ScriptValue;
