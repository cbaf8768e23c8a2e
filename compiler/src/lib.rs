pub mod codegen;
pub mod error;
pub mod types;

pub use codegen::compile;
pub use error::CompileError;
