use thiserror::Error;

/// A compile failure: what went wrong and the 1-based source line it was
/// detected on. Aborts only the current compile call; the caller may fix
/// the source and retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("[line {line}] {message}")]
pub struct CompileError {
    pub message: String,
    pub line: u32,
}

impl CompileError {
    pub fn new(message: impl Into<String>, line: u32) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}
