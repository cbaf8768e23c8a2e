pub mod classify;
pub mod lexer;
pub mod token;

pub use classify::{classify_number, is_bool_literal, is_quoted, NumberKind};
pub use lexer::tokenize;
pub use token::Token;
