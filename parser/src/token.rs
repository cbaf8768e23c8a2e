/// A single source span with the line it started on.
///
/// Tokens carry no kind: classification (number, bool, quoted string,
/// operator, identifier) happens at compile time, token by token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub line: u32,
}

impl Token {
    pub fn new(text: impl Into<String>, line: u32) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }

    #[inline]
    pub fn is(&self, s: &str) -> bool {
        self.text == s
    }
}
