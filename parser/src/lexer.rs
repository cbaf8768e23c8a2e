/// Single-pass O(n) tokenizer for GraphScript source code.
use crate::token::Token;

/// Splits source text into whitespace-separated spans, with the
/// punctuation characters `( ) : , [ ]` and the arrow `->` emitted as
/// standalone tokens no matter how tightly they hug their neighbors.
///
/// A lone `-` stays attached to its span so negative literals like
/// `-5` survive as one token. Lines are 1-based; a span never crosses
/// a newline. There are no error conditions: any byte that is not
/// whitespace or punctuation just accumulates into the current span.
pub fn tokenize(source: &str) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut count = 0usize;
    let mut line: u32 = 1;

    let flush = |start: usize, count: usize, line: u32, out: &mut Vec<Token>| {
        if count != 0 {
            out.push(Token::new(&source[start..start + count], line));
        }
    };

    let mut idx = 0;
    while idx < bytes.len() {
        let c = bytes[idx];
        match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                flush(start, count, line, &mut out);
                count = 0;
                if c == b'\n' {
                    line += 1;
                }
            }
            b'(' | b')' | b':' | b',' | b'[' | b']' => {
                flush(start, count, line, &mut out);
                count = 0;
                out.push(Token::new(&source[idx..idx + 1], line));
            }
            b'-' if bytes.get(idx + 1) == Some(&b'>') => {
                flush(start, count, line, &mut out);
                count = 0;
                out.push(Token::new("->", line));
                idx += 1;
            }
            _ => {
                if count == 0 {
                    start = idx;
                }
                count += 1;
            }
        }
        idx += 1;
    }
    flush(start, count, line, &mut out);
    out
}
