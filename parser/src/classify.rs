//! Literal classification for single tokens.
//!
//! The tokenizer is untyped, so every leaf token gets classified here at
//! compile time: numeric literal, bool literal, quoted name, or neither.

/// What a numeric literal parses as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberKind {
    Int,
    Float,
}

/// Classifies a token as a numeric literal, or `None` if it is not one.
///
/// A leading `-` is allowed. A trailing `f` suffix is only accepted when
/// the digits contain a decimal point, so `5.0f` is a float but `5f` is
/// not a number at all. A bare `5.` counts as a float.
pub fn classify_number(token: &str) -> Option<NumberKind> {
    let bytes = token.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let start = usize::from(bytes[0] == b'-');
    let mut end = bytes.len();
    let back_had_float = bytes[end - 1] == b'f';
    if back_had_float {
        end -= 1;
    }

    let mut any_digit = false;
    let mut seen_decimal = false;
    for &b in bytes.get(start..end)? {
        if b == b'.' {
            if seen_decimal {
                return None;
            }
            seen_decimal = true;
        } else if !b.is_ascii_digit() {
            return None;
        } else {
            any_digit = true;
        }
    }
    if !any_digit || (back_had_float && !seen_decimal) {
        return None;
    }
    Some(if seen_decimal {
        NumberKind::Float
    } else {
        NumberKind::Int
    })
}

/// True for `true`/`false` in any letter case.
pub fn is_bool_literal(token: &str) -> bool {
    token.eq_ignore_ascii_case("true") || token.eq_ignore_ascii_case("false")
}

/// True when the token starts and ends with a single or double quote.
pub fn is_quoted(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.len() < 2 {
        return false;
    }
    let quote = |b: u8| b == b'"' || b == b'\'';
    quote(bytes[0]) && quote(bytes[bytes.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(classify_number("5"), Some(NumberKind::Int));
        assert_eq!(classify_number("-12"), Some(NumberKind::Int));
        assert_eq!(classify_number("007"), Some(NumberKind::Int));
    }

    #[test]
    fn floats() {
        assert_eq!(classify_number("5.0"), Some(NumberKind::Float));
        assert_eq!(classify_number("5.0f"), Some(NumberKind::Float));
        assert_eq!(classify_number("-0.25"), Some(NumberKind::Float));
        assert_eq!(classify_number("5."), Some(NumberKind::Float));
    }

    #[test]
    fn float_suffix_requires_decimal_point() {
        assert_eq!(classify_number("5f"), None);
        assert_eq!(classify_number("-5f"), None);
    }

    #[test]
    fn rejects_non_numbers() {
        assert_eq!(classify_number("abc"), None);
        assert_eq!(classify_number("1.2.3"), None);
        assert_eq!(classify_number("-"), None);
        assert_eq!(classify_number("."), None);
        assert_eq!(classify_number(""), None);
        assert_eq!(classify_number("1a"), None);
    }

    #[test]
    fn bool_literals_ignore_case() {
        assert!(is_bool_literal("true"));
        assert!(is_bool_literal("FALSE"));
        assert!(is_bool_literal("True"));
        assert!(!is_bool_literal("truthy"));
    }

    #[test]
    fn quoted_tokens() {
        assert!(is_quoted("\"name\""));
        assert!(is_quoted("'name'"));
        assert!(is_quoted("\"x'"));
        assert!(!is_quoted("name"));
        assert!(!is_quoted("\""));
    }
}
