//! String literal scanning.
//!
//! A string body may hold `${…}` segments, and a segment may hold string
//! literals of its own, so the end of a literal is found by walking the
//! nesting instead of by a regular expression.

/// Byte index just past the closing quote of a string body starting at
/// `from` (the byte after the opening quote), or `None` if the input ends
/// first.
///
/// A `${` whose segment never closes is read as plain text, leaving the
/// parser to report it.
pub(crate) fn string_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i + 1),
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                i = match close_brace(bytes, i + 2) {
                    Some(brace) => brace + 1,
                    None => i + 2,
                };
            }
            _ => i += 1,
        }
    }
    None
}

/// Byte index of the `}` closing a `${` segment whose body starts at `from`.
///
/// Braces nest, and string literals inside the segment are skipped whole.
pub fn segment_end(body: &str, from: usize) -> Option<usize> {
    close_brace(body.as_bytes(), from)
}

fn close_brace(bytes: &[u8], from: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i = string_end(bytes, i + 1)?;
                continue;
            }
            b'{' => depth += 1,
            b'}' if depth == 0 => return Some(i),
            b'}' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end(literal: &str) -> Option<usize> {
        string_end(literal.as_bytes(), 1)
    }

    #[test]
    fn test_plain_and_escaped_quotes() {
        assert_eq!(end(r#""abc" tail"#), Some(5));
        assert_eq!(end(r#""a\"b" tail"#), Some(6));
        assert_eq!(end(r#""open"#), None);
    }

    #[test]
    fn test_nested_literal_in_segment() {
        let literal = r#""a${ "x${2}" }b""#;
        assert_eq!(end(literal), Some(literal.len()));
    }

    #[test]
    fn test_unclosed_segment_is_text() {
        assert_eq!(end(r#""a ${1 + 2" x"#), Some(11));
    }

    #[test]
    fn test_segment_end() {
        assert_eq!(segment_end("${ {1} }", 2), Some(7));
        assert_eq!(segment_end(r#"${ "}" }"#, 2), Some(7));
        assert_eq!(segment_end("${ 1", 2), None);
    }
}
