//! Embedded python expression scanning
//!
//!     Python expressions are opaque to the Ren'Py grammar: the tokenizer hands them to this
//!     scanner, which only needs to find where the expression ends. It tracks bracket depth
//!     and skips over string literals; at depth zero the expression ends at a newline or a
//!     comment. A backslash before a newline continues the expression on the next line, and
//!     inside brackets newlines never end it.
//!
//!     The reported length never includes trailing whitespace, so whitespace and comments
//!     after the expression are left for the regular lexer.
//!
//!     A subscript such as the `"eileen"` in `define config.tag_layer["eileen"] = "master"` is
//!     scanned the same way, except that an unmatched `]` also ends it.

use super::common::string_body_len;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PythonScan {
    /// The expression occupies this many bytes. Zero means there was no expression.
    Complete(usize),
    /// A bracket or string was never closed; the span runs to the end of the input.
    Unterminated(usize),
}

impl PythonScan {
    pub fn len(&self) -> usize {
        match self {
            PythonScan::Complete(len) | PythonScan::Unterminated(len) => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scan the python expression at the start of `text`.
pub fn scan_python_expression(text: &str) -> PythonScan {
    scan(text, None)
}

/// Scan the python subscript at the start of `text`, which follows an opening `[`.
pub fn scan_python_index(text: &str) -> PythonScan {
    scan(text, Some(']'))
}

fn scan(text: &str, closing: Option<char>) -> PythonScan {
    let mut depth = 0usize;
    let mut index = 0usize;
    let mut end = 0usize;

    while let Some(c) = text[index..].chars().next() {
        match c {
            '\n' if depth == 0 => break,
            c if depth == 0 && Some(c) == closing => break,
            '\r' if depth == 0 && text[index + 1..].starts_with('\n') => break,
            '#' if depth == 0 => break,
            '#' => {
                index += text[index..].find('\n').unwrap_or(text.len() - index);
                continue;
            }
            '"' | '\'' => {
                let rest = &text[index..];
                let quote = if rest.starts_with("\"\"\"") {
                    "\"\"\""
                } else if rest.starts_with("'''") {
                    "'''"
                } else if c == '"' {
                    "\""
                } else {
                    "'"
                };
                match string_body_len(&rest[quote.len()..], quote) {
                    Some(len) => {
                        index += quote.len() + len;
                        end = index;
                        continue;
                    }
                    None => return PythonScan::Unterminated(text.len()),
                }
            }
            '\\' => {
                index += 1;
                end = index;
                let rest = &text[index..];
                if rest.starts_with("\r\n") {
                    index += 2;
                } else if rest.starts_with('\n') {
                    index += 1;
                }
                continue;
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        index += c.len_utf8();
        if !c.is_whitespace() {
            end = index;
        }
    }

    if depth > 0 {
        PythonScan::Unterminated(text.len())
    } else {
        PythonScan::Complete(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("5\n", 1)]
    #[case("5", 1)]
    #[case("a + b   \n", 5)]
    #[case("a + b  # note\n", 5)]
    #[case("\n", 0)]
    #[case("", 0)]
    #[case("f(1,\n  2)\nnext", 9)]
    #[case("'#' + x # real\n", 7)]
    #[case("\"\"\"a\nb\"\"\" + 1\n", 13)]
    #[case("1 + \\\n 2\n", 8)]
    #[case("[1, # inner\n 2]\n", 15)]
    #[case("x)\n", 2)]
    #[case("a\r\nb", 1)]
    #[case("ü + 1\n", 6)]
    fn test_complete(#[case] text: &str, #[case] len: usize) {
        assert_eq!(scan_python_expression(text), PythonScan::Complete(len));
    }

    #[rstest]
    #[case("f(1,\n2\n")]
    #[case("'open\n")]
    #[case("{'a': \"b\n")]
    fn test_unterminated_runs_to_end(#[case] text: &str) {
        assert_eq!(
            scan_python_expression(text),
            PythonScan::Unterminated(text.len())
        );
    }

    #[rstest]
    #[case("\"eileen\"] = \"master\"\n", 8)]
    #[case(" key ] = 1\n", 4)]
    #[case("d[k]] = 1\n", 4)]
    #[case("']'] = 1\n", 3)]
    #[case("] = 1\n", 0)]
    #[case("open = 1\n", 8)]
    fn test_index_ends_at_unmatched_bracket(#[case] text: &str, #[case] len: usize) {
        assert_eq!(scan_python_index(text), PythonScan::Complete(len));
    }

    #[test]
    fn test_expression_is_not_ended_by_bracket() {
        assert_eq!(scan_python_expression("x] = 1\n"), PythonScan::Complete(6));
    }

    #[test]
    fn test_empty_scan() {
        assert!(scan_python_expression("  # only a comment").is_empty());
    }
}
