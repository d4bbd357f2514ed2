//! Shared lexing types and helpers

use crate::renpy::ast::range::Range;
use serde::Serialize;
use thiserror::Error;

/// A lexical error recovered from an `Invalid` token in the stream.
///
/// Tokenization never fails; these are derived after the fact with
/// [`TokenStream::lex_errors`](crate::renpy::token::TokenStream::lex_errors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("{kind} at {}", .range.start.to_display_string())]
pub struct LexError {
    pub kind: LexErrorKind,
    pub range: Range,
}

impl LexError {
    pub fn new(kind: LexErrorKind, range: Range) -> Self {
        Self { kind, range }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated python expression")]
    UnterminatedExpression,
    #[error("unexpected character")]
    UnexpectedCharacter,
}

/// Length of a string body up to and including its closing `quote`.
///
/// `rest` starts right after the opening quote. Backslash escapes the next character.
/// Returns `None` when the input ends before the string is closed.
pub(crate) fn string_body_len(rest: &str, quote: &str) -> Option<usize> {
    let mut chars = rest.char_indices();
    while let Some((index, c)) = chars.next() {
        if c == '\\' {
            chars.next();
            continue;
        }
        if rest[index..].starts_with(quote) {
            return Some(index + quote.len());
        }
    }
    None
}
