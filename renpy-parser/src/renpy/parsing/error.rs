//! Parse errors
//!
//!     Errors are accumulated by the [cursor](super::DocumentParser), never thrown. Each one
//!     snapshots the cursor: the last consumed token and the lookahead token at the moment
//!     the grammar gave up.

use crate::renpy::ast::range::{Position, Range};
use crate::renpy::token::{Token, TokenKind};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    UnexpectedToken,
    UnexpectedEndOfLine,
    UnexpectedEndOfFile,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", describe(.kind, .expected, .current, .next))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// The last consumed token.
    pub current: Option<Token>,
    /// The lookahead token; `None` at end of input.
    pub next: Option<Token>,
    /// Acceptable kinds at this point. Empty when the grammar expected a whole rule.
    pub expected: Vec<TokenKind>,
}

impl ParseError {
    pub fn new(
        kind: ParseErrorKind,
        current: Option<Token>,
        next: Option<Token>,
        expected: Vec<TokenKind>,
    ) -> Self {
        Self {
            kind,
            current,
            next,
            expected,
        }
    }

    /// Where the error is reported: the lookahead token, or the end of the last consumed
    /// token when the input is exhausted.
    pub fn position(&self) -> Position {
        report_position(&self.current, &self.next)
    }

    pub fn range(&self) -> Range {
        match &self.next {
            Some(next) => next.range(),
            None => Range::empty_at(self.position()),
        }
    }
}

fn report_position(current: &Option<Token>, next: &Option<Token>) -> Position {
    match (next, current) {
        (Some(next), _) => next.start,
        (None, Some(current)) => current.end,
        (None, None) => Position::default(),
    }
}

fn describe(
    kind: &ParseErrorKind,
    expected: &[TokenKind],
    current: &Option<Token>,
    next: &Option<Token>,
) -> String {
    let actual = next
        .map(|token| token.kind.name())
        .unwrap_or("end of file");
    let at = report_position(current, next).to_display_string();
    if expected.is_empty() {
        return match kind {
            ParseErrorKind::UnexpectedEndOfFile => format!("Unexpected end of file at {}", at),
            _ => format!("Unexpected token '{}' at {}", actual, at),
        };
    }
    let expected: Vec<&str> = expected.iter().map(|kind| kind.name()).collect();
    format!(
        "Expected token of type '{}', but got '{}' at {}",
        expected.join("' or '"),
        actual,
        at
    )
}
