//! The positioned token

use super::kinds::TokenKind;
use crate::renpy::ast::range::{Position, Range};
use serde::Serialize;
use std::ops::Range as ByteRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub start: Position,
    pub end: Position,
    /// For `Invalid` tokens, the kind of the lexeme that was left unterminated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapped: Option<TokenKind>,
}

impl Token {
    pub fn new(kind: TokenKind, start: Position, end: Position) -> Self {
        Self {
            kind,
            start,
            end,
            wrapped: None,
        }
    }

    /// An `Invalid` meta token standing in for an unterminated `wrapped` lexeme.
    pub fn invalid_wrapping(wrapped: TokenKind, start: Position, end: Position) -> Self {
        Self {
            kind: TokenKind::INVALID,
            start,
            end,
            wrapped: Some(wrapped),
        }
    }

    pub fn range(&self) -> Range {
        Range::new(self.start, self.end)
    }

    pub fn span(&self) -> ByteRange<usize> {
        self.start.offset..self.end.offset
    }

    /// The token's text, sliced out of the source it was produced from.
    pub fn value<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.span()).unwrap_or_default()
    }

    /// True if the token is of `kind`, or is an invalid span wrapping a lexeme of `kind`.
    pub fn has_kind(&self, kind: TokenKind) -> bool {
        self.kind == kind || self.wrapped == Some(kind)
    }

    pub fn is_invalid(&self) -> bool {
        self.kind == TokenKind::INVALID
    }
}
