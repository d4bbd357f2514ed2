//! Token stream and its filtered cursor
//!
//!     [`TokenStream`] is the immutable output of tokenization: a flat, ordered array of
//!     tokens addressed by index. It is never restructured. Consumers that want to ignore
//!     some kinds (the parser hides whitespace and comments) get a [`TokenIter`] and install
//!     a filter on it; the filter is a kind-membership test evaluated on every step, so the
//!     underlying array is untouched and [`TokenStream::flatten`] always returns everything.
//!
//!     The cursor is strictly forward-only.

use super::core::Token;
use super::kinds::TokenKind;
use crate::renpy::ast::range::Position;
use crate::renpy::lexing::{LexError, LexErrorKind};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// A forward-only cursor over the stream, with no filter installed.
    pub fn iter(&self) -> TokenIter<'_> {
        TokenIter::new(&self.tokens)
    }

    /// The full, unfiltered token sequence in document order.
    pub fn flatten(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Concatenate every token's text. For a stream produced from `source` this gives
    /// `source` back.
    pub fn reconstruct(&self, source: &str) -> String {
        self.tokens.iter().map(|token| token.value(source)).collect()
    }

    /// The token whose span contains `position`, preferring the token that starts there.
    pub fn token_at(&self, position: Position) -> Option<&Token> {
        let index = self
            .tokens
            .partition_point(|token| token.end.offset <= position.offset);
        self.tokens
            .get(index)
            .filter(|token| token.start.offset <= position.offset)
    }

    /// Lexical errors, one per `Invalid` token.
    pub fn lex_errors(&self) -> Vec<LexError> {
        self.tokens
            .iter()
            .filter(|token| token.is_invalid())
            .map(|token| {
                let kind = match token.wrapped {
                    Some(TokenKind::PYTHON_EXPRESSION) => LexErrorKind::UnterminatedExpression,
                    Some(_) => LexErrorKind::UnterminatedString,
                    None => LexErrorKind::UnexpectedCharacter,
                };
                LexError::new(kind, token.range())
            })
            .collect()
    }
}

/// Forward-only cursor over a token slice with an optional kind filter.
#[derive(Debug, Clone)]
pub struct TokenIter<'a> {
    tokens: &'a [Token],
    position: usize,
    filter: HashSet<TokenKind>,
}

impl<'a> TokenIter<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            filter: HashSet::new(),
        }
    }

    /// Replace the filter. Tokens whose kind is in `kinds` are skipped by every later
    /// `peek`/`advance`.
    pub fn set_filter<I>(&mut self, kinds: I)
    where
        I: IntoIterator<Item = TokenKind>,
    {
        self.filter = kinds.into_iter().collect();
        self.settle();
    }

    pub fn has_next(&self) -> bool {
        self.position < self.tokens.len()
    }

    /// The next visible token, without consuming it.
    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    /// Consume and return the next visible token.
    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        self.settle();
        Some(token)
    }

    // Invariant: after settle, `position` is at the end or on a token outside the filter.
    fn settle(&mut self) {
        while let Some(token) = self.tokens.get(self.position) {
            if !self.filter.contains(&token.kind) {
                break;
            }
            self.position += 1;
        }
    }
}

impl<'a> Iterator for TokenIter<'a> {
    type Item = &'a Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}
