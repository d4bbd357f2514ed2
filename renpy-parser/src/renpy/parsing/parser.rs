//! The document parser cursor
//!
//!     [`DocumentParser`] owns a filtered [`TokenIter`], the last consumed token, the
//!     lookahead token and the error accumulator. Grammar rules hold no state of their own;
//!     everything they know about the input they learn through this cursor.
//!
//!     Conventions:
//!     - `test*` methods look at the lookahead only and never change anything.
//!     - `require*` methods consume on success and record an `UnexpectedToken` error on
//!       failure, without consuming.
//!     - `optional*` methods consume on success and do nothing on failure.
//!     - Advancing past the end of the input records `UnexpectedEndOfFile` once and leaves
//!       the cursor terminal.
//!     - Recursive rules bracket themselves with `enter_nested`/`leave_nested`. Nesting is
//!       capped at [`MAX_NESTING`] levels, which bounds the depth of every tree built here.

use super::error::{ParseError, ParseErrorKind};
use super::rules::GrammarRule;
use crate::renpy::ast::range::{Position, Range};
use crate::renpy::token::{Token, TokenIter, TokenKind, TokenStream};

/// Kinds hidden from the grammar.
pub const DEFAULT_FILTER: [TokenKind; 2] = [TokenKind::COMMENT, TokenKind::WHITESPACE];

/// Deepest nesting of parentheses and labels the parser descends into.
pub const MAX_NESTING: usize = 100;

pub struct DocumentParser<'a> {
    source: &'a str,
    iter: TokenIter<'a>,
    current: Option<&'a Token>,
    consumed: usize,
    terminal: bool,
    depth: usize,
    errors: Vec<ParseError>,
}

impl<'a> DocumentParser<'a> {
    pub fn new(source: &'a str, tokens: &'a TokenStream) -> Self {
        let mut iter = tokens.iter();
        iter.set_filter(DEFAULT_FILTER);
        Self {
            source,
            iter,
            current: None,
            consumed: 0,
            terminal: false,
            depth: 0,
            errors: Vec::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn has_next(&self) -> bool {
        self.iter.has_next()
    }

    /// The last consumed token.
    pub fn current(&self) -> Option<&'a Token> {
        self.current
    }

    /// The lookahead token.
    pub fn peek_next(&self) -> Option<&'a Token> {
        self.iter.peek()
    }

    /// Number of tokens consumed so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Text of the last consumed token.
    pub fn current_value(&self) -> &'a str {
        self.current
            .map(|token| token.value(self.source))
            .unwrap_or_default()
    }

    /// Consume the lookahead token.
    pub fn advance(&mut self) -> Option<&'a Token> {
        match self.iter.advance() {
            Some(token) => {
                self.current = Some(token);
                self.consumed += 1;
                Some(token)
            }
            None => {
                if !self.terminal {
                    self.terminal = true;
                    self.record(ParseErrorKind::UnexpectedEndOfFile, Vec::new());
                }
                None
            }
        }
    }

    /// True if the lookahead token is of `kind`, including invalid spans wrapping `kind`.
    pub fn test(&self, kind: TokenKind) -> bool {
        self.peek_next().is_some_and(|token| token.has_kind(kind))
    }

    /// True if the lookahead token's text is exactly `text`.
    pub fn test_value(&self, text: &str) -> bool {
        self.peek_next()
            .is_some_and(|token| token.value(self.source) == text)
    }

    /// True if the lookahead can be read as a plain name: an identifier or any keyword.
    ///
    /// Ren'Py only reserves keywords where a statement starts, so attribute segments such as
    /// `config.window` and label names such as `screen` are ordinary names.
    pub fn test_name(&self) -> bool {
        self.peek_next().is_some_and(|token| {
            token.has_kind(TokenKind::IDENTIFIER) || matches!(token.kind, TokenKind::Keyword(_))
        })
    }

    /// Consume a name as accepted by [`test_name`](Self::test_name).
    pub fn require_name(&mut self) -> Option<&'a Token> {
        if self.test_name() {
            self.advance()
        } else {
            self.record(ParseErrorKind::UnexpectedToken, vec![TokenKind::IDENTIFIER]);
            None
        }
    }

    pub fn require_token(&mut self, kind: TokenKind) -> Option<&'a Token> {
        if self.test(kind) {
            self.advance()
        } else {
            self.record(ParseErrorKind::UnexpectedToken, vec![kind]);
            None
        }
    }

    pub fn optional_token(&mut self, kind: TokenKind) -> Option<&'a Token> {
        if self.test(kind) {
            self.advance()
        } else {
            None
        }
    }

    /// Consume the lookahead if it is any of `kinds`; the first listed kind that matches wins.
    pub fn any_of_token(&mut self, kinds: &[TokenKind]) -> Option<&'a Token> {
        if kinds.iter().any(|kind| self.test(*kind)) {
            self.advance()
        } else {
            self.record(ParseErrorKind::UnexpectedToken, kinds.to_vec());
            None
        }
    }

    /// Require the end of the current line.
    ///
    /// A newline is consumed; the end of the input also counts. Anything else records a
    /// single `UnexpectedEndOfLine` and skips past the next newline. Either way the cursor
    /// ends at the start of a line or at the end of the input.
    pub fn expect_eol(&mut self) -> bool {
        if !self.has_next() {
            return true;
        }
        if self.optional_token(TokenKind::NEWLINE).is_some() {
            return true;
        }
        self.record(ParseErrorKind::UnexpectedEndOfLine, vec![TokenKind::NEWLINE]);
        self.skip_to_eol();
        false
    }

    /// Consume tokens up to and including the next newline, without recording anything.
    pub fn skip_to_eol(&mut self) {
        while let Some(token) = self.peek_next() {
            self.advance();
            if token.kind == TokenKind::NEWLINE {
                break;
            }
        }
    }

    /// Consume tokens up to, but not including, the next newline.
    pub fn skip_rest_of_line(&mut self) {
        while self.peek_next().is_some() && !self.test(TokenKind::NEWLINE) {
            self.advance();
        }
    }

    pub fn skip_empty_lines(&mut self) {
        while self.optional_token(TokenKind::NEWLINE).is_some() {}
    }

    /// Column of the lookahead token. At the start of a line this is its indentation.
    pub fn line_indent(&self) -> usize {
        self.peek_next().map(|token| token.start.column).unwrap_or(0)
    }

    /// Range from `start` to the end of the last consumed token.
    pub fn range_from(&self, start: Position) -> Range {
        let end = self.current.map(|token| token.end).unwrap_or(start);
        Range::new(start, end.max(start))
    }

    pub fn require<R>(&mut self, rule: &R) -> Option<R::Output>
    where
        R: GrammarRule + ?Sized,
    {
        if rule.test(self) {
            rule.parse(self)
        } else {
            self.record(ParseErrorKind::UnexpectedToken, Vec::new());
            None
        }
    }

    pub fn optional<R>(&mut self, rule: &R) -> Option<R::Output>
    where
        R: GrammarRule + ?Sized,
    {
        if rule.test(self) {
            rule.parse(self)
        } else {
            None
        }
    }

    /// Descend one nesting level.
    ///
    /// At [`MAX_NESTING`] this records an `UnexpectedToken` at the lookahead and returns
    /// false without descending; the caller must not recurse. Every successful call must be
    /// paired with [`leave_nested`](Self::leave_nested).
    pub fn enter_nested(&mut self) -> bool {
        if self.depth >= MAX_NESTING {
            self.record(ParseErrorKind::UnexpectedToken, Vec::new());
            return false;
        }
        self.depth += 1;
        true
    }

    pub fn leave_nested(&mut self) {
        debug_assert!(self.depth > 0, "leave_nested without a matching enter_nested");
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Record an `UnexpectedToken` at the lookahead for a composite that matched nothing.
    pub(crate) fn record_unexpected(&mut self) {
        self.record(ParseErrorKind::UnexpectedToken, Vec::new());
    }

    /// Parse with the first rule whose test passes.
    pub fn any_of<T>(&mut self, rules: &[&dyn GrammarRule<Output = T>]) -> Option<T> {
        match rules.iter().find(|rule| rule.test(self)) {
            Some(rule) => rule.parse(self),
            None => {
                self.record_unexpected();
                None
            }
        }
    }

    fn record(&mut self, kind: ParseErrorKind, expected: Vec<TokenKind>) {
        let error = ParseError::new(
            kind,
            self.current.copied(),
            self.peek_next().copied(),
            expected,
        );
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }
}
