//! Core token types shared across the lexer, parser, and tooling.
//!
//!     The tokenizer produces a flat array of [`Token`]s that covers the document without gaps
//!     or overlaps. Tokens do not store their text: the value is recovered by slicing the
//!     original source with the token's span, so the stream stays cheap to copy around and
//!     the source remains the single ground truth.
//!
//! Meta Spans
//!
//!     Some regions are not lexed with the Ren'Py grammar at all. An embedded python
//!     expression becomes one meta token spanning the raw text. When such a region (or a
//!     string literal) is left open at end of input, the tokenizer emits an `Invalid` meta
//!     token instead, and records which lexeme it wraps. The parser's lookahead treats an
//!     `Invalid` token as contained in that lexeme's kind, so a statement with an unterminated
//!     value still parses while the lexical error stays visible in the stream.
//!
//! Filtering
//!
//!     Whitespace and comments stay in the stream. The grammar-facing cursor hides them with
//!     a kind filter evaluated per step; see [stream](stream).

pub mod core;
pub mod kinds;
pub mod stream;

pub use self::core::Token;
pub use kinds::{
    keyword_for, CharacterKind, EntityKind, KeywordKind, LiteralKind, MetaKind, OperatorKind,
    TokenKind,
};
pub use stream::{TokenIter, TokenStream};
