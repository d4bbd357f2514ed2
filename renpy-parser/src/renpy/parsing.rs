//! Parser
//!
//!     Recursive descent over the filtered token stream. The pieces, bottom up:
//!
//!     - [`DocumentParser`] (./parsing/parser.rs): the cursor. Lookahead, consumption and the
//!       error accumulator.
//!     - [`GrammarRule`] (./parsing/rules.rs): the `test`/`parse` contract, plus the
//!       [`Alternation`] and [`AssignmentOperationRule`] composites.
//!     - Expression and statement rules (./parsing/expressions.rs, ./parsing/statements.rs).
//!
//!     Parsing never fails. It returns whatever statements it could build, partial ones
//!     included, together with the ordered list of [`ParseError`]s.
//!
//! Recovery:
//!     - A failed `require*` records an error and does not consume.
//!     - A statement that leaves tokens on its line records one `UnexpectedEndOfLine` and the
//!       rest of the line is skipped.
//!     - Lines that no statement rule recognizes are skipped without an error; they are valid
//!       Ren'Py (dialogue, displayables, menus) that this front end does not model.

pub mod error;
pub mod expressions;
pub mod parser;
pub mod rules;
pub mod statements;

pub use error::{ParseError, ParseErrorKind};
pub use parser::DocumentParser;
pub use rules::{Alternation, AssignmentOperationRule, GrammarRule};

use crate::renpy::ast::{Document, Range};
use crate::renpy::lexing::tokenize;
use crate::renpy::token::TokenStream;
use serde::Serialize;
use tracing::debug;

/// Everything produced from one source text.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutput {
    pub tokens: TokenStream,
    pub document: Document,
    pub errors: Vec<ParseError>,
}

/// Tokenize and parse a whole document.
pub fn parse_document(source: &str) -> ParseOutput {
    let tokens = tokenize(source);
    let (document, errors) = parse_tokens(source, &tokens);
    ParseOutput {
        tokens,
        document,
        errors,
    }
}

/// Parse an already tokenized document. `tokens` must have been produced from `source`.
pub fn parse_tokens(source: &str, tokens: &TokenStream) -> (Document, Vec<ParseError>) {
    let mut parser = DocumentParser::new(source, tokens);
    let statements = statements::parse_block(&mut parser, None);

    let all = tokens.flatten();
    let range = match (all.first(), all.last()) {
        (Some(first), Some(last)) => Range::new(first.start, last.end),
        _ => Range::default(),
    };
    let errors = parser.into_errors();
    debug!(
        statements = statements.len(),
        errors = errors.len(),
        "parsed document"
    );
    (Document::new(statements, range), errors)
}
