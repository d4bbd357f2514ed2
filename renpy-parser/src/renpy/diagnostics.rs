//! Diagnostic collection for editor tooling
//!
//! Lexical, syntactic and semantic problems are each recorded by the stage that found them,
//! in that stage's own error type. This module flattens them into one `Diagnostic` shape,
//! matching the LSP protocol, sorted by position.
//!
//! ## Codes
//!
//! | Code                   | Severity | Stage     |
//! |------------------------|----------|-----------|
//! | unterminated-string    | Error    | lexing    |
//! | unterminated-python    | Error    | lexing    |
//! | unexpected-character   | Error    | lexing    |
//! | unexpected-token       | Error    | parsing   |
//! | unexpected-end-of-line | Error    | parsing   |
//! | unexpected-end-of-file | Error    | parsing   |
//! | duplicate-symbol       | Error    | resolving |
//! | unresolved-reference   | Warning  | resolving |

use super::ast::range::Range;
use super::lexing::{LexError, LexErrorKind};
use super::parsing::{ParseError, ParseErrorKind};
use super::scoping::ResolveError;
use serde::Serialize;
use std::fmt;

pub const SOURCE: &str = "renpy-parser";

/// Diagnostic severity levels matching LSP protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Information => write!(f, "info"),
            DiagnosticSeverity::Hint => write!(f, "hint"),
        }
    }
}

/// Structured diagnostic for LSP consumption
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub code: Option<String>,
    pub source: String,
}

impl Diagnostic {
    pub fn new(range: Range, severity: DiagnosticSeverity, message: String) -> Self {
        Self {
            range,
            severity,
            message,
            code: None,
            source: SOURCE.to_string(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {} at {}",
            self.severity,
            self.code.as_deref().unwrap_or(&self.source),
            self.message,
            self.range.start.to_display_string()
        )
    }
}

impl From<&LexError> for Diagnostic {
    fn from(error: &LexError) -> Self {
        let code = match error.kind {
            LexErrorKind::UnterminatedString => "unterminated-string",
            LexErrorKind::UnterminatedExpression => "unterminated-python",
            LexErrorKind::UnexpectedCharacter => "unexpected-character",
        };
        Diagnostic::new(error.range, DiagnosticSeverity::Error, error.kind.to_string())
            .with_code(code)
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(error: &ParseError) -> Self {
        let code = match error.kind {
            ParseErrorKind::UnexpectedToken => "unexpected-token",
            ParseErrorKind::UnexpectedEndOfLine => "unexpected-end-of-line",
            ParseErrorKind::UnexpectedEndOfFile => "unexpected-end-of-file",
        };
        Diagnostic::new(error.range(), DiagnosticSeverity::Error, error.to_string())
            .with_code(code)
    }
}

impl From<&ResolveError> for Diagnostic {
    fn from(error: &ResolveError) -> Self {
        let (severity, code) = match error {
            ResolveError::DuplicateSymbol { .. } => {
                (DiagnosticSeverity::Error, "duplicate-symbol")
            }
            ResolveError::UnresolvedReference { .. } => {
                (DiagnosticSeverity::Warning, "unresolved-reference")
            }
        };
        Diagnostic::new(error.range(), severity, error.to_string()).with_code(code)
    }
}

/// Merge the errors of every stage into one list ordered by position, then severity.
///
/// Parse errors reported at an invalid token are dropped when that token already produced
/// a lexical diagnostic, so each bad span is reported once.
pub fn collect(
    lex_errors: &[LexError],
    parse_errors: &[ParseError],
    resolve_errors: &[ResolveError],
) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = lex_errors.iter().map(Diagnostic::from).collect();
    diagnostics.extend(
        parse_errors
            .iter()
            .filter(|error| !error.next.is_some_and(|token| token.is_invalid()))
            .map(Diagnostic::from),
    );
    diagnostics.extend(resolve_errors.iter().map(Diagnostic::from));
    diagnostics.sort_by(|a, b| {
        a.range
            .start
            .cmp(&b.range.start)
            .then(a.severity.cmp(&b.severity))
    });
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renpy::ast::range::Position;
    use crate::renpy::scoping::SymbolKind;

    fn range(line: usize, column: usize) -> Range {
        let start = Position::new(line, column, line * 10 + column);
        Range::new(start, Position::new(line, column + 1, start.offset + 1))
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(
            range(0, 5),
            DiagnosticSeverity::Warning,
            "unresolved function 'x'".to_string(),
        )
        .with_code("unresolved-reference");
        assert_eq!(
            diagnostic.to_string(),
            "warning [unresolved-reference]: unresolved function 'x' at 1:6"
        );
    }

    #[test]
    fn test_collect_orders_by_position() {
        let lex = [LexError::new(LexErrorKind::UnexpectedCharacter, range(2, 0))];
        let resolve = [ResolveError::UnresolvedReference {
            name: "start".to_string(),
            kind: SymbolKind::Function,
            range: range(0, 5),
        }];
        let diagnostics = collect(&lex, &[], &resolve);
        let codes: Vec<_> = diagnostics.iter().map(|d| d.code.as_deref()).collect();
        assert_eq!(
            codes,
            vec![Some("unresolved-reference"), Some("unexpected-character")]
        );
        assert!(!diagnostics[0].is_error());
        assert!(diagnostics[1].is_error());
    }
}
