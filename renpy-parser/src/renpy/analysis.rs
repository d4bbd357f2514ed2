//! Analysis facade
//!
//!     One call runs the whole front end over a source text: tokenize, parse, resolve. The
//!     resulting [`Analysis`] owns every intermediate product and answers the navigation
//!     queries editor tooling asks (what is at this position, where is it defined, where is
//!     it used) plus the unified diagnostic list.

use super::ast::range::{Position, Range, SourceLocation};
use super::ast::Document;
use super::diagnostics::{self, Diagnostic};
use super::lexing::{tokenize, LexError};
use super::parsing::{parse_tokens, ParseError};
use super::scoping::{resolve, ResolveError, ScopeTree, Symbol};
use super::token::{Token, TokenStream};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Names every script can use without defining them.
pub const DEFAULT_BUILTINS: &[&str] = &[
    "renpy",
    "config",
    "persistent",
    "store",
    "preferences",
    "gui",
    "build",
    "im",
    "ui",
    "achievement",
    "updater",
    "director",
    "None",
    "Character",
    "Transform",
    "Dissolve",
    "Fade",
    "Solid",
    "Text",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Names pre-bound as variables in the global scope.
    pub builtins: Vec<String>,
    /// Report uses that resolve to nothing. Off for projects split over many files.
    pub report_unresolved: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            builtins: DEFAULT_BUILTINS.iter().map(|name| name.to_string()).collect(),
            report_unresolved: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub tokens: TokenStream,
    pub document: Document,
    pub lex_errors: Vec<LexError>,
    pub parse_errors: Vec<ParseError>,
    pub symbols: ScopeTree,
    pub resolve_errors: Vec<ResolveError>,
    #[serde(skip)]
    location: SourceLocation,
}

/// Tokenize, parse and resolve `source`.
pub fn analyze(source: &str, options: &AnalysisOptions) -> Analysis {
    let tokens = tokenize(source);
    let lex_errors = tokens.lex_errors();
    let (document, parse_errors) = parse_tokens(source, &tokens);
    let resolution = resolve(&document, options);
    debug!(
        lex_errors = lex_errors.len(),
        parse_errors = parse_errors.len(),
        resolve_errors = resolution.errors.len(),
        "analysis complete"
    );
    Analysis {
        tokens,
        document,
        lex_errors,
        parse_errors,
        symbols: resolution.tree,
        resolve_errors: resolution.errors,
        location: SourceLocation::new(source),
    }
}

impl Analysis {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        diagnostics::collect(&self.lex_errors, &self.parse_errors, &self.resolve_errors)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics().iter().any(Diagnostic::is_error)
    }

    /// Convert a zero-based line and column to a position in this document.
    pub fn position(&self, line: usize, column: usize) -> Option<Position> {
        self.location.line_column_to_position(line, column)
    }

    pub fn token_at(&self, position: Position) -> Option<&Token> {
        self.tokens.token_at(position)
    }

    /// The symbol defined or used at `position`.
    pub fn symbol_at(&self, position: Position) -> Option<&Symbol> {
        self.symbols.symbol_at(position)
    }

    /// Where the symbol at `position` is defined. Builtins have no definition.
    pub fn definition_at(&self, position: Position) -> Option<Range> {
        self.symbol_at(position).and_then(|symbol| symbol.definition)
    }

    /// Every use of the symbol at `position`, in source order, optionally preceded by its
    /// definition.
    pub fn references_at(&self, position: Position, include_definition: bool) -> Vec<Range> {
        let Some(symbol) = self.symbol_at(position) else {
            return Vec::new();
        };
        let definition = symbol.definition.filter(|_| include_definition);
        definition
            .into_iter()
            .chain(symbol.references.iter().copied())
            .collect()
    }
}
