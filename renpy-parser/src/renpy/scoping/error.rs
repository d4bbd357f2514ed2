//! Semantic errors found during scope resolution

use super::scope::SymbolKind;
use crate::renpy::ast::range::Range;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ResolveError {
    #[error(
        "{} '{name}' is already defined at {}",
        .kind.as_str(),
        .first.start.to_display_string()
    )]
    DuplicateSymbol {
        name: String,
        kind: SymbolKind,
        range: Range,
        first: Range,
    },

    #[error("unresolved {} '{name}'", .kind.as_str())]
    UnresolvedReference {
        name: String,
        kind: SymbolKind,
        range: Range,
    },
}

impl ResolveError {
    pub fn range(&self) -> Range {
        match self {
            ResolveError::DuplicateSymbol { range, .. }
            | ResolveError::UnresolvedReference { range, .. } => *range,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ResolveError::DuplicateSymbol { name, .. }
            | ResolveError::UnresolvedReference { name, .. } => name,
        }
    }
}
