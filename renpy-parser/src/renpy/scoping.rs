//! Scope and symbol resolution
//!
//!     Runs after parsing and links definitions to their uses. The result is a
//!     [`ScopeTree`]: a global scope, one child scope per label, and every symbol with its
//!     definition range and its references in source order. Problems are recorded as
//!     [`ResolveError`]s; the pass itself cannot fail.
//!
//!     See [resolver](resolver) for the binding rules.

pub mod error;
pub mod resolver;
pub mod scope;

pub use error::ResolveError;
pub use resolver::{resolve, Resolution};
pub use scope::{Scope, ScopeId, ScopeTree, Symbol, SymbolId, SymbolKind};
