//! # renpy-parser
//!
//! Language front end for Ren'Py scripts, built for editor tooling.
//!
//! File Layout
//!
//! The crate follows the stages a document goes through, each in its own module under
//! `src/renpy`:
//!
//! src/renpy
//!   ├── lexing       Source text to token stream (logos core + embedded python spans)
//!   ├── token        Token kinds, the token stream and its filtered cursor
//!   ├── parsing      Document parser (cursor), grammar rule engine, statement grammar
//!   ├── ast          Typed statements/expressions and source ranges
//!   ├── scoping      Scope tree and symbol resolution
//!   ├── diagnostics  Unified, severity-tagged view over every error family
//!   ├── analysis     One-call facade and navigation queries
//!   └── formats      Debug renderers (tokens, treeviz)
//!
//! Every stage accumulates its errors instead of failing: a document always produces a
//! token stream, a best-effort AST and a symbol index, no matter how broken it is.
//!
//! For testing conventions see the [testing module](renpy::testing).

pub mod renpy;

pub use renpy::analysis::{analyze, Analysis, AnalysisOptions};
