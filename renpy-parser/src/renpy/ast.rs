//! AST definitions for Ren'Py scripts
//!
//!     This module provides the typed syntax tree produced by the [parser](crate::renpy::parsing),
//!     along with the source location types every node carries.
//!
//! Document and Statements
//!
//!     A document is an ordered sequence of top-level statements. Statements are a closed set
//!     of variants (see [Statement](elements::Statement)); labels are the only statements with
//!     children, their body being the statements indented deeper than the label line.
//!
//!     Expressions are deliberately shallow: literals, variable references, parenthesized
//!     expressions and assignment operations. Anything written in python (the right side of a
//!     `define`, a `$` line) is kept as an opaque [PythonExpression](elements::PythonExpression)
//!     holding its raw text.
//!
//! Partial Nodes
//!
//!     The parser never aborts. A statement whose head was recognized but whose tail failed is
//!     still appended, with the failed parts left as `None`. Consumers (the scope resolver,
//!     the renderers) skip what is missing.
//!
//! ## How Location Tracking Works
//!
//! Every token carries start and end [`Position`]s computed once by the tokenizer through
//! [`SourceLocation`]. Nodes take their [`Range`] from the first and last token they consumed,
//! so every range lies inside the document and nested ranges are contained in their parent's.
//!
//! ## Modules
//!
//! - `range` - Position and Range types for source code locations
//! - `elements` - AST node type definitions
//! - `traits` - The [`AstNode`] and [`Visitor`] traits

pub mod elements;
pub mod range;
pub mod traits;

pub use elements::{
    AssignmentOperation, Call, DefaultStatement, Define, Document, Expression, Identifier, Jump,
    Label, Literal, Parameter, Parenthesized, Pass, Pause, PythonExpression, PythonStatement,
    Return, Statement, VariableReference,
};
pub use range::{Position, Range, SourceLocation};
pub use traits::{AstNode, Visitor};
