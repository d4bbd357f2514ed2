//! AST node types
//!
//!     - [`document`]: the root node.
//!     - [`statement`]: the closed set of statement variants.
//!     - [`expression`]: literals, references, parenthesized and assignment expressions, and
//!       opaque python spans.

pub mod document;
pub mod expression;
pub mod statement;

pub use document::Document;
pub use expression::{
    AssignmentOperation, Expression, Literal, Parenthesized, PythonExpression, VariableReference,
};
pub use statement::{
    Call, DefaultStatement, Define, Identifier, Jump, Label, Parameter, Pass, Pause,
    PythonStatement, Return, Statement,
};
