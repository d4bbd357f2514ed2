//! Expression nodes
//!
//! Syntax:
//!     <expression> = <literal> | <parenthesized> | <variable>
//!     <literal> = <integer> | <float> | <string> | <boolean>
//!     <parenthesized> = "(" <expression> ")"
//!     <variable> = <identifier> ("." <identifier>)*
//!     <assignment> = <variable> <assignment-operator> <python-expression>
//!
//!     There is no operator precedence: binary and unary arithmetic only ever appears inside
//!     python spans, which are kept as raw text.

use super::super::range::Range;
use super::super::traits::{AstNode, Visitor};
use crate::renpy::token::{LiteralKind, OperatorKind};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expression {
    Literal(Literal),
    Variable(VariableReference),
    Parenthesized(Parenthesized),
    AssignmentOperation(AssignmentOperation),
    PythonExpression(PythonExpression),
}

impl Expression {
    /// The variable reference if this is a plain name.
    pub fn as_variable(&self) -> Option<&VariableReference> {
        match self {
            Expression::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn AstNode {
        match self {
            Expression::Literal(node) => node,
            Expression::Variable(node) => node,
            Expression::Parenthesized(node) => node,
            Expression::AssignmentOperation(node) => node,
            Expression::PythonExpression(node) => node,
        }
    }
}

impl AstNode for Expression {
    fn node_type(&self) -> &'static str {
        self.inner().node_type()
    }

    fn display_label(&self) -> String {
        self.inner().display_label()
    }

    fn range(&self) -> &Range {
        self.inner().range()
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_expression(self);
        self.inner().accept(visitor);
    }
}

/// A literal, with its source text kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
    pub range: Range,
}

impl Literal {
    pub fn new(kind: LiteralKind, text: impl Into<String>, range: Range) -> Self {
        Self {
            kind,
            text: text.into(),
            range,
        }
    }
}

impl AstNode for Literal {
    fn node_type(&self) -> &'static str {
        "Literal"
    }

    fn display_label(&self) -> String {
        format!("{} {}", self.kind.as_str(), self.text)
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, _visitor: &mut dyn Visitor) {}
}

/// A use of a (possibly dotted) name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableReference {
    pub name: String,
    pub range: Range,
}

impl VariableReference {
    pub fn new(name: impl Into<String>, range: Range) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}

impl AstNode for VariableReference {
    fn node_type(&self) -> &'static str {
        "Variable"
    }

    fn display_label(&self) -> String {
        self.name.clone()
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_variable(self);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parenthesized {
    pub inner: Box<Expression>,
    pub range: Range,
}

impl AstNode for Parenthesized {
    fn node_type(&self) -> &'static str {
        "Parenthesized"
    }

    fn display_label(&self) -> String {
        "( )".to_string()
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        self.inner.accept(visitor);
    }
}

/// `left OP right`. In `define`/`default` the left side is the bound name, so visitors
/// reach it through the owning statement rather than as a use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentOperation {
    pub left: Box<Expression>,
    pub operator: OperatorKind,
    pub right: Box<Expression>,
    pub range: Range,
}

impl AssignmentOperation {
    /// The assigned name, when the left side is a variable.
    pub fn target(&self) -> Option<&VariableReference> {
        self.left.as_variable()
    }
}

impl AstNode for AssignmentOperation {
    fn node_type(&self) -> &'static str {
        "AssignmentOperation"
    }

    fn display_label(&self) -> String {
        self.operator.as_str().to_string()
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        self.right.accept(visitor);
    }
}

/// An opaque python span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PythonExpression {
    pub source: String,
    /// False when brackets or a string were left open at end of input.
    pub terminated: bool,
    pub range: Range,
}

impl AstNode for PythonExpression {
    fn node_type(&self) -> &'static str {
        "PythonExpression"
    }

    fn display_label(&self) -> String {
        format!("{:?}", self.source)
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, _visitor: &mut dyn Visitor) {}
}
