//! AST traits - Common interfaces for uniform node access

use super::elements::{Call, DefaultStatement, Define, Expression, Jump, Label, VariableReference};
use super::range::{Position, Range};

/// Visitor trait for traversing the AST
///
/// Each visit method corresponds to a node type that carries names. Default implementations
/// are empty, so you only need to override the methods you care about. Nodes call their
/// visit method before visiting their children; labels additionally call
/// [`leave_label`](Visitor::leave_label) after their body.
pub trait Visitor {
    fn visit_define(&mut self, _define: &Define) {}
    fn visit_default(&mut self, _default: &DefaultStatement) {}
    fn visit_label(&mut self, _label: &Label) {}
    fn leave_label(&mut self, _label: &Label) {}
    fn visit_jump(&mut self, _jump: &Jump) {}
    fn visit_call(&mut self, _call: &Call) {}
    fn visit_expression(&mut self, _expression: &Expression) {}
    fn visit_variable(&mut self, _variable: &VariableReference) {}
}

/// Common interface for all AST nodes
pub trait AstNode {
    fn node_type(&self) -> &'static str;
    fn display_label(&self) -> String;
    fn range(&self) -> &Range;
    fn start_position(&self) -> Position {
        self.range().start
    }

    /// Accept a visitor for traversing this node and its children
    fn accept(&self, visitor: &mut dyn Visitor);
}
