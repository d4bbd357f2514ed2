//! Document element
//!
//!     The root of a parsed script: the top-level statements in source order.

use super::super::range::{Position, Range};
use super::super::traits::{AstNode, Visitor};
use super::statement::Statement;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub statements: Vec<Statement>,
    pub range: Range,
}

impl Document {
    pub fn new(statements: Vec<Statement>, range: Range) -> Self {
        Self { statements, range }
    }

    /// Visit every statement, depth first, in source order.
    pub fn walk(&self, visitor: &mut dyn Visitor) {
        for statement in &self.statements {
            statement.accept(visitor);
        }
    }

    /// The innermost statement whose range contains `position`.
    pub fn statement_at(&self, position: Position) -> Option<&Statement> {
        let mut found = None;
        let mut level = self.statements.as_slice();
        while let Some(statement) = level.iter().find(|s| s.range().contains(position)) {
            found = Some(statement);
            level = statement.children();
        }
        found
    }

    /// Total number of statements including nested label bodies.
    pub fn statement_count(&self) -> usize {
        fn count(statements: &[Statement]) -> usize {
            statements
                .iter()
                .map(|statement| 1 + count(statement.children()))
                .sum()
        }
        count(&self.statements)
    }
}

impl AstNode for Document {
    fn node_type(&self) -> &'static str {
        "Document"
    }

    fn display_label(&self) -> String {
        format!("{} statements", self.statements.len())
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        self.walk(visitor);
    }
}
