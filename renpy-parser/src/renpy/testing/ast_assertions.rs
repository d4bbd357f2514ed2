//! Fluent assertion API for AST nodes
//!
//!     Every assertion carries a context string describing where in the tree it is, so a
//!     failure deep inside a label body still says which statement it was looking at.

use crate::renpy::ast::{
    AssignmentOperation, AstNode, Document, Expression, Label, Literal, Statement,
};
use crate::renpy::token::OperatorKind;

/// Create an assertion builder for a document
pub fn assert_ast(doc: &Document) -> DocumentAssertion<'_> {
    DocumentAssertion { doc }
}

pub struct DocumentAssertion<'a> {
    doc: &'a Document,
}

impl<'a> DocumentAssertion<'a> {
    pub fn statement_count(self, expected: usize) -> Self {
        assert_eq!(
            self.doc.statements.len(),
            expected,
            "document: expected {} top-level statements, found {}",
            expected,
            self.doc.statements.len()
        );
        self
    }

    pub fn statement<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(StatementAssertion<'a>),
    {
        let statement = self.doc.statements.get(index).unwrap_or_else(|| {
            panic!(
                "document: no statement at index {} (have {})",
                index,
                self.doc.statements.len()
            )
        });
        check(StatementAssertion {
            statement,
            context: format!("statement[{}]", index),
        });
        self
    }
}

pub struct StatementAssertion<'a> {
    statement: &'a Statement,
    context: String,
}

impl<'a> StatementAssertion<'a> {
    pub fn starts_at(self, line: usize, column: usize) -> Self {
        let start = self.statement.start_position();
        assert_eq!(
            (start.line, start.column),
            (line, column),
            "{}: wrong start position",
            self.context
        );
        self
    }

    pub fn assert_define(self) -> BindingAssertion<'a> {
        match self.statement {
            Statement::Define(define) => BindingAssertion {
                priority: &define.priority,
                assignment: define.assignment.as_ref(),
                context: self.context,
            },
            other => panic!("{}: expected Define, found {}", self.context, other.node_type()),
        }
    }

    pub fn assert_default(self) -> BindingAssertion<'a> {
        match self.statement {
            Statement::Default(default) => BindingAssertion {
                priority: &default.priority,
                assignment: default.assignment.as_ref(),
                context: self.context,
            },
            other => panic!("{}: expected Default, found {}", self.context, other.node_type()),
        }
    }

    pub fn assert_label(self) -> LabelAssertion<'a> {
        match self.statement {
            Statement::Label(label) => LabelAssertion {
                label,
                context: self.context,
            },
            other => panic!("{}: expected Label, found {}", self.context, other.node_type()),
        }
    }

    pub fn assert_jump(self) -> TargetAssertion<'a> {
        match self.statement {
            Statement::Jump(jump) => TargetAssertion {
                target: jump.target.as_ref().map(|t| t.name.as_str()),
                arguments: &[],
                context: self.context,
            },
            other => panic!("{}: expected Jump, found {}", self.context, other.node_type()),
        }
    }

    pub fn assert_call(self) -> TargetAssertion<'a> {
        match self.statement {
            Statement::Call(call) => TargetAssertion {
                target: call.target.as_ref().map(|t| t.name.as_str()),
                arguments: &call.arguments,
                context: self.context,
            },
            other => panic!("{}: expected Call, found {}", self.context, other.node_type()),
        }
    }

    /// Assert a `return`, optionally checking whether it has a value.
    pub fn assert_return(self, has_value: bool) -> Self {
        match self.statement {
            Statement::Return(node) => assert_eq!(
                node.value.is_some(),
                has_value,
                "{}: return value presence",
                self.context
            ),
            other => panic!("{}: expected Return, found {}", self.context, other.node_type()),
        }
        self
    }

    pub fn assert_pass(self) -> Self {
        assert!(
            matches!(self.statement, Statement::Pass(_)),
            "{}: expected Pass, found {}",
            self.context,
            self.statement.node_type()
        );
        self
    }

    pub fn assert_pause(self, has_duration: bool) -> Self {
        match self.statement {
            Statement::Pause(node) => assert_eq!(
                node.duration.is_some(),
                has_duration,
                "{}: pause duration presence",
                self.context
            ),
            other => panic!("{}: expected Pause, found {}", self.context, other.node_type()),
        }
        self
    }

    pub fn assert_python(self) -> PythonAssertion<'a> {
        match self.statement {
            Statement::Python(python) => PythonAssertion {
                code: python.code.as_ref().map(|code| code.source.as_str()),
                context: self.context,
            },
            other => panic!("{}: expected Python, found {}", self.context, other.node_type()),
        }
    }
}

/// Assertions shared by `define` and `default`.
pub struct BindingAssertion<'a> {
    priority: &'a Literal,
    assignment: Option<&'a AssignmentOperation>,
    context: String,
}

impl<'a> BindingAssertion<'a> {
    fn assignment(&self) -> &'a AssignmentOperation {
        self.assignment
            .unwrap_or_else(|| panic!("{}: assignment is missing", self.context))
    }

    pub fn priority(self, expected: &str) -> Self {
        assert_eq!(self.priority.text, expected, "{}: priority", self.context);
        self
    }

    pub fn target(self, expected: &str) -> Self {
        let name = self.assignment().target().map(|target| target.name.as_str());
        assert_eq!(name, Some(expected), "{}: target", self.context);
        self
    }

    pub fn operator(self, expected: OperatorKind) -> Self {
        assert_eq!(self.assignment().operator, expected, "{}: operator", self.context);
        self
    }

    /// The raw python text of the assigned value.
    pub fn value(self, expected: &str) -> Self {
        match self.assignment().right.as_ref() {
            Expression::PythonExpression(python) => {
                assert_eq!(python.source, expected, "{}: value", self.context)
            }
            other => panic!(
                "{}: expected a python value, found {}",
                self.context,
                other.node_type()
            ),
        }
        self
    }

    pub fn incomplete(self) -> Self {
        assert!(
            self.assignment.is_none(),
            "{}: expected the assignment to be missing",
            self.context
        );
        self
    }
}

pub struct LabelAssertion<'a> {
    label: &'a Label,
    context: String,
}

impl<'a> LabelAssertion<'a> {
    pub fn name(self, expected: &str) -> Self {
        let name = self.label.name.as_ref().map(|name| name.name.as_str());
        assert_eq!(name, Some(expected), "{}: label name", self.context);
        self
    }

    pub fn parameters(self, expected: &[&str]) -> Self {
        let names: Vec<&str> = self
            .label
            .parameters
            .iter()
            .map(|parameter| parameter.name.name.as_str())
            .collect();
        assert_eq!(names, expected, "{}: parameters", self.context);
        self
    }

    pub fn body_count(self, expected: usize) -> Self {
        assert_eq!(
            self.label.body.len(),
            expected,
            "{}: body statement count",
            self.context
        );
        self
    }

    pub fn body<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(StatementAssertion<'a>),
    {
        let statement = self.label.body.get(index).unwrap_or_else(|| {
            panic!(
                "{}: no body statement at index {} (have {})",
                self.context,
                index,
                self.label.body.len()
            )
        });
        check(StatementAssertion {
            statement,
            context: format!("{}.body[{}]", self.context, index),
        });
        self
    }
}

/// Assertions for `jump` and `call`.
pub struct TargetAssertion<'a> {
    target: Option<&'a str>,
    arguments: &'a [Expression],
    context: String,
}

impl<'a> TargetAssertion<'a> {
    pub fn target(self, expected: &str) -> Self {
        assert_eq!(self.target, Some(expected), "{}: target", self.context);
        self
    }

    pub fn missing_target(self) -> Self {
        assert!(self.target.is_none(), "{}: expected no target", self.context);
        self
    }

    pub fn argument_count(self, expected: usize) -> Self {
        assert_eq!(self.arguments.len(), expected, "{}: arguments", self.context);
        self
    }
}

pub struct PythonAssertion<'a> {
    code: Option<&'a str>,
    context: String,
}

impl<'a> PythonAssertion<'a> {
    pub fn code(self, expected: &str) -> Self {
        assert_eq!(self.code, Some(expected), "{}: python code", self.context);
        self
    }
}
