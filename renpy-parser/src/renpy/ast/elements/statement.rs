//! Statement nodes
//!
//! Syntax:
//!     <define> = "define" <integer>? <variable> ("[" <python-expression> "]")?
//!                ("=" | "+=" | "|=") <python-expression> <eol>
//!     <default> = "default" <integer>? <variable> "=" <python-expression> <eol>
//!     <label> = "label" <name> ("(" <parameter> ("," <parameter>)* ")")? ":" <eol>
//!               <statement>* ... indented deeper than the label line
//!     <parameter> = <identifier> ("=" <expression>)?
//!     <jump> = "jump" (<name> | "expression" <python-expression>) <eol>
//!     <call> = "call" <call-target> ("from" <name>)? <eol>
//!     <call-target> = <name> ("(" <expression> ("," <expression>)* ")")?
//!                   | "expression" <python-expression>
//!                   | "screen" <name> <anything>
//!     <name> = <identifier> | <keyword>
//!     <return> = "return" <expression>? <eol>
//!     <pass> = "pass" <eol>
//!     <pause> = "pause" <expression>? <eol>
//!     <python> = "$" <python-expression> <eol>
//!
//!     The optional integer after `define`/`default` is the init priority. When absent the
//!     node holds a synthesized literal `0` with an empty range at the end of the keyword.
//!
//!     Computed targets (`expression`) and screens name no label, so those forms leave
//!     `target` empty and are invisible to resolution. The rest of a `call screen` line is
//!     screen arguments, which are not modeled.
//!
//! Examples:
//!     define 2 e = Character("Eileen")
//!     default points = 0
//!     label start:
//!         $ points += 1
//!         call chapter(1) from _call_chapter
//!         call screen preferences
//!         jump expression "ending_" + route

use super::super::range::Range;
use super::super::traits::{AstNode, Visitor};
use super::expression::{AssignmentOperation, Expression, Literal, PythonExpression};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Statement {
    Define(Define),
    Default(DefaultStatement),
    Label(Label),
    Jump(Jump),
    Call(Call),
    Return(Return),
    Pass(Pass),
    Pause(Pause),
    Python(PythonStatement),
}

impl Statement {
    fn inner(&self) -> &dyn AstNode {
        match self {
            Statement::Define(node) => node,
            Statement::Default(node) => node,
            Statement::Label(node) => node,
            Statement::Jump(node) => node,
            Statement::Call(node) => node,
            Statement::Return(node) => node,
            Statement::Pass(node) => node,
            Statement::Pause(node) => node,
            Statement::Python(node) => node,
        }
    }

    /// Direct children; only labels have any.
    pub fn children(&self) -> &[Statement] {
        match self {
            Statement::Label(label) => &label.body,
            _ => &[],
        }
    }
}

impl AstNode for Statement {
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
        self.inner().accept(visitor);
    }
}

/// A bare name in a binding or navigation position: label names, parameters, jump targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub name: String,
    pub range: Range,
}

impl Identifier {
    pub fn new(name: impl Into<String>, range: Range) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}

/// A label parameter, optionally with a default value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: Identifier,
    pub default: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Define {
    pub priority: Literal,
    /// `None` when the assignment could not be parsed.
    pub assignment: Option<AssignmentOperation>,
    /// The raw subscript of `define name[index] = ...`.
    pub index: Option<PythonExpression>,
    pub range: Range,
}

impl AstNode for Define {
    fn node_type(&self) -> &'static str {
        "Define"
    }

    fn display_label(&self) -> String {
        binding_label(
            self.priority.text.as_str(),
            self.assignment.as_ref(),
            self.index.as_ref(),
        )
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_define(self);
        if let Some(assignment) = &self.assignment {
            assignment.accept(visitor);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultStatement {
    pub priority: Literal,
    pub assignment: Option<AssignmentOperation>,
    pub range: Range,
}

impl AstNode for DefaultStatement {
    fn node_type(&self) -> &'static str {
        "Default"
    }

    fn display_label(&self) -> String {
        binding_label(self.priority.text.as_str(), self.assignment.as_ref(), None)
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_default(self);
        if let Some(assignment) = &self.assignment {
            assignment.accept(visitor);
        }
    }
}

fn binding_label(
    priority: &str,
    assignment: Option<&AssignmentOperation>,
    index: Option<&PythonExpression>,
) -> String {
    let subscript = index
        .map(|index| format!("[{}]", index.source))
        .unwrap_or_default();
    match assignment.and_then(|assignment| assignment.target()) {
        Some(target) => format!("{}{} (priority {})", target.name, subscript, priority),
        None => format!("<incomplete> (priority {})", priority),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub name: Option<Identifier>,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Statement>,
    pub range: Range,
}

impl AstNode for Label {
    fn node_type(&self) -> &'static str {
        "Label"
    }

    fn display_label(&self) -> String {
        let name = target_label(self.name.as_ref());
        if self.parameters.is_empty() {
            name
        } else {
            let parameters: Vec<&str> = self
                .parameters
                .iter()
                .map(|parameter| parameter.name.name.as_str())
                .collect();
            format!("{}({})", name, parameters.join(", "))
        }
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        // defaults are evaluated in the enclosing scope
        for default in self.parameters.iter().filter_map(|p| p.default.as_ref()) {
            default.accept(visitor);
        }
        visitor.visit_label(self);
        for statement in &self.body {
            statement.accept(visitor);
        }
        visitor.leave_label(self);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Jump {
    /// `None` when no label name followed the keyword, or for a computed target.
    pub target: Option<Identifier>,
    /// The python of `jump expression <python>`.
    pub expression: Option<PythonExpression>,
    pub range: Range,
}

impl AstNode for Jump {
    fn node_type(&self) -> &'static str {
        "Jump"
    }

    fn display_label(&self) -> String {
        match &self.expression {
            Some(expression) => format!("expression {}", expression.source),
            None => target_label(self.target.as_ref()),
        }
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_jump(self);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    /// The called label. `None` when missing, and for the `expression` and `screen` forms.
    pub target: Option<Identifier>,
    pub arguments: Vec<Expression>,
    /// The python of `call expression <python>`.
    pub expression: Option<PythonExpression>,
    /// The screen of `call screen <name>`.
    pub screen: Option<Identifier>,
    /// The return site named by `from <name>`.
    pub from: Option<Identifier>,
    pub range: Range,
}

impl AstNode for Call {
    fn node_type(&self) -> &'static str {
        "Call"
    }

    fn display_label(&self) -> String {
        let callee = match (&self.expression, &self.screen) {
            (Some(expression), _) => format!("expression {}", expression.source),
            (None, Some(screen)) => format!("screen {}", screen.name),
            (None, None) => target_label(self.target.as_ref()),
        };
        match &self.from {
            Some(from) => format!("{} from {}", callee, from.name),
            None => callee,
        }
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_call(self);
        for argument in &self.arguments {
            argument.accept(visitor);
        }
    }
}

fn target_label(target: Option<&Identifier>) -> String {
    target
        .map(|target| target.name.clone())
        .unwrap_or_else(|| "<missing>".to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Return {
    pub value: Option<Expression>,
    pub range: Range,
}

impl AstNode for Return {
    fn node_type(&self) -> &'static str {
        "Return"
    }

    fn display_label(&self) -> String {
        String::new()
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        if let Some(value) = &self.value {
            value.accept(visitor);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pass {
    pub range: Range,
}

impl AstNode for Pass {
    fn node_type(&self) -> &'static str {
        "Pass"
    }

    fn display_label(&self) -> String {
        String::new()
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, _visitor: &mut dyn Visitor) {}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pause {
    pub duration: Option<Expression>,
    pub range: Range,
}

impl AstNode for Pause {
    fn node_type(&self) -> &'static str {
        "Pause"
    }

    fn display_label(&self) -> String {
        String::new()
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        if let Some(duration) = &self.duration {
            duration.accept(visitor);
        }
    }
}

/// A one-line `$` python statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PythonStatement {
    pub code: Option<PythonExpression>,
    pub range: Range,
}

impl AstNode for PythonStatement {
    fn node_type(&self) -> &'static str {
        "Python"
    }

    fn display_label(&self) -> String {
        self.code
            .as_ref()
            .map(|code| code.display_label())
            .unwrap_or_default()
    }

    fn range(&self) -> &Range {
        &self.range
    }

    fn accept(&self, _visitor: &mut dyn Visitor) {}
}
