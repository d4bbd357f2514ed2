//! Treeviz formatter for AST nodes
//!
//! Treeviz is a visual representation of the AST with one line per node, which makes
//! the shape of a script quick to scan.
//!
//! It encodes the node structure as indentation, with 2 characters per level of nesting.
//! The renderer is a pure function of the node and the indentation prefix it is given;
//! nothing else is threaded through.
//!
//! So the format is :
//! <line number>? <indentation>(per level) <connector> <icon><space><label> (truncated to 30 characters)
//!
//! Example:
//!
//!     ⧉ 2 statements
//!     ├─ ≔ e (priority 0)
//!     │ ├─ ◦ integer 0
//!     │ └─ ⇐ =
//!     │   ├─ 𝑥 e
//!     │   └─ λ "Character(\"Eileen\")"
//!     └─ § start
//!       └─ ↷ ending
//!
//! Icons
//!     Statements:
//!         Document: ⧉
//!         Define: ≔
//!         Default: ≝
//!         Label: §
//!         Parameter: •
//!         Jump: ↷
//!         Call: ↪
//!         Return: ↩
//!         Pass: ⋯
//!         Pause: ⏸
//!         Python: $
//!     Expressions:
//!         Literal: ◦
//!         Variable: 𝑥
//!         Parenthesized: ()
//!         AssignmentOperation: ⇐
//!         PythonExpression: λ

use crate::renpy::ast::{AstNode, Document, Expression, Statement};
use std::collections::HashMap;

/// Rendering parameters, as passed on the command line (`show-linum`).
pub type TreevizParams = HashMap<String, String>;

/// A node flattened to what the renderer needs.
struct TreeNode {
    icon: &'static str,
    label: String,
    line: usize,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(node: &dyn AstNode) -> Self {
        Self {
            icon: get_icon(node.node_type()),
            label: node.display_label(),
            line: node.start_position().line,
            children: Vec::new(),
        }
    }

    fn with_children(node: &dyn AstNode, children: Vec<TreeNode>) -> Self {
        Self {
            children,
            ..Self::leaf(node)
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

/// Get the icon for a node type
fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Document" => "⧉",
        "Define" => "≔",
        "Default" => "≝",
        "Label" => "§",
        "Parameter" => "•",
        "Jump" => "↷",
        "Call" => "↪",
        "Return" => "↩",
        "Pass" => "⋯",
        "Pause" => "⏸",
        "Python" => "$",
        "Literal" => "◦",
        "Variable" => "𝑥",
        "Parenthesized" => "()",
        "AssignmentOperation" => "⇐",
        "PythonExpression" => "λ",
        _ => "○",
    }
}

fn expression_node(expression: &Expression) -> TreeNode {
    let children = match expression {
        Expression::Parenthesized(parenthesized) => vec![expression_node(&parenthesized.inner)],
        Expression::AssignmentOperation(assignment) => vec![
            expression_node(&assignment.left),
            expression_node(&assignment.right),
        ],
        _ => Vec::new(),
    };
    TreeNode::with_children(expression, children)
}

fn statement_node(statement: &Statement) -> TreeNode {
    let mut children = Vec::new();
    match statement {
        Statement::Define(define) => {
            children.push(TreeNode::leaf(&define.priority));
            if let Some(index) = &define.index {
                children.push(TreeNode::leaf(index));
            }
            if let Some(assignment) = &define.assignment {
                children.push(TreeNode::with_children(
                    assignment,
                    vec![
                        expression_node(&assignment.left),
                        expression_node(&assignment.right),
                    ],
                ));
            }
        }
        Statement::Default(default) => {
            children.push(TreeNode::leaf(&default.priority));
            if let Some(assignment) = &default.assignment {
                children.push(TreeNode::with_children(
                    assignment,
                    vec![
                        expression_node(&assignment.left),
                        expression_node(&assignment.right),
                    ],
                ));
            }
        }
        Statement::Label(label) => {
            for parameter in &label.parameters {
                children.push(TreeNode {
                    icon: get_icon("Parameter"),
                    label: parameter.name.name.clone(),
                    line: parameter.name.range.start.line,
                    children: parameter.default.iter().map(expression_node).collect(),
                });
            }
            children.extend(label.body.iter().map(statement_node));
        }
        Statement::Call(call) => {
            children.extend(call.arguments.iter().map(expression_node));
            children.extend(call.expression.iter().map(|python| TreeNode::leaf(python)));
        }
        Statement::Jump(jump) => {
            children.extend(jump.expression.iter().map(|python| TreeNode::leaf(python)))
        }
        Statement::Return(node) => children.extend(node.value.iter().map(expression_node)),
        Statement::Pause(node) => children.extend(node.duration.iter().map(expression_node)),
        Statement::Pass(_) | Statement::Python(_) => {}
    }
    TreeNode::with_children(statement, children)
}

/// Render `node` and its subtree, each line starting with `prefix`.
fn format_node(node: &TreeNode, prefix: &str, is_last: bool, show_linum: bool) -> String {
    let connector = if is_last { "└─" } else { "├─" };
    let linum_prefix = if show_linum {
        format!("{:02} ", node.line + 1)
    } else {
        String::new()
    };

    let mut output = format!(
        "{}{}{} {} {}\n",
        linum_prefix,
        prefix,
        connector,
        node.icon,
        truncate(&node.label, 30)
    );

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let child_count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        output.push_str(&format_node(child, &child_prefix, i + 1 == child_count, show_linum));
    }

    output
}

pub fn to_treeviz_str(doc: &Document) -> String {
    to_treeviz_str_with_params(doc, &TreevizParams::new())
}

pub fn to_treeviz_str_with_params(doc: &Document, params: &TreevizParams) -> String {
    let show_linum = params
        .get("show-linum")
        .map(|v| v != "false")
        .unwrap_or(false);

    let mut output = format!("{} {}\n", get_icon(doc.node_type()), doc.display_label());
    let roots: Vec<TreeNode> = doc.statements.iter().map(statement_node).collect();
    for (i, root) in roots.iter().enumerate() {
        output.push_str(&format_node(root, "", i + 1 == roots.len(), show_linum));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renpy::parsing::parse_document;

    #[test]
    fn test_treeviz() {
        let source = "define 2 x = 5\nlabel start(who):\n    call greet((who), 1)\n    jump start\n";
        let output = to_treeviz_str(&parse_document(source).document);
        insta::assert_snapshot!(output, @r#"
        ⧉ 2 statements
        ├─ ≔ x (priority 2)
        │ ├─ ◦ integer 2
        │ └─ ⇐ =
        │   ├─ 𝑥 x
        │   └─ λ "5"
        └─ § start(who)
          ├─ • who
          ├─ ↪ greet
          │ ├─ () ( )
          │ │ └─ 𝑥 who
          │ └─ ◦ integer 1
          └─ ↷ start
        "#);
    }

    #[test]
    fn test_treeviz_computed_targets_and_index() {
        let source = "define tags[key] = 1\ncall screen preferences\njump expression target\n";
        let output = to_treeviz_str(&parse_document(source).document);
        insta::assert_snapshot!(output, @r#"
        ⧉ 3 statements
        ├─ ≔ tags[key] (priority 0)
        │ ├─ ◦ integer 0
        │ ├─ λ "key"
        │ └─ ⇐ =
        │   ├─ 𝑥 tags
        │   └─ λ "1"
        ├─ ↪ screen preferences
        └─ ↷ expression target
          └─ λ "target"
        "#);
    }

    #[test]
    fn test_treeviz_line_numbers() {
        let source = "pass\n\nreturn\n";
        let mut params = TreevizParams::new();
        params.insert("show-linum".to_string(), "true".to_string());
        let output = to_treeviz_str_with_params(&parse_document(source).document, &params);
        assert_eq!(output, "⧉ 2 statements\n01 ├─ ⋯ \n03 └─ ↩ \n");
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let source = "define x = \"a very long string that keeps going\"\n";
        let output = to_treeviz_str(&parse_document(source).document);
        assert!(output.contains("..."));
    }
}
