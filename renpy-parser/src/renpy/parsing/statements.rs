//! Statement rules and the block loop
//!
//!     Every statement starts with a distinct token (a keyword or `$`), so the statement
//!     alternation never needs more than one token of lookahead. Statements that were
//!     recognized but failed part way are still returned, with the failed parts left empty;
//!     the errors are already on the cursor.
//!
//!     Blocks are indentation based: a label's body is every following statement whose first
//!     token sits in a column deeper than the label keyword. A label nested past the cursor's
//!     nesting limit keeps its header, and its body is skipped.

use super::expressions::{expression_rule, parse_python, PythonExpressionRule, VariableRule};
use super::parser::DocumentParser;
use super::rules::{Alternation, AssignmentOperationRule, GrammarRule};
use crate::renpy::ast::{
    AssignmentOperation, AstNode, Call, DefaultStatement, Define, Expression, Identifier, Jump,
    Label, Literal, Parameter, Pass, Pause, PythonExpression, PythonStatement, Range, Return,
    Statement,
};
use crate::renpy::token::{
    CharacterKind, KeywordKind, LiteralKind, OperatorKind, Token, TokenKind,
};
use tracing::trace;

const DEFINE_OPERATORS: &[OperatorKind] = &[
    OperatorKind::Assign,
    OperatorKind::PlusAssign,
    OperatorKind::OrAssign,
];
const DEFAULT_OPERATORS: &[OperatorKind] = &[OperatorKind::Assign];

const OPEN_PAREN: TokenKind = TokenKind::Character(CharacterKind::OpenParen);
const CLOSE_PAREN: TokenKind = TokenKind::Character(CharacterKind::CloseParen);
const OPEN_BRACKET: TokenKind = TokenKind::Character(CharacterKind::OpenBracket);
const CLOSE_BRACKET: TokenKind = TokenKind::Character(CharacterKind::CloseBracket);
const COMMA: TokenKind = TokenKind::Character(CharacterKind::Comma);
const COLON: TokenKind = TokenKind::Character(CharacterKind::Colon);
const DOLLAR: TokenKind = TokenKind::Character(CharacterKind::Dollar);
const INTEGER: TokenKind = TokenKind::Literal(LiteralKind::Integer);

fn keyword(keyword: KeywordKind) -> TokenKind {
    TokenKind::Keyword(keyword)
}

/// The statement alternation.
pub fn statement_rule() -> Alternation<Statement> {
    Alternation::new(vec![
        Box::new(DefineRule),
        Box::new(DefaultRule),
        Box::new(LabelRule),
        Box::new(JumpRule),
        Box::new(CallRule),
        Box::new(ReturnRule),
        Box::new(PassRule),
        Box::new(PauseRule),
        Box::new(PythonLineRule),
    ])
}

/// Parse statements until the input ends or, inside a block, until a line is indented at
/// or above `parent_indent`.
///
/// Each iteration consumes at least one token. Lines no rule recognizes (dialogue, `show`,
/// `menu:` and the like) are skipped whole.
pub fn parse_block(parser: &mut DocumentParser<'_>, parent_indent: Option<usize>) -> Vec<Statement> {
    let rule = statement_rule();
    let mut statements = Vec::new();

    loop {
        parser.skip_empty_lines();
        if !parser.has_next() {
            break;
        }
        if parent_indent.is_some_and(|parent| parser.line_indent() <= parent) {
            break;
        }

        let before = parser.consumed();
        if rule.test(parser) {
            if let Some(statement) = rule.parse(parser) {
                trace!(
                    kind = statement.node_type(),
                    at = %statement.range().start,
                    "parsed statement"
                );
                let is_block = matches!(statement, Statement::Label(_));
                statements.push(statement);
                if !is_block {
                    parser.expect_eol();
                }
            }
        } else {
            parser.skip_to_eol();
        }
        if parser.consumed() == before {
            parser.advance();
        }
    }

    statements
}

/// Skip every line indented deeper than `parent_indent`, without recording anything.
fn skip_block(parser: &mut DocumentParser<'_>, parent_indent: usize) {
    loop {
        parser.skip_empty_lines();
        if !parser.has_next() || parser.line_indent() <= parent_indent {
            return;
        }
        parser.skip_to_eol();
    }
}

fn identifier(parser: &DocumentParser<'_>, token: &Token) -> Identifier {
    Identifier::new(token.value(parser.source()), token.range())
}

/// The explicit init priority, or a synthesized `0` right after the keyword.
fn priority(parser: &mut DocumentParser<'_>, keyword: &Token) -> Literal {
    match parser.optional_token(INTEGER) {
        Some(token) => Literal::new(
            LiteralKind::Integer,
            token.value(parser.source()),
            token.range(),
        ),
        None => Literal::new(LiteralKind::Integer, "0", Range::empty_at(keyword.end)),
    }
}

pub struct DefineRule;

impl DefineRule {
    /// `<variable> ("[" <python> "]")? <operator> <python>`; the subscript goes to `index`.
    fn assignment(
        parser: &mut DocumentParser<'_>,
        index: &mut Option<PythonExpression>,
    ) -> Option<AssignmentOperation> {
        let rule = AssignmentOperationRule::new(VariableRule, DEFINE_OPERATORS, PythonExpressionRule);
        let left = parser.require(&VariableRule)?;
        if parser.optional_token(OPEN_BRACKET).is_some() {
            *index = Some(parse_python(parser)?);
            parser.require_token(CLOSE_BRACKET)?;
        }
        rule.parse_after(parser, left)
    }
}

impl GrammarRule for DefineRule {
    type Output = Statement;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        parser.test(keyword(KeywordKind::Define))
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<Statement> {
        let head = parser.require_token(keyword(KeywordKind::Define))?;
        let priority = priority(parser, head);
        let mut index = None;
        let assignment = Self::assignment(parser, &mut index);
        Some(Statement::Define(Define {
            priority,
            assignment,
            index,
            range: parser.range_from(head.start),
        }))
    }
}

pub struct DefaultRule;

impl GrammarRule for DefaultRule {
    type Output = Statement;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        parser.test(keyword(KeywordKind::Default))
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<Statement> {
        let head = parser.require_token(keyword(KeywordKind::Default))?;
        let priority = priority(parser, head);
        let assignment = parser.require(&AssignmentOperationRule::new(
            VariableRule,
            DEFAULT_OPERATORS,
            PythonExpressionRule,
        ));
        Some(Statement::Default(DefaultStatement {
            priority,
            assignment,
            range: parser.range_from(head.start),
        }))
    }
}

pub struct LabelRule;

impl LabelRule {
    fn parameters(parser: &mut DocumentParser<'_>) -> Vec<Parameter> {
        let mut parameters = Vec::new();
        if parser.optional_token(OPEN_PAREN).is_none() {
            return parameters;
        }
        if parser.optional_token(CLOSE_PAREN).is_some() {
            return parameters;
        }
        loop {
            let Some(token) = parser.require_token(TokenKind::IDENTIFIER) else {
                return parameters;
            };
            let name = identifier(parser, token);
            let default = match parser.optional_token(TokenKind::Operator(OperatorKind::Assign)) {
                Some(_) => parser.require(&expression_rule()),
                None => None,
            };
            parameters.push(Parameter { name, default });
            if parser.optional_token(COMMA).is_none() {
                parser.require_token(CLOSE_PAREN);
                return parameters;
            }
        }
    }
}

impl GrammarRule for LabelRule {
    type Output = Statement;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        parser.test(keyword(KeywordKind::Label))
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<Statement> {
        let head = parser.require_token(keyword(KeywordKind::Label))?;
        let name = parser
            .require_name()
            .map(|token| identifier(parser, token));
        let parameters = Self::parameters(parser);
        parser.require_token(COLON);
        let header = parser.range_from(head.start);
        parser.expect_eol();

        let body = if parser.enter_nested() {
            let body = parse_block(parser, Some(head.start.column));
            parser.leave_nested();
            body
        } else {
            skip_block(parser, head.start.column);
            Vec::new()
        };
        let end = body
            .last()
            .map(|statement| statement.range().end)
            .unwrap_or(header.end);
        Some(Statement::Label(Label {
            name,
            parameters,
            body,
            range: Range::new(head.start, end),
        }))
    }
}

pub struct JumpRule;

impl GrammarRule for JumpRule {
    type Output = Statement;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        parser.test(keyword(KeywordKind::Jump))
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<Statement> {
        let head = parser.require_token(keyword(KeywordKind::Jump))?;
        let (target, expression) = match parser.optional_token(keyword(KeywordKind::Expression)) {
            Some(_) => (None, parse_python(parser)),
            None => (
                parser.require_name().map(|token| identifier(parser, token)),
                None,
            ),
        };
        Some(Statement::Jump(Jump {
            target,
            expression,
            range: parser.range_from(head.start),
        }))
    }
}

pub struct CallRule;

impl CallRule {
    fn arguments(parser: &mut DocumentParser<'_>) -> Vec<Expression> {
        let mut arguments = Vec::new();
        if parser.optional_token(OPEN_PAREN).is_none() {
            return arguments;
        }
        if parser.optional_token(CLOSE_PAREN).is_some() {
            return arguments;
        }
        let rule = expression_rule();
        loop {
            let Some(argument) = parser.require(&rule) else {
                return arguments;
            };
            arguments.push(argument);
            if parser.optional_token(COMMA).is_none() {
                parser.require_token(CLOSE_PAREN);
                return arguments;
            }
        }
    }
}

impl GrammarRule for CallRule {
    type Output = Statement;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        parser.test(keyword(KeywordKind::Call))
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<Statement> {
        let head = parser.require_token(keyword(KeywordKind::Call))?;
        let mut call = Call {
            target: None,
            arguments: Vec::new(),
            expression: None,
            screen: None,
            from: None,
            range: head.range(),
        };

        if parser.optional_token(keyword(KeywordKind::Expression)).is_some() {
            call.expression = parse_python(parser);
        } else if parser.optional_token(keyword(KeywordKind::Screen)).is_some() {
            call.screen = parser
                .require_name()
                .map(|token| identifier(parser, token));
            // screen arguments and clauses are not modeled
            parser.skip_rest_of_line();
        } else {
            call.target = parser
                .require_name()
                .map(|token| identifier(parser, token));
            if call.target.is_some() {
                call.arguments = Self::arguments(parser);
                if parser.optional_token(keyword(KeywordKind::From)).is_some() {
                    call.from = parser
                        .require_name()
                        .map(|token| identifier(parser, token));
                }
            }
        }

        call.range = parser.range_from(head.start);
        Some(Statement::Call(call))
    }
}

pub struct ReturnRule;

impl GrammarRule for ReturnRule {
    type Output = Statement;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        parser.test(keyword(KeywordKind::Return))
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<Statement> {
        let head = parser.require_token(keyword(KeywordKind::Return))?;
        let value = parser.optional(&expression_rule());
        Some(Statement::Return(Return {
            value,
            range: parser.range_from(head.start),
        }))
    }
}

pub struct PassRule;

impl GrammarRule for PassRule {
    type Output = Statement;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        parser.test(keyword(KeywordKind::Pass))
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<Statement> {
        let head = parser.require_token(keyword(KeywordKind::Pass))?;
        Some(Statement::Pass(Pass { range: head.range() }))
    }
}

pub struct PauseRule;

impl GrammarRule for PauseRule {
    type Output = Statement;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        parser.test(keyword(KeywordKind::Pause))
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<Statement> {
        let head = parser.require_token(keyword(KeywordKind::Pause))?;
        let duration = parser.optional(&expression_rule());
        Some(Statement::Pause(Pause {
            duration,
            range: parser.range_from(head.start),
        }))
    }
}

/// `$ <python>`
pub struct PythonLineRule;

impl GrammarRule for PythonLineRule {
    type Output = Statement;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        parser.test(DOLLAR)
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<Statement> {
        let head = parser.require_token(DOLLAR)?;
        let code = parse_python(parser);
        Some(Statement::Python(PythonStatement {
            code,
            range: parser.range_from(head.start),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renpy::lexing::tokenize;
    use crate::renpy::parsing::parser::MAX_NESTING;
    use crate::renpy::parsing::ParseErrorKind;
    use rstest::rstest;

    fn block(source: &str) -> (Vec<Statement>, Vec<ParseErrorKind>) {
        let tokens = tokenize(source);
        let mut parser = DocumentParser::new(source, &tokens);
        let statements = parse_block(&mut parser, None);
        let errors = parser.errors().iter().map(|error| error.kind).collect();
        (statements, errors)
    }

    #[test]
    fn test_label_body_is_indented_lines() {
        let source = "label start:\n    pass\n    jump end\nlabel end:\n    return\n";
        let (statements, errors) = block(source);
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(statements.len(), 2);
        match &statements[0] {
            Statement::Label(label) => {
                assert_eq!(label.name.as_ref().map(|n| n.name.as_str()), Some("start"));
                assert_eq!(label.body.len(), 2);
                assert_eq!(label.range.end.offset, 34);
            }
            other => panic!("expected label, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_label_blocks() {
        let source = "label a:\n    label b:\n        pass\n    pass\npass\n";
        let (statements, errors) = block(source);
        assert!(errors.is_empty());
        assert_eq!(statements.len(), 2);
        let outer = &statements[0];
        assert_eq!(outer.children().len(), 2);
        assert_eq!(outer.children()[0].children().len(), 1);
    }

    #[test]
    fn test_label_parameters_with_defaults() {
        let (statements, errors) = block("label chapter(number, title='x'):\n    pass\n");
        assert!(errors.is_empty());
        match &statements[0] {
            Statement::Label(label) => {
                assert_eq!(label.parameters.len(), 2);
                assert_eq!(label.parameters[1].name.name, "title");
                assert!(label.parameters[1].default.is_some());
            }
            other => panic!("expected label, got {:?}", other),
        }
    }

    #[test]
    fn test_call_arguments() {
        let (statements, errors) = block("call chapter(1, (name), 'x')\n");
        assert!(errors.is_empty());
        match &statements[0] {
            Statement::Call(call) => assert_eq!(call.arguments.len(), 3),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_lines_are_skipped_silently() {
        let source = "e \"Hello, define world.\"\nshow eileen happy\npass\n";
        let (statements, errors) = block(source);
        assert!(errors.is_empty());
        assert_eq!(statements.len(), 1);
        assert!(matches!(statements[0], Statement::Pass(_)));
    }

    #[test]
    fn test_trailing_tokens_report_end_of_line() {
        let (statements, errors) = block("jump start now\npass\n");
        assert_eq!(statements.len(), 2);
        assert_eq!(errors, vec![ParseErrorKind::UnexpectedEndOfLine]);
    }

    #[test]
    fn test_jump_without_target_is_partial() {
        let (statements, errors) = block("jump\n");
        assert_eq!(errors, vec![ParseErrorKind::UnexpectedToken]);
        match &statements[0] {
            Statement::Jump(jump) => assert!(jump.target.is_none()),
            other => panic!("expected jump, got {:?}", other),
        }
    }

    #[rstest]
    #[case("label screen:\n    pass\n", "screen")]
    #[case("label window:\n    pass\n", "window")]
    #[case("label _call_chapter:\n    pass\n", "_call_chapter")]
    fn test_keyword_label_names(#[case] source: &str, #[case] name: &str) {
        let (statements, errors) = block(source);
        assert!(errors.is_empty(), "{:?}", errors);
        match &statements[0] {
            Statement::Label(label) => {
                assert_eq!(label.name.as_ref().map(|n| n.name.as_str()), Some(name));
                assert_eq!(label.body.len(), 1);
            }
            other => panic!("expected label, got {:?}", other),
        }
    }

    #[test]
    fn test_define_keyword_attribute() {
        let (statements, errors) = block("define config.window = \"auto\"\n");
        assert!(errors.is_empty(), "{:?}", errors);
        match &statements[0] {
            Statement::Define(define) => {
                let target = define.assignment.as_ref().and_then(|a| a.target());
                assert_eq!(target.map(|t| t.name.as_str()), Some("config.window"));
            }
            other => panic!("expected define, got {:?}", other),
        }
    }

    #[test]
    fn test_define_with_index() {
        let (statements, errors) = block("define config.tag_layer[\"eileen\"] = \"master\"\n");
        assert!(errors.is_empty(), "{:?}", errors);
        match &statements[0] {
            Statement::Define(define) => {
                let index = define.index.as_ref().expect("index");
                assert_eq!(index.source, "\"eileen\"");
                assert_eq!(index.range.span(), 24..32);
                let assignment = define.assignment.as_ref().expect("assignment");
                assert_eq!(
                    assignment.target().map(|t| t.name.as_str()),
                    Some("config.tag_layer")
                );
                assert_eq!(define.display_label(), "config.tag_layer[\"eileen\"] (priority 0)");
            }
            other => panic!("expected define, got {:?}", other),
        }
    }

    #[test]
    fn test_define_with_unclosed_index_is_partial() {
        let (statements, errors) = block("define names[\"a\" = 1\npass\n");
        assert_eq!(statements.len(), 2);
        assert!(errors.contains(&ParseErrorKind::UnexpectedToken), "{:?}", errors);
        match &statements[0] {
            Statement::Define(define) => assert!(define.assignment.is_none()),
            other => panic!("expected define, got {:?}", other),
        }
    }

    #[test]
    fn test_jump_expression() {
        let (statements, errors) = block("jump expression \"route_\" + name\n");
        assert!(errors.is_empty(), "{:?}", errors);
        match &statements[0] {
            Statement::Jump(jump) => {
                assert!(jump.target.is_none());
                let expression = jump.expression.as_ref().expect("expression");
                assert_eq!(expression.source, "\"route_\" + name");
            }
            other => panic!("expected jump, got {:?}", other),
        }
    }

    #[test]
    fn test_call_expression() {
        let (statements, errors) = block("call expression target\n");
        assert!(errors.is_empty(), "{:?}", errors);
        match &statements[0] {
            Statement::Call(call) => {
                assert!(call.target.is_none());
                assert_eq!(call.expression.as_ref().map(|e| e.source.as_str()), Some("target"));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[rstest]
    #[case("call screen preferences\n")]
    #[case("call screen confirm(message=\"Quit?\", yes_action=Quit())\n")]
    #[case("call screen choice with dissolve\n")]
    fn test_call_screen(#[case] source: &str) {
        let (statements, errors) = block(source);
        assert!(errors.is_empty(), "{:?}", errors);
        match &statements[0] {
            Statement::Call(call) => {
                assert!(call.target.is_none());
                assert!(call.screen.is_some());
                assert_eq!(call.range.end.offset, source.len() - 1);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[rstest]
    #[case("call chapter from _call_chapter\n", 0)]
    #[case("call chapter(1, 'a') from _call_chapter_1\n", 2)]
    fn test_call_from_clause(#[case] source: &str, #[case] arguments: usize) {
        let (statements, errors) = block(source);
        assert!(errors.is_empty(), "{:?}", errors);
        match &statements[0] {
            Statement::Call(call) => {
                assert_eq!(call.target.as_ref().map(|t| t.name.as_str()), Some("chapter"));
                assert_eq!(call.arguments.len(), arguments);
                assert!(call.from.as_ref().is_some_and(|from| from.name.starts_with("_call_")));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_call_from_without_name() {
        let (statements, errors) = block("call chapter from\n");
        assert_eq!(errors, vec![ParseErrorKind::UnexpectedToken]);
        match &statements[0] {
            Statement::Call(call) => assert!(call.from.is_none()),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_labels_past_the_nesting_limit_drop_their_body() {
        let levels = MAX_NESTING + 40;
        let mut source = String::new();
        for level in 0..levels {
            source.push_str(&format!("{}label l{}:\n", " ".repeat(level), level));
        }
        source.push_str(&format!("{}pass\nreturn\n", " ".repeat(levels)));

        let (statements, errors) = block(&source);
        assert_eq!(errors, vec![ParseErrorKind::UnexpectedToken]);
        assert_eq!(statements.len(), 2);
        assert!(matches!(statements[1], Statement::Return(_)));

        let mut depth = 0;
        let mut node = &statements[0];
        while let Some(child) = node.children().first() {
            depth += 1;
            node = child;
        }
        assert_eq!(depth, MAX_NESTING);
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_python_line() {
        let (statements, errors) = block("$ renpy.pause(1.0)\n");
        assert!(errors.is_empty());
        match &statements[0] {
            Statement::Python(python) => {
                let code = python.code.as_ref().expect("code");
                assert_eq!(code.source, "renpy.pause(1.0)");
                assert!(code.terminated);
            }
            other => panic!("expected python, got {:?}", other),
        }
    }

    #[test]
    fn test_dedent_closes_label_with_empty_body() {
        let (statements, _) = block("label empty:\npass\n");
        assert_eq!(statements.len(), 2);
        assert!(statements[0].children().is_empty());
        assert_eq!(statements[0].range().end.offset, 12);
    }
}
