//! Expression rules
//!
//!     <expression> = <literal> | <parenthesized> | <variable>
//!
//!     The alternation is rebuilt wherever it is needed instead of being shared, which keeps
//!     the recursive parenthesized rule free of self references.

use super::parser::DocumentParser;
use super::rules::{Alternation, GrammarRule};
use crate::renpy::ast::{
    Expression, Literal, Parenthesized, PythonExpression, Range, VariableReference,
};
use crate::renpy::token::{CharacterKind, LiteralKind, TokenKind};

const LITERAL_KINDS: [LiteralKind; 4] = [
    LiteralKind::Integer,
    LiteralKind::Float,
    LiteralKind::String,
    LiteralKind::Boolean,
];

const DOT: TokenKind = TokenKind::Character(CharacterKind::Dot);
const OPEN_PAREN: TokenKind = TokenKind::Character(CharacterKind::OpenParen);
const CLOSE_PAREN: TokenKind = TokenKind::Character(CharacterKind::CloseParen);

/// The expression alternation: literal, then parenthesized, then variable.
pub fn expression_rule() -> Alternation<Expression> {
    Alternation::new(vec![
        Box::new(LiteralRule),
        Box::new(ParenthesizedRule),
        Box::new(VariableRule),
    ])
}

pub struct LiteralRule;

impl GrammarRule for LiteralRule {
    type Output = Expression;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        LITERAL_KINDS
            .iter()
            .any(|kind| parser.test(TokenKind::Literal(*kind)))
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<Expression> {
        let kind = LITERAL_KINDS
            .into_iter()
            .find(|kind| parser.test(TokenKind::Literal(*kind)))?;
        let token = parser.require_token(TokenKind::Literal(kind))?;
        Some(Expression::Literal(Literal::new(
            kind,
            token.value(parser.source()),
            token.range(),
        )))
    }
}

/// A name with optional dotted attribute access, such as `persistent.seen`.
///
/// Only the first segment must be an identifier; attribute segments may be keywords, as in
/// `config.window`.
pub struct VariableRule;

impl GrammarRule for VariableRule {
    type Output = Expression;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        parser.test(TokenKind::IDENTIFIER)
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<Expression> {
        let first = parser.require_token(TokenKind::IDENTIFIER)?;
        let mut name = first.value(parser.source()).to_string();
        while parser.optional_token(DOT).is_some() {
            let part = parser.require_name()?;
            name.push('.');
            name.push_str(part.value(parser.source()));
        }
        let range = parser.range_from(first.start);
        Some(Expression::Variable(VariableReference::new(name, range)))
    }
}

pub struct ParenthesizedRule;

impl ParenthesizedRule {
    fn parse_nested(parser: &mut DocumentParser<'_>) -> Option<Expression> {
        let open = parser.require_token(OPEN_PAREN)?;
        let inner = parser.require(&expression_rule())?;
        parser.require_token(CLOSE_PAREN)?;
        Some(Expression::Parenthesized(Parenthesized {
            inner: Box::new(inner),
            range: parser.range_from(open.start),
        }))
    }
}

impl GrammarRule for ParenthesizedRule {
    type Output = Expression;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        parser.test(OPEN_PAREN)
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<Expression> {
        if !parser.enter_nested() {
            parser.skip_rest_of_line();
            return None;
        }
        let parenthesized = Self::parse_nested(parser);
        parser.leave_nested();
        parenthesized
    }
}

/// An embedded python span, kept as raw text.
pub struct PythonExpressionRule;

impl GrammarRule for PythonExpressionRule {
    type Output = Expression;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        parser.test(TokenKind::PYTHON_EXPRESSION)
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<Expression> {
        parse_python(parser).map(Expression::PythonExpression)
    }
}

pub(crate) fn parse_python(parser: &mut DocumentParser<'_>) -> Option<PythonExpression> {
    let token = parser.require_token(TokenKind::PYTHON_EXPRESSION)?;
    Some(PythonExpression {
        source: token.value(parser.source()).to_string(),
        terminated: !token.is_invalid(),
        range: Range::new(token.start, token.end),
    })
}
