//! Grammar rule engine
//!
//!     A grammar rule is two operations over the [cursor](super::DocumentParser):
//!
//!     - `test`: lookahead only. Answers whether the rule could start here, without side
//!       effects.
//!     - `parse`: consumes input and builds a node, returning `None` when it fails. Failures
//!       are recorded on the cursor by the primitive that failed.
//!
//!     Rules are stateless values, so composites simply own their parts. There is no
//!     repetition combinator: callers loop, testing before each iteration.

use super::parser::DocumentParser;
use crate::renpy::ast::range::Range;
use crate::renpy::ast::{AssignmentOperation, AstNode, Expression};
use crate::renpy::token::{OperatorKind, TokenKind};

pub trait GrammarRule {
    type Output;

    fn test(&self, parser: &DocumentParser<'_>) -> bool;

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<Self::Output>;
}

/// Ordered choice: dispatches to the first candidate whose test passes.
pub struct Alternation<T> {
    candidates: Vec<Box<dyn GrammarRule<Output = T>>>,
}

impl<T> Alternation<T> {
    pub fn new(candidates: Vec<Box<dyn GrammarRule<Output = T>>>) -> Self {
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl<T> GrammarRule for Alternation<T> {
    type Output = T;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        self.candidates.iter().any(|candidate| candidate.test(parser))
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<T> {
        let Some(candidate) = self
            .candidates
            .iter()
            .find(|candidate| candidate.test(parser))
        else {
            parser.record_unexpected();
            return None;
        };
        candidate.parse(parser)
    }
}

/// `left OP right`, where `OP` is one of a fixed set of assignment operators.
pub struct AssignmentOperationRule<L, R> {
    left: L,
    operators: &'static [OperatorKind],
    right: R,
}

impl<L, R> AssignmentOperationRule<L, R> {
    pub fn new(left: L, operators: &'static [OperatorKind], right: R) -> Self {
        Self {
            left,
            operators,
            right,
        }
    }
}

impl<L, R> AssignmentOperationRule<L, R>
where
    R: GrammarRule<Output = Expression>,
{
    /// Parse the operator and right side for a left side the caller already parsed.
    pub fn parse_after(
        &self,
        parser: &mut DocumentParser<'_>,
        left: Expression,
    ) -> Option<AssignmentOperation> {
        let kinds: Vec<TokenKind> = self
            .operators
            .iter()
            .map(|operator| TokenKind::Operator(*operator))
            .collect();
        let operator = match parser.any_of_token(&kinds)?.kind {
            TokenKind::Operator(operator) => operator,
            _ => return None,
        };
        let right = parser.require(&self.right)?;
        let range = Range::new(left.range().start, right.range().end);
        Some(AssignmentOperation {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            range,
        })
    }
}

impl<L, R> GrammarRule for AssignmentOperationRule<L, R>
where
    L: GrammarRule<Output = Expression>,
    R: GrammarRule<Output = Expression>,
{
    type Output = AssignmentOperation;

    fn test(&self, parser: &DocumentParser<'_>) -> bool {
        self.left.test(parser)
    }

    fn parse(&self, parser: &mut DocumentParser<'_>) -> Option<AssignmentOperation> {
        let left = parser.require(&self.left)?;
        self.parse_after(parser, left)
    }
}
