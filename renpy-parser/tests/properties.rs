//! Property-based tests for the token stream and the parser cursor
//!
//! Sources are generated from Ren'Py-shaped fragments, so they hit the interesting paths
//! (python spans, strings, indentation, comments), and from arbitrary text, so nothing
//! relies on well-formed input.

use proptest::prelude::*;
use renpy_parser::renpy::ast::range::SourceLocation;
use renpy_parser::renpy::lexing::tokenize;
use renpy_parser::renpy::parsing::{parse_document, DocumentParser, ParseErrorKind};
use renpy_parser::renpy::token::{KeywordKind, TokenKind};

fn fragment_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("define "),
        Just("default "),
        Just("label "),
        Just("jump "),
        Just("call "),
        Just("return"),
        Just("pass"),
        Just("$ "),
        Just("x"),
        Just("start"),
        Just(" = "),
        Just(" += "),
        Just("1"),
        Just("2.5"),
        Just("\"text\""),
        Just("'open"),
        Just("("),
        Just(")"),
        Just("["),
        Just(":"),
        Just(","),
        Just("# note"),
        Just("    "),
        Just("\n"),
        Just("\r\n"),
        Just("\\\n"),
        Just("?"),
        Just("é"),
    ]
}

fn renpy_like_source() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment_strategy(), 0..60).prop_map(|parts| parts.concat())
}

fn any_source() -> impl Strategy<Value = String> {
    prop_oneof![renpy_like_source(), any::<String>()]
}

proptest! {
    #[test]
    fn tokens_reconstruct_the_source(source in any_source()) {
        let stream = tokenize(&source);
        prop_assert_eq!(stream.reconstruct(&source), source);
    }

    #[test]
    fn tokens_are_contiguous_and_positioned(source in any_source()) {
        let stream = tokenize(&source);
        let location = SourceLocation::new(&source);
        let mut offset = 0;
        for token in stream.flatten() {
            prop_assert_eq!(token.start.offset, offset);
            prop_assert!(token.end.offset > token.start.offset);
            prop_assert_eq!(token.start, location.byte_to_position(token.start.offset));
            prop_assert_eq!(token.end, location.byte_to_position(token.end.offset));
            offset = token.end.offset;
        }
        prop_assert_eq!(offset, source.len());
    }

    #[test]
    fn filtering_hides_exactly_the_filtered_kinds(source in renpy_like_source()) {
        let stream = tokenize(&source);
        let hidden = [TokenKind::WHITESPACE, TokenKind::COMMENT];
        let mut iter = stream.iter();
        iter.set_filter(hidden);
        let filtered: Vec<_> = iter.copied().collect();
        let expected: Vec<_> = stream
            .flatten()
            .iter()
            .filter(|token| !hidden.contains(&token.kind))
            .copied()
            .collect();
        prop_assert_eq!(filtered, expected);
        // the stream itself is untouched
        prop_assert_eq!(stream.reconstruct(&source), source);
    }

    #[test]
    fn lookahead_never_advances(source in renpy_like_source(), steps in 0usize..20) {
        let stream = tokenize(&source);
        let mut parser = DocumentParser::new(&source, &stream);
        for _ in 0..steps {
            if !parser.has_next() {
                break;
            }
            parser.advance();
        }
        let consumed = parser.consumed();
        let next = parser.peek_next().copied();
        let errors = parser.errors().len();
        for kind in [TokenKind::NEWLINE, TokenKind::IDENTIFIER, TokenKind::Keyword(KeywordKind::Define)] {
            let first = parser.test(kind);
            prop_assert_eq!(parser.test(kind), first);
        }
        prop_assert_eq!(parser.consumed(), consumed);
        prop_assert_eq!(parser.peek_next().copied(), next);
        prop_assert_eq!(parser.errors().len(), errors);
    }

    #[test]
    fn failed_require_token_records_and_stays(source in renpy_like_source()) {
        let stream = tokenize(&source);
        let mut parser = DocumentParser::new(&source, &stream);
        let kind = TokenKind::Keyword(KeywordKind::Pause);
        prop_assume!(!parser.test(kind));
        let next = parser.peek_next().copied();
        prop_assert!(parser.require_token(kind).is_none());
        prop_assert_eq!(parser.consumed(), 0);
        prop_assert_eq!(parser.peek_next().copied(), next);
        prop_assert_eq!(parser.errors().len(), 1);
        prop_assert_eq!(parser.errors()[0].kind, ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn expect_eol_ends_at_a_line_boundary(source in renpy_like_source(), steps in 0usize..10) {
        let stream = tokenize(&source);
        let mut parser = DocumentParser::new(&source, &stream);
        for _ in 0..steps {
            if !parser.has_next() {
                break;
            }
            parser.advance();
        }
        parser.expect_eol();
        let at_boundary = !parser.has_next()
            || parser.current().is_some_and(|token| token.kind == TokenKind::NEWLINE);
        prop_assert!(at_boundary);
        prop_assert!(parser
            .errors()
            .iter()
            .all(|error| error.kind != ParseErrorKind::UnexpectedEndOfFile));
    }

    #[test]
    fn parsing_never_panics_and_ranges_stay_in_bounds(source in any_source()) {
        let output = parse_document(&source);
        for statement in &output.document.statements {
            prop_assert!(statement_in_bounds(statement, source.len()));
        }
    }
}

fn statement_in_bounds(
    statement: &renpy_parser::renpy::ast::Statement,
    len: usize,
) -> bool {
    use renpy_parser::renpy::ast::AstNode;
    let range = statement.range();
    range.start <= range.end
        && range.end.offset <= len
        && statement.children().iter().all(|child| {
            child.range().start >= range.start
                && child.range().end <= range.end
                && statement_in_bounds(child, len)
        })
}
