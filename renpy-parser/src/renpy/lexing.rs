//! Tokenizer
//!
//! This module turns Ren'Py source text into a [`TokenStream`].
//!
//! Structure:
//!     Core lexemes come from a logos lexer (./lexing/base_tokenization.rs). Ren'Py lines can
//!     embed python expressions, which logos cannot delimit on its own, so the tokenizer keeps
//!     a small per-line context and, when a python context opens, hands the rest of the line
//!     to the embedded scanner (./lexing/embedded.rs). The scanned span becomes a single
//!     `PythonExpression` meta token.
//!
//! Python contexts:
//!     - the right hand side of the assignment in a `define` or `default` statement
//!     - the subscript between `[` and `]` after a `define` target
//!     - everything after a `$` that starts a line
//!     - everything after `jump expression` or `call expression`
//!
//! Guarantees:
//!     Tokenization never fails. Unknown characters, unterminated strings and unterminated
//!     python spans become `Invalid` tokens, and the latter two record the kind they wrap so
//!     that grammar tests for that kind still succeed. Tokens are contiguous and cover the
//!     whole input: concatenating their values yields the source exactly.

pub mod base_tokenization;
pub mod common;
pub mod embedded;

pub use common::{LexError, LexErrorKind};

use crate::renpy::ast::range::SourceLocation;
use crate::renpy::token::{CharacterKind, KeywordKind, Token, TokenKind, TokenStream};
use base_tokenization::RawToken;
use embedded::{scan_python_expression, scan_python_index, PythonScan};
use logos::Logos;
use std::ops::Range as ByteRange;
use tracing::debug;

/// Where on the current line the tokenizer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineContext {
    /// Only whitespace and comments so far.
    Start,
    /// After `define`/`default`, waiting for the assignment operator.
    AwaitingAssignment,
    /// After `jump`/`call`, where `expression` introduces a computed target.
    AwaitingTarget,
    /// The next bytes are a python subscript, closed by `]`.
    Index,
    /// The next bytes are a python expression.
    Python,
    Rest,
}

impl LineContext {
    fn after(self, kind: TokenKind) -> Self {
        match (self, kind) {
            (_, TokenKind::NEWLINE) => LineContext::Start,
            (LineContext::Start, TokenKind::WHITESPACE | TokenKind::COMMENT) => LineContext::Start,
            (LineContext::Start, TokenKind::Keyword(KeywordKind::Define | KeywordKind::Default)) => {
                LineContext::AwaitingAssignment
            }
            (LineContext::Start, TokenKind::Keyword(KeywordKind::Jump | KeywordKind::Call)) => {
                LineContext::AwaitingTarget
            }
            (LineContext::Start, TokenKind::Character(CharacterKind::Dollar)) => {
                LineContext::Python
            }
            (LineContext::AwaitingAssignment, TokenKind::Operator(operator))
                if operator.is_assignment() =>
            {
                LineContext::Python
            }
            (LineContext::AwaitingAssignment, TokenKind::Character(CharacterKind::OpenBracket)) => {
                LineContext::Index
            }
            (LineContext::AwaitingAssignment, _) => LineContext::AwaitingAssignment,
            (LineContext::AwaitingTarget, TokenKind::WHITESPACE) => LineContext::AwaitingTarget,
            (LineContext::AwaitingTarget, TokenKind::Keyword(KeywordKind::Expression)) => {
                LineContext::Python
            }
            _ => LineContext::Rest,
        }
    }
}

struct StreamBuilder {
    location: SourceLocation,
    tokens: Vec<Token>,
}

impl StreamBuilder {
    fn push(&mut self, kind: TokenKind, wrapped: Option<TokenKind>, span: ByteRange<usize>) {
        let range = self.location.byte_range_to_range(&span);
        let mut token = Token::new(kind, range.start, range.end);
        token.wrapped = wrapped;
        self.tokens.push(token);
    }

    /// Emit the python span starting at byte `base`, returning how many bytes it consumed.
    fn push_python(&mut self, rest: &str, base: usize, scanner: fn(&str) -> PythonScan) -> usize {
        let indent = rest.len() - rest.trim_start_matches([' ', '\t', '\x0c']).len();
        if indent > 0 {
            self.push(TokenKind::WHITESPACE, None, base..base + indent);
        }
        let start = base + indent;
        let scan = scanner(&rest[indent..]);
        match scan {
            PythonScan::Complete(0) => {}
            PythonScan::Complete(len) => {
                self.push(TokenKind::PYTHON_EXPRESSION, None, start..start + len)
            }
            PythonScan::Unterminated(len) => self.push(
                TokenKind::INVALID,
                Some(TokenKind::PYTHON_EXPRESSION),
                start..start + len,
            ),
        }
        indent + scan.len()
    }
}

/// Tokenize a whole document.
pub fn tokenize(source: &str) -> TokenStream {
    let mut builder = StreamBuilder {
        location: SourceLocation::new(source),
        tokens: Vec::new(),
    };
    let mut lexer = RawToken::lexer(source);
    let mut context = LineContext::Start;

    while let Some(result) = lexer.next() {
        let (kind, wrapped) = match result {
            Ok(raw) => raw.classify(),
            Err(()) => (TokenKind::INVALID, None),
        };
        builder.push(kind, wrapped, lexer.span());

        context = match context.after(kind) {
            LineContext::Python => {
                let consumed =
                    builder.push_python(lexer.remainder(), lexer.span().end, scan_python_expression);
                lexer.bump(consumed);
                LineContext::Rest
            }
            LineContext::Index => {
                let consumed =
                    builder.push_python(lexer.remainder(), lexer.span().end, scan_python_index);
                lexer.bump(consumed);
                LineContext::AwaitingAssignment
            }
            next => next,
        };
    }

    debug!(tokens = builder.tokens.len(), bytes = source.len(), "tokenized document");
    TokenStream::new(builder.tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renpy::ast::range::Position;
    use crate::renpy::token::{LiteralKind, OperatorKind};
    use rstest::rstest;

    fn visible(source: &str) -> Vec<(TokenKind, String)> {
        let stream = tokenize(source);
        let mut iter = stream.iter();
        iter.set_filter([TokenKind::WHITESPACE, TokenKind::COMMENT]);
        iter.map(|token| (token.kind, token.value(source).to_string()))
            .collect()
    }

    fn pair(kind: TokenKind, text: &str) -> (TokenKind, String) {
        (kind, text.to_string())
    }

    #[test]
    fn test_define_with_priority() {
        assert_eq!(
            visible("define 2 x = 5\n"),
            vec![
                pair(TokenKind::Keyword(KeywordKind::Define), "define"),
                pair(TokenKind::Literal(LiteralKind::Integer), "2"),
                pair(TokenKind::IDENTIFIER, "x"),
                pair(TokenKind::Operator(OperatorKind::Assign), "="),
                pair(TokenKind::PYTHON_EXPRESSION, "5"),
                pair(TokenKind::NEWLINE, "\n"),
            ]
        );
    }

    #[test]
    fn test_python_span_stops_before_comment() {
        let source = "default flags |= {'a', 'b'}  # start\n";
        let tokens = visible(source);
        assert_eq!(tokens[3], pair(TokenKind::PYTHON_EXPRESSION, "{'a', 'b'}"));
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokenize(source).reconstruct(source), source);
    }

    #[test]
    fn test_dollar_line() {
        assert_eq!(
            visible("    $ score += 1\n"),
            vec![
                pair(TokenKind::Character(CharacterKind::Dollar), "$"),
                pair(TokenKind::PYTHON_EXPRESSION, "score += 1"),
                pair(TokenKind::NEWLINE, "\n"),
            ]
        );
    }

    #[test]
    fn test_dollar_mid_line_is_punctuation() {
        let kinds: Vec<TokenKind> = visible("jump $ x\n").into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(KeywordKind::Jump),
                TokenKind::Character(CharacterKind::Dollar),
                TokenKind::IDENTIFIER,
                TokenKind::NEWLINE,
            ]
        );
    }

    #[test]
    fn test_keyword_after_line_start_does_not_open_python() {
        // `define` is only special at the start of a line
        let tokens = visible("jump define = 5\n");
        assert_eq!(tokens[3], pair(TokenKind::Literal(LiteralKind::Integer), "5"));
    }

    #[test]
    fn test_multiline_python_positions() {
        let source = "define items = [\n    1,\n    2]\nreturn\n";
        let stream = tokenize(source);
        let python = stream
            .flatten()
            .iter()
            .find(|token| token.kind == TokenKind::PYTHON_EXPRESSION)
            .copied();
        let python = python.expect("python span");
        assert_eq!(python.value(source), "[\n    1,\n    2]");
        assert_eq!(python.end, Position::new(2, 6, 30));
        let last = stream.flatten()[stream.len() - 2];
        assert_eq!(last.kind, TokenKind::Keyword(KeywordKind::Return));
        assert_eq!(last.start, Position::new(3, 0, 31));
    }

    #[test]
    fn test_unterminated_string_is_invalid_wrapping_string() {
        let source = "jump \"open\nreturn\n";
        let stream = tokenize(source);
        let last = stream.flatten().last().copied().expect("tokens");
        assert!(last.is_invalid());
        assert!(last.has_kind(TokenKind::Literal(LiteralKind::String)));
        assert_eq!(last.end.offset, source.len());
    }

    #[test]
    fn test_unterminated_python_is_invalid_wrapping_expression() {
        let source = "define x = (1,\n";
        let stream = tokenize(source);
        let last = stream.flatten().last().copied().expect("tokens");
        assert!(last.has_kind(TokenKind::PYTHON_EXPRESSION));
        assert_eq!(last.value(source), "(1,\n");
        assert_eq!(
            stream.lex_errors()[0].kind,
            LexErrorKind::UnterminatedExpression
        );
    }

    #[test]
    fn test_define_index_is_a_python_span() {
        let source = "define config.tag_layer[\"eileen\"] = \"master\"\n";
        let tokens = visible(source);
        assert_eq!(
            tokens[4..],
            [
                pair(TokenKind::Character(CharacterKind::OpenBracket), "["),
                pair(TokenKind::PYTHON_EXPRESSION, "\"eileen\""),
                pair(TokenKind::Character(CharacterKind::CloseBracket), "]"),
                pair(TokenKind::Operator(OperatorKind::Assign), "="),
                pair(TokenKind::PYTHON_EXPRESSION, "\"master\""),
                pair(TokenKind::NEWLINE, "\n"),
            ]
        );
        assert_eq!(tokenize(source).reconstruct(source), source);
    }

    #[rstest]
    #[case("jump expression \"ch\" + str(n)\n", "\"ch\" + str(n)")]
    #[case("    call expression target pass (1)\n", "target pass (1)")]
    fn test_expression_target_is_a_python_span(#[case] source: &str, #[case] python: &str) {
        let tokens = visible(source);
        assert_eq!(tokens[1], pair(TokenKind::Keyword(KeywordKind::Expression), "expression"));
        assert_eq!(tokens[2], pair(TokenKind::PYTHON_EXPRESSION, python));
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_expression_keyword_elsewhere_is_plain() {
        let kinds: Vec<TokenKind> = visible("call chapter expression\n")
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(kinds[2], TokenKind::Keyword(KeywordKind::Expression));
        assert_eq!(kinds.len(), 4);
    }

    #[test]
    fn test_define_without_value() {
        let tokens = visible("define x =\n");
        assert_eq!(tokens.last(), Some(&pair(TokenKind::NEWLINE, "\n")));
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_unknown_character() {
        let stream = tokenize("pass ?\n");
        assert_eq!(stream.flatten()[2].kind, TokenKind::INVALID);
        assert_eq!(stream.flatten()[2].wrapped, None);
    }

    #[test]
    fn test_empty_source() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_crlf_round_trip() {
        let source = "label start:\r\n    $ x = 1\r\n    return\r\n";
        assert_eq!(tokenize(source).reconstruct(source), source);
    }
}
