//! Base tokenization using the logos lexer
//!
//! This is where source strings become raw lexemes. Every raw lexeme maps onto exactly one
//! [`TokenKind`]; the [tokenizer](super::tokenize) turns them into positioned tokens and
//! splices in the embedded python spans that logos never sees.

use super::common::string_body_len;
use crate::renpy::token::{
    keyword_for, CharacterKind, KeywordKind, LiteralKind, OperatorKind, TokenKind,
};
use logos::{Lexer, Logos};

/// All lexemes of the Ren'Py surface grammar
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken {
    #[regex(r"[ \t\f]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"#[^\r\n]*")]
    Comment,

    #[regex(r"[_\p{XID_Start}]\p{XID_Continue}*", classify_word)]
    Word(WordKind),

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    Float,

    #[token("\"", |lex| lex_string(lex, "\""))]
    #[token("'", |lex| lex_string(lex, "'"))]
    #[token("`", |lex| lex_string(lex, "`"))]
    #[token("\"\"\"", |lex| lex_string(lex, "\"\"\""))]
    #[token("'''", |lex| lex_string(lex, "'''"))]
    String(Termination),

    #[token("=", |_| OperatorKind::Assign)]
    #[token("+=", |_| OperatorKind::PlusAssign)]
    #[token("-=", |_| OperatorKind::MinusAssign)]
    #[token("*=", |_| OperatorKind::MultiplyAssign)]
    #[token("/=", |_| OperatorKind::DivideAssign)]
    #[token("|=", |_| OperatorKind::OrAssign)]
    #[token("==", |_| OperatorKind::Equals)]
    #[token("!=", |_| OperatorKind::NotEquals)]
    #[token("<", |_| OperatorKind::Less)]
    #[token("<=", |_| OperatorKind::LessEqual)]
    #[token(">", |_| OperatorKind::Greater)]
    #[token(">=", |_| OperatorKind::GreaterEqual)]
    #[token("+", |_| OperatorKind::Plus)]
    #[token("-", |_| OperatorKind::Minus)]
    #[token("*", |_| OperatorKind::Multiply)]
    #[token("/", |_| OperatorKind::Divide)]
    #[token("//", |_| OperatorKind::FloorDivide)]
    #[token("%", |_| OperatorKind::Modulo)]
    #[token("**", |_| OperatorKind::Power)]
    #[token("|", |_| OperatorKind::BitOr)]
    #[token("&", |_| OperatorKind::BitAnd)]
    #[token("^", |_| OperatorKind::BitXor)]
    #[token("~", |_| OperatorKind::BitNot)]
    Operator(OperatorKind),

    #[token("(", |_| CharacterKind::OpenParen)]
    #[token(")", |_| CharacterKind::CloseParen)]
    #[token("[", |_| CharacterKind::OpenBracket)]
    #[token("]", |_| CharacterKind::CloseBracket)]
    #[token("{", |_| CharacterKind::OpenBrace)]
    #[token("}", |_| CharacterKind::CloseBrace)]
    #[token(":", |_| CharacterKind::Colon)]
    #[token(",", |_| CharacterKind::Comma)]
    #[token(".", |_| CharacterKind::Dot)]
    #[token("$", |_| CharacterKind::Dollar)]
    #[token("@", |_| CharacterKind::At)]
    Punctuation(CharacterKind),
}

/// Classification of a fully scanned identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordKind {
    Keyword(KeywordKind),
    Boolean,
    Identifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Terminated,
    Unterminated,
}

fn classify_word(lex: &mut Lexer<RawToken>) -> WordKind {
    let word = lex.slice();
    if let Some(keyword) = keyword_for(word) {
        WordKind::Keyword(keyword)
    } else if word == "True" || word == "False" {
        WordKind::Boolean
    } else {
        WordKind::Identifier
    }
}

// An unterminated string swallows the rest of the input.
fn lex_string(lex: &mut Lexer<RawToken>, quote: &str) -> Termination {
    let rest = lex.remainder();
    match string_body_len(rest, quote) {
        Some(len) => {
            lex.bump(len);
            Termination::Terminated
        }
        None => {
            lex.bump(rest.len());
            Termination::Unterminated
        }
    }
}

impl RawToken {
    /// The token kind for this lexeme, plus the wrapped kind for unterminated lexemes.
    pub fn classify(self) -> (TokenKind, Option<TokenKind>) {
        let string = TokenKind::Literal(LiteralKind::String);
        match self {
            RawToken::Whitespace => (TokenKind::WHITESPACE, None),
            RawToken::Newline => (TokenKind::NEWLINE, None),
            RawToken::Comment => (TokenKind::COMMENT, None),
            RawToken::Word(WordKind::Keyword(keyword)) => (TokenKind::Keyword(keyword), None),
            RawToken::Word(WordKind::Boolean) => {
                (TokenKind::Literal(LiteralKind::Boolean), None)
            }
            RawToken::Word(WordKind::Identifier) => (TokenKind::IDENTIFIER, None),
            RawToken::Integer => (TokenKind::Literal(LiteralKind::Integer), None),
            RawToken::Float => (TokenKind::Literal(LiteralKind::Float), None),
            RawToken::String(Termination::Terminated) => (string, None),
            RawToken::String(Termination::Unterminated) => (TokenKind::INVALID, Some(string)),
            RawToken::Operator(operator) => (TokenKind::Operator(operator), None),
            RawToken::Punctuation(character) => (TokenKind::Character(character), None),
        }
    }
}
