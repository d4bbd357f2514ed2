//! Token kind families
//!
//!     Every token kind belongs to exactly one family. The grammar only ever asks for a
//!     specific kind, so families mostly matter for highlighting and for the filter sets
//!     the parser installs on its cursor.
//!
//!     Keyword: reserved words, classified after a whole identifier has been scanned.
//!     Operator: assignment, comparison and arithmetic symbols (maximal munch).
//!     Character: punctuation, whitespace and newlines.
//!     Literal: integer, float, string and boolean literals.
//!     Entity: identifier-like names.
//!     Meta: comments, invalid input and embedded python expression spans.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Keyword(KeywordKind),
    Operator(OperatorKind),
    Character(CharacterKind),
    Literal(LiteralKind),
    Entity(EntityKind),
    Meta(MetaKind),
}

impl TokenKind {
    pub const NEWLINE: TokenKind = TokenKind::Character(CharacterKind::Newline);
    pub const WHITESPACE: TokenKind = TokenKind::Character(CharacterKind::Whitespace);
    pub const COMMENT: TokenKind = TokenKind::Meta(MetaKind::Comment);
    pub const INVALID: TokenKind = TokenKind::Meta(MetaKind::Invalid);
    pub const PYTHON_EXPRESSION: TokenKind = TokenKind::Meta(MetaKind::PythonExpression);
    pub const IDENTIFIER: TokenKind = TokenKind::Entity(EntityKind::Identifier);

    /// Human readable name, as used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Keyword(keyword) => keyword.as_str(),
            TokenKind::Operator(operator) => operator.as_str(),
            TokenKind::Character(character) => character.as_str(),
            TokenKind::Literal(literal) => literal.as_str(),
            TokenKind::Entity(EntityKind::Identifier) => "identifier",
            TokenKind::Meta(meta) => meta.as_str(),
        }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Character(CharacterKind::Whitespace) | TokenKind::Meta(MetaKind::Comment)
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! keywords {
    ($($variant:ident => $text:literal),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum KeywordKind {
            $($variant),+
        }

        impl KeywordKind {
            pub const ALL: &'static [KeywordKind] = &[$(KeywordKind::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(KeywordKind::$variant => $text),+
                }
            }
        }
    };
}

keywords! {
    Define => "define",
    Default => "default",
    Label => "label",
    Jump => "jump",
    Call => "call",
    Return => "return",
    Pass => "pass",
    Pause => "pause",
    Init => "init",
    Python => "python",
    If => "if",
    Elif => "elif",
    Else => "else",
    While => "while",
    For => "for",
    In => "in",
    Not => "not",
    And => "and",
    Or => "or",
    Is => "is",
    Menu => "menu",
    Show => "show",
    Scene => "scene",
    Hide => "hide",
    With => "with",
    At => "at",
    As => "as",
    Behind => "behind",
    Onlayer => "onlayer",
    Zorder => "zorder",
    Image => "image",
    Screen => "screen",
    Transform => "transform",
    Style => "style",
    Translate => "translate",
    Play => "play",
    Stop => "stop",
    Queue => "queue",
    Voice => "voice",
    Window => "window",
    Nvl => "nvl",
    Expression => "expression",
    From => "from",
    Use => "use",
    Has => "has",
}

static KEYWORDS: Lazy<HashMap<&'static str, KeywordKind>> = Lazy::new(|| {
    KeywordKind::ALL
        .iter()
        .map(|keyword| (keyword.as_str(), *keyword))
        .collect()
});

/// Exact-match keyword lookup for a fully scanned identifier.
pub fn keyword_for(word: &str) -> Option<KeywordKind> {
    KEYWORDS.get(word).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperatorKind {
    Assign,
    PlusAssign,
    MinusAssign,
    MultiplyAssign,
    DivideAssign,
    OrAssign,
    Equals,
    NotEquals,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Plus,
    Minus,
    Multiply,
    Divide,
    FloorDivide,
    Modulo,
    Power,
    BitOr,
    BitAnd,
    BitXor,
    BitNot,
}

impl OperatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorKind::Assign => "=",
            OperatorKind::PlusAssign => "+=",
            OperatorKind::MinusAssign => "-=",
            OperatorKind::MultiplyAssign => "*=",
            OperatorKind::DivideAssign => "/=",
            OperatorKind::OrAssign => "|=",
            OperatorKind::Equals => "==",
            OperatorKind::NotEquals => "!=",
            OperatorKind::Less => "<",
            OperatorKind::LessEqual => "<=",
            OperatorKind::Greater => ">",
            OperatorKind::GreaterEqual => ">=",
            OperatorKind::Plus => "+",
            OperatorKind::Minus => "-",
            OperatorKind::Multiply => "*",
            OperatorKind::Divide => "/",
            OperatorKind::FloorDivide => "//",
            OperatorKind::Modulo => "%",
            OperatorKind::Power => "**",
            OperatorKind::BitOr => "|",
            OperatorKind::BitAnd => "&",
            OperatorKind::BitXor => "^",
            OperatorKind::BitNot => "~",
        }
    }

    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            OperatorKind::Assign
                | OperatorKind::PlusAssign
                | OperatorKind::MinusAssign
                | OperatorKind::MultiplyAssign
                | OperatorKind::DivideAssign
                | OperatorKind::OrAssign
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CharacterKind {
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Colon,
    Comma,
    Dot,
    Dollar,
    At,
    Whitespace,
    Newline,
}

impl CharacterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterKind::OpenParen => "(",
            CharacterKind::CloseParen => ")",
            CharacterKind::OpenBracket => "[",
            CharacterKind::CloseBracket => "]",
            CharacterKind::OpenBrace => "{",
            CharacterKind::CloseBrace => "}",
            CharacterKind::Colon => ":",
            CharacterKind::Comma => ",",
            CharacterKind::Dot => ".",
            CharacterKind::Dollar => "$",
            CharacterKind::At => "@",
            CharacterKind::Whitespace => "whitespace",
            CharacterKind::Newline => "newline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LiteralKind {
    Integer,
    Float,
    String,
    Boolean,
}

impl LiteralKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiteralKind::Integer => "integer",
            LiteralKind::Float => "float",
            LiteralKind::String => "string",
            LiteralKind::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    Identifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetaKind {
    Comment,
    Invalid,
    PythonExpression,
}

impl MetaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaKind::Comment => "comment",
            MetaKind::Invalid => "invalid",
            MetaKind::PythonExpression => "python expression",
        }
    }
}
