use crate::types::TypeKind;
use std::fmt;

/// Token with its source text and byte offset attached.
///
/// `value` holds the parsed number for [`TokenKind::Constant`] and is zero for
/// every other kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub value: i64,
    pub pos: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, pos: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            value: 0,
            pos,
        }
    }

    pub fn constant(value: i64, text: impl Into<String>, pos: usize) -> Self {
        Self {
            kind: TokenKind::Constant,
            text: text.into(),
            value,
            pos,
        }
    }
}

impl PartialEq<TokenKind> for Token {
    fn eq(&self, rhs: &TokenKind) -> bool {
        self.kind == *rhs
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.text)
    }
}

/// Basic token type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// type keyword (`int`)
    Type(TypeKind),
    /// any non-keyword word (variable names, function names, ..)
    Identifier,
    /// decimal numeric constant
    Constant,
    /// if keyword
    If,
    /// else keyword
    Else,
    /// while keyword
    While,
    /// for keyword
    For,
    /// return keyword
    Return,
    /// sizeof keyword
    Sizeof,
    /// (
    OpenParanth,
    /// )
    CloseParanth,
    /// {
    OpenCurly,
    /// }
    CloseCurly,
    /// [
    OpenBracket,
    /// ]
    CloseBracket,
    /// ;
    Semicolon,
    /// ,
    Comma,
    /// +
    Plus,
    /// -
    Hyphen,
    /// *
    Asterisk,
    /// /
    FSlash,
    /// &
    Ampersand,
    /// =
    Assign,
    /// ==
    IsEqual,
    /// !=
    IsNotEqual,
    /// <
    IsLessThan,
    /// >
    IsGreaterThan,
    /// <=
    IsLessThanOrEqual,
    /// >=
    IsGreaterThanOrEqual,
}

impl TokenKind {
    pub fn is_type(&self) -> bool {
        matches!(self, Self::Type(_))
    }

    pub fn is_binaryop(&self) -> bool {
        matches!(
            self,
            Self::Plus
                | Self::Hyphen
                | Self::Asterisk
                | Self::FSlash
                | Self::Assign
                | Self::IsEqual
                | Self::IsNotEqual
                | Self::IsLessThan
                | Self::IsGreaterThan
                | Self::IsLessThanOrEqual
                | Self::IsGreaterThanOrEqual
        )
    }

    /// Classifies a scanned word: keyword, type keyword or plain identifier.
    pub fn from_word(word: &str) -> Self {
        match word {
            "if" => Self::If,
            "else" => Self::Else,
            "while" => Self::While,
            "for" => Self::For,
            "return" => Self::Return,
            "sizeof" => Self::Sizeof,
            _ => TypeKind::from_keyword(word).map_or(Self::Identifier, Self::Type),
        }
    }
}

impl TryFrom<char> for TokenKind {
    type Error = char;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '(' => Ok(Self::OpenParanth),
            ')' => Ok(Self::CloseParanth),
            '{' => Ok(Self::OpenCurly),
            '}' => Ok(Self::CloseCurly),
            '[' => Ok(Self::OpenBracket),
            ']' => Ok(Self::CloseBracket),
            ';' => Ok(Self::Semicolon),
            ',' => Ok(Self::Comma),
            '+' => Ok(Self::Plus),
            '-' => Ok(Self::Hyphen),
            '*' => Ok(Self::Asterisk),
            '/' => Ok(Self::FSlash),
            '&' => Ok(Self::Ampersand),
            '=' => Ok(Self::Assign),
            '<' => Ok(Self::IsLessThan),
            '>' => Ok(Self::IsGreaterThan),
            _ => Err(c),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Type(kind) => kind.name(),
            Self::Identifier => "identifier",
            Self::Constant => "number",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::Return => "return",
            Self::Sizeof => "sizeof",
            Self::OpenParanth => "(",
            Self::CloseParanth => ")",
            Self::OpenCurly => "{",
            Self::CloseCurly => "}",
            Self::OpenBracket => "[",
            Self::CloseBracket => "]",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::Plus => "+",
            Self::Hyphen => "-",
            Self::Asterisk => "*",
            Self::FSlash => "/",
            Self::Ampersand => "&",
            Self::Assign => "=",
            Self::IsEqual => "==",
            Self::IsNotEqual => "!=",
            Self::IsLessThan => "<",
            Self::IsGreaterThan => ">",
            Self::IsLessThanOrEqual => "<=",
            Self::IsGreaterThanOrEqual => ">=",
        };
        write!(f, "{s}")
    }
}
