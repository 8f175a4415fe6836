use crate::ast::Identifier;
use crate::lexer::{Token, TokenKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum InnerParseError {
    #[error("expected '{0}', but got {1}")]
    ExpectedButGot(TokenKind, Token),
    #[error("expected identifier, but got {0}")]
    ExpectedIdentifier(Token),
    #[error("expected number, but got {0}")]
    ExpectedNumber(Token),
    #[error("expected type, but got {0}")]
    ExpectedType(Token),
    #[error("bad factor {0}")]
    BadFactor(Token),
    #[error("reached unexpected EOF")]
    UnexpectedEof,
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(Identifier),
    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(Identifier),
    #[error("invalid array length {0}")]
    InvalidArrayLength(i64),
    #[error("sizeof expects a variable or a number")]
    InvalidSizeofOperand,
    #[error("function {0} takes more than six parameters")]
    TooManyParameters(Identifier),
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("{inner} (at byte {pos})")]
pub struct ParseError {
    pub inner: InnerParseError,
    pub pos: usize,
}

impl InnerParseError {
    pub fn set_pos(self, pos: usize) -> ParseError {
        ParseError { inner: self, pos }
    }
}
