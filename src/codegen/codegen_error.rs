use crate::ast::Identifier;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodegenError>;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum CodegenError {
    #[error("invalid node: {0}")]
    InvalidNode(String),
    #[error("call to {name} passes {count} arguments, at most six are supported")]
    TooManyArguments { name: Identifier, count: usize },
}
