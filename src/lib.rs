#![deny(unused_must_use)]
#![warn(clippy::pedantic)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::must_use_candidate)]

pub mod ast;
#[cfg(feature = "codegen")]
pub mod codegen;
#[cfg(feature = "emission")]
pub mod emission;
#[cfg(feature = "lexer")]
pub mod lexer;
#[cfg(feature = "parser")]
pub mod parser;
pub mod types;

use thiserror::Error;

/// Any error that stops a compilation, tagged by the stage that raised it.
#[derive(Debug, Error)]
pub enum CompileError {
    #[cfg(feature = "lexer")]
    #[error("lexer error: {0}")]
    Lex(#[from] lexer::LexError),
    #[cfg(feature = "parser")]
    #[error("syntax error: {0}")]
    Parse(#[from] parser::ParseError),
    #[cfg(feature = "codegen")]
    #[error("codegen error: {0}")]
    Codegen(#[from] codegen::CodegenError),
}

/// Compiles a whole program into assembler source text.
#[cfg(feature = "emission")]
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = lexer::lex(source)?;
    let program = parser::parse(&tokens)?;
    let mut body = codegen::codegen(&program)?;

    let mut output = codegen::AsmOutput::default();
    emission::preamble(&mut output);
    output.append(&mut body);
    Ok(output.to_string())
}
