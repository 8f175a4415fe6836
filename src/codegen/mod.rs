pub mod asm_ast;
mod codegen_error;
mod gen;

use crate::ast::Program;

pub use asm_ast::*;
pub use codegen_error::{CodegenError, Result};
pub use gen::Generator;

use tracing::instrument;

/// Generates every function of `program` with one fresh [`Generator`], so
/// label suffixes are unique across the whole output.
#[instrument(skip_all)]
pub fn codegen(program: &Program) -> Result<AsmOutput> {
    let mut output = AsmOutput::default();
    let mut generator = Generator::new();

    for function in &program.functions {
        generator.generate(&mut output, function)?;
    }

    Ok(output)
}
