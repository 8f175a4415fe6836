mod args;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use stackcc::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));

    tracing_subscriber::fmt()
        .compact()
        .without_time()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn tokenize(args: &Args) -> Result<lexer::Tokens> {
    let tokens = lexer::lex(&args.source).context("failed to tokenize")?;
    if args.lex {
        eprintln!("{tokens:#?}");
    }
    Ok(tokens)
}

fn parse(tokens: &[lexer::Token], args: &Args) -> Result<ast::Program> {
    let program = parser::parse(tokens).context("failed to parse")?;
    if args.parse {
        eprintln!("{program:#?}");
    }
    Ok(program)
}

fn gen_asm(program: &ast::Program) -> Result<codegen::AsmOutput> {
    let mut output = codegen::AsmOutput::default();
    emission::preamble(&mut output);
    let mut body = codegen::codegen(program).context("failed to generate code")?;
    output.append(&mut body);
    Ok(output)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let tokens = tokenize(&args)?;
    if args.lex {
        return Ok(());
    }

    let program = parse(&tokens, &args)?;
    if args.parse {
        return Ok(());
    }

    let asm = gen_asm(&program)?;
    info!(lines = asm.lines.len(), "emitting assembly");
    print!("{asm}");

    Ok(())
}
