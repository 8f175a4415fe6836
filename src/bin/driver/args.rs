use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "stackcc",
    version,
    about = "Compiles a C subset program into x86-64 Intel syntax assembly"
)]
pub struct Args {
    /// Program text to compile (not a file name)
    pub source: String,

    /// Stop after lexing and dump the tokens to stderr
    #[arg(long, conflicts_with = "parse")]
    pub lex: bool,

    /// Stop after parsing and dump the AST to stderr
    #[arg(long)]
    pub parse: bool,

    /// Raise log verbosity; repeat for more (RUST_LOG overrides)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
