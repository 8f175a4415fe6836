//! Code emission using [Display]
//!
//! Implements [Display] for [`AsmOutput`](crate::codegen::AsmOutput) and its
//! parts, so a generated program turns into GNU assembler input with
//! [to_string] or any formatting macro. Output is Intel syntax without
//! register prefixes; instructions are indented by two spaces.
//!
//! [Display]: https://doc.rust-lang.org/std/fmt/trait.Display.html
//! [to_string]: https://doc.rust-lang.org/std/string/trait.ToString.html#tymethod.to_string


use crate::codegen::*;

use std::fmt;

/// Appends the syntax directive and the entry trampoline that calls `main`.
pub fn preamble(output: &mut AsmOutput) {
    output.push(AsmLine::Directive(Directive::IntelSyntax));
    output.instruction(AsmInstruction::Mov(Register::Rax.into(), Operand::Imm(0)));
    output.instruction(AsmInstruction::Call("main".into()));
    output.instruction(AsmInstruction::Ret);
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Rax => "rax",
            Self::Rdi => "rdi",
            Self::Rsi => "rsi",
            Self::Rdx => "rdx",
            Self::Rcx => "rcx",
            Self::R8 => "r8",
            Self::R9 => "r9",
            Self::Rbp => "rbp",
            Self::Rsp => "rsp",
            Self::Al => "al",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Imm(i) => write!(f, "{i}"),
            Self::Reg(r) => write!(f, "{r}"),
            Self::Mem(r) => write!(f, "[{r}]"),
            Self::Stack(offset) => write!(f, "[rbp-{offset}]"),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::E => write!(f, "e"),
            Self::NE => write!(f, "ne"),
            Self::L => write!(f, "l"),
            Self::LE => write!(f, "le"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Sub => write!(f, "sub"),
            Self::Imul => write!(f, "imul"),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Symbol(name) => write!(f, "{name}"),
            Self::Else(id) => write!(f, ".L.else.{id}"),
            Self::End(id) => write!(f, ".L.end.{id}"),
            Self::Begin(id) => write!(f, ".L.begin.{id}"),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::IntelSyntax => write!(f, ".intel_syntax noprefix"),
            Self::Globl(name) => write!(f, ".globl {name}"),
        }
    }
}

impl fmt::Display for AsmInstruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Push(op) => write!(f, "push {op}"),
            Self::Pop(reg) => write!(f, "pop {reg}"),
            Self::Mov(dst, src) => write!(f, "mov {dst}, {src}"),
            Self::Movzb(dst, src) => write!(f, "movzb {dst}, {src}"),
            Self::Binary(op, dst, src) => write!(f, "{op} {dst}, {src}"),
            Self::Cqo => write!(f, "cqo"),
            Self::Idiv(op) => write!(f, "idiv {op}"),
            Self::Cmp(lhs, rhs) => write!(f, "cmp {lhs}, {rhs}"),
            Self::SetCC(cond, reg) => write!(f, "set{cond} {reg}"),
            Self::Jmp(label) => write!(f, "jmp {label}"),
            Self::JmpCC(cond, label) => write!(f, "j{cond} {label}"),
            Self::Call(name) => write!(f, "call {name}"),
            Self::Ret => write!(f, "ret"),
        }
    }
}

impl fmt::Display for AsmLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Directive(directive) => write!(f, "{directive}"),
            Self::Label(label) => write!(f, "{label}:"),
            Self::Instruction(instruction) => write!(f, "  {instruction}"),
        }
    }
}

impl fmt::Display for AsmOutput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
