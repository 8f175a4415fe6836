use crate::ast::{self, Identifier};

/// Append-only buffer of assembly lines in emission order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AsmOutput {
    pub lines: Vec<AsmLine>,
}

impl AsmOutput {
    pub fn push(&mut self, line: AsmLine) {
        self.lines.push(line);
    }

    pub fn instruction(&mut self, instruction: AsmInstruction) {
        self.lines.push(AsmLine::Instruction(instruction));
    }

    pub fn label(&mut self, label: Label) {
        self.lines.push(AsmLine::Label(label));
    }

    pub fn append(&mut self, other: &mut AsmOutput) {
        self.lines.append(&mut other.lines);
    }

    pub fn instructions(&self) -> impl Iterator<Item = &AsmInstruction> {
        self.lines.iter().filter_map(|line| match line {
            AsmLine::Instruction(instruction) => Some(instruction),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.lines.iter().filter_map(|line| match line {
            AsmLine::Label(label) => Some(label),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmLine {
    Directive(Directive),
    Label(Label),
    Instruction(AsmInstruction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    IntelSyntax,
    Globl(Identifier),
}

/// Jump target. Local labels carry the suffix handed out by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Symbol(Identifier),
    Else(usize),
    End(usize),
    Begin(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmInstruction {
    Push(Operand),
    Pop(Register),
    /// Intel operand order: destination first.
    Mov(Operand, Operand),
    Movzb(Register, Register),
    Binary(BinaryOp, Operand, Operand),
    Cqo,
    Idiv(Operand),
    Cmp(Operand, Operand),
    SetCC(Condition, Register),
    Jmp(Label),
    JmpCC(Condition, Label),
    Call(Identifier),
    Ret,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Imul,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    E,
    NE,
    L,
    LE,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Imm(i64),
    Reg(Register),
    /// `[reg]`
    Mem(Register),
    /// `[rbp-offset]`
    Stack(i64),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Register {
    Rax,
    Rdi,
    Rsi,
    Rdx,
    Rcx,
    R8,
    R9,
    Rbp,
    Rsp,
    Al,
}

/// Integer argument registers of the System V calling convention, in order.
pub const ARG_REGISTERS: [Register; 6] = [
    Register::Rdi,
    Register::Rsi,
    Register::Rdx,
    Register::Rcx,
    Register::R8,
    Register::R9,
];

impl From<Register> for Operand {
    fn from(value: Register) -> Self {
        Self::Reg(value)
    }
}

impl TryFrom<ast::BinaryOp> for Condition {
    type Error = ast::BinaryOp;
    fn try_from(value: ast::BinaryOp) -> Result<Self, ast::BinaryOp> {
        match value {
            ast::BinaryOp::IsEqual => Ok(Self::E),
            ast::BinaryOp::IsNotEqual => Ok(Self::NE),
            ast::BinaryOp::LessThan => Ok(Self::L),
            ast::BinaryOp::LessOrEqual => Ok(Self::LE),
            _ => Err(value),
        }
    }
}

impl TryFrom<ast::BinaryOp> for BinaryOp {
    type Error = ast::BinaryOp;
    fn try_from(value: ast::BinaryOp) -> Result<Self, ast::BinaryOp> {
        match value {
            ast::BinaryOp::Add => Ok(Self::Add),
            ast::BinaryOp::Substract => Ok(Self::Sub),
            ast::BinaryOp::Multiply => Ok(Self::Imul),
            _ => Err(value),
        }
    }
}
