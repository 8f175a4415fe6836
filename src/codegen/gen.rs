use super::codegen_error::{CodegenError, Result};
use crate::ast::{self, Exp, Function, LVar, LVarId, Statement};
use crate::codegen::asm_ast::*;

use tracing::{debug, trace};

const STACK_ALIGN: i64 = 16;
const SLOT_SIZE: i64 = 8;

fn round_up(value: i64, align: i64) -> Option<i64> {
    value.checked_add(align - 1).map(|v| v / align * align)
}

fn lvar(function: &Function, id: LVarId) -> Result<&LVar> {
    function
        .lvar(id)
        .ok_or_else(|| {
            let msg = format!("variable #{} is not declared in {}", id.0, function.name);
            CodegenError::InvalidNode(msg)
        })
}

/// Stack machine code generator.
///
/// Every expression leaves one 8-byte value on the machine stack and every
/// statement accounts for exactly one value as well. `depth` follows those
/// pushes statically so calls can realign `rsp` without runtime checks.
#[derive(Debug)]
pub struct Generator {
    label_counter: usize,
    depth: i64,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Self {
            label_counter: 1,
            depth: 0,
        }
    }

    /// Values currently on the stack above the frame.
    pub fn depth(&self) -> i64 {
        self.depth
    }

    fn next_label(&mut self) -> usize {
        let id = self.label_counter;
        self.label_counter += 1;
        trace!(label = id, "allocated label suffix");
        id
    }

    fn push(&mut self, out: &mut AsmOutput, operand: impl Into<Operand>) {
        out.instruction(AsmInstruction::Push(operand.into()));
        self.depth += 1;
    }

    fn pop(&mut self, out: &mut AsmOutput, reg: Register) {
        out.instruction(AsmInstruction::Pop(reg));
        self.depth -= 1;
    }

    fn epilogue(out: &mut AsmOutput) {
        out.instruction(AsmInstruction::Mov(Register::Rsp.into(), Register::Rbp.into()));
        out.instruction(AsmInstruction::Pop(Register::Rbp));
        out.instruction(AsmInstruction::Ret);
    }

    /// Pops the top of the stack and jumps to `label` when it is zero.
    fn jump_if_zero(&mut self, out: &mut AsmOutput, label: Label) {
        self.pop(out, Register::Rax);
        out.instruction(AsmInstruction::Cmp(Register::Rax.into(), Operand::Imm(0)));
        out.instruction(AsmInstruction::JmpCC(Condition::E, label));
    }

    /// Replaces the address on top of the stack with the value it points to.
    fn load(&mut self, out: &mut AsmOutput) {
        self.pop(out, Register::Rax);
        out.instruction(AsmInstruction::Mov(Register::Rax.into(), Operand::Mem(Register::Rax)));
        self.push(out, Register::Rax);
    }

    fn gen_lval(&mut self, out: &mut AsmOutput, function: &Function, exp: &Exp) -> Result<()> {
        match exp {
            Exp::Var(id) => {
                let lvar = lvar(function, *id)?;
                out.instruction(AsmInstruction::Mov(Register::Rax.into(), Register::Rbp.into()));
                out.instruction(AsmInstruction::Binary(
                    BinaryOp::Sub,
                    Register::Rax.into(),
                    Operand::Imm(lvar.offset),
                ));
                self.push(out, Register::Rax);
                Ok(())
            }
            Exp::Deref(inner) => self.gen_exp(out, function, inner),
            other => Err(CodegenError::InvalidNode(format!("{other:?} is not an lvalue"))),
        }
    }

    fn gen_constant(&mut self, out: &mut AsmOutput, value: i64) {
        if i32::try_from(value).is_ok() {
            self.push(out, Operand::Imm(value));
        } else {
            out.instruction(AsmInstruction::Mov(Register::Rax.into(), Operand::Imm(value)));
            self.push(out, Register::Rax);
        }
    }

    fn gen_assign(&mut self, out: &mut AsmOutput, function: &Function, lhs: &Exp, rhs: &Exp) -> Result<()> {
        if let Exp::Var(id) = lhs {
            let target = lvar(function, *id)?;
            if target.is_array() {
                let msg = format!("cannot assign to array {}", target.name);
                return Err(CodegenError::InvalidNode(msg));
            }
        }

        self.gen_lval(out, function, lhs)?;
        self.gen_exp(out, function, rhs)?;
        self.pop(out, Register::Rdi);
        self.pop(out, Register::Rax);
        out.instruction(AsmInstruction::Mov(Operand::Mem(Register::Rax), Register::Rdi.into()));
        self.push(out, Register::Rdi);
        Ok(())
    }

    /// Element size to scale the right operand by, if the left one is a
    /// pointer variable.
    fn pointer_step(function: &Function, lhs: &Exp) -> Result<Option<i64>> {
        match lhs {
            Exp::Var(id) => {
                let lvar = lvar(function, *id)?;
                Ok(lvar.is_pointer().then(|| lvar.pointee_size()))
            }
            _ => Ok(None),
        }
    }

    fn gen_binary(
        &mut self,
        out: &mut AsmOutput,
        function: &Function,
        op: ast::BinaryOp,
        lhs: &Exp,
        rhs: &Exp,
    ) -> Result<()> {
        self.gen_exp(out, function, lhs)?;
        self.gen_exp(out, function, rhs)?;
        self.pop(out, Register::Rdi);
        self.pop(out, Register::Rax);

        if op.is_additive() {
            if let Some(step) = Self::pointer_step(function, lhs)? {
                out.instruction(AsmInstruction::Binary(
                    BinaryOp::Imul,
                    Register::Rdi.into(),
                    Operand::Imm(step),
                ));
            }
        }

        match op {
            ast::BinaryOp::Add | ast::BinaryOp::Substract | ast::BinaryOp::Multiply => {
                let asm_op = BinaryOp::try_from(op)
                    .map_err(|op| CodegenError::InvalidNode(format!("{op:?}")))?;
                out.instruction(AsmInstruction::Binary(asm_op, Register::Rax.into(), Register::Rdi.into()));
            }
            ast::BinaryOp::Div => {
                out.instruction(AsmInstruction::Cqo);
                out.instruction(AsmInstruction::Idiv(Register::Rdi.into()));
            }
            ast::BinaryOp::IsEqual
            | ast::BinaryOp::IsNotEqual
            | ast::BinaryOp::LessThan
            | ast::BinaryOp::LessOrEqual => {
                let condition = Condition::try_from(op)
                    .map_err(|op| CodegenError::InvalidNode(format!("{op:?}")))?;
                out.instruction(AsmInstruction::Cmp(Register::Rax.into(), Register::Rdi.into()));
                out.instruction(AsmInstruction::SetCC(condition, Register::Al));
                out.instruction(AsmInstruction::Movzb(Register::Rax, Register::Al));
            }
        }

        self.push(out, Register::Rax);
        Ok(())
    }

    fn gen_call(&mut self, out: &mut AsmOutput, function: &Function, name: &str, args: &[Exp]) -> Result<()> {
        if args.len() > ARG_REGISTERS.len() {
            return Err(CodegenError::TooManyArguments {
                name: name.to_owned(),
                count: args.len(),
            });
        }

        for arg in args {
            self.gen_exp(out, function, arg)?;
        }
        for reg in ARG_REGISTERS[..args.len()].iter().rev() {
            self.pop(out, *reg);
        }

        let misaligned = self.depth % 2 != 0;
        if misaligned {
            let align = Operand::Imm(SLOT_SIZE);
            out.instruction(AsmInstruction::Binary(BinaryOp::Sub, Register::Rsp.into(), align));
        }
        out.instruction(AsmInstruction::Mov(Register::Rax.into(), Operand::Imm(0)));
        out.instruction(AsmInstruction::Call(name.to_owned()));
        if misaligned {
            let align = Operand::Imm(SLOT_SIZE);
            out.instruction(AsmInstruction::Binary(BinaryOp::Add, Register::Rsp.into(), align));
        }

        self.push(out, Register::Rax);
        Ok(())
    }

    fn gen_exp(&mut self, out: &mut AsmOutput, function: &Function, exp: &Exp) -> Result<()> {
        match exp {
            Exp::Constant(value) => self.gen_constant(out, *value),
            Exp::Var(id) => {
                self.gen_lval(out, function, exp)?;
                // arrays decay to the address of their first element
                if !lvar(function, *id)?.is_array() {
                    self.load(out);
                }
            }
            Exp::Assign(lhs, rhs) => self.gen_assign(out, function, lhs, rhs)?,
            Exp::AddrOf(inner) => self.gen_lval(out, function, inner)?,
            Exp::Deref(inner) => {
                self.gen_exp(out, function, inner)?;
                self.load(out);
            }
            Exp::Binary(op, lhs, rhs) => self.gen_binary(out, function, *op, lhs, rhs)?,
            Exp::Call(name, args) => self.gen_call(out, function, name, args)?,
        }
        Ok(())
    }

    fn gen_if(
        &mut self,
        out: &mut AsmOutput,
        function: &Function,
        condition: &Exp,
        then: &Statement,
        els: Option<&Statement>,
    ) -> Result<()> {
        let id = self.next_label();
        self.gen_exp(out, function, condition)?;
        self.jump_if_zero(out, Label::Else(id));

        let entry = self.depth;
        self.gen_statement(out, function, then)?;
        out.instruction(AsmInstruction::Jmp(Label::End(id)));

        out.label(Label::Else(id));
        self.depth = entry;
        match els {
            Some(els) => self.gen_statement(out, function, els)?,
            None => self.push(out, Operand::Imm(0)),
        }
        out.label(Label::End(id));
        Ok(())
    }

    fn gen_while(&mut self, out: &mut AsmOutput, function: &Function, condition: &Exp, body: &Statement) -> Result<()> {
        let id = self.next_label();
        out.label(Label::Begin(id));
        self.gen_exp(out, function, condition)?;
        self.jump_if_zero(out, Label::End(id));
        self.gen_statement(out, function, body)?;
        self.pop(out, Register::Rax);
        out.instruction(AsmInstruction::Jmp(Label::Begin(id)));
        out.label(Label::End(id));
        self.push(out, Operand::Imm(0));
        Ok(())
    }

    fn gen_for(
        &mut self,
        out: &mut AsmOutput,
        function: &Function,
        init: Option<&Exp>,
        condition: Option<&Exp>,
        post: Option<&Exp>,
        body: &Statement,
    ) -> Result<()> {
        let id = self.next_label();
        if let Some(init) = init {
            self.gen_exp(out, function, init)?;
            self.pop(out, Register::Rax);
        }

        out.label(Label::Begin(id));
        if let Some(condition) = condition {
            self.gen_exp(out, function, condition)?;
            self.jump_if_zero(out, Label::End(id));
        }

        self.gen_statement(out, function, body)?;
        self.pop(out, Register::Rax);
        if let Some(post) = post {
            self.gen_exp(out, function, post)?;
            self.pop(out, Register::Rax);
        }
        out.instruction(AsmInstruction::Jmp(Label::Begin(id)));
        out.label(Label::End(id));
        self.push(out, Operand::Imm(0));
        Ok(())
    }

    fn gen_statement(&mut self, out: &mut AsmOutput, function: &Function, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Exp(exp) => self.gen_exp(out, function, exp)?,
            Statement::Block(statements) => {
                for statement in statements {
                    self.gen_statement(out, function, statement)?;
                    self.pop(out, Register::Rax);
                }
                self.push(out, Register::Rax);
            }
            Statement::If {
                condition,
                then,
                els,
            } => self.gen_if(out, function, condition, then, els.as_deref())?,
            Statement::While { condition, body } => self.gen_while(out, function, condition, body)?,
            Statement::For {
                init,
                condition,
                post,
                body,
            } => self.gen_for(
                out,
                function,
                init.as_ref(),
                condition.as_ref(),
                post.as_ref(),
                body,
            )?,
            Statement::Return(exp) => {
                self.gen_exp(out, function, exp)?;
                self.pop(out, Register::Rax);
                Self::epilogue(out);
                // control never falls through; keep the books as if the
                // statement left its value
                self.depth += 1;
            }
            Statement::Declaration(_) => self.push(out, Operand::Imm(0)),
        }
        Ok(())
    }

    /// Appends `function` to `output`.
    pub fn generate(&mut self, output: &mut AsmOutput, function: &Function) -> Result<()> {
        let frame = round_up(function.frame_size(), STACK_ALIGN)
            .filter(|&frame| i32::try_from(frame).is_ok())
            .ok_or_else(|| {
                let msg = format!("frame of {} does not fit a 32-bit displacement", function.name);
                CodegenError::InvalidNode(msg)
            })?;
        debug!(function = %function.name, frame, "generating function");

        output.push(AsmLine::Directive(Directive::Globl(function.name.clone())));
        output.label(Label::Symbol(function.name.clone()));

        output.instruction(AsmInstruction::Push(Register::Rbp.into()));
        output.instruction(AsmInstruction::Mov(Register::Rbp.into(), Register::Rsp.into()));
        if frame > 0 {
            let frame = Operand::Imm(frame);
            output.instruction(AsmInstruction::Binary(BinaryOp::Sub, Register::Rsp.into(), frame));
        }

        for param in function.params() {
            let reg = param
                .arg_index
                .and_then(|index| ARG_REGISTERS.get(index))
                .ok_or_else(|| CodegenError::InvalidNode(format!("parameter {} has no register", param.name)))?;
            output.instruction(AsmInstruction::Mov(Operand::Stack(param.offset), (*reg).into()));
        }

        self.depth = 0;
        for statement in &function.body {
            self.gen_statement(output, function, statement)?;
            self.pop(output, Register::Rax);
        }
        Self::epilogue(output);

        if self.depth != 0 {
            let msg = format!("stack depth {} at the end of {}", self.depth, function.name);
            return Err(CodegenError::InvalidNode(msg));
        }
        Ok(())
    }
}
