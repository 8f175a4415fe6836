use crate::types::{TypeKind, POINTER_SIZE};

pub type Identifier = String;

/// Index of a local variable inside its function's [`Function::locals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LVarId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub functions: Vec<Function>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: Identifier,
    pub params: usize,
    pub locals: Vec<LVar>,
    pub body: Vec<Statement>,
}

impl Function {
    pub fn lvar(&self, id: LVarId) -> Option<&LVar> {
        self.locals.get(id.0)
    }

    /// Bytes of frame used by locals, i.e. the deepest variable offset.
    pub fn frame_size(&self) -> i64 {
        self.locals.iter().map(|lvar| lvar.offset).max().unwrap_or(0)
    }

    pub fn params(&self) -> impl Iterator<Item = &LVar> {
        self.locals.iter().filter(|lvar| lvar.arg_index.is_some())
    }
}

/// A local variable or parameter with its fixed frame slot.
///
/// An array `int a[N]` is recorded once, with one extra level of indirection
/// and `offset` pointing at its first element; the remaining elements live in
/// the slots above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LVar {
    pub name: Identifier,
    pub kind: TypeKind,
    pub offset: i64,
    pub pointers: usize,
    pub array_len: usize,
    pub arg_index: Option<usize>,
}

impl LVar {
    pub fn is_pointer(&self) -> bool {
        self.pointers > 0
    }

    pub fn is_array(&self) -> bool {
        self.array_len > 0
    }

    /// Value of `sizeof` applied to this variable.
    pub fn size(&self) -> i64 {
        if self.is_pointer() {
            POINTER_SIZE
        } else {
            self.kind.size()
        }
    }

    /// Step used by pointer arithmetic on this variable.
    pub fn pointee_size(&self) -> i64 {
        if self.pointers > 1 {
            POINTER_SIZE
        } else {
            self.kind.size()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Exp(Exp),
    Block(Vec<Statement>),
    If {
        condition: Exp,
        then: Box<Statement>,
        els: Option<Box<Statement>>,
    },
    While {
        condition: Exp,
        body: Box<Statement>,
    },
    For {
        init: Option<Exp>,
        condition: Option<Exp>,
        post: Option<Exp>,
        body: Box<Statement>,
    },
    Return(Exp),
    Declaration(LVarId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exp {
    Constant(i64),
    Var(LVarId),
    Binary(BinaryOp, Box<Exp>, Box<Exp>),
    Assign(Box<Exp>, Box<Exp>),
    AddrOf(Box<Exp>),
    Deref(Box<Exp>),
    /// Arguments in source order; the last one parsed is on top.
    Call(Identifier, Vec<Exp>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Substract,
    Multiply,
    Div,
    IsEqual,
    IsNotEqual,
    LessThan,
    LessOrEqual,
}

impl BinaryOp {
    pub fn is_additive(self) -> bool {
        matches!(self, Self::Add | Self::Substract)
    }
}

impl Exp {
    pub fn binary(op: BinaryOp, lhs: Exp, rhs: Exp) -> Self {
        Self::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn assign(lhs: Exp, rhs: Exp) -> Self {
        Self::Assign(Box::new(lhs), Box::new(rhs))
    }

    pub fn addr_of(inner: Exp) -> Self {
        Self::AddrOf(Box::new(inner))
    }

    pub fn deref(inner: Exp) -> Self {
        Self::Deref(Box::new(inner))
    }

    pub fn call(name: Identifier, args: Vec<Exp>) -> Self {
        Self::Call(name, args)
    }
}
