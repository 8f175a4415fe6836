//! Per-function local variable table.
//!
//! The table is built from the parameter list and a scan over the function's
//! brace-delimited body before any statement is parsed, so every variable has
//! its frame slot fixed up front. Scoping is flat: one name per function.

use crate::ast::{LVar, LVarId};
use crate::lexer::{Token, TokenKind};
use crate::parser::{InnerParseError, Result};
use crate::types::TypeKind;

const SLOT_SIZE: i64 = 8;

/// Largest frame whose 16-byte rounding still fits a 32-bit immediate.
pub const MAX_FRAME_SIZE: i64 = 0x7fff_fff0;

pub const MAX_PARAMS: usize = 6;

#[derive(Debug, Clone)]
pub struct ParamDecl<'a> {
    pub kind: TypeKind,
    pub pointers: usize,
    pub name: &'a Token,
}

#[derive(Debug, Default)]
pub struct LocalTable {
    locals: Vec<LVar>,
    offset: i64,
}

impl LocalTable {
    pub fn build(function: &Token, params: &[ParamDecl], body: &[Token]) -> Result<Self> {
        if params.len() > MAX_PARAMS {
            let err = InnerParseError::TooManyParameters(function.text.clone());
            return Err(err.set_pos(function.pos));
        }

        let mut table = Self::default();
        for (index, param) in params.iter().enumerate() {
            table.declare(param.name, param.kind, param.pointers, None, Some(index))?;
        }
        table.scan(body)?;
        Ok(table)
    }

    fn scan(&mut self, window: &[Token]) -> Result<()> {
        let mut tokens = window.iter().peekable();

        while let Some(token) = tokens.next() {
            let TokenKind::Type(kind) = token.kind else {
                continue;
            };

            let mut pointers = 0;
            while tokens.next_if(|t| t.kind == TokenKind::Asterisk).is_some() {
                pointers += 1;
            }

            let name = next_in_window(&mut tokens, window)?;
            if name.kind != TokenKind::Identifier {
                return Err(InnerParseError::ExpectedIdentifier(name.clone()).set_pos(name.pos));
            }

            match tokens.peek().map(|t| t.kind) {
                // function declaration, not a variable
                Some(TokenKind::OpenParanth) => continue,
                Some(TokenKind::OpenBracket) => {
                    tokens.next();
                    let len = next_in_window(&mut tokens, window)?;
                    let array_len = array_len(len)?;
                    let close = next_in_window(&mut tokens, window)?;
                    if close.kind != TokenKind::CloseBracket {
                        let err = InnerParseError::ExpectedButGot(TokenKind::CloseBracket, close.clone());
                        return Err(err.set_pos(close.pos));
                    }
                    self.declare(name, kind, pointers + 1, Some((len, array_len)), None)?;
                }
                _ => self.declare(name, kind, pointers, None, None)?,
            }
        }

        Ok(())
    }

    fn declare(
        &mut self,
        name: &Token,
        kind: TypeKind,
        pointers: usize,
        array: Option<(&Token, usize)>,
        arg_index: Option<usize>,
    ) -> Result<()> {
        if self.lookup(&name.text).is_some() {
            let err = InnerParseError::DuplicateIdentifier(name.text.clone());
            return Err(err.set_pos(name.pos));
        }

        let array_len = array.map_or(0, |(_, len)| len);
        self.offset = i64::try_from(array_len.max(1))
            .ok()
            .and_then(|slots| slots.checked_mul(SLOT_SIZE))
            .and_then(|bytes| self.offset.checked_add(bytes))
            .filter(|&offset| offset <= MAX_FRAME_SIZE)
            .ok_or_else(|| {
                let (token, value) = array.map_or((name, 1), |(len, _)| (len, len.value));
                InnerParseError::InvalidArrayLength(value).set_pos(token.pos)
            })?;
        self.locals.push(LVar {
            name: name.text.clone(),
            kind,
            offset: self.offset,
            pointers,
            array_len,
            arg_index,
        });
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<LVarId> {
        self.locals
            .iter()
            .position(|lvar| lvar.name == name)
            .map(LVarId)
    }

    pub fn resolve(&self, name: &Token) -> Result<LVarId> {
        self.lookup(&name.text)
            .ok_or_else(|| InnerParseError::UnknownIdentifier(name.text.clone()).set_pos(name.pos))
    }

    pub fn get(&self, id: LVarId) -> Option<&LVar> {
        self.locals.get(id.0)
    }

    pub fn frame_size(&self) -> i64 {
        self.offset
    }

    pub fn into_locals(self) -> Vec<LVar> {
        self.locals
    }
}

fn next_in_window<'a, I>(tokens: &mut I, window: &[Token]) -> Result<&'a Token>
where
    I: Iterator<Item = &'a Token>,
{
    tokens.next().ok_or_else(|| {
        let pos = window.last().map_or(0, |t| t.pos + t.text.len());
        InnerParseError::UnexpectedEof.set_pos(pos)
    })
}

fn array_len(token: &Token) -> Result<usize> {
    if token.kind != TokenKind::Constant {
        return Err(InnerParseError::ExpectedNumber(token.clone()).set_pos(token.pos));
    }

    usize::try_from(token.value)
        .ok()
        .filter(|&len| len > 0)
        .ok_or_else(|| InnerParseError::InvalidArrayLength(token.value).set_pos(token.pos))
}
