mod cursor;
mod parse_error;
#[cfg(test)]
mod parser_tests;
pub mod symbols;

use crate::ast::*;
use crate::lexer::{Token, TokenKind};
use crate::types::TypeKind;
use cursor::Cursor;
pub use parse_error::{InnerParseError, ParseError, Result};
use symbols::{LocalTable, ParamDecl};

use tracing::{debug, instrument};

#[allow(clippy::match_same_arms)]
fn get_prec(kind: TokenKind) -> u64 {
    match kind {
        TokenKind::Asterisk => 50,
        TokenKind::FSlash => 50,
        TokenKind::Plus => 45,
        TokenKind::Hyphen => 45,
        TokenKind::IsLessThan => 35,
        TokenKind::IsLessThanOrEqual => 35,
        TokenKind::IsGreaterThan => 35,
        TokenKind::IsGreaterThanOrEqual => 35,
        TokenKind::IsEqual => 30,
        TokenKind::IsNotEqual => 30,
        TokenKind::Assign => 1,
        _ => 0,
    }
}

fn parse_identifier<'a>(cursor: &mut Cursor<'a>) -> Result<&'a Token> {
    let pos = cursor.current_pos();
    let next = cursor.next_or_error()?;
    if next.kind == TokenKind::Identifier {
        Ok(next)
    } else {
        Err(InnerParseError::ExpectedIdentifier(next.clone()).set_pos(pos))
    }
}

fn parse_number(cursor: &mut Cursor) -> Result<i64> {
    let pos = cursor.current_pos();
    let next = cursor.next_or_error()?;
    if next.kind == TokenKind::Constant {
        Ok(next.value)
    } else {
        Err(InnerParseError::ExpectedNumber(next.clone()).set_pos(pos))
    }
}

fn parse_type(cursor: &mut Cursor) -> Result<TypeKind> {
    let pos = cursor.current_pos();
    let next = cursor.next_or_error()?;
    match next.kind {
        TokenKind::Type(kind) => Ok(kind),
        _ => Err(InnerParseError::ExpectedType(next.clone()).set_pos(pos)),
    }
}

fn parse_params<'a>(cursor: &mut Cursor<'a>) -> Result<Vec<ParamDecl<'a>>> {
    let mut params = Vec::new();

    if cursor.peek_is(TokenKind::CloseParanth) {
        return Ok(params);
    }

    loop {
        let kind = parse_type(cursor)?;
        let pointers = cursor.bump_while(TokenKind::Asterisk);
        let name = parse_identifier(cursor)?;
        params.push(ParamDecl {
            kind,
            pointers,
            name,
        });

        if !cursor.bump_if(TokenKind::Comma) {
            break;
        }
    }

    Ok(params)
}

impl TryFrom<TokenKind> for BinaryOp {
    type Error = TokenKind;
    fn try_from(value: TokenKind) -> std::result::Result<Self, TokenKind> {
        match value {
            TokenKind::Plus => Ok(BinaryOp::Add),
            TokenKind::Hyphen => Ok(BinaryOp::Substract),
            TokenKind::Asterisk => Ok(BinaryOp::Multiply),
            TokenKind::FSlash => Ok(BinaryOp::Div),
            TokenKind::IsEqual => Ok(BinaryOp::IsEqual),
            TokenKind::IsNotEqual => Ok(BinaryOp::IsNotEqual),
            TokenKind::IsLessThan => Ok(BinaryOp::LessThan),
            TokenKind::IsLessThanOrEqual => Ok(BinaryOp::LessOrEqual),
            _ => Err(value),
        }
    }
}

fn parse_exp_assign(cursor: &mut Cursor, locals: &LocalTable, prec: u64, left: Exp) -> Result<Exp> {
    cursor.expect(TokenKind::Assign)?;
    let right = parse_exp(cursor, locals, prec)?;
    Ok(Exp::assign(left, right))
}

fn parse_exp_binary(cursor: &mut Cursor, locals: &LocalTable, prec: u64, left: Exp) -> Result<Exp> {
    let next = cursor.next_or_error()?;
    let right = parse_exp(cursor, locals, prec + 1)?;

    // `a > b` is `b < a`
    let exp = match next.kind {
        TokenKind::IsGreaterThan => Exp::binary(BinaryOp::LessThan, right, left),
        TokenKind::IsGreaterThanOrEqual => Exp::binary(BinaryOp::LessOrEqual, right, left),
        kind => {
            let op = BinaryOp::try_from(kind)
                .map_err(|_| InnerParseError::BadFactor(next.clone()).set_pos(next.pos))?;
            Exp::binary(op, left, right)
        }
    };
    Ok(exp)
}

fn parse_exp(cursor: &mut Cursor, locals: &LocalTable, min_prec: u64) -> Result<Exp> {
    let mut left = parse_unary(cursor, locals)?;

    while let Some(next_token) = cursor.peek().filter(|t| t.kind.is_binaryop()) {
        let prec = get_prec(next_token.kind);
        if prec < min_prec {
            break;
        }

        left = match next_token.kind {
            TokenKind::Assign => parse_exp_assign(cursor, locals, prec, left)?,
            _ => parse_exp_binary(cursor, locals, prec, left)?,
        };
    }

    Ok(left)
}

fn parse_sizeof(cursor: &mut Cursor, locals: &LocalTable) -> Result<Exp> {
    cursor.expect(TokenKind::Sizeof)?;
    let pos = cursor.current_pos();
    let operand = parse_unary(cursor, locals)?;

    let size = match operand {
        Exp::Var(id) => locals.get(id).map(LVar::size),
        Exp::Constant(_) => Some(TypeKind::Int.size()),
        _ => None,
    };

    size.map(Exp::Constant)
        .ok_or_else(|| InnerParseError::InvalidSizeofOperand.set_pos(pos))
}

fn parse_unary(cursor: &mut Cursor, locals: &LocalTable) -> Result<Exp> {
    let peek = cursor.peek_or_error()?;
    match peek.kind {
        TokenKind::Plus => {
            cursor.bump();
            parse_unary(cursor, locals)
        }
        TokenKind::Hyphen => {
            cursor.bump();
            let inner = parse_unary(cursor, locals)?;
            Ok(Exp::binary(BinaryOp::Substract, Exp::Constant(0), inner))
        }
        TokenKind::Ampersand => {
            cursor.bump();
            parse_unary(cursor, locals).map(Exp::addr_of)
        }
        TokenKind::Asterisk => {
            cursor.bump();
            parse_unary(cursor, locals).map(Exp::deref)
        }
        TokenKind::Sizeof => parse_sizeof(cursor, locals),
        _ => parse_primary(cursor, locals),
    }
}

fn parse_arguments(cursor: &mut Cursor, locals: &LocalTable) -> Result<Vec<Exp>> {
    let mut args = Vec::new();

    if cursor.peek_is(TokenKind::CloseParanth) {
        return Ok(args);
    }

    loop {
        args.push(parse_exp(cursor, locals, 0)?);
        if !cursor.bump_if(TokenKind::Comma) {
            break;
        }
    }

    Ok(args)
}

fn parse_factor_call(cursor: &mut Cursor, locals: &LocalTable, name: Identifier) -> Result<Exp> {
    cursor.expect(TokenKind::OpenParanth)?;
    let args = parse_arguments(cursor, locals)?;
    cursor.expect(TokenKind::CloseParanth)?;
    Ok(Exp::call(name, args))
}

fn parse_factor_index(cursor: &mut Cursor, locals: &LocalTable, base: Exp) -> Result<Exp> {
    cursor.expect(TokenKind::OpenBracket)?;
    let index = parse_exp(cursor, locals, 0)?;
    cursor.expect(TokenKind::CloseBracket)?;
    Ok(Exp::deref(Exp::binary(BinaryOp::Add, base, index)))
}

fn parse_factor_identifier(cursor: &mut Cursor, locals: &LocalTable) -> Result<Exp> {
    let ident = parse_identifier(cursor)?;

    match cursor.peek().map(|t| t.kind) {
        Some(TokenKind::OpenParanth) => parse_factor_call(cursor, locals, ident.text.clone()),
        Some(TokenKind::OpenBracket) => {
            let base = locals.resolve(ident).map(Exp::Var)?;
            parse_factor_index(cursor, locals, base)
        }
        _ => locals.resolve(ident).map(Exp::Var),
    }
}

fn parse_factor_subexp(cursor: &mut Cursor, locals: &LocalTable) -> Result<Exp> {
    cursor.expect(TokenKind::OpenParanth)?;
    let exp = parse_exp(cursor, locals, 0)?;
    cursor.expect(TokenKind::CloseParanth)?;
    Ok(exp)
}

fn parse_primary(cursor: &mut Cursor, locals: &LocalTable) -> Result<Exp> {
    let peek = cursor.peek_or_error()?;
    match peek.kind {
        TokenKind::Identifier => parse_factor_identifier(cursor, locals),
        TokenKind::OpenParanth => parse_factor_subexp(cursor, locals),
        TokenKind::Constant => {
            cursor.bump();
            Ok(Exp::Constant(peek.value))
        }
        _ => Err(InnerParseError::BadFactor(peek.clone()).set_pos(peek.pos)),
    }
}

fn parse_optional_exp(
    cursor: &mut Cursor,
    locals: &LocalTable,
    delim: TokenKind,
) -> Result<Option<Exp>> {
    let not_met_delim = !cursor.bump_if(delim);
    let exp = not_met_delim
        .then(|| parse_exp(cursor, locals, 0))
        .transpose()?;

    if not_met_delim {
        cursor.expect(delim)?;
    }

    Ok(exp)
}

fn parse_for(cursor: &mut Cursor, locals: &LocalTable) -> Result<Statement> {
    cursor.expect(TokenKind::For)?;
    cursor.expect(TokenKind::OpenParanth)?;
    let init = parse_optional_exp(cursor, locals, TokenKind::Semicolon)?;
    let condition = parse_optional_exp(cursor, locals, TokenKind::Semicolon)?;
    let post = parse_optional_exp(cursor, locals, TokenKind::CloseParanth)?;
    let body = parse_statement(cursor, locals).map(Box::new)?;

    Ok(Statement::For {
        init,
        condition,
        post,
        body,
    })
}

fn parse_if(cursor: &mut Cursor, locals: &LocalTable) -> Result<Statement> {
    cursor.expect(TokenKind::If)?;
    cursor.expect(TokenKind::OpenParanth)?;
    let condition = parse_exp(cursor, locals, 0)?;
    cursor.expect(TokenKind::CloseParanth)?;
    let then = parse_statement(cursor, locals).map(Box::new)?;
    let else_present = cursor.bump_if(TokenKind::Else);
    let els = else_present
        .then(|| parse_statement(cursor, locals))
        .transpose()?
        .map(Box::new);

    Ok(Statement::If {
        condition,
        then,
        els,
    })
}

fn parse_while(cursor: &mut Cursor, locals: &LocalTable) -> Result<Statement> {
    cursor.expect(TokenKind::While)?;
    cursor.expect(TokenKind::OpenParanth)?;
    let condition = parse_exp(cursor, locals, 0)?;
    cursor.expect(TokenKind::CloseParanth)?;
    let body = parse_statement(cursor, locals).map(Box::new)?;

    Ok(Statement::While { condition, body })
}

fn parse_return(cursor: &mut Cursor, locals: &LocalTable) -> Result<Statement> {
    cursor.expect(TokenKind::Return)?;
    let exp = parse_exp(cursor, locals, 0)?;
    cursor.expect(TokenKind::Semicolon)?;
    Ok(Statement::Return(exp))
}

/// The variable was already registered by the pre-scan; this only checks the
/// shape of the declaration and binds it to its slot.
fn parse_declaration(cursor: &mut Cursor, locals: &LocalTable) -> Result<Statement> {
    parse_type(cursor)?;
    cursor.bump_while(TokenKind::Asterisk);
    let name = parse_identifier(cursor)?;
    if cursor.bump_if(TokenKind::OpenBracket) {
        parse_number(cursor)?;
        cursor.expect(TokenKind::CloseBracket)?;
    }
    cursor.expect(TokenKind::Semicolon)?;

    locals.resolve(name).map(Statement::Declaration)
}

fn parse_statement_exp(cursor: &mut Cursor, locals: &LocalTable) -> Result<Statement> {
    let exp = parse_exp(cursor, locals, 0)?;
    cursor.expect(TokenKind::Semicolon)?;
    Ok(Statement::Exp(exp))
}

fn parse_statement(cursor: &mut Cursor, locals: &LocalTable) -> Result<Statement> {
    let peek = cursor.peek_or_error()?;
    match peek.kind {
        TokenKind::Return => parse_return(cursor, locals),
        TokenKind::For => parse_for(cursor, locals),
        TokenKind::While => parse_while(cursor, locals),
        TokenKind::If => parse_if(cursor, locals),
        TokenKind::OpenCurly => parse_block(cursor, locals).map(Statement::Block),
        kind if kind.is_type() => parse_declaration(cursor, locals),
        _ => parse_statement_exp(cursor, locals),
    }
}

fn parse_block(cursor: &mut Cursor, locals: &LocalTable) -> Result<Vec<Statement>> {
    let mut items = Vec::new();

    cursor.expect(TokenKind::OpenCurly)?;

    while !cursor.bump_if(TokenKind::CloseCurly) {
        let item = parse_statement(cursor, locals)?;
        items.push(item);
    }

    Ok(items)
}

fn parse_function(cursor: &mut Cursor) -> Result<Function> {
    parse_type(cursor)?;
    cursor.bump_while(TokenKind::Asterisk);
    let name = parse_identifier(cursor)?;
    cursor.expect(TokenKind::OpenParanth)?;
    let params = parse_params(cursor)?;
    cursor.expect(TokenKind::CloseParanth)?;

    let window = cursor.brace_window()?;
    let locals = LocalTable::build(name, &params, window)?;
    let body = parse_block(cursor, &locals)?;

    debug!(
        function = %name.text,
        params = params.len(),
        frame = locals.frame_size(),
        "parsed function"
    );

    Ok(Function {
        name: name.text.clone(),
        params: params.len(),
        locals: locals.into_locals(),
        body,
    })
}

#[instrument(skip_all)]
pub fn parse(tokens: &[Token]) -> Result<Program> {
    let mut functions = Vec::new();
    let mut cursor = Cursor::new(tokens);

    while !cursor.at_end() {
        let f = parse_function(&mut cursor)?;
        functions.push(f);
    }
    Ok(Program { functions })
}
