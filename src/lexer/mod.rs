mod cursor;
mod lexer_error;
#[cfg(test)]
mod lexer_tests;
mod token;

use cursor::Cursor;
pub use lexer_error::LexError;
pub use token::{Token, TokenKind};

use tracing::{debug, instrument};

pub type Tokens = Vec<Token>;

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn lex_mcharoperator(cursor: &mut Cursor) -> Result<TokenKind, char> {
    let first = cursor.take().ok_or('\0')?;
    let kind = match (first, cursor.peek()) {
        ('=', Some('=')) => TokenKind::IsEqual,
        ('!', Some('=')) => TokenKind::IsNotEqual,
        ('<', Some('=')) => TokenKind::IsLessThanOrEqual,
        ('>', Some('=')) => TokenKind::IsGreaterThanOrEqual,
        _ => return TokenKind::try_from(first),
    };
    cursor.take();
    Ok(kind)
}

fn lex_constant(cursor: &mut Cursor) -> Result<i64, char> {
    let digits = cursor.take_while(|c| c.is_ascii_digit());

    if let Some(c) = cursor.peek().filter(|&c| is_ident_start(c)) {
        return Err(c);
    }

    let value = digits.bytes().fold(0i64, |acc, d| {
        acc.wrapping_mul(10).wrapping_add(i64::from(d - b'0'))
    });
    Ok(value)
}

#[instrument(skip_all)]
pub fn lex(input: &str) -> Result<Tokens, LexError> {
    let mut tokens = Tokens::new();
    let mut cursor = Cursor::new(input);

    loop {
        cursor.skip_whitespaces();
        let start = cursor.pos();
        let Some(c) = cursor.peek() else {
            break;
        };

        let token = match c {
            '=' | '!' | '<' | '>' => lex_mcharoperator(&mut cursor)
                .map(|kind| Token::new(kind, &input[start..cursor.pos()], start))
                .map_err(|ch| LexError::at(input, start, ch))?,
            c if c.is_ascii_digit() => lex_constant(&mut cursor)
                .map(|value| Token::constant(value, &input[start..cursor.pos()], start))
                .map_err(|ch| LexError::at(input, cursor.pos(), ch))?,
            c if is_ident_start(c) => {
                let word = cursor.take_while(is_ident_char);
                Token::new(TokenKind::from_word(word), word, start)
            }
            c => {
                let kind = TokenKind::try_from(c).map_err(|ch| LexError::at(input, start, ch))?;
                cursor.take();
                Token::new(kind, &input[start..cursor.pos()], start)
            }
        };

        tokens.push(token);
    }

    debug!("lexed {} tokens", tokens.len());
    Ok(tokens)
}
