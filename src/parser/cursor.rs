use crate::lexer::{Token, TokenKind};
use crate::parser::{InnerParseError, Result};

#[derive(Debug)]
pub struct Cursor<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    pub fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    pub fn bump(&mut self) {
        self.position += 1;
    }

    pub fn bump_if(&mut self, kind: TokenKind) -> bool {
        let condition = self.peek_is(kind);
        if condition {
            self.bump();
        }
        condition
    }

    /// Consumes a run of `kind` tokens and returns how many there were.
    pub fn bump_while(&mut self, kind: TokenKind) -> usize {
        let mut count = 0;
        while self.bump_if(kind) {
            count += 1;
        }
        count
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Byte offset used when reporting an error at the current token.
    pub fn current_pos(&self) -> usize {
        self.peek().map_or_else(|| self.eof_pos(), |t| t.pos)
    }

    fn eof_pos(&self) -> usize {
        self.tokens
            .last()
            .map_or(0, |last| last.pos + last.text.len())
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<&'a Token> {
        let pos = self.current_pos();
        let next = self.next_or_error()?;
        if next.kind == kind {
            Ok(next)
        } else {
            Err(InnerParseError::ExpectedButGot(kind, next.clone()).set_pos(pos))
        }
    }

    pub fn peek_or_error(&self) -> Result<&'a Token> {
        self.peek()
            .ok_or_else(|| InnerParseError::UnexpectedEof.set_pos(self.eof_pos()))
    }

    pub fn next_or_error(&mut self) -> Result<&'a Token> {
        let next = self.peek_or_error()?;
        self.position += 1;
        Ok(next)
    }

    /// Tokens from the current `{` up to and including its matching `}`.
    ///
    /// Does not move the cursor.
    pub fn brace_window(&self) -> Result<&'a [Token]> {
        let rest = &self.tokens[self.position.min(self.tokens.len())..];
        let first = self.peek_or_error()?;
        if first.kind != TokenKind::OpenCurly {
            let err = InnerParseError::ExpectedButGot(TokenKind::OpenCurly, first.clone());
            return Err(err.set_pos(first.pos));
        }

        let mut depth = 0usize;
        for (i, token) in rest.iter().enumerate() {
            match token.kind {
                TokenKind::OpenCurly => depth += 1,
                TokenKind::CloseCurly => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(&rest[..=i]);
                    }
                }
                _ => (),
            }
        }

        Err(InnerParseError::UnexpectedEof.set_pos(self.eof_pos()))
    }
}
