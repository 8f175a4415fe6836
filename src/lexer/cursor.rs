use std::str::Chars;

#[derive(Clone)]
pub struct Cursor<'a> {
    chars: Chars<'a>,
    len: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        let chars = s.chars();
        let len = s.len();
        Self { chars, len }
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Byte offset of the next character in the source.
    pub fn pos(&self) -> usize {
        self.len - self.chars.as_str().len()
    }

    #[inline]
    pub fn skip_if(&mut self, p: impl FnOnce(char) -> bool) -> bool {
        let skipped = self.peek().filter(|&c| p(c)).is_some();
        if skipped {
            self.take();
        }
        skipped
    }

    pub fn skip_whitespaces(&mut self) {
        while self.skip_if(char::is_whitespace) {}
    }

    pub fn take(&mut self) -> Option<char> {
        self.chars.next()
    }

    pub fn take_while(&mut self, p: impl Fn(char) -> bool) -> &'a str {
        let rest = self.chars.as_str();
        let start = self.pos();
        while self.skip_if(&p) {}
        &rest[..self.pos() - start]
    }
}
