use thiserror::Error;

/// Raised on the first character that starts no valid token.
///
/// `text` is the whole source so the error can point at the offending byte.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unexpected character '{ch}' at position {position}\n{}", marker(.text, *.position))]
pub struct LexError {
    pub text: String,
    pub position: usize,
    pub ch: char,
}

impl LexError {
    pub(super) fn at(text: &str, position: usize, ch: char) -> Self {
        Self {
            text: text.to_owned(),
            position,
            ch,
        }
    }
}

fn marker(text: &str, position: usize) -> String {
    let line_start = text[..position].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[position..]
        .find('\n')
        .map_or(text.len(), |i| position + i);
    let column = text[line_start..position].chars().count();
    format!("{}\n{}^", &text[line_start..line_end], " ".repeat(column))
}
