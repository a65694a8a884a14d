use crate::error::Span;

/// A slice of the input together with its byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub span: Span,
}

/// Splits an expression into whitespace-separated fields.
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    pub fn tokenize(&mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.pos >= self.bytes.len() {
                break;
            }
            let start = self.pos;
            while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            tokens.push(Token {
                text: &self.input[start..self.pos],
                span: Span::new(start, self.pos),
            });
        }
        tokens
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }
}

/// Split a field into its comma-separated items. Empty items are kept so the
/// parser can report them with their position.
pub fn split_list<'a>(field: Token<'a>) -> impl Iterator<Item = Token<'a>> {
    let base = field.span.start;
    let mut offset = 0;
    field.text.split(',').map(move |text| {
        let start = base + offset;
        offset += text.len() + 1;
        Token {
            text,
            span: Span::new(start, start + text.len()),
        }
    })
}
