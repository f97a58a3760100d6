use crate::span::Span;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// `<name>`, delimiters included in the text
    Symbol,
    /// `'text'` or `"text"`, quotes included in the text
    Terminal,
    /// `0xHH`
    HexByte,
    /// `...`
    Ellipsis,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Pipe,
    Caret,
    /// fallback for anything else, e.g. `::=`
    Word,
    End,
}

#[derive(Clone, Copy, Debug)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
}

/// Tokenizer for rule definition text (not for the data being matched).
///
/// Lenient by contract: unterminated quotes and symbols run to the end of
/// the text instead of failing here. The compiler rejects the truncated
/// token when it checks delimiters.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Lexer<'a> {
        Lexer { src, pos: 0 }
    }

    /// Returns the next token without consuming it, by saving and
    /// restoring the cursor around [`next`](Self::next).
    pub fn peek(&mut self) -> Token<'a> {
        let save = self.pos;
        let token = self.next();
        self.pos = save;
        token
    }

    /// Consumes and returns the next token. Idempotent at end of input:
    /// every call past the end yields [`TokenKind::End`].
    pub fn next(&mut self) -> Token<'a> {
        self.skip_spaces();

        let bytes = self.src.as_bytes();
        let start = self.pos;

        let Some(&c) = bytes.get(self.pos) else {
            return self.token(TokenKind::End, start);
        };

        match c {
            b'<' => {
                self.pos += 1;
                while self.pos < bytes.len() && bytes[self.pos] != b'>' {
                    self.pos += 1;
                }
                if self.pos < bytes.len() {
                    self.pos += 1;
                }
                self.token(TokenKind::Symbol, start)
            }
            b'\'' | b'"' => {
                self.pos += 1;
                while self.pos < bytes.len() && bytes[self.pos] != c {
                    self.pos += 1;
                }
                if self.pos < bytes.len() {
                    self.pos += 1;
                }
                self.token(TokenKind::Terminal, start)
            }
            b'{' => self.punctuation(TokenKind::LBrace),
            b'}' => self.punctuation(TokenKind::RBrace),
            b'[' => self.punctuation(TokenKind::LBracket),
            b']' => self.punctuation(TokenKind::RBracket),
            b'(' => self.punctuation(TokenKind::LParen),
            b')' => self.punctuation(TokenKind::RParen),
            b'|' => self.punctuation(TokenKind::Pipe),
            b'^' => self.punctuation(TokenKind::Caret),
            b'.' if bytes[self.pos..].starts_with(b"...") => {
                self.pos += 3;
                self.token(TokenKind::Ellipsis, start)
            }
            _ => self.word(),
        }
    }

    fn skip_spaces(&mut self) {
        let bytes = self.src.as_bytes();
        while let Some(&c) = bytes.get(self.pos) {
            if c == b' ' || c == b'\t' || c == b'\r' || c == b'\n' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn punctuation(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.pos;
        self.pos += 1;
        self.token(kind, start)
    }

    fn word(&mut self) -> Token<'a> {
        let bytes = self.src.as_bytes();
        let start = self.pos;

        // always consume at least one byte so the lexer makes progress
        // even when a word starts with a stray delimiter character
        self.pos += 1;
        while let Some(&c) = bytes.get(self.pos) {
            if is_word_boundary(c) {
                break;
            }
            self.pos += 1;
        }

        let text = &self.src[start..self.pos];
        let kind = match is_hex_byte(text) {
            true => TokenKind::HexByte,
            false => TokenKind::Word,
        };
        self.token(kind, start)
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token<'a> {
        Token {
            kind,
            text: &self.src[start..self.pos],
            span: Span::new(start as u32, self.pos as u32),
        }
    }
}

fn is_word_boundary(c: u8) -> bool {
    matches!(
        c,
        b' ' | b'\t' | b'\r' | b'\n'
            | b'<' | b'>' | b'\'' | b'"'
            | b'{' | b'}' | b'[' | b']'
            | b'(' | b')' | b'|' | b'^' | b'.'
    )
}

fn is_hex_byte(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 4
        && bytes[0] == b'0'
        && bytes[1] == b'x'
        && bytes[2].is_ascii_hexdigit()
        && bytes[3].is_ascii_hexdigit()
}
