//! IMAP lexer for tokenizing server responses.
//!
//! Breaks one complete response (including any literal payloads it
//! carries) into tokens for the response parser.

use crate::{Error, Result};

/// Token types produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Atom (unquoted string without special characters).
    Atom(&'a str),
    /// Quoted string.
    QuotedString(Vec<u8>),
    /// Literal string with size prefix {n}.
    Literal(Vec<u8>),
    /// Number.
    Number(u32),
    /// Opening parenthesis.
    LParen,
    /// Closing parenthesis.
    RParen,
    /// Opening bracket.
    LBracket,
    /// Closing bracket.
    RBracket,
    /// Space character.
    Space,
    /// Asterisk (untagged response prefix).
    Asterisk,
    /// Plus (continuation response prefix).
    Plus,
    /// NIL literal.
    Nil,
    /// CRLF line ending.
    Crlf,
    /// End of input.
    Eof,
}

/// IMAP lexer state.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Returns the current position in the input.
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Peeks at the current byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Advances by one byte and returns it.
    pub fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Reads the next token.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        let Some(byte) = self.peek() else {
            return Ok(Token::Eof);
        };

        let token = match byte {
            b'\r' => {
                if self.peek_at(1) != Some(b'\n') {
                    return Err(self.error("expected LF after CR"));
                }
                self.skip(2);
                Token::Crlf
            }
            b'\n' => {
                // Bare LF from sloppy servers.
                self.advance();
                Token::Crlf
            }
            b' ' => {
                self.advance();
                Token::Space
            }
            b'(' => {
                self.advance();
                Token::LParen
            }
            b')' => {
                self.advance();
                Token::RParen
            }
            b'[' => {
                self.advance();
                Token::LBracket
            }
            b']' => {
                self.advance();
                Token::RBracket
            }
            b'*' => {
                self.advance();
                Token::Asterisk
            }
            b'+' => {
                self.advance();
                Token::Plus
            }
            b'"' => self.read_quoted_string()?,
            b'{' => self.read_literal()?,
            b'0'..=b'9' => self.read_number_or_atom()?,
            _ if is_atom_char(byte) => self.read_atom()?,
            _ => return Err(self.error(format!("unexpected character: {byte:#04x}"))),
        };
        Ok(token)
    }

    fn read_quoted_string(&mut self) -> Result<Token<'a>> {
        self.advance();
        let mut result = Vec::new();

        loop {
            match self.advance() {
                Some(b'"') => break,
                Some(b'\\') => match self.advance() {
                    Some(c @ (b'"' | b'\\')) => result.push(c),
                    Some(c) => return Err(self.error(format!("invalid escape: \\{}", c as char))),
                    None => return Err(self.error("unexpected EOF in quoted string")),
                },
                Some(c) => result.push(c),
                None => return Err(self.error("unexpected EOF in quoted string")),
            }
        }

        Ok(Token::QuotedString(result))
    }

    fn read_literal(&mut self) -> Result<Token<'a>> {
        self.advance();
        let start = self.pos;

        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || b == b'+' {
                self.advance();
            } else {
                break;
            }
        }

        let digits = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| self.error("invalid literal size"))?
            .trim_end_matches('+');
        let size: usize = digits
            .parse()
            .map_err(|_| self.error("invalid literal size number"))?;

        if self.advance() != Some(b'}') {
            return Err(self.error("expected } after literal size"));
        }
        if self.peek() == Some(b'\r') {
            self.advance();
        }
        if self.advance() != Some(b'\n') {
            return Err(self.error("expected CRLF after literal size"));
        }

        let end = self
            .pos
            .checked_add(size)
            .filter(|end| *end <= self.input.len())
            .ok_or_else(|| self.error("incomplete literal data"))?;
        let data = self.input[self.pos..end].to_vec();
        self.pos = end;

        Ok(Token::Literal(data))
    }

    fn read_number_or_atom(&mut self) -> Result<Token<'a>> {
        let s = self.take_atom()?;
        if s.bytes().all(|b| b.is_ascii_digit()) {
            let n: u32 = s.parse().map_err(|_| self.error("number too large"))?;
            Ok(Token::Number(n))
        } else {
            Ok(Token::Atom(s))
        }
    }

    fn read_atom(&mut self) -> Result<Token<'a>> {
        let s = self.take_atom()?;
        if s.eq_ignore_ascii_case("NIL") {
            Ok(Token::Nil)
        } else {
            Ok(Token::Atom(s))
        }
    }

    fn take_atom(&mut self) -> Result<&'a str> {
        let start = self.pos;
        while self.peek().is_some_and(is_atom_char) {
            self.advance();
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| self.error("invalid UTF-8 in atom"))
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::parse(self.pos, message)
    }

    /// Expects and consumes a space.
    pub fn expect_space(&mut self) -> Result<()> {
        match self.next_token()? {
            Token::Space => Ok(()),
            token => Err(self.error(format!("expected space, got {token:?}"))),
        }
    }

    /// Expects and consumes a specific punctuation token.
    #[allow(clippy::needless_pass_by_value)]
    pub fn expect(&mut self, expected: Token<'_>) -> Result<()> {
        let token = self.next_token()?;
        if std::mem::discriminant(&token) == std::mem::discriminant(&expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected {expected:?}, got {token:?}")))
        }
    }

    /// Reads a number.
    pub fn read_number(&mut self) -> Result<u32> {
        match self.next_token()? {
            Token::Number(n) => Ok(n),
            token => Err(self.error(format!("expected number, got {token:?}"))),
        }
    }

    /// Reads an atom.
    pub fn read_atom_string(&mut self) -> Result<&'a str> {
        match self.next_token()? {
            Token::Atom(s) => Ok(s),
            token => Err(self.error(format!("expected atom, got {token:?}"))),
        }
    }

    /// Reads an nstring (NIL, quoted string or literal) as raw bytes.
    pub fn read_nstring(&mut self) -> Result<Option<Vec<u8>>> {
        match self.next_token()? {
            Token::Nil => Ok(None),
            Token::QuotedString(data) | Token::Literal(data) => Ok(Some(data)),
            token => Err(self.error(format!("expected nstring, got {token:?}"))),
        }
    }

    /// Consumes raw bytes up to `stop` (exclusive) or the end of the line.
    pub fn take_until(&mut self, stop: u8) -> &'a [u8] {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == stop || b == b'\r' || b == b'\n' {
                break;
            }
            self.advance();
        }
        &self.input[start..self.pos]
    }

    /// Consumes the rest of the line, excluding the line ending.
    pub fn rest_of_line(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'\r' || b == b'\n' {
                break;
            }
            self.advance();
        }
        let text = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
        if self.peek() == Some(b'\r') {
            self.advance();
        }
        if self.peek() == Some(b'\n') {
            self.advance();
        }
        text
    }
}

/// Returns true if the byte is a valid atom character.
///
/// Includes `\` so flags like `\Seen` lex as single atoms.
pub const fn is_atom_char(b: u8) -> bool {
    matches!(b,
        0x21 | 0x23..=0x24 | 0x26..=0x27 |
        0x2B..=0x5A |
        0x5C |
        0x5E..=0x7A |
        0x7C |
        0x7E
    )
}
