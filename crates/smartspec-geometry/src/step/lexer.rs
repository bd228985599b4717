//! Part 21 (STEP physical file format) lexer.
//!
//! Zero-copy tokenizer over the raw file bytes. Tokens borrow keyword, enum
//! and string text from the input; only numbers are decoded.
//!
//! Reals follow ISO 10303-21: a `.` after the integer digits makes the
//! literal real even without fraction digits (`0.`, `1.E-3`).
//!
//! After an error the lexer can resynchronise at the next record terminator
//! with [`Lexer::skip_record`], so one corrupt record does not end the scan.

use crate::error::{GeometryError, Result};

/// A token in a STEP file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    /// Keyword or identifier, as written (e.g. `CARTESIAN_POINT`,
    /// `ISO-10303-21`).
    Keyword(&'a str),
    /// Entity reference: `#123` is `EntityRef(123)`.
    EntityRef(u64),
    /// String literal contents between the quotes. Doubled quotes (`''`) are
    /// left as written.
    String(&'a [u8]),
    /// Real number.
    Real(f64),
    /// Integer number.
    Integer(i64),
    /// Enumeration: `.T.` is `Enum("T")`.
    Enum(&'a str),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `=`
    Equals,
    /// `*` (derived value).
    Asterisk,
    /// `$` (unset value).
    Dollar,
}

impl Token<'_> {
    /// True for a keyword equal to `name`, ignoring ASCII case.
    pub fn is_keyword(&self, name: &str) -> bool {
        matches!(self, Token::Keyword(k) if k.eq_ignore_ascii_case(name))
    }
}

/// Position in the source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub col: usize,
}

/// A token with its position in the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpannedToken<'a> {
    /// The token.
    pub token: Token<'a>,
    /// Position where the token starts.
    pub pos: Position,
}

/// Lexer for Part 21 STEP files.
pub struct Lexer<'a> {
    input: &'a [u8],
    offset: usize,
    line: usize,
    line_start: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over raw file bytes.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
            line_start: 0,
        }
    }

    /// Current position in the source.
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            col: self.offset - self.line_start + 1,
        }
    }

    /// Next token, `Ok(None)` at end of input.
    ///
    /// On error the offending byte has been consumed; call
    /// [`skip_record`](Self::skip_record) to drop the rest of the record.
    pub fn next_token(&mut self) -> Result<Option<SpannedToken<'a>>> {
        self.skip_trivia();
        let pos = self.position();
        let Some(byte) = self.peek(0) else {
            return Ok(None);
        };

        let token = match byte {
            b'#' => self.entity_ref(pos)?,
            b'\'' => self.string(pos)?,
            b'.' => self.enumeration(pos)?,
            b'0'..=b'9' => self.number(pos)?,
            b'+' | b'-' if self.peek(1).is_some_and(|b| b.is_ascii_digit()) => self.number(pos)?,
            b if b.is_ascii_alphabetic() || b == b'_' => Token::Keyword(self.ascii_run(is_ident)),
            b => {
                self.bump();
                punctuation(b).ok_or_else(|| {
                    GeometryError::lexer(
                        pos.line,
                        pos.col,
                        format!("unexpected character: '{}'", b.escape_ascii()),
                    )
                })?
            }
        };

        Ok(Some(SpannedToken { token, pos }))
    }

    /// Skip input up to and including the next `;` outside a string literal.
    pub fn skip_record(&mut self) {
        let mut quoted = false;
        while let Some(byte) = self.bump() {
            match byte {
                b'\'' => quoted = !quoted,
                b';' if !quoted => return,
                _ => {}
            }
        }
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.input.get(self.offset + ahead).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek(0)?;
        self.offset += 1;
        if byte == b'\n' {
            self.line += 1;
            self.line_start = self.offset;
        }
        Some(byte)
    }

    fn bump_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.offset;
        while self.peek(0).is_some_and(&pred) {
            self.bump();
        }
        let input = self.input;
        &input[start..self.offset]
    }

    /// Like [`bump_while`](Self::bump_while) for predicates that only accept
    /// ASCII, so the run is always valid UTF-8.
    fn ascii_run(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        std::str::from_utf8(self.bump_while(pred)).unwrap_or_default()
    }

    /// Whitespace and `/* ... */` comments.
    fn skip_trivia(&mut self) {
        loop {
            self.bump_while(|b| b.is_ascii_whitespace());
            if !(self.peek(0) == Some(b'/') && self.peek(1) == Some(b'*')) {
                return;
            }
            self.bump();
            self.bump();
            while self.peek(0).is_some() && !(self.peek(0) == Some(b'*') && self.peek(1) == Some(b'/'))
            {
                self.bump();
            }
            self.bump();
            self.bump();
        }
    }

    fn entity_ref(&mut self, pos: Position) -> Result<Token<'a>> {
        self.bump();
        let digits = self.ascii_run(|b| b.is_ascii_digit());
        digits.parse().map(Token::EntityRef).map_err(|_| {
            GeometryError::lexer(pos.line, pos.col, format!("invalid entity reference: #{digits}"))
        })
    }

    fn string(&mut self, pos: Position) -> Result<Token<'a>> {
        self.bump();
        let start = self.offset;
        loop {
            match self.bump() {
                None => return Err(GeometryError::lexer(pos.line, pos.col, "unterminated string")),
                Some(b'\'') if self.peek(0) == Some(b'\'') => {
                    self.bump();
                }
                Some(b'\'') => break,
                Some(_) => {}
            }
        }
        let input = self.input;
        Ok(Token::String(&input[start..self.offset - 1]))
    }

    fn enumeration(&mut self, pos: Position) -> Result<Token<'a>> {
        self.bump();
        let name = self.ascii_run(is_ident);
        if name.is_empty() || self.peek(0) != Some(b'.') {
            return Err(GeometryError::lexer(pos.line, pos.col, "malformed enumeration"));
        }
        self.bump();
        Ok(Token::Enum(name))
    }

    /// `[+-] digits [ . digits* ] [ (E|e) [+-] digits ]`
    fn number(&mut self, pos: Position) -> Result<Token<'a>> {
        let start = self.offset;
        if matches!(self.peek(0), Some(b'+' | b'-')) {
            self.bump();
        }
        self.bump_while(|b| b.is_ascii_digit());

        let mut real = false;
        if self.peek(0) == Some(b'.') {
            real = true;
            self.bump();
            self.bump_while(|b| b.is_ascii_digit());
        }
        if matches!(self.peek(0), Some(b'E' | b'e')) {
            real = true;
            self.bump();
            if matches!(self.peek(0), Some(b'+' | b'-')) {
                self.bump();
            }
            if self.bump_while(|b| b.is_ascii_digit()).is_empty() {
                return Err(GeometryError::lexer(pos.line, pos.col, "exponent without digits"));
            }
        }

        let input = self.input;
        let text = std::str::from_utf8(&input[start..self.offset]).unwrap_or_default();
        let parsed = if real {
            text.parse().map(Token::Real).ok()
        } else {
            text.parse().map(Token::Integer).ok()
        };
        parsed.ok_or_else(|| {
            GeometryError::lexer(pos.line, pos.col, format!("invalid number: {text}"))
        })
    }
}

/// Identifier bytes. `-` appears in `ISO-10303-21` and `END-ISO-10303-21`.
fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn punctuation(b: u8) -> Option<Token<'static>> {
    Some(match b {
        b'(' => Token::LParen,
        b')' => Token::RParen,
        b',' => Token::Comma,
        b';' => Token::Semicolon,
        b'=' => Token::Equals,
        b'*' => Token::Asterisk,
        b'$' => Token::Dollar,
        _ => return None,
    })
}
