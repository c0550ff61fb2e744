use crate::data::{Limits, ParseError, ParseErrorKind, Position};
use std::iter::Peekable;
use std::str::Chars;

/// Forward-only cursor over the JSON source.
///
/// A single scanner is threaded by `&mut` through the whole recursive descent,
/// so every nested parse advances the same position. It never rewinds.
pub struct Scanner<'a> {
    // The original string, which is directly sliced to extract numbers.
    // From it, we derive a per-character iterator, because iterating directly over
    // the indices of a UTF-8 encoded &str can land us midway through multi-byte characters.
    source: &'a str,
    char_iter: Peekable<Chars<'a>>,
    // Byte index into `source` of the next character to be consumed.
    current: usize,
    // User-facing position of the next character. Per-character, not per-byte.
    position: Position,
    // Number of records and sequences currently open.
    depth: usize,
    limits: Limits,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, limits: Limits) -> Self {
        Self {
            source,
            char_iter: source.chars().peekable(),
            current: 0,
            position: Position::default(),
            depth: 0,
            limits,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    ///////////////////////////////////////////////////////////////////////////////////////////////////////////
    // Structure

    /// Skips whitespace and returns the next significant character without consuming it.
    /// Running out of input here is always an error: every caller still expects a token.
    pub fn peek_token(&mut self) -> Result<char, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) => Ok(ch),
            None => Err(self.error_here(ParseErrorKind::UnexpectedEndOfInput)),
        }
    }

    /// Skips whitespace and consumes `expected`, failing on any other character.
    pub fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek_token()? {
            ch if ch == expected => {
                self.advance();
                Ok(())
            }
            ch => Err(self.error_here(ParseErrorKind::UnexpectedCharacter(ch))),
        }
    }

    /// After a value inside a record or a sequence, demands either an element separator
    /// (which is consumed) or the closing delimiter (which is left for the caller).
    pub fn expect_separator_or(&mut self, closing: char) -> Result<(), ParseError> {
        match self.peek_token()? {
            ch if is_element_separator(ch) => {
                self.advance();
                Ok(())
            }
            ch if ch == closing => Ok(()),
            ch => Err(self.error_here(ParseErrorKind::UnexpectedCharacter(ch))),
        }
    }

    pub fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.limits.max_depth {
            return Err(self.error_here(ParseErrorKind::NestingTooDeep(self.limits.max_depth)));
        }
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    ///////////////////////////////////////////////////////////////////////////////////////////////////////////
    // String scanning

    /// Scans a quoted string value, resolving its escape sequences.
    /// Any other character, raw tabs and line breaks included, is kept as is.
    pub fn scan_string(&mut self) -> Result<String, ParseError> {
        self.expect('"')?;
        let mut string = String::new();

        loop {
            match self.consume() {
                None => return Err(self.error_here(ParseErrorKind::UnexpectedEndOfInput)),
                Some('"') => return Ok(string),
                Some('\\') => string.push(self.parse_escape()?),
                Some(x) => string.push(x),
            }
        }
    }

    /// Scans a quoted object key. Keys are compared as written, so escape sequences
    /// are kept raw; a backslash only prevents the following quote from closing the key.
    pub fn scan_key(&mut self) -> Result<String, ParseError> {
        self.expect('"')?;
        let mut key = String::new();

        loop {
            match self.consume() {
                None => return Err(self.error_here(ParseErrorKind::UnexpectedEndOfInput)),
                Some('"') => return Ok(key),
                Some('\\') => {
                    key.push('\\');
                    match self.consume() {
                        Some(x) => key.push(x),
                        None => return Err(self.error_here(ParseErrorKind::UnexpectedEndOfInput)),
                    }
                }
                Some(x) => key.push(x),
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, ParseError> {
        let pos = self.position;
        match self.consume() {
            Some('"') => Ok('"'),
            Some('\\') => Ok('\\'),
            Some('/') => Ok('/'),
            Some('b') => Ok('\x08'),
            Some('f') => Ok('\x0C'),
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('u') => self.parse_unicode_escape(),
            Some(x) => Err(ParseError::at(
                ParseErrorKind::InvalidEscape(format!("\\{x}")),
                pos,
            )),
            None => Err(self.error_here(ParseErrorKind::UnexpectedEndOfInput)),
        }
    }

    fn parse_unicode_escape(&mut self) -> Result<char, ParseError> {
        // The unicode prefix has been consumed, parse the remaining sequence
        let pos = self.position;
        let code = self.parse_u16_encoded()?;

        let decoded = if is_high_surrogate(code) {
            // Part of a 32-bit surrogate sequence, the low half must follow right away
            if !(self.matches('\\') && self.matches('u')) {
                return Err(self.error_here(ParseErrorKind::InvalidEscape(format!(
                    "\\u{code:04X} is not followed by its low surrogate"
                ))));
            }
            let code2 = self.parse_u16_encoded()?;
            char::decode_utf16([code, code2]).next()
        } else {
            char::decode_utf16([code]).next()
        };

        match decoded {
            Some(Ok(ch)) => Ok(ch),
            _ => Err(ParseError::at(
                ParseErrorKind::InvalidEscape(format!("\\u{code:04X}")),
                pos,
            )),
        }
    }

    fn parse_u16_encoded(&mut self) -> Result<u16, ParseError> {
        /* Parses the u16 represented by a single unicode escape sequence \uXXXX.
         * It should be called when the scanner is at the beginning of the hex code. */
        let pos = self.position;
        let mut seq = String::with_capacity(4);
        for _ in 0..4 {
            match self.consume() {
                Some(x) => seq.push(x),
                None => return Err(self.error_here(ParseErrorKind::UnexpectedEndOfInput)),
            }
        }

        if !is_hex(&seq) {
            return Err(ParseError::at(
                ParseErrorKind::InvalidEscape(format!("\\u{seq}")),
                pos,
            ));
        }
        u16::from_str_radix(&seq, 16)
            .map_err(|_| ParseError::at(ParseErrorKind::InvalidEscape(format!("\\u{seq}")), pos))
    }

    ///////////////////////////////////////////////////////////////////////////////////////////////////////////
    // Number scanning

    /// Scans the digits of an unsigned integer, at least one.
    pub fn scan_unsigned(&mut self) -> Result<&'a str, ParseError> {
        self.skip_whitespace();
        let start = self.current;
        self.require_digit()?;
        self.skip_digits();
        Ok(self.slice_from(start))
    }

    /// Scans an optional sign followed by at least one digit.
    pub fn scan_signed(&mut self) -> Result<&'a str, ParseError> {
        self.skip_whitespace();
        let start = self.current;
        self.skip_sign();
        self.require_digit()?;
        self.skip_digits();
        Ok(self.slice_from(start))
    }

    /// Scans a decimal number: an optional sign, digits with an optional dot anywhere
    /// among them (`.5`, `1.` and `+2.5` are all fine), and an optional exponent.
    pub fn scan_float(&mut self) -> Result<&'a str, ParseError> {
        self.skip_whitespace();
        let start = self.current;
        self.skip_sign();
        let mut digits = self.skip_digits();

        if self.matches('.') {
            digits += self.skip_digits();
        }
        if digits == 0 {
            return Err(self.unexpected_here());
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('-' | '+')) {
                self.advance();
            }
            self.require_digit()?;
            self.skip_digits();
        }

        Ok(self.slice_from(start))
    }

    fn slice_from(&self, start: usize) -> &'a str {
        let source = self.source;
        &source[start..self.current]
    }

    fn require_digit(&mut self) -> Result<(), ParseError> {
        if self.peek().is_some_and(is_digit) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected_here())
        }
    }

    fn skip_sign(&mut self) {
        if matches!(self.peek(), Some('-' | '+')) {
            self.advance();
        }
    }

    fn skip_digits(&mut self) -> usize {
        /* Advances the scanner forward until a non-digit is found, returns how many were skipped */
        let mut count = 0;
        while self.peek().is_some_and(is_digit) {
            self.advance();
            count += 1;
        }
        count
    }

    ///////////////////////////////////////////////////////////////////////////////////////////////////////////
    // Errors

    /// Creates a ParseError at the next, not yet consumed, character
    pub fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::at(kind, self.position)
    }

    /// Rejects whatever comes next, be it a character or the end of the input
    fn unexpected_here(&mut self) -> ParseError {
        match self.peek() {
            Some(x) => self.error_here(ParseErrorKind::UnexpectedCharacter(x)),
            None => self.error_here(ParseErrorKind::UnexpectedEndOfInput),
        }
    }

    ///////////////////////////////////////////////////////////////////////////////////////////////////////////
    // Scanning control

    fn advance(&mut self) {
        if let Some(ch) = self.char_iter.next() {
            self.current += ch.len_utf8();
            if ch == '\n' {
                self.position.line += 1;
                self.position.column = 0;
            } else {
                self.position.column += 1;
            }
        }
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.peek();
        self.advance();
        ch
    }

    pub fn peek(&mut self) -> Option<char> {
        self.char_iter.peek().copied()
    }

    fn matches(&mut self, expected: char) -> bool {
        let matched = self.peek() == Some(expected);
        if matched {
            self.advance();
        }
        matched
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.advance();
        }
    }
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

pub fn is_element_separator(c: char) -> bool {
    c == ','
}

fn is_hex(s: &str) -> bool {
    s.chars().all(|ch| ch.is_ascii_hexdigit())
}

fn is_high_surrogate(x: u16) -> bool {
    (0xD800..=0xDBFF).contains(&x)
}
