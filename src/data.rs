/* Data models */

use std::fmt::Display;
use std::{fmt, io};

use thiserror::Error;

/// 2-dimensional position inside the JSON source.
/// Line is 1-based and column is 0-based, both counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A parse failure, pointing at the character where it was detected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} (line {line}, column {column})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("Unexpected character: '{}'", .0.escape_debug())]
    UnexpectedCharacter(char),
    #[error("Unexpected end of the JSON input")]
    UnexpectedEndOfInput,
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),
    #[error("Invalid escape sequence: {0}")]
    InvalidEscape(String),
    /// An object key that the target record does not declare.
    #[error("Unexpected property name: \"{0}\"")]
    UnexpectedPropertyName(String),
    #[error("Maximum nesting depth of {0} exceeded")]
    NestingTooDeep(usize),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }

    pub fn at(kind: ParseErrorKind, pos: Position) -> Self {
        Self::new(kind, pos.line, pos.column)
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// Whether this error comes from a key not declared by the target record,
    /// as opposed to malformed syntax.
    pub fn is_unexpected_property(&self) -> bool {
        matches!(self.kind, ParseErrorKind::UnexpectedPropertyName(_))
    }

    pub fn is_unexpected_end(&self) -> bool {
        matches!(self.kind, ParseErrorKind::UnexpectedEndOfInput)
    }
}

/// A record declared the same property name more than once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Record `{record}` declares the property \"{name}\" more than once")]
pub struct SchemaError {
    pub record: &'static str,
    pub name: &'static str,
}

/// Failures of the reader/writer based entry points and of serialization.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("The output sink refused the write")]
    Write(#[from] fmt::Error),
    #[error("Cannot serialize the non-finite number {0}")]
    NonFiniteNumber(f64),
}

/// Default maximum nesting of records and sequences.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Resource limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of nested records/sequences, the top-level record included.
    pub max_depth: usize,
}

impl Limits {
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// No depth limit. Deeply nested input can then exhaust the stack.
    pub const fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new()
    }
}
