//! Normalized tokens and comments.
//!
//! The parser reports byte ranges only. Each token and comment is mapped to
//! a [`Location`] that also carries its line and column, resolved against
//! the buffer the parser ran on.

use std::fmt;
use std::ops::Range;

use rbsource_syntax::{RawToken, SyntaxKind};

use crate::buffer::Buffer;

/// Where something sits in a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub range: Range<usize>,
    /// 1-based line of `range.start`.
    pub line: usize,
    /// 0-based byte column of `range.start`.
    pub column: usize,
}

impl Location {
    pub fn new(range: Range<usize>, buffer: &Buffer) -> Self {
        // Ranges come from lexing this very buffer, so the start is always
        // a valid position.
        let (line, column) = buffer.line_and_column(range.start).unwrap_or((1, 0));
        Self {
            range,
            line,
            column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub pos: Location,
    pub kind: SyntaxKind,
    pub text: String,
}

impl Token {
    pub fn from_parser_token(raw: RawToken, buffer: &Buffer) -> Self {
        Self {
            pos: Location::new(raw.range, buffer),
            kind: raw.kind,
            text: raw.value,
        }
    }

    pub fn line(&self) -> usize {
        self.pos.line
    }

    pub fn column(&self) -> usize {
        self.pos.column
    }

    pub fn is_newline(&self) -> bool {
        self.kind == SyntaxKind::NEWLINE
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {:?} {:?}",
            self.pos.line, self.pos.column, self.kind, self.text
        )
    }
}

/// A source comment, `#` included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub pos: Location,
    pub text: String,
}

impl Comment {
    pub fn from_parser_comment(raw: rbsource_syntax::Comment, buffer: &Buffer) -> Self {
        Self {
            pos: Location::new(raw.range, buffer),
            text: raw.text,
        }
    }

    pub fn line(&self) -> usize {
        self.pos.line
    }
}
