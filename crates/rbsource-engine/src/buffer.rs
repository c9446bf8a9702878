//! Source buffer: decoded text plus offset-to-line translation.
//!
//! A [`Buffer`] is built from raw bytes. The bytes must decode under the
//! encoding the source declares; if they do not, construction fails and no
//! partial buffer exists. Lines are 1-based, columns are 0-based byte
//! offsets within the line.

use std::fmt;
use std::string::FromUtf8Error;
use std::sync::OnceLock;

use regex::bytes::Regex;
use xi_rope::Rope;

/// Name given to buffers that were not read from a file.
pub const DEFAULT_NAME: &str = "(string)";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("{name}: invalid byte sequence in UTF-8")]
    InvalidUtf8 {
        name: String,
        #[source]
        source: FromUtf8Error,
    },
    #[error("{name}: unknown encoding name - {encoding}")]
    UnsupportedEncoding { name: String, encoding: String },
    #[error("{name}: invalid byte sequence in US-ASCII at offset {offset}")]
    InvalidAscii { name: String, offset: usize },
}

/// Encodings a source file may declare in a magic comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceEncoding {
    #[default]
    Utf8,
    UsAscii,
}

impl SourceEncoding {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Self::Utf8),
            "us-ascii" | "ascii" => Some(Self::UsAscii),
            _ => None,
        }
    }
}

/// Find a `# encoding: X` / `# -*- coding: X -*-` comment on the first line,
/// or on the second when the first is a shebang.
fn magic_encoding(bytes: &[u8]) -> Option<&[u8]> {
    static MAGIC_COMMENT: OnceLock<Regex> = OnceLock::new();
    let regex = MAGIC_COMMENT.get_or_init(|| {
        Regex::new(r"(?i-u)\A#[^\n]*?coding\s*[:=]\s*([a-z0-9_.-]+)")
            .expect("Invalid magic comment regex")
    });

    let mut lines = bytes.split(|&b| b == b'\n');
    let first = lines.next()?;
    let candidate = if first.starts_with(b"#!") {
        lines.next()?
    } else {
        first
    };

    regex
        .captures(candidate)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_bytes())
}

/// Immutable source text with its name.
#[derive(Clone)]
pub struct Buffer {
    name: String,
    source: String,
    encoding: SourceEncoding,
    rope: Rope,
}

impl Buffer {
    /// Decode `bytes` into a buffer named `name`, or [`DEFAULT_NAME`].
    pub fn build(name: Option<&str>, bytes: impl Into<Vec<u8>>) -> Result<Self, EncodingError> {
        let name = name.unwrap_or(DEFAULT_NAME).to_string();
        let bytes = bytes.into();

        let encoding = match magic_encoding(&bytes) {
            None => SourceEncoding::default(),
            Some(declared) => {
                let declared = String::from_utf8_lossy(declared);
                SourceEncoding::from_name(&declared).ok_or_else(|| {
                    EncodingError::UnsupportedEncoding {
                        name: name.clone(),
                        encoding: declared.into_owned(),
                    }
                })?
            }
        };

        if encoding == SourceEncoding::UsAscii
            && let Some(offset) = bytes.iter().position(|b| !b.is_ascii())
        {
            return Err(EncodingError::InvalidAscii { name, offset });
        }

        let source = match String::from_utf8(bytes) {
            Ok(source) => source,
            Err(source) => return Err(EncodingError::InvalidUtf8 { name, source }),
        };
        let rope = Rope::from(source.as_str());

        Ok(Self {
            name,
            source,
            encoding,
            rope,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn encoding(&self) -> SourceEncoding {
        self.encoding
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Number of lines; text after the last newline, even if empty, counts.
    pub fn line_count(&self) -> usize {
        self.rope.line_of_offset(self.rope.len()) + 1
    }

    /// 1-based line containing the byte at `offset`.
    ///
    /// `offset == len()` is the position just past the end and is accepted.
    pub fn line_of_offset(&self, offset: usize) -> Option<usize> {
        if !self.source.is_char_boundary(offset) {
            return None;
        }
        Some(self.rope.line_of_offset(offset) + 1)
    }

    /// Byte offset at which 1-based `line` starts.
    pub fn offset_of_line(&self, line: usize) -> Option<usize> {
        if line == 0 || line > self.line_count() {
            return None;
        }
        Some(self.rope.offset_of_line(line - 1))
    }

    /// 1-based line and 0-based byte column of `offset`.
    pub fn line_and_column(&self, offset: usize) -> Option<(usize, usize)> {
        let line = self.line_of_offset(offset)?;
        let start = self.offset_of_line(line)?;
        Some((line, offset - start))
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("encoding", &self.encoding)
            .field("len", &self.source.len())
            .finish()
    }
}
