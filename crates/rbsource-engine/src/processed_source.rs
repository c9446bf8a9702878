//! # ProcessedSource - one parsed source file
//!
//! Construction does all the eager work: decode the bytes into a
//! [`Buffer`], run the parser with a [`DiagnosticSink`] attached, and keep
//! whatever came out. Nothing in construction returns an error. A buffer
//! that fails to decode is kept as [`parser_error`](ProcessedSource::parser_error)
//! and the parser never runs; a parse that cannot produce a tree leaves
//! `ast`, `comments` and `tokens` all absent, with the reason in the
//! diagnostics.
//!
//! Line views and suppression ranges are computed on first use and cached.
//!
//! ```
//! use rbsource_engine::ProcessedSource;
//!
//! let source = ProcessedSource::from_text("def foo\n  1\nend\n", None);
//! assert!(source.is_valid_syntax());
//! assert_eq!(source.lines(), ["def foo", "  1", "end"]);
//! assert_eq!(source.get(1).map(String::as_str), Some("  1"));
//! ```

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::slice::SliceIndex;

use rbsource_config::ParserConfig;
use rbsource_syntax::{Diagnostic, SyntaxNode};

use crate::buffer::{Buffer, EncodingError};
use crate::comment_config::CommentConfig;
use crate::diagnostics::DiagnosticSink;
use crate::io::{self, IoError};
use crate::lines::Lines;
use crate::parsing::{self, ParseResult};
use crate::token::{Comment, Token};

#[derive(Debug)]
pub struct ProcessedSource {
    path: Option<PathBuf>,
    buffer: Result<Buffer, EncodingError>,
    diagnostics: DiagnosticSink,
    parsed: Option<ParseResult>,
    lines: OnceCell<Lines>,
    comment_config: OnceCell<CommentConfig>,
}

impl ProcessedSource {
    /// Process `source` with the default parser configuration.
    pub fn from_text(source: impl Into<Vec<u8>>, path: Option<&Path>) -> Self {
        Self::with_config(source, path, &ParserConfig::default())
    }

    pub fn with_config(
        source: impl Into<Vec<u8>>,
        path: Option<&Path>,
        config: &ParserConfig,
    ) -> Self {
        let name = path.map(|p| p.display().to_string());
        let buffer = Buffer::build(name.as_deref(), source);

        let mut diagnostics = DiagnosticSink::new();
        let parsed = match &buffer {
            Ok(buffer) => parsing::parse(buffer, config, &mut diagnostics).into_result(),
            Err(error) => {
                log::warn!("{error}");
                None
            }
        };

        Self {
            path: path.map(Path::to_path_buf),
            buffer,
            diagnostics,
            parsed,
            lines: OnceCell::new(),
            comment_config: OnceCell::new(),
        }
    }

    /// Read the whole file at `path` and process it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, IoError> {
        Self::from_file_with_config(path, &ParserConfig::default())
    }

    pub fn from_file_with_config(
        path: impl AsRef<Path>,
        config: &ParserConfig,
    ) -> Result<Self, IoError> {
        let path = path.as_ref();
        let bytes = io::read_file(path)?;
        Ok(Self::with_config(bytes, Some(path), config))
    }

    /// Process the file at `path` with the configuration in `config_path`,
    /// or the user's config file when `None`. A missing config file means
    /// defaults.
    pub fn from_file_configured(
        path: impl AsRef<Path>,
        config_path: Option<&Path>,
    ) -> Result<Self, IoError> {
        let config = match config_path {
            Some(config_path) => ParserConfig::load_from_path(config_path)?.unwrap_or_default(),
            None => ParserConfig::load_or_default()?,
        };
        Self::from_file_with_config(path, &config)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The decoded buffer; `None` when decoding failed.
    pub fn buffer(&self) -> Option<&Buffer> {
        self.buffer.as_ref().ok()
    }

    /// Why the buffer could not be built, if it could not.
    pub fn parser_error(&self) -> Option<&EncodingError> {
        self.buffer.as_ref().err()
    }

    pub fn ast(&self) -> Option<&SyntaxNode> {
        self.parsed.as_ref().map(|p| &p.ast)
    }

    pub fn comments(&self) -> Option<&[Comment]> {
        self.parsed.as_ref().map(|p| p.comments.as_slice())
    }

    pub fn tokens(&self) -> Option<&[Token]> {
        self.parsed.as_ref().map(|p| p.tokens.as_slice())
    }

    /// Every diagnostic the parser reported, in order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.all()
    }

    /// False when the buffer failed to decode or any error or fatal
    /// diagnostic was recorded.
    pub fn is_valid_syntax(&self) -> bool {
        self.buffer.is_ok() && !self.diagnostics.has_errors()
    }

    fn line_views(&self) -> &Lines {
        self.lines.get_or_init(|| match &self.buffer {
            Ok(buffer) => Lines::materialize(buffer.source()),
            Err(_) => Lines::default(),
        })
    }

    /// Lines without their terminators.
    pub fn lines(&self) -> &[String] {
        self.line_views().trimmed()
    }

    /// Lines with their terminators; they concatenate back to the source.
    pub fn raw_lines(&self) -> &[String] {
        self.line_views().raw()
    }

    /// Index trimmed lines by position or range.
    pub fn get<I>(&self, index: I) -> Option<&I::Output>
    where
        I: SliceIndex<[String]>,
    {
        self.lines().get(index)
    }

    /// The `n`th trimmed line counting from the end; `1` is the last line.
    pub fn get_from_end(&self, n: usize) -> Option<&String> {
        if n == 0 {
            return None;
        }
        let lines = self.lines();
        lines.get(lines.len().checked_sub(n)?)
    }

    /// Up to `len` trimmed lines starting at `start`.
    ///
    /// `start` equal to the line count yields an empty slice; past that
    /// yields `None`.
    pub fn slice(&self, start: usize, len: usize) -> Option<&[String]> {
        let lines = self.lines();
        if start > lines.len() {
            return None;
        }
        let end = start.saturating_add(len).min(lines.len());
        Some(&lines[start..end])
    }

    /// 1-based line of a byte offset into the source.
    pub fn line_of_offset(&self, offset: usize) -> Option<usize> {
        self.buffer().and_then(|b| b.line_of_offset(offset))
    }

    pub fn comment_config(&self) -> &CommentConfig {
        self.comment_config.get_or_init(|| CommentConfig::new(self))
    }

    /// Lines on which each cop is disabled by source comments.
    pub fn disabled_line_ranges(&self) -> &BTreeMap<String, Vec<RangeInclusive<usize>>> {
        self.comment_config().cop_disabled_line_ranges()
    }
}
