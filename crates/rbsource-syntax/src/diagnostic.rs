//! # Diagnostics - the parser's side channel
//!
//! The parser never returns warnings or recoverable errors as values. It
//! reports every issue it finds through a [`Diagnostics`] engine, which
//! forwards each [`Diagnostic`] to a registered consumer closure, in the
//! order the issues were discovered.
//!
//! The engine also decides which diagnostics stop the parse:
//!
//! | level     | default    | `all_errors_are_fatal` |
//! |-----------|------------|------------------------|
//! | `Note`    | delivered  | delivered              |
//! | `Warning` | delivered* | delivered*             |
//! | `Error`   | delivered  | delivered, aborts      |
//! | `Fatal`   | aborts     | aborts                 |
//!
//! \* dropped before delivery when `ignore_warnings` is set.

use std::fmt;
use std::ops::Range;

use thiserror::Error;

/// Severity of a diagnostic, least severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Note,
    Warning,
    Error,
    Fatal,
}

impl Level {
    /// `Error` and `Fatal` mean the source is not valid syntax.
    pub fn is_error(self) -> bool {
        self >= Level::Error
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Note => "note",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// A parser-detected issue: severity, message and byte range in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub range: Range<usize>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>, range: Range<usize>) -> Self {
        Self {
            level,
            message: message.into(),
            range,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}: {}: {}",
            self.range.start, self.range.end, self.level, self.message
        )
    }
}

/// The parse could not produce a tree.
///
/// Carries the diagnostic that stopped it; that diagnostic has already been
/// delivered to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error: {diagnostic}")]
pub struct SyntaxError {
    pub diagnostic: Diagnostic,
}

/// Routes diagnostics to a consumer and applies the abort policy.
pub struct Diagnostics<'c> {
    /// Treat every `Error` as parse-aborting.
    pub all_errors_are_fatal: bool,
    /// Drop warnings before they reach the consumer.
    pub ignore_warnings: bool,
    consumer: Option<Box<dyn FnMut(Diagnostic) + 'c>>,
}

impl<'c> Diagnostics<'c> {
    pub fn new() -> Self {
        Self {
            all_errors_are_fatal: false,
            ignore_warnings: false,
            consumer: None,
        }
    }

    /// Register the closure that receives every delivered diagnostic.
    pub fn set_consumer(&mut self, consumer: impl FnMut(Diagnostic) + 'c) {
        self.consumer = Some(Box::new(consumer));
    }

    /// Whether a diagnostic of this level stops the parse.
    pub fn aborts(&self, level: Level) -> bool {
        level == Level::Fatal || (self.all_errors_are_fatal && level == Level::Error)
    }

    /// Deliver a diagnostic, then fail if it aborts the parse.
    pub fn process(&mut self, diagnostic: Diagnostic) -> Result<(), SyntaxError> {
        if self.ignore_warnings && diagnostic.level == Level::Warning {
            return Ok(());
        }

        let aborts = self.aborts(diagnostic.level);
        let kept = aborts.then(|| diagnostic.clone());

        if let Some(consumer) = self.consumer.as_mut() {
            consumer(diagnostic);
        }

        match kept {
            Some(diagnostic) => Err(SyntaxError { diagnostic }),
            None => Ok(()),
        }
    }
}

impl Default for Diagnostics<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Diagnostics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("all_errors_are_fatal", &self.all_errors_are_fatal)
            .field("ignore_warnings", &self.ignore_warnings)
            .field("consumer", &self.consumer.is_some())
            .finish()
    }
}
