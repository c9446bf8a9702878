//! # rbsource-engine
//!
//! Turns Ruby source into a [`ProcessedSource`]: the decoded [`Buffer`], the
//! syntax tree, comments and tokens from `rbsource-syntax`, every diagnostic
//! the parser reported, and line-indexed views of the text.
//!
//! ```text
//! bytes ──→ Buffer::build ──→ parsing::parse ──→ ProcessedSource
//!              │                  │    └──→ DiagnosticSink
//!              └ EncodingError    └ SyntaxFailed (absorbed)
//! ```

pub mod buffer;
pub mod comment_config;
pub mod diagnostics;
pub mod io;
pub mod lines;
pub mod parsing;
pub mod processed_source;
pub mod token;

#[cfg(test)]
pub mod tests;

pub use buffer::{Buffer, DEFAULT_NAME, EncodingError, SourceEncoding};
pub use comment_config::CommentConfig;
pub use diagnostics::DiagnosticSink;
pub use io::IoError;
pub use lines::Lines;
pub use parsing::{ParseOutcome, ParseResult};
pub use processed_source::ProcessedSource;
pub use token::{Comment, Location, Token};

pub use rbsource_config::ParserConfig;
pub use rbsource_syntax::{Diagnostic, Level, SyntaxKind, SyntaxNode};
