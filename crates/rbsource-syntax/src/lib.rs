//! # rbsource-syntax
//!
//! A lossless Ruby syntax tree using [Rowan] + [Logos], following the
//! [rust-analyzer] architecture model, with a diagnostics side channel.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## Scope
//!
//! This crate covers the subset of Ruby that source-analysis tooling needs to
//! navigate: method and class definitions, control flow, calls with and
//! without parentheses, blocks, literals and operators. It is the parser the
//! `rbsource-engine` crate drives; the engine never looks inside it beyond
//! [`RubyParser`], [`Tokenized`] and the diagnostic types.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//!                                    │
//!                                    └──→ Diagnostics → consumer closure
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Every byte becomes part of some token. Whitespace, comments and line
//! continuations are trivia; newlines are real tokens since they end
//! statements.
//!
//! ### 2. Parser ([`parser`] module)
//!
//! The parser consumes tokens and emits **events**. Problems are recorded as
//! [`Diagnostic`]s. Recoverable errors wrap the offending token in an ERROR
//! node; running out of input inside an open construct, or a fatal lexical
//! problem, aborts the parse and no tree is built.
//!
//! ### 3. Sink ([`parser::sink`] module)
//!
//! The sink replays the events into a Rowan green tree.
//!
//! ### 4. Diagnostics ([`diagnostic`] module)
//!
//! [`Diagnostics`] forwards each issue to a consumer closure and decides
//! which ones become a [`SyntaxError`].
//!
//! ## Module Structure
//!
//! ```text
//! rbsource-syntax/
//! ├── lib.rs           # This file - public API and snapshot tests
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── diagnostic.rs    # Level, Diagnostic, SyntaxError, Diagnostics engine
//! ├── tokenize.rs      # RubyParser: tree + comments + tokens
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs        # Program root
//!         ├── statement.rs  # Statement lists and keyword constructs
//!         └── expression.rs # Operators, calls, blocks, literals
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use rbsource_syntax::{parse, SyntaxKind};
//!
//! let tree = parse("def hello\n  puts 'hi'\nend\n").unwrap();
//!
//! assert_eq!(tree.text().to_string(), "def hello\n  puts 'hi'\nend\n");
//! assert_eq!(tree.kind(), SyntaxKind::ROOT);
//! let def = tree.children().next().unwrap();
//! assert_eq!(def.kind(), SyntaxKind::DEF);
//! ```

pub mod diagnostic;
pub mod lexer;
pub mod parser;
pub mod syntax_kind;
pub mod tokenize;

pub use diagnostic::{Diagnostic, Diagnostics, Level, SyntaxError};
pub use syntax_kind::{RubyLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use tokenize::{Comment, RawToken, RubyParser, Tokenized};

/// Parse with default settings, discarding diagnostics.
pub fn parse(source: &str) -> Result<SyntaxNode, SyntaxError> {
    RubyParser::new().tokenize(source).map(|t| t.root)
}
