//! # Parser Events
//!
//! The grammar describes the tree as a flat stream of events; the
//! [`Sink`](super::sink::Sink) turns that stream into a Rowan tree once the
//! whole input has been parsed. An aborted parse simply never reaches the
//! sink, so half-built structure is never observable.
//!
//! ```text
//! def foo; end
//!
//! Start(DEF)
//!   Token(DEF_KW)
//!   Token(WHITESPACE)   ← trivia is flushed before the next real token
//!   Token(IDENT)
//!   Token(SEMI)
//!   Token(WHITESPACE)
//!   Token(END_KW)
//! Finish
//! ```
//!
//! ## Forward Parent Links
//!
//! `Start::forward_parent` records that a node was wrapped after the fact
//! (`a + b` only becomes a BINARY once `+` is seen). The sink follows the
//! chain and opens the outermost node first.

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Open a composite node, possibly on behalf of a later wrapper.
    Start {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },

    /// Attach the next lexer token to the open node.
    Token { kind: SyntaxKind },

    /// Close the most recently opened node.
    Finish,

    /// Reserved slot from `Parser::start()`; replaced on `complete()`,
    /// ignored by the sink if the marker was abandoned.
    Placeholder,
}

impl Event {
    /// Create a start event with no forward parent.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start {
            kind,
            forward_parent: None,
        }
    }

    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token { kind }
    }
}
