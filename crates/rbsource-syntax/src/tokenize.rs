//! # Tokenize - the parser collaborator's front door
//!
//! [`RubyParser::tokenize`] runs the whole pipeline and hands back the tree
//! together with the comments and the significant tokens, the three things a
//! source-analysis tool consumes. Diagnostics found along the way are routed
//! through the parser's [`Diagnostics`] engine, which may turn one of them
//! into a [`SyntaxError`].

use std::ops::Range;

use crate::diagnostic::{Diagnostic, Diagnostics, Level, SyntaxError};
use crate::lexer::lex;
use crate::parser::Parser;
use crate::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};

/// A `#` comment, without its line ending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub range: Range<usize>,
}

/// A significant lexical token: anything but whitespace, line
/// continuations and comments. Newlines are included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub kind: SyntaxKind,
    pub value: String,
    pub range: Range<usize>,
}

/// Everything a successful parse produces.
#[derive(Debug, Clone)]
pub struct Tokenized {
    pub root: SyntaxNode,
    pub comments: Vec<Comment>,
    pub tokens: Vec<RawToken>,
}

/// A configured parser instance.
///
/// ```
/// use rbsource_syntax::{Level, RubyParser};
///
/// let mut seen = Vec::new();
/// let mut parser = RubyParser::new();
/// parser.diagnostics.set_consumer(|d| seen.push(d.level));
///
/// let result = parser.tokenize("if x = 1\n  y\nend\n");
/// assert!(result.is_ok());
/// drop(parser);
/// assert_eq!(seen, vec![Level::Warning]);
/// ```
#[derive(Debug, Default)]
pub struct RubyParser<'c> {
    pub diagnostics: Diagnostics<'c>,
}

impl<'c> RubyParser<'c> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source`, delivering diagnostics to the registered consumer.
    ///
    /// Fails when the grammar could not build a tree, or when the
    /// diagnostics engine escalates one of the reported issues.
    pub fn tokenize(&mut self, source: &str) -> Result<Tokenized, SyntaxError> {
        let tokens = lex(source);
        let parse = Parser::new(&tokens, self.diagnostics.all_errors_are_fatal).parse();

        let mut last = None;
        for diagnostic in parse.diagnostics {
            last = Some(diagnostic.clone());
            self.diagnostics.process(diagnostic)?;
        }

        let Some(root) = parse.root else {
            return Err(self.aborted(last, source.len()));
        };

        let mut comments = Vec::new();
        let mut significant = Vec::new();
        for token in root.descendants_with_tokens().filter_map(|e| e.into_token()) {
            match token.kind() {
                SyntaxKind::COMMENT => comments.push(Comment {
                    text: token.text().to_string(),
                    range: range_of(&token),
                }),
                kind if kind.is_trivia() => {}
                kind => significant.push(RawToken {
                    kind,
                    value: token.text().to_string(),
                    range: range_of(&token),
                }),
            }
        }

        Ok(Tokenized {
            root,
            comments,
            tokens: significant,
        })
    }

    /// The error for a parse that built no tree.
    ///
    /// `last` has already been delivered. Without one, a fatal diagnostic at
    /// `end` is delivered now so the consumer always learns why.
    fn aborted(&mut self, last: Option<Diagnostic>, end: usize) -> SyntaxError {
        if let Some(diagnostic) = last {
            return SyntaxError { diagnostic };
        }
        let diagnostic = Diagnostic::new(Level::Fatal, "parse aborted", end..end);
        match self.diagnostics.process(diagnostic.clone()) {
            Err(error) => error,
            Ok(()) => SyntaxError { diagnostic },
        }
    }
}

fn range_of(token: &SyntaxToken) -> Range<usize> {
    let range = token.text_range();
    usize::from(range.start())..usize::from(range.end())
}
