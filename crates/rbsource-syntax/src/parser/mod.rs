//! # Parser - Event-Based Tree Construction
//!
//! This module implements the core parsing logic, transforming a token stream
//! into a syntax tree using the **event-based** architecture from rust-analyzer.
//!
//! ## The Event Model
//!
//! Grammar functions never build tree nodes directly. They emit a flat list
//! of [`Event`]s (Start, Token, Finish) which the [`Sink`] replays into a
//! Rowan green tree once parsing is done.
//!
//! ## The Marker System
//!
//! `parser.start()` returns a [`Marker`] that **must** be either completed
//! with `marker.complete(parser, KIND)` or abandoned with
//! `marker.abandon(parser)`. Dropping one unfinished panics.
//!
//! `CompletedMarker::precede()` wraps an already-parsed node in a new parent,
//! which is how binary expressions, calls on a receiver and statement
//! modifiers are built without backtracking.
//!
//! ## Trivia
//!
//! Whitespace, comments and line continuations are invisible to the grammar:
//! [`Parser::current`] and [`Parser::nth`] skip them, and [`Parser::bump`]
//! emits any pending trivia before the significant token. Newlines are *not*
//! trivia in Ruby; grammar rules skip them explicitly where a construct may
//! continue on the next line.
//!
//! ## Diagnostics and aborting
//!
//! Grammar rules report problems with [`Parser::error`], [`Parser::warning`]
//! and [`Parser::fatal`]. A diagnostic that aborts the parse flips the parser
//! into a state where it looks like end of input: every loop in the grammar
//! terminates on its own, every marker still completes, and no tree is built.
//! An error reported at end of input always aborts, since an open construct
//! can never be closed.

pub mod event;
pub mod sink;

mod grammar;

use std::ops::Range;

use crate::diagnostic::{Diagnostic, Level};
use crate::lexer::Token;
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// How deeply expressions may nest before the parse is abandoned.
const MAX_DEPTH: usize = 512;

/// Output of a grammar run.
///
/// `root` is `None` when the parse aborted; the last diagnostic is then the
/// one that stopped it.
#[derive(Debug)]
pub struct Parse {
    pub root: Option<SyntaxNode>,
    pub diagnostics: Vec<Diagnostic>,
}

/// The parser state machine.
///
/// Holds the token stream, current position, accumulated events and the
/// diagnostics reported so far. Grammar functions receive `&mut Parser` and
/// use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `eat()`, `expect()`
/// - Build structure: `start()` → `Marker` → `complete()`/`abandon()`
/// - Report: `error()`, `warning()`, `fatal()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
    diagnostics: Vec<Diagnostic>,
    all_errors_are_fatal: bool,
    aborted: bool,
    /// Set while parsing `while`/`until` conditions and command arguments,
    /// where a trailing `do` belongs to the enclosing construct.
    no_do_block: bool,
    /// Event position of the last `x = literal` assignment.
    literal_assignment: Option<usize>,
    /// Expressions currently open, bounded by [`MAX_DEPTH`].
    depth: usize,
    last_end: usize,
    eof_offset: usize,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>], all_errors_are_fatal: bool) -> Self {
        let eof_offset = tokens.last().map(|t| t.range.end).unwrap_or(0);
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            diagnostics: Vec::new(),
            all_errors_are_fatal,
            aborted: false,
            no_do_block: false,
            literal_assignment: None,
            depth: 0,
            last_end: 0,
            eof_offset,
        }
    }

    /// Parse the tokens into a syntax tree plus diagnostics.
    pub fn parse(mut self) -> Parse {
        grammar::root(&mut self);

        let root = if self.aborted {
            None
        } else {
            let sink = Sink::new(self.tokens, self.events);
            Some(sink.finish())
        };

        Parse {
            root,
            diagnostics: self.diagnostics,
        }
    }

    /// Start a new node and return a marker.
    ///
    /// Pending trivia is attached to the enclosing node, not the new one.
    pub fn start(&mut self) -> Marker {
        if !self.events.is_empty() {
            self.bump_trivia();
        }
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Index into `tokens` of the nth significant token from the cursor.
    fn significant(&self, n: usize) -> Option<usize> {
        if self.aborted {
            return None;
        }
        self.tokens[self.pos..]
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .nth(n)
            .map(|(i, _)| self.pos + i)
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n significant tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.significant(n)
            .map(|i| self.tokens[i].kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Check if at end of input, or if the parse has been aborted.
    pub fn at_end(&self) -> bool {
        self.significant(0).is_none()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Check if current token is any of the given kinds.
    pub fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    /// Check the very next raw token, trivia included.
    ///
    /// Distinguishes `foo(1)` from `foo (1)` and `a[0]` from `a [0]`.
    pub fn at_raw(&self, kind: SyntaxKind) -> bool {
        !self.aborted && self.tokens.get(self.pos).is_some_and(|t| t.kind == kind)
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token or report what was expected instead.
    pub fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error_expected(what);
            false
        }
    }

    /// Consume pending trivia and the current token.
    pub fn bump(&mut self) {
        if self.at_end() {
            return;
        }
        self.bump_trivia();
        let token = &self.tokens[self.pos];
        self.last_end = token.range.end;
        self.events.push(Event::token(token.kind));
        self.pos += 1;
    }

    /// Consume trivia up to the next significant token.
    pub fn bump_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.events.push(Event::token(token.kind));
            self.pos += 1;
        }
    }

    /// Consume any run of newlines.
    pub fn skip_newlines(&mut self) {
        while self.eat(SyntaxKind::NEWLINE) {}
    }

    /// Get the text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.significant(0)
            .map(|i| self.tokens[i].text)
            .unwrap_or("")
    }

    /// Byte range of the current token; empty at end of input.
    pub fn current_range(&self) -> Range<usize> {
        self.significant(0)
            .map(|i| self.tokens[i].range.clone())
            .unwrap_or(self.eof_offset..self.eof_offset)
    }

    /// End offset of the last consumed significant token.
    pub fn last_end(&self) -> usize {
        self.last_end
    }

    /// Raw token position, used to detect rules that consumed nothing.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn no_do_block(&self) -> bool {
        self.no_do_block
    }

    /// Set the `do` restriction, returning the previous value to restore.
    pub fn set_no_do_block(&mut self, value: bool) -> bool {
        std::mem::replace(&mut self.no_do_block, value)
    }

    /// Open one level of expression nesting.
    ///
    /// Returns false, after reporting a fatal diagnostic, once the input
    /// nests deeper than the grammar is willing to recurse.
    pub fn enter(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            let range = self.current_range();
            self.fatal("nesting too deep", range);
            return false;
        }
        self.depth += 1;
        true
    }

    pub fn leave(&mut self) {
        self.depth -= 1;
    }

    pub fn mark_literal_assignment(&mut self, assignment: CompletedMarker) {
        self.literal_assignment = Some(assignment.pos);
    }

    pub fn is_literal_assignment(&self, node: CompletedMarker) -> bool {
        node.kind == SyntaxKind::ASSIGN && self.literal_assignment == Some(node.pos)
    }

    fn report(&mut self, level: Level, message: String, range: Range<usize>) {
        if self.aborted {
            return;
        }
        self.diagnostics.push(Diagnostic::new(level, message, range));
        if level == Level::Fatal || (self.all_errors_are_fatal && level == Level::Error) {
            self.aborted = true;
        }
    }

    /// Report an error at the current token.
    pub fn error(&mut self, message: impl Into<String>) {
        let at_eof = self.at_end();
        let range = self.current_range();
        self.report(Level::Error, message.into(), range);
        if at_eof {
            self.aborted = true;
        }
    }

    /// Report an error that always stops the parse.
    pub fn fatal(&mut self, message: impl Into<String>, range: Range<usize>) {
        self.report(Level::Fatal, message.into(), range);
    }

    pub fn warning(&mut self, message: impl Into<String>, range: Range<usize>) {
        self.report(Level::Warning, message.into(), range);
    }

    fn unexpected(&self) -> String {
        match self.current() {
            SyntaxKind::EOF => "unexpected end-of-input".to_string(),
            SyntaxKind::NEWLINE => "unexpected end-of-line".to_string(),
            _ => format!("unexpected `{}`", self.current_text()),
        }
    }

    /// Report the current token as unexpected.
    pub fn error_unexpected(&mut self) {
        let message = self.unexpected();
        self.error(message);
    }

    /// Report the current token as unexpected, naming what should be here.
    pub fn error_expected(&mut self, what: &str) {
        let message = format!("{}; expected {what}", self.unexpected());
        self.error(message);
    }

    /// Report the current token and wrap it in an ERROR node.
    pub fn err_and_bump(&mut self) {
        let m = self.start();
        self.error_unexpected();
        self.bump();
        m.complete(self, SyntaxKind::ERROR);
    }
}

/// A marker for a node being constructed.
///
/// When you call `parser.start()`, a `Placeholder` event is pushed and you
/// get a `Marker` pointing to it. It must be completed or abandoned; dropping
/// it otherwise panics, which catches grammar bugs before they corrupt the
/// tree.
///
/// ```ignore
/// fn paren(p: &mut Parser) {
///     let m = p.start();
///     p.bump();  // `(`
///     statements(p, &[SyntaxKind::RPAREN]);
///     p.expect(SyntaxKind::RPAREN, "`)`");
///     m.complete(p, SyntaxKind::PAREN);
/// }
/// ```
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() or abandon() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) -> CompletedMarker {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::Start {
            kind,
            forward_parent: None,
        };
        p.events.push(Event::Finish);
        CompletedMarker {
            pos: self.pos,
            kind,
        }
    }

    /// Abandon this marker without creating a node.
    ///
    /// Only removes the placeholder if it's the last event; otherwise the
    /// placeholder becomes inert and is ignored by the Sink.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// A marker for a node that has been completed.
///
/// Call `precede()` to wrap the completed node in a new parent:
///
/// ```ignore
/// let lhs = primary(p);             // `a`
/// if p.at(SyntaxKind::PLUS) {
///     let m = lhs.precede(p);       // new node starting before `a`
///     p.bump();                     // `+`
///     primary(p);                   // `b`
///     m.complete(p, SyntaxKind::BINARY);
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    /// Position of the Start event for this completed node
    pos: usize,
    kind: SyntaxKind,
}

impl CompletedMarker {
    /// Create a new parent node that will contain this node.
    pub fn precede(self, p: &mut Parser<'_, '_>) -> Marker {
        let new_pos = p.events.len();
        p.events.push(Event::Placeholder);

        // Update the original Start event to point to this new parent
        if let Event::Start { forward_parent, .. } = &mut p.events[self.pos] {
            *forward_parent = Some(new_pos);
        }

        Marker {
            pos: new_pos,
            completed: false,
        }
    }

    /// Kind the node was completed with.
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> Parse {
        let tokens = lex(source);
        Parser::new(&tokens, false).parse()
    }

    #[test]
    fn parse_empty_input() {
        let parse = run("");
        let tree = parse.root.unwrap();
        assert_eq!(tree.kind(), SyntaxKind::ROOT);
        assert_eq!(tree.children().count(), 0);
        assert!(parse.diagnostics.is_empty());
    }

    #[test]
    fn parse_preserves_all_text() {
        let input = "# leading\nx = 1 # trailing\n\n";
        let tree = run(input).root.unwrap();
        assert_eq!(tree.text(), input);
    }

    #[test]
    fn nth_skips_trivia() {
        let tokens = lex("a  # c\n b");
        let parser = Parser::new(&tokens, false);
        assert_eq!(parser.current(), SyntaxKind::IDENT);
        assert_eq!(parser.nth(1), SyntaxKind::NEWLINE);
        assert_eq!(parser.nth(2), SyntaxKind::IDENT);
        assert_eq!(parser.nth(3), SyntaxKind::EOF);
    }

    #[test]
    fn error_at_end_of_input_aborts() {
        let tokens = lex("x");
        let mut parser = Parser::new(&tokens, false);
        parser.bump();
        parser.error_expected("`end`");
        assert!(parser.at_end());
        parser.error_unexpected();
        assert_eq!(parser.diagnostics.len(), 1);
        assert_eq!(
            parser.diagnostics[0].message,
            "unexpected end-of-input; expected `end`"
        );
        assert_eq!(parser.diagnostics[0].range, 1..1);
    }

    #[test]
    fn error_mid_stream_recovers_unless_fatal_mode() {
        let tokens = lex(") x");

        let mut lenient = Parser::new(&tokens, false);
        lenient.err_and_bump();
        assert_eq!(lenient.current(), SyntaxKind::IDENT);

        let mut strict = Parser::new(&tokens, true);
        strict.err_and_bump();
        assert!(strict.at_end());
    }

    #[test]
    fn nesting_limit_is_fatal() {
        let tokens = lex("x");
        let mut parser = Parser::new(&tokens, false);
        for _ in 0..MAX_DEPTH {
            assert!(parser.enter());
        }
        assert!(!parser.enter());
        assert!(parser.at_end());
        assert_eq!(parser.diagnostics.len(), 1);
        assert_eq!(parser.diagnostics[0].level, Level::Fatal);
        assert_eq!(parser.diagnostics[0].message, "nesting too deep");
    }

    #[test]
    fn marker_must_be_completed() {
        let result = std::panic::catch_unwind(|| {
            let tokens = lex("test");
            let mut parser = Parser::new(&tokens, false);
            let _marker = parser.start();
            // Marker dropped without completion - should panic
        });
        assert!(result.is_err());
    }

    #[test]
    fn marker_can_be_abandoned() {
        let tokens = lex("test");
        let mut parser = Parser::new(&tokens, false);
        let marker = parser.start();
        marker.abandon(&mut parser);
        // Should not panic
    }
}
