//! Parse invoker.
//!
//! Runs the parser over a buffer with the diagnostic sink attached as its
//! consumer. A parse that cannot produce a tree is not an error here: the
//! diagnostic explaining why is already in the sink, so the outcome is just
//! [`ParseOutcome::SyntaxFailed`].

use rbsource_config::ParserConfig;
use rbsource_syntax::{RubyParser, SyntaxNode};

use crate::buffer::Buffer;
use crate::diagnostics::DiagnosticSink;
use crate::token::{Comment, Token};

/// Tree, comments and tokens of a successful parse. Never partial.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub ast: SyntaxNode,
    pub comments: Vec<Comment>,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Parsed(ParseResult),
    SyntaxFailed,
}

impl ParseOutcome {
    pub fn into_result(self) -> Option<ParseResult> {
        match self {
            ParseOutcome::Parsed(result) => Some(result),
            ParseOutcome::SyntaxFailed => None,
        }
    }
}

/// Parse `buffer`, recording every diagnostic in `sink`.
pub fn parse(buffer: &Buffer, config: &ParserConfig, sink: &mut DiagnosticSink) -> ParseOutcome {
    log::debug!("parsing {} ({} bytes)", buffer.name(), buffer.len());

    let result = {
        let mut parser = RubyParser::new();
        parser.diagnostics.all_errors_are_fatal = config.all_errors_are_fatal;
        parser.diagnostics.ignore_warnings = config.ignore_warnings;
        parser
            .diagnostics
            .set_consumer(|diagnostic| sink.record(diagnostic));
        parser.tokenize(buffer.source())
    };

    let tokenized = match result {
        Ok(tokenized) => tokenized,
        Err(error) => {
            log::debug!("{}: {error}", buffer.name());
            return ParseOutcome::SyntaxFailed;
        }
    };

    let comments = tokenized
        .comments
        .into_iter()
        .map(|raw| Comment::from_parser_comment(raw, buffer))
        .collect();
    let tokens: Vec<Token> = tokenized
        .tokens
        .into_iter()
        .map(|raw| Token::from_parser_token(raw, buffer))
        .collect();

    log::debug!(
        "parsed {}: {} tokens, {} diagnostics",
        buffer.name(),
        tokens.len(),
        sink.len()
    );

    ParseOutcome::Parsed(ParseResult {
        ast: tokenized.root,
        comments,
        tokens,
    })
}
