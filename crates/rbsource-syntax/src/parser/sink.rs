//! Sink for replaying parser events into a Rowan green tree.

use rowan::GreenNodeBuilder;

use crate::lexer::Token;
use crate::parser::event::Event;
use crate::syntax_kind::SyntaxNode;

/// Replays events against the token stream with a `GreenNodeBuilder`.
///
/// Every `Token` event consumes exactly one lexer token, trivia included, so
/// the finished tree's text is the source text byte for byte.
pub struct Sink<'t, 'input> {
    builder: GreenNodeBuilder<'static>,
    tokens: &'t [Token<'input>],
    cursor: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Sink<'t, 'input> {
    pub fn new(tokens: &'t [Token<'input>], events: Vec<Event>) -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
            tokens,
            cursor: 0,
            events,
        }
    }

    /// Consume the sink and build the syntax tree.
    pub fn finish(mut self) -> SyntaxNode {
        let mut pending = Vec::new();

        for i in 0..self.events.len() {
            match std::mem::replace(&mut self.events[i], Event::Placeholder) {
                Event::Start {
                    kind,
                    forward_parent,
                } => {
                    pending.push(kind);
                    let mut next = forward_parent;

                    // Wrappers were pushed later in the stream; pull them
                    // forward and blank them so they are not opened twice.
                    while let Some(parent) = next {
                        match std::mem::replace(&mut self.events[parent], Event::Placeholder) {
                            Event::Start {
                                kind,
                                forward_parent,
                            } => {
                                pending.push(kind);
                                next = forward_parent;
                            }
                            _ => unreachable!("forward parent must be a Start event"),
                        }
                    }

                    for kind in pending.drain(..).rev() {
                        self.builder.start_node(kind.into());
                    }
                }
                Event::Token { kind } => {
                    let token = &self.tokens[self.cursor];
                    self.builder.token(kind.into(), token.text);
                    self.cursor += 1;
                }
                Event::Finish => self.builder.finish_node(),
                Event::Placeholder => {}
            }
        }

        SyntaxNode::new_root(self.builder.finish())
    }
}
