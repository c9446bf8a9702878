//! # Lexer - Tokenizing Ruby Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Whitespace, comments
//! and line continuations are kept as trivia so the tree can reproduce the
//! source exactly:
//!
//! ```
//! use rbsource_syntax::lexer::lex;
//!
//! let input = "x = 1 # one\n";
//! let tokens = lex(input);
//!
//! // Concatenating all token texts gives back the original
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Why Two Token Enums?
//!
//! Logos requires its own enum for `#[derive(Logos)]`, while Rowan uses our
//! [`SyntaxKind`]. [`TokenKind::to_syntax_kind`] converts between them.
//!
//! ## Context-free tokens
//!
//! The lexer does not know whether `foo` is a local variable or a method call,
//! or whether `{` opens a hash or a block. That is the parser's job. The only
//! stateful scanning is for string literals, whose bodies may contain any
//! character including newlines and `#`, and for `=begin`/`=end` blocks,
//! which only count at the start of a line.
//!
//! [`SyntaxKind`]: crate::syntax_kind::SyntaxKind

use std::ops::Range;

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Whether a scanned string literal found its closing quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Closed,
    Unterminated,
}

/// Token kinds produced by the Logos lexer.
///
/// This enum exists separately from [`SyntaxKind`] because Logos needs to
/// derive on it. Each variant maps to a corresponding `SyntaxKind` token.
///
/// [`SyntaxKind`]: crate::syntax_kind::SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\\\r?\n")]
    LineContinuation,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"#[^\n]*")]
    Comment,

    #[token("\"", scan_string)]
    #[token("'", scan_string)]
    Str(Termination),

    #[regex(r"[a-z_][A-Za-z0-9_]*[?!]?")]
    Ident,

    #[regex(r"[A-Z][A-Za-z0-9_]*")]
    Constant,

    #[regex(r"@[a-zA-Z_][A-Za-z0-9_]*")]
    Ivar,

    #[regex(r"@@[a-zA-Z_][A-Za-z0-9_]*")]
    Cvar,

    #[regex(r"\$[a-zA-Z_][A-Za-z0-9_]*")]
    Gvar,

    #[regex(r"[0-9][0-9_]*")]
    Integer,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*")]
    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?[eE][+-]?[0-9][0-9_]*")]
    Float,

    #[regex(r":[a-zA-Z_][A-Za-z0-9_]*[?!=]?")]
    Symbol,

    /// `:"name"` or `:'name'`
    #[token(":\"", scan_string)]
    #[token(":'", scan_string)]
    QuotedSymbol(Termination),

    #[token("def")]
    Def,
    #[token("end")]
    End,
    #[token("class")]
    Class,
    #[token("module")]
    Module,
    #[token("if")]
    If,
    #[token("elsif")]
    Elsif,
    #[token("else")]
    Else,
    #[token("unless")]
    Unless,
    #[token("while")]
    While,
    #[token("until")]
    Until,
    #[token("case")]
    Case,
    #[token("when")]
    When,
    #[token("do")]
    Do,
    #[token("then")]
    Then,
    #[token("return")]
    Return,
    #[token("yield")]
    Yield,
    #[token("begin")]
    Begin,
    #[token("rescue")]
    Rescue,
    #[token("ensure")]
    Ensure,
    #[token("self")]
    SelfKw,
    #[token("nil")]
    Nil,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("..")]
    Dot2,
    #[token("...")]
    Dot3,
    #[token("::")]
    Colon2,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token("?")]
    Question,
    #[token("=")]
    Eq,
    #[token("==")]
    Eq2,
    #[token("===")]
    Eq3,
    #[token("!=")]
    Neq,
    #[token("=~")]
    Match,
    #[token("<=>")]
    Cmp,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<<")]
    Shl,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    Pow,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("&&")]
    Amp2,
    #[token("||")]
    Pipe2,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("=>")]
    FatArrow,
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("||=")]
    #[token("&&=")]
    OpAssign,
}

/// Consume a string body up to and including the closing quote.
///
/// The opening quote (with its `:` for a symbol) has already been matched.
/// Backslash escapes the next byte, so `"\""` is a single closed literal.
fn scan_string(lex: &mut logos::Lexer<'_, TokenKind>) -> Termination {
    let opener = lex.slice().as_bytes();
    let quote = opener[opener.len() - 1];
    let rest = lex.remainder().as_bytes();
    let mut i = 0;

    while i < rest.len() {
        match rest[i] {
            b'\\' => i += 2,
            b if b == quote => {
                lex.bump(i + 1);
                return Termination::Closed;
            }
            _ => i += 1,
        }
    }

    lex.bump(rest.len());
    Termination::Unterminated
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::LineContinuation => SyntaxKind::LINE_CONTINUATION,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Comment => SyntaxKind::COMMENT,
            TokenKind::Str(Termination::Closed) => SyntaxKind::STRING,
            TokenKind::Str(Termination::Unterminated) => SyntaxKind::UNTERMINATED_STRING,
            TokenKind::Ident => SyntaxKind::IDENT,
            TokenKind::Constant => SyntaxKind::CONSTANT,
            TokenKind::Ivar => SyntaxKind::IVAR,
            TokenKind::Cvar => SyntaxKind::CVAR,
            TokenKind::Gvar => SyntaxKind::GVAR,
            TokenKind::Integer => SyntaxKind::INTEGER,
            TokenKind::Float => SyntaxKind::FLOAT,
            TokenKind::Symbol => SyntaxKind::SYMBOL,
            TokenKind::QuotedSymbol(Termination::Closed) => SyntaxKind::SYMBOL,
            TokenKind::QuotedSymbol(Termination::Unterminated) => {
                SyntaxKind::UNTERMINATED_STRING
            }
            TokenKind::Def => SyntaxKind::DEF_KW,
            TokenKind::End => SyntaxKind::END_KW,
            TokenKind::Class => SyntaxKind::CLASS_KW,
            TokenKind::Module => SyntaxKind::MODULE_KW,
            TokenKind::If => SyntaxKind::IF_KW,
            TokenKind::Elsif => SyntaxKind::ELSIF_KW,
            TokenKind::Else => SyntaxKind::ELSE_KW,
            TokenKind::Unless => SyntaxKind::UNLESS_KW,
            TokenKind::While => SyntaxKind::WHILE_KW,
            TokenKind::Until => SyntaxKind::UNTIL_KW,
            TokenKind::Case => SyntaxKind::CASE_KW,
            TokenKind::When => SyntaxKind::WHEN_KW,
            TokenKind::Do => SyntaxKind::DO_KW,
            TokenKind::Then => SyntaxKind::THEN_KW,
            TokenKind::Return => SyntaxKind::RETURN_KW,
            TokenKind::Yield => SyntaxKind::YIELD_KW,
            TokenKind::Begin => SyntaxKind::BEGIN_KW,
            TokenKind::Rescue => SyntaxKind::RESCUE_KW,
            TokenKind::Ensure => SyntaxKind::ENSURE_KW,
            TokenKind::SelfKw => SyntaxKind::SELF_KW,
            TokenKind::Nil => SyntaxKind::NIL_KW,
            TokenKind::True => SyntaxKind::TRUE_KW,
            TokenKind::False => SyntaxKind::FALSE_KW,
            TokenKind::And => SyntaxKind::AND_KW,
            TokenKind::Or => SyntaxKind::OR_KW,
            TokenKind::Not => SyntaxKind::NOT_KW,
            TokenKind::LParen => SyntaxKind::LPAREN,
            TokenKind::RParen => SyntaxKind::RPAREN,
            TokenKind::LBracket => SyntaxKind::LBRACKET,
            TokenKind::RBracket => SyntaxKind::RBRACKET,
            TokenKind::LBrace => SyntaxKind::LBRACE,
            TokenKind::RBrace => SyntaxKind::RBRACE,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::Dot2 => SyntaxKind::DOT2,
            TokenKind::Dot3 => SyntaxKind::DOT3,
            TokenKind::Colon2 => SyntaxKind::COLON2,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Semi => SyntaxKind::SEMI,
            TokenKind::Question => SyntaxKind::QUESTION,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::Eq2 => SyntaxKind::EQ2,
            TokenKind::Eq3 => SyntaxKind::EQ3,
            TokenKind::Neq => SyntaxKind::NEQ,
            TokenKind::Match => SyntaxKind::MATCH,
            TokenKind::Cmp => SyntaxKind::CMP,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::LtEq => SyntaxKind::LTEQ,
            TokenKind::GtEq => SyntaxKind::GTEQ,
            TokenKind::Shl => SyntaxKind::SHL,
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Minus => SyntaxKind::MINUS,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Pow => SyntaxKind::POW,
            TokenKind::Slash => SyntaxKind::SLASH,
            TokenKind::Percent => SyntaxKind::PERCENT,
            TokenKind::Bang => SyntaxKind::BANG,
            TokenKind::Amp2 => SyntaxKind::AMP2,
            TokenKind::Pipe2 => SyntaxKind::PIPE2,
            TokenKind::Amp => SyntaxKind::AMP,
            TokenKind::Pipe => SyntaxKind::PIPE,
            TokenKind::FatArrow => SyntaxKind::FAT_ARROW,
            TokenKind::OpAssign => SyntaxKind::OP_ASSIGN,
        }
    }
}

/// A lexed token with its kind, text slice and byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub range: Range<usize>,
}

/// Length of a `=begin` ... `=end` block starting at `rest`, up to but not
/// including the line ending after `=end`.
///
/// Both markers must start a line and be followed by whitespace or the end
/// of the line. An unterminated block is not recognised and lexes as code.
fn embedded_doc_len(rest: &str) -> Option<usize> {
    fn marker_at(line: &str, marker: &str) -> bool {
        line.strip_prefix(marker)
            .is_some_and(|after| after.is_empty() || after.starts_with([' ', '\t', '\r', '\n']))
    }

    if !marker_at(rest, "=begin") {
        return None;
    }

    let mut line_start = rest.find('\n')? + 1;
    loop {
        let line = &rest[line_start..];
        let line_len = line.find('\n').unwrap_or(line.len());
        if marker_at(line, "=end") {
            let content = line[..line_len].strip_suffix('\r').unwrap_or(&line[..line_len]);
            return Some(line_start + content.len());
        }
        if line_len == line.len() {
            return None;
        }
        line_start += line_len + 1;
    }
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    loop {
        let start = lexer.span().end;
        if start == 0 || input[..start].ends_with('\n') {
            if let Some(len) = embedded_doc_len(&input[start..]) {
                let range = start..start + len;
                tokens.push(Token {
                    kind: SyntaxKind::COMMENT,
                    text: &input[range.clone()],
                    range,
                });
                lexer.bump(len);
                continue;
            }
        }

        let Some(result) = lexer.next() else {
            break;
        };
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            // The parser reports these; the lexer stays infallible
            Err(()) => SyntaxKind::ERROR_TOKEN,
        };
        tokens.push(Token {
            kind,
            text: lexer.slice(),
            range: lexer.span(),
        });
    }

    tokens
}
