//! Expressions: operators, calls, blocks and literals.
//!
//! Binary operators use precedence climbing. Each operator has a left and
//! right binding power; equal powers on both sides never occur, so
//! associativity falls out of which side is higher.

use crate::parser::{CompletedMarker, Parser};
use crate::syntax_kind::SyntaxKind;

use super::statement;

/// Tokens that may start the first argument of a parenthesis-free call.
const ARGUMENT_START: &[SyntaxKind] = &[
    SyntaxKind::IDENT,
    SyntaxKind::CONSTANT,
    SyntaxKind::IVAR,
    SyntaxKind::CVAR,
    SyntaxKind::GVAR,
    SyntaxKind::INTEGER,
    SyntaxKind::FLOAT,
    SyntaxKind::STRING,
    SyntaxKind::UNTERMINATED_STRING,
    SyntaxKind::SYMBOL,
    SyntaxKind::NIL_KW,
    SyntaxKind::TRUE_KW,
    SyntaxKind::FALSE_KW,
    SyntaxKind::SELF_KW,
    SyntaxKind::BANG,
    SyntaxKind::NOT_KW,
    SyntaxKind::COLON2,
    SyntaxKind::LPAREN,
];

fn infix_binding_power(kind: SyntaxKind) -> Option<(u8, u8)> {
    use SyntaxKind::*;

    let bp = match kind {
        AND_KW | OR_KW => (1, 2),
        EQ | OP_ASSIGN => (4, 3),
        QUESTION => (6, 5),
        DOT2 | DOT3 => (7, 8),
        PIPE2 => (9, 10),
        AMP2 => (11, 12),
        EQ2 | EQ3 | NEQ | MATCH | CMP => (13, 14),
        LT | GT | LTEQ | GTEQ => (15, 16),
        PIPE | AMP => (17, 18),
        SHL => (19, 20),
        PLUS | MINUS => (21, 22),
        STAR | SLASH | PERCENT => (23, 24),
        POW => (26, 25),
        _ => return None,
    };
    Some(bp)
}

const UNARY_BP: u8 = 27;
const NOT_BP: u8 = 5;
const ASSIGN_TARGET_BP: u8 = 5;

/// Parse one expression; `None` if the current token cannot start one.
///
/// Nothing is consumed or reported when `None` is returned, so callers
/// decide whether a missing expression is an error.
pub(super) fn expression(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    expression_bp(p, 0)
}

/// Target of a multiple assignment: binds tighter than `=`, so the
/// targets in `a, b = 1, 2` stop before the `=`.
pub(super) fn assignment_target(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    expression_bp(p, ASSIGN_TARGET_BP)
}

fn expression_bp(p: &mut Parser<'_, '_>, min_bp: u8) -> Option<CompletedMarker> {
    if !p.enter() {
        return None;
    }
    let node = binary(p, min_bp);
    p.leave();
    node
}

fn binary(p: &mut Parser<'_, '_>, min_bp: u8) -> Option<CompletedMarker> {
    let mut lhs = prefix(p)?;

    loop {
        let op = p.current();
        let Some((l_bp, r_bp)) = infix_binding_power(op) else {
            break;
        };
        if l_bp < min_bp {
            break;
        }

        let m = lhs.precede(p);
        p.bump();
        p.skip_newlines();

        if op == SyntaxKind::QUESTION {
            if expression_bp(p, r_bp).is_none() {
                p.error_expected("expression");
            }
            p.skip_newlines();
            p.expect(SyntaxKind::COLON, "`:`");
            p.skip_newlines();
            if expression_bp(p, r_bp).is_none() {
                p.error_expected("expression");
            }
            lhs = m.complete(p, SyntaxKind::TERNARY);
            continue;
        }

        let rhs = expression_bp(p, r_bp);
        if rhs.is_none() {
            p.error_expected("expression");
        }

        if matches!(op, SyntaxKind::EQ | SyntaxKind::OP_ASSIGN) {
            lhs = m.complete(p, SyntaxKind::ASSIGN);
            if op == SyntaxKind::EQ && rhs.is_some_and(|rhs| rhs.kind() == SyntaxKind::LITERAL) {
                p.mark_literal_assignment(lhs);
            }
        } else {
            lhs = m.complete(p, SyntaxKind::BINARY);
        }
    }

    Some(lhs)
}

fn prefix(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    let bp = match p.current() {
        SyntaxKind::BANG | SyntaxKind::MINUS => UNARY_BP,
        SyntaxKind::NOT_KW => NOT_BP,
        _ => {
            let lhs = primary(p)?;
            return Some(postfix(p, lhs));
        }
    };

    let m = p.start();
    p.bump();
    if expression_bp(p, bp).is_none() {
        p.error_expected("expression");
    }
    Some(m.complete(p, SyntaxKind::UNARY))
}

fn primary(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    let kind = p.current();
    let node = match kind {
        SyntaxKind::STRING | SyntaxKind::UNTERMINATED_STRING => string(p),
        _ if kind.is_literal() => {
            let m = p.start();
            p.bump();
            m.complete(p, SyntaxKind::LITERAL)
        }
        SyntaxKind::IVAR | SyntaxKind::CVAR | SyntaxKind::GVAR => {
            let m = p.start();
            p.bump();
            m.complete(p, SyntaxKind::NAME_REF)
        }
        SyntaxKind::CONSTANT => {
            let m = p.start();
            p.bump();
            if p.at_raw(SyntaxKind::LPAREN) {
                call_arguments(p);
                m.complete(p, SyntaxKind::CALL)
            } else {
                m.complete(p, SyntaxKind::NAME_REF)
            }
        }
        SyntaxKind::COLON2 => constant_path(p)?,
        SyntaxKind::IDENT => identifier(p),
        SyntaxKind::LPAREN => {
            let m = p.start();
            p.bump();
            statement::statements(p, &[SyntaxKind::RPAREN]);
            p.expect(SyntaxKind::RPAREN, "`)`");
            m.complete(p, SyntaxKind::PAREN)
        }
        SyntaxKind::LBRACKET => delimited(p, SyntaxKind::RBRACKET, "`]`", SyntaxKind::ARRAY),
        SyntaxKind::LBRACE => delimited(p, SyntaxKind::RBRACE, "`}`", SyntaxKind::HASH),
        SyntaxKind::DEF_KW => statement::def(p),
        SyntaxKind::CLASS_KW => statement::class(p),
        SyntaxKind::MODULE_KW => statement::module(p),
        SyntaxKind::IF_KW => statement::if_(p),
        SyntaxKind::UNLESS_KW => statement::unless(p),
        SyntaxKind::WHILE_KW | SyntaxKind::UNTIL_KW => statement::loop_(p),
        SyntaxKind::CASE_KW => statement::case(p),
        SyntaxKind::BEGIN_KW => statement::begin(p),
        SyntaxKind::RETURN_KW => statement::return_(p),
        SyntaxKind::YIELD_KW => statement::yield_(p),
        _ => return None,
    };
    Some(node)
}

/// One string literal, or several adjacent ones: `'it' 's'` and `'it''s'`
/// are a single value.
fn string(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    loop {
        match p.current() {
            SyntaxKind::STRING => p.bump(),
            SyntaxKind::UNTERMINATED_STRING => {
                let range = p.current_range();
                p.fatal("unterminated string meets end of file", range);
                p.bump();
            }
            _ => break,
        }
    }
    m.complete(p, SyntaxKind::LITERAL)
}

/// A bare identifier is a local variable unless it is followed by
/// arguments or a block, which makes it a method call.
fn identifier(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump();

    let is_call = p.at_raw(SyntaxKind::LPAREN) || starts_command_argument(p) || block_follows(p);
    if is_call {
        call_arguments(p);
        m.complete(p, SyntaxKind::CALL)
    } else {
        m.complete(p, SyntaxKind::NAME_REF)
    }
}

/// `.name`, `::Name` and `[index]` suffixes.
fn postfix(p: &mut Parser<'_, '_>, mut lhs: CompletedMarker) -> CompletedMarker {
    loop {
        if p.at(SyntaxKind::DOT) {
            let m = lhs.precede(p);
            p.bump();
            p.skip_newlines();
            let name = p.current();
            if matches!(name, SyntaxKind::IDENT | SyntaxKind::CONSTANT) || name.is_keyword() {
                p.bump();
            } else {
                p.error_expected("method name");
            }
            call_arguments(p);
            lhs = m.complete(p, SyntaxKind::CALL);
        } else if p.at(SyntaxKind::COLON2) {
            let m = lhs.precede(p);
            p.bump();
            if p.eat(SyntaxKind::CONSTANT) {
                lhs = m.complete(p, SyntaxKind::SCOPED_CONSTANT);
            } else if p.eat(SyntaxKind::IDENT) {
                call_arguments(p);
                lhs = m.complete(p, SyntaxKind::CALL);
            } else {
                p.error_expected("constant name");
                lhs = m.complete(p, SyntaxKind::SCOPED_CONSTANT);
            }
        } else if p.at_raw(SyntaxKind::LBRACKET) {
            let m = lhs.precede(p);
            p.bump();
            args(p, Some(SyntaxKind::RBRACKET));
            p.skip_newlines();
            p.expect(SyntaxKind::RBRACKET, "`]`");
            lhs = m.complete(p, SyntaxKind::INDEX);
        } else {
            return lhs;
        }
    }
}

/// `[ ... ]` or `{ ... }` holding a comma separated list.
fn delimited(
    p: &mut Parser<'_, '_>,
    closer: SyntaxKind,
    what: &str,
    kind: SyntaxKind,
) -> CompletedMarker {
    let m = p.start();
    p.bump();
    args(p, Some(closer));
    p.skip_newlines();
    p.expect(closer, what);
    m.complete(p, kind)
}

/// `Name`, `::Name` or `A::B::C`, without treating `<` as an operator.
pub(super) fn constant_path(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    if !p.at(SyntaxKind::CONSTANT) && !p.at(SyntaxKind::COLON2) {
        p.error_expected("constant name");
        return None;
    }

    let m = p.start();
    p.eat(SyntaxKind::COLON2);
    p.expect(SyntaxKind::CONSTANT, "constant name");
    let mut path = m.complete(p, SyntaxKind::NAME_REF);

    while p.at(SyntaxKind::COLON2) {
        let m = path.precede(p);
        p.bump();
        p.expect(SyntaxKind::CONSTANT, "constant name");
        path = m.complete(p, SyntaxKind::SCOPED_CONSTANT);
    }
    Some(path)
}

/// Whether the current token can begin an argument.
pub(super) fn starts_argument(p: &Parser<'_, '_>) -> bool {
    p.at_any(ARGUMENT_START)
}

/// `foo bar` passes `bar`, but `foo [1]` only when there is whitespace
/// before the bracket; `foo[1]` indexes.
fn starts_command_argument(p: &Parser<'_, '_>) -> bool {
    starts_argument(p) || (p.at(SyntaxKind::LBRACKET) && !p.at_raw(SyntaxKind::LBRACKET))
}

fn block_follows(p: &Parser<'_, '_>) -> bool {
    p.at(SyntaxKind::LBRACE) || (p.at(SyntaxKind::DO_KW) && !p.no_do_block())
}

/// Arguments after a method name, then an optional block.
pub(super) fn call_arguments(p: &mut Parser<'_, '_>) {
    if p.at_raw(SyntaxKind::LPAREN) {
        let m = p.start();
        p.bump();
        args(p, Some(SyntaxKind::RPAREN));
        p.skip_newlines();
        p.expect(SyntaxKind::RPAREN, "`)`");
        m.complete(p, SyntaxKind::ARG_LIST);
    } else if starts_command_argument(p) {
        // `do` after command arguments belongs to the command itself
        let m = p.start();
        let saved = p.set_no_do_block(true);
        args(p, None);
        p.set_no_do_block(saved);
        m.complete(p, SyntaxKind::ARG_LIST);
    }

    if block_follows(p) {
        block(p);
    }
}

/// Comma separated arguments. With a `closer`, newlines are allowed
/// anywhere and a trailing comma is accepted.
pub(super) fn args(p: &mut Parser<'_, '_>, closer: Option<SyntaxKind>) {
    loop {
        if let Some(closer) = closer {
            p.skip_newlines();
            if p.at(closer) {
                break;
            }
        }
        if !arg(p) {
            p.error_expected("argument");
            break;
        }
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
        p.skip_newlines();
    }
}

fn arg(p: &mut Parser<'_, '_>) -> bool {
    if p.at_any(&[SyntaxKind::IDENT, SyntaxKind::CONSTANT]) && p.nth(1) == SyntaxKind::COLON {
        let m = p.start();
        p.bump();
        p.bump();
        p.skip_newlines();
        if expression(p).is_none() {
            p.error_expected("expression");
        }
        m.complete(p, SyntaxKind::PAIR);
        return true;
    }

    if p.at_any(&[SyntaxKind::STAR, SyntaxKind::POW, SyntaxKind::AMP]) {
        let m = p.start();
        p.bump();
        // Bare `*` and `&` forward the caller's arguments
        expression(p);
        m.complete(p, SyntaxKind::UNARY);
        return true;
    }

    let Some(value) = expression(p) else {
        return false;
    };
    if p.at(SyntaxKind::FAT_ARROW) {
        let m = value.precede(p);
        p.bump();
        p.skip_newlines();
        if expression(p).is_none() {
            p.error_expected("expression");
        }
        m.complete(p, SyntaxKind::PAIR);
    }
    true
}

/// `{ |params| body }` or `do |params| body end`
fn block(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let saved = p.set_no_do_block(false);

    if p.at(SyntaxKind::LBRACE) {
        p.bump();
        block_params(p);
        statement::statements(p, &[SyntaxKind::RBRACE]);
        p.expect(SyntaxKind::RBRACE, "`}`");
    } else {
        p.bump();
        block_params(p);
        statement::body_statement(p);
        p.expect(SyntaxKind::END_KW, "`end`");
    }

    p.set_no_do_block(saved);
    m.complete(p, SyntaxKind::BLOCK);
}

fn block_params(p: &mut Parser<'_, '_>) {
    if p.at(SyntaxKind::PIPE2) {
        let m = p.start();
        p.bump();
        m.complete(p, SyntaxKind::BLOCK_PARAMS);
        return;
    }
    if !p.at(SyntaxKind::PIPE) {
        return;
    }

    let m = p.start();
    p.bump();
    if !p.at(SyntaxKind::PIPE) {
        loop {
            statement::param(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
    }
    p.expect(SyntaxKind::PIPE, "`|`");
    m.complete(p, SyntaxKind::BLOCK_PARAMS);
}
