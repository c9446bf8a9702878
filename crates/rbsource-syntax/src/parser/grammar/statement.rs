//! Statement lists and keyword constructs.
//!
//! In Ruby every construct is an expression, so the functions here return a
//! [`CompletedMarker`] and are dispatched from `expression::primary`.

use crate::parser::{CompletedMarker, Parser};
use crate::syntax_kind::SyntaxKind;

use super::expression;

/// Tokens that end a `def`/`begin`/`do` body section.
const BODY_END: &[SyntaxKind] = &[
    SyntaxKind::RESCUE_KW,
    SyntaxKind::ELSE_KW,
    SyntaxKind::ENSURE_KW,
    SyntaxKind::END_KW,
];

/// Parse statements until end of input or one of `terminators`.
///
/// Statements are separated by newlines or `;`. Tokens that cannot start a
/// statement are wrapped in ERROR nodes. A run of such tokens right after a
/// missing separator is reported once.
pub(super) fn statements(p: &mut Parser<'_, '_>, terminators: &[SyntaxKind]) {
    let mut reported = false;
    loop {
        while p.at(SyntaxKind::NEWLINE) || p.at(SyntaxKind::SEMI) {
            p.bump();
            reported = false;
        }
        if p.at_end() || p.at_any(terminators) {
            break;
        }

        let before = p.position();
        statement(p);
        if p.position() == before {
            if reported {
                let m = p.start();
                p.bump();
                m.complete(p, SyntaxKind::ERROR);
            } else {
                p.err_and_bump();
            }
            continue;
        }
        reported = false;

        if !p.at_end()
            && !p.at(SyntaxKind::NEWLINE)
            && !p.at(SyntaxKind::SEMI)
            && !p.at_any(terminators)
        {
            p.error_unexpected();
            reported = true;
        }
    }
}

/// An expression followed by any number of `if`/`unless`/`while`/`until`/
/// `rescue` modifiers.
fn statement(p: &mut Parser<'_, '_>) {
    let mut lhs = if p.at(SyntaxKind::STAR) {
        multiple_assignment(p, None)
    } else {
        let Some(lhs) = expression::expression(p) else {
            return;
        };
        if p.at(SyntaxKind::COMMA) && is_assignable(lhs.kind()) {
            multiple_assignment(p, Some(lhs))
        } else {
            lhs
        }
    };

    loop {
        let kind = p.current();
        if !matches!(
            kind,
            SyntaxKind::IF_KW
                | SyntaxKind::UNLESS_KW
                | SyntaxKind::WHILE_KW
                | SyntaxKind::UNTIL_KW
                | SyntaxKind::RESCUE_KW
        ) {
            break;
        }

        let m = lhs.precede(p);
        p.bump();
        if kind == SyntaxKind::RESCUE_KW {
            if expression::expression(p).is_none() {
                p.error_expected("expression");
            }
        } else {
            condition(p);
        }
        lhs = m.complete(p, SyntaxKind::MODIFIER);
    }
}

fn is_assignable(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::NAME_REF | SyntaxKind::INDEX | SyntaxKind::CALL | SyntaxKind::SCOPED_CONSTANT
    )
}

/// `a, b = 1, 2`, `first, *rest = list`
///
/// `first` is the already parsed leading target, if any.
fn multiple_assignment(p: &mut Parser<'_, '_>, first: Option<CompletedMarker>) -> CompletedMarker {
    let targets = match first {
        Some(first) => first.precede(p),
        None => {
            let m = p.start();
            assignment_target(p);
            m
        }
    };
    // A trailing comma before `=` is allowed: `a, = list`
    while p.eat(SyntaxKind::COMMA) && !p.at(SyntaxKind::EQ) {
        assignment_target(p);
    }
    let targets = targets.complete(p, SyntaxKind::MLHS);

    let m = targets.precede(p);
    p.expect(SyntaxKind::EQ, "`=`");
    p.skip_newlines();
    let values = p.start();
    expression::args(p, None);
    values.complete(p, SyntaxKind::ARG_LIST);
    m.complete(p, SyntaxKind::MULTI_ASSIGN)
}

/// One target, optionally splatted; `*` alone soaks up the rest.
fn assignment_target(p: &mut Parser<'_, '_>) {
    if p.at(SyntaxKind::STAR) {
        let m = p.start();
        p.bump();
        expression::assignment_target(p);
        m.complete(p, SyntaxKind::UNARY);
    } else if expression::assignment_target(p).is_none() {
        p.error_expected("assignment target");
    }
}

/// Parse a condition, warning about `if x = 1`.
fn condition(p: &mut Parser<'_, '_>) {
    let start = p.current_range().start;
    match expression::expression(p) {
        Some(node) if p.is_literal_assignment(node) => {
            let range = start..p.last_end();
            p.warning("found `= literal' in conditional, should be ==", range);
        }
        Some(_) => {}
        None => p.error_expected("condition"),
    }
}

/// A body that may carry `rescue`, `else` and `ensure` sections.
pub(super) fn body_statement(p: &mut Parser<'_, '_>) {
    statements(p, BODY_END);

    while p.at(SyntaxKind::RESCUE_KW) {
        rescue_clause(p);
    }

    if p.at(SyntaxKind::ELSE_KW) {
        let m = p.start();
        p.bump();
        statements(p, &[SyntaxKind::ENSURE_KW, SyntaxKind::END_KW]);
        m.complete(p, SyntaxKind::ELSE_CLAUSE);
    }

    if p.at(SyntaxKind::ENSURE_KW) {
        let m = p.start();
        p.bump();
        statements(p, &[SyntaxKind::END_KW]);
        m.complete(p, SyntaxKind::ENSURE_CLAUSE);
    }
}

fn rescue_clause(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();

    let has_classes = !p.at_end()
        && !p.at_any(&[
            SyntaxKind::NEWLINE,
            SyntaxKind::SEMI,
            SyntaxKind::THEN_KW,
            SyntaxKind::FAT_ARROW,
        ]);
    if has_classes {
        loop {
            if expression::expression(p).is_none() {
                p.error_expected("exception class");
                break;
            }
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
            p.skip_newlines();
        }
    }

    if p.eat(SyntaxKind::FAT_ARROW) && !p.eat(SyntaxKind::IDENT) && !p.eat(SyntaxKind::IVAR) {
        p.error_expected("variable name");
    }
    p.eat(SyntaxKind::THEN_KW);

    statements(p, BODY_END);
    m.complete(p, SyntaxKind::RESCUE_CLAUSE);
}

fn end(p: &mut Parser<'_, '_>) {
    p.expect(SyntaxKind::END_KW, "`end`");
}

/// `def [self.]name[(params)] body end`
pub(super) fn def(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump();

    if p.at(SyntaxKind::SELF_KW) && p.nth(1) == SyntaxKind::DOT {
        p.bump();
        p.bump();
    }
    method_name(p);

    if p.at(SyntaxKind::LPAREN) {
        param_list(p, true);
    } else if !p.at_end() && !p.at(SyntaxKind::NEWLINE) && !p.at(SyntaxKind::SEMI) {
        param_list(p, false);
    }

    body_statement(p);
    end(p);
    m.complete(p, SyntaxKind::DEF)
}

const OPERATOR_METHODS: &[SyntaxKind] = &[
    SyntaxKind::EQ2,
    SyntaxKind::EQ3,
    SyntaxKind::NEQ,
    SyntaxKind::MATCH,
    SyntaxKind::CMP,
    SyntaxKind::LT,
    SyntaxKind::GT,
    SyntaxKind::LTEQ,
    SyntaxKind::GTEQ,
    SyntaxKind::SHL,
    SyntaxKind::PLUS,
    SyntaxKind::MINUS,
    SyntaxKind::STAR,
    SyntaxKind::POW,
    SyntaxKind::SLASH,
    SyntaxKind::PERCENT,
    SyntaxKind::BANG,
];

fn method_name(p: &mut Parser<'_, '_>) {
    let kind = p.current();
    if matches!(kind, SyntaxKind::IDENT | SyntaxKind::CONSTANT) || kind.is_keyword() {
        p.bump();
        // Setter: `def name=(value)`
        if p.at_raw(SyntaxKind::EQ) {
            p.bump();
        }
    } else if p.at_any(OPERATOR_METHODS) {
        p.bump();
    } else if p.at(SyntaxKind::LBRACKET) && p.nth(1) == SyntaxKind::RBRACKET {
        p.bump();
        p.bump();
        if p.at_raw(SyntaxKind::EQ) {
            p.bump();
        }
    } else {
        p.error_expected("method name");
    }
}

/// Method parameters, with or without surrounding parentheses.
fn param_list(p: &mut Parser<'_, '_>, parenthesized: bool) {
    let m = p.start();

    if parenthesized {
        p.bump();
        p.skip_newlines();
    }

    if !(parenthesized && p.at(SyntaxKind::RPAREN)) {
        loop {
            param(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
            p.skip_newlines();
        }
    }

    if parenthesized {
        p.skip_newlines();
        p.expect(SyntaxKind::RPAREN, "`)`");
    }

    m.complete(p, SyntaxKind::PARAM_LIST);
}

/// `name`, `name = default`, `key:`, `key: default`, `*rest`, `**opts`, `&blk`
pub(super) fn param(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let prefixed = p.at_any(&[SyntaxKind::STAR, SyntaxKind::POW, SyntaxKind::AMP]);
    if prefixed {
        p.bump();
    }

    if p.eat(SyntaxKind::IDENT) {
        if p.eat(SyntaxKind::EQ) {
            if expression::expression(p).is_none() {
                p.error_expected("default value");
            }
        } else if p.eat(SyntaxKind::COLON)
            && !p.at_any(&[SyntaxKind::COMMA, SyntaxKind::RPAREN, SyntaxKind::PIPE])
            && expression::expression(p).is_none()
        {
            p.error_expected("default value");
        }
    } else if !prefixed {
        p.error_expected("parameter name");
    }

    m.complete(p, SyntaxKind::PARAM);
}

/// `class Name [< Superclass] body end` or `class << target body end`
pub(super) fn class(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump();

    if p.eat(SyntaxKind::SHL) {
        if expression::expression(p).is_none() {
            p.error_expected("expression");
        }
    } else {
        expression::constant_path(p);
        if p.eat(SyntaxKind::LT) && expression::expression(p).is_none() {
            p.error_expected("superclass");
        }
    }

    body_statement(p);
    end(p);
    m.complete(p, SyntaxKind::CLASS)
}

/// `module Name body end`
pub(super) fn module(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    expression::constant_path(p);
    body_statement(p);
    end(p);
    m.complete(p, SyntaxKind::MODULE)
}

/// `if cond [then] body {elsif cond [then] body} [else body] end`
pub(super) fn if_(p: &mut Parser<'_, '_>) -> CompletedMarker {
    const BRANCH_END: &[SyntaxKind] = &[
        SyntaxKind::ELSIF_KW,
        SyntaxKind::ELSE_KW,
        SyntaxKind::END_KW,
    ];

    let m = p.start();
    p.bump();
    condition(p);
    p.eat(SyntaxKind::THEN_KW);
    statements(p, BRANCH_END);

    while p.at(SyntaxKind::ELSIF_KW) {
        let clause = p.start();
        p.bump();
        condition(p);
        p.eat(SyntaxKind::THEN_KW);
        statements(p, BRANCH_END);
        clause.complete(p, SyntaxKind::ELSIF_CLAUSE);
    }

    else_clause(p);
    end(p);
    m.complete(p, SyntaxKind::IF)
}

/// `unless cond [then] body [else body] end`
pub(super) fn unless(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    condition(p);
    p.eat(SyntaxKind::THEN_KW);
    statements(p, &[SyntaxKind::ELSE_KW, SyntaxKind::END_KW]);
    else_clause(p);
    end(p);
    m.complete(p, SyntaxKind::UNLESS)
}

fn else_clause(p: &mut Parser<'_, '_>) {
    if p.at(SyntaxKind::ELSE_KW) {
        let m = p.start();
        p.bump();
        statements(p, &[SyntaxKind::END_KW]);
        m.complete(p, SyntaxKind::ELSE_CLAUSE);
    }
}

/// `while cond [do] body end` and `until cond [do] body end`
pub(super) fn loop_(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let kind = if p.at(SyntaxKind::WHILE_KW) {
        SyntaxKind::WHILE
    } else {
        SyntaxKind::UNTIL
    };

    let m = p.start();
    p.bump();
    let saved = p.set_no_do_block(true);
    condition(p);
    p.set_no_do_block(saved);
    p.eat(SyntaxKind::DO_KW);
    statements(p, &[SyntaxKind::END_KW]);
    end(p);
    m.complete(p, kind)
}

/// `case [subject] {when values [then] body} [else body] end`
pub(super) fn case(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if !p.at(SyntaxKind::NEWLINE) && !p.at(SyntaxKind::SEMI) && expression::expression(p).is_none()
    {
        p.error_expected("expression");
    }
    while p.at(SyntaxKind::NEWLINE) || p.at(SyntaxKind::SEMI) {
        p.bump();
    }

    if !p.at(SyntaxKind::WHEN_KW) {
        p.error_expected("`when`");
    }

    while p.at(SyntaxKind::WHEN_KW) {
        let clause = p.start();
        p.bump();
        expression::args(p, None);
        p.eat(SyntaxKind::THEN_KW);
        statements(
            p,
            &[SyntaxKind::WHEN_KW, SyntaxKind::ELSE_KW, SyntaxKind::END_KW],
        );
        clause.complete(p, SyntaxKind::WHEN_CLAUSE);
    }

    else_clause(p);
    end(p);
    m.complete(p, SyntaxKind::CASE)
}

/// `begin body end`
pub(super) fn begin(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    body_statement(p);
    end(p);
    m.complete(p, SyntaxKind::BEGIN)
}

/// `return [values]`
pub(super) fn return_(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if expression::starts_argument(p) || p.at_any(&[SyntaxKind::MINUS, SyntaxKind::LBRACKET]) {
        let args = p.start();
        expression::args(p, None);
        args.complete(p, SyntaxKind::ARG_LIST);
    }
    m.complete(p, SyntaxKind::RETURN)
}

/// `yield`, `yield(args)` or `yield args`
pub(super) fn yield_(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    expression::call_arguments(p);
    m.complete(p, SyntaxKind::YIELD)
}
