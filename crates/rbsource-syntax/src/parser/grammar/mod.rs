//! # Grammar Rules
//!
//! Each function takes a `&mut Parser` and uses its methods to inspect
//! tokens, consume them and build tree structure with markers.
//!
//! - [`statement`] - statement lists, bodies and keyword constructs
//!   (`def`, `class`, `if`, `while`, `begin`, ...)
//! - [`expression`] - operators, calls, blocks and literals
//!
//! ## Error Recovery
//!
//! Rules are lenient. An unexpected token mid-stream is reported and wrapped
//! in an ERROR node, and parsing continues; the input still round-trips. Only
//! running out of input inside an open construct (or a fatal lexical problem)
//! stops the parse, and then no tree is produced at all.

mod expression;
mod statement;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse the whole program into a ROOT node.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();
    statement::statements(p, &[]);
    p.bump_trivia();
    m.complete(p, SyntaxKind::ROOT);
}

#[cfg(test)]
mod tests {
    use crate::diagnostic::Level;
    use crate::lexer::lex;
    use crate::parser::{Parse, Parser};
    use crate::syntax_kind::{SyntaxKind, SyntaxNode};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn run(source: &str) -> Parse {
        let tokens = lex(source);
        Parser::new(&tokens, false).parse()
    }

    fn tree(source: &str) -> SyntaxNode {
        let parse = run(source);
        assert_eq!(parse.diagnostics, vec![], "unexpected diagnostics for {source:?}");
        parse.root.expect("tree")
    }

    fn kinds(node: &SyntaxNode) -> Vec<SyntaxKind> {
        node.children().map(|n| n.kind()).collect()
    }

    fn first(node: &SyntaxNode) -> SyntaxNode {
        node.children().next().expect("child")
    }

    #[rstest]
    #[case("def foo\n  1\nend\n", SyntaxKind::DEF)]
    #[case("def self.build(a, *rest, key: 1, &blk); end", SyntaxKind::DEF)]
    #[case("def ==(other)\n  true\nend", SyntaxKind::DEF)]
    #[case("def name=(value)\n  @name = value\nend", SyntaxKind::DEF)]
    #[case("class Foo < Bar::Baz\nend", SyntaxKind::CLASS)]
    #[case("class << self\n  def x; end\nend", SyntaxKind::CLASS)]
    #[case("module A::B\nend", SyntaxKind::MODULE)]
    #[case("if a\n  b\nelsif c\n  d\nelse\n  e\nend", SyntaxKind::IF)]
    #[case("unless a then b else c end", SyntaxKind::UNLESS)]
    #[case("while i < 10 do\n  i += 1\nend", SyntaxKind::WHILE)]
    #[case("until done\n  step\nend", SyntaxKind::UNTIL)]
    #[case("case x\nwhen 1, 2 then :low\nelse :high\nend", SyntaxKind::CASE)]
    #[case("begin\n  risky\nrescue Foo, Bar => e\n  log e\nelse\n  ok\nensure\n  close\nend", SyntaxKind::BEGIN)]
    #[case("return 1, 2", SyntaxKind::RETURN)]
    #[case("yield(x)", SyntaxKind::YIELD)]
    #[case("x = 1", SyntaxKind::ASSIGN)]
    #[case("@count ||= 0", SyntaxKind::ASSIGN)]
    #[case("a + b * c", SyntaxKind::BINARY)]
    #[case("ok ? 1 : 2", SyntaxKind::TERNARY)]
    #[case("!done", SyntaxKind::UNARY)]
    #[case("[1, 2,\n 3,\n]", SyntaxKind::ARRAY)]
    #[case("{ a: 1, 'b' => 2 }", SyntaxKind::HASH)]
    #[case("(1; 2)", SyntaxKind::PAREN)]
    #[case("Foo::Bar", SyntaxKind::SCOPED_CONSTANT)]
    #[case("puts 'hi'", SyntaxKind::CALL)]
    #[case("list.each do |item|\n  puts item\nend", SyntaxKind::CALL)]
    #[case("list.map { |x| x * 2 }", SyntaxKind::CALL)]
    #[case("foo(a, key: 1, &blk)", SyntaxKind::CALL)]
    #[case("items[0]", SyntaxKind::INDEX)]
    #[case("save rescue nil", SyntaxKind::MODIFIER)]
    #[case("x = 1 if y", SyntaxKind::MODIFIER)]
    #[case("x = 1e3", SyntaxKind::ASSIGN)]
    #[case("x = 2.5e-3", SyntaxKind::ASSIGN)]
    #[case("a, b = 1, 2", SyntaxKind::MULTI_ASSIGN)]
    #[case("first, *rest = list", SyntaxKind::MULTI_ASSIGN)]
    #[case("*init, last = list", SyntaxKind::MULTI_ASSIGN)]
    #[case("@a, self.b, c[0] = 1, 2, 3", SyntaxKind::MULTI_ASSIGN)]
    #[case("=begin\ncomment\n=end\nx = 1\n", SyntaxKind::ASSIGN)]
    #[case("x = :\"sym\"", SyntaxKind::ASSIGN)]
    #[case("x = 'it''s'", SyntaxKind::ASSIGN)]
    fn parses_valid_constructs(#[case] source: &str, #[case] expected: SyntaxKind) {
        let root = tree(source);
        assert_eq!(root.text().to_string(), source);
        assert_eq!(first(&root).kind(), expected);
    }

    #[test]
    fn binary_precedence() {
        let root = tree("a + b * c");
        let binary = first(&root);
        assert_eq!(kinds(&binary), vec![SyntaxKind::NAME_REF, SyntaxKind::BINARY]);
    }

    #[test]
    fn assignment_is_right_associative() {
        let root = tree("a = b = 1");
        let outer = first(&root);
        assert_eq!(kinds(&outer), vec![SyntaxKind::NAME_REF, SyntaxKind::ASSIGN]);
    }

    #[test]
    fn call_without_parens_takes_arguments() {
        let root = tree("attr_reader :name, :age\n");
        let call = first(&root);
        assert_eq!(call.kind(), SyntaxKind::CALL);
        let args = first(&call);
        assert_eq!(args.kind(), SyntaxKind::ARG_LIST);
        assert_eq!(kinds(&args), vec![SyntaxKind::LITERAL, SyntaxKind::LITERAL]);
    }

    #[test]
    fn do_block_binds_to_command_not_argument() {
        let root = tree("foo bar do\nend");
        let call = first(&root);
        assert_eq!(kinds(&call), vec![SyntaxKind::ARG_LIST, SyntaxKind::BLOCK]);
    }

    #[test]
    fn while_do_is_not_a_block() {
        let root = tree("while running do\n  tick\nend");
        let node = first(&root);
        assert_eq!(node.kind(), SyntaxKind::WHILE);
        assert_eq!(first(&node).kind(), SyntaxKind::NAME_REF);
    }

    #[test]
    fn multiple_assignment_targets_and_values() {
        let root = tree("a, *b = 1, 2\n");
        let node = first(&root);
        assert_eq!(kinds(&node), vec![SyntaxKind::MLHS, SyntaxKind::ARG_LIST]);
        assert_eq!(
            kinds(&first(&node)),
            vec![SyntaxKind::NAME_REF, SyntaxKind::UNARY]
        );
    }

    #[test]
    fn adjacent_strings_are_one_literal() {
        let root = tree("puts 'a' \"b\"\n");
        let args = first(&first(&root));
        assert_eq!(kinds(&args), vec![SyntaxKind::LITERAL]);
    }

    #[test]
    fn moderate_nesting_parses() {
        let source = format!("x = {}1{}\n", "(".repeat(100), ")".repeat(100));
        let root = tree(&source);
        assert_eq!(root.text().to_string(), source);
    }

    #[test]
    fn deep_nesting_aborts_with_fatal_diagnostic() {
        let parse = run(&format!("{}1{}", "[".repeat(10_000), "]".repeat(10_000)));
        assert!(parse.root.is_none());
        assert_eq!(parse.diagnostics.len(), 1);
        assert_eq!(parse.diagnostics[0].level, Level::Fatal);
        assert_eq!(parse.diagnostics[0].message, "nesting too deep");
    }

    #[test]
    fn statements_on_separate_lines() {
        let root = tree("a = 1\nb = 2; c = 3\n");
        assert_eq!(
            kinds(&root),
            vec![SyntaxKind::ASSIGN, SyntaxKind::ASSIGN, SyntaxKind::ASSIGN]
        );
    }

    #[test]
    fn operator_at_end_of_line_continues_expression() {
        let root = tree("total = a +\n  b\n");
        assert_eq!(kinds(&root), vec![SyntaxKind::ASSIGN]);
    }

    #[test]
    fn unterminated_def_aborts() {
        let parse = run("def foo(\n");
        assert!(parse.root.is_none());
        let last = parse.diagnostics.last().unwrap();
        assert_eq!(last.level, Level::Error);
        assert_eq!(last.message, "unexpected end-of-input; expected parameter name");
    }

    #[test]
    fn missing_end_aborts() {
        let parse = run("class Foo\n  def bar\n  end\n");
        assert!(parse.root.is_none());
        assert_eq!(parse.diagnostics.len(), 1);
        assert_eq!(
            parse.diagnostics[0].message,
            "unexpected end-of-input; expected `end`"
        );
    }

    #[test]
    fn stray_token_is_recovered() {
        let source = "x = 1\n)\ny = 2\n";
        let parse = run(source);
        let root = parse.root.expect("recovered tree");
        assert_eq!(root.text().to_string(), source);
        assert_eq!(
            kinds(&root),
            vec![SyntaxKind::ASSIGN, SyntaxKind::ERROR, SyntaxKind::ASSIGN]
        );
        assert_eq!(parse.diagnostics.len(), 1);
        assert_eq!(parse.diagnostics[0].level, Level::Error);
        assert_eq!(parse.diagnostics[0].message, "unexpected `)`");
        assert_eq!(parse.diagnostics[0].range, 6..7);
    }

    #[test]
    fn stray_token_aborts_in_fatal_mode() {
        let tokens = lex("x = 1\n)\ny = 2\n");
        let parse = Parser::new(&tokens, true).parse();
        assert!(parse.root.is_none());
        assert_eq!(parse.diagnostics.len(), 1);
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let parse = run("x = \"abc\n");
        assert!(parse.root.is_none());
        assert_eq!(parse.diagnostics.len(), 1);
        assert_eq!(parse.diagnostics[0].level, Level::Fatal);
        assert_eq!(
            parse.diagnostics[0].message,
            "unterminated string meets end of file"
        );
    }

    #[test]
    fn literal_assignment_in_condition_warns() {
        let parse = run("if x = 1\n  y\nend\n");
        assert!(parse.root.is_some());
        assert_eq!(parse.diagnostics.len(), 1);
        let warning = &parse.diagnostics[0];
        assert_eq!(warning.level, Level::Warning);
        assert_eq!(
            warning.message,
            "found `= literal' in conditional, should be =="
        );
        assert_eq!(warning.range, 3..8);
    }

    #[test]
    fn non_literal_assignment_in_condition_is_quiet() {
        let parse = run("while line = gets\n  puts line\nend\n");
        assert!(parse.root.is_some());
        assert!(parse.diagnostics.is_empty());
    }

    #[test]
    fn missing_separator_is_reported() {
        let parse = run("a = 1 b\n");
        assert!(parse.root.is_some());
        assert_eq!(parse.diagnostics.len(), 1);
        assert_eq!(parse.diagnostics[0].message, "unexpected `b`");
    }
}
