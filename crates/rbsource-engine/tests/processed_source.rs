use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use rbsource_engine::{Level, ProcessedSource, SyntaxKind};

/// Every line view must agree with the source it was built from.
fn assert_line_invariants(source: &ProcessedSource, text: &str) {
    assert_eq!(source.raw_lines().concat(), text);
    assert_eq!(source.raw_lines().len(), source.lines().len());
    for (raw, trimmed) in source.raw_lines().iter().zip(source.lines()) {
        assert!(raw.starts_with(trimmed.as_str()));
        let terminator = &raw[trimmed.len()..];
        assert!(
            matches!(terminator, "" | "\n" | "\r\n" | "\r"),
            "unexpected terminator {terminator:?}"
        );
    }
}

fn describe_tokens(source: &ProcessedSource) -> String {
    source
        .tokens()
        .unwrap_or_default()
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn simple_method_definition() {
    let text = "def foo\n  1\nend\n";
    let source = ProcessedSource::from_text(text, None);

    assert!(source.is_valid_syntax());
    assert_eq!(source.lines(), ["def foo", "  1", "end"]);
    assert!(source.diagnostics().is_empty());
    assert_eq!(source.comments().map(<[_]>::len), Some(0));
    assert_line_invariants(&source, text);
}

#[test]
fn unterminated_construct() {
    let text = "def foo(\n";
    let source = ProcessedSource::from_text(text, None);

    assert!(!source.is_valid_syntax());
    assert!(source.ast().is_none());
    assert!(source.comments().is_none());
    assert!(source.tokens().is_none());
    assert!(
        source
            .diagnostics()
            .iter()
            .any(|d| d.level == Level::Error || d.level == Level::Fatal)
    );
    assert_line_invariants(&source, text);
}

#[test]
fn invalid_byte_sequence() {
    let source = ProcessedSource::from_text(b"puts '\xff\xfe'\n".to_vec(), None);

    assert!(!source.is_valid_syntax());
    assert!(source.parser_error().is_some());
    assert!(source.diagnostics().is_empty());
    assert!(source.tokens().is_none());
}

#[test]
fn assignment_with_comment() {
    let text = "x = 1 # comment\n";
    let source = ProcessedSource::from_text(text, None);

    assert!(source.is_valid_syntax());
    let comments = source.comments().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "# comment");

    let significant: Vec<_> = source
        .tokens()
        .unwrap()
        .iter()
        .filter(|t| !t.is_newline())
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(significant, vec!["x", "=", "1"]);

    assert_snapshot!(describe_tokens(&source), @r#"
    1:0 IDENT "x"
    1:2 EQ "="
    1:4 INTEGER "1"
    1:15 NEWLINE "\n"
    "#);
}

#[test]
fn tokens_carry_lines_and_columns() {
    let text = "class Greeter\n  def hi(name)\n    puts name\n  end\nend\n";
    let source = ProcessedSource::from_text(text, None);

    assert!(source.is_valid_syntax());
    let puts = source
        .tokens()
        .unwrap()
        .iter()
        .find(|t| t.text == "puts")
        .unwrap();
    assert_eq!(puts.kind, SyntaxKind::IDENT);
    assert_eq!((puts.line(), puts.column()), (3, 4));
}

#[test]
fn crlf_and_missing_final_newline() {
    let text = "a = 1\r\nb = 2";
    let source = ProcessedSource::from_text(text, None);

    assert!(source.is_valid_syntax());
    assert_eq!(source.lines(), ["a = 1", "b = 2"]);
    assert_eq!(source.raw_lines(), ["a = 1\r\n", "b = 2"]);
    assert_line_invariants(&source, text);
}

#[test]
fn empty_source() {
    let source = ProcessedSource::from_text("", None);

    assert!(source.is_valid_syntax());
    assert!(source.lines().is_empty());
    assert_eq!(source.get(0), None);
    assert_eq!(source.tokens().map(<[_]>::len), Some(0));
}

#[test]
fn diagnostics_arrive_in_discovery_order() {
    let text = "if a = 1\n  x\nend\nb = 2 c\n";
    let source = ProcessedSource::from_text(text, None);

    let levels: Vec<_> = source.diagnostics().iter().map(|d| d.level).collect();
    assert_eq!(levels, vec![Level::Warning, Level::Error]);
    assert_eq!(source.diagnostics()[1].message, "unexpected `c`");
    assert!(!source.is_valid_syntax());
    assert!(source.ast().is_some());
}

#[test]
fn suppression_ranges() {
    let text = "\
# rubocop:disable Metrics/MethodLength
def long
  1
end
# rubocop:enable Metrics/MethodLength
x = 1 # rubocop:disable Style/Foo
";
    let source = ProcessedSource::from_text(text, None);

    let ranges = source.disabled_line_ranges();
    assert_eq!(ranges.get("Metrics/MethodLength"), Some(&vec![1..=5]));
    assert_eq!(ranges.get("Style/Foo"), Some(&vec![6..=6]));
}

#[test]
fn deeply_nested_source_is_invalid_not_a_crash() {
    let text = format!("x = {}1{}\n", "(".repeat(20_000), ")".repeat(20_000));
    let source = ProcessedSource::from_text(text.as_str(), None);

    assert!(!source.is_valid_syntax());
    assert!(source.ast().is_none());
    let last = source.diagnostics().last().unwrap();
    assert_eq!(last.level, Level::Fatal);
    assert_eq!(last.message, "nesting too deep");
    assert_line_invariants(&source, &text);
}

#[test]
fn common_ruby_forms_are_valid() {
    for text in [
        "x = 1e3\n",
        "a, b = 1, 2\n",
        "=begin\ncomment\n=end\nx = 1\n",
        "x = :\"sym\"\n",
        "x = 'it''s'\n",
    ] {
        let source = ProcessedSource::from_text(text, None);
        assert!(source.is_valid_syntax(), "{text:?}: {:?}", source.diagnostics());
    }
}

#[test]
fn embedded_document_is_a_comment() {
    let source = ProcessedSource::from_text("=begin\nnotes\n=end\nx = 1\n", None);

    let comments = source.comments().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "=begin\nnotes\n=end");
    assert_eq!(comments[0].line(), 1);
}
