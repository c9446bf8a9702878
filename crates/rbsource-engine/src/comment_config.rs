//! Suppression ranges from `# rubocop:disable` / `# rubocop:enable` comments.
//!
//! ```text
//! # rubocop:disable Style/Foo, Lint/Bar     ← own line: opens a range
//! x = 1
//! # rubocop:enable Style/Foo                ← closes it
//! y = 2 # rubocop:disable Lint/Baz          ← trailing: this line only
//! ```
//!
//! A range that is never closed runs to the last line of the source.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::RangeInclusive;
use std::sync::OnceLock;

use regex::Regex;

use crate::processed_source::ProcessedSource;

/// Key under which `# rubocop:disable all` ranges are stored.
pub const ALL_COPS: &str = "all";

fn directive_regex() -> &'static Regex {
    static DIRECTIVE: OnceLock<Regex> = OnceLock::new();
    DIRECTIVE.get_or_init(|| {
        // The cop list ends at the first name not followed by a comma, so
        // a trailing explanation is not taken for a cop.
        Regex::new(r"\A#\s*rubocop\s*:\s*((?:dis|en)able)\b\s*([\w/]+(?:\s*,\s*[\w/]+)*)")
            .expect("Invalid directive regex")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Directive {
    line: usize,
    disable: bool,
    cops: Vec<String>,
}

impl Directive {
    fn parse(text: &str, line: usize) -> Option<Self> {
        let captures = directive_regex().captures(text)?;
        let disable = &captures[1] == "disable";
        let cops = captures[2]
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Some(Self {
            line,
            disable,
            cops,
        })
    }
}

/// Disabled line ranges per cop, computed once from a processed source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentConfig {
    disabled: BTreeMap<String, Vec<RangeInclusive<usize>>>,
}

impl CommentConfig {
    pub fn new(source: &ProcessedSource) -> Self {
        let (Some(comments), Some(tokens)) = (source.comments(), source.tokens()) else {
            return Self::default();
        };

        let code_lines: HashSet<usize> = tokens
            .iter()
            .filter(|token| !token.is_newline())
            .map(|token| token.line())
            .collect();
        let last_line = source.lines().len();

        let directives = comments.iter().filter_map(|comment| {
            let directive = Directive::parse(&comment.text, comment.line())?;
            Some((directive, code_lines.contains(&comment.line())))
        });

        let mut disabled: BTreeMap<String, Vec<RangeInclusive<usize>>> = BTreeMap::new();
        let mut open: HashMap<String, usize> = HashMap::new();

        for (directive, trailing) in directives {
            for cop in directive.cops {
                if trailing {
                    if directive.disable {
                        disabled
                            .entry(cop)
                            .or_default()
                            .push(directive.line..=directive.line);
                    }
                } else if directive.disable {
                    open.entry(cop).or_insert(directive.line);
                } else if let Some(start) = open.remove(&cop) {
                    disabled.entry(cop).or_default().push(start..=directive.line);
                }
            }
        }

        for (cop, start) in open {
            disabled
                .entry(cop)
                .or_default()
                .push(start..=last_line.max(start));
        }
        for ranges in disabled.values_mut() {
            ranges.sort_by_key(|range| *range.start());
        }

        log::trace!("{} cops with disabled ranges", disabled.len());
        Self { disabled }
    }

    pub fn cop_disabled_line_ranges(&self) -> &BTreeMap<String, Vec<RangeInclusive<usize>>> {
        &self.disabled
    }

    /// Whether `cop` is disabled on 1-based `line`, directly or via `all`.
    pub fn cop_disabled_on_line(&self, cop: &str, line: usize) -> bool {
        [cop, ALL_COPS].iter().any(|name| {
            self.disabled
                .get(*name)
                .is_some_and(|ranges| ranges.iter().any(|range| range.contains(&line)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn ranges(source: &str) -> BTreeMap<String, Vec<RangeInclusive<usize>>> {
        let processed = ProcessedSource::from_text(source, None);
        CommentConfig::new(&processed).cop_disabled_line_ranges().clone()
    }

    #[rstest]
    #[case("# rubocop:disable Style/Foo", true, &["Style/Foo"])]
    #[case("# rubocop:enable Style/Foo, Lint/Bar", false, &["Style/Foo", "Lint/Bar"])]
    #[case("# rubocop : disable all", true, &["all"])]
    #[case("#rubocop:disable A,B", true, &["A", "B"])]
    #[case("# rubocop:disable Style/Foo because reasons", true, &["Style/Foo"])]
    #[case("# rubocop:disable A, B -- legacy code", true, &["A", "B"])]
    fn parses_directives(#[case] text: &str, #[case] disable: bool, #[case] cops: &[&str]) {
        let directive = Directive::parse(text, 1).unwrap();
        assert_eq!(directive.disable, disable);
        assert_eq!(directive.cops, cops);
    }

    #[rstest]
    #[case("# just a comment")]
    #[case("# rubocop:todo Style/Foo")]
    #[case("x # rubocop:disable Style/Foo")]
    fn ignores_other_comments(#[case] text: &str) {
        assert_eq!(Directive::parse(text, 1), None);
    }

    #[test]
    fn own_line_directives_open_and_close_ranges() {
        let source = "# rubocop:disable Style/Foo\nx = 1\ny = 2\n# rubocop:enable Style/Foo\nz = 3\n";
        assert_eq!(
            ranges(source),
            BTreeMap::from([("Style/Foo".to_string(), vec![1..=4])])
        );
    }

    #[test]
    fn trailing_directive_covers_only_its_line() {
        let source = "x = 1\ny = 2 # rubocop:disable Lint/Bar\nz = 3\n";
        assert_eq!(
            ranges(source),
            BTreeMap::from([("Lint/Bar".to_string(), vec![2..=2])])
        );
    }

    #[test]
    fn unclosed_range_runs_to_last_line() {
        let source = "x = 1\n# rubocop:disable all\ny = 2\nz = 3\n";
        let processed = ProcessedSource::from_text(source, None);
        let config = CommentConfig::new(&processed);

        assert_eq!(
            config.cop_disabled_line_ranges(),
            &BTreeMap::from([("all".to_string(), vec![2..=4])])
        );
        assert!(config.cop_disabled_on_line("Style/Anything", 3));
        assert!(!config.cop_disabled_on_line("Style/Anything", 1));
    }

    #[test]
    fn enable_without_disable_is_ignored() {
        let source = "# rubocop:enable Style/Foo\nx = 1\n";
        assert!(ranges(source).is_empty());
    }

    #[test]
    fn invalid_source_has_no_ranges() {
        assert!(ranges("# rubocop:disable Style/Foo\ndef foo(\n").is_empty());
    }
}
