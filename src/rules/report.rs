//! Selection and rendering of the group rule report.
//!
//! Output is one line per (rule, source) pair:
//!
//! ```text
//! Engineering rule : engineering -> everyone
//! Short           : design      -> everyone
//! ```
//!
//! Column widths come from every rule passed in, before selection, so the layout
//! does not depend on which rules end up printed. Lines are sorted, which makes the
//! report independent of the order the directory returned the rules in.

use super::{ResolvedRule, SourceGroup};

/// What the search key of `okta-info rule` is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FilterMode {
    /// Match the destination or a source group of the rule
    Group,
    /// Match the rule name exactly (ignoring case)
    Name,
}

/// A rule chosen for output together with the sources to print for it.
struct Selection<'a> {
    rule: &'a ResolvedRule,
    sources: Vec<&'a SourceGroup>,
}

/// Filter `rules` by `search_key` and render the report text.
///
/// In [`FilterMode::Group`] a rule whose destination matches is printed with all its
/// sources; a rule with a matching source is additionally printed with that source
/// only. Both can apply to the same rule. Empty selection renders as an empty string.
pub fn format_rule_report(search_key: &str, rules: &[ResolvedRule], mode: FilterMode) -> String {
    let name_width = rules
        .iter()
        .map(|rule| rule.name.chars().count())
        .max()
        .unwrap_or(0);
    let source_width = rules
        .iter()
        .flat_map(|rule| &rule.sources)
        .map(|source| source.to_string().chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = select_rules(search_key, rules, mode)
        .iter()
        .flat_map(|selection| {
            selection.sources.iter().map(|source| {
                format!(
                    "{:<name_width$} : {:<source_width$} -> {}",
                    selection.rule.name,
                    source.to_string(),
                    selection.rule.destination_display(),
                )
            })
        })
        .collect();

    lines.sort();

    let mut report = String::new();
    for line in lines {
        report.push_str(&line);
        report.push('\n');
    }
    report
}

fn select_rules<'a>(
    search_key: &str,
    rules: &'a [ResolvedRule],
    mode: FilterMode,
) -> Vec<Selection<'a>> {
    let mut selected = Vec::new();

    for rule in rules {
        match mode {
            FilterMode::Group => {
                if rule
                    .destination
                    .as_deref()
                    .is_some_and(|destination| eq_ignore_case(destination, search_key))
                {
                    selected.push(Selection {
                        rule,
                        sources: rule.sources.iter().collect(),
                    });
                }

                // Only the dependency on the searched group, other sources are noise.
                // When several sources match, the last one is printed.
                if let Some(source) = rule
                    .sources
                    .iter()
                    .rev()
                    .find(|source| eq_ignore_case(source.key(), search_key))
                {
                    selected.push(Selection {
                        rule,
                        sources: vec![source],
                    });
                }
            }
            FilterMode::Name => {
                if eq_ignore_case(&rule.name, search_key) {
                    selected.push(Selection {
                        rule,
                        sources: rule.sources.iter().collect(),
                    });
                }
            }
        }
    }

    selected
}

/// Unicode-aware case-insensitive equality.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
