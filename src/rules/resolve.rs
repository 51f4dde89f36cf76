//! Joins parsed rules against the group table.

use std::{collections::HashMap, fmt, sync::LazyLock};

use regex::Regex;

use super::RuleRecord;

/// Shape of an Okta group id: `00g` followed by 17 alphanumerics.
static GROUP_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^00g[0-9A-Za-z]{17}$").unwrap());

/// Returns true if `value` looks like an Okta-issued group id.
pub fn is_group_id(value: &str) -> bool {
    GROUP_ID.is_match(value)
}

/// A rule source after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceGroup {
    /// Id found in the group table, replaced by the group name.
    Name(String),
    /// Not an id (a group name or a `StartsWith` prefix), passed through as is.
    Raw(String),
    /// Looks like a group id but no such group exists; the group was deleted after
    /// the rule was written.
    Missing(String),
}

impl SourceGroup {
    /// The text a search key is compared against.
    pub fn key(&self) -> &str {
        match self {
            Self::Name(value) | Self::Raw(value) | Self::Missing(value) => value,
        }
    }
}

impl fmt::Display for SourceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Raw(raw) => f.write_str(raw),
            Self::Missing(id) => write!(f, "{id} [missing in Okta!]"),
        }
    }
}

/// A rule with group ids replaced by display values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRule {
    pub name: String,
    pub id: String,
    /// `None` when the destination group is not in the table.
    pub destination: Option<String>,
    pub sources: Vec<SourceGroup>,
}

impl ResolvedRule {
    pub fn destination_display(&self) -> &str {
        self.destination.as_deref().unwrap_or_default()
    }
}

/// Substitute group names for ids. Rules are never dropped and nothing here fails.
pub fn resolve_rules(
    rules: Vec<RuleRecord>,
    groups_by_id: &HashMap<String, String>,
) -> Vec<ResolvedRule> {
    rules
        .into_iter()
        .map(|rule| {
            let destination = groups_by_id.get(&rule.destination_group_id).cloned();
            if destination.is_none() {
                tracing::debug!(
                    rule = %rule.name,
                    group_id = %rule.destination_group_id,
                    "Destination group not found"
                );
            }

            let sources = rule
                .source_group_ids
                .into_iter()
                .map(|source| resolve_source(source, groups_by_id))
                .collect();

            ResolvedRule {
                name: rule.name,
                id: rule.id,
                destination,
                sources,
            }
        })
        .collect()
}

fn resolve_source(source: String, groups_by_id: &HashMap<String, String>) -> SourceGroup {
    match groups_by_id.get(&source) {
        Some(name) => SourceGroup::Name(name.clone()),
        None if is_group_id(&source) => SourceGroup::Missing(source),
        None => SourceGroup::Raw(source),
    }
}
