//! Group rule cross-referencing.
//!
//! The pipeline is: raw rule conditions are parsed into group references
//! ([`expression`]), joined against the group table ([`resolve`]), then filtered
//! and rendered for the terminal ([`report`]).

pub mod expression;
pub mod report;
pub mod resolve;

pub use expression::parse_group_rule_expression;
pub use report::{FilterMode, format_rule_report};
pub use resolve::{ResolvedRule, SourceGroup, resolve_rules};

/// A group as seen by the rule engine: identity plus display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRef {
    pub id: String,
    pub name: String,
}

/// A group rule with its condition already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
    pub name: String,
    pub id: String,
    /// The single group users are assigned to.
    pub destination_group_id: String,
    /// References extracted from the condition, in expression order, duplicates kept.
    /// Usually group ids, but may be group names or name prefixes.
    pub source_group_ids: Vec<String>,
}
