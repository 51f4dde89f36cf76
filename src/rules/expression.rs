//! Group rule expression parsing.
//!
//! Okta stores the condition of a group rule as Okta Expression Language text, e.g.
//!
//! ```text
//! isMemberOfAnyGroup("00g1lghmvirItveA14x7", "00g360hu5bfvaBHP84x7")
//! isMemberOfGroupName("team-a") || isMemberOfGroupName("team-b")
//! isMemberOfGroupNameStartsWith("team-")
//! ```
//!
//! Only group-membership predicates are understood. The parser extracts the quoted
//! arguments of every such predicate, in the order they appear. Depending on the
//! predicate these are group ids, group names or name prefixes.
//!
//! `&&` is treated exactly like `||`: the result is a flat list and carries no
//! operator information, so a conjunctive rule reads as a disjunctive one.

use std::sync::LazyLock;

use regex::Regex;

/// Logical operators separating predicates.
static DIVIDERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|\||&&").unwrap());

/// A segment that calls one of the `isMemberOf*Group*` functions.
static MEMBERSHIP_PREDICATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"?isMemberOf.*Group.*"#).unwrap());

/// A double-quoted literal preceded by any character.
static QUOTED_ARGUMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"."(.+?)""#).unwrap());

/// Extract the group references of a rule condition.
///
/// Never fails: segments that are not membership predicates contribute nothing.
/// Duplicates are kept and literals are returned verbatim.
pub fn parse_group_rule_expression(expression: &str) -> Vec<String> {
    DIVIDERS
        .split(expression)
        .map(str::trim)
        .filter_map(|segment| MEMBERSHIP_PREDICATE.find(segment))
        .flat_map(|predicate| {
            QUOTED_ARGUMENT
                .captures_iter(predicate.as_str())
                .filter_map(|caps| caps.get(1))
                .map(|arg| arg.as_str().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}
