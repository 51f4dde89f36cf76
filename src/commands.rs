//! Subcommand implementations. Each returns the text to print on stdout.

use crate::{
    directory::{Directory, DirectoryResult},
    rules::{FilterMode, format_rule_report},
    services::{DirectorySnapshot, Member, difference, find_user, members_union, user_group_names},
};

/// Names of the groups the user belongs to.
pub async fn user_groups(directory: &dyn Directory, name: &str) -> DirectoryResult<String> {
    let Some(user) = find_user(directory, name).await? else {
        return Ok("User not found\n".to_string());
    };

    let names = user_group_names(directory, &user.id).await?;
    Ok(lines(names))
}

/// Members of any of the named groups.
pub async fn group_members(
    directory: &dyn Directory,
    group_names: &[String],
    show_deprovisioned: bool,
) -> DirectoryResult<String> {
    let group_names = clean_names(group_names.iter().map(String::as_str));
    let union = members_union(directory, &group_names).await?;

    let mut output = not_found(&union.missing_groups);
    output.push_str(&lines(visible(&union.members, show_deprovisioned)));
    Ok(output)
}

/// Members of `groups_a` that are not in `groups_b`, and the reverse.
pub async fn group_diff(
    directory: &dyn Directory,
    groups_a: &[String],
    groups_b: &[String],
    show_deprovisioned: bool,
) -> DirectoryResult<String> {
    let groups_a = clean_names(groups_a.iter().map(String::as_str));
    let groups_b = clean_names(groups_b.iter().map(String::as_str));

    let union_a = members_union(directory, &groups_a).await?;
    let union_b = members_union(directory, &groups_b).await?;
    let (only_a, only_b) = difference(&union_a.members, &union_b.members);

    let label_a = groups_a.join(", ");
    let label_b = groups_b.join(", ");

    let mut missing = union_a.missing_groups;
    missing.extend(union_b.missing_groups);
    let mut output = not_found(&missing);

    output.push_str(&diff_header(&label_a, &label_b, show_deprovisioned));
    output.push_str(&lines(visible(&only_a, show_deprovisioned)));
    output.push('\n');
    output.push_str(&diff_header(&label_b, &label_a, show_deprovisioned));
    output.push_str(&lines(visible(&only_b, show_deprovisioned)));
    Ok(output)
}

/// Group rules touching a group, or the rule with a given name.
pub async fn rule_report(
    directory: &dyn Directory,
    mode: FilterMode,
    search_key: &str,
) -> DirectoryResult<String> {
    let search = match mode {
        FilterMode::Name => Some(search_key),
        FilterMode::Group => None,
    };

    let rules = DirectorySnapshot::fetch(directory, search).await?.resolve();
    Ok(format_rule_report(search_key, &rules, mode))
}

fn diff_header(from: &str, other: &str, show_deprovisioned: bool) -> String {
    if show_deprovisioned {
        format!("Users in {from}, but not in {other}:\n")
    } else {
        format!("Users (excluding deprovisioned) in {from}, but not in {other}:\n")
    }
}

fn visible(members: &[Member], show_deprovisioned: bool) -> impl Iterator<Item = &Member> {
    members
        .iter()
        .filter(move |member| show_deprovisioned || !member.is_deprovisioned())
}

fn not_found(groups: &[String]) -> String {
    lines(groups.iter().map(|name| format!("Group not found: {name}")))
}

fn lines<T: ToString>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string() + "\n")
        .collect()
}

/// Split a comma-separated list of group names.
pub fn split_group_list(list: &str) -> Vec<String> {
    clean_names(list.split(','))
}

/// Trimmed names with empty entries dropped, so `"a, b,"` is two groups.
fn clean_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    names
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}
