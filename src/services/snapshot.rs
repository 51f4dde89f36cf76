//! Point-in-time view of groups and group rules used by the rule report.

use std::collections::HashMap;

use crate::{
    directory::{Directory, DirectoryError, DirectoryResult, GroupRule},
    rules::{GroupRef, ResolvedRule, RuleRecord, parse_group_rule_expression, resolve_rules},
};

/// Every group, for id to name lookups.
pub async fn fetch_groups(directory: &dyn Directory) -> DirectoryResult<Vec<GroupRef>> {
    let groups = directory.list_groups(None).await?;

    Ok(groups
        .into_iter()
        .map(|group| GroupRef {
            id: group.id,
            name: group.profile.name,
        })
        .collect())
}

/// Group rules with parsed conditions. A malformed rule fails the whole fetch.
pub async fn fetch_rules(
    directory: &dyn Directory,
    search: Option<&str>,
) -> DirectoryResult<Vec<RuleRecord>> {
    directory
        .list_group_rules(search)
        .await?
        .into_iter()
        .map(rule_record)
        .collect()
}

fn rule_record(rule: GroupRule) -> DirectoryResult<RuleRecord> {
    let destinations = rule.destination_group_ids().to_vec();
    let destination_group_id = match destinations.as_slice() {
        [id] => id.clone(),
        [] => return Err(DirectoryError::MissingDestination(rule.name)),
        ids => return Err(DirectoryError::MultipleDestinations(rule.name, ids.len())),
    };

    let expression = rule
        .expression()
        .ok_or_else(|| DirectoryError::MissingConditions(rule.name.clone()))?;
    let source_group_ids = parse_group_rule_expression(expression);

    Ok(RuleRecord {
        name: rule.name,
        id: rule.id,
        destination_group_id,
        source_group_ids,
    })
}

/// Groups and rules fetched together.
#[derive(Debug, Clone)]
pub struct DirectorySnapshot {
    pub groups_by_id: HashMap<String, String>,
    pub rules: Vec<RuleRecord>,
}

impl DirectorySnapshot {
    /// Fetch groups and rules concurrently.
    ///
    /// The first failure is returned and the other request is dropped; there is no
    /// partial snapshot.
    pub async fn fetch(directory: &dyn Directory, rule_search: Option<&str>) -> DirectoryResult<Self> {
        let (groups, rules) = tokio::try_join!(
            fetch_groups(directory),
            fetch_rules(directory, rule_search),
        )?;

        tracing::info!(
            groups = groups.len(),
            rules = rules.len(),
            "Fetched directory snapshot"
        );

        Ok(Self::new(groups, rules))
    }

    pub fn new(groups: Vec<GroupRef>, rules: Vec<RuleRecord>) -> Self {
        let groups_by_id = groups
            .into_iter()
            .map(|group| (group.id, group.name))
            .collect();

        Self {
            groups_by_id,
            rules,
        }
    }

    /// Rules with group ids replaced by names.
    pub fn resolve(self) -> Vec<ResolvedRule> {
        resolve_rules(self.rules, &self.groups_by_id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{rules::SourceGroup, tests::FakeDirectory};

    fn group(id: &str, name: &str) -> serde_json::Value {
        json!({"id": id, "profile": {"name": name}})
    }

    fn rule(name: &str, expression: &str, destinations: &[&str]) -> serde_json::Value {
        json!({
            "id": format!("0pr-{name}"),
            "name": name,
            "conditions": {"expression": {"value": expression, "type": "urn:okta:expression:1.0"}},
            "actions": {"assignUserToGroups": {"groupIds": destinations}}
        })
    }

    #[tokio::test]
    async fn test_snapshot_resolves_rules() {
        let directory = FakeDirectory::default()
            .with_groups(vec![
                group("00g1lghmvirItveA14x7", "engineering"),
                group("00gar7xacmKf3wNAt4x7", "everyone"),
            ])
            .with_rules(vec![rule(
                "Everyone",
                r#"isMemberOfAnyGroup("00g1lghmvirItveA14x7", "00gdeadbeefdeadbeef0") || isMemberOfGroupNameStartsWith("team-")"#,
                &["00gar7xacmKf3wNAt4x7"],
            )]);

        let snapshot = DirectorySnapshot::fetch(&directory, None).await.unwrap();
        assert_eq!(snapshot.groups_by_id.len(), 2);
        assert_eq!(
            snapshot.rules[0].source_group_ids,
            vec!["00g1lghmvirItveA14x7", "00gdeadbeefdeadbeef0", "team-"]
        );

        let resolved = snapshot.resolve();
        assert_eq!(resolved[0].destination.as_deref(), Some("everyone"));
        assert_eq!(
            resolved[0].sources,
            vec![
                SourceGroup::Name("engineering".to_string()),
                SourceGroup::Missing("00gdeadbeefdeadbeef0".to_string()),
                SourceGroup::Raw("team-".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_rule_without_destination_is_fatal() {
        let directory = FakeDirectory::default()
            .with_rules(vec![rule("Broken", r#"isMemberOfAnyGroup("00g1")"#, &[])]);

        let err = DirectorySnapshot::fetch(&directory, None).await.unwrap_err();
        assert!(matches!(err, DirectoryError::MissingDestination(ref name) if name == "Broken"));
        assert_eq!(err.to_string(), "group rule Broken has no destination group");
    }

    #[tokio::test]
    async fn test_rule_with_two_destinations_is_fatal() {
        let directory = FakeDirectory::default().with_rules(vec![rule(
            "Double",
            r#"isMemberOfAnyGroup("00g1")"#,
            &["00ga", "00gb"],
        )]);

        let err = fetch_rules(&directory, None).await.unwrap_err();
        assert!(matches!(err, DirectoryError::MultipleDestinations(_, 2)));
    }

    #[tokio::test]
    async fn test_rule_without_conditions_is_fatal() {
        let directory = FakeDirectory::default().with_rules(vec![json!({
            "id": "0pr1",
            "name": "No conditions",
            "actions": {"assignUserToGroups": {"groupIds": ["00ga"]}}
        })]);

        let err = fetch_rules(&directory, None).await.unwrap_err();
        assert!(matches!(err, DirectoryError::MissingConditions(ref name) if name == "No conditions"));
    }

    #[tokio::test]
    async fn test_group_fetch_failure_aborts_snapshot() {
        let directory = FakeDirectory::default()
            .with_rules(vec![rule("Ok", r#"isMemberOfAnyGroup("00g1")"#, &["00ga"])])
            .failing_groups();

        let err = DirectorySnapshot::fetch(&directory, None).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_rule_search_is_forwarded() {
        let directory = FakeDirectory::default().with_rules(vec![
            rule("Engineering", r#"isMemberOfAnyGroup("00g1")"#, &["00ga"]),
            rule("Design", r#"isMemberOfAnyGroup("00g2")"#, &["00gb"]),
        ]);

        let rules = fetch_rules(&directory, Some("Eng")).await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "Engineering");
    }
}
