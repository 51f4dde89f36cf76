//! Shared test doubles and end-to-end tests against a mock Okta org.


use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::directory::{Directory, DirectoryError, DirectoryResult, Group, GroupRule, User};

/// In-memory [`Directory`] built from Okta-shaped JSON.
///
/// Queries approximate Okta's behaviour: users match on an email prefix, groups on a
/// name prefix and rules on a name substring, all ignoring case.
#[derive(Debug, Default)]
pub struct FakeDirectory {
    users: Vec<User>,
    groups: Vec<Group>,
    rules: Vec<GroupRule>,
    members: HashMap<String, Vec<User>>,
    user_groups: HashMap<String, Vec<Group>>,
    fail_groups: bool,
}

fn parse_all<T: DeserializeOwned>(values: Vec<Value>) -> Vec<T> {
    values
        .into_iter()
        .map(|value| serde_json::from_value(value).expect("invalid test fixture"))
        .collect()
}

impl FakeDirectory {
    pub fn with_users(mut self, users: Vec<Value>) -> Self {
        self.users.extend(parse_all(users));
        self
    }

    pub fn with_groups(mut self, groups: Vec<Value>) -> Self {
        self.groups.extend(parse_all(groups));
        self
    }

    pub fn with_rules(mut self, rules: Vec<Value>) -> Self {
        self.rules.extend(parse_all(rules));
        self
    }

    pub fn with_members(mut self, group_id: &str, users: Vec<Value>) -> Self {
        self.members
            .entry(group_id.to_string())
            .or_default()
            .extend(parse_all(users));
        self
    }

    pub fn with_user_groups(mut self, user_id: &str, groups: Vec<Value>) -> Self {
        self.user_groups
            .entry(user_id.to_string())
            .or_default()
            .extend(parse_all(groups));
        self
    }

    /// Make every group listing fail with a server error.
    pub fn failing_groups(mut self) -> Self {
        self.fail_groups = true;
        self
    }
}

#[async_trait]
impl Directory for FakeDirectory {
    async fn list_users(&self, query: &str) -> DirectoryResult<Vec<User>> {
        let query = query.to_lowercase();
        Ok(self
            .users
            .iter()
            .filter(|user| {
                user.email()
                    .is_some_and(|email| email.to_lowercase().starts_with(&query))
            })
            .cloned()
            .collect())
    }

    async fn list_user_groups(&self, user_id: &str) -> DirectoryResult<Vec<Group>> {
        Ok(self.user_groups.get(user_id).cloned().unwrap_or_default())
    }

    async fn list_groups(&self, query: Option<&str>) -> DirectoryResult<Vec<Group>> {
        if self.fail_groups {
            return Err(DirectoryError::Api {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }

        let query = query.map(str::to_lowercase).unwrap_or_default();
        Ok(self
            .groups
            .iter()
            .filter(|group| group.profile.name.to_lowercase().starts_with(&query))
            .cloned()
            .collect())
    }

    async fn list_group_members(&self, group_id: &str) -> DirectoryResult<Vec<User>> {
        Ok(self.members.get(group_id).cloned().unwrap_or_default())
    }

    async fn list_group_rules(&self, search: Option<&str>) -> DirectoryResult<Vec<GroupRule>> {
        let search = search.map(str::to_lowercase).unwrap_or_default();
        Ok(self
            .rules
            .iter()
            .filter(|rule| rule.name.to_lowercase().contains(&search))
            .cloned()
            .collect())
    }
}
