//! Okta API resource types.
//!
//! Only the fields the reports need are modelled; everything else in the payloads is
//! ignored on deserialization.

use serde::Deserialize;

/// Okta user (`/api/v1/users`).
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    /// Lifecycle status, e.g. `ACTIVE`, `SUSPENDED`, `DEPROVISIONED`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub profile: UserProfile,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
}

impl User {
    /// Email address, falling back to the login (which Okta requires to be email-shaped).
    pub fn email(&self) -> Option<&str> {
        self.profile
            .email
            .as_deref()
            .or(self.profile.login.as_deref())
    }
}

/// Okta group (`/api/v1/groups`).
#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub id: String,
    pub profile: GroupProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupProfile {
    pub name: String,
}

/// Okta group rule (`/api/v1/groups/rules`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub conditions: Option<GroupRuleConditions>,
    #[serde(default)]
    pub actions: Option<GroupRuleActions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupRuleConditions {
    #[serde(default)]
    pub expression: Option<GroupRuleExpression>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupRuleExpression {
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRuleActions {
    #[serde(default)]
    pub assign_user_to_groups: Option<AssignUserToGroups>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignUserToGroups {
    #[serde(default)]
    pub group_ids: Vec<String>,
}

impl GroupRule {
    /// Group ids the rule assigns users to.
    pub fn destination_group_ids(&self) -> &[String] {
        self.actions
            .as_ref()
            .and_then(|actions| actions.assign_user_to_groups.as_ref())
            .map(|assign| assign.group_ids.as_slice())
            .unwrap_or_default()
    }

    /// Raw condition expression text.
    pub fn expression(&self) -> Option<&str> {
        self.conditions
            .as_ref()
            .and_then(|conditions| conditions.expression.as_ref())
            .map(|expression| expression.value.as_str())
    }
}

/// Okta error body, e.g. `{"errorCode": "E0000011", "errorSummary": "Invalid token provided"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OktaErrorBody {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_summary: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_rule_deserialization() {
        let rule: GroupRule = serde_json::from_value(serde_json::json!({
            "type": "group_rule",
            "id": "0pr3f7zMZZHPgUoWO0g4",
            "status": "ACTIVE",
            "name": "Engineering everyone",
            "created": "2016-09-25T21:57:06.000Z",
            "conditions": {
                "people": {"users": {"exclude": []}, "groups": {"exclude": []}},
                "expression": {
                    "value": "isMemberOfAnyGroup(\"00g1lghmvirItveA14x7\")",
                    "type": "urn:okta:expression:1.0"
                }
            },
            "actions": {"assignUserToGroups": {"groupIds": ["00gar7xacmKf3wNAt4x7"]}}
        }))
        .unwrap();

        assert_eq!(rule.name, "Engineering everyone");
        assert_eq!(rule.destination_group_ids(), ["00gar7xacmKf3wNAt4x7"]);
        assert_eq!(
            rule.expression(),
            Some("isMemberOfAnyGroup(\"00g1lghmvirItveA14x7\")")
        );
    }

    #[test]
    fn test_group_rule_without_actions() {
        let rule: GroupRule = serde_json::from_value(serde_json::json!({
            "id": "0pr1",
            "name": "Broken"
        }))
        .unwrap();

        assert!(rule.destination_group_ids().is_empty());
        assert_eq!(rule.expression(), None);
    }

    #[test]
    fn test_group_ignores_unmodelled_fields() {
        let group: Group = serde_json::from_value(serde_json::json!({
            "id": "00g1",
            "objectClass": ["okta:user_group"],
            "type": "OKTA_GROUP",
            "profile": {"name": "Engineering", "description": "All engineers"}
        }))
        .unwrap();

        assert_eq!(group.id, "00g1");
        assert_eq!(group.profile.name, "Engineering");
    }

    #[test]
    fn test_user_email_falls_back_to_login() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "00u1",
            "status": "ACTIVE",
            "profile": {"login": "jane@example.com", "firstName": "Jane"}
        }))
        .unwrap();

        assert_eq!(user.email(), Some("jane@example.com"));
    }
}
