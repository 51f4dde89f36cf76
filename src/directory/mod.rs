//! Access to the Okta directory: users, groups and group rules.
//!
//! [`Directory`] is the seam the reports are written against; [`OktaClient`] is the
//! REST implementation. Every list operation returns the fully paginated result.

mod client;
mod pagination;
mod types;

use async_trait::async_trait;
pub use client::OktaClient;
use thiserror::Error;
pub use types::*;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Okta API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Okta org url '{0}' cannot be used as an API base url")]
    InvalidOrgUrl(String),

    #[error("Pagination error: {0}")]
    Pagination(String),

    #[error("group rule {0} has no destination group")]
    MissingDestination(String),

    #[error("group rule {0} has {1} destination groups, expected exactly one")]
    MultipleDestinations(String, usize),

    #[error("group rule {0} has no conditions")]
    MissingConditions(String),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Read access to an Okta org.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Users matching a free-text query (first name, last name or email prefix).
    async fn list_users(&self, query: &str) -> DirectoryResult<Vec<User>>;

    /// Groups the user is a member of.
    async fn list_user_groups(&self, user_id: &str) -> DirectoryResult<Vec<Group>>;

    /// Groups whose name starts with `query`, or every group when `None`.
    async fn list_groups(&self, query: Option<&str>) -> DirectoryResult<Vec<Group>>;

    /// Members of a group.
    async fn list_group_members(&self, group_id: &str) -> DirectoryResult<Vec<User>>;

    /// Group rules, optionally narrowed by Okta's keyword search.
    async fn list_group_rules(&self, search: Option<&str>) -> DirectoryResult<Vec<GroupRule>>;
}
