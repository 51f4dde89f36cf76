use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use url::Url;

use super::{
    Directory, DirectoryError, DirectoryResult, Group, GroupRule, OktaErrorBody, User, pagination,
};
use crate::config::DirectoryConfig;

/// Okta management API client authenticated with an SSWS API token.
pub struct OktaClient {
    http: reqwest::Client,
    base_url: Url,
    api_token: String,
    timeout: Duration,
    group_page_size: u32,
    rule_page_size: u32,
    user_page_size: u32,
}

impl OktaClient {
    pub fn new(config: &DirectoryConfig, api_token: impl Into<String>) -> DirectoryResult<Self> {
        let base_url = Url::parse(&config.org_url)?;
        if base_url.cannot_be_a_base() {
            return Err(DirectoryError::InvalidOrgUrl(config.org_url.clone()));
        }

        Ok(Self {
            http: config.build_client()?,
            base_url,
            api_token: api_token.into(),
            timeout: config.timeout(),
            group_page_size: config.group_page_size,
            rule_page_size: config.rule_page_size,
            user_page_size: config.user_page_size,
        })
    }

    /// Build an API URL from path segments (each one percent-encoded) and query pairs.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    fn request(&self, url: Url) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header(AUTHORIZATION, format!("SSWS {}", self.api_token))
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
    }

    /// Check response status and extract Okta's error summary on failure.
    async fn check_response(response: reqwest::Response) -> DirectoryResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("(empty body)"));

        let message = serde_json::from_str::<OktaErrorBody>(&body)
            .ok()
            .and_then(|error| match (error.error_summary, error.error_code) {
                (Some(summary), Some(code)) => Some(format!("{summary} ({code})")),
                (Some(summary), None) => Some(summary),
                _ => None,
            })
            .unwrap_or(body);

        Err(DirectoryError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// GET `url` and every page after it.
    async fn get_all<T: DeserializeOwned>(&self, url: Url) -> DirectoryResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(url);
        let mut page = 0usize;

        while let Some(url) = next.take() {
            page += 1;
            tracing::debug!(url = %url, page, "Fetching page");

            let response = Self::check_response(self.request(url.clone()).send().await?).await?;
            let next_link = pagination::next_page_url(response.headers());
            let batch: Vec<T> = response.json().await?;
            items.extend(batch);

            if let Some(link) = next_link {
                let next_url = Url::parse(&link)?;
                if !pagination::same_origin(&self.base_url, &next_url) {
                    return Err(DirectoryError::Pagination(format!(
                        "next page link {} is outside the org {}",
                        next_url.origin().ascii_serialization(),
                        self.base_url.origin().ascii_serialization()
                    )));
                }
                if next_url == url {
                    return Err(DirectoryError::Pagination(format!(
                        "next page link repeats the current page {url}"
                    )));
                }
                next = Some(next_url);
            }
        }

        tracing::debug!(pages = page, items = items.len(), "Pagination complete");
        Ok(items)
    }
}

#[async_trait]
impl Directory for OktaClient {
    async fn list_users(&self, query: &str) -> DirectoryResult<Vec<User>> {
        let url = self.endpoint(
            &["api", "v1", "users"],
            &[
                ("q", query.to_string()),
                ("limit", self.user_page_size.to_string()),
            ],
        );
        self.get_all(url).await
    }

    async fn list_user_groups(&self, user_id: &str) -> DirectoryResult<Vec<Group>> {
        let url = self.endpoint(&["api", "v1", "users", user_id, "groups"], &[]);
        self.get_all(url).await
    }

    async fn list_groups(&self, query: Option<&str>) -> DirectoryResult<Vec<Group>> {
        let mut params = vec![("limit", self.group_page_size.to_string())];
        if let Some(query) = query {
            params.push(("q", query.to_string()));
        }
        let url = self.endpoint(&["api", "v1", "groups"], &params);
        self.get_all(url).await
    }

    async fn list_group_members(&self, group_id: &str) -> DirectoryResult<Vec<User>> {
        let url = self.endpoint(
            &["api", "v1", "groups", group_id, "users"],
            &[("limit", self.user_page_size.to_string())],
        );
        self.get_all(url).await
    }

    async fn list_group_rules(&self, search: Option<&str>) -> DirectoryResult<Vec<GroupRule>> {
        let mut params = vec![("limit", self.rule_page_size.to_string())];
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        let url = self.endpoint(&["api", "v1", "groups", "rules"], &params);
        self.get_all(url).await
    }
}
