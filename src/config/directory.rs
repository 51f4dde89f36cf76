//! Okta org connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Okta allows at most 10000 groups per page.
const MAX_GROUP_PAGE_SIZE: u32 = 10_000;

/// Okta allows at most 200 users or group rules per page.
const MAX_PAGE_SIZE: u32 = 200;

#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Okta org URL, e.g. `https://acme.okta.com`.
    #[serde(default)]
    pub org_url: String,

    /// API token. Usually left out of the file and supplied through
    /// `OKTA_INFO_API_TOKEN` or the secrets backend.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP connect timeout.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_group_page_size")]
    pub group_page_size: u32,

    #[serde(default = "default_page_size")]
    pub rule_page_size: u32,

    #[serde(default = "default_page_size")]
    pub user_page_size: u32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            org_url: String::new(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            group_page_size: default_group_page_size(),
            rule_page_size: default_page_size(),
            user_page_size: default_page_size(),
        }
    }
}

impl std::fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("org_url", &self.org_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "****"))
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("group_page_size", &self.group_page_size)
            .field("rule_page_size", &self.rule_page_size)
            .field("user_page_size", &self.user_page_size)
            .finish()
    }
}

impl DirectoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build a reqwest Client from this configuration.
    pub fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout())
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .user_agent(&self.user_agent)
            .build()
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.org_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Okta org url missing. Please set OKTA_INFO_ORG_URL environment variable \
                 to your okta org url, It should look like https://<org>.okta.com"
                    .into(),
            ));
        }

        let url = url::Url::parse(&self.org_url).map_err(|e| {
            ConfigError::Validation(format!("Invalid Okta org url '{}': {e}", self.org_url))
        })?;
        if !matches!(url.scheme(), "https" | "http") {
            return Err(ConfigError::Validation(format!(
                "Okta org url must use http or https, got '{}'",
                self.org_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "directory.timeout_secs must be greater than zero".into(),
            ));
        }

        if self.group_page_size == 0 || self.group_page_size > MAX_GROUP_PAGE_SIZE {
            return Err(ConfigError::Validation(format!(
                "directory.group_page_size must be between 1 and {MAX_GROUP_PAGE_SIZE}"
            )));
        }

        for (name, size) in [
            ("rule_page_size", self.rule_page_size),
            ("user_page_size", self.user_page_size),
        ] {
            if size == 0 || size > MAX_PAGE_SIZE {
                return Err(ConfigError::Validation(format!(
                    "directory.{name} must be between 1 and {MAX_PAGE_SIZE}"
                )));
            }
        }

        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("okta-info/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_group_page_size() -> u32 {
    MAX_GROUP_PAGE_SIZE
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}
