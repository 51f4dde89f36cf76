//! Configuration for okta-info.
//!
//! Everything can be supplied through environment variables, which is how the tool is
//! normally run. A TOML file (`--config`) may be used instead or in addition; it
//! supports `${VAR_NAME}` interpolation and is overridden by the environment.
//!
//! # Example
//!
//! ```toml
//! [directory]
//! org_url = "https://acme.okta.com"
//!
//! [secrets]
//! type = "command"
//! program = "op"
//! args = ["item", "get", "{key}", "--vault", "Private", "--field", "password"]
//! key = "product-Okta ApiToken"
//!
//! [observability.logging]
//! level = "info"
//! ```

mod directory;
mod observability;
mod secrets;

use std::{path::Path, sync::LazyLock};

pub use directory::*;
pub use observability::*;
use regex::Regex;
pub use secrets::*;
use serde::{Deserialize, Serialize};

/// Org URL, e.g. `https://acme.okta.com`.
pub const ENV_ORG_URL: &str = "OKTA_INFO_ORG_URL";
/// API token.
pub const ENV_API_TOKEN: &str = DEFAULT_TOKEN_ENV_VAR;
/// Non-empty: fetch the API token with the 1Password CLI.
pub const ENV_USE_1PASSWORD: &str = "OKTA_INFO_USE_1PASSWORD";
/// Non-empty: include deprovisioned users in member listings.
pub const ENV_SHOW_DEPROVISIONED: &str = "OKTA_INFO_SHOW_DEPROVISIONED";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Okta org connection.
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// API token source.
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Logging.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Report output options.
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// List users with status `DEPROVISIONED` in member listings and diffs.
    #[serde(default)]
    pub show_deprovisioned: bool,
}

impl AppConfig {
    /// Load the file if one is given, apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file without environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        Ok(toml::from_str(&expanded)?)
    }

    /// Apply `OKTA_INFO_*` environment variables on top of the current values.
    pub fn apply_env_overrides(&mut self) {
        if let Some(org_url) = non_empty_env(ENV_ORG_URL) {
            self.directory.org_url = org_url;
        }

        if let Some(token) = non_empty_env(ENV_API_TOKEN) {
            self.directory.api_token = Some(token);
        } else if non_empty_env(ENV_USE_1PASSWORD).is_some() && self.secrets.is_env() {
            self.secrets = SecretsConfig::one_password();
        }

        if non_empty_env(ENV_SHOW_DEPROVISIONED).is_some() {
            self.report.show_deprovisioned = true;
        }
    }

    /// Validate the configuration for consistency and completeness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.directory.validate()?;

        if let SecretsConfig::Command(cmd) = &self.secrets
            && cmd.program.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "secrets.program must not be empty".into(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

static ENV_VAR_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// Expand `${VAR_NAME}` references, leaving anything after a `#` on a line untouched.
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut lines = Vec::new();

    for line in input.split('\n') {
        let (content, comment) = match line.find('#') {
            Some(pos) => line.split_at(pos),
            None => (line, ""),
        };

        let mut expanded = String::with_capacity(line.len());
        let mut last_end = 0;
        for caps in ENV_VAR_REF.captures_iter(content) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = std::env::var(name.as_str())
                .map_err(|_| ConfigError::EnvVarNotFound(name.as_str().to_string()))?;
            expanded.push_str(&content[last_end..whole.start()]);
            expanded.push_str(&value);
            last_end = whole.end();
        }
        expanded.push_str(&content[last_end..]);
        expanded.push_str(comment);

        lines.push(expanded);
    }

    Ok(lines.join("\n"))
}
