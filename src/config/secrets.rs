//! Secrets backend configuration.

use serde::{Deserialize, Serialize};

/// Environment variable holding the API token by default.
pub const DEFAULT_TOKEN_ENV_VAR: &str = "OKTA_INFO_API_TOKEN";

/// Where the API token comes from when `directory.api_token` is not set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecretsConfig {
    /// Read the token from an environment variable.
    Env {
        #[serde(default = "default_env_key")]
        key: String,
    },

    /// Run a program and use its standard output as the token.
    /// `{key}` in `args` is replaced with `key`.
    Command(CommandSecretsConfig),
}

impl Default for SecretsConfig {
    fn default() -> Self {
        SecretsConfig::Env {
            key: default_env_key(),
        }
    }
}

impl SecretsConfig {
    /// The 1Password CLI lookup used when `OKTA_INFO_USE_1PASSWORD` is set.
    pub fn one_password() -> Self {
        SecretsConfig::Command(CommandSecretsConfig {
            program: "op".to_string(),
            args: ["item", "get", "{key}", "--vault", "Private", "--field", "password"]
                .into_iter()
                .map(String::from)
                .collect(),
            key: "product-Okta ApiToken".to_string(),
        })
    }

    /// The key the backend is asked for.
    pub fn key(&self) -> &str {
        match self {
            SecretsConfig::Env { key } => key,
            SecretsConfig::Command(cfg) => &cfg.key,
        }
    }

    pub fn is_env(&self) -> bool {
        matches!(self, SecretsConfig::Env { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandSecretsConfig {
    /// Program to run, looked up on `PATH`.
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Secret name substituted for `{key}` in `args`.
    #[serde(default)]
    pub key: String,
}

fn default_env_key() -> String {
    DEFAULT_TOKEN_ENV_VAR.to_string()
}
