//! API token acquisition.
//!
//! Supports two backends:
//! - Environment variables (default)
//! - An external command whose stdout is the secret (e.g. the 1Password or Vault CLI)

mod command;

use async_trait::async_trait;
pub use command::CommandSecretManager;
use thiserror::Error;

use crate::config::{AppConfig, SecretsConfig};

#[derive(Debug, Error)]
pub enum SecretError {
    #[error(
        "Okta API token missing or invalid. Please set OKTA_INFO_API_TOKEN environment \
         variable to your okta API token (looked up '{0}')"
    )]
    MissingApiToken(String),

    #[error("Secret command `{program}` failed: {message}")]
    Command { program: String, message: String },

    #[error("Failed to run secret command `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

pub type SecretResult<T> = Result<T, SecretError>;

/// Trait for looking up secrets by key.
#[async_trait]
pub trait SecretManager: Send + Sync {
    /// Get a secret by key. Returns None if not found.
    async fn get(&self, key: &str) -> SecretResult<Option<String>>;
}

/// Environment-based secret manager (reads from env vars)
pub struct EnvSecretManager;

impl EnvSecretManager {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnvSecretManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretManager for EnvSecretManager {
    async fn get(&self, key: &str) -> SecretResult<Option<String>> {
        Ok(std::env::var(key)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()))
    }
}

/// Create the secret manager described by the configuration.
pub fn build_secret_manager(config: &SecretsConfig) -> Box<dyn SecretManager> {
    match config {
        SecretsConfig::Env { .. } => Box::new(EnvSecretManager::new()),
        SecretsConfig::Command(cmd) => Box::new(CommandSecretManager::from_config(cmd)),
    }
}

/// The API token: `directory.api_token` if set, otherwise looked up in the secrets backend.
pub async fn resolve_api_token(config: &AppConfig) -> SecretResult<String> {
    if let Some(token) = config
        .directory
        .api_token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
    {
        return Ok(token.to_string());
    }

    let key = config.secrets.key();
    tracing::debug!(key, "Looking up API token in secrets backend");

    build_secret_manager(&config.secrets)
        .get(key)
        .await?
        .ok_or_else(|| SecretError::MissingApiToken(key.to_string()))
}
