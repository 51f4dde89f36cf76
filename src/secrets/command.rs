//! Secrets fetched by running an external program.
//!
//! Any CLI that prints a secret to stdout works, e.g. the 1Password CLI:
//!
//! ```text
//! op item get "product-Okta ApiToken" --vault Private --field password
//! ```

use async_trait::async_trait;
use tokio::process::Command;

use super::{SecretError, SecretManager, SecretResult};
use crate::config::CommandSecretsConfig;

/// Placeholder in the argument list replaced by the requested key.
const KEY_PLACEHOLDER: &str = "{key}";

pub struct CommandSecretManager {
    program: String,
    args: Vec<String>,
}

impl CommandSecretManager {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &CommandSecretsConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    fn args_for(&self, key: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(KEY_PLACEHOLDER, key))
            .collect()
    }
}

#[async_trait]
impl SecretManager for CommandSecretManager {
    async fn get(&self, key: &str) -> SecretResult<Option<String>> {
        tracing::debug!(program = %self.program, "Running secret command");

        let output = Command::new(&self.program)
            .args(self.args_for(key))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| SecretError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            };
            return Err(SecretError::Command {
                program: self.program.clone(),
                message,
            });
        }

        let secret = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!secret.is_empty()).then_some(secret))
    }
}
