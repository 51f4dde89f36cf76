use thiserror::Error;

use crate::{
    config::ConfigError, directory::DirectoryError, observability::TracingError,
    secrets::SecretError,
};

/// Any failure that ends the process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Tracing(#[from] TracingError),
}

pub type AppResult<T> = Result<T, AppError>;
