use thiserror::Error;

use saldo_config::ConfigError;
use saldo_core::CoreError;

/// Top-level error surfaced by the CLI.
#[derive(Debug, Error)]
pub enum SaldoError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    Input(String),
}
