//! CLI error types.

use undoc_config::ConfigError;
use undoc_include::OptionError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Option(#[from] OptionError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// The directive produced a warning node instead of content.
    #[error("{0}")]
    Include(String),
}
