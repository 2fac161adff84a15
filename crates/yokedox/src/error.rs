//! CLI error types.

use yd_config::ConfigError;
use yd_project::{FlushError, ProjectError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Project(#[from] ProjectError),

    #[error("{0}")]
    Output(#[from] FlushError),

    /// The generator process could not run or exited unsuccessfully.
    #[error("generator {0}")]
    Generator(String),

    #[error("{0}")]
    Validation(String),
}
