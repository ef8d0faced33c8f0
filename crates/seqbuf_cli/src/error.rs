//! CLI error type.

use seqbuf_core::SequenceError;
use thiserror::Error;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A sequence, reader or writer operation failed.
    #[error("sequence error: {0}")]
    Sequence(#[from] SequenceError),

    /// Rendering JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A command-line value could not be interpreted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;
