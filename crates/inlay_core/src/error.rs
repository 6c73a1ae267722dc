//! Error taxonomy
//!
//! Every error here is non-fatal: callers log and skip the operation.
//! Domain/validation errors from update delegates are data rendered into
//! the error container, not values of this type.

use thiserror::Error;

/// Non-fatal errors raised by lookup and configuration paths
#[derive(Debug, Error)]
pub enum Error {
    /// Command name does not map to any editor command
    #[error("no such command: {0}")]
    UnknownCommand(String),

    /// Command name uses the reserved `_` prefix
    #[error("reserved command name: {0}")]
    ReservedCommand(String),

    /// Instance id does not refer to an attached editor
    #[error("editor not initialized")]
    Uninitialized,

    /// A declarative option could not be parsed
    #[error("invalid dataset option `{key}`: {source}")]
    InvalidOption {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
