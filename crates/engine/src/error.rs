//! Error types for the migration engine
//!
//! These are the fatal errors: anything that stops a run. Problems with individual
//! rows or column values are not errors here; they are recorded as [`Issue`]s and the
//! run carries on.
//!
//! [`Issue`]: crate::issues::Issue

use std::io;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors raised by the engine
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (config file, snapshot, dump file)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot file could not be parsed or written
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// The row store rejected an operation
    #[error("Store error: {0}")]
    Store(String),

    /// A row has no usable primary key value
    #[error("Row in table '{table}' has no usable value for primary key '{primary_key}'")]
    MissingPrimaryKey {
        /// Table the row belongs to
        table: String,
        /// Primary key column
        primary_key: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Error::Store(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Snapshot(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
