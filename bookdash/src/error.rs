//! Error types for BookDash

use thiserror::Error;

/// BookDash error type
#[derive(Error, Debug)]
pub enum Error {
    /// Connection or protocol failure talking to the search engine
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The search engine answered with a non-success status
    #[error("Search engine returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// An external script could not be started
    #[error("Failed to run '{command}': {source}")]
    Process {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid query
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for BookDash operations
pub type Result<T> = std::result::Result<T, Error>;
