//! Error types for slugs.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for slugs operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// The configuration file given on the command line is missing
    #[error("Configuration file path '{}' does not exist.", .0.display())]
    MissingConfigFile(PathBuf),

    /// The user/group mapping file to watch is missing
    #[error("Monitored file '{}' must be an existing file.", .0.display())]
    MissingMonitoredFile(PathBuf),

    /// A data line that is not exactly `user,group`
    #[error("malformed entry on line {line}: {content:?}")]
    MalformedEntry { line: usize, content: String },

    /// HTTP server failure
    #[error("an error occurred running the HTTP server: {0}")]
    Server(String),
}

/// Result type alias for slugs operations.
pub type Result<T> = std::result::Result<T, Error>;
