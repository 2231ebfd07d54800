//! Error types

use thiserror::Error;

/// Main error type shared across the workspace
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid repository URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
