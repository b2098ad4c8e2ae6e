//! Error types for wrapgen

use thiserror::Error;

/// wrapgen error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preprocessor error: {0}")]
    Preprocess(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

/// Result type alias for wrapgen
pub type Result<T> = std::result::Result<T, Error>;
