//! Common error types for the bands services

use thiserror::Error;

/// Common result type for bands operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across bands microservices
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// XML encoding or decoding error
    #[error("XML error: {0}")]
    Xml(String),
}
