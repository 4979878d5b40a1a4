//! Error types for Dgrelay
//!
//! This module defines all custom error types used throughout the application.

use std::io;
use thiserror::Error;

/// Main error type for Dgrelay operations
#[derive(Error, Debug)]
pub enum RelayError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Payload decode error (invalid UTF-8 or malformed JSON)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Relay endpoint answered with a non-success status code
    #[error("Relay endpoint returned status {0}")]
    Status(u16),

    /// HTTP transport failure (timeout, connect, DNS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
