//! Error types for the synchronizer
//!
//! This module defines all error types used throughout the crate.
//!
//! Note that "rule not found" is deliberately absent: a missing remote
//! rule is a first-class outcome (`Outcome::Unresolved`), not a failure.

use thiserror::Error;

/// Result type alias for synchronizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the synchronizer
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network-level errors (connect/timeout/read)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status from a remote API
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors (401/403 from the rule store)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Hostname resolution errors
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// IP source-related errors
    #[error("IP source error: {0}")]
    IpSource(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Network(err.to_string())
    }
}
