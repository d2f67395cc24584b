//! Error types for Vaani

use thiserror::Error;

/// Result type alias for Vaani operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Vaani
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Speech capability (recognition or synthesis) is not available on
    /// this platform
    #[error("capability unavailable: {0}")]
    Capability(&'static str),

    /// Recognition session failed
    #[error("recognition error: {0}")]
    Recognition(String),

    /// Speech synthesis failed
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Relay call to the chat gateway failed (non-2xx or transport)
    #[error("relay error: {0}")]
    Relay(String),

    /// Upstream completion API error
    #[error("upstream error: {0}")]
    Upstream(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
