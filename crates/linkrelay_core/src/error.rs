//! Relay error types

use thiserror::Error;

/// Relay-related errors
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration values are unusable
    #[error("Invalid relay configuration: {0}")]
    InvalidConfig(String),

    /// Failed to parse a TOML configuration
    #[error("Failed to parse relay configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Failed to serialize a configuration back to TOML
    #[error("Failed to serialize relay configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A channel frame could not be encoded or decoded
    #[error("Method codec error: {0}")]
    Codec(String),

    /// The runtime messenger rejected an outbound message
    #[error("Messenger send failed: {0}")]
    Messenger(String),

    /// Failed to read a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Codec(err.to_string())
    }
}

/// Result type for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;
