use std::io;
use thiserror::Error;

/// Custom error type for the oledsense daemon
#[derive(Error, Debug)]
pub enum OledSenseError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("GameSense address error: {0}")]
    Address(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Hardware provider error: {0}")]
    Provider(String),
}

/// Result type alias for the oledsense daemon
pub type Result<T> = std::result::Result<T, OledSenseError>;

impl OledSenseError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        OledSenseError::Config(msg.into())
    }

    /// Create an address error
    pub fn address<S: Into<String>>(msg: S) -> Self {
        OledSenseError::Address(msg.into())
    }

    /// Create a delivery error
    pub fn delivery<S: Into<String>>(msg: S) -> Self {
        OledSenseError::Delivery(msg.into())
    }

    pub fn provider<S: Into<String>>(msg: S) -> Self {
        OledSenseError::Provider(msg.into())
    }
}
