//! Error types for the Ilana workflow

use thiserror::Error;

/// Result type alias for Ilana operations
pub type IlanaResult<T> = Result<T, IlanaError>;

/// Main error type for the Ilana workflow
#[derive(Error, Debug, Clone)]
pub enum IlanaError {
    /// Network failure or non-success HTTP status from the analysis service
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// Response body could not be decoded into a canonical type
    #[error("response decode error: {0}")]
    Decode(String),

    /// Document host call failed
    #[error("document host error: {0}")]
    Host(String),

    /// Configuration related errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid input errors (unknown finding id, empty text, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl IlanaError {
    /// Create a new connectivity error
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity(message.into())
    }

    /// Create a new decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a new document host error
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// True when the error represents a failed or unreachable service call
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }
}

impl From<reqwest::Error> for IlanaError {
    fn from(error: reqwest::Error) -> Self {
        Self::Connectivity(error.to_string())
    }
}

impl From<serde_json::Error> for IlanaError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

impl From<anyhow::Error> for IlanaError {
    fn from(error: anyhow::Error) -> Self {
        Self::Other(error.to_string())
    }
}
