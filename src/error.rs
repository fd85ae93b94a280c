//! Error types for evonode

use crate::node::registry::OperationKey;
use serde_json::Value;
use thiserror::Error;

/// Dispatcher error type
#[derive(Debug, Error)]
pub enum Error {
    /// No template is registered for the requested pair
    #[error("unsupported operation: {resource}/{operation}")]
    UnsupportedOperation { resource: String, operation: String },

    /// A required parameter is absent or empty
    #[error("missing required parameter '{name}' for {key}")]
    MissingParameter { key: OperationKey, name: String },

    /// No credentials stored under the given name
    #[error("credentials not found: {0}")]
    CredentialsNotFound(String),

    /// Credentials present but unusable
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The outbound call failed
    #[error("request failed for {key}: {source}")]
    Transport {
        key: OperationKey,
        #[source]
        source: TransportError,
    },

    /// The response lacks a field the projection needs
    #[error("unexpected response for {key}: missing '{field}'")]
    Shape {
        key: OperationKey,
        field: &'static str,
        response: Value,
    },
}

/// Failure reported by a [`Transport`](crate::node::host::Transport)
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, DNS or TLS failure
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("API request failed: {status}")]
    Status { status: u16, body: String },

    /// Body was not valid JSON
    #[error("failed to parse response JSON: {0}")]
    Decode(String),
}

impl TransportError {
    /// HTTP status code, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
