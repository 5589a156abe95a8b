//! Magento REST error types.
//!
//! Transport-agnostic error definitions shared by the pipeline and its host.

use serde_json::Value;
use thiserror::Error;

/// Failure reported by an `HttpTransport`.
///
/// `Response` mirrors the `{response: {status, statusText, data}}` shape a
/// non-2xx reply produces; `Transport` covers failures with no response at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The remote answered with a non-2xx status.
    #[error("request failed with status code {status}")]
    Response {
        status: u16,
        status_text: String,
        data: Option<Value>,
    },

    /// Network, TLS or timeout failure before a response was received.
    #[error("{message}")]
    Transport { message: String },
}

impl TransportError {
    /// Create a response error.
    #[must_use]
    pub fn response(status: u16, status_text: impl Into<String>, data: Option<Value>) -> Self {
        Self::Response {
            status,
            status_text: status_text.into(),
            data,
        }
    }

    /// Create a transport-level error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// HTTP status, when a response exists.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    /// Remote body, when a response with a body exists.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Response { data, .. } => data.as_ref(),
            Self::Transport { .. } => None,
        }
    }
}

/// Error type for Magento REST pipeline operations.
#[derive(Error, Debug, Clone)]
pub enum MagentoRestError {
    /// No template registered for the selection.
    #[error("unknown operation '{operation}' for resource '{resource}'")]
    UnknownOperation { resource: String, operation: String },

    /// A referenced parameter is not declared for the selection.
    #[error("could not get parameter '{name}'")]
    MissingParameter { name: String },

    /// A JSON-typed parameter failed to parse.
    #[error("Invalid JSON in {name}: {message}")]
    InvalidJsonParameter { name: String, message: String },

    /// A parameter violates its declared type or allowed values.
    #[error("invalid value for parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// The remote request failed; `message` is already formatted.
    #[error("{message}")]
    RemoteRequest {
        message: String,
        status: Option<u16>,
        status_text: Option<String>,
        body: Option<Value>,
    },

    /// The credential source failed.
    #[error("credentials unavailable: {message}")]
    Credentials { message: String },

    /// Registry or template misconfiguration.
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl MagentoRestError {
    /// Create an unknown operation error.
    #[must_use]
    pub fn unknown_operation(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            resource: resource.into(),
            operation: operation.into(),
        }
    }

    /// Create a missing parameter error.
    #[must_use]
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Create a credentials error.
    #[must_use]
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// HTTP status of the remote failure, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RemoteRequest { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether this is a remote-call failure (the only kind continue-on-fail absorbs).
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteRequest { .. })
    }
}
