//! Port traits implemented by the host.
//!
//! The pipeline never talks to the outside world directly: parameter values,
//! credentials and the HTTP round trip all arrive through these traits.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{MagentoRestError, TransportError};
use crate::models::{Credentials, RequestDescriptor};

/// Per-item parameter values supplied by the host.
///
/// Returns `None` when the host has no value for `name` at `item_index`;
/// declared defaults are applied by the pipeline, not by the source.
pub trait ParameterSource: Send + Sync {
    fn get_value(&self, name: &str, item_index: usize) -> Option<Value>;
}

/// Credential lookup.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Resolve credentials of the given kind (e.g. `magento2Api`).
    ///
    /// # Errors
    /// Returns `MagentoRestError::Credentials` if the kind is unknown or the
    /// store is unavailable.
    async fn get_credentials(&self, kind: &str) -> Result<Credentials, MagentoRestError>;
}

/// Executes one prepared request.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request and return the decoded response payload.
    ///
    /// # Errors
    /// Returns `TransportError::Response` for non-2xx replies and
    /// `TransportError::Transport` when no response was received.
    async fn request(&self, request: &RequestDescriptor) -> Result<Value, TransportError>;
}
