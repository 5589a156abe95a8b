//! Pre-send transform seam.

use std::fmt;

use magento_rest_sdk::RequestDescriptor;

use super::error::DomainError;
use super::params::ItemParameters;

/// A step that rewrites a request after the static merge and before dispatch.
///
/// Transforms are built once with the registry and invoked once per item.
/// They run in registration order: operation-level first, then field-level in
/// field declaration order.
pub trait PreSendTransform: Send + Sync + fmt::Debug {
    /// Produce the updated request for the item described by `params`.
    ///
    /// # Errors
    /// Returns a `DomainError` when a parameter the transform reads is missing
    /// or malformed.
    fn apply(
        &self,
        request: RequestDescriptor,
        params: &ItemParameters<'_>,
    ) -> Result<RequestDescriptor, DomainError>;
}
