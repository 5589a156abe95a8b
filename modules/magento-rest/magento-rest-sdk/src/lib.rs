//! Magento REST SDK
//!
//! This crate provides the public contract between the Magento REST request
//! pipeline and the host that embeds it.
//!
//! ## Port traits
//!
//! - `ParameterSource` - per-item parameter values supplied by the host
//! - `CredentialSource` - credential lookup (base URL and access token)
//! - `HttpTransport` - executes one prepared request
//!
//! ## Usage
//!
//! ```ignore
//! use magento_rest_sdk::{HttpTransport, RequestDescriptor};
//!
//! let payload = transport.request(&descriptor).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod models;

// Port traits
pub use api::{CredentialSource, HttpTransport, ParameterSource};

// Error types
pub use error::{MagentoRestError, TransportError};

// Models
pub use models::{
    Credentials, HttpMethod, OptionEntry, OutputRecord, RequestBody, RequestDescriptor,
    Selection,
};
