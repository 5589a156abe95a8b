// Clippy allows for v1 implementation - to be tightened in v2
#![allow(clippy::doc_markdown)] // Many technical terms without backticks
#![allow(clippy::must_use_candidate)] // Will add systematically in v2

//! Magento HTTP Plugin
//!
//! Concrete bindings of the Magento REST port traits:
//!
//! - [`ReqwestTransport`]: `HttpTransport` over a pooled `reqwest::Client`
//! - [`StaticCredentialSource`]: `CredentialSource` serving host and token
//!   from plugin configuration
//!
//! Retries, caching and rate limiting are deliberately absent; each request
//! is sent exactly once with the configured timeout.

pub mod config;
pub mod credentials;
pub mod service;

pub use config::HttpPluginConfig;
pub use credentials::StaticCredentialSource;
pub use service::ReqwestTransport;
