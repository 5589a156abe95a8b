// Clippy allows for v1 implementation - to be tightened in v2
#![allow(clippy::doc_markdown)] // Many technical terms without backticks
#![allow(clippy::must_use_candidate)] // Will add systematically in v2

//! Magento REST request pipeline
//!
//! Turns a declared (resource, operation) pair plus per-item parameter values
//! into concrete HTTP requests against a Magento REST API, and normalizes the
//! responses and error bodies that come back.
//!
//! ## Architecture
//!
//! ```text
//!        Host (parameters, credentials, transport)
//!                        │
//!                        ▼
//! ┌──────────────────────────────────────────┐
//! │               Dispatcher                 │
//! │   one item at a time, at least once      │
//! │                   │                      │
//! │                   ▼                      │
//! │  ┌────────────────────────────────────┐  │
//! │  │         Request assembler          │  │
//! │  │  - Operation registry lookup       │  │
//! │  │  - URL template evaluation         │  │
//! │  │  - Field query/body contributions  │  │
//! │  │  - Pre-send transforms             │  │
//! │  │    (searchCriteria, JSON bodies)   │  │
//! │  └────────────────────────────────────┘  │
//! │                   │                      │
//! │                   ▼ HttpTransport        │
//! │       response / error normalization     │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use magento_rest::{Dispatcher, MagentoRestConfig, domain::catalog};
//!
//! let registry = Arc::new(catalog::magento_registry()?);
//! let dispatcher = Dispatcher::new(registry, credentials, transport, &MagentoRestConfig::default());
//! let records = dispatcher.run_all(&params, items.len(), continue_on_fail).await?;
//! ```

// === PUBLIC API (from SDK) ===
pub use magento_rest_sdk::{
    // Port traits
    CredentialSource,
    // Models
    Credentials,
    HttpMethod,
    HttpTransport,
    // Error types
    MagentoRestError,
    OptionEntry,
    OutputRecord,
    ParameterSource,
    RequestBody,
    RequestDescriptor,
    Selection,
    TransportError,
};

// === CONFIGURATION ===
pub mod config;
pub use config::MagentoRestConfig;

// === DOMAIN ===
pub mod domain;
pub use domain::catalog::magento_registry;
pub use domain::error::DomainError;
pub use domain::registry::{FieldBinding, FieldKind, OperationRegistry, OperationTemplate};
pub use domain::service::Dispatcher;
