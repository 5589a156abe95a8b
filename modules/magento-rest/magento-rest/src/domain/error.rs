//! Domain errors for the Magento REST pipeline.

use magento_rest_sdk::MagentoRestError;
use thiserror::Error;

/// Domain-level errors raised while building requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No template registered for (resource, operation).
    #[error("unknown operation '{operation}' for resource '{resource}'")]
    UnknownOperation { resource: String, operation: String },

    /// Parameter not declared for the active selection and no fallback given,
    /// or an empty path parameter under strict evaluation.
    #[error("could not get parameter '{name}'")]
    MissingParameter { name: String },

    /// A JSON-typed parameter failed to parse.
    #[error("Invalid JSON in {name}: {message}")]
    InvalidJsonParameter { name: String, message: String },

    /// A parameter violates its declared kind or allowed values.
    #[error("invalid value for parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// URL pattern could not be parsed.
    #[error("invalid url template '{pattern}': {message}")]
    InvalidUrlTemplate { pattern: String, message: String },

    /// Two templates registered for the same selection.
    #[error("operation '{operation}' already registered for resource '{resource}'")]
    DuplicateOperation { resource: String, operation: String },
}

impl DomainError {
    /// Create a missing parameter error.
    #[must_use]
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Create an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid JSON parameter error.
    #[must_use]
    pub fn invalid_json(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidJsonParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid URL template error.
    #[must_use]
    pub fn invalid_url_template(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUrlTemplate {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

/// Convert DomainError to SDK MagentoRestError.
impl From<DomainError> for MagentoRestError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::UnknownOperation {
                resource,
                operation,
            } => Self::unknown_operation(resource, operation),
            DomainError::MissingParameter { name } => Self::missing_parameter(name),
            DomainError::InvalidJsonParameter { name, message } => {
                Self::InvalidJsonParameter { name, message }
            }
            DomainError::InvalidParameter { name, message } => {
                Self::InvalidParameter { name, message }
            }
            e @ (DomainError::InvalidUrlTemplate { .. }
            | DomainError::DuplicateOperation { .. }) => Self::configuration(e.to_string()),
        }
    }
}
