//! Magento REST module configuration.
//!
//! Two ways to load it:
//!
//! 1. **Layered** (`load`): defaults, then an optional YAML file, then
//!    `MAGENTO_REST_*` environment variables, merged with `figment`.
//! 2. **Lenient** (`from_module_section`): a raw JSON module section of the
//!    form `{"config": {...}}`; anything missing falls back to defaults.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::url_template::PathParameterPolicy;

/// Environment variable prefix for layered loading.
pub const ENV_PREFIX: &str = "MAGENTO_REST_";

/// Configuration error.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[source] Box<figment::Error>),
    #[error("invalid config section: {source}")]
    InvalidSection {
        #[source]
        source: serde_json::Error,
    },
}

/// Magento REST module configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MagentoRestConfig {
    /// Credential kind requested from the credential source.
    pub credential_kind: String,
    /// Fail on empty path parameters instead of rendering them as "".
    pub strict_path_parameters: bool,
    /// Log each request URL at info level.
    pub log_request_urls: bool,
}

impl Default for MagentoRestConfig {
    fn default() -> Self {
        Self {
            credential_kind: "magento2Api".to_owned(),
            strict_path_parameters: false,
            log_request_urls: true,
        }
    }
}

impl MagentoRestConfig {
    /// Load defaults, then `path` (if given), then the environment.
    ///
    /// # Errors
    /// Returns `ConfigError::Load` if a source is unreadable or a value has
    /// the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        Self::from_figment(&figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Extract from a prepared figment.
    ///
    /// # Errors
    /// Returns `ConfigError::Load` if extraction fails.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Lenient loading from a module section.
    ///
    /// Missing module, non-object module, or missing `config` key all give
    /// the defaults.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidSection` if `config` exists but does not
    /// deserialize.
    pub fn from_module_section(section: Option<&Value>) -> Result<Self, ConfigError> {
        let Some(config) = section
            .and_then(Value::as_object)
            .and_then(|module| module.get("config"))
        else {
            return Ok(Self::default());
        };
        serde_json::from_value(config.clone()).map_err(|source| ConfigError::InvalidSection { source })
    }

    pub fn path_policy(&self) -> PathParameterPolicy {
        if self.strict_path_parameters {
            PathParameterPolicy::Strict
        } else {
            PathParameterPolicy::Permissive
        }
    }
}
