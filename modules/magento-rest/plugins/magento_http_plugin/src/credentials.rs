//! Credential source backed by plugin configuration.

use async_trait::async_trait;
use magento_rest_sdk::{CredentialSource, Credentials, MagentoRestError};
use secrecy::{ExposeSecret, SecretString};

use crate::config::HttpPluginConfig;

/// Serves one fixed set of credentials for a single credential kind.
#[derive(Debug)]
pub struct StaticCredentialSource {
    kind: String,
    host: Option<String>,
    access_token: Option<SecretString>,
}

impl StaticCredentialSource {
    pub fn new(kind: impl Into<String>, host: Option<String>, access_token: Option<SecretString>) -> Self {
        Self {
            kind: kind.into(),
            host,
            access_token,
        }
    }

    pub fn from_config(config: &HttpPluginConfig) -> Self {
        Self::new(
            config.credential_kind.clone(),
            config.host.clone(),
            config
                .access_token
                .as_ref()
                .map(|t| SecretString::from(t.expose_secret().to_owned())),
        )
    }
}

#[async_trait]
impl CredentialSource for StaticCredentialSource {
    async fn get_credentials(&self, kind: &str) -> Result<Credentials, MagentoRestError> {
        if kind != self.kind {
            return Err(MagentoRestError::credentials(format!(
                "no credentials of kind '{kind}' configured"
            )));
        }
        Ok(Credentials::new(
            self.host.clone(),
            self.access_token
                .as_ref()
                .map(|t| SecretString::from(t.expose_secret().to_owned())),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_configured_kind_only() {
        let config = HttpPluginConfig {
            host: Some("https://shop.example.com/".to_owned()),
            access_token: Some(SecretString::from("tok".to_owned())),
            ..HttpPluginConfig::default()
        };
        let source = StaticCredentialSource::from_config(&config);

        let credentials = source.get_credentials("magento2Api").await.unwrap();
        assert_eq!(credentials.base_url().as_deref(), Some("https://shop.example.com"));
        assert_eq!(credentials.token(), Some("tok"));

        let err = source.get_credentials("magentoOAuth").await.unwrap_err();
        assert!(matches!(err, MagentoRestError::Credentials { .. }));
    }
}
