//! Plugin configuration.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

/// Configuration for the Magento HTTP plugin.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpPluginConfig {
    /// Timeout for a whole request in milliseconds.
    pub timeout_ms: u64,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Store base URL, e.g. `https://shop.example.com`.
    pub host: Option<String>,
    /// Integration access token.
    #[serde(deserialize_with = "deserialize_secret")]
    pub access_token: Option<SecretString>,
    /// Credential kind served by the static credential source.
    pub credential_kind: String,
}

impl Default for HttpPluginConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            user_agent: concat!("magento-rest/", env!("CARGO_PKG_VERSION")).to_owned(),
            host: None,
            access_token: None,
            credential_kind: "magento2Api".to_owned(),
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn test_defaults_and_partial_override() {
        let config: HttpPluginConfig = serde_json::from_value(json!({
            "host": "https://shop.example.com",
            "access_token": "tok"
        }))
        .unwrap();

        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.credential_kind, "magento2Api");
        assert_eq!(config.host.as_deref(), Some("https://shop.example.com"));
        assert_eq!(config.access_token.as_ref().map(ExposeSecret::expose_secret), Some("tok"));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<HttpPluginConfig, _> = serde_json::from_value(json!({"retries": 3}));
        assert!(result.is_err());
    }
}
