//! Magento REST domain models.
//!
//! These are the transport-agnostic types exchanged between the pipeline and
//! its host: the request descriptor handed to the transport, the credential
//! material, and the per-item output record.

use std::collections::BTreeMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Map, Value};

/// Header carrying the bearer token; redacted from `Debug` output.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// HTTP method for outbound requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Convert to uppercase string representation.
    #[must_use]
    #[allow(clippy::trivially_copy_pass_by_ref)] // Consistent API with other enums
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The active (resource, operation) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    pub resource: String,
    pub operation: String,
}

impl Selection {
    #[must_use]
    pub fn new(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            operation: operation.into(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.operation)
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document, serialized by the transport.
    Json(Value),
    /// Pre-serialized body sent as-is.
    Raw(String),
}

impl RequestBody {
    /// Serialize the body to the exact bytes put on the wire.
    #[must_use]
    pub fn to_wire_string(&self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Raw(raw) => raw.clone(),
        }
    }
}

/// A fully assembled outbound request.
///
/// Built fresh for every item and handed to the transport by reference.
#[derive(Clone, PartialEq, Default)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: HttpMethod,
    /// Base URL (scheme and host) taken from the credentials.
    pub base_url: Option<String>,
    /// Path, possibly already carrying an encoded query string.
    pub url: String,
    /// Query parameters not yet folded into `url`.
    pub query: BTreeMap<String, String>,
    /// Optional request body.
    pub body: Option<RequestBody>,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
}

impl RequestDescriptor {
    /// Join base URL, path and the encoded `query` mapping.
    #[must_use]
    pub fn full_url(&self) -> String {
        let mut url = format!("{}{}", self.base_url.as_deref().unwrap_or(""), self.url);
        if !self.query.is_empty() {
            let encoded = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push(if self.url.contains('?') { '&' } else { '?' });
            url.push_str(&encoded);
        }
        url
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: BTreeMap<&str, &str> = self
            .headers
            .iter()
            .map(|(k, v)| {
                if k.eq_ignore_ascii_case(AUTHORIZATION_HEADER) {
                    (k.as_str(), "[REDACTED]")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("base_url", &self.base_url)
            .field("url", &self.url)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("headers", &headers)
            .finish()
    }
}

/// Credential material resolved by the host.
///
/// Both `host` and `access_token` may be absent; consumers fall back instead
/// of failing.
#[derive(Debug, Default)]
pub struct Credentials {
    /// Base URL of the remote store, e.g. `https://shop.example.com/`.
    pub host: Option<String>,
    /// Integration access token sent as a bearer token.
    pub access_token: Option<SecretString>,
    /// Any other fields the credential type carries.
    pub extra: Map<String, Value>,
}

impl Credentials {
    #[must_use]
    pub fn new(host: Option<String>, access_token: Option<SecretString>) -> Self {
        Self {
            host,
            access_token,
            extra: Map::new(),
        }
    }

    /// Host without a trailing slash, if present and non-empty.
    #[must_use]
    pub fn base_url(&self) -> Option<String> {
        self.host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(|h| h.strip_suffix('/').unwrap_or(h).to_owned())
    }

    /// Access token, if present and non-empty.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.access_token
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .filter(|t| !t.is_empty())
    }
}

/// One output item, paired with the input item that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    /// Remote payload verbatim, or the structured error payload.
    pub json: Value,
    /// Index of the input item.
    pub source_item_index: usize,
}

/// Entry of a host dropdown list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionEntry {
    pub name: String,
    pub value: String,
}

impl OptionEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_url_joins_base_and_query() {
        let mut req = RequestDescriptor {
            base_url: Some("https://shop.example.com".to_owned()),
            url: "/rest/V1/products/ABC".to_owned(),
            ..Default::default()
        };
        req.query.insert("storeId".to_owned(), "1".to_owned());

        assert_eq!(
            req.full_url(),
            "https://shop.example.com/rest/V1/products/ABC?storeId=1"
        );
    }

    #[test]
    fn test_full_url_appends_to_existing_query() {
        let mut req = RequestDescriptor {
            url: "/rest/V1/products?a=1".to_owned(),
            ..Default::default()
        };
        req.query.insert("b".to_owned(), "x y".to_owned());

        assert_eq!(req.full_url(), "/rest/V1/products?a=1&b=x%20y");
    }

    #[test]
    fn test_debug_redacts_authorization() {
        let mut req = RequestDescriptor::default();
        req.headers
            .insert(AUTHORIZATION_HEADER.to_owned(), "Bearer secret-token".to_owned());

        let debug = format!("{req:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_credentials_base_url_trims_trailing_slash() {
        let creds = Credentials::new(Some("https://shop.example.com/".to_owned()), None);
        assert_eq!(creds.base_url().as_deref(), Some("https://shop.example.com"));
        assert_eq!(creds.token(), None);

        let empty = Credentials::new(Some(String::new()), Some(SecretString::from(String::new())));
        assert_eq!(empty.base_url(), None);
        assert_eq!(empty.token(), None);
    }

    #[test]
    fn test_output_record_serializes_camel_case() {
        let record = OutputRecord {
            json: json!({"id": 1}),
            source_item_index: 2,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["sourceItemIndex"], 2);
        assert_eq!(value["json"]["id"], 1);
    }

    #[test]
    fn test_body_wire_string() {
        assert_eq!(
            RequestBody::Json(json!({"product": {"sku": "A"}})).to_wire_string(),
            r#"{"product":{"sku":"A"}}"#
        );
        assert_eq!(RequestBody::Raw("raw".to_owned()).to_wire_string(), "raw");
    }
}
