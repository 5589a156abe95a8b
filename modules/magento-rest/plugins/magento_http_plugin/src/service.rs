//! reqwest-backed implementation of `HttpTransport`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use magento_rest_sdk::{HttpMethod, HttpTransport, MagentoRestError, RequestDescriptor, TransportError};
use serde_json::Value;
use tracing::{info_span, instrument, Instrument};

use crate::config::HttpPluginConfig;

/// HTTP transport over a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport from plugin configuration.
    ///
    /// # Errors
    /// Returns `MagentoRestError::Configuration` if the client cannot be built.
    pub fn new(config: &HttpPluginConfig) -> Result<Self, MagentoRestError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| MagentoRestError::configuration(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    fn map_send_error(e: &reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::transport(format!("request timed out: {e}"))
        } else if e.is_connect() {
            TransportError::transport(format!("connection error: {e}"))
        } else {
            TransportError::transport(format!("request error: {e}"))
        }
    }
}

/// Interpret a response body: empty is `null`, non-JSON is kept as a string.
fn parse_body(bytes: &[u8]) -> Value {
    let text = String::from_utf8_lossy(bytes);
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text.into_owned()))
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, target_url))]
    async fn request(&self, request: &RequestDescriptor) -> Result<Value, TransportError> {
        let start = Instant::now();

        let url = request.full_url();
        tracing::Span::current().record("target_url", url.as_str());

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_wire_string());
        }

        let response = builder
            .send()
            .instrument(info_span!("http_request"))
            .await
            .map_err(|e| Self::map_send_error(&e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::transport(format!("failed to read response body: {e}")))?;

        // Duration in ms is always small enough for u64 in practice
        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            status_code = status.as_u16(),
            duration_ms,
            body_size = bytes.len(),
            "HTTP request completed"
        );

        let data = parse_body(&bytes);
        if status.is_success() {
            return Ok(data);
        }
        Err(TransportError::response(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            (!data.is_null()).then_some(data),
        ))
    }
}
