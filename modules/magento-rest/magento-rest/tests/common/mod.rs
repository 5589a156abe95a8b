#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common test utilities for magento-rest integration tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use magento_rest::{
    CredentialSource, Credentials, Dispatcher, HttpTransport, MagentoRestConfig, MagentoRestError,
    ParameterSource, RequestDescriptor, TransportError, magento_registry,
};
use secrecy::SecretString;
use serde_json::Value;

pub const HOST: &str = "https://shop.example.com/";

/// Parameters shared by all items, with per-item overrides.
#[derive(Debug, Default)]
pub struct ItemParams {
    shared: HashMap<String, Value>,
    per_item: HashMap<(usize, String), Value>,
}

impl ItemParams {
    pub fn new(resource: &str, operation: &str) -> Self {
        Self::default()
            .with("resource", Value::from(resource))
            .with("operation", Value::from(operation))
    }

    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.shared.insert(name.to_owned(), value);
        self
    }

    pub fn with_item(mut self, index: usize, name: &str, value: Value) -> Self {
        self.per_item.insert((index, name.to_owned()), value);
        self
    }
}

impl ParameterSource for ItemParams {
    fn get_value(&self, name: &str, item_index: usize) -> Option<Value> {
        self.per_item
            .get(&(item_index, name.to_owned()))
            .or_else(|| self.shared.get(name))
            .cloned()
    }
}

/// Credential source returning fixed host and token.
pub struct StaticCredentials {
    host: Option<String>,
    token: Option<String>,
    domain: Option<String>,
}

impl StaticCredentials {
    pub fn new(host: Option<&str>, token: Option<&str>) -> Self {
        Self {
            host: host.map(str::to_owned),
            token: token.map(str::to_owned),
            domain: None,
        }
    }

    /// Legacy `domain` field carried in `Credentials::extra`.
    pub fn with_domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.to_owned());
        self
    }
}

#[async_trait]
impl CredentialSource for StaticCredentials {
    async fn get_credentials(&self, kind: &str) -> Result<Credentials, MagentoRestError> {
        if kind != "magento2Api" {
            return Err(MagentoRestError::credentials(format!("unknown kind {kind}")));
        }
        let mut credentials = Credentials::new(
            self.host.clone(),
            self.token.clone().map(SecretString::from),
        );
        if let Some(domain) = &self.domain {
            credentials
                .extra
                .insert("domain".to_owned(), Value::String(domain.clone()));
        }
        Ok(credentials)
    }
}

/// Transport that records requests and replays scripted results in order.
/// Once the script is exhausted every request gets `{}`.
#[derive(Default)]
pub struct RecordingTransport {
    script: Mutex<VecDeque<Result<Value, TransportError>>>,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl RecordingTransport {
    pub fn new(script: Vec<Result<Value, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> RequestDescriptor {
        self.requests().pop().expect("no request was sent")
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn request(&self, request: &RequestDescriptor) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Value::Object(serde_json::Map::new())))
    }
}

pub fn dispatcher(transport: Arc<RecordingTransport>) -> Dispatcher {
    dispatcher_with(transport, &MagentoRestConfig::default())
}

pub fn dispatcher_with(transport: Arc<RecordingTransport>, config: &MagentoRestConfig) -> Dispatcher {
    Dispatcher::new(
        Arc::new(magento_registry().unwrap()),
        Arc::new(StaticCredentials::new(Some(HOST), Some("secret-token"))),
        transport,
        config,
    )
}
