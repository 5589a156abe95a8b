//! Dispatcher: runs the selected operation once per input item.
//!
//! Items are processed strictly in order. Each item is assembled, given
//! credentials, sent through the transport and turned into one
//! [`OutputRecord`]. Remote failures either become an error record
//! (continue-on-fail) or abort the batch; every other error aborts.

use std::sync::Arc;

use magento_rest_sdk::{
    CredentialSource, HttpTransport, MagentoRestError, OutputRecord, ParameterSource, Selection,
    TransportError,
};
use serde_json::{Map, Value};
use tracing::{info_span, instrument, Instrument};

use super::assembler::{apply_credentials, assemble};
use super::error::DomainError;
use super::error_format::format_remote_error;
use super::params::{ItemParameters, ParameterResolver};
use super::registry::{OperationRegistry, OperationTemplate};
use super::url_template::PathParameterPolicy;
use crate::config::MagentoRestConfig;

/// Dispatcher settings extracted from module config.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Credential kind requested from the credential source.
    pub credential_kind: String,
    /// Handling of empty path parameters.
    pub path_policy: PathParameterPolicy,
    /// Log method and full URL of each request at `info` (otherwise `debug`).
    pub log_request_urls: bool,
}

impl From<&MagentoRestConfig> for DispatcherConfig {
    fn from(cfg: &MagentoRestConfig) -> Self {
        Self {
            credential_kind: cfg.credential_kind.clone(),
            path_policy: cfg.path_policy(),
            log_request_urls: cfg.log_request_urls,
        }
    }
}

/// Executes operations against the remote API.
pub struct Dispatcher {
    registry: Arc<OperationRegistry>,
    credentials: Arc<dyn CredentialSource>,
    transport: Arc<dyn HttpTransport>,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<OperationRegistry>,
        credentials: Arc<dyn CredentialSource>,
        transport: Arc<dyn HttpTransport>,
        config: &MagentoRestConfig,
    ) -> Self {
        Self {
            registry,
            credentials,
            transport,
            config: DispatcherConfig::from(config),
        }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Run the selected operation for `item_count` items (at least once).
    ///
    /// The selection is read from the `resource` and `operation` parameters of
    /// item 0. An unregistered selection yields an empty result.
    ///
    /// # Errors
    /// Returns the first non-recoverable error: parameter, JSON or credential
    /// failures always, remote failures unless `continue_on_fail` is set.
    #[instrument(skip(self, params))]
    pub async fn run_all(
        &self,
        params: &dyn ParameterSource,
        item_count: usize,
        continue_on_fail: bool,
    ) -> Result<Vec<OutputRecord>, MagentoRestError> {
        let selection = Selection::new(
            selection_part(params, "resource")?,
            selection_part(params, "operation")?,
        );

        let template = match self.registry.lookup(&selection.resource, &selection.operation) {
            Ok(template) => template,
            Err(DomainError::UnknownOperation { .. }) => {
                tracing::debug!(%selection, "No operation registered, returning no records");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let resolver = ParameterResolver::new(
            params,
            &self.registry,
            &selection,
            self.config.path_policy,
        );

        let runs = item_count.max(1);
        let mut records = Vec::with_capacity(runs);
        for index in 0..runs {
            let item = resolver.for_item(index);
            match self.run_item(template, &item).await {
                Ok(json) => records.push(OutputRecord {
                    json,
                    source_item_index: index,
                }),
                Err(ItemFailure::Remote(err)) if continue_on_fail => {
                    records.push(OutputRecord {
                        json: error_record(&err),
                        source_item_index: index,
                    });
                }
                Err(ItemFailure::Remote(err)) => return Err(terminal_error(err)),
                Err(ItemFailure::Local(err)) => return Err(err),
            }
        }

        tracing::info!(%selection, records = records.len(), "Operation completed");
        Ok(records)
    }

    async fn run_item(
        &self,
        template: &OperationTemplate,
        params: &ItemParameters<'_>,
    ) -> Result<Value, ItemFailure> {
        let request = assemble(&self.registry, template, params)
            .map_err(|e| ItemFailure::Local(e.into()))?;

        let credentials = self
            .credentials
            .get_credentials(&self.config.credential_kind)
            .await
            .map_err(ItemFailure::Local)?;
        let request = apply_credentials(request, &credentials);

        let full_url = request.full_url();
        if self.config.log_request_urls {
            tracing::info!(method = %request.method, url = %full_url, "Magento REST request");
        } else {
            tracing::debug!(method = %request.method, url = %full_url, "Magento REST request");
        }

        self.transport
            .request(&request)
            .instrument(info_span!("transport_request", item = params.item_index()))
            .await
            .map_err(|err| {
                let body = err.data().map_or_else(String::new, Value::to_string);
                tracing::warn!(
                    status_code = err.status(),
                    body = %body,
                    error = %err,
                    "Magento REST request failed"
                );
                ItemFailure::Remote(err)
            })
    }
}

enum ItemFailure {
    /// Transport failure; recoverable with continue-on-fail.
    Remote(TransportError),
    Local(MagentoRestError),
}

fn selection_part(params: &dyn ParameterSource, name: &str) -> Result<String, MagentoRestError> {
    match params.get_value(name, 0) {
        Some(Value::String(s)) => Ok(s),
        Some(other) if !other.is_null() => Ok(other.to_string()),
        _ => Err(MagentoRestError::missing_parameter(name)),
    }
}

/// Body worth formatting: null and the empty string count as no body.
fn remote_body(err: &TransportError) -> Option<&Value> {
    err.data().filter(|data| match data {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

fn remote_message(err: &TransportError) -> String {
    match remote_body(err) {
        Some(body) => format_remote_error(Some(body)),
        None => err.to_string(),
    }
}

/// `{error, statusCode?, statusText?, errorDetails?}`.
fn error_record(err: &TransportError) -> Value {
    let mut record = Map::new();
    record.insert("error".to_owned(), Value::String(remote_message(err)));
    if let TransportError::Response {
        status,
        status_text,
        ..
    } = err
    {
        record.insert("statusCode".to_owned(), Value::from(*status));
        record.insert("statusText".to_owned(), Value::String(status_text.clone()));
    }
    if let Some(details) = remote_body(err).filter(|b| b.is_object() || b.is_array()) {
        record.insert("errorDetails".to_owned(), details.clone());
    }
    Value::Object(record)
}

fn terminal_error(err: TransportError) -> MagentoRestError {
    let message = remote_message(&err);
    match err {
        TransportError::Response {
            status,
            status_text,
            data,
        } => MagentoRestError::RemoteRequest {
            message,
            status: Some(status),
            status_text: Some(status_text),
            body: data,
        },
        TransportError::Transport { .. } => MagentoRestError::RemoteRequest {
            message,
            status: None,
            status_text: None,
            body: None,
        },
    }
}
