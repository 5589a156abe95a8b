//! Request assembly.
//!
//! Pure functions: a template plus one item's parameters yields a request
//! descriptor, and credentials are attached in a separate step.

use std::collections::BTreeMap;

use magento_rest_sdk::models::AUTHORIZATION_HEADER;
use magento_rest_sdk::{Credentials, RequestBody, RequestDescriptor};
use serde_json::{Map, Value};

use super::error::DomainError;
use super::params::ItemParameters;
use super::registry::{OperationRegistry, OperationTemplate};
use super::values::{is_present, to_plain_string};

const VALUE_PLACEHOLDER: &str = "$value";
const JSON_MEDIA_TYPE: &str = "application/json";

/// Build the request for one item.
///
/// Order of application:
/// 1. URL template evaluation;
/// 2. static template query/body as the base;
/// 3. query/body contributions of applicable fields with a present value,
///    skipping fields that own transforms;
/// 4. operation-level transforms, then field-level transforms in field order.
///
/// # Errors
/// Propagates `DomainError` from parameter resolution, URL evaluation and
/// transforms.
pub fn assemble(
    registry: &OperationRegistry,
    template: &OperationTemplate,
    params: &ItemParameters<'_>,
) -> Result<RequestDescriptor, DomainError> {
    let url = template.url().evaluate(params)?;

    let mut query: BTreeMap<String, String> = template
        .query()
        .map(|q| q.iter().map(|(k, v)| (k.clone(), to_plain_string(v))).collect())
        .unwrap_or_default();
    let mut body = Map::new();

    let fields: Vec<_> = registry.fields_for(template.selection()).collect();

    for field in fields.iter().filter(|f| !f.owns_transforms()) {
        let (field_query, field_body) = (field.query_contribution(), field.body_contribution());
        if field_query.is_none() && field_body.is_none() {
            continue;
        }
        let value = params.get(field.name())?;
        if !is_present(&value) {
            continue;
        }
        if let Some(contribution) = field_query {
            for (key, template_value) in contribution {
                let rendered = substitute_value(template_value, &value);
                query.insert(key.clone(), to_plain_string(&rendered));
            }
        }
        if let Some(contribution) = field_body {
            for (key, template_value) in contribution {
                body.insert(key.clone(), substitute_value(template_value, &value));
            }
        }
    }

    let body = match template.body() {
        Some(static_body) => {
            let mut merged = static_body.clone();
            merged.extend(body);
            Some(RequestBody::Json(Value::Object(merged)))
        }
        None if !body.is_empty() => Some(RequestBody::Json(Value::Object(body))),
        None => None,
    };

    let mut headers = BTreeMap::new();
    headers.insert("Accept".to_owned(), JSON_MEDIA_TYPE.to_owned());
    headers.insert("Content-Type".to_owned(), JSON_MEDIA_TYPE.to_owned());

    let mut request = RequestDescriptor {
        method: template.method(),
        base_url: None,
        url,
        query,
        body,
        headers,
    };

    for transform in template.transforms() {
        request = transform.apply(request, params)?;
    }
    for field in fields.iter().filter(|f| f.owns_transforms()) {
        for transform in field.transforms() {
            request = transform.apply(request, params)?;
        }
    }

    Ok(request)
}

/// Attach base URL and bearer token.
///
/// The base URL is the credential host without a trailing slash and is only
/// set when the request has none.
#[must_use]
pub fn apply_credentials(mut request: RequestDescriptor, credentials: &Credentials) -> RequestDescriptor {
    if request.base_url.is_none() {
        request.base_url = credentials.base_url();
    }
    if let Some(token) = credentials.token() {
        request
            .headers
            .insert(AUTHORIZATION_HEADER.to_owned(), format!("Bearer {token}"));
    }
    request
}

/// `$value` inside a string contribution is replaced by the field value;
/// any other contribution takes the raw value.
fn substitute_value(template_value: &Value, value: &Value) -> Value {
    match template_value {
        Value::String(s) if s.contains(VALUE_PLACEHOLDER) => {
            Value::String(s.replace(VALUE_PLACEHOLDER, &to_plain_string(value)))
        }
        _ => value.clone(),
    }
}
