//! Store view options for the `websiteCode` dropdown.

use std::collections::BTreeMap;

use magento_rest_sdk::models::AUTHORIZATION_HEADER;
use magento_rest_sdk::{
    CredentialSource, Credentials, HttpMethod, HttpTransport, MagentoRestError, OptionEntry, RequestDescriptor,
};
use serde_json::Value;
use tracing::instrument;

pub const STORE_VIEWS_PATH: &str = "/rest/V1/store/storeViews";

fn base_options() -> Vec<OptionEntry> {
    vec![
        OptionEntry::new("Default (no code)", ""),
        OptionEntry::new("All Stores", "all"),
    ]
}

fn fallback_options() -> Vec<OptionEntry> {
    let mut options = base_options();
    options.push(OptionEntry::new("Default Store", "default"));
    options
}

/// Load selectable store view codes.
///
/// Never fails: missing credentials yield the two base entries, any other
/// failure yields the base entries plus `default`.
#[instrument(name = "magento_rest.load_store_views", skip_all, fields(credential_kind = %credential_kind))]
pub async fn load_store_view_codes(
    credentials: &dyn CredentialSource,
    credential_kind: &str,
    transport: &dyn HttpTransport,
) -> Vec<OptionEntry> {
    match fetch_store_views(credentials, credential_kind, transport).await {
        Ok(Some(views)) => {
            let mut options = base_options();
            options.extend(views);
            options
        }
        Ok(None) => {
            tracing::warn!("Missing credentials for store view lookup, returning defaults");
            base_options()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load store view codes");
            fallback_options()
        }
    }
}

async fn fetch_store_views(
    credentials: &dyn CredentialSource,
    credential_kind: &str,
    transport: &dyn HttpTransport,
) -> Result<Option<Vec<OptionEntry>>, MagentoRestError> {
    let credentials = credentials.get_credentials(credential_kind).await?;
    let base_url = credentials.base_url().or_else(|| legacy_domain(&credentials));
    let (Some(base_url), Some(token)) = (base_url, credentials.token()) else {
        return Ok(None);
    };

    let mut headers = BTreeMap::new();
    headers.insert(AUTHORIZATION_HEADER.to_owned(), format!("Bearer {token}"));
    headers.insert("Content-Type".to_owned(), "application/json".to_owned());
    let request = RequestDescriptor {
        method: HttpMethod::Get,
        base_url: Some(base_url),
        url: STORE_VIEWS_PATH.to_owned(),
        headers,
        ..RequestDescriptor::default()
    };

    let response = transport
        .request(&request)
        .await
        .map_err(|e| MagentoRestError::RemoteRequest {
            message: e.to_string(),
            status: e.status(),
            status_text: None,
            body: e.data().cloned(),
        })?;

    Ok(Some(store_view_options(&response)))
}

/// Older credential records carry the store URL as `domain` instead of `host`.
fn legacy_domain(credentials: &Credentials) -> Option<String> {
    let domain = credentials.extra.get("domain")?.as_str()?.trim();
    let domain = domain.strip_suffix('/').unwrap_or(domain);
    (!domain.is_empty()).then(|| domain.to_owned())
}

/// Entries with a code, skipping the admin view (id 0).
fn store_view_options(response: &Value) -> Vec<OptionEntry> {
    let views = match response {
        Value::Array(views) => views.as_slice(),
        Value::Object(object) => object
            .get("items")
            .or_else(|| object.get("data"))
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice),
        _ => &[],
    };

    views
        .iter()
        .filter_map(|view| {
            let code = view.get("code")?.as_str().filter(|c| !c.is_empty())?;
            if view.get("id").and_then(Value::as_i64) == Some(0) {
                return None;
            }
            let name = match view.get("name").and_then(Value::as_str) {
                Some(name) if !name.is_empty() => format!("{name} ({code})"),
                _ => code.to_owned(),
            };
            Some(OptionEntry::new(name, code))
        })
        .collect()
}
