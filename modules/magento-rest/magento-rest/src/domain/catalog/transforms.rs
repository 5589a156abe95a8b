//! Pre-send transforms used by the Magento catalog.

use magento_rest_sdk::{RequestBody, RequestDescriptor};
use serde_json::{Map, Value, json};

use crate::domain::error::DomainError;
use crate::domain::params::ItemParameters;
use crate::domain::search_criteria::{SearchCriteria, append_query, merge_query, to_query_string};
use crate::domain::transform::PreSendTransform;
use crate::domain::url_template::UrlTemplate;
use crate::domain::values::{parse_json_parameter, to_plain_string};

pub const WEBSITE_CODE: &str = "websiteCode";
pub const SEARCH_CRITERIA: &str = "searchCriteria";

const REST_PREFIX: &str = "/rest";
const VERSION_PREFIX: &str = "/V1";

/// `/rest/V1<path>` or `/rest/<code>/V1<path>`.
pub fn magento_url(path: &str, store_code: Option<&str>) -> String {
    match store_code {
        Some(code) => format!("{REST_PREFIX}/{code}{VERSION_PREFIX}{path}"),
        None => format!("{REST_PREFIX}{VERSION_PREFIX}{path}"),
    }
}

/// Store view code for the item, if one is set.
fn store_code(params: &ItemParameters<'_>) -> Result<Option<String>, DomainError> {
    let value = params.get_or(WEBSITE_CODE, Value::String(String::new()))?;
    let code = to_plain_string(&value);
    let code = code.trim();
    Ok((!code.is_empty()).then(|| code.to_owned()))
}

/// Wraps a JSON-typed parameter in a single-key body, e.g. `{"product": {...}}`.
#[derive(Debug, Clone)]
pub struct JsonBody {
    wrapper: &'static str,
    parameter: &'static str,
}

impl JsonBody {
    pub fn new(wrapper: &'static str, parameter: &'static str) -> Self {
        Self { wrapper, parameter }
    }
}

impl PreSendTransform for JsonBody {
    fn apply(
        &self,
        mut request: RequestDescriptor,
        params: &ItemParameters<'_>,
    ) -> Result<RequestDescriptor, DomainError> {
        let raw = params.get_or(self.parameter, Value::String("{}".to_owned()))?;
        let parsed = parse_json_parameter(self.parameter, raw)?;
        let mut body = Map::new();
        body.insert(self.wrapper.to_owned(), parsed);
        request.body = Some(RequestBody::Json(Value::Object(body)));
        Ok(request)
    }
}

/// List operations: scoped URL plus the encoded `searchCriteria` query.
///
/// The encoded query is appended to the URL directly so bracket keys are
/// encoded exactly once; the query mapping is emptied afterwards.
#[derive(Debug, Clone)]
pub struct SearchCriteriaList {
    path: &'static str,
}

impl SearchCriteriaList {
    pub fn new(path: &'static str) -> Self {
        Self { path }
    }
}

impl PreSendTransform for SearchCriteriaList {
    fn apply(
        &self,
        mut request: RequestDescriptor,
        params: &ItemParameters<'_>,
    ) -> Result<RequestDescriptor, DomainError> {
        if let Some(code) = store_code(params)? {
            request.url = magento_url(self.path, Some(&code));
        } else if request.url.is_empty() || request.url.starts_with("/rest/") {
            request.url = magento_url(self.path, None);
        }

        let raw = params.get_or(SEARCH_CRITERIA, json!({}))?;
        let criteria = SearchCriteria::from_parameter(SEARCH_CRITERIA, &raw)?;
        let pairs = merge_query(&request.query, criteria.encode(true));

        request.url = append_query(&request.url, &to_query_string(&pairs));
        request.query.clear();
        Ok(request)
    }
}

/// Stock item update: URL from `sku` and `itemId`, body `{"stockItem": ...}`.
#[derive(Debug, Clone)]
pub struct StockItem {
    url: UrlTemplate,
}

impl StockItem {
    /// # Errors
    /// Returns `InvalidUrlTemplate` if the built-in URL pattern fails to parse.
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self {
            url: UrlTemplate::parse(
                r#"={{"/rest/V1/products/" + $parameter["sku"] + "/stockItems/" + $parameter["itemId"]}}"#,
            )?,
        })
    }
}

impl PreSendTransform for StockItem {
    fn apply(
        &self,
        mut request: RequestDescriptor,
        params: &ItemParameters<'_>,
    ) -> Result<RequestDescriptor, DomainError> {
        request.url = self.url.evaluate(params)?;
        let stock_item = parse_json_parameter("stockData", params.get("stockData")?)?;
        request.body = Some(RequestBody::Json(json!({ "stockItem": stock_item })));
        Ok(request)
    }
}

/// Rewrites `/rest/V1/...` to `/rest/<code>/V1/...` when a store view code is set.
///
/// URLs already carrying a code are left alone.
#[derive(Debug, Clone, Default)]
pub struct StoreScope;

impl PreSendTransform for StoreScope {
    fn apply(
        &self,
        mut request: RequestDescriptor,
        params: &ItemParameters<'_>,
    ) -> Result<RequestDescriptor, DomainError> {
        let Some(code) = store_code(params)? else {
            return Ok(request);
        };
        let unscoped = format!("{REST_PREFIX}{VERSION_PREFIX}");
        if let Some(rest) = request.url.strip_prefix(&unscoped)
            && (rest.is_empty() || rest.starts_with(['/', '?']))
        {
            request.url = magento_url(rest, Some(&code));
        }
        Ok(request)
    }
}
