use magento_rest_sdk::HttpMethod;
use serde_json::json;

use super::transforms::{JsonBody, SearchCriteriaList};
use super::{register_fields, search_criteria_field, simplify_output_field, website_code_field};
use crate::domain::error::DomainError;
use crate::domain::registry::{FieldBinding, FieldKind, OperationRegistryBuilder, OperationTemplate};

const RESOURCE: &str = "product";
const OPERATIONS: [&str; 5] = ["create", "get", "update", "delete", "list"];
const BY_SKU: &str = r#"={{"/rest/V1/products/" + $parameter["sku"]}}"#;

pub(super) fn register(builder: OperationRegistryBuilder) -> Result<OperationRegistryBuilder, DomainError> {
    let builder = builder
        .operation(OperationTemplate::new(RESOURCE, "create", HttpMethod::Post, "/rest/V1/products")?.empty_body())
        .operation(OperationTemplate::new(RESOURCE, "get", HttpMethod::Get, BY_SKU)?)
        .operation(OperationTemplate::new(RESOURCE, "update", HttpMethod::Put, BY_SKU)?.empty_body())
        .operation(OperationTemplate::new(RESOURCE, "delete", HttpMethod::Delete, BY_SKU)?)
        .operation(
            OperationTemplate::new(RESOURCE, "list", HttpMethod::Get, "/rest/V1/products")?
                .transform(SearchCriteriaList::new("/products")),
        );

    let mut store_id = serde_json::Map::new();
    store_id.insert("storeId".to_owned(), json!("$value"));

    Ok(register_fields(
        builder,
        vec![
            FieldBinding::new("sku", FieldKind::String)
                .required()
                .default_value(json!(""))
                .applies_to(RESOURCE, &["get", "update", "delete"]),
            FieldBinding::new("productData", FieldKind::Json)
                .required()
                .default_value(json!(""))
                .applies_to(RESOURCE, &["create", "update"])
                .transform(JsonBody::new("product", "productData")),
            FieldBinding::new("storeId", FieldKind::Number)
                .applies_to(RESOURCE, &["get"])
                .query(store_id),
            search_criteria_field(RESOURCE),
            website_code_field(RESOURCE, &OPERATIONS),
            simplify_output_field(RESOURCE, &OPERATIONS),
        ],
    ))
}
