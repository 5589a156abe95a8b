use magento_rest_sdk::HttpMethod;
use serde_json::json;

use super::transforms::{JsonBody, SearchCriteriaList};
use super::{register_fields, search_criteria_field, simplify_output_field, website_code_field};
use crate::domain::error::DomainError;
use crate::domain::registry::{FieldBinding, FieldKind, OperationRegistryBuilder, OperationTemplate};

const RESOURCE: &str = "category";
const OPERATIONS: [&str; 5] = ["create", "get", "update", "delete", "list"];
const BY_ID: &str = r#"={{"/rest/V1/categories/" + $parameter["categoryId"]}}"#;

pub(super) fn register(builder: OperationRegistryBuilder) -> Result<OperationRegistryBuilder, DomainError> {
    let builder = builder
        .operation(OperationTemplate::new(RESOURCE, "create", HttpMethod::Post, "/rest/V1/categories")?.empty_body())
        .operation(OperationTemplate::new(RESOURCE, "get", HttpMethod::Get, BY_ID)?)
        .operation(OperationTemplate::new(RESOURCE, "update", HttpMethod::Put, BY_ID)?.empty_body())
        .operation(OperationTemplate::new(RESOURCE, "delete", HttpMethod::Delete, BY_ID)?)
        .operation(
            OperationTemplate::new(RESOURCE, "list", HttpMethod::Get, "/rest/V1/categories/list")?
                .transform(SearchCriteriaList::new("/categories/list")),
        );

    Ok(register_fields(
        builder,
        vec![
            FieldBinding::new("categoryId", FieldKind::Number)
                .required()
                .default_value(json!(0))
                .applies_to(RESOURCE, &["get", "update", "delete"]),
            FieldBinding::new("categoryData", FieldKind::Json)
                .required()
                .default_value(json!(""))
                .applies_to(RESOURCE, &["create", "update"])
                .transform(JsonBody::new(RESOURCE, "categoryData")),
            search_criteria_field(RESOURCE),
            website_code_field(RESOURCE, &OPERATIONS),
            simplify_output_field(RESOURCE, &OPERATIONS),
        ],
    ))
}
