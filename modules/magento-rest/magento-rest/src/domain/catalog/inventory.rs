use magento_rest_sdk::HttpMethod;
use serde_json::json;

use super::register_fields;
use super::transforms::StockItem;
use crate::domain::error::DomainError;
use crate::domain::registry::{FieldBinding, FieldKind, OperationRegistryBuilder, OperationTemplate};

const RESOURCE: &str = "inventory";

pub(super) fn register(builder: OperationRegistryBuilder) -> Result<OperationRegistryBuilder, DomainError> {
    // updateStock's placeholder URL is replaced by the stockData transform
    let builder = builder
        .operation(OperationTemplate::new(
            RESOURCE,
            "updateStock",
            HttpMethod::Put,
            "/rest/V1/products/:sku/stockItems/:itemId",
        )?)
        .operation(OperationTemplate::new(
            RESOURCE,
            "getStock",
            HttpMethod::Get,
            r#"={{"/rest/V1/stockItems/" + $parameter["sku"]}}"#,
        )?);

    Ok(register_fields(
        builder,
        vec![
            FieldBinding::new("sku", FieldKind::String)
                .required()
                .default_value(json!(""))
                .applies_to(RESOURCE, &["updateStock", "getStock"]),
            FieldBinding::new("itemId", FieldKind::Number)
                .required()
                .default_value(json!(1))
                .applies_to(RESOURCE, &["updateStock"]),
            FieldBinding::new("stockData", FieldKind::Json)
                .required()
                .default_value(json!(""))
                .applies_to(RESOURCE, &["updateStock"])
                .transform(StockItem::new()?),
        ],
    ))
}
