use magento_rest_sdk::HttpMethod;
use serde_json::json;

use super::transforms::{JsonBody, SearchCriteriaList};
use super::{register_fields, search_criteria_field, website_code_field};
use crate::domain::error::DomainError;
use crate::domain::registry::{FieldBinding, FieldKind, OperationRegistryBuilder, OperationTemplate};

const RESOURCE: &str = "order";
const OPERATIONS: [&str; 5] = ["get", "list", "createInvoice", "createShipment", "cancel"];

pub(super) fn register(builder: OperationRegistryBuilder) -> Result<OperationRegistryBuilder, DomainError> {
    let builder = builder
        .operation(OperationTemplate::new(
            RESOURCE,
            "get",
            HttpMethod::Get,
            r#"={{"/rest/V1/orders/" + $parameter["orderId"]}}"#,
        )?)
        .operation(
            OperationTemplate::new(RESOURCE, "list", HttpMethod::Get, "/rest/V1/orders")?
                .transform(SearchCriteriaList::new("/orders")),
        )
        .operation(
            OperationTemplate::new(
                RESOURCE,
                "createInvoice",
                HttpMethod::Post,
                r#"={{"/rest/V1/order/" + $parameter["orderId"] + "/invoice"}}"#,
            )?
            .empty_body(),
        )
        .operation(
            OperationTemplate::new(
                RESOURCE,
                "createShipment",
                HttpMethod::Post,
                r#"={{"/rest/V1/order/" + $parameter["orderId"] + "/ship"}}"#,
            )?
            .empty_body(),
        )
        .operation(
            OperationTemplate::new(
                RESOURCE,
                "cancel",
                HttpMethod::Post,
                r#"={{"/rest/V1/orders/" + $parameter["orderId"] + "/cancel"}}"#,
            )?
            .empty_body(),
        );

    Ok(register_fields(
        builder,
        vec![
            FieldBinding::new("orderId", FieldKind::Number)
                .required()
                .default_value(json!(0))
                .applies_to(RESOURCE, &["get", "createInvoice", "createShipment", "cancel"]),
            // invoice and shipment payloads are optional
            FieldBinding::new("invoiceData", FieldKind::Json)
                .default_value(json!("{}"))
                .applies_to(RESOURCE, &["createInvoice"])
                .transform(JsonBody::new("invoice", "invoiceData")),
            FieldBinding::new("shipmentData", FieldKind::Json)
                .default_value(json!("{}"))
                .applies_to(RESOURCE, &["createShipment"])
                .transform(JsonBody::new("shipment", "shipmentData")),
            search_criteria_field(RESOURCE),
            website_code_field(RESOURCE, &OPERATIONS),
        ],
    ))
}
