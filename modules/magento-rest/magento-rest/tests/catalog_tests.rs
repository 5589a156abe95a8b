#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the Magento catalog: every registered operation
//! assembled end to end through the dispatcher

mod common;

use common::{ItemParams, RecordingTransport, dispatcher};
use magento_rest::domain::simplify::simplify_records_if_requested;
use magento_rest::{HttpMethod, RequestBody, RequestDescriptor, Selection, magento_registry};
use serde_json::{Value, json};

async fn send(params: &ItemParams) -> RequestDescriptor {
    let transport = RecordingTransport::new(vec![]);
    dispatcher(transport.clone()).run_all(params, 1, false).await.unwrap();
    transport.last()
}

fn json_body(request: &RequestDescriptor) -> Value {
    match &request.body {
        Some(RequestBody::Json(value)) => value.clone(),
        other => panic!("expected a JSON body, got {other:?}"),
    }
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_registry_covers_all_operations() {
    let registry = magento_registry().unwrap();
    let expected = [
        ("product", "create", HttpMethod::Post, "/rest/V1/products"),
        ("product", "get", HttpMethod::Get, r#"={{"/rest/V1/products/" + $parameter["sku"]}}"#),
        ("product", "update", HttpMethod::Put, r#"={{"/rest/V1/products/" + $parameter["sku"]}}"#),
        ("product", "delete", HttpMethod::Delete, r#"={{"/rest/V1/products/" + $parameter["sku"]}}"#),
        ("product", "list", HttpMethod::Get, "/rest/V1/products"),
        ("category", "create", HttpMethod::Post, "/rest/V1/categories"),
        ("category", "get", HttpMethod::Get, r#"={{"/rest/V1/categories/" + $parameter["categoryId"]}}"#),
        ("category", "update", HttpMethod::Put, r#"={{"/rest/V1/categories/" + $parameter["categoryId"]}}"#),
        ("category", "delete", HttpMethod::Delete, r#"={{"/rest/V1/categories/" + $parameter["categoryId"]}}"#),
        ("category", "list", HttpMethod::Get, "/rest/V1/categories/list"),
        ("customer", "create", HttpMethod::Post, "/rest/V1/customers"),
        ("customer", "get", HttpMethod::Get, r#"={{"/rest/V1/customers/" + $parameter["customerId"]}}"#),
        ("customer", "update", HttpMethod::Put, r#"={{"/rest/V1/customers/" + $parameter["customerId"]}}"#),
        ("customer", "delete", HttpMethod::Delete, r#"={{"/rest/V1/customers/" + $parameter["customerId"]}}"#),
        ("customer", "list", HttpMethod::Get, "/rest/V1/customers/search"),
        ("order", "get", HttpMethod::Get, r#"={{"/rest/V1/orders/" + $parameter["orderId"]}}"#),
        ("order", "list", HttpMethod::Get, "/rest/V1/orders"),
        ("order", "createInvoice", HttpMethod::Post, r#"={{"/rest/V1/order/" + $parameter["orderId"] + "/invoice"}}"#),
        ("order", "createShipment", HttpMethod::Post, r#"={{"/rest/V1/order/" + $parameter["orderId"] + "/ship"}}"#),
        ("order", "cancel", HttpMethod::Post, r#"={{"/rest/V1/orders/" + $parameter["orderId"] + "/cancel"}}"#),
        ("inventory", "updateStock", HttpMethod::Put, "/rest/V1/products/:sku/stockItems/:itemId"),
        ("inventory", "getStock", HttpMethod::Get, r#"={{"/rest/V1/stockItems/" + $parameter["sku"]}}"#),
        ("store", "getStoreGroups", HttpMethod::Get, "/rest/V1/store/storeGroups"),
        ("store", "getStoreViews", HttpMethod::Get, "/rest/V1/store/storeViews"),
        ("store", "getWebsites", HttpMethod::Get, "/rest/V1/store/websites"),
    ];

    assert_eq!(registry.len(), expected.len());
    for (resource, operation, method, pattern) in expected {
        let template = registry.lookup(resource, operation).unwrap();
        assert_eq!(template.method(), method, "{resource}:{operation}");
        assert_eq!(template.url_pattern(), pattern, "{resource}:{operation}");
    }
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_product_get_with_store_id() {
    let request = send(
        &ItemParams::new("product", "get")
            .with("sku", json!("ABC-1"))
            .with("storeId", json!(2)),
    )
    .await;

    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.full_url(), "https://shop.example.com/rest/V1/products/ABC-1?storeId=2");
    assert_eq!(request.body, None);
}

#[tokio::test]
async fn test_product_create_wraps_body() {
    let request = send(
        &ItemParams::new("product", "create")
            .with("productData", json!(r#"{"sku": "NEW", "price": 9.5}"#)),
    )
    .await;

    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "/rest/V1/products");
    assert_eq!(json_body(&request), json!({"product": {"sku": "NEW", "price": 9.5}}));
    assert_eq!(
        request.headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_product_update_with_store_code() {
    let request = send(
        &ItemParams::new("product", "update")
            .with("sku", json!("ABC-1"))
            .with("productData", json!({"price": 10}))
            .with("websiteCode", json!("de")),
    )
    .await;

    assert_eq!(request.method, HttpMethod::Put);
    assert_eq!(request.url, "/rest/de/V1/products/ABC-1");
    assert_eq!(json_body(&request), json!({"product": {"price": 10}}));
}

#[tokio::test]
async fn test_product_delete() {
    let request = send(&ItemParams::new("product", "delete").with("sku", json!("OLD"))).await;
    assert_eq!(request.method, HttpMethod::Delete);
    assert_eq!(request.url, "/rest/V1/products/OLD");
    assert_eq!(request.body, None);
}

#[tokio::test]
async fn test_product_list_with_search_criteria() {
    let criteria = json!({
        "filterGroups": {"filterGroupValues": [
            {"filters": {"filterValues": [
                {"field": "sku", "conditionType": "like", "value": "AB%"},
                {"field": "special_price", "conditionType": "null"}
            ]}}
        ]},
        "sortOrders": {"sortOrderValues": [{"field": "price", "direction": "DESC"}]},
        "pageSize": 50
    });
    let request = send(
        &ItemParams::new("product", "list")
            .with("searchCriteria", criteria)
            .with("websiteCode", json!("fr")),
    )
    .await;

    let expected = [
        "searchCriteria%5Bfilter_groups%5D%5B0%5D%5Bfilters%5D%5B0%5D%5Bfield%5D=sku",
        "searchCriteria%5Bfilter_groups%5D%5B0%5D%5Bfilters%5D%5B0%5D%5Bcondition_type%5D=like",
        "searchCriteria%5Bfilter_groups%5D%5B0%5D%5Bfilters%5D%5B0%5D%5Bvalue%5D=AB%25",
        "searchCriteria%5Bfilter_groups%5D%5B0%5D%5Bfilters%5D%5B1%5D%5Bfield%5D=special_price",
        "searchCriteria%5Bfilter_groups%5D%5B0%5D%5Bfilters%5D%5B1%5D%5Bcondition_type%5D=null",
        "searchCriteria%5Bsort_orders%5D%5B0%5D%5Bfield%5D=price",
        "searchCriteria%5Bsort_orders%5D%5B0%5D%5Bdirection%5D=DESC",
        "searchCriteria%5BpageSize%5D=50",
        "searchCriteria%5BcurrentPage%5D=1",
    ]
    .join("&");
    assert_eq!(request.url, format!("/rest/fr/V1/products?{expected}"));
    assert!(request.query.is_empty());
}

#[tokio::test]
async fn test_product_list_accepts_integral_float_page_size() {
    let request = send(
        &ItemParams::new("product", "list").with("searchCriteria", json!({"pageSize": 50.0})),
    )
    .await;
    assert_eq!(
        request.url,
        "/rest/V1/products?searchCriteria%5BpageSize%5D=50&searchCriteria%5BcurrentPage%5D=1"
    );
}

// =============================================================================
// Categories and Customers
// =============================================================================

#[tokio::test]
async fn test_category_operations() {
    let get = send(&ItemParams::new("category", "get").with("categoryId", json!(12))).await;
    assert_eq!(get.url, "/rest/V1/categories/12");

    let create = send(
        &ItemParams::new("category", "create").with("categoryData", json!(r#"{"name": "Shoes"}"#)),
    )
    .await;
    assert_eq!(json_body(&create), json!({"category": {"name": "Shoes"}}));

    let list = send(&ItemParams::new("category", "list")).await;
    assert_eq!(
        list.url,
        "/rest/V1/categories/list?searchCriteria%5BpageSize%5D=20&searchCriteria%5BcurrentPage%5D=1"
    );
}

#[tokio::test]
async fn test_customer_operations() {
    let update = send(
        &ItemParams::new("customer", "update")
            .with("customerId", json!("7"))
            .with("customerData", json!({"email": "a@example.com"})),
    )
    .await;
    assert_eq!(update.method, HttpMethod::Put);
    assert_eq!(update.url, "/rest/V1/customers/7");
    assert_eq!(json_body(&update), json!({"customer": {"email": "a@example.com"}}));

    let list = send(&ItemParams::new("customer", "list").with("websiteCode", json!("b2b"))).await;
    assert!(list.url.starts_with("/rest/b2b/V1/customers/search?"));
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_order_actions() {
    let invoice = send(&ItemParams::new("order", "createInvoice").with("orderId", json!(100))).await;
    assert_eq!(invoice.method, HttpMethod::Post);
    assert_eq!(invoice.url, "/rest/V1/order/100/invoice");
    assert_eq!(json_body(&invoice), json!({"invoice": {}}));

    let shipment = send(
        &ItemParams::new("order", "createShipment")
            .with("orderId", json!(100))
            .with("shipmentData", json!(r#"{"notify": true}"#)),
    )
    .await;
    assert_eq!(shipment.url, "/rest/V1/order/100/ship");
    assert_eq!(json_body(&shipment), json!({"shipment": {"notify": true}}));

    let cancel = send(&ItemParams::new("order", "cancel").with("orderId", json!(100))).await;
    assert_eq!(cancel.url, "/rest/V1/orders/100/cancel");
    assert_eq!(json_body(&cancel), json!({}));

    let get = send(&ItemParams::new("order", "get").with("orderId", json!(0))).await;
    assert_eq!(get.url, "/rest/V1/orders/0");
}

// =============================================================================
// Inventory and Store
// =============================================================================

#[tokio::test]
async fn test_inventory_update_stock() {
    let request = send(
        &ItemParams::new("inventory", "updateStock")
            .with("sku", json!("SKU-9"))
            .with("stockData", json!(r#"{"qty": 15, "is_in_stock": true}"#)),
    )
    .await;

    assert_eq!(request.method, HttpMethod::Put);
    assert_eq!(request.url, "/rest/V1/products/SKU-9/stockItems/1");
    assert_eq!(json_body(&request), json!({"stockItem": {"qty": 15, "is_in_stock": true}}));
}

#[tokio::test]
async fn test_inventory_get_stock() {
    let request = send(&ItemParams::new("inventory", "getStock").with("sku", json!("SKU-9"))).await;
    assert_eq!(request.url, "/rest/V1/stockItems/SKU-9");
}

#[tokio::test]
async fn test_store_endpoints() {
    for (operation, url) in [
        ("getStoreGroups", "/rest/V1/store/storeGroups"),
        ("getStoreViews", "/rest/V1/store/storeViews"),
        ("getWebsites", "/rest/V1/store/websites"),
    ] {
        let request = send(&ItemParams::new("store", operation)).await;
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, url);
        assert_eq!(request.body, None);
    }
}

// =============================================================================
// Output Simplification
// =============================================================================

#[tokio::test]
async fn test_simplify_output_is_opt_in() {
    let response = json!({
        "sku": "\"ABC\"",
        "custom_attributes": [{"attribute_code": "color", "value": "red"}]
    });
    let params = ItemParams::new("product", "get")
        .with("sku", json!("ABC"))
        .with_item(1, "simplifyOutput", json!(true));

    let transport = RecordingTransport::new(vec![Ok(response.clone()), Ok(response.clone())]);
    let records = dispatcher(transport).run_all(&params, 2, false).await.unwrap();
    assert_eq!(records[0].json, response);
    assert_eq!(records[1].json, response);

    let registry = magento_registry().unwrap();
    let simplified =
        simplify_records_if_requested(records, &params, &registry, &Selection::new("product", "get")).unwrap();
    assert_eq!(simplified[0].json, response);
    assert_eq!(simplified[1].json, json!({"sku": "ABC", "attributes": {"color": "red"}}));
}
