//! Magento catalog: the registered operations and fields.
//!
//! | resource  | operations                                              |
//! |-----------|---------------------------------------------------------|
//! | product   | create, get, update, delete, list                       |
//! | category  | create, get, update, delete, list                       |
//! | customer  | create, get, update, delete, list                       |
//! | order     | get, list, createInvoice, createShipment, cancel        |
//! | inventory | updateStock, getStock                                   |
//! | store     | getStoreGroups, getStoreViews, getWebsites              |

use serde_json::json;

use super::error::DomainError;
use super::registry::{FieldBinding, FieldKind, OperationRegistry, OperationRegistryBuilder};

mod category;
mod customer;
mod inventory;
mod order;
mod product;
mod store;
pub mod transforms;

pub use transforms::{JsonBody, SearchCriteriaList, StockItem, StoreScope};

/// Name of the opt-in flattening flag.
pub const SIMPLIFY_OUTPUT: &str = "simplifyOutput";

/// Build the full Magento registry.
///
/// # Errors
/// Fails only if a built-in registration is malformed.
pub fn magento_registry() -> Result<OperationRegistry, DomainError> {
    let builder = OperationRegistry::builder();
    let builder = product::register(builder)?;
    let builder = category::register(builder)?;
    let builder = customer::register(builder)?;
    let builder = order::register(builder)?;
    let builder = inventory::register(builder)?;
    let builder = store::register(builder);
    builder.build()
}

/// Store view code, honoured by every operation of `resource`.
fn website_code_field(resource: &str, operations: &[&str]) -> FieldBinding {
    FieldBinding::new(transforms::WEBSITE_CODE, FieldKind::Options(Vec::new()))
        .default_value(json!(""))
        .applies_to(resource, operations)
        .transform(StoreScope)
}

fn search_criteria_field(resource: &str) -> FieldBinding {
    FieldBinding::new(transforms::SEARCH_CRITERIA, FieldKind::Collection)
        .default_value(json!({}))
        .applies_to(resource, &["list"])
}

fn simplify_output_field(resource: &str, operations: &[&str]) -> FieldBinding {
    FieldBinding::new(SIMPLIFY_OUTPUT, FieldKind::Boolean)
        .default_value(json!(false))
        .applies_to(resource, operations)
}

fn register_fields(builder: OperationRegistryBuilder, fields: Vec<FieldBinding>) -> OperationRegistryBuilder {
    fields.into_iter().fold(builder, OperationRegistryBuilder::field)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOURCES: [&str; 6] = ["product", "category", "customer", "order", "inventory", "store"];

    #[test]
    fn test_every_resource_is_registered() {
        let registry = magento_registry().unwrap();
        assert_eq!(registry.len(), 25);
        for resource in RESOURCES {
            assert!(
                registry.selections().iter().any(|s| s.resource == resource),
                "{resource} has no operations"
            );
        }
    }
}
