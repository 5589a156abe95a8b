//! Opt-in flattening of Magento responses.
//!
//! Never applied by the dispatcher; callers ask for it per record through the
//! `simplifyOutput` flag.

use magento_rest_sdk::{OutputRecord, ParameterSource, Selection};
use serde_json::{Map, Value};

use super::catalog::SIMPLIFY_OUTPUT;
use super::error::DomainError;
use super::params::ParameterResolver;
use super::registry::OperationRegistry;
use super::url_template::PathParameterPolicy;

/// Flattening rules, selected by resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimplifyStrategy {
    /// SKU cleanup, custom and extension attributes.
    Generic,
    /// Generic rules plus product links and media gallery.
    Product,
}

impl SimplifyStrategy {
    pub fn for_resource(resource: &str) -> Self {
        if resource == "product" {
            Self::Product
        } else {
            Self::Generic
        }
    }
}

/// Simplify one response payload.
pub fn simplify(value: &Value, strategy: SimplifyStrategy) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|v| simplify(v, strategy)).collect()),
        Value::Object(object) => match object.get("items") {
            Some(Value::Array(items)) => {
                let mut envelope = object.clone();
                envelope.insert(
                    "items".to_owned(),
                    Value::Array(items.iter().map(|v| simplify(v, strategy)).collect()),
                );
                Value::Object(envelope)
            }
            _ => Value::Object(simplify_entity(object, strategy)),
        },
        scalar => scalar.clone(),
    }
}

/// Simplify every record whose item has `simplifyOutput` set.
///
/// The flag is resolved like any other parameter: declared defaults apply and
/// `"true"`/`"false"` strings are coerced. Selections that do not declare the
/// flag are never simplified.
///
/// # Errors
/// Returns `InvalidParameter` when a flag value is not a boolean.
pub fn simplify_records_if_requested(
    records: Vec<OutputRecord>,
    params: &dyn ParameterSource,
    registry: &OperationRegistry,
    selection: &Selection,
) -> Result<Vec<OutputRecord>, DomainError> {
    let resolver = ParameterResolver::new(params, registry, selection, PathParameterPolicy::default());
    let strategy = SimplifyStrategy::for_resource(&selection.resource);
    records
        .into_iter()
        .map(|record| -> Result<OutputRecord, DomainError> {
            let requested = resolver
                .for_item(record.source_item_index)
                .get_or(SIMPLIFY_OUTPUT, Value::Bool(false))?
                == Value::Bool(true);
            Ok(if requested {
                OutputRecord {
                    json: simplify(&record.json, strategy),
                    source_item_index: record.source_item_index,
                }
            } else {
                record
            })
        })
        .collect()
}

/// Simplify every record.
pub fn simplify_records(records: &[OutputRecord], resource: &str) -> Vec<OutputRecord> {
    let strategy = SimplifyStrategy::for_resource(resource);
    records
        .iter()
        .map(|record| OutputRecord {
            json: simplify(&record.json, strategy),
            source_item_index: record.source_item_index,
        })
        .collect()
}

fn simplify_entity(object: &Map<String, Value>, strategy: SimplifyStrategy) -> Map<String, Value> {
    let mut out = object.clone();

    if let Some(Value::String(sku)) = out.get_mut("sku") {
        *sku = trim_quotes(sku).to_owned();
    }

    if let Some(Value::Array(attributes)) = out.remove("custom_attributes") {
        out.insert("attributes".to_owned(), Value::Object(custom_attributes(&attributes)));
    }

    if let Some(Value::Object(extension)) = out.get("extension_attributes").cloned() {
        out.remove("extension_attributes");
        for (key, value) in extension {
            out.insert(format!("extension_{key}"), value);
        }
    }

    if strategy == SimplifyStrategy::Product {
        if let Some(Value::Array(links)) = out.get("product_links") {
            let grouped = product_links(links);
            out.insert("product_links".to_owned(), Value::Object(grouped));
        }
        if let Some(Value::Array(entries)) = out.remove("media_gallery_entries") {
            out.insert("images".to_owned(), Value::Array(images(&entries)));
        }
    }

    out
}

fn trim_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

fn custom_attributes(attributes: &[Value]) -> Map<String, Value> {
    attributes
        .iter()
        .filter_map(|attr| {
            let code = trim_quotes(attr.get("attribute_code")?.as_str()?);
            (!code.is_empty()).then(|| {
                (
                    code.to_owned(),
                    attr.get("value").cloned().unwrap_or(Value::Null),
                )
            })
        })
        .collect()
}

/// Group linked SKUs by link type.
fn product_links(links: &[Value]) -> Map<String, Value> {
    let mut grouped = Map::new();
    for link in links {
        let Some(link_type) = link.get("link_type").and_then(Value::as_str) else {
            continue;
        };
        let sku = link.get("linked_product_sku").cloned().unwrap_or(Value::Null);
        if let Value::Array(skus) = grouped
            .entry(link_type.to_owned())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            skus.push(sku);
        }
    }
    grouped
}

fn images(entries: &[Value]) -> Vec<Value> {
    entries
        .iter()
        .zip(1_u64..)
        .map(|(entry, ordinal)| {
            let field = |name: &str| entry.get(name).cloned().unwrap_or(Value::Null);
            let position = match entry.get("position") {
                Some(p) if p.as_f64().is_some_and(|n| n != 0.0) => p.clone(),
                _ => Value::from(ordinal),
            };
            let mut image = Map::new();
            image.insert("url".to_owned(), field("file"));
            image.insert(
                "roles".to_owned(),
                entry
                    .get("types")
                    .filter(|t| t.is_array())
                    .cloned()
                    .unwrap_or_else(|| Value::Array(Vec::new())),
            );
            image.insert("position".to_owned(), position);
            image.insert("id".to_owned(), field("id"));
            image.insert(
                "disabled".to_owned(),
                Value::Bool(entry.get("disabled").and_then(Value::as_bool).unwrap_or(false)),
            );
            Value::Object(image)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::StaticParams;
    use crate::domain::catalog::magento_registry;
    use serde_json::json;

    #[test]
    fn test_generic_entity() {
        let input = json!({
            "id": 5,
            "sku": "\"ABC\"",
            "custom_attributes": [
                {"attribute_code": "color", "value": "red"},
                {"attribute_code": "\"size\"", "value": "L"},
                {"value": "orphan"}
            ],
            "extension_attributes": {"website_ids": [1]}
        });
        let out = simplify(&input, SimplifyStrategy::Generic);
        assert_eq!(
            out,
            json!({
                "id": 5,
                "sku": "ABC",
                "attributes": {"color": "red", "size": "L"},
                "extension_website_ids": [1]
            })
        );
    }

    #[test]
    fn test_product_links_and_gallery() {
        let input = json!({
            "sku": "P1",
            "product_links": [
                {"link_type": "related", "linked_product_sku": "A"},
                {"link_type": "related", "linked_product_sku": "B"},
                {"link_type": "upsell", "linked_product_sku": "C"}
            ],
            "media_gallery_entries": [
                {"id": 9, "file": "/a.jpg", "types": ["image"], "position": 0},
                {"id": 10, "file": "/b.jpg", "position": 4, "disabled": true}
            ]
        });
        let out = simplify(&input, SimplifyStrategy::Product);
        assert_eq!(out["product_links"], json!({"related": ["A", "B"], "upsell": ["C"]}));
        assert_eq!(
            out["images"],
            json!([
                {"url": "/a.jpg", "roles": ["image"], "position": 1, "id": 9, "disabled": false},
                {"url": "/b.jpg", "roles": [], "position": 4, "id": 10, "disabled": true}
            ])
        );
        assert!(out.get("media_gallery_entries").is_none());

        // generic strategy leaves product structures alone
        let generic = simplify(&input, SimplifyStrategy::Generic);
        assert!(generic.get("media_gallery_entries").is_some());
    }

    #[test]
    fn test_lists_and_envelopes() {
        let list = json!([{"sku": "\"A\""}, 3]);
        assert_eq!(simplify(&list, SimplifyStrategy::Generic), json!([{"sku": "A"}, 3]));

        let envelope = json!({"items": [{"sku": "\"A\""}], "total_count": 1, "sku": "\"keep\""});
        assert_eq!(
            simplify(&envelope, SimplifyStrategy::Generic),
            json!({"items": [{"sku": "A"}], "total_count": 1, "sku": "\"keep\""})
        );
        assert_eq!(simplify(&json!("text"), SimplifyStrategy::Product), json!("text"));
    }

    #[test]
    fn test_records_only_when_requested() {
        let records = vec![OutputRecord {
            json: json!({"sku": "\"A\""}),
            source_item_index: 0,
        }];

        let registry = magento_registry().unwrap();
        let product = Selection::new("product", "get");

        let off = simplify_records_if_requested(records.clone(), &StaticParams::default(), &registry, &product);
        assert_eq!(off.unwrap(), records);

        let on = StaticParams::new(&[("simplifyOutput", json!(true))]);
        let out = simplify_records_if_requested(records.clone(), &on, &registry, &product).unwrap();
        assert_eq!(out[0].json, json!({"sku": "A"}));
        assert_eq!(simplify_records(&records, "category")[0].json, json!({"sku": "A"}));
    }

    #[test]
    fn test_requested_flag_is_coerced() {
        let records = vec![OutputRecord {
            json: json!({"sku": "\"A\""}),
            source_item_index: 0,
        }];
        let registry = magento_registry().unwrap();
        let product = Selection::new("product", "get");

        let as_string = StaticParams::new(&[("simplifyOutput", json!("true"))]);
        let out = simplify_records_if_requested(records.clone(), &as_string, &registry, &product).unwrap();
        assert_eq!(out[0].json, json!({"sku": "A"}));

        let invalid = StaticParams::new(&[("simplifyOutput", json!("yes"))]);
        assert!(matches!(
            simplify_records_if_requested(records.clone(), &invalid, &registry, &product),
            Err(DomainError::InvalidParameter { .. })
        ));

        // customers do not declare the flag
        let customer = Selection::new("customer", "get");
        let out = simplify_records_if_requested(records.clone(), &as_string, &registry, &customer).unwrap();
        assert_eq!(out, records);
    }
}
