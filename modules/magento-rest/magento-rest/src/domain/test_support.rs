//! Shared fixtures for unit tests.

use std::collections::HashMap;

use magento_rest_sdk::ParameterSource;
use serde_json::Value;

/// Parameter source returning the same values for every item.
#[derive(Debug, Default)]
pub struct StaticParams {
    values: HashMap<String, Value>,
}

impl StaticParams {
    pub fn new(values: &[(&str, Value)]) -> Self {
        Self {
            values: values
                .iter()
                .map(|(k, v)| ((*k).to_owned(), v.clone()))
                .collect(),
        }
    }
}

impl ParameterSource for StaticParams {
    fn get_value(&self, name: &str, _item_index: usize) -> Option<Value> {
        self.values.get(name).cloned()
    }
}
