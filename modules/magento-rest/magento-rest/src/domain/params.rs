//! Parameter resolution.
//!
//! Values come from the host's [`ParameterSource`] and are scoped to one item.
//! Only parameters declared for the active selection resolve; `resource` and
//! `operation` are always declared. Declared defaults fill in values the host
//! does not supply, and simple kinds are coerced here. JSON-typed values are
//! left opaque for the consumer to parse.

use magento_rest_sdk::{ParameterSource, Selection};
use serde_json::{Number, Value};

use super::error::DomainError;
use super::registry::{FieldBinding, FieldKind, OperationRegistry};
use super::url_template::PathParameterPolicy;
use super::values::is_present;

/// Parameters every selection can read.
pub(super) const ALWAYS_DECLARED: [&str; 2] = ["resource", "operation"];

/// Resolves declared parameters for one selection.
pub struct ParameterResolver<'a> {
    source: &'a dyn ParameterSource,
    fields: Vec<&'a FieldBinding>,
    path_policy: PathParameterPolicy,
}

impl<'a> ParameterResolver<'a> {
    pub fn new(
        source: &'a dyn ParameterSource,
        registry: &'a OperationRegistry,
        selection: &'a Selection,
        path_policy: PathParameterPolicy,
    ) -> Self {
        Self {
            source,
            fields: registry.fields_for(selection).collect(),
            path_policy,
        }
    }

    /// Resolve `name` for `item_index`.
    ///
    /// # Errors
    /// Returns `MissingParameter` when `name` is not declared and no fallback
    /// is given, and `InvalidParameter` when the value violates the declared kind.
    pub fn resolve(
        &self,
        name: &str,
        item_index: usize,
        fallback: Option<Value>,
    ) -> Result<Value, DomainError> {
        if ALWAYS_DECLARED.contains(&name) {
            return self
                .source
                .get_value(name, item_index)
                .or(fallback)
                .ok_or_else(|| DomainError::missing_parameter(name));
        }

        let Some(field) = self.fields.iter().find(|f| f.name() == name) else {
            return fallback.ok_or_else(|| DomainError::missing_parameter(name));
        };

        let value = self
            .source
            .get_value(name, item_index)
            .unwrap_or_else(|| field.declared_default().clone());
        coerce(field, value)
    }

    /// Whether the host itself supplied a present value, ignoring declared defaults.
    pub fn is_supplied(&self, name: &str, item_index: usize) -> bool {
        self.source
            .get_value(name, item_index)
            .is_some_and(|v| is_present(&v))
    }

    /// Whether `name` is a required field of the selection.
    pub fn is_required(&self, name: &str) -> bool {
        self.fields
            .iter()
            .any(|f| f.name() == name && f.is_required())
    }

    /// View of the resolver scoped to one item.
    pub fn for_item(&self, item_index: usize) -> ItemParameters<'_> {
        ItemParameters {
            resolver: self,
            item_index,
        }
    }

    pub fn path_policy(&self) -> PathParameterPolicy {
        self.path_policy
    }
}

/// Parameters of the item currently being processed.
#[derive(Clone, Copy)]
pub struct ItemParameters<'a> {
    resolver: &'a ParameterResolver<'a>,
    item_index: usize,
}

impl ItemParameters<'_> {
    /// Resolve a parameter that must be declared.
    ///
    /// # Errors
    /// See [`ParameterResolver::resolve`].
    pub fn get(&self, name: &str) -> Result<Value, DomainError> {
        self.resolver.resolve(name, self.item_index, None)
    }

    /// Resolve a parameter, using `fallback` if it is not declared.
    ///
    /// # Errors
    /// Returns `InvalidParameter` when a declared value violates its kind.
    pub fn get_or(&self, name: &str, fallback: Value) -> Result<Value, DomainError> {
        self.resolver.resolve(name, self.item_index, Some(fallback))
    }

    pub fn is_supplied(&self, name: &str) -> bool {
        self.resolver.is_supplied(name, self.item_index)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.resolver.is_required(name)
    }

    pub fn item_index(&self) -> usize {
        self.item_index
    }

    pub fn path_policy(&self) -> PathParameterPolicy {
        self.resolver.path_policy
    }
}

fn coerce(field: &FieldBinding, value: Value) -> Result<Value, DomainError> {
    if value.is_null() {
        return Ok(value);
    }
    let name = field.name();
    match field.kind() {
        FieldKind::String | FieldKind::Json => Ok(value),
        FieldKind::Number => match value {
            Value::Number(_) => Ok(value),
            Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
            Value::String(s) => parse_number(s.trim())
                .map(Value::Number)
                .ok_or_else(|| DomainError::invalid_parameter(name, format!("'{s}' is not a number"))),
            other => Err(DomainError::invalid_parameter(
                name,
                format!("expected a number, got {other}"),
            )),
        },
        FieldKind::Boolean => match value {
            Value::Bool(_) => Ok(value),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            other => Err(DomainError::invalid_parameter(
                name,
                format!("expected a boolean, got {other}"),
            )),
        },
        FieldKind::Options(allowed) => match value {
            Value::String(s) if allowed.is_empty() || allowed.contains(&s) => Ok(Value::String(s)),
            Value::String(s) => Err(DomainError::invalid_parameter(
                name,
                format!("'{s}' is not one of {}", allowed.join(", ")),
            )),
            other => Err(DomainError::invalid_parameter(
                name,
                format!("expected a string option, got {other}"),
            )),
        },
        FieldKind::Collection => match value {
            Value::Object(_) | Value::String(_) => Ok(value),
            other => Err(DomainError::invalid_parameter(
                name,
                format!("expected an object, got {other}"),
            )),
        },
    }
}

fn parse_number(raw: &str) -> Option<Number> {
    raw.parse::<i64>()
        .map(Number::from)
        .ok()
        .or_else(|| raw.parse::<f64>().ok().and_then(Number::from_f64))
}
