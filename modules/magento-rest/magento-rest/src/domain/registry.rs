//! Operation registry: request templates and field bindings.
//!
//! Built once at startup and immutable afterwards. Every (resource, operation)
//! pair maps to exactly one [`OperationTemplate`]; fields are kept in
//! declaration order because their transforms run in that order.

use std::collections::HashMap;
use std::sync::Arc;

use magento_rest_sdk::{HttpMethod, Selection};
use serde_json::{Map, Value};

use super::error::DomainError;
use super::params::ALWAYS_DECLARED;
use super::transform::PreSendTransform;
use super::url_template::UrlTemplate;

/// Declared kind of a field, used for coercion by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    /// Parsed lazily by the consumer.
    Json,
    /// Free-form string; a non-empty list restricts the accepted values.
    Options(Vec<String>),
    /// Structured value given as an object or a JSON string.
    Collection,
}

/// A user-facing parameter and what it contributes to requests.
#[derive(Debug, Clone)]
pub struct FieldBinding {
    name: String,
    kind: FieldKind,
    required: bool,
    default: Value,
    applies_to: Vec<Selection>,
    query: Option<Map<String, Value>>,
    body: Option<Map<String, Value>>,
    transforms: Vec<Arc<dyn PreSendTransform>>,
}

impl FieldBinding {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: Value::Null,
            applies_to: Vec::new(),
            query: None,
            body: None,
            transforms: Vec::new(),
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value used when the host supplies none.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = value;
        self
    }

    /// Declare the field for the given operations of `resource`.
    #[must_use]
    pub fn applies_to(mut self, resource: &str, operations: &[&str]) -> Self {
        self.applies_to
            .extend(operations.iter().map(|op| Selection::new(resource, *op)));
        self
    }

    /// Query contribution; string values may embed `$value`.
    #[must_use]
    pub fn query(mut self, contribution: Map<String, Value>) -> Self {
        self.query = Some(contribution);
        self
    }

    /// Body contribution; string values may embed `$value`.
    #[must_use]
    pub fn body(mut self, contribution: Map<String, Value>) -> Self {
        self.body = Some(contribution);
        self
    }

    #[must_use]
    pub fn transform(mut self, transform: impl PreSendTransform + 'static) -> Self {
        self.transforms.push(Arc::new(transform));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn declared_default(&self) -> &Value {
        &self.default
    }

    pub fn query_contribution(&self) -> Option<&Map<String, Value>> {
        self.query.as_ref()
    }

    pub fn body_contribution(&self) -> Option<&Map<String, Value>> {
        self.body.as_ref()
    }

    pub fn transforms(&self) -> &[Arc<dyn PreSendTransform>] {
        &self.transforms
    }

    /// Fields owning transforms do their own processing and are left out of
    /// the static query/body merge.
    pub fn owns_transforms(&self) -> bool {
        !self.transforms.is_empty()
    }

    pub fn applies(&self, selection: &Selection) -> bool {
        self.applies_to.contains(selection)
    }
}

/// Request template for one (resource, operation) pair.
#[derive(Debug, Clone)]
pub struct OperationTemplate {
    selection: Selection,
    method: HttpMethod,
    url_pattern: String,
    url: UrlTemplate,
    static_body: Option<Map<String, Value>>,
    static_query: Option<Map<String, Value>>,
    transforms: Vec<Arc<dyn PreSendTransform>>,
}

impl OperationTemplate {
    /// Create a template, parsing its URL pattern.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidUrlTemplate` if the pattern is malformed.
    pub fn new(
        resource: &str,
        operation: &str,
        method: HttpMethod,
        url_pattern: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            selection: Selection::new(resource, operation),
            method,
            url_pattern: url_pattern.to_owned(),
            url: UrlTemplate::parse(url_pattern)?,
            static_body: None,
            static_query: None,
            transforms: Vec::new(),
        })
    }

    /// Create a template with a fixed URL.
    pub fn literal(resource: &str, operation: &str, method: HttpMethod, url: &str) -> Self {
        Self {
            selection: Selection::new(resource, operation),
            method,
            url_pattern: url.to_owned(),
            url: UrlTemplate::Literal(url.to_owned()),
            static_body: None,
            static_query: None,
            transforms: Vec::new(),
        }
    }

    #[must_use]
    pub fn static_body(mut self, body: Map<String, Value>) -> Self {
        self.static_body = Some(body);
        self
    }

    /// Declare an empty static body, so the request always carries `{}`.
    #[must_use]
    pub fn empty_body(self) -> Self {
        self.static_body(Map::new())
    }

    #[must_use]
    pub fn static_query(mut self, query: Map<String, Value>) -> Self {
        self.static_query = Some(query);
        self
    }

    #[must_use]
    pub fn transform(mut self, transform: impl PreSendTransform + 'static) -> Self {
        self.transforms.push(Arc::new(transform));
        self
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url_pattern(&self) -> &str {
        &self.url_pattern
    }

    pub fn url(&self) -> &UrlTemplate {
        &self.url
    }

    pub fn body(&self) -> Option<&Map<String, Value>> {
        self.static_body.as_ref()
    }

    pub fn query(&self) -> Option<&Map<String, Value>> {
        self.static_query.as_ref()
    }

    pub fn transforms(&self) -> &[Arc<dyn PreSendTransform>] {
        &self.transforms
    }
}

/// Immutable lookup table of templates and fields.
#[derive(Debug, Default)]
pub struct OperationRegistry {
    templates: HashMap<Selection, OperationTemplate>,
    order: Vec<Selection>,
    fields: Vec<FieldBinding>,
}

impl OperationRegistry {
    pub fn builder() -> OperationRegistryBuilder {
        OperationRegistryBuilder::default()
    }

    /// Find the template for a selection.
    ///
    /// # Errors
    /// Returns `DomainError::UnknownOperation` if nothing is registered.
    pub fn lookup(&self, resource: &str, operation: &str) -> Result<&OperationTemplate, DomainError> {
        self.templates
            .get(&Selection::new(resource, operation))
            .ok_or_else(|| DomainError::UnknownOperation {
                resource: resource.to_owned(),
                operation: operation.to_owned(),
            })
    }

    /// Fields declared for `selection`, in declaration order.
    pub fn fields_for<'a>(
        &'a self,
        selection: &'a Selection,
    ) -> impl Iterator<Item = &'a FieldBinding> + 'a {
        self.fields.iter().filter(move |f| f.applies(selection))
    }

    /// Registered selections, in registration order.
    pub fn selections(&self) -> &[Selection] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Collects templates and fields, then validates them into a registry.
#[derive(Debug, Default)]
pub struct OperationRegistryBuilder {
    templates: Vec<OperationTemplate>,
    fields: Vec<FieldBinding>,
}

impl OperationRegistryBuilder {
    #[must_use]
    pub fn operation(mut self, template: OperationTemplate) -> Self {
        self.templates.push(template);
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldBinding) -> Self {
        self.fields.push(field);
        self
    }

    /// Finish the registry.
    ///
    /// # Errors
    /// Returns `DomainError::DuplicateOperation` if a selection is registered
    /// twice, and `DomainError::InvalidUrlTemplate` if a URL references a
    /// parameter that is not declared for its selection.
    pub fn build(self) -> Result<OperationRegistry, DomainError> {
        let mut registry = OperationRegistry {
            fields: self.fields,
            ..OperationRegistry::default()
        };
        for template in self.templates {
            let selection = template.selection().clone();
            if let Some(name) = template.url().parameters().into_iter().find(|name| {
                !ALWAYS_DECLARED.contains(name)
                    && !registry
                        .fields
                        .iter()
                        .any(|f| f.name() == *name && f.applies(&selection))
            }) {
                return Err(DomainError::invalid_url_template(
                    template.url_pattern(),
                    format!("parameter '{name}' is not declared for {selection}"),
                ));
            }
            if registry.templates.contains_key(&selection) {
                return Err(DomainError::DuplicateOperation {
                    resource: selection.resource,
                    operation: selection.operation,
                });
            }
            registry.order.push(selection.clone());
            registry.templates.insert(selection, template);
        }
        Ok(registry)
    }
}
