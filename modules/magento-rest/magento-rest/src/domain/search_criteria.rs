//! `searchCriteria` model and query encoding.
//!
//! Encodes filters, sort orders and pagination into the bracketed keys the
//! Magento REST API expects:
//!
//! ```text
//! searchCriteria[filter_groups][G][filters][F][field|condition_type|value]
//! searchCriteria[sort_orders][S][field|direction]
//! searchCriteria[pageSize], searchCriteria[currentPage]
//! ```
//!
//! Filters within a group are OR-ed, groups are AND-ed.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use super::error::DomainError;
use super::values::{is_present, to_plain_string};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_CURRENT_PAGE: u32 = 1;

const PREFIX: &str = "searchCriteria";

/// Filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionType {
    Eq,
    Neq,
    Gt,
    Gteq,
    Lt,
    Lteq,
    Like,
    In,
    Nin,
    NotNull,
    Null,
}

impl ConditionType {
    #[allow(clippy::trivially_copy_pass_by_ref)] // Consistent API with other enums
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gteq => "gteq",
            Self::Lt => "lt",
            Self::Lteq => "lteq",
            Self::Like => "like",
            Self::In => "in",
            Self::Nin => "nin",
            Self::NotNull => "notnull",
            Self::Null => "null",
        }
    }

    /// `null` and `notnull` do not need a value.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn requires_value(&self) -> bool {
        !matches!(self, Self::Null | Self::NotNull)
    }
}

impl FromStr for ConditionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "eq" => Self::Eq,
            "neq" => Self::Neq,
            "gt" => Self::Gt,
            "gteq" => Self::Gteq,
            "lt" => Self::Lt,
            "lteq" => Self::Lteq,
            "like" => Self::Like,
            "in" => Self::In,
            "nin" => Self::Nin,
            "notnull" => Self::NotNull,
            "null" => Self::Null,
            other => return Err(format!("unknown condition type '{other}'")),
        })
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub condition_type: ConditionType,
    /// Emitted only when present.
    pub value: Option<String>,
}

impl Filter {
    pub fn new(field: impl Into<String>, condition_type: ConditionType) -> Self {
        Self {
            field: field.into(),
            condition_type,
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.value = (!value.is_empty()).then_some(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterGroup {
    pub filters: Vec<Filter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

/// Filtering, sorting and pagination for a list request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchCriteria {
    pub filter_groups: Vec<FilterGroup>,
    pub sort_orders: Vec<SortOrder>,
    pub page_size: Option<u32>,
    pub current_page: Option<u32>,
}

impl SearchCriteria {
    /// Build criteria from the host's collection value.
    ///
    /// Accepts an object or a JSON string; null and the empty string mean no
    /// criteria. Filters missing a field or condition and sort orders missing
    /// a field or direction are skipped, as are groups left empty.
    ///
    /// # Errors
    /// `InvalidJsonParameter` for an unparsable string, `InvalidParameter` for
    /// a wrong shape or an unknown condition type or direction.
    pub fn from_parameter(name: &str, value: &Value) -> Result<Self, DomainError> {
        let raw: RawCriteria = match value {
            Value::Null => return Ok(Self::default()),
            Value::String(s) if s.trim().is_empty() => return Ok(Self::default()),
            Value::String(s) => {
                serde_json::from_str(s).map_err(|e| DomainError::invalid_json(name, e.to_string()))?
            }
            other => serde_json::from_value(other.clone())
                .map_err(|e| DomainError::invalid_parameter(name, e.to_string()))?,
        };
        raw.into_criteria(name)
    }

    /// Encode as ordered (key, value) pairs.
    ///
    /// With `include_defaults`, pagination is always emitted (20 and 1 unless
    /// set); otherwise only the values that are set.
    pub fn encode(&self, include_defaults: bool) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        for (g, group) in self.filter_groups.iter().enumerate() {
            for (f, filter) in group.filters.iter().enumerate() {
                let base = format!("{PREFIX}[filter_groups][{g}][filters][{f}]");
                pairs.push((format!("{base}[field]"), filter.field.clone()));
                pairs.push((
                    format!("{base}[condition_type]"),
                    filter.condition_type.as_str().to_owned(),
                ));
                if let Some(value) = filter.value.as_ref().filter(|v| !v.is_empty()) {
                    pairs.push((format!("{base}[value]"), value.clone()));
                }
            }
        }

        for (s, sort) in self.sort_orders.iter().enumerate() {
            pairs.push((format!("{PREFIX}[sort_orders][{s}][field]"), sort.field.clone()));
            pairs.push((
                format!("{PREFIX}[sort_orders][{s}][direction]"),
                sort.direction.as_str().to_owned(),
            ));
        }

        let (page_size, current_page) = if include_defaults {
            (
                Some(self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)),
                Some(self.current_page.unwrap_or(DEFAULT_CURRENT_PAGE)),
            )
        } else {
            (self.page_size, self.current_page)
        };
        if let Some(size) = page_size {
            pairs.push((format!("{PREFIX}[pageSize]"), size.to_string()));
        }
        if let Some(page) = current_page {
            pairs.push((format!("{PREFIX}[currentPage]"), page.to_string()));
        }

        pairs
    }
}

/// Merge existing query pairs with criteria pairs.
///
/// Existing pairs keep their order; a criteria pair with the same key
/// replaces the value in place, new keys are appended.
pub fn merge_query(
    existing: &BTreeMap<String, String>,
    criteria: Vec<(String, String)>,
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = existing
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    for (key, value) in criteria {
        if let Some(slot) = merged.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            merged.push((key, value));
        }
    }
    merged
}

/// Percent-encode each pair and join with `&`.
pub fn to_query_string(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Append an encoded query to `url` with `?` or `&`.
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_owned();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawCriteria {
    filter_groups: Option<RawFilterGroups>,
    sort_orders: Option<RawSortOrders>,
    page_size: Option<Value>,
    current_page: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawFilterGroups {
    filter_group_values: Vec<RawFilterGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFilterGroup {
    filters: Option<RawFilters>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawFilters {
    filter_values: Vec<RawFilter>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawFilter {
    field: Option<String>,
    condition_type: Option<String>,
    value: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSortOrders {
    sort_order_values: Vec<RawSortOrder>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSortOrder {
    field: Option<String>,
    direction: Option<String>,
}

impl RawCriteria {
    fn into_criteria(self, name: &str) -> Result<SearchCriteria, DomainError> {
        let mut criteria = SearchCriteria::default();

        let groups = self.filter_groups.map(|g| g.filter_group_values).unwrap_or_default();
        for group in groups {
            let mut filters = Vec::new();
            let raw_filters = group.filters.map(|f| f.filter_values).unwrap_or_default();
            for raw in raw_filters {
                let (Some(field), Some(condition)) = (
                    raw.field.filter(|f| !f.is_empty()),
                    raw.condition_type.filter(|c| !c.is_empty()),
                ) else {
                    continue;
                };
                let condition_type = condition
                    .parse::<ConditionType>()
                    .map_err(|e| DomainError::invalid_parameter(name, e))?;
                let value = raw
                    .value
                    .filter(is_present)
                    .map(|v| to_plain_string(&v));
                filters.push(Filter {
                    field,
                    condition_type,
                    value,
                });
            }
            if !filters.is_empty() {
                criteria.filter_groups.push(FilterGroup { filters });
            }
        }

        let sorts = self.sort_orders.map(|s| s.sort_order_values).unwrap_or_default();
        for raw in sorts {
            let (Some(field), Some(direction)) = (
                raw.field.filter(|f| !f.is_empty()),
                raw.direction.filter(|d| !d.is_empty()),
            ) else {
                continue;
            };
            let direction = direction
                .parse::<SortDirection>()
                .map_err(|e| DomainError::invalid_parameter(name, e))?;
            criteria.sort_orders.push(SortOrder { field, direction });
        }

        criteria.page_size = positive(name, "pageSize", self.page_size.as_ref())?;
        criteria.current_page = positive(name, "currentPage", self.current_page.as_ref())?;
        Ok(criteria)
    }
}

/// Read a pagination number; zero and empty count as unset.
fn positive(name: &str, key: &str, value: Option<&Value>) -> Result<Option<u32>, DomainError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_u64().or_else(|| integral(n.as_f64())),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };
    let Some(number) = parsed else {
        return Err(DomainError::invalid_parameter(
            name,
            format!("{key} must be a positive integer"),
        ));
    };
    if number == 0 {
        return Ok(None);
    }
    u32::try_from(number)
        .map(Some)
        .map_err(|_| DomainError::invalid_parameter(name, format!("{key} is too large")))
}

/// Integral, non-negative floats within `u32` range.
fn integral(value: Option<f64>) -> Option<u64> {
    let f = value.filter(|f| f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(f))?;
    // Range checked above
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let number = f as u64;
    Some(number)
}
