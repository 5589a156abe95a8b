//! Domain layer: request construction and dispatch.

pub mod assembler;
pub mod catalog;
pub mod error;
pub mod error_format;
pub mod params;
pub mod registry;
pub mod search_criteria;
pub mod service;
pub mod simplify;
pub mod store_views;
pub mod transform;
pub mod url_template;
pub mod values;

#[cfg(test)]
mod test_support;
