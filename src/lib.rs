//! Shared library for filtering resource collection sets.
//!
//! The crate exposes the collection schema model, the transformer provider
//! seam, and the filter that decides which collections a deployment keeps
//! enabled. Public functions here form the contract the surrounding system
//! depends on: `filter_collections`, `default_excluded_resource_kinds`,
//! `is_required_for_service_discovery`, and `is_default_excluded`.

pub mod filter;
pub mod schema;
mod schema_loader;
pub mod settings;
pub mod transform;

pub use filter::{
    CollectionDecision, default_excluded_kinds_in, default_excluded_resource_kinds,
    filter_collections, is_default_excluded, is_required_for_service_discovery,
};
pub use schema::{
    CollectionName, CollectionSchema, REGISTRY_SCHEMA_VERSION, ResourceSchema, SchemaRegistry,
    Schemas, SchemasBuilder, builtin_registry,
};
pub use settings::{FilterSettings, load_settings_from_path};
pub use transform::{ProviderGraph, TransformSpec, TransformerProviders};

/// Split comma- or whitespace-delimited configuration lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
