//! Collection schema wiring.
//!
//! This module wraps the JSON registry under `schema/collections.json` so the
//! filter can work on a validated snapshot with consistent identifiers. Types
//! here mirror the manifest fields; callers use `Schemas` as the value being
//! filtered and `SchemaRegistry` when loading a manifest.

pub mod identity;
pub mod model;
pub mod registry;
pub mod set;

pub use identity::{CollectionName, KUBE_COLLECTION_PREFIX, type_key};
pub use model::{CollectionSchema, ResourceSchema};
pub use registry::{REGISTRY_SCHEMA_VERSION, SchemaRegistry, builtin_registry};
pub use set::{Schemas, SchemasBuilder};
