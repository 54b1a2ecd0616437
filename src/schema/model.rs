//! Deserializable representation of `schema/collections.json`.
//!
//! The types mirror the registry manifest so callers can reason about resource
//! metadata without ad-hoc JSON handling. Use `SchemaRegistry` for validation
//! and name lookup; use these structs when a single descriptor is needed.

use crate::schema::identity::{CollectionName, type_key};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// Resource type a collection carries: API group, version, and kind.
pub struct ResourceSchema {
    /// API group; the empty string is the core group.
    pub group: String,
    pub version: String,
    pub kind: String,
    pub plural: String,
    #[serde(default)]
    pub cluster_scoped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proto: Option<String>,
}

impl ResourceSchema {
    /// Namespaced resource with no proto binding. `plural` is the REST path
    /// segment, which is not always derivable from `kind` (`Endpoints`).
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
        plural: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
            plural: plural.into(),
            cluster_scoped: false,
            proto: None,
        }
    }

    /// Group-qualified kind key used by the service discovery lookup.
    pub fn group_kind(&self) -> String {
        type_key(&self.group, &self.kind)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// One named collection in a schema set.
///
/// Values are immutable once built; [`CollectionSchema::disable`] returns a
/// disabled copy instead of flipping the flag in place.
pub struct CollectionSchema {
    name: CollectionName,
    resource: ResourceSchema,
    #[serde(default)]
    disabled: bool,
}

impl CollectionSchema {
    pub fn new(name: impl Into<CollectionName>, resource: ResourceSchema) -> Self {
        Self {
            name: name.into(),
            resource,
            disabled: false,
        }
    }

    pub fn name(&self) -> &CollectionName {
        &self.name
    }

    pub fn resource(&self) -> &ResourceSchema {
        &self.resource
    }

    pub fn group(&self) -> &str {
        &self.resource.group
    }

    pub fn kind(&self) -> &str {
        &self.resource.kind
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_kube(&self) -> bool {
        self.name.is_kube()
    }

    /// Return a copy of this collection marked disabled.
    pub fn disable(&self) -> Self {
        Self {
            disabled: true,
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
/// Registry manifest as stored on disk. Only `SchemaRegistry` decodes it,
/// after the manifest has passed schema validation.
pub(crate) struct RegistryManifest {
    pub schema_version: String,
    pub collections: Vec<CollectionSchema>,
}
