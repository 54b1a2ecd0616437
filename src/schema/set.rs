//! Ordered, name-unique collection sets.
//!
//! `Schemas` is the value the filter consumes and produces. Sets are only ever
//! assembled through `SchemasBuilder`, which rejects duplicate names so the
//! one-entry-per-name invariant holds for every set in circulation.

use crate::schema::identity::CollectionName;
use crate::schema::model::CollectionSchema;
use anyhow::{Result, bail};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
/// Immutable set of collection schemas keyed by name.
///
/// Iteration follows name order; callers should not rely on it beyond
/// determinism.
pub struct Schemas {
    by_name: BTreeMap<CollectionName, CollectionSchema>,
}

impl Schemas {
    pub fn builder() -> SchemasBuilder {
        SchemasBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Iterates schemas in stable name order.
    pub fn iter(&self) -> impl Iterator<Item = &CollectionSchema> {
        self.by_name.values()
    }

    pub fn find(&self, name: &str) -> Option<&CollectionSchema> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &CollectionName) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn collection_names(&self) -> Vec<CollectionName> {
        self.by_name.keys().cloned().collect()
    }

    pub fn disabled_collection_names(&self) -> Vec<CollectionName> {
        self.iter()
            .filter(|schema| schema.is_disabled())
            .map(|schema| schema.name().clone())
            .collect()
    }

    /// Subset of collections sourced from the Kubernetes API.
    pub fn kube(&self) -> Schemas {
        Schemas {
            by_name: self
                .by_name
                .iter()
                .filter(|(name, _)| name.is_kube())
                .map(|(name, schema)| (name.clone(), schema.clone()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Schemas {
    type Item = &'a CollectionSchema;
    type IntoIter = std::collections::btree_map::Values<'a, CollectionName, CollectionSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.by_name.values()
    }
}

#[derive(Debug, Default)]
/// Accumulates schemas for a new `Schemas` value, enforcing unique names.
pub struct SchemasBuilder {
    by_name: BTreeMap<CollectionName, CollectionSchema>,
}

impl SchemasBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema; fails if a schema with the same name was already added.
    pub fn add(&mut self, schema: CollectionSchema) -> Result<()> {
        if self.by_name.contains_key(schema.name()) {
            bail!("collection already exists: {}", schema.name());
        }
        self.by_name.insert(schema.name().clone(), schema);
        Ok(())
    }

    pub fn build(self) -> Schemas {
        Schemas {
            by_name: self.by_name,
        }
    }
}
