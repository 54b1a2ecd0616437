//! Transformer providers and the input closure they imply.
//!
//! A transform consumes input collections and produces output collections.
//! The filter only needs one question answered: which inputs must stay
//! enabled so that a set of requested outputs can be produced.

use crate::schema::{CollectionName, Schemas};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Source of the upstream input set for a group of requested outputs.
pub trait TransformerProviders {
    fn required_inputs_for(&self, outputs: &[CollectionName]) -> BTreeSet<CollectionName>;
}

/// A fixed upstream set, for callers that already know the closure.
impl TransformerProviders for BTreeSet<CollectionName> {
    fn required_inputs_for(&self, _outputs: &[CollectionName]) -> BTreeSet<CollectionName> {
        self.clone()
    }
}

#[derive(Clone, Debug, Deserialize)]
/// One transform: the collections it reads and the collections it writes.
pub struct TransformSpec {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<CollectionName>,
    #[serde(default)]
    pub outputs: Vec<CollectionName>,
}

#[derive(Clone, Debug, Default, Deserialize)]
/// Transform graph read from `{"transforms": [...]}`.
pub struct ProviderGraph {
    #[serde(default)]
    transforms: Vec<TransformSpec>,
}

impl ProviderGraph {
    pub fn new(transforms: Vec<TransformSpec>) -> Self {
        Self { transforms }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_json_str(&data).with_context(|| format!("loading {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing transformer provider graph")
    }

    pub fn transforms(&self) -> &[TransformSpec] {
        &self.transforms
    }

    /// Report transforms that reference collections missing from `schemas`.
    pub fn validate_against(&self, schemas: &Schemas) -> Vec<String> {
        // Collect everything so callers can surface all problems at once.
        let mut errors = Vec::new();
        for transform in &self.transforms {
            let label = if transform.name.trim().is_empty() {
                errors.push("transform with no name".to_string());
                "<unnamed>"
            } else {
                transform.name.as_str()
            };
            for input in &transform.inputs {
                if !schemas.contains(input) {
                    errors.push(format!("transform {label} reads unknown collection '{input}'"));
                }
            }
            for output in &transform.outputs {
                if !schemas.contains(output) {
                    errors.push(format!(
                        "transform {label} writes unknown collection '{output}'"
                    ));
                }
            }
        }
        errors
    }
}

impl TransformerProviders for ProviderGraph {
    /// Transitive closure: inputs of the producing transforms, then inputs of
    /// whatever produces those, until nothing new is reached.
    fn required_inputs_for(&self, outputs: &[CollectionName]) -> BTreeSet<CollectionName> {
        let mut required = BTreeSet::new();
        let mut visited: BTreeSet<&CollectionName> = outputs.iter().collect();
        let mut frontier: Vec<&CollectionName> = outputs.iter().collect();

        while let Some(wanted) = frontier.pop() {
            for transform in &self.transforms {
                if !transform.outputs.contains(wanted) {
                    continue;
                }
                for input in &transform.inputs {
                    required.insert(input.clone());
                    if visited.insert(input) {
                        frontier.push(input);
                    }
                }
            }
        }

        required
    }
}
