//! Filter configuration.
//!
//! Settings come from three places: code (`Default`), the process environment,
//! or a JSON file. None of them are required; an empty configuration keeps
//! every kind and requests no outputs, which disables every collection.

use crate::filter::{default_excluded_resource_kinds, filter_collections};
use crate::schema::{CollectionName, Schemas};
use crate::split_list;
use crate::transform::TransformerProviders;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const EXCLUDED_KINDS_ENV: &str = "COLLECTION_FILTER_EXCLUDED_KINDS";
pub const REQUIRED_COLLECTIONS_ENV: &str = "COLLECTION_FILTER_REQUIRED_COLLECTIONS";
pub const SERVICE_DISCOVERY_ENV: &str = "COLLECTION_FILTER_SERVICE_DISCOVERY";

// Sentinel for the excluded-kinds variable that selects the built-in list.
const DEFAULT_KINDS_SENTINEL: &str = "default";

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
/// Inputs for one `filter_collections` run.
pub struct FilterSettings {
    /// Transformer outputs the deployment needs.
    #[serde(default)]
    pub required_collections: Vec<CollectionName>,
    #[serde(default)]
    pub excluded_kinds: Vec<String>,
    #[serde(default)]
    pub enable_service_discovery: bool,
}

impl FilterSettings {
    /// Settings whose exclude list is the built-in default.
    pub fn with_default_exclusions() -> Result<Self> {
        Ok(Self {
            excluded_kinds: default_excluded_resource_kinds()?,
            ..Self::default()
        })
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns the raw value for a key.
    ///
    /// Unset keys keep their defaults. `COLLECTION_FILTER_EXCLUDED_KINDS=default`
    /// selects the built-in exclude list.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(EXCLUDED_KINDS_ENV) {
            settings.excluded_kinds = if raw.trim() == DEFAULT_KINDS_SENTINEL {
                default_excluded_resource_kinds()?
            } else {
                split_list(&raw)
            };
        }

        if let Some(raw) = lookup(REQUIRED_COLLECTIONS_ENV) {
            settings.required_collections = split_list(&raw)
                .into_iter()
                .map(CollectionName::from)
                .collect();
        }

        settings.enable_service_discovery = lookup(SERVICE_DISCOVERY_ENV)
            .map(|raw| is_truthy(&raw))
            .unwrap_or(false);

        debug!(
            excluded_kinds = settings.excluded_kinds.len(),
            required_collections = settings.required_collections.len(),
            service_discovery = settings.enable_service_discovery,
            "resolved filter settings"
        );
        Ok(settings)
    }

    /// Run the collection filter with these settings.
    pub fn apply<P>(&self, schemas: &Schemas, providers: &P) -> Schemas
    where
        P: TransformerProviders + ?Sized,
    {
        filter_collections(
            schemas,
            providers,
            &self.required_collections,
            &self.excluded_kinds,
            self.enable_service_discovery,
        )
    }
}

/// Read settings from a JSON file; missing fields take their defaults.
pub fn load_settings_from_path(path: &Path) -> Result<FilterSettings> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing settings {}", path.display()))
}

fn is_truthy(raw: &str) -> bool {
    let value = raw.trim().to_ascii_lowercase();
    !value.is_empty() && !matches!(value.as_str(), "0" | "false" | "no" | "off")
}
