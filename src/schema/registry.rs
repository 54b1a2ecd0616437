//! Validated, indexed view of a collection registry manifest.
//!
//! The registry enforces the expected manifest schema version, checks every
//! collection name, and refuses duplicate names so filters never see a
//! malformed set. The crate embeds a master registry that backs
//! `default_excluded_resource_kinds`.

use crate::schema::identity::CollectionName;
use crate::schema::model::{CollectionSchema, RegistryManifest};
use crate::schema::set::Schemas;
use crate::schema_loader::{
    SchemaLoadResult, check_schema_version, collections_schema, load_json_schema,
    validate_instance,
};
use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Manifest version this crate understands.
pub const REGISTRY_SCHEMA_VERSION: &str = "collections_v1";

const MASTER_REGISTRY: &str = include_str!("../../schema/collections.json");
const SCHEMA_FILE_NAME: &str = "collections.schema.json";

#[derive(Debug)]
/// Registry manifest plus the schema set derived from it.
pub struct SchemaRegistry {
    schema_version: String,
    schemas: Schemas,
}

impl SchemaRegistry {
    /// Load and validate a registry manifest from disk.
    ///
    /// A `collections.schema.json` next to the manifest takes precedence over
    /// the embedded schema, which lets fixtures pin their own contract.
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let schema = match sibling_schema_path(path) {
            Some(schema_path) => load_json_schema(&schema_path)?,
            None => collections_schema()?,
        };
        Self::from_json_with_schema(&path.display().to_string(), &text, &schema)
            .with_context(|| format!("loading {}", path.display()))
    }

    /// Validate and index a manifest held in memory; `label` names it in errors.
    pub fn from_json_str(label: &str, text: &str) -> Result<Self> {
        let schema = collections_schema()?;
        Self::from_json_with_schema(label, text, &schema)
    }

    fn from_json_with_schema(
        label: &str,
        text: &str,
        schema: &SchemaLoadResult,
    ) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).with_context(|| format!("parsing {label}"))?;
        validate_instance(schema, &value, label)?;

        let manifest: RegistryManifest = serde_json::from_value(value)
            .with_context(|| format!("decoding registry manifest {label}"))?;
        check_schema_version(&manifest.schema_version, &allowed_schema_versions())?;
        let schemas = build_schemas(manifest.collections)?;
        debug!(
            registry = label,
            collections = schemas.len(),
            "loaded collection registry"
        );
        Ok(Self {
            schema_version: manifest.schema_version,
            schemas,
        })
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn schemas(&self) -> &Schemas {
        &self.schemas
    }

    /// Collections sourced from the Kubernetes API (`k8s/` prefix).
    pub fn kube_collections(&self) -> Schemas {
        self.schemas.kube()
    }

    /// Resolve a collection by name.
    ///
    /// Returns `None` instead of erroring; callers decide whether a missing
    /// collection is fatal.
    pub fn collection(&self, name: &CollectionName) -> Option<&CollectionSchema> {
        self.schemas.find(name.as_str())
    }
}

/// The master registry compiled into the crate.
///
/// Parsed once per process and shared read-only afterwards.
pub fn builtin_registry() -> Result<&'static SchemaRegistry> {
    static REGISTRY: OnceLock<std::result::Result<SchemaRegistry, String>> = OnceLock::new();
    REGISTRY
        .get_or_init(|| {
            SchemaRegistry::from_json_str("builtin collections.json", MASTER_REGISTRY)
                .map_err(|err| format!("{err:#}"))
        })
        .as_ref()
        .map_err(|err| anyhow!("master collection registry is invalid: {err}"))
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([REGISTRY_SCHEMA_VERSION.to_string()])
}

fn sibling_schema_path(manifest_path: &Path) -> Option<PathBuf> {
    let candidate = manifest_path.parent()?.join(SCHEMA_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

fn build_schemas(collections: Vec<CollectionSchema>) -> Result<Schemas> {
    let mut builder = Schemas::builder();
    for collection in collections {
        collection.name().validate()?;
        let resource = collection.resource();
        if resource.kind.trim().is_empty() {
            bail!("collection {} has an empty kind", collection.name());
        }
        if resource.version.trim().is_empty() {
            bail!("collection {} has an empty version", collection.name());
        }
        builder.add(collection)?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn manifest(collections: Value) -> String {
        json!({
            "schema_version": REGISTRY_SCHEMA_VERSION,
            "collections": collections,
        })
        .to_string()
    }

    #[test]
    fn builtin_registry_loads() {
        let registry = builtin_registry().expect("builtin registry parses");
        assert_eq!(registry.schema_version(), REGISTRY_SCHEMA_VERSION);
        assert!(
            registry
                .collection(&CollectionName::from("k8s/core/v1/pods"))
                .is_some()
        );
        let kube = registry.kube_collections();
        assert!(!kube.is_empty());
        assert!(kube.len() < registry.schemas().len());
        assert!(registry.schemas().iter().all(|s| !s.is_disabled()));
    }

    #[test]
    fn builtin_plurals_come_from_manifest() {
        let registry = builtin_registry().expect("builtin registry parses");
        for (name, plural) in [
            ("k8s/core/v1/endpoints", "endpoints"),
            ("k8s/extensions/v1beta1/ingresses", "ingresses"),
        ] {
            let schema = registry
                .collection(&CollectionName::from(name))
                .unwrap_or_else(|| panic!("{name} present"));
            assert_eq!(schema.resource().plural, plural);
        }
    }

    #[test]
    fn rejects_duplicate_collection_names() {
        let text = manifest(json!([
            {"name": "k8s/core/v1/pods", "resource": {"group": "", "version": "v1", "kind": "Pod", "plural": "pods"}},
            {"name": "k8s/core/v1/pods", "resource": {"group": "", "version": "v1", "kind": "Pod", "plural": "pods"}}
        ]));
        let err = SchemaRegistry::from_json_str("dupes", &text).expect_err("duplicates fail");
        assert!(err.to_string().contains("collection already exists"));
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let text = json!({"schema_version": "collections_v0", "collections": []}).to_string();
        let err = SchemaRegistry::from_json_str("old", &text).expect_err("version mismatch");
        assert!(err.to_string().contains("collections_v0"));

        let text = json!({"schema_version": "", "collections": []}).to_string();
        let err = SchemaRegistry::from_json_str("blank", &text).expect_err("blank version");
        assert!(err.to_string().contains("failed schema validation"));
    }

    #[test]
    fn rejects_manifest_that_violates_schema() {
        let text = manifest(json!([
            {"name": "k8s/core/v1/pods", "resource": {"group": "", "version": "v1", "plural": "pods"}}
        ]));
        let err = SchemaRegistry::from_json_str("missing-kind", &text).expect_err("schema fails");
        assert!(err.to_string().contains("failed schema validation"));
    }

    #[test]
    fn rejects_blank_kind() {
        let text = manifest(json!([
            {"name": "k8s/core/v1/pods", "resource": {"group": "", "version": "v1", "kind": " ", "plural": "pods"}}
        ]));
        let err = SchemaRegistry::from_json_str("blank-kind", &text).expect_err("blank kind");
        assert_eq!(err.to_string(), "collection k8s/core/v1/pods has an empty kind");
    }

    #[test]
    fn load_prefers_sibling_schema() -> Result<()> {
        let dir = TempDir::new()?;
        let manifest_path = dir.path().join("collections.json");
        fs::write(
            &manifest_path,
            manifest(json!([
                {"name": "custom/things", "resource": {"group": "example.com", "version": "v1", "kind": "Thing", "plural": "things"}}
            ])),
        )?;

        let registry = SchemaRegistry::load(&manifest_path)?;
        assert_eq!(registry.schemas().len(), 1);

        // A stricter sibling contract rejects the same manifest.
        fs::write(
            dir.path().join(SCHEMA_FILE_NAME),
            json!({"type": "object", "properties": {"collections": {"maxItems": 0}}}).to_string(),
        )?;
        let err = SchemaRegistry::load(&manifest_path).expect_err("sibling schema applies");
        assert!(format!("{err:#}").contains("failed schema validation"));
        Ok(())
    }
}
