//! Shared JSON Schema loader for manifest validation.
//!
//! Registry manifests are checked against `schema/collections.schema.json`
//! before they are deserialized, so structural problems surface as schema
//! violations with JSON pointers instead of opaque serde errors.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Manifest contract shipped with the crate.
pub(crate) const COLLECTIONS_SCHEMA: &str = include_str!("../schema/collections.schema.json");

/// Result of loading and compiling a JSON Schema.
pub(crate) struct SchemaLoadResult {
    pub compiled: JSONSchema,
}

/// Compile a schema document; `label` names it in error messages.
pub(crate) fn compile_schema(label: &str, schema: &Value) -> Result<SchemaLoadResult> {
    let compiled = JSONSchema::compile(schema)
        .map_err(|err| anyhow!("compiling schema {label}: {err}"))?;
    Ok(SchemaLoadResult { compiled })
}

/// Parse and compile the embedded collections manifest schema.
pub(crate) fn collections_schema() -> Result<SchemaLoadResult> {
    let raw: Value = serde_json::from_str(COLLECTIONS_SCHEMA)
        .context("parsing embedded collections schema")?;
    compile_schema("collections.schema.json", &raw)
}

/// Parse and compile a schema from disk.
pub(crate) fn load_json_schema(path: &Path) -> Result<SchemaLoadResult> {
    let file =
        File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
    let raw: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing schema {}", path.display()))?;
    compile_schema(&path.display().to_string(), &raw)
}

/// Validate `instance` and fold every violation into one error.
pub(crate) fn validate_instance(
    schema: &SchemaLoadResult,
    instance: &Value,
    label: &str,
) -> Result<()> {
    if let Err(errors) = schema.compiled.validate(instance) {
        let details = errors
            .map(|err| format!("{}: {err}", err.instance_path))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("{label} failed schema validation:\n{details}");
    }
    Ok(())
}

/// Ensure `version` is one of `allowed`. Manifests reach this after schema
/// validation, so only the allowed set is checked here.
pub(crate) fn check_schema_version(version: &str, allowed: &BTreeSet<String>) -> Result<()> {
    if !allowed.contains(version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            version,
            allowed
        );
    }
    Ok(())
}
