//! Disables collections that a deployment does not need.
//!
//! Two independent rules feed the decision for each collection:
//!
//! - kind exclusion: kinds on the exclude list are disabled, unless service
//!   discovery is enabled and the kind is one it depends on;
//! - upstream reachability: collections that no requested output depends on
//!   are disabled, with no service discovery override.
//!
//! Disabled collections stay in the result set so the output always has the
//! same members as the input.

use crate::schema::{
    CollectionName, CollectionSchema, ResourceSchema, Schemas, builtin_registry, type_key,
};
use crate::transform::TransformerProviders;
use anyhow::Result;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::{debug, trace, warn};

// Core-group kinds the service registry reads from the API server.
const SERVICE_DISCOVERY_KINDS: &[(&str, &str)] = &[
    ("", "Service"),
    ("", "Namespace"),
    ("", "Node"),
    ("", "Pod"),
    ("", "Secret"),
];

static KNOWN_TYPES: LazyLock<BTreeSet<String>> = LazyLock::new(|| {
    SERVICE_DISCOVERY_KINDS
        .iter()
        .map(|(group, kind)| type_key(group, kind))
        .collect()
});

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
/// Outcome of the filter rules for one collection.
pub struct CollectionDecision {
    /// Kind appears on the exclude list.
    pub excluded_kind: bool,
    /// Exclusion was lifted because service discovery needs the kind.
    pub service_discovery_override: bool,
    /// Name is among the inputs required by the requested outputs.
    pub upstream: bool,
}

impl CollectionDecision {
    pub fn evaluate(
        schema: &CollectionSchema,
        upstream: &BTreeSet<CollectionName>,
        excluded_kinds: &[String],
        enable_service_discovery: bool,
    ) -> Self {
        let excluded_kind = is_kind_excluded(excluded_kinds, schema.kind());
        let service_discovery_override = excluded_kind
            && enable_service_discovery
            && is_required_for_service_discovery(schema.resource());
        Self {
            excluded_kind,
            service_discovery_override,
            upstream: upstream.contains(schema.name()),
        }
    }

    pub fn disabled(&self) -> bool {
        (self.excluded_kind && !self.service_discovery_override) || !self.upstream
    }

    fn reason(&self) -> &'static str {
        match (self.excluded_kind && !self.service_discovery_override, self.upstream) {
            (true, false) => "excluded kind, not upstream of required collections",
            (true, true) => "excluded kind",
            (false, false) => "not upstream of required collections",
            (false, true) => "enabled",
        }
    }
}

/// Produce a copy of `schemas` with unneeded collections disabled.
///
/// `required` names transformer outputs; `providers` maps them to the input
/// collections that must stay enabled. Collections whose kind is listed in
/// `excluded_kinds` are disabled too, unless `enable_service_discovery` is set
/// and the kind is needed for service discovery. Collections that were
/// already disabled stay disabled.
pub fn filter_collections<P>(
    schemas: &Schemas,
    providers: &P,
    required: &[CollectionName],
    excluded_kinds: &[String],
    enable_service_discovery: bool,
) -> Schemas
where
    P: TransformerProviders + ?Sized,
{
    let upstream = providers.required_inputs_for(required);

    let mut builder = Schemas::builder();
    let mut disabled_count = 0usize;
    for schema in schemas {
        let decision = CollectionDecision::evaluate(
            schema,
            &upstream,
            excluded_kinds,
            enable_service_discovery,
        );
        let filtered = if decision.disabled() {
            disabled_count += 1;
            debug!(
                collection = %schema.name(),
                kind = schema.kind(),
                reason = decision.reason(),
                "disabling collection"
            );
            schema.disable()
        } else {
            trace!(collection = %schema.name(), "keeping collection");
            schema.clone()
        };
        // Input names are unique, so this only fails on a broken input set.
        if let Err(err) = builder.add(filtered) {
            warn!("{err:#}");
        }
    }

    let result = builder.build();
    debug!(
        total = result.len(),
        disabled = disabled_count,
        upstream = upstream.len(),
        "filtered collections"
    );
    result
}

/// Kinds of every master-registry kube collection that is excluded by default.
pub fn default_excluded_resource_kinds() -> Result<Vec<String>> {
    let registry = builtin_registry()?;
    Ok(default_excluded_kinds_in(&registry.kube_collections()))
}

/// Kinds of the collections in `schemas` that are excluded by default, in
/// set order.
pub fn default_excluded_kinds_in(schemas: &Schemas) -> Vec<String> {
    schemas
        .iter()
        .filter(|schema| is_default_excluded(schema.resource()))
        .map(|schema| schema.kind().to_string())
        .collect()
}

/// True when the service registry reads this resource type.
pub fn is_required_for_service_discovery(resource: &ResourceSchema) -> bool {
    KNOWN_TYPES.contains(&resource.group_kind())
}

/// True when the resource type is on the default exclude list.
///
/// Shares its table with [`is_required_for_service_discovery`] for now; the
/// two are kept apart so the default list can change on its own.
pub fn is_default_excluded(resource: &ResourceSchema) -> bool {
    is_required_for_service_discovery(resource)
}

fn is_kind_excluded(excluded_kinds: &[String], kind: &str) -> bool {
    excluded_kinds.iter().any(|excluded| excluded == kind)
}
