#![allow(dead_code)]

use collection_filter::{
    CollectionName, CollectionSchema, ProviderGraph, ResourceSchema, Schemas, TransformSpec,
};
use std::collections::BTreeSet;

/// Fixture collection whose plural is the last segment of its name.
pub fn collection(name: &str, group: &str, kind: &str) -> CollectionSchema {
    let plural = name.rsplit('/').next().unwrap_or(name);
    CollectionSchema::new(name, ResourceSchema::new(group, "v1", kind, plural))
}

pub fn schemas(collections: impl IntoIterator<Item = CollectionSchema>) -> Schemas {
    let mut builder = Schemas::builder();
    for collection in collections {
        builder
            .add(collection)
            .expect("fixture collections must be unique");
    }
    builder.build()
}

pub fn names(values: &[&str]) -> Vec<CollectionName> {
    values.iter().map(|value| CollectionName::from(*value)).collect()
}

pub fn upstream(values: &[&str]) -> BTreeSet<CollectionName> {
    names(values).into_iter().collect()
}

pub fn kinds(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn transform(name: &str, inputs: &[&str], outputs: &[&str]) -> TransformSpec {
    TransformSpec {
        name: name.to_string(),
        inputs: names(inputs),
        outputs: names(outputs),
    }
}

/// Small mesh pipeline over the builtin registry's kube collections.
pub fn mesh_graph() -> ProviderGraph {
    ProviderGraph::new(vec![
        transform(
            "service-entry-synthesizer",
            &[
                "k8s/core/v1/services",
                "k8s/core/v1/endpoints",
                "k8s/core/v1/pods",
                "k8s/core/v1/nodes",
            ],
            &["istio/networking/v1alpha3/serviceentries"],
        ),
        transform(
            "virtualservice-direct",
            &["k8s/networking.istio.io/v1alpha3/virtualservices"],
            &["istio/networking/v1alpha3/virtualservices"],
        ),
        transform(
            "gateway-direct",
            &["k8s/networking.istio.io/v1alpha3/gateways"],
            &["istio/networking/v1alpha3/gateways"],
        ),
        transform(
            "ingress-conversion",
            &["k8s/extensions/v1beta1/ingresses", "k8s/core/v1/services"],
            &[
                "istio/networking/v1alpha3/virtualservices",
                "istio/networking/v1alpha3/gateways",
            ],
        ),
    ])
}

pub fn is_disabled(schemas: &Schemas, name: &str) -> bool {
    schemas
        .find(name)
        .unwrap_or_else(|| panic!("collection {name} missing from result"))
        .is_disabled()
}
