use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Prefix shared by every collection sourced from the Kubernetes API server.
pub const KUBE_COLLECTION_PREFIX: &str = "k8s/";

/// Unique name of a collection within a schema set (e.g., `k8s/core/v1/pods`).
///
/// Names double as the keys that transformer providers report as inputs and
/// outputs, so the filter compares them by exact string equality.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionName(pub String);

impl CollectionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for collections backed by the Kubernetes API (`k8s/` prefix).
    pub fn is_kube(&self) -> bool {
        self.0.starts_with(KUBE_COLLECTION_PREFIX)
    }

    /// Check the name against `^[A-Za-z0-9_.-]+(/[A-Za-z0-9_.-]+)*$`.
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            bail!("collection name must not be empty");
        }
        for segment in self.0.split('/') {
            if segment.is_empty() {
                bail!("collection name '{}' contains an empty segment", self.0);
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
            {
                bail!(
                    "collection name must match ^[A-Za-z0-9_.-]+(/[A-Za-z0-9_.-]+)*$, got {}",
                    self.0
                );
            }
        }
        Ok(())
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// `Ord` on the newtype is the derived `String` order, so `str` keys agree.
impl Borrow<str> for CollectionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CollectionName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CollectionName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Lookup key for a resource type: bare `kind` in the core (empty) group,
/// `group/kind` otherwise.
pub fn type_key(group: &str, kind: &str) -> String {
    if group.is_empty() {
        kind.to_string()
    } else {
        format!("{group}/{kind}")
    }
}
