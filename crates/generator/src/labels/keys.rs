//! Keys — resolution of the label key set for a Loki output.

use std::collections::BTreeSet;

use crate::spec::Loki;

/// Node the record was collected on.
pub const LABEL_KUBERNETES_HOST: &str = "kubernetes.host";
/// Transport-level tag of the record.
pub const LABEL_TAG: &str = "tag";

const DEFAULT_LABEL_KEYS: &[&str] = &[
    "log_type",
    // container labels
    "kubernetes.namespace_name",
    "kubernetes.pod_name",
    "kubernetes.container_name",
];

// Needed to serialize records back out of Loki.
const REQUIRED_LABEL_KEYS: &[&str] = &[LABEL_KUBERNETES_HOST, LABEL_TAG];

/// Deduplicated dotted field paths, sorted lexicographically.
///
/// Always contains [`LABEL_KUBERNETES_HOST`] and [`LABEL_TAG`]. Built once per
/// render and shared by every fragment that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelKeySet {
    keys: Vec<String>,
}

impl LabelKeySet {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.binary_search_by(|k| k.as_str().cmp(key)).is_ok()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keys
    }
}

impl<'a> IntoIterator for &'a LabelKeySet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// Resolve the label keys for an output.
///
/// A non-empty `label_keys` override seeds the set, otherwise the defaults do.
/// An explicit empty list behaves like unset. The required keys are always
/// added.
pub fn resolve_label_keys(loki: Option<&Loki>) -> LabelKeySet {
    let mut keys: BTreeSet<String> = match loki.and_then(|l| l.label_keys.as_deref()) {
        Some(overrides) if !overrides.is_empty() => overrides.iter().cloned().collect(),
        _ => DEFAULT_LABEL_KEYS.iter().map(|k| k.to_string()).collect(),
    };
    keys.extend(REQUIRED_LABEL_KEYS.iter().map(|k| k.to_string()));

    LabelKeySet {
        keys: keys.into_iter().collect(),
    }
}
