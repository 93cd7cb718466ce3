//! Per-request target info.
//!
//! Accumulates, for one compilation request, the detected architecture,
//! a set-valued feature multimap and the machine-dependent scalar types the
//! target supports. Insertions are monotonic and idempotent; nothing is
//! ever removed.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use jitinfo_types::PortableType;

/// Target info gathered during one request's registration phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetInfo {
    arch: Option<String>,
    features: BTreeMap<String, BTreeSet<String>>,
    supported_types: BTreeSet<PortableType>,
    supports_128bit_int: bool,
}

impl TargetInfo {
    /// An empty registry: no architecture, no features, no types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `(key, value)` into the feature multimap. Re-inserting is a no-op.
    pub fn add_feature(&mut self, key: &str, value: &str) {
        if let Some(values) = self.features.get_mut(key) {
            values.insert(value.to_string());
        } else {
            self.features
                .insert(key.to_string(), BTreeSet::from([value.to_string()]));
        }
    }

    /// Set the detected architecture. The last write wins.
    pub fn set_arch(&mut self, arch: impl Into<String>) {
        self.arch = Some(arch.into());
    }

    pub fn add_supported_type(&mut self, ty: PortableType) {
        self.supported_types.insert(ty);
    }

    pub fn set_128bit_int_support(&mut self, supported: bool) {
        self.supports_128bit_int = supported;
    }

    /// Whether `value` was registered under `key`. False if `key` is absent.
    pub fn has_feature(&self, key: &str, value: &str) -> bool {
        match self.features.get(key) {
            Some(values) => values.contains(value),
            None => false,
        }
    }

    pub fn arch(&self) -> Option<&str> {
        self.arch.as_deref()
    }

    pub fn supported_types(&self) -> &BTreeSet<PortableType> {
        &self.supported_types
    }

    pub fn supports_type(&self, ty: &PortableType) -> bool {
        self.supported_types.contains(ty)
    }

    pub fn supports_128bit_int(&self) -> bool {
        self.supports_128bit_int
    }

    /// All values registered under `key`, in sorted order.
    pub fn feature_values(&self, key: &str) -> impl Iterator<Item = &str> {
        self.features
            .get(key)
            .into_iter()
            .flat_map(|values| values.iter().map(String::as_str))
    }

    /// All feature keys, in sorted order.
    pub fn feature_keys(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    /// Total number of registered `(key, value)` pairs.
    pub fn feature_count(&self) -> usize {
        self.features.values().map(BTreeSet::len).sum()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.arch.is_none()
            && self.features.is_empty()
            && self.supported_types.is_empty()
            && !self.supports_128bit_int
    }
}
