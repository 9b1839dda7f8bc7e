//! Dimension plan entries and variant keys.

use std::fmt;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::node::{ContextScope, SiteId};

/// Dimension name to fallback values, in priority order.
pub type DimensionValues = IndexMap<String, Vec<String>>;

/// Dimension name to the single value written to.
pub type TargetDimensions = IndexMap<String, String>;

/// Label of a target variant: its target dimension values joined by `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantKey(pub String);

impl VariantKey {
    /// Build the key from target dimensions, in their configured order.
    pub fn from_target_dimensions(target_dimensions: &TargetDimensions) -> Self {
        Self(target_dimensions.values().join("_"))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One configured replay step: read from `dimensions`, write to
/// `target_dimensions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionSpec {
    /// Variant read from, e.g. `{ country = ["de"], language = ["en"] }`.
    #[serde(default)]
    pub dimensions: DimensionValues,
    /// Variant written to, e.g. `{ country = "de", language = "en" }`.
    #[serde(default)]
    pub target_dimensions: TargetDimensions,
}

impl DimensionSpec {
    /// Create a spec that reads and writes the same single-valued variant.
    pub fn single<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut spec = Self::default();
        for (name, value) in values {
            spec.dimensions.insert(name.to_string(), vec![value.to_string()]);
            spec.target_dimensions
                .insert(name.to_string(), value.to_string());
        }
        spec
    }

    /// Key of the target variant.
    pub fn variant_key(&self) -> VariantKey {
        VariantKey::from_target_dimensions(&self.target_dimensions)
    }

    /// Context scoped to this variant within `site`.
    pub fn scope(&self, site: SiteId) -> ContextScope {
        ContextScope::for_dimensions(
            site,
            self.dimensions.clone(),
            self.target_dimensions.clone(),
        )
    }
}

/// Ordered list of dimension specs replayed after a default-variant move.
///
/// Order is significant: it is the order of per-variant messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionPlan(Vec<DimensionSpec>);

impl DimensionPlan {
    /// Create a plan from specs in replay order.
    pub fn new(specs: Vec<DimensionSpec>) -> Self {
        Self(specs)
    }

    /// Create an empty plan (default variant only).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if the plan has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Entries in configured order.
    pub fn specs(&self) -> &[DimensionSpec] {
        &self.0
    }

    /// Iterate entries in configured order.
    pub fn iter(&self) -> std::slice::Iter<'_, DimensionSpec> {
        self.0.iter()
    }
}

impl From<Vec<DimensionSpec>> for DimensionPlan {
    fn from(specs: Vec<DimensionSpec>) -> Self {
        Self::new(specs)
    }
}

impl<'a> IntoIterator for &'a DimensionPlan {
    type Item = &'a DimensionSpec;
    type IntoIter = std::slice::Iter<'a, DimensionSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
