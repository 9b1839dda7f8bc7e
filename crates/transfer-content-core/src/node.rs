//! Sites, node identities and resolved node handles.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::dimension::{DimensionValues, TargetDimensions, VariantKey};

/// Identity of a site (its root node name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub CompactString);

impl SiteId {
    /// Create a new site id.
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SiteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SiteId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&str> for NodeIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeIdentifier {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// A site as listed by the site directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Site identity.
    pub id: SiteId,
    /// Human-readable title.
    pub title: String,
    /// Whether the site is online.
    pub online: bool,
}

impl Site {
    /// Create a new online site.
    pub fn new(id: impl Into<CompactString>, title: impl Into<String>) -> Self {
        Self {
            id: SiteId::new(id),
            title: title.into(),
            online: true,
        }
    }
}

/// Stable node identifier, shared by every variant of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeIdentifier(pub CompactString);

impl NodeIdentifier {
    /// Create a new node identifier.
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the identifier is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for NodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully qualified node type name, e.g. `Neos.Neos:Document`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeTypeName(pub CompactString);

impl NodeTypeName {
    /// Create a new node type name.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The content context a node is resolved in.
///
/// An empty `dimensions` map selects the repository's default variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextScope {
    /// Site the context is rooted at.
    pub site: SiteId,
    /// Dimension fallback lists to read from.
    #[serde(default)]
    pub dimensions: DimensionValues,
    /// Dimension values written to.
    #[serde(default)]
    pub target_dimensions: TargetDimensions,
    /// Show hidden content.
    pub invisible_content_shown: bool,
    /// Show content the current user could not otherwise access.
    pub inaccessible_content_shown: bool,
}

impl ContextScope {
    /// Default-variant context for a site, with all content visible.
    pub fn default_variant(site: SiteId) -> Self {
        Self {
            site,
            dimensions: DimensionValues::new(),
            target_dimensions: TargetDimensions::new(),
            invisible_content_shown: true,
            inaccessible_content_shown: true,
        }
    }

    /// Dimension-scoped context for a site, with all content visible.
    pub fn for_dimensions(
        site: SiteId,
        dimensions: DimensionValues,
        target_dimensions: TargetDimensions,
    ) -> Self {
        Self {
            site,
            dimensions,
            target_dimensions,
            invisible_content_shown: true,
            inaccessible_content_shown: true,
        }
    }

    /// Check whether this is the default-variant context.
    pub fn is_default_variant(&self) -> bool {
        self.dimensions.is_empty() && self.target_dimensions.is_empty()
    }

    /// Key of the variant this context writes to.
    pub fn variant_key(&self) -> VariantKey {
        VariantKey::from_target_dimensions(&self.target_dimensions)
    }
}

/// A node resolved within one specific context.
///
/// Handles are bound to the context they were resolved in and must not be
/// used for an operation in any other context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeHandle {
    /// Stable identifier (same across variants).
    pub identifier: NodeIdentifier,
    /// Node type of this variant.
    pub node_type: NodeTypeName,
    /// Structural path of this variant.
    pub path: String,
    /// Context the handle was resolved in.
    pub context: ContextScope,
}

impl NodeHandle {
    /// Create a new node handle.
    pub fn new(
        identifier: NodeIdentifier,
        node_type: NodeTypeName,
        path: impl Into<String>,
        context: ContextScope,
    ) -> Self {
        Self {
            identifier,
            node_type,
            path: path.into(),
            context,
        }
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// Check whether the handle belongs to the given context.
    pub fn belongs_to(&self, context: &ContextScope) -> bool {
        &self.context == context
    }
}
