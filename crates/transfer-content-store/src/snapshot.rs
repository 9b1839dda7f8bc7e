//! Snapshot file format.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use transfer_content_core::{NodeIdentifier, NodeTypeName, SiteId, TargetDimensions};

use crate::SITES_ROOT;

/// Errors reading or writing snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON.
    #[error("Invalid snapshot JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Structurally valid JSON describing an inconsistent repository.
    #[error("Invalid snapshot: {message}")]
    Invalid { message: String },
}

/// A site entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub name: SiteId,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_true")]
    pub online: bool,
}

fn default_true() -> bool {
    true
}

/// A node type declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeDefinition {
    /// Direct super types, in declaration order.
    #[serde(default)]
    pub super_types: Vec<String>,
    /// Kept so that a load and save round trip preserves the declaration;
    /// abstract types still resolve as super types.
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// Child type name (or `*`) to whether it is allowed.
    #[serde(default)]
    pub constraints: IndexMap<String, bool>,
}

/// One variant of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub identifier: NodeIdentifier,
    pub node_type: NodeTypeName,
    pub path: String,
    /// Dimension values of this variant.
    #[serde(default)]
    pub dimensions: TargetDimensions,
    #[serde(default)]
    pub hidden: bool,
}

impl NodeRecord {
    /// Parent path, or `None` for the root.
    pub fn parent_path(&self) -> Option<&str> {
        parent_path(&self.path)
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// Check whether this record is `path` or lies beneath it.
    pub fn is_within(&self, path: &str) -> bool {
        is_within(&self.path, path)
    }

    /// Site the record belongs to, derived from its path.
    pub fn site(&self) -> Option<&str> {
        self.path
            .strip_prefix(SITES_ROOT)?
            .strip_prefix('/')?
            .split('/')
            .next()
            .filter(|name| !name.is_empty())
    }
}

pub(crate) fn parent_path(path: &str) -> Option<&str> {
    match path.rsplit_once('/') {
        Some(("", "")) | None => None,
        Some(("", _)) => Some("/"),
        Some((parent, _)) => Some(parent),
    }
}

pub(crate) fn is_within(path: &str, ancestor: &str) -> bool {
    path == ancestor
        || path
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Complete repository contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Dimension values of the default variant.
    #[serde(default)]
    pub default_dimensions: TargetDimensions,
    #[serde(default)]
    pub sites: Vec<SiteRecord>,
    #[serde(default)]
    pub node_types: IndexMap<String, NodeTypeDefinition>,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
}

impl Snapshot {
    /// Parse and check a snapshot.
    pub fn from_json(source: &str, path: &Path) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(source).map_err(|source| SnapshotError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        snapshot.check()?;
        Ok(snapshot)
    }

    /// Load a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source, path)
    }

    /// Write the snapshot as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SnapshotError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check structural consistency.
    pub fn check(&self) -> Result<(), SnapshotError> {
        let mut seen_sites = HashSet::new();
        for site in &self.sites {
            if !seen_sites.insert(site.name.as_str()) {
                return Err(SnapshotError::Invalid {
                    message: format!("duplicate site '{}'", site.name),
                });
            }
        }

        let mut seen_variants = HashSet::new();
        for node in &self.nodes {
            if !node.path.starts_with('/') || node.path.ends_with('/') {
                return Err(SnapshotError::Invalid {
                    message: format!("node {} has malformed path '{}'", node.identifier, node.path),
                });
            }
            let mut dimensions: Vec<_> = node.dimensions.iter().collect();
            dimensions.sort();
            if !seen_variants.insert((node.identifier.as_str(), dimensions)) {
                return Err(SnapshotError::Invalid {
                    message: format!("node {} has a duplicate variant", node.identifier),
                });
            }
        }
        Ok(())
    }
}
