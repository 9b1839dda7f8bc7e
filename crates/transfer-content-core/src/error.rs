//! Error types for transfer operations.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::{NodeIdentifier, NodeTypeName, SiteId};

static REFERENCE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Diagnostic reference code attached to a store failure.
///
/// Shaped like `20240131124502a1b2c3`: a UTC timestamp followed by six hex
/// characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceCode(pub String);

impl ReferenceCode {
    /// Wrap an existing reference code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generate a fresh reference code.
    pub fn generate() -> Self {
        let now = Utc::now();
        let counter = REFERENCE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mixed = (u64::from(now.timestamp_subsec_nanos()) ^ counter.wrapping_mul(0x9e37_79b9))
            & 0x00ff_ffff;
        Self(format!("{}{:06x}", now.format("%Y%m%d%H%M%S"), mixed))
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reasons a transfer request is rejected before anything is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required argument is empty.
    #[error("Argument must not be empty: {argument}")]
    EmptyArgument { argument: &'static str },

    /// A site id does not resolve.
    #[error("Site not found: {site}")]
    SiteNotFound { site: SiteId },

    /// The source node does not resolve in the source site.
    #[error("Source node not found: {identifier}")]
    SourceNotFound { identifier: NodeIdentifier },

    /// The target parent does not resolve in the target site.
    #[error("Target parent node not found: {identifier}")]
    TargetParentNotFound { identifier: NodeIdentifier },

    /// The source node is not a document.
    #[error("Source node of type {node_type} is not a document")]
    InvalidSourceType { node_type: NodeTypeName },

    /// The target parent is not a document.
    #[error("Target parent node of type {node_type} is not a document")]
    InvalidTargetType { node_type: NodeTypeName },

    /// The target parent does not accept the source node's type as a child.
    #[error("{child_type} is not allowed as a child of {parent_type}")]
    DisallowedChild {
        parent_type: NodeTypeName,
        child_type: NodeTypeName,
    },
}

/// Failures reported by a structural operation of the content store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The node behind a handle no longer exists in its context.
    #[error("Node {identifier} not found in its context [{reference_code}]")]
    NodeNotFound {
        identifier: NodeIdentifier,
        reference_code: ReferenceCode,
    },

    /// Cannot move or copy a node into itself or one of its descendants.
    #[error("Cannot place {identifier} into its own subtree [{reference_code}]")]
    TargetInsideSource {
        identifier: NodeIdentifier,
        reference_code: ReferenceCode,
    },

    /// The handles were resolved in incompatible contexts.
    #[error("Handles belong to different variants: {message} [{reference_code}]")]
    ContextMismatch {
        message: String,
        reference_code: ReferenceCode,
    },

    /// Other store failure.
    #[error("{message} [{reference_code}]")]
    Other {
        message: String,
        reference_code: ReferenceCode,
    },
}

impl StoreError {
    /// Create an other error with a fresh reference code.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            reference_code: ReferenceCode::generate(),
        }
    }

    /// The diagnostic reference code of this failure.
    pub fn reference_code(&self) -> &ReferenceCode {
        match self {
            Self::NodeNotFound { reference_code, .. }
            | Self::TargetInsideSource { reference_code, .. }
            | Self::ContextMismatch { reference_code, .. }
            | Self::Other { reference_code, .. } => reference_code,
        }
    }
}

/// Errors loading configuration or message catalogs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for the expected shape.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The configuration is semantically invalid.
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
