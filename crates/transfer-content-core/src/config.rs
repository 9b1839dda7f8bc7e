//! Transfer configuration.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dimension::DimensionPlan;
use crate::error::ConfigError;

/// Super type every transferable node type must extend.
pub const DEFAULT_DOCUMENT_TYPE: &str = "Neos.Neos:Document";

/// Static configuration, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(rename_all = "camelCase")]
pub struct TransferConfig {
    /// Document-family super type checked on source and target parent.
    #[builder(default = "DEFAULT_DOCUMENT_TYPE.to_string()")]
    #[serde(default = "default_document_type")]
    pub document_type: String,

    /// Dimension combinations replayed after a default-variant move.
    #[builder(default)]
    #[serde(default)]
    pub dimensions: DimensionPlan,
}

fn default_document_type() -> String {
    DEFAULT_DOCUMENT_TYPE.to_string()
}

fn check(document_type: &str, plan: &DimensionPlan) -> Result<(), String> {
    if document_type.trim().is_empty() {
        return Err("Document type cannot be empty".to_string());
    }
    for (index, spec) in plan.iter().enumerate() {
        if spec.target_dimensions.is_empty() {
            return Err(format!("Dimension entry {index} has no target dimensions"));
        }
        if let Some((name, _)) = spec
            .target_dimensions
            .iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            return Err(format!(
                "Dimension entry {index} has an empty target value for '{name}'"
            ));
        }
    }
    Ok(())
}

impl TransferConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let document_type = self.document_type.as_deref().unwrap_or(DEFAULT_DOCUMENT_TYPE);
        let empty = DimensionPlan::empty();
        check(document_type, self.dimensions.as_ref().unwrap_or(&empty))
    }
}

impl TransferConfig {
    /// Create a new config builder.
    pub fn builder() -> TransferConfigBuilder {
        TransferConfigBuilder::default()
    }

    /// Create a config with the given plan and the default document type.
    pub fn new(dimensions: DimensionPlan) -> Self {
        Self {
            document_type: default_document_type(),
            dimensions,
        }
    }

    /// The dimension plan.
    pub fn plan(&self) -> &DimensionPlan {
        &self.dimensions
    }

    /// Check the configuration for semantic errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(&self.document_type, &self.dimensions)
            .map_err(|message| ConfigError::Invalid { message })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(source: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        for spec in config.dimensions.iter() {
            for name in spec.target_dimensions.keys() {
                if !spec.dimensions.contains_key(name) {
                    warn!(
                        dimension = %name,
                        variant = %spec.variant_key(),
                        "target dimension has no source fallback list"
                    );
                }
            }
        }

        Ok(config)
    }

    /// Load the configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = Self::from_toml(&source, path)?;
        debug!(path = %path.display(), entries = config.dimensions.len(), "loaded configuration");
        Ok(config)
    }

    /// Default configuration file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("transfer-content").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when absent.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::new(DimensionPlan::empty())
    }
}
