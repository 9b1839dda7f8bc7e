//! Core types and traits for transfer-content.
//!
//! This crate provides the data model shared by the transfer operation and
//! its backends: sites, node handles, dimension plans, transfer requests,
//! configuration, the error taxonomy, and the traits a content repository
//! implements to be driven by the transfer engine.

mod config;
mod dimension;
mod error;
mod node;
mod repository;
mod request;

pub use config::{DEFAULT_DOCUMENT_TYPE, TransferConfig, TransferConfigBuilder};
pub use dimension::{DimensionPlan, DimensionSpec, DimensionValues, TargetDimensions, VariantKey};
pub use error::{ConfigError, ReferenceCode, StoreError, ValidationError};
pub use node::{ContextScope, NodeHandle, NodeIdentifier, NodeTypeName, Site, SiteId};
pub use repository::{ContentRepository, ContentStore, NodeTypeRegistry, SiteDirectory, Translator};
pub use request::{Mode, ModeChoice, TransferRequest};
