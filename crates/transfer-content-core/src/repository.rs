//! Traits implemented by the content system the transfer engine drives.

use crate::error::StoreError;
use crate::node::{ContextScope, NodeHandle, NodeIdentifier, NodeTypeName, Site, SiteId};

/// Lookup of sites.
pub trait SiteDirectory {
    /// Resolve a site by id.
    fn find_site(&self, id: &SiteId) -> Option<Site>;

    /// All sites currently online, in directory order.
    fn online_sites(&self) -> Vec<Site>;
}

/// Context-scoped node resolution and structural operations.
pub trait ContentStore {
    /// Resolve a node by identifier within a context.
    fn node_by_identifier(
        &self,
        context: &ContextScope,
        identifier: &NodeIdentifier,
    ) -> Option<NodeHandle>;

    /// Move `node` into `target_parent` as its last child.
    fn move_into(&mut self, node: &NodeHandle, target_parent: &NodeHandle)
    -> Result<(), StoreError>;

    /// Copy `node` into `target_parent` as its last child, returning the copy.
    fn copy_into(
        &mut self,
        node: &NodeHandle,
        target_parent: &NodeHandle,
    ) -> Result<NodeHandle, StoreError>;
}

/// Node type hierarchy and containment rules.
pub trait NodeTypeRegistry {
    /// Check whether `node_type` is `super_type` or inherits from it.
    fn is_of_type(&self, node_type: &NodeTypeName, super_type: &str) -> bool;

    /// Check whether `parent_type` accepts `child_type` as a direct child.
    fn is_allowed_as_child(&self, parent_type: &NodeTypeName, child_type: &NodeTypeName) -> bool;
}

/// A backend providing every capability the transfer engine needs.
pub trait ContentRepository: SiteDirectory + ContentStore + NodeTypeRegistry {}

impl<T: SiteDirectory + ContentStore + NodeTypeRegistry> ContentRepository for T {}

/// Message id to localized text.
pub trait Translator {
    /// Translate `id`, substituting positional `arguments`.
    fn translate(&self, id: &str, arguments: &[String]) -> String;
}
