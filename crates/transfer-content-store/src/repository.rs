//! In-memory repository implementing the transfer collaborator traits.

use std::path::Path;

use tracing::{debug, trace};
use transfer_content_core::{
    ContentStore, ContextScope, DimensionValues, NodeHandle, NodeIdentifier, NodeTypeName,
    NodeTypeRegistry, ReferenceCode, Site, SiteDirectory, SiteId, StoreError, TargetDimensions,
};

use crate::SITES_ROOT;
use crate::naming::unique_child_name;
use crate::registry::TypeRegistry;
use crate::snapshot::{NodeRecord, NodeTypeDefinition, SiteRecord, Snapshot, SnapshotError, is_within};

/// Content repository holding every node variant in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    default_dimensions: TargetDimensions,
    sites: Vec<SiteRecord>,
    registry: TypeRegistry,
    nodes: Vec<NodeRecord>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository from a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            default_dimensions: snapshot.default_dimensions,
            sites: snapshot.sites,
            registry: TypeRegistry::new(snapshot.node_types),
            nodes: snapshot.nodes,
        }
    }

    /// Load a repository from a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let snapshot = Snapshot::load(path)?;
        debug!(
            sites = snapshot.sites.len(),
            nodes = snapshot.nodes.len(),
            "loaded snapshot"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    /// Current contents as a snapshot.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            default_dimensions: self.default_dimensions.clone(),
            sites: self.sites.clone(),
            node_types: self.registry.types().clone(),
            nodes: self.nodes.clone(),
        }
    }

    /// Write the current contents to a snapshot file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        self.to_snapshot().save(path)
    }

    /// Set the dimension values of the default variant.
    pub fn with_default_dimensions<'a>(
        mut self,
        values: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.default_dimensions = values
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self
    }

    /// Add a site.
    pub fn add_site(&mut self, name: &str, online: bool) {
        self.sites.push(SiteRecord {
            name: SiteId::new(name),
            title: name.to_string(),
            online,
        });
    }

    /// Declare a node type.
    pub fn declare_type(&mut self, name: impl Into<String>, definition: NodeTypeDefinition) {
        self.registry.declare(name, definition);
    }

    /// Add a node variant.
    pub fn add_node<'a>(
        &mut self,
        identifier: &str,
        node_type: &str,
        path: &str,
        dimensions: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        self.nodes.push(NodeRecord {
            identifier: NodeIdentifier::new(identifier),
            node_type: NodeTypeName::new(node_type),
            path: path.to_string(),
            dimensions: dimensions
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            hidden: false,
        });
    }

    /// All node variants.
    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    /// Path of the variant of `identifier` with exactly `dimensions`.
    pub fn path_of<'a>(
        &self,
        identifier: &str,
        dimensions: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Option<&str> {
        let dimensions: TargetDimensions = dimensions
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self.nodes
            .iter()
            .find(|node| node.identifier.as_str() == identifier && node.dimensions == dimensions)
            .map(|node| node.path.as_str())
    }

    /// The type registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn site_root(site: &SiteId) -> String {
        format!("{SITES_ROOT}/{site}")
    }

    /// Fallback lists the context reads from.
    fn fallbacks(&self, context: &ContextScope) -> DimensionValues {
        if context.dimensions.is_empty() {
            self.default_dimensions
                .iter()
                .map(|(name, value)| (name.clone(), vec![value.clone()]))
                .collect()
        } else {
            context.dimensions.clone()
        }
    }

    /// Priority of a record in a context; lower wins, `None` means no match.
    fn priority(record: &NodeRecord, fallbacks: &DimensionValues) -> Option<Vec<usize>> {
        if record.dimensions.len() != fallbacks.len() {
            return None;
        }
        fallbacks
            .iter()
            .map(|(name, values)| {
                let value = record.dimensions.get(name)?;
                values.iter().position(|candidate| candidate == value)
            })
            .collect()
    }

    /// Index of the record `identifier` resolves to in `context`.
    fn resolve(&self, context: &ContextScope, identifier: &NodeIdentifier) -> Option<usize> {
        let root = Self::site_root(&context.site);
        let fallbacks = self.fallbacks(context);

        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| &node.identifier == identifier)
            .filter(|(_, node)| node.is_within(&root))
            .filter(|(_, node)| context.invisible_content_shown || !node.hidden)
            .filter_map(|(index, node)| Some((Self::priority(node, &fallbacks)?, index)))
            .min()
            .map(|(_, index)| index)
    }

    fn resolve_handle(&self, handle: &NodeHandle) -> Result<usize, StoreError> {
        self.resolve(&handle.context, &handle.identifier)
            .ok_or_else(|| StoreError::NodeNotFound {
                identifier: handle.identifier.clone(),
                reference_code: ReferenceCode::generate(),
            })
    }

    /// Resolve both records and reject placing a node inside itself.
    fn placement(
        &self,
        node: &NodeHandle,
        target_parent: &NodeHandle,
    ) -> Result<(usize, usize), StoreError> {
        if node.context.target_dimensions != target_parent.context.target_dimensions {
            return Err(StoreError::ContextMismatch {
                message: format!(
                    "{} is in '{}', {} is in '{}'",
                    node.identifier,
                    node.context.variant_key(),
                    target_parent.identifier,
                    target_parent.context.variant_key()
                ),
                reference_code: ReferenceCode::generate(),
            });
        }

        let source = self.resolve_handle(node)?;
        let target = self.resolve_handle(target_parent)?;

        if is_within(&self.nodes[target].path, &self.nodes[source].path) {
            return Err(StoreError::TargetInsideSource {
                identifier: node.identifier.clone(),
                reference_code: ReferenceCode::generate(),
            });
        }
        Ok((source, target))
    }

    /// Name for `name` under `parent_path` that no other variant sibling uses.
    fn free_name(
        &self,
        parent_path: &str,
        name: &str,
        dimensions: &TargetDimensions,
        except: Option<&NodeIdentifier>,
    ) -> String {
        unique_child_name(name, |candidate| {
            let path = format!("{parent_path}/{candidate}");
            self.nodes.iter().any(|node| {
                node.path == path
                    && &node.dimensions == dimensions
                    && except.is_none_or(|identifier| &node.identifier != identifier)
            })
        })
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

impl SiteDirectory for MemoryRepository {
    fn find_site(&self, id: &SiteId) -> Option<Site> {
        self.sites.iter().find(|site| &site.name == id).map(|site| Site {
            id: site.name.clone(),
            title: site.title.clone(),
            online: site.online,
        })
    }

    fn online_sites(&self) -> Vec<Site> {
        self.sites
            .iter()
            .filter(|site| site.online)
            .map(|site| Site {
                id: site.name.clone(),
                title: site.title.clone(),
                online: true,
            })
            .collect()
    }
}

impl ContentStore for MemoryRepository {
    fn node_by_identifier(
        &self,
        context: &ContextScope,
        identifier: &NodeIdentifier,
    ) -> Option<NodeHandle> {
        let index = self.resolve(context, identifier)?;
        let node = &self.nodes[index];
        trace!(identifier = %identifier, path = %node.path, "resolved node");
        Some(NodeHandle::new(
            node.identifier.clone(),
            node.node_type.clone(),
            node.path.clone(),
            context.clone(),
        ))
    }

    fn move_into(&mut self, node: &NodeHandle, target_parent: &NodeHandle) -> Result<(), StoreError> {
        let (source, target) = self.placement(node, target_parent)?;

        let old_path = self.nodes[source].path.clone();
        let dimensions = self.nodes[source].dimensions.clone();
        let parent_path = self.nodes[target].path.clone();
        let name = self.free_name(
            &parent_path,
            self.nodes[source].name(),
            &dimensions,
            Some(&node.identifier),
        );
        let new_path = join_path(&parent_path, &name);

        if new_path == old_path {
            return Ok(());
        }

        for record in self
            .nodes
            .iter_mut()
            .filter(|record| record.dimensions == dimensions && is_within(&record.path, &old_path))
        {
            record.path = format!("{new_path}{}", &record.path[old_path.len()..]);
        }

        debug!(from = %old_path, to = %new_path, "moved node");
        Ok(())
    }

    fn copy_into(
        &mut self,
        node: &NodeHandle,
        target_parent: &NodeHandle,
    ) -> Result<NodeHandle, StoreError> {
        let (source, target) = self.placement(node, target_parent)?;

        let old_path = self.nodes[source].path.clone();
        let dimensions = self.nodes[source].dimensions.clone();
        let parent_path = self.nodes[target].path.clone();
        let name = self.free_name(&parent_path, self.nodes[source].name(), &dimensions, None);
        let new_path = join_path(&parent_path, &name);

        let copies: Vec<NodeRecord> = self
            .nodes
            .iter()
            .filter(|record| record.dimensions == dimensions && is_within(&record.path, &old_path))
            .map(|record| NodeRecord {
                identifier: NodeIdentifier::new(uuid::Uuid::new_v4().to_string()),
                node_type: record.node_type.clone(),
                path: format!("{new_path}{}", &record.path[old_path.len()..]),
                dimensions: record.dimensions.clone(),
                hidden: record.hidden,
            })
            .collect();

        let root = copies
            .iter()
            .find(|record| record.path == new_path)
            .map(|record| {
                NodeHandle::new(
                    record.identifier.clone(),
                    record.node_type.clone(),
                    record.path.clone(),
                    target_parent.context.clone(),
                )
            })
            .ok_or_else(|| StoreError::other(format!("copy of {old_path} produced no root")))?;

        debug!(from = %old_path, to = %new_path, nodes = copies.len(), "copied subtree");
        self.nodes.extend(copies);
        Ok(root)
    }
}

impl NodeTypeRegistry for MemoryRepository {
    fn is_of_type(&self, node_type: &NodeTypeName, super_type: &str) -> bool {
        self.registry.is_of_type(node_type, super_type)
    }

    fn is_allowed_as_child(&self, parent_type: &NodeTypeName, child_type: &NodeTypeName) -> bool {
        self.registry.is_allowed_as_child(parent_type, child_type)
    }
}
