//! Pre-flight checks on the source and target parent.

use tracing::debug;
use transfer_content_core::{
    ContentStore, ContextScope, NodeHandle, NodeIdentifier, NodeTypeRegistry, SiteDirectory,
    SiteId, TransferRequest, ValidationError,
};

/// Source and target parent, resolved in their sites' default variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPair {
    pub source: NodeHandle,
    pub target_parent: NodeHandle,
}

/// Resolves and checks a source/target pair without mutating anything.
pub struct Validator<'a, R: ?Sized> {
    repository: &'a R,
    document_type: &'a str,
}

impl<'a, R> Validator<'a, R>
where
    R: ContentStore + NodeTypeRegistry + ?Sized,
{
    /// Create a validator checking against `document_type`.
    pub fn new(repository: &'a R, document_type: &'a str) -> Self {
        Self {
            repository,
            document_type,
        }
    }

    /// Resolve both nodes and check, in order: existence of the source,
    /// existence of the target parent, document type of each, and the
    /// target parent's child constraints.
    pub fn validate(
        &self,
        source_site: &SiteId,
        target_site: &SiteId,
        source_node: &NodeIdentifier,
        target_parent: &NodeIdentifier,
    ) -> Result<ResolvedPair, ValidationError> {
        let source_context = ContextScope::default_variant(source_site.clone());
        let target_context = ContextScope::default_variant(target_site.clone());

        let source = self.repository.node_by_identifier(&source_context, source_node);
        let target = self.repository.node_by_identifier(&target_context, target_parent);

        let Some(source) = source else {
            return Err(ValidationError::SourceNotFound {
                identifier: source_node.clone(),
            });
        };
        let Some(target) = target else {
            return Err(ValidationError::TargetParentNotFound {
                identifier: target_parent.clone(),
            });
        };

        if !self.repository.is_of_type(&source.node_type, self.document_type) {
            return Err(ValidationError::InvalidSourceType {
                node_type: source.node_type,
            });
        }
        if !self.repository.is_of_type(&target.node_type, self.document_type) {
            return Err(ValidationError::InvalidTargetType {
                node_type: target.node_type,
            });
        }
        if !self
            .repository
            .is_allowed_as_child(&target.node_type, &source.node_type)
        {
            return Err(ValidationError::DisallowedChild {
                parent_type: target.node_type,
                child_type: source.node_type,
            });
        }

        debug!(
            source = %source.path,
            target_parent = %target.path,
            "validated transfer pair"
        );

        Ok(ResolvedPair {
            source,
            target_parent: target,
        })
    }
}

impl<'a, R> Validator<'a, R>
where
    R: SiteDirectory + ContentStore + NodeTypeRegistry + ?Sized,
{
    /// Check request arguments and sites, then [`validate`](Self::validate).
    pub fn validate_request(
        &self,
        request: &TransferRequest,
    ) -> Result<ResolvedPair, ValidationError> {
        if request.source_node.is_blank() {
            return Err(ValidationError::EmptyArgument {
                argument: "sourceNode",
            });
        }
        if request.target_parent.is_blank() {
            return Err(ValidationError::EmptyArgument {
                argument: "targetParentNode",
            });
        }

        for site in [&request.source_site, &request.target_site] {
            if self.repository.find_site(site).is_none() {
                return Err(ValidationError::SiteNotFound { site: site.clone() });
            }
        }

        self.validate(
            &request.source_site,
            &request.target_site,
            &request.source_node,
            &request.target_parent,
        )
    }
}
