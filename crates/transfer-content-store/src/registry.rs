//! Node type hierarchy and child constraints.

use std::collections::HashSet;

use indexmap::IndexMap;
use transfer_content_core::{NodeTypeName, NodeTypeRegistry};

use crate::snapshot::NodeTypeDefinition;

/// Node type registry backed by snapshot declarations.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, NodeTypeDefinition>,
}

impl TypeRegistry {
    /// Create a registry from declarations.
    pub fn new(types: IndexMap<String, NodeTypeDefinition>) -> Self {
        Self { types }
    }

    /// Declarations by name.
    pub fn types(&self) -> &IndexMap<String, NodeTypeDefinition> {
        &self.types
    }

    /// Add or replace a declaration.
    pub fn declare(&mut self, name: impl Into<String>, definition: NodeTypeDefinition) {
        self.types.insert(name.into(), definition);
    }

    /// The type followed by all transitive super types, breadth first in
    /// declaration order.
    pub fn lineage(&self, name: &str) -> Vec<String> {
        let mut lineage = vec![name.to_string()];
        let mut seen: HashSet<String> = HashSet::from([name.to_string()]);
        let mut index = 0;

        while index < lineage.len() {
            if let Some(definition) = self.types.get(&lineage[index]) {
                for super_type in &definition.super_types {
                    if seen.insert(super_type.clone()) {
                        lineage.push(super_type.clone());
                    }
                }
            }
            index += 1;
        }
        lineage
    }

    /// Constraints of a type merged with those it inherits; nearer
    /// declarations override inherited ones.
    pub fn effective_constraints(&self, name: &str) -> IndexMap<String, bool> {
        let mut merged = IndexMap::new();
        for ancestor in self.lineage(name).iter().rev() {
            if let Some(definition) = self.types.get(ancestor) {
                merged.extend(
                    definition
                        .constraints
                        .iter()
                        .map(|(child, allowed)| (child.clone(), *allowed)),
                );
            }
        }
        merged
    }
}

impl NodeTypeRegistry for TypeRegistry {
    fn is_of_type(&self, node_type: &NodeTypeName, super_type: &str) -> bool {
        self.lineage(node_type.as_str())
            .iter()
            .any(|name| name == super_type)
    }

    fn is_allowed_as_child(&self, parent_type: &NodeTypeName, child_type: &NodeTypeName) -> bool {
        let constraints = self.effective_constraints(parent_type.as_str());

        for candidate in self.lineage(child_type.as_str()) {
            if let Some(allowed) = constraints.get(&candidate) {
                return *allowed;
            }
        }
        constraints.get("*").copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::default();
        registry.declare(
            "Neos.Neos:Document",
            NodeTypeDefinition {
                constraints: IndexMap::from([("*".to_string(), true)]),
                ..Default::default()
            },
        );
        registry.declare(
            "Acme:Page",
            NodeTypeDefinition {
                super_types: vec!["Neos.Neos:Document".into()],
                ..Default::default()
            },
        );
        registry.declare(
            "Acme:Shortcut",
            NodeTypeDefinition {
                super_types: vec!["Neos.Neos:Document".into()],
                constraints: IndexMap::from([("*".to_string(), false)]),
                ..Default::default()
            },
        );
        registry.declare(
            "Acme:Blog",
            NodeTypeDefinition {
                super_types: vec!["Acme:Page".into()],
                constraints: IndexMap::from([
                    ("Acme:Page".to_string(), true),
                    ("Acme:Shortcut".to_string(), false),
                ]),
                ..Default::default()
            },
        );
        registry
    }

    #[test]
    fn test_is_of_type_is_transitive() {
        let registry = registry();
        assert!(registry.is_of_type(&NodeTypeName::new("Acme:Blog"), "Neos.Neos:Document"));
        assert!(registry.is_of_type(&NodeTypeName::new("Acme:Page"), "Acme:Page"));
        assert!(!registry.is_of_type(&NodeTypeName::new("Acme:Text"), "Neos.Neos:Document"));
    }

    #[test]
    fn test_constraints_inherit_and_override() {
        let registry = registry();
        let blog = NodeTypeName::new("Acme:Blog");
        assert!(registry.is_allowed_as_child(&blog, &NodeTypeName::new("Acme:Page")));
        assert!(!registry.is_allowed_as_child(&blog, &NodeTypeName::new("Acme:Shortcut")));
        // inherited wildcard from the document type
        assert!(registry.is_allowed_as_child(&blog, &NodeTypeName::new("Acme:Text")));

        let shortcut = NodeTypeName::new("Acme:Shortcut");
        assert!(!registry.is_allowed_as_child(&shortcut, &NodeTypeName::new("Acme:Page")));
    }

    #[test]
    fn test_unknown_parent_allows_nothing() {
        let registry = registry();
        assert!(!registry.is_allowed_as_child(
            &NodeTypeName::new("Acme:Unknown"),
            &NodeTypeName::new("Acme:Page")
        ));
    }
}
