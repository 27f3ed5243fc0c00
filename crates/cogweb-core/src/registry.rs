//! # Type Registry
//!
//! Maps atom type names to `TypeId`s and tells whether a type is link-shaped
//! (ordered outgoing set) or node-shaped (name).
//!
//! The registry is passed to the request parser and the builder as an
//! explicit parameter. `ClassServer` is the stock implementation: it starts
//! with the standard type table and accepts extra registrations.

use crate::error::RegistryError;
use crate::primitives::MAX_TYPES;
use crate::types::{AtomKind, TypeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// REGISTRY TRAIT
// =============================================================================

/// Type-name resolution used by the pipeline.
pub trait TypeRegistry {
    /// Resolve a type name. `None` means the name is unknown.
    fn resolve(&self, name: &str) -> Option<TypeId>;

    /// Shape of a registered type.
    fn kind_of(&self, atom_type: TypeId) -> Option<AtomKind>;

    /// Name of a registered type.
    fn name_of(&self, atom_type: TypeId) -> Option<&str>;

    /// `true` if the type carries an outgoing set instead of a name.
    fn is_link(&self, atom_type: TypeId) -> bool {
        self.kind_of(atom_type) == Some(AtomKind::Link)
    }
}

// =============================================================================
// TYPE DEFINITION
// =============================================================================

/// A registrable type: the unit of the builtin table and of type files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: AtomKind,
}

impl TypeDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: AtomKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Standard node types.
const BUILTIN_NODES: &[&str] = &[
    "Node",
    "ConceptNode",
    "PredicateNode",
    "NumberNode",
    "WordNode",
    "VariableNode",
    "SchemaNode",
    "GroundedSchemaNode",
];

/// Standard link types.
const BUILTIN_LINKS: &[&str] = &[
    "Link",
    "ListLink",
    "OrderedLink",
    "InheritanceLink",
    "SimilarityLink",
    "MemberLink",
    "SubsetLink",
    "EvaluationLink",
    "ExecutionLink",
    "ImplicationLink",
    "AndLink",
    "OrLink",
    "NotLink",
    "ContextLink",
];

// =============================================================================
// CLASS SERVER
// =============================================================================

/// Table-backed registry. `TypeId`s are dense indices in registration order.
#[derive(Debug, Clone)]
pub struct ClassServer {
    entries: Vec<TypeDefinition>,
    by_name: BTreeMap<String, TypeId>,
}

impl Default for ClassServer {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassServer {
    /// Create a registry holding the standard node and link types.
    #[must_use]
    pub fn new() -> Self {
        let entries: Vec<TypeDefinition> = BUILTIN_NODES
            .iter()
            .map(|name| TypeDefinition::new(*name, AtomKind::Node))
            .chain(
                BUILTIN_LINKS
                    .iter()
                    .map(|name| TypeDefinition::new(*name, AtomKind::Link)),
            )
            .collect();
        let by_name = entries
            .iter()
            .enumerate()
            .map(|(i, def)| (def.name.clone(), TypeId(i as u16)))
            .collect();
        Self { entries, by_name }
    }

    /// Create a registry with no types at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            by_name: BTreeMap::new(),
        }
    }

    /// Register one type and return its id.
    pub fn register(&mut self, definition: TypeDefinition) -> Result<TypeId, RegistryError> {
        if definition.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.by_name.contains_key(&definition.name) {
            return Err(RegistryError::DuplicateType(definition.name));
        }
        if self.entries.len() >= MAX_TYPES {
            return Err(RegistryError::TableFull);
        }

        let id = TypeId(self.entries.len() as u16);
        self.by_name.insert(definition.name.clone(), id);
        self.entries.push(definition);
        Ok(id)
    }

    /// Register several types, stopping at the first rejected one.
    pub fn extend(
        &mut self,
        definitions: impl IntoIterator<Item = TypeDefinition>,
    ) -> Result<(), RegistryError> {
        for definition in definitions {
            let name = definition.name.clone();
            let kind = definition.kind;
            let id = self.register(definition)?;
            tracing::debug!(name = name.as_str(), %kind, id = id.0, "registered atom type");
        }
        Ok(())
    }

    /// All registered types in id order.
    pub fn types(&self) -> impl Iterator<Item = (TypeId, &TypeDefinition)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, def)| (TypeId(i as u16), def))
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TypeRegistry for ClassServer {
    fn resolve(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    fn kind_of(&self, atom_type: TypeId) -> Option<AtomKind> {
        self.entries.get(atom_type.0 as usize).map(|def| def.kind)
    }

    fn name_of(&self, atom_type: TypeId) -> Option<&str> {
        self.entries
            .get(atom_type.0 as usize)
            .map(|def| def.name.as_str())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_types_resolve_with_shape() {
        let registry = ClassServer::new();

        let concept = registry.resolve("ConceptNode").expect("builtin node");
        let list = registry.resolve("ListLink").expect("builtin link");

        assert!(!registry.is_link(concept));
        assert!(registry.is_link(list));
        assert_eq!(registry.name_of(list), Some("ListLink"));
        assert_eq!(registry.len(), BUILTIN_NODES.len() + BUILTIN_LINKS.len());
    }

    #[test]
    fn builtin_table_is_duplicate_free_and_dense() {
        let registry = ClassServer::new();
        assert_eq!(registry.by_name.len(), registry.entries.len());
        for (id, def) in registry.types() {
            assert_eq!(registry.resolve(&def.name), Some(id), "{}", def.name);
        }
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        let registry = ClassServer::new();
        assert_eq!(registry.resolve("conceptnode"), None);
        assert_eq!(registry.resolve(""), None);
        assert_eq!(registry.kind_of(TypeId(u16::MAX)), None);
    }

    #[test]
    fn register_custom_type() {
        let mut registry = ClassServer::new();
        let id = registry
            .register(TypeDefinition::new("EmotionNode", AtomKind::Node))
            .expect("register");

        assert_eq!(registry.resolve("EmotionNode"), Some(id));
        assert_eq!(registry.kind_of(id), Some(AtomKind::Node));
    }

    #[test]
    fn register_rejects_duplicates_and_empty_names() {
        let mut registry = ClassServer::new();
        assert_eq!(
            registry.register(TypeDefinition::new("ListLink", AtomKind::Node)),
            Err(RegistryError::DuplicateType("ListLink".into()))
        );
        assert_eq!(
            registry.register(TypeDefinition::new("", AtomKind::Link)),
            Err(RegistryError::EmptyName)
        );
    }

    #[test]
    fn ids_follow_registration_order() {
        let mut registry = ClassServer::empty();
        registry
            .extend([
                TypeDefinition::new("A", AtomKind::Node),
                TypeDefinition::new("B", AtomKind::Link),
            ])
            .expect("extend");

        let listed: Vec<_> = registry
            .types()
            .map(|(id, def)| (id, def.name.as_str()))
            .collect();
        assert_eq!(listed, vec![(TypeId(0), "A"), (TypeId(1), "B")]);
    }
}
