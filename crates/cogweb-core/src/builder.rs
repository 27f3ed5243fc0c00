//! # Atom Command Builder
//!
//! Issues the create-or-merge command for a parsed [`AtomSpecification`].
//!
//! Node-shaped types are identified by `(type, name)`, link-shaped types by
//! `(type, outgoing)`. The store decides whether the atom is new or merged;
//! the builder only reports which one happened.

use crate::error::BuildError;
use crate::registry::TypeRegistry;
use crate::request::AtomSpecification;
use crate::space::AtomStore;
use crate::types::AtomId;

/// Result of a successful build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Handle of the created or merged atom. Never [`AtomId::UNDEFINED`].
    pub handle: AtomId,
    /// `true` when an atom with the same signature was already present.
    pub existed: bool,
}

/// Builds atoms against a store, using the registry to decide atom shape.
pub struct AtomCommandBuilder<'a, R: TypeRegistry + ?Sized, S: AtomStore + ?Sized> {
    registry: &'a R,
    store: &'a mut S,
}

impl<'a, R: TypeRegistry + ?Sized, S: AtomStore + ?Sized> AtomCommandBuilder<'a, R, S> {
    pub fn new(registry: &'a R, store: &'a mut S) -> Self {
        Self { registry, store }
    }

    /// Create the atom described by `spec`, or merge into the existing one.
    pub fn build(&mut self, spec: AtomSpecification) -> Result<BuildOutcome, BuildError> {
        let AtomSpecification {
            atom_type,
            name,
            outgoing,
            truth_value,
        } = spec;

        let (existing, handle) = if self.registry.is_link(atom_type) {
            if !name.is_empty() {
                return Err(BuildError::LinkCannotHaveName);
            }
            let existing = self.store.get_link(atom_type, &outgoing)?;
            let handle = self.store.add_link(atom_type, &outgoing, truth_value)?;
            (existing, handle)
        } else {
            let existing = self.store.get_node(atom_type, &name)?;
            let handle = self.store.add_node(atom_type, &name, truth_value)?;
            (existing, handle)
        };

        if !handle.is_valid() {
            tracing::warn!(type_id = atom_type.0, "store returned the undefined handle");
            return Err(BuildError::StoreRejected);
        }

        Ok(BuildOutcome {
            handle,
            existed: existing.is_some(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::registry::ClassServer;
    use crate::space::AtomSpace;
    use crate::truth::TruthValue;
    use crate::types::{Atom, StoreStats, TypeId};

    fn stv(strength: f64, count: f64) -> TruthValue {
        TruthValue::Simple { strength, count }
    }

    fn node(registry: &ClassServer, name: &str) -> AtomSpecification {
        AtomSpecification {
            atom_type: registry.resolve("ConceptNode").expect("builtin"),
            name: name.to_string(),
            outgoing: Vec::new(),
            truth_value: stv(0.5, 2.0),
        }
    }

    /// Store that records calls and answers every insert with a fixed handle.
    #[derive(Default)]
    struct ScriptedStore {
        handle: Option<AtomId>,
        calls: usize,
    }

    impl AtomStore for ScriptedStore {
        fn get_node(&self, _: TypeId, _: &str) -> Result<Option<AtomId>, StoreError> {
            Ok(None)
        }
        fn get_link(&self, _: TypeId, _: &[AtomId]) -> Result<Option<AtomId>, StoreError> {
            Ok(None)
        }
        fn add_node(&mut self, _: TypeId, _: &str, _: TruthValue) -> Result<AtomId, StoreError> {
            self.calls += 1;
            Ok(self.handle.unwrap_or(AtomId::UNDEFINED))
        }
        fn add_link(&mut self, _: TypeId, _: &[AtomId], _: TruthValue) -> Result<AtomId, StoreError> {
            self.calls += 1;
            Ok(self.handle.unwrap_or(AtomId::UNDEFINED))
        }
        fn get_atom(&self, _: AtomId) -> Result<Option<Atom>, StoreError> {
            Ok(None)
        }
        fn stats(&self) -> Result<StoreStats, StoreError> {
            Ok(StoreStats::default())
        }
    }

    #[test]
    fn creates_then_merges() {
        let registry = ClassServer::new();
        let mut space = AtomSpace::new();
        let mut builder = AtomCommandBuilder::new(&registry, &mut space);

        let first = builder.build(node(&registry, "cat")).expect("create");
        assert!(!first.existed);

        let second = builder.build(node(&registry, "cat")).expect("merge");
        assert!(second.existed);
        assert_eq!(first.handle, second.handle);
    }

    #[test]
    fn link_outgoing_order_matters() {
        let registry = ClassServer::new();
        let mut space = AtomSpace::new();
        let mut builder = AtomCommandBuilder::new(&registry, &mut space);
        let a = builder.build(node(&registry, "a")).expect("a").handle;
        let b = builder.build(node(&registry, "b")).expect("b").handle;

        let list = registry.resolve("ListLink").expect("builtin");
        let link = |outgoing: Vec<AtomId>| AtomSpecification {
            atom_type: list,
            name: String::new(),
            outgoing,
            truth_value: stv(0.5, 1.0),
        };

        let ab = builder.build(link(vec![a, b])).expect("ab");
        let ba = builder.build(link(vec![b, a])).expect("ba");
        assert_ne!(ab.handle, ba.handle);
        assert!(!ba.existed);
    }

    #[test]
    fn named_link_never_reaches_the_store() {
        let registry = ClassServer::new();
        let mut store = ScriptedStore {
            handle: Some(AtomId(1)),
            ..ScriptedStore::default()
        };
        let spec = AtomSpecification {
            atom_type: registry.resolve("ListLink").expect("builtin"),
            name: "oops".to_string(),
            outgoing: Vec::new(),
            truth_value: stv(0.5, 1.0),
        };

        let err = AtomCommandBuilder::new(&registry, &mut store)
            .build(spec)
            .expect_err("named link");
        assert!(matches!(err, BuildError::LinkCannotHaveName));
        assert_eq!(store.calls, 0);
    }

    #[test]
    fn undefined_handle_is_rejected() {
        let registry = ClassServer::new();
        let mut store = ScriptedStore::default();

        let err = AtomCommandBuilder::new(&registry, &mut store)
            .build(node(&registry, "cat"))
            .expect_err("undefined handle");
        assert_eq!(err.to_string(), "invalid handle returned");
        assert_eq!(store.calls, 1);
    }

    #[test]
    fn dangling_outgoing_is_rejected() {
        let registry = ClassServer::new();
        let mut space = AtomSpace::new();
        let spec = AtomSpecification {
            atom_type: registry.resolve("ListLink").expect("builtin"),
            name: String::new(),
            outgoing: vec![AtomId(99)],
            truth_value: stv(0.5, 1.0),
        };

        let err = AtomCommandBuilder::new(&registry, &mut space)
            .build(spec)
            .expect_err("dangling");
        assert!(matches!(err, BuildError::StoreRejected));
    }
}
