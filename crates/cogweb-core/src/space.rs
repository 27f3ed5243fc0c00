//! # Atom Space
//!
//! The atom store seam and its in-memory implementation.
//!
//! A store owns identifier allocation, signature lookup and the
//! insert-or-merge policy. Callers that share a store between threads must
//! hold exclusive access across a lookup and the insert that follows it;
//! `&mut self` on the insert methods makes that explicit.
//!
//! All in-memory structures use `BTreeMap` so iteration order is stable.

use crate::error::StoreError;
use crate::primitives::FIRST_ATOM_ID;
use crate::truth::TruthValue;
use crate::types::{Atom, AtomId, AtomKind, Signature, StoreStats, TypeId};
use std::collections::BTreeMap;

// =============================================================================
// ATOMSTORE TRAIT
// =============================================================================

/// The graph store collaborator.
///
/// `add_node` and `add_link` create the atom when its signature is new and
/// merge the truth value into the existing atom otherwise. Implementations
/// must make the lookup and the insert of one call a single logical upsert.
pub trait AtomStore {
    /// Find a node by `(type, name)`.
    fn get_node(&self, atom_type: TypeId, name: &str) -> Result<Option<AtomId>, StoreError>;

    /// Find a link by `(type, outgoing)`.
    fn get_link(&self, atom_type: TypeId, outgoing: &[AtomId])
    -> Result<Option<AtomId>, StoreError>;

    /// Create or merge a node.
    fn add_node(
        &mut self,
        atom_type: TypeId,
        name: &str,
        truth_value: TruthValue,
    ) -> Result<AtomId, StoreError>;

    /// Create or merge a link. Every outgoing atom must already exist.
    fn add_link(
        &mut self,
        atom_type: TypeId,
        outgoing: &[AtomId],
        truth_value: TruthValue,
    ) -> Result<AtomId, StoreError>;

    /// Fetch a stored atom.
    fn get_atom(&self, id: AtomId) -> Result<Option<Atom>, StoreError>;

    /// Node and link counters.
    fn stats(&self) -> Result<StoreStats, StoreError>;
}

// =============================================================================
// IN-MEMORY ATOM SPACE
// =============================================================================

/// In-memory atom store.
#[derive(Debug, Clone)]
pub struct AtomSpace {
    /// Atom storage: AtomId -> Atom
    atoms: BTreeMap<AtomId, Atom>,
    /// Signature index: Signature -> AtomId
    index: BTreeMap<Signature, AtomId>,
    /// Next identifier to hand out
    next_id: u64,
}

impl Default for AtomSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomSpace {
    /// Create an empty atom space.
    #[must_use]
    pub fn new() -> Self {
        Self {
            atoms: BTreeMap::new(),
            index: BTreeMap::new(),
            next_id: FIRST_ATOM_ID,
        }
    }

    /// All atoms in identifier order.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.values()
    }

    fn upsert(&mut self, signature: Signature, truth_value: TruthValue) -> Result<AtomId, StoreError> {
        if let Some(&id) = self.index.get(&signature) {
            let atom = self
                .atoms
                .get_mut(&id)
                .ok_or_else(|| StoreError::Rejected(format!("index points at missing atom {id}")))?;
            let existing = atom.truth_value.clone();
            atom.truth_value = existing.merge(truth_value);
            tracing::debug!(%id, "merged truth value into existing atom");
            return Ok(id);
        }

        if let Signature::Link { outgoing, .. } = &signature {
            if let Some(missing) = outgoing.iter().find(|id| !self.atoms.contains_key(*id)) {
                return Err(StoreError::Rejected(format!(
                    "outgoing atom {missing} does not exist"
                )));
            }
        }

        let id = AtomId(self.next_id);
        if !id.is_valid() {
            return Ok(AtomId::UNDEFINED);
        }
        self.next_id = self.next_id.saturating_add(1);

        self.index.insert(signature.clone(), id);
        self.atoms.insert(id, Atom::new(id, signature, truth_value));
        tracing::debug!(%id, "created atom");
        Ok(id)
    }
}

impl AtomStore for AtomSpace {
    fn get_node(&self, atom_type: TypeId, name: &str) -> Result<Option<AtomId>, StoreError> {
        Ok(self.index.get(&Signature::node(atom_type, name)).copied())
    }

    fn get_link(
        &self,
        atom_type: TypeId,
        outgoing: &[AtomId],
    ) -> Result<Option<AtomId>, StoreError> {
        Ok(self.index.get(&Signature::link(atom_type, outgoing)).copied())
    }

    fn add_node(
        &mut self,
        atom_type: TypeId,
        name: &str,
        truth_value: TruthValue,
    ) -> Result<AtomId, StoreError> {
        self.upsert(Signature::node(atom_type, name), truth_value)
    }

    fn add_link(
        &mut self,
        atom_type: TypeId,
        outgoing: &[AtomId],
        truth_value: TruthValue,
    ) -> Result<AtomId, StoreError> {
        self.upsert(Signature::link(atom_type, outgoing), truth_value)
    }

    fn get_atom(&self, id: AtomId) -> Result<Option<Atom>, StoreError> {
        Ok(self.atoms.get(&id).cloned())
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        let nodes = self
            .index
            .keys()
            .filter(|s| s.kind() == AtomKind::Node)
            .count();
        Ok(StoreStats {
            nodes,
            links: self.index.len() - nodes,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
