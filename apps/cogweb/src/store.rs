//! # Store Backend
//!
//! The atom store the binary runs against, chosen at startup:
//! - `Memory`: [`AtomSpace`], volatile
//! - `Redb`: [`RedbAtomSpace`], ACID and persistent

use crate::config::CogwebError;
use clap::ValueEnum;
use cogweb_core::{
    Atom, AtomId, AtomSpace, AtomStore, RedbAtomSpace, StoreError, StoreStats, TruthValue, TypeId,
};
use std::fmt;
use std::path::Path;

/// Backend selector for `--backend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    Memory,
    Redb,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::Redb => "redb",
        })
    }
}

/// Storage backend behind the server and CLI.
///
/// Does not implement `Clone`: the redb handle owns the database file lock.
#[derive(Debug)]
pub enum StoreBackend {
    InMemory(AtomSpace),
    Persistent(RedbAtomSpace),
}

impl Default for StoreBackend {
    fn default() -> Self {
        Self::InMemory(AtomSpace::new())
    }
}

impl StoreBackend {
    /// Open the backend selected by `kind`. `path` is ignored for memory.
    pub fn open(kind: BackendKind, path: &Path) -> Result<Self, CogwebError> {
        match kind {
            BackendKind::Memory => Ok(Self::default()),
            BackendKind::Redb => Ok(Self::Persistent(RedbAtomSpace::open(path)?)),
        }
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Persistent(_))
    }

    fn inner(&self) -> &dyn AtomStore {
        match self {
            Self::InMemory(space) => space,
            Self::Persistent(redb) => redb,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn AtomStore {
        match self {
            Self::InMemory(space) => space,
            Self::Persistent(redb) => redb,
        }
    }
}

impl AtomStore for StoreBackend {
    fn get_node(&self, atom_type: TypeId, name: &str) -> Result<Option<AtomId>, StoreError> {
        self.inner().get_node(atom_type, name)
    }

    fn get_link(
        &self,
        atom_type: TypeId,
        outgoing: &[AtomId],
    ) -> Result<Option<AtomId>, StoreError> {
        self.inner().get_link(atom_type, outgoing)
    }

    fn add_node(
        &mut self,
        atom_type: TypeId,
        name: &str,
        truth_value: TruthValue,
    ) -> Result<AtomId, StoreError> {
        self.inner_mut().add_node(atom_type, name, truth_value)
    }

    fn add_link(
        &mut self,
        atom_type: TypeId,
        outgoing: &[AtomId],
        truth_value: TruthValue,
    ) -> Result<AtomId, StoreError> {
        self.inner_mut().add_link(atom_type, outgoing, truth_value)
    }

    fn get_atom(&self, id: AtomId) -> Result<Option<Atom>, StoreError> {
        self.inner().get_atom(id)
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        self.inner().stats()
    }
}

// =============================================================================
// TESTS
// =============================================================================
