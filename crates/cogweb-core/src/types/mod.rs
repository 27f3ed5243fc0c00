//! # Core Type Definitions
//!
//! Identifiers and records shared by every stage of the pipeline:
//! - Atom and type handles (`AtomId`, `TypeId`)
//! - Atom shape (`AtomKind`) and lookup key (`Signature`)
//! - Stored records (`Atom`) and store counters (`StoreStats`)
//!
//! Handles are opaque numbers. The pipeline passes them through and never
//! dereferences them; only a store knows what they point at.

use crate::truth::TruthValue;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// HANDLES
// =============================================================================

/// Identifier of an atom inside an atom store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AtomId(pub u64);

impl AtomId {
    /// The undefined handle. A store returns it to signal a refused insert.
    pub const UNDEFINED: Self = Self(u64::MAX);

    /// Get the raw handle value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// `false` only for [`AtomId::UNDEFINED`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::UNDEFINED.0
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an atom type inside a type registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeId(pub u16);

/// Whether a type describes named nodes or links with an outgoing set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtomKind {
    Node,
    Link,
}

impl AtomKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SIGNATURE
// =============================================================================

/// The key under which an atom is unique in a store.
///
/// Two requests with the same signature address the same atom; the second
/// one merges its truth value into the first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Signature {
    Node { atom_type: TypeId, name: String },
    Link { atom_type: TypeId, outgoing: Vec<AtomId> },
}

impl Signature {
    #[must_use]
    pub fn node(atom_type: TypeId, name: impl Into<String>) -> Self {
        Self::Node {
            atom_type,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn link(atom_type: TypeId, outgoing: impl Into<Vec<AtomId>>) -> Self {
        Self::Link {
            atom_type,
            outgoing: outgoing.into(),
        }
    }

    #[must_use]
    pub const fn atom_type(&self) -> TypeId {
        match self {
            Self::Node { atom_type, .. } | Self::Link { atom_type, .. } => *atom_type,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> AtomKind {
        match self {
            Self::Node { .. } => AtomKind::Node,
            Self::Link { .. } => AtomKind::Link,
        }
    }
}

// =============================================================================
// ATOM
// =============================================================================

/// An atom as held by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub id: AtomId,
    pub signature: Signature,
    pub truth_value: TruthValue,
}

impl Atom {
    #[must_use]
    pub const fn new(id: AtomId, signature: Signature, truth_value: TruthValue) -> Self {
        Self {
            id,
            signature,
            truth_value,
        }
    }
}

/// Atom counters reported by a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub nodes: usize,
    pub links: usize,
}

impl StoreStats {
    #[must_use]
    pub const fn atoms(&self) -> usize {
        self.nodes + self.links
    }
}

// =============================================================================
// TESTS
// =============================================================================
