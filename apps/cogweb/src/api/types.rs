//! # API Request/Response Types
//!
//! JSON structures for the HTTP API other than the atom request itself, which
//! is decoded by `cogweb_core` from the raw body.

use cogweb_core::{Atom, AtomKind, ClassServer, Signature, TypeRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Atom store status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub atom_count: usize,
    pub node_count: usize,
    pub link_count: usize,
    pub persistent: bool,
}

// =============================================================================
// ATOM RESPONSE
// =============================================================================

/// A stored atom as returned by `GET /atom/{handle}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomResponse {
    pub handle: u64,
    #[serde(rename = "type")]
    pub type_name: String,
    pub kind: AtomKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outgoing: Option<Vec<u64>>,
    /// Wire form of the truth value.
    pub truthvalue: Value,
    pub mean: f64,
    pub confidence: f64,
}

impl AtomResponse {
    /// Describe `atom`, naming its type through `registry`.
    pub fn from_atom(atom: &Atom, registry: &impl TypeRegistry) -> Self {
        let atom_type = atom.signature.atom_type();
        let type_name = registry
            .name_of(atom_type)
            .map_or_else(|| format!("#{}", atom_type.0), str::to_string);
        let (name, outgoing) = match &atom.signature {
            Signature::Node { name, .. } => (Some(name.clone()), None),
            Signature::Link { outgoing, .. } => {
                (None, Some(outgoing.iter().map(|id| id.value()).collect()))
            }
        };

        Self {
            handle: atom.id.value(),
            type_name,
            kind: atom.signature.kind(),
            name,
            outgoing,
            truthvalue: atom.truth_value.to_json(),
            mean: atom.truth_value.mean(),
            confidence: atom.truth_value.confidence(),
        }
    }
}

// =============================================================================
// TYPES RESPONSE
// =============================================================================

/// One registered atom type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeJson {
    pub id: u16,
    pub name: String,
    pub kind: AtomKind,
}

/// The registry contents in id order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypesResponse {
    pub types: Vec<TypeJson>,
}

impl From<&ClassServer> for TypesResponse {
    fn from(registry: &ClassServer) -> Self {
        Self {
            types: registry
                .types()
                .map(|(id, def)| TypeJson {
                    id: id.0,
                    name: def.name.clone(),
                    kind: def.kind,
                })
                .collect(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// `{"error": "..."}`, the same shape as pipeline failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
