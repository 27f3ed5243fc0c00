//! # cogweb-core
//!
//! Typed create-or-merge of knowledge-graph atoms from untyped JSON requests.
//!
//! ## Pipeline
//!
//! ```text
//! body ──> AtomRequestParser ──> AtomSpecification
//!                                      │
//!                                      v
//!          AtomCommandBuilder ──> AtomStore (create or merge)
//!                                      │
//!                                      v
//!          response::encode   ──> {"result": ..., "handle": n} | {"error": msg}
//! ```
//!
//! Every stage is synchronous and fails fast: the first error stops the
//! request and becomes its reply.
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - The type registry and atom store are explicit parameters, never globals
//! - Deterministic: `BTreeMap` everywhere iteration order is observable

// =============================================================================
// MODULES
// =============================================================================

pub mod builder;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod raw;
pub mod registry;
pub mod request;
pub mod response;
pub mod space;
pub mod storage;
pub mod truth;
pub mod types;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use builder::{AtomCommandBuilder, BuildOutcome};
pub use error::{
    BuildError, DecodeError, ErrorKind, ParseError, PipelineError, RegistryError, StoreError,
};
pub use pipeline::{create_atom, create_atom_reply};
pub use registry::{ClassServer, TypeDefinition, TypeRegistry};
pub use request::{AtomRequestParser, AtomSpecification};
pub use response::Outcome;
pub use space::{AtomSpace, AtomStore};
pub use storage::RedbAtomSpace;
pub use truth::{Indicator, TruthValue, VersionedContext};
pub use types::{Atom, AtomId, AtomKind, Signature, StoreStats, TypeId};
