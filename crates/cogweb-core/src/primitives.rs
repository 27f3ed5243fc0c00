//! # Pipeline Constants
//!
//! Fixed wire keys and numeric constants shared by the decoder, the parser
//! and the stores. These are compiled in and immutable at runtime.

// =============================================================================
// REQUEST FIELDS
// =============================================================================

pub const FIELD_TYPE: &str = "type";
pub const FIELD_NAME: &str = "name";
pub const FIELD_OUTGOING: &str = "outgoing";
pub const FIELD_TRUTH_VALUE: &str = "truthvalue";

// =============================================================================
// TRUTH VALUE GRAMMAR
// =============================================================================

pub const SIMPLE_TV: &str = "simple";
pub const COUNT_TV: &str = "count";
pub const INDEFINITE_TV: &str = "indefinite";
pub const COMPOSITE_TV: &str = "composite";

/// Key of the first entry of every composite body.
pub const PRIMARY_KEY: &str = "primary";

/// Required keys of a simple truth value, in reporting order.
pub const SIMPLE_KEYS: [&str; 2] = ["str", "count"];

/// Required keys of a count truth value, in reporting order.
pub const COUNT_KEYS: [&str; 3] = ["str", "conf", "count"];

/// Required keys of an indefinite truth value, in reporting order.
pub const INDEFINITE_KEYS: [&str; 3] = ["l", "u", "conf"];

/// Evidence "lookahead" constant used to turn a count into a confidence:
/// `confidence = count / (count + DEFAULT_K)`.
pub const DEFAULT_K: f64 = 800.0;

// =============================================================================
// STORE LIMITS
// =============================================================================

/// First identifier handed out by a fresh store. Zero is never allocated.
pub const FIRST_ATOM_ID: u64 = 1;

/// Maximum number of entries in a type table (ids are `u16`).
pub const MAX_TYPES: usize = u16::MAX as usize;
