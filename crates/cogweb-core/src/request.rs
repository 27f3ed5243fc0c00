//! # Atom Request Parser
//!
//! Turns the top-level request object into an [`AtomSpecification`].
//!
//! ```text
//! {
//!   "type": "<TypeName>",
//!   "name": "<string>",             // node-shaped types only
//!   "outgoing": [<id>, <id>, ...],  // link-shaped types only
//!   "truthvalue": { ... }
//! }
//! ```
//!
//! Fields are visited in document order and unrecognized fields are ignored.
//! A shape error on a recognized field, or a truth value that fails to
//! decode, stops parsing immediately. The remaining checks run once the whole
//! object has been read.

use crate::error::ParseError;
use crate::primitives::{FIELD_NAME, FIELD_OUTGOING, FIELD_TRUTH_VALUE, FIELD_TYPE};
use crate::raw::{self, ObjectEntries};
use crate::registry::TypeRegistry;
use crate::truth::TruthValue;
use crate::types::{AtomId, TypeId};
use serde_json::Value;
use serde_json::value::RawValue;

/// A parsed, validated atom creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomSpecification {
    pub atom_type: TypeId,
    /// Empty for link-shaped types.
    pub name: String,
    /// Ignored for node-shaped types. Entries are not checked for existence.
    pub outgoing: Vec<AtomId>,
    pub truth_value: TruthValue,
}

/// Parser bound to the type registry used to resolve `type`.
pub struct AtomRequestParser<'a, R: TypeRegistry + ?Sized> {
    registry: &'a R,
}

impl<'a, R: TypeRegistry + ?Sized> AtomRequestParser<'a, R> {
    #[must_use]
    pub const fn new(registry: &'a R) -> Self {
        Self { registry }
    }

    /// Parse a request body.
    pub fn parse(&self, body: &str) -> Result<AtomSpecification, ParseError> {
        let body: Box<RawValue> = serde_json::from_str(body)?;
        self.parse_raw(&body)
    }

    /// Parse a request body that has not been checked for UTF-8. Invalid
    /// bytes are a syntax error like any other malformed JSON.
    pub fn parse_slice(&self, body: &[u8]) -> Result<AtomSpecification, ParseError> {
        let body: Box<RawValue> = serde_json::from_slice(body)?;
        self.parse_raw(&body)
    }

    /// Parse an already-tokenized request.
    pub fn parse_value(&self, value: &Value) -> Result<AtomSpecification, ParseError> {
        let body = serde_json::value::to_raw_value(value)?;
        self.parse_raw(&body)
    }

    fn parse_raw(&self, body: &RawValue) -> Result<AtomSpecification, ParseError> {
        let object = ObjectEntries::read(body).ok_or(ParseError::Schema { field: "<body>" })?;

        let mut atom_type = None;
        let mut name = String::new();
        let mut outgoing = Vec::new();
        let mut truth_value = None;

        for (field, value) in object.as_slice() {
            match field.as_str() {
                FIELD_TYPE => {
                    let type_name = raw::read_as::<String>(value)
                        .ok_or(ParseError::Schema { field: FIELD_TYPE })?;
                    atom_type = self.registry.resolve(&type_name);
                    if atom_type.is_none() {
                        tracing::debug!(type_name = type_name.as_str(), "unknown atom type");
                    }
                }
                FIELD_NAME => {
                    name = raw::read_as::<String>(value)
                        .ok_or(ParseError::Schema { field: FIELD_NAME })?;
                }
                FIELD_OUTGOING => outgoing = parse_outgoing(value)?,
                FIELD_TRUTH_VALUE => truth_value = Some(TruthValue::decode_raw(value)?),
                other => tracing::trace!(field = other, "ignoring unrecognized request field"),
            }
        }

        let atom_type = atom_type.ok_or(ParseError::MissingType)?;
        let truth_value = truth_value.ok_or(ParseError::MissingOrInvalidTruthValue)?;
        if self.registry.is_link(atom_type) && !name.is_empty() {
            return Err(ParseError::LinkCannotHaveName);
        }

        Ok(AtomSpecification {
            atom_type,
            name,
            outgoing,
            truth_value,
        })
    }
}

fn parse_outgoing(value: &RawValue) -> Result<Vec<AtomId>, ParseError> {
    let schema = ParseError::Schema {
        field: FIELD_OUTGOING,
    };
    let Some(entries) = raw::read_array(value) else {
        return Err(schema);
    };
    entries
        .iter()
        .map(|entry| raw::read_as::<u64>(entry).map(AtomId))
        .collect::<Option<Vec<_>>>()
        .ok_or(schema)
}

// =============================================================================
// TESTS
// =============================================================================
