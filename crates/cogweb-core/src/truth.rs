//! # Truth Values
//!
//! The probabilistic annotation carried by every atom, and the decoder that
//! reads it out of an untyped JSON tree.
//!
//! ## Wire grammar
//!
//! ```text
//! {"simple":     {"str": <real>, "count": <real>}}
//! {"count":      {"str": <real>, "conf": <real>, "count": <real>}}
//! {"indefinite": {"l": <real>, "u": <real>, "conf": <real>}}
//! {"composite":  {"primary": <truthvalue>,
//!                 "<INDICATOR>": [<context id>, <truthvalue>], ...}}
//! ```
//!
//! Fixed-shape variants must carry exactly their required keys, each once. A
//! composite body is order-sensitive: `primary` must come first, and an
//! indicator may repeat for different contexts.
//!
//! ## Context entries
//!
//! Composite context entries whose array does not have exactly two elements
//! are skipped. Every other defect in a context entry (not an array, a
//! non-numeric context id, an undecodable nested value, an unknown
//! indicator) aborts the whole decode.

use crate::error::DecodeError;
use crate::primitives::{
    COMPOSITE_TV, COUNT_KEYS, COUNT_TV, DEFAULT_K, INDEFINITE_KEYS, INDEFINITE_TV, PRIMARY_KEY,
    SIMPLE_KEYS, SIMPLE_TV,
};
use crate::raw::{self, ObjectEntries};
use crate::types::AtomId;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// INDICATOR
// =============================================================================

/// How a versioned override relates to the primary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Indicator {
    /// The override holds only under a hypothetical assumption.
    Hypothetical,
    /// The override holds inside a context atom.
    Contextual,
}

impl Indicator {
    /// Wire name of the indicator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hypothetical => "HYPOTHETICAL",
            Self::Contextual => "CONTEXTUAL",
        }
    }
}

impl FromStr for Indicator {
    type Err = DecodeError;

    /// Case-insensitive lookup in the indicator table.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Hypothetical, Self::Contextual]
            .into_iter()
            .find(|indicator| indicator.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DecodeError::UnknownIndicator(s.to_string()))
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TRUTH VALUE
// =============================================================================

/// A versioned override inside a composite truth value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedContext {
    pub indicator: Indicator,
    /// Context atom. It does not have to exist in any store.
    pub context: AtomId,
    pub value: TruthValue,
}

/// A probabilistic annotation. Every variant carries its full field set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TruthValue {
    /// Point-estimate probability with an evidence count.
    Simple { strength: f64, count: f64 },
    /// Strength plus a confidence independent of the count.
    Count {
        strength: f64,
        confidence: f64,
        count: f64,
    },
    /// Interval estimate `[lower, upper]` at a confidence level.
    Indefinite {
        lower: f64,
        upper: f64,
        confidence: f64,
    },
    /// A primary value plus context-indexed overrides, in document order.
    Composite {
        primary: Box<TruthValue>,
        versions: Vec<VersionedContext>,
    },
}

impl TruthValue {
    /// Decode a truth value from an already-parsed JSON tree.
    ///
    /// A `Value` keeps one entry per object key, so repeated composite
    /// indicators are already collapsed here. Request bodies go through
    /// [`TruthValue::decode_raw`] instead.
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        let raw = serde_json::value::to_raw_value(value)
            .map_err(|_| DecodeError::MalformedTruthValue)?;
        Self::decode_raw(&raw)
    }

    /// Decode a truth value from its JSON text.
    ///
    /// Stops at the first fatal defect; see the module docs for which
    /// composite context defects are skipped instead.
    pub fn decode_raw(raw: &RawValue) -> Result<Self, DecodeError> {
        // A non-object truth value is a truth value defect, not a JSON shape error.
        let object = ObjectEntries::read(raw).ok_or(DecodeError::MalformedTruthValue)?;
        let [(variant, body)] = object.as_slice() else {
            return Err(DecodeError::MalformedTruthValue);
        };

        tracing::trace!(variant = variant.as_str(), "decoding truth value");

        match variant.as_str() {
            SIMPLE_TV => {
                let [strength, count] = read_fields(variant, body, SIMPLE_KEYS)?;
                Ok(Self::Simple { strength, count })
            }
            COUNT_TV => {
                let [strength, confidence, count] = read_fields(variant, body, COUNT_KEYS)?;
                Ok(Self::Count {
                    strength,
                    confidence,
                    count,
                })
            }
            INDEFINITE_TV => {
                let [lower, upper, confidence] = read_fields(variant, body, INDEFINITE_KEYS)?;
                Ok(Self::Indefinite {
                    lower,
                    upper,
                    confidence,
                })
            }
            COMPOSITE_TV => decode_composite(body),
            _ => Err(DecodeError::MalformedTruthValue),
        }
    }

    /// Expected probability.
    #[must_use]
    pub fn mean(&self) -> f64 {
        match self {
            Self::Simple { strength, .. } | Self::Count { strength, .. } => *strength,
            Self::Indefinite { lower, upper, .. } => (lower + upper) / 2.0,
            Self::Composite { primary, .. } => primary.mean(),
        }
    }

    /// Confidence in `[0, 1)`. Simple values derive it from their count.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        match self {
            Self::Simple { count, .. } => count / (count + DEFAULT_K),
            Self::Count { confidence, .. } | Self::Indefinite { confidence, .. } => *confidence,
            Self::Composite { primary, .. } => primary.confidence(),
        }
    }

    /// Merge an incoming value into this one.
    ///
    /// Plain values keep whichever side is more confident, the incoming side
    /// on a tie. If either side is composite the result is composite: the
    /// primaries merge by the same rule and incoming versions replace
    /// existing ones with the same `(indicator, context)`.
    #[must_use]
    pub fn merge(self, incoming: Self) -> Self {
        match (self, incoming) {
            (
                Self::Composite {
                    primary,
                    mut versions,
                },
                Self::Composite {
                    primary: new_primary,
                    versions: new_versions,
                },
            ) => {
                for version in new_versions {
                    upsert_version(&mut versions, version);
                }
                Self::Composite {
                    primary: Box::new(primary.merge(*new_primary)),
                    versions,
                }
            }
            (Self::Composite { primary, versions }, incoming) => Self::Composite {
                primary: Box::new(primary.merge(incoming)),
                versions,
            },
            (existing, Self::Composite { primary, versions }) => Self::Composite {
                primary: Box::new(existing.merge(*primary)),
                versions,
            },
            (existing, incoming) => {
                if incoming.confidence() >= existing.confidence() {
                    incoming
                } else {
                    existing
                }
            }
        }
    }

    /// Encode back to the wire grammar.
    ///
    /// Composite contexts are keyed by indicator on the wire, so when two
    /// versions share an indicator only the later one is representable.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Simple { strength, count } => {
                json!({ SIMPLE_TV: { "str": strength, "count": count } })
            }
            Self::Count {
                strength,
                confidence,
                count,
            } => json!({ COUNT_TV: { "str": strength, "conf": confidence, "count": count } }),
            Self::Indefinite {
                lower,
                upper,
                confidence,
            } => json!({ INDEFINITE_TV: { "l": lower, "u": upper, "conf": confidence } }),
            Self::Composite { primary, versions } => {
                let mut body = Map::new();
                body.insert(PRIMARY_KEY.to_string(), primary.to_json());
                for version in versions {
                    body.insert(
                        version.indicator.as_str().to_string(),
                        json!([version.context.value(), version.value.to_json()]),
                    );
                }
                json!({ COMPOSITE_TV: body })
            }
        }
    }
}

fn upsert_version(versions: &mut Vec<VersionedContext>, version: VersionedContext) {
    match versions
        .iter_mut()
        .find(|v| v.indicator == version.indicator && v.context == version.context)
    {
        Some(slot) => *slot = version,
        None => versions.push(version),
    }
}

// =============================================================================
// DECODER HELPERS
// =============================================================================

/// Validate the key set of a fixed-shape body, then read every key as a real.
fn read_fields<const N: usize>(
    variant: &str,
    body: &RawValue,
    keys: [&'static str; N],
) -> Result<[f64; N], DecodeError> {
    let object = ObjectEntries::read(body).ok_or_else(|| DecodeError::TypeMismatch {
        key: variant.to_string(),
    })?;
    check_key_set(&object, &keys)?;

    let mut fields = [0.0; N];
    for (slot, key) in fields.iter_mut().zip(keys) {
        *slot = object
            .get(key)
            .and_then(raw::read_as::<f64>)
            .ok_or_else(|| DecodeError::TypeMismatch {
                key: key.to_string(),
            })?;
    }
    Ok(fields)
}

/// Unknown keys are reported first, then repeated keys, then missing ones;
/// each by the first offender.
fn check_key_set(object: &ObjectEntries, keys: &[&str]) -> Result<(), DecodeError> {
    let entries = object.as_slice();
    if let Some((extra, _)) = entries.iter().find(|(k, _)| !keys.contains(&k.as_str())) {
        return Err(DecodeError::UnknownKey(extra.clone()));
    }
    if let Some((repeated, _)) = entries.iter().find(|(k, _)| object.count(k) > 1) {
        return Err(DecodeError::DuplicateKey(repeated.clone()));
    }
    if let Some(missing) = keys.iter().find(|k| object.get(k).is_none()) {
        return Err(DecodeError::MissingKey((*missing).to_string()));
    }
    Ok(())
}

/// Entries after `primary` are visited in document order, repeated
/// indicators included.
fn decode_composite(body: &RawValue) -> Result<TruthValue, DecodeError> {
    // Same rule as a non-object truth value: not a JSON shape error.
    let object = ObjectEntries::read(body).ok_or(DecodeError::MalformedTruthValue)?;
    let mut entries = object.as_slice().iter();
    let Some((first_key, first_value)) = entries.next() else {
        return Err(DecodeError::MalformedTruthValue);
    };
    if first_key != PRIMARY_KEY {
        return Err(DecodeError::UnexpectedKey {
            expected: PRIMARY_KEY,
            actual: first_key.clone(),
        });
    }
    let primary = TruthValue::decode_raw(first_value)?;

    // A later "primary" is an ordinary context entry and fails as one.
    let mut versions = Vec::new();
    for (indicator, entry) in entries {
        if let Some(version) = decode_context(indicator, entry)? {
            versions.push(version);
        }
    }

    Ok(TruthValue::Composite {
        primary: Box::new(primary),
        versions,
    })
}

/// `Ok(None)` means the entry was skipped for having the wrong arity.
fn decode_context(
    indicator: &str,
    entry: &RawValue,
) -> Result<Option<VersionedContext>, DecodeError> {
    let bad_entry = |cause: Option<DecodeError>| DecodeError::BadContextTruthValue {
        indicator: indicator.to_string(),
        cause: cause.map(Box::new),
    };

    let pair = raw::read_array(entry).ok_or_else(|| bad_entry(None))?;
    let [context, value] = pair.as_slice() else {
        tracing::debug!(
            indicator,
            arity = pair.len(),
            "skipping composite context entry with wrong arity"
        );
        return Ok(None);
    };

    let context = raw::read_as::<u64>(context)
        .map(AtomId)
        .ok_or_else(|| bad_entry(None))?;
    let value = TruthValue::decode_raw(value).map_err(|e| {
        tracing::debug!(indicator, error = %e, "context truth value failed to decode");
        bad_entry(Some(e))
    })?;
    let indicator = indicator.parse::<Indicator>()?;

    Ok(Some(VersionedContext {
        indicator,
        context,
        value,
    }))
}

// =============================================================================
// TESTS
// =============================================================================
