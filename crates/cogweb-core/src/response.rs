//! # Response Encoder
//!
//! Success replies carry the handle, failures carry the error message:
//!
//! ```text
//! {"result": "created", "handle": 42}
//! {"result": "merged",  "handle": 42}
//! {"error": "no truthvalue"}
//! ```

use crate::builder::BuildOutcome;
use crate::error::PipelineError;
use serde_json::{Value, json};

/// Outcome of one create-atom request.
pub type Outcome = Result<BuildOutcome, PipelineError>;

/// Encode a request outcome as its JSON reply.
#[must_use]
pub fn encode(outcome: &Outcome) -> Value {
    match outcome {
        Ok(built) => encode_success(built),
        Err(err) => encode_error(err),
    }
}

/// Reply for a created or merged atom.
#[must_use]
pub fn encode_success(outcome: &BuildOutcome) -> Value {
    let result = if outcome.existed { "merged" } else { "created" };
    json!({ "result": result, "handle": outcome.handle.value() })
}

/// Reply for a failed request. Only the message is exposed.
#[must_use]
pub fn encode_error(err: &PipelineError) -> Value {
    json!({ "error": err.to_string() })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BuildError, ParseError};
    use crate::types::AtomId;

    #[test]
    fn created_and_merged() {
        let created = encode(&Ok(BuildOutcome {
            handle: AtomId(42),
            existed: false,
        }));
        assert_eq!(created, json!({"result": "created", "handle": 42}));

        let merged = encode(&Ok(BuildOutcome {
            handle: AtomId(42),
            existed: true,
        }));
        assert_eq!(merged, json!({"result": "merged", "handle": 42}));
    }

    #[test]
    fn errors_expose_only_the_message() {
        let reply = encode(&Err(ParseError::MissingOrInvalidTruthValue.into()));
        assert_eq!(reply, json!({"error": "no truthvalue"}));

        let reply = encode(&Err(BuildError::StoreRejected.into()));
        assert_eq!(reply, json!({"error": "invalid handle returned"}));
    }
}
