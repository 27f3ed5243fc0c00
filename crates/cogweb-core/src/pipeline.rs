//! # Create-Atom Pipeline
//!
//! `parse -> build -> encode`, stopping at the first error.

use crate::builder::AtomCommandBuilder;
use crate::registry::TypeRegistry;
use crate::request::AtomRequestParser;
use crate::response::{self, Outcome};
use crate::space::AtomStore;
use serde_json::Value;

/// Parse `body` and create or merge the atom it describes.
pub fn create_atom<R, S>(body: &str, registry: &R, store: &mut S) -> Outcome
where
    R: TypeRegistry + ?Sized,
    S: AtomStore + ?Sized,
{
    let spec = AtomRequestParser::new(registry).parse(body)?;
    let outcome = AtomCommandBuilder::new(registry, store).build(spec)?;
    tracing::debug!(
        handle = outcome.handle.value(),
        existed = outcome.existed,
        "atom request applied"
    );
    Ok(outcome)
}

/// [`create_atom`] followed by [`response::encode`]. Failures are logged.
pub fn create_atom_reply<R, S>(body: &str, registry: &R, store: &mut S) -> Value
where
    R: TypeRegistry + ?Sized,
    S: AtomStore + ?Sized,
{
    let outcome = create_atom(body, registry, store);
    if let Err(err) = &outcome {
        tracing::warn!(kind = ?err.kind(), error = %err, "atom request rejected");
    }
    response::encode(&outcome)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::registry::ClassServer;
    use crate::space::AtomSpace;
    use serde_json::json;

    #[test]
    fn reply_for_created_atom() {
        let registry = ClassServer::new();
        let mut space = AtomSpace::new();
        let reply = create_atom_reply(
            r#"{"type":"ConceptNode","name":"cat","truthvalue":{"simple":{"str":0.9,"count":12}}}"#,
            &registry,
            &mut space,
        );
        assert_eq!(reply, json!({"result": "created", "handle": 1}));
    }

    #[test]
    fn parse_failure_leaves_store_untouched() {
        let registry = ClassServer::new();
        let mut space = AtomSpace::new();
        let err = create_atom(r#"{"type":"ConceptNode","name":"cat"}"#, &registry, &mut space)
            .expect_err("no tv");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(space.atoms().count(), 0);
    }

    #[test]
    fn error_kinds() {
        let registry = ClassServer::new();
        let mut space = AtomSpace::new();
        let mut kind = |body: &str| {
            create_atom(body, &registry, &mut space)
                .expect_err(body)
                .kind()
        };

        assert_eq!(kind("{"), ErrorKind::Syntax);
        assert_eq!(kind(r#"{"type":1}"#), ErrorKind::Schema);
        assert_eq!(kind(r#"{"type":"Nope"}"#), ErrorKind::Validation);
        assert_eq!(
            kind(r#"{"type":"ListLink","outgoing":[5],"truthvalue":{"simple":{"str":1,"count":1}}}"#),
            ErrorKind::Store
        );
    }
}
