//! # Error Types
//!
//! One error enum per pipeline stage. The `Display` text of every variant is
//! the exact message placed in the `{"error": "..."}` reply, so changing a
//! format string here changes the wire protocol.
//!
//! - `DecodeError`: truth value grammar
//! - `ParseError`: top-level atom request
//! - `StoreError`: atom store collaborator
//! - `BuildError`: create-or-merge command
//! - `PipelineError`: whatever stopped a request
//! - `RegistryError`: type registration

use thiserror::Error;

// =============================================================================
// ERROR TAXONOMY
// =============================================================================

/// Coarse classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The body is not valid JSON.
    Syntax,
    /// A recognized field has the wrong shape or primitive type.
    Schema,
    /// A required field or key is missing, an extra key is present, or a
    /// semantic constraint is violated.
    Validation,
    /// The atom store rejected the operation or failed.
    Store,
}

// =============================================================================
// TRUTH VALUE DECODING
// =============================================================================

/// Failure while decoding a truth value subtree.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// Not an object with exactly one known variant key, or an empty composite.
    #[error("parsing truthvalue")]
    MalformedTruthValue,

    /// A required key of a fixed-shape variant is absent.
    #[error("missing truth value key '{0}'")]
    MissingKey(String),

    /// A key outside the variant's required set is present.
    #[error("unknown truth value key '{0}'")]
    UnknownKey(String),

    /// A required key of a fixed-shape variant appears more than once.
    #[error("duplicate truth value key '{0}'")]
    DuplicateKey(String),

    /// A field holds the wrong JSON primitive (e.g. a string where a real is expected).
    #[error("parsing json")]
    TypeMismatch {
        /// The key whose value had the wrong type.
        key: String,
    },

    /// A composite body does not start with the `primary` entry.
    #[error("expected '{expected}' but got '{actual}', check JSON.")]
    UnexpectedKey {
        expected: &'static str,
        actual: String,
    },

    /// A composite context entry names an indicator outside the known table.
    #[error("bad indicator for version handle: '{0}'")]
    UnknownIndicator(String),

    /// A composite context entry is not an array, has a non-numeric context
    /// id, or carries a truth value that failed to decode.
    #[error("bad json in truth value")]
    BadContextTruthValue {
        /// Indicator key of the offending entry.
        indicator: String,
        /// Nested decode failure, when there was one.
        cause: Option<Box<DecodeError>>,
    },
}

impl DecodeError {
    /// Taxonomy bucket for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeMismatch { .. } | Self::BadContextTruthValue { .. } => ErrorKind::Schema,
            Self::MalformedTruthValue
            | Self::MissingKey(_)
            | Self::UnknownKey(_)
            | Self::DuplicateKey(_)
            | Self::UnexpectedKey { .. }
            | Self::UnknownIndicator(_) => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// REQUEST PARSING
// =============================================================================

/// Failure while parsing the top-level atom request.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body is not valid JSON.
    #[error("parsing json")]
    Syntax(#[from] serde_json::Error),

    /// A recognized field (or the body itself) has the wrong JSON shape.
    #[error("parsing json")]
    Schema {
        /// The offending field, or `<body>` for a non-object body.
        field: &'static str,
    },

    /// The `truthvalue` field failed to decode.
    #[error(transparent)]
    TruthValue(#[from] DecodeError),

    /// No `type` field, or one naming a type the registry does not know.
    #[error("no type")]
    MissingType,

    /// No `truthvalue` field.
    #[error("no truthvalue")]
    MissingOrInvalidTruthValue,

    /// A link-shaped type was given a non-empty `name`.
    #[error("links can't have name")]
    LinkCannotHaveName,
}

impl ParseError {
    /// Taxonomy bucket for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax(_) => ErrorKind::Syntax,
            Self::Schema { .. } => ErrorKind::Schema,
            Self::TruthValue(e) => e.kind(),
            Self::MissingType | Self::MissingOrInvalidTruthValue | Self::LinkCannotHaveName => {
                ErrorKind::Validation
            }
        }
    }
}

// =============================================================================
// STORE & BUILD
// =============================================================================

/// Errors raised by an atom store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused the insert (e.g. a link to an unknown atom).
    #[error("rejected: {0}")]
    Rejected(String),

    /// An I/O error occurred in the backing storage.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A stored record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Failure while issuing the create-or-merge command.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A link-shaped specification carries a name.
    #[error("links can't have name")]
    LinkCannotHaveName,

    /// The store rejected the insert or returned the undefined handle.
    #[error("invalid handle returned")]
    StoreRejected,

    /// The store failed for a reason unrelated to the request itself.
    #[error("store failure: {0}")]
    Store(StoreError),
}

impl BuildError {
    /// Taxonomy bucket for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::LinkCannotHaveName => ErrorKind::Validation,
            Self::StoreRejected | Self::Store(_) => ErrorKind::Store,
        }
    }
}

impl From<StoreError> for BuildError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(_) => Self::StoreRejected,
            other => Self::Store(other),
        }
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

/// The single error that stopped a request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

impl PipelineError {
    /// Taxonomy bucket for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(e) => e.kind(),
            Self::Build(e) => e.kind(),
        }
    }
}

// =============================================================================
// TYPE REGISTRY
// =============================================================================

/// Errors raised while registering atom types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("type name cannot be empty")]
    EmptyName,

    #[error("type '{0}' is already registered")]
    DuplicateType(String),

    #[error("type table is full")]
    TableFull,
}

// =============================================================================
// TESTS
// =============================================================================
