//! # Configuration
//!
//! Application error type and the TOML type file.
//!
//! A type file extends the builtin type table:
//!
//! ```toml
//! [[types]]
//! name = "EmotionNode"
//! kind = "node"
//!
//! [[types]]
//! name = "FeelsLink"
//! kind = "link"
//! ```

use cogweb_core::{ClassServer, PipelineError, RegistryError, StoreError, TypeDefinition};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum size of any file the binary reads (type files, request files).
pub const MAX_INPUT_FILE_SIZE: u64 = 2 * 1024 * 1024;

// =============================================================================
// APPLICATION ERROR
// =============================================================================

/// Errors surfaced by CLI commands and the server.
#[derive(Debug, Error)]
pub enum CogwebError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("request rejected: {0}")]
    Request(#[from] PipelineError),
}

// =============================================================================
// TYPE FILE
// =============================================================================

/// Contents of a TOML type file.
#[derive(Debug, Default, Deserialize)]
pub struct TypesFile {
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
}

impl TypesFile {
    /// Parse a type file from its text.
    pub fn parse(text: &str) -> Result<Self, CogwebError> {
        toml::from_str(text).map_err(|e| CogwebError::Config(format!("invalid type file: {e}")))
    }
}

/// Build the type registry: the builtin table plus an optional type file.
pub fn load_registry(types_file: Option<&Path>) -> Result<ClassServer, CogwebError> {
    let mut registry = ClassServer::new();
    let Some(path) = types_file else {
        return Ok(registry);
    };

    let path = validate_file_path(path)?;
    let text = std::fs::read_to_string(&path)
        .map_err(|e| CogwebError::Io(format!("read type file: {e}")))?;
    let file = TypesFile::parse(&text)?;
    let added = file.types.len();
    registry.extend(file.types)?;

    tracing::info!(path = %path.display(), added, "loaded type file");
    Ok(registry)
}

/// Canonicalize an input path and check it names a regular file within the
/// size limit.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, CogwebError> {
    let canonical = path.canonicalize().map_err(|e| {
        CogwebError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    let metadata = std::fs::metadata(&canonical)
        .map_err(|e| CogwebError::Io(format!("Cannot read file metadata: {e}")))?;
    if !metadata.is_file() {
        return Err(CogwebError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }
    if metadata.len() > MAX_INPUT_FILE_SIZE {
        return Err(CogwebError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_INPUT_FILE_SIZE
        )));
    }

    Ok(canonical)
}

// =============================================================================
// TESTS
// =============================================================================
