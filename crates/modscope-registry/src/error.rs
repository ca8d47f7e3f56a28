//! Error types for registry operations.

use std::path::PathBuf;

use modscope_types::{DefinitionError, ModDefinition};
use thiserror::Error;

/// Errors that can occur while registering or resolving mod definitions.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The identifier, name, or version text failed validation.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// A resolvable source produced invalid fields.
    #[error("invalid mod definition in {origin}: {source}")]
    InvalidSource {
        origin: String,
        #[source]
        source: DefinitionError,
    },

    /// The identifier is already registered with a different name or version
    /// and the registry is configured to reject such conflicts.
    #[error("mod already registered as {existing}; refusing {attempted}")]
    Conflict {
        existing: Box<ModDefinition>,
        attempted: Box<ModDefinition>,
    },

    /// A definition asset could not be read.
    #[error("failed to read definition asset {}: {source}", .path.display())]
    AssetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A definition asset was not valid TOML or JSON.
    #[error("failed to parse definition asset {origin}: {reason}")]
    AssetParse { origin: String, reason: String },
}

/// Convenience type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
