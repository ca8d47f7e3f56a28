use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::id::ModId;
use crate::version::ModVersion;

/// Validated identity record of one mod.
///
/// The identifier is the only part that matters for lookup and data
/// scoping. The display name and version are carried for provenance and
/// diagnostics.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DefinitionRepr")]
pub struct ModDefinition {
    id: ModId,
    name: String,
    version: ModVersion,
}

#[derive(Deserialize)]
struct DefinitionRepr {
    id: ModId,
    name: String,
    version: ModVersion,
}

impl TryFrom<DefinitionRepr> for ModDefinition {
    type Error = DefinitionError;

    fn try_from(repr: DefinitionRepr) -> Result<Self, Self::Error> {
        Self::new(repr.id, repr.name, repr.version)
    }
}

impl ModDefinition {
    /// Build a definition from raw authoring text.
    ///
    /// Fields are checked in order: identifier, display name, version text,
    /// then version format. The first failure wins.
    pub fn parse(id: &str, name: &str, version: &str) -> Result<Self, DefinitionError> {
        let id = ModId::new(id)?;
        if name.trim().is_empty() {
            return Err(DefinitionError::MissingField {
                field: "display_name",
            });
        }
        if version.trim().is_empty() {
            return Err(DefinitionError::MissingField { field: "version" });
        }
        let version = ModVersion::parse(version).map_err(|source| DefinitionError::Format {
            value: version.to_string(),
            source,
        })?;

        Ok(Self {
            id,
            name: name.to_string(),
            version,
        })
    }

    /// Build a definition from already-validated parts.
    pub fn new(
        id: ModId,
        name: impl Into<String>,
        version: ModVersion,
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DefinitionError::MissingField {
                field: "display_name",
            });
        }
        Ok(Self { id, name, version })
    }

    pub fn id(&self) -> &ModId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> ModVersion {
        self.version
    }

    /// Returns `true` if `other` carries the same name and version.
    pub fn same_metadata(&self, other: &ModDefinition) -> bool {
        self.name == other.name && self.version == other.version
    }
}

impl AsRef<ModId> for ModDefinition {
    fn as_ref(&self) -> &ModId {
        &self.id
    }
}

impl fmt::Debug for ModDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModDefinition")
            .field("id", &self.id.as_str())
            .field("name", &self.name)
            .field("version", &self.version.to_string())
            .finish()
    }
}

impl fmt::Display for ModDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.id, self.name, self.version)
    }
}
