//! Resolvable definition sources.
//!
//! A source is anything that can hand out the three raw authoring strings
//! of a mod (identifier, display name, version text). Sources never build
//! records themselves; they always go through [`ModRegistry`] so the
//! get-or-create invariant holds no matter where the text came from.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use modscope_types::ModDefinition;
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};
use crate::registry::ModRegistry;

/// Borrowed raw authoring text of one mod definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawModFields<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub version: &'a str,
}

/// Something that describes a mod in raw text and can be resolved through a
/// registry.
pub trait ResolvableSource {
    /// Where this source came from (asset path, plugin name, ...), used to
    /// point authors at the data they need to fix.
    fn origin(&self) -> String;

    /// The raw identifier, display name, and version text.
    fn raw_fields(&self) -> RawModFields<'_>;

    /// Validate the raw fields and get-or-create the registry record.
    ///
    /// Validation failures are reported as [`RegistryError::InvalidSource`]
    /// carrying [`origin`](Self::origin).
    fn resolve(&self, registry: &ModRegistry) -> Result<Arc<ModDefinition>> {
        let raw = self.raw_fields();
        let definition = ModDefinition::parse(raw.id, raw.name, raw.version).map_err(|source| {
            RegistryError::InvalidSource {
                origin: self.origin(),
                source,
            }
        })?;
        registry.register(definition)
    }
}

/// Source declared in code, e.g. by a plugin's entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticSource {
    pub id: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

impl StaticSource {
    pub const fn new(id: &'static str, name: &'static str, version: &'static str) -> Self {
        Self { id, name, version }
    }
}

impl ResolvableSource for StaticSource {
    fn origin(&self) -> String {
        format!("static source `{}`", self.id)
    }

    fn raw_fields(&self) -> RawModFields<'_> {
        RawModFields {
            id: self.id,
            name: self.name,
            version: self.version,
        }
    }
}

/// Authored definition asset, stored as TOML or JSON:
///
/// ```toml
/// id = "com.example.mod"
/// name = "Example Mod"
/// version = "1.0.0"
/// ```
///
/// Missing fields deserialize as empty strings so that the author gets a
/// field-level error at resolve time instead of a parser error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionAsset {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(skip)]
    origin: Option<String>,
}

impl DefinitionAsset {
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            origin: None,
        }
    }

    /// Label the asset for error messages.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self> {
        let asset: Self = toml::from_str(text).map_err(|e| RegistryError::AssetParse {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;
        Ok(asset.with_origin(origin))
    }

    pub fn from_json_str(text: &str, origin: &str) -> Result<Self> {
        let asset: Self = serde_json::from_str(text).map_err(|e| RegistryError::AssetParse {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;
        Ok(asset.with_origin(origin))
    }

    /// Load an asset file. `.json` files are parsed as JSON, everything else
    /// as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RegistryError::AssetIo {
            path: path.to_path_buf(),
            source,
        })?;
        let origin = path.display().to_string();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text, &origin)
        } else {
            Self::from_toml_str(&text, &origin)
        }
    }
}

impl ResolvableSource for DefinitionAsset {
    fn origin(&self) -> String {
        match &self.origin {
            Some(origin) => origin.clone(),
            None if self.id.trim().is_empty() => "unnamed definition asset".to_string(),
            None => format!("definition asset `{}`", self.id),
        }
    }

    fn raw_fields(&self) -> RawModFields<'_> {
        RawModFields {
            id: &self.id,
            name: &self.name,
            version: &self.version,
        }
    }
}
