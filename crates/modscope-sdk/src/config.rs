use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use modscope_registry::RegistryConfig;
use modscope_store::memory::DEFAULT_SHARDS;
use modscope_store::{DataStore, FileDataStore, InMemoryDataStore};
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Configuration of a [`ModHost`](crate::ModHost).
///
/// ```toml
/// [registry]
/// conflict_policy = "reject"
///
/// [store]
/// backend = "file"
/// root = "/var/lib/game/moddata"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub registry: RegistryConfig,
    pub store: StoreBackend,
}

impl HostConfig {
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SdkError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// Where scoped data lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process memory; lost on exit.
    Memory {
        #[serde(default = "default_shards")]
        shards: usize,
    },
    /// One file per entry under `root`.
    File { root: PathBuf },
}

fn default_shards() -> usize {
    DEFAULT_SHARDS
}

impl Default for StoreBackend {
    fn default() -> Self {
        Self::Memory {
            shards: DEFAULT_SHARDS,
        }
    }
}

impl StoreBackend {
    /// Open the configured substrate.
    pub fn open(&self) -> SdkResult<Arc<dyn DataStore>> {
        Ok(match self {
            Self::Memory { shards } => Arc::new(InMemoryDataStore::with_shards(*shards)),
            Self::File { root } => Arc::new(FileDataStore::open(root.clone())?),
        })
    }
}
