//! The in-process mod identity registry.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use modscope_types::{ModDefinition, ModId};
use tracing::{debug, info, warn};

use crate::config::{ConflictPolicy, RegistryConfig};
use crate::error::{RegistryError, Result};
use crate::source::ResolvableSource;

/// Identifier → definition table with get-or-create semantics.
///
/// All lookups take a shared lock; registration takes the write lock for
/// the check-then-insert step, so at most one record ever exists per
/// identifier. Records are handed out as `Arc<ModDefinition>`; callers that
/// register the same identifier receive clones of the same `Arc`.
///
/// A registry is meant to be created once at startup and shared (typically
/// behind an `Arc`) with everything that resolves identifiers.
pub struct ModRegistry {
    config: RegistryConfig,
    definitions: RwLock<HashMap<ModId, Arc<ModDefinition>>>,
}

impl ModRegistry {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            definitions: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Validate raw definition text and return the record registered under
    /// its identifier, creating it if this is the first registration.
    ///
    /// Validation always runs first: malformed input fails even when the
    /// identifier is already known.
    pub fn get_or_create(
        &self,
        id: &str,
        name: &str,
        version: &str,
    ) -> Result<Arc<ModDefinition>> {
        let definition = ModDefinition::parse(id, name, version)?;
        self.register(definition)
    }

    /// Register an already-validated definition (get-or-create).
    pub fn register(&self, definition: ModDefinition) -> Result<Arc<ModDefinition>> {
        // Fast path: already registered, no write lock needed.
        let known = self.read_map().get(definition.id()).cloned();
        if let Some(existing) = known {
            return self.reconcile(existing, &definition);
        }

        let existing = {
            let mut map = self.write_map();
            match map.entry(definition.id().clone()) {
                Entry::Occupied(entry) => Arc::clone(entry.get()),
                Entry::Vacant(entry) => {
                    let definition = Arc::new(definition);
                    entry.insert(Arc::clone(&definition));
                    info!(
                        mod_id = %definition.id(),
                        name = definition.name(),
                        version = %definition.version(),
                        "registered mod"
                    );
                    return Ok(definition);
                }
            }
        };
        // Lost a registration race to another caller.
        self.reconcile(existing, &definition)
    }

    /// Resolve a source and register the result.
    pub fn resolve<S>(&self, source: &S) -> Result<Arc<ModDefinition>>
    where
        S: ResolvableSource + ?Sized,
    {
        source.resolve(self)
    }

    /// Look up a registered definition. Never creates, never fails.
    pub fn try_get(&self, id: &str) -> Option<Arc<ModDefinition>> {
        self.read_map().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read_map().contains_key(id)
    }

    /// Number of registered mods.
    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_map().is_empty()
    }

    /// All registered definitions, sorted by identifier.
    pub fn definitions(&self) -> Vec<Arc<ModDefinition>> {
        let mut all: Vec<_> = self.read_map().values().cloned().collect();
        all.sort_by(|a, b| a.id().cmp(b.id()));
        all
    }

    /// Drop every registration. Only meant for teardown.
    pub fn clear(&self) {
        let mut map = self.write_map();
        debug!(count = map.len(), "clearing mod registry");
        map.clear();
    }

    fn reconcile(
        &self,
        existing: Arc<ModDefinition>,
        attempted: &ModDefinition,
    ) -> Result<Arc<ModDefinition>> {
        if existing.same_metadata(attempted) {
            return Ok(existing);
        }
        match self.config.conflict_policy {
            ConflictPolicy::KeepFirst => {
                warn!(
                    mod_id = %existing.id(),
                    registered = %existing,
                    ignored = %attempted,
                    "mod registered again with different metadata; keeping first registration"
                );
                Ok(existing)
            }
            ConflictPolicy::Reject => Err(RegistryError::Conflict {
                existing: Box::new(ModDefinition::clone(&existing)),
                attempted: Box::new(attempted.clone()),
            }),
        }
    }

    // A panic while holding the lock cannot leave the map half-updated:
    // every mutation is a single insert or clear.
    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<ModId, Arc<ModDefinition>>> {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, HashMap<ModId, Arc<ModDefinition>>> {
        self.definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ModRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModRegistry")
            .field("conflict_policy", &self.config.conflict_policy)
            .field("mod_count", &self.len())
            .finish()
    }
}
