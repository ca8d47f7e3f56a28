use modscope_types::{ModId, OwnerId};

use crate::error::StoreResult;
use crate::key::DataKey;

/// Byte-level persistence substrate for scoped data.
///
/// All implementations must satisfy these invariants:
/// - `write` is an upsert with total-replace semantics.
/// - `read` returns `Ok(None)` for a key that was never written or was
///   removed.
/// - Entries under different keys are independent; in particular the same
///   owner with two different mods never shares an entry.
/// - The store never interprets payloads.
/// - All I/O errors are propagated, never silently ignored.
pub trait DataStore: Send + Sync {
    /// Read the payload stored under `key`.
    fn read(&self, key: &DataKey) -> StoreResult<Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous payload.
    fn write(&self, key: &DataKey, bytes: &[u8]) -> StoreResult<()>;

    /// Remove one entry. Returns `true` if it existed.
    fn remove(&self, key: &DataKey) -> StoreResult<bool>;

    /// Remove every entry of an owner, e.g. when the host object is
    /// destroyed. Returns the number of entries removed.
    fn remove_owner(&self, owner: OwnerId) -> StoreResult<usize>;

    /// Mods that have data stored for an owner, sorted.
    fn mod_ids_for_owner(&self, owner: OwnerId) -> StoreResult<Vec<ModId>>;

    /// Check whether an entry exists.
    ///
    /// Default implementation reads the payload. Backends may override.
    fn exists(&self, key: &DataKey) -> StoreResult<bool> {
        Ok(self.read(key)?.is_some())
    }
}

impl<S: DataStore + ?Sized> DataStore for std::sync::Arc<S> {
    fn read(&self, key: &DataKey) -> StoreResult<Option<Vec<u8>>> {
        (**self).read(key)
    }

    fn write(&self, key: &DataKey, bytes: &[u8]) -> StoreResult<()> {
        (**self).write(key, bytes)
    }

    fn remove(&self, key: &DataKey) -> StoreResult<bool> {
        (**self).remove(key)
    }

    fn remove_owner(&self, owner: OwnerId) -> StoreResult<usize> {
        (**self).remove_owner(owner)
    }

    fn mod_ids_for_owner(&self, owner: OwnerId) -> StoreResult<Vec<ModId>> {
        (**self).mod_ids_for_owner(owner)
    }

    fn exists(&self, key: &DataKey) -> StoreResult<bool> {
        (**self).exists(key)
    }
}
