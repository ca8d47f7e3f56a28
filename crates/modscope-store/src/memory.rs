use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use modscope_types::{ModId, OwnerId};
use tracing::trace;

use crate::error::StoreResult;
use crate::key::DataKey;
use crate::traits::DataStore;

/// Default number of lock shards.
pub const DEFAULT_SHARDS: usize = 16;

type Shard = HashMap<DataKey, Vec<u8>>;

/// In-memory, sharded scoped data store.
///
/// Each key hashes to one of N independently locked shards, so writers on
/// different keys rarely contend. Writers on the same key serialize on that
/// shard's lock; the last write wins. Payloads are cloned on read/write.
pub struct InMemoryDataStore {
    shards: Box<[RwLock<Shard>]>,
    hasher: RandomState,
}

impl InMemoryDataStore {
    /// Create an empty store with [`DEFAULT_SHARDS`] shards.
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    /// Create an empty store with `shards` shards (at least one).
    pub fn with_shards(shards: usize) -> Self {
        let shards = (0..shards.max(1))
            .map(|_| RwLock::new(HashMap::new()))
            .collect();
        Self {
            shards,
            hasher: RandomState::new(),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Number of entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| read_shard(shard).len()).sum()
    }

    /// Returns `true` if no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total payload bytes across all entries.
    pub fn total_bytes(&self) -> u64 {
        self.shards
            .iter()
            .map(|shard| read_shard(shard).values().map(|v| v.len() as u64).sum::<u64>())
            .sum()
    }

    fn shard_for(&self, key: &DataKey) -> &RwLock<Shard> {
        let index = (self.hasher.hash_one(key) % self.shards.len() as u64) as usize;
        &self.shards[index]
    }
}

// Every shard mutation is a single map operation, so a poisoned lock still
// guards a consistent map.
fn read_shard(shard: &RwLock<Shard>) -> RwLockReadGuard<'_, Shard> {
    shard.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_shard(shard: &RwLock<Shard>) -> RwLockWriteGuard<'_, Shard> {
    shard.write().unwrap_or_else(PoisonError::into_inner)
}

impl Default for InMemoryDataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore for InMemoryDataStore {
    fn read(&self, key: &DataKey) -> StoreResult<Option<Vec<u8>>> {
        let shard = read_shard(self.shard_for(key));
        Ok(shard.get(key).cloned())
    }

    fn write(&self, key: &DataKey, bytes: &[u8]) -> StoreResult<()> {
        let mut shard = write_shard(self.shard_for(key));
        shard.insert(key.clone(), bytes.to_vec());
        trace!(%key, len = bytes.len(), "wrote scoped data");
        Ok(())
    }

    fn remove(&self, key: &DataKey) -> StoreResult<bool> {
        let mut shard = write_shard(self.shard_for(key));
        Ok(shard.remove(key).is_some())
    }

    fn remove_owner(&self, owner: OwnerId) -> StoreResult<usize> {
        let mut removed = 0;
        for shard in self.shards.iter() {
            let mut shard = write_shard(shard);
            let before = shard.len();
            shard.retain(|key, _| key.owner != owner);
            removed += before - shard.len();
        }
        Ok(removed)
    }

    fn mod_ids_for_owner(&self, owner: OwnerId) -> StoreResult<Vec<ModId>> {
        let mut ids = Vec::new();
        for shard in self.shards.iter() {
            let shard = read_shard(shard);
            ids.extend(
                shard
                    .keys()
                    .filter(|key| key.owner == owner)
                    .map(|key| key.mod_id.clone()),
            );
        }
        ids.sort();
        Ok(ids)
    }

    fn exists(&self, key: &DataKey) -> StoreResult<bool> {
        let shard = read_shard(self.shard_for(key));
        Ok(shard.contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryDataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDataStore")
            .field("shards", &self.shard_count())
            .field("entry_count", &self.len())
            .finish()
    }
}
