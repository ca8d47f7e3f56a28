//! Caller-facing scoped data API.

use modscope_types::{ModId, OwnerId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::key::DataKey;
use crate::traits::DataStore;

/// Raw and JSON access to data scoped by `(owner, mod)`.
///
/// Only the mod identifier takes part in the key. Anything that exposes a
/// [`ModId`] through `AsRef` (a `ModId` itself, a `ModDefinition`) can be
/// used to scope an access, and two definitions with the same identifier
/// address the same entries.
#[derive(Debug, Clone, Default)]
pub struct ScopedData<S> {
    store: S,
}

impl<S: DataStore> ScopedData<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying substrate.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store raw bytes, replacing any previous payload.
    pub fn set_raw<M>(&self, owner: OwnerId, mod_id: &M, bytes: &[u8]) -> StoreResult<()>
    where
        M: AsRef<ModId> + ?Sized,
    {
        self.store.write(&key(owner, mod_id), bytes)
    }

    /// Read raw bytes. `Ok(None)` if nothing is stored for this mod on this
    /// owner.
    pub fn get_raw<M>(&self, owner: OwnerId, mod_id: &M) -> StoreResult<Option<Vec<u8>>>
    where
        M: AsRef<ModId> + ?Sized,
    {
        self.store.read(&key(owner, mod_id))
    }

    /// Serialize `value` as JSON and store it.
    ///
    /// `None`, `()` and `serde_json::Value::Null` are stored as JSON `null`.
    pub fn set_json<M, T>(&self, owner: OwnerId, mod_id: &M, value: &T) -> StoreResult<()>
    where
        M: AsRef<ModId> + ?Sized,
        T: Serialize + ?Sized,
    {
        let key = key(owner, mod_id);
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(source) => return Err(StoreError::Encode { key, source }),
        };
        debug!(%key, len = bytes.len(), "storing JSON scoped data");
        self.store.write(&key, &bytes)
    }

    /// Read and decode a JSON payload.
    ///
    /// Returns `Ok(None)` when nothing is stored. Stored bytes that are not
    /// valid JSON for `T` fail with [`StoreError::Decode`].
    pub fn get_json<M, T>(&self, owner: OwnerId, mod_id: &M) -> StoreResult<Option<T>>
    where
        M: AsRef<ModId> + ?Sized,
        T: DeserializeOwned,
    {
        let key = key(owner, mod_id);
        let Some(bytes) = self.store.read(&key)? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(source) => Err(StoreError::Decode { key, source }),
        }
    }

    /// Remove one entry. Returns `true` if it existed.
    pub fn remove<M>(&self, owner: OwnerId, mod_id: &M) -> StoreResult<bool>
    where
        M: AsRef<ModId> + ?Sized,
    {
        self.store.remove(&key(owner, mod_id))
    }

    /// Mods with data stored on `owner`.
    pub fn mods_for_owner(&self, owner: OwnerId) -> StoreResult<Vec<ModId>> {
        self.store.mod_ids_for_owner(owner)
    }

    /// Drop all data of `owner`. Called by the host when the owning object
    /// is destroyed.
    pub fn release_owner(&self, owner: OwnerId) -> StoreResult<usize> {
        let removed = self.store.remove_owner(owner)?;
        debug!(%owner, removed, "released scoped data of owner");
        Ok(removed)
    }
}

fn key<M: AsRef<ModId> + ?Sized>(owner: OwnerId, mod_id: &M) -> DataKey {
    DataKey::new(owner, mod_id.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryDataStore;
    use modscope_types::ModDefinition;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stats {
        hp: i32,
    }

    fn data() -> ScopedData<InMemoryDataStore> {
        ScopedData::new(InMemoryDataStore::new())
    }

    fn mod_id(id: &str) -> ModId {
        ModId::new(id).unwrap()
    }

    const X: OwnerId = OwnerId::new(100);

    // -----------------------------------------------------------------------
    // Raw path
    // -----------------------------------------------------------------------

    #[test]
    fn raw_roundtrip_and_cross_mod_absence() {
        let data = data();
        data.set_raw(X, &mod_id("a"), &[1, 2, 3]).unwrap();
        assert_eq!(data.get_raw(X, &mod_id("a")).unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(data.get_raw(X, &mod_id("b")).unwrap(), None);
    }

    #[test]
    fn definitions_with_same_id_share_entries() {
        let data = data();
        let v1 = ModDefinition::parse("mod.a", "A", "1.0").unwrap();
        let v2 = ModDefinition::parse("mod.a", "A (renamed)", "2.0").unwrap();
        data.set_raw(X, &v1, b"shared").unwrap();
        assert_eq!(data.get_raw(X, &v2).unwrap(), Some(b"shared".to_vec()));
        assert_eq!(data.get_raw(X, v1.id()).unwrap(), Some(b"shared".to_vec()));
    }

    // -----------------------------------------------------------------------
    // JSON path
    // -----------------------------------------------------------------------

    #[test]
    fn json_roundtrip_last_write_wins() {
        let data = data();
        data.set_json(X, &mod_id("a"), &Stats { hp: 10 }).unwrap();
        let read: Option<Stats> = data.get_json(X, &mod_id("a")).unwrap();
        assert_eq!(read, Some(Stats { hp: 10 }));

        data.set_json(X, &mod_id("a"), &Stats { hp: 20 }).unwrap();
        let read: Option<Stats> = data.get_json(X, &mod_id("a")).unwrap();
        assert_eq!(read, Some(Stats { hp: 20 }));
    }

    #[test]
    fn overwrite_does_not_merge_objects() {
        let data = data();
        data.set_json(X, &mod_id("a"), &serde_json::json!({"hp": 10, "mp": 5}))
            .unwrap();
        data.set_json(X, &mod_id("a"), &serde_json::json!({"hp": 20}))
            .unwrap();
        let read: Option<serde_json::Value> = data.get_json(X, &mod_id("a")).unwrap();
        assert_eq!(read, Some(serde_json::json!({"hp": 20})));
    }

    #[test]
    fn json_missing_is_none() {
        let data = data();
        let read: Option<Stats> = data.get_json(X, &mod_id("a")).unwrap();
        assert!(read.is_none());
    }

    #[test]
    fn null_value_is_stored_as_json_null() {
        let data = data();
        data.set_json(X, &mod_id("a"), &Option::<Stats>::None).unwrap();
        assert_eq!(data.get_raw(X, &mod_id("a")).unwrap(), Some(b"null".to_vec()));

        let read: Option<Option<Stats>> = data.get_json(X, &mod_id("a")).unwrap();
        assert_eq!(read, Some(None));

        data.set_json(X, &mod_id("b"), &()).unwrap();
        assert_eq!(data.get_raw(X, &mod_id("b")).unwrap(), Some(b"null".to_vec()));
    }

    #[test]
    fn unsized_values_serialize() {
        let data = data();
        data.set_json(X, &mod_id("a"), "plain text").unwrap();
        data.set_json(X, &mod_id("b"), &[1, 2, 3][..]).unwrap();
        let s: Option<String> = data.get_json(X, &mod_id("a")).unwrap();
        let v: Option<Vec<u8>> = data.get_json(X, &mod_id("b")).unwrap();
        assert_eq!(s.as_deref(), Some("plain text"));
        assert_eq!(v, Some(vec![1, 2, 3]));
    }

    // -----------------------------------------------------------------------
    // Decode vs. absence
    // -----------------------------------------------------------------------

    #[test]
    fn malformed_bytes_are_decode_error() {
        let data = data();
        data.set_raw(X, &mod_id("c"), &[0xff, 0x00, 0x12]).unwrap();
        let err = data.get_json::<_, Stats>(X, &mod_id("c")).unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("owner#100/c"));
    }

    #[test]
    fn type_mismatch_is_decode_error() {
        let data = data();
        data.set_json(X, &mod_id("c"), &"not stats").unwrap();
        let err = data.get_json::<_, Stats>(X, &mod_id("c")).unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[test]
    fn unencodable_value_is_encode_error() {
        let data = data();
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1);
        let err = data.set_json(X, &mod_id("a"), &map).unwrap_err();
        assert!(matches!(err, StoreError::Encode { .. }));
        assert!(data.get_raw(X, &mod_id("a")).unwrap().is_none());
    }

    // -----------------------------------------------------------------------
    // Scoping / lifecycle
    // -----------------------------------------------------------------------

    #[test]
    fn mods_never_observe_each_other() {
        let data = data();
        data.set_json(X, &mod_id("a"), &Stats { hp: 1 }).unwrap();
        data.set_json(X, &mod_id("b"), &Stats { hp: 2 }).unwrap();
        data.set_json(X, &mod_id("a"), &Stats { hp: 3 }).unwrap();
        let b: Option<Stats> = data.get_json(X, &mod_id("b")).unwrap();
        assert_eq!(b, Some(Stats { hp: 2 }));
        assert_eq!(data.mods_for_owner(X).unwrap().len(), 2);
    }

    #[test]
    fn release_owner_drops_everything_for_owner() {
        let data = data();
        let other = OwnerId::new(7);
        data.set_raw(X, &mod_id("a"), b"1").unwrap();
        data.set_raw(X, &mod_id("b"), b"2").unwrap();
        data.set_raw(other, &mod_id("a"), b"3").unwrap();
        assert_eq!(data.release_owner(X).unwrap(), 2);
        assert!(data.mods_for_owner(X).unwrap().is_empty());
        assert!(data.get_raw(other, &mod_id("a")).unwrap().is_some());
        assert!(data.remove(other, &mod_id("a")).unwrap());
    }

    #[test]
    fn works_over_shared_substrate() {
        let store = std::sync::Arc::new(InMemoryDataStore::new());
        let a = ScopedData::new(std::sync::Arc::clone(&store));
        let b = ScopedData::new(std::sync::Arc::clone(&store));
        a.set_raw(X, &mod_id("a"), b"seen").unwrap();
        assert_eq!(b.get_raw(X, &mod_id("a")).unwrap(), Some(b"seen".to_vec()));
        assert_eq!(store.len(), 1);
    }
}
