use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use modscope_types::{ModId, OwnerId};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::key::DataKey;
use crate::traits::DataStore;

const ENTRY_EXTENSION: &str = "bin";

/// Size of the little-endian identifier length that starts every entry.
const HEADER_LEN: usize = 4;

/// Filesystem-backed scoped data store.
///
/// Layout: `<root>/<owner>/<hex(blake3(mod id))>.bin`. File names have a
/// fixed length whatever the identifier, so every valid identifier can be
/// stored. Each file starts with the full identifier (`u32` LE length, then
/// UTF-8 bytes) followed by the payload; listings read the identifier back
/// from there.
///
/// Writes go to a temporary file in the owner directory and are renamed
/// into place, so readers never observe a partially written payload.
#[derive(Debug, Clone)]
pub struct FileDataStore {
    root: PathBuf,
}

impl FileDataStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn owner_dir(&self, owner: OwnerId) -> PathBuf {
        self.root.join(owner.get().to_string())
    }

    fn entry_path(&self, key: &DataKey) -> PathBuf {
        self.owner_dir(key.owner).join(entry_file_name(&key.mod_id))
    }
}

fn entry_file_name(mod_id: &ModId) -> String {
    let digest = blake3::hash(mod_id.as_str().as_bytes());
    format!("{}.{ENTRY_EXTENSION}", hex::encode(digest.as_bytes()))
}

fn not_found_as_none<T>(result: io::Result<T>) -> io::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn encode_entry(mod_id: &ModId, payload: &[u8]) -> StoreResult<Vec<u8>> {
    let id = mod_id.as_str().as_bytes();
    let len = u32::try_from(id.len())
        .map_err(|_| StoreError::Backend(format!("mod identifier too long: {} bytes", id.len())))?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + id.len() + payload.len());
    bytes.extend_from_slice(&len.to_le_bytes());
    bytes.extend_from_slice(id);
    bytes.extend_from_slice(payload);
    Ok(bytes)
}

/// Split an entry into its stored identifier and payload.
fn decode_entry(bytes: &[u8]) -> Option<(&str, &[u8])> {
    let (len, rest) = bytes.split_first_chunk::<HEADER_LEN>()?;
    let len = u32::from_le_bytes(*len) as usize;
    if rest.len() < len {
        return None;
    }
    let (id, payload) = rest.split_at(len);
    Some((std::str::from_utf8(id).ok()?, payload))
}

/// Read only the identifier header of an entry file. `Ok(None)` if the file
/// is not a well-formed entry.
fn read_entry_id(path: &Path) -> io::Result<Option<ModId>> {
    let mut file = File::open(path)?;
    let mut len = [0u8; HEADER_LEN];
    match file.read_exact(&mut len) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }
    let len = u64::from(u32::from_le_bytes(len));
    let mut id = Vec::new();
    file.take(len).read_to_end(&mut id)?;
    if id.len() as u64 != len {
        return Ok(None);
    }
    let Ok(text) = String::from_utf8(id) else {
        return Ok(None);
    };
    let Ok(mod_id) = ModId::new(text) else {
        return Ok(None);
    };
    // The name must match the identifier it claims to hold.
    let expected = entry_file_name(&mod_id);
    Ok((path.file_name().and_then(|n| n.to_str()) == Some(expected.as_str())).then_some(mod_id))
}

impl DataStore for FileDataStore {
    fn read(&self, key: &DataKey) -> StoreResult<Option<Vec<u8>>> {
        let path = self.entry_path(key);
        let Some(bytes) = not_found_as_none(fs::read(&path))? else {
            return Ok(None);
        };
        match decode_entry(&bytes) {
            Some((id, payload)) if id == key.mod_id.as_str() => Ok(Some(payload.to_vec())),
            Some((id, _)) => Err(StoreError::Backend(format!(
                "{} holds data of mod {id:?}, expected {}",
                path.display(),
                key.mod_id
            ))),
            None => Err(StoreError::Backend(format!(
                "malformed data entry {}",
                path.display()
            ))),
        }
    }

    fn write(&self, key: &DataKey, bytes: &[u8]) -> StoreResult<()> {
        let entry = encode_entry(&key.mod_id, bytes)?;
        let dir = self.owner_dir(key.owner);
        fs::create_dir_all(&dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&entry)?;
        tmp.as_file().sync_all()?;
        let path = self.entry_path(key);
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!(%key, path = %path.display(), len = bytes.len(), "wrote scoped data file");
        Ok(())
    }

    fn remove(&self, key: &DataKey) -> StoreResult<bool> {
        Ok(not_found_as_none(fs::remove_file(self.entry_path(key)))?.is_some())
    }

    fn remove_owner(&self, owner: OwnerId) -> StoreResult<usize> {
        let count = self.mod_ids_for_owner(owner)?.len();
        let dir = self.owner_dir(owner);
        not_found_as_none(fs::remove_dir_all(&dir))?;
        Ok(count)
    }

    fn mod_ids_for_owner(&self, owner: OwnerId) -> StoreResult<Vec<ModId>> {
        let Some(entries) = not_found_as_none(fs::read_dir(self.owner_dir(owner)))? else {
            return Ok(Vec::new());
        };
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let id = if path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION) {
                read_entry_id(&path)?
            } else {
                None
            };
            match id {
                Some(id) => ids.push(id),
                // Leftover temp files from an interrupted write land here too.
                None => warn!(path = %path.display(), "skipping unrecognized file in data store"),
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn exists(&self, key: &DataKey) -> StoreResult<bool> {
        let metadata = not_found_as_none(fs::metadata(self.entry_path(key)))?;
        Ok(metadata.is_some_and(|m| m.is_file()))
    }
}
