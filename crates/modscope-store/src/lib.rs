//! Scoped auxiliary data storage for modscope.
//!
//! Every entry is keyed by `(owner, mod identifier)`: the host object the
//! data is attached to, and the mod that owns the data. Two mods writing to
//! the same owner never see each other's entries.
//!
//! # Layers
//!
//! - [`DataStore`] -- the byte-level persistence substrate. The store never
//!   interprets payloads.
//! - [`ScopedData`] -- the caller-facing API: raw byte access plus a JSON
//!   path built on top of it.
//!
//! # Storage Backends
//!
//! - [`InMemoryDataStore`] -- sharded `HashMap` store for tests and embedding
//! - [`FileDataStore`] -- one file per entry under a root directory
//!
//! # Design Rules
//!
//! 1. Writes are total replacements; nothing is ever merged.
//! 2. Absence is `Ok(None)`, never an error.
//! 3. Undecodable payloads are [`StoreError::Decode`], never absence.
//! 4. Substrate I/O errors are propagated, never silently ignored.
//! 5. Entries are only removed on explicit request from the host.

pub mod error;
pub mod file;
pub mod key;
pub mod memory;
pub mod scoped;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileDataStore;
pub use key::DataKey;
pub use memory::InMemoryDataStore;
pub use scoped::ScopedData;
pub use traits::DataStore;
