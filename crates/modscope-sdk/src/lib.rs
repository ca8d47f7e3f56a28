//! High-level SDK for modscope.
//!
//! [`ModHost`] ties the subsystems together for an embedding application:
//! one registry, one scoped data store, and the registration entry point
//! that binds host components to their owning mod.

pub mod config;
pub mod error;
pub mod host;

pub use config::{HostConfig, StoreBackend};
pub use error::{SdkError, SdkResult};
pub use host::ModHost;

// Re-export key types
pub use modscope_binding::{BindingError, BindingState, ModBinding, ModComponent};
pub use modscope_registry::{
    ConflictPolicy, DefinitionAsset, ModRegistry, RegistryConfig, RegistryError,
    ResolvableSource, StaticSource,
};
pub use modscope_store::{DataStore, FileDataStore, InMemoryDataStore, ScopedData, StoreError};
pub use modscope_types::{DefinitionError, ModDefinition, ModId, ModVersion, OwnerId};
