//! Mod identity registry for modscope.
//!
//! The registry maps a stable textual identifier to exactly one validated
//! [`ModDefinition`]. Registration is get-or-create: the first successful
//! registration of an identifier wins, and every later caller (including
//! callers racing on another thread) receives that same record.
//!
//! # Modules
//!
//! - [`error`] — Error types for registration and source resolution
//! - [`config`] — [`RegistryConfig`] and the [`ConflictPolicy`]
//! - [`registry`] — The [`ModRegistry`] itself
//! - [`source`] — The [`ResolvableSource`] trait and concrete sources
//!
//! # Design Rules
//!
//! 1. Validation runs before the registry is touched; a failed registration
//!    leaves no trace.
//! 2. Check-then-insert is atomic per registry.
//! 3. Records are immutable and shared as `Arc<ModDefinition>`.
//! 4. Registries are explicit values; nothing here is a process global.

pub mod config;
pub mod error;
pub mod registry;
pub mod source;

pub use config::{ConflictPolicy, RegistryConfig};
pub use error::{RegistryError, Result};
pub use registry::ModRegistry;
pub use source::{DefinitionAsset, RawModFields, ResolvableSource, StaticSource};

pub use modscope_types::{DefinitionError, ModDefinition, ModId, ModVersion};
