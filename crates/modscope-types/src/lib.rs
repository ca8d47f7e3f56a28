//! Foundation types for modscope.
//!
//! This crate provides the identity and handle types shared by every other
//! modscope crate. It has no state of its own: everything here is a value
//! type that is validated once on construction and never mutated.
//!
//! # Key Types
//!
//! - [`ModId`] — Stable, non-blank textual identifier of a mod
//! - [`ModVersion`] — Dotted numeric version with one to four components
//! - [`ModDefinition`] — Validated (identifier, display name, version) record
//! - [`OwnerId`] — Opaque handle of the host object that owns scoped data

pub mod definition;
pub mod error;
pub mod id;
pub mod version;

pub use definition::ModDefinition;
pub use error::{DefinitionError, VersionParseError};
pub use id::{ModId, OwnerId};
pub use version::ModVersion;
