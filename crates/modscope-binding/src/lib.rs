//! Bindings between host components and the mod that registered them.
//!
//! A host object that carries mod-owned data (an item behavior, an entity
//! script, ...) embeds a [`ModBinding`]. The registration process calls
//! [`ModBinding::initialize`] exactly once with the owning mod's identifier;
//! afterwards anyone holding the component can ask for its owner identity,
//! which is resolved against the registry on first use and cached.

pub mod binding;
pub mod component;
pub mod error;

pub use binding::{BindingState, ModBinding, RegistrationToken};
pub use component::ModComponent;
pub use error::{BindingError, Result};
