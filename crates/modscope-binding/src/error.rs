//! Error types for binding operations.

use modscope_types::ModId;
use thiserror::Error;

/// Misuse of a [`ModBinding`](crate::ModBinding).
///
/// These are integration defects, not runtime conditions: a component was
/// used before the registration process set it up, or was set up twice.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The binding was never initialized.
    #[error("mod binding is uninitialized: the component was never registered by its owning mod")]
    Uninitialized,

    /// The binding names a mod that is not in the registry.
    #[error(
        "mod binding refers to unregistered mod {mod_id}: the component was never registered by its owning mod"
    )]
    Unregistered { mod_id: ModId },

    /// `initialize` was called on a binding that already has an owner.
    #[error("mod binding already initialized with {existing}; refusing to rebind to {attempted}")]
    AlreadyInitialized { existing: ModId, attempted: ModId },
}

impl BindingError {
    /// Returns `true` for the "used before registration" family of errors.
    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Self::Uninitialized | Self::Unregistered { .. })
    }
}

/// Convenience type alias for binding operations.
pub type Result<T> = std::result::Result<T, BindingError>;
