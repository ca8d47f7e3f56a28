use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use modscope_registry::ModRegistry;
use modscope_types::{ModDefinition, ModId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::{BindingError, Result};

/// Lifecycle state of a [`ModBinding`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingState {
    /// No owner yet; the registration process has not run.
    Unbound,
    /// Owner identifier known, record not looked up yet.
    Unresolved(ModId),
    /// Owner record looked up and cached.
    Resolved(Arc<ModDefinition>),
}

impl BindingState {
    pub fn mod_id(&self) -> Option<&ModId> {
        match self {
            Self::Unbound => None,
            Self::Unresolved(id) => Some(id),
            Self::Resolved(def) => Some(def.id()),
        }
    }
}

/// Permission to initialize a [`ModBinding`].
///
/// Issued only to the host's registration entry point, which registers the
/// definition before binding to it. The field is private, so the token
/// cannot be built by struct literal:
///
/// ```compile_fail
/// let token = modscope_binding::RegistrationToken(());
/// ```
#[doc(hidden)]
#[derive(Debug)]
pub struct RegistrationToken(());

impl RegistrationToken {
    #[doc(hidden)]
    pub const fn for_registration_entry_point() -> Self {
        Self(())
    }
}

/// Once-initialized link from a host component to its owning mod.
///
/// Transitions: `Unbound` → `Unresolved` (via [`initialize`]) → `Resolved`
/// (on the first successful [`owner_identity`]). The cached record is kept
/// for the lifetime of the binding, so later lookups do not touch the
/// registry.
///
/// A binding serializes as its identifier only (or `null` when unbound). A
/// deserialized binding starts out `Unresolved` and re-resolves lazily
/// against whatever registry it is asked about.
///
/// [`initialize`]: ModBinding::initialize
/// [`owner_identity`]: ModBinding::owner_identity
#[derive(Debug)]
pub struct ModBinding {
    state: RwLock<BindingState>,
}

impl ModBinding {
    /// A binding with no owner.
    pub fn new() -> Self {
        Self::with_state(BindingState::Unbound)
    }

    /// A binding whose owner identifier is already known, e.g. restored
    /// from serialized host data.
    pub fn unresolved(mod_id: ModId) -> Self {
        Self::with_state(BindingState::Unresolved(mod_id))
    }

    fn with_state(state: BindingState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Bind to the owning mod. Reserved for the registration process, which
    /// holds the [`RegistrationToken`].
    ///
    /// Only the identifier is kept; the record is looked up on first use.
    /// Binding twice is an error even when the identifier is the same, so
    /// double registration is caught where it happens.
    pub fn initialize<M>(&self, _token: &RegistrationToken, mod_id: &M) -> Result<()>
    where
        M: AsRef<ModId> + ?Sized,
    {
        let attempted = mod_id.as_ref();
        let mut state = self.write_state();
        if let Some(existing) = state.mod_id() {
            return Err(BindingError::AlreadyInitialized {
                existing: existing.clone(),
                attempted: attempted.clone(),
            });
        }
        *state = BindingState::Unresolved(attempted.clone());
        Ok(())
    }

    /// The owning mod's record.
    ///
    /// Fails with [`BindingError::Uninitialized`] if the binding was never
    /// initialized and with [`BindingError::Unregistered`] if its identifier
    /// is not in `registry`. Neither failure changes the binding, so a later
    /// call succeeds once registration has happened.
    pub fn owner_identity(&self, registry: &ModRegistry) -> Result<Arc<ModDefinition>> {
        let mod_id = match &*self.read_state() {
            BindingState::Resolved(definition) => return Ok(Arc::clone(definition)),
            BindingState::Unresolved(id) => id.clone(),
            BindingState::Unbound => return Err(BindingError::Uninitialized),
        };

        let definition = registry
            .try_get(mod_id.as_str())
            .ok_or_else(|| BindingError::Unregistered {
                mod_id: mod_id.clone(),
            })?;

        let mut state = self.write_state();
        // Another reader may have resolved it first.
        if let BindingState::Resolved(cached) = &*state {
            return Ok(Arc::clone(cached));
        }
        debug!(mod_id = %mod_id, "resolved mod binding");
        *state = BindingState::Resolved(Arc::clone(&definition));
        Ok(definition)
    }

    /// The owner identifier, if initialized.
    pub fn mod_id(&self) -> Option<ModId> {
        self.read_state().mod_id().cloned()
    }

    pub fn is_initialized(&self) -> bool {
        !matches!(*self.read_state(), BindingState::Unbound)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(*self.read_state(), BindingState::Resolved(_))
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> BindingState {
        self.read_state().clone()
    }

    // Every mutation is a single assignment, so a poisoned lock still holds
    // a consistent state.
    fn read_state(&self) -> RwLockReadGuard<'_, BindingState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, BindingState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ModBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for ModBinding {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.mod_id().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ModBinding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mod_id = Option::<ModId>::deserialize(deserializer)?;
        Ok(mod_id.map_or_else(Self::new, Self::unresolved))
    }
}
