use std::sync::Arc;

use modscope_registry::ModRegistry;
use modscope_types::{ModDefinition, OwnerId};

use crate::binding::ModBinding;
use crate::error::Result;

/// A host object that belongs to a mod and can carry mod-scoped data.
pub trait ModComponent {
    /// Handle of the host object, used as the owner key for scoped data.
    fn owner(&self) -> OwnerId;

    /// The component's link to its owning mod.
    fn binding(&self) -> &ModBinding;

    /// The owning mod's record. See [`ModBinding::owner_identity`].
    fn owner_identity(&self, registry: &ModRegistry) -> Result<Arc<ModDefinition>> {
        self.binding().owner_identity(registry)
    }
}
