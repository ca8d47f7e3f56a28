use std::fmt;
use std::sync::Arc;

use modscope_binding::{ModComponent, RegistrationToken};
use modscope_registry::{ModRegistry, ResolvableSource};
use modscope_store::{DataStore, InMemoryDataStore, ScopedData};
use modscope_types::{ModDefinition, OwnerId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::config::HostConfig;
use crate::error::SdkResult;

/// High-level modscope API for an embedding host.
///
/// Component-level data calls resolve the component's owning mod first, so
/// an unbound or unregistered component fails before any data is touched.
pub struct ModHost {
    registry: Arc<ModRegistry>,
    data: ScopedData<Arc<dyn DataStore>>,
}

impl ModHost {
    pub fn new(registry: Arc<ModRegistry>, store: Arc<dyn DataStore>) -> Self {
        Self {
            registry,
            data: ScopedData::new(store),
        }
    }

    /// A host with a default registry and an in-memory store.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(ModRegistry::new()),
            Arc::new(InMemoryDataStore::new()),
        )
    }

    pub fn from_config(config: &HostConfig) -> SdkResult<Self> {
        let registry = Arc::new(ModRegistry::with_config(config.registry.clone()));
        let store = config.store.open()?;
        Ok(Self::new(registry, store))
    }

    pub fn registry(&self) -> &Arc<ModRegistry> {
        &self.registry
    }

    /// Direct `(owner, mod)` access, for callers that already hold both.
    pub fn data(&self) -> &ScopedData<Arc<dyn DataStore>> {
        &self.data
    }

    // ---- Identity ----

    pub fn resolve<S>(&self, source: &S) -> SdkResult<Arc<ModDefinition>>
    where
        S: ResolvableSource + ?Sized,
    {
        Ok(self.registry.resolve(source)?)
    }

    /// Registration entry point: make `definition` known to the registry
    /// and bind `component` to it. Called once per owning object.
    ///
    /// The binding records the registry's canonical record, which may be an
    /// earlier registration of the same identifier.
    pub fn register_component<C>(&self, component: &C, definition: &ModDefinition) -> SdkResult<()>
    where
        C: ModComponent + ?Sized,
    {
        let canonical = self.registry.register(definition.clone())?;
        let token = RegistrationToken::for_registration_entry_point();
        component.binding().initialize(&token, &*canonical)?;
        info!(owner = %component.owner(), mod_id = %canonical.id(), "registered component");
        Ok(())
    }

    pub fn owner_identity<C>(&self, component: &C) -> SdkResult<Arc<ModDefinition>>
    where
        C: ModComponent + ?Sized,
    {
        Ok(component.owner_identity(&self.registry)?)
    }

    // ---- Component data ----

    pub fn set_raw<C>(&self, component: &C, bytes: &[u8]) -> SdkResult<()>
    where
        C: ModComponent + ?Sized,
    {
        let owner = self.owner_identity(component)?;
        self.data.set_raw(component.owner(), &*owner, bytes)?;
        Ok(())
    }

    pub fn get_raw<C>(&self, component: &C) -> SdkResult<Option<Vec<u8>>>
    where
        C: ModComponent + ?Sized,
    {
        let owner = self.owner_identity(component)?;
        Ok(self.data.get_raw(component.owner(), &*owner)?)
    }

    pub fn set_json<C, T>(&self, component: &C, value: &T) -> SdkResult<()>
    where
        C: ModComponent + ?Sized,
        T: Serialize + ?Sized,
    {
        let owner = self.owner_identity(component)?;
        self.data.set_json(component.owner(), &*owner, value)?;
        Ok(())
    }

    pub fn get_json<C, T>(&self, component: &C) -> SdkResult<Option<T>>
    where
        C: ModComponent + ?Sized,
        T: DeserializeOwned,
    {
        let owner = self.owner_identity(component)?;
        Ok(self.data.get_json(component.owner(), &*owner)?)
    }

    pub fn remove<C>(&self, component: &C) -> SdkResult<bool>
    where
        C: ModComponent + ?Sized,
    {
        let owner = self.owner_identity(component)?;
        Ok(self.data.remove(component.owner(), &*owner)?)
    }

    /// Drop all scoped data of a destroyed host object.
    pub fn release_owner(&self, owner: OwnerId) -> SdkResult<usize> {
        Ok(self.data.release_owner(owner)?)
    }
}

impl fmt::Debug for ModHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModHost")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreBackend;
    use crate::error::SdkError;
    use modscope_binding::{BindingError, ModBinding};
    use modscope_registry::{RegistryConfig, RegistryError, StaticSource};
    use modscope_types::DefinitionError;
    use serde::Deserialize;
    use std::thread;

    struct Crate {
        uid: u64,
        binding: ModBinding,
    }

    impl Crate {
        fn new(uid: u64) -> Self {
            Self {
                uid,
                binding: ModBinding::new(),
            }
        }
    }

    impl ModComponent for Crate {
        fn owner(&self) -> OwnerId {
            OwnerId::new(self.uid)
        }

        fn binding(&self) -> &ModBinding {
            &self.binding
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Loot {
        gold: u32,
    }

    fn def(id: &str) -> ModDefinition {
        ModDefinition::parse(id, "Example", "1.0.0").unwrap()
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    #[test]
    fn register_then_resolve() {
        let host = ModHost::in_memory();
        let c = Crate::new(1);
        host.register_component(&c, &def("mod.a")).unwrap();
        let owner = host.owner_identity(&c).unwrap();
        assert_eq!(owner.id().as_str(), "mod.a");
        assert!(host.registry().contains("mod.a"));
    }

    #[test]
    fn registration_binds_to_canonical_record() {
        let host = ModHost::in_memory();
        let first = host
            .registry()
            .get_or_create("mod.a", "Original", "1.0")
            .unwrap();
        let c = Crate::new(1);
        host.register_component(&c, &ModDefinition::parse("mod.a", "Other", "2.0").unwrap())
            .unwrap();
        assert!(Arc::ptr_eq(&host.owner_identity(&c).unwrap(), &first));
    }

    #[test]
    fn strict_registry_refuses_conflicting_component() {
        let host = ModHost::new(
            Arc::new(ModRegistry::with_config(RegistryConfig::strict())),
            Arc::new(InMemoryDataStore::new()),
        );
        host.registry().get_or_create("mod.a", "A", "1.0").unwrap();
        let c = Crate::new(1);
        let err = host
            .register_component(&c, &ModDefinition::parse("mod.a", "A", "2.0").unwrap())
            .unwrap_err();
        assert!(matches!(err, SdkError::Registry(RegistryError::Conflict { .. })));
        assert!(!c.binding().is_initialized());
    }

    #[test]
    fn double_registration_is_an_error() {
        let host = ModHost::in_memory();
        let c = Crate::new(1);
        host.register_component(&c, &def("mod.a")).unwrap();
        let err = host.register_component(&c, &def("mod.b")).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Binding(BindingError::AlreadyInitialized { .. })
        ));
    }

    #[test]
    fn resolve_names_failing_source() {
        let host = ModHost::in_memory();
        let err = host
            .resolve(&StaticSource::new("mod.a", "A", "abc"))
            .unwrap_err();
        match err {
            SdkError::Registry(RegistryError::InvalidSource { source, .. }) => {
                assert!(matches!(source, DefinitionError::Format { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(host.registry().is_empty());
    }

    // -----------------------------------------------------------------------
    // Component data
    // -----------------------------------------------------------------------

    #[test]
    fn unbound_component_data_access_fails_loudly() {
        let host = ModHost::in_memory();
        let c = Crate::new(1);
        let err = host.set_raw(&c, b"x").unwrap_err();
        assert!(matches!(err, SdkError::Binding(BindingError::Uninitialized)));
        assert!(host.data().mods_for_owner(c.owner()).unwrap().is_empty());
    }

    #[test]
    fn json_roundtrip_through_component() {
        let host = ModHost::in_memory();
        let c = Crate::new(5);
        host.register_component(&c, &def("mod.loot")).unwrap();

        assert_eq!(host.get_json::<_, Loot>(&c).unwrap(), None);
        host.set_json(&c, &Loot { gold: 3 }).unwrap();
        host.set_json(&c, &Loot { gold: 9 }).unwrap();
        assert_eq!(host.get_json::<_, Loot>(&c).unwrap(), Some(Loot { gold: 9 }));

        let raw = host.get_raw(&c).unwrap().unwrap();
        assert_eq!(raw, br#"{"gold":9}"#.to_vec());
    }

    #[test]
    fn components_of_different_mods_are_isolated() {
        let host = ModHost::in_memory();
        let a = Crate::new(7);
        let b = Crate::new(7);
        host.register_component(&a, &def("mod.a")).unwrap();
        host.register_component(&b, &def("mod.b")).unwrap();

        host.set_raw(&a, b"from a").unwrap();
        assert_eq!(host.get_raw(&b).unwrap(), None);
        host.set_raw(&b, b"from b").unwrap();
        assert_eq!(host.get_raw(&a).unwrap(), Some(b"from a".to_vec()));

        assert!(host.remove(&a).unwrap());
        assert_eq!(host.release_owner(OwnerId::new(7)).unwrap(), 1);
    }

    #[test]
    fn decode_failure_is_not_absence() {
        let host = ModHost::in_memory();
        let c = Crate::new(1);
        host.register_component(&c, &def("mod.a")).unwrap();
        host.set_raw(&c, &[0xde, 0xad]).unwrap();
        let err = host.get_json::<_, Loot>(&c).unwrap_err();
        match err {
            SdkError::Store(e) => assert!(e.is_decode()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn concurrent_components_share_one_record() {
        let host = Arc::new(ModHost::in_memory());
        let handles: Vec<_> = (0..8u64)
            .map(|uid| {
                let host = Arc::clone(&host);
                thread::spawn(move || {
                    let c = Crate::new(uid);
                    host.register_component(&c, &def("mod.shared")).unwrap();
                    host.set_json(&c, &Loot { gold: uid as u32 }).unwrap();
                    host.owner_identity(&c).unwrap()
                })
            })
            .collect();
        let records: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();
        assert!(records.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(host.registry().len(), 1);
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    #[test]
    fn file_backed_host_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let config = HostConfig {
            store: StoreBackend::File {
                root: dir.path().to_path_buf(),
            },
            ..HostConfig::default()
        };

        let host = ModHost::from_config(&config).unwrap();
        let c = Crate::new(11);
        host.register_component(&c, &def("mod.save")).unwrap();
        host.set_json(&c, &Loot { gold: 42 }).unwrap();
        drop(host);

        // Bindings restored from saved host data come back unresolved.
        let host = ModHost::from_config(&config).unwrap();
        let restored = Crate {
            uid: 11,
            binding: serde_json::from_str("\"mod.save\"").unwrap(),
        };
        let err = host.get_json::<_, Loot>(&restored).unwrap_err();
        assert!(matches!(err, SdkError::Binding(BindingError::Unregistered { .. })));

        host.registry().register(def("mod.save")).unwrap();
        assert_eq!(
            host.get_json::<_, Loot>(&restored).unwrap(),
            Some(Loot { gold: 42 })
        );
    }
}
