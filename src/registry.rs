use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::definition::Definition;
use crate::inject::Wiring;
use crate::instance::Instance;
use crate::key::Key;
use crate::resolve::{Bindable, Binder, Resolver, WiringError};

/// Dependency injection registry.
///
/// Each [Key] is associated to a single [Definition]. The registry implements
/// [Binder] to install definitions and [Resolver] to obtain their instances.
///
/// When auto-wiring is enabled, definitions bound afterwards pass the objects they produce
/// through the auto-wiring process (see [Inject](crate::Inject)) before handing them out.
/// Changing this setting does not affect existing definitions.
#[derive(Default)]
pub struct Registry {
    definitions: RwLock<HashMap<Key, Arc<Definition>>>,
    resolve_dependencies: AtomicBool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with auto-wiring enabled
    pub fn with_autowiring() -> Self {
        let registry = Self::new();
        registry.set_resolve_dependencies(true);
        registry
    }

    pub fn resolve_dependencies(&self) -> bool {
        self.resolve_dependencies.load(Ordering::Relaxed)
    }

    /// Enable or disable auto-wiring for definitions bound from now on
    pub fn set_resolve_dependencies(&self, enabled: bool) {
        tracing::debug!("Auto-wiring {}", if enabled { "enabled" } else { "disabled" });
        self.resolve_dependencies.store(enabled, Ordering::Relaxed);
    }

    /// Copy all definitions of another registry into this one.
    ///
    /// Definitions of `other` replace existing ones with the same key. Both registries
    /// then share the copied definitions, including their cached singletons.
    pub fn merge_with_container(&self, other: &Registry) -> &Self {
        let incoming: Vec<(Key, Arc<Definition>)> = other
            .read()
            .iter()
            .map(|(k, d)| (k.clone(), d.clone()))
            .collect();
        tracing::debug!("Merging {} definitions", incoming.len());
        self.write().extend(incoming);
        self
    }

    /// Remove all definitions
    pub fn clear(&self) {
        tracing::debug!("Clearing registry");
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.read().contains_key(key)
    }

    /// Retrieve the definition stored under a key
    pub fn definition(&self, key: &Key) -> Option<Arc<Definition>> {
        self.read().get(key).cloned()
    }

    /// Fill the empty dependency slots of an object from this registry.
    ///
    /// The same object is returned. Objects without dependency slots are returned unmodified.
    pub fn autowire(&self, instance: impl Bindable) -> Result<Instance, WiringError> {
        Wiring::new(self).wire(instance.into_instance())
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Key, Arc<Definition>>> {
        self.definitions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Key, Arc<Definition>>> {
        self.definitions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Binder for Registry {
    fn bind_factory_to_key<B: Bindable>(
        &self,
        factory: impl Fn() -> B + Send + Sync + 'static,
        key: impl Into<Key>,
    ) -> Arc<Definition> {
        let key = key.into();
        let autowired = self.resolve_dependencies();
        tracing::debug!("Binding '{}' (auto-wiring: {})", key, autowired);

        let definition = Definition::new(move || factory().into_instance()).autowiring(autowired);
        let definition = Arc::new(definition);
        self.write().insert(key, definition.clone());
        definition
    }
}

impl Resolver for Registry {
    fn try_resolve_key(&self, key: &Key) -> Result<Option<Instance>, WiringError> {
        // The lock is released before running any factory
        let Some(definition) = self.definition(key) else {
            tracing::trace!("Nothing bound to '{}'", key);
            return Ok(None);
        };

        let instance = if definition.is_autowired() {
            definition.instance_with(|instance| Wiring::new(self).wire(instance))?
        } else {
            definition.instance()
        };
        Ok(Some(instance))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, definition) in self.read().iter() {
            map.entry(&key.as_str(), definition);
        }
        map.finish()
    }
}
