//! Binding and resolution contracts
//!
//! * The [Binder] trait installs [Definition]s in a registry. Each binding is stored under a [Key],
//!   derived from the bound type or given explicitly by the caller.
//! * The [Resolver] trait retrieves the current instance for a key. A missing key is not an error:
//!   resolution simply produces nothing.
//! * The [Bindable] trait describes values accepted by the binder: plain shared objects (`Arc<T>`)
//!   and shared objects exposing dependency slots ([Autowired](crate::Autowired)).

use std::any::Any;
use std::sync::Arc;
use thiserror::Error;

use crate::definition::Definition;
use crate::instance::Instance;
use crate::key::Key;

/// A value which can be stored in a registry
pub trait Bindable {
    /// The type from which the default key is derived
    type Target: ?Sized + Send + Sync + 'static;

    fn into_instance(self) -> Instance;
}

impl<T: ?Sized + Send + Sync + 'static> Bindable for Arc<T> {
    type Target = T;

    fn into_instance(self) -> Instance {
        Instance::new(self)
    }
}

// Already erased: only meaningful with an explicit key
impl Bindable for Instance {
    type Target = dyn Any + Send + Sync;

    fn into_instance(self) -> Instance {
        self
    }
}

/// Write side of a registry.
///
/// The key of a binding is derived, by order of precedence, from an explicit key,
/// an explicit type or the type of the bound value.
/// Binding to an existing key replaces the previous definition entirely.
pub trait Binder {
    /// Install a factory-backed definition under an explicit key.
    ///
    /// The new definition is in [Scope::Prototype](crate::Scope::Prototype) and is returned
    /// to allow changing its scope.
    fn bind_factory_to_key<B: Bindable>(
        &self,
        factory: impl Fn() -> B + Send + Sync + 'static,
        key: impl Into<Key>,
    ) -> Arc<Definition>;

    /// Install a factory-backed definition under the key of the produced type
    fn bind_factory<B: Bindable>(
        &self,
        factory: impl Fn() -> B + Send + Sync + 'static,
    ) -> Arc<Definition> {
        self.bind_factory_to_key(factory, Key::of::<B::Target>())
    }

    /// Install a factory-backed definition under the key of an explicit type.
    ///
    /// This allows a factory of concrete objects to satisfy a trait object:
    /// `bind_factory_to_type::<dyn MyTrait, _>(|| Arc::new(MyImpl) as Arc<dyn MyTrait>)`,
    /// or, keeping the dependency slots of the objects,
    /// `bind_factory_to_type::<dyn MyTrait, _>(|| Autowired::new(MyImpl).cast(|i| i as Arc<dyn MyTrait>))`.
    fn bind_factory_to_type<U: ?Sized + Send + Sync + 'static, B: Bindable<Target = U>>(
        &self,
        factory: impl Fn() -> B + Send + Sync + 'static,
    ) -> Arc<Definition> {
        self.bind_factory_to_key(factory, Key::of::<U>())
    }

    /// Install a fixed instance under an explicit key, in [Scope::Singleton](crate::Scope::Singleton)
    fn bind_to_key(&self, instance: impl Bindable, key: impl Into<Key>) {
        let instance = instance.into_instance();
        self.bind_factory_to_key(move || instance.clone(), key)
            .as_singleton();
    }

    /// Install a fixed instance under the key of its own type
    fn bind<B: Bindable>(&self, instance: B) {
        self.bind_to_key(instance, Key::of::<B::Target>());
    }

    /// Install a fixed instance under the key of an explicit type.
    ///
    /// The value must already have this type, e.g. `Arc<dyn MyTrait>` or
    /// `Autowired<dyn MyTrait>` (see [Autowired::cast](crate::Autowired::cast)).
    fn bind_to_type<U: ?Sized + Send + Sync + 'static>(&self, instance: impl Bindable<Target = U>) {
        self.bind_to_key(instance, Key::of::<U>());
    }
}

/// Read side of a registry.
pub trait Resolver {
    /// Retrieve the current instance stored under a key.
    ///
    /// Returns `Ok(None)` if nothing is bound to this key, and an error if the
    /// instance had to be built and its auto-wiring failed.
    fn try_resolve_key(&self, key: &Key) -> Result<Option<Instance>, WiringError>;

    /// Retrieve the current instance stored under the key of a type, narrowed to this type
    fn try_resolve_type<T: ?Sized + 'static>(&self) -> Result<Option<Arc<T>>, WiringError> {
        let instance = self.try_resolve_key(&Key::of::<T>())?;
        Ok(instance.and_then(|i| i.downcast::<T>()))
    }

    /// Retrieve the current instance stored under a key.
    ///
    /// # Panics
    ///
    /// Auto-wiring failures reveal inconsistent bindings and trigger a panic,
    /// use [Resolver::try_resolve_key] to handle them.
    fn resolve_key(&self, key: &Key) -> Option<Instance> {
        self.try_resolve_key(key).unwrap_or_else(|e| fatal(e))
    }

    /// Retrieve the current instance stored under the key of a type, narrowed to this type.
    ///
    /// Returns `None` if the key is missing or if the stored instance has another type.
    ///
    /// # Panics
    ///
    /// Same as [Resolver::resolve_key].
    fn resolve_type<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.try_resolve_type::<T>().unwrap_or_else(|e| fatal(e))
    }
}

fn fatal(error: WiringError) -> ! {
    tracing::error!("{}", error);
    panic!("{}", error)
}

/// Errors triggered during the autowiring process
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WiringError {
    #[error("Type mismatch: slot '{slot}' expects '{expected}' but the registry holds '{actual}'")]
    SlotTypeMismatch {
        slot: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Cyclic dependencies: {}", display_chain(.chain))]
    DependencyCycle { chain: Vec<Key> },
}

fn display_chain(chain: &[Key]) -> String {
    let names: Vec<&str> = chain.iter().map(Key::as_str).collect();
    names.join(" -> ")
}
