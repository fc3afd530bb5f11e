//! Scoped factories
//!
//! A [Definition] associates a zero-argument factory with a [Scope].
//! The scope decides whether the factory result is kept and shared ([Scope::Singleton])
//! or rebuilt for each request ([Scope::Prototype]).

use std::convert::Infallible;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::instance::Instance;

/// Zero-argument factory stored in a [Definition]
pub type Factory = Arc<dyn Fn() -> Instance + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Run the factory once and reuse its result
    Singleton,
    /// Run the factory on every access
    Prototype,
}

pub struct Definition {
    factory: Factory,
    scope: Mutex<Scope>,
    cached: Mutex<Option<Instance>>,
    autowired: bool,
}

impl Definition {
    /// Create a definition in [Scope::Prototype]
    pub fn new(factory: impl Fn() -> Instance + Send + Sync + 'static) -> Self {
        Self::with_scope(factory, Scope::Prototype)
    }

    pub fn with_scope(factory: impl Fn() -> Instance + Send + Sync + 'static, scope: Scope) -> Self {
        Self {
            factory: Arc::new(factory),
            scope: Mutex::new(scope),
            cached: Mutex::new(None),
            autowired: false,
        }
    }

    /// Mark the produced instances as subject to auto-wiring.
    ///
    /// This is decided once, when the definition is bound.
    pub(crate) fn autowiring(mut self, enabled: bool) -> Self {
        self.autowired = enabled;
        self
    }

    pub fn scope(&self) -> Scope {
        *lock(&self.scope)
    }

    pub fn as_singleton(&self) -> &Self {
        *lock(&self.scope) = Scope::Singleton;
        self
    }

    pub fn as_prototype(&self) -> &Self {
        *lock(&self.scope) = Scope::Prototype;
        self
    }

    /// True if a singleton instance has already been produced
    pub fn is_cached(&self) -> bool {
        lock(&self.cached).is_some()
    }

    /// The singleton instance, if the definition is a singleton and it was already produced
    pub(crate) fn cached(&self) -> Option<Instance> {
        match self.scope() {
            Scope::Singleton => lock(&self.cached).clone(),
            Scope::Prototype => None,
        }
    }

    /// True if the instances of this definition are wired by the registry
    pub fn is_autowired(&self) -> bool {
        self.autowired
    }

    /// Current instance according to the scope rules.
    ///
    /// A singleton definition runs its factory on first access only, a prototype
    /// definition runs it on every access.
    pub fn instance(&self) -> Instance {
        match self.instance_with(Ok::<_, Infallible>) {
            Ok(instance) => instance,
            Err(never) => match never {},
        }
    }

    /// Current instance, passing freshly produced objects through `finish`.
    ///
    /// Cached singletons are returned as-is: `finish` only sees new factory results,
    /// and a singleton is cached only once `finish` succeeded.
    /// No lock is held while the factory or `finish` run, so both may resolve
    /// other definitions (or this one) without deadlocking.
    pub(crate) fn instance_with<E>(
        &self,
        finish: impl FnOnce(Instance) -> Result<Instance, E>,
    ) -> Result<Instance, E> {
        if self.scope() == Scope::Singleton {
            if let Some(cached) = lock(&self.cached).as_ref() {
                return Ok(cached.clone());
            }
        }

        let instance = finish((self.factory)())?;

        if self.scope() == Scope::Prototype {
            return Ok(instance);
        }

        // First stored value wins if the factory ran concurrently
        Ok(lock(&self.cached).get_or_insert(instance).clone())
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("scope", &self.scope())
            .field("cached", &self.is_cached())
            .field("autowired", &self.autowired)
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
