//! Post-construction auto-wiring
//!
//! Objects taking part in auto-wiring expose their dependencies as [Inject] slots,
//! listed by an implementation of [Autowire] (usually generated with [autowire!](crate::autowire)).
//! When a registry wires an object, each empty slot is filled with the instance bound to
//! the key of the slot type, after wiring this instance in turn.
//!
//! The wiring keeps track of the chain of objects being wired. A slot asking for the
//! object which is currently wiring it (a direct back-reference) receives this object
//! as-is, while any longer cycle is reported as [WiringError::DependencyCycle].

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::instance::Instance;
use crate::key::Key;
use crate::registry::Registry;
use crate::resolve::WiringError;

/// Declare the dependency slots of a type
pub trait Autowire: Send + Sync + 'static {
    /// List the named dependency slots of this object
    fn slots(&self) -> Vec<(&'static str, &dyn Slot)>;
}

/// Object-safe view of a dependency slot
pub trait Slot: Send + Sync {
    /// Key of the expected dependency
    fn key(&self) -> Key;

    fn is_set(&self) -> bool;

    /// Store the given instance in the slot.
    ///
    /// Fails if the instance does not have the type expected by the slot.
    /// A slot which is already set keeps its value.
    fn fill(&self, name: &'static str, instance: &Instance) -> Result<(), WiringError>;
}

/// Write-once dependency slot, filled by the registry after construction
///
/// The slot holds a strong reference: two objects filled with each other (a back-reference
/// from a child to its parent) keep each other alive and are never dropped.
pub struct Inject<T: ?Sized>(OnceCell<Arc<T>>);

impl<T: ?Sized> Inject<T> {
    pub fn empty() -> Self {
        Self(OnceCell::new())
    }

    /// A slot set at construction time, auto-wiring will leave it untouched
    pub fn with(value: Arc<T>) -> Self {
        Self(OnceCell::with_value(value))
    }

    pub fn get(&self) -> Option<&Arc<T>> {
        self.0.get()
    }

    pub fn is_set(&self) -> bool {
        self.0.get().is_some()
    }
}

impl<T: ?Sized> Default for Inject<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(_) => write!(f, "Inject<{}>(set)", type_name::<T>()),
            None => write!(f, "Inject<{}>(empty)", type_name::<T>()),
        }
    }
}

impl<T: ?Sized + Send + Sync + 'static> Slot for Inject<T> {
    fn key(&self) -> Key {
        Key::of::<T>()
    }

    fn is_set(&self) -> bool {
        Inject::is_set(self)
    }

    fn fill(&self, name: &'static str, instance: &Instance) -> Result<(), WiringError> {
        let value = instance
            .downcast::<T>()
            .ok_or_else(|| WiringError::SlotTypeMismatch {
                slot: name,
                expected: type_name::<T>(),
                actual: instance.type_name(),
            })?;
        // Losing a race against another writer is fine: the slot is set either way
        let _ = self.0.set(value);
        Ok(())
    }
}

/// A single auto-wiring pass over an object graph
pub(crate) struct Wiring<'r> {
    registry: &'r Registry,
    /// Objects being wired, the last one is the current object
    stack: Vec<(Key, Instance)>,
}

impl<'r> Wiring<'r> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            stack: Vec::new(),
        }
    }

    /// Fill the empty slots of an instance and return the same instance.
    ///
    /// Instances without dependency slots are returned unmodified.
    pub(crate) fn wire(&mut self, instance: Instance) -> Result<Instance, WiringError> {
        let Some(target) = instance.as_autowire() else {
            return Ok(instance);
        };

        self.stack.push((instance.key(), instance.clone()));
        let result = self.wire_slots(target);
        self.stack.pop();

        result.map(|_| instance)
    }

    fn wire_slots(&mut self, target: &dyn Autowire) -> Result<(), WiringError> {
        for (name, slot) in target.slots() {
            if slot.is_set() {
                continue;
            }
            let key = slot.key();

            // Direct back-reference to the object which is wiring the current one
            if let Some((_, parent)) = self.parent().filter(|(k, _)| *k == key) {
                tracing::trace!("Slot '{}' refers back to '{}'", name, key);
                let parent = parent.clone();
                slot.fill(name, &parent)?;
                continue;
            }

            if let Some(pos) = self.stack.iter().position(|(k, _)| *k == key) {
                let mut chain: Vec<Key> = self.stack[pos..].iter().map(|(k, _)| k.clone()).collect();
                chain.push(key);
                let error = WiringError::DependencyCycle { chain };
                tracing::warn!("{}", error);
                return Err(error);
            }

            let Some(definition) = self.registry.definition(&key) else {
                tracing::trace!("Slot '{}' left empty: '{}' is not bound", name, key);
                continue;
            };
            // New instances are cached only once wired, cached ones may predate auto-wiring
            let dependency = match definition.cached() {
                Some(cached) => self.wire(cached)?,
                None => definition.instance_with(|fresh| self.wire(fresh))?,
            };
            tracing::trace!("Filling slot '{}' with '{}'", name, dependency.type_name());
            slot.fill(name, &dependency)?;
        }
        Ok(())
    }

    fn parent(&self) -> Option<&(Key, Instance)> {
        self.stack.len().checked_sub(2).map(|i| &self.stack[i])
    }
}
