use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::inject::Autowire;
use crate::key::{Key, TypeInfo};

/// Shared, type-erased handle on an object stored in a registry.
///
/// The handle wraps an `Arc<T>`: cloning it never clones the object, and
/// [Instance::downcast] hands back the original `Arc<T>`.
/// Instances created with [Instance::autowired] also carry the ability to
/// have their dependency slots filled by the registry.
#[derive(Clone)]
pub struct Instance {
    info: TypeInfo,
    addr: usize,
    value: Arc<dyn Any + Send + Sync>,
    autowire: Option<Arc<dyn Autowire>>,
}

impl Instance {
    /// Wrap a shared object which does not take part in auto-wiring
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            info: TypeInfo::of::<T>(),
            addr: Arc::as_ptr(&value) as *const () as usize,
            value: Arc::new(value),
            autowire: None,
        }
    }

    /// Wrap a shared object exposing dependency slots
    pub fn autowired<T: Autowire>(value: Arc<T>) -> Self {
        let wiring: Arc<dyn Autowire> = value.clone();
        Self::autowired_as(value, wiring)
    }

    /// Wrap a view of a shared object, typically a trait object, with the dependency
    /// slots of the same object.
    ///
    /// Both handles are expected to point to the same allocation.
    pub fn autowired_as<U: ?Sized + Send + Sync + 'static>(
        value: Arc<U>,
        wiring: Arc<dyn Autowire>,
    ) -> Self {
        debug_assert_eq!(
            Arc::as_ptr(&value) as *const () as usize,
            Arc::as_ptr(&wiring) as *const () as usize,
            "the view and the slots must belong to the same object"
        );
        Self {
            autowire: Some(wiring),
            ..Self::new(value)
        }
    }

    /// Narrow to the original shared object, if it has the requested type
    pub fn downcast<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }

    /// Object identity: true if both handles point to the same allocation
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        self.addr == other.addr
    }

    pub fn type_info(&self) -> TypeInfo {
        self.info
    }

    pub fn type_name(&self) -> &'static str {
        self.info.type_name
    }

    /// Key derived from the type of the wrapped object
    pub fn key(&self) -> Key {
        Key::Type(self.info)
    }

    pub fn is_autowired(&self) -> bool {
        self.autowire.is_some()
    }

    pub(crate) fn as_autowire(&self) -> Option<&dyn Autowire> {
        self.autowire.as_deref()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.info.type_name)
            .field("addr", &format_args!("{:#x}", self.addr))
            .field("autowired", &self.is_autowired())
            .finish()
    }
}
