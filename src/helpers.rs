use std::sync::Arc;

use crate::inject::Autowire;
use crate::instance::Instance;
use crate::resolve::Bindable;

/// Shared object whose dependency slots are filled by the registry
///
/// Binding an `Autowired<T>` instead of an `Arc<T>` makes the object eligible to auto-wiring.
/// Use [Autowired::cast] to bind it under a trait object while keeping its slots:
///
/// ```
/// # use std::sync::Arc;
/// # use kura::*;
/// trait Engine: Send + Sync {}
/// struct Fuel;
///
/// #[derive(Default)]
/// struct Diesel {
///     fuel: Inject<Fuel>,
/// }
/// impl Engine for Diesel {}
/// autowire!(Diesel { fuel });
///
/// let registry = Registry::with_autowiring();
/// registry.bind(Arc::new(Fuel));
/// registry.bind_to_type::<dyn Engine>(Autowired::new(Diesel::default()).cast(|d| d as Arc<dyn Engine>));
///
/// assert!(registry.resolve_type::<dyn Engine>().is_some());
/// ```
pub struct Autowired<T: ?Sized> {
    value: Arc<T>,
    wiring: Arc<dyn Autowire>,
}

impl<T: Autowire> Autowired<T> {
    pub fn new(value: T) -> Self {
        Self::from(Arc::new(value))
    }
}

impl<T: Autowire> From<Arc<T>> for Autowired<T> {
    fn from(value: Arc<T>) -> Self {
        let wiring: Arc<dyn Autowire> = value.clone();
        Self { value, wiring }
    }
}

impl<T: ?Sized> Autowired<T> {
    /// View the object as another type (usually a trait object), keeping its slots.
    ///
    /// The conversion must return the same object, as done by an `as Arc<dyn Trait>` coercion.
    pub fn cast<U: ?Sized>(self, view: impl FnOnce(Arc<T>) -> Arc<U>) -> Autowired<U> {
        Autowired {
            value: view(self.value),
            wiring: self.wiring,
        }
    }

    pub fn get(&self) -> &Arc<T> {
        &self.value
    }
}

impl<T: ?Sized + Send + Sync + 'static> Bindable for Autowired<T> {
    type Target = T;

    fn into_instance(self) -> Instance {
        Instance::autowired_as(self.value, self.wiring)
    }
}

/// Declare the dependency slots of one or several types.
///
/// Each listed field must be an [Inject](crate::Inject) slot.
///
/// ```
/// # use kura::*;
/// struct Engine;
///
/// #[derive(Default)]
/// struct Car {
///     engine: Inject<Engine>,
/// }
///
/// autowire!(Car { engine });
/// ```
#[macro_export]
macro_rules! autowire {
    ($($Type:ty { $($field:ident),* $(,)? });+ $(;)?) => {
        $(
        impl $crate::Autowire for $Type {
            fn slots(&self) -> ::std::vec::Vec<(&'static str, &dyn $crate::Slot)> {
                ::std::vec![ $( (stringify!($field), &self.$field as &dyn $crate::Slot), )* ]
            }
        }
        )+
    };
}
