//! Keyed dependency injection registry with scoped factories and auto-wiring.
//!
//! # Simple use case
//!
//! ```
//! # use std::sync::Arc;
//! # use kura::*;
//! // Define traits and implementors
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "Hello world".into()
//!     }
//! }
//!
//! // A component receiving its greeter after construction
//! #[derive(Default)]
//! struct Welcome {
//!     greeter: Inject<dyn Greeter>,
//! }
//! autowire!(Welcome { greeter });
//!
//! # fn main() -> Result<(), WiringError> {
//! let registry = Registry::with_autowiring();
//! registry.bind_to_type::<dyn Greeter>(Arc::new(English) as Arc<dyn Greeter>);
//! registry.bind_factory(|| Autowired::new(Welcome::default())).as_singleton();
//!
//! let welcome: Arc<Welcome> = registry.try_resolve_type()?.expect("Welcome is bound");
//! assert_eq!(welcome.greeter.get().map(|g| g.greet()), Some("Hello world".into()));
//! # Ok(())
//! # }
//! ```
//!
//! # Mechanism
//!
//! A [Registry] associates [Key]s to [Definition]s. A key is derived from a type (including trait
//! objects) or given explicitly, and a definition wraps a zero-argument factory with a [Scope]:
//!
//! * [Scope::Singleton] definitions run their factory once and keep the result,
//! * [Scope::Prototype] definitions run their factory for each request.
//!
//! Fixed instances are bound as singletons, factories are bound as prototypes unless
//! [Definition::as_singleton] is called on the returned definition.
//!
//! The registry implements two traits:
//!
//! * The [Binder] trait installs definitions. Binding to a key replaces any previous definition.
//! * The [Resolver] trait retrieves instances. Missing keys and type mismatches produce `None`.
//!
//! Auto-wiring is opt-in at two levels. The registry must have auto-wiring enabled when a definition
//! is bound, and the produced objects must declare their dependency slots ([Inject] fields listed
//! by an [Autowire] implementation, bound through [Autowired]). Each empty slot is then filled with
//! the instance bound to its type, itself wired recursively. A direct back-reference between two objects
//! receives the object being wired; longer cycles fail with [WiringError::DependencyCycle].

mod definition;
mod helpers;
mod inject;
mod instance;
mod key;
mod registry;
mod resolve;

use once_cell::sync::Lazy;

pub use definition::{Definition, Factory, Scope};
pub use helpers::Autowired;
pub use inject::{Autowire, Inject, Slot};
pub use instance::Instance;
pub use key::{Key, TypeInfo};
pub use registry::Registry;
pub use resolve::{Bindable, Binder, Resolver, WiringError};

// Process-wide registry, created on first access
static SHARED: Lazy<Registry> = Lazy::new(Registry::new);

/// The process-wide registry.
///
/// It lives as long as the process and is distinct from all registries created with [Registry::new].
/// Prefer passing an explicit registry where possible: tests and independent subsystems can
/// then use isolated registries.
pub fn shared() -> &'static Registry {
    &SHARED
}
