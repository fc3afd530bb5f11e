//! Registry keys
//!
//! A [Key] is the identity under which a definition is stored.
//! It is either derived from a type (using its [TypeId]) or supplied literally by the caller.

use std::any::{type_name, TypeId};
use std::borrow::Cow;
use std::fmt;

/// Type Name and Type Id
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}

impl TypeInfo {
    pub fn of<T: ?Sized + 'static>() -> TypeInfo {
        TypeInfo {
            type_name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}

// The name is informative only, identity is the TypeId
impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}
impl Eq for TypeInfo {}

impl std::hash::Hash for TypeInfo {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// Identity of a registry entry.
///
/// Type keys and literal keys never compare equal, even when the literal
/// happens to spell out a type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Derived from a type with [Key::of]
    Type(TypeInfo),
    /// Supplied by the caller
    Named(Cow<'static, str>),
}

impl Key {
    /// Derive the key of a type.
    ///
    /// Works for unsized targets too, so `Key::of::<dyn MyTrait>()` is the key of
    /// the trait object, independent of the key of any implementor.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Key::Type(TypeInfo::of::<T>())
    }

    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Key::Named(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Key::Type(info) => info.type_name,
            Key::Named(name) => name.as_ref(),
        }
    }
}

impl From<&'static str> for Key {
    fn from(name: &'static str) -> Self {
        Key::Named(Cow::Borrowed(name))
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Named(Cow::Owned(name))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
