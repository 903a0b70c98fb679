//! Service identity keys.

use std::any::TypeId;
use std::fmt;

/// Runtime form of a service identity.
///
/// A service identity is a type: registering `Repository` and resolving
/// `Repository` meet at the same `Key`. Equality and hashing look only at
/// the `TypeId`; the type name is carried for diagnostics.
///
/// Matching is exact. A key for `Arc<dyn Greeter>` never equals the key for
/// the concrete type behind it.
///
/// # Examples
///
/// ```rust
/// use strand_di::{key_of_type, Key};
/// use std::any::TypeId;
///
/// let key = key_of_type::<String>();
/// assert_eq!(key.id(), TypeId::of::<String>());
/// assert_eq!(key.display_name(), "alloc::string::String");
/// assert!(key.is::<String>());
/// assert!(!key.is::<&'static str>());
/// ```
#[derive(Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Builds a key from its parts.
    pub fn new(id: TypeId, name: &'static str) -> Self {
        Self { id, name }
    }

    /// The `TypeId` this key identifies.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Human-readable type name (`std::any::type_name`).
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` when this key identifies `T`.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[inline(always)]
pub fn key_of_type<T: 'static>() -> Key {
    Key::new(TypeId::of::<T>(), std::any::type_name::<T>())
}
