//! Service descriptors for introspection and diagnostics.

use crate::key::Key;
use crate::kind::FactoryKind;

/// Describes one registration of a [`Container`](crate::Container).
///
/// Descriptors are snapshots: they are produced by
/// [`Container::descriptors`](crate::Container::descriptors) in insertion
/// order and hold no reference to the factory itself.
///
/// # Examples
///
/// ```rust
/// use strand_di::{Container, FactoryKind};
///
/// struct Database { url: String }
/// struct Repository;
///
/// let container = Container::new()
///     .register_instance(Database { url: "postgres://localhost".to_string() })
///     .register_factory(|_| Repository);
///
/// let descriptors = container.descriptors();
/// let db = descriptors.iter()
///     .find(|d| d.type_name().contains("Database"))
///     .unwrap();
/// assert_eq!(db.kind, FactoryKind::Instance);
/// assert!(descriptors[1].is::<Repository>());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// The service identity
    pub key: Key,
    /// How the registered factory produces values
    pub kind: FactoryKind,
}

impl ServiceDescriptor {
    /// Human-readable type name of the service.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Returns `true` when this descriptor is for service type `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.key.is::<T>()
    }
}
