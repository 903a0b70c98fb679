//! Deferred producers.

use std::fmt;
use std::sync::Arc;

use crate::error::DiResult;

type Producer<T> = dyn Fn() -> DiResult<Arc<T>> + Send + Sync;

/// A zero-argument recipe for a service, resolved when invoked.
///
/// Obtained from [`Resolver::factory_for`](crate::Resolver::factory_for).
/// Every call performs a fresh resolution against the container snapshot
/// the producer was created from, exactly like calling `get` at that
/// moment. Cloning is cheap and clones share the same recipe.
///
/// # Examples
///
/// ```
/// use strand_di::{Container, Deferred, Resolver};
///
/// struct Connection;
///
/// struct Pool {
///     connect: Deferred<Connection>,
/// }
///
/// let container = Container::new()
///     .register_factory(|_| Connection)
///     .register_factory(|r| Pool { connect: r.factory_for::<Connection>() });
///
/// let pool = container.get_required::<Pool>();
/// let _first = pool.connect.get();
/// let _second = pool.connect.try_get().unwrap();
/// ```
pub struct Deferred<T> {
    producer: Arc<Producer<T>>,
}

impl<T: Send + Sync + 'static> Deferred<T> {
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn() -> DiResult<Arc<T>> + Send + Sync + 'static,
    {
        Self {
            producer: Arc::new(producer),
        }
    }

    /// Resolves a value now.
    pub fn try_get(&self) -> DiResult<Arc<T>> {
        (self.producer)()
    }

    /// Resolves a value now, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics if [`try_get`](Self::try_get) returns an error.
    pub fn get(&self) -> Arc<T> {
        self.try_get()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            producer: self.producer.clone(),
        }
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deferred<{}>", std::any::type_name::<T>())
    }
}
