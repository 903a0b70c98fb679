//! Resolver traits for service resolution.

use std::any::Any;
use std::sync::Arc;

use crate::deferred::Deferred;
use crate::error::{DiError, DiResult};
use crate::key::{key_of_type, Key};

/// Core resolver trait for object-safe service resolution.
///
/// Answers "give me a value for this identity" given only the runtime
/// [`Key`]. Most code uses the generic [`Resolver`] methods built on top of
/// it.
pub trait ResolverCore: Send + Sync {
    /// Resolves the service registered for `key` as `Arc<dyn Any>`.
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - The value produced by the matching factory
    /// * `Err(DiError)` - Not registered, circular, depth exceeded, or an
    ///   error returned by the factory itself
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>>;
}

/// High-level resolver interface with generic methods for type-safe service resolution.
///
/// [`Container`](crate::Container) and the
/// [`ResolverContext`](crate::ResolverContext) handed to factories both
/// implement this trait, so construction closures resolve their own
/// dependencies with the same calls application code uses.
///
/// # Examples
///
/// ```
/// use strand_di::{Container, Resolver};
/// use std::sync::Arc;
///
/// struct Repository { data: Vec<&'static str> }
/// struct Service { repository: Arc<Repository> }
///
/// let container = Container::new()
///     .register_instance(Repository { data: vec!["x"] })
///     .register_factory(|r| Service { repository: r.get_required::<Repository>() });
///
/// let service = container.get_required::<Service>();
/// assert_eq!(service.repository.data, vec!["x"]);
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a service type.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<T>)` - The resolved service instance
    /// * `Err(DiError)` - Resolution error (not registered, circular, etc.)
    fn get<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        let key = key_of_type::<T>();
        let any = self.resolve_any(&key)?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(key.display_name()))
    }

    /// Resolves a service type, panicking on failure.
    ///
    /// Wiring errors are programmer errors; use this where a missing
    /// registration should stop the program.
    ///
    /// # Panics
    ///
    /// Panics if [`get`](Self::get) returns an error.
    fn get_required<T: Send + Sync + 'static>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }

    /// Returns a producer that resolves `T` each time it is invoked.
    ///
    /// Nothing is resolved here: the lookup happens at invocation time, so
    /// a producer for an unregistered `T` only fails once it is called.
    ///
    /// # Examples
    ///
    /// ```
    /// use strand_di::{Container, Resolver};
    /// use std::sync::atomic::{AtomicU32, Ordering};
    /// use std::sync::Arc;
    ///
    /// let built = Arc::new(AtomicU32::new(0));
    /// let counter = built.clone();
    /// let container = Container::new().register_factory(move |_| {
    ///     counter.fetch_add(1, Ordering::SeqCst);
    ///     String::from("report")
    /// });
    ///
    /// let later = container.factory_for::<String>();
    /// assert_eq!(built.load(Ordering::SeqCst), 0);
    ///
    /// assert_eq!(*later.get(), "report");
    /// assert_eq!(*later.get(), "report");
    /// assert_eq!(built.load(Ordering::SeqCst), 2);
    /// ```
    fn factory_for<T: Send + Sync + 'static>(&self) -> Deferred<T>
    where
        Self: Clone + Sized + 'static,
    {
        let resolver = self.clone();
        Deferred::new(move || resolver.get::<T>())
    }
}
