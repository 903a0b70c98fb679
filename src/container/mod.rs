//! The service container.
//!
//! This module contains the [`Container`] type: an immutable, ordered list
//! of type-erased factories that also acts as the [`Resolver`] for those
//! factories' own dependencies.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::ContainerOptions;
use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::factory::{BasicFactory, CachedFactory, FallibleFactory, InstanceFactory, ServiceFactory};
use crate::internal::{Frame, StackGuard};
use crate::key::{key_of_type, Key};
use crate::kind::FactoryKind;
use crate::observer::{DiObserver, Observers};
use crate::registration::AnyServiceFactory;
use crate::traits::{Resolver, ResolverCore};

pub mod context;
pub use context::ResolverContext;

/// Immutable registry of service factories.
///
/// Registration never mutates: every `register*` call returns a **new**
/// container whose entry list is the receiver's list plus one appended
/// factory, and the receiver keeps behaving exactly as before. Entries are
/// shared between the containers of one lineage, so cloning a container or
/// handing it to a [`Deferred`](crate::Deferred) is cheap.
///
/// Each identity can be registered once per container. Lookup scans the
/// entries in insertion order and invokes the first factory that supports
/// the requested identity, passing the container itself as the resolver so
/// the factory can resolve its own dependencies transitively.
///
/// # Thread safety
///
/// A built container is `Send + Sync` and may be resolved from many threads
/// at once. Factories that capture mutable state must synchronise it
/// themselves; [`register_cached`](Self::register_cached) does.
///
/// # Examples
///
/// ```
/// use strand_di::{Container, Resolver};
///
/// struct A;
/// struct B;
///
/// let c1 = Container::new().register_instance(A);
/// let c2 = c1.register_instance(B);
///
/// assert!(c2.get::<A>().is_ok()); // appended containers keep earlier entries
/// assert!(c1.get::<B>().is_err()); // earlier containers are never mutated
/// ```
#[derive(Clone)]
pub struct Container {
    entries: Arc<[Arc<AnyServiceFactory>]>,
    observers: Observers,
    options: ContainerOptions,
}

impl Container {
    /// Creates an empty container with default options.
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    /// Creates an empty container with the given options.
    pub fn with_options(options: ContainerOptions) -> Self {
        Self {
            entries: Arc::from(Vec::new()),
            observers: Observers::new(),
            options,
        }
    }

    // ----- Registration -----

    /// Registers any [`ServiceFactory`] under its `Service` type.
    ///
    /// # Panics
    ///
    /// Panics if the identity is already registered in this container.
    pub fn register<S: ServiceFactory>(&self, factory: S) -> Container {
        self.try_register(factory)
            .unwrap_or_else(|e| panic!("Failed to register {}: {}", std::any::type_name::<S::Service>(), e))
    }

    /// Registers any [`ServiceFactory`], reporting duplicates as an error.
    pub fn try_register<S: ServiceFactory>(&self, factory: S) -> DiResult<Container> {
        let key = key_of_type::<S::Service>();
        if self.contains_key(&key) {
            let error = DiError::DuplicateRegistration(key.display_name());
            self.observers.failed(&key, &error);
            return Err(error);
        }

        let entry = Arc::new(AnyServiceFactory::new(factory));
        let entries = self
            .entries
            .iter()
            .cloned()
            .chain(std::iter::once(entry))
            .collect();

        self.observers.registered(&key);
        Ok(Container {
            entries,
            observers: self.observers.clone(),
            options: self.options,
        })
    }

    /// Binds `T` to one value; every resolution returns the same `Arc`.
    ///
    /// # Examples
    ///
    /// ```
    /// use strand_di::{Container, Resolver};
    /// use std::sync::Arc;
    ///
    /// let container = Container::new().register_instance(String::from("config"));
    /// let a = container.get_required::<String>();
    /// let b = container.get_required::<String>();
    /// assert!(Arc::ptr_eq(&a, &b));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `T` is already registered in this container.
    pub fn register_instance<T: Send + Sync + 'static>(&self, value: T) -> Container {
        self.register(InstanceFactory::new(value))
    }

    /// Like [`register_instance`](Self::register_instance), reporting
    /// duplicates as `DiError::DuplicateRegistration`.
    pub fn try_register_instance<T: Send + Sync + 'static>(&self, value: T) -> DiResult<Container> {
        self.try_register(InstanceFactory::new(value))
    }

    /// Binds `T` to a construction closure invoked on every resolution.
    ///
    /// # Examples
    ///
    /// ```
    /// use strand_di::{Container, Resolver};
    /// use std::sync::Arc;
    ///
    /// struct Config { port: u16 }
    /// struct Server { config: Arc<Config> }
    ///
    /// let container = Container::new()
    ///     .register_instance(Config { port: 8080 })
    ///     .register_factory(|r| Server { config: r.get_required::<Config>() });
    ///
    /// assert_eq!(container.get_required::<Server>().config.port, 8080);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `T` is already registered in this container.
    pub fn register_factory<T, F>(&self, factory: F) -> Container
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.register(BasicFactory::new(factory))
    }

    /// Like [`register_factory`](Self::register_factory), without panicking.
    pub fn try_register_factory<T, F>(&self, factory: F) -> DiResult<Container>
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.try_register(BasicFactory::new(factory))
    }

    /// Binds `T` to a closure that may fail, typically by forwarding a
    /// dependency error with `?`.
    ///
    /// # Examples
    ///
    /// ```
    /// use strand_di::{Container, DiError, Resolver};
    /// use std::sync::Arc;
    ///
    /// struct Cache;
    /// struct Catalog { cache: Arc<Cache> }
    ///
    /// let container = Container::new()
    ///     .register_fallible(|r| Ok(Catalog { cache: r.get::<Cache>()? }));
    ///
    /// assert!(matches!(container.get::<Catalog>(), Err(DiError::NotFound(_))));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `T` is already registered in this container.
    pub fn register_fallible<T, F>(&self, factory: F) -> Container
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.register(FallibleFactory::new(factory))
    }

    /// Like [`register_fallible`](Self::register_fallible), without panicking.
    pub fn try_register_fallible<T, F>(&self, factory: F) -> DiResult<Container>
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.try_register(FallibleFactory::new(factory))
    }

    /// Binds `T` to a closure that runs on first resolution only; later
    /// resolutions return the cached `Arc`.
    ///
    /// The cache belongs to this registration and is shared by every
    /// container derived from the returned one.
    ///
    /// # Panics
    ///
    /// Panics if `T` is already registered in this container.
    pub fn register_cached<T, F>(&self, factory: F) -> Container
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.register(CachedFactory::new(BasicFactory::new(factory)))
    }

    /// Like [`register_cached`](Self::register_cached), without panicking.
    pub fn try_register_cached<T, F>(&self, factory: F) -> DiResult<Container>
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.try_register(CachedFactory::new(BasicFactory::new(factory)))
    }

    /// Returns a container that reports events to `observer` as well.
    ///
    /// Observers attached here are inherited by every container registered
    /// from the returned one, not by the receiver.
    pub fn add_observer(&self, observer: Arc<dyn DiObserver>) -> Container {
        Container {
            entries: self.entries.clone(),
            observers: self.observers.with(observer),
            options: self.options,
        }
    }

    // ----- Introspection -----

    /// Returns `true` when `T` has a factory in this container.
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.iter().any(|entry| entry.supports::<T>())
    }

    /// Returns `true` when a factory is registered for the runtime `key`.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.iter().any(|entry| entry.supports_key(key))
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Options shared by every container of this lineage.
    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    /// Describes every registration, in insertion order.
    ///
    /// # Examples
    ///
    /// ```
    /// use strand_di::{Container, FactoryKind};
    ///
    /// let container = Container::new()
    ///     .register_instance(3u8)
    ///     .register_cached(|_| String::from("lazy"));
    ///
    /// let descriptors = container.descriptors();
    /// assert_eq!(descriptors[0].type_name(), "u8");
    /// assert_eq!(descriptors[1].kind, FactoryKind::Cached);
    /// ```
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.entries
            .iter()
            .map(|entry| ServiceDescriptor {
                key: *entry.key(),
                kind: entry.kind(),
            })
            .collect()
    }

    /// Multi-line dump of options, observer count and entries.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Container Debug ===\n");
        s.push_str(&format!("Options: {:?}\n", self.options));
        s.push_str(&format!("Observers: {}\n", self.observers.len()));
        s.push_str("Entries:\n");
        for (index, entry) in self.entries.iter().enumerate() {
            s.push_str(&format!(
                "  #{} {}: {}\n",
                index,
                entry.key().display_name(),
                entry.kind().as_str()
            ));
        }
        s
    }

    // ----- Resolution -----

    /// Identifies this container's frames on the resolution stack.
    fn owner_id(&self) -> usize {
        Arc::as_ptr(&self.entries) as *const () as usize
    }

    fn lookup(&self, key: &Key) -> Option<&AnyServiceFactory> {
        self.entries
            .iter()
            .find(|entry| entry.supports_key(key))
            .map(|entry| &**entry)
    }

    /// Finds the factory for `key` and runs `invoke` on it under the cycle
    /// guard, reporting to observers.
    fn resolve_with<R, F>(&self, key: &Key, invoke: F) -> DiResult<R>
    where
        F: FnOnce(&AnyServiceFactory, &ResolverContext<'_>) -> DiResult<R>,
    {
        let result = self.resolve_entry(key, invoke);
        if let Err(error) = &result {
            self.observers.failed(key, error);
        }
        result
    }

    fn resolve_entry<R, F>(&self, key: &Key, invoke: F) -> DiResult<R>
    where
        F: FnOnce(&AnyServiceFactory, &ResolverContext<'_>) -> DiResult<R>,
    {
        let entry = self
            .lookup(key)
            .ok_or(DiError::NotFound(key.display_name()))?;
        let frame = Frame::new(self.owner_id(), entry as *const AnyServiceFactory as usize, *key);
        let _guard = StackGuard::enter(frame, &self.options, entry.kind() == FactoryKind::Cached)?;
        let ctx = ResolverContext::new(self);

        if !self.observers.has_observers() {
            return invoke(entry, &ctx);
        }

        let start = Instant::now();
        self.observers.resolving(key);
        let result = invoke(entry, &ctx);
        if result.is_ok() {
            self.observers.resolved(key, start.elapsed());
        }
        result
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("entries", &self.entries)
            .field("options", &self.options)
            .finish()
    }
}

impl ResolverCore for Container {
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>> {
        self.resolve_with(key, |entry, ctx| entry.resolve_any(ctx))
    }
}

impl Resolver for Container {
    fn get<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.resolve_with(&key_of_type::<T>(), |entry, ctx| entry.resolve::<T>(ctx))
    }
}
