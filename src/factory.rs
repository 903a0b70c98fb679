//! Service factories: the recipes a container invokes to produce values.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

#[cfg(feature = "once-cell")]
use once_cell::sync::OnceCell;

use crate::container::ResolverContext;
use crate::error::DiResult;
use crate::kind::FactoryKind;

/// A rule that, given a resolver, produces one value of `Self::Service`.
///
/// The container only talks to factories through
/// [`AnyServiceFactory`](crate::AnyServiceFactory), so new variants can be
/// registered with [`Container::register`](crate::Container::register)
/// without touching any caller.
///
/// # Thread safety
///
/// A container may be resolved from several threads at once. A factory that
/// keeps mutable state (a cache, a counter) must synchronise it itself, the
/// way [`CachedFactory`] does.
///
/// # Examples
///
/// ```
/// use strand_di::{Container, DiResult, FactoryKind, Resolver, ResolverContext, ServiceFactory};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
///
/// struct Ticket(u32);
///
/// /// Hands out increasing ticket numbers.
/// struct TicketMachine {
///     next: AtomicU32,
/// }
///
/// impl ServiceFactory for TicketMachine {
///     type Service = Ticket;
///
///     fn resolve(&self, _resolver: &ResolverContext<'_>) -> DiResult<Arc<Ticket>> {
///         Ok(Arc::new(Ticket(self.next.fetch_add(1, Ordering::SeqCst))))
///     }
/// }
///
/// let container = Container::new().register(TicketMachine { next: AtomicU32::new(1) });
/// assert_eq!(container.get_required::<Ticket>().0, 1);
/// assert_eq!(container.get_required::<Ticket>().0, 2);
/// assert_eq!(container.descriptors()[0].kind, FactoryKind::Custom);
/// ```
pub trait ServiceFactory: Send + Sync + 'static {
    /// The service identity this factory produces.
    type Service: Send + Sync + 'static;

    /// Produces one value, resolving dependencies through `resolver`.
    fn resolve(&self, resolver: &ResolverContext<'_>) -> DiResult<Arc<Self::Service>>;

    /// Reported in descriptors and diagnostics.
    fn kind(&self) -> FactoryKind {
        FactoryKind::Custom
    }
}

/// Hands out the same captured instance on every resolution.
pub struct InstanceFactory<T> {
    instance: Arc<T>,
}

impl<T: Send + Sync + 'static> InstanceFactory<T> {
    pub fn new(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an already shared instance; resolutions return clones of `instance`.
    pub fn from_arc(instance: Arc<T>) -> Self {
        Self { instance }
    }
}

impl<T: Send + Sync + 'static> ServiceFactory for InstanceFactory<T> {
    type Service = T;

    fn resolve(&self, _resolver: &ResolverContext<'_>) -> DiResult<Arc<T>> {
        Ok(self.instance.clone())
    }

    fn kind(&self) -> FactoryKind {
        FactoryKind::Instance
    }
}

/// Invokes its construction closure on every resolution.
pub struct BasicFactory<T, F> {
    ctor: F,
    _service: PhantomData<fn() -> T>,
}

impl<T, F> BasicFactory<T, F>
where
    T: Send + Sync + 'static,
    F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
{
    pub fn new(ctor: F) -> Self {
        Self { ctor, _service: PhantomData }
    }
}

impl<T, F> ServiceFactory for BasicFactory<T, F>
where
    T: Send + Sync + 'static,
    F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
{
    type Service = T;

    fn resolve(&self, resolver: &ResolverContext<'_>) -> DiResult<Arc<T>> {
        Ok(Arc::new((self.ctor)(resolver)))
    }

    fn kind(&self) -> FactoryKind {
        FactoryKind::Basic
    }
}

/// Like [`BasicFactory`], but the closure may fail.
///
/// Lets a construction closure forward dependency errors with `?` instead
/// of panicking through `get_required`.
pub struct FallibleFactory<T, F> {
    ctor: F,
    _service: PhantomData<fn() -> T>,
}

impl<T, F> FallibleFactory<T, F>
where
    T: Send + Sync + 'static,
    F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
{
    pub fn new(ctor: F) -> Self {
        Self { ctor, _service: PhantomData }
    }
}

impl<T, F> ServiceFactory for FallibleFactory<T, F>
where
    T: Send + Sync + 'static,
    F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
{
    type Service = T;

    fn resolve(&self, resolver: &ResolverContext<'_>) -> DiResult<Arc<T>> {
        (self.ctor)(resolver).map(Arc::new)
    }

    fn kind(&self) -> FactoryKind {
        FactoryKind::Fallible
    }
}

/// Caches the first value produced by an inner factory.
///
/// The inner factory runs at most once per `CachedFactory` unless it fails,
/// in which case the next resolution tries again. Concurrent first
/// resolutions block until the value exists.
pub struct CachedFactory<S: ServiceFactory> {
    inner: S,
    #[cfg(feature = "once-cell")]
    cell: OnceCell<Arc<S::Service>>,
    #[cfg(not(feature = "once-cell"))]
    cell: std::sync::Mutex<Option<Arc<S::Service>>>,
}

impl<S: ServiceFactory> CachedFactory<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            #[cfg(feature = "once-cell")]
            cell: OnceCell::new(),
            #[cfg(not(feature = "once-cell"))]
            cell: std::sync::Mutex::new(None),
        }
    }

    #[cfg(feature = "once-cell")]
    fn cached(&self, resolver: &ResolverContext<'_>) -> DiResult<Arc<S::Service>> {
        self.cell
            .get_or_try_init(|| self.inner.resolve(resolver))
            .map(Arc::clone)
    }

    #[cfg(not(feature = "once-cell"))]
    fn cached(&self, resolver: &ResolverContext<'_>) -> DiResult<Arc<S::Service>> {
        // A poisoned slot is still empty: the panicking factory never stored a value.
        let mut slot = self
            .cell
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(value) = slot.as_ref() {
            return Ok(value.clone());
        }
        let value = self.inner.resolve(resolver)?;
        *slot = Some(value.clone());
        Ok(value)
    }
}

impl<S: ServiceFactory> ServiceFactory for CachedFactory<S> {
    type Service = S::Service;

    fn resolve(&self, resolver: &ResolverContext<'_>) -> DiResult<Arc<S::Service>> {
        self.cached(resolver)
    }

    fn kind(&self) -> FactoryKind {
        FactoryKind::Cached
    }
}

impl<T> fmt::Debug for InstanceFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceFactory<{}>", std::any::type_name::<T>())
    }
}

impl<T, F> fmt::Debug for BasicFactory<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BasicFactory<{}>", std::any::type_name::<T>())
    }
}

impl<T, F> fmt::Debug for FallibleFactory<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FallibleFactory<{}>", std::any::type_name::<T>())
    }
}

impl<S: ServiceFactory> fmt::Debug for CachedFactory<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CachedFactory<{}>", std::any::type_name::<S::Service>())
    }
}
