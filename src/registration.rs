//! Type-erased factory storage.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::container::ResolverContext;
use crate::error::{DiError, DiResult};
use crate::factory::ServiceFactory;
use crate::key::{key_of_type, Key};
use crate::kind::FactoryKind;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

type ErasedResolve = dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync;

/// A [`ServiceFactory`] behind a uniform, non-generic interface.
///
/// Wrapping captures two things from the concrete factory: an erased resolve
/// closure that returns `Arc<dyn Any>`, and the [`Key`] of the factory's
/// service type, which answers [`supports`](Self::supports) by exact type
/// equality. Heterogeneous factories can then live in one list. An
/// `AnyServiceFactory` is never mutated after construction.
///
/// # Examples
///
/// ```
/// use strand_di::{AnyServiceFactory, InstanceFactory};
///
/// let erased = AnyServiceFactory::new(InstanceFactory::new(5u16));
/// assert!(erased.supports::<u16>());
/// assert!(!erased.supports::<u32>());
/// ```
pub struct AnyServiceFactory {
    key: Key,
    kind: FactoryKind,
    resolve: Box<ErasedResolve>,
}

impl AnyServiceFactory {
    /// Erases `factory`, keyed by its `Service` type.
    pub fn new<S: ServiceFactory>(factory: S) -> Self {
        let kind = factory.kind();
        Self {
            key: key_of_type::<S::Service>(),
            kind,
            resolve: erase(move |ctx| factory.resolve(ctx).map(|service| service as AnyArc)),
        }
    }

    /// Identity this factory was registered for.
    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn kind(&self) -> FactoryKind {
        self.kind
    }

    /// Returns `true` when this factory produces exactly `T`.
    #[inline]
    pub fn supports<T: 'static>(&self) -> bool {
        self.key.is::<T>()
    }

    /// Same as [`supports`](Self::supports) for a runtime key.
    #[inline]
    pub fn supports_key(&self, key: &Key) -> bool {
        self.key == *key
    }

    /// Invokes the wrapped factory without looking at the result's type.
    pub fn resolve_any(&self, ctx: &ResolverContext<'_>) -> DiResult<AnyArc> {
        (self.resolve)(ctx)
    }

    /// Invokes the wrapped factory and downcasts the result to `T`.
    ///
    /// Callers check [`supports`](Self::supports) first; a mismatch here is
    /// an internal consistency failure and reported as
    /// `DiError::TypeMismatch`.
    pub fn resolve<T: Send + Sync + 'static>(&self, ctx: &ResolverContext<'_>) -> DiResult<Arc<T>> {
        self.resolve_any(ctx)?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }
}

fn erase<F>(resolve: F) -> Box<ErasedResolve>
where
    F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync + 'static,
{
    Box::new(resolve)
}

impl fmt::Debug for AnyServiceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyServiceFactory")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .finish()
    }
}
