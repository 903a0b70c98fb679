//! Resolver context for construction closures.
//!
//! This module contains the ResolverContext type which provides
//! the interface for factory functions to resolve dependencies.

use std::any::Any;
use std::sync::Arc;

use crate::container::Container;
use crate::deferred::Deferred;
use crate::error::DiResult;
use crate::key::Key;
use crate::traits::{Resolver, ResolverCore};

/// Context passed to factory functions for resolving dependencies.
///
/// Wraps the container that is performing the current resolution, so a
/// factory's own dependencies are served by the very same registration set.
///
/// # Examples
///
/// ```
/// use strand_di::{Container, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let container = Container::new()
///     .register_instance(Database { url: "postgres://localhost".to_string() })
///     .register_factory(|resolver| {
///         // resolver is a ResolverContext over the container being resolved
///         UserService { db: resolver.get_required::<Database>() }
///     });
///
/// assert_eq!(container.get_required::<UserService>().db.url, "postgres://localhost");
/// ```
pub struct ResolverContext<'a> {
    container: &'a Container,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// The container performing this resolution.
    pub fn container(&self) -> &'a Container {
        self.container
    }

    /// Returns a producer bound to this resolution's container.
    ///
    /// Behaves exactly like [`Resolver::factory_for`] on the container.
    pub fn factory_for<T: Send + Sync + 'static>(&self) -> Deferred<T> {
        self.container.factory_for::<T>()
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>> {
        self.container.resolve_any(key)
    }
}

impl<'a> Resolver for ResolverContext<'a> {
    fn get<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.container.get::<T>()
    }
}
