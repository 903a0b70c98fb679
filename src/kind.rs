//! Factory kinds reported by registrations.

/// How a registered factory produces its values
///
/// The container never branches on the kind: every factory is invoked the
/// same way through its type-erased wrapper. The kind only surfaces in
/// [`ServiceDescriptor`](crate::ServiceDescriptor)s and diagnostics.
///
/// # Examples
///
/// ```rust
/// use strand_di::{Container, FactoryKind};
///
/// struct Clock;
///
/// let container = Container::new()
///     .register_instance(8080u16)
///     .register_factory(|_| Clock);
///
/// let kinds: Vec<FactoryKind> = container.descriptors().iter().map(|d| d.kind).collect();
/// assert_eq!(kinds, vec![FactoryKind::Instance, FactoryKind::Basic]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactoryKind {
    /// One captured value, handed out on every resolution
    Instance,
    /// Closure invoked on every resolution
    Basic,
    /// Closure returning a `DiResult`, invoked on every resolution
    Fallible,
    /// Inner factory invoked once, result cached for the registration
    Cached,
    /// User-supplied [`ServiceFactory`](crate::ServiceFactory) implementation
    Custom,
}

impl FactoryKind {
    /// Short lowercase label used in debug output.
    pub fn as_str(&self) -> &'static str {
        match self {
            FactoryKind::Instance => "instance",
            FactoryKind::Basic => "basic",
            FactoryKind::Fallible => "fallible",
            FactoryKind::Cached => "cached",
            FactoryKind::Custom => "custom",
        }
    }
}
