//! Error types for the service container.

use std::fmt;

/// Container errors
///
/// Every variant describes a wiring defect rather than a transient
/// condition, so nothing here is ever retried. The `Result`-returning entry
/// points (`try_register*`, [`get`](crate::Resolver::get),
/// [`Deferred::try_get`](crate::Deferred::try_get)) surface them as values;
/// the fail-fast entry points panic with their `Display` text.
///
/// # Examples
///
/// ```rust
/// use strand_di::{Container, DiError, Resolver};
///
/// let container = Container::new();
/// match container.get::<String>() {
///     Err(DiError::NotFound(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
///
/// let duplicate = container
///     .register_instance(1u8)
///     .try_register_instance(2u8);
/// assert!(matches!(duplicate, Err(DiError::DuplicateRegistration("u8"))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// No registered factory supports the requested identity
    NotFound(&'static str),
    /// The identity already has a factory in this container
    DuplicateRegistration(&'static str),
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Circular dependency detected (includes path)
    Circular(Vec<&'static str>),
    /// Maximum recursion depth exceeded
    DepthExceeded(usize),
    /// Container options could not be read
    Config(String),
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound(name) => write!(f, "Service not registered: {}", name),
            DiError::DuplicateRegistration(name) => {
                write!(f, "Service already registered: {}", name)
            }
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::Circular(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            DiError::Config(msg) => write!(f, "Invalid container options: {}", msg),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for container operations
pub type DiResult<T> = Result<T, DiError>;
