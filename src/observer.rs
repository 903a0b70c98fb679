//! Diagnostic observers for registration and resolution events.
//!
//! Observers are the container's logging seam: the container itself never
//! prints. Attach [`LoggingObserver`] for plain stdout/stderr lines, the
//! `TracingObserver` (feature `tracing`) to feed a `tracing` subscriber, or
//! a custom [`DiObserver`] to collect metrics.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::Key;

/// Observer trait for container events.
///
/// Calls are made synchronously on the resolving thread, so keep
/// implementations lightweight.
///
/// # Examples
///
/// ```
/// use strand_di::{Container, DiError, DiObserver, Key, Resolver};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     events: Mutex<Vec<String>>,
/// }
///
/// impl DiObserver for Recorder {
///     fn resolving(&self, key: &Key) {
///         self.events.lock().unwrap().push(format!("resolving {}", key));
///     }
///
///     fn resolved(&self, key: &Key, _duration: Duration) {
///         self.events.lock().unwrap().push(format!("resolved {}", key));
///     }
///
///     fn failed(&self, key: &Key, error: &DiError) {
///         self.events.lock().unwrap().push(format!("failed {}: {}", key, error));
///     }
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let container = Container::new()
///     .add_observer(recorder.clone())
///     .register_instance(7u8);
///
/// container.get_required::<u8>();
/// assert_eq!(*recorder.events.lock().unwrap(), vec!["resolving u8", "resolved u8"]);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called after a new container has been produced with an entry for `key`.
    fn registered(&self, _key: &Key) {}

    /// Called before the factory for `key` is invoked.
    fn resolving(&self, key: &Key);

    /// Called after the factory for `key` returned a value.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when resolving `key` failed, including lookups that found no
    /// registration at all.
    fn failed(&self, key: &Key, error: &DiError);
}

/// Container for attached observers.
///
/// Shares its list between every container of one lineage; attaching an
/// observer builds a new list.
#[derive(Clone)]
pub(crate) struct Observers {
    observers: Arc<[Arc<dyn DiObserver>]>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: Arc::from(Vec::new()),
        }
    }

    /// Returns a new collection with `observer` appended.
    pub(crate) fn with(&self, observer: Arc<dyn DiObserver>) -> Self {
        Self {
            observers: self
                .observers
                .iter()
                .cloned()
                .chain(std::iter::once(observer))
                .collect(),
        }
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[cfg(any(test, feature = "diagnostics"))]
    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub(crate) fn registered(&self, key: &Key) {
        for observer in self.observers.iter() {
            observer.registered(key);
        }
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in self.observers.iter() {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in self.observers.iter() {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, key: &Key, error: &DiError) {
        for observer in self.observers.iter() {
            observer.failed(key, error);
        }
    }
}

impl Default for Observers {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in observer that logs events to stdout.
///
/// Failures go to stderr. Useful for development; production code usually
/// wants the `tracing` feature or a custom observer instead.
///
/// # Examples
///
/// ```
/// use strand_di::{Container, LoggingObserver};
/// use std::sync::Arc;
///
/// let container = Container::new()
///     .add_observer(Arc::new(LoggingObserver::with_prefix("[app]")))
///     .register_instance(42u64); // prints "[app] Registered: u64"
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "[strand-di]".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn registered(&self, key: &Key) {
        println!("{} Registered: {}", self.prefix, key.display_name());
    }

    fn resolving(&self, key: &Key) {
        println!("{} Resolving: {}", self.prefix, key.display_name());
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        println!("{} Resolved: {} in {:?}",
            self.prefix, key.display_name(), duration);
    }

    fn failed(&self, key: &Key, error: &DiError) {
        eprintln!("{} FAILED {}: {}",
            self.prefix, key.display_name(), error);
    }
}

/// Observer that forwards events to the `tracing` ecosystem.
///
/// Registrations and resolutions are emitted at `DEBUG`, failures at
/// `WARN`, all under the `strand_di` target with the service name as a
/// structured field.
#[cfg(feature = "tracing")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "tracing")]
impl DiObserver for TracingObserver {
    fn registered(&self, key: &Key) {
        tracing::debug!(target: "strand_di", service = key.display_name(), "registered");
    }

    fn resolving(&self, key: &Key) {
        tracing::trace!(target: "strand_di", service = key.display_name(), "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(
            target: "strand_di",
            service = key.display_name(),
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(target: "strand_di", service = key.display_name(), %error, "resolution failed");
    }
}
