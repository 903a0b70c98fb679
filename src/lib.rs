//! # strand-di
//!
//! An immutable service container: bind service types to construction
//! recipes, then resolve them on demand with dependencies wired through the
//! same container.
//!
//! ## Features
//!
//! - **Chain-built, immutable containers**: every registration returns a new
//!   container; earlier containers never change
//! - **Type-erased factories**: instance, per-resolution, fallible, cached and
//!   custom [`ServiceFactory`] variants share one list
//! - **Transitive resolution**: factories receive a [`ResolverContext`] over
//!   the container being resolved
//! - **Deferred producers**: [`Resolver::factory_for`] hands out a recipe that
//!   resolves at call time
//! - **Fail fast, or not**: duplicate and missing registrations panic on the
//!   fluent API and come back as [`DiError`] on the `try_*`/`get` API
//! - **Circular dependency detection**: cycles are reported with their path
//!   instead of overflowing the stack
//!
//! ## Quick Start
//!
//! ```rust
//! use strand_di::{Container, Resolver};
//! use std::sync::Arc;
//!
//! // Define your services
//! struct Repository {
//!     data: Vec<String>,
//! }
//!
//! struct Service {
//!     repository: Arc<Repository>,
//! }
//!
//! // Register services
//! let container = Container::new()
//!     .register_instance(Repository { data: vec!["x".to_string()] })
//!     .register_factory(|resolver| Service {
//!         repository: resolver.get_required::<Repository>(),
//!     });
//!
//! // Resolve
//! let service = container.get_required::<Service>();
//! assert_eq!(service.repository.data, vec!["x".to_string()]);
//! ```
//!
//! ## Trait Objects
//!
//! Identities match exactly, so a trait object is registered under a sized
//! handle such as `Arc<dyn Trait>`:
//!
//! ```rust
//! use strand_di::{Container, Resolver};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str) -> String;
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) -> String {
//!         format!("[LOG] {}", message)
//!     }
//! }
//!
//! let container = Container::new()
//!     .register_instance(Arc::new(ConsoleLogger) as Arc<dyn Logger>);
//!
//! let logger = container.get_required::<Arc<dyn Logger>>();
//! assert_eq!(logger.log("Hello"), "[LOG] Hello");
//! assert!(!container.contains::<ConsoleLogger>());
//! ```
//!
//! ## Cargo Features
//!
//! - `once-cell`: lock-free cache for [`Container::register_cached`]
//! - `config`: serde support for [`ContainerOptions`]
//! - `tracing`: `TracingObserver`, forwarding events to `tracing`
//! - `diagnostics`: `Container::to_debug_string`

// Module declarations
pub mod config;
pub mod container;
pub mod deferred;
pub mod descriptors;
pub mod error;
pub mod factory;
pub mod key;
pub mod kind;
pub mod observer;
pub mod traits;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use config::{ContainerOptions, DEFAULT_MAX_DEPTH};
pub use container::{Container, ResolverContext};
pub use deferred::Deferred;
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use factory::{BasicFactory, CachedFactory, FallibleFactory, InstanceFactory, ServiceFactory};
pub use key::{key_of_type, Key};
pub use kind::FactoryKind;
pub use observer::{DiObserver, LoggingObserver};
#[cfg(feature = "tracing")]
pub use observer::TracingObserver;
pub use registration::AnyServiceFactory;
pub use traits::{Resolver, ResolverCore};
