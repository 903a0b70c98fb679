//! Container options.
//!
//! Options travel with a container lineage: every container produced by
//! `register*` on a container built with [`Container::with_options`]
//! carries the same options.
//!
//! [`Container::with_options`]: crate::Container::with_options

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};

/// Default recursion limit for nested resolutions by one container.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Resolution options for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```rust
/// use strand_di::{Container, ContainerOptions};
///
/// let options = ContainerOptions::new().with_max_depth(32);
/// let container = Container::with_options(options).register_instance(1u32);
///
/// assert_eq!(container.options().max_depth, 32);
/// assert!(container.options().detect_cycles);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Report `DiError::Circular` when an identity is re-entered while this
    /// container is still constructing it. When disabled, a cycle runs until
    /// `max_depth` is reached, except through a cached factory: re-entering
    /// one is always reported as circular, since it would wait on itself.
    pub detect_cycles: bool,
    /// Maximum number of nested resolutions this container may have in
    /// flight on one thread. Resolutions made by other containers from
    /// inside a factory do not count.
    pub max_depth: usize,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ContainerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Reads options from `{PREFIX}_DETECT_CYCLES` and `{PREFIX}_MAX_DEPTH`.
    ///
    /// Unset variables keep their defaults; set but unparsable variables
    /// are reported as `DiError::Config`.
    pub fn from_env(prefix: &str) -> DiResult<Self> {
        let mut options = Self::default();
        let prefix = prefix.to_uppercase();

        if let Some(value) = read_env(&prefix, "DETECT_CYCLES") {
            options.detect_cycles = value.parse::<bool>().map_err(|e| {
                DiError::Config(format!("{}_DETECT_CYCLES={:?}: {}", prefix, value, e))
            })?;
        }
        if let Some(value) = read_env(&prefix, "MAX_DEPTH") {
            options.max_depth = value.parse::<usize>().map_err(|e| {
                DiError::Config(format!("{}_MAX_DEPTH={:?}: {}", prefix, value, e))
            })?;
        }

        Ok(options)
    }

    /// Parses options from JSON; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> DiResult<Self> {
        serde_json::from_str(json).map_err(|e| DiError::Config(e.to_string()))
    }

    #[cfg(feature = "config")]
    pub fn to_json(&self) -> DiResult<String> {
        serde_json::to_string(self).map_err(|e| DiError::Config(e.to_string()))
    }
}

fn read_env(prefix: &str, name: &str) -> Option<String> {
    let key = if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}_{}", prefix, name)
    };
    env::var(key).ok()
}
