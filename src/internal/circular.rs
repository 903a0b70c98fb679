//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::config::ContainerOptions;
use crate::error::{DiError, DiResult};
use crate::key::Key;

// Thread-local resolution state for circular dependency detection
thread_local! {
    static RESOLUTION_TLS: RefCell<ResolutionTls> = RefCell::new(ResolutionTls::default());
}

#[derive(Default)]
struct ResolutionTls {
    stack: Vec<Frame>,
}

/// One in-flight resolution on the current thread.
///
/// `owner` is the address of the resolving container's entry list and
/// `entry` the address of the factory being invoked; both stay fixed while
/// the resolution borrows them.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct Frame {
    owner: usize,
    entry: usize,
    key: Key,
}

impl Frame {
    pub(crate) fn new(owner: usize, entry: usize, key: Key) -> Self {
        Self { owner, entry, key }
    }
}

/// Marks one identity as "under construction" by one container on the
/// current thread.
///
/// Entering fails instead of pushing when the same container is already
/// constructing the identity, or when that container's frames reach
/// `max_depth`. Frames of other containers on the thread are ignored, so a
/// factory may resolve from an unrelated container. Dropping the guard pops
/// the entry, including while a panic unwinds through a factory.
pub(crate) struct StackGuard {
    frame: Frame,
}

impl StackGuard {
    /// With `pinned` set, re-entering the same factory fails as circular
    /// from any container and even when `detect_cycles` is off. Cached
    /// factories need this: re-entering one blocks on its own initialisation.
    pub(crate) fn enter(frame: Frame, options: &ContainerOptions, pinned: bool) -> DiResult<Self> {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();

            // Circular detection BEFORE pushing the new frame
            let reentered = tls.stack.iter().position(|f| {
                (options.detect_cycles && f.owner == frame.owner && f.key == frame.key)
                    || (pinned && f.entry == frame.entry)
            });
            if let Some(first) = reentered {
                let mut path: Vec<&'static str> =
                    tls.stack[first..].iter().map(|f| f.key.display_name()).collect();
                path.push(frame.key.display_name());
                return Err(DiError::Circular(path));
            }

            let depth = tls.stack.iter().filter(|f| f.owner == frame.owner).count();
            if depth >= options.max_depth {
                return Err(DiError::DepthExceeded(options.max_depth));
            }

            tls.stack.push(frame);
            Ok(())
        })?;

        Ok(Self { frame })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            if let Some(last) = tls.stack.pop() {
                debug_assert!(last == self.frame);
            }
        });
    }
}

#[cfg(test)]
pub(crate) fn depth() -> usize {
    RESOLUTION_TLS.with(|tls| tls.borrow().stack.len())
}
