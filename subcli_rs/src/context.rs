//! Opaque execution context handed through to execution callbacks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cancellation handle passed unaltered to [`crate::Command::execute`] and
/// [`crate::SubCommand::execute`].
///
/// The library itself never observes it; a callback checks
/// [`Context::is_cancelled`] only if it chooses to. Clones share the same
/// flag, so a caller can keep one clone and cancel a long-running callback
/// from another thread.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Arc<AtomicBool>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
