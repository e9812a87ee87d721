//! Shared Container Module
//!
//! Mutual-exclusion facade for using any container across tasks. The
//! containers themselves never lock; callers opt in by wrapping one here.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

// == Shared ==
/// Cloneable handle to a container behind an async mutex.
#[derive(Debug, Default)]
pub struct Shared<C> {
    inner: Arc<Mutex<C>>,
}

impl<C> Clone for Shared<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> Shared<C> {
    /// Wraps `container` for shared use.
    pub fn new(container: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(container)),
        }
    }

    /// Waits for exclusive access to the container.
    pub async fn lock(&self) -> MutexGuard<'_, C> {
        self.inner.lock().await
    }

    /// Runs `f` with exclusive access and returns its result.
    pub async fn with<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }

    /// Exclusive access from synchronous code outside the runtime.
    ///
    /// Panics if called from within an async execution context.
    pub fn blocking_with<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let mut guard = self.inner.blocking_lock();
        f(&mut guard)
    }
}
