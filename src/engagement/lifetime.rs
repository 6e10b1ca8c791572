//! View lifetime tracking
//!
//! A card's deferred work must never write to a view that has been torn
//! down. The hosting view owns a [`ViewLifetime`]; queued confirmations hold
//! cheap [`LifetimeHandle`] observers and check liveness before every
//! mutation. Teardown does not cancel in-flight network calls, it only makes
//! their results unobservable.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Owner half of a view's liveness flag.
///
/// Dropping it (or calling [`ViewLifetime::retire`]) marks the view dead.
#[derive(Debug)]
pub struct ViewLifetime {
    alive: Arc<AtomicBool>,
}

/// Observer half, cloned into deferred work.
#[derive(Debug, Clone)]
pub struct LifetimeHandle {
    alive: Arc<AtomicBool>,
}

impl ViewLifetime {
    /// Create a live lifetime for a freshly mounted view
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Get an observer handle
    pub fn handle(&self) -> LifetimeHandle {
        LifetimeHandle {
            alive: Arc::clone(&self.alive),
        }
    }

    /// Explicitly mark the view as torn down
    pub fn retire(&self) {
        self.alive.store(false, Ordering::Release);
    }

    /// Whether the view is still mounted
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

impl Default for ViewLifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewLifetime {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl LifetimeHandle {
    /// Whether the owning view is still mounted
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}
