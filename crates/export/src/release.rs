//! Deferred release of transient delivery handles

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::sink::{DeliverySink, TransientHandle};

/// Releases handles after a grace period, so a pending download or viewer
/// can still read them.
#[derive(Debug, Clone)]
pub struct ReleaseScheduler {
    grace: Duration,
    pending: Arc<AtomicUsize>,
}

impl ReleaseScheduler {
    pub fn new(grace: Duration) -> Self {
        Self {
            grace,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Handles scheduled but not yet released
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Release `handle` through `sink` once the grace period has elapsed.
    ///
    /// A zero grace releases immediately. Otherwise a task is spawned on the
    /// current tokio runtime.
    pub fn schedule<S: DeliverySink>(&self, sink: Arc<S>, handle: TransientHandle) {
        if self.grace.is_zero() {
            sink.release(handle);
            return;
        }

        debug!("Scheduling release of {} in {:?}", handle.label, self.grace);
        self.pending.fetch_add(1, Ordering::SeqCst);
        let pending = self.pending.clone();
        let grace = self.grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            sink.release(handle);
            pending.fetch_sub(1, Ordering::SeqCst);
        });
    }
}
