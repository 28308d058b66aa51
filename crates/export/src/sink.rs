//! Delivery sinks
//!
//! The coordinator never writes files or opens dialogs itself. It hands each
//! [`ExportResult`] to a [`DeliverySink`], which may return a transient handle
//! (a temporary file, an object URL) that must be released later.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::debug;

use crate::result::ExportResult;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink rejected the artifact: {0}")]
    Rejected(String),
}

/// A resource created by a sink that outlives the delivery call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransientHandle {
    pub id: u64,
    pub label: String,
}

impl TransientHandle {
    pub fn new(id: u64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

pub trait DeliverySink: Send + Sync + 'static {
    /// Hand the artifact to the user. A returned handle is released after the
    /// coordinator's grace period.
    fn deliver(&self, result: &ExportResult) -> Result<Option<TransientHandle>, DeliveryError>;

    /// Release a handle returned by [`DeliverySink::deliver`]
    fn release(&self, handle: TransientHandle) {
        debug!("Releasing {} (no-op)", handle.label);
    }
}

/// In-memory sink that keeps every delivered artifact.
///
/// Used by embedders that move results onward themselves (clipboard, IPC).
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<ExportResult>>,
    released: Mutex<Vec<TransientHandle>>,
    issue_handles: bool,
    fail: AtomicBool,
    next_id: AtomicU64,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a transient handle for every binary artifact
    pub fn with_handles() -> Self {
        Self {
            issue_handles: true,
            ..Self::default()
        }
    }

    /// Make subsequent deliveries fail (or succeed again)
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn delivered(&self) -> Vec<ExportResult> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn released(&self) -> Vec<TransientHandle> {
        self.released
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DeliverySink for MemorySink {
    fn deliver(&self, result: &ExportResult) -> Result<Option<TransientHandle>, DeliveryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeliveryError::Rejected("memory sink set to fail".into()));
        }

        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(result.clone());

        if self.issue_handles && result.text().is_none() {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let label = result
                .suggested_filename
                .clone()
                .unwrap_or_else(|| format!("{}-{}", result.format, id));
            return Ok(Some(TransientHandle::new(id, label)));
        }
        Ok(None)
    }

    fn release(&self, handle: TransientHandle) {
        debug!("MemorySink: released {}", handle.label);
        self.released
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
    }
}
