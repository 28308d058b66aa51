//! Error types for the export pipeline

use drawpad_encode::EncodeError;
use painting::{CaptureError, RasterError, SnapshotError};
use thiserror::Error;

use crate::result::ExportResult;
use crate::sink::DeliveryError;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid surface: {0}")]
    InvalidSurface(RasterError),

    #[error("Surface capture failed: {0}")]
    CaptureFailed(CaptureError),

    #[error("Encode failed: {0}")]
    EncodeFailure(#[from] EncodeError),

    #[error("Encoder worker failed: {0}")]
    Worker(String),

    /// The sink rejected the artifact. The encoded result is kept so the
    /// caller can retry delivery without re-encoding.
    #[error("Delivery failed: {source}")]
    DeliveryFailure {
        source: DeliveryError,
        result: Box<ExportResult>,
    },

    #[error("Another export is already capturing the surface")]
    ConcurrentExportRejected,
}

impl From<SnapshotError> for ExportError {
    fn from(e: SnapshotError) -> Self {
        match e {
            SnapshotError::InvalidSurface(e) => Self::InvalidSurface(e),
            SnapshotError::Capture(e) => Self::CaptureFailed(e),
        }
    }
}

impl ExportError {
    /// Stable machine-readable code for front-end error messages
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSurface(_) => "invalid_surface",
            Self::CaptureFailed(_) => "capture_failed",
            Self::EncodeFailure(_) => "encode_failure",
            Self::Worker(_) => "encode_worker",
            Self::DeliveryFailure { .. } => "delivery_failure",
            Self::ConcurrentExportRejected => "busy",
        }
    }

    /// The encoded result carried by a delivery failure
    pub fn into_result(self) -> Option<ExportResult> {
        match self {
            Self::DeliveryFailure { result, .. } => Some(*result),
            _ => None,
        }
    }
}
