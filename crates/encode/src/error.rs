//! Error types for the format encoders

use drawpad_ipc::ExportFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Quality {0} is outside (0, 1]")]
    QualityOutOfRange(f32),

    #[error("Unsupported BMP bit depth: {0} (expected 24 or 32)")]
    UnsupportedDepth(u16),

    #[error("Image too large for {format}: {width}x{height}")]
    TooLarge {
        format: ExportFormat,
        width: u32,
        height: u32,
    },

    #[error("{format} codec failed: {message}")]
    Codec {
        format: ExportFormat,
        message: String,
    },

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),
}

impl EncodeError {
    pub(crate) fn codec(format: ExportFormat) -> impl FnOnce(image::ImageError) -> Self {
        move |e| Self::Codec {
            format,
            message: e.to_string(),
        }
    }
}
