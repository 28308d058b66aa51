//! Surface capture: the suspending half of a snapshot
//!
//! A capture turns the live surface into a decoded RGBA image. The default
//! implementation round-trips through PNG on a blocking worker, matching how
//! the drawing front end captures its canvas as an image and waits for the
//! decode before redrawing it.

use std::io::Cursor;
use std::time::Duration;

use image::{ImageEncoder, ImageFormat};
use thiserror::Error;
use tracing::{debug, trace};

use crate::surface::Surface;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Capture encode failed: {0}")]
    Encode(String),

    #[error("Capture decode failed: {0}")]
    Decode(String),

    #[error("Capture worker failed: {0}")]
    Worker(String),

    #[error("Captured frame is {actual:?}, surface is {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Capture did not resolve within {0:?}")]
    Stalled(Duration),
}

/// Trait for the capture-then-decode step of a snapshot
#[allow(async_fn_in_trait)]
pub trait FrameCapture {
    /// Capture the surface's current visible pixels as a straight-alpha RGBA image
    async fn capture(&self, surface: &Surface) -> Result<image::RgbaImage, CaptureError>;
}

/// Copies the surface pixels without re-encoding.
///
/// Still yields once so callers observe the same suspension point as with a
/// real decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectCapture;

impl FrameCapture for DirectCapture {
    async fn capture(&self, surface: &Surface) -> Result<image::RgbaImage, CaptureError> {
        let pixels = surface.as_bytes().to_vec();
        tokio::task::yield_now().await;
        image::RgbaImage::from_raw(surface.width, surface.height, pixels).ok_or(
            CaptureError::DimensionMismatch {
                expected: (surface.width, surface.height),
                actual: (0, 0),
            },
        )
    }
}

/// Encodes the surface to PNG and decodes it back on a blocking worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundTripCapture;

impl FrameCapture for RoundTripCapture {
    async fn capture(&self, surface: &Surface) -> Result<image::RgbaImage, CaptureError> {
        let (width, height) = (surface.width, surface.height);
        let pixels = surface.as_bytes().to_vec();

        debug!("RoundTripCapture: capturing {}x{} surface", width, height);

        let decoded = tokio::task::spawn_blocking(move || round_trip_png(&pixels, width, height))
            .await
            .map_err(|e| CaptureError::Worker(e.to_string()))??;

        trace!("RoundTripCapture: decode complete");
        Ok(decoded)
    }
}

fn round_trip_png(pixels: &[u8], width: u32, height: u32) -> Result<image::RgbaImage, CaptureError> {
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(pixels, width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| CaptureError::Encode(e.to_string()))?;

    let decoded = image::load(Cursor::new(png), ImageFormat::Png)
        .map_err(|e| CaptureError::Decode(e.to_string()))?;
    Ok(decoded.to_rgba8())
}
