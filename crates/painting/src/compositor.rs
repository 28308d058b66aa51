//! Opaque snapshot compositor
//!
//! A snapshot runs in three steps:
//! 1. Lock the surface and request a capture of its pixels
//! 2. Suspend until the capture is decoded
//! 3. Fill a new buffer with the background and source-over the capture onto it
//!
//! The surface lock is held from step 1 through step 3, so no stroke lands
//! between capture and composite.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error};

use crate::blend::over_opaque;
use crate::capture::{CaptureError, FrameCapture};
use crate::constants::BYTES_PER_PIXEL;
use crate::handle::SurfaceHandle;
use crate::pixel_buffer::PixelBuffer;
use crate::types::Rgb;
use crate::validation::{RasterError, validate_rgba};

/// Default watchdog for a pending capture
pub const DEFAULT_CAPTURE_WATCHDOG: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Invalid surface: {0}")]
    InvalidSurface(#[from] RasterError),

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Composite straight-alpha RGBA8 `pixels` over an opaque `background`.
///
/// The output has the same dimensions and alpha 0xFF everywhere.
pub fn composite(
    background: Rgb,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<PixelBuffer, RasterError> {
    validate_rgba(width, height, pixels.len())?;

    let mut out = Rgb::opaque(background).repeat(width as usize * height as usize);
    for (dst, src) in out
        .chunks_exact_mut(BYTES_PER_PIXEL)
        .zip(pixels.chunks_exact(BYTES_PER_PIXEL))
    {
        if src[3] == 0 {
            continue;
        }
        dst.copy_from_slice(&over_opaque(background, [src[0], src[1], src[2], src[3]]));
    }

    PixelBuffer::from_raw(width, height, out)
}

/// Produces opaque [`PixelBuffer`] snapshots of a surface
pub struct Compositor<C> {
    capture: C,
    watchdog: Duration,
}

impl<C: FrameCapture> Compositor<C> {
    pub fn new(capture: C) -> Self {
        Self {
            capture,
            watchdog: DEFAULT_CAPTURE_WATCHDOG,
        }
    }

    /// Override how long a capture may stay pending before it is reported as stalled
    pub fn with_watchdog(mut self, watchdog: Duration) -> Self {
        self.watchdog = watchdog;
        self
    }

    /// Take an opaque snapshot of the surface behind `handle`.
    pub async fn snapshot(
        &self,
        handle: &SurfaceHandle,
        background: Rgb,
    ) -> Result<PixelBuffer, SnapshotError> {
        let guard = handle.lock().await;
        let surface = guard.as_ref().ok_or(RasterError::NotInitialized)?;
        let expected = (surface.width, surface.height);

        debug!(
            "Compositor::snapshot: {}x{} over {}",
            expected.0, expected.1, background
        );

        let frame = match tokio::time::timeout(self.watchdog, self.capture.capture(surface)).await {
            Ok(result) => result?,
            Err(_) => {
                error!(
                    "Surface capture stalled for {:?}; aborting snapshot",
                    self.watchdog
                );
                return Err(CaptureError::Stalled(self.watchdog).into());
            }
        };

        if frame.dimensions() != expected {
            return Err(CaptureError::DimensionMismatch {
                expected,
                actual: frame.dimensions(),
            }
            .into());
        }

        let buffer = composite(background, expected.0, expected.1, frame.as_raw())?;
        drop(guard);

        debug!("Compositor::snapshot: done");
        Ok(buffer)
    }
}
