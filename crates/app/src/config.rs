//! Application configuration and capture mode selection

use drawpad_config::{CanvasConfig, ExportSettings};
use painting::{CaptureError, DirectCapture, FrameCapture, RoundTripCapture, Surface};

/// How the export path captures the live surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
    /// Encode to PNG and decode back on a worker, like a canvas image capture
    #[default]
    RoundTrip,
    /// Copy the pixels directly
    Direct,
}

impl CaptureMode {
    /// Parse from environment variable DRAWPAD_CAPTURE
    pub fn from_env() -> Self {
        Self::parse(std::env::var("DRAWPAD_CAPTURE").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("direct") => Self::Direct,
            Some("roundtrip") | None => Self::RoundTrip,
            Some(other) => {
                tracing::warn!("Unknown DRAWPAD_CAPTURE {:?}, using roundtrip", other);
                Self::RoundTrip
            }
        }
    }
}

/// Capture strategy chosen at startup
#[derive(Debug, Clone, Copy)]
pub enum AnyCapture {
    Direct(DirectCapture),
    RoundTrip(RoundTripCapture),
}

impl From<CaptureMode> for AnyCapture {
    fn from(mode: CaptureMode) -> Self {
        match mode {
            CaptureMode::Direct => Self::Direct(DirectCapture),
            CaptureMode::RoundTrip => Self::RoundTrip(RoundTripCapture),
        }
    }
}

impl FrameCapture for AnyCapture {
    async fn capture(&self, surface: &Surface) -> Result<image::RgbaImage, CaptureError> {
        match self {
            Self::Direct(capture) => capture.capture(surface).await,
            Self::RoundTrip(capture) => capture.capture(surface).await,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct DrawpadConfig {
    pub canvas: CanvasConfig,
    pub export: ExportSettings,
    pub capture_mode: CaptureMode,
}

impl DrawpadConfig {
    pub fn from_env() -> Self {
        Self {
            canvas: CanvasConfig::from_env(),
            export: ExportSettings::from_env(),
            capture_mode: CaptureMode::from_env(),
        }
    }
}
