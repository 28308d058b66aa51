//! Shared configuration for drawpad
//!
//! This crate provides the single source of truth for canvas dimensions and
//! export settings. Defaults can be overridden through `DRAWPAD_*`
//! environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default canvas width in pixels
pub const DEFAULT_WIDTH: u32 = 800;

/// Default canvas height in pixels
pub const DEFAULT_HEIGHT: u32 = 600;

/// Default JPEG/WebP quality (0.0-1.0 scale)
pub const DEFAULT_QUALITY: f32 = 0.9;

/// Default BMP bit depth
pub const DEFAULT_BMP_BITS: u16 = 24;

/// Grace period before a delivered transient handle is released
pub const DEFAULT_RELEASE_GRACE_SECS: u64 = 30;

/// How long a surface capture may stay pending before it is treated as stalled
pub const DEFAULT_CAPTURE_WATCHDOG_SECS: u64 = 10;

/// Canvas configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl CanvasConfig {
    /// Create a new canvas config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Read `DRAWPAD_WIDTH` / `DRAWPAD_HEIGHT` from the environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test table, ...)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(width) = parse_var(&lookup, "DRAWPAD_WIDTH") {
            config.width = width;
        }
        if let Some(height) = parse_var(&lookup, "DRAWPAD_HEIGHT") {
            config.height = height;
        }
        config
    }
}

/// Export pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Quality used for JPEG when the request carries none
    pub jpeg_quality: f32,
    /// Quality used for WebP when the request carries none
    pub webp_quality: f32,
    /// BMP bits per pixel, 24 or 32
    pub bmp_bits_per_pixel: u16,
    /// Delay before a transient delivery handle is released
    pub release_grace: Duration,
    /// Capture watchdog; a capture pending longer than this is a bug
    pub capture_watchdog: Duration,
    /// Optional `<title>` written into SVG exports
    pub svg_title: Option<String>,
    /// Directory the file sink writes into
    pub output_dir: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_QUALITY,
            webp_quality: DEFAULT_QUALITY,
            bmp_bits_per_pixel: DEFAULT_BMP_BITS,
            release_grace: Duration::from_secs(DEFAULT_RELEASE_GRACE_SECS),
            capture_watchdog: Duration::from_secs(DEFAULT_CAPTURE_WATCHDOG_SECS),
            svg_title: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExportSettings {
    /// Parse settings from `DRAWPAD_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(q) = parse_var::<f32>(&lookup, "DRAWPAD_JPEG_QUALITY") {
            settings.jpeg_quality = q;
        }
        if let Some(q) = parse_var::<f32>(&lookup, "DRAWPAD_WEBP_QUALITY") {
            settings.webp_quality = q;
        }
        match parse_var::<u16>(&lookup, "DRAWPAD_BMP_DEPTH") {
            Some(bits @ (24 | 32)) => settings.bmp_bits_per_pixel = bits,
            Some(bits) => tracing::warn!("Ignoring DRAWPAD_BMP_DEPTH={}: expected 24 or 32", bits),
            None => {}
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "DRAWPAD_RELEASE_GRACE_SECS") {
            settings.release_grace = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "DRAWPAD_CAPTURE_WATCHDOG_SECS") {
            settings.capture_watchdog = Duration::from_secs(secs.max(1));
        }
        if let Some(title) = lookup("DRAWPAD_SVG_TITLE") {
            settings.svg_title = Some(title);
        }
        if let Some(dir) = lookup("DRAWPAD_OUT_DIR") {
            settings.output_dir = PathBuf::from(dir);
        }

        settings
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn table(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_settings() {
        let settings = ExportSettings::default();
        assert_eq!(settings.jpeg_quality, DEFAULT_QUALITY);
        assert_eq!(settings.bmp_bits_per_pixel, 24);
        assert_eq!(settings.release_grace, Duration::from_secs(30));
    }

    #[test]
    fn test_lookup_overrides() {
        let settings = ExportSettings::from_lookup(table(&[
            ("DRAWPAD_JPEG_QUALITY", "0.5"),
            ("DRAWPAD_BMP_DEPTH", "32"),
            ("DRAWPAD_RELEASE_GRACE_SECS", "5"),
            ("DRAWPAD_OUT_DIR", "/tmp/out"),
        ]));
        assert_eq!(settings.jpeg_quality, 0.5);
        assert_eq!(settings.webp_quality, DEFAULT_QUALITY);
        assert_eq!(settings.bmp_bits_per_pixel, 32);
        assert_eq!(settings.release_grace, Duration::from_secs(5));
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_invalid_values_ignored() {
        let settings = ExportSettings::from_lookup(table(&[
            ("DRAWPAD_JPEG_QUALITY", "high"),
            ("DRAWPAD_BMP_DEPTH", "16"),
        ]));
        assert_eq!(settings.jpeg_quality, DEFAULT_QUALITY);
        assert_eq!(settings.bmp_bits_per_pixel, DEFAULT_BMP_BITS);
    }

    #[test]
    fn test_canvas_from_lookup() {
        let canvas = CanvasConfig::from_lookup(table(&[("DRAWPAD_WIDTH", "320")]));
        assert_eq!(canvas.width, 320);
        assert_eq!(canvas.height, DEFAULT_HEIGHT);
    }
}
