//! Export command types: output formats and per-request options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::IpcError;

/// Output container selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    Bmp,
    #[serde(rename = "webp")]
    WebP,
    Base64,
    Svg,
}

impl ExportFormat {
    /// Every format, in toolbar order.
    pub const ALL: [ExportFormat; 6] = [
        ExportFormat::Png,
        ExportFormat::Jpeg,
        ExportFormat::Bmp,
        ExportFormat::WebP,
        ExportFormat::Base64,
        ExportFormat::Svg,
    ];

    /// Selector string used on the wire (`png`, `jpeg`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Bmp => "bmp",
            Self::WebP => "webp",
            Self::Base64 => "base64",
            Self::Svg => "svg",
        }
    }

    /// MIME-equivalent label attached to the export result.
    pub fn mime_label(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Bmp => "image/bmp",
            Self::WebP => "image/webp",
            Self::Base64 => "text/plain",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Filename offered to the user when the request names none.
    ///
    /// Base64 output is handed over as text, so it has no default file.
    pub fn default_filename(self) -> Option<&'static str> {
        match self {
            Self::Png => Some("drawing.png"),
            Self::Jpeg => Some("drawing.jpg"),
            Self::Bmp => Some("drawing.bmp"),
            Self::WebP => Some("drawing.webp"),
            Self::Base64 => None,
            Self::Svg => Some("drawing.svg"),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = IpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "bmp" => Ok(Self::Bmp),
            "webp" => Ok(Self::WebP),
            "base64" => Ok(Self::Base64),
            "svg" => Ok(Self::Svg),
            other => Err(IpcError::UnknownFormat(other.to_string())),
        }
    }
}

/// A single export request from the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
    /// Encoder quality in (0, 1]; only JPEG and WebP look at it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f32>,
    /// Overrides the per-format default filename
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl ExportRequest {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            quality: None,
            filename: None,
        }
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// The filename to suggest to the sink: explicit name first, then the format default.
    pub fn suggested_filename(&self) -> Option<String> {
        self.filename
            .clone()
            .or_else(|| self.format.default_filename().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_selectors_parse() {
        for format in ExportFormat::ALL {
            assert_eq!(format.as_str().parse::<ExportFormat>().unwrap(), format);
        }
        assert_eq!("JPG".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert!(matches!(
            "tiff".parse::<ExportFormat>(),
            Err(IpcError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_default_filenames() {
        assert_eq!(ExportFormat::Jpeg.default_filename(), Some("drawing.jpg"));
        assert_eq!(ExportFormat::Base64.default_filename(), None);

        let request = ExportRequest::new(ExportFormat::Svg);
        assert_eq!(request.suggested_filename().as_deref(), Some("drawing.svg"));

        let named = ExportRequest::new(ExportFormat::Base64).with_filename("art.txt");
        assert_eq!(named.suggested_filename().as_deref(), Some("art.txt"));
    }

    #[test]
    fn test_request_wire_format() {
        let json = r#"{"format":"webp","quality":0.8}"#;
        let request: ExportRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.format, ExportFormat::WebP);
        assert_eq!(request.quality, Some(0.8));
        assert_eq!(request.filename, None);

        let back = serde_json::to_string(&ExportRequest::new(ExportFormat::Png)).unwrap();
        assert_eq!(back, r#"{"format":"png"}"#);
    }
}
