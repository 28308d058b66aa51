//! Format encoders for drawpad snapshots
//!
//! Every output format is a [`FormatEncoder`] strategy: a pure function from
//! an opaque [`PixelBuffer`] to bytes or text. [`encoder_for`] picks the
//! strategy for a format tag.

mod bmp;
mod data_uri;
mod error;
mod jpeg;
mod png;
mod svg;
mod webp;

pub use bmp::{BmpDepth, BmpWriter, encode_bmp};
pub use data_uri::{Base64Writer, PNG_DATA_URI_PREFIX, decode_data_uri, png_data_uri};
pub use error::EncodeError;
pub use jpeg::{JpegWriter, encode_jpeg};
pub use png::{PngWriter, encode_png};
pub use svg::{SvgWriter, escape_xml, svg_document};
pub use webp::{WebpWriter, encode_webp};

use drawpad_config::ExportSettings;
use drawpad_ipc::ExportFormat;
use painting::PixelBuffer;

/// Encoder output: binary containers or transport text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    Bytes(Vec<u8>),
    Text(String),
}

impl Encoded {
    /// Payload bytes (UTF-8 bytes for text)
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Encoded::Bytes(bytes) => bytes,
            Encoded::Text(text) => text.as_bytes(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Encoded::Text(text) => Some(text),
            Encoded::Bytes(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Encoded::Bytes(bytes) => bytes,
            Encoded::Text(text) => text.into_bytes(),
        }
    }
}

/// Validated encoder quality in (0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quality(f32);

impl Quality {
    pub fn new(value: f32) -> Result<Self, EncodeError> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(EncodeError::QualityOutOfRange(value))
        }
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }

    /// Quality on the 1-100 scale used by the codecs
    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

/// Trait for one output format
pub trait FormatEncoder: Send + Sync {
    /// Format tag this encoder produces
    fn format(&self) -> ExportFormat;

    /// Encode `buffer`. `quality` is validated by formats that use it and ignored otherwise.
    fn encode(&self, buffer: &PixelBuffer, quality: Option<f32>) -> Result<Encoded, EncodeError>;
}

/// Per-format knobs taken from the export settings
#[derive(Debug, Clone)]
pub struct EncoderOptions {
    pub jpeg_quality: Quality,
    pub webp_quality: Quality,
    pub bmp_depth: BmpDepth,
    pub svg_title: Option<String>,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: Quality(drawpad_config::DEFAULT_QUALITY),
            webp_quality: Quality(drawpad_config::DEFAULT_QUALITY),
            bmp_depth: BmpDepth::Bits24,
            svg_title: None,
        }
    }
}

impl EncoderOptions {
    pub fn from_settings(settings: &ExportSettings) -> Result<Self, EncodeError> {
        Ok(Self {
            jpeg_quality: Quality::new(settings.jpeg_quality)?,
            webp_quality: Quality::new(settings.webp_quality)?,
            bmp_depth: BmpDepth::try_from(settings.bmp_bits_per_pixel)?,
            svg_title: settings.svg_title.clone(),
        })
    }
}

/// Select the encoder strategy for `format`
pub fn encoder_for(format: ExportFormat, options: &EncoderOptions) -> Box<dyn FormatEncoder> {
    match format {
        ExportFormat::Png => Box::new(PngWriter),
        ExportFormat::Jpeg => Box::new(JpegWriter::new(options.jpeg_quality)),
        ExportFormat::Bmp => Box::new(BmpWriter::new(options.bmp_depth)),
        ExportFormat::WebP => Box::new(WebpWriter::new(options.webp_quality)),
        ExportFormat::Base64 => Box::new(Base64Writer),
        ExportFormat::Svg => Box::new(SvgWriter::new(options.svg_title.clone())),
    }
}

/// Resolve a request quality against a format default
pub(crate) fn resolve_quality(requested: Option<f32>, default: Quality) -> Result<Quality, EncodeError> {
    requested.map(Quality::new).transpose().map(|q| q.unwrap_or(default))
}

/// Log and drop a quality the format does not use
pub(crate) fn ignore_quality(format: ExportFormat, quality: Option<f32>) {
    if let Some(q) = quality {
        tracing::debug!("Ignoring quality {} for {} export", q, format);
    }
}
