//! WebP output

use drawpad_ipc::ExportFormat;
use image::ImageEncoder;
use image::codecs::webp::WebPEncoder;
use painting::PixelBuffer;
use tracing::debug;

use crate::{EncodeError, Encoded, FormatEncoder, Quality, resolve_quality};

/// Encode a buffer as WebP.
///
/// The codec only writes lossless WebP, so `quality` is validated and logged
/// but every quality yields the same exact output.
pub fn encode_webp(buffer: &PixelBuffer, quality: Quality) -> Result<Vec<u8>, EncodeError> {
    let mut webp = Vec::new();
    WebPEncoder::new_lossless(&mut webp)
        .write_image(
            buffer.as_raw(),
            buffer.width(),
            buffer.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(EncodeError::codec(ExportFormat::WebP))?;

    debug!(
        "Encoded {}x{} WebP (requested quality {:.2}, lossless) ({} bytes)",
        buffer.width(),
        buffer.height(),
        quality.get(),
        webp.len()
    );
    Ok(webp)
}

#[derive(Debug, Clone, Copy)]
pub struct WebpWriter {
    default_quality: Quality,
}

impl WebpWriter {
    pub fn new(default_quality: Quality) -> Self {
        Self { default_quality }
    }
}

impl FormatEncoder for WebpWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::WebP
    }

    fn encode(&self, buffer: &PixelBuffer, quality: Option<f32>) -> Result<Encoded, EncodeError> {
        let quality = resolve_quality(quality, self.default_quality)?;
        encode_webp(buffer, quality).map(Encoded::Bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webp_container_and_round_trip() {
        let mut raw = Vec::new();
        for i in 0..(8 * 5) {
            raw.extend_from_slice(&[i as u8 * 5, 255 - i as u8, 77, 255]);
        }
        let buffer = PixelBuffer::from_raw(8, 5, raw).unwrap();

        let bytes = encode_webp(&buffer, Quality::new(0.9).unwrap()).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");

        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::WebP)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.as_raw().as_slice(), buffer.as_raw());
    }

    #[test]
    fn test_webp_quality_validated() {
        let buffer = PixelBuffer::filled(2, 2, [0, 0, 0, 255]).unwrap();
        let writer = WebpWriter::new(Quality::new(0.9).unwrap());
        assert!(writer.encode(&buffer, Some(-1.0)).is_err());
        assert!(writer.encode(&buffer, Some(0.5)).is_ok());
    }
}
