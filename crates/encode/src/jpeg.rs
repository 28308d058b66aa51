//! Lossy JPEG output with quality control

use drawpad_ipc::ExportFormat;
use image::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;
use painting::PixelBuffer;
use tracing::debug;

use crate::{EncodeError, Encoded, FormatEncoder, Quality, resolve_quality};

/// Encode a buffer as baseline JPEG. Alpha is dropped; snapshots are opaque.
pub fn encode_jpeg(buffer: &PixelBuffer, quality: Quality) -> Result<Vec<u8>, EncodeError> {
    let rgb: Vec<u8> = buffer
        .as_raw()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.percent())
        .write_image(
            &rgb,
            buffer.width(),
            buffer.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(EncodeError::codec(ExportFormat::Jpeg))?;

    debug!(
        "Encoded {}x{} JPEG at quality {} ({} bytes)",
        buffer.width(),
        buffer.height(),
        quality.percent(),
        jpeg.len()
    );
    Ok(jpeg)
}

#[derive(Debug, Clone, Copy)]
pub struct JpegWriter {
    default_quality: Quality,
}

impl JpegWriter {
    pub fn new(default_quality: Quality) -> Self {
        Self { default_quality }
    }
}

impl FormatEncoder for JpegWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Jpeg
    }

    fn encode(&self, buffer: &PixelBuffer, quality: Option<f32>) -> Result<Encoded, EncodeError> {
        let quality = resolve_quality(quality, self.default_quality)?;
        encode_jpeg(buffer, quality).map(Encoded::Bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise(width: u32, height: u32) -> PixelBuffer {
        // Deterministic xorshift noise, hard to compress
        let mut state = 0x2545_F491_u32;
        let mut raw = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            let mut px = [0u8; 4];
            for channel in px.iter_mut().take(3) {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                *channel = state as u8;
            }
            px[3] = 255;
            raw.extend_from_slice(&px);
        }
        PixelBuffer::from_raw(width, height, raw).unwrap()
    }

    #[test]
    fn test_solid_background_scenario() {
        let buffer = PixelBuffer::filled(100, 100, [0x24, 0x1A, 0x03, 0xFF]).unwrap();
        let bytes = encode_jpeg(&buffer, Quality::new(0.9).unwrap()).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg)
            .unwrap()
            .to_rgb8();
        assert_eq!(decoded.dimensions(), (100, 100));
        for px in decoded.pixels() {
            for (got, want) in px.0.iter().zip([0x24u8, 0x1A, 0x03]) {
                assert!(
                    (*got as i32 - want as i32).abs() <= 4,
                    "pixel {:?} too far from #241A03",
                    px.0
                );
            }
        }
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let buffer = noise(64, 64);
        let high = encode_jpeg(&buffer, Quality::new(0.95).unwrap()).unwrap();
        let low = encode_jpeg(&buffer, Quality::new(0.2).unwrap()).unwrap();
        assert!(low.len() < high.len(), "{} >= {}", low.len(), high.len());
    }

    #[test]
    fn test_writer_rejects_bad_quality() {
        let buffer = PixelBuffer::filled(2, 2, [0, 0, 0, 255]).unwrap();
        let writer = JpegWriter::new(Quality::new(0.9).unwrap());
        assert!(matches!(
            writer.encode(&buffer, Some(0.0)),
            Err(EncodeError::QualityOutOfRange(_))
        ));
        assert!(writer.encode(&buffer, None).is_ok());
    }
}
