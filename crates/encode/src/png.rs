//! Lossless PNG output

use drawpad_ipc::ExportFormat;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use painting::PixelBuffer;
use tracing::debug;

use crate::{EncodeError, Encoded, FormatEncoder, ignore_quality};

/// Encode a buffer as 8-bit RGBA PNG
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, EncodeError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(
            buffer.as_raw(),
            buffer.width(),
            buffer.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(EncodeError::codec(ExportFormat::Png))?;

    debug!(
        "Encoded {}x{} PNG ({} bytes)",
        buffer.width(),
        buffer.height(),
        png.len()
    );
    Ok(png)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PngWriter;

impl FormatEncoder for PngWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Png
    }

    fn encode(&self, buffer: &PixelBuffer, quality: Option<f32>) -> Result<Encoded, EncodeError> {
        ignore_quality(ExportFormat::Png, quality);
        encode_png(buffer).map(Encoded::Bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut raw = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                raw.extend_from_slice(&[(x * 7) as u8, (y * 13) as u8, (x ^ y) as u8, 255]);
            }
        }
        PixelBuffer::from_raw(width, height, raw).unwrap()
    }

    #[test]
    fn test_png_signature() {
        let bytes = encode_png(&gradient(4, 4)).unwrap();
        assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_png_round_trip_exact() {
        let buffer = gradient(37, 19);
        let bytes = encode_png(&buffer).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.dimensions(), (37, 19));
        assert_eq!(decoded.as_raw().as_slice(), buffer.as_raw());
    }

    #[test]
    fn test_png_deterministic() {
        let buffer = gradient(16, 16);
        assert_eq!(encode_png(&buffer).unwrap(), encode_png(&buffer).unwrap());
    }
}
