//! Uncompressed BMP writer
//!
//! Layout:
//! - 14-byte file header: `BM`, file size, two reserved u16, pixel offset
//! - 40-byte BITMAPINFOHEADER: positive height (bottom-up), 1 plane, 24 or
//!   32 bpp, BI_RGB, image size, 2835 px/m (72 DPI), no palette
//! - Pixel rows bottom row first, BGR(A) order, each row padded to 4 bytes
//!
//! All multi-byte fields are little-endian.

use drawpad_ipc::ExportFormat;
use painting::PixelBuffer;
use tracing::debug;

use crate::{EncodeError, Encoded, FormatEncoder, ignore_quality};

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;
const PIXEL_OFFSET: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
/// 72 DPI in pixels per meter
const PIXELS_PER_METER: i32 = 2835;
const BI_RGB: u32 = 0;

/// Bits per pixel of the written bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BmpDepth {
    /// BGR, rows padded to 4 bytes
    #[default]
    Bits24,
    /// BGRA, rows naturally 4-byte aligned
    Bits32,
}

impl BmpDepth {
    pub fn bits(self) -> u16 {
        match self {
            BmpDepth::Bits24 => 24,
            BmpDepth::Bits32 => 32,
        }
    }

    fn bytes_per_pixel(self) -> usize {
        self.bits() as usize / 8
    }
}

impl TryFrom<u16> for BmpDepth {
    type Error = EncodeError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            24 => Ok(BmpDepth::Bits24),
            32 => Ok(BmpDepth::Bits32),
            other => Err(EncodeError::UnsupportedDepth(other)),
        }
    }
}

/// Stride of one stored row, padded to a multiple of 4 bytes
fn row_stride(width: u32, depth: BmpDepth) -> u64 {
    (width as u64 * depth.bits() as u64).div_ceil(32) * 4
}

/// Encode a buffer as an uncompressed bottom-up BMP
pub fn encode_bmp(buffer: &PixelBuffer, depth: BmpDepth) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (buffer.width(), buffer.height());
    let too_large = || EncodeError::TooLarge {
        format: ExportFormat::Bmp,
        width,
        height,
    };

    let stride = row_stride(width, depth);
    let image_size = u32::try_from(stride * height as u64).map_err(|_| too_large())?;
    let file_size = image_size.checked_add(PIXEL_OFFSET).ok_or_else(too_large)?;
    let signed_width = i32::try_from(width).map_err(|_| too_large())?;
    let signed_height = i32::try_from(height).map_err(|_| too_large())?;

    let mut out = Vec::with_capacity(file_size as usize);

    // File header
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&PIXEL_OFFSET.to_le_bytes());

    // BITMAPINFOHEADER
    out.extend_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
    out.extend_from_slice(&signed_width.to_le_bytes());
    out.extend_from_slice(&signed_height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&depth.bits().to_le_bytes());
    out.extend_from_slice(&BI_RGB.to_le_bytes());
    out.extend_from_slice(&image_size.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());

    let padding = stride as usize - width as usize * depth.bytes_per_pixel();
    for row in buffer.rows().rev() {
        for px in row.chunks_exact(4) {
            out.extend_from_slice(&[px[2], px[1], px[0]]);
            if depth == BmpDepth::Bits32 {
                out.push(px[3]);
            }
        }
        out.extend(std::iter::repeat_n(0u8, padding));
    }

    debug_assert_eq!(out.len(), file_size as usize);
    debug!(
        "Encoded {}x{} BMP at {} bpp ({} bytes)",
        width,
        height,
        depth.bits(),
        out.len()
    );
    Ok(out)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BmpWriter {
    depth: BmpDepth,
}

impl BmpWriter {
    pub fn new(depth: BmpDepth) -> Self {
        Self { depth }
    }
}

impl FormatEncoder for BmpWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Bmp
    }

    fn encode(&self, buffer: &PixelBuffer, quality: Option<f32>) -> Result<Encoded, EncodeError> {
        ignore_quality(ExportFormat::Bmp, quality);
        encode_bmp(buffer, self.depth).map(Encoded::Bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_golden_2x2_red() {
        let buffer = PixelBuffer::filled(2, 2, [0xFF, 0x00, 0x00, 0xFF]).unwrap();
        let bytes = encode_bmp(&buffer, BmpDepth::Bits24).unwrap();

        #[rustfmt::skip]
        let expected: [u8; 70] = [
            // File header
            0x42, 0x4D,             // "BM"
            0x46, 0x00, 0x00, 0x00, // file size 70
            0x00, 0x00, 0x00, 0x00, // reserved
            0x36, 0x00, 0x00, 0x00, // pixel offset 54
            // BITMAPINFOHEADER
            0x28, 0x00, 0x00, 0x00, // header size 40
            0x02, 0x00, 0x00, 0x00, // width 2
            0x02, 0x00, 0x00, 0x00, // height 2 (bottom-up)
            0x01, 0x00,             // planes
            0x18, 0x00,             // 24 bpp
            0x00, 0x00, 0x00, 0x00, // BI_RGB
            0x10, 0x00, 0x00, 0x00, // image size 16
            0x13, 0x0B, 0x00, 0x00, // 2835 px/m
            0x13, 0x0B, 0x00, 0x00, // 2835 px/m
            0x00, 0x00, 0x00, 0x00, // palette colors
            0x00, 0x00, 0x00, 0x00, // important colors
            // Bottom row: two BGR red pixels + 2 padding bytes
            0x00, 0x00, 0xFF, 0x00, 0x00, 0xFF, 0x00, 0x00,
            // Top row
            0x00, 0x00, 0xFF, 0x00, 0x00, 0xFF, 0x00, 0x00,
        ];

        assert_eq!(bytes.len(), 14 + 40 + 16);
        assert_eq!(bytes.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_row_order_and_channel_order() {
        // Top-left red, top-right green, bottom-left blue, bottom-right white
        let raw = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        let buffer = PixelBuffer::from_raw(2, 2, raw).unwrap();
        let bytes = encode_bmp(&buffer, BmpDepth::Bits24).unwrap();

        // First stored row is the bottom row: blue then white, in BGR
        assert_eq!(&bytes[54..60], &[255, 0, 0, 255, 255, 255]);
        // Second stored row is the top row: red then green, in BGR
        assert_eq!(&bytes[62..68], &[0, 0, 255, 0, 255, 0]);

        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Bmp)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.as_raw().as_slice(), buffer.as_raw());
    }

    #[test]
    fn test_odd_width_padding() {
        // 3 px * 3 bytes = 9, padded to 12
        let buffer = PixelBuffer::filled(3, 5, [1, 2, 3, 255]).unwrap();
        let bytes = encode_bmp(&buffer, BmpDepth::Bits24).unwrap();
        assert_eq!(bytes.len(), 54 + 12 * 5);
        assert_eq!(&bytes[54 + 9..54 + 12], &[0, 0, 0]);

        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Bmp)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 5));
        assert_eq!(decoded.as_raw().as_slice(), buffer.as_raw());
    }

    #[test]
    fn test_32_bit_layout() {
        let buffer = PixelBuffer::filled(3, 1, [10, 20, 30, 255]).unwrap();
        let bytes = encode_bmp(&buffer, BmpDepth::Bits32).unwrap();
        assert_eq!(bytes.len(), 54 + 12);
        assert_eq!(u16::from_le_bytes([bytes[28], bytes[29]]), 32);
        assert_eq!(&bytes[54..58], &[30, 20, 10, 255]);
    }

    #[test]
    fn test_depth_from_bits() {
        assert_eq!(BmpDepth::try_from(24).unwrap(), BmpDepth::Bits24);
        assert!(matches!(
            BmpDepth::try_from(8),
            Err(EncodeError::UnsupportedDepth(8))
        ));
    }
}
