//! Immutable RGBA8 snapshot handed from the compositor to the encoders

use crate::constants::BYTES_PER_PIXEL;
use crate::validation::{RasterError, validate_rgba};

/// An owned, fixed-size RGBA8 raster.
///
/// Once built the pixels cannot change. Buffers produced by the compositor
/// are fully opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA8 bytes, row-major, top row first
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        validate_rgba(width, height, pixels.len())?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A buffer of one repeated color
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Result<Self, RasterError> {
        let count = (width as usize) * (height as usize);
        Self::from_raw(width, height, color.repeat(count))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * BYTES_PER_PIXEL;
        let px = &self.pixels[offset..offset + BYTES_PER_PIXEL];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Iterate over rows, top row first
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[u8]> + ExactSizeIterator {
        self.pixels
            .chunks_exact(self.width as usize * BYTES_PER_PIXEL)
    }

    /// True when every alpha byte is 0xFF
    pub fn is_opaque(&self) -> bool {
        self.pixels
            .chunks_exact(BYTES_PER_PIXEL)
            .all(|px| px[3] == u8::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_checks_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 15]).is_err());
        assert!(PixelBuffer::from_raw(0, 2, vec![]).is_err());
    }

    #[test]
    fn test_pixel_access() {
        let mut raw = vec![0u8; 2 * 2 * 4];
        raw[12..16].copy_from_slice(&[1, 2, 3, 255]);
        let buffer = PixelBuffer::from_raw(2, 2, raw).unwrap();
        assert_eq!(buffer.pixel(1, 1), Some([1, 2, 3, 255]));
        assert_eq!(buffer.pixel(2, 0), None);
        assert_eq!(buffer.rows().len(), 2);
    }

    #[test]
    fn test_opacity_check() {
        let opaque = PixelBuffer::filled(3, 3, [9, 9, 9, 255]).unwrap();
        assert!(opaque.is_opaque());
        let clear = PixelBuffer::filled(3, 3, [9, 9, 9, 254]).unwrap();
        assert!(!clear.is_opaque());
    }
}
