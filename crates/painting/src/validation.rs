use crate::constants::{BYTES_PER_PIXEL, MAX_SURFACE_DIMENSION};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Surface not initialized")]
    NotInitialized,
    #[error("Pixel data length {actual} does not match {width}x{height} RGBA ({expected} bytes)")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),
    #[error("Invalid stroke: {0} (coordinates and width must be finite)")]
    InvalidStroke(String),
}

/// Check that a surface of `width` x `height` can exist
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), RasterError> {
    if width == 0
        || height == 0
        || width > MAX_SURFACE_DIMENSION
        || height > MAX_SURFACE_DIMENSION
    {
        return Err(RasterError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Expected RGBA8 byte length for the given dimensions
pub fn rgba_len(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize) * BYTES_PER_PIXEL
}

/// Validate dimensions and that `len` bytes hold exactly one RGBA8 image of them
pub fn validate_rgba(width: u32, height: u32, len: usize) -> Result<(), RasterError> {
    validate_dimensions(width, height)?;
    let expected = rgba_len(width, height);
    if len != expected {
        return Err(RasterError::BufferSize {
            width,
            height,
            expected,
            actual: len,
        });
    }
    Ok(())
}
