/// Largest accepted surface edge. Keeps a single snapshot allocation bounded.
pub const MAX_SURFACE_DIMENSION: u32 = 16384;

/// Pen stroke width in pixels.
pub const PEN_WIDTH: f32 = 5.0;

/// Eraser stroke width in pixels.
pub const ERASER_WIDTH: f32 = 20.0;

/// Background color a new drawing starts with (`#241A03`).
pub const DEFAULT_BACKGROUND: [u8; 3] = [0x24, 0x1A, 0x03];

/// Pen color a new drawing starts with (`#1BEA10`).
pub const DEFAULT_PEN_COLOR: [u8; 3] = [0x1B, 0xEA, 0x10];

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;
