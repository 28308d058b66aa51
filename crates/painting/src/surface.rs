//! CPU drawing surface - straight-alpha RGBA8 storage

use tracing::debug;

use crate::blend::{destination_out, over_opaque, source_over};
use crate::stroke::StrokeMask;
use crate::types::{BlendMode, DrawingState, Rgb, Tool};
use crate::validation::{RasterError, validate_dimensions};

/// Affected region of a stroke as (x, y, width, height)
pub type Region = (u32, u32, u32, u32);

/// The live drawing surface.
///
/// Stores pixels as straight-alpha `[r, g, b, a]` bytes and starts fully
/// transparent, so the background color only appears at snapshot time.
#[derive(Debug, Clone)]
pub struct Surface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    /// Pixel data in row-major order
    pixels: Vec<[u8; 4]>,
    state: DrawingState,
}

impl Surface {
    /// Create a new surface with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        validate_dimensions(width, height)?;
        let pixel_count = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 0]; pixel_count],
            state: DrawingState::default(),
        })
    }

    /// Current stroke settings
    #[inline]
    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn select_tool(&mut self, tool: Tool) {
        self.state.select_tool(tool);
    }

    /// Set the pen color (always opaque)
    pub fn set_pen_color(&mut self, color: Rgb) {
        self.state.color = color.opaque();
    }

    /// Set a stroke color with explicit alpha, for translucent strokes
    pub fn set_stroke_color(&mut self, color: [u8; 4]) {
        self.state.color = color;
    }

    /// Rasterize `points` with the current stroke width, clipped to this surface
    pub fn stroke_mask(&self, points: &[[f32; 2]]) -> Result<StrokeMask, RasterError> {
        StrokeMask::polyline(points, self.state.width, (self.width, self.height))
    }

    /// Clear the surface to a solid color
    pub fn clear(&mut self, color: [u8; 4]) {
        self.pixels.fill(color);
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set a pixel at the given coordinates
    /// Does nothing if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Blend a color onto an existing pixel with source-over compositing.
    /// `coverage` (0-255) scales the color's alpha.
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [u8; 4], coverage: u8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = source_over(self.pixels[i], color, coverage);
        }
    }

    /// Erase a pixel by reducing its alpha by `amount` (0-255)
    #[inline]
    pub fn erase_pixel(&mut self, x: u32, y: u32, amount: u8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = destination_out(self.pixels[i], amount);
        }
    }

    /// Append an already-rasterized stroke using the current drawing state.
    ///
    /// Returns the affected region, or None if the mask lies completely
    /// outside the surface.
    pub fn apply_stroke(&mut self, mask: &StrokeMask) -> Option<Region> {
        let (x0, y0, x1, y1) = mask.clip_to(self.width, self.height)?;
        let state = self.state;

        for py in y0..y1 {
            for px in x0..x1 {
                let coverage = mask.coverage_at(px as i64, py as i64);
                if coverage == 0 {
                    continue;
                }
                match state.blend_mode {
                    BlendMode::Normal => self.blend_pixel(px, py, state.color, coverage),
                    BlendMode::Erase => {
                        // Eraser strength follows coverage scaled by stroke alpha
                        let amount = ((coverage as u32 * state.color[3] as u32 + 127) / 255) as u8;
                        self.erase_pixel(px, py, amount);
                    }
                }
            }
        }

        debug!(
            "Surface::apply_stroke: region=({}, {}, {}x{}), mode={:?}",
            x0,
            y0,
            x1 - x0,
            y1 - y0,
            state.blend_mode
        );
        Some((x0, y0, x1 - x0, y1 - y0))
    }

    /// Flatten the drawing onto `background` in place; every pixel becomes opaque.
    pub fn flatten(&mut self, background: Rgb) {
        for px in &mut self.pixels {
            *px = over_opaque(background, *px);
        }
        debug!("Surface::flatten onto {}", background);
    }

    /// Raw pixel bytes, row-major RGBA8
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Get the total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Get direct access to pixel data
    #[inline]
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface() {
        let surface = Surface::new(100, 100).unwrap();
        assert_eq!(surface.width, 100);
        assert_eq!(surface.height, 100);
        assert_eq!(surface.pixel_count(), 10000);
        assert_eq!(surface.get_pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            Surface::new(0, 10),
            Err(RasterError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_get_set_pixel() {
        let mut surface = Surface::new(10, 10).unwrap();
        let color = [255, 128, 64, 255];

        surface.set_pixel(5, 5, color);
        assert_eq!(surface.get_pixel(5, 5), Some(color));

        // Out of bounds should return None
        assert_eq!(surface.get_pixel(100, 100), None);
    }

    #[test]
    fn test_blend_pixel() {
        let mut surface = Surface::new(10, 10).unwrap();
        surface.clear([255, 255, 255, 255]);

        // 50% coverage of opaque red over white
        surface.blend_pixel(5, 5, [255, 0, 0, 255], 128);

        let result = surface.get_pixel(5, 5).unwrap();
        assert_eq!(result[0], 255);
        assert!((result[1] as i32 - 127).abs() <= 1);
        assert_eq!(result[3], 255);
    }

    #[test]
    fn test_pen_stroke_paints_pen_color() {
        let mut surface = Surface::new(32, 32).unwrap();
        let mask = StrokeMask::round_dab(16.0, 16.0, 6.0, (32, 32)).unwrap();
        let region = surface.apply_stroke(&mask).unwrap();
        assert!(region.2 > 0 && region.3 > 0);
        assert_eq!(surface.get_pixel(16, 16), Some(Rgb::default_pen().opaque()));
        assert_eq!(surface.get_pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_eraser_removes_alpha() {
        let mut surface = Surface::new(32, 32).unwrap();
        surface.clear([10, 20, 30, 255]);
        surface.select_tool(Tool::Eraser);

        surface.apply_stroke(&StrokeMask::round_dab(16.0, 16.0, 8.0, (32, 32)).unwrap());

        assert_eq!(surface.get_pixel(16, 16).unwrap()[3], 0);
        assert_eq!(surface.get_pixel(0, 0), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_stroke_outside_surface() {
        let mut surface = Surface::new(8, 8).unwrap();
        let mask = StrokeMask::round_dab(-50.0, -50.0, 4.0, (8, 8)).unwrap();
        assert_eq!(surface.apply_stroke(&mask), None);
    }

    #[test]
    fn test_stroke_mask_far_off_surface() {
        let mut surface = Surface::new(64, 48).unwrap();
        let mask = surface
            .stroke_mask(&[[-1e19, 10.0], [1e19, 10.0]])
            .unwrap();
        assert!(mask.width() <= 64 && mask.height() <= 48);

        surface.apply_stroke(&mask).unwrap();
        assert_eq!(surface.get_pixel(0, 10), Some(Rgb::default_pen().opaque()));
        assert_eq!(surface.get_pixel(63, 10), Some(Rgb::default_pen().opaque()));
        assert!(surface.stroke_mask(&[[f32::NAN, 0.0]]).is_err());
    }

    #[test]
    fn test_flatten_makes_opaque() {
        let mut surface = Surface::new(4, 4).unwrap();
        surface.set_pixel(1, 1, [255, 255, 255, 255]);
        surface.flatten(Rgb::new(0, 0, 255));

        assert!(surface.pixels().iter().all(|px| px[3] == 255));
        assert_eq!(surface.get_pixel(0, 0), Some([0, 0, 255, 255]));
        assert_eq!(surface.get_pixel(1, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_as_bytes() {
        let surface = Surface::new(2, 2).unwrap();
        // 4 pixels * 4 bytes
        assert_eq!(surface.as_bytes().len(), 16);
    }
}
