//! Rasterized stroke coverage masks
//!
//! Stroke rasterization belongs to the drawing front end; it hands the core a
//! coverage mask per stroke. The round-cap helpers below exist so callers
//! without their own rasterizer can still produce strokes.

use tracing::trace;

use crate::validation::RasterError;

/// An already-rasterized stroke: 8-bit coverage over a rectangle in surface space.
///
/// The origin may be negative or beyond the surface; application clips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrokeMask {
    pub x: i64,
    pub y: i64,
    width: u32,
    height: u32,
    coverage: Vec<u8>,
}

impl StrokeMask {
    pub fn new(
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        coverage: Vec<u8>,
    ) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize;
        if coverage.len() != expected {
            return Err(RasterError::BufferSize {
                width,
                height,
                expected,
                actual: coverage.len(),
            });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
            coverage,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Coverage at a surface-space pixel; zero outside the mask
    #[inline]
    pub fn coverage_at(&self, px: i64, py: i64) -> u8 {
        let mx = px - self.x;
        let my = py - self.y;
        if mx < 0 || my < 0 || mx >= self.width as i64 || my >= self.height as i64 {
            return 0;
        }
        self.coverage[my as usize * self.width as usize + mx as usize]
    }

    /// Intersection with a `width` x `height` surface as (x0, y0, x1, y1), exclusive end.
    /// None if the mask lies completely outside.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x + self.width as i64).min(width as i64);
        let y1 = (self.y + self.height as i64).min(height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    /// A filled circle with an anti-aliased one-pixel rim, clipped to `bounds`
    pub fn round_dab(
        center_x: f32,
        center_y: f32,
        diameter: f32,
        bounds: (u32, u32),
    ) -> Result<Self, RasterError> {
        Self::polyline(&[[center_x, center_y]], diameter, bounds)
    }

    /// Round-capped, round-joined polyline of the given width.
    ///
    /// Only the part inside a `bounds.0` x `bounds.1` surface is rasterized,
    /// so points far off the surface cost nothing. Coverage is derived from
    /// the distance of each pixel center to the nearest segment, so
    /// consecutive segments never double-blend.
    pub fn polyline(
        points: &[[f32; 2]],
        width: f32,
        bounds: (u32, u32),
    ) -> Result<Self, RasterError> {
        if !width.is_finite() || points.iter().flatten().any(|v| !v.is_finite()) {
            return Err(RasterError::InvalidStroke(format!(
                "{} points at width {}",
                points.len(),
                width
            )));
        }

        let radius = width.max(0.0) as f64 / 2.0;
        if points.is_empty() || radius <= 0.0 {
            return Ok(Self::empty());
        }

        let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
        let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
        for &[px, py] in points {
            min_x = min_x.min(px as f64);
            min_y = min_y.min(py as f64);
            max_x = max_x.max(px as f64);
            max_y = max_y.max(py as f64);
        }

        // Pad by the radius plus the anti-aliasing rim, then intersect with the surface
        let pad = radius + 1.0;
        let (bw, bh) = (bounds.0 as f64, bounds.1 as f64);
        let x0 = (min_x - pad).floor().clamp(0.0, bw) as i64;
        let y0 = (min_y - pad).floor().clamp(0.0, bh) as i64;
        let x1 = (max_x + pad).ceil().clamp(0.0, bw) as i64;
        let y1 = (max_y + pad).ceil().clamp(0.0, bh) as i64;
        if x0 >= x1 || y0 >= y1 {
            return Ok(Self::empty());
        }
        let mask_w = (x1 - x0) as usize;
        let mask_h = (y1 - y0) as usize;

        let points: Vec<[f64; 2]> = points.iter().map(|&[x, y]| [x as f64, y as f64]).collect();
        let mut coverage = vec![0u8; mask_w * mask_h];
        for (my, row) in coverage.chunks_exact_mut(mask_w).enumerate() {
            for (mx, value) in row.iter_mut().enumerate() {
                // Pixel center in surface space
                let cx = (x0 + mx as i64) as f64 + 0.5;
                let cy = (y0 + my as i64) as f64 + 0.5;
                let dist = distance_to_polyline(cx, cy, &points);
                *value = ((radius + 0.5 - dist).clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        }

        trace!(
            "StrokeMask::polyline: {} points, width={:.1}, mask {}x{} at ({}, {})",
            points.len(),
            width,
            mask_w,
            mask_h,
            x0,
            y0
        );

        Ok(Self {
            x: x0,
            y: y0,
            width: mask_w as u32,
            height: mask_h as u32,
            coverage,
        })
    }

    fn empty() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            coverage: Vec::new(),
        }
    }
}

fn distance_to_polyline(px: f64, py: f64, points: &[[f64; 2]]) -> f64 {
    if points.len() == 1 {
        return distance(px, py, points[0]);
    }
    points
        .windows(2)
        .map(|seg| distance_to_segment(px, py, seg[0], seg[1]))
        .fold(f64::MAX, f64::min)
}

fn distance(px: f64, py: f64, a: [f64; 2]) -> f64 {
    (px - a[0]).hypot(py - a[1])
}

/// Interior distances use the cross product rather than the projected point,
/// which stays exact for segments whose endpoints are far off the surface.
fn distance_to_segment(px: f64, py: f64, a: [f64; 2], b: [f64; 2]) -> f64 {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return distance(px, py, a);
    }
    let (ax, ay) = (px - a[0], py - a[1]);
    let t = (ax * dx + ay * dy) / len_sq;
    if t <= 0.0 {
        distance(px, py, a)
    } else if t >= 1.0 {
        distance(px, py, b)
    } else {
        (ax * dy - ay * dx).abs() / len_sq.sqrt()
    }
}
