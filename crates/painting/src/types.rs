use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BACKGROUND, DEFAULT_PEN_COLOR, ERASER_WIDTH, PEN_WIDTH};
use crate::validation::RasterError;

/// An opaque sRGB color. Used for the background and the pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_array(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    /// Background a fresh drawing starts with
    pub const fn default_background() -> Self {
        Self::from_array(DEFAULT_BACKGROUND)
    }

    /// Pen color a fresh drawing starts with
    pub const fn default_pen() -> Self {
        Self::from_array(DEFAULT_PEN_COLOR)
    }

    /// This color as RGBA8 with the given alpha
    #[inline]
    pub const fn with_alpha(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }

    /// This color as fully opaque RGBA8
    #[inline]
    pub const fn opaque(self) -> [u8; 4] {
        self.with_alpha(u8::MAX)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = RasterError;

    /// Parse `#RRGGBB` (the leading `#` is optional)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(RasterError::InvalidColor(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| RasterError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Blend modes for painting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum BlendMode {
    /// Source-over
    #[default]
    Normal = 0,
    /// Destination-out: coverage removes alpha
    Erase = 1,
}

/// Toolbar tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
}

impl Tool {
    pub fn stroke_width(self) -> f32 {
        match self {
            Tool::Pen => PEN_WIDTH,
            Tool::Eraser => ERASER_WIDTH,
        }
    }

    pub fn blend_mode(self) -> BlendMode {
        match self {
            Tool::Pen => BlendMode::Normal,
            Tool::Eraser => BlendMode::Erase,
        }
    }
}

/// Current stroke settings of a surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingState {
    /// Straight-alpha RGBA8 stroke color
    pub color: [u8; 4],
    /// Stroke width in pixels
    pub width: f32,
    pub blend_mode: BlendMode,
    pub tool: Tool,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            color: Rgb::default_pen().opaque(),
            width: PEN_WIDTH,
            blend_mode: BlendMode::Normal,
            tool: Tool::Pen,
        }
    }
}

impl DrawingState {
    /// Switch tool, resetting width and blend mode to the tool's defaults
    pub fn select_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.width = tool.stroke_width();
        self.blend_mode = tool.blend_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("#241A03".parse::<Rgb>().unwrap(), Rgb::new(0x24, 0x1A, 0x03));
        assert_eq!("1bea10".parse::<Rgb>().unwrap(), Rgb::default_pen());
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#GG0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_display_hex() {
        assert_eq!(Rgb::default_background().to_string(), "#241A03");
    }

    #[test]
    fn test_select_tool() {
        let mut state = DrawingState::default();
        state.select_tool(Tool::Eraser);
        assert_eq!(state.width, ERASER_WIDTH);
        assert_eq!(state.blend_mode, BlendMode::Erase);
        state.select_tool(Tool::Pen);
        assert_eq!(state.width, PEN_WIDTH);
        assert_eq!(state.blend_mode, BlendMode::Normal);
    }
}
