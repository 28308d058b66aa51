//! Paint command types for the drawing surface.

use serde::{Deserialize, Serialize};

/// Drawing tool selected in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
}

/// Commands that change the drawing state or the surface contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PaintCommand {
    /// Select pen or eraser
    SetTool { tool: Tool },
    /// Set pen color as `#RRGGBB`
    SetPenColor { color: String },
    /// Set the background color as `#RRGGBB`
    SetBackgroundColor { color: String },
    /// Draw a polyline through the given surface-space points with the current tool
    Stroke { points: Vec<[f32; 2]> },
    /// Flatten the drawing onto the background
    Flatten,
}
