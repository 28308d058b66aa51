//! SVG document wrapping the PNG data URI in a single `<image>`

use std::borrow::Cow;

use drawpad_ipc::ExportFormat;
use painting::PixelBuffer;
use tracing::debug;

use crate::{EncodeError, Encoded, FormatEncoder, encode_png, ignore_quality, png_data_uri};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Characters XML 1.0 cannot carry at all, escaped or not
fn is_xml_forbidden(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

/// Escape text for use in XML attribute values and character data.
///
/// Characters XML 1.0 forbids (most C0 controls, U+FFFE, U+FFFF) are dropped.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s
        .chars()
        .any(|c| matches!(c, '&' | '<' | '>' | '"' | '\'') || is_xml_forbidden(c))
    {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_forbidden(c) => {}
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Build the SVG document text for an image of `width` x `height` pointing at `href`
pub fn svg_document(width: u32, height: u32, href: &str, title: Option<&str>) -> String {
    let mut svg = String::with_capacity(href.len() + 256);
    svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    svg.push('\n');
    svg.push_str(&format!(
        r#"<svg xmlns="{SVG_NS}" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    ));
    svg.push('\n');
    if let Some(title) = title {
        svg.push_str(&format!("  <title>{}</title>\n", escape_xml(title)));
    }
    svg.push_str(&format!(
        r#"  <image href="{}" width="{width}" height="{height}"/>"#,
        escape_xml(href)
    ));
    svg.push('\n');
    svg.push_str("</svg>\n");
    svg
}

#[derive(Debug, Clone, Default)]
pub struct SvgWriter {
    title: Option<String>,
}

impl SvgWriter {
    pub fn new(title: Option<String>) -> Self {
        Self { title }
    }
}

impl FormatEncoder for SvgWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Svg
    }

    fn encode(&self, buffer: &PixelBuffer, quality: Option<f32>) -> Result<Encoded, EncodeError> {
        ignore_quality(ExportFormat::Svg, quality);
        let href = png_data_uri(&encode_png(buffer)?);
        let svg = svg_document(buffer.width(), buffer.height(), &href, self.title.as_deref());
        debug!(
            "Wrapped {}x{} PNG in SVG ({} bytes)",
            buffer.width(),
            buffer.height(),
            svg.len()
        );
        Ok(Encoded::Bytes(svg.into_bytes()))
    }
}
