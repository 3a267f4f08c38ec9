//! CSS color strings to render colors.

use peniko::Color;
use peniko::color::{Srgb, parse_color};

/// Parse a CSS color string (`#rgb`, `#rrggbb`, `rgb(...)`, named colors, ...).
///
/// Unparsable values render black.
pub fn parse_css_color(value: &str) -> Color {
    match parse_color(value.trim()) {
        Ok(color) => color.to_alpha_color::<Srgb>(),
        Err(e) => {
            log::warn!("Unrecognised color {:?} ({}); using black", value, e);
            Color::from_rgba8(0, 0, 0, 255)
        }
    }
}

/// Convert to tiny-skia's straight-alpha color.
pub fn to_skia(color: Color) -> tiny_skia::Color {
    let rgba = color.to_rgba8();
    tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}
