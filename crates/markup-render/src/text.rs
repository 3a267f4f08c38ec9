//! Glyph rasterization for text annotations.

use crate::renderer::{RenderResult, RendererError};
use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use kurbo::Point;
use std::path::Path;
use tiny_skia::{Pixmap, PremultipliedColorU8};

/// Load a TrueType/OpenType font from disk.
pub fn load_font(path: impl AsRef<Path>) -> RenderResult<FontArc> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| RendererError::Font(format!("Failed to read {}: {}", path.display(), e)))?;
    FontArc::try_from_vec(bytes)
        .map_err(|e| RendererError::Font(format!("Invalid font {}: {}", path.display(), e)))
}

/// Scale that gives an em box of `size` pixels, matching CSS font sizing.
fn px_scale(font: &FontArc, size: f32) -> PxScale {
    let units_per_em = font.units_per_em().unwrap_or(1000.0);
    PxScale::from(size * font.height_unscaled() / units_per_em)
}

/// Fill `content` with its baseline starting at `origin`.
pub fn draw_text(
    pixmap: &mut Pixmap,
    font: &FontArc,
    origin: Point,
    content: &str,
    size: f64,
    color: tiny_skia::Color,
) {
    let scale = px_scale(font, size as f32);
    let scaled = font.as_scaled(scale);
    let width = pixmap.width() as i32;
    let height = pixmap.height() as i32;
    let pixels = pixmap.pixels_mut();

    let mut caret = origin.x as f32;
    let baseline = origin.y as f32;
    let mut previous: Option<GlyphId> = None;

    for ch in content.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i32 + gx as i32;
            let y = bounds.min.y as i32 + gy as i32;
            if x < 0 || y < 0 || x >= width || y >= height {
                return;
            }
            let idx = (y * width + x) as usize;
            pixels[idx] = blend(pixels[idx], color, coverage.clamp(0.0, 1.0));
        });
    }
}

/// Source-over of a straight-alpha color at `coverage` onto a premultiplied pixel.
fn blend(dst: PremultipliedColorU8, color: tiny_skia::Color, coverage: f32) -> PremultipliedColorU8 {
    let sa = color.alpha() * coverage;
    if sa <= 0.0 {
        return dst;
    }
    let inv = 1.0 - sa;
    let channel = |src: f32, dst: u8| ((src * sa * 255.0) + dst as f32 * inv).round().clamp(0.0, 255.0) as u8;
    let a = ((sa * 255.0) + dst.alpha() as f32 * inv).round().clamp(0.0, 255.0) as u8;
    let r = channel(color.red(), dst.red()).min(a);
    let g = channel(color.green(), dst.green()).min(a);
    let b = channel(color.blue(), dst.blue()).min(a);
    PremultipliedColorU8::from_rgba(r, g, b, a).unwrap_or(dst)
}
