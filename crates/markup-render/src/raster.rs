//! CPU renderer backed by tiny-skia.

use crate::color::to_skia;
use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use crate::scene::{DrawOp, Pen, Scene, build_scene};
use crate::text::draw_text;
use ab_glyph::FontArc;
use kurbo::{Point, Size};
use tiny_skia::{
    LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

/// Renders frames into an owned pixmap sized to the base image.
pub struct RasterRenderer {
    pixmap: Option<Pixmap>,
    font: Option<FontArc>,
    warned_no_font: bool,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self {
            pixmap: None,
            font: None,
            warned_no_font: false,
        }
    }

    /// Use `font` for text annotations.
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    pub fn set_font(&mut self, font: Option<FontArc>) {
        self.font = font;
        self.warned_no_font = false;
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// The most recently rendered frame.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    fn surface(&mut self, size: Size) -> RenderResult<&mut Pixmap> {
        let (w, h) = (size.width as u32, size.height as u32);
        let reuse = matches!(&self.pixmap, Some(p) if p.width() == w && p.height() == h);
        if !reuse {
            let pixmap = Pixmap::new(w, h).ok_or_else(|| {
                RendererError::Surface(format!("Cannot allocate {}x{} surface", w, h))
            })?;
            self.pixmap = Some(pixmap);
        }
        self.pixmap
            .as_mut()
            .ok_or_else(|| RendererError::Surface("Surface missing".to_string()))
    }

    fn paint_scene(&mut self, scene: &Scene, ctx: &RenderContext<'_>) -> RenderResult<()> {
        let font = self.font.clone();
        let mut skipped_text = false;
        let pixmap = self.surface(ctx.base.size())?;

        for op in scene.ops() {
            match op {
                DrawOp::Clear { .. } => pixmap.fill(tiny_skia::Color::TRANSPARENT),
                DrawOp::BaseImage { .. } => pixmap.draw_pixmap(
                    0,
                    0,
                    ctx.base.pixmap().as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                ),
                DrawOp::Polygon { points, pen } => stroke_points(pixmap, points, true, pen),
                DrawOp::Polyline { points, pen } => stroke_points(pixmap, points, false, pen),
                DrawOp::Segment { line, pen } => {
                    stroke_points(pixmap, &[line.p0, line.p1], false, pen)
                }
                DrawOp::Circle { circle, pen } => {
                    if let Some(path) = PathBuilder::from_circle(
                        circle.center.x as f32,
                        circle.center.y as f32,
                        circle.radius as f32,
                    ) {
                        pixmap.stroke_path(&path, &paint(pen), &stroke(pen), Transform::identity(), None);
                    }
                }
                DrawOp::Text {
                    origin,
                    content,
                    size,
                    color,
                } => match &font {
                    Some(font) => draw_text(pixmap, font, *origin, content, *size, to_skia(*color)),
                    None => skipped_text = true,
                },
            }
        }

        if skipped_text && !self.warned_no_font {
            log::warn!("No font configured; text annotations are not drawn");
            self.warned_no_font = true;
        }
        Ok(())
    }
}

fn paint(pen: &Pen) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia(pen.color));
    paint.anti_alias = true;
    paint
}

fn stroke(pen: &Pen) -> Stroke {
    Stroke {
        width: pen.width as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    }
}

fn stroke_points(pixmap: &mut Pixmap, points: &[Point], close: bool, pen: &Pen) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    if close {
        pb.close();
    }
    // Degenerate paths (all points equal) produce nothing.
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint(pen), &stroke(pen), Transform::identity(), None);
    }
}

impl Renderer for RasterRenderer {
    fn render(&mut self, ctx: &RenderContext<'_>) -> RenderResult<&Pixmap> {
        let scene = build_scene(ctx);
        log::trace!("Rendering {} draw ops", scene.len());
        self.paint_scene(&scene, ctx)?;
        self.pixmap
            .as_ref()
            .ok_or_else(|| RendererError::Surface("Surface missing".to_string()))
    }
}
