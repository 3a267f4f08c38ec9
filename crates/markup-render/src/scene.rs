//! Display list built from a render context.
//!
//! All per-kind geometry is decided here, so the drawing rules can be checked
//! without rasterizing anything.

use crate::color::parse_css_color;
use crate::renderer::RenderContext;
use kurbo::{Circle, Line, Point, Size};
use markup_core::shapes::{Shape, ShapeKind};
use peniko::Color;

/// Stroke color and width for one draw operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub width: f64,
}

/// One drawing operation, in surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Clear the whole surface to transparent.
    Clear { size: Size },
    /// Draw the base image at the origin, native size.
    BaseImage { size: Size },
    /// Closed outline through the points.
    Polygon { points: Vec<Point>, pen: Pen },
    Circle { circle: Circle, pen: Pen },
    Segment { line: Line, pen: Pen },
    /// Open connected polyline.
    Polyline { points: Vec<Point>, pen: Pen },
    /// Filled text with its baseline starting at `origin`.
    Text {
        origin: Point,
        content: String,
        size: f64,
        color: Color,
    },
}

/// An ordered display list for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    ops: Vec<DrawOp>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Append the operations for one shape.
    pub fn add_shape(&mut self, shape: &Shape, pen: Pen) {
        match shape.kind {
            ShapeKind::Rectangle => {
                // Corners are emitted as-is so a negative extent draws up/left of the origin.
                let p0 = shape.origin;
                let p2 = shape.far_corner();
                self.push(DrawOp::Polygon {
                    points: vec![p0, Point::new(p2.x, p0.y), p2, Point::new(p0.x, p2.y)],
                    pen,
                });
            }
            ShapeKind::Circle => self.push(DrawOp::Circle {
                circle: shape.circle_geometry(),
                pen,
            }),
            ShapeKind::Arrow => {
                self.push(DrawOp::Segment {
                    line: shape.arrow_shaft(),
                    pen,
                });
                for line in shape.arrow_head() {
                    self.push(DrawOp::Segment { line, pen });
                }
            }
            ShapeKind::Text => {
                if let Some(content) = shape.text.as_deref() {
                    self.push(DrawOp::Text {
                        origin: shape.origin,
                        content: content.to_string(),
                        size: shape.font_size(),
                        color: pen.color,
                    });
                }
            }
            ShapeKind::Freehand => {
                let points = shape.points();
                if points.len() >= 2 {
                    self.push(DrawOp::Polyline {
                        points: points.to_vec(),
                        pen,
                    });
                }
            }
        }
    }
}

/// Pen for a shape: its own style, or the highlight one pixel wider when selected.
pub fn pen_for(shape: &Shape, selected: bool, highlight: Color) -> Pen {
    let width = shape.stroke_width() as f64;
    if selected {
        Pen {
            color: highlight,
            width: width + 1.0,
        }
    } else {
        Pen {
            color: parse_css_color(shape.color()),
            width,
        }
    }
}

/// Build the display list for a frame: clear, base image, committed shapes, then the draft.
pub fn build_scene(ctx: &RenderContext<'_>) -> Scene {
    let size = ctx.base.size();
    let mut scene = Scene::new();
    scene.push(DrawOp::Clear { size });
    scene.push(DrawOp::BaseImage { size });

    for shape in ctx.shapes {
        let selected = ctx.selected == Some(&shape.id);
        scene.add_shape(shape, pen_for(shape, selected, ctx.highlight_color));
    }

    if let Some(draft) = ctx.draft {
        scene.add_shape(draft, pen_for(draft, false, ctx.highlight_color));
    }

    scene
}
