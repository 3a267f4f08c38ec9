//! Renderer trait abstraction.

use crate::base_image::BaseImage;
use crate::export::encode_png;
use markup_core::canvas::AnnotationCanvas;
use markup_core::shapes::{Shape, ShapeId};
use peniko::Color;
use thiserror::Error;
use tiny_skia::Pixmap;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Canvas is not ready: base image size unknown")]
    NotReady,
    #[error("Surface error: {0}")]
    Surface(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Font error: {0}")]
    Font(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Highlight used for the selected shape (blue).
pub fn default_highlight() -> Color {
    Color::from_rgba8(59, 130, 246, 255)
}

/// Everything one frame is drawn from.
pub struct RenderContext<'a> {
    /// Base image, drawn at its native size at the surface origin.
    pub base: &'a BaseImage,
    /// Committed shapes in z-order.
    pub shapes: &'a [Shape],
    /// Shape drawn with the highlight color.
    pub selected: Option<&'a ShapeId>,
    /// In-progress shape drawn on top, never highlighted.
    pub draft: Option<&'a Shape>,
    /// Selection highlight color.
    pub highlight_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a context for a bare shape list.
    pub fn new(base: &'a BaseImage, shapes: &'a [Shape]) -> Self {
        Self {
            base,
            shapes,
            selected: None,
            draft: None,
            highlight_color: default_highlight(),
        }
    }

    /// Create a context from a live canvas, including its selection and draft.
    pub fn from_canvas(canvas: &'a AnnotationCanvas, base: &'a BaseImage) -> RenderResult<Self> {
        let surface = canvas.surface().ok_or(RendererError::NotReady)?;
        if surface.surface != base.size() {
            log::warn!(
                "Canvas surface {:?} differs from base image {:?}",
                surface.surface,
                base.size()
            );
        }
        Ok(Self {
            selected: canvas.selected(),
            draft: canvas.draft(),
            ..Self::new(base, canvas.shapes())
        })
    }

    pub fn with_selected(mut self, selected: Option<&'a ShapeId>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_draft(mut self, draft: Option<&'a Shape>) -> Self {
        self.draft = draft;
        self
    }

    pub fn with_highlight(mut self, color: Color) -> Self {
        self.highlight_color = color;
        self
    }
}

/// Trait for rendering backends.
///
/// A render is a pure function of the context: the surface is cleared and redrawn
/// from scratch every time, and the model is never written to.
pub trait Renderer {
    /// Draw a full frame and return the resulting surface.
    fn render(&mut self, ctx: &RenderContext<'_>) -> RenderResult<&Pixmap>;

    /// Draw a frame and encode it as PNG.
    fn render_png(&mut self, ctx: &RenderContext<'_>) -> RenderResult<Vec<u8>> {
        let pixmap = self.render(ctx)?;
        encode_png(pixmap)
    }
}
