//! Headless editing session: a canvas, its base image, a renderer and an export sink.

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::script::ReplayStep;
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use markup_core::canvas::AnnotationCanvas;
use markup_core::shapes::Shape;
use markup_core::storage::ExportSink;
use markup_render::{BaseImage, RasterRenderer, RenderContext, Renderer, parse_css_color};
use peniko::Color;

/// Drives one canvas the way the UI shell would, redrawing whenever the engine asks.
pub struct Session<S: ExportSink> {
    canvas: AnnotationCanvas,
    base: BaseImage,
    renderer: RasterRenderer,
    sink: S,
    highlight: Color,
    frames_rendered: usize,
}

impl<S: ExportSink> Session<S> {
    /// Start a session over `base`, seeded with `shapes`.
    pub fn new(
        base: BaseImage,
        shapes: Vec<Shape>,
        config: &AppConfig,
        renderer: RasterRenderer,
        sink: S,
    ) -> AppResult<Self> {
        let mut canvas = AnnotationCanvas::with_shapes(shapes)?.with_settings(config.tool.clone());
        let size = base.size();
        canvas.set_surface_size(size.width, size.height);
        Ok(Self {
            canvas,
            base,
            renderer,
            sink,
            highlight: parse_css_color(&config.highlight_color),
            frames_rendered: 0,
        })
    }

    pub fn canvas(&self) -> &AnnotationCanvas {
        &self.canvas
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn frames_rendered(&self) -> usize {
        self.frames_rendered
    }

    /// Apply every step in order.
    pub fn run(&mut self, steps: &[ReplayStep]) -> AppResult<()> {
        self.redraw_if_needed()?;
        for step in steps {
            self.apply(step)?;
        }
        log::info!(
            "Replayed {} steps: {} shapes, {} frames rendered",
            steps.len(),
            self.canvas.len(),
            self.frames_rendered
        );
        Ok(())
    }

    /// Apply one step, then redraw if the engine reported a change.
    pub fn apply(&mut self, step: &ReplayStep) -> AppResult<()> {
        if let Some(event) = step.pointer_event() {
            self.canvas.handle_pointer(event);
            return self.redraw_if_needed().map(|_| ());
        }

        match step {
            ReplayStep::Display { width, height } => self.canvas.set_display_size(*width, *height),
            ReplayStep::Tool { tool } => self.canvas.set_tool(*tool),
            ReplayStep::Color { color } => self.canvas.set_color(color.clone()),
            ReplayStep::StrokeWidth { width } => self.canvas.set_stroke_width(*width),
            ReplayStep::Text { text } => {
                if !self.canvas.confirm_text(text) {
                    log::debug!("Text {:?} not committed", text);
                }
            }
            ReplayStep::CancelText => {
                self.canvas.cancel_text();
            }
            ReplayStep::Delete => {
                self.canvas.delete_selected();
            }
            ReplayStep::Undo => {
                self.canvas.undo();
            }
            ReplayStep::Redo => {
                self.canvas.redo();
            }
            ReplayStep::Key { key, modifiers } => match ShortcutRegistry::lookup(key, *modifiers) {
                Some(action) => self.run_action(action),
                None => log::debug!("No shortcut bound to {:?}", key),
            },
            ReplayStep::Save => self.save()?,
            ReplayStep::Download => self.download()?,
            _ => {}
        }
        self.redraw_if_needed().map(|_| ())
    }

    fn run_action(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::Undo => {
                self.canvas.undo();
            }
            ShortcutAction::Redo => {
                self.canvas.redo();
            }
            ShortcutAction::DeleteSelected => {
                self.canvas.delete_selected();
            }
            ShortcutAction::Cancel => {
                self.canvas.cancel_gesture();
            }
        }
    }

    /// Re-render if the canvas has a pending redraw. Returns whether a frame was drawn.
    pub fn redraw_if_needed(&mut self) -> AppResult<bool> {
        if !self.canvas.take_redraw() {
            return Ok(false);
        }
        let ctx = RenderContext::from_canvas(&self.canvas, &self.base)?.with_highlight(self.highlight);
        self.renderer.render(&ctx)?;
        self.frames_rendered += 1;
        Ok(true)
    }

    /// Encode the committed shapes over the base image. An open draft is left out.
    pub fn frame_png(&mut self) -> AppResult<Vec<u8>> {
        let ctx = RenderContext::from_canvas(&self.canvas, &self.base)?
            .with_draft(None)
            .with_highlight(self.highlight);
        Ok(self.renderer.render_png(&ctx)?)
    }

    /// Hand the committed shapes and the rendered image to the sink.
    pub fn save(&mut self) -> AppResult<()> {
        let image = self.frame_png()?;
        let shapes = self.canvas.export_shapes();
        self.sink.save(&shapes, &image)?;
        Ok(())
    }

    /// Hand only the rendered image to the sink.
    pub fn download(&mut self) -> AppResult<()> {
        let image = self.frame_png()?;
        self.sink.download(&image)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;
    use markup_core::shapes::ShapeKind;
    use markup_core::storage::MemorySink;

    fn session() -> Session<MemorySink> {
        let base = BaseImage::blank(200, 100).unwrap();
        Session::new(
            base,
            Vec::new(),
            &AppConfig::default(),
            RasterRenderer::new(),
            MemorySink::new(),
        )
        .unwrap()
    }

    fn white_session() -> Session<MemorySink> {
        let base = BaseImage::from_rgba8(200, 100, vec![255; 200 * 100 * 4]).unwrap();
        Session::new(
            base,
            Vec::new(),
            &AppConfig::default(),
            RasterRenderer::new(),
            MemorySink::new(),
        )
        .unwrap()
    }

    fn pixel(png: &[u8], x: u32, y: u32) -> (u8, u8, u8, u8) {
        let image = BaseImage::from_bytes(png).unwrap();
        let p = image.pixmap().pixel(x, y).unwrap();
        (p.red(), p.green(), p.blue(), p.alpha())
    }

    fn run(session: &mut Session<MemorySink>, script: &str) {
        session.run(&parse_script(script).unwrap()).unwrap();
    }

    #[test]
    fn test_draw_undo_redo_save() {
        let mut s = session();
        run(
            &mut s,
            r##"[
                {"type": "tool", "tool": "rectangle"},
                {"type": "pointerDown", "x": 10, "y": 10},
                {"type": "pointerMove", "x": 50, "y": 40},
                {"type": "pointerUp", "x": 50, "y": 40},
                {"type": "key", "key": "z", "ctrl": true},
                {"type": "key", "key": "z", "ctrl": true, "shift": true},
                {"type": "save"}
            ]"##,
        );

        let saves = s.sink().saves().unwrap();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].shapes.len(), 1);
        assert_eq!(saves[0].shapes[0].kind, ShapeKind::Rectangle);
        assert_eq!(&saves[0].image[..4], b"\x89PNG");
    }

    #[test]
    fn test_save_mid_gesture_omits_draft() {
        let mut s = white_session();
        run(
            &mut s,
            r#"[
                {"type": "tool", "tool": "rectangle"},
                {"type": "pointerDown", "x": 10, "y": 10},
                {"type": "pointerMove", "x": 50, "y": 40},
                {"type": "save"}
            ]"#,
        );

        let saves = s.sink().saves().unwrap();
        assert!(saves[0].shapes.is_empty());
        assert_eq!(pixel(&saves[0].image, 30, 10), (255, 255, 255, 255));
        // The live preview still shows the draft.
        assert!(s.canvas().draft().is_some());
    }

    #[test]
    fn test_saved_image_shows_committed_shape() {
        let mut s = white_session();
        run(
            &mut s,
            r#"[
                {"type": "tool", "tool": "rectangle"},
                {"type": "pointerDown", "x": 10, "y": 10},
                {"type": "pointerUp", "x": 50, "y": 40},
                {"type": "download"}
            ]"#,
        );
        let downloads = s.sink().downloads().unwrap();
        assert_eq!(pixel(&downloads[0], 30, 10), (255, 0, 0, 255));
    }

    #[test]
    fn test_redraw_only_on_change() {
        let mut s = session();
        run(&mut s, r#"[{"type": "undo"}, {"type": "redo"}, {"type": "color", "color": "blue"}]"#);
        // Only the initial frame.
        assert_eq!(s.frames_rendered(), 1);

        run(&mut s, r#"[{"type": "tool", "tool": "arrow"}, {"type": "pointerDown", "x": 1, "y": 1}]"#);
        assert_eq!(s.frames_rendered(), 2);
    }

    #[test]
    fn test_text_prompt_and_escape() {
        let mut s = session();
        run(
            &mut s,
            r#"[
                {"type": "tool", "tool": "text"},
                {"type": "pointerDown", "x": 5, "y": 50},
                {"type": "text", "text": "   "},
                {"type": "pointerDown", "x": 5, "y": 60},
                {"type": "key", "key": "Escape"},
                {"type": "text", "text": "late"},
                {"type": "pointerDown", "x": 5, "y": 70},
                {"type": "text", "text": "Valve 3"}
            ]"#,
        );
        let shapes = s.canvas().shapes();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].text.as_deref(), Some("Valve 3"));
    }

    #[test]
    fn test_select_and_backspace() {
        let mut s = session();
        run(
            &mut s,
            r#"[
                {"type": "tool", "tool": "circle"},
                {"type": "pointerDown", "x": 10, "y": 10},
                {"type": "pointerUp", "x": 30, "y": 30},
                {"type": "tool", "tool": "select"},
                {"type": "pointerDown", "x": 20, "y": 20},
                {"type": "pointerUp", "x": 20, "y": 20},
                {"type": "key", "key": "Backspace"},
                {"type": "download"}
            ]"#,
        );
        assert!(s.canvas().is_empty());
        assert!(s.canvas().can_undo());
        assert_eq!(s.sink().downloads().unwrap().len(), 1);
        assert!(s.sink().saves().unwrap().is_empty());
    }

    #[test]
    fn test_display_scaling() {
        let mut s = session();
        run(
            &mut s,
            r#"[
                {"type": "display", "width": 100, "height": 50},
                {"type": "tool", "tool": "arrow"},
                {"type": "pointerDown", "x": 10, "y": 10},
                {"type": "pointerUp", "x": 20, "y": 10}
            ]"#,
        );
        let arrow = &s.canvas().shapes()[0];
        assert_eq!(arrow.origin, kurbo::Point::new(20.0, 20.0));
        assert_eq!(arrow.extent_or_zero(), kurbo::Size::new(20.0, 0.0));
    }
}
