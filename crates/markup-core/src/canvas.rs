//! The annotation canvas engine.

use crate::history::History;
use crate::input::PointerEvent;
use crate::selection::{Selection, hit_test};
use crate::shapes::{Shape, ShapeError, ShapeId, validate_all};
use crate::tools::{ToolKind, ToolManager, ToolSettings};
use crate::viewport::SurfaceTransform;
use kurbo::{Point, Size};

/// One editing session over a base image.
///
/// Owns the committed shape list, its history, the gesture state and the selection.
/// Nothing outside the canvas writes to these; exporters read a copy through
/// [`AnnotationCanvas::export_shapes`].
///
/// Pointer input is ignored until [`AnnotationCanvas::set_surface_size`] has been called
/// with the base image's intrinsic size.
#[derive(Debug, Clone)]
pub struct AnnotationCanvas {
    shapes: Vec<Shape>,
    history: History,
    tool_manager: ToolManager,
    selection: Selection,
    surface: Option<SurfaceTransform>,
    needs_redraw: bool,
}

impl Default for AnnotationCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationCanvas {
    /// Create a canvas with no annotations.
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            history: History::default(),
            tool_manager: ToolManager::new(),
            selection: Selection::new(),
            surface: None,
            needs_redraw: true,
        }
    }

    /// Create a canvas pre-seeded with existing annotations.
    pub fn with_shapes(initial: Vec<Shape>) -> Result<Self, ShapeError> {
        validate_all(&initial)?;
        Ok(Self {
            history: History::new(initial.clone()),
            shapes: initial,
            ..Self::new()
        })
    }

    pub fn with_settings(mut self, settings: ToolSettings) -> Self {
        self.tool_manager = ToolManager::with_settings(settings);
        self
    }

    /// Supply the base image's intrinsic size. Opens the input gate.
    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        let surface = Size::new(width, height);
        let display = self.surface.map(|s| s.display).unwrap_or(surface);
        self.surface = Some(SurfaceTransform::with_display(surface, display));
        self.needs_redraw = true;
    }

    /// Update the size the surface is displayed at.
    pub fn set_display_size(&mut self, width: f64, height: f64) {
        match &mut self.surface {
            Some(surface) => surface.set_display(Size::new(width, height)),
            None => log::debug!("Display size set before the surface size; ignored"),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&SurfaceTransform> {
        self.surface.as_ref()
    }

    /// Feed one pointer event. Returns true if the model, draft or selection changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let Some(surface) = self.surface else {
            log::debug!("Ignoring {:?}: surface size not known yet", event);
            return false;
        };
        let changed = match event {
            PointerEvent::Down { position } => self.pointer_down(surface.to_surface(position)),
            PointerEvent::Move { position } => self.tool_manager.update(surface.to_surface(position)),
            PointerEvent::Up { position } => self.pointer_up(surface.to_surface(position)),
            PointerEvent::Leave => {
                let abandoned = self.tool_manager.abandon_draft();
                if abandoned {
                    log::debug!("Pointer left the surface; draft discarded");
                }
                abandoned
            }
        };
        self.needs_redraw |= changed;
        changed
    }

    fn pointer_down(&mut self, point: Point) -> bool {
        if self.tool_manager.current_tool() == ToolKind::Select {
            let hit = hit_test(point, &self.shapes);
            return self.selection.set(hit);
        }
        if self.tool_manager.is_drafting() {
            log::debug!("Press during an open draft; starting over");
        }
        self.tool_manager.begin(point)
    }

    fn pointer_up(&mut self, point: Point) -> bool {
        match self.tool_manager.end(point) {
            Some(draft) => {
                self.commit(draft);
                true
            }
            None => false,
        }
    }

    fn commit(&mut self, shape: Shape) {
        log::debug!("Committing {} {}", shape.kind.name(), shape.id);
        self.shapes.push(shape);
        self.history.snapshot(&self.shapes);
    }

    /// Confirm the text prompt. Blank input is rejected without touching the model.
    pub fn confirm_text(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        let Some(position) = self.tool_manager.take_text_position() else {
            return false;
        };
        let shape = Shape::text(position, text, self.tool_manager.settings.style());
        self.commit(shape);
        self.needs_redraw = true;
        true
    }

    /// Dismiss the text prompt.
    pub fn cancel_text(&mut self) -> bool {
        self.tool_manager.take_text_position().is_some()
    }

    pub fn pending_text_position(&self) -> Option<Point> {
        self.tool_manager.pending_text_position()
    }

    /// Drop the open draft and the text prompt, if any.
    pub fn cancel_gesture(&mut self) -> bool {
        let abandoned = self.tool_manager.abandon_draft();
        let dismissed = self.cancel_text();
        self.needs_redraw |= abandoned;
        abandoned || dismissed
    }

    /// Remove the selected shape. A no-op when nothing is selected.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection.get().cloned() else {
            return false;
        };
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id != id);
        self.selection.clear();
        if self.shapes.len() != before {
            self.history.snapshot(&self.shapes);
        }
        self.needs_redraw = true;
        true
    }

    pub fn undo(&mut self) -> bool {
        let Some(shapes) = self.history.undo() else {
            return false;
        };
        self.shapes = shapes.to_vec();
        self.after_history_move();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(shapes) = self.history.redo() else {
            return false;
        };
        self.shapes = shapes.to_vec();
        self.after_history_move();
        true
    }

    fn after_history_move(&mut self) {
        self.selection.retain_existing(&self.shapes);
        self.needs_redraw = true;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Switch tools, abandoning any draft or pending text.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool_manager.is_drafting() {
            self.needs_redraw = true;
        }
        self.tool_manager.set_tool(tool);
    }

    /// Color for shapes created from now on.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.tool_manager.settings.color = color.into();
    }

    /// Stroke width for shapes created from now on, clamped to 1..=5.
    pub fn set_stroke_width(&mut self, width: u32) {
        self.tool_manager.settings.set_stroke_width(width);
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.tool_manager.settings
    }

    /// Committed shapes in z-order (back to front).
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn get_shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    /// The shape being drawn, if a gesture is open.
    pub fn draft(&self) -> Option<&Shape> {
        self.tool_manager.draft()
    }

    pub fn selected(&self) -> Option<&ShapeId> {
        self.selection.get()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Point-in-time copy of the committed shapes for save/export.
    pub fn export_shapes(&self) -> Vec<Shape> {
        self.shapes.clone()
    }

    /// Whether a redraw is pending; clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}
