//! Tool settings and the drawing gesture state machine.

use crate::shapes::{Shape, ShapeKind, ShapeStyle};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Smallest stroke width a tool will apply to new shapes.
pub const MIN_STROKE_WIDTH: u32 = 1;
/// Largest stroke width a tool will apply to new shapes.
pub const MAX_STROKE_WIDTH: u32 = 5;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Text,
    Rectangle,
    Circle,
    Arrow,
    Freehand,
}

impl ToolKind {
    /// The shape kind this tool draws by dragging, if any.
    pub fn drawn_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Arrow => Some(ShapeKind::Arrow),
            ToolKind::Freehand => Some(ShapeKind::Freehand),
            ToolKind::Select | ToolKind::Text => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Text => "Text",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Circle => "Circle",
            ToolKind::Arrow => "Arrow",
            ToolKind::Freehand => "Freehand",
        }
    }
}

/// Tool configuration applied to shapes at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub color: String,
    pub stroke_width: u32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        let style = ShapeStyle::default();
        Self {
            tool: ToolKind::default(),
            color: style.color,
            stroke_width: style.stroke_width,
        }
    }
}

impl ToolSettings {
    /// Set the stroke width, clamped to the supported range.
    pub fn set_stroke_width(&mut self, width: u32) {
        self.stroke_width = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
    }

    /// Style for the next shape.
    pub fn style(&self) -> ShapeStyle {
        ShapeStyle::new(self.color.clone(), self.stroke_width)
    }
}

/// State of the drawing gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolState {
    /// Waiting for a press.
    #[default]
    Idle,
    /// A shape is being dragged out. The draft is invisible to history.
    Drafting { draft: Shape },
    /// The text tool was clicked; waiting for the user to enter text.
    AwaitingText { position: Point },
}

/// Manages the current tool and its gesture state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    pub settings: ToolSettings,
    pub state: ToolState,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ToolSettings) -> Self {
        let mut manager = Self::new();
        manager.settings.tool = settings.tool;
        manager.settings.color = settings.color;
        manager.settings.set_stroke_width(settings.stroke_width);
        manager
    }

    pub fn current_tool(&self) -> ToolKind {
        self.settings.tool
    }

    /// Switch tools. Any draft or pending text position is abandoned.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.settings.tool = tool;
        self.cancel();
    }

    /// Begin a press for the drawing tools or the text tool.
    ///
    /// Returns false for the select tool, whose presses are handled by hit-testing.
    /// A press while a draft is still open replaces that draft.
    pub fn begin(&mut self, point: Point) -> bool {
        let tool = self.settings.tool;
        if tool == ToolKind::Text {
            self.state = ToolState::AwaitingText { position: point };
            return true;
        }
        match tool.drawn_kind().and_then(|kind| Shape::draft(kind, point, self.settings.style())) {
            Some(draft) => {
                self.state = ToolState::Drafting { draft };
                true
            }
            None => false,
        }
    }

    /// Extend the draft to the current pointer position.
    pub fn update(&mut self, point: Point) -> bool {
        let ToolState::Drafting { draft } = &mut self.state else {
            return false;
        };
        match draft.kind {
            ShapeKind::Freehand => {
                draft.points.get_or_insert_with(Vec::new).push(point);
            }
            _ => {
                draft.extent = Some(Size::new(point.x - draft.origin.x, point.y - draft.origin.y));
            }
        }
        true
    }

    /// Finish the gesture at the release point and hand back the draft for committing.
    ///
    /// A freehand release at the same spot as the last sample adds no duplicate point.
    pub fn end(&mut self, point: Point) -> Option<Shape> {
        if let ToolState::Drafting { draft } = &self.state {
            let repeated = draft.kind == ShapeKind::Freehand && draft.points().last() == Some(&point);
            if !repeated {
                self.update(point);
            }
        }
        match std::mem::take(&mut self.state) {
            ToolState::Drafting { draft } => Some(draft),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Abandon the current draft, leaving any pending text position alone.
    pub fn abandon_draft(&mut self) -> bool {
        if self.is_drafting() {
            self.state = ToolState::Idle;
            true
        } else {
            false
        }
    }

    /// Take the pending text position, returning to idle.
    pub fn take_text_position(&mut self) -> Option<Point> {
        match std::mem::take(&mut self.state) {
            ToolState::AwaitingText { position } => Some(position),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Cancel whatever is in progress.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    pub fn is_drafting(&self) -> bool {
        matches!(self.state, ToolState::Drafting { .. })
    }

    pub fn draft(&self) -> Option<&Shape> {
        match &self.state {
            ToolState::Drafting { draft } => Some(draft),
            _ => None,
        }
    }

    pub fn pending_text_position(&self) -> Option<Point> {
        match self.state {
            ToolState::AwaitingText { position } => Some(position),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_selection() {
        let mut tm = ToolManager::new();
        assert_eq!(tm.current_tool(), ToolKind::Select);

        tm.set_tool(ToolKind::Rectangle);
        assert_eq!(tm.current_tool(), ToolKind::Rectangle);
    }

    #[test]
    fn test_rectangle_gesture() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Rectangle);

        assert!(tm.begin(Point::new(10.0, 10.0)));
        assert!(tm.is_drafting());
        assert!(tm.update(Point::new(30.0, 70.0)));

        let shape = tm.end(Point::new(60.0, 40.0)).unwrap();
        assert_eq!(shape.kind, ShapeKind::Rectangle);
        assert_eq!(shape.origin, Point::new(10.0, 10.0));
        assert_eq!(shape.extent, Some(Size::new(50.0, 30.0)));
        assert!(!tm.is_drafting());
    }

    #[test]
    fn test_freehand_appends_points() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Freehand);
        tm.begin(Point::new(0.0, 0.0));
        tm.update(Point::new(1.0, 1.0));
        tm.update(Point::new(2.0, 3.0));
        let shape = tm.end(Point::new(2.0, 3.0)).unwrap();
        assert_eq!(
            shape.points(),
            &[Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 3.0)]
        );
    }

    #[test]
    fn test_select_tool_no_draft() {
        let mut tm = ToolManager::new();
        assert!(!tm.begin(Point::new(0.0, 0.0)));
        assert!(!tm.update(Point::new(5.0, 5.0)));
        assert!(tm.end(Point::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_text_tool_records_position() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Text);
        assert!(tm.begin(Point::new(7.0, 9.0)));
        assert!(tm.end(Point::new(7.0, 9.0)).is_none());
        assert_eq!(tm.pending_text_position(), Some(Point::new(7.0, 9.0)));
        assert_eq!(tm.take_text_position(), Some(Point::new(7.0, 9.0)));
        assert_eq!(tm.state, ToolState::Idle);
    }

    #[test]
    fn test_switching_tool_abandons_draft() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Arrow);
        tm.begin(Point::ZERO);
        tm.set_tool(ToolKind::Circle);
        assert!(tm.draft().is_none());
    }

    #[test]
    fn test_settings_apply_to_new_shapes_only() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Circle);
        tm.settings.color = "green".to_string();
        tm.settings.set_stroke_width(9);
        assert_eq!(tm.settings.stroke_width, MAX_STROKE_WIDTH);

        tm.begin(Point::ZERO);
        let first = tm.end(Point::new(4.0, 4.0)).unwrap();
        tm.settings.color = "blue".to_string();
        assert_eq!(first.color(), "green");
        assert_eq!(first.stroke_width(), 5);
    }
}
