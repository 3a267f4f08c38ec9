//! Annotation shape definitions.

mod geometry;

pub use geometry::{ARROW_HEAD_ANGLE, ARROW_HEAD_LENGTH, TEXT_SIZE_FACTOR};

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when a shape record does not satisfy the annotation schema.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("Shape {0}: stroke width must be at least 1")]
    InvalidStrokeWidth(ShapeId),
    #[error("Shape {0}: text shapes need a text value")]
    MissingText(ShapeId),
    #[error("Shape {0}: freehand shapes need a point list")]
    MissingPoints(ShapeId),
    #[error("Shape {0}: color must not be empty")]
    MissingColor(ShapeId),
    #[error("Duplicate shape id: {0}")]
    DuplicateId(ShapeId),
}

/// Unique identifier for shapes.
///
/// Opaque to the engine. Freshly drawn shapes get a UUID v4 string; shapes loaded from
/// an existing store keep whatever id they were saved with, including numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawShapeId", into = "String")]
pub struct ShapeId(String);

impl ShapeId {
    /// Generate a new unique id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ShapeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<ShapeId> for String {
    fn from(id: ShapeId) -> Self {
        id.0
    }
}

/// Ids arrive either as strings or as integer timestamps.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawShapeId {
    Text(String),
    Number(u64),
}

impl From<RawShapeId> for ShapeId {
    fn from(raw: RawShapeId) -> Self {
        match raw {
            RawShapeId::Text(s) => Self(s),
            RawShapeId::Number(n) => Self(n.to_string()),
        }
    }
}

/// The closed set of annotation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Text,
    Rectangle,
    Circle,
    Arrow,
    Freehand,
}

impl ShapeKind {
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Text => "text",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Freehand => "freehand",
        }
    }
}

/// Style properties captured from the tool settings when a shape is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// CSS color string, kept verbatim.
    pub color: String,
    /// Stroke width in pixels. Doubles as the font size multiplier for text.
    pub stroke_width: u32,
}

impl ShapeStyle {
    pub fn new(color: impl Into<String>, stroke_width: u32) -> Self {
        Self {
            color: color.into(),
            stroke_width,
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::new("#ff0000", 3)
    }
}

/// One annotation record.
///
/// Committed shapes are treated as immutable values: edits replace the whole list
/// through a history snapshot rather than mutating a shape in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawShape", into = "RawShape")]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    /// Anchor point. Ignored for freehand.
    pub origin: Point,
    /// Signed size; negative components mean the shape was dragged up or left.
    pub extent: Option<Size>,
    pub text: Option<String>,
    pub style: ShapeStyle,
    /// Stroke points, in order. Only set for freehand.
    pub points: Option<Vec<Point>>,
}

impl Shape {
    fn base(kind: ShapeKind, origin: Point, style: ShapeStyle) -> Self {
        Self {
            id: ShapeId::new(),
            kind,
            origin,
            extent: None,
            text: None,
            style,
            points: None,
        }
    }

    pub fn rectangle(origin: Point, extent: Size, style: ShapeStyle) -> Self {
        Self {
            extent: Some(extent),
            ..Self::base(ShapeKind::Rectangle, origin, style)
        }
    }

    pub fn circle(origin: Point, extent: Size, style: ShapeStyle) -> Self {
        Self {
            extent: Some(extent),
            ..Self::base(ShapeKind::Circle, origin, style)
        }
    }

    pub fn arrow(origin: Point, extent: Size, style: ShapeStyle) -> Self {
        Self {
            extent: Some(extent),
            ..Self::base(ShapeKind::Arrow, origin, style)
        }
    }

    pub fn text(origin: Point, text: impl Into<String>, style: ShapeStyle) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::base(ShapeKind::Text, origin, style)
        }
    }

    /// Start a freehand stroke. The origin mirrors the first point.
    pub fn freehand(points: Vec<Point>, style: ShapeStyle) -> Self {
        let origin = points.first().copied().unwrap_or(Point::ZERO);
        Self {
            points: Some(points),
            ..Self::base(ShapeKind::Freehand, origin, style)
        }
    }

    /// Start a draft of the given kind at a press point.
    ///
    /// Text is never drafted; it goes through the text prompt instead.
    pub fn draft(kind: ShapeKind, at: Point, style: ShapeStyle) -> Option<Self> {
        match kind {
            ShapeKind::Rectangle => Some(Self::rectangle(at, Size::ZERO, style)),
            ShapeKind::Circle => Some(Self::circle(at, Size::ZERO, style)),
            ShapeKind::Arrow => Some(Self::arrow(at, Size::ZERO, style)),
            ShapeKind::Freehand => Some(Self::freehand(vec![at], style)),
            ShapeKind::Text => None,
        }
    }

    pub fn color(&self) -> &str {
        &self.style.color
    }

    pub fn stroke_width(&self) -> u32 {
        self.style.stroke_width
    }

    /// Extent, or zero when absent.
    pub fn extent_or_zero(&self) -> Size {
        self.extent.unwrap_or(Size::ZERO)
    }

    pub fn points(&self) -> &[Point] {
        self.points.as_deref().unwrap_or(&[])
    }

    /// Check the record against the annotation schema.
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.style.stroke_width == 0 {
            return Err(ShapeError::InvalidStrokeWidth(self.id.clone()));
        }
        if self.style.color.trim().is_empty() {
            return Err(ShapeError::MissingColor(self.id.clone()));
        }
        match self.kind {
            ShapeKind::Text if self.text.is_none() => Err(ShapeError::MissingText(self.id.clone())),
            ShapeKind::Freehand if self.points.is_none() => {
                Err(ShapeError::MissingPoints(self.id.clone()))
            }
            _ => Ok(()),
        }
    }
}

/// Validate a whole list, including id uniqueness.
pub fn validate_all(shapes: &[Shape]) -> Result<(), ShapeError> {
    let mut seen = std::collections::HashSet::new();
    for shape in shapes {
        shape.validate()?;
        if !seen.insert(&shape.id) {
            return Err(ShapeError::DuplicateId(shape.id.clone()));
        }
    }
    Ok(())
}

/// Wire form of a shape: flat `x`/`y`/`width`/`height` fields, camelCase keys.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawShape {
    id: ShapeId,
    #[serde(rename = "type", alias = "kind")]
    kind: ShapeKind,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    color: String,
    stroke_width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    points: Option<Vec<Point>>,
}

impl TryFrom<RawShape> for Shape {
    type Error = ShapeError;

    fn try_from(raw: RawShape) -> Result<Self, Self::Error> {
        let extent = match (raw.width, raw.height) {
            (None, None) => None,
            (w, h) => Some(Size::new(w.unwrap_or(0.0), h.unwrap_or(0.0))),
        };
        let shape = Shape {
            id: raw.id,
            kind: raw.kind,
            origin: Point::new(raw.x, raw.y),
            extent,
            text: raw.text,
            style: ShapeStyle::new(raw.color, raw.stroke_width),
            points: raw.points,
        };
        shape.validate()?;
        Ok(shape)
    }
}

impl From<Shape> for RawShape {
    fn from(shape: Shape) -> Self {
        RawShape {
            id: shape.id,
            kind: shape.kind,
            x: shape.origin.x,
            y: shape.origin.y,
            width: shape.extent.map(|e| e.width),
            height: shape.extent.map(|e| e.height),
            text: shape.text,
            color: shape.style.color,
            stroke_width: shape.style.stroke_width,
            points: shape.points,
        }
    }
}
