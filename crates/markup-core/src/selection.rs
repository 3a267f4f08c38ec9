//! Single-shape selection and hit-testing.

use crate::shapes::{Shape, ShapeId};
use kurbo::Point;

/// Find the shape under a surface-space point.
///
/// Shapes are tested in insertion order and the first bounding-box match wins, so where
/// shapes overlap the earliest-drawn one is picked even though it renders underneath.
/// Every kind, circles and freehand strokes included, is tested against its bounding box.
pub fn hit_test<'a>(point: Point, shapes: impl IntoIterator<Item = &'a Shape>) -> Option<ShapeId> {
    shapes
        .into_iter()
        .find(|shape| shape.contains(point))
        .map(|shape| shape.id.clone())
}

/// The currently selected shape, if any. At most one shape is selected at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection. Returns true if it changed.
    pub fn set(&mut self, id: Option<ShapeId>) -> bool {
        if self.selected == id {
            return false;
        }
        self.selected = id;
        true
    }

    pub fn select(&mut self, id: ShapeId) -> bool {
        self.set(Some(id))
    }

    pub fn clear(&mut self) -> bool {
        self.set(None)
    }

    pub fn get(&self) -> Option<&ShapeId> {
        self.selected.as_ref()
    }

    /// Drop the selection if its shape is no longer in `shapes`.
    pub fn retain_existing(&mut self, shapes: &[Shape]) -> bool {
        match &self.selected {
            Some(id) if !shapes.iter().any(|s| &s.id == id) => self.clear(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeStyle;
    use kurbo::Size;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::rectangle(Point::new(x, y), Size::new(w, h), ShapeStyle::default())
    }

    #[test]
    fn test_first_inserted_wins() {
        let a = rect(20.0, 20.0, 10.0, 10.0);
        let b = rect(0.0, 0.0, 100.0, 100.0);
        let shapes = vec![a.clone(), b.clone()];

        assert_eq!(hit_test(Point::new(25.0, 25.0), &shapes), Some(a.id));
        assert_eq!(hit_test(Point::new(80.0, 80.0), &shapes), Some(b.id));
        assert_eq!(hit_test(Point::new(150.0, 80.0), &shapes), None);
    }

    #[test]
    fn test_negative_extent_is_hit() {
        let a = rect(60.0, 40.0, -50.0, -30.0);
        assert_eq!(hit_test(Point::new(30.0, 20.0), [&a]), Some(a.id.clone()));
    }

    #[test]
    fn test_circle_uses_bounding_box() {
        let circle = Shape::circle(Point::ZERO, Size::new(100.0, 100.0), ShapeStyle::default());
        // Corner of the box lies outside the drawn circle but still selects it.
        assert_eq!(hit_test(Point::new(2.0, 2.0), [&circle]), Some(circle.id.clone()));
    }

    #[test]
    fn test_retain_existing() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let mut selection = Selection::new();
        assert!(selection.select(a.id.clone()));
        assert!(!selection.select(a.id.clone()));
        assert!(!selection.retain_existing(std::slice::from_ref(&a)));
        assert!(selection.retain_existing(&[]));
        assert!(selection.get().is_none());
    }
}
