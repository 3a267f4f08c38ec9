//! Derived geometry shared by hit-testing and rendering.

use super::{Shape, ShapeKind};
use kurbo::{Circle, Line, Point, Rect, Vec2};

/// Length of each arrowhead stroke in pixels.
pub const ARROW_HEAD_LENGTH: f64 = 10.0;
/// Angle between the shaft and each arrowhead stroke.
pub const ARROW_HEAD_ANGLE: f64 = std::f64::consts::FRAC_PI_6;
/// Text font size is `stroke_width * TEXT_SIZE_FACTOR` pixels.
pub const TEXT_SIZE_FACTOR: f64 = 8.0;

/// Average glyph advance as a fraction of the font size, for text bounds.
const TEXT_ADVANCE_RATIO: f64 = 0.6;

impl Shape {
    /// The corner opposite the origin. Equal to the origin when there is no extent.
    pub fn far_corner(&self) -> Point {
        let extent = self.extent_or_zero();
        Point::new(self.origin.x + extent.width, self.origin.y + extent.height)
    }

    /// Font size in pixels for text shapes.
    pub fn font_size(&self) -> f64 {
        self.style.stroke_width as f64 * TEXT_SIZE_FACTOR
    }

    /// Axis-aligned bounding box with the sign of the extent normalized away.
    pub fn bounds(&self) -> Rect {
        match self.kind {
            ShapeKind::Freehand => points_bounds(self.points()),
            ShapeKind::Text => self.text_bounds(),
            _ => Rect::from_points(self.origin, self.far_corner()),
        }
    }

    /// Approximate box for a text run whose baseline starts at the origin.
    fn text_bounds(&self) -> Rect {
        if let Some(extent) = self.extent {
            return Rect::from_points(self.origin, self.origin + Vec2::new(extent.width, extent.height));
        }
        let size = self.font_size();
        let chars = self.text.as_deref().map(|t| t.chars().count()).unwrap_or(0);
        let width = chars as f64 * size * TEXT_ADVANCE_RATIO;
        Rect::new(self.origin.x, self.origin.y - size, self.origin.x + width, self.origin.y)
    }

    /// Whether a surface-space point falls inside the bounding box (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        let b = self.bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }

    /// Circle described by a circle shape's extent.
    ///
    /// The radius is half the extent's diagonal, not half its width or height.
    pub fn circle_geometry(&self) -> Circle {
        let extent = self.extent_or_zero();
        let center = self.origin + Vec2::new(extent.width / 2.0, extent.height / 2.0);
        let radius = extent.width.hypot(extent.height) / 2.0;
        Circle::new(center, radius)
    }

    /// Arrow shaft from origin to origin + extent.
    pub fn arrow_shaft(&self) -> Line {
        Line::new(self.origin, self.far_corner())
    }

    /// The two arrowhead strokes, each running from the tip outward.
    pub fn arrow_head(&self) -> [Line; 2] {
        let tip = self.far_corner();
        let delta = tip - self.origin;
        let angle = delta.y.atan2(delta.x);
        let stroke = |offset: f64| {
            let a = angle + offset;
            Line::new(
                tip,
                Point::new(tip.x - ARROW_HEAD_LENGTH * a.cos(), tip.y - ARROW_HEAD_LENGTH * a.sin()),
            )
        };
        [stroke(-ARROW_HEAD_ANGLE), stroke(ARROW_HEAD_ANGLE)]
    }
}

fn points_bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeStyle;
    use kurbo::Size;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_negative_extent_bounds() {
        let rect = Shape::rectangle(Point::new(50.0, 50.0), Size::new(-20.0, -10.0), ShapeStyle::default());
        let b = rect.bounds();
        assert_eq!((b.x0, b.y0, b.x1, b.y1), (30.0, 40.0, 50.0, 50.0));
        assert!(rect.contains(Point::new(35.0, 45.0)));
        assert!(!rect.contains(Point::new(55.0, 45.0)));
    }

    #[test]
    fn test_circle_radius_uses_diagonal() {
        let circle = Shape::circle(Point::new(0.0, 0.0), Size::new(6.0, 8.0), ShapeStyle::default());
        let geom = circle.circle_geometry();
        assert!((geom.radius - 5.0).abs() < EPS);
        assert!((geom.center.x - 3.0).abs() < EPS);
        assert!((geom.center.y - 4.0).abs() < EPS);
    }

    #[test]
    fn test_arrow_head_strokes() {
        let arrow = Shape::arrow(Point::ZERO, Size::new(100.0, 0.0), ShapeStyle::default());
        let [a, b] = arrow.arrow_head();
        let (sin, cos) = ARROW_HEAD_ANGLE.sin_cos();

        assert_eq!(a.p0, Point::new(100.0, 0.0));
        assert!((a.p1.x - (100.0 - 10.0 * cos)).abs() < EPS);
        assert!((a.p1.y - 10.0 * sin).abs() < EPS);
        assert!((b.p1.x - (100.0 - 10.0 * cos)).abs() < EPS);
        assert!((b.p1.y + 10.0 * sin).abs() < EPS);
    }

    #[test]
    fn test_freehand_bounds_from_points() {
        let stroke = Shape::freehand(
            vec![Point::new(5.0, 5.0), Point::new(-5.0, 12.0), Point::new(8.0, 0.0)],
            ShapeStyle::default(),
        );
        let b = stroke.bounds();
        assert_eq!((b.x0, b.y0, b.x1, b.y1), (-5.0, 0.0, 8.0, 12.0));
    }

    #[test]
    fn test_text_bounds_sit_above_baseline() {
        let text = Shape::text(Point::new(10.0, 50.0), "abcd", ShapeStyle::new("black", 2));
        assert!((text.font_size() - 16.0).abs() < EPS);
        let b = text.bounds();
        assert!((b.y0 - 34.0).abs() < EPS);
        assert!((b.y1 - 50.0).abs() < EPS);
        assert!(text.contains(Point::new(15.0, 45.0)));
        assert!(!text.contains(Point::new(15.0, 55.0)));
    }
}
