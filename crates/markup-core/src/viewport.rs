//! Mapping between displayed-element coordinates and surface pixels.

use kurbo::{Affine, Point, Size};
use serde::{Deserialize, Serialize};

/// Converts pointer positions from the displayed element to the raster surface.
///
/// The surface is the base image at its native resolution; the display is however large
/// the element is laid out on screen. Every pointer event goes through
/// [`SurfaceTransform::to_surface`] before touching the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceTransform {
    /// Native surface size in pixels.
    pub surface: Size,
    /// Size the surface is displayed at.
    pub display: Size,
}

impl SurfaceTransform {
    /// A surface displayed at its native size.
    pub fn new(surface: Size) -> Self {
        Self {
            surface,
            display: surface,
        }
    }

    /// A surface displayed at a different size. Degenerate display axes fall back
    /// to the surface size.
    pub fn with_display(surface: Size, display: Size) -> Self {
        let mut transform = Self::new(surface);
        transform.set_display(display);
        transform
    }

    pub fn set_display(&mut self, display: Size) {
        self.display = Size::new(
            if display.width > 0.0 { display.width } else { self.surface.width },
            if display.height > 0.0 { display.height } else { self.surface.height },
        );
    }

    /// Per-axis scale, `surface / display`.
    pub fn scale(&self) -> (f64, f64) {
        (
            self.surface.width / self.display.width,
            self.surface.height / self.display.height,
        )
    }

    /// Display-to-surface transform.
    pub fn transform(&self) -> Affine {
        let (sx, sy) = self.scale();
        Affine::scale_non_uniform(sx, sy)
    }

    pub fn to_surface(&self, display_point: Point) -> Point {
        self.transform() * display_point
    }

    pub fn to_display(&self, surface_point: Point) -> Point {
        self.transform().inverse() * surface_point
    }
}
