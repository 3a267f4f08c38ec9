//! Markup Render Library
//!
//! Renderer abstraction and implementations for Markup.
//! Frames are built as a display list and rasterized on the CPU with tiny-skia.

mod base_image;
mod color;
mod export;
mod raster;
mod renderer;
mod scene;
mod text;

pub use base_image::BaseImage;
pub use color::parse_css_color;
pub use export::encode_png;
pub use raster::RasterRenderer;
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError, default_highlight};
pub use scene::{DrawOp, Pen, Scene, build_scene};
pub use text::load_font;
