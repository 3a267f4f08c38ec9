//! The image being annotated.

use crate::renderer::{RenderResult, RendererError};
use kurbo::Size;
use std::path::Path;
use tiny_skia::{ColorU8, IntSize, Pixmap};

/// Decoded base image held as a premultiplied pixmap.
#[derive(Debug, Clone)]
pub struct BaseImage {
    pixmap: Pixmap,
}

impl BaseImage {
    /// Decode PNG, JPEG or WebP bytes.
    pub fn from_bytes(bytes: &[u8]) -> RenderResult<Self> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba8(width, height, rgba.into_raw())
    }

    pub fn from_path(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            RendererError::Surface(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let image = Self::from_bytes(&bytes)?;
        log::info!(
            "Loaded base image {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(image)
    }

    /// Build from straight-alpha RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> RenderResult<Self> {
        let size = IntSize::from_wh(width, height).ok_or_else(|| {
            RendererError::Surface(format!("Invalid image size {}x{}", width, height))
        })?;
        for px in data.chunks_exact_mut(4) {
            let premultiplied = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            px[0] = premultiplied.red();
            px[1] = premultiplied.green();
            px[2] = premultiplied.blue();
        }
        let pixmap = Pixmap::from_vec(data, size).ok_or_else(|| {
            RendererError::Surface("Pixel buffer does not match image size".to_string())
        })?;
        Ok(Self { pixmap })
    }

    /// A fully transparent image.
    pub fn blank(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RendererError::Surface(format!("Invalid image size {}x{}", width, height))
        })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Intrinsic size; this is the drawing surface size.
    pub fn size(&self) -> Size {
        Size::new(self.width() as f64, self.height() as f64)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(pixel));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png_size() {
        let image = BaseImage::from_bytes(&png_bytes(7, 3, [255, 0, 0, 255])).unwrap();
        assert_eq!(image.size(), Size::new(7.0, 3.0));
        let px = image.pixmap().pixel(0, 0).unwrap();
        assert_eq!((px.red(), px.alpha()), (255, 255));
    }

    #[test]
    fn test_decode_premultiplies() {
        let image = BaseImage::from_bytes(&png_bytes(1, 1, [200, 100, 0, 0])).unwrap();
        let px = image.pixmap().pixel(0, 0).unwrap();
        assert_eq!((px.red(), px.green(), px.alpha()), (0, 0, 0));
    }

    #[test]
    fn test_garbage_is_image_error() {
        assert!(matches!(
            BaseImage::from_bytes(b"definitely not an image"),
            Err(RendererError::Image(_))
        ));
    }

    #[test]
    fn test_blank_rejects_zero_size() {
        assert!(BaseImage::blank(0, 10).is_err());
        assert_eq!(BaseImage::blank(4, 2).unwrap().width(), 4);
    }
}
