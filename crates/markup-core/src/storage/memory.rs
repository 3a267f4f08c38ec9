//! In-memory export sink.

use super::{ExportSink, StorageError, StorageResult};
use crate::shapes::Shape;
use std::sync::RwLock;

/// One recorded save.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedAnnotations {
    pub shapes: Vec<Shape>,
    pub image: Vec<u8>,
}

/// In-memory sink for testing and embedding.
#[derive(Default)]
pub struct MemorySink {
    saves: RwLock<Vec<SavedAnnotations>>,
    downloads: RwLock<Vec<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All saves so far, oldest first.
    pub fn saves(&self) -> StorageResult<Vec<SavedAnnotations>> {
        let saves = self
            .saves
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(saves.clone())
    }

    /// All downloaded images so far, oldest first.
    pub fn downloads(&self) -> StorageResult<Vec<Vec<u8>>> {
        let downloads = self
            .downloads
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(downloads.clone())
    }
}

impl ExportSink for MemorySink {
    fn save(&self, shapes: &[Shape], image: &[u8]) -> StorageResult<()> {
        let mut saves = self
            .saves
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        saves.push(SavedAnnotations {
            shapes: shapes.to_vec(),
            image: image.to_vec(),
        });
        Ok(())
    }

    fn download(&self, image: &[u8]) -> StorageResult<()> {
        let mut downloads = self
            .downloads
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        downloads.push(image.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeStyle;
    use kurbo::{Point, Size};

    #[test]
    fn test_save_records_copy() {
        let sink = MemorySink::new();
        let mut shapes = vec![Shape::circle(Point::ZERO, Size::new(4.0, 4.0), ShapeStyle::default())];
        sink.save(&shapes, b"png").unwrap();
        shapes.clear();

        let saves = sink.saves().unwrap();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].shapes.len(), 1);
        assert_eq!(saves[0].image, b"png");
        assert!(sink.downloads().unwrap().is_empty());
    }

    #[test]
    fn test_download_skips_shapes() {
        let sink = MemorySink::new();
        sink.download(b"img").unwrap();
        assert_eq!(sink.downloads().unwrap(), vec![b"img".to_vec()]);
        assert!(sink.saves().unwrap().is_empty());
    }
}
