//! File-based export sink for native platforms.

use super::{ExportSink, StorageError, StorageResult, to_json};
use crate::shapes::Shape;
use std::fs;
use std::path::{Path, PathBuf};

/// File the shape list is written to.
pub const ANNOTATIONS_FILE_NAME: &str = "annotations.json";
/// File the rendered image is written to.
pub const IMAGE_FILE_NAME: &str = "annotated.png";

/// Writes saves and downloads into a directory.
///
/// Each save overwrites the previous one.
pub struct FileSink {
    base_path: PathBuf,
    annotations_name: String,
    image_name: String,
}

impl FileSink {
    /// Create a sink writing into `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create output directory: {}", e))
            })?;
        }
        Ok(Self {
            base_path,
            annotations_name: ANNOTATIONS_FILE_NAME.to_string(),
            image_name: IMAGE_FILE_NAME.to_string(),
        })
    }

    /// Override the output file names.
    pub fn with_file_names(mut self, annotations: impl Into<String>, image: impl Into<String>) -> Self {
        self.annotations_name = annotations.into();
        self.image_name = image.into();
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn annotations_path(&self) -> PathBuf {
        self.base_path.join(&self.annotations_name)
    }

    pub fn image_path(&self) -> PathBuf {
        self.base_path.join(&self.image_name)
    }

    fn write(path: &Path, bytes: &[u8]) -> StorageResult<()> {
        fs::write(path, bytes)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }
}

impl ExportSink for FileSink {
    fn save(&self, shapes: &[Shape], image: &[u8]) -> StorageResult<()> {
        let json = to_json(shapes)?;
        Self::write(&self.annotations_path(), json.as_bytes())?;
        Self::write(&self.image_path(), image)?;
        log::info!(
            "Saved {} annotations to {}",
            shapes.len(),
            self.base_path.display()
        );
        Ok(())
    }

    fn download(&self, image: &[u8]) -> StorageResult<()> {
        let path = self.image_path();
        Self::write(&path, image)?;
        log::info!("Exported image to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeStyle;
    use crate::storage::from_json;
    use kurbo::{Point, Size};
    use tempfile::tempdir;

    #[test]
    fn test_save_writes_both_files() {
        let dir = tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("out")).unwrap();
        let shapes = vec![Shape::arrow(Point::ZERO, Size::new(10.0, 0.0), ShapeStyle::default())];

        sink.save(&shapes, b"\x89PNG").unwrap();

        let json = fs::read_to_string(sink.annotations_path()).unwrap();
        assert_eq!(from_json(&json).unwrap(), shapes);
        assert_eq!(fs::read(sink.image_path()).unwrap(), b"\x89PNG");
    }

    #[test]
    fn test_download_writes_image_only() {
        let dir = tempdir().unwrap();
        let sink = FileSink::new(dir.path().to_path_buf())
            .unwrap()
            .with_file_names("notes.json", "job-42.png");

        sink.download(b"bytes").unwrap();

        assert!(dir.path().join("job-42.png").exists());
        assert!(!dir.path().join("notes.json").exists());
    }
}
