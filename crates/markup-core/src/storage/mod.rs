//! Save/export contract and annotation JSON.

mod file;
mod memory;

pub use file::{ANNOTATIONS_FILE_NAME, FileSink, IMAGE_FILE_NAME};
pub use memory::{MemorySink, SavedAnnotations};

use crate::shapes::{Shape, validate_all};
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid annotations: {0}")]
    Invalid(#[from] crate::shapes::ShapeError),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Receiver for user-initiated save and download actions.
///
/// `image` is the composed surface as an encoded image file (PNG), not raw pixels.
pub trait ExportSink {
    /// Persist the full committed shape list together with the rendered image.
    fn save(&self, shapes: &[Shape], image: &[u8]) -> StorageResult<()>;

    /// Export only the rendered image.
    fn download(&self, image: &[u8]) -> StorageResult<()>;
}

/// Serialize a shape list to the annotation JSON array.
pub fn to_json(shapes: &[Shape]) -> StorageResult<String> {
    Ok(serde_json::to_string_pretty(shapes)?)
}

/// Parse and validate an annotation JSON array.
pub fn from_json(json: &str) -> StorageResult<Vec<Shape>> {
    let shapes: Vec<Shape> = serde_json::from_str(json)?;
    validate_all(&shapes)?;
    Ok(shapes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeStyle;
    use kurbo::{Point, Size};

    #[test]
    fn test_json_round_trip() {
        let shapes = vec![
            Shape::rectangle(Point::new(1.0, 2.0), Size::new(-3.0, 4.0), ShapeStyle::default()),
            Shape::freehand(vec![Point::new(0.0, 0.0), Point::new(2.0, 2.0)], ShapeStyle::new("blue", 1)),
            Shape::text(Point::new(9.0, 9.0), "Valve", ShapeStyle::new("#000000", 4)),
        ];
        let json = to_json(&shapes).unwrap();
        assert_eq!(from_json(&json).unwrap(), shapes);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(from_json("{not json"), Err(StorageError::Serialization(_))));
        assert!(from_json(r#"[{"id": "x", "type": "hexagon", "x": 0, "y": 0,
                               "color": "red", "strokeWidth": 1}]"#)
            .is_err());
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let json = r#"[
            {"id": "a", "type": "text", "x": 0, "y": 0, "text": "one", "color": "red", "strokeWidth": 1},
            {"id": "a", "type": "text", "x": 5, "y": 5, "text": "two", "color": "red", "strokeWidth": 1}
        ]"#;
        assert!(matches!(from_json(json), Err(StorageError::Invalid(_))));
    }
}
