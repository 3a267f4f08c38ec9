//! Markup Core Library
//!
//! Platform-agnostic annotation engine: shapes, hit-testing, the drawing gesture
//! state machine, snapshot history and the save/export contract.

pub mod canvas;
pub mod history;
pub mod input;
pub mod selection;
pub mod shapes;
pub mod storage;
pub mod tools;
pub mod viewport;

pub use canvas::AnnotationCanvas;
pub use history::History;
pub use input::{Modifiers, PointerEvent};
pub use selection::{Selection, hit_test};
pub use shapes::{Shape, ShapeError, ShapeId, ShapeKind, ShapeStyle};
pub use storage::{ExportSink, FileSink, MemorySink, StorageError, StorageResult};
pub use tools::{ToolKind, ToolManager, ToolSettings, ToolState};
pub use viewport::SurfaceTransform;
