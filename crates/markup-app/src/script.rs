//! Recorded input scripts for headless replay.

use crate::error::AppResult;
use markup_core::input::{Modifiers, PointerEvent};
use markup_core::tools::ToolKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recorded user action. Pointer positions are in displayed-element coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReplayStep {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    PointerLeave,
    /// The element was resized on screen.
    Display { width: f64, height: f64 },
    Tool { tool: ToolKind },
    Color { color: String },
    StrokeWidth { width: u32 },
    /// Answer to the text prompt.
    Text { text: String },
    CancelText,
    Delete,
    Undo,
    Redo,
    Key {
        key: String,
        #[serde(flatten)]
        modifiers: Modifiers,
    },
    Save,
    Download,
}

impl ReplayStep {
    /// The pointer event this step carries, if any.
    pub fn pointer_event(&self) -> Option<PointerEvent> {
        match *self {
            ReplayStep::PointerDown { x, y } => Some(PointerEvent::down(x, y)),
            ReplayStep::PointerMove { x, y } => Some(PointerEvent::moved(x, y)),
            ReplayStep::PointerUp { x, y } => Some(PointerEvent::up(x, y)),
            ReplayStep::PointerLeave => Some(PointerEvent::Leave),
            _ => None,
        }
    }
}

pub fn parse_script(text: &str) -> AppResult<Vec<ReplayStep>> {
    Ok(serde_json::from_str(text)?)
}

pub fn load_script(path: &Path) -> AppResult<Vec<ReplayStep>> {
    let text = std::fs::read_to_string(path)?;
    parse_script(&text)
}
