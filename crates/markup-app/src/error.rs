use crate::config::ConfigError;
use markup_core::shapes::ShapeError;
use markup_core::storage::StorageError;
use markup_render::RendererError;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("Invalid annotations: {0}")]
    Shape(#[from] ShapeError),
    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
