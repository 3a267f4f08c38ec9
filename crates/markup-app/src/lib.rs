//! Markup Application
//!
//! Headless application shell: configuration, keyboard shortcuts and scripted
//! sessions that drive the engine, the renderer and an export sink together.

mod config;
mod error;
mod script;
mod session;
mod shortcuts;

pub use config::{AppConfig, ConfigError};
pub use error::{AppError, AppResult};
pub use script::{ReplayStep, load_script, parse_script};
pub use session::Session;
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
