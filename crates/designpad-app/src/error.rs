//! Errors surfaced by the command-line front end.

use designpad_core::storage::PersistenceError;
use designpad_core::{ConfigError, EditorError};
use designpad_render::RendererError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("Design not found: {0}")]
    NotFound(String),
    #[error("Invalid replay script {path}: {message}")]
    Script { path: String, message: String },
    #[error("Invalid replay step {index}: {message}")]
    Step { index: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
