//! Design persistence: backend abstraction, client and auto-save.

mod autosave;
mod client;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(not(target_arch = "wasm32"))]
mod remote;

pub use autosave::{AUTOSAVE_KEY, AutoSaveManager, DEFAULT_AUTOSAVE_INTERVAL_SECS};
pub use client::PersistenceClient;
pub use memory::MemoryBackend;

#[cfg(not(target_arch = "wasm32"))]
pub use autosave::{PlatformAutoSaveManager, create_autosave_manager};

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileBackend;

#[cfg(not(target_arch = "wasm32"))]
pub use remote::RemoteBackend;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Persistence errors. None of them touch the in-memory design.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Design not found: {0}")]
    NotFound(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Another save is already in progress")]
    SaveInProgress,
}

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Summary of a stored design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignInfo {
    pub name: String,
    /// Unix timestamp (ms) of the last save.
    pub saved_at: i64,
    /// Number of times the design has been written.
    pub version: u64,
}

/// Key-value store of serialized designs.
///
/// Payloads are opaque JSON text. Every `save_design` bumps the stored
/// version: 1 on first save, +1 per overwrite.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait DesignBackend: Send + Sync {
    /// Store a payload under `name`, returning the new version.
    fn save_design(&self, name: &str, payload: &str) -> BoxFuture<'_, PersistenceResult<u64>>;

    /// Fetch a payload. `None` if the name was never saved.
    fn load_design(&self, name: &str) -> BoxFuture<'_, PersistenceResult<Option<String>>>;

    /// Describe every stored design.
    fn list_designs(&self) -> BoxFuture<'_, PersistenceResult<Vec<DesignInfo>>>;

    /// Delete a design. Returns false if it did not exist.
    fn delete_design(&self, name: &str) -> BoxFuture<'_, PersistenceResult<bool>>;

    /// Current version of a design, if stored.
    fn design_version(&self, name: &str) -> BoxFuture<'_, PersistenceResult<Option<u64>>>;
}

/// Key-value store of serialized designs (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait DesignBackend {
    /// Store a payload under `name`, returning the new version.
    fn save_design(&self, name: &str, payload: &str) -> BoxFuture<'_, PersistenceResult<u64>>;

    /// Fetch a payload. `None` if the name was never saved.
    fn load_design(&self, name: &str) -> BoxFuture<'_, PersistenceResult<Option<String>>>;

    /// Describe every stored design.
    fn list_designs(&self) -> BoxFuture<'_, PersistenceResult<Vec<DesignInfo>>>;

    /// Delete a design. Returns false if it did not exist.
    fn delete_design(&self, name: &str) -> BoxFuture<'_, PersistenceResult<bool>>;

    /// Current version of a design, if stored.
    fn design_version(&self, name: &str) -> BoxFuture<'_, PersistenceResult<Option<u64>>>;
}

/// Current Unix time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    #[cfg(not(target_arch = "wasm32"))]
    use std::time::{SystemTime, UNIX_EPOCH};
    #[cfg(target_arch = "wasm32")]
    use web_time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
