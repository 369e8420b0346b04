//! DesignPad Core Library
//!
//! Platform-agnostic data model, editing session and persistence for the
//! DesignPad drawing tool.

pub mod config;
pub mod design;
pub mod editor;
pub mod history;
pub mod input;
pub mod layer;
pub mod shapes;
pub mod snap;
pub mod storage;
pub mod tools;

pub use config::{ConfigError, EditorConfig};
pub use design::Design;
pub use editor::{EditorError, EditorResponse, EditorSession};
pub use history::{History, Snapshot};
pub use input::{InputEvent, PointerEvent};
pub use layer::{Layer, LayerId};
pub use shapes::{FontSpec, Path, SerializableColor, Shape, ShapeId, ShapeKind};
pub use snap::{GRID_SIZE, snap_to_grid};
pub use storage::{DesignBackend, DesignInfo, PersistenceClient, PersistenceError};
pub use tools::{ToolKind, ToolSettings};
