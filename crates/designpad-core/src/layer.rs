//! Layers: named, toggleable groupings of shapes.

use crate::shapes::{Shape, ShapeId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for layers. Time-ordered (UUIDv7).
pub type LayerId = Uuid;

/// A named group of shapes drawn together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub(crate) id: LayerId,
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    /// Shapes in paint order (back to front).
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

fn default_visible() -> bool {
    true
}

impl Layer {
    /// Create a visible, unlocked, empty layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            visible: true,
            locked: false,
            shapes: Vec::new(),
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Visible and unlocked layers accept edits and hits.
    pub fn is_editable(&self) -> bool {
        self.visible && !self.locked
    }

    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.shapes.push(shape);
        id
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id() == id)?;
        Some(self.shapes.remove(index))
    }
}
