//! The design document: layers plus freehand paths.

use crate::layer::{Layer, LayerId};
use crate::shapes::{Path, Shape, ShapeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Current serialization format version. Written on save, not checked on load.
pub const FORMAT_VERSION: u32 = 2;

/// Name of the layer every design starts with.
pub const DEFAULT_LAYER_NAME: &str = "Background";

/// A complete design. Persisted whole, never partially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// Layers, bottom to top.
    #[serde(default)]
    pub layers: Vec<Layer>,
    /// Freehand strokes in drawing order.
    #[serde(default)]
    pub paths: Vec<Path>,
    /// Format version the payload was written with.
    #[serde(default)]
    pub version: u32,
    /// Unix timestamp (ms) of the last save.
    #[serde(default)]
    pub saved_at: Option<i64>,
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}

impl Design {
    /// Create an empty design with one "Background" layer.
    pub fn new() -> Self {
        Self {
            layers: vec![Layer::new(DEFAULT_LAYER_NAME)],
            paths: Vec::new(),
            version: FORMAT_VERSION,
            saved_at: None,
        }
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    /// Bottom-most layer. Always present.
    pub fn base_layer(&self) -> &Layer {
        &self.layers[0]
    }

    /// Give a design with no layers the default one.
    pub fn ensure_base_layer(&mut self) {
        if self.layers.is_empty() {
            self.layers.push(Layer::new(DEFAULT_LAYER_NAME));
        }
    }

    /// Add a new layer on top.
    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        let layer = Layer::new(name);
        let id = layer.id();
        self.layers.push(layer);
        id
    }

    /// Remove a layer with its shapes and paths. The last layer cannot be removed.
    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        if self.layers.len() <= 1 {
            return None;
        }
        let index = self.layers.iter().position(|l| l.id() == id)?;
        self.paths.retain(|p| p.layer != id);
        Some(self.layers.remove(index))
    }


    /// Add a shape to a layer. Returns None if the layer does not exist.
    pub fn add_shape(&mut self, layer: LayerId, shape: Shape) -> Option<ShapeId> {
        self.layer_mut(layer).map(|l| l.add_shape(shape))
    }

    /// Commit a finished path.
    pub fn add_path(&mut self, path: Path) {
        self.paths.push(path);
    }

    /// Get a shape and the layer that owns it.
    pub fn shape(&self, id: ShapeId) -> Option<(&Layer, &Shape)> {
        self.layers
            .iter()
            .find_map(|layer| layer.shape(id).map(|shape| (layer, shape)))
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.layers.iter_mut().find_map(|layer| layer.shape_mut(id))
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.layers.iter_mut().find_map(|layer| layer.remove_shape(id))
    }

    /// Topmost shape at a point on a visible, unlocked layer.
    pub fn shape_at_point(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.layers
            .iter()
            .rev()
            .filter(|layer| layer.is_editable())
            .flat_map(|layer| layer.shapes.iter().rev())
            .find(|shape| shape.hit_test(point, tolerance))
            .map(Shape::id)
    }

    /// Paths whose owning layer is visible, grouped in layer order.
    pub fn visible_paths(&self) -> impl Iterator<Item = &Path> {
        self.layers
            .iter()
            .filter(|layer| layer.visible)
            .flat_map(move |layer| self.paths.iter().filter(move |p| p.layer == layer.id()))
    }

    pub fn shape_count(&self) -> usize {
        self.layers.iter().map(|l| l.shapes.len()).sum()
    }

    /// Check if the design has no shapes and no paths.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.layers.iter().all(|l| l.shapes.is_empty())
    }

    /// Reset to a single empty "Background" layer.
    pub fn clear(&mut self) {
        self.layers = vec![Layer::new(DEFAULT_LAYER_NAME)];
        self.paths.clear();
    }

    /// Serialize the design to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a design from JSON.
    ///
    /// The `version` field is not validated; a payload without layers gets the
    /// default layer so the design stays editable.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut design: Design = serde_json::from_str(json)?;
        design.ensure_base_layer();
        Ok(design)
    }
}
