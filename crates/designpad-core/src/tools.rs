//! Tool modes and the style applied to new content.

use crate::config::EditorConfig;
use crate::shapes::{FontSpec, SerializableColor, ShapeKind};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Available tools. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Select,
    Draw,
    Shape,
    Text,
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Draw => "draw",
            ToolKind::Shape => "shape",
            ToolKind::Text => "text",
        }
    }
}

/// Default size of shapes placed with the shape tool.
pub const DEFAULT_SHAPE_SIZE: Size = Size::new(100.0, 100.0);

/// Style and content applied to newly created strokes, shapes and text.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    pub fill_color: SerializableColor,
    /// Outline for new shapes (None = fill only).
    pub shape_stroke: Option<SerializableColor>,
    /// Kind placed by the shape tool.
    pub shape_kind: ShapeKind,
    pub shape_size: Size,
    /// Content placed by the text tool.
    pub text: String,
    pub font: FontSpec,
}

impl ToolSettings {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            stroke_color: config.default_stroke_color,
            stroke_width: config.default_stroke_width,
            fill_color: config.default_fill_color,
            ..Self::default()
        }
    }
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: SerializableColor::black(),
            shape_stroke: None,
            shape_kind: ShapeKind::Rectangle,
            shape_size: DEFAULT_SHAPE_SIZE,
            text: String::new(),
            font: FontSpec::default(),
        }
    }
}
