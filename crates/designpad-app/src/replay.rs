//! Scripted editing sessions.
//!
//! A script is a JSON object with a list of steps, each tagged by `action`:
//!
//! ```json
//! {"steps": [
//!   {"action": "tool", "tool": "shape"},
//!   {"action": "input", "event": {"type": "pointer_down", "position": {"x": 50, "y": 50}}},
//!   {"action": "fill", "color": "#ff0000"}
//! ]}
//! ```

use crate::error::CliError;
use designpad_core::{EditorSession, FontSpec, InputEvent, SerializableColor, ShapeKind, ToolKind};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    pub steps: Vec<ReplayStep>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReplayStep {
    Tool { tool: ToolKind },
    Input { event: InputEvent },
    Undo,
    Redo,
    Snap { enabled: bool },
    /// Fill for new shapes and the selected shape.
    Fill { color: String },
    /// Outline for new shapes and the selected shape (`null` removes it).
    Stroke { color: Option<String> },
    /// Freehand stroke color and width.
    Pen {
        color: String,
        #[serde(default)]
        width: Option<f64>,
    },
    Shape { kind: ShapeKind },
    Text {
        content: String,
        #[serde(default)]
        font: Option<FontSpec>,
    },
    AddLayer { name: String },
    Delete,
    Clear,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        let script_error = |message: String| CliError::Script {
            path: path.display().to_string(),
            message,
        };
        let json = std::fs::read_to_string(path).map_err(|e| script_error(e.to_string()))?;
        Self::from_json(&json).map_err(|e| script_error(e.to_string()))
    }

    /// Apply every step in order. Returns how many steps committed a change.
    pub fn run(&self, session: &mut EditorSession) -> Result<usize, CliError> {
        let mut committed = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if apply_step(session, step).map_err(|message| CliError::Step { index, message })? {
                committed += 1;
            }
        }
        log::info!("Replayed {} steps, {} committed", self.steps.len(), committed);
        Ok(committed)
    }
}

fn parse_color(color: &str) -> Result<SerializableColor, String> {
    SerializableColor::from_hex(color).ok_or_else(|| format!("Invalid color '{}'", color))
}

/// Apply one step. Returns whether it committed a change to the design.
fn apply_step(session: &mut EditorSession, step: &ReplayStep) -> Result<bool, String> {
    let committed = match step {
        ReplayStep::Tool { tool } => {
            session.set_tool(*tool);
            false
        }
        ReplayStep::Input { event } => session.handle_input(event).committed,
        ReplayStep::Undo => session.undo().redraw,
        ReplayStep::Redo => session.redo().redraw,
        ReplayStep::Snap { enabled } => {
            session.set_snap_to_grid(*enabled);
            false
        }
        ReplayStep::Fill { color } => session.set_fill_color(parse_color(color)?).committed,
        ReplayStep::Stroke { color } => {
            let color = color.as_deref().map(parse_color).transpose()?;
            session.set_stroke_color(color).committed
        }
        ReplayStep::Pen { color, width } => {
            session.tools.stroke_color = parse_color(color)?;
            if let Some(width) = width {
                if *width <= 0.0 {
                    return Err(format!("Stroke width must be positive, got {}", width));
                }
                session.tools.stroke_width = *width;
            }
            false
        }
        ReplayStep::Shape { kind } => {
            session.tools.shape_kind = kind.clone();
            false
        }
        ReplayStep::Text { content, font } => {
            session.tools.text = content.clone();
            if let Some(font) = font {
                session.tools.font = font.clone();
            }
            false
        }
        ReplayStep::AddLayer { name } => {
            session.add_layer(name.as_str());
            true
        }
        ReplayStep::Delete => session.delete_selected().committed,
        ReplayStep::Clear => session.clear().committed,
    };
    Ok(committed)
}
