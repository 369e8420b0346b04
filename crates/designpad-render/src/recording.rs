//! A surface that records draw calls instead of rasterizing them.

use crate::surface::{DrawSurface, RenderResult, RendererError};
use designpad_core::FontSpec;
use kurbo::{Affine, BezPath, Cap, Point, Stroke};
use peniko::Color;
use std::fmt;

/// One recorded draw call. Colors are stored as RGBA8.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        color: [u8; 4],
    },
    Fill {
        path: BezPath,
        transform: Affine,
        color: [u8; 4],
    },
    Stroke {
        path: BezPath,
        transform: Affine,
        color: [u8; 4],
        width: f64,
        cap: Cap,
    },
    Text {
        text: String,
        /// CSS font shorthand.
        font: String,
        origin: Point,
        transform: Affine,
        color: [u8; 4],
    },
}

fn rgba(color: Color) -> [u8; 4] {
    color.to_rgba8().to_u8_array()
}

fn hex(color: &[u8; 4]) -> String {
    format!("#{:02x}{:02x}{:02x}{:02x}", color[0], color[1], color[2], color[3])
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCommand::Clear { color } => write!(f, "clear {}", hex(color)),
            DrawCommand::Fill { path, color, .. } => {
                write!(f, "fill {} ({} segments)", hex(color), path.elements().len())
            }
            DrawCommand::Stroke { path, color, width, .. } => {
                write!(f, "stroke {} w={} ({} segments)", hex(color), width, path.elements().len())
            }
            DrawCommand::Text { text, font, origin, color, .. } => {
                write!(f, "text {:?} '{}' at ({}, {}) {}", text, font, origin.x, origin.y, hex(color))
            }
        }
    }
}

/// Records every draw call in order.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        check_size(width, height).map_err(RendererError::InitFailed)?;
        Ok(Self {
            width,
            height,
            commands: Vec::new(),
        })
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

fn check_size(width: u32, height: u32) -> Result<(), String> {
    if width == 0 || height == 0 {
        return Err(format!("Surface size must be non-zero, got {}x{}", width, height));
    }
    Ok(())
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        check_size(width, height).map_err(RendererError::RenderFailed)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn clear(&mut self, background: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { color: rgba(background) });
    }

    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Color) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            transform,
            color: rgba(color),
        });
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Color, style: &Stroke) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            transform,
            color: rgba(color),
            width: style.width,
            cap: style.start_cap,
        });
    }

    fn fill_text(&mut self, text: &str, font: &FontSpec, origin: Point, transform: Affine, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            font: font.css(),
            origin,
            transform,
            color: rgba(color),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(RecordingSurface::new(0, 10), Err(RendererError::InitFailed(_))));
        let mut surface = RecordingSurface::new(10, 10).unwrap();
        assert!(surface.resize(10, 0).is_err());
        assert_eq!(surface.size(), (10, 10));
    }

    #[test]
    fn test_clear_resets_commands() {
        let mut surface = RecordingSurface::new(10, 10).unwrap();
        surface.fill_path(&BezPath::new(), Affine::IDENTITY, Color::BLACK);
        surface.clear(Color::WHITE);
        assert_eq!(surface.commands(), &[DrawCommand::Clear { color: [255, 255, 255, 255] }]);
    }

    #[test]
    fn test_resize_keeps_commands() {
        let mut surface = RecordingSurface::new(10, 10).unwrap();
        surface.clear(Color::WHITE);
        surface.resize(640, 480).unwrap();
        assert_eq!(surface.size(), (640, 480));
        assert_eq!(surface.commands().len(), 1);
    }

    #[test]
    fn test_display() {
        let command = DrawCommand::Clear { color: [255, 0, 0, 255] };
        assert_eq!(command.to_string(), "clear #ff0000ff");
    }
}
