//! Drawing surface abstraction.

use designpad_core::FontSpec;
use kurbo::{Affine, BezPath, Point, Stroke};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// A 2D target the renderer draws onto.
///
/// Geometry arrives in canvas coordinates together with the transform to
/// apply; surfaces never see the design model.
pub trait DrawSurface {
    /// Pixel size as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Change the pixel size. Zero dimensions are rejected.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;

    /// Drop everything drawn so far and paint the background.
    fn clear(&mut self, background: Color);

    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Color);

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Color, style: &Stroke);

    /// Draw text with its top-left corner at `origin`.
    fn fill_text(&mut self, text: &str, font: &FontSpec, origin: Point, transform: Affine, color: Color);
}
