//! DesignPad Render Library
//!
//! Draws designs onto an abstract 2D surface. The recording surface captures
//! draw commands; the Vello surface builds a GPU scene.

mod recording;
mod renderer;
mod smoothing;
mod surface;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use recording::{DrawCommand, RecordingSurface};
pub use renderer::{RenderContext, SHAPE_STROKE_WIDTH, render};
pub use smoothing::smoothed_path;
pub use surface::{DrawSurface, RenderResult, RendererError};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloSurface;
