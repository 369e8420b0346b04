//! Draws a design onto a [`DrawSurface`].

use crate::smoothing::smoothed_path;
use crate::surface::DrawSurface;
use designpad_core::config::DEFAULT_SMOOTHING;
use designpad_core::shapes::HANDLE_HIT_TOLERANCE;
use designpad_core::{Design, EditorSession, Path, Shape, ShapeId, ShapeKind};
use kurbo::{Affine, Cap, Circle, Join, Shape as KurboShape, Stroke};
use peniko::Color;

/// Outline width for shapes with a stroke color.
pub const SHAPE_STROKE_WIDTH: f64 = 2.0;

/// Context for a single render pass.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub design: &'a Design,
    /// Stroke still being drawn, drawn on top of everything.
    pub preview: Option<&'a Path>,
    /// Freehand smoothing factor in `[0, 1]`.
    pub smoothing: f64,
    pub background_color: Color,
    /// Shape to outline with its rotation handle.
    pub selection: Option<ShapeId>,
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    pub fn new(design: &'a Design) -> Self {
        Self {
            design,
            preview: None,
            smoothing: DEFAULT_SMOOTHING,
            background_color: Color::WHITE,
            selection: None,
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
        }
    }

    /// Context for the current state of an editing session.
    pub fn from_session(session: &'a EditorSession) -> Self {
        Self::new(session.design())
            .with_preview(session.active_path())
            .with_smoothing(session.config().smoothing)
            .with_selection(session.selection())
    }

    pub fn with_preview(mut self, preview: Option<&'a Path>) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_selection(mut self, selection: Option<ShapeId>) -> Self {
        self.selection = selection;
        self
    }
}

fn round_stroke(width: f64) -> Stroke {
    Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round)
}

/// Clear the surface and redraw the whole design.
///
/// Visible layers' shapes come first, bottom to top, then the freehand paths
/// of visible layers, then the in-progress stroke. The same context always
/// produces the same draw calls.
pub fn render<S: DrawSurface + ?Sized>(surface: &mut S, ctx: &RenderContext<'_>) {
    surface.clear(ctx.background_color);

    let mut shapes = 0;
    for layer in ctx.design.layers.iter().filter(|l| l.visible) {
        for shape in &layer.shapes {
            render_shape(surface, shape);
            shapes += 1;
        }
    }

    let mut paths = 0;
    for path in ctx.design.visible_paths() {
        render_path(surface, path, ctx.smoothing);
        paths += 1;
    }

    if let Some(preview) = ctx.preview {
        render_path(surface, preview, ctx.smoothing);
    }

    if let Some((layer, shape)) = ctx.selection.and_then(|id| ctx.design.shape(id)) {
        if layer.visible {
            render_selection(surface, shape, ctx.selection_color);
        }
    }

    log::trace!("Rendered {} shapes and {} paths", shapes, paths);
}

fn render_shape<S: DrawSurface + ?Sized>(surface: &mut S, shape: &Shape) {
    let transform = shape.transform();
    let fill = Color::from(shape.fill_color);

    match &shape.kind {
        ShapeKind::Text { content, font } => {
            surface.fill_text(content, font, shape.position, transform, fill);
        }
        ShapeKind::Line => {
            let Some(outline) = shape.outline() else { return };
            let color = shape.stroke_color.map_or(fill, Color::from);
            surface.stroke_path(&outline, transform, color, &round_stroke(SHAPE_STROKE_WIDTH));
        }
        ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Triangle | ShapeKind::Star => {
            let Some(outline) = shape.outline() else { return };
            surface.fill_path(&outline, transform, fill);
            if let Some(stroke) = shape.stroke_color {
                surface.stroke_path(&outline, transform, stroke.into(), &Stroke::new(SHAPE_STROKE_WIDTH));
            }
        }
    }
}

fn render_path<S: DrawSurface + ?Sized>(surface: &mut S, path: &Path, smoothing: f64) {
    let Some(curve) = smoothed_path(&path.points, smoothing) else {
        return;
    };
    surface.stroke_path(
        &curve,
        Affine::IDENTITY,
        path.stroke_color.into(),
        &round_stroke(path.stroke_width),
    );
}

fn render_selection<S: DrawSurface + ?Sized>(surface: &mut S, shape: &Shape, color: Color) {
    let transform = shape.transform();
    let outline = shape.bounds().inflate(4.0, 4.0).to_path(0.1);
    surface.stroke_path(&outline, transform, color, &Stroke::new(1.0));

    // The handle position already includes the rotation.
    let handle = Circle::new(shape.rotation_handle(), HANDLE_HIT_TOLERANCE / 2.0).to_path(0.1);
    surface.fill_path(&handle, Affine::IDENTITY, Color::WHITE);
    surface.stroke_path(&handle, Affine::IDENTITY, color, &Stroke::new(1.5));
}
