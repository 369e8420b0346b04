//! Vello scene surface.

use crate::surface::{DrawSurface, RenderResult, RendererError};
use designpad_core::FontSpec;
use kurbo::{Affine, BezPath, Point, Rect, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use vello::Scene;

/// Builds a [`vello::Scene`] from draw calls. Text is laid out with Parley
/// using the system font collection.
pub struct VelloSurface {
    scene: Scene,
    width: u32,
    height: u32,
    /// Font context for text rendering (cached across frames).
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
}

impl VelloSurface {
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RendererError::InitFailed(format!(
                "Surface size must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            scene: Scene::new(),
            width,
            height,
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        })
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }
}

impl DrawSurface for VelloSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RendererError::RenderFailed(format!(
                "Surface size must be non-zero, got {}x{}",
                width, height
            )));
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn clear(&mut self, background: Color) {
        self.scene.reset();
        let rect = Rect::new(0.0, 0.0, self.width as f64, self.height as f64);
        self.scene.fill(Fill::NonZero, Affine::IDENTITY, background, None, &rect);
    }

    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Color) {
        self.scene.fill(Fill::NonZero, transform, color, None, path);
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Color, style: &Stroke) {
        self.scene.stroke(style, transform, color, None, path);
    }

    fn fill_text(&mut self, text: &str, font: &FontSpec, origin: Point, transform: Affine, color: Color) {
        if text.is_empty() {
            return;
        }

        let brush = Brush::Solid(color);
        let font_size = font.size as f32;

        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Source(
            font.family.as_str().into(),
        )));
        let mut layout = builder.build(text);

        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        // Layout y=0 is the top of the text box.
        let text_transform = transform * Affine::translate((origin.x, origin.y));
        let mut glyph_count = 0;

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let run_font = run.font();
                let run_size = run.font_size();
                let glyph_xform = run
                    .synthesis()
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        glyph_count += 1;
                        vello::Glyph { id: glyph.id, x: gx, y: gy }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(run_font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(run_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        // No font matched: mark where the text would be.
        if glyph_count == 0 {
            log::warn!("No glyphs for font '{}', drawing placeholder", font.css());
            let width = text.chars().count() as f64 * font.size * 0.6;
            let height = font.size * 1.2;
            let rect = Rect::new(origin.x, origin.y, origin.x + width.max(20.0), origin.y + height);
            self.scene.fill(Fill::NonZero, transform, Color::from_rgba8(255, 100, 100, 100), None, &rect);
        }
    }
}
