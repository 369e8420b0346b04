//! Shape definitions for designs.

mod color;
mod path;

pub use color::SerializableColor;
pub use path::Path;

use kurbo::{Affine, BezPath, Ellipse, Point, Rect, Shape as KurboShape, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Distance from a shape's top edge to its rotation handle (in canvas units).
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Pick radius around the rotation handle.
pub const HANDLE_HIT_TOLERANCE: f64 = 10.0;

/// Inner/outer radius ratio for stars.
const STAR_INNER_RATIO: f64 = 0.5;

/// Number of outer points on a star.
const STAR_POINTS: usize = 5;

/// Font used by text shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Font size in pixels.
    pub size: f64,
    /// CSS font family.
    pub family: String,
}

impl FontSpec {
    pub const DEFAULT_SIZE: f64 = 16.0;

    pub fn new(size: f64, family: impl Into<String>) -> Self {
        Self {
            size,
            family: family.into(),
        }
    }

    /// CSS font shorthand, e.g. `16px sans-serif`.
    pub fn css(&self) -> String {
        format!("{}px {}", self.size, self.family)
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE, "sans-serif")
    }
}

/// What a shape is. Closed set; renderers match on it exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
    Star,
    /// Segment from `position` to `position + size`.
    Line,
    Text { content: String, font: FontSpec },
}

impl ShapeKind {
    /// Create a text kind with the default font.
    pub fn text(content: impl Into<String>) -> Self {
        ShapeKind::Text {
            content: content.into(),
            font: FontSpec::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Star => "star",
            ShapeKind::Line => "line",
            ShapeKind::Text { .. } => "text",
        }
    }
}

/// A shape placed on a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub(crate) id: ShapeId,
    pub kind: ShapeKind,
    /// Top-left corner of the unrotated box.
    pub position: Point,
    pub size: Size,
    pub fill_color: SerializableColor,
    /// Outline color (None = no outline).
    #[serde(default)]
    pub stroke_color: Option<SerializableColor>,
    /// Rotation angle in radians (around center).
    #[serde(default)]
    pub rotation: f64,
}

impl Shape {
    /// Create a shape with a black fill and no outline.
    pub fn new(kind: ShapeKind, position: Point, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            size,
            fill_color: SerializableColor::black(),
            stroke_color: None,
            rotation: 0.0,
        }
    }

    pub fn with_fill(mut self, color: SerializableColor) -> Self {
        self.fill_color = color;
        self
    }

    pub fn with_stroke(mut self, color: Option<SerializableColor>) -> Self {
        self.stroke_color = color;
        self
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Unrotated bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Transform from shape-local (unrotated) coordinates to canvas coordinates.
    pub fn transform(&self) -> Affine {
        if self.rotation == 0.0 {
            Affine::IDENTITY
        } else {
            Affine::rotate_about(self.rotation, self.center())
        }
    }

    /// Position of the rotation handle, above the top-center, following rotation.
    pub fn rotation_handle(&self) -> Point {
        let center = self.center();
        let dy = -(self.size.height / 2.0 + ROTATE_HANDLE_OFFSET);
        let (sin_r, cos_r) = self.rotation.sin_cos();
        Point::new(center.x - dy * sin_r, center.y + dy * cos_r)
    }

    /// Check if a point is on the rotation handle.
    pub fn hit_rotation_handle(&self, point: Point) -> bool {
        self.rotation_handle().distance(point) <= HANDLE_HIT_TOLERANCE
    }

    /// Check if a canvas point hits this shape.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = self.transform().inverse() * point;
        let bounds = self.bounds();
        match &self.kind {
            ShapeKind::Line => {
                let start = self.position;
                let end = self.position + Vec2::new(self.size.width, self.size.height);
                point_to_segment_dist(local, start, end) <= tolerance.max(1.0)
            }
            ShapeKind::Circle => {
                let rx = bounds.width() / 2.0 + tolerance;
                let ry = bounds.height() / 2.0 + tolerance;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let d = local - bounds.center();
                (d.x / rx).powi(2) + (d.y / ry).powi(2) <= 1.0
            }
            ShapeKind::Rectangle | ShapeKind::Triangle | ShapeKind::Star | ShapeKind::Text { .. } => {
                bounds.inflate(tolerance, tolerance).contains(local)
            }
        }
    }

    /// Outline in shape-local coordinates. Text has no outline.
    pub fn outline(&self) -> Option<BezPath> {
        let bounds = self.bounds();
        match &self.kind {
            ShapeKind::Rectangle => Some(bounds.to_path(0.1)),
            ShapeKind::Circle => Some(Ellipse::from_rect(bounds).to_path(0.1)),
            ShapeKind::Triangle => {
                let mut path = BezPath::new();
                path.move_to(Point::new(bounds.center().x, bounds.y0));
                path.line_to(Point::new(bounds.x1, bounds.y1));
                path.line_to(Point::new(bounds.x0, bounds.y1));
                path.close_path();
                Some(path)
            }
            ShapeKind::Star => Some(star_path(bounds)),
            ShapeKind::Line => {
                let mut path = BezPath::new();
                path.move_to(self.position);
                path.line_to(self.position + Vec2::new(self.size.width, self.size.height));
                Some(path)
            }
            ShapeKind::Text { .. } => None,
        }
    }

    /// Move so that the top-left corner lands on `position`.
    pub fn move_to(&mut self, position: Point) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, angle: f64) {
        self.rotation = angle;
    }
}

/// Five-pointed star inscribed in `bounds`, first point up.
fn star_path(bounds: Rect) -> BezPath {
    let center = bounds.center();
    let outer = bounds.width().min(bounds.height()) / 2.0;
    let inner = outer * STAR_INNER_RATIO;
    let step = std::f64::consts::PI / STAR_POINTS as f64;

    let mut path = BezPath::new();
    for i in 0..STAR_POINTS * 2 {
        let radius = if i % 2 == 0 { outer } else { inner };
        let angle = -std::f64::consts::FRAC_PI_2 + step * i as f64;
        let p = Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin());
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    point.distance(proj)
}
