//! Freehand stroke.

use super::{SerializableColor, point_to_segment_dist};
use crate::layer::LayerId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A freehand stroke (series of points) owned by a layer.
///
/// Built incrementally while a draw gesture is active and left untouched once
/// committed to a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Points in drawing order.
    pub points: Vec<Point>,
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    /// Owning layer.
    pub layer: LayerId,
}

impl Path {
    /// Create a new empty stroke on `layer`.
    pub fn new(layer: LayerId, stroke_color: SerializableColor, stroke_width: f64) -> Self {
        Self {
            points: Vec::new(),
            stroke_color,
            stroke_width,
            layer,
        }
    }

    /// Create from existing points.
    pub fn from_points(layer: LayerId, points: Vec<Point>) -> Self {
        Self {
            points,
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            layer,
        }
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Single-point strokes are clicks, not drawings.
    pub fn is_committable(&self) -> bool {
        self.points.len() > 1
    }

    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let reach = tolerance + self.stroke_width / 2.0;
        match self.points.as_slice() {
            [] => false,
            [only] => only.distance(point) <= reach,
            points => points
                .windows(2)
                .any(|w| point_to_segment_dist(point, w[0], w[1]) <= reach),
        }
    }
}
