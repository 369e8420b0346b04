//! Grid snapping.

use kurbo::Point;

/// Default grid pitch for snapping.
pub const GRID_SIZE: f64 = 20.0;

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, pitch: f64) -> Point {
    if pitch <= 0.0 {
        return point;
    }
    Point::new(
        (point.x / pitch).round() * pitch,
        (point.y / pitch).round() * pitch,
    )
}

/// Snap only when enabled.
pub fn snap_point(point: Point, pitch: f64, enabled: bool) -> Point {
    if enabled { snap_to_grid(point, pitch) } else { point }
}
