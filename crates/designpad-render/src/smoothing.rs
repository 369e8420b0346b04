//! Freehand stroke smoothing.

use kurbo::{BezPath, Point};

/// Build a smoothed curve through freehand points.
///
/// Interior points act as quadratic control points with each segment ending
/// between `p[i]` and the midpoint of `p[i]`/`p[i + 1]`, weighted by
/// `smoothing` (1.0 = the midpoint, 0.0 = the point itself). The final
/// segment runs through `p[len - 2]` to the last point.
///
/// Two points give a straight segment; fewer give nothing to draw.
pub fn smoothed_path(points: &[Point], smoothing: f64) -> Option<BezPath> {
    let (&first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }

    let mut path = BezPath::new();
    path.move_to(first);

    let len = points.len();
    if len == 2 {
        path.line_to(points[1]);
        return Some(path);
    }

    let t = smoothing.clamp(0.0, 1.0);
    for i in 1..len - 2 {
        let control = points[i];
        let mid = control.midpoint(points[i + 1]);
        path.quad_to(control, control.lerp(mid, t));
    }
    path.quad_to(points[len - 2], points[len - 1]);
    Some(path)
}
