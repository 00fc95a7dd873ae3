// Link geometry.
//
// A link leaves the child's input port (left edge, vertically centered) and
// ends at the parent's output port (right edge of the parent's pill). Both
// control points sit on the horizontal midpoint, which bends the curve into
// an S whenever parent and child are on different rows.
//
// All points here are in screen space: x = depth axis, y = breadth axis.

use serde::Serialize;

use crate::layout::PointF;
use super::tween::Lerp;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct CubicPath {
    pub start: PointF,
    pub c1: PointF,
    pub c2: PointF,
    pub end: PointF,
}

impl CubicPath {
    /// SVG path data, e.g. `M 10 20 C 30 20, 30 40, 50 40`.
    pub fn to_svg(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            fmt_coord(self.start.x),
            fmt_coord(self.start.y),
            fmt_coord(self.c1.x),
            fmt_coord(self.c1.y),
            fmt_coord(self.c2.x),
            fmt_coord(self.c2.y),
            fmt_coord(self.end.x),
            fmt_coord(self.end.y),
        )
    }
}

impl Lerp for CubicPath {
    fn lerp(self, to: Self, t: f64) -> Self {
        CubicPath {
            start: self.start.lerp(to.start, t),
            c1: self.c1.lerp(to.c1, t),
            c2: self.c2.lerp(to.c2, t),
            end: self.end.lerp(to.end, t),
        }
    }
}

// Two decimals is plenty for SVG and keeps the frame payload small.
fn fmt_coord(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 { "0".to_string() } else { rounded.to_string() }
}

/// Curve from `child` to the output port of `parent`.
pub fn diagonal(child: PointF, parent: PointF, parent_width: f64) -> CubicPath {
    let child_left = child.x;
    let parent_right = parent.x + parent_width;
    let mid = (child_left + parent_right) / 2.0;
    CubicPath {
        start: PointF::new(child_left, child.y),
        c1: PointF::new(mid, child.y),
        c2: PointF::new(mid, parent.y),
        end: PointF::new(parent_right, parent.y),
    }
}

/// Degenerate link folded into a single node, used as the start of an
/// entering link and the end of an exiting one.
pub fn folded(at: PointF, width: f64) -> CubicPath {
    diagonal(at, at, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_control_points() {
        let p = diagonal(PointF::new(220.0, 75.0), PointF::new(0.0, 150.0), 32.0);
        assert_eq!(p.start, PointF::new(220.0, 75.0));
        assert_eq!(p.c1, PointF::new(126.0, 75.0));
        assert_eq!(p.c2, PointF::new(126.0, 150.0));
        assert_eq!(p.end, PointF::new(32.0, 150.0));
    }

    #[test]
    fn test_svg_output() {
        let p = diagonal(PointF::new(220.0, 75.5), PointF::new(0.0, 150.0), 32.0);
        assert_eq!(p.to_svg(), "M 220 75.5 C 126 75.5, 126 150, 32 150");
    }

    #[test]
    fn test_folded_is_flat() {
        let p = folded(PointF::new(10.0, 40.0), 30.0);
        assert!([p.start, p.c1, p.c2, p.end].iter().all(|q| q.y == 40.0));
        assert_eq!(p.end.x, 40.0);
    }
}
