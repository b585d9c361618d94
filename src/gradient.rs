//! Gradient geometry.
//!
//! Gradients use `userSpaceOnUse` coordinates, so the vector (linear) or circle
//! (radial) is computed against the bounding box of the region being filled.

use std::f64::consts::{FRAC_PI_4, TAU};

use kurbo::{Point, Rect};
use serde::Serialize;

use crate::options::{Gradient, GradientType};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GradientGeometry {
    Linear { x1: f64, y1: f64, x2: f64, y2: f64 },
    Radial { cx: f64, cy: f64, fx: f64, fy: f64, r: f64 },
}

impl GradientGeometry {
    /// Start and end points of a linear gradient.
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        match *self {
            GradientGeometry::Linear { x1, y1, x2, y2 } => Some((Point::new(x1, y1), Point::new(x2, y2))),
            GradientGeometry::Radial { .. } => None,
        }
    }
}

/// Computes the geometry for `gradient` mapped into `bounds`.
///
/// `additional_rotation` is added to the gradient's own rotation; corner markers use it
/// so one gradient spec follows each corner's orientation.
pub fn compute_gradient(gradient: &Gradient, bounds: Rect, additional_rotation: f64) -> GradientGeometry {
    match gradient.kind {
        GradientType::Radial => radial(bounds),
        GradientType::Linear => linear(bounds, gradient.rotation + additional_rotation),
    }
}

fn radial(bounds: Rect) -> GradientGeometry {
    let center = bounds.center();
    let size = bounds.width().max(bounds.height());
    GradientGeometry::Radial { cx: center.x, cy: center.y, fx: center.x, fy: center.y, r: size / 2.0 }
}

/// The gradient line runs through the box center and touches the box edges.
///
/// Between -45° and 45° (and the mirrored range around 180°) the endpoints sit on the
/// left and right edges and slide vertically by `tan(rotation)`. Between 45° and 135°
/// (and around 270°) they sit on the top and bottom edges and slide horizontally by
/// `1 / tan(rotation)`. Both formulas agree on the diagonals, so the output is
/// continuous, and neither divides by a vanishing tangent inside its own range.
fn linear(bounds: Rect, rotation: f64) -> GradientGeometry {
    let rotation = if rotation.is_finite() { rotation.rem_euclid(TAU) } else { 0.0 };
    let center = bounds.center();
    let half_w = bounds.width() / 2.0;
    let half_h = bounds.height() / 2.0;

    let (dx, dy) = if rotation <= FRAC_PI_4 || rotation > 7.0 * FRAC_PI_4 {
        (half_w, half_h * rotation.tan())
    } else if rotation <= 3.0 * FRAC_PI_4 {
        (half_w / rotation.tan(), half_h)
    } else if rotation <= 5.0 * FRAC_PI_4 {
        (-half_w, -half_h * rotation.tan())
    } else {
        (-half_w / rotation.tan(), -half_h)
    };

    // Whole pixels keep re-renders stable.
    GradientGeometry::Linear {
        x1: (center.x - dx).round(),
        y1: (center.y - dy).round(),
        x2: (center.x + dx).round(),
        y2: (center.y + dy).round(),
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::options::ColorStop;

    fn stops() -> Vec<ColorStop> {
        vec![ColorStop::new(0.0, "#000"), ColorStop::new(1.0, "#fff")]
    }

    fn endpoints(rotation: f64, bounds: Rect) -> (Point, Point) {
        compute_gradient(&Gradient::linear(rotation, stops()), bounds, 0.0)
            .endpoints()
            .unwrap()
    }

    #[test]
    fn test_zero_rotation_spans_horizontal_midline() {
        let bounds = Rect::new(10.0, 20.0, 110.0, 80.0);
        let (start, end) = endpoints(0.0, bounds);
        assert_eq!(start, Point::new(10.0, 50.0));
        assert_eq!(end, Point::new(110.0, 50.0));
    }

    #[test]
    fn test_right_angle_spans_vertical_midline() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 60.0);
        let (start, end) = endpoints(PI / 2.0, bounds);
        assert_eq!(start, Point::new(50.0, 0.0));
        assert_eq!(end, Point::new(50.0, 60.0));
    }

    #[test]
    fn test_half_turn_reverses_direction() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (start, end) = endpoints(PI, bounds);
        assert_eq!(start, Point::new(100.0, 50.0));
        assert_eq!(end, Point::new(0.0, 50.0));
    }

    #[test]
    fn test_diagonal_hits_corners() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (start, end) = endpoints(FRAC_PI_4, bounds);
        assert_eq!(start, Point::new(0.0, 0.0));
        assert_eq!(end, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_continuous_across_quadrant_boundaries() {
        let bounds = Rect::new(0.0, 0.0, 200.0, 120.0);
        for boundary in [0.0, FRAC_PI_4, 3.0 * FRAC_PI_4, 5.0 * FRAC_PI_4, 7.0 * FRAC_PI_4] {
            let (a0, a1) = endpoints(boundary - 1e-6, bounds);
            let (b0, b1) = endpoints(boundary + 1e-6, bounds);
            assert!(a0.distance(b0) <= 1.5, "start jumps at {boundary}: {a0:?} vs {b0:?}");
            assert!(a1.distance(b1) <= 1.5, "end jumps at {boundary}: {a1:?} vs {b1:?}");
        }
    }

    #[test]
    fn test_endpoints_stay_on_box_edges() {
        let bounds = Rect::new(0.0, 0.0, 80.0, 40.0);
        for step in 0..64 {
            let rotation = step as f64 * TAU / 64.0;
            let (start, end) = endpoints(rotation, bounds);
            for p in [start, end] {
                assert!(p.x >= -1.0 && p.x <= 81.0 && p.y >= -1.0 && p.y <= 41.0, "{p:?} at {rotation}");
                let on_vertical = p.x.abs() < 1.0 || (p.x - 80.0).abs() < 1.0;
                let on_edge = on_vertical || p.y.abs() < 1.0 || (p.y - 40.0).abs() < 1.0;
                assert!(on_edge, "{p:?} at {rotation}");
            }
        }
    }

    #[test]
    fn test_additional_rotation_composes() {
        let bounds = Rect::new(0.0, 0.0, 70.0, 70.0);
        let gradient = Gradient::linear(PI / 2.0, stops());
        let combined = compute_gradient(&gradient, bounds, PI / 2.0);
        assert_eq!(combined, compute_gradient(&Gradient::linear(PI, stops()), bounds, 0.0));
        // Negative totals normalize into [0, 2π).
        let negative = compute_gradient(&Gradient::linear(0.0, stops()), bounds, -PI / 2.0);
        assert_eq!(negative, compute_gradient(&Gradient::linear(3.0 * PI / 2.0, stops()), bounds, 0.0));
    }

    #[test]
    fn test_degenerate_inputs_stay_finite() {
        let (start, end) = endpoints(f64::NAN, Rect::new(5.0, 5.0, 5.0, 5.0));
        assert_eq!(start, Point::new(5.0, 5.0));
        assert_eq!(end, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_radial_uses_larger_side() {
        let geometry = compute_gradient(&Gradient::radial(stops()), Rect::new(0.0, 0.0, 30.0, 50.0), 1.0);
        assert_eq!(geometry, GradientGeometry::Radial { cx: 15.0, cy: 25.0, fx: 15.0, fy: 25.0, r: 25.0 });
    }
}
