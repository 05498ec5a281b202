//! Polar geometry for the chart: points on the circle, wedge outlines and label connectors.
//!
//! Angles are in degrees, measured clockwise from 12 o'clock, with y growing downwards
//! (SVG and cairo user space).

use crate::string_newtype;

/// Path emitted when a wedge cannot be described with finite numbers.
pub const FALLBACK_WEDGE_PATH: &str = "M 0 0";
/// Arc segment emitted when the outer arc cannot be described with finite numbers.
pub const FALLBACK_ARC: &str = "A 0 0 0 0 1 0 0";

const CONNECTOR_MIN_CURVE: f64 = 0.2;
const CONNECTOR_MAX_CURVE: f64 = 0.5;
const CONNECTOR_CURVE_DISTANCE: f64 = 400.0;
const CONNECTOR_MARKER_GAP: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Axis-aligned rectangle, `(x, y)` being the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

string_newtype!(
    /// SVG path data (`d` attribute).
    pub PathData
);

impl PathData {
    pub fn is_fallback(&self) -> bool {
        self.as_str() == FALLBACK_WEDGE_PATH
    }
}

/// Converts a chart angle to a point `radius` away from `center`.
///
/// Negative radii are clamped to zero. Non-finite input degrades to `center` so that a bad value
/// never reaches the scene.
pub fn polar_to_cartesian(center: Point, radius: f64, angle_degrees: f64) -> Point {
    if !(center.is_finite() && radius.is_finite() && angle_degrees.is_finite()) {
        log::warn!(
            "non-finite polar input: center={center:?} radius={radius} angle={angle_degrees}"
        );
        return if center.is_finite() {
            center
        } else {
            Point::default()
        };
    }

    let radians = (angle_degrees.rem_euclid(360.0) - 90.0).to_radians();
    let radius = radius.max(0.0);
    Point::new(
        center.x + radius * radians.cos(),
        center.y + radius * radians.sin(),
    )
}

/// Mid-point angle of a span, normalised to `[0, 360)`.
pub fn mid_angle(start: f64, end: f64) -> f64 {
    (start + (end - start) / 2.0).rem_euclid(360.0)
}

fn outer_arc(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> String {
    let end = polar_to_cartesian(center, radius, end_angle);
    let large_arc = if end_angle - start_angle > 180.0 { 1 } else { 0 };
    let radius = radius.max(0.0);
    if !(radius.is_finite() && end.is_finite()) {
        log::warn!("degenerate outer arc: radius={radius} end={end:?}");
        return FALLBACK_ARC.to_string();
    }
    format!(
        "A {r} {r} 0 {large_arc} 1 {x} {y}",
        r = fmt_number(radius),
        x = fmt_number(end.x),
        y = fmt_number(end.y)
    )
}

/// A pie slice: two radii from `center` closed by the clockwise outer arc.
pub fn wedge_path(center: Point, outer_radius: f64, start_angle: f64, end_angle: f64) -> PathData {
    if [center.x, center.y, outer_radius, start_angle, end_angle]
        .iter()
        .any(|v| !v.is_finite())
    {
        log::warn!(
            "invalid wedge input: center={center:?} r={outer_radius} start={start_angle} end={end_angle}"
        );
        return PathData::new(FALLBACK_WEDGE_PATH);
    }

    let radius = outer_radius.max(0.0);
    let outer_start = polar_to_cartesian(center, radius, start_angle);
    let arc = outer_arc(center, radius, start_angle, end_angle);

    PathData::new(format!(
        "M {cx} {cy} L {sx} {sy} {arc} Z",
        cx = fmt_number(center.x),
        cy = fmt_number(center.y),
        sx = fmt_number(outer_start.x),
        sy = fmt_number(outer_start.y),
    ))
}

/// Control point of the connector curve between `start` and `end`.
///
/// The point sits on the perpendicular through the midpoint; its offset grows with the distance
/// and is clamped to `[0.2, 0.5]` of it.
pub fn connector_control_point(start: Point, end: Point) -> Point {
    let (dx, dy) = (end.x - start.x, end.y - start.y);
    let distance = dx.hypot(dy);
    let curve = (distance / CONNECTOR_CURVE_DISTANCE).clamp(CONNECTOR_MIN_CURVE, CONNECTOR_MAX_CURVE);
    let mid = Point::new(start.x + dx * 0.5, start.y + dy * 0.5);
    Point::new(mid.x - dy * curve, mid.y + dx * curve)
}

/// Quadratic curve from `start` to `end`, bulging to the left of the travel direction.
pub fn curved_connector(start: Point, end: Point) -> PathData {
    let control = connector_control_point(start, end);
    if !(start.is_finite() && end.is_finite() && control.is_finite()) {
        log::warn!("degenerate connector: start={start:?} end={end:?}");
        return PathData::new(FALLBACK_WEDGE_PATH);
    }
    PathData::new(format!(
        "M {} {} Q {} {}, {} {}",
        fmt_number(start.x),
        fmt_number(start.y),
        fmt_number(control.x),
        fmt_number(control.y),
        fmt_number(end.x),
        fmt_number(end.y)
    ))
}

/// Where a connector leaves its marker: just outside the marker circle, on the ray from the
/// chart centre through the marker.
pub fn connector_start(center: Point, marker: Point, marker_radius: f64) -> Point {
    let angle = (marker.y - center.y).atan2(marker.x - center.x);
    let gap = marker_radius + CONNECTOR_MARKER_GAP;
    Point::new(marker.x + gap * angle.cos(), marker.y + gap * angle.sin())
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
pub fn fmt_number(v: f64) -> String {
    if !v.is_finite() || v.abs() < 0.0005 {
        return "0".to_string();
    }
    let mut s = format!("{:.3}", (v * 1000.0).round() / 1000.0);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        return "0".to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: Point = Point { x: 300.0, y: 300.0 };

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_zero_degrees_is_twelve_o_clock() {
        let p = polar_to_cartesian(C, 100.0, 0.0);
        assert!(approx(p, Point::new(300.0, 200.0)));

        let p = polar_to_cartesian(C, 100.0, 90.0);
        assert!(approx(p, Point::new(400.0, 300.0)));
    }

    #[test]
    fn test_polar_is_periodic() {
        for angle in [0.0, 12.5, 90.0, 181.0, 359.0, -45.0] {
            for r in [0.0, 1.0, 73.25, 240.0] {
                let a = polar_to_cartesian(C, r, angle);
                let b = polar_to_cartesian(C, r, angle + 360.0);
                assert!(approx(a, b), "angle={angle} r={r}: {a:?} vs {b:?}");
            }
        }
        // Whole degrees reduce exactly.
        assert_eq!(
            polar_to_cartesian(C, 50.0, 30.0),
            polar_to_cartesian(C, 50.0, 390.0)
        );
    }

    #[test]
    fn test_polar_clamps_and_degrades() {
        assert_eq!(polar_to_cartesian(C, -10.0, 45.0), C);
        assert_eq!(polar_to_cartesian(C, f64::NAN, 45.0), C);
        assert_eq!(polar_to_cartesian(C, 10.0, f64::INFINITY), C);
    }

    #[test]
    fn test_wedge_path_shape() {
        let d = wedge_path(C, 100.0, 0.0, 90.0);
        assert_eq!(d.as_str(), "M 300 300 L 300 200 A 100 100 0 0 1 400 300 Z");

        let d = wedge_path(C, 100.0, 0.0, 270.0);
        assert!(d.contains("A 100 100 0 1 1"));
    }

    #[test]
    fn test_wedge_path_never_contains_nan() {
        let mut angle = -720.0;
        while angle < 720.0 {
            for r in [0.0, 0.001, 1.0, 99.5, 1e6] {
                let d = wedge_path(C, r, angle, angle + 51.47);
                assert!(!d.contains("NaN"), "{d}");
                assert!(!d.contains("inf"), "{d}");
            }
            angle += 17.3;
        }
    }

    #[test]
    fn test_wedge_path_fallback() {
        assert!(wedge_path(C, f64::NAN, 0.0, 10.0).is_fallback());
        assert!(wedge_path(Point::new(f64::NAN, 0.0), 10.0, 0.0, 10.0).is_fallback());
    }

    #[test]
    fn test_connector_curvature_is_clamped() {
        let start = Point::new(0.0, 0.0);

        // Short: 0.2 of the distance.
        let c = connector_control_point(start, Point::new(10.0, 0.0));
        assert!(approx(c, Point::new(5.0, 2.0)));

        // Long: capped at 0.5.
        let c = connector_control_point(start, Point::new(1000.0, 0.0));
        assert!(approx(c, Point::new(500.0, 500.0)));

        // In between: distance / 400.
        let c = connector_control_point(start, Point::new(120.0, 0.0));
        assert!(approx(c, Point::new(60.0, 36.0)));

        assert_eq!(
            curved_connector(start, Point::new(10.0, 0.0)).as_str(),
            "M 0 0 Q 5 2, 10 0"
        );
    }

    #[test]
    fn test_connector_starts_outside_marker() {
        let marker = Point::new(300.0, 150.0);
        let s = connector_start(C, marker, 7.0);
        assert!(approx(s, Point::new(300.0, 141.0)));
    }

    #[test]
    fn test_fmt_number() {
        assert_eq!(fmt_number(1.0), "1");
        assert_eq!(fmt_number(1.23456), "1.235");
        assert_eq!(fmt_number(-0.0001), "0");
        assert_eq!(fmt_number(f64::NAN), "0");
        assert_eq!(fmt_number(12.5), "12.5");
    }
}
