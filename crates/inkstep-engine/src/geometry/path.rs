//! Path descriptions: parse SVG-style path data into lyon paths, flatten
//! them into point lists, and serialize point lists back into path strings.

use std::fmt::Write;

use glam::Vec2;
use lyon::geom::{ArcFlags, SvgArc};
use lyon::math::{point, vector, Angle, Point};
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent};
use svgtypes::PathSegment;
use thiserror::Error;

/// Errors produced while parsing a path description.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PathError {
    #[error("path description is empty")]
    Empty,

    #[error("malformed path data: {0}")]
    Syntax(String),

    #[error("drawing command before any move-to")]
    NoCurrentPoint,
}

impl From<svgtypes::Error> for PathError {
    fn from(e: svgtypes::Error) -> Self {
        PathError::Syntax(e.to_string())
    }
}

/// Serialize points as `M x y L x y ...`, optionally closed with `Z`.
/// Coordinates are written with two decimals.
pub fn to_path_string(points: &[Vec2], closed: bool) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    let mut out = String::with_capacity(points.len() * 16);
    let _ = write!(out, "M {:.2} {:.2}", first.x, first.y);
    for p in rest {
        let _ = write!(out, " L {:.2} {:.2}", p.x, p.y);
    }
    if closed {
        out.push_str(" Z");
    }
    out
}

/// Parse path data (M, L, H, V, Q, T, C, S, A, Z and their relative forms).
pub fn parse_path(d: &str) -> Result<Path, PathError> {
    if d.trim().is_empty() {
        return Err(PathError::Empty);
    }
    let mut sink = PathSink::new();
    for segment in svgtypes::PathParser::from(d) {
        sink.segment(segment?)?;
    }
    sink.finish()
}

/// Parse and flatten path data into one point list per subpath.
///
/// Closing segments are not repeated; callers that need an explicit seam use
/// `ensure_closed`.
pub fn flatten_subpaths(d: &str, tolerance: f32) -> Result<Vec<Vec<Vec2>>, PathError> {
    let path = parse_path(d)?;
    let mut subpaths = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();

    for event in path.iter().flattened(tolerance) {
        match event {
            PathEvent::Begin { at } => {
                current.clear();
                current.push(Vec2::new(at.x, at.y));
            }
            PathEvent::Line { to, .. } => current.push(Vec2::new(to.x, to.y)),
            PathEvent::End { .. } => {
                if !current.is_empty() {
                    subpaths.push(std::mem::take(&mut current));
                }
            }
            // Flattening only yields lines.
            PathEvent::Quadratic { to, .. } | PathEvent::Cubic { to, .. } => {
                current.push(Vec2::new(to.x, to.y))
            }
        }
    }
    Ok(subpaths)
}

/// Feeds svgtypes segments into a lyon builder, resolving relative
/// coordinates and smooth-curve reflections.
struct PathSink {
    builder: lyon::path::path::Builder,
    current: Point,
    subpath_start: Point,
    started: bool,
    in_subpath: bool,
    /// Reflection source for S/T: last control point and whether it was cubic.
    last_ctrl: Option<(bool, Point)>,
}

impl PathSink {
    fn new() -> Self {
        Self {
            builder: Path::builder(),
            current: point(0.0, 0.0),
            subpath_start: point(0.0, 0.0),
            started: false,
            in_subpath: false,
            last_ctrl: None,
        }
    }

    fn finish(mut self) -> Result<Path, PathError> {
        if !self.started {
            return Err(PathError::Empty);
        }
        if self.in_subpath {
            self.builder.end(false);
        }
        Ok(self.builder.build())
    }

    fn resolve(&self, abs: bool, x: f64, y: f64) -> Point {
        if abs {
            point(x as f32, y as f32)
        } else {
            point(self.current.x + x as f32, self.current.y + y as f32)
        }
    }

    fn segment(&mut self, segment: PathSegment) -> Result<(), PathError> {
        if !self.started && !matches!(segment, PathSegment::MoveTo { .. }) {
            return Err(PathError::NoCurrentPoint);
        }

        match segment {
            PathSegment::MoveTo { abs, x, y } => {
                let to = self.resolve(abs, x, y);
                if self.in_subpath {
                    self.builder.end(false);
                }
                self.builder.begin(to);
                self.started = true;
                self.in_subpath = true;
                self.subpath_start = to;
                self.current = to;
                self.last_ctrl = None;
            }
            PathSegment::LineTo { abs, x, y } => {
                let to = self.resolve(abs, x, y);
                self.line_to(to);
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let x = x as f32;
                let to = point(if abs { x } else { self.current.x + x }, self.current.y);
                self.line_to(to);
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let y = y as f32;
                let to = point(self.current.x, if abs { y } else { self.current.y + y });
                self.line_to(to);
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let ctrl = self.resolve(abs, x1, y1);
                let to = self.resolve(abs, x, y);
                self.quad_to(ctrl, to);
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let to = self.resolve(abs, x, y);
                let ctrl = self.reflected_ctrl(false);
                self.quad_to(ctrl, to);
            }
            PathSegment::CurveTo { abs, x1, y1, x2, y2, x, y } => {
                let c1 = self.resolve(abs, x1, y1);
                let c2 = self.resolve(abs, x2, y2);
                let to = self.resolve(abs, x, y);
                self.cubic_to(c1, c2, to);
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let c2 = self.resolve(abs, x2, y2);
                let to = self.resolve(abs, x, y);
                let c1 = self.reflected_ctrl(true);
                self.cubic_to(c1, c2, to);
            }
            PathSegment::EllipticalArc { abs, rx, ry, x_axis_rotation, large_arc, sweep, x, y } => {
                let to = self.resolve(abs, x, y);
                self.arc_to(rx as f32, ry as f32, x_axis_rotation as f32, large_arc, sweep, to);
            }
            PathSegment::ClosePath { .. } => self.close_path(),
        }
        Ok(())
    }

    /// Drawing after a close-path continues from the subpath start.
    fn ensure_subpath(&mut self) {
        if !self.in_subpath {
            self.builder.begin(self.current);
            self.in_subpath = true;
            self.subpath_start = self.current;
        }
    }

    fn line_to(&mut self, to: Point) {
        self.ensure_subpath();
        self.builder.line_to(to);
        self.current = to;
        self.last_ctrl = None;
    }

    fn quad_to(&mut self, ctrl: Point, to: Point) {
        self.ensure_subpath();
        self.builder.quadratic_bezier_to(ctrl, to);
        self.current = to;
        self.last_ctrl = Some((false, ctrl));
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, to: Point) {
        self.ensure_subpath();
        self.builder.cubic_bezier_to(c1, c2, to);
        self.current = to;
        self.last_ctrl = Some((true, c2));
    }

    fn arc_to(&mut self, rx: f32, ry: f32, rotation: f32, large_arc: bool, sweep: bool, to: Point) {
        self.ensure_subpath();
        let arc = SvgArc {
            from: self.current,
            to,
            radii: vector(rx.abs(), ry.abs()),
            x_rotation: Angle::degrees(rotation),
            flags: ArcFlags { large_arc, sweep },
        };
        if arc.is_straight_line() {
            self.builder.line_to(to);
        } else {
            let builder = &mut self.builder;
            arc.for_each_quadratic_bezier(&mut |q| {
                builder.quadratic_bezier_to(q.ctrl, q.to);
            });
        }
        self.current = to;
        self.last_ctrl = None;
    }

    fn reflected_ctrl(&self, cubic: bool) -> Point {
        match self.last_ctrl {
            Some((was_cubic, ctrl)) if was_cubic == cubic => {
                point(2.0 * self.current.x - ctrl.x, 2.0 * self.current.y - ctrl.y)
            }
            _ => self.current,
        }
    }

    fn close_path(&mut self) {
        if self.in_subpath {
            self.builder.end(true);
            self.in_subpath = false;
        }
        self.current = self.subpath_start;
        self.last_ctrl = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_string_format() {
        let pts = [Vec2::new(1.0, 2.0), Vec2::new(3.5, -4.25)];
        assert_eq!(to_path_string(&pts, false), "M 1.00 2.00 L 3.50 -4.25");
        assert_eq!(to_path_string(&pts, true), "M 1.00 2.00 L 3.50 -4.25 Z");
        assert_eq!(to_path_string(&[], true), "");
    }

    #[test]
    fn parses_polygon_back_from_its_path_string() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let subpaths = flatten_subpaths(&to_path_string(&square, true), 0.1).unwrap();
        assert_eq!(subpaths.len(), 1);
        assert_eq!(subpaths[0][..4], square);
    }

    #[test]
    fn relative_and_shorthand_commands() {
        let subpaths = flatten_subpaths("m 10 10 h 20 v 5 l -20 0 z", 0.1).unwrap();
        let pts = &subpaths[0];
        assert_eq!(pts[0], Vec2::new(10.0, 10.0));
        assert_eq!(pts[1], Vec2::new(30.0, 10.0));
        assert_eq!(pts[2], Vec2::new(30.0, 15.0));
        assert_eq!(pts[3], Vec2::new(10.0, 15.0));
    }

    #[test]
    fn curves_flatten_to_many_points() {
        let subpaths = flatten_subpaths("M 0 0 Q 50 100 100 0 C 120 -50 180 -50 200 0 Z", 0.25).unwrap();
        assert_eq!(subpaths.len(), 1);
        assert!(subpaths[0].len() > 10);
        let last = *subpaths[0].last().unwrap();
        assert!((last - Vec2::new(200.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn implicit_line_after_move_and_compact_numbers() {
        let subpaths = flatten_subpaths("M0,0 10,0 10-10.5e1", 0.1).unwrap();
        assert_eq!(subpaths[0].len(), 3);
        assert_eq!(subpaths[0][2], Vec2::new(10.0, -105.0));
    }

    #[test]
    fn splits_subpaths() {
        let subpaths = flatten_subpaths("M 0 0 L 1 0 L 1 1 Z M 5 5 L 6 5 L 6 6 Z", 0.1).unwrap();
        assert_eq!(subpaths.len(), 2);
        assert_eq!(subpaths[1][0], Vec2::new(5.0, 5.0));
    }

    #[test]
    fn arcs_are_supported() {
        let subpaths = flatten_subpaths("M 0 0 A 50 50 0 0 1 100 0 Z", 0.1).unwrap();
        let top = subpaths[0].iter().map(|p| p.y.abs()).fold(0.0_f32, f32::max);
        assert!((top - 50.0).abs() < 1.0, "arc apex was {top}");
    }

    #[test]
    fn smooth_curves_reflect_previous_control() {
        // T after Q mirrors the control point, so the apex matches a symmetric pair.
        let subpaths = flatten_subpaths("M 0 0 Q 25 50 50 0 T 100 0", 0.05).unwrap();
        let low = subpaths[0].iter().map(|p| p.y).fold(0.0_f32, f32::min);
        assert!((low + 25.0).abs() < 0.5, "reflected dip was {low}");
    }

    #[test]
    fn drawing_continues_after_close() {
        let subpaths = flatten_subpaths("M 5 5 L 10 5 Z l 0 10 l 5 0 z", 0.1).unwrap();
        assert_eq!(subpaths.len(), 2);
        assert_eq!(subpaths[1][0], Vec2::new(5.0, 5.0));
        assert_eq!(subpaths[1][1], Vec2::new(5.0, 15.0));
    }

    #[test]
    fn malformed_paths_are_errors() {
        assert_eq!(parse_path("   ").unwrap_err(), PathError::Empty);
        assert!(matches!(parse_path("10 10"), Err(PathError::Syntax(_))));
        assert!(matches!(parse_path("M 10"), Err(PathError::Syntax(_))));
        assert!(matches!(parse_path("M 1 2 X 3"), Err(PathError::Syntax(_))));
    }

    #[test]
    fn drawing_without_move_to_is_rejected() {
        let err = parse_path("L 10 10").unwrap_err();
        assert!(
            matches!(err, PathError::NoCurrentPoint | PathError::Syntax(_)),
            "unexpected error {err:?}"
        );
        assert!(flatten_subpaths("L 10 10 L 20 20", 0.1).is_err());
    }
}
