//! Outline extrusion and polygon orientation.

use glam::Vec2;

/// Polygon winding. Clockwise means a negative shoelace area, i.e. clockwise
/// when the y axis points up as it does in glyph data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

/// Extrude a centerline into a closed outline of the given width.
///
/// Each point is offset by `±width / 2` along the normal of the tangent
/// formed by its neighbours. Returns the outer offsets followed by the inner
/// offsets in reverse, forming a single boundary. Empty when the centerline
/// has fewer than two points or the width is not positive.
pub fn build_outline(centerline: &[Vec2], width: f32) -> Vec<Vec2> {
    if centerline.len() < 2 || width <= 0.0 {
        return Vec::new();
    }

    let half = width / 2.0;
    let last = centerline.len() - 1;
    let normals: Vec<Vec2> = (0..centerline.len())
        .map(|i| {
            let prev = centerline[i.saturating_sub(1)];
            let next = centerline[(i + 1).min(last)];
            let tangent = next - prev;
            let normal = Vec2::new(-tangent.y, tangent.x).normalize_or_zero();
            if normal == Vec2::ZERO {
                Vec2::Y
            } else {
                normal
            }
        })
        .collect();

    let outer = centerline.iter().zip(&normals).map(|(p, n)| *p + *n * half);
    let inner = centerline.iter().zip(&normals).map(|(p, n)| *p - *n * half);

    let mut outline: Vec<Vec2> = outer.collect();
    outline.extend(inner.rev());
    outline
}

/// Shoelace signed area. Positive for counter-clockwise (y-up) polygons.
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let n = polygon.len();
    let twice: f32 = (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

/// Return the polygon in the requested winding, reversing point order if needed.
pub fn ensure_orientation(polygon: &[Vec2], winding: Winding) -> Vec<Vec2> {
    let area = signed_area(polygon);
    let matches = match winding {
        Winding::Clockwise => area < 0.0,
        Winding::CounterClockwise => area > 0.0,
    };
    if matches {
        polygon.to_vec()
    } else {
        polygon.iter().rev().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polyline::resample;

    #[test]
    fn straight_outline_area_matches_length_times_width() {
        let centerline = resample(&[Vec2::new(100.0, 200.0), Vec2::new(600.0, 200.0)], 20);
        let outline = build_outline(&centerline, 50.0);
        assert_eq!(outline.len(), 40);
        let area = signed_area(&outline).abs();
        assert!((area - 500.0 * 50.0).abs() < 1.0, "area was {area}");
    }

    #[test]
    fn diagonal_outline_area_matches_length_times_width() {
        let centerline = resample(&[Vec2::ZERO, Vec2::new(300.0, 400.0)], 12);
        let area = signed_area(&build_outline(&centerline, 20.0)).abs();
        assert!((area - 500.0 * 20.0).abs() < 1.0, "area was {area}");
    }

    #[test]
    fn outline_rejects_degenerate_input() {
        assert!(build_outline(&[Vec2::ZERO], 10.0).is_empty());
        assert!(build_outline(&[Vec2::ZERO, Vec2::X], 0.0).is_empty());
        assert!(build_outline(&[Vec2::ZERO, Vec2::X], -3.0).is_empty());
    }

    #[test]
    fn coincident_points_fall_back_to_vertical_normal() {
        let p = Vec2::new(5.0, 5.0);
        let outline = build_outline(&[p, p], 4.0);
        assert_eq!(outline[0], Vec2::new(5.0, 7.0));
        assert_eq!(outline[3], Vec2::new(5.0, 3.0));
    }

    #[test]
    fn orientation_reverses_only_when_needed() {
        let ccw = [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)];
        assert!(signed_area(&ccw) > 0.0);

        let cw = ensure_orientation(&ccw, Winding::Clockwise);
        assert!(signed_area(&cw) < 0.0);
        assert_eq!(cw[0], ccw[3]);

        let again = ensure_orientation(&cw, Winding::Clockwise);
        assert_eq!(again, cw);
        assert_eq!(ensure_orientation(&cw, Winding::CounterClockwise), ccw.to_vec());
    }
}
