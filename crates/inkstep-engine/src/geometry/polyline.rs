//! Arc-length utilities for polylines.
//!
//! Resampling turns a variable-length stroke into exactly `n` points spaced
//! evenly along its length, which is what makes point-wise interpolation and
//! correspondence between two shapes well defined.

use glam::Vec2;

/// Gap between first and last point below which a polyline counts as closed.
const CLOSED_EPSILON: f32 = 0.01;

/// Cumulative arc-length table over a polyline.
#[derive(Debug, Clone)]
pub struct ArcLengthTable {
    points: Vec<Vec2>,
    cumulative: Vec<f32>,
}

impl ArcLengthTable {
    pub fn new(points: &[Vec2]) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        let mut acc = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                acc += points[i - 1].distance(*p);
            }
            cumulative.push(acc);
        }
        Self {
            points: points.to_vec(),
            cumulative,
        }
    }

    /// Total length of the polyline.
    pub fn total(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `distance` along the polyline, clamped to its ends.
    /// Returns `None` for an empty polyline.
    pub fn point_at(&self, distance: f32) -> Option<Vec2> {
        let first = *self.points.first()?;
        let total = self.total();
        if self.points.len() == 1 || total <= 0.0 || !total.is_finite() {
            return Some(first);
        }

        let d = distance.clamp(0.0, total);
        // First segment whose end reaches `d`.
        let mut seg = 0;
        while seg < self.cumulative.len() - 1 && self.cumulative[seg + 1] < d {
            seg += 1;
        }
        let next = (seg + 1).min(self.points.len() - 1);
        let seg_len = self.cumulative[next] - self.cumulative[seg];
        let t = if seg_len == 0.0 {
            0.0
        } else {
            ((d - self.cumulative[seg]) / seg_len).clamp(0.0, 1.0)
        };
        Some(self.points[seg].lerp(self.points[next], t))
    }
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Return `points` with the first point appended if the polyline is not already closed.
pub fn ensure_closed(points: &[Vec2]) -> Vec<Vec2> {
    let mut out = points.to_vec();
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first.distance(last) > CLOSED_EPSILON {
            out.push(first);
        }
    }
    out
}

/// Resample an open polyline to exactly `n` points evenly spaced by arc length.
///
/// The first and last input points are preserved. A polyline with a single
/// point or zero length yields `n` copies of its first point. An empty input
/// or `n == 0` yields an empty vector.
pub fn resample(points: &[Vec2], n: usize) -> Vec<Vec2> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    if n == 0 {
        return Vec::new();
    }
    if points.len() == 1 || n == 1 {
        return vec![first; n];
    }

    let table = ArcLengthTable::new(points);
    let total = table.total();
    if !total.is_finite() || total == 0.0 {
        return vec![first; n];
    }

    let step = total / (n - 1) as f32;
    (0..n)
        .map(|i| table.point_at(step * i as f32).unwrap_or(first))
        .collect()
}

/// Resample a polyline treated as a closed loop to exactly `n` points.
///
/// Distance wraps past the last point back to the first; the seam point is
/// not duplicated, so the result has spacing `perimeter / n`.
pub fn resample_closed(points: &[Vec2], n: usize) -> Vec<Vec2> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    if n == 0 {
        return Vec::new();
    }
    if points.len() == 1 {
        return vec![first; n];
    }

    let table = ArcLengthTable::new(&ensure_closed(points));
    let total = table.total();
    if !total.is_finite() || total == 0.0 {
        return vec![first; n];
    }

    let step = total / n as f32;
    (0..n)
        .map(|i| table.point_at(step * i as f32).unwrap_or(first))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> Vec<Vec2> {
        vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), Vec2::new(100.0, 50.0)]
    }

    #[test]
    fn resample_returns_exact_count() {
        for n in 1..40 {
            assert_eq!(resample(&l_shape(), n).len(), n);
        }
    }

    #[test]
    fn resample_spacing_is_even_on_a_line() {
        let line = [Vec2::ZERO, Vec2::new(30.0, 0.0), Vec2::new(90.0, 0.0)];
        let out = resample(&line, 10);
        let expected = 90.0 / 9.0;
        for w in out.windows(2) {
            assert!((w[0].distance(w[1]) - expected).abs() < 1e-3);
        }
        assert_eq!(out[0], Vec2::ZERO);
        assert!((out[9] - Vec2::new(90.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn resample_follows_arc_length_around_corners() {
        // Total length 150, 4 points → arc positions 0, 50, 100, 150.
        let out = resample(&l_shape(), 4);
        assert!((out[1] - Vec2::new(50.0, 0.0)).length() < 1e-3);
        assert!((out[2] - Vec2::new(100.0, 0.0)).length() < 1e-3);
        assert!((out[3] - Vec2::new(100.0, 50.0)).length() < 1e-3);
    }

    #[test]
    fn resample_degenerate_input_repeats_point() {
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(resample(&[p], 5), vec![p; 5]);
        assert_eq!(resample(&[p, p, p], 3), vec![p; 3]);
        assert!(resample(&[], 5).is_empty());
        assert!(resample(&l_shape(), 0).is_empty());
    }

    #[test]
    fn resample_closed_wraps_without_duplicating_seam() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let out = resample_closed(&square, 8);
        assert_eq!(out.len(), 8);
        // Perimeter 40 / 8 = 5 units apart, including last → first.
        for i in 0..8 {
            let d = out[i].distance(out[(i + 1) % 8]);
            assert!((d - 5.0).abs() < 1e-3, "gap {i} was {d}");
        }
        assert!(out[7].distance(out[0]) > 1.0);
    }

    #[test]
    fn ensure_closed_appends_only_when_open() {
        let open = l_shape();
        assert_eq!(ensure_closed(&open).len(), 4);
        let closed = ensure_closed(&open);
        assert_eq!(ensure_closed(&closed).len(), 4);
    }

    #[test]
    fn arc_table_point_at_clamps() {
        let table = ArcLengthTable::new(&l_shape());
        assert_eq!(table.total(), 150.0);
        assert_eq!(table.point_at(-10.0), Some(Vec2::ZERO));
        assert_eq!(table.point_at(500.0), Some(Vec2::new(100.0, 50.0)));
        assert!(ArcLengthTable::new(&[]).point_at(1.0).is_none());
    }
}
