//! Shape correspondence between two closed outlines of equal point count.
//!
//! Both outlines are normalised to clockwise winding, then every rotation of
//! the candidate's index origin is tried in forward and reversed order. The
//! combination with the smallest summed point-to-point distance wins. This is
//! O(n²) in the sample count, which stays small (~100) and runs once per
//! accepted stroke.

use glam::Vec2;

use super::outline::{ensure_orientation, Winding};

/// Result of aligning a candidate outline to a reference outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Reference outline, normalised to clockwise winding.
    pub reference: Vec<Vec2>,
    /// Candidate points re-ordered to correspond index-by-index with `reference`.
    pub aligned: Vec<Vec2>,
    /// Rotation applied to the (possibly reversed) clockwise candidate.
    pub offset: usize,
    /// Whether the clockwise candidate was reversed.
    pub reversed: bool,
    /// Summed point-to-point distance of the alignment.
    pub distance: f32,
}

/// Sum of distances between index-aligned points.
pub fn total_distance(a: &[Vec2], b: &[Vec2]) -> f32 {
    a.iter().zip(b).map(|(p, q)| p.distance(*q)).sum()
}

/// Distance when `points` is rotated so that index `offset` becomes index 0.
fn rotated_distance(points: &[Vec2], reference: &[Vec2], offset: usize) -> f32 {
    let n = points.len();
    reference
        .iter()
        .enumerate()
        .map(|(i, r)| points[(i + offset) % n].distance(*r))
        .sum()
}

fn best_rotation(points: &[Vec2], reference: &[Vec2]) -> (usize, f32) {
    let mut best = (0, f32::INFINITY);
    for offset in 0..points.len() {
        let d = rotated_distance(points, reference, offset);
        if d < best.1 {
            best = (offset, d);
        }
    }
    best
}

fn rotate(points: &[Vec2], offset: usize) -> Vec<Vec2> {
    let n = points.len();
    (0..n).map(|i| points[(i + offset) % n]).collect()
}

/// Align `candidate` to `reference`.
///
/// Returns `None` when the inputs are empty or differ in length; callers
/// treat that as "no morph" rather than an error.
pub fn align_closed(reference: &[Vec2], candidate: &[Vec2]) -> Option<Alignment> {
    if reference.is_empty() || reference.len() != candidate.len() {
        return None;
    }

    let reference = ensure_orientation(reference, Winding::Clockwise);
    let forward = ensure_orientation(candidate, Winding::Clockwise);
    let backward: Vec<Vec2> = forward.iter().rev().copied().collect();

    let (fwd_offset, fwd_distance) = best_rotation(&forward, &reference);
    let (rev_offset, rev_distance) = best_rotation(&backward, &reference);

    let (points, offset, reversed, distance) = if rev_distance < fwd_distance {
        (&backward, rev_offset, true, rev_distance)
    } else {
        (&forward, fwd_offset, false, fwd_distance)
    };

    Some(Alignment {
        aligned: rotate(points, offset),
        reference,
        offset,
        reversed,
        distance,
    })
}
