use glam::Vec2;

/// Raw points captured while the user traced one stroke, in glyph space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawnStroke {
    pub points: Vec<Vec2>,
    /// The capture surface judged the stroke to be drawn end-to-start.
    pub backwards: bool,
}

impl DrawnStroke {
    pub fn new(points: Vec<Vec2>, backwards: bool) -> Self {
        Self { points, backwards }
    }

    /// Build from a flat `[x0, y0, x1, y1, ...]` buffer. A trailing odd value is dropped.
    pub fn from_flat(coords: &[f32], backwards: bool) -> Self {
        let points = coords
            .chunks_exact(2)
            .map(|c| Vec2::new(c[0], c[1]))
            .collect();
        Self { points, backwards }
    }

    /// Points in drawing order, start to end.
    pub fn ordered(&self) -> Vec<Vec2> {
        if self.backwards {
            self.points.iter().rev().copied().collect()
        } else {
            self.points.clone()
        }
    }
}

/// One stroke attempt judged by the capture surface.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeAttempt {
    pub stroke_index: usize,
    pub accepted: bool,
    pub drawn: DrawnStroke,
    /// Near-misses the capture surface counted on this stroke so far.
    pub mistakes_on_stroke: u32,
}

impl StrokeAttempt {
    pub fn accepted(stroke_index: usize, drawn: DrawnStroke, mistakes_on_stroke: u32) -> Self {
        Self { stroke_index, accepted: true, drawn, mistakes_on_stroke }
    }

    pub fn rejected(stroke_index: usize, drawn: DrawnStroke, mistakes_on_stroke: u32) -> Self {
        Self { stroke_index, accepted: false, drawn, mistakes_on_stroke }
    }
}

/// Attempts in the order strokes were completed.
/// JS pushes attempts as they arrive; the runner drains them each frame.
pub struct AttemptQueue {
    attempts: Vec<StrokeAttempt>,
}

impl AttemptQueue {
    pub fn new() -> Self {
        Self {
            attempts: Vec::with_capacity(8),
        }
    }

    pub fn push(&mut self, attempt: StrokeAttempt) {
        self.attempts.push(attempt);
    }

    /// Drain all pending attempts, oldest first.
    pub fn drain(&mut self) -> Vec<StrokeAttempt> {
        std::mem::take(&mut self.attempts)
    }

    /// Drop pending attempts (the session they belonged to is gone).
    pub fn clear(&mut self) {
        self.attempts.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }
}

impl Default for AttemptQueue {
    fn default() -> Self {
        Self::new()
    }
}
