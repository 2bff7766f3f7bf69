use crate::api::types::QuizSummary;

/// Per-character practice state.
///
/// `current` only moves forward and stops at `stroke_count`, at which point
/// the session is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    character: String,
    stroke_count: usize,
    current: usize,
    mistakes: Vec<u32>,
    guided: bool,
    attempted: bool,
}

impl QuizSession {
    pub fn new(character: impl Into<String>, stroke_count: usize, guided: bool) -> Self {
        Self {
            character: character.into(),
            stroke_count,
            current: 0,
            mistakes: vec![0; stroke_count],
            guided,
            attempted: false,
        }
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    pub fn stroke_count(&self) -> usize {
        self.stroke_count
    }

    /// Index of the awaited stroke, `None` once complete.
    pub fn current_stroke(&self) -> Option<usize> {
        (self.current < self.stroke_count).then_some(self.current)
    }

    /// Strokes accepted so far.
    pub fn completed_strokes(&self) -> usize {
        self.current
    }

    pub fn is_completed(&self) -> bool {
        self.current >= self.stroke_count
    }

    pub fn is_guided(&self) -> bool {
        self.guided
    }

    /// Whether any attempt has arrived this session.
    pub fn has_attempted(&self) -> bool {
        self.attempted
    }

    pub fn mistakes_per_stroke(&self) -> &[u32] {
        &self.mistakes
    }

    pub fn total_mistakes(&self) -> u32 {
        self.mistakes.iter().sum()
    }

    /// Count a rejected attempt on the awaited stroke. Returns its new
    /// mistake count, or `None` if `stroke` is not the awaited one.
    pub fn record_rejection(&mut self, stroke: usize) -> Option<u32> {
        if self.current_stroke() != Some(stroke) {
            return None;
        }
        self.attempted = true;
        self.mistakes[stroke] += 1;
        Some(self.mistakes[stroke])
    }

    /// Accept the awaited stroke and advance. The stroke keeps the larger of
    /// the recorded and the reported mistake counts.
    pub fn record_acceptance(&mut self, stroke: usize, reported: u32) -> Option<u32> {
        if self.current_stroke() != Some(stroke) {
            return None;
        }
        self.attempted = true;
        let mistakes = self.mistakes[stroke].max(reported);
        self.mistakes[stroke] = mistakes;
        self.current += 1;
        Some(mistakes)
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            character: self.character.clone(),
            total_strokes: self.stroke_count,
            total_mistakes: self.total_mistakes(),
            mistakes_per_stroke: self.mistakes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_then_accept_all() {
        let mut s = QuizSession::new("木", 4, false);
        assert_eq!(s.record_rejection(0), Some(1));
        for i in 0..4 {
            assert_eq!(s.current_stroke(), Some(i));
            s.record_acceptance(i, 0);
        }
        assert!(s.is_completed());
        assert_eq!(s.current_stroke(), None);
        assert_eq!(s.mistakes_per_stroke(), &[1, 0, 0, 0]);
        assert_eq!(s.summary().total_mistakes, 1);
        assert_eq!(s.summary().total_strokes, 4);
    }

    #[test]
    fn reported_near_misses_count() {
        let mut s = QuizSession::new("人", 2, true);
        s.record_rejection(0);
        assert_eq!(s.record_acceptance(0, 3), Some(3));
        assert_eq!(s.record_acceptance(1, 0), Some(0));
        assert_eq!(s.total_mistakes(), 3);
    }

    #[test]
    fn wrong_index_is_ignored() {
        let mut s = QuizSession::new("人", 2, false);
        assert_eq!(s.record_acceptance(1, 0), None);
        assert_eq!(s.record_rejection(1), None);
        assert!(!s.has_attempted());
        s.record_acceptance(0, 0);
        s.record_acceptance(1, 0);
        assert_eq!(s.record_rejection(1), None);
        assert_eq!(s.completed_strokes(), 2);
    }
}
