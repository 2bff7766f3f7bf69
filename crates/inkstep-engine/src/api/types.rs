use bytemuck::{Pod, Zeroable};
use serde::Serialize;

/// Unique identifier for one morph attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MorphId(pub u64);

/// Mistake summary for one finished session.
/// Emitted exactly once per session; the caller maps it to a review grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub character: String,
    pub total_strokes: usize,
    pub total_mistakes: u32,
    pub mistakes_per_stroke: Vec<u32>,
}

/// Events raised by the quiz controller, drained by the host once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizEvent {
    SessionStarted { character: String, stroke_count: usize, guided: bool },
    /// Glyph data for the loading character could not be used.
    GlyphUnavailable { character: String },
    StrokeRejected { stroke: usize, mistakes: u32 },
    StrokeAccepted { stroke: usize, mistakes: u32 },
    MorphStarted { id: MorphId, stroke: Option<usize> },
    /// The morph for this stroke was not played; the canonical stroke shows as is.
    MorphSkipped { stroke: Option<usize> },
    MorphFinished { id: MorphId },
    Completed(QuizSummary),
    SessionReset { character: String },
}

/// A quiz event flattened for JS (one per event, 4 floats).
/// `kind` identifies the event, `a/b/c` carry its numeric payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EventRecord {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl EventRecord {
    pub const FLOATS: usize = 4;

    pub const SESSION_STARTED: f32 = 1.0;
    pub const GLYPH_UNAVAILABLE: f32 = 2.0;
    pub const STROKE_REJECTED: f32 = 3.0;
    pub const STROKE_ACCEPTED: f32 = 4.0;
    pub const MORPH_STARTED: f32 = 5.0;
    pub const MORPH_SKIPPED: f32 = 6.0;
    pub const MORPH_FINISHED: f32 = 7.0;
    pub const COMPLETED: f32 = 8.0;
    pub const SESSION_RESET: f32 = 9.0;

    fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

/// Stroke indices that are absent (pictogram morphs) encode as -1.
fn stroke_slot(stroke: Option<usize>) -> f32 {
    stroke.map_or(-1.0, |s| s as f32)
}

impl From<&QuizEvent> for EventRecord {
    fn from(event: &QuizEvent) -> Self {
        match event {
            QuizEvent::SessionStarted { stroke_count, guided, .. } => Self::new(
                Self::SESSION_STARTED,
                *stroke_count as f32,
                if *guided { 1.0 } else { 0.0 },
                0.0,
            ),
            QuizEvent::GlyphUnavailable { .. } => Self::new(Self::GLYPH_UNAVAILABLE, 0.0, 0.0, 0.0),
            QuizEvent::StrokeRejected { stroke, mistakes } => {
                Self::new(Self::STROKE_REJECTED, *stroke as f32, *mistakes as f32, 0.0)
            }
            QuizEvent::StrokeAccepted { stroke, mistakes } => {
                Self::new(Self::STROKE_ACCEPTED, *stroke as f32, *mistakes as f32, 0.0)
            }
            QuizEvent::MorphStarted { id, stroke } => {
                Self::new(Self::MORPH_STARTED, stroke_slot(*stroke), id.0 as f32, 0.0)
            }
            QuizEvent::MorphSkipped { stroke } => {
                Self::new(Self::MORPH_SKIPPED, stroke_slot(*stroke), 0.0, 0.0)
            }
            QuizEvent::MorphFinished { id } => Self::new(Self::MORPH_FINISHED, 0.0, id.0 as f32, 0.0),
            QuizEvent::Completed(summary) => Self::new(
                Self::COMPLETED,
                summary.total_strokes as f32,
                summary.total_mistakes as f32,
                0.0,
            ),
            QuizEvent::SessionReset { .. } => Self::new(Self::SESSION_RESET, 0.0, 0.0, 0.0),
        }
    }
}
