pub mod api;
pub mod core;
pub mod geometry;
pub mod extensions;
pub mod animation;
pub mod quiz;
pub mod assets;
pub mod input;
pub mod review;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::QuizConfig;
pub use api::types::{EventRecord, MorphId, QuizEvent, QuizSummary};
pub use core::signal::{ListenerId, MotionValue};
pub use core::time::FrameClock;
pub use assets::glyph::{CharacterBounds, GlyphData, GlyphError, StrokeShape};
pub use assets::library::GlyphLibrary;
pub use input::queue::{AttemptQueue, DrawnStroke, StrokeAttempt};
pub use animation::{
    prepare_pictogram_morph, prepare_stroke_morph, Channel, HiddenStroke, MorphAnimator,
    MorphError, MorphEvent, MorphPhase, MorphShape, MorphState, MorphTimeline, Settle,
    SettleTarget, StrokeVisibility,
};
pub use quiz::{
    GradePolicy, GuidedGrading, GuidedHintSequencer, HintConfig, MistakeThresholds,
    OutlineUpdate, QuizAssessment, QuizPhase, QuizSession, RenderFrame, ReviewRating,
    SessionTicket, StrokeQuizController,
};
pub use review::{CardRecord, CardState, FsrsStats, SchedulerStats, Timestamp};

#[cfg(feature = "vectors")]
pub use systems::vector::{FrameStyle, VectorColor, VectorState, VectorVertex};

// Geometry and timing primitives
pub use geometry::{
    align_closed, build_outline, ensure_orientation, parse_path, resample, resample_closed,
    signed_area, to_path_string, Alignment, PathError, Winding,
};
pub use extensions::{ease, lerp, lerp_vec2, Easing, Spring, SpringConfig, Tween};
