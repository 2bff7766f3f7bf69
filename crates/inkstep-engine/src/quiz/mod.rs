pub mod controller;
pub mod grading;
pub mod hint;
pub mod session;

pub use controller::{QuizPhase, RenderFrame, SessionTicket, StrokeQuizController};
pub use grading::{GradePolicy, GuidedGrading, MistakeThresholds, OutlineUpdate, QuizAssessment, ReviewRating};
pub use hint::{GuidedHintSequencer, HintConfig};
pub use session::QuizSession;
