pub mod morph;
pub mod prepare;
pub mod timeline;
pub mod visibility;

pub use morph::{Channel, MorphAnimator, MorphEvent, MorphPhase, MorphShape, MorphState};
pub use prepare::{prepare_pictogram_morph, prepare_stroke_morph, MorphError};
pub use timeline::{MorphTimeline, Settle, SettleTarget};
pub use visibility::{HiddenStroke, StrokeVisibility};
