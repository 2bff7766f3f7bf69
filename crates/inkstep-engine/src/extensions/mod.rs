// extensions/mod.rs
//
// Timing primitives for the morph and hint timelines.
// Pure math over seconds and normalised progress, no knowledge of strokes.

pub mod easing;
pub mod spring;
pub mod tween;

pub use easing::{Easing, lerp, lerp_vec2, ease};
pub use spring::{Spring, SpringConfig};
pub use tween::Tween;
