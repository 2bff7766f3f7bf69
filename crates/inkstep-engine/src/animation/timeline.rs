// animation/timeline.rs
//
// Durations and curves for one morph, as data. The animator walks these in
// a fixed order: hold, morph, overshoot, settle, fade delay, fade.

use serde::Deserialize;

use crate::extensions::{Easing, SpringConfig};

/// What the overshoot-and-settle step animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleTarget {
    /// No overshoot; go straight to the fade.
    #[default]
    None,
    /// Geometry progress runs past 1.0 and springs back.
    Progress,
    /// Overlay scale runs past 1.0 and springs back.
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settle {
    pub target: SettleTarget,
    /// Fraction past rest, e.g. 0.1 overshoots to 110 %.
    pub overshoot: f32,
    /// Seconds to reach the overshoot peak.
    pub overshoot_duration: f32,
    pub spring: SpringConfig,
}

impl Default for Settle {
    fn default() -> Self {
        Self {
            target: SettleTarget::Progress,
            overshoot: 0.1,
            overshoot_duration: 0.05,
            spring: SpringConfig::default(),
        }
    }
}

impl Settle {
    pub fn none() -> Self {
        Self {
            target: SettleTarget::None,
            overshoot: 0.0,
            overshoot_duration: 0.0,
            spring: SpringConfig::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.target != SettleTarget::None && self.overshoot != 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MorphTimeline {
    /// Seconds the source shape is shown before it starts moving.
    pub hold: f32,
    pub morph_duration: f32,
    pub morph_easing: Easing,
    pub settle: Settle,
    pub fade_delay: f32,
    pub fade_duration: f32,
    pub fade_easing: Easing,
}

impl Default for MorphTimeline {
    fn default() -> Self {
        Self::stroke()
    }
}

impl MorphTimeline {
    /// Accepted-stroke morph: quick ease-out snap with a small overshoot.
    pub fn stroke() -> Self {
        Self {
            hold: 0.0,
            morph_duration: 0.15,
            morph_easing: Easing::CubicOut,
            settle: Settle::default(),
            fade_delay: 0.0,
            fade_duration: 0.22,
            fade_easing: Easing::QuadOut,
        }
    }

    /// Pictogram intro: hold the picture, morph slowly into the character.
    pub fn pictogram() -> Self {
        Self {
            hold: 1.0,
            morph_duration: 2.0,
            morph_easing: Easing::CubicInOut,
            settle: Settle::none(),
            fade_delay: 0.2,
            fade_duration: 0.5,
            fade_easing: Easing::Linear,
        }
    }
}
