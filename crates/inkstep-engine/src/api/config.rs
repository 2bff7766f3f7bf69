use serde::Deserialize;

use crate::animation::timeline::MorphTimeline;
use crate::assets::glyph::CharacterBounds;
use crate::quiz::grading::GradePolicy;
use crate::quiz::hint::HintConfig;

/// Configuration for a quiz surface, provided by the host.
/// Every field has a default, so partial JSON overrides are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Points per resampled outline (default: 96).
    pub sample_points: usize,
    /// Width used to extrude the drawn line into an outline (default: 50).
    pub user_stroke_width: f32,
    /// Flattening tolerance for path descriptions, in glyph units (default: 0.5).
    pub tolerance: f32,
    /// Glyph coordinate box.
    pub bounds: CharacterBounds,
    /// Timeline for the per-stroke acceptance morph.
    pub stroke_morph: MorphTimeline,
    /// Timeline for the pictogram intro morph.
    #[serde(default = "MorphTimeline::pictogram")]
    pub pictogram_morph: MorphTimeline,
    /// Longest segment allowed when resampling pictogram shapes (default: 10).
    pub pictogram_segment_length: f32,
    pub hint: HintConfig,
    pub grading: GradePolicy,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            sample_points: 96,
            user_stroke_width: 50.0,
            tolerance: 0.5,
            bounds: CharacterBounds::default(),
            stroke_morph: MorphTimeline::stroke(),
            pictogram_morph: MorphTimeline::pictogram(),
            pictogram_segment_length: 10.0,
            hint: HintConfig::default(),
            grading: GradePolicy::default(),
        }
    }
}

impl QuizConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::grading::GuidedGrading;

    #[test]
    fn empty_object_is_default() {
        let config = QuizConfig::from_json("{}").unwrap();
        assert_eq!(config, QuizConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = QuizConfig::from_json(
            r#"{ "sample_points": 64, "grading": { "guided": "lowest_on_mistake" } }"#,
        )
        .unwrap();
        assert_eq!(config.sample_points, 64);
        assert_eq!(config.user_stroke_width, 50.0);
        assert_eq!(config.grading.guided, GuidedGrading::LowestOnMistake);
        assert_eq!(config.pictogram_morph, MorphTimeline::pictogram());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(QuizConfig::from_json("{ sample_points: }").is_err());
    }
}
