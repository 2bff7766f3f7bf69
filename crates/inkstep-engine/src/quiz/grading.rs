//! Mapping a finished session to a review grade and an outline-learned update.
//!
//! The controller never applies this itself. It is the policy the host hands
//! its scheduler, kept configurable because the thresholds and the guided
//! outline rule are choices rather than facts.

use serde::{Deserialize, Serialize};

use crate::api::types::QuizSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewRating {
    Again,
    Hard,
    Good,
    Easy,
}

/// How a guided (hinted) pass is graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidedGrading {
    /// A guided pass never counts as recalled.
    #[default]
    AlwaysLowest,
    /// Only a guided pass with mistakes gets the lowest grade.
    LowestOnMistake,
}

/// What a guided pass with mistakes does to the outline-learned flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineUpdate {
    #[default]
    MarkUnlearned,
    LeaveUnchanged,
}

/// Highest total mistakes still earning each grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MistakeThresholds {
    pub easy: u32,
    pub good: u32,
    pub hard: u32,
}

impl Default for MistakeThresholds {
    fn default() -> Self {
        Self { easy: 0, good: 2, hard: 4 }
    }
}

impl MistakeThresholds {
    pub fn rating(&self, mistakes: u32) -> ReviewRating {
        if mistakes <= self.easy {
            ReviewRating::Easy
        } else if mistakes <= self.good {
            ReviewRating::Good
        } else if mistakes <= self.hard {
            ReviewRating::Hard
        } else {
            ReviewRating::Again
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAssessment {
    pub rating: ReviewRating,
    /// New outline-learned flag, or `None` to leave it as stored.
    pub outline_learned: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct GradePolicy {
    pub thresholds: MistakeThresholds,
    pub guided: GuidedGrading,
    pub outline: OutlineUpdate,
}

impl GradePolicy {
    pub fn rating(&self, summary: &QuizSummary, guided: bool) -> ReviewRating {
        let mistakes = summary.total_mistakes;
        if !guided {
            return self.thresholds.rating(mistakes);
        }
        match self.guided {
            GuidedGrading::AlwaysLowest => ReviewRating::Again,
            GuidedGrading::LowestOnMistake if mistakes > 0 => ReviewRating::Again,
            GuidedGrading::LowestOnMistake => self.thresholds.rating(0),
        }
    }

    pub fn outline_learned(&self, summary: &QuizSummary, guided: bool) -> Option<bool> {
        if !guided {
            let rating = self.thresholds.rating(summary.total_mistakes);
            return Some(matches!(rating, ReviewRating::Easy | ReviewRating::Good));
        }
        if summary.total_mistakes == 0 {
            return Some(true);
        }
        match self.outline {
            OutlineUpdate::MarkUnlearned => Some(false),
            OutlineUpdate::LeaveUnchanged => None,
        }
    }

    pub fn assess(&self, summary: &QuizSummary, guided: bool) -> QuizAssessment {
        QuizAssessment {
            rating: self.rating(summary, guided),
            outline_learned: self.outline_learned(summary, guided),
        }
    }
}
