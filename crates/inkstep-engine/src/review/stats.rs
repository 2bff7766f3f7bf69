//! Stored review records, as the host's scheduler keeps them.
//!
//! Stats are tagged by scheduling algorithm. Records written before the tag
//! existed are plain FSRS card objects, so decoding falls back to reading
//! them field by field, with defaults for anything missing or malformed.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Scheduler card state, stored as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CardState {
    #[default]
    New,
    Learning,
    Review,
    Relearning,
}

impl CardState {
    /// States in which the character is still being learned.
    pub fn needs_guidance(self) -> bool {
        matches!(self, CardState::New | CardState::Learning | CardState::Relearning)
    }
}

impl From<CardState> for u8 {
    fn from(state: CardState) -> u8 {
        match state {
            CardState::New => 0,
            CardState::Learning => 1,
            CardState::Review => 2,
            CardState::Relearning => 3,
        }
    }
}

impl TryFrom<u8> for CardState {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(CardState::New),
            1 => Ok(CardState::Learning),
            2 => Ok(CardState::Review),
            3 => Ok(CardState::Relearning),
            other => Err(format!("unknown card state {other}")),
        }
    }
}

/// A stored instant: epoch milliseconds or an ISO-8601 string, kept as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(f64),
    Iso(String),
}

impl Timestamp {
    fn decode(value: Option<&Value>) -> Option<Self> {
        match value? {
            Value::Number(n) => n.as_f64().map(Timestamp::Millis),
            Value::String(s) if !s.is_empty() => Some(Timestamp::Iso(s.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FsrsStats {
    pub due: Option<Timestamp>,
    pub stability: f64,
    pub difficulty: f64,
    pub elapsed_days: u32,
    pub scheduled_days: u32,
    pub reps: u32,
    pub lapses: u32,
    pub state: CardState,
    pub last_review: Option<Timestamp>,
}

impl FsrsStats {
    fn decode(raw: &Value) -> Self {
        let number = |key: &str| raw.get(key).and_then(Value::as_f64).filter(|v| v.is_finite());
        let count = |key: &str| {
            raw.get(key)
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(0)
        };
        let state = raw
            .get("state")
            .and_then(Value::as_u64)
            .and_then(|code| u8::try_from(code).ok())
            .and_then(|code| CardState::try_from(code).ok())
            .unwrap_or_default();

        Self {
            due: Timestamp::decode(raw.get("due")),
            stability: number("stability").unwrap_or(0.0),
            difficulty: number("difficulty").unwrap_or(0.0),
            elapsed_days: count("elapsed_days"),
            scheduled_days: count("scheduled_days"),
            reps: count("reps"),
            lapses: count("lapses"),
            state,
            last_review: Timestamp::decode(raw.get("last_review")),
        }
    }
}

/// Per-card scheduler stats, one variant per supported algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum SchedulerStats {
    Fsrs(FsrsStats),
}

impl Default for SchedulerStats {
    fn default() -> Self {
        SchedulerStats::Fsrs(FsrsStats::default())
    }
}

impl SchedulerStats {
    /// Decode stored stats. Never fails: unknown shapes become default stats.
    pub fn decode(raw: &Value) -> Self {
        if let Ok(stats) = Self::deserialize(raw) {
            return stats;
        }
        let Value::Object(fields) = raw else {
            return Self::default();
        };
        match fields.get("algorithm").and_then(Value::as_str) {
            None | Some("fsrs") => SchedulerStats::Fsrs(FsrsStats::decode(raw)),
            Some(other) => {
                log::warn!("unknown scheduling algorithm {other:?}, using default stats");
                Self::default()
            }
        }
    }

    pub fn state(&self) -> CardState {
        match self {
            SchedulerStats::Fsrs(stats) => stats.state,
        }
    }
}

fn decode_stats<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SchedulerStats, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(SchedulerStats::decode(&raw))
}

/// One card of a deck, as persisted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub id: String,
    #[serde(default, deserialize_with = "decode_stats")]
    pub stats: SchedulerStats,
    #[serde(default)]
    pub learned_outline: bool,
}

impl CardRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stats: SchedulerStats::default(),
            learned_outline: false,
        }
    }

    /// Whether practice for this card should run guided: still learning and
    /// the outline not yet drawn unaided.
    pub fn should_show_outline(&self) -> bool {
        self.stats.state().needs_guidance() && !self.learned_outline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_round_trip() {
        let stats = SchedulerStats::Fsrs(FsrsStats {
            reps: 3,
            state: CardState::Review,
            due: Some(Timestamp::Millis(1_700_000_000_000.0)),
            ..FsrsStats::default()
        });
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["algorithm"], "fsrs");
        assert_eq!(value["state"], 2);
        assert_eq!(SchedulerStats::decode(&value), stats);
    }

    #[test]
    fn untagged_legacy_card() {
        let raw = json!({
            "due": "2025-03-01T10:00:00.000Z",
            "stability": 4.2,
            "difficulty": "oops",
            "reps": 7,
            "lapses": -1,
            "state": 3
        });
        let SchedulerStats::Fsrs(stats) = SchedulerStats::decode(&raw);
        assert_eq!(stats.due, Some(Timestamp::Iso("2025-03-01T10:00:00.000Z".into())));
        assert_eq!(stats.stability, 4.2);
        assert_eq!(stats.difficulty, 0.0);
        assert_eq!(stats.reps, 7);
        assert_eq!(stats.lapses, 0);
        assert_eq!(stats.state, CardState::Relearning);
        assert_eq!(stats.last_review, None);
    }

    #[test]
    fn garbage_becomes_default() {
        assert_eq!(SchedulerStats::decode(&json!(42)), SchedulerStats::default());
        assert_eq!(SchedulerStats::decode(&json!({ "state": 9 })).state(), CardState::New);
        assert_eq!(
            SchedulerStats::decode(&json!({ "algorithm": "sm2", "reps": 4 })),
            SchedulerStats::default()
        );
    }

    #[test]
    fn outline_policy() {
        let mut card = CardRecord::new("木");
        assert!(card.should_show_outline());
        card.learned_outline = true;
        assert!(!card.should_show_outline());

        let review: CardRecord = serde_json::from_value(json!({
            "id": "水",
            "stats": { "state": 2 },
            "learnedOutline": false
        }))
        .unwrap();
        assert_eq!(review.stats.state(), CardState::Review);
        assert!(!review.should_show_outline());

        let relearning: CardRecord =
            serde_json::from_value(json!({ "id": "火", "stats": { "state": 3 } })).unwrap();
        assert!(relearning.should_show_outline());
    }
}
