// quiz/hint.rs
//
// Guided-mode hint marker. Travels along the awaited stroke's centerline,
// then hides for a short pause, and repeats until stopped.

use glam::Vec2;
use serde::Deserialize;

use crate::core::signal::{ListenerId, MotionValue};
use crate::extensions::Easing;
use crate::geometry::ArcLengthTable;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct HintConfig {
    /// Marker speed in view units per second.
    pub speed: f32,
    /// Floor on one pass, so short strokes are not traced in a blink.
    pub min_duration: f32,
    /// Hidden time between passes.
    pub pause: f32,
    pub easing: Easing,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            speed: 700.0,
            min_duration: 0.6,
            pause: 1.2,
            easing: Easing::Linear,
        }
    }
}

#[derive(Debug)]
struct Track {
    table: ArcLengthTable,
    duration: f32,
}

#[derive(Debug)]
pub struct GuidedHintSequencer {
    config: HintConfig,
    track: Option<Track>,
    elapsed: f32,
    marker: MotionValue<Option<Vec2>>,
}

impl GuidedHintSequencer {
    pub fn new(config: HintConfig) -> Self {
        Self {
            config,
            track: None,
            elapsed: 0.0,
            marker: MotionValue::new(None),
        }
    }

    /// Start tracing `centerline` from its beginning. Returns false when the
    /// centerline has no measurable length; the marker then stays hidden.
    pub fn arm(&mut self, centerline: &[Vec2]) -> bool {
        let table = ArcLengthTable::new(centerline);
        let total = table.total();
        self.elapsed = 0.0;
        if !total.is_finite() || total <= 0.0 {
            self.track = None;
            self.marker.set(None);
            return false;
        }

        let duration = (total / self.config.speed.max(f32::EPSILON)).max(self.config.min_duration);
        self.marker.set(table.point_at(0.0));
        self.track = Some(Track { table, duration });
        true
    }

    pub fn stop(&mut self) {
        self.track = None;
        self.elapsed = 0.0;
        self.marker.set(None);
    }

    pub fn is_armed(&self) -> bool {
        self.track.is_some()
    }

    /// Seconds for one pass along the stroke, excluding the pause.
    pub fn pass_duration(&self) -> Option<f32> {
        self.track.as_ref().map(|t| t.duration)
    }

    pub fn tick(&mut self, dt: f32) {
        let Some(track) = &self.track else {
            return;
        };
        let cycle = track.duration + self.config.pause.max(0.0);
        self.elapsed = (self.elapsed + dt.max(0.0)) % cycle;

        let position = if self.elapsed < track.duration {
            let t = self.config.easing.apply(self.elapsed / track.duration);
            track.table.point_at(t * track.table.total())
        } else {
            None
        };
        self.marker.set(position);
    }

    /// Marker position, or `None` while hidden or not ready.
    pub fn marker(&self) -> Option<Vec2> {
        self.marker.get()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Option<Vec2>) + 'static) -> ListenerId {
        self.marker.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.marker.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn line(length: f32) -> Vec<Vec2> {
        vec![Vec2::new(0.0, 0.0), Vec2::new(length, 0.0)]
    }

    #[test]
    fn marker_travels_at_constant_speed() {
        let mut hints = GuidedHintSequencer::new(HintConfig::default());
        assert!(hints.arm(&line(1400.0)));
        assert_eq!(hints.pass_duration(), Some(2.0));
        assert_eq!(hints.marker(), Some(Vec2::ZERO));

        for _ in 0..60 {
            hints.tick(DT);
        }
        let x = hints.marker().map(|p| p.x).unwrap_or_default();
        assert!((x - 700.0).abs() < 1.0, "x = {x}");
    }

    #[test]
    fn short_strokes_use_min_duration() {
        let mut hints = GuidedHintSequencer::new(HintConfig::default());
        hints.arm(&line(70.0));
        assert_eq!(hints.pass_duration(), Some(0.6));
    }

    #[test]
    fn pauses_then_loops() {
        let mut hints = GuidedHintSequencer::new(HintConfig::default());
        hints.arm(&line(350.0)); // 0.6 s pass (floored), 1.2 s pause
        for _ in 0..48 {
            hints.tick(DT); // 0.8 s: inside the pause
        }
        assert_eq!(hints.marker(), None);
        for _ in 0..66 {
            hints.tick(DT); // 1.9 s: 0.1 s into the second pass
        }
        let x = hints.marker().map(|p| p.x).unwrap_or(-1.0);
        assert!(x > 0.0 && x < 100.0, "x = {x}");
    }

    #[test]
    fn degenerate_centerline_is_not_ready() {
        let mut hints = GuidedHintSequencer::new(HintConfig::default());
        assert!(!hints.arm(&[]));
        assert!(!hints.arm(&[Vec2::ONE, Vec2::ONE]));
        hints.tick(DT);
        assert_eq!(hints.marker(), None);
        assert!(!hints.is_armed());
    }

    #[test]
    fn stop_hides_marker() {
        let mut hints = GuidedHintSequencer::new(HintConfig::default());
        hints.arm(&line(500.0));
        hints.tick(DT);
        hints.stop();
        hints.tick(DT);
        assert_eq!(hints.marker(), None);
    }
}
