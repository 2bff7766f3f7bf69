// extensions/tween.rs
//
// A single scalar tween over time, with optional start delay.
//
// Usage:
//   let mut fade = Tween::new(1.0, 0.0, 0.22, Easing::QuadOut);
//   let leftover = fade.advance(dt);   // seconds not consumed by this tween
//   opacity.set(fade.value());

use super::easing::{ease, Easing};

/// A single scalar tween.
#[derive(Debug, Clone)]
pub struct Tween {
    /// Start value.
    pub from: f32,
    /// End value.
    pub to: f32,
    /// Duration in seconds (after the delay).
    pub duration: f32,
    /// Seconds to wait before the value starts moving.
    pub delay: f32,
    /// Elapsed time, including the delay.
    elapsed: f32,
    /// Easing function.
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            delay: 0.0,
            elapsed: 0.0,
            easing,
        }
    }

    /// Fade out to transparent.
    pub fn fade_out(duration: f32, easing: Easing) -> Self {
        Self::new(1.0, 0.0, duration, easing)
    }

    // -- Builder methods --

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Total time from start to completion.
    pub fn total(&self) -> f32 {
        self.delay + self.duration
    }

    /// Normalized progress [0, 1], excluding the delay.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            if self.elapsed >= self.delay { 1.0 } else { 0.0 }
        } else {
            ((self.elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Current eased value.
    pub fn value(&self) -> f32 {
        ease(self.from, self.to, self.progress(), self.easing)
    }

    /// Whether the tween has reached its end.
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.total()
    }

    /// Advance by `dt` seconds. Returns the part of `dt` left over once the
    /// tween completes (0.0 while it is still running).
    pub fn advance(&mut self, dt: f32) -> f32 {
        let remaining = (self.total() - self.elapsed).max(0.0);
        if dt >= remaining {
            self.elapsed = self.total();
            dt - remaining
        } else {
            self.elapsed += dt;
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_tween_reaches_target() {
        let mut t = Tween::new(0.0, 100.0, 1.0, Easing::Linear);
        assert_eq!(t.advance(0.5), 0.0);
        assert!((t.value() - 50.0).abs() < 0.01);
        let leftover = t.advance(0.7);
        assert!((leftover - 0.2).abs() < 1e-5);
        assert!(t.is_complete());
        assert_eq!(t.value(), 100.0);
    }

    #[test]
    fn delay_holds_start_value() {
        let mut t = Tween::fade_out(0.5, Easing::Linear).with_delay(0.2);
        t.advance(0.1);
        assert_eq!(t.value(), 1.0);
        t.advance(0.35);
        assert!((t.value() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut t = Tween::new(0.0, 1.0, 0.0, Easing::QuadOut);
        assert!(t.is_complete());
        assert_eq!(t.advance(0.016), 0.016);
        assert_eq!(t.value(), 1.0);
    }
}
