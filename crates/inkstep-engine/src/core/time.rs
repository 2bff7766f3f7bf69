/// Fixed-step frame clock.
/// Turns variable browser frame deltas into a whole number of fixed ticks so
/// morph and hint timelines advance identically regardless of frame rate.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// The fixed delta time per tick.
    step: f32,
    /// Maximum ticks run for a single frame (after a stall the rest is dropped).
    max_steps: u32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FrameClock {
    pub fn new(step: f32) -> Self {
        Self {
            step: step.max(f32::EPSILON),
            max_steps: 10,
            accumulator: 0.0,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add frame time. Returns the number of fixed ticks to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator = (self.accumulator + frame_dt).min(self.step * self.max_steps as f32);
        let steps = (self.accumulator / self.step) as u32;
        self.accumulator -= steps as f32 * self.step;
        steps
    }

    /// The fixed delta time.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Drop any partial tick, e.g. when a session restarts.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
