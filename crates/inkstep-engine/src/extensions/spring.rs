// extensions/spring.rs
//
// Analytic damped spring, used for the settle after a morph overshoot.
// Closed-form solution of m·x'' + c·x' + k·x = 0 around the target.

use serde::Deserialize;

/// Damping ratios this close to 1.0 use the critically damped solution; the
/// two-root form loses precision as its roots converge.
const CRITICAL_BAND: f32 = 1e-3;

/// Spring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Distance from the target below which the spring may come to rest.
    pub rest_delta: f32,
    /// Speed below which the spring may come to rest.
    pub rest_speed: f32,
    /// Seconds after which the spring snaps to its target regardless.
    pub max_duration: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 260.0,
            damping: 28.0,
            mass: 1.0,
            rest_delta: 0.001,
            rest_speed: 0.01,
            max_duration: 1.5,
        }
    }
}

impl SpringConfig {
    /// Damping ratio ζ. Below 1.0 the spring oscillates around its target.
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Replace parameters that would keep the spring from ever resting
    /// (non-positive or non-finite) with the defaults.
    pub fn sanitized(self) -> Self {
        let fallback = Self::default();
        let positive = |v: f32, d: f32| if v.is_finite() && v > 0.0 { v } else { d };
        let non_negative = |v: f32, d: f32| if v.is_finite() && v >= 0.0 { v } else { d };
        Self {
            stiffness: positive(self.stiffness, fallback.stiffness),
            damping: positive(self.damping, fallback.damping),
            mass: positive(self.mass, fallback.mass),
            rest_delta: non_negative(self.rest_delta, fallback.rest_delta),
            rest_speed: non_negative(self.rest_speed, fallback.rest_speed),
            max_duration: non_negative(self.max_duration, fallback.max_duration),
        }
    }
}

/// A spring moving a value from `from` towards `to`.
#[derive(Debug, Clone)]
pub struct Spring {
    config: SpringConfig,
    to: f32,
    x0: f32,
    v0: f32,
    elapsed: f32,
    at_rest: bool,
}

impl Spring {
    pub fn new(from: f32, to: f32, velocity: f32, config: SpringConfig) -> Self {
        let mut spring = Self {
            config: config.sanitized(),
            to,
            x0: from - to,
            v0: velocity,
            elapsed: 0.0,
            at_rest: false,
        };
        spring.at_rest = spring.check_rest();
        spring
    }

    /// Current value.
    pub fn value(&self) -> f32 {
        if self.at_rest {
            self.to
        } else {
            self.to + self.state(self.elapsed).0
        }
    }

    /// Current velocity.
    pub fn velocity(&self) -> f32 {
        if self.at_rest { 0.0 } else { self.state(self.elapsed).1 }
    }

    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Advance by `dt`. The spring snaps to its target once both displacement
    /// and speed are under the rest thresholds, or once `max_duration` has
    /// passed. Non-finite or negative steps are ignored.
    pub fn advance(&mut self, dt: f32) {
        if self.at_rest || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.elapsed += dt;
        self.at_rest = self.check_rest();
    }

    fn check_rest(&self) -> bool {
        if self.elapsed >= self.config.max_duration {
            return true;
        }
        let (x, v) = self.state(self.elapsed);
        if !x.is_finite() || !v.is_finite() {
            return true;
        }
        x.abs() <= self.config.rest_delta && v.abs() <= self.config.rest_speed
    }

    /// Displacement from target and velocity at time `t`.
    fn state(&self, t: f32) -> (f32, f32) {
        let SpringConfig { stiffness, damping, mass, .. } = self.config;
        let (x0, v0) = (self.x0, self.v0);
        if stiffness <= 0.0 || mass <= 0.0 {
            return (0.0, 0.0);
        }

        let omega = (stiffness / mass).sqrt();
        let zeta = damping / (2.0 * (stiffness * mass).sqrt());

        if (zeta - 1.0).abs() < CRITICAL_BAND {
            let decay = (-omega * t).exp();
            let b = v0 + omega * x0;
            let x = (x0 + b * t) * decay;
            let v = (b - omega * (x0 + b * t)) * decay;
            (x, v)
        } else if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega * t).exp();
            let b = (v0 + zeta * omega * x0) / omega_d;
            let (sin, cos) = (omega_d * t).sin_cos();
            let x = decay * (x0 * cos + b * sin);
            let v = decay * ((b * omega_d - zeta * omega * x0) * cos - (x0 * omega_d + zeta * omega * b) * sin);
            (x, v)
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let c2 = (v0 - r1 * x0) / (r2 - r1);
            let c1 = x0 - c2;
            let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
            (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle_frames(mut spring: Spring) -> usize {
        let mut frames = 0;
        while !spring.is_at_rest() {
            spring.advance(1.0 / 60.0);
            frames += 1;
            assert!(frames < 600, "spring didn't settle");
        }
        frames
    }

    #[test]
    fn default_spring_is_underdamped() {
        let ratio = SpringConfig::default().damping_ratio();
        assert!(ratio < 1.0 && ratio > 0.8, "ratio was {ratio}");
    }

    #[test]
    fn settles_on_target() {
        let spring = Spring::new(1.1, 1.0, 0.0, SpringConfig::default());
        let frames = settle_frames(spring.clone());
        assert!(frames > 5);
        let mut s = spring;
        for _ in 0..frames {
            s.advance(1.0 / 60.0);
        }
        assert_eq!(s.value(), 1.0);
        assert_eq!(s.velocity(), 0.0);
    }

    #[test]
    fn underdamped_spring_crosses_target() {
        let s = Spring::new(1.1, 1.0, 0.0, SpringConfig::default());
        let crossed = (0..240).any(|i| s.state(i as f32 / 240.0).0 < 0.0);
        assert!(crossed, "expected an undershoot");
    }

    #[test]
    fn critically_and_over_damped_settle_without_crossing() {
        for damping in [2.0 * 260.0_f32.sqrt(), 80.0] {
            let config = SpringConfig { damping, ..SpringConfig::default() };
            let mut s = Spring::new(1.1, 1.0, 0.0, config);
            for _ in 0..120 {
                s.advance(1.0 / 60.0);
                assert!(s.value() >= 1.0 - 1e-5);
            }
            assert!(s.is_at_rest());
        }
    }

    #[test]
    fn undamped_config_falls_back_to_default_damping() {
        let config = SpringConfig { damping: 0.0, mass: -1.0, ..SpringConfig::default() };
        let clean = config.sanitized();
        assert_eq!(clean.damping, SpringConfig::default().damping);
        assert_eq!(clean.mass, 1.0);
        settle_frames(Spring::new(1.1, 1.0, 0.0, config));
    }

    #[test]
    fn time_limit_forces_rest() {
        // Barely damped: would ring for many seconds without the cap.
        let config = SpringConfig { damping: 0.05, max_duration: 0.5, ..SpringConfig::default() };
        let mut s = Spring::new(1.1, 1.0, 0.0, config);
        for _ in 0..29 {
            s.advance(1.0 / 60.0);
        }
        assert!(!s.is_at_rest());
        s.advance(1.0 / 60.0);
        s.advance(1.0 / 60.0);
        assert!(s.is_at_rest());
        assert_eq!(s.value(), 1.0);
    }

    #[test]
    fn non_finite_steps_are_ignored() {
        let mut s = Spring::new(1.1, 1.0, 0.0, SpringConfig::default());
        s.advance(f32::INFINITY);
        s.advance(f32::NAN);
        assert!(!s.is_at_rest());
        assert!(s.value().is_finite());
        settle_frames(s);
    }

    #[test]
    fn velocity_matches_numeric_derivative() {
        let s = Spring::new(0.0, 1.0, 0.5, SpringConfig::default());
        let h = 1e-3;
        let (_, v) = s.state(0.05);
        let (x1, _) = s.state(0.05 - h);
        let (x2, _) = s.state(0.05 + h);
        assert!(((x2 - x1) / (2.0 * h) - v).abs() < 0.05);
    }
}
