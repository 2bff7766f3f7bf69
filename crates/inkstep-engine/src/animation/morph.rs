//! The morph animator: one live source → target transition at a time.
//!
//! A morph walks an explicit phase sequence (hold, morph, overshoot, settle,
//! fade delay, fade) driven by [`MorphAnimator::tick`]. Leftover frame time
//! carries across phase boundaries, so the result depends only on total
//! elapsed time. Starting a new morph cancels the old one first, restoring
//! its hidden stroke and resetting the shared motion values.

use glam::Vec2;

use super::prepare::MorphError;
use super::timeline::{MorphTimeline, SettleTarget};
use super::visibility::{HiddenStroke, StrokeVisibility};
use crate::api::types::MorphId;
use crate::core::signal::{ListenerId, MotionValue};
use crate::extensions::{lerp_vec2, Easing, Spring, Tween};
use crate::geometry::to_path_string;

/// One index-aligned source/target pair.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphShape {
    pub source: Vec<Vec2>,
    pub target: Vec<Vec2>,
}

impl MorphShape {
    pub fn new(source: Vec<Vec2>, target: Vec<Vec2>) -> Result<Self, MorphError> {
        if source.is_empty() || target.is_empty() {
            return Err(MorphError::Empty);
        }
        if source.len() != target.len() {
            return Err(MorphError::CountMismatch { from: source.len(), to: target.len() });
        }
        Ok(Self { source, target })
    }

    /// Interpolated points at progress `t`. Values past 1.0 extrapolate.
    pub fn at(&self, t: f32) -> Vec<Vec2> {
        self.source
            .iter()
            .zip(&self.target)
            .map(|(a, b)| lerp_vec2(*a, *b, t))
            .collect()
    }
}

/// Everything needed to play one morph.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphState {
    pub id: MorphId,
    pub shapes: Vec<MorphShape>,
    /// Canonical stroke the overlay stands in for while it animates.
    pub hidden_stroke: Option<usize>,
}

impl MorphState {
    pub fn validate(&self) -> Result<(), MorphError> {
        if self.shapes.is_empty() {
            return Err(MorphError::Empty);
        }
        for shape in &self.shapes {
            if shape.source.is_empty() {
                return Err(MorphError::Empty);
            }
            if shape.source.len() != shape.target.len() {
                return Err(MorphError::CountMismatch {
                    from: shape.source.len(),
                    to: shape.target.len(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphEvent {
    Started(MorphId),
    /// Geometry reached its target (before any settle and fade).
    Morphed(MorphId),
    FadeStarted(MorphId),
    Finished(MorphId),
    Cancelled(MorphId),
}

/// Observable channels of the live overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Progress,
    Opacity,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphPhase {
    Hold,
    Morph,
    Overshoot,
    Settle,
    FadeDelay,
    Fade,
}

#[derive(Debug)]
enum Phase {
    Hold(Tween),
    Morph(Tween),
    Overshoot(Tween),
    Settle(Spring),
    FadeDelay(Tween),
    Fade(Tween),
}

impl Phase {
    fn label(&self) -> MorphPhase {
        match self {
            Phase::Hold(_) => MorphPhase::Hold,
            Phase::Morph(_) => MorphPhase::Morph,
            Phase::Overshoot(_) => MorphPhase::Overshoot,
            Phase::Settle(_) => MorphPhase::Settle,
            Phase::FadeDelay(_) => MorphPhase::FadeDelay,
            Phase::Fade(_) => MorphPhase::Fade,
        }
    }

    fn fade_delay(timeline: &MorphTimeline) -> Self {
        Phase::FadeDelay(Tween::new(0.0, 0.0, 0.0, Easing::Linear).with_delay(timeline.fade_delay))
    }
}

#[derive(Debug)]
struct ActiveMorph {
    state: MorphState,
    timeline: MorphTimeline,
    phase: Phase,
    hidden: Option<HiddenStroke>,
}

#[derive(Debug)]
pub struct MorphAnimator {
    visibility: StrokeVisibility,
    active: Option<ActiveMorph>,
    progress: MotionValue<f32>,
    opacity: MotionValue<f32>,
    scale: MotionValue<f32>,
    events: Vec<MorphEvent>,
}

impl MorphAnimator {
    pub fn new(visibility: StrokeVisibility) -> Self {
        Self {
            visibility,
            active: None,
            progress: MotionValue::new(0.0),
            opacity: MotionValue::new(0.0),
            scale: MotionValue::new(1.0),
            events: Vec::new(),
        }
    }

    pub fn visibility(&self) -> &StrokeVisibility {
        &self.visibility
    }

    /// Start `state`, superseding any live morph. An invalid state leaves the
    /// animator idle with nothing hidden.
    pub fn start(&mut self, state: MorphState, timeline: MorphTimeline) -> Result<MorphId, MorphError> {
        self.cancel();
        state.validate()?;

        let id = state.id;
        self.progress.set(0.0);
        self.scale.set(1.0);
        self.opacity.set(1.0);
        let hidden = state.hidden_stroke.map(|s| self.visibility.hide(s));
        self.active = Some(ActiveMorph {
            state,
            timeline,
            phase: Phase::Hold(Tween::new(0.0, 0.0, 0.0, Easing::Linear).with_delay(timeline.hold)),
            hidden,
        });
        self.events.push(MorphEvent::Started(id));
        Ok(id)
    }

    /// Stop the live morph, if any, restoring its hidden stroke.
    pub fn cancel(&mut self) -> Option<MorphId> {
        let active = self.active.take()?;
        let id = active.state.id;
        drop(active);
        self.rest();
        self.events.push(MorphEvent::Cancelled(id));
        Some(id)
    }

    /// Jump the morph `id` straight to its end. Stale ids are ignored.
    pub fn skip_to_end(&mut self, id: MorphId) -> bool {
        if self.active_id() != Some(id) {
            return false;
        }
        self.progress.set(1.0);
        self.scale.set(1.0);
        self.finish();
        true
    }

    /// Advance the live morph by `dt` seconds. Non-finite frame times are ignored.
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() {
            return;
        }
        let mut dt = dt.max(0.0);
        while let Some(active) = self.active.as_mut() {
            let id = active.state.id;
            let timeline = active.timeline;
            let next = match &mut active.phase {
                Phase::Hold(timer) => {
                    dt = timer.advance(dt);
                    if !timer.is_complete() {
                        break;
                    }
                    Some(Phase::Morph(Tween::new(
                        0.0,
                        1.0,
                        timeline.morph_duration,
                        timeline.morph_easing,
                    )))
                }
                Phase::Morph(tween) => {
                    dt = tween.advance(dt);
                    self.progress.set(tween.value());
                    if !tween.is_complete() {
                        break;
                    }
                    self.events.push(MorphEvent::Morphed(id));
                    let settle = timeline.settle;
                    if settle.is_active() {
                        Some(Phase::Overshoot(Tween::new(
                            1.0,
                            1.0 + settle.overshoot,
                            settle.overshoot_duration,
                            Easing::QuadOut,
                        )))
                    } else {
                        Some(Phase::fade_delay(&timeline))
                    }
                }
                Phase::Overshoot(tween) => {
                    dt = tween.advance(dt);
                    let value = tween.value();
                    match timeline.settle.target {
                        SettleTarget::Scale => self.scale.set(value),
                        _ => self.progress.set(value),
                    }
                    if !tween.is_complete() {
                        break;
                    }
                    Some(Phase::Settle(Spring::new(value, 1.0, 0.0, timeline.settle.spring)))
                }
                Phase::Settle(spring) => {
                    spring.advance(dt);
                    dt = 0.0;
                    let value = spring.value();
                    match timeline.settle.target {
                        SettleTarget::Scale => self.scale.set(value),
                        _ => self.progress.set(value),
                    }
                    if !spring.is_at_rest() {
                        break;
                    }
                    Some(Phase::fade_delay(&timeline))
                }
                Phase::FadeDelay(timer) => {
                    dt = timer.advance(dt);
                    if !timer.is_complete() {
                        break;
                    }
                    if let Some(hidden) = active.hidden.as_mut() {
                        hidden.release();
                    }
                    self.events.push(MorphEvent::FadeStarted(id));
                    Some(Phase::Fade(Tween::fade_out(timeline.fade_duration, timeline.fade_easing)))
                }
                Phase::Fade(tween) => {
                    dt = tween.advance(dt);
                    self.opacity.set(tween.value());
                    if !tween.is_complete() {
                        break;
                    }
                    None
                }
            };
            match next {
                Some(phase) => active.phase = phase,
                None => {
                    self.finish();
                    break;
                }
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_id(&self) -> Option<MorphId> {
        self.active.as_ref().map(|a| a.state.id)
    }

    pub fn phase(&self) -> Option<MorphPhase> {
        self.active.as_ref().map(|a| a.phase.label())
    }

    /// Stroke hidden by the live morph, until its fade begins.
    pub fn hidden_stroke(&self) -> Option<usize> {
        self.active
            .as_ref()
            .and_then(|a| a.hidden.as_ref())
            .filter(|h| !h.is_released())
            .map(|h| h.stroke())
    }

    pub fn progress(&self) -> f32 {
        self.progress.get()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity.get()
    }

    pub fn scale(&self) -> f32 {
        self.scale.get()
    }

    /// Current interpolated geometry, one point list per shape.
    pub fn shapes(&self) -> Vec<Vec<Vec2>> {
        let t = self.progress.get();
        self.active
            .as_ref()
            .map(|a| a.state.shapes.iter().map(|s| s.at(t)).collect())
            .unwrap_or_default()
    }

    /// Current geometry as closed path strings.
    pub fn path_data(&self) -> Vec<String> {
        self.shapes().iter().map(|s| to_path_string(s, true)).collect()
    }

    pub fn subscribe(&mut self, channel: Channel, listener: impl FnMut(&f32) + 'static) -> ListenerId {
        self.channel_mut(channel).subscribe(listener)
    }

    pub fn unsubscribe(&mut self, channel: Channel, id: ListenerId) -> bool {
        self.channel_mut(channel).unsubscribe(id)
    }

    pub fn drain_events(&mut self) -> Vec<MorphEvent> {
        std::mem::take(&mut self.events)
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut MotionValue<f32> {
        match channel {
            Channel::Progress => &mut self.progress,
            Channel::Opacity => &mut self.opacity,
            Channel::Scale => &mut self.scale,
        }
    }

    fn finish(&mut self) {
        if let Some(active) = self.active.take() {
            let id = active.state.id;
            drop(active);
            self.rest();
            self.events.push(MorphEvent::Finished(id));
        }
    }

    fn rest(&mut self) {
        self.progress.set(0.0);
        self.opacity.set(0.0);
        self.scale.set(1.0);
    }
}
