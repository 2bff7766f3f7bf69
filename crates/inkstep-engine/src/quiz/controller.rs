//! The per-character stroke quiz.
//!
//! Owns the session state machine, the morph animator and the guided hint
//! sequencer. The host drives it with three kinds of calls: lifecycle
//! (`begin_session` / `deliver_glyph` / `reset` / `end_session`), stroke
//! attempts from its capture surface, and `tick(dt)` once per frame. What
//! happened is reported through `drain_events`, and what to draw through
//! `render_frame`.
//!
//! Degraded geometry never fails a call: a stroke whose morph cannot be built
//! is reported as `MorphSkipped` and the quiz moves on.

use glam::Vec2;

use crate::animation::{
    prepare_pictogram_morph, prepare_stroke_morph, MorphAnimator, MorphError, MorphEvent,
    MorphState, MorphTimeline, StrokeVisibility,
};
use crate::api::config::QuizConfig;
use crate::api::types::{MorphId, QuizEvent, QuizSummary};
use crate::assets::glyph::{GlyphData, GlyphError, StrokeShape};
use crate::input::queue::{DrawnStroke, StrokeAttempt};

use super::grading::QuizAssessment;
use super::hint::GuidedHintSequencer;
use super::session::QuizSession;

/// Proof of which character a glyph fetch was started for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTicket {
    character: String,
}

impl SessionTicket {
    pub fn character(&self) -> &str {
        &self.character
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    Idle,
    Loading { character: String },
    AwaitingStroke(usize),
    Completed,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub phase: QuizPhase,
    pub morph_shapes: Vec<Vec<Vec2>>,
    pub morph_paths: Vec<String>,
    pub opacity: f32,
    pub scale: f32,
    /// Canonical stroke to leave undrawn while the overlay covers it.
    pub hidden_stroke: Option<usize>,
    pub marker: Option<Vec2>,
    /// Show the full-character reference (guided mode, before the first attempt).
    pub show_reference: bool,
    pub completed_strokes: usize,
}

#[derive(Debug)]
struct Pending {
    character: String,
    outline_learned: bool,
}

#[derive(Debug)]
pub struct StrokeQuizController {
    config: QuizConfig,
    animator: MorphAnimator,
    hints: GuidedHintSequencer,
    pending: Option<Pending>,
    session: Option<QuizSession>,
    shapes: Vec<StrokeShape>,
    live_morph: Option<MorphId>,
    next_morph: u64,
    events: Vec<QuizEvent>,
}

impl StrokeQuizController {
    pub fn new(config: QuizConfig) -> Self {
        Self {
            animator: MorphAnimator::new(StrokeVisibility::new()),
            hints: GuidedHintSequencer::new(config.hint),
            config,
            pending: None,
            session: None,
            shapes: Vec::new(),
            live_morph: None,
            next_morph: 1,
            events: Vec::new(),
        }
    }

    // -- Lifecycle --

    /// Drop the current session and wait for `character`'s glyph data.
    pub fn begin_session(&mut self, character: &str, outline_learned: bool) -> SessionTicket {
        self.teardown();
        log::debug!("loading glyph data for {character:?}");
        self.pending = Some(Pending {
            character: character.to_string(),
            outline_learned,
        });
        SessionTicket {
            character: character.to_string(),
        }
    }

    /// Hand over the result of a glyph fetch. Returns false when the delivery
    /// is stale (no session is loading, or it is loading another character)
    /// and was discarded.
    pub fn deliver_glyph(
        &mut self,
        ticket: &SessionTicket,
        glyph: Result<GlyphData, GlyphError>,
    ) -> bool {
        let outline_learned = match &self.pending {
            Some(pending) if pending.character == ticket.character => pending.outline_learned,
            _ => {
                log::debug!("discarding stale glyph data for {:?}", ticket.character);
                return false;
            }
        };

        match glyph.and_then(|g| {
            g.validate()?;
            Ok(g)
        }) {
            Ok(glyph) => {
                self.pending = None;
                self.install(ticket.character.clone(), &glyph, !outline_learned);
            }
            Err(e) => {
                log::warn!("glyph data for {:?} unavailable: {e}", ticket.character);
                self.events.push(QuizEvent::GlyphUnavailable {
                    character: ticket.character.clone(),
                });
            }
        }
        true
    }

    /// Start a session with glyph data already at hand.
    pub fn start_session(&mut self, character: &str, glyph: GlyphData, outline_learned: bool) -> bool {
        let ticket = self.begin_session(character, outline_learned);
        self.deliver_glyph(&ticket, Ok(glyph));
        self.session.is_some()
    }

    /// Restart the current character from stroke 0 with no mistakes.
    pub fn reset(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let character = session.character().to_string();
        let fresh = QuizSession::new(character.clone(), session.stroke_count(), session.is_guided());

        self.animator.cancel();
        self.pump_morph_events();
        self.session = Some(fresh);
        log::debug!("session for {character:?} reset");
        self.events.push(QuizEvent::SessionReset { character });
        self.arm_hint(0);
    }

    /// Release everything the session holds and go idle.
    pub fn end_session(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.animator.cancel();
        self.pump_morph_events();
        self.live_morph = None;
        self.hints.stop();
        self.pending = None;
        self.session = None;
        self.shapes.clear();
    }

    fn install(&mut self, character: String, glyph: &GlyphData, guided: bool) {
        self.shapes = glyph.shapes(&self.config.bounds);
        let stroke_count = glyph.stroke_count();
        log::info!("session started for {character:?}: {stroke_count} strokes, guided={guided}");
        self.session = Some(QuizSession::new(character.clone(), stroke_count, guided));
        self.events.push(QuizEvent::SessionStarted { character, stroke_count, guided });
        self.arm_hint(0);
    }

    // -- Attempts --

    /// React to one judged stroke attempt. Attempts for any stroke other than
    /// the awaited one are ignored.
    pub fn submit_attempt(&mut self, attempt: StrokeAttempt) {
        let Some(session) = self.session.as_mut() else {
            log::warn!("stroke attempt with no session in progress");
            return;
        };
        let Some(current) = session.current_stroke() else {
            log::warn!("stroke attempt after the session completed");
            return;
        };
        if attempt.stroke_index != current {
            log::warn!(
                "ignoring attempt for stroke {} while awaiting stroke {current}",
                attempt.stroke_index
            );
            return;
        }

        if !attempt.accepted {
            if let Some(mistakes) = session.record_rejection(current) {
                self.events.push(QuizEvent::StrokeRejected { stroke: current, mistakes });
            }
            return;
        }

        let Some(mistakes) = session.record_acceptance(current, attempt.mistakes_on_stroke) else {
            return;
        };
        let summary = session.is_completed().then(|| session.summary());
        self.events.push(QuizEvent::StrokeAccepted { stroke: current, mistakes });

        self.morph_stroke(current, &attempt.drawn);

        match summary {
            Some(summary) => {
                self.hints.stop();
                log::info!(
                    "session for {:?} completed with {} mistakes",
                    summary.character,
                    summary.total_mistakes
                );
                self.events.push(QuizEvent::Completed(summary));
            }
            None => self.arm_hint(current + 1),
        }
    }

    fn morph_stroke(&mut self, stroke: usize, drawn: &DrawnStroke) {
        let id = self.next_morph_id();
        let prepared = match self.shapes.get(stroke) {
            Some(shape) => prepare_stroke_morph(id, stroke, drawn, shape, &self.config),
            None => Err(MorphError::Empty),
        };
        self.play(prepared, self.config.stroke_morph, Some(stroke));
    }

    /// Play the pictogram → character intro over the current glyph.
    pub fn play_pictogram_intro(&mut self, pictogram: &[String]) -> Option<MorphId> {
        if self.session.is_none() {
            log::warn!("pictogram intro requested with no session in progress");
            return None;
        }
        let id = self.next_morph_id();
        let prepared = prepare_pictogram_morph(id, pictogram, &self.shapes, &self.config);
        self.play(prepared, self.config.pictogram_morph, None)
    }

    /// Jump the morph `id` to its end. Stale ids are ignored.
    pub fn skip_morph(&mut self, id: MorphId) -> bool {
        let skipped = self.animator.skip_to_end(id);
        self.pump_morph_events();
        skipped
    }

    fn play(
        &mut self,
        prepared: Result<MorphState, MorphError>,
        timeline: MorphTimeline,
        stroke: Option<usize>,
    ) -> Option<MorphId> {
        match prepared.and_then(|state| self.animator.start(state, timeline)) {
            Ok(id) => {
                self.live_morph = Some(id);
                self.events.push(QuizEvent::MorphStarted { id, stroke });
                Some(id)
            }
            Err(e) => {
                self.animator.cancel();
                self.live_morph = None;
                log::warn!("morph skipped for stroke {stroke:?}: {e}");
                self.events.push(QuizEvent::MorphSkipped { stroke });
                None
            }
        }
    }

    fn next_morph_id(&mut self) -> MorphId {
        let id = MorphId(self.next_morph);
        self.next_morph += 1;
        id
    }

    fn arm_hint(&mut self, stroke: usize) {
        let guided = self.session.as_ref().is_some_and(|s| s.is_guided());
        match self.shapes.get(stroke) {
            Some(shape) if guided => {
                if !self.hints.arm(&shape.median) {
                    log::debug!("stroke {stroke} has no measurable centerline, hint suppressed");
                }
            }
            _ => self.hints.stop(),
        }
    }

    // -- Frame --

    pub fn tick(&mut self, dt: f32) {
        self.animator.tick(dt);
        self.hints.tick(dt);
        self.pump_morph_events();
    }

    /// Only completions of the live morph are reported; anything the
    /// animator says about a superseded morph is dropped.
    fn pump_morph_events(&mut self) {
        for event in self.animator.drain_events() {
            match event {
                MorphEvent::Finished(id) if self.live_morph == Some(id) => {
                    self.live_morph = None;
                    self.events.push(QuizEvent::MorphFinished { id });
                }
                MorphEvent::Cancelled(id) if self.live_morph == Some(id) => {
                    self.live_morph = None;
                }
                _ => {}
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<QuizEvent> {
        self.pump_morph_events();
        std::mem::take(&mut self.events)
    }

    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame {
            phase: self.phase(),
            morph_shapes: self.animator.shapes(),
            morph_paths: self.animator.path_data(),
            opacity: self.animator.opacity(),
            scale: self.animator.scale(),
            hidden_stroke: self.animator.hidden_stroke(),
            marker: self.hints.marker(),
            show_reference: self
                .session
                .as_ref()
                .is_some_and(|s| s.is_guided() && !s.has_attempted()),
            completed_strokes: self.session.as_ref().map_or(0, |s| s.completed_strokes()),
        }
    }

    // -- Accessors --

    pub fn phase(&self) -> QuizPhase {
        if let Some(pending) = &self.pending {
            return QuizPhase::Loading {
                character: pending.character.clone(),
            };
        }
        match &self.session {
            None => QuizPhase::Idle,
            Some(session) => match session.current_stroke() {
                Some(i) => QuizPhase::AwaitingStroke(i),
                None => QuizPhase::Completed,
            },
        }
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn shapes(&self) -> &[StrokeShape] {
        &self.shapes
    }

    /// Summary of the completed session, if it is complete.
    pub fn summary(&self) -> Option<QuizSummary> {
        self.session
            .as_ref()
            .filter(|s| s.is_completed())
            .map(|s| s.summary())
    }

    /// Grade and outline update the configured policy derives from the summary.
    pub fn assessment(&self) -> Option<QuizAssessment> {
        let session = self.session.as_ref()?;
        let summary = self.summary()?;
        Some(self.config.grading.assess(&summary, session.is_guided()))
    }

    pub fn live_morph(&self) -> Option<MorphId> {
        self.live_morph
    }

    pub fn animator(&self) -> &MorphAnimator {
        &self.animator
    }

    /// Mutable animator access, for subscribing to its motion values.
    pub fn animator_mut(&mut self) -> &mut MorphAnimator {
        &mut self.animator
    }

    pub fn hints(&self) -> &GuidedHintSequencer {
        &self.hints
    }

    pub fn hints_mut(&mut self) -> &mut GuidedHintSequencer {
        &mut self.hints
    }

    pub fn visibility(&self) -> &StrokeVisibility {
        self.animator.visibility()
    }
}
