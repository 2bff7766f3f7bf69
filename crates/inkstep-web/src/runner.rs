use std::cell::Cell;
use std::rc::Rc;

use inkstep_engine::{
    AttemptQueue, Channel, EventRecord, FrameClock, GlyphData, GlyphError, GlyphLibrary, ListenerId, MorphId,
    QuizConfig, QuizEvent, QuizPhase, SessionTicket, StrokeAttempt, StrokeQuizController,
};
#[cfg(feature = "vectors")]
use inkstep_engine::{FrameStyle, VectorState};

/// Wires one quiz controller to the browser frame loop.
///
/// JS pushes stroke attempts as they happen and calls `tick` once per
/// animation frame; the runner replays the attempts in order, advances the
/// controller in fixed steps, and repacks everything the page reads into
/// flat buffers and strings.
pub struct QuizRunner {
    controller: StrokeQuizController,
    clock: FrameClock,
    attempts: AttemptQueue,
    /// Glyphs preloaded by the page; sessions for these start without a fetch.
    library: GlyphLibrary,
    /// Ticket of the glyph fetch the page is waiting on.
    loading: Option<SessionTicket>,
    #[cfg(feature = "vectors")]
    vectors: VectorState,
    #[cfg(feature = "vectors")]
    style: FrameStyle,
    events: Vec<EventRecord>,
    paths: Vec<String>,
    summary_json: String,
    assessment_json: String,
    /// Set by motion-value listeners whenever something visible moved.
    dirty: Rc<Cell<bool>>,
    listeners: Vec<(Channel, ListenerId)>,
    hint_listener: ListenerId,
}

impl QuizRunner {
    pub fn new(config: QuizConfig) -> Self {
        let clock = FrameClock::new(config.fixed_dt);
        let mut controller = StrokeQuizController::new(config);
        let dirty = Rc::new(Cell::new(true));

        let listeners = [Channel::Progress, Channel::Opacity, Channel::Scale]
            .into_iter()
            .map(|channel| {
                let flag = Rc::clone(&dirty);
                let id = controller.animator_mut().subscribe(channel, move |_| flag.set(true));
                (channel, id)
            })
            .collect();
        let flag = Rc::clone(&dirty);
        let hint_listener = controller.hints_mut().subscribe(move |_| flag.set(true));

        Self {
            controller,
            clock,
            attempts: AttemptQueue::new(),
            library: GlyphLibrary::new(),
            loading: None,
            #[cfg(feature = "vectors")]
            vectors: VectorState::new(),
            #[cfg(feature = "vectors")]
            style: FrameStyle::default(),
            events: Vec::with_capacity(16),
            paths: Vec::new(),
            summary_json: String::new(),
            assessment_json: String::new(),
            dirty,
            listeners,
            hint_listener,
        }
    }

    // ---- Session lifecycle ----

    /// Merge a JSON object of `character -> glyph data` into the preloaded
    /// library. Returns how many characters were added.
    pub fn load_library(&mut self, json: &str) -> Result<usize, GlyphError> {
        let loaded = GlyphLibrary::from_json(json)?;
        let count = loaded.len();
        self.library.extend(loaded);
        log::info!("glyph library now holds {} characters", self.library.len());
        Ok(count)
    }

    /// Start a session. Preloaded characters are delivered at once;
    /// otherwise the page is expected to fetch and call `deliver_glyph`.
    /// Returns true when the session is ready without a fetch.
    pub fn begin(&mut self, character: &str, outline_learned: bool) -> bool {
        self.attempts.clear();
        self.clock.reset();
        self.summary_json.clear();
        self.assessment_json.clear();
        self.loading = Some(self.controller.begin_session(character, outline_learned));
        self.dirty.set(true);

        if !self.library.contains(character) {
            return false;
        }
        let glyph = self.library.fetch(character);
        self.deliver(character, glyph);
        self.loading.is_none()
    }

    /// Deliver fetched glyph JSON for `character`. Returns false when no
    /// fetch for that character is pending.
    pub fn deliver_glyph(&mut self, character: &str, json: &str) -> bool {
        self.deliver(character, GlyphData::from_json(json))
    }

    /// Report that the glyph fetch for `character` failed.
    pub fn glyph_failed(&mut self, character: &str, message: &str) -> bool {
        self.deliver(character, Err(GlyphError::Provider(message.to_string())))
    }

    fn deliver(&mut self, character: &str, glyph: Result<GlyphData, GlyphError>) -> bool {
        let Some(ticket) = self.loading.as_ref().filter(|t| t.character() == character) else {
            log::debug!("no pending glyph fetch for {character:?}");
            return false;
        };
        let applied = self.controller.deliver_glyph(ticket, glyph);
        if !matches!(self.controller.phase(), QuizPhase::Loading { .. }) {
            self.loading = None;
        }
        applied
    }

    pub fn push_attempt(&mut self, attempt: StrokeAttempt) {
        self.attempts.push(attempt);
    }

    pub fn reset(&mut self) {
        self.attempts.clear();
        self.summary_json.clear();
        self.assessment_json.clear();
        self.controller.reset();
        self.dirty.set(true);
    }

    pub fn end(&mut self) {
        self.attempts.clear();
        self.loading = None;
        self.controller.end_session();
        self.dirty.set(true);
    }

    pub fn pictogram_intro(&mut self, paths: &[String]) -> Option<MorphId> {
        self.controller.play_pictogram_intro(paths)
    }

    pub fn skip_morph(&mut self, id: MorphId) -> bool {
        self.controller.skip_morph(id)
    }

    // ---- Frame ----

    /// Run one frame: apply queued attempts, advance fixed steps, rebuild
    /// the per-frame buffers.
    pub fn tick(&mut self, dt: f32) {
        for attempt in self.attempts.drain() {
            self.controller.submit_attempt(attempt);
        }

        let steps = self.clock.accumulate(dt);
        for _ in 0..steps {
            self.controller.tick(self.clock.step());
        }

        self.events.clear();
        for event in self.controller.drain_events() {
            self.events.push(EventRecord::from(&event));
            if let QuizEvent::Completed(summary) = &event {
                self.summary_json = to_json(summary);
                if let Some(assessment) = self.controller.assessment() {
                    self.assessment_json = to_json(&assessment);
                }
            }
        }

        let frame = self.controller.render_frame();
        #[cfg(feature = "vectors")]
        {
            self.vectors.clear();
            self.vectors.draw_frame(&frame, &self.style);
        }
        self.paths = frame.morph_paths;
    }

    // ---- Accessors ----

    pub fn controller(&self) -> &StrokeQuizController {
        &self.controller
    }

    pub fn events_ptr(&self) -> *const f32 {
        bytemuck::cast_slice::<EventRecord, f32>(&self.events).as_ptr()
    }

    pub fn events_len(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn morph_paths(&self) -> &[String] {
        &self.paths
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.vectors.buffer_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertex_count(&self) -> u32 {
        self.vectors.vertex_count() as u32
    }

    pub fn opacity(&self) -> f32 {
        self.controller.animator().opacity()
    }

    pub fn scale(&self) -> f32 {
        self.controller.animator().scale()
    }

    /// `[x, y]` of the hint marker, or empty while it is hidden.
    pub fn marker(&self) -> Vec<f32> {
        self.controller
            .hints()
            .marker()
            .map(|p| vec![p.x, p.y])
            .unwrap_or_default()
    }

    /// Hidden canonical stroke, or -1.
    pub fn hidden_stroke(&self) -> i32 {
        self.controller
            .animator()
            .hidden_stroke()
            .map_or(-1, |s| s as i32)
    }

    /// 0 idle, 1 loading, 2 awaiting a stroke, 3 completed.
    pub fn phase_code(&self) -> u32 {
        match self.controller.phase() {
            QuizPhase::Idle => 0,
            QuizPhase::Loading { .. } => 1,
            QuizPhase::AwaitingStroke(_) => 2,
            QuizPhase::Completed => 3,
        }
    }

    /// Awaited stroke index, or -1.
    pub fn current_stroke(&self) -> i32 {
        match self.controller.phase() {
            QuizPhase::AwaitingStroke(i) => i as i32,
            _ => -1,
        }
    }

    pub fn show_reference(&self) -> bool {
        self.controller
            .session()
            .is_some_and(|s| s.is_guided() && !s.has_attempted())
    }

    pub fn summary_json(&self) -> &str {
        &self.summary_json
    }

    pub fn assessment_json(&self) -> &str {
        &self.assessment_json
    }

    /// Whether anything visible changed since the last call.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }
}

impl Drop for QuizRunner {
    fn drop(&mut self) {
        for (channel, id) in self.listeners.drain(..) {
            self.controller.animator_mut().unsubscribe(channel, id);
        }
        self.controller.hints_mut().unsubscribe(self.hint_listener);
        self.controller.end_session();
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("failed to serialize quiz output: {e}");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkstep_engine::DrawnStroke;

    const DT: f32 = 1.0 / 60.0;

    const GLYPH: &str = r#"{
        "strokes": [
            "M 150 700 L 850 700 L 850 650 L 150 650 Z",
            "M 150 400 L 850 400 L 850 350 L 150 350 Z"
        ],
        "medians": [[[150, 675], [850, 675]], [[150, 375], [850, 375]]]
    }"#;

    fn drawn(y: f32) -> DrawnStroke {
        let coords: Vec<f32> = (0..15).flat_map(|i| [160.0 + i as f32 * 48.0, y]).collect();
        DrawnStroke::from_flat(&coords, false)
    }

    fn ready_runner() -> QuizRunner {
        let mut runner = QuizRunner::new(QuizConfig::default());
        runner.begin("二", true);
        assert!(runner.deliver_glyph("二", GLYPH));
        runner.tick(DT);
        runner
    }

    #[test]
    fn full_session_produces_summary() {
        let mut runner = ready_runner();
        assert_eq!(runner.phase_code(), 2);

        runner.push_attempt(StrokeAttempt::rejected(0, drawn(675.0), 1));
        runner.push_attempt(StrokeAttempt::accepted(0, drawn(675.0), 1));
        runner.push_attempt(StrokeAttempt::accepted(1, drawn(375.0), 0));
        runner.tick(DT);

        assert_eq!(runner.phase_code(), 3);
        assert!(runner
            .events()
            .iter()
            .any(|e| e.kind == EventRecord::COMPLETED && e.a == 2.0 && e.b == 1.0));
        assert!(runner.summary_json().contains("\"totalMistakes\":1"));
        assert!(runner.assessment_json().contains("\"rating\":\"good\""));
        assert_eq!(runner.morph_paths().len(), 1);
        assert_eq!(runner.hidden_stroke(), 1);
    }

    #[test]
    fn glyph_for_another_character_is_ignored() {
        let mut runner = QuizRunner::new(QuizConfig::default());
        runner.begin("日", true);
        assert!(!runner.deliver_glyph("月", GLYPH));
        assert_eq!(runner.phase_code(), 1);
        runner.glyph_failed("日", "timeout");
        runner.tick(DT);
        assert!(runner.events().iter().any(|e| e.kind == EventRecord::GLYPH_UNAVAILABLE));
        assert!(runner.deliver_glyph("日", GLYPH));
        assert_eq!(runner.phase_code(), 2);
    }

    #[test]
    fn dirty_flag_tracks_animation() {
        let mut runner = ready_runner();
        runner.take_dirty();
        runner.tick(DT);
        assert!(!runner.take_dirty());

        runner.push_attempt(StrokeAttempt::accepted(0, drawn(675.0), 0));
        runner.tick(DT);
        assert!(runner.take_dirty());
    }

    #[test]
    fn preloaded_characters_start_without_fetch() {
        let mut runner = QuizRunner::new(QuizConfig::default());
        let library = format!(r#"{{ "二": {GLYPH} }}"#);
        assert_eq!(runner.load_library(&library).ok(), Some(1));

        assert!(runner.begin("二", true));
        assert_eq!(runner.phase_code(), 2);
        // Late page fetches for it are stale now.
        assert!(!runner.deliver_glyph("二", GLYPH));

        assert!(!runner.begin("三", true));
        assert_eq!(runner.phase_code(), 1);
        assert!(runner.load_library("{ not json").is_err());
    }

    #[test]
    fn event_buffer_is_flat_floats() {
        let mut runner = ready_runner();
        runner.push_attempt(StrokeAttempt::accepted(0, drawn(675.0), 0));
        runner.tick(DT);
        let floats = bytemuck::cast_slice::<EventRecord, f32>(runner.events());
        assert_eq!(floats.len(), runner.events_len() as usize * EventRecord::FLOATS);
        assert_eq!(floats[0], EventRecord::STROKE_ACCEPTED);
        assert_eq!(runner.events_ptr(), floats.as_ptr());
    }

    #[test]
    fn guided_session_shows_marker() {
        let mut runner = QuizRunner::new(QuizConfig::default());
        runner.begin("二", false);
        runner.deliver_glyph("二", GLYPH);
        runner.tick(DT);
        assert!(runner.show_reference());
        assert_eq!(runner.marker().len(), 2);
        runner.end();
        runner.tick(DT);
        assert!(runner.marker().is_empty());
        assert_eq!(runner.phase_code(), 0);
    }
}
