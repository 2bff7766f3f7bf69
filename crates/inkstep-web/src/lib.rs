pub mod runner;

use std::cell::RefCell;

use inkstep_engine::{DrawnStroke, MorphId, QuizConfig, StrokeAttempt};
use wasm_bindgen::prelude::*;

use runner::QuizRunner;

thread_local! {
    static RUNNER: RefCell<Option<QuizRunner>> = RefCell::new(None);
}

/// Run `f` against the live runner. Before `quiz_init` every call is a
/// no-op that yields `R::default()`.
fn with_runner<R: Default>(f: impl FnOnce(&mut QuizRunner) -> R) -> R {
    RUNNER.with(|r| match r.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            // console_log may not be installed yet, so go straight to the console.
            web_sys::console::warn_1(&JsValue::from_str("inkstep: quiz_init has not been called"));
            R::default()
        }
    })
}

// ---- Lifecycle ----

/// Create the runner. `config_json` may be empty for defaults; unparsable
/// config falls back to defaults with a warning.
#[wasm_bindgen]
pub fn quiz_init(config_json: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = if config_json.trim().is_empty() {
        QuizConfig::default()
    } else {
        QuizConfig::from_json(config_json).unwrap_or_else(|e| {
            log::warn!("invalid quiz config, using defaults: {e}");
            QuizConfig::default()
        })
    };
    RUNNER.with(|r| *r.borrow_mut() = Some(QuizRunner::new(config)));
}

/// Preload glyph data for many characters. Returns how many were added, or
/// -1 when the JSON is unusable.
#[wasm_bindgen]
pub fn quiz_load_library(library_json: &str) -> i32 {
    with_runner(|r| match r.load_library(library_json) {
        Ok(count) => Some(count as i32),
        Err(e) => {
            log::warn!("glyph library rejected: {e}");
            Some(-1)
        }
    })
    .unwrap_or(-1)
}

/// Returns true when the character was preloaded and the session is ready;
/// otherwise fetch its glyph data and call `quiz_deliver_glyph`.
#[wasm_bindgen]
pub fn quiz_begin(character: &str, outline_learned: bool) -> bool {
    with_runner(|r| r.begin(character, outline_learned))
}

#[wasm_bindgen]
pub fn quiz_deliver_glyph(character: &str, glyph_json: &str) -> bool {
    with_runner(|r| r.deliver_glyph(character, glyph_json))
}

#[wasm_bindgen]
pub fn quiz_glyph_failed(character: &str, message: &str) -> bool {
    with_runner(|r| r.glyph_failed(character, message))
}

/// `points` is the drawn stroke as flat `[x0, y0, x1, y1, ...]` in glyph
/// coordinates.
#[wasm_bindgen]
pub fn quiz_stroke_attempt(
    stroke_index: u32,
    accepted: bool,
    points: &[f32],
    backwards: bool,
    mistakes_on_stroke: u32,
) {
    let drawn = DrawnStroke::from_flat(points, backwards);
    let attempt = if accepted {
        StrokeAttempt::accepted(stroke_index as usize, drawn, mistakes_on_stroke)
    } else {
        StrokeAttempt::rejected(stroke_index as usize, drawn, mistakes_on_stroke)
    };
    with_runner(|r| r.push_attempt(attempt));
}

#[wasm_bindgen]
pub fn quiz_reset() {
    with_runner(|r| r.reset());
}

#[wasm_bindgen]
pub fn quiz_end() {
    with_runner(|r| r.end());
}

/// Morph the pictogram paths into the character. Returns the morph id, or
/// -1 when nothing plays.
#[wasm_bindgen]
pub fn quiz_pictogram_intro(paths: js_sys::Array) -> f64 {
    let paths: Vec<String> = paths.iter().filter_map(|v| v.as_string()).collect();
    with_runner(|r| r.pictogram_intro(&paths)).map_or(-1.0, |id| id.0 as f64)
}

#[wasm_bindgen]
pub fn quiz_skip_morph(id: f64) -> bool {
    if !id.is_finite() || id < 0.0 {
        return false;
    }
    with_runner(|r| r.skip_morph(MorphId(id as u64)))
}

#[wasm_bindgen]
pub fn quiz_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Frame output ----

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_vector_vertices_ptr() -> *const f32 {
    with_runner(|r| Some(r.vector_vertices_ptr())).unwrap_or(std::ptr::null())
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_vector_vertex_count() -> u32 {
    with_runner(|r| r.vector_vertex_count())
}

#[wasm_bindgen]
pub fn get_events_ptr() -> *const f32 {
    with_runner(|r| Some(r.events_ptr())).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_events_len() -> u32 {
    with_runner(|r| r.events_len())
}

#[wasm_bindgen]
pub fn get_morph_paths() -> js_sys::Array {
    with_runner(|r| {
        Some(
            r.morph_paths()
                .iter()
                .map(|p| JsValue::from_str(p))
                .collect::<js_sys::Array>(),
        )
    })
    .unwrap_or_else(js_sys::Array::new)
}

#[wasm_bindgen]
pub fn get_morph_opacity() -> f32 {
    with_runner(|r| r.opacity())
}

#[wasm_bindgen]
pub fn get_morph_scale() -> f32 {
    with_runner(|r| r.scale())
}

/// `[x, y]`, or empty while the hint marker is hidden.
#[wasm_bindgen]
pub fn get_hint_marker() -> Vec<f32> {
    with_runner(|r| r.marker())
}

#[wasm_bindgen]
pub fn get_hidden_stroke() -> i32 {
    with_runner(|r| Some(r.hidden_stroke())).unwrap_or(-1)
}

#[wasm_bindgen]
pub fn get_quiz_phase() -> u32 {
    with_runner(|r| r.phase_code())
}

#[wasm_bindgen]
pub fn get_current_stroke() -> i32 {
    with_runner(|r| Some(r.current_stroke())).unwrap_or(-1)
}

#[wasm_bindgen]
pub fn get_show_reference() -> bool {
    with_runner(|r| r.show_reference())
}

#[wasm_bindgen]
pub fn get_summary_json() -> String {
    with_runner(|r| r.summary_json().to_string())
}

#[wasm_bindgen]
pub fn get_assessment_json() -> String {
    with_runner(|r| r.assessment_json().to_string())
}

#[wasm_bindgen]
pub fn take_dirty() -> bool {
    with_runner(|r| r.take_dirty())
}
