//! Turning an accepted stroke (or a pictogram) into a [`MorphState`].
//!
//! The drawn line is extruded into an outline of the user's pen width,
//! resampled to the configured point count, and aligned to the canonical
//! outline so every source point has a matching target point.

use glam::Vec2;
use thiserror::Error;

use super::morph::{MorphShape, MorphState};
use crate::api::config::QuizConfig;
use crate::api::types::MorphId;
use crate::assets::glyph::StrokeShape;
use crate::geometry::{
    align_closed, build_outline, ensure_closed, flatten_subpaths, polyline_length, resample,
    resample_closed, PathError,
};
use crate::input::queue::DrawnStroke;

/// Upper bound on points per pictogram shape.
const MAX_PICTOGRAM_POINTS: usize = 512;
/// Fewest points the drawn line is reduced to before extrusion.
const MIN_LINE_POINTS: usize = 12;
/// Fewest points the canonical outline is densified to before closing.
const MIN_TARGET_POINTS: usize = 120;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MorphError {
    #[error("unusable path description: {0}")]
    Path(#[from] PathError),
    #[error("no outline available for the {0}")]
    Degenerate(&'static str),
    #[error("point counts differ ({from} vs {to})")]
    CountMismatch { from: usize, to: usize },
    #[error("nothing to morph")]
    Empty,
}

/// Build the morph for an accepted stroke.
pub fn prepare_stroke_morph(
    id: MorphId,
    stroke_index: usize,
    drawn: &DrawnStroke,
    target: &StrokeShape,
    config: &QuizConfig,
) -> Result<MorphState, MorphError> {
    let n = config.sample_points;
    if n == 0 {
        return Err(MorphError::Degenerate("sample count"));
    }

    let bounds = &config.bounds;
    let line: Vec<Vec2> = drawn.ordered().into_iter().map(|p| bounds.to_view(p)).collect();
    if line.len() < 2 || polyline_length(&line) == 0.0 {
        return Err(MorphError::Degenerate("drawn stroke"));
    }
    let line = resample(&line, (n / 2).max(MIN_LINE_POINTS));
    let user_outline = build_outline(&line, config.user_stroke_width);
    if user_outline.is_empty() {
        return Err(MorphError::Degenerate("drawn stroke"));
    }
    let source = resample_closed(&user_outline, n);

    let polygon = stroke_polygon(target, config)?;
    let dense = resample(&ensure_closed(&polygon), (2 * n).max(MIN_TARGET_POINTS));
    let target = resample_closed(&dense, n);

    let alignment = align_closed(&target, &source).ok_or(MorphError::CountMismatch {
        from: source.len(),
        to: target.len(),
    })?;

    Ok(MorphState {
        id,
        shapes: vec![MorphShape::new(alignment.aligned, alignment.reference)?],
        hidden_stroke: Some(stroke_index),
    })
}

/// Build the pictogram → character morph. Every pictogram subpath becomes one
/// shape; the shorter of the two lists is padded with its last entry.
pub fn prepare_pictogram_morph(
    id: MorphId,
    pictogram: &[String],
    strokes: &[StrokeShape],
    config: &QuizConfig,
) -> Result<MorphState, MorphError> {
    let bounds = &config.bounds;
    let mut sources = Vec::new();
    for d in pictogram {
        for subpath in flatten_subpaths(d, config.tolerance)? {
            if subpath.len() >= 3 {
                sources.push(subpath.into_iter().map(|p| bounds.pictogram_to_view(p)).collect::<Vec<_>>());
            }
        }
    }
    let targets = strokes
        .iter()
        .map(|s| stroke_polygon(s, config))
        .collect::<Result<Vec<_>, _>>()?;

    let (Some(last_source), Some(last_target)) = (sources.last(), targets.last()) else {
        return Err(MorphError::Empty);
    };
    let count = sources.len().max(targets.len());
    let mut shapes = Vec::with_capacity(count);
    for i in 0..count {
        let from = sources.get(i).unwrap_or(last_source);
        let to = targets.get(i).unwrap_or(last_target);
        shapes.push(path_shape(from, to, config)?);
    }

    Ok(MorphState { id, shapes, hidden_stroke: None })
}

/// Canonical outline polygon for a stroke in view space, falling back to the
/// median extruded at the user's pen width.
fn stroke_polygon(stroke: &StrokeShape, config: &QuizConfig) -> Result<Vec<Vec2>, MorphError> {
    match stroke.outline_points(&config.bounds, config.tolerance) {
        Ok(points) if points.len() >= 3 => return Ok(points),
        Ok(_) => log::debug!("stroke outline is empty, using its median"),
        Err(e) => log::debug!("stroke outline unusable ({e}), using its median"),
    }
    let fallback = build_outline(&stroke.median, config.user_stroke_width);
    if fallback.is_empty() {
        return Err(MorphError::Degenerate("canonical stroke"));
    }
    Ok(fallback)
}

fn path_shape(from: &[Vec2], to: &[Vec2], config: &QuizConfig) -> Result<MorphShape, MorphError> {
    let perimeter = polyline_length(&ensure_closed(from)).max(polyline_length(&ensure_closed(to)));
    let segment = config.pictogram_segment_length.max(f32::EPSILON);
    let count = ((perimeter / segment).ceil() as usize)
        .max(config.sample_points)
        .clamp(3, MAX_PICTOGRAM_POINTS);

    let source = resample_closed(from, count);
    let target = resample_closed(to, count);
    let alignment = align_closed(&target, &source).ok_or(MorphError::CountMismatch {
        from: source.len(),
        to: target.len(),
    })?;
    MorphShape::new(alignment.aligned, alignment.reference)
}
