use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{flatten_subpaths, polyline_length, PathError};

/// Side of the square canvas pictogram art is authored on (Y-down).
pub const PICTOGRAM_CANVAS: f32 = 1024.0;

#[derive(Debug, Error)]
pub enum GlyphError {
    #[error("glyph JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("glyph has no strokes")]
    NoStrokes,
    #[error("glyph has {strokes} strokes but {medians} medians")]
    MedianCountMismatch { strokes: usize, medians: usize },
    #[error("no glyph data for {0:?}")]
    UnknownCharacter(String),
    #[error("glyph provider failed: {0}")]
    Provider(String),
}

/// Stroke data for one character, in drawing order.
/// Outlines are SVG path data and medians are centerline points, both in
/// the glyph's Y-up coordinate space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphData {
    pub strokes: Vec<String>,
    pub medians: Vec<Vec<[f32; 2]>>,
}

impl GlyphData {
    /// Parse and validate glyph data from a JSON string. Unknown fields are ignored.
    pub fn from_json(json: &str) -> Result<Self, GlyphError> {
        let glyph: Self = serde_json::from_str(json)?;
        glyph.validate()?;
        Ok(glyph)
    }

    pub fn validate(&self) -> Result<(), GlyphError> {
        if self.strokes.is_empty() {
            return Err(GlyphError::NoStrokes);
        }
        if self.strokes.len() != self.medians.len() {
            return Err(GlyphError::MedianCountMismatch {
                strokes: self.strokes.len(),
                medians: self.medians.len(),
            });
        }
        Ok(())
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Per-stroke shapes with medians mapped into view space.
    pub fn shapes(&self, bounds: &CharacterBounds) -> Vec<StrokeShape> {
        self.strokes
            .iter()
            .zip(&self.medians)
            .map(|(outline, median)| StrokeShape {
                outline: outline.clone(),
                median: median.iter().map(|p| bounds.to_view(Vec2::from(*p))).collect(),
            })
            .collect()
    }
}

/// Coordinate box of glyph data. Glyph Y grows upward; view Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CharacterBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for CharacterBounds {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            max_x: 1024.0,
            min_y: -124.0,
            max_y: 900.0,
        }
    }
}

impl CharacterBounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Glyph space → view space (flip Y within the box).
    pub fn to_view(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x, self.min_y + self.max_y - p.y)
    }

    /// Pictogram canvas (Y-down, 0..1024) → view space. The art is first
    /// mirrored into glyph space so it lines up with the strokes.
    pub fn pictogram_to_view(&self, p: Vec2) -> Vec2 {
        self.to_view(Vec2::new(p.x, PICTOGRAM_CANVAS - p.y))
    }
}

/// One canonical stroke: fill outline plus its centerline in view space.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeShape {
    pub outline: String,
    pub median: Vec<Vec2>,
}

impl StrokeShape {
    /// Flattened outline boundary in view space. Strokes with several
    /// subpaths use the longest one.
    pub fn outline_points(
        &self,
        bounds: &CharacterBounds,
        tolerance: f32,
    ) -> Result<Vec<Vec2>, PathError> {
        let subpaths = flatten_subpaths(&self.outline, tolerance)?;
        Ok(longest(subpaths)
            .into_iter()
            .map(|p| bounds.to_view(p))
            .collect())
    }
}

/// The subpath with the greatest arc length, or empty.
fn longest(subpaths: Vec<Vec<Vec2>>) -> Vec<Vec2> {
    subpaths
        .into_iter()
        .map(|s| (polyline_length(&s), s))
        .fold((f32::NEG_INFINITY, Vec::new()), |best, next| {
            if next.0 > best.0 { next } else { best }
        })
        .1
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_STROKES: &str = r#"{
        "character": "二",
        "strokes": [
            "M 200 600 L 800 600 L 800 550 L 200 550 Z",
            "M 100 200 L 900 200 L 900 140 L 100 140 Z"
        ],
        "medians": [[[200, 575], [800, 575]], [[100, 170], [900, 170]]],
        "radStrokes": [0]
    }"#;

    #[test]
    fn parses_and_ignores_extra_fields() {
        let glyph = GlyphData::from_json(TWO_STROKES).unwrap();
        assert_eq!(glyph.stroke_count(), 2);
        assert_eq!(glyph.medians[1][1], [900.0, 170.0]);
    }

    #[test]
    fn empty_strokes_rejected() {
        let err = GlyphData::from_json(r#"{ "strokes": [], "medians": [] }"#).unwrap_err();
        assert!(matches!(err, GlyphError::NoStrokes));
    }

    #[test]
    fn median_mismatch_rejected() {
        let err = GlyphData::from_json(r#"{ "strokes": ["M 0 0 L 1 1"], "medians": [] }"#)
            .unwrap_err();
        assert!(matches!(err, GlyphError::MedianCountMismatch { strokes: 1, medians: 0 }));
    }

    #[test]
    fn view_flip() {
        let bounds = CharacterBounds::default();
        assert_eq!(bounds.to_view(Vec2::new(10.0, 900.0)), Vec2::new(10.0, -124.0));
        assert_eq!(bounds.to_view(Vec2::new(10.0, 0.0)), Vec2::new(10.0, 776.0));
        assert_eq!(bounds.width(), 1024.0);
        assert_eq!(bounds.height(), 1024.0);
    }

    #[test]
    fn pictogram_maps_top_to_top() {
        let bounds = CharacterBounds::default();
        // Canvas top-left lands at the top of the glyph box in view space.
        assert_eq!(bounds.pictogram_to_view(Vec2::new(0.0, 124.0)), Vec2::new(0.0, -124.0));
    }

    #[test]
    fn shapes_map_medians_to_view() {
        let glyph = GlyphData::from_json(TWO_STROKES).unwrap();
        let shapes = glyph.shapes(&CharacterBounds::default());
        assert_eq!(shapes[0].median[0], Vec2::new(200.0, 201.0));
        let outline = shapes[0].outline_points(&CharacterBounds::default(), 0.5).unwrap();
        assert!(outline.len() >= 4);
        assert!(outline.iter().all(|p| p.y >= 176.0 - 0.01 && p.y <= 226.0 + 0.01));
    }
}
