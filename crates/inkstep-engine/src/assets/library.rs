use std::collections::HashMap;

use super::glyph::{GlyphData, GlyphError};

/// In-memory glyph provider keyed by character.
/// Loaded from a JSON object mapping characters to glyph data.
#[derive(Debug, Clone, Default)]
pub struct GlyphLibrary {
    glyphs: HashMap<String, GlyphData>,
}

impl GlyphLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{ "<char>": { "strokes": [...], "medians": [...] }, ... }`.
    /// Every entry is validated; the first invalid one fails the load.
    pub fn from_json(json: &str) -> Result<Self, GlyphError> {
        let glyphs: HashMap<String, GlyphData> = serde_json::from_str(json)?;
        for glyph in glyphs.values() {
            glyph.validate()?;
        }
        Ok(Self { glyphs })
    }

    pub fn insert(&mut self, character: impl Into<String>, glyph: GlyphData) {
        self.glyphs.insert(character.into(), glyph);
    }

    /// Merge `other` in; its entries win on conflicts.
    pub fn extend(&mut self, other: GlyphLibrary) {
        self.glyphs.extend(other.glyphs);
    }

    /// Look up a character's glyph data.
    pub fn get(&self, character: &str) -> Option<&GlyphData> {
        self.glyphs.get(character)
    }

    /// Owned lookup in the shape a glyph delivery expects.
    pub fn fetch(&self, character: &str) -> Result<GlyphData, GlyphError> {
        self.get(character)
            .cloned()
            .ok_or_else(|| GlyphError::UnknownCharacter(character.to_string()))
    }

    pub fn contains(&self, character: &str) -> bool {
        self.glyphs.contains_key(character)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY: &str = r#"{
        "一": { "strokes": ["M 100 400 L 900 400 L 900 350 L 100 350 Z"], "medians": [[[100, 375], [900, 375]]] },
        "丨": { "strokes": ["M 490 800 L 540 800 L 540 0 L 490 0 Z"], "medians": [[[515, 800], [515, 0]]] }
    }"#;

    #[test]
    fn loads_many_characters() {
        let library = GlyphLibrary::from_json(LIBRARY).unwrap();
        assert_eq!(library.len(), 2);
        assert!(library.contains("一"));
        assert_eq!(library.get("丨").map(|g| g.stroke_count()), Some(1));
    }

    #[test]
    fn unknown_character_is_an_error() {
        let library = GlyphLibrary::from_json(LIBRARY).unwrap();
        assert!(matches!(library.fetch("人"), Err(GlyphError::UnknownCharacter(c)) if c == "人"));
    }

    #[test]
    fn extend_merges_and_overrides() {
        let mut library = GlyphLibrary::from_json(LIBRARY).unwrap();
        let mut other = GlyphLibrary::new();
        let two = library.fetch("一").map(|mut g| {
            g.strokes.push(g.strokes[0].clone());
            g.medians.push(g.medians[0].clone());
            g
        });
        other.insert("一", two.unwrap());
        other.insert("人", library.fetch("丨").unwrap());
        library.extend(other);
        assert_eq!(library.len(), 3);
        assert_eq!(library.get("一").map(|g| g.stroke_count()), Some(2));
    }

    #[test]
    fn invalid_entry_fails_the_load() {
        let err = GlyphLibrary::from_json(r#"{ "x": { "strokes": [], "medians": [] } }"#).unwrap_err();
        assert!(matches!(err, GlyphError::NoStrokes));
    }
}
