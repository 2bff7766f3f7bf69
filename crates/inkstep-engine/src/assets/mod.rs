pub mod glyph;
pub mod library;
