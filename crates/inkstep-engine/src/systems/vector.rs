//! Lyon-based tessellation of the live quiz overlay.
//!
//! Turns a [`RenderFrame`] into a flat triangle list the host can upload as
//! is: morph shapes filled at the overlay's opacity and scale, plus the
//! guided hint marker.
//!
//! ```ignore
//! vectors.clear();
//! vectors.draw_frame(&controller.render_frame(), &FrameStyle::default());
//! upload(vectors.buffer());
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    VertexBuffers,
};

use crate::quiz::controller::RenderFrame;

/// Per-vertex data for the overlay.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// RGBA color, components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// Colors and sizes used by [`VectorState::draw_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStyle {
    pub stroke_color: VectorColor,
    pub marker_color: VectorColor,
    pub marker_radius: f32,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            stroke_color: VectorColor::rgb8(0xf9, 0x73, 0x16),
            marker_color: VectorColor::rgb8(0x38, 0xbd, 0xf8),
            marker_radius: 28.0,
        }
    }
}

struct FillVertexCtor {
    color: VectorColor,
}

impl FillVertexConstructor<VectorVertex> for FillVertexCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        VectorVertex {
            x: vertex.position().x,
            y: vertex.position().y,
            r: self.color.r,
            g: self.color.g,
            b: self.color.b,
            a: self.color.a,
        }
    }
}

/// Fill tessellator plus the output buffer, cleared each frame.
pub struct VectorState {
    fill_tess: FillTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
}

impl VectorState {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(4096 * VectorVertex::FLOATS),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    /// Flat `[x, y, r, g, b, a, ...]` triangle list.
    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    /// Fill a polygon, closed automatically. Concave and self-touching
    /// outlines are fine (non-zero fill).
    pub fn fill_polygon(&mut self, points: &[Vec2], color: VectorColor) {
        if points.len() < 3 {
            return;
        }

        let mut builder = Path::builder();
        builder.begin(point(points[0].x, points[0].y));
        for p in &points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.close();
        let path = builder.build();

        self.fill_path(&path, color);
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: VectorColor) {
        if radius <= 0.0 {
            return;
        }

        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, lyon::path::Winding::Positive);
        let path = builder.build();

        self.fill_path(&path, color);
    }

    pub fn fill_path(&mut self, path: &Path, color: VectorColor) {
        let options = FillOptions::tolerance(0.5).with_fill_rule(lyon::tessellation::FillRule::NonZero);
        let result = self.fill_tess.tessellate_path(
            path,
            &options,
            &mut BuffersBuilder::new(&mut self.geometry, FillVertexCtor { color }),
        );

        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => {
                log::debug!("tessellation failed: {e:?}");
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    /// Append the overlay of one frame: morph shapes, then the hint marker.
    pub fn draw_frame(&mut self, frame: &RenderFrame, style: &FrameStyle) {
        if frame.opacity > 0.0 && !frame.morph_shapes.is_empty() {
            let color = style.stroke_color.with_alpha(style.stroke_color.a * frame.opacity.min(1.0));
            let center = centroid(&frame.morph_shapes);
            for shape in &frame.morph_shapes {
                if frame.scale == 1.0 {
                    self.fill_polygon(shape, color);
                } else {
                    let scaled: Vec<Vec2> =
                        shape.iter().map(|p| center + (*p - center) * frame.scale).collect();
                    self.fill_polygon(&scaled, color);
                }
            }
        }
        if let Some(marker) = frame.marker {
            self.fill_circle(marker, style.marker_radius, style.marker_color);
        }
    }
}

impl Default for VectorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean of all points across shapes.
fn centroid(shapes: &[Vec<Vec2>]) -> Vec2 {
    let (sum, count) = shapes
        .iter()
        .flatten()
        .fold((Vec2::ZERO, 0usize), |(sum, n), p| (sum + *p, n + 1));
    if count == 0 { Vec2::ZERO } else { sum / count as f32 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::controller::QuizPhase;

    fn frame(shapes: Vec<Vec<Vec2>>, opacity: f32, scale: f32, marker: Option<Vec2>) -> RenderFrame {
        RenderFrame {
            phase: QuizPhase::AwaitingStroke(1),
            morph_paths: Vec::new(),
            morph_shapes: shapes,
            opacity,
            scale,
            hidden_stroke: Some(0),
            marker,
            show_reference: false,
            completed_strokes: 1,
        }
    }

    fn rect() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 50.0),
            Vec2::new(0.0, 50.0),
        ]
    }

    fn vertices(state: &VectorState) -> Vec<VectorVertex> {
        bytemuck::cast_slice::<f32, VectorVertex>(state.buffer()).to_vec()
    }

    #[test]
    fn vector_vertex_is_24_bytes() {
        assert_eq!(std::mem::size_of::<VectorVertex>(), VectorVertex::STRIDE_BYTES);
    }

    #[test]
    fn morph_shape_uses_overlay_opacity() {
        let mut state = VectorState::new();
        state.draw_frame(&frame(vec![rect()], 0.5, 1.0, None), &FrameStyle::default());
        let verts = vertices(&state);
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().all(|v| (v.a - 0.5).abs() < 1e-6));
        assert!((verts[0].r - 249.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn scale_is_about_the_centroid() {
        let mut state = VectorState::new();
        state.draw_frame(&frame(vec![rect()], 1.0, 1.1, None), &FrameStyle::default());
        let verts = vertices(&state);
        let min_x = verts.iter().map(|v| v.x).fold(f32::INFINITY, f32::min);
        let max_x = verts.iter().map(|v| v.x).fold(f32::NEG_INFINITY, f32::max);
        assert!((min_x + 5.0).abs() < 1e-3);
        assert!((max_x - 105.0).abs() < 1e-3);
    }

    #[test]
    fn invisible_overlay_draws_only_marker() {
        let mut state = VectorState::new();
        state.draw_frame(&frame(vec![rect()], 0.0, 1.0, None), &FrameStyle::default());
        assert_eq!(state.vertex_count(), 0);

        state.draw_frame(&frame(vec![], 0.0, 1.0, Some(Vec2::new(50.0, 50.0))), &FrameStyle::default());
        assert!(state.vertex_count() > 0);
        state.clear();
        assert_eq!(state.vertex_count(), 0);
    }

    #[test]
    fn degenerate_polygon_is_skipped() {
        let mut state = VectorState::new();
        state.fill_polygon(&[Vec2::ZERO, Vec2::ONE], VectorColor::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(state.vertex_count(), 0);
    }
}
