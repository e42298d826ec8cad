//! Per-frame draw output.
//!
//! A [`DrawList`] is the boundary to the host renderer: flushed triangle
//! batches become [`DrawCall`]s, and debug overlays go through immediate
//! line/point primitives that bypass batching entirely.

use glam::{Mat4, Vec2};

use crate::pose::PageId;

use super::blend::BlendState;
use super::vertex::{Color, Vertex2d};

/// One flushed batch: a single texture page, a single blend state, one
/// draw call's worth of triangles.
#[derive(Debug, Clone)]
pub struct DrawCall {
    pub page: PageId,
    pub blend: BlendState,
    /// Model transform for every vertex in this call.
    pub transform: Mat4,
    pub vertices: Vec<Vertex2d>,
    pub indices: Vec<u16>,
}

impl DrawCall {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Immediate-mode debug line segment (world space).
#[derive(Debug, Clone, Copy)]
pub struct DebugLine {
    pub from: Vec2,
    pub to: Vec2,
    pub color: Color,
    pub width: f32,
}

/// Immediate-mode debug point (world space).
#[derive(Debug, Clone, Copy)]
pub struct DebugPoint {
    pub position: Vec2,
    pub color: Color,
    pub size: f32,
}

/// Sink for one frame's submitted rendering.
#[derive(Debug, Default)]
pub struct DrawList {
    draws: Vec<DrawCall>,
    lines: Vec<DebugLine>,
    points: Vec<DebugPoint>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_draw(&mut self, draw: DrawCall) {
        log::trace!(
            "draw call: page {:?}, {} triangle(s)",
            draw.page,
            draw.triangle_count()
        );
        self.draws.push(draw);
    }

    pub fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.lines.push(DebugLine {
            from,
            to,
            color,
            width,
        });
    }

    pub fn draw_point(&mut self, position: Vec2, color: Color, size: f32) {
        self.points.push(DebugPoint {
            position,
            color,
            size,
        });
    }

    /// Draw a closed polygon outline as line segments.
    pub fn draw_poly(&mut self, points: &[Vec2], color: Color, width: f32) {
        for i in 0..points.len() {
            let next = (i + 1) % points.len();
            self.draw_line(points[i], points[next], color, width);
        }
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    pub fn lines(&self) -> &[DebugLine] {
        &self.lines
    }

    pub fn points(&self) -> &[DebugPoint] {
        &self.points
    }

    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty() && self.lines.is_empty() && self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.draws.clear();
        self.lines.clear();
        self.points.clear();
    }
}
