//! Growable triangle batching surface.
//!
//! A [`TriangleBatch`] accumulates triangles that share one texture page
//! and one blend state. Crossing either boundary flushes the open batch
//! into a [`DrawList`] as a single [`DrawCall`](super::DrawCall).
//! Capacity is counted in triangles and grows by doubling, flushing
//! accumulated geometry before each doubling step; flushed output is
//! never touched by growth.

use glam::Mat4;

use crate::pose::PageId;

use super::blend::BlendState;
use super::draw_list::{DrawCall, DrawList};
use super::vertex::Vertex2d;

/// Initial triangle capacity.
pub const DEFAULT_TRIANGLE_CAPACITY: usize = 128;

/// Capacity ceiling: `u16` indices bound a batch to 65536 vertices, and
/// a triangle list references at most 3 vertices per triangle.
pub const MAX_TRIANGLE_CAPACITY: usize = (u16::MAX as usize + 1) / 3;

/// Addressable vertices per draw call with `u16` indices.
pub const MAX_VERTEX_CAPACITY: usize = u16::MAX as usize + 1;

/// Index pattern for a region attachment quad.
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

/// Per-frame accumulator of vertices and triangle indices.
#[derive(Debug)]
pub struct TriangleBatch {
    capacity: usize,
    page: Option<PageId>,
    blend: BlendState,
    transform: Mat4,
    vertices: Vec<Vertex2d>,
    indices: Vec<u16>,
}

impl TriangleBatch {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TRIANGLE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.clamp(1, MAX_TRIANGLE_CAPACITY),
            page: None,
            blend: BlendState::default(),
            transform: Mat4::IDENTITY,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Current capacity in triangles.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Accumulated (unflushed) triangle count.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Set the model transform copied into subsequently flushed calls.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// Open a batch for `(page, blend)`, flushing first when either
    /// differs from the currently open batch.
    pub fn begin(&mut self, page: PageId, blend: BlendState, out: &mut DrawList) {
        if self.page != Some(page) || self.blend != blend {
            self.flush(out);
            self.page = Some(page);
            self.blend = blend;
        }
    }

    /// Make room for geometry of `vertices` vertices and `triangles`
    /// triangles, flushing and doubling capacity as needed.
    ///
    /// Returns `false` when the geometry cannot fit even in an empty
    /// batch; nothing should be appended in that case.
    pub fn reserve(&mut self, vertices: usize, triangles: usize, out: &mut DrawList) -> bool {
        if vertices > MAX_VERTEX_CAPACITY {
            log::warn!(
                "geometry exceeds the {} addressable vertices; dropping {} triangle(s)",
                MAX_VERTEX_CAPACITY,
                triangles
            );
            return false;
        }
        // Triangle capacity alone does not bound vertices: a mesh may
        // carry far more vertices than triangles, and index rebasing
        // wraps past the u16 range.
        if self.vertices.len() + vertices > MAX_VERTEX_CAPACITY {
            self.flush(out);
        }
        while self.triangle_count() + triangles > self.capacity {
            self.flush(out);
            if triangles <= self.capacity {
                break;
            }
            if !self.grow() {
                log::warn!(
                    "triangle batch at capacity ceiling ({} triangles); dropping {} triangle(s)",
                    self.capacity,
                    triangles
                );
                return false;
            }
        }
        true
    }

    fn grow(&mut self) -> bool {
        if self.capacity >= MAX_TRIANGLE_CAPACITY {
            return false;
        }
        self.capacity = (self.capacity * 2).min(MAX_TRIANGLE_CAPACITY);
        log::trace!("triangle batch grew to {} triangles", self.capacity);
        true
    }

    /// Append a region attachment quad: 4 vertices, 2 triangles with
    /// the fixed index pattern.
    pub fn push_region(&mut self, vertices: [Vertex2d; 4]) {
        let base = self.vertices.len() as u16;
        self.vertices.extend_from_slice(&vertices);
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    /// Append mesh geometry with engine-supplied indices.
    pub fn push_triangles(&mut self, vertices: &[Vertex2d], indices: &[u16]) {
        let base = self.vertices.len() as u16;
        self.vertices.extend_from_slice(vertices);
        self.indices.extend(indices.iter().map(|i| base + i));
    }

    /// Submit the accumulated triangles as one draw call and clear.
    pub fn flush(&mut self, out: &mut DrawList) {
        let Some(page) = self.page else {
            return;
        };
        if self.vertices.is_empty() {
            return;
        }
        out.push_draw(DrawCall {
            page,
            blend: self.blend,
            transform: self.transform,
            vertices: std::mem::take(&mut self.vertices),
            indices: std::mem::take(&mut self.indices),
        });
    }

    /// Drop any accumulated geometry and forget the open page.
    pub fn reset(&mut self) {
        self.page = None;
        self.vertices.clear();
        self.indices.clear();
    }
}

impl Default for TriangleBatch {
    fn default() -> Self {
        Self::new()
    }
}
